use crate::frame::RowBits;

pub mod default_debouncer;
pub mod fast_debouncer;

pub use default_debouncer::DefaultDebouncer;
pub use fast_debouncer::FastDebouncer;

/// Filter from raw key samples to the debounced matrix.
pub trait Debouncer<const ROW: usize> {
    /// Reset the filter state
    fn init(&mut self) {}

    /// Update `stable` from the latest `raw` frame.
    ///
    /// `changed` is set if any raw row differs from the previous scan. Returns true
    /// if `stable` was modified.
    fn debounce(&mut self, raw: &[RowBits; ROW], stable: &mut [RowBits; ROW], changed: bool) -> bool;
}

#[cfg(test)]
pub(crate) mod tests {
    /// The mock clock is global, tests which advance it run one at a time
    pub(crate) static TIME_LOCK: std::sync::Mutex<()> = std::sync::Mutex::new(());
}
