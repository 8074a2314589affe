//! Foreground side of the key matrix.
//!
//! The multiplex interrupt keeps the raw frame up to date. [`Matrix::scan`] is
//! polled from the main loop: it detects raw changes, runs the debouncer and
//! publishes the debounced frame to the rest of the firmware.

use crate::debounce::Debouncer;
use crate::frame::{MAX_COLS, RawFrame, RowBits};

/// Extension points run by the matrix.
///
/// Every method has an empty default, so keyboards and users only implement what
/// they need. A `(keyboard, user)` tuple runs the keyboard level hook first.
pub trait MatrixHooks<const ROW: usize> {
    /// Called once at the end of [`Matrix::init`]
    fn init(&mut self) {}

    /// Called after each [`Matrix::scan`] with the debounced frame
    fn scan(&mut self, _stable: &[RowBits; ROW]) {}
}

impl<const ROW: usize> MatrixHooks<ROW> for () {}

impl<const ROW: usize, K: MatrixHooks<ROW>, U: MatrixHooks<ROW>> MatrixHooks<ROW> for (K, U) {
    fn init(&mut self) {
        self.0.init();
        self.1.init();
    }

    fn scan(&mut self, stable: &[RowBits; ROW]) {
        self.0.scan(stable);
        self.1.scan(stable);
    }
}

/// Debounced key matrix fed by a multiplexer through a shared [`RawFrame`].
pub struct Matrix<'a, D: Debouncer<ROW>, H: MatrixHooks<ROW>, const ROW: usize, const COL: usize> {
    /// Raw frame, written by the multiplex interrupt
    raw: &'a RawFrame<ROW>,
    /// Raw frame seen by the previous scan
    last_raw: [RowBits; ROW],
    /// Debounced frame
    stable: [RowBits; ROW],
    /// Set if the last scan modified the debounced frame
    stable_changed: bool,
    debouncer: D,
    hooks: H,
}

impl<'a, D: Debouncer<ROW>, const ROW: usize, const COL: usize> Matrix<'a, D, (), ROW, COL> {
    /// Create a matrix without hooks
    pub fn new(raw: &'a RawFrame<ROW>, debouncer: D) -> Self {
        Self::with_hooks(raw, debouncer, ())
    }
}

impl<'a, D: Debouncer<ROW>, H: MatrixHooks<ROW>, const ROW: usize, const COL: usize> Matrix<'a, D, H, ROW, COL> {
    const COLS_FIT: () = assert!(COL <= MAX_COLS, "a matrix row holds at most 32 columns");

    pub fn with_hooks(raw: &'a RawFrame<ROW>, debouncer: D, hooks: H) -> Self {
        let () = Self::COLS_FIT;
        Self {
            raw,
            last_raw: [0; ROW],
            stable: [0; ROW],
            stable_changed: false,
            debouncer,
            hooks,
        }
    }

    /// Release every key and reset the debouncer.
    ///
    /// The raw frame is left alone, the multiplexer clears it when it starts.
    pub fn init(&mut self) {
        self.last_raw = [0; ROW];
        self.stable = [0; ROW];
        self.stable_changed = false;

        self.debouncer.init();
        self.hooks.init();
        info!("Matrix initialized: {} rows x {} cols", ROW, COL);
    }

    /// Run one scan cycle.
    ///
    /// Returns true if the raw frame changed since the previous scan. Whether the
    /// debounced frame changed is available from [`Matrix::stable_changed`].
    pub fn scan(&mut self) -> bool {
        let raw = self.raw.snapshot();

        let mut changed = false;
        for (last, current) in self.last_raw.iter_mut().zip(raw.iter()) {
            if *last != *current {
                changed = true;
                *last = *current;
            }
        }

        self.stable_changed = self.debouncer.debounce(&raw, &mut self.stable, changed);
        if self.stable_changed {
            trace!("Debounced matrix changed");
        }

        self.hooks.scan(&self.stable);

        changed
    }

    /// Debounced state of a row, rows out of range read as released
    #[inline]
    pub fn get_row(&self, row: usize) -> RowBits {
        self.stable.get(row).copied().unwrap_or(0)
    }

    /// Whether the key at (`row`, `col`) is pressed after debouncing
    #[inline]
    pub fn is_on(&self, row: usize, col: usize) -> bool {
        col < COL && self.get_row(row) & (1 << col) != 0
    }

    /// The whole debounced frame
    pub fn stable(&self) -> &[RowBits; ROW] {
        &self.stable
    }

    /// Set if the last [`Matrix::scan`] changed the debounced frame
    pub fn stable_changed(&self) -> bool {
        self.stable_changed
    }

    pub const fn rows(&self) -> usize {
        ROW
    }

    pub const fn cols(&self) -> usize {
        COL
    }

    pub fn hooks_mut(&mut self) -> &mut H {
        &mut self.hooks
    }

    /// Dump the debounced matrix to the log
    pub fn print(&self) {
        for (row, bits) in self.stable.iter().enumerate() {
            debug!("row {}: {:b}", row, bits);
        }
    }
}
