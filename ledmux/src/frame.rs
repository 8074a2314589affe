//! Row frames shared between the multiplex interrupt and the foreground scan.
//!
//! Every row of the matrix is a single machine word: bit `c` of row `r` is set while
//! the key at (`r`, `c`) is pressed. The interrupt handler is the only writer of the
//! raw frame and the foreground only reads it, without any lock. Each row is an
//! `AtomicU32` accessed with plain relaxed loads and stores, so a reader can see a
//! row that is one multiplex step old, but never a half-written one.
//!
//! Only `load`/`store` are used, so this also works on cores without
//! compare-and-swap (e.g. Cortex-M0).

use core::sync::atomic::{AtomicU32, Ordering};

/// Bit-vector of one matrix row, one bit per column.
pub type RowBits = u32;

/// The widest matrix a single row word can hold.
pub const MAX_COLS: usize = RowBits::BITS as usize;

/// Raw (not debounced) key samples, written by the multiplex interrupt.
pub struct RawFrame<const ROW: usize> {
    rows: [AtomicU32; ROW],
}

impl<const ROW: usize> Default for RawFrame<ROW> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const ROW: usize> RawFrame<ROW> {
    /// Create a zeroed frame, usable in a `static`.
    pub const fn new() -> Self {
        Self {
            rows: [const { AtomicU32::new(0) }; ROW],
        }
    }

    /// Latest value of a row.
    ///
    /// Rows outside the frame read as released.
    #[inline]
    pub fn row(&self, row: usize) -> RowBits {
        self.rows.get(row).map(|r| r.load(Ordering::Relaxed)).unwrap_or(0)
    }

    /// Copy every row, one word at a time.
    pub fn snapshot(&self) -> [RowBits; ROW] {
        core::array::from_fn(|row| self.rows[row].load(Ordering::Relaxed))
    }

    /// Set or clear a single key bit.
    ///
    /// Must only be called from the single writer (the multiplex interrupt), since
    /// the read-modify-write is a load followed by a store.
    #[inline]
    pub(crate) fn write_bit(&self, row: usize, col: usize, pressed: bool) {
        if let Some(slot) = self.rows.get(row) {
            let mask = 1 << col;
            let value = slot.load(Ordering::Relaxed);
            let value = if pressed { value | mask } else { value & !mask };
            slot.store(value, Ordering::Relaxed);
        }
    }

    /// Release every key.
    ///
    /// Same single-writer rule as `write_bit`, only the multiplexer calls this from
    /// its `init`.
    pub(crate) fn clear(&self) {
        for row in self.rows.iter() {
            row.store(0, Ordering::Relaxed);
        }
    }
}
