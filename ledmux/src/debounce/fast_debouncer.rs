use embassy_time::{Duration, Instant};

use super::Debouncer;
use crate::config::default_debounce_time;
use crate::frame::RowBits;

/// Per-row eager debouncer.
///
/// A change on a row is committed immediately, then that row ignores further
/// changes until the debounce time has passed. Rows which changed while they were
/// locked are picked up once the lock expires.
pub struct FastDebouncer<const ROW: usize> {
    debounce_time: Duration,
    /// Time of the last commit of each row, `None` while the row is unlocked
    locked: [Option<Instant>; ROW],
}

impl<const ROW: usize> Default for FastDebouncer<ROW> {
    fn default() -> Self {
        Self::new(default_debounce_time())
    }
}

impl<const ROW: usize> FastDebouncer<ROW> {
    /// Create a fast debouncer
    pub fn new(debounce_time: Duration) -> Self {
        FastDebouncer {
            debounce_time,
            locked: [None; ROW],
        }
    }
}

impl<const ROW: usize> Debouncer<ROW> for FastDebouncer<ROW> {
    fn init(&mut self) {
        self.locked = [None; ROW];
    }

    fn debounce(&mut self, raw: &[RowBits; ROW], stable: &mut [RowBits; ROW], _changed: bool) -> bool {
        let mut modified = false;
        for row in 0..ROW {
            if let Some(since) = self.locked[row] {
                if since.elapsed() < self.debounce_time {
                    continue;
                }
                self.locked[row] = None;
            }

            if raw[row] != stable[row] {
                stable[row] = raw[row];
                self.locked[row] = Some(Instant::now());
                modified = true;
            }
        }
        modified
    }
}
