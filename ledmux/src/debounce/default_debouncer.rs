use embassy_time::{Duration, Instant};

use super::Debouncer;
use crate::config::default_debounce_time;
use crate::frame::RowBits;

/// Global deferred debouncer.
///
/// Every raw change restarts a single timer for the whole matrix. Once the raw
/// frame has been quiet for the debounce time, it is committed to the stable frame
/// at once.
pub struct DefaultDebouncer {
    debounce_time: Duration,
    /// Time of the last raw change, `None` while nothing is pending
    debouncing: Option<Instant>,
}

impl Default for DefaultDebouncer {
    fn default() -> Self {
        Self::new(default_debounce_time())
    }
}

impl DefaultDebouncer {
    pub fn new(debounce_time: Duration) -> Self {
        Self {
            debounce_time,
            debouncing: None,
        }
    }
}

impl<const ROW: usize> Debouncer<ROW> for DefaultDebouncer {
    fn init(&mut self) {
        self.debouncing = None;
    }

    fn debounce(&mut self, raw: &[RowBits; ROW], stable: &mut [RowBits; ROW], changed: bool) -> bool {
        if changed {
            self.debouncing = Some(Instant::now());
        }

        match self.debouncing {
            Some(start) if start.elapsed() >= self.debounce_time => {
                self.debouncing = None;
                let modified = stable != raw;
                *stable = *raw;
                modified
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use embassy_time::MockDriver;

    use super::*;
    use crate::debounce::tests::TIME_LOCK;

    #[test]
    fn test_commit_after_quiet_period() {
        let _guard = TIME_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        let mut debouncer = DefaultDebouncer::default();
        let mut stable = [0; 2];

        assert!(!debouncer.debounce(&[0, 0b100], &mut stable, true));
        assert_eq!(stable, [0, 0]);

        MockDriver::get().advance(Duration::from_millis(2));
        // Bounce, the timer restarts
        assert!(!debouncer.debounce(&[0, 0], &mut stable, true));
        MockDriver::get().advance(Duration::from_millis(2));
        assert!(!debouncer.debounce(&[0, 0b100], &mut stable, true));
        MockDriver::get().advance(Duration::from_millis(4));
        assert!(!debouncer.debounce(&[0, 0b100], &mut stable, false));
        assert_eq!(stable, [0, 0]);

        MockDriver::get().advance(Duration::from_millis(1));
        assert!(debouncer.debounce(&[0, 0b100], &mut stable, false));
        assert_eq!(stable, [0, 0b100]);

        // Nothing pending any more
        MockDriver::get().advance(Duration::from_millis(10));
        assert!(!debouncer.debounce(&[0, 0b100], &mut stable, false));
    }

    #[test]
    fn test_zero_debounce_time() {
        let mut debouncer = DefaultDebouncer::new(Duration::from_ticks(0));
        let mut stable = [0; 1];
        assert!(debouncer.debounce(&[0b1], &mut stable, true));
        assert_eq!(stable, [0b1]);
    }
}
