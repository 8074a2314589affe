use embedded_hal::digital::OutputPin;

/// Select lines of the hardware LED rows.
///
/// The active level depends on the row driver transistors of the board, so it is
/// configurable. At most one row is active at a time.
pub(crate) struct LedRows<P: OutputPin, const HW: usize> {
    pins: [P; HW],
    low_active: bool,
}

impl<P: OutputPin, const HW: usize> LedRows<P, HW> {
    pub fn new(pins: [P; HW], low_active: bool) -> Self {
        Self { pins, low_active }
    }

    /// Light the given row
    pub fn activate(&mut self, row: usize) {
        if let Some(pin) = self.pins.get_mut(row) {
            if self.low_active {
                pin.set_low().ok();
            } else {
                pin.set_high().ok();
            }
        }
    }

    /// Switch the given row off
    pub fn deactivate(&mut self, row: usize) {
        if let Some(pin) = self.pins.get_mut(row) {
            if self.low_active {
                pin.set_high().ok();
            } else {
                pin.set_low().ok();
            }
        }
    }

    pub fn deactivate_all(&mut self) {
        for row in 0..HW {
            self.deactivate(row);
        }
    }
}
