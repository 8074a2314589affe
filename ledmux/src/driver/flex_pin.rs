use embedded_hal::digital::{ErrorType, InputPin, OutputPin};

/// Pin that can be switched between input and output.
///
/// Matrix lines which are both driven and sampled (the columns of the column
/// multiplexer, every line of the row multiplexer) need this. When switched to
/// input, `set_high` is expected to enable the pull-up.
pub trait FlexPin: ErrorType + InputPin + OutputPin {
    fn set_as_input(&mut self);

    fn set_as_output(&mut self);

    /// Release the line: input with pull-up, the idle level of every matrix line
    fn release(&mut self) {
        self.set_as_input();
        self.set_high().ok();
    }

    /// Drive the line low
    fn drive_low(&mut self) {
        self.set_as_output();
        self.set_low().ok();
    }

    /// Drive the line high
    fn drive_high(&mut self) {
        self.set_as_output();
        self.set_high().ok();
    }

    /// True if the line reads low, which is a pressed key on an active-low matrix
    fn is_active(&mut self) -> bool {
        self.is_low().ok().unwrap_or_default()
    }
}
