//! Register-level contract of the timer shared by the key scan and the LED PWM.
//!
//! One hardware timer provides both the periodic match interrupt that drives the
//! multiplexer and the compare channels that produce the LED duty cycles. The two
//! roles are split in two traits so that each can be faked separately, but on real
//! hardware a single peripheral wrapper implements both.

use crate::config::{PwmMode, TimerConfig};

/// The periodic match interrupt of the timer.
pub trait MatchTimer {
    /// Enable the peripheral clock of the timer
    fn enable_clock(&mut self);

    /// Set the counter clock prescaler
    fn set_prescaler(&mut self, prescaler: u8);

    /// Fire the match interrupt and reset the counter every `period` ticks
    fn set_match_period(&mut self, period: u16);

    /// Reset the counter, returning once the reset has completed
    fn reset_counter(&mut self);

    /// Let the counter run
    fn start(&mut self);

    /// Clear any pending interrupt and enable the timer interrupt in the NVIC
    fn enable_interrupt(&mut self, priority: u8);

    /// Acknowledge the match interrupt which fires the multiplex step
    fn clear_match_interrupt(&mut self);

    /// Acknowledge every other pending interrupt flag of the timer
    fn clear_all_interrupts(&mut self) {}
}

/// The compare channels of the timer, used as PWM outputs for the LEDs.
pub trait PwmCompare {
    /// Route `channels` to their pins and enable them as PWM channels
    fn enable_channels(&mut self, channels: u32);

    /// Select the PWM mode of `channels`
    fn set_mode(&mut self, channels: u32, mode: PwmMode);

    /// Write the compare value of a single channel
    fn set_compare(&mut self, channel: u8, value: u8);

    /// Enable the pin outputs of `channels` and disable every other one.
    ///
    /// `0` disconnects every PWM output from its pin.
    fn set_outputs(&mut self, channels: u32);
}

/// Configure the shared timer and start the multiplex interrupt.
///
/// The caller must have selected the first multiplex line and loaded the first
/// compare values before, the first interrupt arrives within one period.
pub fn arm<T: MatchTimer + PwmCompare>(timer: &mut T, config: &TimerConfig) {
    timer.enable_clock();

    if config.pwm_channels != 0 {
        timer.enable_channels(config.pwm_channels);
        timer.set_outputs(config.pwm_channels);
        timer.set_mode(config.pwm_channels, config.pwm_mode);
    }

    timer.set_match_period(config.period);
    timer.set_prescaler(config.prescaler);

    timer.reset_counter();
    timer.start();
    timer.enable_interrupt(config.irq_priority);

    debug!(
        "Multiplex timer armed: prescaler {}, period {}, pwm channels {:x}",
        config.prescaler,
        config.period,
        config.pwm_channels
    );
}
