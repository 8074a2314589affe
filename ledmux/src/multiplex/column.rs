use embedded_hal::digital::OutputPin;

use super::MultiplexDriver;
use crate::config::{COLUMN_LEDS_PER_STEP, ColumnLedConfig, TimerConfig};
use crate::driver::flex_pin::FlexPin;
use crate::driver::timer::{self, MatchTimer, PwmCompare};
use crate::frame::{MAX_COLS, RawFrame};
use crate::led::{LedSource, NoLeds, Rgb};

/// Column-at-a-time multiplexer.
///
/// Column lines are both selected and sampled: the selected column is driven low
/// while it is the active LED column, then released to an input before its keys are
/// read by strobing every row low in turn. Row lines are plain outputs, idle high.
///
/// When LEDs share the timer, `N` LEDs starting at the newly selected column are
/// loaded into the compare registers after each step.
pub struct ColumnMultiplexer<
    'a,
    Row: OutputPin,
    Col: FlexPin,
    T: MatchTimer + PwmCompare,
    L: LedSource,
    const ROW: usize,
    const COL: usize,
    const N: usize = COLUMN_LEDS_PER_STEP,
> {
    /// Row pins, always outputs
    row_pins: [Row; ROW],
    /// Column pins, switched between output (selected) and input (sampled/idle)
    col_pins: [Col; COL],
    /// Shared scan/PWM timer
    timer: T,
    timer_config: TimerConfig,
    /// Raw key frame, this multiplexer is its only writer
    raw: &'a RawFrame<ROW>,
    /// LED state and compare channel layout, if LEDs share the timer
    leds: Option<(&'a L, ColumnLedConfig<N>)>,
    /// Selected column
    cursor: usize,
}

impl<'a, Row: OutputPin, Col: FlexPin, T: MatchTimer + PwmCompare, const ROW: usize, const COL: usize>
    ColumnMultiplexer<'a, Row, Col, T, NoLeds, ROW, COL>
{
    /// Create a multiplexer which only scans keys.
    pub fn new(
        row_pins: [Row; ROW],
        col_pins: [Col; COL],
        timer: T,
        timer_config: TimerConfig,
        raw: &'a RawFrame<ROW>,
    ) -> Self {
        let () = Self::COLS_FIT;
        Self {
            row_pins,
            col_pins,
            timer,
            timer_config,
            raw,
            leds: None,
            cursor: 0,
        }
    }
}

impl<
    'a,
    Row: OutputPin,
    Col: FlexPin,
    T: MatchTimer + PwmCompare,
    L: LedSource,
    const ROW: usize,
    const COL: usize,
    const N: usize,
> ColumnMultiplexer<'a, Row, Col, T, L, ROW, COL, N>
{
    const COLS_FIT: () = assert!(COL > 0 && COL <= MAX_COLS, "column count must be within 1..=32");

    /// Create a multiplexer which scans keys and drives the LEDs from `leds`.
    ///
    /// The PWM channels enabled on the timer are taken from `led_config`.
    pub fn with_leds(
        row_pins: [Row; ROW],
        col_pins: [Col; COL],
        timer: T,
        mut timer_config: TimerConfig,
        raw: &'a RawFrame<ROW>,
        leds: &'a L,
        led_config: ColumnLedConfig<N>,
    ) -> Self {
        let () = Self::COLS_FIT;
        timer_config.pwm_channels = led_config.channel_mask();
        Self {
            row_pins,
            col_pins,
            timer,
            timer_config,
            raw,
            leds: Some((leds, led_config)),
            cursor: 0,
        }
    }

    /// Load the compare registers for the LEDs lit with the selected column
    fn load_leds(&mut self) {
        if let Some((leds, config)) = &self.leds {
            for (slot, channels) in config.slots.iter().enumerate() {
                let color = leds.led(self.cursor + slot).unwrap_or(Rgb::OFF);
                self.timer.set_compare(channels.red, color.r);
                self.timer.set_compare(channels.blue, color.b);
                self.timer.set_compare(channels.green, color.g);
            }
        }
    }
}

impl<
    'a,
    Row: OutputPin,
    Col: FlexPin,
    T: MatchTimer + PwmCompare,
    L: LedSource,
    const ROW: usize,
    const COL: usize,
    const N: usize,
> MultiplexDriver for ColumnMultiplexer<'a, Row, Col, T, L, ROW, COL, N>
{
    /// Idle every line, select column 0 and start the timer.
    ///
    /// After this returns, the first multiplex interrupt arrives within one period.
    /// Stale samples in the raw frame are cleared first.
    fn init(&mut self) {
        for row in self.row_pins.iter_mut() {
            row.set_high().ok();
        }
        for col in self.col_pins.iter_mut() {
            col.release();
        }

        self.raw.clear();
        self.cursor = 0;
        self.col_pins[0].drive_low();
        self.load_leds();

        timer::arm(&mut self.timer, &self.timer_config);
        info!(
            "Column multiplexer started: {} rows, {} cols, leds: {}",
            ROW,
            COL,
            self.leds.is_some()
        );
    }

    fn on_match(&mut self) {
        self.timer.clear_match_interrupt();

        let col = self.cursor;
        let col_pin = &mut self.col_pins[col];

        // Turn the column off, it's sampled as an input from now on
        col_pin.release();

        // Strobe each row and read the column
        for (row, row_pin) in self.row_pins.iter_mut().enumerate() {
            row_pin.set_low().ok();
            self.raw.write_bit(row, col, col_pin.is_active());
            row_pin.set_high().ok();
        }

        self.cursor = (col + 1) % COL;
        self.col_pins[self.cursor].drive_low();

        self.load_leds();

        self.timer.clear_all_interrupts();
    }

    fn cursor(&self) -> usize {
        self.cursor
    }

    fn line_count(&self) -> usize {
        COL
    }
}
