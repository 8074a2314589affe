use embedded_hal::digital::OutputPin;

use super::MultiplexDriver;
use crate::config::{RowLedConfig, TimerConfig};
use crate::driver::flex_pin::FlexPin;
use crate::driver::gpio::LedRows;
use crate::driver::timer::{self, MatchTimer, PwmCompare};
use crate::frame::{MAX_COLS, RawFrame};
use crate::led::{LedChannel, LedSource, RowIndexMap};

/// Pins of a row multiplexed board.
pub struct RowMuxPins<Row: FlexPin, Col: FlexPin, Led: OutputPin, const ROW: usize, const COL: usize, const HW: usize> {
    /// Key rows, sampled one at a time
    pub rows: [Row; ROW],
    /// Key columns, which are also the PWM driven LED columns
    pub cols: [Col; COL],
    /// Hardware LED row selects, three per logical row
    pub led_rows: [Led; HW],
    /// Set if an LED row is lit by driving its select low
    pub led_rows_low_active: bool,
}

/// Hardware-LED-row-at-a-time multiplexer.
///
/// The cursor walks the `HW` hardware LED rows. Each logical row owns three hardware
/// rows, one per color, so the keys of a logical row are sampled three times per
/// sweep. The column lines carry the PWM outputs as well, which is why PWM is
/// disconnected from the pins while keys are read.
pub struct RowMultiplexer<
    'a,
    Row: FlexPin,
    Col: FlexPin,
    Led: OutputPin,
    T: MatchTimer + PwmCompare,
    L: LedSource,
    const ROW: usize,
    const COL: usize,
    const HW: usize,
> {
    row_pins: [Row; ROW],
    col_pins: [Col; COL],
    led_rows: LedRows<Led, HW>,
    /// Shared scan/PWM timer
    timer: T,
    timer_config: TimerConfig,
    led_config: RowLedConfig<COL>,
    map: RowIndexMap<HW, ROW>,
    /// Raw key frame, this multiplexer is its only writer
    raw: &'a RawFrame<ROW>,
    leds: &'a L,
    /// Selected hardware LED row
    cursor: usize,
}

impl<
    'a,
    Row: FlexPin,
    Col: FlexPin,
    Led: OutputPin,
    T: MatchTimer + PwmCompare,
    L: LedSource,
    const ROW: usize,
    const COL: usize,
    const HW: usize,
> RowMultiplexer<'a, Row, Col, Led, T, L, ROW, COL, HW>
{
    const DIMENSIONS_FIT: () = assert!(
        COL > 0 && COL <= MAX_COLS && HW > 0,
        "column count must be within 1..=32 and there must be at least one LED row"
    );

    /// Create a row multiplexer.
    ///
    /// The PWM channels enabled on the timer are taken from `led_config`.
    pub fn new(
        pins: RowMuxPins<Row, Col, Led, ROW, COL, HW>,
        timer: T,
        mut timer_config: TimerConfig,
        led_config: RowLedConfig<COL>,
        map: RowIndexMap<HW, ROW>,
        raw: &'a RawFrame<ROW>,
        leds: &'a L,
    ) -> Self {
        let () = Self::DIMENSIONS_FIT;
        timer_config.pwm_channels = led_config.output_mask();
        Self {
            row_pins: pins.rows,
            col_pins: pins.cols,
            led_rows: LedRows::new(pins.led_rows, pins.led_rows_low_active),
            timer,
            timer_config,
            led_config,
            map,
            raw,
            leds,
            cursor: 0,
        }
    }

    /// Load one color of the logical row lit by the selected hardware row
    fn load_leds(&mut self) {
        let led_row = self.map.logical_row(self.cursor);
        let offset = self.map.led_offset(led_row);
        let channel = LedChannel::for_hw_row(self.cursor);

        for (col, compare) in self.led_config.column_channels.iter().enumerate() {
            let value = self.leds.led(offset + col).map(|c| c.channel(channel)).unwrap_or(0);
            // Odd values keep every LED on for a minimum time in each slice
            self.timer.set_compare(*compare, value | 1);
        }
    }
}

impl<
    'a,
    Row: FlexPin,
    Col: FlexPin,
    Led: OutputPin,
    T: MatchTimer + PwmCompare,
    L: LedSource,
    const ROW: usize,
    const COL: usize,
    const HW: usize,
> MultiplexDriver for RowMultiplexer<'a, Row, Col, Led, T, L, ROW, COL, HW>
{
    /// Idle every line, light LED row 0 and start the timer.
    fn init(&mut self) {
        for row in self.row_pins.iter_mut() {
            row.drive_high();
        }
        for col in self.col_pins.iter_mut() {
            col.release();
        }
        self.led_rows.deactivate_all();

        self.raw.clear();
        self.cursor = 0;
        self.load_leds();
        self.led_rows.activate(0);

        timer::arm(&mut self.timer, &self.timer_config);
        info!(
            "Row multiplexer started: {} rows, {} cols, {} led rows",
            ROW,
            COL,
            HW
        );
    }

    fn on_match(&mut self) {
        self.timer.clear_match_interrupt();

        let hw_row = self.cursor;
        self.led_rows.deactivate(hw_row);

        // PWM toggles the column lines, keep it off the pins while reading
        self.timer.set_outputs(0);

        let row = self.map.logical_row(hw_row);
        if let Some(row_pin) = self.row_pins.get_mut(row) {
            row_pin.release();
            for (col, col_pin) in self.col_pins.iter_mut().enumerate() {
                col_pin.drive_low();
                self.raw.write_bit(row, col, row_pin.is_active());
                col_pin.release();
            }
            row_pin.drive_high();
        }

        self.cursor = (hw_row + 1) % HW;
        self.load_leds();

        self.timer.set_outputs(self.led_config.output_mask());
        self.led_rows.activate(self.cursor);

        self.timer.clear_all_interrupts();
    }

    fn cursor(&self) -> usize {
        self.cursor
    }

    fn line_count(&self) -> usize {
        HW
    }
}
