use embassy_time::Duration;

use crate::error::MatrixError;

/// Default debounce time, in milliseconds
pub const DEBOUNCE_THRESHOLD: u16 = 5;

/// LEDs loaded per column step by the column multiplexer
pub const COLUMN_LEDS_PER_STEP: usize = 5;

/// Default debounce time as a `Duration`
pub const fn default_debounce_time() -> Duration {
    Duration::from_millis(DEBOUNCE_THRESHOLD as u64)
}

/// PWM output mode of the compare channels.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PwmMode {
    /// Output active while the counter is below the compare value
    Mode1,
    /// Output inactive while the counter is below the compare value
    Mode2,
}

/// Config for the timer shared by the key scan and the LED driver.
///
/// The values are hardware constants of the target peripheral: one match period is
/// one multiplex step.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TimerConfig {
    /// Counter clock prescaler
    pub prescaler: u8,
    /// Match value that fires the multiplex interrupt and resets the counter
    pub period: u16,
    /// Bit mask of the compare channels used as PWM outputs, 0 if no LEDs share the timer
    pub pwm_channels: u32,
    /// Mode of every PWM channel
    pub pwm_mode: PwmMode,
    /// Priority of the multiplex interrupt
    pub irq_priority: u8,
}

impl Default for TimerConfig {
    fn default() -> Self {
        Self {
            prescaler: 0x4,
            period: 0xFF,
            // PWM8, PWM9, PWM11-PWM23
            pwm_channels: 0x00FF_FB00,
            pwm_mode: PwmMode::Mode2,
            irq_priority: 4,
        }
    }
}

impl TimerConfig {
    /// Timer config for a matrix without LEDs on the timer
    pub fn scan_only() -> Self {
        Self {
            pwm_channels: 0,
            ..Default::default()
        }
    }
}

/// Compare channels driving the three colors of one LED.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct LedChannels {
    pub red: u8,
    pub green: u8,
    pub blue: u8,
}

impl LedChannels {
    pub const fn new(red: u8, green: u8, blue: u8) -> Self {
        Self { red, green, blue }
    }

    fn mask(&self) -> Result<u32, MatrixError> {
        Ok(channel_bit(self.red)? | channel_bit(self.green)? | channel_bit(self.blue)?)
    }
}

fn channel_bit(channel: u8) -> Result<u32, MatrixError> {
    1u32.checked_shl(channel as u32)
        .ok_or(MatrixError::ChannelOutOfRange {
            channel: channel as usize,
        })
}

/// LED config of the column multiplexer.
///
/// After selecting column `c`, LED `c + k` is loaded into `slots[k]`.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ColumnLedConfig<const N: usize = COLUMN_LEDS_PER_STEP> {
    pub(crate) slots: [LedChannels; N],
}

impl Default for ColumnLedConfig<COLUMN_LEDS_PER_STEP> {
    fn default() -> Self {
        Self {
            slots: [
                LedChannels::new(23, 9, 8),
                LedChannels::new(11, 13, 12),
                LedChannels::new(14, 16, 15),
                LedChannels::new(17, 19, 18),
                LedChannels::new(20, 22, 21),
            ],
        }
    }
}

impl<const N: usize> ColumnLedConfig<N> {
    pub fn new(slots: [LedChannels; N]) -> Result<Self, MatrixError> {
        for slot in slots.iter() {
            slot.mask()?;
        }
        Ok(Self { slots })
    }

    /// Mask of every channel in use
    pub fn channel_mask(&self) -> u32 {
        self.slots.iter().filter_map(|s| s.mask().ok()).fold(0, |acc, m| acc | m)
    }
}

/// LED config of the row multiplexer: compare channel of the LED in each column.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RowLedConfig<const COL: usize> {
    pub(crate) column_channels: [u8; COL],
    pub(crate) output_mask: u32,
}

impl<const COL: usize> RowLedConfig<COL> {
    pub fn new(column_channels: [u8; COL]) -> Result<Self, MatrixError> {
        let mut output_mask = 0;
        for channel in column_channels.iter() {
            output_mask |= channel_bit(*channel)?;
        }
        Ok(Self {
            column_channels,
            output_mask,
        })
    }

    /// Column `c` uses channel `first + c`
    pub fn sequential(first: u8) -> Result<Self, MatrixError> {
        let mut channels = [0u8; COL];
        for (col, channel) in channels.iter_mut().enumerate() {
            let value = first as usize + col;
            *channel = u8::try_from(value).map_err(|_| MatrixError::ChannelOutOfRange { channel: value })?;
        }
        Self::new(channels)
    }

    /// PWM outputs re-enabled after each key read
    pub fn output_mask(&self) -> u32 {
        self.output_mask
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_column_channels() {
        let config = ColumnLedConfig::default();
        assert_eq!(config.channel_mask(), TimerConfig::default().pwm_channels);
    }

    #[test]
    fn test_row_config() {
        let config = RowLedConfig::<4>::sequential(2).unwrap();
        assert_eq!(config.column_channels, [2, 3, 4, 5]);
        assert_eq!(config.output_mask(), 0b11_1100);

        assert_eq!(
            RowLedConfig::<2>::new([31, 32]).unwrap_err(),
            MatrixError::ChannelOutOfRange { channel: 32 }
        );
        // Channel numbers past u8 are reported as they are
        assert_eq!(
            RowLedConfig::<4>::sequential(254).unwrap_err(),
            MatrixError::ChannelOutOfRange { channel: 256 }
        );
    }
}
