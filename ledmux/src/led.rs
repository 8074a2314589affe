//! LED state read by the multiplexer, and the mapping from hardware LED rows to
//! logical LED rows.

use core::sync::atomic::{AtomicU32, Ordering};

use crate::error::MatrixError;

/// Intensity of one RGB LED.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const OFF: Rgb = Rgb { r: 0, g: 0, b: 0 };

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Intensity of a single color channel
    pub fn channel(&self, channel: LedChannel) -> u8 {
        match channel {
            LedChannel::Red => self.r,
            LedChannel::Green => self.g,
            LedChannel::Blue => self.b,
        }
    }

    const fn pack(self) -> u32 {
        ((self.r as u32) << 16) | ((self.g as u32) << 8) | self.b as u32
    }

    const fn unpack(word: u32) -> Self {
        Self {
            r: (word >> 16) as u8,
            g: (word >> 8) as u8,
            b: word as u8,
        }
    }
}

/// Color channel driven during one hardware LED row slice.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LedChannel {
    Red,
    Green,
    Blue,
}

impl LedChannel {
    /// Channel lit while hardware LED row `hw_row` is selected.
    ///
    /// Every logical row owns three consecutive hardware rows: blue, green, red.
    pub fn for_hw_row(hw_row: usize) -> Self {
        match hw_row % 3 {
            0 => LedChannel::Blue,
            1 => LedChannel::Green,
            _ => LedChannel::Red,
        }
    }
}

/// Read-only view of the LED state produced by the lighting code.
///
/// The multiplexer reads whatever is there when its interrupt fires. Consistency
/// across several LEDs within one refresh slice is not guaranteed.
pub trait LedSource {
    /// Number of LEDs
    fn len(&self) -> usize;

    /// Current color of the LED at `index`, `None` if out of range
    fn led(&self, index: usize) -> Option<Rgb>;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<const N: usize> LedSource for [Rgb; N] {
    fn len(&self) -> usize {
        N
    }

    fn led(&self, index: usize) -> Option<Rgb> {
        self.get(index).copied()
    }
}

/// LED state which can be shared between an effect task and the multiplex interrupt.
///
/// Each LED is packed into one word so it's written and read in one access.
pub struct LedBuffer<const N: usize> {
    leds: [AtomicU32; N],
}

impl<const N: usize> Default for LedBuffer<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> LedBuffer<N> {
    /// All LEDs off, usable in a `static`
    pub const fn new() -> Self {
        Self {
            leds: [const { AtomicU32::new(0) }; N],
        }
    }

    /// Update one LED. Indices out of range are ignored.
    pub fn set(&self, index: usize, color: Rgb) {
        if let Some(led) = self.leds.get(index) {
            led.store(color.pack(), Ordering::Relaxed);
        }
    }

    pub fn fill(&self, color: Rgb) {
        for led in self.leds.iter() {
            led.store(color.pack(), Ordering::Relaxed);
        }
    }
}

impl<const N: usize> LedSource for LedBuffer<N> {
    fn len(&self) -> usize {
        N
    }

    fn led(&self, index: usize) -> Option<Rgb> {
        self.leds.get(index).map(|led| Rgb::unpack(led.load(Ordering::Relaxed)))
    }
}

/// Placeholder LED source for boards without per-key lighting.
pub struct NoLeds;

impl LedSource for NoLeds {
    fn len(&self) -> usize {
        0
    }

    fn led(&self, _index: usize) -> Option<Rgb> {
        None
    }
}

/// Translation between hardware LED rows and logical LED rows.
///
/// The board multiplexes `HW` hardware LED rows, several of which (one per color)
/// belong to the same logical row. Each logical row starts at a fixed offset in the
/// flat LED array.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RowIndexMap<const HW: usize, const ROW: usize> {
    hw_to_logical: [u8; HW],
    offsets: [u16; ROW],
}

impl<const HW: usize, const ROW: usize> RowIndexMap<HW, ROW> {
    /// Build a map from explicit tables, checking every entry.
    pub fn new(hw_to_logical: [u8; HW], offsets: [u16; ROW]) -> Result<Self, MatrixError> {
        for (hw_row, logical) in hw_to_logical.iter().enumerate() {
            if *logical as usize >= ROW {
                return Err(MatrixError::InvalidRowMap {
                    hw_row,
                    logical_row: *logical as usize,
                });
            }
        }
        Ok(Self { hw_to_logical, offsets })
    }

    /// Every logical row uses `HW / ROW` consecutive hardware rows, and holds `cols` LEDs.
    pub fn grouped(cols: usize) -> Result<Self, MatrixError> {
        let per_row = (HW / ROW.max(1)).max(1);
        let mut hw_to_logical = [0u8; HW];
        for (hw_row, logical) in hw_to_logical.iter_mut().enumerate() {
            let row = hw_row / per_row;
            if row >= ROW || row > u8::MAX as usize {
                return Err(MatrixError::InvalidRowMap { hw_row, logical_row: row });
            }
            *logical = row as u8;
        }

        let mut offsets = [0u16; ROW];
        for (row, offset) in offsets.iter_mut().enumerate() {
            *offset = u16::try_from(row * cols).map_err(|_| MatrixError::LedOffsetOverflow { row })?;
        }

        Ok(Self { hw_to_logical, offsets })
    }

    /// Logical row lit while hardware row `hw_row` is selected
    #[inline]
    pub fn logical_row(&self, hw_row: usize) -> usize {
        self.hw_to_logical[hw_row % HW] as usize
    }

    /// Index of the first LED of a logical row in the flat LED array
    #[inline]
    pub fn led_offset(&self, row: usize) -> usize {
        self.offsets.get(row).copied().unwrap_or(0) as usize
    }
}
