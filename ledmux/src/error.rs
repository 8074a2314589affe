use core::fmt;

/// Errors reported while building matrix or LED configuration.
///
/// Nothing on the scan path can fail, so these only come out of constructors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum MatrixError {
    /// A hardware LED row maps to a logical row that doesn't exist
    InvalidRowMap { hw_row: usize, logical_row: usize },
    /// The flat LED offset of a logical row doesn't fit the LED index type
    LedOffsetOverflow { row: usize },
    /// A compare channel can't be represented in the 32-bit channel masks
    ChannelOutOfRange { channel: usize },
}

impl fmt::Display for MatrixError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MatrixError::InvalidRowMap { hw_row, logical_row } => {
                write!(f, "hardware row {} maps to missing logical row {}", hw_row, logical_row)
            }
            MatrixError::LedOffsetOverflow { row } => write!(f, "LED offset of row {} overflows", row),
            MatrixError::ChannelOutOfRange { channel } => write!(f, "compare channel {} out of range", channel),
        }
    }
}
