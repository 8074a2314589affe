//! Keyboard matrix scanning and RGB LED multiplexing on a single shared timer.
//!
//! A periodic timer match interrupt runs a [`multiplex`] driver which walks the
//! matrix one line per interrupt and samples keys into a lock-free
//! [`RawFrame`](frame::RawFrame). On boards with per-key RGB LEDs the same
//! interrupt reprograms the timer's PWM compare channels for the next lit line.
//! The [`Matrix`](matrix::Matrix) is polled from the main loop to debounce the raw
//! frame into the stable key state.
//!
//! ## Feature flags
#![doc = document_features::document_features!()]
#![cfg_attr(not(test), no_std)]

// This mod MUST go first, so that the others see its macros.
pub(crate) mod fmt;

pub mod config;
pub mod debounce;
pub mod driver;
pub mod error;
pub mod frame;
pub mod led;
pub mod matrix;
pub mod multiplex;

pub use config::{ColumnLedConfig, LedChannels, PwmMode, RowLedConfig, TimerConfig};
pub use debounce::{DefaultDebouncer, Debouncer, FastDebouncer};
pub use driver::flex_pin::FlexPin;
pub use driver::timer::{MatchTimer, PwmCompare};
pub use error::MatrixError;
pub use frame::{RawFrame, RowBits};
pub use led::{LedBuffer, LedChannel, LedSource, NoLeds, Rgb, RowIndexMap};
pub use matrix::{Matrix, MatrixHooks};
pub use multiplex::{ColumnMultiplexer, MultiplexDriver, RowMultiplexer, RowMuxPins, SharedMultiplexer};
