//! Timer interrupt driven matrix multiplexers.
//!
//! Every match interrupt of the shared timer performs exactly one multiplex step:
//! the previous line is released, keys on the current line are sampled into the
//! [`RawFrame`](crate::frame::RawFrame), the cursor advances and the compare
//! registers are loaded for the LEDs lit during the next step. The work per step is
//! bounded by the number of rows or columns, so it always fits in one period.
//!
//! Two board layouts are supported:
//! - [`ColumnMultiplexer`]: one column per step, every row is strobed while the
//!   column is sampled, up to five RGB LEDs are loaded per step.
//! - [`RowMultiplexer`]: one hardware LED row per step, three hardware rows (blue,
//!   green, red) per logical row. PWM is disconnected while keys are sampled.

use core::cell::RefCell;

use critical_section::Mutex;

mod column;
mod row;

pub use column::ColumnMultiplexer;
pub use row::{RowMultiplexer, RowMuxPins};

/// One multiplex step per timer match.
pub trait MultiplexDriver {
    /// Idle every line, select line 0 and start the timer.
    ///
    /// The timer interrupt is enabled before this returns, so the driver must
    /// already be reachable from the interrupt handler. See [`SharedMultiplexer::start`].
    fn init(&mut self);

    /// Perform one multiplex step. Called from the timer match interrupt.
    fn on_match(&mut self);

    /// Line which is currently selected
    fn cursor(&self) -> usize;

    /// Number of lines walked before the cursor wraps
    fn line_count(&self) -> usize;
}

/// Hands a multiplexer over to the timer interrupt.
///
/// ```ignore
/// static MUX: SharedMultiplexer<Mux> = SharedMultiplexer::new();
///
/// MUX.start(mux);
///
/// #[interrupt]
/// fn CT16B1() {
///     MUX.on_interrupt();
/// }
/// ```
pub struct SharedMultiplexer<M: MultiplexDriver> {
    inner: Mutex<RefCell<Option<M>>>,
}

impl<M: MultiplexDriver> Default for SharedMultiplexer<M> {
    fn default() -> Self {
        Self::new()
    }
}

impl<M: MultiplexDriver> SharedMultiplexer<M> {
    pub const fn new() -> Self {
        Self {
            inner: Mutex::new(RefCell::new(None)),
        }
    }

    /// Store a multiplexer which is already running, replacing the previous one
    pub fn install(&self, mux: M) {
        critical_section::with(|cs| {
            self.inner.borrow(cs).replace(Some(mux));
        });
    }

    /// Install the multiplexer and initialize it in one critical section.
    ///
    /// The timer interrupt is enabled by `init`, but can't be taken before the
    /// critical section ends, so the first match always finds the driver in place.
    pub fn start(&self, mux: M) {
        critical_section::with(|cs| {
            let mut slot = self.inner.borrow(cs).borrow_mut();
            slot.insert(mux).init();
        });
    }

    /// Take the multiplexer back, interrupts fired afterwards are ignored
    pub fn take(&self) -> Option<M> {
        critical_section::with(|cs| self.inner.borrow(cs).take())
    }

    /// Run one multiplex step, does nothing until a multiplexer is installed
    pub fn on_interrupt(&self) {
        critical_section::with(|cs| {
            if let Some(mux) = self.inner.borrow(cs).borrow_mut().as_mut() {
                mux.on_match();
            }
        });
    }

    /// Current cursor of the installed multiplexer
    pub fn cursor(&self) -> Option<usize> {
        critical_section::with(|cs| self.inner.borrow(cs).borrow().as_ref().map(|m| m.cursor()))
    }
}
