pub mod flex_pin;
pub(crate) mod gpio;
pub mod timer;
