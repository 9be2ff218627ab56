//! Code delivery channel implementations.
//!
//! Real SMS/WhatsApp transports are owned by the surrounding system;
//! this crate ships the console channel used in development and the
//! mock channel used in tests.

pub mod console;
pub mod mock;

pub use console::ConsoleDelivery;
pub use mock::MockDelivery;
