//! # TextDesk Infrastructure
//!
//! Concrete implementations of the core's storage and delivery
//! contracts: an in-memory verification record store and the mock and
//! console code-delivery channels used in development and tests.

pub mod delivery;
pub mod store;

pub use delivery::{ConsoleDelivery, MockDelivery};
pub use store::InMemoryVerificationStore;
