//! Verification record storage implementations.

pub mod memory;

pub use memory::InMemoryVerificationStore;
