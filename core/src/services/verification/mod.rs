//! Verification service module for phone-based two-step verification.
//!
//! This module provides the complete verification code workflow:
//! - Code generation from the OS CSPRNG
//! - Issuance with per-phone cooldown enforcement
//! - Attempt-limited, constant-time code checking
//! - Integration points for storage and code delivery

mod config;
mod service;
mod traits;
mod types;

#[cfg(test)]
mod tests;

pub use config::VerificationConfig;
pub use service::VerificationService;
pub use traits::{CodeDelivery, DeliveryError};
pub use types::IssuedCode;
