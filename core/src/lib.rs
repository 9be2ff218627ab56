//! # TextDesk Core
//!
//! Core business logic and domain layer for the TextDesk backend.
//! This crate contains the phone verification domain entity, the
//! verification service, repository interfaces, phone normalization
//! utilities, and error types shared by the rest of the workspace.

pub mod domain;
pub mod errors;
pub mod phone;
pub mod repositories;
pub mod services;

// Re-export commonly used types for convenience
pub use domain::*;
pub use errors::*;
pub use repositories::*;
pub use services::*;
