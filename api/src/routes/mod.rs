//! HTTP route handlers.

pub mod health;
pub mod session;
pub mod verification;
