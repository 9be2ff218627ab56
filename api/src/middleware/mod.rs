//! HTTP middleware for the API.

pub mod access_gate;
pub mod cors;

pub use access_gate::{AccessGate, VerifiedPhone, CODE_HEADER, PHONE_HEADER};
pub use cors::create_cors;
