//! Business services for the verification workflow.

pub mod verification;

pub use verification::*;
