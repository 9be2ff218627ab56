//! Domain layer containing entities for the verification workflow.

pub mod entities;

pub use entities::*;
