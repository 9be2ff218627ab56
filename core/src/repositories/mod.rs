//! Repository interfaces for persisted verification state.

pub mod verification;

pub use verification::{CheckTransition, IssueTransition, VerificationStore};
