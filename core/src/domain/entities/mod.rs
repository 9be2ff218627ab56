//! Domain entities.

pub mod verification_record;

pub use verification_record::{RecordState, VerificationRecord};
