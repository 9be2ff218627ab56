//! Domain-specific error types for the verification workflow.
//!
//! Every consumer-facing failure carries a stable machine-readable code
//! (see [`VerificationError::code`]) alongside its human-readable
//! message, so API layers can map errors without string matching.

use thiserror::Error;

/// Storage-layer failures, surfaced by [`crate::repositories::VerificationStore`]
/// implementations.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("verification store unavailable: {message}")]
    Unavailable { message: String },

    #[error("verification store write failed: {message}")]
    WriteFailed { message: String },
}

/// Failures of the verification core.
///
/// All variants are per-request: none is treated as process-fatal.
#[derive(Error, Debug)]
pub enum VerificationError {
    #[error("Please wait {remaining_minutes} minute(s) before requesting a new code")]
    CooldownActive { remaining_minutes: i64 },

    #[error("Invalid phone number format: {phone}")]
    InvalidPhoneFormat { phone: String },

    #[error("No active verification code for this phone number")]
    NoActiveCode,

    #[error("Maximum verification attempts exceeded; request a new code")]
    MaxAttemptsExceeded,

    #[error("Invalid verification code. {remaining_attempts} attempt(s) remaining")]
    InvalidCode { remaining_attempts: u32 },

    /// Syntactically malformed code, rejected before any storage lookup.
    #[error("Invalid verification code format")]
    MalformedCode,

    #[error("Phone number has no valid verification for this code")]
    InvalidVerification,

    #[error("Phone verification required")]
    VerificationRequired,

    #[error(transparent)]
    Storage(#[from] StoreError),
}

impl VerificationError {
    /// Stable machine-readable error code, shared with API consumers.
    ///
    /// These strings are part of the external contract and must not
    /// change between releases.
    pub fn code(&self) -> &'static str {
        match self {
            Self::CooldownActive { .. } => "COOLDOWN_ACTIVE",
            Self::InvalidPhoneFormat { .. } => "INVALID_PHONE_FORMAT",
            Self::NoActiveCode => "NO_ACTIVE_CODE",
            Self::MaxAttemptsExceeded => "MAX_ATTEMPTS_EXCEEDED",
            Self::InvalidCode { .. } | Self::MalformedCode => "INVALID_CODE",
            Self::InvalidVerification => "INVALID_VERIFICATION",
            Self::VerificationRequired => "VERIFICATION_REQUIRED",
            Self::Storage(_) => "STORAGE_ERROR",
        }
    }
}

pub type VerificationResult<T> = Result<T, VerificationError>;
