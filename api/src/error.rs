//! JSON error mapping for the API layer.
//!
//! Every failure of the verification core maps to a stable
//! machine-readable code plus a human-readable message; rate-limit
//! errors additionally carry the exact remaining wait or attempts.

use std::fmt;

use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use chrono::{DateTime, Utc};
use serde::Serialize;

use td_core::errors::VerificationError;

/// Wire format of an API error.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    /// Stable machine-readable error code
    pub error: String,
    /// Human-readable message
    pub message: String,
    /// When the error occurred
    pub timestamp: DateTime<Utc>,
    /// Remaining check attempts, for INVALID_CODE
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remaining_attempts: Option<u32>,
    /// Remaining cooldown wait in whole minutes, for COOLDOWN_ACTIVE
    #[serde(skip_serializing_if = "Option::is_none")]
    pub retry_after_minutes: Option<i64>,
}

/// Newtype bridging [`VerificationError`] into actix's error handling.
#[derive(Debug)]
pub struct ApiError(pub VerificationError);

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<VerificationError> for ApiError {
    fn from(err: VerificationError) -> Self {
        Self(err)
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match &self.0 {
            VerificationError::CooldownActive { .. } | VerificationError::MaxAttemptsExceeded => {
                StatusCode::TOO_MANY_REQUESTS
            }
            VerificationError::InvalidPhoneFormat { .. }
            | VerificationError::InvalidCode { .. }
            | VerificationError::MalformedCode => StatusCode::BAD_REQUEST,
            VerificationError::NoActiveCode => StatusCode::NOT_FOUND,
            VerificationError::VerificationRequired => StatusCode::UNAUTHORIZED,
            VerificationError::InvalidVerification => StatusCode::FORBIDDEN,
            VerificationError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let remaining_attempts = match &self.0 {
            VerificationError::InvalidCode { remaining_attempts } => Some(*remaining_attempts),
            _ => None,
        };
        let retry_after_minutes = match &self.0 {
            VerificationError::CooldownActive { remaining_minutes } => Some(*remaining_minutes),
            _ => None,
        };
        // Storage details stay in the logs, not on the wire.
        let message = match &self.0 {
            VerificationError::Storage(e) => {
                log::error!("storage failure surfaced to API: {e}");
                "Internal server error".to_string()
            }
            other => other.to_string(),
        };
        HttpResponse::build(self.status_code()).json(ErrorBody {
            error: self.0.code().to_string(),
            message,
            timestamp: Utc::now(),
            remaining_attempts,
            retry_after_minutes,
        })
    }
}
