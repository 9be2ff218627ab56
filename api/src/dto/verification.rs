//! DTOs for the verification endpoints.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Request body for POST /api/v1/verification/send-code
#[derive(Debug, Deserialize, Validate)]
pub struct SendCodeRequest {
    /// Phone number in any accepted inbound shape
    #[validate(length(min = 1, max = 32, message = "phone must be 1-32 characters"))]
    pub phone: String,
}

/// Request body for POST /api/v1/verification/verify-code
#[derive(Debug, Deserialize, Validate)]
pub struct VerifyCodeRequest {
    #[validate(length(min = 1, max = 32, message = "phone must be 1-32 characters"))]
    pub phone: String,

    /// The submitted verification code
    #[validate(length(min = 1, max = 10, message = "code must be 1-10 characters"))]
    pub code: String,
}

/// Successful issuance response. Never contains the code itself; the
/// only channel for the code is the delivery capability.
#[derive(Debug, Serialize)]
pub struct SendCodeResponse {
    pub message: String,
    /// When the issued code stops being checkable
    pub expires_at: DateTime<Utc>,
    /// Seconds until a new code may be requested
    pub resend_after_seconds: i64,
    /// Present when the delivery channel failed; the code is still valid
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delivery_warning: Option<String>,
}

/// Successful check response.
#[derive(Debug, Serialize)]
pub struct VerifyCodeResponse {
    pub verified: bool,
    /// Canonical phone number that is now verified
    pub phone: String,
}

/// Response of the gated session introspection endpoint.
#[derive(Debug, Serialize)]
pub struct SessionResponse {
    /// Canonical phone number the gate authenticated
    pub phone: String,
}
