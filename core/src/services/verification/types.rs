//! Types for verification service results.

use chrono::{DateTime, Utc};

/// Result of issuing a verification code.
#[derive(Debug, Clone)]
pub struct IssuedCode {
    /// Canonical phone number the code was issued for
    pub phone_number: String,
    /// The generated code. Only for strictly controlled callers (tests,
    /// delivery); never expose it to end users through the API.
    pub code: String,
    /// When the code stops being checkable
    pub expires_at: DateTime<Utc>,
    /// When the next issuance for this phone number is allowed
    pub next_resend_at: DateTime<Utc>,
    /// Delivery failure, if any. The code is still valid for checking;
    /// callers should treat this as a warning, not a failed issuance.
    pub delivery_error: Option<String>,
}
