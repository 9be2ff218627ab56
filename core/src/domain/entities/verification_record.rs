//! Verification record entity for phone-based two-step verification.

use chrono::{DateTime, Duration, Utc};
use constant_time_eq::constant_time_eq;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Lifecycle state of a verification record at a given instant.
///
/// `Locked` and `Expired` are terminal: a fresh issuance is required.
/// `Verified` remains usable for gate checks until expiry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordState {
    Issued,
    Verified,
    Locked,
    Expired,
}

/// The sole persisted entity of the verification core: one issued code
/// tied to one canonical phone number.
///
/// Only the most recent record per phone number is authoritative; a
/// superseding issuance replaces the prior record in storage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerificationRecord {
    /// Unique identifier, used only for log correlation
    pub id: Uuid,

    /// Canonical phone number this code was issued for (storage key)
    pub phone_number: String,

    /// The zero-padded decimal verification code
    pub code: String,

    /// Number of failed check attempts made against this record
    pub attempts: u32,

    /// Timestamp when the code was issued; anchors the cooldown window
    pub created_at: DateTime<Utc>,

    /// Timestamp after which the record is unusable for checking
    pub expires_at: DateTime<Utc>,

    /// Timestamp of the most recent failed attempt (diagnostic only)
    pub last_attempt_at: Option<DateTime<Utc>>,

    /// Whether the code has been successfully checked; write-once-true
    pub verified: bool,
}

impl VerificationRecord {
    /// Creates a new record for a freshly issued code.
    ///
    /// # Arguments
    ///
    /// * `phone_number` - Canonical phone number the code was issued for
    /// * `code` - The generated verification code
    /// * `now` - Issuance instant
    /// * `expiry_minutes` - Minutes until the code expires
    pub fn new(
        phone_number: String,
        code: String,
        now: DateTime<Utc>,
        expiry_minutes: i64,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            phone_number,
            code,
            attempts: 0,
            created_at: now,
            expires_at: now + Duration::minutes(expiry_minutes),
            last_attempt_at: None,
            verified: false,
        }
    }

    /// Whether the record has expired at `now`. Expiry is logical,
    /// never a deletion event.
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }

    /// Whether the attempt cap has been reached, making the record
    /// terminally unusable for checking.
    pub fn is_locked(&self, max_attempts: u32) -> bool {
        self.attempts >= max_attempts
    }

    /// Compares a submitted code against the stored one in constant
    /// time to avoid leaking the match position.
    pub fn code_matches(&self, submitted: &str) -> bool {
        if self.code.len() != submitted.len() {
            return false;
        }
        constant_time_eq(self.code.as_bytes(), submitted.as_bytes())
    }

    /// Resolves the lifecycle state of this record at `now`.
    ///
    /// Expiry dominates: an expired record is `Expired` regardless of
    /// its verified or locked status.
    pub fn state(&self, now: DateTime<Utc>, max_attempts: u32) -> RecordState {
        if self.is_expired(now) {
            RecordState::Expired
        } else if self.verified {
            RecordState::Verified
        } else if self.is_locked(max_attempts) {
            RecordState::Locked
        } else {
            RecordState::Issued
        }
    }

    /// The instant at which a new issuance for this phone number is
    /// allowed again.
    pub fn cooldown_end(&self, cooldown_minutes: i64) -> DateTime<Utc> {
        self.created_at + Duration::minutes(cooldown_minutes)
    }

    /// Remaining check attempts before the record locks (0 if exhausted).
    pub fn remaining_attempts(&self, max_attempts: u32) -> u32 {
        max_attempts.saturating_sub(self.attempts)
    }
}
