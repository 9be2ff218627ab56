//! Storage contract for verification records.
//!
//! The contract deliberately pushes the two read-modify-write sequences
//! of the workflow (issuance-with-cooldown and check-with-attempts)
//! into the store as single atomic operations. Concurrent checks for
//! the same phone number must never both observe `attempts < max` and
//! both increment past the cap; implementations provide that guarantee
//! with whatever critical section or conditional update suits their
//! backend. Contention is scoped per phone number; no global ordering
//! is required.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::entities::verification_record::VerificationRecord;
use crate::errors::StoreError;

/// Outcome of a conditional issuance insert.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IssueTransition {
    /// The record was persisted and supersedes any earlier record.
    Created,
    /// An unexpired record is still inside its cooldown window; nothing
    /// was written. `retry_at` is the end of that window.
    CooldownActive { retry_at: DateTime<Utc> },
}

/// Outcome of one atomic check attempt against the active record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckTransition {
    /// The code matched; the record is (now) marked verified. Checking
    /// an already-verified record with the correct code lands here too.
    Verified,
    /// The code did not match; the failed attempt has been persisted.
    WrongCode { remaining_attempts: u32 },
    /// The attempt cap was already reached; terminal for this record.
    Locked,
    /// No unexpired record exists for this phone number.
    NoActiveCode,
}

/// Persistence interface for verification records.
///
/// Mutated only by the verification service; the access gate consumes
/// [`VerificationStore::find_verified`] exclusively.
#[async_trait]
pub trait VerificationStore: Send + Sync {
    /// Returns the most recent unexpired record for a phone number.
    async fn find_active(
        &self,
        phone_number: &str,
        now: DateTime<Utc>,
    ) -> Result<Option<VerificationRecord>, StoreError>;

    /// Persists a freshly issued record unless an unexpired record for
    /// the same phone number is still inside its cooldown window.
    ///
    /// The cooldown comparison uses `record.created_at` as the issuance
    /// instant; the check and the insert happen in one critical section
    /// so two concurrent issuances cannot both pass the cooldown.
    async fn insert_unless_cooldown(
        &self,
        record: VerificationRecord,
        cooldown_minutes: i64,
    ) -> Result<IssueTransition, StoreError>;

    /// Atomically applies one check attempt against the active record.
    ///
    /// On mismatch the attempt counter and `last_attempt_at` are
    /// durably persisted before this method returns, so a crash or
    /// caller retry cannot regain the attempt. On match the record is
    /// marked verified; re-checking a verified record with the correct
    /// code succeeds without further side effects.
    async fn apply_check(
        &self,
        phone_number: &str,
        submitted_code: &str,
        now: DateTime<Utc>,
        max_attempts: u32,
    ) -> Result<CheckTransition, StoreError>;

    /// Read-only gate lookup: does a verified, unexpired record exist
    /// for exactly this phone number and code?
    ///
    /// Must not mutate any record state.
    async fn find_verified(
        &self,
        phone_number: &str,
        submitted_code: &str,
        now: DateTime<Utc>,
    ) -> Result<bool, StoreError>;
}
