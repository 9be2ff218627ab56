//! In-memory verification record store.
//!
//! Backs the development and test deployments of the dashboard. One
//! mutex over the record map gives every trait operation a single
//! critical section, which is what the storage contract demands: the
//! cooldown re-check plus insert, and the attempt read-modify-write,
//! each happen atomically, so concurrent checks for one phone number
//! cannot overshoot the attempt cap.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use td_core::domain::entities::verification_record::VerificationRecord;
use td_core::errors::StoreError;
use td_core::repositories::{CheckTransition, IssueTransition, VerificationStore};

/// In-memory [`VerificationStore`] keyed by canonical phone number.
///
/// Only the most recent record per phone number is retained; a
/// superseding issuance replaces the prior record. Expired records are
/// left in place (expiry is logical); retention is owned externally.
#[derive(Default)]
pub struct InMemoryVerificationStore {
    records: Mutex<HashMap<String, VerificationRecord>>,
}

impl InMemoryVerificationStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, HashMap<String, VerificationRecord>>, StoreError> {
        self.records.lock().map_err(|_| StoreError::Unavailable {
            message: "record map lock poisoned".to_string(),
        })
    }
}

#[async_trait]
impl VerificationStore for InMemoryVerificationStore {
    async fn find_active(
        &self,
        phone_number: &str,
        now: DateTime<Utc>,
    ) -> Result<Option<VerificationRecord>, StoreError> {
        let records = self.lock()?;
        Ok(records
            .get(phone_number)
            .filter(|record| !record.is_expired(now))
            .cloned())
    }

    async fn insert_unless_cooldown(
        &self,
        record: VerificationRecord,
        cooldown_minutes: i64,
    ) -> Result<IssueTransition, StoreError> {
        let mut records = self.lock()?;
        if let Some(existing) = records.get(&record.phone_number) {
            let retry_at = existing.cooldown_end(cooldown_minutes);
            // Lock state does not exempt a record from cooldown; any
            // unexpired record inside its window blocks re-issuance.
            if !existing.is_expired(record.created_at) && record.created_at < retry_at {
                return Ok(IssueTransition::CooldownActive { retry_at });
            }
        }
        records.insert(record.phone_number.clone(), record);
        Ok(IssueTransition::Created)
    }

    async fn apply_check(
        &self,
        phone_number: &str,
        submitted_code: &str,
        now: DateTime<Utc>,
        max_attempts: u32,
    ) -> Result<CheckTransition, StoreError> {
        let mut records = self.lock()?;
        let Some(record) = records.get_mut(phone_number) else {
            return Ok(CheckTransition::NoActiveCode);
        };
        if record.is_expired(now) {
            return Ok(CheckTransition::NoActiveCode);
        }
        if record.is_locked(max_attempts) {
            return Ok(CheckTransition::Locked);
        }
        if record.code_matches(submitted_code) {
            record.verified = true;
            return Ok(CheckTransition::Verified);
        }
        record.attempts += 1;
        record.last_attempt_at = Some(now);
        Ok(CheckTransition::WrongCode {
            remaining_attempts: record.remaining_attempts(max_attempts),
        })
    }

    async fn find_verified(
        &self,
        phone_number: &str,
        submitted_code: &str,
        now: DateTime<Utc>,
    ) -> Result<bool, StoreError> {
        let records = self.lock()?;
        Ok(records
            .get(phone_number)
            .map(|record| {
                record.verified && !record.is_expired(now) && record.code_matches(submitted_code)
            })
            .unwrap_or(false))
    }
}
