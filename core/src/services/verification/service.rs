//! Main verification service implementation.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use rand::{rngs::OsRng, RngCore};

use crate::domain::entities::verification_record::VerificationRecord;
use crate::errors::{VerificationError, VerificationResult};
use crate::phone::{mask_phone, normalize_phone};
use crate::repositories::{CheckTransition, IssueTransition, VerificationStore};

use super::config::VerificationConfig;
use super::traits::CodeDelivery;
use super::types::IssuedCode;

/// Verification service owning the lifecycle of one-time codes:
/// generation, issuance cooldown, storage, attempt-limited checking,
/// and expiry.
///
/// Stateless beyond the injected store; every operation is a single
/// atomic storage call (plus one delivery call for issuance).
pub struct VerificationService<D: CodeDelivery, S: VerificationStore> {
    /// Delivery capability for sending codes
    delivery: Arc<D>,
    /// Persistence for verification records
    store: Arc<S>,
    /// Injected configuration
    config: VerificationConfig,
}

impl<D: CodeDelivery, S: VerificationStore> VerificationService<D, S> {
    /// Creates a new verification service.
    ///
    /// # Arguments
    ///
    /// * `delivery` - Code delivery implementation
    /// * `store` - Verification record store
    /// * `config` - Service configuration
    pub fn new(delivery: Arc<D>, store: Arc<S>, config: VerificationConfig) -> Self {
        Self {
            delivery,
            store,
            config,
        }
    }

    /// The configuration this service was constructed with.
    pub fn config(&self) -> &VerificationConfig {
        &self.config
    }

    /// Issues a verification code for a phone number.
    ///
    /// This method:
    /// 1. Normalizes and validates the phone number
    /// 2. Generates a code from the OS CSPRNG
    /// 3. Persists the record, atomically enforcing the cooldown
    /// 4. Invokes the delivery capability
    ///
    /// Delivery failure does not roll back the record: the code stays
    /// valid for checking, and the failure is surfaced as a warning in
    /// the result.
    ///
    /// # Arguments
    ///
    /// * `phone` - Raw phone number in any accepted shape
    ///
    /// # Returns
    ///
    /// * `Ok(IssuedCode)` - The issued code and its timing
    /// * `Err(VerificationError)` - Invalid phone, active cooldown, or
    ///   storage failure
    pub async fn create_verification(&self, phone: &str) -> VerificationResult<IssuedCode> {
        let normalized = normalize_phone(phone, &self.config.default_country_code).ok_or_else(
            || VerificationError::InvalidPhoneFormat {
                phone: phone.to_string(),
            },
        )?;

        let now = Utc::now();
        let code = self.generate_code();
        let record = VerificationRecord::new(
            normalized.clone(),
            code.clone(),
            now,
            self.config.code_expiry_minutes,
        );
        let record_id = record.id;
        let expires_at = record.expires_at;
        let next_resend_at = record.cooldown_end(self.config.cooldown_minutes);

        match self
            .store
            .insert_unless_cooldown(record, self.config.cooldown_minutes)
            .await?
        {
            IssueTransition::Created => {}
            IssueTransition::CooldownActive { retry_at } => {
                let remaining_minutes = remaining_whole_minutes(retry_at, now);
                tracing::warn!(
                    phone = %mask_phone(&normalized),
                    remaining_minutes,
                    event = "issuance_cooldown_active",
                    "Verification code requested while cooldown is active"
                );
                return Err(VerificationError::CooldownActive { remaining_minutes });
            }
        }

        tracing::info!(
            phone = %mask_phone(&normalized),
            session_id = %record_id,
            event = "code_issued",
            "Issued new verification code"
        );

        let delivery_error = match self.delivery.send_code(&normalized, &code).await {
            Ok(message_id) => {
                tracing::debug!(
                    phone = %mask_phone(&normalized),
                    message_id = %message_id,
                    event = "code_delivered",
                    "Verification code handed to delivery channel"
                );
                None
            }
            Err(e) => {
                // The record is already durable; the code remains checkable.
                tracing::warn!(
                    phone = %mask_phone(&normalized),
                    error = %e,
                    event = "code_delivery_failed",
                    "Delivery channel failed; issued code remains valid"
                );
                Some(e.to_string())
            }
        };

        Ok(IssuedCode {
            phone_number: normalized,
            code,
            expires_at,
            next_resend_at,
            delivery_error,
        })
    }

    /// Checks a submitted code against the active record for a phone
    /// number.
    ///
    /// Malformed codes are rejected before any storage lookup and do
    /// not consume an attempt. A mismatch consumes an attempt, persisted
    /// before the error returns. A match marks the record verified;
    /// re-checking a verified, unexpired record with the correct code
    /// succeeds again.
    ///
    /// # Arguments
    ///
    /// * `phone` - Raw phone number, normalized identically to issuance
    /// * `code` - The submitted verification code
    ///
    /// # Returns
    ///
    /// * `Ok(String)` - The canonical phone number that is now verified
    /// * `Err(VerificationError)` - Typed failure, see [`VerificationError`]
    pub async fn verify_code(&self, phone: &str, code: &str) -> VerificationResult<String> {
        let normalized = normalize_phone(phone, &self.config.default_country_code).ok_or_else(
            || VerificationError::InvalidPhoneFormat {
                phone: phone.to_string(),
            },
        )?;

        if !self.is_valid_code_format(code) {
            tracing::warn!(
                phone = %mask_phone(&normalized),
                code_length = code.len(),
                event = "malformed_code_rejected",
                "Rejected syntactically invalid verification code"
            );
            return Err(VerificationError::MalformedCode);
        }

        let now = Utc::now();
        match self
            .store
            .apply_check(&normalized, code, now, self.config.max_attempts)
            .await?
        {
            CheckTransition::Verified => {
                tracing::info!(
                    phone = %mask_phone(&normalized),
                    event = "code_verified",
                    "Verification code successfully checked"
                );
                Ok(normalized)
            }
            CheckTransition::WrongCode { remaining_attempts } => {
                tracing::warn!(
                    phone = %mask_phone(&normalized),
                    remaining_attempts,
                    event = "code_check_failed",
                    "Verification code mismatch"
                );
                Err(VerificationError::InvalidCode { remaining_attempts })
            }
            CheckTransition::Locked => {
                tracing::warn!(
                    phone = %mask_phone(&normalized),
                    event = "attempt_cap_reached",
                    "Verification attempts exhausted for active record"
                );
                Err(VerificationError::MaxAttemptsExceeded)
            }
            CheckTransition::NoActiveCode => Err(VerificationError::NoActiveCode),
        }
    }

    /// Pure syntactic check: exactly `code_length` decimal digits.
    ///
    /// Used to short-circuit obviously malformed input before touching
    /// storage.
    pub fn is_valid_code_format(&self, code: &str) -> bool {
        code.len() == self.config.code_length && code.chars().all(|c| c.is_ascii_digit())
    }

    /// Generates a uniformly random zero-padded decimal code using the
    /// OS CSPRNG. Predictability of this value is a security property.
    fn generate_code(&self) -> String {
        let mut rng = OsRng;
        let mut bytes = [0u8; 8];
        rng.fill_bytes(&mut bytes);
        let modulus = 10u64.pow(self.config.code_length as u32);
        // Modulo bias over a u64 is negligible at this width.
        let value = u64::from_le_bytes(bytes) % modulus;
        format!("{value:0width$}", width = self.config.code_length)
    }
}

/// Remaining wait reported to the caller, rounded up to whole minutes
/// and never below 1 while the cooldown is active.
fn remaining_whole_minutes(retry_at: DateTime<Utc>, now: DateTime<Utc>) -> i64 {
    let seconds = (retry_at - now).num_seconds().max(0);
    ((seconds + 59) / 60).max(1)
}
