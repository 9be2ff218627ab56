//! Mock delivery channel for tests.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use uuid::Uuid;

use td_core::services::verification::{CodeDelivery, DeliveryError};

/// Captures sent codes in memory so tests can read them back, with an
/// optional injected transient failure.
pub struct MockDelivery {
    sent_codes: Arc<Mutex<HashMap<String, String>>>,
    should_fail: bool,
}

impl MockDelivery {
    pub fn new() -> Self {
        Self {
            sent_codes: Arc::new(Mutex::new(HashMap::new())),
            should_fail: false,
        }
    }

    /// A channel whose every send fails transiently.
    pub fn failing() -> Self {
        Self {
            sent_codes: Arc::new(Mutex::new(HashMap::new())),
            should_fail: true,
        }
    }

    /// The last code sent to a phone number, if any.
    pub fn sent_code(&self, phone_number: &str) -> Option<String> {
        self.sent_codes.lock().unwrap().get(phone_number).cloned()
    }
}

impl Default for MockDelivery {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CodeDelivery for MockDelivery {
    async fn send_code(&self, phone_number: &str, code: &str) -> Result<String, DeliveryError> {
        if self.should_fail {
            return Err(DeliveryError::ChannelFailure {
                message: "mock channel configured to fail".to_string(),
            });
        }
        self.sent_codes
            .lock()
            .unwrap()
            .insert(phone_number.to_string(), code.to_string());
        Ok(format!("mock-{}", Uuid::new_v4()))
    }
}
