//! Console delivery channel for development environments.

use async_trait::async_trait;
use uuid::Uuid;

use td_core::phone::mask_phone;
use td_core::services::verification::{CodeDelivery, DeliveryError};

/// Logs issued codes instead of sending them. Development only; the
/// code is written to the process log in the clear.
#[derive(Default)]
pub struct ConsoleDelivery;

impl ConsoleDelivery {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl CodeDelivery for ConsoleDelivery {
    async fn send_code(&self, phone_number: &str, code: &str) -> Result<String, DeliveryError> {
        let message_id = format!("console-{}", Uuid::new_v4());
        tracing::info!(
            phone = %mask_phone(phone_number),
            code = %code,
            message_id = %message_id,
            event = "console_delivery",
            "Verification code (console delivery)"
        );
        Ok(message_id)
    }
}
