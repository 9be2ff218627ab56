//! Trait for the injected code-delivery capability.

use async_trait::async_trait;
use thiserror::Error;

/// Failure of the outbound delivery channel.
///
/// Always transient from the core's point of view: the issued code
/// remains valid for checking even when delivery fails.
#[derive(Error, Debug)]
pub enum DeliveryError {
    #[error("delivery channel failure: {message}")]
    ChannelFailure { message: String },
}

/// Capability to deliver a verification code to a phone number.
///
/// Implementations own their client lifecycle and are constructed at
/// process bootstrap, then injected by reference; the core never
/// reaches for an ambient singleton.
#[async_trait]
pub trait CodeDelivery: Send + Sync {
    /// Sends a verification code to a canonical phone number.
    ///
    /// # Returns
    ///
    /// * `Ok(String)` - Provider message id, for log correlation
    /// * `Err(DeliveryError)` - The channel failed transiently
    async fn send_code(&self, phone_number: &str, code: &str) -> Result<String, DeliveryError>;
}
