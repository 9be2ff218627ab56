//! Handler for POST /api/v1/verification/send-code

use actix_web::{web, HttpResponse};
use chrono::Utc;
use validator::Validate;

use td_core::errors::VerificationError;
use td_core::phone::mask_phone;
use td_core::repositories::VerificationStore;
use td_core::services::verification::CodeDelivery;

use crate::app::AppState;
use crate::dto::{SendCodeRequest, SendCodeResponse};
use crate::error::ApiError;

/// Issues a verification code for the requested phone number.
///
/// # Request body
///
/// ```json
/// { "phone": "+5215512345678" }
/// ```
///
/// # Responses
///
/// * `200 OK` - Code issued; body carries expiry and resend timing,
///   plus a warning when the delivery channel failed
/// * `400 Bad Request` - `INVALID_PHONE_FORMAT`
/// * `429 Too Many Requests` - `COOLDOWN_ACTIVE` with remaining minutes
pub async fn send_code<D, S>(
    state: web::Data<AppState<D, S>>,
    request: web::Json<SendCodeRequest>,
) -> Result<HttpResponse, ApiError>
where
    D: CodeDelivery + 'static,
    S: VerificationStore + 'static,
{
    if request.validate().is_err() {
        return Err(ApiError::from(VerificationError::InvalidPhoneFormat {
            phone: request.phone.clone(),
        }));
    }

    let issued = state.verification.create_verification(&request.phone).await?;

    log::info!(
        "verification code issued for {}",
        mask_phone(&issued.phone_number)
    );

    Ok(HttpResponse::Ok().json(SendCodeResponse {
        message: "Verification code sent".to_string(),
        expires_at: issued.expires_at,
        resend_after_seconds: (issued.next_resend_at - Utc::now()).num_seconds().max(0),
        delivery_warning: issued.delivery_error,
    }))
}
