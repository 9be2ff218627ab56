//! Handler for POST /api/v1/verification/verify-code

use actix_web::{web, HttpResponse};
use validator::Validate;

use td_core::errors::VerificationError;
use td_core::phone::mask_phone;
use td_core::repositories::VerificationStore;
use td_core::services::verification::CodeDelivery;

use crate::app::AppState;
use crate::dto::{VerifyCodeRequest, VerifyCodeResponse};
use crate::error::ApiError;

/// Checks a submitted code against the active record for a phone
/// number.
///
/// # Request body
///
/// ```json
/// { "phone": "+5215512345678", "code": "482193" }
/// ```
///
/// # Responses
///
/// * `200 OK` - `{ "verified": true, "phone": "<canonical>" }`
/// * `400 Bad Request` - `INVALID_CODE` with remaining attempts, or
///   `INVALID_PHONE_FORMAT`
/// * `404 Not Found` - `NO_ACTIVE_CODE` (expired or never issued)
/// * `429 Too Many Requests` - `MAX_ATTEMPTS_EXCEEDED`
pub async fn verify_code<D, S>(
    state: web::Data<AppState<D, S>>,
    request: web::Json<VerifyCodeRequest>,
) -> Result<HttpResponse, ApiError>
where
    D: CodeDelivery + 'static,
    S: VerificationStore + 'static,
{
    if let Err(errors) = request.validate() {
        if errors.field_errors().contains_key("phone") {
            return Err(ApiError::from(VerificationError::InvalidPhoneFormat {
                phone: request.phone.clone(),
            }));
        }
        return Err(ApiError::from(VerificationError::MalformedCode));
    }

    let phone = state
        .verification
        .verify_code(&request.phone, &request.code)
        .await?;

    log::info!("phone {} verified", mask_phone(&phone));

    Ok(HttpResponse::Ok().json(VerifyCodeResponse {
        verified: true,
        phone,
    }))
}
