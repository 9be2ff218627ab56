//! Gated session introspection endpoint.
//!
//! The smallest real consumer of the access gate: echoes the canonical
//! phone number the gate authenticated, proving the claim reached the
//! handler as a trusted request attribute.

use actix_web::HttpResponse;

use crate::dto::SessionResponse;
use crate::middleware::VerifiedPhone;

/// Handler for GET /api/v1/session
pub async fn session(phone: VerifiedPhone) -> HttpResponse {
    HttpResponse::Ok().json(SessionResponse { phone: phone.0 })
}
