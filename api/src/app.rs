//! Application wiring: shared state and route configuration.

use std::sync::Arc;

use actix_web::web;

use td_core::repositories::VerificationStore;
use td_core::services::verification::{CodeDelivery, VerificationService};

use crate::middleware::AccessGate;
use crate::routes;

/// Shared services handed to every worker.
pub struct AppState<D, S>
where
    D: CodeDelivery,
    S: VerificationStore,
{
    pub verification: Arc<VerificationService<D, S>>,
}

impl<D, S> AppState<D, S>
where
    D: CodeDelivery,
    S: VerificationStore,
{
    pub fn new(verification: Arc<VerificationService<D, S>>) -> Self {
        Self { verification }
    }
}

// web::Data requires the state itself to be cheap to share; the inner
// service is already reference-counted.
impl<D, S> Clone for AppState<D, S>
where
    D: CodeDelivery,
    S: VerificationStore,
{
    fn clone(&self) -> Self {
        Self {
            verification: Arc::clone(&self.verification),
        }
    }
}

/// Mounts the full route tree onto a service config.
///
/// The verification endpoints and the health check sit outside the
/// gated scope — they are the exemption set. Everything else under
/// `/api/v1` passes through the access gate; the host dashboard mounts
/// its message and conversation routes inside the same gated scope.
pub fn configure<D, S>(
    cfg: &mut web::ServiceConfig,
    state: web::Data<AppState<D, S>>,
    gate: AccessGate,
) where
    D: CodeDelivery + 'static,
    S: VerificationStore + 'static,
{
    cfg.app_data(state)
        .route("/health", web::get().to(routes::health::health))
        .service(
            web::scope("/api/v1")
                .service(
                    web::scope("/verification")
                        .route(
                            "/send-code",
                            web::post().to(routes::verification::send_code::<D, S>),
                        )
                        .route(
                            "/verify-code",
                            web::post().to(routes::verification::verify_code::<D, S>),
                        ),
                )
                .service(
                    web::scope("")
                        .wrap(gate)
                        .route("/session", web::get().to(routes::session::session)),
                ),
        );
}
