//! Access gate middleware protecting dashboard operations.
//!
//! Every request outside the exemption set must carry a claimed phone
//! number and verification code in two distinct headers. The gate
//! normalizes the phone, performs a read-only lookup for a verified,
//! unexpired record with exactly that code, and either denies the
//! request or forwards the canonical phone number downstream in the
//! request extensions so handlers can trust it without re-deriving it.
//!
//! The gate never issues or mutates verification state.

use actix_web::{
    body::EitherBody,
    dev::{Service, ServiceRequest, ServiceResponse, Transform},
    Error, FromRequest, HttpMessage, HttpRequest, ResponseError,
};
use chrono::Utc;
use futures_util::future::LocalBoxFuture;
use std::{
    future::{ready, Ready},
    rc::Rc,
    sync::Arc,
    task::{Context, Poll},
};

use td_core::errors::VerificationError;
use td_core::phone::{mask_phone, normalize_phone};
use td_core::repositories::VerificationStore;

use crate::error::ApiError;

/// Header carrying the claimed phone number.
pub const PHONE_HEADER: &str = "X-Phone-Number";
/// Header carrying the claimed verification code.
pub const CODE_HEADER: &str = "X-Verification-Code";

/// Canonical phone number of a request that passed the gate, injected
/// into request extensions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerifiedPhone(pub String);

/// Access gate middleware factory.
pub struct AccessGate {
    store: Arc<dyn VerificationStore>,
    default_country_code: String,
    exempt_prefixes: Vec<String>,
}

impl AccessGate {
    /// Creates a gate backed by the shared verification record store.
    ///
    /// # Arguments
    ///
    /// * `store` - The store the verification service writes to; the
    ///   gate only ever reads from it
    /// * `default_country_code` - Must match the issuance configuration,
    ///   or normalization drift would break lookups
    pub fn new(store: Arc<dyn VerificationStore>, default_country_code: impl Into<String>) -> Self {
        Self {
            store,
            default_country_code: default_country_code.into(),
            exempt_prefixes: Vec::new(),
        }
    }

    /// Path prefixes that bypass the gate entirely (issuance, check,
    /// and health endpoints when mounted inside a gated scope).
    pub fn with_exempt_prefixes(mut self, prefixes: Vec<String>) -> Self {
        self.exempt_prefixes = prefixes;
        self
    }
}

impl<S, B> Transform<S, ServiceRequest> for AccessGate
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = AccessGateMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(AccessGateMiddleware {
            service: Rc::new(service),
            store: Arc::clone(&self.store),
            default_country_code: self.default_country_code.clone(),
            exempt_prefixes: self.exempt_prefixes.clone(),
        }))
    }
}

/// Access gate middleware service.
pub struct AccessGateMiddleware<S> {
    service: Rc<S>,
    store: Arc<dyn VerificationStore>,
    default_country_code: String,
    exempt_prefixes: Vec<String>,
}

impl<S, B> Service<ServiceRequest> for AccessGateMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(&self, ctx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.service.poll_ready(ctx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = Rc::clone(&self.service);

        if self
            .exempt_prefixes
            .iter()
            .any(|prefix| req.path().starts_with(prefix.as_str()))
        {
            return Box::pin(async move {
                service.call(req).await.map(|res| res.map_into_left_body())
            });
        }

        let store = Arc::clone(&self.store);
        let default_country_code = self.default_country_code.clone();

        Box::pin(async move {
            let phone = header_value(&req, PHONE_HEADER);
            let code = header_value(&req, CODE_HEADER);
            let (phone, code) = match (phone, code) {
                (Some(phone), Some(code)) => (phone, code),
                _ => {
                    return Ok(deny(req, VerificationError::VerificationRequired));
                }
            };

            let Some(normalized) = normalize_phone(&phone, &default_country_code) else {
                return Ok(deny(req, VerificationError::InvalidPhoneFormat { phone }));
            };

            let allowed = match store.find_verified(&normalized, &code, Utc::now()).await {
                Ok(allowed) => allowed,
                Err(e) => return Ok(deny(req, VerificationError::from(e))),
            };

            if !allowed {
                log::warn!(
                    "access gate denied {} for {}",
                    req.path(),
                    mask_phone(&normalized)
                );
                return Ok(deny(req, VerificationError::InvalidVerification));
            }

            req.extensions_mut().insert(VerifiedPhone(normalized));
            service.call(req).await.map(|res| res.map_into_left_body())
        })
    }
}

/// Short-circuits the request with the error's canonical JSON response.
fn deny<B>(req: ServiceRequest, error: VerificationError) -> ServiceResponse<EitherBody<B>> {
    let response = ApiError::from(error).error_response().map_into_right_body();
    req.into_response(response)
}

/// Extracts a non-empty, trimmed header value.
fn header_value(req: &ServiceRequest, name: &str) -> Option<String> {
    let value = req.headers().get(name)?.to_str().ok()?.trim();
    (!value.is_empty()).then(|| value.to_string())
}

/// Extractor exposing the gate's verdict to handlers.
impl FromRequest for VerifiedPhone {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut actix_web::dev::Payload) -> Self::Future {
        let result = req
            .extensions()
            .get::<VerifiedPhone>()
            .cloned()
            .ok_or_else(|| ApiError::from(VerificationError::VerificationRequired).into());
        ready(result)
    }
}
