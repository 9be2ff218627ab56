//! Integration tests for the verification endpoints and the access
//! gate, wired exactly as in production but with the mock delivery
//! channel.

use std::sync::Arc;

use actix_web::{test, web, App};
use chrono::Utc;
use serde_json::{json, Value};

use td_api::app::{configure, AppState};
use td_api::middleware::{AccessGate, CODE_HEADER, PHONE_HEADER};
use td_core::repositories::VerificationStore;
use td_core::services::verification::{VerificationConfig, VerificationService};
use td_infra::{InMemoryVerificationStore, MockDelivery};

const PHONE: &str = "+5215512345678";

struct Fixture {
    state: web::Data<AppState<MockDelivery, InMemoryVerificationStore>>,
    delivery: Arc<MockDelivery>,
    store: Arc<InMemoryVerificationStore>,
}

impl Fixture {
    fn new() -> Self {
        let delivery = Arc::new(MockDelivery::new());
        let store = Arc::new(InMemoryVerificationStore::new());
        let verification = Arc::new(VerificationService::new(
            Arc::clone(&delivery),
            Arc::clone(&store),
            VerificationConfig::default(),
        ));
        Self {
            state: web::Data::new(AppState::new(verification)),
            delivery,
            store,
        }
    }

    fn gate(&self) -> AccessGate {
        AccessGate::new(
            Arc::clone(&self.store) as Arc<dyn VerificationStore>,
            "52",
        )
    }
}

macro_rules! init_app {
    ($fixture:expr) => {{
        let state = $fixture.state.clone();
        let gate = $fixture.gate();
        test::init_service(
            App::new().configure(move |cfg| configure(cfg, state.clone(), gate)),
        )
        .await
    }};
}

macro_rules! issue_code {
    ($app:expr, $phone:expr) => {{
        let req = test::TestRequest::post()
            .uri("/api/v1/verification/send-code")
            .set_json(json!({ "phone": $phone }))
            .to_request();
        let resp = test::call_service($app, req).await;
        assert!(
            resp.status().is_success(),
            "send-code failed: {:?}",
            resp.status()
        );
    }};
}

#[actix_web::test]
async fn end_to_end_issue_check_and_gate_flow() {
    let fixture = Fixture::new();
    let app = init_app!(fixture);

    // Issue a code; the response must not leak it.
    let req = test::TestRequest::post()
        .uri("/api/v1/verification/send-code")
        .set_json(json!({ "phone": PHONE }))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert!(body.get("expires_at").is_some());
    assert!(body["resend_after_seconds"].as_i64().unwrap() > 0);
    assert!(body.get("code").is_none());

    let code = fixture.delivery.sent_code(PHONE).expect("code delivered");

    // A wrong guess consumes one of three attempts.
    let req = test::TestRequest::post()
        .uri("/api/v1/verification/verify-code")
        .set_json(json!({ "phone": PHONE, "code": "000000" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 400);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "INVALID_CODE");
    assert_eq!(body["remaining_attempts"], 2);

    // The correct code verifies the phone.
    let req = test::TestRequest::post()
        .uri("/api/v1/verification/verify-code")
        .set_json(json!({ "phone": PHONE, "code": code }))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["verified"], true);
    assert_eq!(body["phone"], PHONE);

    // The gated endpoint now accepts the phone+code pair.
    let req = test::TestRequest::get()
        .uri("/api/v1/session")
        .insert_header((PHONE_HEADER, PHONE))
        .insert_header((CODE_HEADER, code.as_str()))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["phone"], PHONE);
}

#[actix_web::test]
async fn gate_accepts_equivalent_phone_shapes() {
    let fixture = Fixture::new();
    let app = init_app!(fixture);

    issue_code!(&app, PHONE);
    let code = fixture.delivery.sent_code(PHONE).unwrap();
    let req = test::TestRequest::post()
        .uri("/api/v1/verification/verify-code")
        .set_json(json!({ "phone": PHONE, "code": code }))
        .to_request();
    test::call_service(&app, req).await;

    // The claim may arrive in any accepted raw shape; the gate
    // normalizes before the lookup.
    let req = test::TestRequest::get()
        .uri("/api/v1/session")
        .insert_header((PHONE_HEADER, "whatsapp:+5215512345678"))
        .insert_header((CODE_HEADER, code.as_str()))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["phone"], PHONE);
}

#[actix_web::test]
async fn gate_requires_both_credentials() {
    let fixture = Fixture::new();
    let app = init_app!(fixture);

    for request in [
        test::TestRequest::get().uri("/api/v1/session"),
        test::TestRequest::get()
            .uri("/api/v1/session")
            .insert_header((PHONE_HEADER, PHONE)),
        test::TestRequest::get()
            .uri("/api/v1/session")
            .insert_header((CODE_HEADER, "482193")),
    ] {
        let resp = test::call_service(&app, request.to_request()).await;
        assert_eq!(resp.status(), 401);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["error"], "VERIFICATION_REQUIRED");
    }
}

#[actix_web::test]
async fn gate_rejects_malformed_phone() {
    let fixture = Fixture::new();
    let app = init_app!(fixture);

    let req = test::TestRequest::get()
        .uri("/api/v1/session")
        .insert_header((PHONE_HEADER, "not-a-phone"))
        .insert_header((CODE_HEADER, "482193"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 400);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "INVALID_PHONE_FORMAT");
}

#[actix_web::test]
async fn gate_denies_unverified_or_mismatched_claims() {
    let fixture = Fixture::new();
    let app = init_app!(fixture);

    issue_code!(&app, PHONE);
    let code = fixture.delivery.sent_code(PHONE).unwrap();

    // Issued but not yet verified: the gate must deny.
    let req = test::TestRequest::get()
        .uri("/api/v1/session")
        .insert_header((PHONE_HEADER, PHONE))
        .insert_header((CODE_HEADER, code.as_str()))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 403);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "INVALID_VERIFICATION");

    // Verified, but the claimed code is wrong.
    let req = test::TestRequest::post()
        .uri("/api/v1/verification/verify-code")
        .set_json(json!({ "phone": PHONE, "code": code }))
        .to_request();
    test::call_service(&app, req).await;

    let req = test::TestRequest::get()
        .uri("/api/v1/session")
        .insert_header((PHONE_HEADER, PHONE))
        .insert_header((CODE_HEADER, "999999"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 403);
}

#[actix_web::test]
async fn gate_checks_are_read_only_and_reusable() {
    let fixture = Fixture::new();
    let app = init_app!(fixture);

    issue_code!(&app, PHONE);
    let code = fixture.delivery.sent_code(PHONE).unwrap();
    let req = test::TestRequest::post()
        .uri("/api/v1/verification/verify-code")
        .set_json(json!({ "phone": PHONE, "code": code }))
        .to_request();
    test::call_service(&app, req).await;

    let before = fixture
        .store
        .find_active(PHONE, Utc::now())
        .await
        .unwrap()
        .unwrap();

    // One verified code authorizes many gated requests within its
    // validity window.
    for _ in 0..100 {
        let req = test::TestRequest::get()
            .uri("/api/v1/session")
            .insert_header((PHONE_HEADER, PHONE))
            .insert_header((CODE_HEADER, code.as_str()))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert!(resp.status().is_success());
    }

    let after = fixture
        .store
        .find_active(PHONE, Utc::now())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(before.attempts, after.attempts);
    assert_eq!(before.expires_at, after.expires_at);
}

#[actix_web::test]
async fn second_issuance_inside_cooldown_returns_429() {
    let fixture = Fixture::new();
    let app = init_app!(fixture);

    issue_code!(&app, PHONE);

    let req = test::TestRequest::post()
        .uri("/api/v1/verification/send-code")
        .set_json(json!({ "phone": PHONE }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 429);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "COOLDOWN_ACTIVE");
    assert!(body["retry_after_minutes"].as_i64().unwrap() > 0);
}

#[actix_web::test]
async fn send_code_rejects_malformed_phone() {
    let fixture = Fixture::new();
    let app = init_app!(fixture);

    let req = test::TestRequest::post()
        .uri("/api/v1/verification/send-code")
        .set_json(json!({ "phone": "12345" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 400);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "INVALID_PHONE_FORMAT");
}

#[actix_web::test]
async fn verify_code_without_issuance_returns_404() {
    let fixture = Fixture::new();
    let app = init_app!(fixture);

    let req = test::TestRequest::post()
        .uri("/api/v1/verification/verify-code")
        .set_json(json!({ "phone": PHONE, "code": "482193" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 404);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "NO_ACTIVE_CODE");
}

#[actix_web::test]
async fn health_endpoint_is_exempt_from_the_gate() {
    let fixture = Fixture::new();
    let app = init_app!(fixture);

    let req = test::TestRequest::get().uri("/health").to_request();
    let resp = test::call_service(&app, req).await;
    assert!(resp.status().is_success());
}
