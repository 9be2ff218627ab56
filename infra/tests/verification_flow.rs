//! Integration test: verification service wired to the real in-memory
//! store and the mock delivery channel.

use std::sync::Arc;

use chrono::Utc;

use td_core::errors::VerificationError;
use td_core::repositories::VerificationStore;
use td_core::services::verification::{VerificationConfig, VerificationService};
use td_infra::{InMemoryVerificationStore, MockDelivery};

const PHONE: &str = "+5215512345678";

fn build_service() -> (
    VerificationService<MockDelivery, InMemoryVerificationStore>,
    Arc<MockDelivery>,
    Arc<InMemoryVerificationStore>,
) {
    let delivery = Arc::new(MockDelivery::new());
    let store = Arc::new(InMemoryVerificationStore::new());
    let service = VerificationService::new(
        Arc::clone(&delivery),
        Arc::clone(&store),
        VerificationConfig::default(),
    );
    (service, delivery, store)
}

#[tokio::test]
async fn full_issue_check_verify_flow() {
    let (service, delivery, store) = build_service();

    // Issue a code and capture it from the delivery channel.
    let issued = service.create_verification(PHONE).await.unwrap();
    let code = delivery.sent_code(PHONE).expect("code should be delivered");
    assert_eq!(code, issued.code);

    // A wrong guess consumes one of three attempts.
    let err = service.verify_code(PHONE, "000000").await.unwrap_err();
    match err {
        VerificationError::InvalidCode { remaining_attempts } => {
            assert_eq!(remaining_attempts, 2)
        }
        other => panic!("expected InvalidCode, got {other:?}"),
    }
    let record = store.find_active(PHONE, Utc::now()).await.unwrap().unwrap();
    assert_eq!(record.attempts, 1);

    // The correct code verifies the record.
    service.verify_code(PHONE, &code).await.unwrap();
    let record = store.find_active(PHONE, Utc::now()).await.unwrap().unwrap();
    assert!(record.verified);

    // The verified phone+code pair now passes the read-only gate lookup,
    // repeatedly, without mutating the record.
    for _ in 0..100 {
        assert!(store
            .find_verified(PHONE, &code, Utc::now())
            .await
            .unwrap());
    }
    let after = store.find_active(PHONE, Utc::now()).await.unwrap().unwrap();
    assert_eq!(after.attempts, record.attempts);
    assert_eq!(after.expires_at, record.expires_at);
}

#[tokio::test]
async fn second_issuance_hits_the_cooldown() {
    let (service, _, _) = build_service();

    service.create_verification(PHONE).await.unwrap();
    let err = service.create_verification(PHONE).await.unwrap_err();

    match err {
        VerificationError::CooldownActive { remaining_minutes } => {
            assert!(remaining_minutes > 0)
        }
        other => panic!("expected CooldownActive, got {other:?}"),
    }
}

#[tokio::test]
async fn failed_delivery_still_issues_a_checkable_code() {
    let delivery = Arc::new(MockDelivery::failing());
    let store = Arc::new(InMemoryVerificationStore::new());
    let service = VerificationService::new(
        Arc::clone(&delivery),
        Arc::clone(&store),
        VerificationConfig::default(),
    );

    let issued = service.create_verification(PHONE).await.unwrap();
    assert!(issued.delivery_error.is_some());
    assert!(delivery.sent_code(PHONE).is_none());

    service.verify_code(PHONE, &issued.code).await.unwrap();
}
