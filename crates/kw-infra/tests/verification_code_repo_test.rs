mod common;

use chrono::{Duration, Utc};

use kw_core::access::verification::MAX_VERIFICATION_ATTEMPTS;
use kw_core::access::{Channel, VerificationCode};
use kw_core::ports::VerificationCodeRepositoryPort;
use kw_core::{RequestId, VerificationCodeId};
use kw_infra::db::mappers::VerificationCodeRowMapper;
use kw_infra::db::repositories::DieselVerificationCodeRepository;

use common::{test_db, TestDbExecutor};

fn repo(
    executor: TestDbExecutor,
) -> DieselVerificationCodeRepository<TestDbExecutor, VerificationCodeRowMapper> {
    DieselVerificationCodeRepository::new(executor, VerificationCodeRowMapper)
}

fn verification(id: &str, request: &str) -> VerificationCode {
    let now = Utc::now();
    VerificationCode {
        id: VerificationCodeId::from(id),
        request_id: RequestId::from(request),
        code: "042137".to_string(),
        channel: Channel::Email,
        phone_number: None,
        email_address: Some("a@b.com".to_string()),
        expires_at: now + Duration::minutes(10),
        attempts: 0,
        max_attempts: MAX_VERIFICATION_ATTEMPTS,
        verified_at: None,
        created_at: now,
    }
}

#[tokio::test]
async fn find_unverified_returns_latest_open_code() {
    let db = test_db();
    let repo = repo(db.executor.clone());

    repo.insert(&verification("vc-1", "req-1")).await.expect("insert");

    let found = repo
        .find_unverified_by_request(&RequestId::from("req-1"))
        .await
        .expect("query")
        .expect("present");
    assert_eq!(found.id.as_str(), "vc-1");
    assert_eq!(found.attempts, 0);
}

#[tokio::test]
async fn increment_attempts_returns_post_increment_value() {
    let db = test_db();
    let repo = repo(db.executor.clone());

    let stored = verification("vc-1", "req-1");
    repo.insert(&stored).await.expect("insert");

    assert_eq!(repo.increment_attempts(&stored.id).await.expect("inc"), 1);
    assert_eq!(repo.increment_attempts(&stored.id).await.expect("inc"), 2);
    assert_eq!(repo.increment_attempts(&stored.id).await.expect("inc"), 3);
}

#[tokio::test]
async fn mark_verified_claims_the_row_exactly_once() {
    let db = test_db();
    let repo = repo(db.executor.clone());

    let stored = verification("vc-1", "req-1");
    repo.insert(&stored).await.expect("insert");

    let now = Utc::now();
    assert!(repo.mark_verified(&stored.id, now).await.expect("first"));
    assert!(!repo.mark_verified(&stored.id, now).await.expect("second"));

    // Once verified, the code no longer matches the open-code lookup.
    let open = repo
        .find_unverified_by_request(&RequestId::from("req-1"))
        .await
        .expect("query");
    assert!(open.is_none());
}
