//! End-to-end lifecycle tests: the use cases wired to real diesel/SQLite
//! repositories, a manual clock and recording senders.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use diesel::prelude::*;
use tempfile::TempDir;

use kw_app::usecases::{
    CheckDomain, CreateAccessRequest, CreateAccessRequestInput, DecideAccessRequest,
    DecisionAction, DecisionOutcome, EnsureActiveCode, PendingRequestsForOwner,
    VerifyAccessRequest,
};
use kw_app::{AccessFlowError, AccessLogger, NotificationDispatcher};
use kw_core::access::{AccessMethod, RequestStatus};
use kw_core::ports::{
    AccessCodeRepositoryPort, AccessLogPort, AccessRequestRepositoryPort, ClockPort,
    EmailSenderPort, SendError, SmsSenderPort, VerificationCodeRepositoryPort,
};
use kw_core::{PropertyId, RequestId, UserId};
use kw_infra::db::mappers::{
    AccessCodeRowMapper, AccessLogRowMapper, AccessRequestRowMapper, DomainRuleRowMapper,
    PropertyRowMapper, VerificationCodeRowMapper,
};
use kw_infra::db::models::property_row::{EmergencyContactRow, OwnerProfileRow, PropertyRow};
use kw_infra::db::pool::{init_db_pool, DbPool};
use kw_infra::db::ports::DbExecutor;
use kw_infra::db::repositories::{
    DieselAccessCodeRepository, DieselAccessLogRepository, DieselAccessRequestRepository,
    DieselDomainRuleRepository, DieselPropertyRepository, DieselVerificationCodeRepository,
};

#[derive(Clone)]
struct TestDbExecutor {
    pool: Arc<DbPool>,
}

impl DbExecutor for TestDbExecutor {
    fn run<T>(
        &self,
        f: impl FnOnce(&mut diesel::SqliteConnection) -> anyhow::Result<T>,
    ) -> anyhow::Result<T> {
        let mut conn = self.pool.get()?;
        f(&mut conn)
    }
}

struct ManualClock {
    now: Mutex<DateTime<Utc>>,
}

impl ManualClock {
    fn new() -> Self {
        Self {
            now: Mutex::new(Utc::now()),
        }
    }

    fn advance(&self, by: Duration) {
        *self.now.lock().unwrap() += by;
    }
}

impl ClockPort for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.lock().unwrap()
    }
}

#[derive(Default)]
struct RecordingEmailSender {
    sent: Mutex<Vec<(String, String, String)>>,
}

impl RecordingEmailSender {
    fn sent_to(&self, to: &str) -> Vec<(String, String)> {
        self.sent
            .lock()
            .unwrap()
            .iter()
            .filter(|(recipient, _, _)| recipient == to)
            .map(|(_, subject, body)| (subject.clone(), body.clone()))
            .collect()
    }
}

#[async_trait]
impl EmailSenderPort for RecordingEmailSender {
    async fn send(&self, to: &str, subject: &str, html: &str) -> Result<(), SendError> {
        self.sent
            .lock()
            .unwrap()
            .push((to.to_string(), subject.to_string(), html.to_string()));
        Ok(())
    }
}

struct NoSms;

#[async_trait]
impl SmsSenderPort for NoSms {
    async fn send(&self, _to: &str, _body: &str) -> Result<(), SendError> {
        Err(SendError::NotConfigured)
    }
}

struct Harness {
    _dir: TempDir,
    clock: Arc<ManualClock>,
    email: Arc<RecordingEmailSender>,
    create: CreateAccessRequest,
    verify: VerifyAccessRequest,
    decide: Arc<DecideAccessRequest>,
    pending: PendingRequestsForOwner,
    requests: Arc<dyn AccessRequestRepositoryPort>,
    verifications: Arc<dyn VerificationCodeRepositoryPort>,
    codes: Arc<dyn AccessCodeRepositoryPort>,
    log: Arc<dyn AccessLogPort>,
    executor: TestDbExecutor,
}

const OWNER: &str = "owner-1";
const PROPERTY: &str = "prop-1";

impl Harness {
    fn new() -> Self {
        let dir = TempDir::new().expect("temp dir");
        let db_path = dir.path().join("flow-test.db");
        let pool = init_db_pool(db_path.to_str().expect("utf-8 path")).expect("init db");
        let executor = TestDbExecutor {
            pool: Arc::new(pool),
        };

        let clock = Arc::new(ManualClock::new());
        let email = Arc::new(RecordingEmailSender::default());

        let properties = Arc::new(DieselPropertyRepository::new(
            executor.clone(),
            PropertyRowMapper,
        ));
        let requests: Arc<dyn AccessRequestRepositoryPort> = Arc::new(
            DieselAccessRequestRepository::new(executor.clone(), AccessRequestRowMapper),
        );
        let codes: Arc<dyn AccessCodeRepositoryPort> = Arc::new(
            DieselAccessCodeRepository::new(executor.clone(), AccessCodeRowMapper),
        );
        let verifications: Arc<dyn VerificationCodeRepositoryPort> = Arc::new(
            DieselVerificationCodeRepository::new(executor.clone(), VerificationCodeRowMapper),
        );
        let rules = Arc::new(DieselDomainRuleRepository::new(
            executor.clone(),
            DomainRuleRowMapper,
        ));
        let log: Arc<dyn AccessLogPort> = Arc::new(DieselAccessLogRepository::new(
            executor.clone(),
            AccessLogRowMapper,
        ));

        let clock_port: Arc<dyn ClockPort> = clock.clone();
        let dispatcher = Arc::new(NotificationDispatcher::new(
            email.clone(),
            Arc::new(NoSms),
            "https://keyward.test".to_string(),
        ));
        let logger = AccessLogger::new(log.clone(), clock_port.clone());
        let ensure_code = Arc::new(EnsureActiveCode::new(codes.clone(), clock_port.clone()));
        let check_domain = Arc::new(CheckDomain::new(rules, clock_port.clone()));

        let create = CreateAccessRequest::new(
            properties.clone(),
            requests.clone(),
            verifications.clone(),
            ensure_code,
            check_domain,
            dispatcher.clone(),
            logger.clone(),
            clock_port.clone(),
        );
        let verify = VerifyAccessRequest::new(
            requests.clone(),
            verifications.clone(),
            logger.clone(),
            clock_port.clone(),
        );
        let decide = Arc::new(DecideAccessRequest::new(
            requests.clone(),
            properties.clone(),
            codes.clone(),
            dispatcher,
            logger,
            clock_port.clone(),
        ));
        let pending = PendingRequestsForOwner::new(requests.clone(), properties, clock_port);

        Self {
            _dir: dir,
            clock,
            email,
            create,
            verify,
            decide,
            pending,
            requests,
            verifications,
            codes,
            log,
            executor,
        }
    }

    fn seed_property(&self, emergency_access_enabled: bool) {
        use kw_infra::db::schema::{t_emergency_contact, t_owner_profile, t_property};

        let property = PropertyRow {
            id: PROPERTY.to_string(),
            owner_user_id: OWNER.to_string(),
            name: "Harbour Cottage".to_string(),
            address: "12 Quay Lane".to_string(),
            city: Some("Falmouth".to_string()),
            region: None,
            postal_code: Some("TR11 3XX".to_string()),
            latitude: Some(50.1530),
            longitude: Some(-5.0710),
            emergency_access_enabled,
            keysafe_location: Some("Left of the porch".to_string()),
            keysafe_code: Some("2580".to_string()),
            keysafe_notes: None,
            keysafe_what3words: None,
            keysafe_latitude: None,
            keysafe_longitude: None,
            created_at: Utc::now().timestamp_millis(),
        };
        let owner = OwnerProfileRow {
            user_id: OWNER.to_string(),
            email: Some("owner@example.com".to_string()),
            phone: None,
        };
        let contact = EmergencyContactRow {
            id: "contact-1".to_string(),
            user_id: OWNER.to_string(),
            email: Some("contact@example.com".to_string()),
            phone: None,
            is_primary: true,
        };
        self.executor
            .run(move |conn| {
                diesel::insert_into(t_property::table)
                    .values(&property)
                    .execute(conn)?;
                diesel::insert_into(t_owner_profile::table)
                    .values(&owner)
                    .execute(conn)?;
                diesel::insert_into(t_emergency_contact::table)
                    .values(&contact)
                    .execute(conn)?;
                Ok(())
            })
            .expect("seed property");
    }

    async fn create_request(&self, email: &str) -> kw_app::usecases::CreatedAccessRequest {
        self.create
            .execute(CreateAccessRequestInput {
                property_id: PropertyId::from(PROPERTY),
                requester_email: Some(email.to_string()),
                requester_phone: None,
                requester_name: Some("Sam Carter".to_string()),
                location_data: None,
                meta: Default::default(),
            })
            .await
            .expect("create request")
    }

    async fn stored_verification_code(&self, request_id: &RequestId) -> String {
        self.verifications
            .find_unverified_by_request(request_id)
            .await
            .expect("lookup verification code")
            .expect("verification code present")
            .code
    }

    async fn log_methods(&self) -> Vec<AccessMethod> {
        self.log
            .recent_for_property(&PropertyId::from(PROPERTY), 100)
            .await
            .expect("read log")
            .iter()
            .map(|entry| entry.access_method)
            .collect()
    }

    async fn request_status(&self, request_id: &RequestId) -> RequestStatus {
        self.requests
            .find_by_id(request_id)
            .await
            .expect("find request")
            .expect("request present")
            .status
    }
}

#[tokio::test]
async fn full_scenario_create_verify_approve() {
    let harness = Harness::new();
    harness.seed_property(true);

    // Create auto-provisions a usable code for a bare property.
    let created = harness.create_request("sam@example.com").await;
    assert_eq!(created.property_name, "Harbour Cottage");
    assert_eq!(created.verification_token.len(), 64);
    let code = harness
        .codes
        .latest_usable(&PropertyId::from(PROPERTY), harness.clock.now())
        .await
        .expect("query")
        .expect("auto-provisioned code");
    assert!(code.max_uses.is_none());
    assert_eq!(code.use_count, 0);
    let request = harness
        .requests
        .find_by_id(&created.request_id)
        .await
        .expect("find")
        .expect("present");
    assert_eq!(request.access_code_entered, code.code);
    assert_eq!(request.status, RequestStatus::Pending);

    // Requester got the verification code by email, owner and contact got
    // approve/deny links.
    let verification_code = harness.stored_verification_code(&created.request_id).await;
    let requester_mail = harness.email.sent_to("sam@example.com");
    assert_eq!(requester_mail.len(), 1);
    assert!(requester_mail[0].1.contains(&verification_code));
    for recipient in ["owner@example.com", "contact@example.com"] {
        let mail = harness.email.sent_to(recipient);
        assert_eq!(mail.len(), 1);
        assert!(mail[0].1.contains("action=approve"));
        assert!(mail[0].1.contains("action=deny"));
    }

    // Wrong code first: retryable InvalidCode with attempts counted.
    let wrong = if verification_code == "000000" { "111111" } else { "000000" };
    let err = harness
        .verify
        .execute(&created.verification_token, wrong)
        .await
        .expect_err("wrong code");
    assert!(matches!(
        err,
        AccessFlowError::InvalidCode {
            attempts_left: Some(2)
        }
    ));
    assert_eq!(
        harness.request_status(&created.request_id).await,
        RequestStatus::Pending
    );

    // Right code: verified.
    let verified = harness
        .verify
        .execute(&created.verification_token, &verification_code)
        .await
        .expect("verify");
    assert_eq!(verified.status, RequestStatus::Verified);

    // Owner approves via the link token.
    let outcome = harness
        .decide
        .by_token(
            &created.request_id,
            &created.verification_token,
            DecisionAction::Approve,
        )
        .await
        .expect("approve");
    assert_eq!(
        outcome,
        DecisionOutcome::Decided {
            status: RequestStatus::Approved
        }
    );

    // use_count incremented exactly once.
    let code_after = harness
        .codes
        .find_by_value(&PropertyId::from(PROPERTY), &code.code)
        .await
        .expect("query")
        .expect("present");
    assert_eq!(code_after.use_count, 1);

    // Disclosure email carries the keysafe, only after approval.
    let requester_mail = harness.email.sent_to("sam@example.com");
    assert_eq!(requester_mail.len(), 2);
    assert!(requester_mail[1].1.contains("2580"));
    assert!(requester_mail[1].1.contains("Left of the porch"));

    // Audit trail: creation, verification, disclosure and the decision.
    let methods = harness.log_methods().await;
    assert_eq!(
        methods
            .iter()
            .filter(|m| **m == AccessMethod::RequestCreated)
            .count(),
        1
    );
    assert_eq!(
        methods
            .iter()
            .filter(|m| **m == AccessMethod::RequestVerified)
            .count(),
        1
    );
    assert_eq!(
        methods
            .iter()
            .filter(|m| **m == AccessMethod::QrScanVerified)
            .count(),
        1
    );
    assert_eq!(
        methods
            .iter()
            .filter(|m| **m == AccessMethod::RequestApproved)
            .count(),
        1
    );
}

#[tokio::test]
async fn second_click_is_already_processed() {
    let harness = Harness::new();
    harness.seed_property(true);
    let created = harness.create_request("sam@example.com").await;

    let first = harness
        .decide
        .by_token(
            &created.request_id,
            &created.verification_token,
            DecisionAction::Approve,
        )
        .await
        .expect("first click");
    assert_eq!(
        first,
        DecisionOutcome::Decided {
            status: RequestStatus::Approved
        }
    );

    let second = harness
        .decide
        .by_token(
            &created.request_id,
            &created.verification_token,
            DecisionAction::Approve,
        )
        .await
        .expect("second click");
    assert_eq!(
        second,
        DecisionOutcome::AlreadyProcessed {
            status: RequestStatus::Approved
        }
    );

    let methods = harness.log_methods().await;
    assert_eq!(
        methods
            .iter()
            .filter(|m| **m == AccessMethod::RequestApproved)
            .count(),
        1,
        "second click must not append a second decision entry"
    );
    let code = harness
        .codes
        .latest_usable(&PropertyId::from(PROPERTY), harness.clock.now())
        .await
        .expect("query")
        .expect("present");
    assert_eq!(code.use_count, 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_decisions_have_one_winner() {
    let harness = Harness::new();
    harness.seed_property(true);
    let created = harness.create_request("sam@example.com").await;

    let approve = {
        let decide = harness.decide.clone();
        let request_id = created.request_id.clone();
        let token = created.verification_token.clone();
        tokio::spawn(async move {
            decide
                .by_token(&request_id, &token, DecisionAction::Approve)
                .await
        })
    };
    let deny = {
        let decide = harness.decide.clone();
        let request_id = created.request_id.clone();
        let token = created.verification_token.clone();
        tokio::spawn(async move {
            decide
                .by_token(&request_id, &token, DecisionAction::Deny)
                .await
        })
    };

    let outcomes = [
        approve.await.expect("join").expect("approve call"),
        deny.await.expect("join").expect("deny call"),
    ];
    let decided: Vec<&DecisionOutcome> = outcomes
        .iter()
        .filter(|o| matches!(o, DecisionOutcome::Decided { .. }))
        .collect();
    assert_eq!(decided.len(), 1, "exactly one winner, got {outcomes:?}");

    let final_status = harness.request_status(&created.request_id).await;
    assert!(matches!(
        final_status,
        RequestStatus::Approved | RequestStatus::Denied
    ));
    let DecisionOutcome::Decided { status } = decided[0] else {
        unreachable!()
    };
    assert_eq!(*status, final_status);

    let methods = harness.log_methods().await;
    let decisions = methods
        .iter()
        .filter(|m| matches!(m, AccessMethod::RequestApproved | AccessMethod::RequestDenied))
        .count();
    assert_eq!(decisions, 1);
}

#[tokio::test]
async fn verification_attempts_hit_a_ceiling() {
    let harness = Harness::new();
    harness.seed_property(true);
    let created = harness.create_request("sam@example.com").await;
    let right = harness.stored_verification_code(&created.request_id).await;
    let wrong = if right == "000000" { "111111" } else { "000000" };

    let first = harness
        .verify
        .execute(&created.verification_token, wrong)
        .await
        .expect_err("attempt 1");
    assert!(matches!(
        first,
        AccessFlowError::InvalidCode {
            attempts_left: Some(2)
        }
    ));
    let second = harness
        .verify
        .execute(&created.verification_token, wrong)
        .await
        .expect_err("attempt 2");
    assert!(matches!(
        second,
        AccessFlowError::InvalidCode {
            attempts_left: Some(1)
        }
    ));
    let third = harness
        .verify
        .execute(&created.verification_token, wrong)
        .await
        .expect_err("attempt 3");
    assert!(matches!(third, AccessFlowError::TooManyAttempts));
    assert_eq!(
        harness.request_status(&created.request_id).await,
        RequestStatus::Denied
    );

    // Fourth attempt, even with the right code: the request is gone from
    // the pending lookup, not a retryable mismatch.
    let fourth = harness
        .verify
        .execute(&created.verification_token, &right)
        .await
        .expect_err("attempt 4");
    assert!(matches!(fourth, AccessFlowError::NotFound(_)));
}

#[tokio::test]
async fn expired_request_fails_verification_and_stays_expired() {
    let harness = Harness::new();
    harness.seed_property(true);
    let created = harness.create_request("sam@example.com").await;
    let code = harness.stored_verification_code(&created.request_id).await;

    harness.clock.advance(Duration::minutes(15) + Duration::seconds(1));

    let err = harness
        .verify
        .execute(&created.verification_token, &code)
        .await
        .expect_err("expired");
    assert!(matches!(err, AccessFlowError::Gone(_)));
    assert_eq!(
        harness.request_status(&created.request_id).await,
        RequestStatus::Expired
    );
}

#[tokio::test]
async fn duplicate_pending_request_conflicts_until_terminal() {
    let harness = Harness::new();
    harness.seed_property(true);
    harness.create_request("sam@example.com").await;

    let duplicate = harness
        .create
        .execute(CreateAccessRequestInput {
            property_id: PropertyId::from(PROPERTY),
            requester_email: Some("sam@example.com".to_string()),
            requester_phone: None,
            requester_name: None,
            location_data: None,
            meta: Default::default(),
        })
        .await
        .expect_err("duplicate");
    assert!(matches!(duplicate, AccessFlowError::Conflict(_)));

    // Deny the first; the same contact tuple may then request again.
    let pending = harness.pending.execute(&UserId::from(OWNER)).await.expect("pending");
    assert_eq!(pending.len(), 1);
    harness
        .decide
        .by_token(
            &pending[0].id,
            &pending[0].verification_token,
            DecisionAction::Deny,
        )
        .await
        .expect("deny");

    harness.create_request("sam@example.com").await;
}

#[tokio::test]
async fn create_gates_on_property_flags() {
    let harness = Harness::new();
    harness.seed_property(false);

    let forbidden = harness
        .create
        .execute(CreateAccessRequestInput {
            property_id: PropertyId::from(PROPERTY),
            requester_email: Some("sam@example.com".to_string()),
            requester_phone: None,
            requester_name: None,
            location_data: None,
            meta: Default::default(),
        })
        .await
        .expect_err("disabled property");
    assert!(matches!(forbidden, AccessFlowError::Forbidden(_)));

    let missing = harness
        .create
        .execute(CreateAccessRequestInput {
            property_id: PropertyId::from("prop-unknown"),
            requester_email: Some("sam@example.com".to_string()),
            requester_phone: None,
            requester_name: None,
            location_data: None,
            meta: Default::default(),
        })
        .await
        .expect_err("unknown property");
    assert!(matches!(missing, AccessFlowError::NotFound(_)));

    let contactless = harness
        .create
        .execute(CreateAccessRequestInput {
            property_id: PropertyId::from(PROPERTY),
            requester_email: None,
            requester_phone: None,
            requester_name: None,
            location_data: None,
            meta: Default::default(),
        })
        .await
        .expect_err("no contact info");
    assert!(matches!(contactless, AccessFlowError::Validation(_)));
}

#[tokio::test]
async fn wrong_token_and_unknown_request_are_the_same_forbidden() {
    let harness = Harness::new();
    harness.seed_property(true);
    let created = harness.create_request("sam@example.com").await;

    let wrong_token = harness
        .decide
        .by_token(&created.request_id, "deadbeef", DecisionAction::Approve)
        .await
        .expect_err("wrong token");
    let unknown_request = harness
        .decide
        .by_token(
            &RequestId::from("req-unknown"),
            &created.verification_token,
            DecisionAction::Approve,
        )
        .await
        .expect_err("unknown request");

    match (&wrong_token, &unknown_request) {
        (AccessFlowError::Forbidden(a), AccessFlowError::Forbidden(b)) => assert_eq!(a, b),
        other => panic!("expected matching Forbidden pair, got {other:?}"),
    }
    assert_eq!(
        harness.request_status(&created.request_id).await,
        RequestStatus::Pending
    );
}

#[tokio::test]
async fn authenticated_decide_checks_ownership() {
    let harness = Harness::new();
    harness.seed_property(true);
    let created = harness.create_request("sam@example.com").await;

    let not_owner = harness
        .decide
        .by_owner(
            &created.request_id,
            &UserId::from("intruder"),
            DecisionAction::Approve,
        )
        .await
        .expect_err("not the owner");
    assert!(matches!(not_owner, AccessFlowError::Forbidden(_)));

    let outcome = harness
        .decide
        .by_owner(
            &created.request_id,
            &UserId::from(OWNER),
            DecisionAction::Approve,
        )
        .await
        .expect("owner approves");
    assert_eq!(
        outcome,
        DecisionOutcome::Decided {
            status: RequestStatus::Approved
        }
    );

    let repeat = harness
        .decide
        .by_owner(
            &created.request_id,
            &UserId::from(OWNER),
            DecisionAction::Deny,
        )
        .await
        .expect_err("already terminal");
    assert!(matches!(repeat, AccessFlowError::InvalidTransition(_)));
}

#[tokio::test]
async fn denial_email_stays_neutral() {
    let harness = Harness::new();
    harness.seed_property(true);
    let created = harness.create_request("sam@example.com").await;

    harness
        .decide
        .by_token(
            &created.request_id,
            &created.verification_token,
            DecisionAction::Deny,
        )
        .await
        .expect("deny");

    let requester_mail = harness.email.sent_to("sam@example.com");
    // Verification code mail plus the denial notice.
    assert_eq!(requester_mail.len(), 2);
    assert!(requester_mail[1].1.contains("denied"));
    assert!(!requester_mail[1].1.contains("2580"));
}
