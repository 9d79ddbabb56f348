mod common;

use std::sync::Mutex;

use async_trait::async_trait;
use chrono::Days;
use common::{date, seed_user, test_pool};
use sqlx::SqlitePool;

use leavetrack::error::AppError;
use leavetrack::model::{role::Role, status::LeaveStatus};
use leavetrack::service::lifecycle;
use leavetrack::service::notify::{NoopNotifier, Notifier};
use leavetrack::store;

const THRESHOLD: i64 = 2;

/// Pool shaped like production: file-backed, multiple connections. The
/// race tests must run here; a single-connection pool serializes the
/// calls and would hide write-lock contention.
async fn production_like_pool(dir: &tempfile::TempDir) -> SqlitePool {
    let url = format!("sqlite://{}", dir.path().join("leave.db").display());
    leavetrack::db::init_db(&url).await.expect("init file-backed db")
}

/// Captures outgoing notifications so tests can assert on them.
struct RecordingNotifier {
    sent: Mutex<Vec<(String, String, String)>>,
}

impl RecordingNotifier {
    fn new() -> Self {
        Self {
            sent: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn send(&self, destination: &str, subject: &str, body: &str) -> bool {
        self.sent.lock().unwrap().push((
            destination.to_string(),
            subject.to_string(),
            body.to_string(),
        ));
        true
    }
}

#[actix_web::test]
async fn create_rejects_inverted_range() {
    let pool = test_pool().await;
    let emp = seed_user(&pool, "e1", Role::Employee, "Khoa A", None).await;

    let err = lifecycle::create_request(
        &pool,
        THRESHOLD,
        &emp,
        date("2025-08-22"),
        date("2025-08-20"),
        "checkup",
        None,
    )
    .await
    .unwrap_err();

    assert!(matches!(err, AppError::Validation(_)));
}

#[actix_web::test]
async fn overlapping_request_is_rejected() {
    let pool = test_pool().await;
    let emp = seed_user(&pool, "e1", Role::Employee, "Khoa A", None).await;

    lifecycle::create_request(
        &pool,
        THRESHOLD,
        &emp,
        date("2025-08-20"),
        date("2025-08-22"),
        "first",
        None,
    )
    .await
    .unwrap();

    // shares exactly one day with the pending request
    let err = lifecycle::create_request(
        &pool,
        THRESHOLD,
        &emp,
        date("2025-08-22"),
        date("2025-08-25"),
        "second",
        None,
    )
    .await
    .unwrap_err();

    assert!(matches!(err, AppError::Overlap));
}

#[actix_web::test]
async fn disjoint_ranges_coexist() {
    let pool = test_pool().await;
    let emp = seed_user(&pool, "e1", Role::Employee, "Khoa A", None).await;

    lifecycle::create_request(
        &pool,
        THRESHOLD,
        &emp,
        date("2025-08-20"),
        date("2025-08-22"),
        "first",
        None,
    )
    .await
    .unwrap();

    lifecycle::create_request(
        &pool,
        THRESHOLD,
        &emp,
        date("2025-08-23"),
        date("2025-08-25"),
        "second",
        None,
    )
    .await
    .unwrap();
}

#[actix_web::test]
async fn rejected_request_frees_the_range() {
    let pool = test_pool().await;
    let emp = seed_user(&pool, "e1", Role::Employee, "Khoa A", None).await;
    let mgr = seed_user(&pool, "m1", Role::Manager, "Khoa A", None).await;

    let id = lifecycle::create_request(
        &pool,
        THRESHOLD,
        &emp,
        date("2025-08-20"),
        date("2025-08-22"),
        "first try",
        None,
    )
    .await
    .unwrap();

    lifecycle::decide(&pool, &NoopNotifier, id, &mgr, false, Some("short-staffed"))
        .await
        .unwrap();

    // rejected requests no longer block the range
    lifecycle::create_request(
        &pool,
        THRESHOLD,
        &emp,
        date("2025-08-20"),
        date("2025-08-22"),
        "second try",
        None,
    )
    .await
    .unwrap();
}

#[actix_web::test]
async fn concurrent_overlapping_creates_one_wins() {
    let dir = tempfile::tempdir().unwrap();
    let pool = production_like_pool(&dir).await;
    let emp = seed_user(&pool, "e1", Role::Employee, "Khoa A", None).await;

    // repeat on fresh weekly windows so both writers really race on
    // separate connections each round
    for week in 0..10u64 {
        let base = date("2025-01-06") + Days::new(7 * week);

        let a = lifecycle::create_request(
            &pool,
            THRESHOLD,
            &emp,
            base,
            base + Days::new(2),
            "race a",
            None,
        );
        let b = lifecycle::create_request(
            &pool,
            THRESHOLD,
            &emp,
            base + Days::new(1),
            base + Days::new(3),
            "race b",
            None,
        );

        let (ra, rb) = futures::join!(a, b);

        let successes = [&ra, &rb].iter().filter(|r| r.is_ok()).count();
        assert_eq!(successes, 1, "exactly one of two racing creates may win");
        let loser = if ra.is_ok() { rb } else { ra };
        assert!(
            matches!(loser.unwrap_err(), AppError::Overlap),
            "the loser must see the overlap, not a storage failure"
        );
    }
}

#[actix_web::test]
async fn concurrent_disjoint_creates_both_succeed() {
    let dir = tempfile::tempdir().unwrap();
    let pool = production_like_pool(&dir).await;
    let e1 = seed_user(&pool, "e1", Role::Employee, "Khoa A", None).await;
    let e2 = seed_user(&pool, "e2", Role::Employee, "Khoa A", None).await;

    // valid concurrent submissions must not trip over each other's
    // write locks
    let a = lifecycle::create_request(
        &pool,
        THRESHOLD,
        &e1,
        date("2025-08-04"),
        date("2025-08-06"),
        "first",
        None,
    );
    let b = lifecycle::create_request(
        &pool,
        THRESHOLD,
        &e2,
        date("2025-08-11"),
        date("2025-08-13"),
        "second",
        None,
    );

    let (ra, rb) = futures::join!(a, b);
    ra.unwrap();
    rb.unwrap();
}

#[actix_web::test]
async fn concurrent_decisions_have_a_single_winner() {
    let dir = tempfile::tempdir().unwrap();
    let pool = production_like_pool(&dir).await;
    let emp = seed_user(&pool, "e1", Role::Employee, "Khoa A", None).await;
    let m1 = seed_user(&pool, "m1", Role::Manager, "Khoa A", None).await;
    let m2 = seed_user(&pool, "m2", Role::Manager, "Khoa A", None).await;

    let id = lifecycle::create_request(
        &pool,
        THRESHOLD,
        &emp,
        date("2025-08-20"),
        date("2025-08-22"),
        "trip",
        None,
    )
    .await
    .unwrap();

    let a = lifecycle::decide(&pool, &NoopNotifier, id, &m1, true, None);
    let b = lifecycle::decide(&pool, &NoopNotifier, id, &m2, false, None);

    let (ra, rb) = futures::join!(a, b);

    let successes = [ra.is_ok(), rb.is_ok()].iter().filter(|ok| **ok).count();
    assert_eq!(successes, 1, "exactly one of two racing decisions may win");
    let loser = if ra.is_ok() { rb } else { ra };
    assert!(
        matches!(loser.unwrap_err(), AppError::AlreadyDecided),
        "the loser must see the earlier decision, not a storage failure"
    );

    // exactly one decision reached the audit trail
    let entries = store::audit::query(&pool, 100).await.unwrap();
    let decisions = entries
        .iter()
        .filter(|e| e.action == "approve" || e.action == "reject")
        .count();
    assert_eq!(decisions, 1);
}

#[actix_web::test]
async fn decide_unknown_id_is_not_found() {
    let pool = test_pool().await;
    let mgr = seed_user(&pool, "m1", Role::Manager, "Khoa A", None).await;

    let err = lifecycle::decide(&pool, &NoopNotifier, 999, &mgr, true, None)
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::NotFound(_)));
}

#[actix_web::test]
async fn decide_is_single_shot() {
    let pool = test_pool().await;
    let emp = seed_user(&pool, "e1", Role::Employee, "Khoa A", None).await;
    let mgr = seed_user(&pool, "m1", Role::Manager, "Khoa A", None).await;
    let hr = seed_user(&pool, "h1", Role::Hr, "HR", None).await;

    let id = lifecycle::create_request(
        &pool,
        THRESHOLD,
        &emp,
        date("2025-08-20"),
        date("2025-08-22"),
        "trip",
        None,
    )
    .await
    .unwrap();

    lifecycle::decide(&pool, &NoopNotifier, id, &mgr, true, None)
        .await
        .unwrap();

    // a second decision fails no matter who decides or which way
    let err = lifecycle::decide(&pool, &NoopNotifier, id, &hr, false, Some("changed my mind"))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::AlreadyDecided));

    let err = lifecycle::decide(&pool, &NoopNotifier, id, &mgr, true, None)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::AlreadyDecided));
}

#[actix_web::test]
async fn threshold_blocks_additional_department_request() {
    let pool = test_pool().await;
    let e1 = seed_user(&pool, "e1", Role::Employee, "Khoa A", None).await;
    let e2 = seed_user(&pool, "e2", Role::Employee, "Khoa A", None).await;
    let e3 = seed_user(&pool, "e3", Role::Employee, "Khoa A", None).await;
    let mgr = seed_user(&pool, "m1", Role::Manager, "Khoa A", None).await;

    for emp in [&e1, &e2] {
        let id = lifecycle::create_request(
            &pool,
            THRESHOLD,
            emp,
            date("2025-08-20"),
            date("2025-08-22"),
            "summer",
            None,
        )
        .await
        .unwrap();
        lifecycle::decide(&pool, &NoopNotifier, id, &mgr, true, None)
            .await
            .unwrap();
    }

    // two approved overlapping leaves already, threshold is two
    let err = lifecycle::create_request(
        &pool,
        THRESHOLD,
        &e3,
        date("2025-08-21"),
        date("2025-08-21"),
        "one day",
        None,
    )
    .await
    .unwrap_err();

    assert!(matches!(
        err,
        AppError::ThresholdExceeded { count: 2, limit: 2 }
    ));

    // a disjoint range in the same department is still fine
    lifecycle::create_request(
        &pool,
        THRESHOLD,
        &e3,
        date("2025-09-01"),
        date("2025-09-02"),
        "later",
        None,
    )
    .await
    .unwrap();
}

#[actix_web::test]
async fn approved_request_round_trips() {
    let pool = test_pool().await;
    let emp = seed_user(&pool, "e1", Role::Employee, "Khoa A", None).await;
    let mgr = seed_user(&pool, "m1", Role::Manager, "Khoa A", None).await;

    let id = lifecycle::create_request(
        &pool,
        THRESHOLD,
        &emp,
        date("2025-08-20"),
        date("2025-08-22"),
        "trip",
        Some("e1/abc.pdf"),
    )
    .await
    .unwrap();

    lifecycle::decide(&pool, &NoopNotifier, id, &mgr, true, None)
        .await
        .unwrap();

    let fetched = store::leave_requests::get_by_id(&pool, id)
        .await
        .unwrap()
        .unwrap();

    assert_eq!(fetched.status, LeaveStatus::Approved);
    assert_eq!(fetched.approver_id, Some(mgr.id));
    assert!(fetched.approved_at.is_some());
    assert_eq!(fetched.attachment.as_deref(), Some("e1/abc.pdf"));
    assert_eq!(fetched.start_date, date("2025-08-20"));
    assert_eq!(fetched.end_date, date("2025-08-22"));

    // the persisted status is plain lowercase text, stable across restarts
    let raw: String = sqlx::query_scalar("SELECT status FROM leave_requests WHERE id = ?")
        .bind(id)
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(raw, "approved");
}

#[actix_web::test]
async fn decision_notifies_the_employee() {
    let pool = test_pool().await;
    let emp = seed_user(&pool, "e1", Role::Employee, "Khoa A", Some("e1@example.com")).await;
    let mgr = seed_user(&pool, "m1", Role::Manager, "Khoa A", None).await;

    let id = lifecycle::create_request(
        &pool,
        THRESHOLD,
        &emp,
        date("2025-08-20"),
        date("2025-08-22"),
        "trip",
        None,
    )
    .await
    .unwrap();

    let notifier = RecordingNotifier::new();
    let outcome = lifecycle::decide(&pool, &notifier, id, &mgr, false, Some("coverage gap"))
        .await
        .unwrap();

    assert!(outcome.notified);
    let sent = notifier.sent.lock().unwrap();
    assert_eq!(sent.len(), 1);
    let (to, subject, body) = &sent[0];
    assert_eq!(to, "e1@example.com");
    assert!(subject.contains(&format!("#{}", id)));
    assert!(subject.contains("rejected"));
    assert!(body.contains("coverage gap"));
}

#[actix_web::test]
async fn missing_email_means_not_notified_but_decided() {
    let pool = test_pool().await;
    let emp = seed_user(&pool, "e1", Role::Employee, "Khoa A", None).await;
    let mgr = seed_user(&pool, "m1", Role::Manager, "Khoa A", None).await;

    let id = lifecycle::create_request(
        &pool,
        THRESHOLD,
        &emp,
        date("2025-08-20"),
        date("2025-08-22"),
        "trip",
        None,
    )
    .await
    .unwrap();

    let outcome = lifecycle::decide(&pool, &NoopNotifier, id, &mgr, true, None)
        .await
        .unwrap();

    // notification failure never rolls the decision back
    assert!(!outcome.notified);
    assert_eq!(outcome.request.status, LeaveStatus::Approved);
}
