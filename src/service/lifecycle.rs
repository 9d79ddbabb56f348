//! Leave-request lifecycle: creation with overlap/threshold gating, and
//! the single-shot approve/reject transition. Every state change and its
//! audit entry commit in the same transaction.

use chrono::{NaiveDate, Utc};
use sqlx::pool::PoolConnection;
use sqlx::{Sqlite, SqliteConnection, SqlitePool};
use tracing::{info, warn};

use crate::error::{AppError, AppResult};
use crate::model::{leave_request::LeaveRequest, status::LeaveStatus, user::User};
use crate::service::notify::Notifier;
use crate::service::overlap;
use crate::store;

/// Result of a decision. `notified` reflects the post-commit notification
/// attempt only; the decision itself is already durable.
#[derive(Debug)]
pub struct DecisionOutcome {
    pub request: LeaveRequest,
    pub notified: bool,
}

/// Open a write transaction that takes the write lock up front. A
/// deferred transaction would start on a read snapshot and its later
/// write upgrade can fail with SQLITE_BUSY under concurrent writers;
/// BEGIN IMMEDIATE makes check-then-write sequences queue instead,
/// waiting on the connection's busy timeout.
async fn begin_immediate(pool: &SqlitePool) -> Result<PoolConnection<Sqlite>, sqlx::Error> {
    let mut conn = pool.acquire().await?;
    sqlx::query("BEGIN IMMEDIATE").execute(&mut *conn).await?;
    Ok(conn)
}

async fn commit(mut conn: PoolConnection<Sqlite>) -> Result<(), sqlx::Error> {
    sqlx::query("COMMIT").execute(&mut *conn).await?;
    Ok(())
}

async fn rollback(mut conn: PoolConnection<Sqlite>) {
    if let Err(e) = sqlx::query("ROLLBACK").execute(&mut *conn).await {
        warn!(error = %e, "rollback failed, discarding connection");
        // drop the raw connection instead of returning it to the pool
        // with a transaction still open
        drop(conn.detach());
    }
}

/// Create a pending request for `employee`.
///
/// The overlap check, the department threshold check, and the insert run
/// in one immediate write transaction, so two racing submissions cannot
/// both pass the checks. The threshold is a hard block: hitting it fails
/// creation with `ThresholdExceeded`.
pub async fn create_request(
    pool: &SqlitePool,
    dept_max_on_leave: i64,
    employee: &User,
    start_date: NaiveDate,
    end_date: NaiveDate,
    reason: &str,
    attachment: Option<&str>,
) -> AppResult<i64> {
    overlap::validate_range(start_date, end_date)?;

    let mut conn = begin_immediate(pool).await?;

    let result = create_in_tx(
        &mut conn,
        dept_max_on_leave,
        employee,
        start_date,
        end_date,
        reason,
        attachment,
    )
    .await;

    match result {
        Ok(id) => {
            commit(conn).await?;
            info!(
                request_id = id,
                employee_id = employee.id,
                %start_date,
                %end_date,
                "leave request created"
            );
            Ok(id)
        }
        Err(e) => {
            rollback(conn).await;
            Err(e)
        }
    }
}

async fn create_in_tx(
    conn: &mut SqliteConnection,
    dept_max_on_leave: i64,
    employee: &User,
    start_date: NaiveDate,
    end_date: NaiveDate,
    reason: &str,
    attachment: Option<&str>,
) -> AppResult<i64> {
    if overlap::has_employee_overlap(&mut *conn, employee.id, start_date, end_date).await? {
        return Err(AppError::Overlap);
    }

    let count =
        overlap::count_department_overlap(&mut *conn, &employee.department, start_date, end_date)
            .await?;
    if count >= dept_max_on_leave {
        return Err(AppError::ThresholdExceeded {
            count,
            limit: dept_max_on_leave,
        });
    }

    let id = store::leave_requests::insert(
        &mut *conn,
        employee.id,
        start_date,
        end_date,
        reason,
        attachment,
        Utc::now(),
    )
    .await?;

    store::audit::append(&mut *conn, "create", employee.id, "leave_request", id, None).await?;

    Ok(id)
}

/// Approve or reject a pending request. Single-shot: once a request has
/// left `pending` every further decision fails with `AlreadyDecided`,
/// enforced by the guarded UPDATE so two racing managers cannot both win.
///
/// The employee notification runs after commit and is best effort; its
/// failure is a warning, never a rollback.
pub async fn decide(
    pool: &SqlitePool,
    notifier: &dyn Notifier,
    request_id: i64,
    approver: &User,
    approved: bool,
    note: Option<&str>,
) -> AppResult<DecisionOutcome> {
    let (status, action) = if approved {
        (LeaveStatus::Approved, "approve")
    } else {
        (LeaveStatus::Rejected, "reject")
    };

    let mut conn = begin_immediate(pool).await?;

    let result = decide_in_tx(&mut conn, request_id, status, action, approver, note).await;

    match result {
        Ok(()) => commit(conn).await?,
        Err(e) => {
            rollback(conn).await;
            return Err(e);
        }
    }

    info!(request_id, approver_id = approver.id, action, "leave request decided");

    let request = store::leave_requests::get_by_id(pool, request_id)
        .await?
        .ok_or(AppError::NotFound("leave request"))?;

    let notified = notify_employee(pool, notifier, &request, approver, approved, note).await;

    Ok(DecisionOutcome { request, notified })
}

async fn decide_in_tx(
    conn: &mut SqliteConnection,
    request_id: i64,
    status: LeaveStatus,
    action: &str,
    approver: &User,
    note: Option<&str>,
) -> AppResult<()> {
    if store::leave_requests::get_by_id(&mut *conn, request_id)
        .await?
        .is_none()
    {
        return Err(AppError::NotFound("leave request"));
    }

    let rows =
        store::leave_requests::decide_pending(&mut *conn, request_id, status, approver.id, Utc::now())
            .await?;
    if rows == 0 {
        return Err(AppError::AlreadyDecided);
    }

    store::audit::append(&mut *conn, action, approver.id, "leave_request", request_id, note).await?;

    Ok(())
}

async fn notify_employee(
    pool: &SqlitePool,
    notifier: &dyn Notifier,
    request: &LeaveRequest,
    approver: &User,
    approved: bool,
    note: Option<&str>,
) -> bool {
    let employee = match store::users::get_by_id(pool, request.employee_id).await {
        Ok(Some(u)) => u,
        Ok(None) => return false,
        Err(e) => {
            warn!(error = %e, request_id = request.id, "employee lookup for notification failed");
            return false;
        }
    };

    let Some(email) = employee.email.as_deref() else {
        warn!(
            request_id = request.id,
            employee_id = employee.id,
            "employee has no email, skipping notification"
        );
        return false;
    };

    let verdict = if approved { "approved" } else { "rejected" };
    let subject = format!("Leave request #{} {}", request.id, verdict);
    let mut body = format!(
        "Hello {},\n\nYour leave request #{} from {} to {} has been {}.\n",
        employee.name, request.id, request.start_date, request.end_date, verdict
    );
    if let Some(note) = note {
        body.push_str(&format!("Note: {}\n", note));
    }
    body.push_str(&format!("\nRegards,\n{}", approver.name));

    notifier.send(email, &subject, &body).await
}
