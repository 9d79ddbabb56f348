use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{SqliteExecutor, SqlitePool};
use utoipa::ToSchema;

use crate::model::{leave_request::LeaveRequest, status::LeaveStatus};

/// Leave request joined with the submitting employee, for manager views
/// and department reports.
#[derive(Debug, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
pub struct LeaveWithEmployee {
    #[schema(example = 1)]
    pub id: i64,
    #[schema(example = 42)]
    pub employee_id: i64,
    #[schema(example = "Nguyen Van A")]
    pub employee_name: String,
    #[schema(example = "nva")]
    pub username: String,
    #[schema(example = "2026-01-01", format = "date", value_type = String)]
    pub start_date: NaiveDate,
    #[schema(example = "2026-01-03", format = "date", value_type = String)]
    pub end_date: NaiveDate,
    pub reason: String,
    #[schema(example = "pending")]
    pub status: LeaveStatus,
    #[schema(example = "2026-01-01T00:00:00Z", format = "date-time", value_type = String)]
    pub created_at: DateTime<Utc>,
}

pub async fn get_by_id(
    exec: impl SqliteExecutor<'_>,
    id: i64,
) -> Result<Option<LeaveRequest>, sqlx::Error> {
    sqlx::query_as::<_, LeaveRequest>(
        r#"
        SELECT id, employee_id, start_date, end_date, reason, attachment,
               status, approver_id, created_at, approved_at
        FROM leave_requests
        WHERE id = ?
        "#,
    )
    .bind(id)
    .fetch_optional(exec)
    .await
}

/// Insert a new pending request. Runs on an executor so the lifecycle
/// manager can call it inside its overlap-check transaction.
pub async fn insert(
    exec: impl SqliteExecutor<'_>,
    employee_id: i64,
    start_date: NaiveDate,
    end_date: NaiveDate,
    reason: &str,
    attachment: Option<&str>,
    created_at: DateTime<Utc>,
) -> Result<i64, sqlx::Error> {
    let result = sqlx::query(
        r#"
        INSERT INTO leave_requests
            (employee_id, start_date, end_date, reason, attachment, status, created_at)
        VALUES (?, ?, ?, ?, ?, 'pending', ?)
        "#,
    )
    .bind(employee_id)
    .bind(start_date)
    .bind(end_date)
    .bind(reason)
    .bind(attachment)
    .bind(created_at)
    .execute(exec)
    .await?;

    Ok(result.last_insert_rowid())
}

/// Move a pending request into a terminal state. The `status = 'pending'`
/// guard makes the read-check-then-write race-safe: a concurrent decision
/// leaves zero rows affected here.
pub async fn decide_pending(
    exec: impl SqliteExecutor<'_>,
    id: i64,
    status: LeaveStatus,
    approver_id: i64,
    approved_at: DateTime<Utc>,
) -> Result<u64, sqlx::Error> {
    let result = sqlx::query(
        r#"
        UPDATE leave_requests
        SET status = ?, approver_id = ?, approved_at = ?
        WHERE id = ?
        AND status = 'pending'
        "#,
    )
    .bind(status)
    .bind(approver_id)
    .bind(approved_at)
    .bind(id)
    .execute(exec)
    .await?;

    Ok(result.rows_affected())
}

pub async fn list_pending_for_department(
    pool: &SqlitePool,
    department: &str,
) -> Result<Vec<LeaveWithEmployee>, sqlx::Error> {
    sqlx::query_as::<_, LeaveWithEmployee>(
        r#"
        SELECT lr.id, lr.employee_id, u.name AS employee_name, u.username,
               lr.start_date, lr.end_date, lr.reason, lr.status, lr.created_at
        FROM leave_requests lr
        JOIN users u ON u.id = lr.employee_id
        WHERE u.department = ?
        AND lr.status = 'pending'
        ORDER BY lr.created_at ASC
        "#,
    )
    .bind(department)
    .fetch_all(pool)
    .await
}

/// All requests for a department, optionally narrowed to those whose
/// inclusive range intersects the filter range.
pub async fn list_for_department(
    pool: &SqlitePool,
    department: &str,
    range: Option<(NaiveDate, NaiveDate)>,
) -> Result<Vec<LeaveWithEmployee>, sqlx::Error> {
    match range {
        Some((from, to)) => {
            sqlx::query_as::<_, LeaveWithEmployee>(
                r#"
                SELECT lr.id, lr.employee_id, u.name AS employee_name, u.username,
                       lr.start_date, lr.end_date, lr.reason, lr.status, lr.created_at
                FROM leave_requests lr
                JOIN users u ON u.id = lr.employee_id
                WHERE u.department = ?
                AND NOT (lr.end_date < ? OR lr.start_date > ?)
                ORDER BY lr.start_date ASC
                "#,
            )
            .bind(department)
            .bind(from)
            .bind(to)
            .fetch_all(pool)
            .await
        }
        None => {
            sqlx::query_as::<_, LeaveWithEmployee>(
                r#"
                SELECT lr.id, lr.employee_id, u.name AS employee_name, u.username,
                       lr.start_date, lr.end_date, lr.reason, lr.status, lr.created_at
                FROM leave_requests lr
                JOIN users u ON u.id = lr.employee_id
                WHERE u.department = ?
                ORDER BY lr.start_date ASC
                "#,
            )
            .bind(department)
            .fetch_all(pool)
            .await
        }
    }
}
