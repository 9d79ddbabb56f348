//! Date-range intersection checks. Two inclusive ranges intersect when
//! neither lies entirely before or after the other:
//! NOT (existing.end < start OR existing.start > end).

use chrono::NaiveDate;
use sqlx::SqliteExecutor;

use crate::error::{AppError, AppResult};

pub fn validate_range(start: NaiveDate, end: NaiveDate) -> AppResult<()> {
    if start > end {
        return Err(AppError::Validation(format!(
            "end_date {} is before start_date {}",
            end, start
        )));
    }
    Ok(())
}

/// Normalize an optional report filter: both bounds present gives a
/// validated range, neither gives no filter, and a one-sided filter is
/// rejected rather than silently ignored.
pub fn validate_filter(
    from: Option<NaiveDate>,
    to: Option<NaiveDate>,
) -> AppResult<Option<(NaiveDate, NaiveDate)>> {
    match (from, to) {
        (Some(from), Some(to)) => {
            validate_range(from, to)?;
            Ok(Some((from, to)))
        }
        (None, None) => Ok(None),
        _ => Err(AppError::Validation(
            "date filter requires both from and to".into(),
        )),
    }
}

/// True if the employee already has a pending or approved request whose
/// inclusive range intersects [start, end]. Read-only; runs on any
/// executor so the lifecycle manager can call it mid-transaction.
pub async fn has_employee_overlap(
    exec: impl SqliteExecutor<'_>,
    employee_id: i64,
    start: NaiveDate,
    end: NaiveDate,
) -> AppResult<bool> {
    validate_range(start, end)?;

    let exists = sqlx::query_scalar::<_, bool>(
        r#"
        SELECT EXISTS(
            SELECT 1 FROM leave_requests
            WHERE employee_id = ?
            AND status IN ('pending', 'approved')
            AND NOT (end_date < ? OR start_date > ?)
        )
        "#,
    )
    .bind(employee_id)
    .bind(start)
    .bind(end)
    .fetch_one(exec)
    .await?;

    Ok(exists)
}

/// Number of approved requests in the department intersecting [start, end].
/// Gates creation against the configured headcount threshold.
pub async fn count_department_overlap(
    exec: impl SqliteExecutor<'_>,
    department: &str,
    start: NaiveDate,
    end: NaiveDate,
) -> AppResult<i64> {
    validate_range(start, end)?;

    let count = sqlx::query_scalar::<_, i64>(
        r#"
        SELECT COUNT(*)
        FROM leave_requests lr
        JOIN users u ON u.id = lr.employee_id
        WHERE u.department = ?
        AND lr.status = 'approved'
        AND NOT (lr.end_date < ? OR lr.start_date > ?)
        "#,
    )
    .bind(department)
    .bind(start)
    .bind(end)
    .fetch_one(exec)
    .await?;

    Ok(count)
}
