use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::model::status::LeaveStatus;

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct LeaveRequest {
    pub id: i64,
    pub employee_id: i64,
    /// Inclusive range, start_date <= end_date.
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub reason: String,
    /// Opaque reference into the attachment store, if any.
    pub attachment: Option<String>,
    pub status: LeaveStatus,
    pub approver_id: Option<i64>,
    pub created_at: DateTime<Utc>,
    pub approved_at: Option<DateTime<Utc>>,
}
