use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// One immutable row in the audit trail. Rows are only ever appended.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
pub struct AuditLogEntry {
    #[schema(example = 1)]
    pub id: i64,
    #[schema(example = "approve")]
    pub action: String,
    #[schema(example = 42)]
    pub actor_user_id: i64,
    #[schema(example = "leave_request")]
    pub object_type: String,
    #[schema(example = 7)]
    pub object_id: i64,
    pub note: Option<String>,
    #[schema(example = "2026-01-01T00:00:00Z", format = "date-time", value_type = String)]
    pub created_at: DateTime<Utc>,
}
