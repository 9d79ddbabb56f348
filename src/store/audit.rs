use chrono::Utc;
use sqlx::{SqliteExecutor, SqlitePool};

use crate::model::audit_log::AuditLogEntry;

/// Append one immutable audit row. Timestamp is generated here, at write
/// time. Takes an executor so callers can append inside a transaction.
pub async fn append(
    exec: impl SqliteExecutor<'_>,
    action: &str,
    actor_user_id: i64,
    object_type: &str,
    object_id: i64,
    note: Option<&str>,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        INSERT INTO audit_logs (action, actor_user_id, object_type, object_id, note, created_at)
        VALUES (?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(action)
    .bind(actor_user_id)
    .bind(object_type)
    .bind(object_id)
    .bind(note)
    .bind(Utc::now())
    .execute(exec)
    .await?;

    Ok(())
}

/// Newest entries first, bounded by `limit`.
pub async fn query(pool: &SqlitePool, limit: i64) -> Result<Vec<AuditLogEntry>, sqlx::Error> {
    sqlx::query_as::<_, AuditLogEntry>(
        r#"
        SELECT id, action, actor_user_id, object_type, object_id, note, created_at
        FROM audit_logs
        ORDER BY id DESC
        LIMIT ?
        "#,
    )
    .bind(limit)
    .fetch_all(pool)
    .await
}
