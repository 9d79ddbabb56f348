use actix_web::{HttpResponse, Responder, web};
use serde::Deserialize;
use sqlx::SqlitePool;
use utoipa::IntoParams;

use crate::auth::auth::AuthUser;
use crate::error::AppError;
use crate::store;

#[derive(Deserialize, IntoParams)]
pub struct AuditQuery {
    /// Max number of entries to return (newest first), capped at 500
    pub limit: Option<i64>,
}

/// Swagger doc for audit_list endpoint
#[utoipa::path(
    get,
    path = "/api/v1/audit",
    params(AuditQuery),
    responses(
        (status = 200, description = "Audit entries, newest first", body = [crate::model::audit_log::AuditLogEntry]),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden")
    ),
    security(("bearer_auth" = [])),
    tag = "Audit"
)]
pub async fn audit_list(
    auth: AuthUser,
    pool: web::Data<SqlitePool>,
    query: web::Query<AuditQuery>,
) -> Result<impl Responder, AppError> {
    auth.require_manager_or_hr()?;

    let limit = query.limit.unwrap_or(100).clamp(1, 500);
    let entries = store::audit::query(pool.get_ref(), limit).await?;

    Ok(HttpResponse::Ok().json(entries))
}
