use actix_web::{HttpResponse, Responder, web};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;
use std::sync::Arc;
use utoipa::{IntoParams, ToSchema};

use crate::auth::auth::AuthUser;
use crate::config::Config;
use crate::error::AppError;
use crate::model::{leave_request::LeaveRequest, role::Role};
use crate::service::{lifecycle, notify::Notifier, overlap};
use crate::store;

#[derive(Deserialize, ToSchema)]
pub struct CreateLeave {
    #[schema(example = "2026-01-01", format = "date", value_type = String)]
    pub start_date: NaiveDate,
    #[schema(example = "2026-01-03", format = "date", value_type = String)]
    pub end_date: NaiveDate,
    #[schema(example = "Personal errand")]
    pub reason: String,
    /// Reference returned by the attachment upload endpoint, if any.
    pub attachment: Option<String>,
}

#[derive(Deserialize, ToSchema)]
pub struct DecideReq {
    /// Free-form note recorded in the audit trail and sent to the employee.
    pub note: Option<String>,
}

#[derive(Serialize, ToSchema)]
pub struct DecideResponse {
    #[schema(example = "Leave approved")]
    pub message: String,
    /// Whether the post-commit employee notification went out. The
    /// decision itself is durable either way.
    pub notified: bool,
}

#[derive(Deserialize, IntoParams, ToSchema)]
pub struct LeaveFilter {
    /// Department to list; HR may pick any, managers are pinned to their own
    pub department: Option<String>,
    /// Keep only requests intersecting [from, to]; both bounds or neither
    #[param(example = "2026-01-01", value_type = Option<String>)]
    pub from: Option<NaiveDate>,
    #[param(example = "2026-01-31", value_type = Option<String>)]
    pub to: Option<NaiveDate>,
}

#[derive(Deserialize, IntoParams, ToSchema)]
pub struct OverlapQuery {
    #[param(example = "2026-01-01", value_type = String)]
    pub start_date: NaiveDate,
    #[param(example = "2026-01-03", value_type = String)]
    pub end_date: NaiveDate,
}

async fn load_caller(pool: &SqlitePool, auth: &AuthUser) -> Result<crate::model::user::User, AppError> {
    store::users::get_by_id(pool, auth.user_id)
        .await?
        .ok_or(AppError::NotFound("user"))
}

/* =========================
Create leave request
========================= */
/// Swagger doc for create_leave endpoint
#[utoipa::path(
    post,
    path = "/api/v1/leave",
    request_body = CreateLeave,
    responses(
        (status = 200, description = "Leave request submitted", body = Object, example = json!({
            "message": "Leave request submitted",
            "id": 1,
            "status": "pending"
        })),
        (status = 400, description = "Invalid date range"),
        (status = 401, description = "Unauthorized"),
        (status = 409, description = "Overlapping request or department threshold reached")
    ),
    security(("bearer_auth" = [])),
    tag = "Leave"
)]
pub async fn create_leave(
    auth: AuthUser,
    pool: web::Data<SqlitePool>,
    config: web::Data<Config>,
    payload: web::Json<CreateLeave>,
) -> Result<impl Responder, AppError> {
    let employee = load_caller(pool.get_ref(), &auth).await?;

    let id = lifecycle::create_request(
        pool.get_ref(),
        config.dept_max_on_leave,
        &employee,
        payload.start_date,
        payload.end_date,
        &payload.reason,
        payload.attachment.as_deref(),
    )
    .await?;

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "message": "Leave request submitted",
        "id": id,
        "status": "pending"
    })))
}

async fn decide(
    auth: AuthUser,
    pool: web::Data<SqlitePool>,
    notifier: web::Data<Arc<dyn Notifier>>,
    path: web::Path<i64>,
    payload: Option<web::Json<DecideReq>>,
    approved: bool,
) -> Result<HttpResponse, AppError> {
    auth.require_manager_or_hr()?;

    let approver = load_caller(pool.get_ref(), &auth).await?;
    let note = payload.as_ref().and_then(|p| p.note.as_deref());

    let outcome = lifecycle::decide(
        pool.get_ref(),
        notifier.get_ref().as_ref(),
        path.into_inner(),
        &approver,
        approved,
        note,
    )
    .await?;

    let message = if approved {
        "Leave approved"
    } else {
        "Leave rejected"
    };

    Ok(HttpResponse::Ok().json(DecideResponse {
        message: message.to_string(),
        notified: outcome.notified,
    }))
}

/* =========================
Approve leave (manager/HR)
========================= */
/// Swagger doc for approve_leave endpoint
#[utoipa::path(
    put,
    path = "/api/v1/leave/{leave_id}/approve",
    params(("leave_id" = i64, Path, description = "ID of the leave request to approve")),
    request_body(content = DecideReq, description = "Optional decision note"),
    responses(
        (status = 200, description = "Leave approved", body = DecideResponse),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Leave request not found"),
        (status = 409, description = "Already decided")
    ),
    security(("bearer_auth" = [])),
    tag = "Leave"
)]
pub async fn approve_leave(
    auth: AuthUser,
    pool: web::Data<SqlitePool>,
    notifier: web::Data<Arc<dyn Notifier>>,
    path: web::Path<i64>,
    payload: Option<web::Json<DecideReq>>,
) -> Result<impl Responder, AppError> {
    decide(auth, pool, notifier, path, payload, true).await
}

/* =========================
Reject leave (manager/HR)
========================= */
/// Swagger doc for reject_leave endpoint
#[utoipa::path(
    put,
    path = "/api/v1/leave/{leave_id}/reject",
    params(("leave_id" = i64, Path, description = "ID of the leave request to reject")),
    request_body(content = DecideReq, description = "Optional rejection note, forwarded to the employee"),
    responses(
        (status = 200, description = "Leave rejected", body = DecideResponse),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Leave request not found"),
        (status = 409, description = "Already decided")
    ),
    security(("bearer_auth" = [])),
    tag = "Leave"
)]
pub async fn reject_leave(
    auth: AuthUser,
    pool: web::Data<SqlitePool>,
    notifier: web::Data<Arc<dyn Notifier>>,
    path: web::Path<i64>,
    payload: Option<web::Json<DecideReq>>,
) -> Result<impl Responder, AppError> {
    decide(auth, pool, notifier, path, payload, false).await
}

/// for getting a leave application details endpoint
#[utoipa::path(
    get,
    path = "/api/v1/leave/{leave_id}",
    params(("leave_id" = i64, Path, description = "ID of the leave request to fetch")),
    responses(
        (status = 200, description = "Leave request found", body = Object),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Leave request not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Leave"
)]
pub async fn get_leave(
    auth: AuthUser,
    pool: web::Data<SqlitePool>,
    path: web::Path<i64>,
) -> Result<impl Responder, AppError> {
    let leave: LeaveRequest = store::leave_requests::get_by_id(pool.get_ref(), path.into_inner())
        .await?
        .ok_or(AppError::NotFound("leave request"))?;

    // employees may only see their own requests
    if auth.role == Role::Employee && leave.employee_id != auth.user_id {
        return Err(AppError::Forbidden("not your request"));
    }

    Ok(HttpResponse::Ok().json(leave))
}

/// pending requests awaiting decision in the caller's department
#[utoipa::path(
    get,
    path = "/api/v1/leave/pending",
    responses(
        (status = 200, description = "Pending requests for the caller's department", body = [crate::store::leave_requests::LeaveWithEmployee]),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden")
    ),
    security(("bearer_auth" = [])),
    tag = "Leave"
)]
pub async fn pending_leave_list(
    auth: AuthUser,
    pool: web::Data<SqlitePool>,
) -> Result<impl Responder, AppError> {
    auth.require_manager_or_hr()?;

    let rows =
        store::leave_requests::list_pending_for_department(pool.get_ref(), &auth.department)
            .await?;

    Ok(HttpResponse::Ok().json(rows))
}

/// department listing, optionally narrowed to a date range (report feed)
#[utoipa::path(
    get,
    path = "/api/v1/leave",
    params(LeaveFilter),
    responses(
        (status = 200, description = "Requests for the department", body = [crate::store::leave_requests::LeaveWithEmployee]),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden")
    ),
    security(("bearer_auth" = [])),
    tag = "Leave"
)]
pub async fn leave_list(
    auth: AuthUser,
    pool: web::Data<SqlitePool>,
    query: web::Query<LeaveFilter>,
) -> Result<impl Responder, AppError> {
    auth.require_manager_or_hr()?;

    // HR can look across departments, managers only at their own
    let department = match (&query.department, auth.role) {
        (Some(dept), Role::Hr) => dept.as_str(),
        _ => auth.department.as_str(),
    };

    let range = overlap::validate_filter(query.from, query.to)?;

    let rows =
        store::leave_requests::list_for_department(pool.get_ref(), department, range).await?;

    Ok(HttpResponse::Ok().json(rows))
}

/// live overlap probe for the caller's own requests
#[utoipa::path(
    get,
    path = "/api/v1/overlap/employee",
    params(OverlapQuery),
    responses(
        (status = 200, description = "Overlap flag", body = Object, example = json!({"overlap": false})),
        (status = 400, description = "Invalid date range"),
        (status = 401, description = "Unauthorized")
    ),
    security(("bearer_auth" = [])),
    tag = "Leave"
)]
pub async fn employee_overlap(
    auth: AuthUser,
    pool: web::Data<SqlitePool>,
    query: web::Query<OverlapQuery>,
) -> Result<impl Responder, AppError> {
    let overlap =
        overlap::has_employee_overlap(pool.get_ref(), auth.user_id, query.start_date, query.end_date)
            .await?;

    Ok(HttpResponse::Ok().json(serde_json::json!({ "overlap": overlap })))
}

/// approved headcount already on leave in the caller's department
#[utoipa::path(
    get,
    path = "/api/v1/overlap/department",
    params(OverlapQuery),
    responses(
        (status = 200, description = "Approved overlapping count and the configured limit", body = Object,
         example = json!({"count": 1, "limit": 2})),
        (status = 400, description = "Invalid date range"),
        (status = 401, description = "Unauthorized")
    ),
    security(("bearer_auth" = [])),
    tag = "Leave"
)]
pub async fn department_overlap(
    auth: AuthUser,
    pool: web::Data<SqlitePool>,
    config: web::Data<Config>,
    query: web::Query<OverlapQuery>,
) -> Result<impl Responder, AppError> {
    let count = overlap::count_department_overlap(
        pool.get_ref(),
        &auth.department,
        query.start_date,
        query.end_date,
    )
    .await?;

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "count": count,
        "limit": config.dept_max_on_leave
    })))
}
