use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::api::leave_request::{CreateLeave, DecideReq, DecideResponse, LeaveFilter, OverlapQuery};
use crate::api::user::UserResponse;
use crate::model::audit_log::AuditLogEntry;
use crate::model::role::Role;
use crate::model::status::LeaveStatus;
use crate::models::{LoginReqDto, LoginResponse};
use crate::store::leave_requests::LeaveWithEmployee;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Leave Tracker API",
        version = "1.0.0",
        description = r#"
## Leave-Request Tracker

Internal leave management: employees submit time-off requests, managers
approve or reject them, every decision lands in an append-only audit log.

### 🔹 Key Features
- **Leave lifecycle** — submit, approve/reject (single-shot), fetch
- **Overlap validation** — per-employee conflicts and department headcount
- **Audit trail** — immutable log of every state-changing action
- **Attachments** — pdf/png/jpg/jpeg supporting documents

### 🔐 Security
All endpoints except login require **JWT Bearer authentication**.
Decisions and department views are limited to **manager** and **hr** roles.

---
Built with **Rust**, **Actix Web**, **SQLx**, and **Utoipa**.
"#,
    ),
    paths(
        crate::auth::handlers::login,
        crate::api::leave_request::create_leave,
        crate::api::leave_request::approve_leave,
        crate::api::leave_request::reject_leave,
        crate::api::leave_request::get_leave,
        crate::api::leave_request::pending_leave_list,
        crate::api::leave_request::leave_list,
        crate::api::leave_request::employee_overlap,
        crate::api::leave_request::department_overlap,
        crate::api::audit::audit_list,
        crate::api::user::get_user,
        crate::api::attachment::upload_attachment,
        crate::api::attachment::download_attachment,
    ),
    components(
        schemas(
            LoginReqDto,
            LoginResponse,
            CreateLeave,
            DecideReq,
            DecideResponse,
            LeaveFilter,
            OverlapQuery,
            LeaveWithEmployee,
            AuditLogEntry,
            UserResponse,
            Role,
            LeaveStatus
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Auth", description = "Authentication APIs"),
        (name = "Leave", description = "Leave lifecycle and overlap APIs"),
        (name = "Audit", description = "Audit trail APIs"),
        (name = "User", description = "User lookup APIs"),
        (name = "Attachment", description = "Attachment store APIs"),
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}
