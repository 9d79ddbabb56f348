use actix_web::{HttpResponse, Responder, web};
use serde::Deserialize;
use utoipa::IntoParams;

use crate::auth::auth::AuthUser;
use crate::error::AppError;
use crate::service::attachment::AttachmentStore;

#[derive(Deserialize, IntoParams)]
pub struct UploadQuery {
    /// Original filename; only its extension matters (pdf/png/jpg/jpeg)
    pub filename: String,
}

/// Swagger doc for upload_attachment endpoint
#[utoipa::path(
    post,
    path = "/api/v1/attachments",
    params(UploadQuery),
    request_body(content = Vec<u8>, description = "Raw file bytes", content_type = "application/octet-stream"),
    responses(
        (status = 200, description = "Stored", body = Object, example = json!({"reference": "nva/7f9d.pdf"})),
        (status = 400, description = "Disallowed file type"),
        (status = 401, description = "Unauthorized")
    ),
    security(("bearer_auth" = [])),
    tag = "Attachment"
)]
pub async fn upload_attachment(
    auth: AuthUser,
    store: web::Data<AttachmentStore>,
    query: web::Query<UploadQuery>,
    body: web::Bytes,
) -> Result<impl Responder, AppError> {
    let reference = store.save(&auth.username, &query.filename, &body)?;

    Ok(HttpResponse::Ok().json(serde_json::json!({ "reference": reference })))
}

/// Swagger doc for download_attachment endpoint
#[utoipa::path(
    get,
    path = "/api/v1/attachments/{reference}",
    params(("reference" = String, Path, description = "Reference returned at upload time")),
    responses(
        (status = 200, description = "File bytes", content_type = "application/octet-stream"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Attachment not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Attachment"
)]
pub async fn download_attachment(
    _auth: AuthUser,
    store: web::Data<AttachmentStore>,
    path: web::Path<String>,
) -> Result<impl Responder, AppError> {
    let bytes = store.load(&path.into_inner())?;

    Ok(HttpResponse::Ok()
        .content_type("application/octet-stream")
        .body(bytes))
}
