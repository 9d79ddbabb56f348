use actix_web::{HttpResponse, Responder, web};
use serde::Serialize;
use sqlx::SqlitePool;
use utoipa::ToSchema;

use crate::auth::auth::AuthUser;
use crate::error::AppError;
use crate::model::role::Role;
use crate::model::user::User;
use crate::store;

/// Profile view of a user. The credential hash never leaves the store
/// boundary.
#[derive(Serialize, ToSchema)]
pub struct UserResponse {
    #[schema(example = 42)]
    pub id: i64,
    #[schema(example = "nva")]
    pub username: String,
    #[schema(example = "Nguyen Van A")]
    pub name: String,
    #[schema(example = "employee")]
    pub role: Role,
    #[schema(example = "Khoa A")]
    pub department: String,
    pub email: Option<String>,
}

impl From<User> for UserResponse {
    fn from(u: User) -> Self {
        Self {
            id: u.id,
            username: u.username,
            name: u.name,
            role: u.role,
            department: u.department,
            email: u.email,
        }
    }
}

/// Swagger doc for get_user endpoint
#[utoipa::path(
    get,
    path = "/api/v1/users/{user_id}",
    params(("user_id" = i64, Path, description = "ID of the user to fetch")),
    responses(
        (status = 200, description = "User found", body = UserResponse),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "User not found")
    ),
    security(("bearer_auth" = [])),
    tag = "User"
)]
pub async fn get_user(
    auth: AuthUser,
    pool: web::Data<SqlitePool>,
    path: web::Path<i64>,
) -> Result<impl Responder, AppError> {
    let id = path.into_inner();

    // callers may fetch themselves, managers/hr anyone
    if id != auth.user_id {
        auth.require_manager_or_hr()?;
    }

    let user = store::users::get_by_id(pool.get_ref(), id)
        .await?
        .ok_or(AppError::NotFound("user"))?;

    Ok(HttpResponse::Ok().json(UserResponse::from(user)))
}
