use actix_web::{HttpResponse, Responder, web};
use sqlx::SqlitePool;
use tracing::{debug, info, instrument};

use crate::auth::jwt::generate_access_token;
use crate::auth::password::verify_password;
use crate::config::Config;
use crate::error::AppError;
use crate::model::user::User;
use crate::models::{LoginReqDto, LoginResponse};
use crate::store;

/// Check a username/password pair against the store. Returns the user on
/// success, `None` on unknown username or wrong password; the two cases
/// are indistinguishable to the caller.
pub async fn authenticate(
    pool: &SqlitePool,
    username: &str,
    password: &str,
) -> Result<Option<User>, AppError> {
    let Some(user) = store::users::get_by_username(pool, username).await? else {
        return Ok(None);
    };

    match verify_password(password, &user.password_hash) {
        Ok(()) => Ok(Some(user)),
        Err(_) => Ok(None),
    }
}

/// Swagger doc for login endpoint
#[utoipa::path(
    post,
    path = "/auth/login",
    request_body = LoginReqDto,
    responses(
        (status = 200, description = "Authenticated", body = LoginResponse),
        (status = 401, description = "Invalid credentials")
    ),
    tag = "Auth"
)]
#[instrument(name = "auth_login", skip(pool, config, payload), fields(username = %payload.username))]
pub async fn login(
    payload: web::Json<LoginReqDto>,
    pool: web::Data<SqlitePool>,
    config: web::Data<Config>,
) -> Result<impl Responder, AppError> {
    info!("Login request received");

    if payload.username.trim().is_empty() || payload.password.is_empty() {
        return Err(AppError::Validation(
            "username and password are required".into(),
        ));
    }

    let user = authenticate(pool.get_ref(), &payload.username, &payload.password)
        .await?
        .ok_or(AppError::Auth)?;

    debug!(user_id = user.id, "Password verified");

    let access_token = generate_access_token(&user, &config.jwt_secret, config.access_token_ttl)
        .map_err(|e| {
            tracing::error!(error = %e, "Failed to sign access token");
            AppError::Auth
        })?;

    info!("Login successful");

    Ok(HttpResponse::Ok().json(LoginResponse { access_token }))
}
