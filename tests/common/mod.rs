use sqlx::SqlitePool;
use sqlx::sqlite::SqlitePoolOptions;

use leavetrack::auth::password::hash_password;
use leavetrack::db;
use leavetrack::model::{role::Role, user::User};
use leavetrack::store;

/// Fresh in-memory database with the schema applied. One connection so
/// every test sees the same database.
pub async fn test_pool() -> SqlitePool {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .expect("connect in-memory sqlite");

    sqlx::query("PRAGMA foreign_keys = ON;")
        .execute(&pool)
        .await
        .expect("enable foreign keys");

    db::init_schema(&pool).await.expect("create schema");

    pool
}

pub async fn seed_user(
    pool: &SqlitePool,
    username: &str,
    role: Role,
    department: &str,
    email: Option<&str>,
) -> User {
    let hashed = hash_password("pw").expect("hash");
    let id = store::users::create(pool, username, username, role, department, email, &hashed)
        .await
        .expect("insert user");

    store::users::get_by_id(pool, id)
        .await
        .expect("fetch user")
        .expect("user exists")
}

pub fn date(s: &str) -> chrono::NaiveDate {
    s.parse().expect("valid date")
}
