use serde::{Deserialize, Serialize};

use crate::model::role::Role;

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub name: String,
    pub role: Role,
    pub department: String,
    pub email: Option<String>,
    pub password_hash: String,
}
