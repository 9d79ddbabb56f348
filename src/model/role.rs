use serde::{Deserialize, Serialize};
use strum_macros::Display;
use utoipa::ToSchema;

#[derive(
    Debug, Copy, Clone, Eq, PartialEq, Serialize, Deserialize, Display, sqlx::Type, ToSchema,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum Role {
    Employee,
    Manager,
    Hr,
}

impl Role {
    /// Managers and HR can decide requests and see department-wide data.
    pub fn can_decide(&self) -> bool {
        matches!(self, Role::Manager | Role::Hr)
    }
}
