use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::models::{Role, User};

/// User view returned by the API. The password hash never leaves the store
/// layer through this type.
#[derive(Debug, Clone, Serialize)]
pub struct SanitizedUser {
    pub id: String,
    pub name: String,
    pub email: String,
    pub role: Role,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub counselor: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<User> for SanitizedUser {
    fn from(u: User) -> Self {
        Self {
            id: u.id,
            name: u.name,
            email: u.email,
            role: u.role,
            counselor: u.counselor,
            created_at: u.created_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct DeleteUserResponse {
    pub msg: String,
}
