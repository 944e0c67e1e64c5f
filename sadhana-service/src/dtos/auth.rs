use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::dtos::users::SanitizedUser;
use crate::models::Role;

/// Public self-registration. The created account is always `Role::User`;
/// privileged roles can only be assigned through the authenticated
/// create-user operation.
#[derive(Debug, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct RegisterRequest {
    #[validate(length(min = 1, message = "Name is required"))]
    pub name: String,

    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub password: String,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct LoginRequest {
    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

/// Privileged account creation by an admin or counselor.
#[derive(Debug, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct CreateUserRequest {
    #[validate(length(min = 1, message = "Name is required"))]
    pub name: String,

    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub password: String,

    pub role: Option<Role>,

    pub counselor_id: Option<String>,
}

/// Token plus non-secret account fields, returned by register and login.
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub token: String,
    pub user: SanitizedUser,
}

#[derive(Debug, Serialize)]
pub struct CreateUserResponse {
    pub msg: String,
    pub user: SanitizedUser,
}
