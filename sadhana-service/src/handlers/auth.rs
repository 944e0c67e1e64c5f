use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use service_core::error::AppError;

use crate::dtos::auth::{CreateUserRequest, CreateUserResponse, LoginRequest, RegisterRequest};
use crate::dtos::users::SanitizedUser;
use crate::middleware::AuthUser;
use crate::models::Role;
use crate::startup::AppState;
use crate::utils::ValidatedJson;

/// Register a new user. Public; the account is always role `user`.
pub async fn register(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<RegisterRequest>,
) -> Result<impl IntoResponse, AppError> {
    let res = state.auth.register(req).await?;
    Ok((StatusCode::OK, Json(res)))
}

/// Login with email and password.
pub async fn login(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<LoginRequest>,
) -> Result<impl IntoResponse, AppError> {
    let res = state.auth.login(req).await?;
    Ok((StatusCode::OK, Json(res)))
}

/// Create an account with a caller-determined role and counselor
/// assignment. Admin and counselor only; the policy layer decides what each
/// may produce.
pub async fn create_user(
    State(state): State<AppState>,
    AuthUser(claims): AuthUser,
    ValidatedJson(req): ValidatedJson<CreateUserRequest>,
) -> Result<impl IntoResponse, AppError> {
    let user = state.auth.create_user(&claims, req).await?;
    Ok((
        StatusCode::OK,
        Json(CreateUserResponse {
            msg: "User created successfully".to_string(),
            user,
        }),
    ))
}

/// All counselor accounts, for the admin assignment dropdown.
pub async fn list_counselors(
    State(state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    let counselors = state.stores.users.list_by_role(Role::Counselor).await?;
    let counselors: Vec<SanitizedUser> =
        counselors.into_iter().map(SanitizedUser::from).collect();
    Ok(Json(counselors))
}
