use axum::{
    extract::{Path, State},
    response::IntoResponse,
    Json,
};
use service_core::error::AppError;

use crate::dtos::users::{DeleteUserResponse, SanitizedUser};
use crate::middleware::AuthUser;
use crate::services::policy::{self, UserListingScope};
use crate::startup::AppState;

/// List accounts, scoped by the caller's role: admins see everyone,
/// counselors see their own roster, regular users see nothing.
pub async fn list_users(
    State(state): State<AppState>,
    AuthUser(claims): AuthUser,
) -> Result<impl IntoResponse, AppError> {
    let users = match policy::user_listing_scope(claims.role) {
        UserListingScope::All => state.stores.users.list_all().await?,
        UserListingScope::Roster => {
            state.stores.users.list_by_counselor(&claims.sub).await?
        }
        UserListingScope::Denied => {
            return Err(AppError::Forbidden(anyhow::anyhow!(
                "Not authorized to list users"
            )));
        }
    };

    let users: Vec<SanitizedUser> = users.into_iter().map(SanitizedUser::from).collect();
    Ok(Json(users))
}

/// Delete an account by id. Admin only; an admin cannot delete itself.
pub async fn delete_user(
    State(state): State<AppState>,
    AuthUser(claims): AuthUser,
    Path(user_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    if user_id == claims.sub {
        return Err(AppError::BadRequest(anyhow::anyhow!(
            "Admins cannot delete their own account"
        )));
    }

    if !state.stores.users.delete(&user_id).await? {
        return Err(AppError::NotFound(anyhow::anyhow!("User not found")));
    }

    tracing::info!(user_id = %user_id, deleted_by = %claims.sub, "user deleted");

    Ok(Json(DeleteUserResponse {
        msg: "User removed".to_string(),
    }))
}
