use axum::{
    extract::Request,
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};

use crate::dtos::ErrorResponse;
use crate::models::Role;
use crate::services::Claims;

/// Role gates, layered after `auth_middleware` so verified claims are
/// already in the request extensions. A missing claim set means the layer
/// ordering is wrong and is treated as unauthenticated, not as allowed.
async fn require_role(allowed: &[Role], denial: &str, req: Request, next: Next) -> Response {
    match req.extensions().get::<Claims>() {
        Some(claims) if allowed.contains(&claims.role) => next.run(req).await,
        Some(_) => (
            StatusCode::FORBIDDEN,
            Json(ErrorResponse {
                error: denial.to_string(),
            }),
        )
            .into_response(),
        None => (
            StatusCode::UNAUTHORIZED,
            Json(ErrorResponse {
                error: "Authentication required".to_string(),
            }),
        )
            .into_response(),
    }
}

pub async fn require_admin(req: Request, next: Next) -> Response {
    require_role(
        &[Role::Admin],
        "Access denied. Admin role required.",
        req,
        next,
    )
    .await
}

pub async fn require_counselor(req: Request, next: Next) -> Response {
    require_role(
        &[Role::Counselor],
        "Access denied. Counselor role required.",
        req,
        next,
    )
    .await
}

pub async fn require_counselor_or_admin(req: Request, next: Next) -> Response {
    require_role(
        &[Role::Counselor, Role::Admin],
        "Access denied. Counselor or Admin role required.",
        req,
        next,
    )
    .await
}
