use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use service_core::error::AppError;

use crate::dtos::reports::{
    PaginatedReportQuery, PaginatedReportsResponse, ReportQuery, ReportResponse, ReportSummary,
    SubmitReportRequest, SubmitReportResponse,
};
use crate::middleware::AuthUser;
use crate::models::{Role, SadhanaReport};
use crate::services::policy;
use crate::startup::AppState;
use crate::utils::ValidatedJson;

/// Roster report listings and the admin feed are capped to keep responses
/// bounded; `skip` pages through the rest.
const DEFAULT_REPORT_LIMIT: i64 = 100;

/// Submit a sadhana report for the authenticated user. Out-of-range
/// numeric fields are clamped, not rejected.
pub async fn submit_report(
    State(state): State<AppState>,
    AuthUser(claims): AuthUser,
    ValidatedJson(req): ValidatedJson<SubmitReportRequest>,
) -> Result<impl IntoResponse, AppError> {
    let report = SadhanaReport::new(
        claims.sub.clone(),
        req.date,
        req.wakeup_time,
        req.bed_time,
        req.chanting_rounds,
        req.book_reading_minutes,
        req.deity_prayer,
        req.lecture_by,
        req.hearing_minutes,
        req.individual_vows,
    );

    state.stores.reports.insert(&report).await?;

    tracing::info!(user_id = %claims.sub, date = %report.date, "sadhana report submitted");

    Ok((
        StatusCode::CREATED,
        Json(SubmitReportResponse {
            msg: "Sadhana report submitted successfully".to_string(),
            report: ReportSummary {
                id: report.id,
                date: report.date,
                submitted_at: report.submitted_at,
            },
        }),
    ))
}

/// The caller's own reports, newest first.
pub async fn my_reports(
    State(state): State<AppState>,
    AuthUser(claims): AuthUser,
    Query(query): Query<ReportQuery>,
) -> Result<impl IntoResponse, AppError> {
    let reports = state
        .stores
        .reports
        .list_for_user(&claims.sub, query.date_filter())
        .await?;

    Ok(Json(to_responses(reports)))
}

/// One account's reports, readable by the owner, the owner's counselor,
/// or an admin.
pub async fn user_reports(
    State(state): State<AppState>,
    AuthUser(claims): AuthUser,
    Path(user_id): Path<String>,
    Query(query): Query<ReportQuery>,
) -> Result<impl IntoResponse, AppError> {
    // A user-role caller may only ever read their own reports, so deny a
    // mismatched id before touching the store. 403-ing first keeps them
    // from probing which account ids exist.
    if claims.role == Role::User && claims.sub != user_id {
        return Err(AppError::Forbidden(anyhow::anyhow!(
            "Not authorized to view these reports"
        )));
    }

    let target = state
        .stores
        .users
        .find_by_id(&user_id)
        .await?
        .ok_or_else(|| AppError::NotFound(anyhow::anyhow!("User not found")))?;

    if !policy::can_view_reports(&claims, &target) {
        return Err(AppError::Forbidden(anyhow::anyhow!(
            "Not authorized to view these reports"
        )));
    }

    let reports = state
        .stores
        .reports
        .list_for_user(&user_id, query.date_filter())
        .await?;

    Ok(Json(to_responses(reports)))
}

/// Reports across the counselor's whole roster, newest first.
pub async fn roster_reports(
    State(state): State<AppState>,
    AuthUser(claims): AuthUser,
    Query(query): Query<ReportQuery>,
) -> Result<impl IntoResponse, AppError> {
    let roster = state.stores.users.list_by_counselor(&claims.sub).await?;
    let ids: Vec<String> = roster.into_iter().map(|u| u.id).collect();

    let reports = state
        .stores
        .reports
        .list_for_users(&ids, query.date_filter(), DEFAULT_REPORT_LIMIT)
        .await?;

    Ok(Json(to_responses(reports)))
}

/// Paginated feed of every report in the system. Admin only.
pub async fn all_reports(
    State(state): State<AppState>,
    Query(query): Query<PaginatedReportQuery>,
) -> Result<impl IntoResponse, AppError> {
    // Zero and negative limits mean different things to different stores
    // (Mongo treats 0 as unlimited), so clamp to a sane page size.
    let limit = query
        .limit
        .unwrap_or(DEFAULT_REPORT_LIMIT)
        .clamp(1, DEFAULT_REPORT_LIMIT);
    let skip = query.skip.unwrap_or(0);

    let (reports, total) = state
        .stores
        .reports
        .list_all(query.date_filter(), limit, skip)
        .await?;

    Ok(Json(PaginatedReportsResponse {
        reports: to_responses(reports),
        total,
        limit,
        skip,
    }))
}

fn to_responses(reports: Vec<SadhanaReport>) -> Vec<ReportResponse> {
    reports.into_iter().map(ReportResponse::from).collect()
}
