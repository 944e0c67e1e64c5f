use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::{DeityPrayer, SadhanaReport};
use crate::services::DateFilter;

#[derive(Debug, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct SubmitReportRequest {
    pub date: NaiveDate,

    #[validate(length(min = 1, message = "Wakeup time is required"))]
    pub wakeup_time: String,

    #[validate(length(min = 1, message = "Bed time is required"))]
    pub bed_time: String,

    #[serde(default)]
    pub chanting_rounds: i32,

    #[serde(default)]
    pub book_reading_minutes: i32,

    #[serde(default)]
    pub deity_prayer: DeityPrayer,

    #[serde(default)]
    pub lecture_by: Vec<String>,

    #[serde(default)]
    pub hearing_minutes: i32,

    #[serde(default)]
    pub individual_vows: String,
}

/// Date filtering for report listings. A single `date` wins over a
/// `start_date`/`end_date` range when both are supplied; accepting both is
/// idempotent so a client sending stale range params alongside a date pick
/// still gets the single-date result.
#[derive(Debug, Default, Deserialize)]
pub struct ReportQuery {
    pub date: Option<NaiveDate>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

impl ReportQuery {
    pub fn date_filter(&self) -> DateFilter {
        if let Some(date) = self.date {
            DateFilter::On(date)
        } else if self.start_date.is_some() || self.end_date.is_some() {
            DateFilter::Between(self.start_date, self.end_date)
        } else {
            DateFilter::Any
        }
    }
}

// Query extraction goes through serde_urlencoded, which cannot handle
// #[serde(flatten)], so the date fields are repeated here instead of
// embedding ReportQuery.
#[derive(Debug, Default, Deserialize)]
pub struct PaginatedReportQuery {
    pub date: Option<NaiveDate>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub limit: Option<i64>,
    pub skip: Option<u64>,
}

impl PaginatedReportQuery {
    pub fn date_filter(&self) -> DateFilter {
        ReportQuery {
            date: self.date,
            start_date: self.start_date,
            end_date: self.end_date,
        }
        .date_filter()
    }
}

#[derive(Debug, Serialize)]
pub struct ReportResponse {
    pub id: String,
    pub user_id: String,
    pub date: NaiveDate,
    pub wakeup_time: String,
    pub bed_time: String,
    pub chanting_rounds: i32,
    pub book_reading_minutes: i32,
    pub deity_prayer: DeityPrayer,
    pub lecture_by: Vec<String>,
    pub hearing_minutes: i32,
    pub individual_vows: String,
    pub submitted_at: DateTime<Utc>,
}

impl From<SadhanaReport> for ReportResponse {
    fn from(r: SadhanaReport) -> Self {
        Self {
            id: r.id,
            user_id: r.user_id,
            date: r.date,
            wakeup_time: r.wakeup_time,
            bed_time: r.bed_time,
            chanting_rounds: r.chanting_rounds,
            book_reading_minutes: r.book_reading_minutes,
            deity_prayer: r.deity_prayer,
            lecture_by: r.lecture_by,
            hearing_minutes: r.hearing_minutes,
            individual_vows: r.individual_vows,
            submitted_at: r.submitted_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct SubmitReportResponse {
    pub msg: String,
    pub report: ReportSummary,
}

#[derive(Debug, Serialize)]
pub struct ReportSummary {
    pub id: String,
    pub date: NaiveDate,
    pub submitted_at: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct PaginatedReportsResponse {
    pub reports: Vec<ReportResponse>,
    pub total: u64,
    pub limit: i64,
    pub skip: u64,
}
