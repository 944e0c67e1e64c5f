//! Sadhana report model - dated self-reports submitted by user-role accounts.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub const CHANTING_ROUNDS_MAX: i32 = 100;
pub const READING_MINUTES_MAX: i32 = 180;
pub const HEARING_MINUTES_MAX: i32 = 120;

/// Whether deity prayer was offered. Empty means not recorded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum DeityPrayer {
    Yes,
    No,
    #[default]
    #[serde(rename = "")]
    NotRecorded,
}

/// A single day's sadhana report.
///
/// Reports are owned by exactly one account, are never edited or deleted
/// after submission, and clamp their numeric fields to the schema ranges.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SadhanaReport {
    #[serde(rename = "_id")]
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
    #[serde(with = "mongodb::bson::serde_helpers::chrono_datetime_as_bson_datetime")]
    pub submitted_at: DateTime<Utc>,
    #[serde(with = "mongodb::bson::serde_helpers::chrono_datetime_as_bson_datetime")]
    pub created_at: DateTime<Utc>,
}

impl SadhanaReport {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        user_id: String,
        date: NaiveDate,
        wakeup_time: String,
        bed_time: String,
        chanting_rounds: i32,
        book_reading_minutes: i32,
        deity_prayer: DeityPrayer,
        lecture_by: Vec<String>,
        hearing_minutes: i32,
        individual_vows: String,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4().to_string(),
            user_id,
            date,
            wakeup_time,
            bed_time,
            chanting_rounds: chanting_rounds.clamp(0, CHANTING_ROUNDS_MAX),
            book_reading_minutes: book_reading_minutes.clamp(0, READING_MINUTES_MAX),
            deity_prayer,
            lecture_by,
            hearing_minutes: hearing_minutes.clamp(0, HEARING_MINUTES_MAX),
            individual_vows,
            submitted_at: now,
            created_at: now,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn report(chanting: i32, reading: i32, hearing: i32) -> SadhanaReport {
        SadhanaReport::new(
            "user_1".to_string(),
            NaiveDate::from_ymd_opt(2024, 6, 1).unwrap(),
            "04:30".to_string(),
            "21:30".to_string(),
            chanting,
            reading,
            DeityPrayer::Yes,
            vec!["HG Speaker".to_string()],
            hearing,
            "early rising".to_string(),
        )
    }

    #[test]
    fn numeric_fields_are_clamped_to_schema_ranges() {
        let r = report(150, 300, 500);
        assert_eq!(r.chanting_rounds, 100);
        assert_eq!(r.book_reading_minutes, 180);
        assert_eq!(r.hearing_minutes, 120);

        let r = report(-5, -1, -10);
        assert_eq!(r.chanting_rounds, 0);
        assert_eq!(r.book_reading_minutes, 0);
        assert_eq!(r.hearing_minutes, 0);
    }

    #[test]
    fn in_range_values_pass_through() {
        let r = report(16, 30, 45);
        assert_eq!(r.chanting_rounds, 16);
        assert_eq!(r.book_reading_minutes, 30);
        assert_eq!(r.hearing_minutes, 45);
    }

    #[test]
    fn deity_prayer_empty_string_round_trips() {
        assert_eq!(
            serde_json::to_string(&DeityPrayer::NotRecorded).unwrap(),
            "\"\""
        );
        assert_eq!(
            serde_json::from_str::<DeityPrayer>("\"Yes\"").unwrap(),
            DeityPrayer::Yes
        );
    }
}
