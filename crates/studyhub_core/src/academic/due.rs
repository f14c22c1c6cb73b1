//! Due-date classification.
//!
//! # Responsibility
//! - Bucket a due instant into completed/overdue/today/tomorrow/scheduled.
//! - Parse caller-supplied timestamps into UTC instants.
//!
//! # Invariants
//! - "Today" is the calendar day of `now` in `now`'s own timezone.
//! - An instant exactly at local midnight belongs to the day it starts.
//! - Classification is pure: identical inputs yield identical output.

use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};
use std::error::Error;
use std::fmt::{Display, Formatter};

const SCHEDULED_LABEL_FORMAT: &str = "%b %-d, %-I:%M %p";
const LOCAL_INPUT_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M"];

/// Bucket a due date falls into relative to "now".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DueStatus {
    Completed,
    Overdue,
    DueToday,
    DueTomorrow,
    Scheduled,
}

/// Presentation tone paired with each status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DueTone {
    Success,
    Danger,
    Warning,
    Orange,
    Neutral,
}

impl DueStatus {
    pub fn tone(self) -> DueTone {
        match self {
            Self::Completed => DueTone::Success,
            Self::Overdue => DueTone::Danger,
            Self::DueToday => DueTone::Warning,
            Self::DueTomorrow => DueTone::Orange,
            Self::Scheduled => DueTone::Neutral,
        }
    }
}

/// Status plus its human-readable label.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DueClassification {
    pub status: DueStatus,
    pub label: String,
}

/// Timestamp input could not be turned into an instant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DueDateError {
    InvalidInput(String),
}

impl Display for DueDateError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidInput(message) => write!(f, "invalid due timestamp: {message}"),
        }
    }
}

impl Error for DueDateError {}

/// Classifies a due instant against `now`.
///
/// Rules are evaluated in order: completed, overdue (due day before today),
/// due today, due tomorrow, otherwise scheduled with a formatted label such
/// as `Oct 5, 3:07 PM` rendered in `now`'s timezone.
pub fn classify_due<Tz>(due_at: DateTime<Utc>, completed: bool, now: &DateTime<Tz>) -> DueClassification
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    let status = due_status(due_at, completed, now);
    let label = match status {
        DueStatus::Completed => "Completed".to_string(),
        DueStatus::Overdue => "Overdue".to_string(),
        DueStatus::DueToday => "Due Today".to_string(),
        DueStatus::DueTomorrow => "Due Tomorrow".to_string(),
        DueStatus::Scheduled => due_at
            .with_timezone(&now.timezone())
            .format(SCHEDULED_LABEL_FORMAT)
            .to_string(),
    };
    DueClassification { status, label }
}

/// Status-only variant of [`classify_due`].
pub fn due_status<Tz: TimeZone>(due_at: DateTime<Utc>, completed: bool, now: &DateTime<Tz>) -> DueStatus {
    if completed {
        return DueStatus::Completed;
    }
    match day_offset(due_at, now) {
        offset if offset < 0 => DueStatus::Overdue,
        0 => DueStatus::DueToday,
        1 => DueStatus::DueTomorrow,
        _ => DueStatus::Scheduled,
    }
}

/// Returns whether a pending item is due before the start of `now`'s day.
pub fn is_overdue<Tz: TimeZone>(due_at: DateTime<Utc>, completed: bool, now: &DateTime<Tz>) -> bool {
    !completed && day_offset(due_at, now) < 0
}

/// Returns whether `due_at` falls on the same local calendar day as `now`.
pub fn is_same_day<Tz: TimeZone>(due_at: DateTime<Utc>, now: &DateTime<Tz>) -> bool {
    day_offset(due_at, now) == 0
}

/// Whole calendar days from `now`'s local date to `due_at`'s local date.
pub fn day_offset<Tz: TimeZone>(due_at: DateTime<Utc>, now: &DateTime<Tz>) -> i64 {
    let due_day = due_at.with_timezone(&now.timezone()).date_naive();
    (due_day - now.date_naive()).num_days()
}

/// Parses a due timestamp.
///
/// Accepts RFC 3339 (`2024-10-05T15:07:00Z`) or a local form such as
/// `2024-10-05T15:07`, which is interpreted in `tz`.
///
/// # Errors
/// - `InvalidInput` when the text matches no accepted form, or the local
///   time does not exist in `tz` (DST gap).
pub fn parse_due_timestamp<Tz: TimeZone>(input: &str, tz: &Tz) -> Result<DateTime<Utc>, DueDateError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(DueDateError::InvalidInput("timestamp is empty".to_string()));
    }
    if let Ok(parsed) = DateTime::parse_from_rfc3339(trimmed) {
        return Ok(parsed.with_timezone(&Utc));
    }

    let naive = LOCAL_INPUT_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(trimmed, format).ok())
        .ok_or_else(|| DueDateError::InvalidInput(format!("unrecognized timestamp `{trimmed}`")))?;

    tz.from_local_datetime(&naive)
        .earliest()
        .map(|local| local.with_timezone(&Utc))
        .ok_or_else(|| {
            DueDateError::InvalidInput(format!("local time `{trimmed}` does not exist in timezone"))
        })
}

/// Converts stored epoch milliseconds into an instant.
pub fn due_from_epoch_millis(millis: i64) -> Result<DateTime<Utc>, DueDateError> {
    DateTime::<Utc>::from_timestamp_millis(millis)
        .ok_or_else(|| DueDateError::InvalidInput(format!("epoch millis {millis} out of range")))
}

/// Parses then classifies a textual due timestamp.
pub fn classify_due_str<Tz>(input: &str, completed: bool, now: &DateTime<Tz>) -> Result<DueClassification, DueDateError>
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    let due_at = parse_due_timestamp(input, &now.timezone())?;
    Ok(classify_due(due_at, completed, now))
}

#[cfg(test)]
mod tests {
    use super::{
        classify_due, classify_due_str, due_from_epoch_millis, parse_due_timestamp, DueDateError,
        DueStatus, DueTone,
    };
    use chrono::{Duration, FixedOffset, TimeZone, Utc};

    fn eastern() -> FixedOffset {
        FixedOffset::west_opt(4 * 3600).unwrap()
    }

    #[test]
    fn completed_wins_over_everything() {
        let now = eastern().with_ymd_and_hms(2024, 10, 5, 12, 0, 0).unwrap();
        let long_ago = Utc.with_ymd_and_hms(2020, 1, 1, 0, 0, 0).unwrap();
        let result = classify_due(long_ago, true, &now);
        assert_eq!(result.status, DueStatus::Completed);
        assert_eq!(result.label, "Completed");
        assert_eq!(result.status.tone(), DueTone::Success);
    }

    #[test]
    fn earlier_same_day_is_due_today_not_overdue() {
        let now = eastern().with_ymd_and_hms(2024, 10, 5, 12, 0, 0).unwrap();
        let due = (now - Duration::seconds(1)).with_timezone(&Utc);
        let result = classify_due(due, false, &now);
        assert_eq!(result.status, DueStatus::DueToday);
        assert_eq!(result.label, "Due Today");
    }

    #[test]
    fn local_midnight_belongs_to_the_new_day() {
        let tz = eastern();
        let now = tz.with_ymd_and_hms(2024, 10, 5, 9, 0, 0).unwrap();
        let start_of_today = tz.with_ymd_and_hms(2024, 10, 5, 0, 0, 0).unwrap().with_timezone(&Utc);
        let start_of_tomorrow = tz.with_ymd_and_hms(2024, 10, 6, 0, 0, 0).unwrap().with_timezone(&Utc);

        assert_eq!(classify_due(start_of_today, false, &now).status, DueStatus::DueToday);
        assert_eq!(
            classify_due(start_of_today - Duration::milliseconds(1), false, &now).status,
            DueStatus::Overdue
        );
        assert_eq!(classify_due(start_of_tomorrow, false, &now).status, DueStatus::DueTomorrow);
    }

    #[test]
    fn day_boundaries_follow_the_callers_timezone() {
        // 02:00 UTC on Oct 6 is still Oct 5 in UTC-4.
        let due = Utc.with_ymd_and_hms(2024, 10, 6, 2, 0, 0).unwrap();
        let now_eastern = eastern().with_ymd_and_hms(2024, 10, 5, 8, 0, 0).unwrap();
        let now_utc = Utc.with_ymd_and_hms(2024, 10, 5, 12, 0, 0).unwrap();
        assert_eq!(classify_due(due, false, &now_eastern).status, DueStatus::DueToday);
        assert_eq!(classify_due(due, false, &now_utc).status, DueStatus::DueTomorrow);
    }

    #[test]
    fn scheduled_label_uses_short_month_and_twelve_hour_clock() {
        let tz = eastern();
        let now = tz.with_ymd_and_hms(2024, 10, 1, 9, 0, 0).unwrap();
        let due = tz.with_ymd_and_hms(2024, 10, 5, 15, 7, 0).unwrap().with_timezone(&Utc);
        let result = classify_due(due, false, &now);
        assert_eq!(result.status, DueStatus::Scheduled);
        assert_eq!(result.label, "Oct 5, 3:07 PM");

        let morning = tz.with_ymd_and_hms(2024, 11, 12, 0, 30, 0).unwrap().with_timezone(&Utc);
        assert_eq!(classify_due(morning, false, &now).label, "Nov 12, 12:30 AM");
    }

    #[test]
    fn parse_accepts_rfc3339_and_local_form() {
        let tz = eastern();
        let rfc = parse_due_timestamp("2024-10-05T19:07:00Z", &tz).unwrap();
        let local = parse_due_timestamp("2024-10-05T15:07", &tz).unwrap();
        assert_eq!(rfc, local);
    }

    #[test]
    fn malformed_input_is_invalid_input() {
        let now = Utc.with_ymd_and_hms(2024, 10, 5, 12, 0, 0).unwrap();
        let err = classify_due_str("next tuesday", false, &now).unwrap_err();
        assert!(matches!(err, DueDateError::InvalidInput(_)));
        assert!(parse_due_timestamp("   ", &Utc).is_err());
        assert!(due_from_epoch_millis(i64::MAX).is_err());
    }

    #[test]
    fn classification_is_idempotent() {
        let now = Utc.with_ymd_and_hms(2024, 10, 5, 12, 0, 0).unwrap();
        let due = Utc.with_ymd_and_hms(2024, 10, 20, 12, 0, 0).unwrap();
        assert_eq!(classify_due(due, false, &now), classify_due(due, false, &now));
    }
}
