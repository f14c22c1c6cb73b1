//! Course domain model.
//!
//! # Responsibility
//! - Define the canonical course record and its create/patch inputs.
//!
//! # Invariants
//! - `credits` stays within `1..=6`.
//! - `color` is always a `#rrggbb` hex string.

use super::{require_id, require_text, ValidationError};
use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// Stable storage identifier for a course.
pub type CourseId = i64;

/// Color assigned to new courses when the caller does not pick one.
pub const DEFAULT_COURSE_COLOR: &str = "#2563eb";
/// Semester label assigned to new courses when the caller does not pick one.
pub const DEFAULT_SEMESTER: &str = "Fall 2024";
/// Credit hours assigned to new courses when the caller does not pick one.
pub const DEFAULT_CREDITS: u8 = 3;

const MIN_CREDITS: u8 = 1;
const MAX_CREDITS: u8 = 6;

static HEX_COLOR_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^#[0-9a-fA-F]{6}$").expect("valid hex color regex"));

/// Canonical course record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Course {
    pub id: CourseId,
    pub name: String,
    pub instructor: String,
    /// Free-form meeting schedule, e.g. `MWF 10:00-11:00`.
    pub schedule: String,
    pub color: String,
    pub semester: String,
    pub credits: u8,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub created_at: DateTime<Utc>,
}

impl Course {
    /// Validates field-level invariants.
    ///
    /// # Errors
    /// - Returns the first violated invariant.
    pub fn validate(&self) -> Result<(), ValidationError> {
        require_id("course id", self.id)?;
        validate_fields(&self.name, &self.color, self.credits)
    }

    /// Applies every populated field of `patch` onto this course.
    pub fn apply(&mut self, patch: &CoursePatch) {
        if let Some(name) = &patch.name {
            self.name = name.trim().to_string();
        }
        if let Some(instructor) = &patch.instructor {
            self.instructor = instructor.trim().to_string();
        }
        if let Some(schedule) = &patch.schedule {
            self.schedule = schedule.trim().to_string();
        }
        if let Some(color) = &patch.color {
            self.color = color.trim().to_string();
        }
        if let Some(semester) = &patch.semester {
            self.semester = semester.trim().to_string();
        }
        if let Some(credits) = patch.credits {
            self.credits = credits;
        }
    }
}

/// Input for creating a course. Storage assigns `id` and `created_at`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CourseDraft {
    pub name: String,
    pub instructor: String,
    pub schedule: String,
    pub color: String,
    pub semester: String,
    pub credits: u8,
}

impl CourseDraft {
    /// Creates a draft with default color, semester and credit hours.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            instructor: String::new(),
            schedule: String::new(),
            color: DEFAULT_COURSE_COLOR.to_string(),
            semester: DEFAULT_SEMESTER.to_string(),
            credits: DEFAULT_CREDITS,
        }
    }

    /// Validates the draft before it reaches storage.
    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_fields(&self.name, &self.color, self.credits)
    }
}

/// Partial course update. `None` leaves the stored value untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CoursePatch {
    pub name: Option<String>,
    pub instructor: Option<String>,
    pub schedule: Option<String>,
    pub color: Option<String>,
    pub semester: Option<String>,
    pub credits: Option<u8>,
}

fn validate_fields(name: &str, color: &str, credits: u8) -> Result<(), ValidationError> {
    require_text("course name", name)?;
    if !(MIN_CREDITS..=MAX_CREDITS).contains(&credits) {
        return Err(ValidationError::InvalidCredits(credits));
    }
    if !HEX_COLOR_RE.is_match(color) {
        return Err(ValidationError::InvalidColor(color.to_string()));
    }
    Ok(())
}
