//! Assignment domain model.
//!
//! # Responsibility
//! - Define the canonical assignment record and its create/patch inputs.
//! - Own the completion/grade lifecycle helpers.
//!
//! # Invariants
//! - `weight` stays within `1..=100`; `grade` within `0..=100`.
//! - A graded assignment is always completed. Grading completes it and
//!   reopening clears the grade.

use super::course::CourseId;
use super::{require_id, require_text, ValidationError};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// Stable storage identifier for an assignment.
pub type AssignmentId = i64;

/// Weight assigned to new assignments when the caller does not pick one.
pub const DEFAULT_WEIGHT: u8 = 10;

const MAX_WEIGHT: u8 = 100;
const MAX_GRADE: u8 = 100;

/// Assignment urgency as chosen by the student.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    Low,
    Medium,
    High,
}

impl Priority {
    /// Stable lowercase wire/storage name.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }

    /// Sort rank, higher is more urgent.
    pub fn rank(self) -> u8 {
        match self {
            Self::Low => 1,
            Self::Medium => 2,
            Self::High => 3,
        }
    }
}

impl Display for Priority {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Priority {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "low" => Ok(Self::Low),
            "medium" => Ok(Self::Medium),
            "high" => Ok(Self::High),
            other => Err(format!(
                "unsupported priority `{other}`; expected low|medium|high"
            )),
        }
    }
}

/// Canonical assignment record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Assignment {
    pub id: AssignmentId,
    pub course_id: CourseId,
    pub title: String,
    pub description: Option<String>,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub due_at: DateTime<Utc>,
    pub priority: Priority,
    /// Integer percentage contribution to the course grade.
    pub weight: u8,
    pub completed: bool,
    /// Score percentage, present only once the assignment is graded.
    pub grade: Option<u8>,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub created_at: DateTime<Utc>,
}

impl Assignment {
    /// Validates field-level and lifecycle invariants.
    ///
    /// # Errors
    /// - Returns the first violated invariant.
    pub fn validate(&self) -> Result<(), ValidationError> {
        require_id("assignment id", self.id)?;
        require_id("course id", self.course_id)?;
        require_text("assignment title", &self.title)?;
        validate_weight(self.weight)?;
        if let Some(grade) = self.grade {
            if grade > MAX_GRADE {
                return Err(ValidationError::InvalidGrade(grade));
            }
            if !self.completed {
                return Err(ValidationError::GradeWithoutCompletion);
            }
        }
        Ok(())
    }

    /// Returns whether a score has been recorded.
    pub fn is_graded(&self) -> bool {
        self.grade.is_some()
    }

    /// Records a score and marks the assignment completed.
    pub fn record_grade(&mut self, grade: u8) -> Result<(), ValidationError> {
        if grade > MAX_GRADE {
            return Err(ValidationError::InvalidGrade(grade));
        }
        self.grade = Some(grade);
        self.completed = true;
        Ok(())
    }

    /// Removes a recorded score, keeping the completion flag.
    pub fn clear_grade(&mut self) {
        self.grade = None;
    }

    /// Flips the completion flag. Reopening drops any recorded score.
    pub fn toggle_completed(&mut self) {
        if self.completed {
            self.completed = false;
            self.grade = None;
        } else {
            self.completed = true;
        }
    }

    /// Applies every populated field of `patch` onto this assignment.
    pub fn apply(&mut self, patch: &AssignmentPatch) {
        if let Some(course_id) = patch.course_id {
            self.course_id = course_id;
        }
        if let Some(title) = &patch.title {
            self.title = title.trim().to_string();
        }
        if let Some(description) = &patch.description {
            self.description = normalize_description(description.clone());
        }
        if let Some(due_at) = patch.due_at {
            self.due_at = due_at;
        }
        if let Some(priority) = patch.priority {
            self.priority = priority;
        }
        if let Some(weight) = patch.weight {
            self.weight = weight;
        }
    }
}

/// Input for creating an assignment.
///
/// New assignments always start pending and ungraded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssignmentDraft {
    pub course_id: CourseId,
    pub title: String,
    pub description: Option<String>,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub due_at: DateTime<Utc>,
    pub priority: Priority,
    pub weight: u8,
}

impl AssignmentDraft {
    /// Creates a draft with medium priority and the default weight.
    pub fn new(course_id: CourseId, title: impl Into<String>, due_at: DateTime<Utc>) -> Self {
        Self {
            course_id,
            title: title.into(),
            description: None,
            due_at,
            priority: Priority::Medium,
            weight: DEFAULT_WEIGHT,
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        require_id("course id", self.course_id)?;
        require_text("assignment title", &self.title)?;
        validate_weight(self.weight)
    }
}

/// Partial assignment update. `None` leaves the stored value untouched.
///
/// `description: Some(None)` clears the description. Completion and grade are
/// changed through the dedicated lifecycle operations only.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AssignmentPatch {
    pub course_id: Option<CourseId>,
    pub title: Option<String>,
    pub description: Option<Option<String>>,
    pub due_at: Option<DateTime<Utc>>,
    pub priority: Option<Priority>,
    pub weight: Option<u8>,
}

/// Collapses blank descriptions to `None`.
pub fn normalize_description(description: Option<String>) -> Option<String> {
    description
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

fn validate_weight(weight: u8) -> Result<(), ValidationError> {
    if weight == 0 || weight > MAX_WEIGHT {
        return Err(ValidationError::InvalidWeight(weight));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{Assignment, Priority, ValidationError};
    use chrono::{TimeZone, Utc};

    fn sample() -> Assignment {
        Assignment {
            id: 1,
            course_id: 2,
            title: "Lab report".to_string(),
            description: None,
            due_at: Utc.with_ymd_and_hms(2024, 10, 5, 15, 7, 0).unwrap(),
            priority: Priority::High,
            weight: 20,
            completed: false,
            grade: None,
            created_at: Utc.with_ymd_and_hms(2024, 9, 1, 0, 0, 0).unwrap(),
        }
    }

    #[test]
    fn grading_forces_completion() {
        let mut assignment = sample();
        assignment.record_grade(91).unwrap();
        assert!(assignment.completed);
        assert_eq!(assignment.grade, Some(91));
        assert!(assignment.validate().is_ok());
    }

    #[test]
    fn reopening_drops_grade() {
        let mut assignment = sample();
        assignment.record_grade(75).unwrap();
        assignment.toggle_completed();
        assert!(!assignment.completed);
        assert_eq!(assignment.grade, None);
    }

    #[test]
    fn pending_grade_is_rejected() {
        let mut assignment = sample();
        assignment.grade = Some(80);
        assert_eq!(
            assignment.validate().unwrap_err(),
            ValidationError::GradeWithoutCompletion
        );
    }

    #[test]
    fn weight_bounds_are_enforced() {
        let mut assignment = sample();
        assignment.weight = 0;
        assert_eq!(assignment.validate().unwrap_err(), ValidationError::InvalidWeight(0));
        assignment.weight = 101;
        assert_eq!(assignment.validate().unwrap_err(), ValidationError::InvalidWeight(101));
    }

    #[test]
    fn priority_parses_lowercase_names_only() {
        assert_eq!("high".parse::<Priority>().unwrap(), Priority::High);
        assert!("High".parse::<Priority>().is_err());
        assert!(Priority::High.rank() > Priority::Low.rank());
    }
}
