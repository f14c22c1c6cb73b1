//! Canonical domain model for courses, assignments and students.
//!
//! # Responsibility
//! - Define the strongly-typed record shapes consumed by business logic.
//! - Own field-level validation shared by every repository backing.
//!
//! # Invariants
//! - Identifiers are positive integers assigned by storage.
//! - Records are validated before persistence and after read-back.

use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod assignment;
pub mod course;
pub mod student;

/// Field-level validation failure for any canonical record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// A required text field is blank after trim.
    BlankField(&'static str),
    /// Identifier or reference is not a positive integer.
    InvalidId { field: &'static str, value: i64 },
    /// Assignment weight outside `1..=100`.
    InvalidWeight(u8),
    /// Grade percentage outside `0..=100`.
    InvalidGrade(u8),
    /// Course credit hours outside `1..=6`.
    InvalidCredits(u8),
    /// Display color is not a `#rrggbb` hex string.
    InvalidColor(String),
    /// Student email does not look like an address.
    InvalidEmail(String),
    /// A grade is present on an assignment that is still pending.
    GradeWithoutCompletion,
}

impl Display for ValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::BlankField(field) => write!(f, "{field} must not be blank"),
            Self::InvalidId { field, value } => {
                write!(f, "{field} must be a positive integer, got {value}")
            }
            Self::InvalidWeight(value) => write!(f, "weight must be within 1..=100, got {value}"),
            Self::InvalidGrade(value) => write!(f, "grade must be within 0..=100, got {value}"),
            Self::InvalidCredits(value) => write!(f, "credits must be within 1..=6, got {value}"),
            Self::InvalidColor(value) => write!(f, "color must be a #rrggbb hex string, got `{value}`"),
            Self::InvalidEmail(value) => write!(f, "invalid email address `{value}`"),
            Self::GradeWithoutCompletion => {
                write!(f, "graded assignments must be marked completed")
            }
        }
    }
}

impl Error for ValidationError {}

pub(crate) fn require_text(field: &'static str, value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::BlankField(field));
    }
    Ok(())
}

pub(crate) fn require_id(field: &'static str, value: i64) -> Result<(), ValidationError> {
    if value <= 0 {
        return Err(ValidationError::InvalidId { field, value });
    }
    Ok(())
}
