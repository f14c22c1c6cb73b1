//! Remote record shapes and their canonical conversions.
//!
//! # Responsibility
//! - Deserialize records as the hosted record store returns them
//!   (`*_c` custom fields, `Id`/`Name` system fields).
//! - Normalize them into canonical model records at the boundary.
//!
//! # Invariants
//! - A course reference may arrive as a bare id, a numeric string or a
//!   lookup object `{ "Id": n, "Name": ... }`; business logic only ever sees
//!   a `CourseId`.
//! - A graded but pending remote assignment is normalized to completed.

use crate::academic::due::{parse_due_timestamp, DueDateError};
use crate::model::assignment::{normalize_description, Assignment, Priority, DEFAULT_WEIGHT};
use crate::model::course::{Course, CourseId, DEFAULT_COURSE_COLOR, DEFAULT_CREDITS};
use crate::model::student::{split_tags, Student};
use crate::model::ValidationError;
use chrono::{DateTime, TimeZone, Utc};
use log::warn;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// A remote record could not be normalized.
#[derive(Debug)]
pub enum AdapterError {
    /// The record store reported failure.
    Remote(String),
    /// A course reference did not resolve to an id.
    InvalidCourseRef(String),
    InvalidPriority(String),
    InvalidTimestamp(DueDateError),
    Validation(ValidationError),
    Json(serde_json::Error),
}

impl Display for AdapterError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Remote(message) => write!(f, "record store error: {message}"),
            Self::InvalidCourseRef(value) => write!(f, "invalid course reference `{value}`"),
            Self::InvalidPriority(value) => write!(f, "invalid priority `{value}`"),
            Self::InvalidTimestamp(err) => write!(f, "{err}"),
            Self::Validation(err) => write!(f, "{err}"),
            Self::Json(err) => write!(f, "malformed record payload: {err}"),
        }
    }
}

impl Error for AdapterError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::InvalidTimestamp(err) => Some(err),
            Self::Validation(err) => Some(err),
            Self::Json(err) => Some(err),
            _ => None,
        }
    }
}

impl From<DueDateError> for AdapterError {
    fn from(value: DueDateError) -> Self {
        Self::InvalidTimestamp(value)
    }
}

impl From<ValidationError> for AdapterError {
    fn from(value: ValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<serde_json::Error> for AdapterError {
    fn from(value: serde_json::Error) -> Self {
        Self::Json(value)
    }
}

/// Course reference in any of the shapes the record store emits.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RemoteCourseRef {
    Id(i64),
    Text(String),
    Lookup {
        #[serde(rename = "Id")]
        id: i64,
        #[serde(rename = "Name", default)]
        name: Option<String>,
    },
}

impl RemoteCourseRef {
    /// Resolves the reference to a bare course id.
    pub fn course_id(&self) -> Result<CourseId, AdapterError> {
        let id = match self {
            Self::Id(id) | Self::Lookup { id, .. } => *id,
            Self::Text(text) => text
                .trim()
                .parse::<CourseId>()
                .map_err(|_| AdapterError::InvalidCourseRef(text.clone()))?,
        };
        if id <= 0 {
            return Err(AdapterError::InvalidCourseRef(id.to_string()));
        }
        Ok(id)
    }
}

/// Assignment as stored remotely.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteAssignment {
    #[serde(rename = "Id")]
    pub id: i64,
    #[serde(rename = "course_id_c", alias = "courseId")]
    pub course: RemoteCourseRef,
    #[serde(rename = "title_c", alias = "title")]
    pub title: String,
    #[serde(rename = "description_c", alias = "description", default)]
    pub description: Option<String>,
    #[serde(rename = "due_date_c", alias = "dueDate")]
    pub due_date: String,
    #[serde(rename = "priority_c", alias = "priority", default)]
    pub priority: Option<String>,
    #[serde(rename = "weight_c", alias = "weight", default)]
    pub weight: Option<u8>,
    #[serde(rename = "completed_c", alias = "completed", default)]
    pub completed: Option<bool>,
    #[serde(rename = "grade_c", alias = "grade", default)]
    pub grade: Option<u8>,
    #[serde(rename = "CreatedOn", alias = "createdAt", default)]
    pub created_on: Option<String>,
}

impl RemoteAssignment {
    /// Normalizes into a canonical assignment.
    ///
    /// Local-form due dates are interpreted in `tz`. Missing priority defaults
    /// to medium and missing weight to the default weight.
    pub fn into_canonical<Tz: TimeZone>(self, tz: &Tz) -> Result<Assignment, AdapterError> {
        let course_id = self.course.course_id()?;
        let priority = match self.priority.as_deref().map(str::trim) {
            None | Some("") => Priority::Medium,
            Some(value) => value
                .parse::<Priority>()
                .map_err(|_| AdapterError::InvalidPriority(value.to_string()))?,
        };

        let mut completed = self.completed.unwrap_or(false);
        if self.grade.is_some() && !completed {
            warn!(
                "event=record_normalize module=record status=adjusted entity=assignment id={} reason=graded_while_pending",
                self.id
            );
            completed = true;
        }

        let assignment = Assignment {
            id: self.id,
            course_id,
            title: self.title.trim().to_string(),
            description: normalize_description(self.description),
            due_at: parse_due_timestamp(&self.due_date, tz)?,
            priority,
            weight: self.weight.unwrap_or(DEFAULT_WEIGHT),
            completed,
            grade: self.grade,
            created_at: parse_created_on(self.created_on.as_deref(), tz),
        };
        assignment.validate()?;
        Ok(assignment)
    }
}

/// Course as stored remotely.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteCourse {
    #[serde(rename = "Id")]
    pub id: i64,
    #[serde(rename = "name_c", alias = "name", alias = "Name")]
    pub name: String,
    #[serde(rename = "instructor_c", alias = "instructor", default)]
    pub instructor: Option<String>,
    #[serde(rename = "schedule_c", alias = "schedule", default)]
    pub schedule: Option<String>,
    #[serde(rename = "color_c", alias = "color", default)]
    pub color: Option<String>,
    #[serde(rename = "semester_c", alias = "semester", default)]
    pub semester: Option<String>,
    #[serde(rename = "credits_c", alias = "credits", default)]
    pub credits: Option<u8>,
    #[serde(rename = "CreatedOn", alias = "createdAt", default)]
    pub created_on: Option<String>,
}

impl RemoteCourse {
    pub fn into_canonical<Tz: TimeZone>(self, tz: &Tz) -> Result<Course, AdapterError> {
        let text = |value: Option<String>| value.map(|v| v.trim().to_string()).unwrap_or_default();
        let course = Course {
            id: self.id,
            name: self.name.trim().to_string(),
            instructor: text(self.instructor),
            schedule: text(self.schedule),
            color: self
                .color
                .map(|color| color.trim().to_string())
                .filter(|color| !color.is_empty())
                .unwrap_or_else(|| DEFAULT_COURSE_COLOR.to_string()),
            semester: text(self.semester),
            credits: self.credits.unwrap_or(DEFAULT_CREDITS),
            created_at: parse_created_on(self.created_on.as_deref(), tz),
        };
        course.validate()?;
        Ok(course)
    }
}

/// Student as stored remotely. `Tags` is a comma-separated string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteStudent {
    #[serde(rename = "Id")]
    pub id: i64,
    #[serde(rename = "Name", default)]
    pub name: Option<String>,
    #[serde(rename = "Tags", default)]
    pub tags: Option<String>,
    #[serde(rename = "first_name_c", default)]
    pub first_name: Option<String>,
    #[serde(rename = "last_name_c", default)]
    pub last_name: Option<String>,
    #[serde(rename = "email_c", default)]
    pub email: Option<String>,
}

impl RemoteStudent {
    pub fn into_canonical(self) -> Result<Student, AdapterError> {
        let text = |value: Option<String>| value.map(|v| v.trim().to_string()).unwrap_or_default();
        let student = Student {
            id: self.id,
            name: text(self.name),
            tags: self.tags.as_deref().map(split_tags).unwrap_or_default(),
            first_name: text(self.first_name),
            last_name: text(self.last_name),
            email: text(self.email),
        };
        student.validate()?;
        Ok(student)
    }
}

/// Per-record outcome in a bulk create/update/delete response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordResult<T> {
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub data: Option<T>,
}

/// Response envelope returned by every record store call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordEnvelope<T> {
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub data: Option<T>,
    #[serde(default)]
    pub results: Option<Vec<RecordResult<T>>>,
}

impl<T> RecordEnvelope<T> {
    /// Unwraps the payload, surfacing the first reported failure as an error.
    ///
    /// Bulk responses yield the first result's data; plain responses yield
    /// `data`.
    pub fn into_result(self) -> Result<Option<T>, AdapterError> {
        if !self.success {
            return Err(AdapterError::Remote(
                self.message.unwrap_or_else(|| "request failed".to_string()),
            ));
        }
        match self.results {
            Some(results) => {
                if let Some(failed) = results.iter().find(|result| !result.success) {
                    return Err(AdapterError::Remote(
                        failed
                            .message
                            .clone()
                            .unwrap_or_else(|| "record operation failed".to_string()),
                    ));
                }
                Ok(results.into_iter().next().and_then(|result| result.data))
            }
            None => Ok(self.data),
        }
    }
}

fn parse_created_on<Tz: TimeZone>(value: Option<&str>, tz: &Tz) -> DateTime<Utc> {
    value
        .and_then(|text| parse_due_timestamp(text, tz).ok())
        .unwrap_or_else(Utc::now)
}

#[cfg(test)]
mod tests {
    use super::{AdapterError, RecordEnvelope, RemoteAssignment, RemoteCourse, RemoteCourseRef};
    use chrono::{TimeZone, Utc};
    use serde_json::json;

    #[test]
    fn course_ref_accepts_every_shape() {
        let shapes = [json!(4), json!("4"), json!({ "Id": 4, "Name": "Calculus" })];
        for shape in shapes {
            let course_ref: RemoteCourseRef = serde_json::from_value(shape).unwrap();
            assert_eq!(course_ref.course_id().unwrap(), 4);
        }
        let bad: RemoteCourseRef = serde_json::from_value(json!("abc")).unwrap();
        assert!(matches!(bad.course_id(), Err(AdapterError::InvalidCourseRef(_))));
    }

    #[test]
    fn graded_pending_assignment_is_completed() {
        let remote: RemoteAssignment = serde_json::from_value(json!({
            "Id": 7,
            "course_id_c": { "Id": 2, "Name": "Biology" },
            "title_c": "Quiz 1",
            "due_date_c": "2024-10-05T15:00:00Z",
            "priority_c": "high",
            "weight_c": 15,
            "completed_c": false,
            "grade_c": 88
        }))
        .unwrap();
        let assignment = remote.into_canonical(&Utc).unwrap();
        assert_eq!(assignment.course_id, 2);
        assert!(assignment.completed);
        assert_eq!(assignment.grade, Some(88));
        assert_eq!(
            assignment.due_at,
            Utc.with_ymd_and_hms(2024, 10, 5, 15, 0, 0).unwrap()
        );
    }

    #[test]
    fn legacy_camel_case_fields_are_accepted() {
        let remote: RemoteAssignment = serde_json::from_value(json!({
            "Id": 1,
            "courseId": 3,
            "title": "Essay",
            "dueDate": "2024-11-01T09:30",
            "priority": "low"
        }))
        .unwrap();
        let assignment = remote.into_canonical(&Utc).unwrap();
        assert_eq!(assignment.course_id, 3);
        assert_eq!(assignment.weight, 10);
        assert!(!assignment.completed);
    }

    #[test]
    fn malformed_due_date_is_rejected() {
        let remote: RemoteAssignment = serde_json::from_value(json!({
            "Id": 1,
            "course_id_c": 1,
            "title_c": "Essay",
            "due_date_c": "someday"
        }))
        .unwrap();
        assert!(matches!(
            remote.into_canonical(&Utc),
            Err(AdapterError::InvalidTimestamp(_))
        ));
    }

    #[test]
    fn course_defaults_fill_missing_fields() {
        let remote: RemoteCourse =
            serde_json::from_value(json!({ "Id": 5, "name_c": "History" })).unwrap();
        let course = remote.into_canonical(&Utc).unwrap();
        assert_eq!(course.color, "#2563eb");
        assert_eq!(course.credits, 3);
    }

    #[test]
    fn envelope_surfaces_first_failed_result() {
        let envelope: RecordEnvelope<serde_json::Value> = serde_json::from_value(json!({
            "success": true,
            "results": [
                { "success": false, "message": "Name is required" }
            ]
        }))
        .unwrap();
        let err = envelope.into_result().unwrap_err();
        assert_eq!(err.to_string(), "record store error: Name is required");

        let envelope: RecordEnvelope<i64> =
            serde_json::from_value(json!({ "success": false, "message": "denied" })).unwrap();
        assert!(envelope.into_result().is_err());
    }
}
