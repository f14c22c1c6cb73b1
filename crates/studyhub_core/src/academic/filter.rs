//! Assignment list filtering and sorting.
//!
//! # Responsibility
//! - Evaluate an assignment against an active filter set.
//! - Order filtered lists by the selected sort key.
//!
//! # Invariants
//! - Active filter keys combine with AND semantics.
//! - Absent keys and empty values impose no constraint.
//! - Sorting is stable.

use super::due::is_overdue;
use crate::model::assignment::{Assignment, Priority};
use crate::model::course::{Course, CourseId};
use chrono::{DateTime, TimeZone};
use std::cmp::Ordering;
use std::collections::HashMap;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// Completion-state constraint of a filter set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusFilter {
    Completed,
    Pending,
    /// Pending and due before the start of the current day.
    Overdue,
}

impl StatusFilter {
    /// Parses a status value; unknown values yield `None`.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "completed" => Some(Self::Completed),
            "pending" => Some(Self::Pending),
            "overdue" => Some(Self::Overdue),
            _ => None,
        }
    }
}

/// A filter value could not be interpreted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterError {
    InvalidFilterValue { key: &'static str, value: String },
    InvalidSortKey(String),
}

impl Display for FilterError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidFilterValue { key, value } => {
                write!(f, "invalid value `{value}` for filter `{key}`")
            }
            Self::InvalidSortKey(value) => {
                write!(f, "unsupported sort key `{value}`; expected dueDate|priority|course|title")
            }
        }
    }
}

impl Error for FilterError {}

/// Active filter set for assignment lists.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AssignmentFilter {
    pub course_id: Option<CourseId>,
    pub priority: Option<Priority>,
    pub status: Option<StatusFilter>,
}

impl AssignmentFilter {
    /// Builds a filter from string key/value pairs as submitted by a filter bar.
    ///
    /// Recognized keys: `courseId` (or `course_id`), `priority`, `status`.
    /// Unknown keys are ignored, empty values impose no constraint and an
    /// unknown status value imposes no constraint.
    ///
    /// # Errors
    /// - `InvalidFilterValue` when a course id or priority cannot be parsed.
    pub fn from_pairs<'a, I>(pairs: I) -> Result<Self, FilterError>
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let mut filter = Self::default();
        for (key, value) in pairs {
            let value = value.trim();
            if value.is_empty() {
                continue;
            }
            match key {
                "courseId" | "course_id" => {
                    let course_id = value.parse::<CourseId>().map_err(|_| {
                        FilterError::InvalidFilterValue {
                            key: "courseId",
                            value: value.to_string(),
                        }
                    })?;
                    filter.course_id = Some(course_id);
                }
                "priority" => {
                    let priority = value.parse::<Priority>().map_err(|_| {
                        FilterError::InvalidFilterValue {
                            key: "priority",
                            value: value.to_string(),
                        }
                    })?;
                    filter.priority = Some(priority);
                }
                "status" => filter.status = StatusFilter::parse(value),
                _ => {}
            }
        }
        Ok(filter)
    }

    /// Returns whether no key constrains the list.
    pub fn is_empty(&self) -> bool {
        self.course_id.is_none() && self.priority.is_none() && self.status.is_none()
    }

    /// Evaluates the filter against one assignment.
    pub fn matches<Tz: TimeZone>(&self, assignment: &Assignment, now: &DateTime<Tz>) -> bool {
        if self
            .course_id
            .is_some_and(|course_id| assignment.course_id != course_id)
        {
            return false;
        }
        if self
            .priority
            .is_some_and(|priority| assignment.priority != priority)
        {
            return false;
        }
        match self.status {
            None => true,
            Some(StatusFilter::Completed) => assignment.completed,
            Some(StatusFilter::Pending) => !assignment.completed,
            Some(StatusFilter::Overdue) => {
                is_overdue(assignment.due_at, assignment.completed, now)
            }
        }
    }
}

/// Sort order for assignment lists.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortKey {
    /// Earliest due first.
    #[default]
    DueDate,
    /// High priority first.
    Priority,
    /// Course name, case-insensitive.
    Course,
    /// Title, case-insensitive.
    Title,
}

impl FromStr for SortKey {
    type Err = FilterError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "dueDate" | "due_date" | "due" => Ok(Self::DueDate),
            "priority" => Ok(Self::Priority),
            "course" => Ok(Self::Course),
            "title" => Ok(Self::Title),
            other => Err(FilterError::InvalidSortKey(other.to_string())),
        }
    }
}

/// Sorts assignments in place.
///
/// `courses` resolves course names for [`SortKey::Course`]; unknown course
/// ids sort as an empty name.
pub fn sort_assignments(assignments: &mut [Assignment], key: SortKey, courses: &[Course]) {
    match key {
        SortKey::DueDate => assignments.sort_by_key(|assignment| assignment.due_at),
        SortKey::Priority => {
            assignments.sort_by(|a, b| b.priority.rank().cmp(&a.priority.rank()));
        }
        SortKey::Course => {
            let names = courses
                .iter()
                .map(|course| (course.id, course.name.to_lowercase()))
                .collect::<HashMap<_, _>>();
            assignments.sort_by(|a, b| {
                let name_a = names.get(&a.course_id).map_or("", String::as_str);
                let name_b = names.get(&b.course_id).map_or("", String::as_str);
                name_a.cmp(name_b)
            });
        }
        SortKey::Title => assignments.sort_by(|a, b| compare_text(&a.title, &b.title)),
    }
}

/// Applies `filter` and then sorts the survivors by `key`.
pub fn filter_and_sort<Tz: TimeZone>(
    assignments: &[Assignment],
    filter: &AssignmentFilter,
    key: SortKey,
    courses: &[Course],
    now: &DateTime<Tz>,
) -> Vec<Assignment> {
    let mut selected = assignments
        .iter()
        .filter(|assignment| filter.matches(assignment, now))
        .cloned()
        .collect::<Vec<_>>();
    sort_assignments(&mut selected, key, courses);
    selected
}

fn compare_text(a: &str, b: &str) -> Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| a.cmp(b))
}

#[cfg(test)]
mod tests {
    use super::{filter_and_sort, AssignmentFilter, FilterError, SortKey, StatusFilter};
    use crate::model::assignment::{Assignment, Priority};
    use crate::model::course::Course;
    use chrono::{DateTime, Duration, TimeZone, Utc};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 10, 5, 12, 0, 0).unwrap()
    }

    fn assignment(id: i64, course_id: i64, title: &str, due_in_days: i64) -> Assignment {
        Assignment {
            id,
            course_id,
            title: title.to_string(),
            description: None,
            due_at: now() + Duration::days(due_in_days),
            priority: Priority::Medium,
            weight: 10,
            completed: false,
            grade: None,
            created_at: now(),
        }
    }

    fn course(id: i64, name: &str) -> Course {
        Course {
            id,
            name: name.to_string(),
            instructor: String::new(),
            schedule: String::new(),
            color: "#2563eb".to_string(),
            semester: "Fall 2024".to_string(),
            credits: 3,
            created_at: now(),
        }
    }

    #[test]
    fn empty_filter_matches_everything() {
        let filter = AssignmentFilter::default();
        assert!(filter.is_empty());
        assert!(filter.matches(&assignment(1, 1, "a", -3), &now()));
    }

    #[test]
    fn overdue_filter_excludes_completed_past_items() {
        let filter = AssignmentFilter {
            status: Some(StatusFilter::Overdue),
            ..AssignmentFilter::default()
        };
        let mut done = assignment(1, 1, "done", -2);
        done.completed = true;
        assert!(!filter.matches(&done, &now()));
        assert!(filter.matches(&assignment(2, 1, "late", -2), &now()));
        assert!(!filter.matches(&assignment(3, 1, "today", 0), &now()));
    }

    #[test]
    fn keys_combine_with_and() {
        let filter = AssignmentFilter {
            course_id: Some(1),
            priority: Some(Priority::High),
            status: Some(StatusFilter::Pending),
        };
        let mut hit = assignment(1, 1, "hit", 3);
        hit.priority = Priority::High;
        let mut wrong_course = hit.clone();
        wrong_course.course_id = 2;
        let mut completed = hit.clone();
        completed.completed = true;

        assert!(filter.matches(&hit, &now()));
        assert!(!filter.matches(&wrong_course, &now()));
        assert!(!filter.matches(&completed, &now()));
    }

    #[test]
    fn matching_is_idempotent() {
        let filter = AssignmentFilter {
            course_id: Some(1),
            priority: None,
            status: Some(StatusFilter::Overdue),
        };
        let late = assignment(1, 1, "late", -1);
        let later = assignment(2, 1, "later", 2);
        for item in [&late, &later] {
            assert_eq!(filter.matches(item, &now()), filter.matches(item, &now()));
        }
        assert!(filter.matches(&late, &now()));
        assert!(!filter.matches(&later, &now()));
    }

    #[test]
    fn from_pairs_ignores_unknown_keys_and_empty_values() {
        let filter = AssignmentFilter::from_pairs([
            ("courseId", "3"),
            ("priority", ""),
            ("color", "red"),
            ("status", "archived"),
        ])
        .unwrap();
        assert_eq!(
            filter,
            AssignmentFilter {
                course_id: Some(3),
                priority: None,
                status: None,
            }
        );

        let err = AssignmentFilter::from_pairs([("priority", "urgent")]).unwrap_err();
        assert!(matches!(err, FilterError::InvalidFilterValue { key: "priority", .. }));
    }

    #[test]
    fn sorts_by_each_key() {
        let courses = vec![course(1, "physics"), course(2, "Algebra")];
        let mut urgent = assignment(1, 1, "beta", 5);
        urgent.priority = Priority::High;
        let items = vec![urgent, assignment(2, 2, "Alpha", 1), assignment(3, 1, "gamma", 3)];
        let filter = AssignmentFilter::default();

        let ids = |key: SortKey| {
            filter_and_sort(&items, &filter, key, &courses, &now())
                .iter()
                .map(|a| a.id)
                .collect::<Vec<_>>()
        };
        assert_eq!(ids(SortKey::DueDate), vec![2, 3, 1]);
        assert_eq!(ids(SortKey::Priority), vec![1, 2, 3]);
        assert_eq!(ids(SortKey::Course), vec![2, 1, 3]);
        assert_eq!(ids(SortKey::Title), vec![2, 1, 3]);
    }

    #[test]
    fn sort_key_parses_form_values() {
        assert_eq!("dueDate".parse::<SortKey>().unwrap(), SortKey::DueDate);
        assert!("color".parse::<SortKey>().is_err());
    }
}
