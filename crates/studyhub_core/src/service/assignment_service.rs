//! Assignment use-case service.
//!
//! # Responsibility
//! - Provide assignment CRUD plus the completion/grading lifecycle.
//! - Serve filtered and sorted assignment lists.
//!
//! # Invariants
//! - Assignments only reference existing courses.
//! - Grading completes an assignment; reopening clears its grade.

use crate::academic::filter::{filter_and_sort, AssignmentFilter, SortKey};
use crate::model::assignment::{Assignment, AssignmentDraft, AssignmentId, AssignmentPatch};
use crate::model::course::CourseId;
use crate::model::ValidationError;
use crate::repo::assignment_repo::AssignmentRepository;
use crate::repo::course_repo::CourseRepository;
use crate::repo::{Entity, RepoError};
use chrono::{DateTime, TimeZone};
use log::info;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Service error for assignment use-cases.
#[derive(Debug)]
pub enum AssignmentServiceError {
    Validation(ValidationError),
    AssignmentNotFound(AssignmentId),
    /// The referenced course does not exist.
    CourseNotFound(CourseId),
    Repo(RepoError),
}

impl Display for AssignmentServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::AssignmentNotFound(id) => write!(f, "assignment not found: {id}"),
            Self::CourseNotFound(id) => write!(f, "course not found: {id}"),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for AssignmentServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Repo(err) => Some(err),
            _ => None,
        }
    }
}

impl From<RepoError> for AssignmentServiceError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::NotFound {
                entity: Entity::Assignment,
                id,
            } => Self::AssignmentNotFound(id),
            RepoError::NotFound {
                entity: Entity::Course,
                id,
            } => Self::CourseNotFound(id),
            RepoError::Validation(err) => Self::Validation(err),
            other => Self::Repo(other),
        }
    }
}

impl From<ValidationError> for AssignmentServiceError {
    fn from(value: ValidationError) -> Self {
        Self::Validation(value)
    }
}

/// Assignment service facade over repository implementations.
pub struct AssignmentService<A: AssignmentRepository, C: CourseRepository> {
    assignments: A,
    courses: C,
}

impl<A: AssignmentRepository, C: CourseRepository> AssignmentService<A, C> {
    pub fn new(assignments: A, courses: C) -> Self {
        Self {
            assignments,
            courses,
        }
    }

    pub fn list_assignments(&self) -> Result<Vec<Assignment>, AssignmentServiceError> {
        Ok(self.assignments.list_assignments()?)
    }

    pub fn list_for_course(
        &self,
        course_id: CourseId,
    ) -> Result<Vec<Assignment>, AssignmentServiceError> {
        Ok(self.assignments.list_assignments_for_course(course_id)?)
    }

    /// Lists assignments matching `filter`, ordered by `sort`.
    pub fn list_filtered<Tz: TimeZone>(
        &self,
        filter: &AssignmentFilter,
        sort: SortKey,
        now: &DateTime<Tz>,
    ) -> Result<Vec<Assignment>, AssignmentServiceError> {
        let assignments = self.assignments.list_assignments()?;
        let courses = self.courses.list_courses()?;
        Ok(filter_and_sort(&assignments, filter, sort, &courses, now))
    }

    pub fn get_assignment(&self, id: AssignmentId) -> Result<Assignment, AssignmentServiceError> {
        self.assignments
            .get_assignment(id)?
            .ok_or(AssignmentServiceError::AssignmentNotFound(id))
    }

    /// Creates a pending, ungraded assignment under an existing course.
    pub fn create_assignment(
        &self,
        draft: &AssignmentDraft,
    ) -> Result<Assignment, AssignmentServiceError> {
        draft.validate()?;
        self.require_course(draft.course_id)?;
        let assignment = self.assignments.create_assignment(draft)?;
        info!(
            "event=assignment_create module=service status=ok assignment_id={} course_id={}",
            assignment.id, assignment.course_id
        );
        Ok(assignment)
    }

    /// Applies a partial update to descriptive fields.
    pub fn update_assignment(
        &self,
        id: AssignmentId,
        patch: &AssignmentPatch,
    ) -> Result<Assignment, AssignmentServiceError> {
        let mut assignment = self.get_assignment(id)?;
        if let Some(course_id) = patch.course_id {
            self.require_course(course_id)?;
        }
        assignment.apply(patch);
        self.store(assignment, "assignment_update")
    }

    /// Flips completion. Reopening a graded assignment drops its grade.
    pub fn toggle_complete(&self, id: AssignmentId) -> Result<Assignment, AssignmentServiceError> {
        let mut assignment = self.get_assignment(id)?;
        assignment.toggle_completed();
        self.store(assignment, "assignment_toggle")
    }

    /// Records a grade, completing the assignment.
    pub fn record_grade(
        &self,
        id: AssignmentId,
        grade: u8,
    ) -> Result<Assignment, AssignmentServiceError> {
        let mut assignment = self.get_assignment(id)?;
        assignment.record_grade(grade)?;
        self.store(assignment, "assignment_grade")
    }

    pub fn clear_grade(&self, id: AssignmentId) -> Result<Assignment, AssignmentServiceError> {
        let mut assignment = self.get_assignment(id)?;
        assignment.clear_grade();
        self.store(assignment, "assignment_grade_clear")
    }

    pub fn delete_assignment(&self, id: AssignmentId) -> Result<(), AssignmentServiceError> {
        self.assignments.delete_assignment(id)?;
        info!("event=assignment_delete module=service status=ok assignment_id={id}");
        Ok(())
    }

    fn require_course(&self, course_id: CourseId) -> Result<(), AssignmentServiceError> {
        match self.courses.get_course(course_id)? {
            Some(_) => Ok(()),
            None => Err(AssignmentServiceError::CourseNotFound(course_id)),
        }
    }

    fn store(
        &self,
        assignment: Assignment,
        event: &'static str,
    ) -> Result<Assignment, AssignmentServiceError> {
        self.assignments.update_assignment(&assignment)?;
        info!(
            "event={event} module=service status=ok assignment_id={} completed={} graded={}",
            assignment.id,
            assignment.completed,
            assignment.is_graded()
        );
        Ok(assignment)
    }
}
