//! Course use-case service.
//!
//! # Responsibility
//! - Provide course create/update/get/list/delete entry points.
//! - Cascade course deletion to the course's assignments.
//!
//! # Invariants
//! - A deleted course leaves no assignments behind, whatever the backing.

use crate::model::course::{Course, CourseDraft, CourseId, CoursePatch};
use crate::model::ValidationError;
use crate::repo::assignment_repo::AssignmentRepository;
use crate::repo::course_repo::CourseRepository;
use crate::repo::{Entity, RepoError};
use log::info;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Service error for course use-cases.
#[derive(Debug)]
pub enum CourseServiceError {
    Validation(ValidationError),
    CourseNotFound(CourseId),
    Repo(RepoError),
}

impl Display for CourseServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::CourseNotFound(id) => write!(f, "course not found: {id}"),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for CourseServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Repo(err) => Some(err),
            Self::CourseNotFound(_) => None,
        }
    }
}

impl From<RepoError> for CourseServiceError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::NotFound {
                entity: Entity::Course,
                id,
            } => Self::CourseNotFound(id),
            RepoError::Validation(err) => Self::Validation(err),
            other => Self::Repo(other),
        }
    }
}

impl From<ValidationError> for CourseServiceError {
    fn from(value: ValidationError) -> Self {
        Self::Validation(value)
    }
}

/// Course service facade over repository implementations.
pub struct CourseService<C: CourseRepository, A: AssignmentRepository> {
    courses: C,
    assignments: A,
}

impl<C: CourseRepository, A: AssignmentRepository> CourseService<C, A> {
    pub fn new(courses: C, assignments: A) -> Self {
        Self {
            courses,
            assignments,
        }
    }

    pub fn list_courses(&self) -> Result<Vec<Course>, CourseServiceError> {
        Ok(self.courses.list_courses()?)
    }

    /// Gets one course, failing with `CourseNotFound` when absent.
    pub fn get_course(&self, id: CourseId) -> Result<Course, CourseServiceError> {
        self.courses
            .get_course(id)?
            .ok_or(CourseServiceError::CourseNotFound(id))
    }

    pub fn create_course(&self, draft: &CourseDraft) -> Result<Course, CourseServiceError> {
        let course = self.courses.create_course(draft)?;
        info!(
            "event=course_create module=service status=ok course_id={} credits={}",
            course.id, course.credits
        );
        Ok(course)
    }

    /// Applies a partial update and returns the stored result.
    pub fn update_course(
        &self,
        id: CourseId,
        patch: &CoursePatch,
    ) -> Result<Course, CourseServiceError> {
        let mut course = self.get_course(id)?;
        course.apply(patch);
        course.validate()?;
        self.courses.update_course(&course)?;
        info!("event=course_update module=service status=ok course_id={id}");
        Ok(course)
    }

    /// Deletes a course and every assignment that references it.
    ///
    /// Returns the number of assignments removed.
    pub fn delete_course(&self, id: CourseId) -> Result<usize, CourseServiceError> {
        self.get_course(id)?;
        let removed = self.assignments.delete_assignments_for_course(id)?;
        self.courses.delete_course(id)?;
        info!(
            "event=course_delete module=service status=ok course_id={id} assignments_removed={removed}"
        );
        Ok(removed)
    }
}
