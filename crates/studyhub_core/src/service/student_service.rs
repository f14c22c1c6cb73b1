//! Student roster use-case service.

use crate::model::student::{Student, StudentDraft, StudentId, StudentPatch};
use crate::model::ValidationError;
use crate::repo::student_repo::StudentRepository;
use crate::repo::{Entity, RepoError};
use log::info;
use std::error::Error;
use std::fmt::{Display, Formatter};

#[derive(Debug)]
pub enum StudentServiceError {
    Validation(ValidationError),
    StudentNotFound(StudentId),
    Repo(RepoError),
}

impl Display for StudentServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::StudentNotFound(id) => write!(f, "student not found: {id}"),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for StudentServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Repo(err) => Some(err),
            Self::StudentNotFound(_) => None,
        }
    }
}

impl From<RepoError> for StudentServiceError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::NotFound {
                entity: Entity::Student,
                id,
            } => Self::StudentNotFound(id),
            RepoError::Validation(err) => Self::Validation(err),
            other => Self::Repo(other),
        }
    }
}

impl From<ValidationError> for StudentServiceError {
    fn from(value: ValidationError) -> Self {
        Self::Validation(value)
    }
}

pub struct StudentService<S: StudentRepository> {
    repo: S,
}

impl<S: StudentRepository> StudentService<S> {
    pub fn new(repo: S) -> Self {
        Self { repo }
    }

    /// Lists students, newest first.
    pub fn list_students(&self) -> Result<Vec<Student>, StudentServiceError> {
        Ok(self.repo.list_students()?)
    }

    pub fn get_student(&self, id: StudentId) -> Result<Student, StudentServiceError> {
        self.repo
            .get_student(id)?
            .ok_or(StudentServiceError::StudentNotFound(id))
    }

    pub fn create_student(&self, draft: &StudentDraft) -> Result<Student, StudentServiceError> {
        let student = self.repo.create_student(draft)?;
        info!(
            "event=student_create module=service status=ok student_id={}",
            student.id
        );
        Ok(student)
    }

    pub fn update_student(
        &self,
        id: StudentId,
        patch: &StudentPatch,
    ) -> Result<Student, StudentServiceError> {
        let mut student = self.get_student(id)?;
        student.apply(patch);
        student.validate()?;
        self.repo.update_student(&student)?;
        info!("event=student_update module=service status=ok student_id={id}");
        Ok(student)
    }

    pub fn delete_student(&self, id: StudentId) -> Result<(), StudentServiceError> {
        self.repo.delete_student(id)?;
        info!("event=student_delete module=service status=ok student_id={id}");
        Ok(())
    }
}
