//! In-memory repository backings.
//!
//! # Responsibility
//! - Back every repository contract with owned, process-local state.
//! - Mirror the SQLite backing's ordering and validation behavior.
//!
//! # Invariants
//! - State lives inside the repository value; nothing is module-global.
//! - New ids are `max(existing) + 1`, starting at 1.
//! - Values are not `Sync`; share them by reference within one thread.

use super::assignment_repo::AssignmentRepository;
use super::course_repo::CourseRepository;
use super::student_repo::StudentRepository;
use super::{storage_now, Entity, RepoError, RepoResult};
use crate::model::assignment::{normalize_description, Assignment, AssignmentDraft, AssignmentId};
use crate::model::course::{Course, CourseDraft, CourseId};
use crate::model::student::{normalize_tags, Student, StudentDraft, StudentId};
use std::cell::RefCell;

fn next_id(ids: impl Iterator<Item = i64>) -> i64 {
    ids.max().unwrap_or(0) + 1
}

fn not_found(entity: Entity, id: i64) -> RepoError {
    RepoError::NotFound { entity, id }
}

/// Course repository backed by a `Vec`.
#[derive(Debug, Default)]
pub struct InMemoryCourseRepository {
    rows: RefCell<Vec<Course>>,
}

impl InMemoryCourseRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds the repository with already-identified courses.
    ///
    /// # Errors
    /// - Returns the first validation failure among `courses`.
    pub fn with_courses(courses: Vec<Course>) -> RepoResult<Self> {
        for course in &courses {
            course.validate()?;
        }
        Ok(Self {
            rows: RefCell::new(courses),
        })
    }
}

impl CourseRepository for InMemoryCourseRepository {
    fn list_courses(&self) -> RepoResult<Vec<Course>> {
        let mut courses = self.rows.borrow().clone();
        courses.sort_by_key(|course| course.id);
        Ok(courses)
    }

    fn get_course(&self, id: CourseId) -> RepoResult<Option<Course>> {
        Ok(self.rows.borrow().iter().find(|course| course.id == id).cloned())
    }

    fn create_course(&self, draft: &CourseDraft) -> RepoResult<Course> {
        draft.validate()?;
        let mut rows = self.rows.borrow_mut();
        let course = Course {
            id: next_id(rows.iter().map(|course| course.id)),
            name: draft.name.trim().to_string(),
            instructor: draft.instructor.trim().to_string(),
            schedule: draft.schedule.trim().to_string(),
            color: draft.color.clone(),
            semester: draft.semester.trim().to_string(),
            credits: draft.credits,
            created_at: storage_now(),
        };
        rows.push(course.clone());
        Ok(course)
    }

    fn update_course(&self, course: &Course) -> RepoResult<()> {
        course.validate()?;
        let mut rows = self.rows.borrow_mut();
        let slot = rows
            .iter_mut()
            .find(|existing| existing.id == course.id)
            .ok_or_else(|| not_found(Entity::Course, course.id))?;
        // created_at is owned by storage.
        let created_at = slot.created_at;
        *slot = Course {
            created_at,
            ..course.clone()
        };
        Ok(())
    }

    fn delete_course(&self, id: CourseId) -> RepoResult<()> {
        let mut rows = self.rows.borrow_mut();
        let index = rows
            .iter()
            .position(|course| course.id == id)
            .ok_or_else(|| not_found(Entity::Course, id))?;
        rows.remove(index);
        Ok(())
    }
}

/// Assignment repository backed by a `Vec`.
///
/// Unlike the SQLite backing there is no foreign key to courses; services
/// check course existence before writing.
#[derive(Debug, Default)]
pub struct InMemoryAssignmentRepository {
    rows: RefCell<Vec<Assignment>>,
}

impl InMemoryAssignmentRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds the repository with already-identified assignments.
    pub fn with_assignments(assignments: Vec<Assignment>) -> RepoResult<Self> {
        for assignment in &assignments {
            assignment.validate()?;
        }
        Ok(Self {
            rows: RefCell::new(assignments),
        })
    }

    fn sorted(mut assignments: Vec<Assignment>) -> Vec<Assignment> {
        assignments.sort_by(|a, b| a.due_at.cmp(&b.due_at).then(a.id.cmp(&b.id)));
        assignments
    }
}

impl AssignmentRepository for InMemoryAssignmentRepository {
    fn list_assignments(&self) -> RepoResult<Vec<Assignment>> {
        Ok(Self::sorted(self.rows.borrow().clone()))
    }

    fn list_assignments_for_course(&self, course_id: CourseId) -> RepoResult<Vec<Assignment>> {
        let selected = self
            .rows
            .borrow()
            .iter()
            .filter(|assignment| assignment.course_id == course_id)
            .cloned()
            .collect();
        Ok(Self::sorted(selected))
    }

    fn get_assignment(&self, id: AssignmentId) -> RepoResult<Option<Assignment>> {
        Ok(self
            .rows
            .borrow()
            .iter()
            .find(|assignment| assignment.id == id)
            .cloned())
    }

    fn create_assignment(&self, draft: &AssignmentDraft) -> RepoResult<Assignment> {
        draft.validate()?;
        let mut rows = self.rows.borrow_mut();
        let assignment = Assignment {
            id: next_id(rows.iter().map(|assignment| assignment.id)),
            course_id: draft.course_id,
            title: draft.title.trim().to_string(),
            description: normalize_description(draft.description.clone()),
            due_at: draft.due_at,
            priority: draft.priority,
            weight: draft.weight,
            completed: false,
            grade: None,
            created_at: storage_now(),
        };
        rows.push(assignment.clone());
        Ok(assignment)
    }

    fn update_assignment(&self, assignment: &Assignment) -> RepoResult<()> {
        assignment.validate()?;
        let mut rows = self.rows.borrow_mut();
        let slot = rows
            .iter_mut()
            .find(|existing| existing.id == assignment.id)
            .ok_or_else(|| not_found(Entity::Assignment, assignment.id))?;
        let created_at = slot.created_at;
        *slot = Assignment {
            created_at,
            ..assignment.clone()
        };
        Ok(())
    }

    fn delete_assignment(&self, id: AssignmentId) -> RepoResult<()> {
        let mut rows = self.rows.borrow_mut();
        let index = rows
            .iter()
            .position(|assignment| assignment.id == id)
            .ok_or_else(|| not_found(Entity::Assignment, id))?;
        rows.remove(index);
        Ok(())
    }

    fn delete_assignments_for_course(&self, course_id: CourseId) -> RepoResult<usize> {
        let mut rows = self.rows.borrow_mut();
        let before = rows.len();
        rows.retain(|assignment| assignment.course_id != course_id);
        Ok(before - rows.len())
    }
}

/// Student repository backed by a `Vec`.
#[derive(Debug, Default)]
pub struct InMemoryStudentRepository {
    rows: RefCell<Vec<Student>>,
}

impl InMemoryStudentRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

impl StudentRepository for InMemoryStudentRepository {
    fn list_students(&self) -> RepoResult<Vec<Student>> {
        let mut students = self.rows.borrow().clone();
        students.sort_by(|a, b| b.id.cmp(&a.id));
        Ok(students)
    }

    fn get_student(&self, id: StudentId) -> RepoResult<Option<Student>> {
        Ok(self.rows.borrow().iter().find(|student| student.id == id).cloned())
    }

    fn create_student(&self, draft: &StudentDraft) -> RepoResult<Student> {
        draft.validate()?;
        let mut rows = self.rows.borrow_mut();
        let student = Student {
            id: next_id(rows.iter().map(|student| student.id)),
            name: draft.name.trim().to_string(),
            tags: normalize_tags(&draft.tags),
            first_name: draft.first_name.trim().to_string(),
            last_name: draft.last_name.trim().to_string(),
            email: draft.email.trim().to_string(),
        };
        rows.push(student.clone());
        Ok(student)
    }

    fn update_student(&self, student: &Student) -> RepoResult<()> {
        student.validate()?;
        let mut rows = self.rows.borrow_mut();
        let slot = rows
            .iter_mut()
            .find(|existing| existing.id == student.id)
            .ok_or_else(|| not_found(Entity::Student, student.id))?;
        *slot = Student {
            tags: normalize_tags(&student.tags),
            ..student.clone()
        };
        Ok(())
    }

    fn delete_student(&self, id: StudentId) -> RepoResult<()> {
        let mut rows = self.rows.borrow_mut();
        let index = rows
            .iter()
            .position(|student| student.id == id)
            .ok_or_else(|| not_found(Entity::Student, id))?;
        rows.remove(index);
        Ok(())
    }
}
