//! Assignment repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Persist canonical assignments, including completion and grade state.
//! - Provide per-course listing and bulk removal for course cascades.
//!
//! # Invariants
//! - Writes call `Assignment::validate()` (or the draft equivalent) first.
//! - New rows always start pending and ungraded.
//! - Listing order is `due_at ASC, id ASC`.

use super::{
    bool_to_int, int_to_bool, millis_to_datetime, storage_now, Entity, RepoError, RepoResult,
};
use crate::model::assignment::{normalize_description, Assignment, AssignmentDraft, AssignmentId, Priority};
use crate::model::course::CourseId;
use rusqlite::{params, Connection, Row};

const ASSIGNMENT_SELECT_SQL: &str = "SELECT
    id,
    course_id,
    title,
    description,
    due_at,
    priority,
    weight,
    completed,
    grade,
    created_at
FROM assignments";

/// Repository interface for assignment CRUD operations.
pub trait AssignmentRepository {
    fn list_assignments(&self) -> RepoResult<Vec<Assignment>>;
    fn list_assignments_for_course(&self, course_id: CourseId) -> RepoResult<Vec<Assignment>>;
    fn get_assignment(&self, id: AssignmentId) -> RepoResult<Option<Assignment>>;
    /// Persists a new pending, ungraded assignment.
    fn create_assignment(&self, draft: &AssignmentDraft) -> RepoResult<Assignment>;
    /// Replaces every mutable field, including completion and grade.
    fn update_assignment(&self, assignment: &Assignment) -> RepoResult<()>;
    fn delete_assignment(&self, id: AssignmentId) -> RepoResult<()>;
    /// Removes every assignment of one course and returns how many were removed.
    fn delete_assignments_for_course(&self, course_id: CourseId) -> RepoResult<usize>;
}

impl<R: AssignmentRepository + ?Sized> AssignmentRepository for &R {
    fn list_assignments(&self) -> RepoResult<Vec<Assignment>> {
        (**self).list_assignments()
    }

    fn list_assignments_for_course(&self, course_id: CourseId) -> RepoResult<Vec<Assignment>> {
        (**self).list_assignments_for_course(course_id)
    }

    fn get_assignment(&self, id: AssignmentId) -> RepoResult<Option<Assignment>> {
        (**self).get_assignment(id)
    }

    fn create_assignment(&self, draft: &AssignmentDraft) -> RepoResult<Assignment> {
        (**self).create_assignment(draft)
    }

    fn update_assignment(&self, assignment: &Assignment) -> RepoResult<()> {
        (**self).update_assignment(assignment)
    }

    fn delete_assignment(&self, id: AssignmentId) -> RepoResult<()> {
        (**self).delete_assignment(id)
    }

    fn delete_assignments_for_course(&self, course_id: CourseId) -> RepoResult<usize> {
        (**self).delete_assignments_for_course(course_id)
    }
}

/// SQLite-backed assignment repository.
pub struct SqliteAssignmentRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteAssignmentRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }

    fn query_assignments(&self, sql: &str, course_id: Option<CourseId>) -> RepoResult<Vec<Assignment>> {
        let mut stmt = self.conn.prepare(sql)?;
        let mut rows = match course_id {
            Some(course_id) => stmt.query([course_id])?,
            None => stmt.query([])?,
        };
        let mut assignments = Vec::new();
        while let Some(row) = rows.next()? {
            assignments.push(parse_assignment_row(row)?);
        }
        Ok(assignments)
    }
}

impl AssignmentRepository for SqliteAssignmentRepository<'_> {
    fn list_assignments(&self) -> RepoResult<Vec<Assignment>> {
        self.query_assignments(
            &format!("{ASSIGNMENT_SELECT_SQL} ORDER BY due_at ASC, id ASC;"),
            None,
        )
    }

    fn list_assignments_for_course(&self, course_id: CourseId) -> RepoResult<Vec<Assignment>> {
        self.query_assignments(
            &format!("{ASSIGNMENT_SELECT_SQL} WHERE course_id = ?1 ORDER BY due_at ASC, id ASC;"),
            Some(course_id),
        )
    }

    fn get_assignment(&self, id: AssignmentId) -> RepoResult<Option<Assignment>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{ASSIGNMENT_SELECT_SQL} WHERE id = ?1;"))?;
        let mut rows = stmt.query([id])?;
        match rows.next()? {
            Some(row) => Ok(Some(parse_assignment_row(row)?)),
            None => Ok(None),
        }
    }

    fn create_assignment(&self, draft: &AssignmentDraft) -> RepoResult<Assignment> {
        draft.validate()?;
        let created_at = storage_now();
        let description = normalize_description(draft.description.clone());
        let title = draft.title.trim().to_string();

        self.conn.execute(
            "INSERT INTO assignments (
                course_id,
                title,
                description,
                due_at,
                priority,
                weight,
                completed,
                grade,
                created_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, 0, NULL, ?7);",
            params![
                draft.course_id,
                title.as_str(),
                description.as_deref(),
                draft.due_at.timestamp_millis(),
                draft.priority.as_str(),
                draft.weight,
                created_at.timestamp_millis(),
            ],
        )?;

        Ok(Assignment {
            id: self.conn.last_insert_rowid(),
            course_id: draft.course_id,
            title,
            description,
            due_at: millis_to_datetime("assignments.due_at", draft.due_at.timestamp_millis())?,
            priority: draft.priority,
            weight: draft.weight,
            completed: false,
            grade: None,
            created_at,
        })
    }

    fn update_assignment(&self, assignment: &Assignment) -> RepoResult<()> {
        assignment.validate()?;

        let changed = self.conn.execute(
            "UPDATE assignments
             SET
                course_id = ?1,
                title = ?2,
                description = ?3,
                due_at = ?4,
                priority = ?5,
                weight = ?6,
                completed = ?7,
                grade = ?8
             WHERE id = ?9;",
            params![
                assignment.course_id,
                assignment.title.as_str(),
                assignment.description.as_deref(),
                assignment.due_at.timestamp_millis(),
                assignment.priority.as_str(),
                assignment.weight,
                bool_to_int(assignment.completed),
                assignment.grade,
                assignment.id,
            ],
        )?;

        if changed == 0 {
            return Err(RepoError::NotFound {
                entity: Entity::Assignment,
                id: assignment.id,
            });
        }
        Ok(())
    }

    fn delete_assignment(&self, id: AssignmentId) -> RepoResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM assignments WHERE id = ?1;", [id])?;
        if changed == 0 {
            return Err(RepoError::NotFound {
                entity: Entity::Assignment,
                id,
            });
        }
        Ok(())
    }

    fn delete_assignments_for_course(&self, course_id: CourseId) -> RepoResult<usize> {
        Ok(self
            .conn
            .execute("DELETE FROM assignments WHERE course_id = ?1;", [course_id])?)
    }
}

fn parse_assignment_row(row: &Row<'_>) -> RepoResult<Assignment> {
    let priority_text: String = row.get("priority")?;
    let priority = priority_text.parse::<Priority>().map_err(|_| {
        RepoError::InvalidData(format!(
            "invalid priority `{priority_text}` in assignments.priority"
        ))
    })?;

    let weight = row.get::<_, i64>("weight")?;
    let weight = u8::try_from(weight).map_err(|_| {
        RepoError::InvalidData(format!("invalid weight `{weight}` in assignments.weight"))
    })?;

    let grade = match row.get::<_, Option<i64>>("grade")? {
        Some(value) => Some(u8::try_from(value).map_err(|_| {
            RepoError::InvalidData(format!("invalid grade `{value}` in assignments.grade"))
        })?),
        None => None,
    };

    let assignment = Assignment {
        id: row.get("id")?,
        course_id: row.get("course_id")?,
        title: row.get("title")?,
        description: row.get("description")?,
        due_at: millis_to_datetime("assignments.due_at", row.get("due_at")?)?,
        priority,
        weight,
        completed: int_to_bool("assignments.completed", row.get("completed")?)?,
        grade,
        created_at: millis_to_datetime("assignments.created_at", row.get("created_at")?)?,
    };
    assignment.validate()?;
    Ok(assignment)
}
