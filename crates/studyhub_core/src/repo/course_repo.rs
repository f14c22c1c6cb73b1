//! Course repository contract and SQLite implementation.
//!
//! # Invariants
//! - Deleting a course row cascades to its assignments (`ON DELETE CASCADE`).
//! - Listing order is stable: `id ASC`.

use super::{millis_to_datetime, storage_now, Entity, RepoError, RepoResult};
use crate::model::course::{Course, CourseDraft, CourseId};
use rusqlite::{params, Connection, Row};

const COURSE_SELECT_SQL: &str = "SELECT
    id,
    name,
    instructor,
    schedule,
    color,
    semester,
    credits,
    created_at
FROM courses";

/// Repository interface for course CRUD operations.
pub trait CourseRepository {
    fn list_courses(&self) -> RepoResult<Vec<Course>>;
    fn get_course(&self, id: CourseId) -> RepoResult<Option<Course>>;
    /// Persists a new course and returns it with its assigned id.
    fn create_course(&self, draft: &CourseDraft) -> RepoResult<Course>;
    fn update_course(&self, course: &Course) -> RepoResult<()>;
    fn delete_course(&self, id: CourseId) -> RepoResult<()>;
}

impl<R: CourseRepository + ?Sized> CourseRepository for &R {
    fn list_courses(&self) -> RepoResult<Vec<Course>> {
        (**self).list_courses()
    }

    fn get_course(&self, id: CourseId) -> RepoResult<Option<Course>> {
        (**self).get_course(id)
    }

    fn create_course(&self, draft: &CourseDraft) -> RepoResult<Course> {
        (**self).create_course(draft)
    }

    fn update_course(&self, course: &Course) -> RepoResult<()> {
        (**self).update_course(course)
    }

    fn delete_course(&self, id: CourseId) -> RepoResult<()> {
        (**self).delete_course(id)
    }
}

/// SQLite-backed course repository.
pub struct SqliteCourseRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteCourseRepository<'conn> {
    /// Wraps a connection returned by [`crate::db::open_db`].
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl CourseRepository for SqliteCourseRepository<'_> {
    fn list_courses(&self) -> RepoResult<Vec<Course>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{COURSE_SELECT_SQL} ORDER BY id ASC;"))?;
        let mut rows = stmt.query([])?;
        let mut courses = Vec::new();
        while let Some(row) = rows.next()? {
            courses.push(parse_course_row(row)?);
        }
        Ok(courses)
    }

    fn get_course(&self, id: CourseId) -> RepoResult<Option<Course>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{COURSE_SELECT_SQL} WHERE id = ?1;"))?;
        let mut rows = stmt.query([id])?;
        match rows.next()? {
            Some(row) => Ok(Some(parse_course_row(row)?)),
            None => Ok(None),
        }
    }

    fn create_course(&self, draft: &CourseDraft) -> RepoResult<Course> {
        draft.validate()?;
        let created_at = storage_now();

        self.conn.execute(
            "INSERT INTO courses (
                name,
                instructor,
                schedule,
                color,
                semester,
                credits,
                created_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7);",
            params![
                draft.name.trim(),
                draft.instructor.trim(),
                draft.schedule.trim(),
                draft.color.as_str(),
                draft.semester.trim(),
                draft.credits,
                created_at.timestamp_millis(),
            ],
        )?;

        let course = Course {
            id: self.conn.last_insert_rowid(),
            name: draft.name.trim().to_string(),
            instructor: draft.instructor.trim().to_string(),
            schedule: draft.schedule.trim().to_string(),
            color: draft.color.clone(),
            semester: draft.semester.trim().to_string(),
            credits: draft.credits,
            created_at,
        };
        Ok(course)
    }

    fn update_course(&self, course: &Course) -> RepoResult<()> {
        course.validate()?;

        let changed = self.conn.execute(
            "UPDATE courses
             SET
                name = ?1,
                instructor = ?2,
                schedule = ?3,
                color = ?4,
                semester = ?5,
                credits = ?6
             WHERE id = ?7;",
            params![
                course.name.as_str(),
                course.instructor.as_str(),
                course.schedule.as_str(),
                course.color.as_str(),
                course.semester.as_str(),
                course.credits,
                course.id,
            ],
        )?;

        if changed == 0 {
            return Err(RepoError::NotFound {
                entity: Entity::Course,
                id: course.id,
            });
        }
        Ok(())
    }

    fn delete_course(&self, id: CourseId) -> RepoResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM courses WHERE id = ?1;", [id])?;
        if changed == 0 {
            return Err(RepoError::NotFound {
                entity: Entity::Course,
                id,
            });
        }
        Ok(())
    }
}

fn parse_course_row(row: &Row<'_>) -> RepoResult<Course> {
    let credits = row.get::<_, i64>("credits")?;
    let credits = u8::try_from(credits).map_err(|_| {
        RepoError::InvalidData(format!("invalid credits `{credits}` in courses.credits"))
    })?;

    let course = Course {
        id: row.get("id")?,
        name: row.get("name")?,
        instructor: row.get("instructor")?,
        schedule: row.get("schedule")?,
        color: row.get("color")?,
        semester: row.get("semester")?,
        credits,
        created_at: millis_to_datetime("courses.created_at", row.get("created_at")?)?,
    };
    course.validate()?;
    Ok(course)
}
