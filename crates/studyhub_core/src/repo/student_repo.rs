//! Student repository contract and SQLite implementation.
//!
//! Tags are stored as one comma-joined column, matching the record store.

use super::{storage_now, Entity, RepoError, RepoResult};
use crate::model::student::{normalize_tags, split_tags, Student, StudentDraft, StudentId};
use rusqlite::{params, Connection, Row};

const STUDENT_SELECT_SQL: &str = "SELECT
    id,
    name,
    tags,
    first_name,
    last_name,
    email
FROM students";

/// Repository interface for student roster operations.
pub trait StudentRepository {
    fn list_students(&self) -> RepoResult<Vec<Student>>;
    fn get_student(&self, id: StudentId) -> RepoResult<Option<Student>>;
    fn create_student(&self, draft: &StudentDraft) -> RepoResult<Student>;
    fn update_student(&self, student: &Student) -> RepoResult<()>;
    fn delete_student(&self, id: StudentId) -> RepoResult<()>;
}

impl<R: StudentRepository + ?Sized> StudentRepository for &R {
    fn list_students(&self) -> RepoResult<Vec<Student>> {
        (**self).list_students()
    }

    fn get_student(&self, id: StudentId) -> RepoResult<Option<Student>> {
        (**self).get_student(id)
    }

    fn create_student(&self, draft: &StudentDraft) -> RepoResult<Student> {
        (**self).create_student(draft)
    }

    fn update_student(&self, student: &Student) -> RepoResult<()> {
        (**self).update_student(student)
    }

    fn delete_student(&self, id: StudentId) -> RepoResult<()> {
        (**self).delete_student(id)
    }
}

/// SQLite-backed student repository.
pub struct SqliteStudentRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteStudentRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl StudentRepository for SqliteStudentRepository<'_> {
    fn list_students(&self) -> RepoResult<Vec<Student>> {
        // Newest first, as the roster page shows them.
        let mut stmt = self.conn.prepare(&format!(
            "{STUDENT_SELECT_SQL} ORDER BY created_at DESC, id DESC;"
        ))?;
        let mut rows = stmt.query([])?;
        let mut students = Vec::new();
        while let Some(row) = rows.next()? {
            students.push(parse_student_row(row)?);
        }
        Ok(students)
    }

    fn get_student(&self, id: StudentId) -> RepoResult<Option<Student>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{STUDENT_SELECT_SQL} WHERE id = ?1;"))?;
        let mut rows = stmt.query([id])?;
        match rows.next()? {
            Some(row) => Ok(Some(parse_student_row(row)?)),
            None => Ok(None),
        }
    }

    fn create_student(&self, draft: &StudentDraft) -> RepoResult<Student> {
        draft.validate()?;
        let tags = normalize_tags(&draft.tags);

        self.conn.execute(
            "INSERT INTO students (
                name,
                tags,
                first_name,
                last_name,
                email,
                created_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6);",
            params![
                draft.name.trim(),
                tags.join(","),
                draft.first_name.trim(),
                draft.last_name.trim(),
                draft.email.trim(),
                storage_now().timestamp_millis(),
            ],
        )?;

        Ok(Student {
            id: self.conn.last_insert_rowid(),
            name: draft.name.trim().to_string(),
            tags,
            first_name: draft.first_name.trim().to_string(),
            last_name: draft.last_name.trim().to_string(),
            email: draft.email.trim().to_string(),
        })
    }

    fn update_student(&self, student: &Student) -> RepoResult<()> {
        student.validate()?;

        let changed = self.conn.execute(
            "UPDATE students
             SET
                name = ?1,
                tags = ?2,
                first_name = ?3,
                last_name = ?4,
                email = ?5
             WHERE id = ?6;",
            params![
                student.name.as_str(),
                normalize_tags(&student.tags).join(","),
                student.first_name.as_str(),
                student.last_name.as_str(),
                student.email.as_str(),
                student.id,
            ],
        )?;

        if changed == 0 {
            return Err(RepoError::NotFound {
                entity: Entity::Student,
                id: student.id,
            });
        }
        Ok(())
    }

    fn delete_student(&self, id: StudentId) -> RepoResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM students WHERE id = ?1;", [id])?;
        if changed == 0 {
            return Err(RepoError::NotFound {
                entity: Entity::Student,
                id,
            });
        }
        Ok(())
    }
}

fn parse_student_row(row: &Row<'_>) -> RepoResult<Student> {
    let tags: String = row.get("tags")?;
    let student = Student {
        id: row.get("id")?,
        name: row.get("name")?,
        tags: split_tags(&tags),
        first_name: row.get("first_name")?,
        last_name: row.get("last_name")?,
        email: row.get("email")?,
    };
    student.validate()?;
    Ok(student)
}
