//! Snapshot import from a record store dump.
//!
//! # Responsibility
//! - Normalize every remote record through the `record` adapter.
//! - Insert courses first, then assignments with course ids remapped to the
//!   newly assigned local ids, then students.
//!
//! # Invariants
//! - One malformed record never aborts the import; it is skipped and reported.
//! - A course id named by the snapshot never resolves to an unrelated local
//!   course; assignments of a skipped snapshot course are skipped too.
//! - Repository failures abort the import; `import_snapshot_into` rolls the
//!   whole run back.

use crate::model::assignment::AssignmentDraft;
use crate::model::course::{CourseDraft, CourseId};
use crate::model::student::StudentDraft;
use crate::record::{
    decode_record, record_id, record_label, AdapterError, RemoteAssignment, RemoteCourse,
    RemoteSnapshot, RemoteStudent,
};
use crate::repo::assignment_repo::{AssignmentRepository, SqliteAssignmentRepository};
use crate::repo::course_repo::{CourseRepository, SqliteCourseRepository};
use crate::repo::student_repo::{SqliteStudentRepository, StudentRepository};
use crate::repo::{Entity, RepoError};
use chrono::TimeZone;
use log::{info, warn};
use rusqlite::{Connection, Transaction, TransactionBehavior};
use std::collections::{HashMap, HashSet};

/// Outcome counts of one import run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportSummary {
    pub courses: usize,
    pub assignments: usize,
    pub students: usize,
    /// One line per skipped record: `<entity> <remote id>: <reason>`.
    pub skipped: Vec<String>,
}

pub struct ImportService<C, A, S>
where
    C: CourseRepository,
    A: AssignmentRepository,
    S: StudentRepository,
{
    courses: C,
    assignments: A,
    students: S,
}

impl<C, A, S> ImportService<C, A, S>
where
    C: CourseRepository,
    A: AssignmentRepository,
    S: StudentRepository,
{
    pub fn new(courses: C, assignments: A, students: S) -> Self {
        Self {
            courses,
            assignments,
            students,
        }
    }

    /// Imports every record of `snapshot`. Local-form timestamps are read in `tz`.
    pub fn import_snapshot<Tz: TimeZone>(
        &self,
        snapshot: RemoteSnapshot,
        tz: &Tz,
    ) -> Result<ImportSummary, RepoError> {
        let mut summary = ImportSummary::default();
        let mut course_ids: HashMap<CourseId, CourseId> = HashMap::new();
        let snapshot_course_ids: HashSet<CourseId> =
            snapshot.courses.iter().filter_map(record_id).collect();

        for value in snapshot.courses {
            let label = record_label(&value);
            let remote = match decode_record::<RemoteCourse>(value) {
                Ok(remote) => remote,
                Err(err) => {
                    skip(&mut summary, Entity::Course, &label, &err);
                    continue;
                }
            };
            let remote_id = remote.id;
            let course = match remote.into_canonical(tz) {
                Ok(course) => course,
                Err(err) => {
                    skip(&mut summary, Entity::Course, &label, &err);
                    continue;
                }
            };
            let draft = CourseDraft {
                name: course.name,
                instructor: course.instructor,
                schedule: course.schedule,
                color: course.color,
                semester: course.semester,
                credits: course.credits,
            };
            let created = self.courses.create_course(&draft)?;
            course_ids.insert(remote_id, created.id);
            summary.courses += 1;
        }

        for value in snapshot.assignments {
            let label = record_label(&value);
            let mut assignment = match decode_record::<RemoteAssignment>(value)
                .and_then(|remote| remote.into_canonical(tz))
            {
                Ok(assignment) => assignment,
                Err(err) => {
                    skip(&mut summary, Entity::Assignment, &label, &err);
                    continue;
                }
            };
            let resolved =
                self.resolve_course(&course_ids, &snapshot_course_ids, assignment.course_id)?;
            let Some(course_id) = resolved else {
                let err = AdapterError::InvalidCourseRef(assignment.course_id.to_string());
                skip(&mut summary, Entity::Assignment, &label, &err);
                continue;
            };

            let draft = AssignmentDraft {
                course_id,
                title: assignment.title.clone(),
                description: assignment.description.clone(),
                due_at: assignment.due_at,
                priority: assignment.priority,
                weight: assignment.weight,
            };
            let created = self.assignments.create_assignment(&draft)?;
            if assignment.completed || assignment.is_graded() {
                assignment.id = created.id;
                assignment.course_id = created.course_id;
                assignment.created_at = created.created_at;
                self.assignments.update_assignment(&assignment)?;
            }
            summary.assignments += 1;
        }

        for value in snapshot.students {
            let label = record_label(&value);
            let student = match decode_record::<RemoteStudent>(value)
                .and_then(RemoteStudent::into_canonical)
            {
                Ok(student) => student,
                Err(err) => {
                    skip(&mut summary, Entity::Student, &label, &err);
                    continue;
                }
            };
            let draft = StudentDraft {
                name: student.name,
                tags: student.tags,
                first_name: student.first_name,
                last_name: student.last_name,
                email: student.email,
            };
            self.students.create_student(&draft)?;
            summary.students += 1;
        }

        info!(
            "event=snapshot_import module=service status=ok courses={} assignments={} students={} skipped={}",
            summary.courses,
            summary.assignments,
            summary.students,
            summary.skipped.len()
        );
        Ok(summary)
    }

    /// Maps a remote course id to a local one.
    ///
    /// A course named by the snapshot resolves only if it was imported. Ids
    /// the snapshot never mentions are accepted when that course already
    /// exists locally.
    fn resolve_course(
        &self,
        imported: &HashMap<CourseId, CourseId>,
        in_snapshot: &HashSet<CourseId>,
        remote_id: CourseId,
    ) -> Result<Option<CourseId>, RepoError> {
        if let Some(local_id) = imported.get(&remote_id) {
            return Ok(Some(*local_id));
        }
        if in_snapshot.contains(&remote_id) {
            return Ok(None);
        }
        Ok(self.courses.get_course(remote_id)?.map(|course| course.id))
    }
}

/// Imports `snapshot` into SQLite inside one immediate transaction.
///
/// A repository failure rolls back every record written by the run.
pub fn import_snapshot_into<Tz: TimeZone>(
    conn: &Connection,
    snapshot: RemoteSnapshot,
    tz: &Tz,
) -> Result<ImportSummary, RepoError> {
    let tx = Transaction::new_unchecked(conn, TransactionBehavior::Immediate)?;
    let summary = ImportService::new(
        SqliteCourseRepository::new(&tx),
        SqliteAssignmentRepository::new(&tx),
        SqliteStudentRepository::new(&tx),
    )
    .import_snapshot(snapshot, tz)?;
    tx.commit()?;
    Ok(summary)
}

fn skip(summary: &mut ImportSummary, entity: Entity, remote_id: &str, err: &AdapterError) {
    warn!(
        "event=snapshot_import module=service status=skipped entity={entity} remote_id={remote_id} error={err}"
    );
    summary.skipped.push(format!("{entity} {remote_id}: {err}"));
}

#[cfg(test)]
mod tests {
    use super::ImportService;
    use crate::record::RemoteSnapshot;
    use crate::repo::assignment_repo::AssignmentRepository;
    use crate::repo::course_repo::CourseRepository;
    use crate::repo::memory::{
        InMemoryAssignmentRepository, InMemoryCourseRepository, InMemoryStudentRepository,
    };
    use crate::model::course::CourseDraft;
    use crate::repo::student_repo::StudentRepository;
    use chrono::Utc;

    const SNAPSHOT: &str = r##"{
        "courses": [
            { "Id": 40, "name_c": "Data Structures", "credits_c": 4, "color_c": "#dc2626" },
            { "Id": 41, "name_c": "   " }
        ],
        "assignments": [
            { "Id": 7, "course_id_c": { "Id": 40, "Name": "Data Structures" },
              "title_c": "Heaps", "due_date_c": "2024-10-05T15:00:00Z",
              "priority_c": "high", "completed_c": true, "grade_c": 91 },
            { "Id": 8, "course_id_c": "40", "title_c": "Graphs",
              "due_date_c": "2024-10-12T15:00:00Z" },
            { "Id": 9, "course_id_c": 99, "title_c": "Orphan",
              "due_date_c": "2024-10-12T15:00:00Z" },
            { "Id": 10, "course_id_c": 40, "title_c": "Bad date",
              "due_date_c": "someday" }
        ],
        "students": [
            { "Id": 3, "Name": "Ada", "Tags": "honors, cs", "email_c": "ada@example.edu" }
        ]
    }"##;

    #[test]
    fn import_remaps_course_ids_and_reports_skips() {
        let courses = InMemoryCourseRepository::new();
        let assignments = InMemoryAssignmentRepository::new();
        let students = InMemoryStudentRepository::new();
        let service = ImportService::new(&courses, &assignments, &students);

        let snapshot = RemoteSnapshot::from_json(SNAPSHOT).unwrap();
        let summary = service.import_snapshot(snapshot, &Utc).unwrap();

        assert_eq!(summary.courses, 1);
        assert_eq!(summary.assignments, 2);
        assert_eq!(summary.students, 1);
        assert_eq!(summary.skipped.len(), 3);
        assert!(summary.skipped.iter().any(|line| line.starts_with("course 41")));

        let course = courses.list_courses().unwrap().remove(0);
        assert_eq!(course.credits, 4);
        let imported = assignments.list_assignments_for_course(course.id).unwrap();
        assert_eq!(imported.len(), 2);
        let heaps = imported.iter().find(|a| a.title == "Heaps").unwrap();
        assert!(heaps.completed);
        assert_eq!(heaps.grade, Some(91));
        let graphs = imported.iter().find(|a| a.title == "Graphs").unwrap();
        assert!(!graphs.completed);

        let student = students.list_students().unwrap().remove(0);
        assert_eq!(student.tags, vec!["cs".to_string(), "honors".to_string()]);
    }

    #[test]
    fn skipped_snapshot_course_never_matches_a_local_course() {
        let courses = InMemoryCourseRepository::new();
        let assignments = InMemoryAssignmentRepository::new();
        let students = InMemoryStudentRepository::new();
        let local = courses.create_course(&CourseDraft::new("Local Seminar")).unwrap();
        assert_eq!(local.id, 1);

        let snapshot = RemoteSnapshot::from_json(
            r#"{
                "courses": [{ "Id": 1, "name_c": "" }],
                "assignments": [
                    { "Id": 5, "course_id_c": 1, "title_c": "Remote HW",
                      "due_date_c": "2024-10-09T09:00:00Z" },
                    { "Id": 6, "course_id_c": 1, "title_c": "Remote Quiz",
                      "due_date_c": "2024-10-10T09:00:00Z" }
                ]
            }"#,
        )
        .unwrap();
        let summary = ImportService::new(&courses, &assignments, &students)
            .import_snapshot(snapshot, &Utc)
            .unwrap();

        assert_eq!(summary.courses, 0);
        assert_eq!(summary.assignments, 0);
        assert_eq!(summary.skipped.len(), 3);
        assert!(summary.skipped[1].starts_with("assignment 5"));
        assert!(assignments.list_assignments_for_course(local.id).unwrap().is_empty());
    }

    #[test]
    fn ids_outside_the_snapshot_fall_back_to_local_courses() {
        let courses = InMemoryCourseRepository::new();
        let assignments = InMemoryAssignmentRepository::new();
        let students = InMemoryStudentRepository::new();
        let local = courses.create_course(&CourseDraft::new("Local Seminar")).unwrap();

        let snapshot = RemoteSnapshot::from_json(
            r#"{ "assignments": [
                { "Id": 5, "course_id_c": 1, "title_c": "Reading",
                  "due_date_c": "2024-10-09T09:00:00Z" }
            ] }"#,
        )
        .unwrap();
        let summary = ImportService::new(&courses, &assignments, &students)
            .import_snapshot(snapshot, &Utc)
            .unwrap();

        assert_eq!(summary.assignments, 1);
        assert_eq!(assignments.list_assignments_for_course(local.id).unwrap().len(), 1);
    }
}
