use chrono::{DateTime, FixedOffset, TimeZone, Utc};
use studyhub_core::academic::due::DueStatus;
use studyhub_core::academic::grade::GpaStanding;
use studyhub_core::db::open_db_in_memory;
use studyhub_core::record::RemoteSnapshot;
use studyhub_core::repo::assignment_repo::{AssignmentRepository, SqliteAssignmentRepository};
use studyhub_core::repo::course_repo::{CourseRepository, SqliteCourseRepository};
use studyhub_core::repo::student_repo::{SqliteStudentRepository, StudentRepository};
use studyhub_core::service::report_service::ReportError;
use studyhub_core::{
    classify_due, import_snapshot_into, ImportService, RepoError, ReportService, StudentDraft,
    StudentPatch, StudentService, StudentServiceError,
};

const SNAPSHOT: &str = r##"{
    "courses": [
        { "Id": 101, "name_c": "Calculus II", "credits_c": 4, "instructor_c": "Dr. Lin" },
        { "Id": 102, "name_c": "World History", "credits_c": 3 }
    ],
    "assignments": [
        { "Id": 1, "course_id_c": 101, "title_c": "Series quiz",
          "due_date_c": "2024-10-01T09:00", "grade_c": 97, "weight_c": 20 },
        { "Id": 2, "course_id_c": { "Id": 102, "Name": "World History" },
          "title_c": "Primary sources", "due_date_c": "2024-10-03T09:00",
          "completed_c": true, "grade_c": 87 },
        { "Id": 3, "course_id_c": "101", "title_c": "Integrals",
          "due_date_c": "2024-10-05T23:30", "priority_c": "high" },
        { "Id": 4, "course_id_c": 102, "title_c": "Bad priority",
          "due_date_c": "2024-10-09T09:00", "priority_c": "urgent" }
    ],
    "students": [
        { "Id": 9, "Name": "", "first_name_c": "Ada", "last_name_c": "Lovelace",
          "email_c": "ada@example.edu", "Tags": "math,honors" }
    ]
}"##;

fn eastern() -> FixedOffset {
    FixedOffset::west_opt(4 * 3600).unwrap()
}

fn now() -> DateTime<FixedOffset> {
    eastern().with_ymd_and_hms(2024, 10, 5, 10, 0, 0).unwrap()
}

#[test]
fn snapshot_import_populates_every_collection() {
    let conn = open_db_in_memory().unwrap();
    let courses = SqliteCourseRepository::new(&conn);
    let assignments = SqliteAssignmentRepository::new(&conn);
    let students = SqliteStudentRepository::new(&conn);

    let summary = ImportService::new(&courses, &assignments, &students)
        .import_snapshot(RemoteSnapshot::from_json(SNAPSHOT).unwrap(), &eastern())
        .unwrap();
    assert_eq!(
        (summary.courses, summary.assignments, summary.students),
        (2, 3, 1)
    );
    assert_eq!(summary.skipped.len(), 1);
    assert!(summary.skipped[0].contains("urgent"));

    let stored_courses = courses.list_courses().unwrap();
    assert_eq!(stored_courses[0].name, "Calculus II");
    assert_eq!(stored_courses[0].instructor, "Dr. Lin");

    let stored = assignments.list_assignments().unwrap();
    let quiz = &stored[0];
    assert_eq!(quiz.title, "Series quiz");
    assert_eq!(quiz.course_id, stored_courses[0].id);
    assert!(quiz.completed, "graded remote record is normalized to completed");
    assert_eq!(quiz.grade, Some(97));
    assert_eq!(
        quiz.due_at,
        Utc.with_ymd_and_hms(2024, 10, 1, 13, 0, 0).unwrap()
    );

    let integrals = &stored[2];
    assert_eq!(integrals.title, "Integrals");
    assert_eq!(classify_due(integrals.due_at, integrals.completed, &now()).status, DueStatus::DueToday);

    let student = students.list_students().unwrap().remove(0);
    assert_eq!(student.display_name(), "Ada Lovelace");
    assert_eq!(student.tags, vec!["honors".to_string(), "math".to_string()]);
}

#[test]
fn malformed_records_are_skipped_without_aborting() {
    let conn = open_db_in_memory().unwrap();
    let snapshot = RemoteSnapshot::from_json(
        r##"{
            "courses": [
                { "Id": 1, "name_c": "Geometry" },
                { "Id": 2, "name_c": "Art", "credits_c": "three" }
            ],
            "assignments": [
                { "Id": 10, "course_id_c": 1, "title_c": "Proofs",
                  "due_date_c": "2024-10-08T09:00" },
                { "Id": 11, "course_id_c": 1, "due_date_c": "2024-10-08T09:00" },
                { "Id": 12, "course_id_c": 1, "title_c": null,
                  "due_date_c": "2024-10-08T09:00" },
                { "Id": 13, "course_id_c": 1, "title_c": "Half marks",
                  "due_date_c": "2024-10-08T09:00", "grade_c": 92.5 },
                { "Id": 14, "course_id_c": 1, "title_c": "Heavy",
                  "due_date_c": "2024-10-08T09:00", "weight_c": 400 },
                { "Id": 15, "course_id_c": 1, "title_c": "Constructions",
                  "due_date_c": "2024-10-09T09:00", "completed_c": true }
            ],
            "students": [{ "Id": 3, "Tags": 7 }]
        }"##,
    )
    .unwrap();

    let summary = import_snapshot_into(&conn, snapshot, &eastern()).unwrap();
    assert_eq!(
        (summary.courses, summary.assignments, summary.students),
        (1, 2, 0)
    );
    let skipped: Vec<&str> = summary
        .skipped
        .iter()
        .map(|line| line.split(':').next().unwrap())
        .collect();
    assert_eq!(
        skipped,
        vec![
            "course 2",
            "assignment 11",
            "assignment 12",
            "assignment 13",
            "assignment 14",
            "student 3"
        ]
    );

    let titles: Vec<String> = SqliteAssignmentRepository::new(&conn)
        .list_assignments()
        .unwrap()
        .into_iter()
        .map(|assignment| assignment.title)
        .collect();
    assert_eq!(titles, vec!["Proofs".to_string(), "Constructions".to_string()]);
}

#[test]
fn storage_failure_rolls_back_the_whole_import() {
    let conn = open_db_in_memory().unwrap();
    conn.execute_batch(
        "CREATE TRIGGER reject_students BEFORE INSERT ON students
         BEGIN SELECT RAISE(ABORT, 'students are read-only'); END;",
    )
    .unwrap();

    let err = import_snapshot_into(&conn, RemoteSnapshot::from_json(SNAPSHOT).unwrap(), &eastern())
        .unwrap_err();
    assert!(matches!(err, RepoError::Db(_)));

    assert!(SqliteCourseRepository::new(&conn).list_courses().unwrap().is_empty());
    assert!(SqliteAssignmentRepository::new(&conn)
        .list_assignments()
        .unwrap()
        .is_empty());

    conn.execute_batch("DROP TRIGGER reject_students;").unwrap();
    let summary =
        import_snapshot_into(&conn, RemoteSnapshot::from_json(SNAPSHOT).unwrap(), &eastern())
            .unwrap();
    assert_eq!(summary.courses, 2);
}

#[test]
fn reports_summarize_imported_data() {
    let conn = open_db_in_memory().unwrap();
    let courses = SqliteCourseRepository::new(&conn);
    let assignments = SqliteAssignmentRepository::new(&conn);
    let students = SqliteStudentRepository::new(&conn);
    ImportService::new(&courses, &assignments, &students)
        .import_snapshot(RemoteSnapshot::from_json(SNAPSHOT).unwrap(), &eastern())
        .unwrap();

    let reports = ReportService::new(&courses, &assignments);

    let dashboard = reports.dashboard(&now()).unwrap();
    assert_eq!(dashboard.total, 3);
    assert_eq!(dashboard.completed, 2);
    assert_eq!(dashboard.completion_rate, 67);
    assert_eq!(dashboard.due_today.len(), 1);
    assert!(dashboard.overdue.is_empty());
    assert_eq!(dashboard.upcoming.len(), 1);
    // (4.0 * 4 + 3.0 * 3) / 7 = 3.571...
    assert_eq!(dashboard.gpa, 3.57);

    let grades = reports.grade_report(None).unwrap();
    assert_eq!(grades.courses.len(), 2);
    assert_eq!(grades.courses[0].letter, "A+");
    assert_eq!(grades.courses[1].letter, "B+");
    assert_eq!(grades.standing, GpaStanding::Excellent);
    let stats = grades.statistics.unwrap();
    assert_eq!((stats.average, stats.count), (92, 2));

    let october = reports.calendar(2024, 10, &now()).unwrap();
    assert_eq!(october.total, 3);
    assert_eq!(october.completed, 2);
    assert_eq!(october.pending_overall, 1);
    let today = october.days.iter().find(|day| day.is_today).unwrap();
    assert_eq!(today.assignments.len(), 1);

    assert!(matches!(
        reports.calendar(2024, 0, &now()),
        Err(ReportError::InvalidMonth(_))
    ));
}

#[test]
fn student_service_crud() {
    let conn = open_db_in_memory().unwrap();
    let service = StudentService::new(SqliteStudentRepository::new(&conn));

    let first = service
        .create_student(&StudentDraft {
            name: "Alan Turing".to_string(),
            tags: vec!["cs".to_string(), " cs ".to_string()],
            email: "alan@example.edu".to_string(),
            ..StudentDraft::default()
        })
        .unwrap();
    let second = service
        .create_student(&StudentDraft {
            first_name: "Katherine".to_string(),
            last_name: "Johnson".to_string(),
            ..StudentDraft::default()
        })
        .unwrap();
    assert_eq!(first.tags, vec!["cs".to_string()]);

    let listed = service.list_students().unwrap();
    assert_eq!(listed[0].id, second.id, "newest first");

    let updated = service
        .update_student(
            second.id,
            &StudentPatch {
                email: Some("kj@example.edu".to_string()),
                ..StudentPatch::default()
            },
        )
        .unwrap();
    assert_eq!(updated.email, "kj@example.edu");
    assert_eq!(updated.display_name(), "Katherine Johnson");

    assert!(matches!(
        service.update_student(
            second.id,
            &StudentPatch {
                email: Some("broken".to_string()),
                ..StudentPatch::default()
            },
        ),
        Err(StudentServiceError::Validation(_))
    ));

    service.delete_student(first.id).unwrap();
    assert!(matches!(
        service.get_student(first.id),
        Err(StudentServiceError::StudentNotFound(_))
    ));
    assert_eq!(service.list_students().unwrap().len(), 1);
}
