//! Core domain logic for StudyHub.
//! This crate is the single source of truth for course, assignment and
//! grading invariants.

pub mod academic;
pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod record;
pub mod repo;
pub mod service;

pub use academic::due::{classify_due, due_status, DueClassification, DueStatus, DueTone};
pub use academic::filter::{AssignmentFilter, SortKey, StatusFilter};
pub use academic::grade::{grade_point, letter_grade, overall_gpa, weighted_grade, CourseGrade};
pub use config::{AppConfig, ConfigError, ConfigOverrides};
pub use db::{open_db, open_db_in_memory, DbError};
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::assignment::{Assignment, AssignmentDraft, AssignmentId, AssignmentPatch, Priority};
pub use model::course::{Course, CourseDraft, CourseId, CoursePatch};
pub use model::student::{Student, StudentDraft, StudentId, StudentPatch};
pub use model::ValidationError;
pub use repo::{RepoError, RepoResult};
pub use service::assignment_service::{AssignmentService, AssignmentServiceError};
pub use service::course_service::{CourseService, CourseServiceError};
pub use service::import_service::{import_snapshot_into, ImportService, ImportSummary};
pub use service::report_service::{ReportError, ReportService};
pub use service::student_service::{StudentService, StudentServiceError};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
