//! CLI argument definitions for `studyhub`.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use studyhub_core::config::ConfigOverrides;
use studyhub_core::Priority;

#[derive(Parser, Debug)]
#[command(
    name = "studyhub",
    about = "Track courses, assignments and grades",
    version = env!("CARGO_PKG_VERSION")
)]
pub struct Cli {
    /// Config file (defaults to the per-user config directory)
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// SQLite database file
    #[arg(long, global = true, value_name = "FILE")]
    pub db: Option<PathBuf>,

    /// Log level: trace|debug|info|warn|error
    #[arg(long, global = true, value_name = "LEVEL")]
    pub log_level: Option<String>,

    /// Absolute directory for log files
    #[arg(long, global = true, value_name = "DIR")]
    pub log_dir: Option<PathBuf>,

    /// Display timezone as minutes east of UTC
    #[arg(long, global = true, value_name = "MINUTES", allow_negative_numbers = true)]
    pub utc_offset: Option<i32>,

    /// Pin the current time (RFC 3339 or local `YYYY-MM-DDTHH:MM`)
    #[arg(long, global = true, value_name = "TIMESTAMP", hide = true)]
    pub now: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

impl Cli {
    pub fn to_config_overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            database_path: self.db.clone(),
            log_level: self.log_level.clone(),
            log_dir: self.log_dir.clone(),
            utc_offset_minutes: self.utc_offset,
        }
    }
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Manage courses.
    Courses {
        #[command(subcommand)]
        action: CourseAction,
    },
    /// Manage assignments.
    Assignments {
        #[command(subcommand)]
        action: AssignmentAction,
    },
    /// Manage the student roster.
    Students {
        #[command(subcommand)]
        action: StudentAction,
    },
    /// Overview of overdue, due-today and upcoming work plus GPA.
    Dashboard,
    /// Grade center: per-course grades, overall GPA and graded work.
    Grades {
        /// Restrict the graded breakdown to one course
        #[arg(long, value_name = "ID")]
        course: Option<i64>,
    },
    /// Month calendar of due assignments.
    Calendar {
        /// Month as `YYYY-MM` (defaults to the current month)
        #[arg(long, value_name = "YYYY-MM")]
        month: Option<String>,
    },
    /// Import a record store JSON snapshot.
    Import {
        #[arg(value_name = "FILE")]
        file: PathBuf,
    },
    /// Inspect configuration.
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Debug, Subcommand)]
pub enum CourseAction {
    /// List courses with their current grade.
    List {
        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },
    /// Add a course.
    Add {
        #[arg(value_name = "NAME")]
        name: String,
        #[command(flatten)]
        fields: CourseFields,
    },
    /// Change fields of a course.
    Edit {
        #[arg(value_name = "ID")]
        id: i64,
        /// New course name
        #[arg(long)]
        name: Option<String>,
        #[command(flatten)]
        fields: CourseFields,
    },
    /// Remove a course and its assignments.
    Remove {
        #[arg(value_name = "ID")]
        id: i64,
    },
}

#[derive(Debug, Args)]
pub struct CourseFields {
    #[arg(long)]
    pub instructor: Option<String>,
    /// Free-form meeting times, e.g. "MWF 10:00"
    #[arg(long)]
    pub schedule: Option<String>,
    /// Hex color `#rrggbb`
    #[arg(long)]
    pub color: Option<String>,
    #[arg(long)]
    pub semester: Option<String>,
    /// Credit hours
    #[arg(long)]
    pub credits: Option<u8>,
}

#[derive(Debug, Subcommand)]
pub enum AssignmentAction {
    /// List assignments, optionally filtered and sorted.
    List {
        /// Course id
        #[arg(long, value_name = "ID")]
        course: Option<String>,
        /// low|medium|high
        #[arg(long)]
        priority: Option<String>,
        /// completed|pending|overdue
        #[arg(long)]
        status: Option<String>,
        /// dueDate|priority|course|title
        #[arg(long, default_value = "dueDate")]
        sort: String,
        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },
    /// Add an assignment.
    Add {
        #[arg(long, value_name = "ID")]
        course: i64,
        #[arg(long)]
        title: String,
        /// Due time, RFC 3339 or local `YYYY-MM-DDTHH:MM`
        #[arg(long, value_name = "TIMESTAMP")]
        due: String,
        #[arg(long)]
        priority: Option<Priority>,
        /// Relative weight within the course grade
        #[arg(long)]
        weight: Option<u8>,
        #[arg(long)]
        description: Option<String>,
    },
    /// Change fields of an assignment.
    Edit {
        #[arg(value_name = "ID")]
        id: i64,
        #[arg(long, value_name = "ID")]
        course: Option<i64>,
        #[arg(long)]
        title: Option<String>,
        #[arg(long, value_name = "TIMESTAMP")]
        due: Option<String>,
        #[arg(long)]
        priority: Option<Priority>,
        #[arg(long)]
        weight: Option<u8>,
        /// New description; an empty value clears it
        #[arg(long)]
        description: Option<String>,
    },
    /// Flip between completed and pending.
    Toggle {
        #[arg(value_name = "ID")]
        id: i64,
    },
    /// Record a percentage grade, completing the assignment.
    Grade {
        #[arg(value_name = "ID")]
        id: i64,
        #[arg(value_name = "PERCENT")]
        grade: u8,
    },
    /// Remove a recorded grade.
    Ungrade {
        #[arg(value_name = "ID")]
        id: i64,
    },
    /// Remove an assignment.
    Remove {
        #[arg(value_name = "ID")]
        id: i64,
    },
}

#[derive(Debug, Subcommand)]
pub enum StudentAction {
    /// List students, newest first.
    List,
    /// Add a student.
    Add {
        #[command(flatten)]
        fields: StudentFields,
    },
    /// Change fields of a student.
    Edit {
        #[arg(value_name = "ID")]
        id: i64,
        #[command(flatten)]
        fields: StudentFields,
    },
    /// Remove a student.
    Remove {
        #[arg(value_name = "ID")]
        id: i64,
    },
}

#[derive(Debug, Args)]
pub struct StudentFields {
    #[arg(long)]
    pub name: Option<String>,
    /// Comma-separated tags
    #[arg(long)]
    pub tags: Option<String>,
    #[arg(long)]
    pub first_name: Option<String>,
    #[arg(long)]
    pub last_name: Option<String>,
    #[arg(long)]
    pub email: Option<String>,
}

#[derive(Debug, Subcommand)]
pub enum ConfigAction {
    /// Print the effective configuration.
    Show,
}
