//! Subcommand handlers.

pub mod assignments;
pub mod config;
pub mod courses;
pub mod import;
pub mod reports;
pub mod students;

use crate::args::Command;
use chrono::{DateTime, FixedOffset, Utc};
use std::error::Error;
use studyhub_core::academic::due::parse_due_timestamp;
use studyhub_core::config::AppConfig;
use studyhub_core::db::{open_db, Connection};

pub type CommandResult<T = ()> = Result<T, Box<dyn Error>>;

/// Per-invocation state shared by handlers.
pub struct Context {
    pub conn: Connection,
    pub tz: FixedOffset,
    pub now: DateTime<FixedOffset>,
}

impl Context {
    pub fn open(config: &AppConfig, pinned_now: Option<&str>) -> CommandResult<Self> {
        let tz = config.timezone()?;
        let now = match pinned_now {
            Some(text) => parse_due_timestamp(text, &tz)?.with_timezone(&tz),
            None => Utc::now().with_timezone(&tz),
        };
        let conn = open_db(config.database_path())?;
        Ok(Self { conn, tz, now })
    }
}

pub fn dispatch(command: Command, ctx: &Context) -> CommandResult {
    match command {
        Command::Courses { action } => courses::run(action, ctx),
        Command::Assignments { action } => assignments::run(action, ctx),
        Command::Students { action } => students::run(action, ctx),
        Command::Dashboard => reports::dashboard(ctx),
        Command::Grades { course } => reports::grades(ctx, course),
        Command::Calendar { month } => reports::calendar(ctx, month.as_deref()),
        Command::Import { file } => import::run(ctx, &file),
        // Handled before a database is opened.
        Command::Config { .. } => Ok(()),
    }
}

/// Returns `"-"` for empty cells.
pub(crate) fn cell(value: &str) -> &str {
    if value.trim().is_empty() {
        "-"
    } else {
        value
    }
}
