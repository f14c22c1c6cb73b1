//! Month calendar view model.
//!
//! # Responsibility
//! - Lay out a month as whole Sunday-first weeks.
//! - Place assignments on the local calendar day they are due.

use crate::model::assignment::Assignment;
use chrono::{DateTime, Datelike, Days, Months, NaiveDate, TimeZone};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Requested month does not exist.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidMonth {
    pub year: i32,
    pub month: u32,
}

impl Display for InvalidMonth {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "invalid calendar month {}-{:02}", self.year, self.month)
    }
}

impl Error for InvalidMonth {}

/// One cell of the month grid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CalendarDay {
    pub date: NaiveDate,
    /// `false` for leading/trailing days borrowed from adjacent months.
    pub in_month: bool,
    pub is_today: bool,
    pub assignments: Vec<Assignment>,
}

/// Month view with per-day assignments and completion counts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonthView {
    pub year: i32,
    pub month: u32,
    pub days: Vec<CalendarDay>,
    /// Assignments due within the month.
    pub total: usize,
    pub completed: usize,
    /// Pending assignments regardless of due date.
    pub pending_overall: usize,
}

/// Sunday-first dates covering every week that touches the month.
pub fn month_grid(year: i32, month: u32) -> Result<Vec<NaiveDate>, InvalidMonth> {
    let invalid = || InvalidMonth { year, month };
    let first = NaiveDate::from_ymd_opt(year, month, 1).ok_or_else(invalid)?;
    let last = first
        .checked_add_months(Months::new(1))
        .and_then(|next| next.pred_opt())
        .ok_or_else(invalid)?;

    let lead = u64::from(first.weekday().num_days_from_sunday());
    let trail = 6 - u64::from(last.weekday().num_days_from_sunday());
    let start = first.checked_sub_days(Days::new(lead)).ok_or_else(invalid)?;
    let end = last.checked_add_days(Days::new(trail)).ok_or_else(invalid)?;

    Ok(start.iter_days().take_while(|day| *day <= end).collect())
}

/// Assignments due on `date` in `tz`'s local calendar.
pub fn assignments_on<Tz: TimeZone>(date: NaiveDate, assignments: &[Assignment], tz: &Tz) -> Vec<Assignment> {
    assignments
        .iter()
        .filter(|assignment| assignment.due_at.with_timezone(tz).date_naive() == date)
        .cloned()
        .collect()
}

/// Builds the month view for `year`/`month` relative to `now`.
pub fn month_view<Tz: TimeZone>(
    year: i32,
    month: u32,
    assignments: &[Assignment],
    now: &DateTime<Tz>,
) -> Result<MonthView, InvalidMonth> {
    let tz = now.timezone();
    let today = now.date_naive();
    let days = month_grid(year, month)?
        .into_iter()
        .map(|date| CalendarDay {
            date,
            in_month: date.month() == month,
            is_today: date == today,
            assignments: assignments_on(date, assignments, &tz),
        })
        .collect::<Vec<_>>();

    let in_month = assignments
        .iter()
        .filter(|assignment| {
            let local = assignment.due_at.with_timezone(&tz);
            local.year() == year && local.month() == month
        })
        .collect::<Vec<_>>();

    Ok(MonthView {
        year,
        month,
        days,
        total: in_month.len(),
        completed: in_month.iter().filter(|assignment| assignment.completed).count(),
        pending_overall: assignments.iter().filter(|assignment| !assignment.completed).count(),
    })
}
