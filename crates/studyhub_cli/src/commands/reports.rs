//! `studyhub dashboard`, `studyhub grades` and `studyhub calendar`.

use super::{CommandResult, Context};
use chrono::{Datelike, NaiveDate};
use std::collections::HashMap;
use std::error::Error;
use std::fmt::{Display, Formatter};
use studyhub_core::academic::due::classify_due;
use studyhub_core::repo::assignment_repo::SqliteAssignmentRepository;
use studyhub_core::repo::course_repo::{CourseRepository, SqliteCourseRepository};
use studyhub_core::{Assignment, ReportService};

#[derive(Debug)]
struct InvalidMonthArg(String);

impl Display for InvalidMonthArg {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "invalid month `{}`; expected YYYY-MM", self.0)
    }
}

impl Error for InvalidMonthArg {}

pub fn dashboard(ctx: &Context) -> CommandResult {
    let courses = SqliteCourseRepository::new(&ctx.conn);
    let service = ReportService::new(&courses, SqliteAssignmentRepository::new(&ctx.conn));
    let summary = service.dashboard(&ctx.now)?;
    let names = course_names(&courses)?;

    println!(
        "Assignments: {} total, {} completed ({}%)",
        summary.total, summary.completed, summary.completion_rate
    );
    println!("GPA: {:.2}", summary.gpa);
    print_section("Overdue", &summary.overdue, &names, ctx);
    print_section("Due today", &summary.due_today, &names, ctx);
    print_section("Upcoming", &summary.upcoming, &names, ctx);
    Ok(())
}

pub fn grades(ctx: &Context, course: Option<i64>) -> CommandResult {
    let service = ReportService::new(
        SqliteCourseRepository::new(&ctx.conn),
        SqliteAssignmentRepository::new(&ctx.conn),
    );
    let report = service.grade_report(course)?;

    println!("Overall GPA: {:.2}", report.overall_gpa);
    println!("{}", report.standing.message());
    let Some(stats) = report.statistics else {
        println!("No graded assignments yet.");
        return Ok(());
    };
    println!(
        "Graded: {}  average {}%  highest {}%  lowest {}%",
        stats.count, stats.average, stats.highest, stats.lowest
    );

    println!();
    println!("{:<28} {:>7}  {:>5}  {:<6} POINTS", "COURSE", "CREDITS", "GRADE", "LETTER");
    for line in &report.courses {
        println!(
            "{:<28} {:>7}  {:>4}%  {:<6} {:.1}",
            line.course.name, line.course.credits, line.grade, line.letter, line.grade_point
        );
    }

    println!();
    println!("{:<28} {:<20} {:>6}  {:>5}  LETTER", "ASSIGNMENT", "COURSE", "WEIGHT", "GRADE");
    for line in &report.graded {
        println!(
            "{:<28} {:<20} {:>6}  {:>4}%  {} ({})",
            line.assignment.title,
            line.course_name,
            line.assignment.weight,
            line.grade,
            line.letter,
            line.band.as_str()
        );
    }
    Ok(())
}

pub fn calendar(ctx: &Context, month: Option<&str>) -> CommandResult {
    let (year, month) = match month {
        Some(text) => parse_month(text)?,
        None => (ctx.now.year(), ctx.now.month()),
    };
    let service = ReportService::new(
        SqliteCourseRepository::new(&ctx.conn),
        SqliteAssignmentRepository::new(&ctx.conn),
    );
    let view = service.calendar(year, month, &ctx.now)?;

    let title = NaiveDate::from_ymd_opt(year, month, 1)
        .map(|first| first.format("%B %Y").to_string())
        .unwrap_or_default();
    println!("{title}");
    println!(" Sun  Mon  Tue  Wed  Thu  Fri  Sat");
    for week in view.days.chunks(7) {
        let row = week
            .iter()
            .map(|day| {
                if !day.in_month {
                    return "    ".to_string();
                }
                let marker = if day.is_today { '*' } else { ' ' };
                let count = if day.assignments.is_empty() {
                    ' '
                } else {
                    char::from_digit(day.assignments.len().min(9) as u32, 10).unwrap_or('+')
                };
                format!("{marker}{:>2}{count}", day.date.day())
            })
            .collect::<Vec<_>>()
            .join(" ");
        println!("{row}");
    }

    println!();
    for day in view.days.iter().filter(|day| day.in_month) {
        for assignment in &day.assignments {
            let due = classify_due(assignment.due_at, assignment.completed, &ctx.now);
            println!(
                "{}  {}  [{}]",
                day.date.format("%b %-d"),
                assignment.title,
                due.label
            );
        }
    }
    println!(
        "{} of {} due this month completed; {} pending overall",
        view.completed, view.total, view.pending_overall
    );
    Ok(())
}

fn parse_month(text: &str) -> Result<(i32, u32), InvalidMonthArg> {
    NaiveDate::parse_from_str(&format!("{}-01", text.trim()), "%Y-%m-%d")
        .map(|date| (date.year(), date.month()))
        .map_err(|_| InvalidMonthArg(text.to_string()))
}

fn course_names<C: CourseRepository>(courses: &C) -> CommandResult<HashMap<i64, String>> {
    Ok(courses
        .list_courses()?
        .into_iter()
        .map(|course| (course.id, course.name))
        .collect())
}

fn print_section(
    heading: &str,
    assignments: &[Assignment],
    course_names: &HashMap<i64, String>,
    ctx: &Context,
) {
    println!();
    println!("{heading} ({})", assignments.len());
    for assignment in assignments {
        let due = classify_due(assignment.due_at, assignment.completed, &ctx.now);
        let course = course_names
            .get(&assignment.course_id)
            .map_or("-", String::as_str);
        println!("  - {} ({course}) {}", assignment.title, due.label);
    }
}

#[cfg(test)]
mod tests {
    use super::parse_month;

    #[test]
    fn parse_month_accepts_year_month() {
        assert_eq!(parse_month("2024-10").unwrap(), (2024, 10));
        assert!(parse_month("2024-13").is_err());
        assert!(parse_month("October").is_err());
    }
}
