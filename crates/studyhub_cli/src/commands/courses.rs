//! `studyhub courses ...`

use super::{cell, CommandResult, Context};
use crate::args::{CourseAction, CourseFields};
use studyhub_core::academic::grade::{course_grade, letter_grade};
use studyhub_core::repo::assignment_repo::{AssignmentRepository, SqliteAssignmentRepository};
use studyhub_core::repo::course_repo::SqliteCourseRepository;
use studyhub_core::{CourseDraft, CoursePatch, CourseService};

pub fn run(action: CourseAction, ctx: &Context) -> CommandResult {
    let assignments = SqliteAssignmentRepository::new(&ctx.conn);
    let service = CourseService::new(SqliteCourseRepository::new(&ctx.conn), &assignments);

    match action {
        CourseAction::List { json } => {
            let courses = service.list_courses()?;
            if json {
                println!("{}", serde_json::to_string_pretty(&courses)?);
                return Ok(());
            }
            if courses.is_empty() {
                println!("No courses yet.");
                return Ok(());
            }
            let all_assignments = assignments.list_assignments()?;
            println!(
                "{:>4}  {:<28} {:>7}  {:<12} {:<20} GRADE",
                "ID", "NAME", "CREDITS", "SEMESTER", "INSTRUCTOR"
            );
            for course in courses {
                let grade = course_grade(course.id, &all_assignments)
                    .map(|grade| format!("{grade}% {}", letter_grade(grade)))
                    .unwrap_or_else(|| "-".to_string());
                println!(
                    "{:>4}  {:<28} {:>7}  {:<12} {:<20} {grade}",
                    course.id,
                    course.name,
                    course.credits,
                    cell(&course.semester),
                    cell(&course.instructor),
                );
            }
        }
        CourseAction::Add { name, fields } => {
            let mut draft = CourseDraft::new(name);
            let CourseFields {
                instructor,
                schedule,
                color,
                semester,
                credits,
            } = fields;
            if let Some(instructor) = instructor {
                draft.instructor = instructor;
            }
            if let Some(schedule) = schedule {
                draft.schedule = schedule;
            }
            if let Some(color) = color {
                draft.color = color;
            }
            if let Some(semester) = semester {
                draft.semester = semester;
            }
            if let Some(credits) = credits {
                draft.credits = credits;
            }
            let course = service.create_course(&draft)?;
            println!("Added course {}: {}", course.id, course.name);
        }
        CourseAction::Edit { id, name, fields } => {
            let patch = CoursePatch {
                name,
                instructor: fields.instructor,
                schedule: fields.schedule,
                color: fields.color,
                semester: fields.semester,
                credits: fields.credits,
            };
            let course = service.update_course(id, &patch)?;
            println!("Updated course {}: {}", course.id, course.name);
        }
        CourseAction::Remove { id } => {
            let removed = service.delete_course(id)?;
            println!("Removed course {id} and {removed} assignment(s)");
        }
    }
    Ok(())
}
