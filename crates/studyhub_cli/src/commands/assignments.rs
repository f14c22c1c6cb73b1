//! `studyhub assignments ...`

use super::{CommandResult, Context};
use crate::args::AssignmentAction;
use std::collections::HashMap;
use studyhub_core::academic::due::{classify_due, parse_due_timestamp};
use studyhub_core::academic::filter::{AssignmentFilter, SortKey};
use studyhub_core::academic::grade::letter_grade;
use studyhub_core::model::assignment::normalize_description;
use studyhub_core::repo::assignment_repo::SqliteAssignmentRepository;
use studyhub_core::repo::course_repo::{CourseRepository, SqliteCourseRepository};
use studyhub_core::{Assignment, AssignmentDraft, AssignmentPatch, AssignmentService};

pub fn run(action: AssignmentAction, ctx: &Context) -> CommandResult {
    let courses = SqliteCourseRepository::new(&ctx.conn);
    let service = AssignmentService::new(SqliteAssignmentRepository::new(&ctx.conn), &courses);

    match action {
        AssignmentAction::List {
            course,
            priority,
            status,
            sort,
            json,
        } => {
            let filter = AssignmentFilter::from_pairs([
                ("courseId", course.as_deref().unwrap_or_default()),
                ("priority", priority.as_deref().unwrap_or_default()),
                ("status", status.as_deref().unwrap_or_default()),
            ])?;
            let sort = sort.parse::<SortKey>()?;
            let assignments = service.list_filtered(&filter, sort, &ctx.now)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&assignments)?);
                return Ok(());
            }
            let names = courses
                .list_courses()?
                .into_iter()
                .map(|course| (course.id, course.name))
                .collect::<HashMap<_, _>>();
            print_table(&assignments, &names, ctx);
        }
        AssignmentAction::Add {
            course,
            title,
            due,
            priority,
            weight,
            description,
        } => {
            let mut draft = AssignmentDraft::new(course, title, parse_due_timestamp(&due, &ctx.tz)?);
            if let Some(priority) = priority {
                draft.priority = priority;
            }
            if let Some(weight) = weight {
                draft.weight = weight;
            }
            draft.description = normalize_description(description);
            let assignment = service.create_assignment(&draft)?;
            println!("Added assignment {}: {}", assignment.id, assignment.title);
        }
        AssignmentAction::Edit {
            id,
            course,
            title,
            due,
            priority,
            weight,
            description,
        } => {
            let due_at = due
                .map(|text| parse_due_timestamp(&text, &ctx.tz))
                .transpose()?;
            let patch = AssignmentPatch {
                course_id: course,
                title,
                description: description.map(Some),
                due_at,
                priority,
                weight,
            };
            let assignment = service.update_assignment(id, &patch)?;
            println!("Updated assignment {}: {}", assignment.id, assignment.title);
        }
        AssignmentAction::Toggle { id } => {
            let assignment = service.toggle_complete(id)?;
            let state = if assignment.completed {
                "completed"
            } else {
                "pending"
            };
            println!("Assignment {id} is now {state}");
        }
        AssignmentAction::Grade { id, grade } => {
            let assignment = service.record_grade(id, grade)?;
            println!(
                "Graded assignment {}: {grade}% ({})",
                assignment.id,
                letter_grade(grade)
            );
        }
        AssignmentAction::Ungrade { id } => {
            service.clear_grade(id)?;
            println!("Cleared grade of assignment {id}");
        }
        AssignmentAction::Remove { id } => {
            service.delete_assignment(id)?;
            println!("Removed assignment {id}");
        }
    }
    Ok(())
}

fn print_table(assignments: &[Assignment], course_names: &HashMap<i64, String>, ctx: &Context) {
    if assignments.is_empty() {
        println!("No assignments match.");
        return;
    }
    println!(
        "{:>4}  {:<18} {:<28} {:<20} {:<8} {:>6}  GRADE",
        "ID", "DUE", "TITLE", "COURSE", "PRIORITY", "WEIGHT"
    );
    for assignment in assignments {
        let due = classify_due(assignment.due_at, assignment.completed, &ctx.now);
        let course = course_names
            .get(&assignment.course_id)
            .map_or("-", String::as_str);
        let grade = assignment
            .grade
            .map(|grade| format!("{grade}% {}", letter_grade(grade)))
            .unwrap_or_else(|| "-".to_string());
        println!(
            "{:>4}  {:<18} {:<28} {:<20} {:<8} {:>6}  {grade}",
            assignment.id,
            due.label,
            assignment.title,
            course,
            assignment.priority.as_str(),
            assignment.weight,
        );
    }
}
