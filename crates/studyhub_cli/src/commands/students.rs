//! `studyhub students ...`

use super::{cell, CommandResult, Context};
use crate::args::{StudentAction, StudentFields};
use studyhub_core::model::student::split_tags;
use studyhub_core::repo::student_repo::SqliteStudentRepository;
use studyhub_core::{StudentDraft, StudentPatch, StudentService};

pub fn run(action: StudentAction, ctx: &Context) -> CommandResult {
    let service = StudentService::new(SqliteStudentRepository::new(&ctx.conn));

    match action {
        StudentAction::List => {
            let students = service.list_students()?;
            if students.is_empty() {
                println!("No students yet.");
                return Ok(());
            }
            println!("{:>4}  {:<28} {:<32} TAGS", "ID", "NAME", "EMAIL");
            for student in students {
                println!(
                    "{:>4}  {:<28} {:<32} {}",
                    student.id,
                    cell(&student.display_name()),
                    cell(&student.email),
                    cell(&student.tags.join(", ")),
                );
            }
        }
        StudentAction::Add { fields } => {
            let patch = to_patch(fields);
            let draft = StudentDraft {
                name: patch.name.unwrap_or_default(),
                tags: patch.tags.unwrap_or_default(),
                first_name: patch.first_name.unwrap_or_default(),
                last_name: patch.last_name.unwrap_or_default(),
                email: patch.email.unwrap_or_default(),
            };
            let student = service.create_student(&draft)?;
            println!("Added student {}: {}", student.id, cell(&student.display_name()));
        }
        StudentAction::Edit { id, fields } => {
            let student = service.update_student(id, &to_patch(fields))?;
            println!("Updated student {}: {}", student.id, cell(&student.display_name()));
        }
        StudentAction::Remove { id } => {
            service.delete_student(id)?;
            println!("Removed student {id}");
        }
    }
    Ok(())
}

fn to_patch(fields: StudentFields) -> StudentPatch {
    StudentPatch {
        name: fields.name,
        tags: fields.tags.as_deref().map(split_tags),
        first_name: fields.first_name,
        last_name: fields.last_name,
        email: fields.email,
    }
}
