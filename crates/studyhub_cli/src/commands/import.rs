//! `studyhub import <file>`

use super::{CommandResult, Context};
use std::path::Path;
use studyhub_core::import_snapshot_into;
use studyhub_core::record::RemoteSnapshot;

pub fn run(ctx: &Context, file: &Path) -> CommandResult {
    let text = std::fs::read_to_string(file)
        .map_err(|err| format!("failed to read `{}`: {err}", file.display()))?;
    let snapshot = RemoteSnapshot::from_json(&text)?;
    let summary = import_snapshot_into(&ctx.conn, snapshot, &ctx.tz)?;

    println!(
        "Imported {} course(s), {} assignment(s), {} student(s)",
        summary.courses, summary.assignments, summary.students
    );
    for line in &summary.skipped {
        println!("skipped {line}");
    }
    Ok(())
}
