//! Schedule command implementation.

use crate::cli::Output;
use crate::schedule::{format_interval, tasks_to_schedule};
use anyhow::Result;

/// Run the schedule command.
pub fn run_schedule() -> Result<()> {
    let tasks = tasks_to_schedule();

    Output::header(&format!("Scheduled tasks ({})", tasks.len()));
    println!();

    for task in tasks {
        Output::list_item(&format!(
            "{} ({}, every {})",
            task.name,
            task.task,
            format_interval(task.schedule)
        ));
    }

    Ok(())
}
