//! Periodic task schedule.
//!
//! The schedule handed to the external task runner is the extension task
//! list followed by the base task list. It is computed once and never
//! changes for the life of the process.

use once_cell::sync::Lazy;
use std::fmt;
use std::time::Duration;

/// A periodic task descriptor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScheduledTask {
    /// Unique schedule entry name.
    pub name: &'static str,
    /// Name of the task the runner executes.
    pub task: &'static str,
    /// Interval between runs.
    pub schedule: Duration,
}

impl ScheduledTask {
    const fn new(name: &'static str, task: &'static str, schedule: Duration) -> Self {
        Self { name, task, schedule }
    }
}

impl fmt::Display for ScheduledTask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {} every {}", self.name, self.task, format_interval(self.schedule))
    }
}

const MINUTE: u64 = 60;
const HOUR: u64 = 60 * MINUTE;
const DAY: u64 = 24 * HOUR;

/// Tasks every deployment runs.
pub const BASE_TASKS: &[ScheduledTask] = &[
    ScheduledTask::new(
        "check-for-document-set-sync",
        "check_for_document_sets_sync_task",
        Duration::from_secs(5),
    ),
    ScheduledTask::new(
        "check-for-cc-pair-deletion",
        "check_for_cc_pair_deletion_task",
        Duration::from_secs(MINUTE),
    ),
    ScheduledTask::new(
        "check-for-prune",
        "check_for_prune_task",
        Duration::from_secs(5),
    ),
    ScheduledTask::new(
        "kombu-message-cleanup",
        "kombu_message_cleanup_task",
        Duration::from_secs(HOUR),
    ),
];

/// Tasks added by the permission-sync and reporting extensions.
pub const EXTENSION_TASKS: &[ScheduledTask] = &[
    ScheduledTask::new(
        "sync-external-doc-permissions",
        "check_sync_external_doc_permissions_task",
        Duration::from_secs(5),
    ),
    ScheduledTask::new(
        "sync-external-group-permissions",
        "check_sync_external_group_permissions_task",
        Duration::from_secs(5),
    ),
    ScheduledTask::new(
        "autogenerate_usage_report",
        "autogenerate_usage_report_task",
        Duration::from_secs(30 * DAY),
    ),
    ScheduledTask::new(
        "check-ttl-management",
        "check_ttl_management_task",
        Duration::from_secs(HOUR),
    ),
];

static TASKS_TO_SCHEDULE: Lazy<Vec<ScheduledTask>> =
    Lazy::new(|| merge_schedules(EXTENSION_TASKS, BASE_TASKS));

/// Concatenate two schedules, keeping the order of both.
pub fn merge_schedules(first: &[ScheduledTask], second: &[ScheduledTask]) -> Vec<ScheduledTask> {
    first.iter().chain(second).cloned().collect()
}

/// The combined schedule for this process.
pub fn tasks_to_schedule() -> &'static [ScheduledTask] {
    &TASKS_TO_SCHEDULE
}

/// Format an interval using the largest whole unit.
pub fn format_interval(interval: Duration) -> String {
    let secs = interval.as_secs();
    match secs {
        s if s >= DAY && s % DAY == 0 => format!("{}d", s / DAY),
        s if s >= HOUR && s % HOUR == 0 => format!("{}h", s / HOUR),
        s if s >= MINUTE && s % MINUTE == 0 => format!("{}m", s / MINUTE),
        s => format!("{}s", s),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extension_tasks_come_first() {
        let tasks = tasks_to_schedule();
        assert_eq!(tasks.len(), EXTENSION_TASKS.len() + BASE_TASKS.len());
        assert_eq!(&tasks[..EXTENSION_TASKS.len()], EXTENSION_TASKS);
        assert_eq!(&tasks[EXTENSION_TASKS.len()..], BASE_TASKS);
    }

    #[test]
    fn test_schedule_is_computed_once() {
        assert!(std::ptr::eq(tasks_to_schedule(), tasks_to_schedule()));
    }

    #[test]
    fn test_merge_keeps_duplicates_in_order() {
        let merged = merge_schedules(&BASE_TASKS[..1], &BASE_TASKS[..1]);
        assert_eq!(merged.len(), 2);
        assert_eq!(merged[0], merged[1]);
    }

    #[test]
    fn test_names_are_unique() {
        let mut names: Vec<_> = tasks_to_schedule().iter().map(|t| t.name).collect();
        names.sort();
        names.dedup();
        assert_eq!(names.len(), tasks_to_schedule().len());
    }

    #[test]
    fn test_format_interval() {
        assert_eq!(format_interval(Duration::from_secs(5)), "5s");
        assert_eq!(format_interval(Duration::from_secs(90)), "90s");
        assert_eq!(format_interval(Duration::from_secs(3600)), "1h");
        assert_eq!(format_interval(Duration::from_secs(30 * DAY)), "30d");
        assert_eq!(
            EXTENSION_TASKS[2].to_string(),
            "autogenerate_usage_report -> autogenerate_usage_report_task every 30d"
        );
    }
}
