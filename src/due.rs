use std::fmt;

use chrono::NaiveDate;

use crate::models::{Machine, MaintenanceTask, UsageTracking};

/// Why a task is due.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DueReason {
    NeverPerformed,
    TimeElapsed,
    UsageReached,
}

impl fmt::Display for DueReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            DueReason::NeverPerformed => "never performed",
            DueReason::TimeElapsed => "time threshold reached",
            DueReason::UsageReached => "usage threshold reached",
        };
        f.write_str(s)
    }
}

impl MaintenanceTask {
    /// Whole days since the last completion, `None` if never performed.
    pub fn days_since_last(&self, today: NaiveDate) -> Option<i64> {
        self.last_date().map(|last| (today - last).num_days())
    }

    /// Days left before the time threshold; zero or negative once due.
    pub fn days_remaining(&self, today: NaiveDate) -> Option<i64> {
        self.days_since_last(today)
            .map(|elapsed| i64::from(self.threshold_days()) - elapsed)
    }

    /// Usage left before the usage threshold; negative once exceeded.
    pub fn usage_remaining(&self) -> Option<f64> {
        match self.usage() {
            UsageTracking::Tracked {
                threshold_usage: Some(threshold),
                usage_count,
            } => Some(threshold - usage_count),
            _ => None,
        }
    }

    /// The first reason the task is due, checked in order: never performed,
    /// elapsed time, then accumulated usage.
    pub fn due_reason(&self, today: NaiveDate) -> Option<DueReason> {
        let Some(elapsed) = self.days_since_last(today) else {
            return Some(DueReason::NeverPerformed);
        };
        if elapsed >= i64::from(self.threshold_days()) {
            return Some(DueReason::TimeElapsed);
        }
        match self.usage_remaining() {
            Some(left) if left <= 0.0 => Some(DueReason::UsageReached),
            _ => None,
        }
    }

    pub fn is_overdue(&self, today: NaiveDate) -> bool {
        self.due_reason(today).is_some()
    }
}

/// One overdue task in a fleet-wide report.
#[derive(Debug, Clone, PartialEq)]
pub struct DueEntry {
    /// Position of the machine in the fleet.
    pub machine_index: usize,
    pub machine_name: String,
    pub task_id: String,
    pub task_name: String,
    pub reason: DueReason,
    pub days_since_last: Option<i64>,
}

/// Collects every overdue task across `machines`, in fleet then task order.
pub fn collect_due(machines: &[Machine], today: NaiveDate) -> Vec<DueEntry> {
    machines
        .iter()
        .enumerate()
        .flat_map(|(machine_index, machine)| {
            machine.tasks().filter_map(move |task| {
                task.due_reason(today).map(|reason| DueEntry {
                    machine_index,
                    machine_name: machine.name().to_string(),
                    task_id: task.task_id().to_string(),
                    task_name: task.name().to_string(),
                    reason,
                    days_since_last: task.days_since_last(today),
                })
            })
        })
        .collect()
}
