use chrono::{DateTime, Utc};
use quickwin_core::Task;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Statistics {
    pub total_tasks: usize,
    pub completed_tasks: usize,
    pub pending_tasks: usize,
    pub overdue_tasks: usize,
    /// Percentage, 0..=100.
    pub completion_rate: f64,
}

impl Statistics {
    pub fn from_tasks(tasks: &[Task], now: DateTime<Utc>) -> Self {
        let total = tasks.len();
        let completed = tasks.iter().filter(|t| t.completed).count();
        let overdue = tasks.iter().filter(|t| t.is_overdue(now)).count();

        let completion_rate = if total == 0 {
            0.0
        } else {
            completed as f64 / total as f64 * 100.0
        };

        Self {
            total_tasks: total,
            completed_tasks: completed,
            pending_tasks: total - completed,
            overdue_tasks: overdue,
            completion_rate,
        }
    }
}
