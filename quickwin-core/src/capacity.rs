//! Capacity selector: fit a ranked schedule into a time budget.

use chrono::{DateTime, Utc};

use crate::rank::rank;
use crate::task::Task;

/// Greedy single pass over the ranked order.
///
/// A task is taken when it still fits in the remaining budget, otherwise it
/// is skipped and the scan continues so shorter tasks further down can fill
/// the gap. This is not a knapsack: rank order wins over task count.
pub fn select_within_budget(tasks: &[Task], now: DateTime<Utc>, budget_minutes: i64) -> Vec<Task> {
    if budget_minutes <= 0 {
        return vec![];
    }

    let mut used: i64 = 0;
    let mut selected = Vec::new();

    for task in rank(tasks, now) {
        let minutes = i64::from(task.duration);
        if used + minutes > budget_minutes {
            continue;
        }
        used += minutes;
        selected.push(task);
    }

    selected
}
