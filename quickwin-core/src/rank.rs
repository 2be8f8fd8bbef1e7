//! Orderer: turns an unordered task set into an execution order.
//!
//! One compound comparator, highest precedence first:
//! 1) overdue before not overdue
//! 2) nearer deadline first (no deadline sorts after any deadline)
//! 3) higher score first
//! 4) input order (stable sort)

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::cmp::Ordering;

use crate::score::score;
use crate::task::Task;

/// A pending task with the values it was ranked by.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedTask {
    pub task: Task,
    pub score: f64,
    pub overdue: bool,
}

/// Rank pending tasks. Completed tasks are dropped; the input is untouched.
pub fn rank(tasks: &[Task], now: DateTime<Utc>) -> Vec<Task> {
    rank_scored(tasks, now)
        .into_iter()
        .map(|r| r.task)
        .collect()
}

/// Same order as [`rank`], keeping the score computed for each task.
pub fn rank_scored(tasks: &[Task], now: DateTime<Utc>) -> Vec<RankedTask> {
    // Scores are computed once here and reused by every comparison.
    let mut ranked: Vec<RankedTask> = tasks
        .iter()
        .filter(|t| !t.completed)
        .map(|t| RankedTask {
            score: score(t, now),
            overdue: t.is_overdue(now),
            task: t.clone(),
        })
        .collect();

    // sort_by is stable, so residual ties keep input order.
    ranked.sort_by(compare_ranked);
    ranked
}

fn compare_ranked(a: &RankedTask, b: &RankedTask) -> Ordering {
    // overdue first
    b.overdue
        .cmp(&a.overdue)
        // then deadline proximity
        .then_with(|| compare_deadlines(&a.task, &b.task))
        // then score desc
        .then_with(|| b.score.total_cmp(&a.score))
}

/// Earlier deadline first; `None` behaves as an infinitely distant deadline.
pub(crate) fn compare_deadlines(a: &Task, b: &Task) -> Ordering {
    match (a.deadline, b.deadline) {
        (Some(da), Some(db)) => da.cmp(&db),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}
