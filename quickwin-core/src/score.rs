//! Importance-under-urgency score.
//!
//! `score = 0.5 * priority + 0.3 * urgency + 0.2 * effort`, each term
//! normalised to (0, 1], so the total stays in (0, 1].

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::task::Task;

pub const WEIGHT_PRIORITY: f64 = 0.5;
pub const WEIGHT_URGENCY: f64 = 0.3;
pub const WEIGHT_EFFORT: f64 = 0.2;

/// Urgency assigned to tasks without a deadline.
pub const NO_DEADLINE_URGENCY: f64 = 0.1;
/// Urgency once the deadline has passed.
pub const OVERDUE_URGENCY: f64 = 1.0;
/// Urgency with less than one full hour left.
pub const LAST_HOUR_URGENCY: f64 = 0.99;

/// Per-term view of a score, for explaining a ranking.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ScoreBreakdown {
    pub priority: f64,
    pub urgency: f64,
    pub effort: f64,
    pub total: f64,
}

pub fn score(task: &Task, now: DateTime<Utc>) -> f64 {
    score_breakdown(task, now).total
}

pub fn score_breakdown(task: &Task, now: DateTime<Utc>) -> ScoreBreakdown {
    let priority = priority_term(task);
    let urgency = urgency(task, now);
    let effort = effort(task);

    ScoreBreakdown {
        priority,
        urgency,
        effort,
        total: WEIGHT_PRIORITY * priority + WEIGHT_URGENCY * urgency + WEIGHT_EFFORT * effort,
    }
}

/// Priority 1..=5 mapped onto 0.2..=1.0.
pub fn priority_term(task: &Task) -> f64 {
    f64::from(task.priority) / 5.0
}

/// Deadline proximity: 1h ~ 0.96, 24h = 0.5, one week = 0.125.
pub fn urgency(task: &Task, now: DateTime<Utc>) -> f64 {
    let Some(deadline) = task.deadline else {
        return NO_DEADLINE_URGENCY;
    };
    if deadline < now {
        return OVERDUE_URGENCY;
    }

    let hours = (deadline - now).num_seconds() as f64 / 3600.0;
    if hours < 1.0 {
        return LAST_HOUR_URGENCY;
    }
    1.0 / (1.0 + hours / 24.0)
}

/// Shorter tasks score higher: 15 min = 0.8, 60 min = 0.5, 240 min = 0.2.
pub fn effort(task: &Task) -> f64 {
    1.0 / (1.0 + f64::from(task.duration) / 60.0)
}
