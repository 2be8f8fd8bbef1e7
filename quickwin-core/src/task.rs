//! Task model read by the ranking core.
//!
//! The store owns the canonical records; everything in this crate only reads
//! them and hands back new orderings.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Stable task identifier, allocated by the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskId(pub u64);

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Core task type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub id: TaskId,
    pub title: String,

    /// 1-5, 5 is most important.
    pub priority: u8,

    /// Optional hard deadline (UTC).
    #[serde(default)]
    pub deadline: Option<DateTime<Utc>>,

    /// Minutes.
    pub duration: u32,

    #[serde(default)]
    pub completed: bool,
}

impl Task {
    pub fn new(id: u64, title: impl Into<String>) -> Self {
        Self {
            id: TaskId(id),
            title: title.into(),
            priority: 3,
            deadline: None,
            duration: 30,
            completed: false,
        }
    }

    pub fn with_priority(mut self, priority: u8) -> Self {
        self.priority = priority;
        self
    }

    pub fn with_deadline(mut self, deadline: DateTime<Utc>) -> Self {
        self.deadline = Some(deadline);
        self
    }

    pub fn with_duration(mut self, minutes: u32) -> Self {
        self.duration = minutes;
        self
    }

    pub fn with_completed(mut self, completed: bool) -> Self {
        self.completed = completed;
        self
    }

    /// Deadline has passed and the task is still open.
    pub fn is_overdue(&self, now: DateTime<Utc>) -> bool {
        match self.deadline {
            Some(dl) => dl < now && !self.completed,
            None => false,
        }
    }

    /// Fractional hours until the deadline; negative once it has passed.
    /// `None` means no deadline, i.e. unbounded time remaining.
    pub fn hours_until_deadline(&self, now: DateTime<Utc>) -> Option<f64> {
        self.deadline
            .map(|dl| (dl - now).num_seconds() as f64 / 3600.0)
    }

    /// One-line summary; the caller renders the deadline (e.g. in a local zone).
    pub fn summary_line(&self, deadline: Option<&str>) -> String {
        let status = if self.completed { "[COMPLETED]" } else { "[PENDING]" };
        format!(
            "{} Task #{}: {} | Priority: {} ({}) | Duration: {} min | Deadline: {}",
            status,
            self.id,
            self.title,
            self.priority_level(),
            self.priority,
            self.duration,
            deadline.unwrap_or("No deadline")
        )
    }

    pub fn priority_level(&self) -> &'static str {
        match self.priority {
            5 => "Critical",
            4 => "High",
            3 => "Medium",
            2 => "Low",
            1 => "Very Low",
            _ => "Unknown",
        }
    }
}

impl fmt::Display for Task {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let deadline = self
            .deadline
            .map(|dl| dl.format("%Y-%m-%d %H:%M").to_string());
        f.write_str(&self.summary_line(deadline.as_deref()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 2, 21, 9, 0, 0).unwrap()
    }

    #[test]
    fn test_overdue_requires_past_deadline_and_open_task() {
        let past = Task::new(1, "late").with_deadline(now() - Duration::minutes(1));
        assert!(past.is_overdue(now()));
        assert!(!past.clone().with_completed(true).is_overdue(now()));

        let exact = Task::new(2, "due now").with_deadline(now());
        assert!(!exact.is_overdue(now()));

        assert!(!Task::new(3, "someday").is_overdue(now()));
    }

    #[test]
    fn test_hours_until_deadline_is_signed_and_fractional() {
        let t = Task::new(1, "soon").with_deadline(now() + Duration::minutes(90));
        assert_eq!(t.hours_until_deadline(now()), Some(1.5));

        let late = Task::new(2, "late").with_deadline(now() - Duration::hours(2));
        assert_eq!(late.hours_until_deadline(now()), Some(-2.0));

        assert_eq!(Task::new(3, "open").hours_until_deadline(now()), None);
    }

    #[test]
    fn test_display_matches_listing_format() {
        let t = Task::new(7, "Write report")
            .with_priority(4)
            .with_duration(45)
            .with_deadline(Utc.with_ymd_and_hms(2026, 2, 20, 23, 59, 0).unwrap());
        assert_eq!(
            t.to_string(),
            "[PENDING] Task #7: Write report | Priority: High (4) | Duration: 45 min | Deadline: 2026-02-20 23:59"
        );
    }

    #[test]
    fn test_summary_line_takes_rendered_deadline() {
        let t = Task::new(2, "Stretch").with_priority(1).with_completed(true);
        assert_eq!(
            t.summary_line(None),
            "[COMPLETED] Task #2: Stretch | Priority: Very Low (1) | Duration: 30 min | Deadline: No deadline"
        );
        assert!(t.summary_line(Some("tomorrow 09:00")).ends_with("Deadline: tomorrow 09:00"));
    }

    #[test]
    fn test_deserializes_without_optional_fields() {
        let t: Task =
            serde_json::from_str(r#"{"id":4,"title":"x","priority":2,"duration":15}"#).unwrap();
        assert_eq!(t.id, TaskId(4));
        assert!(t.deadline.is_none());
        assert!(!t.completed);
    }
}
