//! Small read-only helpers over schedules.

use crate::rank::compare_deadlines;
use crate::task::Task;

/// Earliest deadline first, tasks without a deadline last. Stable.
pub fn sort_by_deadline(tasks: &[Task]) -> Vec<Task> {
    let mut sorted = tasks.to_vec();
    sorted.sort_by(compare_deadlines);
    sorted
}

/// Total minutes of work in a schedule.
pub fn total_duration(schedule: &[Task]) -> i64 {
    schedule.iter().map(|t| i64::from(t.duration)).sum()
}

pub fn is_feasible(schedule: &[Task], budget_minutes: i64) -> bool {
    total_duration(schedule) <= budget_minutes
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone, Utc};

    #[test]
    fn test_sort_by_deadline_puts_missing_last_and_is_stable() {
        let base = Utc.with_ymd_and_hms(2026, 2, 21, 9, 0, 0).unwrap();
        let tasks = vec![
            Task::new(1, "none a"),
            Task::new(2, "late").with_deadline(base + Duration::hours(5)),
            Task::new(3, "tie a").with_deadline(base + Duration::hours(1)),
            Task::new(4, "none b"),
            Task::new(5, "tie b").with_deadline(base + Duration::hours(1)),
        ];
        let ids: Vec<u64> = sort_by_deadline(&tasks).iter().map(|t| t.id.0).collect();
        assert_eq!(ids, vec![3, 5, 2, 1, 4]);
    }

    #[test]
    fn test_sort_by_deadline_keeps_completed_tasks() {
        let tasks = vec![Task::new(1, "done").with_completed(true)];
        assert_eq!(sort_by_deadline(&tasks).len(), 1);
    }

    #[test]
    fn test_totals_and_feasibility() {
        let schedule = vec![
            Task::new(1, "a").with_duration(25),
            Task::new(2, "b").with_duration(35),
        ];
        assert_eq!(total_duration(&schedule), 60);
        assert!(is_feasible(&schedule, 60));
        assert!(!is_feasible(&schedule, 59));

        assert_eq!(total_duration(&[]), 0);
        assert!(is_feasible(&[], 0));
        assert!(!is_feasible(&[], -1));
    }
}
