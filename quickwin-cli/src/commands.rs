//! Command handlers. Each takes the store, the config and one `now` sample.

use anyhow::{Context, Result, bail};
use chrono::{DateTime, Utc};
use quickwin_core::time::{parse_duration_minutes, parse_local_deadline_to_utc};
use quickwin_core::{TaskId, rank_scored, score_breakdown};
use quickwin_store::{NewTask, TaskPatch, TaskRepository, TaskStore};
use std::collections::HashSet;
use std::io::Write;

use crate::config::Config;
use crate::render::{self, OutputFormat};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ListFilter {
    #[default]
    All,
    Pending,
    Completed,
    Overdue,
}

/// Accepts "YYYY-MM-DD HH:MM" in the configured zone, or RFC 3339.
pub fn parse_deadline(input: &str, tz: &str) -> Result<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(input.trim()) {
        return Ok(dt.with_timezone(&Utc));
    }
    parse_local_deadline_to_utc(input, tz)
}

pub fn add<R: TaskRepository>(
    store: &mut TaskStore<R>,
    cfg: &Config,
    out: &mut impl Write,
    title: &str,
    priority: i64,
    duration: &str,
    deadline: Option<&str>,
) -> Result<()> {
    let duration = parse_duration_minutes(duration)?;
    let deadline = deadline
        .map(|d| parse_deadline(d, &cfg.schedule.timezone))
        .transpose()?;

    let task = store.add(NewTask {
        title: title.to_string(),
        priority,
        deadline,
        duration,
    })?;

    writeln!(out, "Added {}", render::task_line(&task, &cfg.schedule.timezone)?)?;
    Ok(())
}

pub fn list<R: TaskRepository>(
    store: &TaskStore<R>,
    cfg: &Config,
    out: &mut impl Write,
    filter: ListFilter,
    now: DateTime<Utc>,
) -> Result<()> {
    let tasks = match filter {
        ListFilter::All => store.snapshot(),
        ListFilter::Pending => store.pending(),
        ListFilter::Completed => store.completed(),
        ListFilter::Overdue => store.overdue(now),
    };
    render::write_task_list(out, &tasks, &cfg.schedule.timezone)
}

pub fn show<R: TaskRepository>(
    store: &TaskStore<R>,
    cfg: &Config,
    out: &mut impl Write,
    id: u64,
    now: DateTime<Utc>,
) -> Result<()> {
    let task = store
        .get(TaskId(id))
        .with_context(|| format!("task #{id} not found"))?;
    writeln!(out, "{}", render::task_line(task, &cfg.schedule.timezone)?)?;

    if task.completed {
        writeln!(out, "Completed; not ranked.")?;
        return Ok(());
    }

    let b = score_breakdown(task, now);
    writeln!(
        out,
        "Score {:.3} = 0.5 x priority {:.3} + 0.3 x urgency {:.3} + 0.2 x effort {:.3}",
        b.total, b.priority, b.urgency, b.effort
    )?;
    if task.is_overdue(now) {
        writeln!(out, "OVERDUE: ranked ahead of every on-time task.")?;
    }

    let position = store
        .schedule(now)
        .iter()
        .position(|t| t.id == task.id)
        .map(|i| i + 1);
    if let Some(pos) = position {
        writeln!(out, "Position in schedule: {pos}")?;
    }
    Ok(())
}

#[allow(clippy::too_many_arguments)]
pub fn update<R: TaskRepository>(
    store: &mut TaskStore<R>,
    cfg: &Config,
    out: &mut impl Write,
    id: u64,
    title: Option<String>,
    priority: Option<i64>,
    duration: Option<&str>,
    deadline: Option<&str>,
    clear_deadline: bool,
) -> Result<()> {
    if deadline.is_some() && clear_deadline {
        bail!("--deadline and --no-deadline are mutually exclusive");
    }

    let deadline = if clear_deadline {
        Some(None)
    } else {
        deadline
            .map(|d| parse_deadline(d, &cfg.schedule.timezone).map(Some))
            .transpose()?
    };

    let patch = TaskPatch {
        title,
        priority,
        deadline,
        duration: duration.map(parse_duration_minutes).transpose()?,
    };
    if patch.is_empty() {
        bail!("nothing to update (pass --title, --priority, --duration or --deadline)");
    }

    let task = store.update(TaskId(id), patch)?;
    writeln!(out, "Updated {}", render::task_line(&task, &cfg.schedule.timezone)?)?;
    Ok(())
}

pub fn set_completed<R: TaskRepository>(
    store: &mut TaskStore<R>,
    out: &mut impl Write,
    id: u64,
    completed: bool,
) -> Result<()> {
    let task = if completed {
        store.mark_completed(TaskId(id))?
    } else {
        store.mark_pending(TaskId(id))?
    };
    let state = if completed { "completed" } else { "pending" };
    writeln!(out, "Task #{} marked {}: {}", task.id, state, task.title)?;
    Ok(())
}

pub fn delete<R: TaskRepository>(
    store: &mut TaskStore<R>,
    out: &mut impl Write,
    id: u64,
) -> Result<()> {
    let task = store.delete(TaskId(id))?;
    writeln!(out, "Deleted task #{}: {}", task.id, task.title)?;
    Ok(())
}

/// Ranked schedule; with a budget, only the greedy selection is shown.
pub fn schedule<R: TaskRepository>(
    store: &TaskStore<R>,
    cfg: &Config,
    out: &mut impl Write,
    budget: Option<i64>,
    format: OutputFormat,
    now: DateTime<Utc>,
) -> Result<()> {
    let mut ranked = rank_scored(store.all(), now);

    if let Some(minutes) = budget {
        let picked: HashSet<TaskId> = store
            .schedule_within(now, minutes)
            .into_iter()
            .map(|t| t.id)
            .collect();
        // Selection keeps rank order, so filtering the scored ranking is enough.
        ranked.retain(|r| picked.contains(&r.task.id));
        tracing::debug!(budget = minutes, selected = ranked.len(), "applied time budget");
    }

    let rows = render::schedule_rows(&ranked, &cfg.schedule.timezone)?;
    render::write_schedule(out, &rows, format, budget)
}

pub fn stats<R: TaskRepository>(
    store: &TaskStore<R>,
    out: &mut impl Write,
    json: bool,
    now: DateTime<Utc>,
) -> Result<()> {
    let s = store.statistics(now);
    if json {
        serde_json::to_writer_pretty(&mut *out, &s)?;
        writeln!(out)?;
        return Ok(());
    }

    writeln!(out, "Total:      {}", s.total_tasks)?;
    writeln!(out, "Completed:  {}", s.completed_tasks)?;
    writeln!(out, "Pending:    {}", s.pending_tasks)?;
    writeln!(out, "Overdue:    {}", s.overdue_tasks)?;
    writeln!(out, "Completion: {:.1}%", s.completion_rate)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};
    use quickwin_store::MemoryRepository;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 2, 19, 18, 0, 0).unwrap()
    }

    fn cfg() -> Config {
        let mut cfg = Config::default();
        cfg.schedule.timezone = "UTC".to_string();
        cfg
    }

    fn run(f: impl FnOnce(&mut Vec<u8>) -> Result<()>) -> String {
        let mut buf = Vec::new();
        f(&mut buf).unwrap();
        String::from_utf8(buf).unwrap()
    }

    fn seeded() -> TaskStore<MemoryRepository> {
        let mut store = TaskStore::open(MemoryRepository::new()).unwrap();
        let cfg = cfg();
        let mut sink = Vec::new();
        add(&mut store, &cfg, &mut sink, "A", 5, "30m", Some("2026-02-19 19:00")).unwrap();
        add(&mut store, &cfg, &mut sink, "B", 1, "10", None).unwrap();
        add(&mut store, &cfg, &mut sink, "C", 3, "20m", Some("2026-02-19 16:00")).unwrap();
        store
    }

    #[test]
    fn test_add_parses_human_inputs() {
        let store = seeded();
        let a = store.get(TaskId(1)).unwrap();
        assert_eq!(a.duration, 30);
        assert_eq!(a.deadline, Some(now() + Duration::hours(1)));
    }

    #[test]
    fn test_add_rejects_bad_duration_before_touching_store() {
        let mut store = TaskStore::open(MemoryRepository::new()).unwrap();
        let mut sink = Vec::new();
        assert!(add(&mut store, &cfg(), &mut sink, "x", 3, "a while", None).is_err());
        assert!(add(&mut store, &cfg(), &mut sink, "x", 3, "0", None).is_err());
        assert!(store.is_empty());
    }

    #[test]
    fn test_schedule_with_budget_shows_greedy_selection() {
        let store = seeded();
        let s = run(|out| schedule(&store, &cfg(), out, Some(40), OutputFormat::Text, now()));

        assert!(s.contains("C  (OVERDUE)"));
        assert!(!s.contains("  A"));
        assert!(s.find("  C").unwrap() < s.find("  B").unwrap());
        assert!(s.contains("Total: 30 of 40 minutes"));
    }

    #[test]
    fn test_schedule_without_budget_lists_all_pending() {
        let mut store = seeded();
        store.mark_completed(TaskId(2)).unwrap();
        let s = run(|out| schedule(&store, &cfg(), out, None, OutputFormat::Json, now()));
        let v: serde_json::Value = serde_json::from_str(&s).unwrap();
        let titles: Vec<&str> = v
            .as_array()
            .unwrap()
            .iter()
            .map(|r| r["title"].as_str().unwrap())
            .collect();
        assert_eq!(titles, vec!["C", "A"]);
    }

    #[test]
    fn test_update_can_clear_a_deadline() {
        let mut store = seeded();
        let mut sink = Vec::new();
        update(&mut store, &cfg(), &mut sink, 1, None, None, None, None, true).unwrap();
        assert!(store.get(TaskId(1)).unwrap().deadline.is_none());

        assert!(update(&mut store, &cfg(), &mut sink, 1, None, None, None, None, false).is_err());
        assert!(
            update(&mut store, &cfg(), &mut sink, 1, None, None, None, Some("2026-03-01 10:00"), true)
                .is_err()
        );
    }

    #[test]
    fn test_show_explains_score_and_position() {
        let store = seeded();
        let s = run(|out| show(&store, &cfg(), out, 3, now()));
        assert!(s.contains("OVERDUE"));
        assert!(s.contains("Position in schedule: 1"));
        assert!(s.contains("urgency 1.000"));
    }

    #[test]
    fn test_list_filters_and_stats() {
        let mut store = seeded();
        let mut sink = Vec::new();
        set_completed(&mut store, &mut sink, 2, true).unwrap();

        let overdue = run(|out| list(&store, &cfg(), out, ListFilter::Overdue, now()));
        assert!(overdue.contains("Task #3: C"));
        assert!(overdue.contains("1 tasks, 20 minutes"));

        let stats_out = run(|out| stats(&store, out, false, now()));
        assert!(stats_out.contains("Completed:  1"));
        assert!(stats_out.contains("Completion: 33.3%"));

        delete(&mut store, &mut sink, 2).unwrap();
        let done = run(|out| list(&store, &cfg(), out, ListFilter::Completed, now()));
        assert_eq!(done, "No tasks.\n");
    }

    #[test]
    fn test_rfc3339_deadlines_are_accepted() {
        let dl = parse_deadline("2026-02-19T20:00:00+02:00", "America/Chicago").unwrap();
        assert_eq!(dl, now());
    }
}
