//! Output formatting for task listings and schedules.

use anyhow::Result;
use chrono::{DateTime, Utc};
use clap::ValueEnum;
use quickwin_core::time::format_local;
use quickwin_core::{RankedTask, Task, total_duration};
use serde::Serialize;
use std::io::Write;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
    Csv,
}

/// One schedule line, shared by every output format.
#[derive(Debug, Clone, Serialize)]
pub struct ScheduleRow {
    pub position: usize,
    pub id: u64,
    pub title: String,
    pub priority: u8,
    pub duration: u32,
    pub deadline: Option<String>,
    pub score: f64,
    pub overdue: bool,
}

pub fn schedule_rows(ranked: &[RankedTask], tz: &str) -> Result<Vec<ScheduleRow>> {
    ranked
        .iter()
        .enumerate()
        .map(|(i, r)| {
            Ok(ScheduleRow {
                position: i + 1,
                id: r.task.id.0,
                title: r.task.title.clone(),
                priority: r.task.priority,
                duration: r.task.duration,
                deadline: deadline_label(r.task.deadline, tz)?,
                score: r.score,
                overdue: r.overdue,
            })
        })
        .collect()
}

pub fn write_schedule(
    out: &mut impl Write,
    rows: &[ScheduleRow],
    format: OutputFormat,
    budget: Option<i64>,
) -> Result<()> {
    match format {
        OutputFormat::Json => {
            serde_json::to_writer_pretty(&mut *out, rows)?;
            writeln!(out)?;
        }
        OutputFormat::Csv => {
            let mut w = csv::Writer::from_writer(&mut *out);
            for row in rows {
                w.serialize(row)?;
            }
            w.flush()?;
        }
        OutputFormat::Text => {
            if rows.is_empty() {
                writeln!(out, "Nothing to schedule.")?;
                return Ok(());
            }
            writeln!(
                out,
                "{:>3}  {:>4}  {:>5}  {:>3}  {:>5}  {:<16}  title",
                "#", "id", "score", "pri", "min", "deadline"
            )?;
            for r in rows {
                writeln!(
                    out,
                    "{:>3}  {:>4}  {:>5.3}  {:>3}  {:>5}  {:<16}  {}{}",
                    r.position,
                    r.id,
                    r.score,
                    r.priority,
                    r.duration,
                    r.deadline.as_deref().unwrap_or("-"),
                    r.title,
                    if r.overdue { "  (OVERDUE)" } else { "" }
                )?;
            }
            let total: i64 = rows.iter().map(|r| i64::from(r.duration)).sum();
            match budget {
                Some(b) => writeln!(out, "\nTotal: {} of {} minutes", total, b)?,
                None => writeln!(out, "\nTotal: {} minutes", total)?,
            }
        }
    }
    Ok(())
}

pub fn write_task_list(out: &mut impl Write, tasks: &[Task], tz: &str) -> Result<()> {
    if tasks.is_empty() {
        writeln!(out, "No tasks.")?;
        return Ok(());
    }
    for t in tasks {
        writeln!(out, "{}", task_line(t, tz)?)?;
    }
    writeln!(out, "\n{} tasks, {} minutes", tasks.len(), total_duration(tasks))?;
    Ok(())
}

/// `Task`'s display line with the deadline shown in the user's zone.
pub fn task_line(task: &Task, tz: &str) -> Result<String> {
    let deadline = deadline_label(task.deadline, tz)?;
    Ok(task.summary_line(deadline.as_deref()))
}

fn deadline_label(deadline: Option<DateTime<Utc>>, tz: &str) -> Result<Option<String>> {
    deadline.map(|dl| format_local(dl, tz)).transpose()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};
    use quickwin_core::rank_scored;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 2, 19, 18, 0, 0).unwrap()
    }

    fn rows() -> Vec<ScheduleRow> {
        let tasks = vec![
            Task::new(1, "Pay rent")
                .with_priority(5)
                .with_duration(10)
                .with_deadline(now() - Duration::hours(1)),
            Task::new(2, "Stretch").with_priority(2).with_duration(15),
        ];
        schedule_rows(&rank_scored(&tasks, now()), "UTC").unwrap()
    }

    #[test]
    fn test_text_output_marks_overdue_and_totals() {
        let mut buf = Vec::new();
        write_schedule(&mut buf, &rows(), OutputFormat::Text, Some(30)).unwrap();
        let s = String::from_utf8(buf).unwrap();

        assert!(s.contains("Pay rent  (OVERDUE)"));
        assert!(s.contains("2026-02-19 17:00"));
        assert!(s.contains("Total: 25 of 30 minutes"));
        assert!(s.find("Pay rent").unwrap() < s.find("Stretch").unwrap());
    }

    #[test]
    fn test_csv_output_has_header_and_one_line_per_task() {
        let mut buf = Vec::new();
        write_schedule(&mut buf, &rows(), OutputFormat::Csv, None).unwrap();
        let s = String::from_utf8(buf).unwrap();
        let lines: Vec<&str> = s.lines().collect();

        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("position,id,title,priority,duration,deadline,score,overdue"));
        assert!(lines[1].starts_with("1,1,Pay rent,5,10,2026-02-19 17:00,"));
        assert!(lines[2].ends_with(",false"));
    }

    #[test]
    fn test_json_output_is_an_array() {
        let mut buf = Vec::new();
        write_schedule(&mut buf, &rows(), OutputFormat::Json, None).unwrap();
        let v: serde_json::Value = serde_json::from_slice(&buf).unwrap();
        assert_eq!(v.as_array().unwrap().len(), 2);
        assert_eq!(v[0]["overdue"], true);
        assert!(v[1]["deadline"].is_null());
    }

    #[test]
    fn test_empty_schedule_text() {
        let mut buf = Vec::new();
        write_schedule(&mut buf, &[], OutputFormat::Text, None).unwrap();
        assert_eq!(String::from_utf8(buf).unwrap(), "Nothing to schedule.\n");
    }

    #[test]
    fn test_task_line_uses_local_zone() {
        let t = Task::new(3, "Standup")
            .with_deadline(Utc.with_ymd_and_hms(2026, 2, 21, 5, 59, 0).unwrap());
        let line = task_line(&t, "America/Chicago").unwrap();
        assert!(line.ends_with("Deadline: 2026-02-20 23:59"));
        assert!(line.starts_with("[PENDING] Task #3: Standup | Priority: Medium (3)"));
    }
}
