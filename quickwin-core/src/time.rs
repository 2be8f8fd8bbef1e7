//! Time utilities: timezone-aware deadlines and human durations.

use anyhow::{Result, bail};
use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};
use chrono_tz::Tz;
use regex::Regex;
use std::sync::LazyLock;

static DURATION_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:(?P<h>\d+)\s*h)?\s*(?:(?P<m>\d+)\s*m?)?$").expect("valid duration regex")
});

fn parse_tz(tz: &str) -> Result<Tz> {
    tz.parse()
        .map_err(|_| anyhow::anyhow!("invalid timezone: {tz}"))
}

/// Parse a deadline like "2026-02-20 23:59" in an IANA tz like "America/Chicago",
/// returning UTC.
pub fn parse_local_deadline_to_utc(local: &str, tz: &str) -> Result<DateTime<Utc>> {
    let tz = parse_tz(tz)?;

    let ndt = NaiveDateTime::parse_from_str(local.trim(), "%Y-%m-%d %H:%M")
        .map_err(|e| anyhow::anyhow!("invalid local datetime '{local}': {e}"))?;

    let local_dt = tz
        .from_local_datetime(&ndt)
        .single()
        .ok_or_else(|| anyhow::anyhow!("ambiguous or invalid local time (DST?): {local} {tz}"))?;

    Ok(local_dt.with_timezone(&Utc))
}

/// Render a UTC instant as "YYYY-MM-DD HH:MM" in the given zone.
pub fn format_local(dt: DateTime<Utc>, tz: &str) -> Result<String> {
    let tz = parse_tz(tz)?;
    Ok(dt.with_timezone(&tz).format("%Y-%m-%d %H:%M").to_string())
}

/// Parse a work estimate into minutes: "45", "45m", "2h", "1h30m", "1h 30".
pub fn parse_duration_minutes(input: &str) -> Result<i64> {
    let s = input.trim().to_ascii_lowercase();
    if s.is_empty() {
        bail!("empty duration");
    }

    let Some(caps) = DURATION_RE.captures(&s) else {
        bail!("invalid duration '{input}' (expected e.g. 45, 45m, 2h, 1h30m)");
    };

    let hours: i64 = match caps.name("h") {
        Some(h) => h.as_str().parse()?,
        None => 0,
    };
    let minutes: i64 = match caps.name("m") {
        Some(m) => m.as_str().parse()?,
        None => 0,
    };

    if caps.name("h").is_none() && caps.name("m").is_none() {
        bail!("invalid duration '{input}'");
    }

    hours
        .checked_mul(60)
        .and_then(|h| h.checked_add(minutes))
        .ok_or_else(|| anyhow::anyhow!("duration '{input}' is too large"))
}
