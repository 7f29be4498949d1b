//! Narrative memory log — read and split into entries
//!
//! The log is append-only markdown. Each session starts with a level-2
//! heading; the heading may carry a date:
//!
//! ```text
//! # Memory Log
//!
//! ## Session 2025-11-30T21:04:00Z — first contact
//! What happened...
//!
//! ## Session 2025-12-01 — continuity
//! More...
//! ```
//!
//! Text before the first `## ` heading is preamble and is not an entry,
//! unless the log has no such heading at all, in which case the whole file
//! is a single entry. Headings inside fenced code blocks are ignored.

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveTime, TimeZone, Utc};
use memcore_core::{Error, MemoryEntry, Result};
use regex::Regex;
use std::path::Path;
use std::sync::OnceLock;

const ENTRY_HEADING: &str = "## ";

/// Read the log as text. A missing file is `NotFound`.
pub fn read_log(path: &Path) -> Result<String> {
    match std::fs::read_to_string(path) {
        Ok(content) => Ok(content),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Err(Error::not_found(format!(
            "memory log {}",
            path.display()
        ))),
        Err(e) => Err(Error::Io(e)),
    }
}

/// Split log text into entries, oldest first.
pub fn parse_entries(text: &str) -> Vec<MemoryEntry> {
    let mut entries = Vec::new();
    let mut current: Option<(String, Vec<&str>)> = None;
    let mut in_fence = false;

    for line in text.lines() {
        let trimmed = line.trim_start();
        if trimmed.starts_with("```") || trimmed.starts_with("~~~") {
            in_fence = !in_fence;
        }
        if !in_fence && line.starts_with(ENTRY_HEADING) {
            if let Some((title, body)) = current.take() {
                entries.push(build_entry(entries.len(), title, &body));
            }
            current = Some((line[ENTRY_HEADING.len()..].trim().to_string(), Vec::new()));
            continue;
        }
        if let Some((_, body)) = current.as_mut() {
            body.push(line);
        }
    }
    if let Some((title, body)) = current.take() {
        entries.push(build_entry(entries.len(), title, &body));
    }

    if entries.is_empty() && !text.trim().is_empty() {
        let lines: Vec<&str> = text.lines().collect();
        entries.push(build_entry(0, String::new(), &lines));
    }
    entries
}

fn build_entry(index: usize, title: String, body: &[&str]) -> MemoryEntry {
    let content = body
        .iter()
        .map(|l| l.trim_end())
        .collect::<Vec<_>>()
        .join("\n")
        .trim_matches('\n')
        .to_string();
    MemoryEntry {
        index,
        timestamp: parse_timestamp(&title),
        title,
        content,
    }
}

fn timestamp_regex() -> Option<&'static Regex> {
    static RE: OnceLock<Option<Regex>> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(\d{4}-\d{2}-\d{2})(?:[T ](\d{2}:\d{2}(?::\d{2})?)(Z|[+-]\d{2}:?\d{2})?)?").ok()
    })
    .as_ref()
}

/// First ISO-8601 date or date-time in `text`, as UTC. A bare date is
/// midnight UTC; a date-time without an offset is taken as UTC.
pub fn parse_timestamp(text: &str) -> Option<DateTime<Utc>> {
    let caps = timestamp_regex()?.captures(text)?;
    let date = NaiveDate::parse_from_str(&caps[1], "%Y-%m-%d").ok()?;
    let time = match caps.get(2) {
        Some(t) => NaiveTime::parse_from_str(t.as_str(), "%H:%M:%S")
            .or_else(|_| NaiveTime::parse_from_str(t.as_str(), "%H:%M"))
            .ok()?,
        None => NaiveTime::from_hms_opt(0, 0, 0)?,
    };
    let naive = date.and_time(time);
    match caps.get(3).map(|m| m.as_str()) {
        None | Some("Z") => Some(Utc.from_utc_datetime(&naive)),
        Some(offset) => parse_offset(offset)?
            .from_local_datetime(&naive)
            .single()
            .map(|dt| dt.with_timezone(&Utc)),
    }
}

fn parse_offset(s: &str) -> Option<FixedOffset> {
    let sign = if s.starts_with('-') { -1 } else { 1 };
    let digits: String = s[1..].chars().filter(|c| c.is_ascii_digit()).collect();
    if digits.len() != 4 {
        return None;
    }
    let hours: i32 = digits[..2].parse().ok()?;
    let minutes: i32 = digits[2..].parse().ok()?;
    FixedOffset::east_opt(sign * (hours * 3600 + minutes * 60))
}
