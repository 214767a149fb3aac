//! Rules-based note parsing.
//!
//! Converts free-text meeting notes into structured tasks without any
//! model call: per-line assignee detection, priority keyword inference,
//! and deadline extraction with date normalization. Total by contract,
//! with a whole-note fallback so a non-empty note never produces zero
//! tasks.

use chrono::{Datelike, NaiveDate, Utc};
use regex::Regex;
use tracing::debug;

use growflow_core::defaults::{MIN_DESCRIPTION_CHARS, MIN_TASK_LINE_CHARS};
use growflow_core::{ExtractedTask, Priority, TaskStatus};

/// Split raw note text into candidate task lines.
///
/// Blank lines and lines shorter than the minimum trimmed length are
/// discarded; they are noise (stray bullets, "ok", timestamps).
pub fn candidate_lines(note_text: &str) -> Vec<&str> {
    note_text
        .lines()
        .map(str::trim)
        .filter(|line| line.chars().count() >= MIN_TASK_LINE_CHARS)
        .collect()
}

/// Rules-based line parser with pre-compiled patterns.
///
/// Construction compiles all patterns once; `parse` is then cheap to
/// call per note.
pub struct RuleParser {
    bullet: Regex,
    assignee: Regex,
    high_priority: Regex,
    low_priority: Regex,
    keyword_strip: Regex,
    date_iso: Regex,
    date_month: Regex,
    date_numeric: Regex,
    whitespace: Regex,
}

impl RuleParser {
    /// Create a parser with the standard pattern set.
    pub fn new() -> Self {
        Self {
            bullet: Regex::new(r"^[-*•]\s*").unwrap(),
            assignee: Regex::new(r"^\*{0,2}([A-Z][a-z]+(?:\s+[A-Z][a-z]+)*)\*{0,2}:\s*(.+)$")
                .unwrap(),
            high_priority: Regex::new(r"(?i)(urgent|asap|critical|high priority|important)")
                .unwrap(),
            low_priority: Regex::new(r"(?i)(low priority|when possible|eventually|nice to have)")
                .unwrap(),
            keyword_strip: Regex::new(
                r"(?i)\b(urgent|asap|critical|high priority|low priority|when possible|eventually|important|nice to have)\b",
            )
            .unwrap(),
            date_iso: Regex::new(r"(?i)(?:by|before|due|deadline:?)\s*(\d{4}-\d{2}-\d{2})")
                .unwrap(),
            date_month: Regex::new(r"(?i)(?:by|before|due|deadline:?)\s*([A-Za-z]{2,}\s+\d{1,2})")
                .unwrap(),
            date_numeric: Regex::new(
                r"(?i)(?:by|before|due|deadline:?)\s*(\d{1,2}[-/]\d{1,2}(?:[-/]\d{2,4})?)",
            )
            .unwrap(),
            whitespace: Regex::new(r"\s+").unwrap(),
        }
    }

    /// Parse a note into tasks using today's date for year inference.
    pub fn parse(&self, note_text: &str, default_priority: Priority) -> Vec<ExtractedTask> {
        self.parse_with_today(note_text, default_priority, Utc::now().date_naive())
    }

    /// Parse a note into tasks, normalizing yearless deadlines against
    /// the given date.
    ///
    /// Never fails. Post-condition: a note with non-empty trimmed text
    /// yields at least one task (the whole trimmed note as a single
    /// task when no line qualifies).
    pub fn parse_with_today(
        &self,
        note_text: &str,
        default_priority: Priority,
        today: NaiveDate,
    ) -> Vec<ExtractedTask> {
        debug!(component = "rules", op = "parse", "Parsing note with rules-based parser");

        let mut tasks: Vec<ExtractedTask> = candidate_lines(note_text)
            .into_iter()
            .filter_map(|line| self.parse_line(line, default_priority, today))
            .collect();

        // A non-empty note never silently drops: fall back to one task
        // carrying the full trimmed text.
        if tasks.is_empty() && !note_text.trim().is_empty() {
            tasks.push(ExtractedTask::with_description(
                note_text.trim(),
                default_priority,
            ));
        }

        debug!(
            component = "rules",
            op = "parse",
            task_count = tasks.len(),
            "Rules-based parse complete"
        );
        tasks
    }

    fn parse_line(
        &self,
        line: &str,
        default_priority: Priority,
        today: NaiveDate,
    ) -> Option<ExtractedTask> {
        let mut description = self.bullet.replace(line, "").into_owned();
        let mut assignee_name = None;

        if let Some(caps) = self.assignee.captures(&description) {
            assignee_name = Some(caps[1].to_string());
            description = caps[2].to_string();
        }

        // Priority keywords match as substrings; High wins over Low.
        let priority = if self.high_priority.is_match(&description) {
            Priority::High
        } else if self.low_priority.is_match(&description) {
            Priority::Low
        } else {
            default_priority
        };

        let deadline = self.extract_deadline(&description, today);

        let description = self.clean_description(&description);
        if description.chars().count() <= MIN_DESCRIPTION_CHARS {
            return None;
        }

        Some(ExtractedTask {
            description,
            assignee_name,
            priority,
            status: TaskStatus::NotStarted,
            deadline,
        })
    }

    /// Extract a deadline from a line.
    ///
    /// Patterns are tried in fixed order (ISO, then month-name, then
    /// numeric); the first matching pattern wins. A match that does not
    /// form a valid calendar date yields no deadline.
    fn extract_deadline(&self, text: &str, today: NaiveDate) -> Option<NaiveDate> {
        if let Some(caps) = self.date_iso.captures(text) {
            return NaiveDate::parse_from_str(&caps[1], "%Y-%m-%d").ok();
        }

        if let Some(caps) = self.date_month.captures(text) {
            return parse_month_day(&caps[1], today.year());
        }

        if let Some(caps) = self.date_numeric.captures(text) {
            return parse_numeric_date(&caps[1], today.year());
        }

        None
    }

    /// Strip matched priority keywords and deadline expressions from a
    /// description, then collapse whitespace.
    fn clean_description(&self, text: &str) -> String {
        let cleaned = self.keyword_strip.replace_all(text, "");
        let cleaned = self.date_iso.replace_all(&cleaned, "");
        let cleaned = self.date_month.replace_all(&cleaned, "");
        let cleaned = self.date_numeric.replace_all(&cleaned, "");
        self.whitespace.replace_all(&cleaned, " ").trim().to_string()
    }
}

impl Default for RuleParser {
    fn default() -> Self {
        Self::new()
    }
}

/// Normalize a "Jan 5" style expression to a date in the given year.
fn parse_month_day(text: &str, year: i32) -> Option<NaiveDate> {
    let mut parts = text.split_whitespace();
    let month_name = parts.next()?;
    let day: u32 = parts.next()?.parse().ok()?;
    let month = month_from_name(month_name)?;
    NaiveDate::from_ymd_opt(year, month, day)
}

/// Normalize an "M/D" or "M/D/YY" style expression.
///
/// Two-digit years are taken as 2000-based; a missing year defaults to
/// the given year.
fn parse_numeric_date(text: &str, current_year: i32) -> Option<NaiveDate> {
    let parts: Vec<&str> = text.split(['-', '/']).collect();
    if parts.len() < 2 || parts.len() > 3 {
        return None;
    }
    let month: u32 = parts[0].parse().ok()?;
    let day: u32 = parts[1].parse().ok()?;
    let year = match parts.get(2) {
        Some(y) => {
            let y: i32 = y.parse().ok()?;
            if y < 100 {
                2000 + y
            } else {
                y
            }
        }
        None => current_year,
    };
    NaiveDate::from_ymd_opt(year, month, day)
}

/// Resolve a month name (or three-letter prefix, any case) to 1-12.
fn month_from_name(name: &str) -> Option<u32> {
    let prefix = name.get(..3)?.to_lowercase();
    match prefix.as_str() {
        "jan" => Some(1),
        "feb" => Some(2),
        "mar" => Some(3),
        "apr" => Some(4),
        "may" => Some(5),
        "jun" => Some(6),
        "jul" => Some(7),
        "aug" => Some(8),
        "sep" => Some(9),
        "oct" => Some(10),
        "nov" => Some(11),
        "dec" => Some(12),
        _ => None,
    }
}
