//! Input validation and sanitization pipeline.
//!
//! # Responsibility
//! - Sanitize free-text fields on every write path, interactive or imported.
//! - Turn untrusted import records into valid `Event`s or typed rejections.
//!
//! # Invariants
//! - Sanitization is idempotent: applying it twice equals applying it once.
//! - Malformed input never panics; every failure is a returned value.
//! - Reminder offsets leaving this module are deduplicated, within
//!   `[0, 365]`, capped at 10 entries and never empty.

use crate::model::event::{Event, EventCategory, EventType, RepeatPolicy};
use crate::transfer::EventRecord;
use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Maximum event name length after sanitization.
pub const MAX_NAME_LEN: usize = 200;
/// Maximum note length after sanitization.
pub const MAX_NOTE_LEN: usize = 2000;
/// Largest accepted reminder offset in days.
pub const MAX_REMINDER_OFFSET: i32 = 365;
/// Maximum number of reminder offsets per event.
pub const MAX_REMINDER_OFFSETS: usize = 10;
/// Maximum search query length accepted by the store facade.
pub const MAX_SEARCH_QUERY_LEN: usize = 100;

static STRIPPED_CHARS_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"[<>"'&]"#).expect("valid strip regex"));
static LIKE_WILDCARDS_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[%_\[\]\^]").expect("valid wildcard regex"));

static MIN_ANCHOR_DATE: Lazy<NaiveDate> =
    Lazy::new(|| NaiveDate::from_ymd_opt(1900, 1, 1).expect("valid minimum anchor date"));
static MAX_ANCHOR_DATE: Lazy<NaiveDate> =
    Lazy::new(|| NaiveDate::from_ymd_opt(2200, 12, 31).expect("valid maximum anchor date"));

/// Why a single imported record was rejected. Per-record rejections are
/// skipped by the import batch, never fatal to it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RejectionReason {
    BlankName,
    NameTooLong { length: usize },
    AnchorOutOfRange { epoch_day: i64 },
    UnknownEventType(String),
    UnknownCategory(String),
    UnknownRepeatPolicy(String),
}

impl Display for RejectionReason {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::BlankName => write!(f, "event name is blank"),
            Self::NameTooLong { length } => {
                write!(f, "event name has {length} chars, max {MAX_NAME_LEN}")
            }
            Self::AnchorOutOfRange { epoch_day } => {
                write!(f, "anchor epoch day {epoch_day} is outside 1900..2200")
            }
            Self::UnknownEventType(value) => write!(f, "unknown event type `{value}`"),
            Self::UnknownCategory(value) => write!(f, "unknown category `{value}`"),
            Self::UnknownRepeatPolicy(value) => write!(f, "unknown repeat policy `{value}`"),
        }
    }
}

impl Error for RejectionReason {}

/// Strips `< > " ' &`, trims surrounding whitespace and truncates to
/// `max_len` characters.
///
/// The trailing trim after truncation keeps the function idempotent even
/// when truncation cuts right after whitespace.
pub fn sanitize_text(input: &str, max_len: usize) -> String {
    let stripped = STRIPPED_CHARS_RE.replace_all(input, "");
    let trimmed = stripped.trim();
    let truncated: String = trimmed.chars().take(max_len).collect();
    truncated.trim_end().to_string()
}

/// Filters reminder offsets to `[0, 365]`, collapses duplicates, caps the
/// set at 10 entries and falls back to `{1}` when nothing survives.
pub fn clamp_reminder_offsets(raw: &[i32]) -> Vec<i32> {
    let mut clamped: Vec<i32> = Vec::new();
    for &offset in raw {
        if !(0..=MAX_REMINDER_OFFSET).contains(&offset) {
            continue;
        }
        if clamped.contains(&offset) {
            continue;
        }
        clamped.push(offset);
        if clamped.len() == MAX_REMINDER_OFFSETS {
            break;
        }
    }
    if clamped.is_empty() {
        clamped.push(1);
    }
    clamped
}

/// Caps a store search query at 100 chars and strips SQL LIKE wildcard
/// metacharacters, regardless of backing technology.
pub fn sanitize_search_query(query: &str) -> String {
    let capped: String = query.chars().take(MAX_SEARCH_QUERY_LEN).collect();
    LIKE_WILDCARDS_RE.replace_all(&capped, "").trim().to_string()
}

/// Validates one untrusted import record and produces a clean `Event`.
///
/// `imported_on` becomes the new record's creation date; the caller supplies
/// it so this function stays clock-free.
///
/// # Errors
/// Returns a [`RejectionReason`] when the name is blank or longer than 200
/// chars pre-sanitization, the anchor date falls outside 1900..2200, or any
/// enum field does not match a known value.
pub fn validate_imported_record(
    record: &EventRecord,
    imported_on: NaiveDate,
) -> Result<Event, RejectionReason> {
    if record.name.trim().is_empty() {
        return Err(RejectionReason::BlankName);
    }
    let name_length = record.name.chars().count();
    if name_length > MAX_NAME_LEN {
        return Err(RejectionReason::NameTooLong {
            length: name_length,
        });
    }

    let anchor_date = date_from_epoch_day(record.anchor_epoch_day)
        .filter(|date| (*MIN_ANCHOR_DATE..=*MAX_ANCHOR_DATE).contains(date))
        .ok_or(RejectionReason::AnchorOutOfRange {
            epoch_day: record.anchor_epoch_day,
        })?;

    let event_type = EventType::parse(&record.event_type)
        .ok_or_else(|| RejectionReason::UnknownEventType(record.event_type.clone()))?;
    let category = EventCategory::parse(&record.category)
        .ok_or_else(|| RejectionReason::UnknownCategory(record.category.clone()))?;
    let repeat_policy = RepeatPolicy::parse(&record.repeat_policy)
        .ok_or_else(|| RejectionReason::UnknownRepeatPolicy(record.repeat_policy.clone()))?;

    Ok(Event {
        id: 0,
        name: sanitize_text(&record.name, MAX_NAME_LEN),
        anchor_date,
        event_type,
        category,
        repeat_policy,
        reminder_offsets: clamp_reminder_offsets(&record.reminder_offsets),
        note: sanitize_text(&record.note, MAX_NOTE_LEN),
        is_active: record.is_active,
        created_at: imported_on,
    })
}

/// Days since 1970-01-01 for a calendar date.
pub fn epoch_day(date: NaiveDate) -> i64 {
    (date - NaiveDate::from_ymd_opt(1970, 1, 1).expect("valid unix epoch date")).num_days()
}

/// Inverse of [`epoch_day`]. `None` when the day count is unrepresentable.
pub fn date_from_epoch_day(days: i64) -> Option<NaiveDate> {
    let epoch = NaiveDate::from_ymd_opt(1970, 1, 1).expect("valid unix epoch date");
    epoch.checked_add_signed(chrono::Duration::days(days))
}

#[cfg(test)]
mod tests {
    use super::{clamp_reminder_offsets, sanitize_search_query, sanitize_text};

    #[test]
    fn sanitize_text_strips_trims_and_truncates() {
        assert_eq!(sanitize_text("<script>Ali</script>", 200), "scriptAli/script");
        assert_eq!(sanitize_text("  spaced out  ", 200), "spaced out");
        assert_eq!(sanitize_text("abcdef", 3), "abc");
    }

    #[test]
    fn sanitize_text_is_idempotent_across_truncation_boundaries() {
        let once = sanitize_text("name &  tail", 7);
        assert_eq!(sanitize_text(&once, 7), once);
    }

    #[test]
    fn clamp_reminder_offsets_filters_dedupes_and_caps() {
        assert_eq!(clamp_reminder_offsets(&[-5, 3, 3, 400, 10]), vec![3, 10]);
        assert_eq!(clamp_reminder_offsets(&[-1, 999]), vec![1]);
        let many: Vec<i32> = (0..20).collect();
        assert_eq!(clamp_reminder_offsets(&many).len(), 10);
    }

    #[test]
    fn sanitize_search_query_strips_wildcards_and_caps_length() {
        assert_eq!(sanitize_search_query("ali%_[]^"), "ali");
        let long = "x".repeat(250);
        assert_eq!(sanitize_search_query(&long).len(), 100);
    }
}
