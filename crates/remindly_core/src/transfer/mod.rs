//! Import/export payload handling.
//!
//! # Responsibility
//! - Define the wire record shared by export and import.
//! - Enforce payload-level bounds before any per-record validation runs.
//!
//! # Invariants
//! - Export and import are exact inverses for events that already satisfy
//!   the model invariants (round-trip law).
//! - Batch rejections are reported as an imported count of zero, never as a
//!   panic or a raw parser error shown to the user.
//!
//! # See also
//! - `crate::validate` for the per-record validation rules.

use crate::model::event::Event;
use crate::validate::epoch_day;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

mod export;
mod import;

pub use export::export_events;
pub use import::{import_events, parse_import_payload};

/// Maximum serialized payload size accepted by import.
pub const MAX_PAYLOAD_BYTES: usize = 5_000_000;
/// Maximum number of records accepted in one import batch.
pub const MAX_IMPORT_RECORDS: usize = 10_000;

/// One event as it appears in the JSON transfer payload.
///
/// Enum fields stay plain strings here so a single unknown value rejects
/// that record instead of failing the whole batch parse.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventRecord {
    pub name: String,
    pub anchor_epoch_day: i64,
    pub event_type: String,
    pub category: String,
    pub repeat_policy: String,
    pub reminder_offsets: Vec<i32>,
    pub note: String,
    pub is_active: bool,
}

impl EventRecord {
    /// Serializes the current, already-sanitized state of an event.
    pub fn from_event(event: &Event) -> Self {
        Self {
            name: event.name.clone(),
            anchor_epoch_day: epoch_day(event.anchor_date),
            event_type: event.event_type.as_str().to_string(),
            category: event.category.as_str().to_string(),
            repeat_policy: event.repeat_policy.as_str().to_string(),
            reminder_offsets: event.reminder_offsets.clone(),
            note: event.note.clone(),
            is_active: event.is_active,
        }
    }
}

/// Batch-level import failure. The whole payload is rejected; no records
/// are written.
#[derive(Debug)]
pub enum ImportError {
    PayloadTooLarge { bytes: usize },
    MalformedEnvelope,
    TooManyRecords { count: usize },
    Parse(serde_json::Error),
    NoValidRecords { rejected: usize },
}

impl Display for ImportError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::PayloadTooLarge { bytes } => {
                write!(f, "payload is {bytes} bytes, max {MAX_PAYLOAD_BYTES}")
            }
            Self::MalformedEnvelope => write!(f, "payload is not a JSON list"),
            Self::TooManyRecords { count } => {
                write!(f, "payload has {count} records, max {MAX_IMPORT_RECORDS}")
            }
            Self::Parse(err) => write!(f, "payload could not be parsed: {err}"),
            Self::NoValidRecords { rejected } => {
                write!(f, "no valid records (rejected {rejected})")
            }
        }
    }
}

impl Error for ImportError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Parse(err) => Some(err),
            _ => None,
        }
    }
}

/// Export-side failure: either the store read or serialization failed.
#[derive(Debug)]
pub enum ExportError {
    Repo(crate::repo::event_repo::RepoError),
    Serialize(serde_json::Error),
}

impl Display for ExportError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Repo(err) => write!(f, "{err}"),
            Self::Serialize(err) => write!(f, "failed to serialize events: {err}"),
        }
    }
}

impl Error for ExportError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Repo(err) => Some(err),
            Self::Serialize(err) => Some(err),
        }
    }
}

impl From<crate::repo::event_repo::RepoError> for ExportError {
    fn from(value: crate::repo::event_repo::RepoError) -> Self {
        Self::Repo(value)
    }
}

impl From<serde_json::Error> for ExportError {
    fn from(value: serde_json::Error) -> Self {
        Self::Serialize(value)
    }
}
