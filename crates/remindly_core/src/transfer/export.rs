//! Export serialization.
//!
//! # Responsibility
//! - Serialize the current state of all stored events into the same JSON
//!   shape the import pipeline accepts.
//!
//! # Invariants
//! - Stored events already satisfy the sanitization invariants, so export
//!   writes them verbatim; no re-sanitization happens here.

use super::{EventRecord, ExportError};
use crate::repo::event_repo::EventRepository;
use log::info;

/// Serializes every stored event (active or not) as a JSON list.
pub fn export_events(repo: &impl EventRepository) -> Result<String, ExportError> {
    let events = repo.list_all()?;
    let records: Vec<EventRecord> = events.iter().map(EventRecord::from_event).collect();
    let payload = serde_json::to_string(&records)?;
    info!(
        "event=export module=transfer status=ok exported={}",
        records.len()
    );
    Ok(payload)
}
