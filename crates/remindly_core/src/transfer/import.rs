//! Import payload parsing and bulk insertion.
//!
//! # Responsibility
//! - Apply payload-level bounds, then per-record validation, then one bulk
//!   write for everything that survived.
//!
//! # Invariants
//! - Per-record failures skip the record and keep the batch going.
//! - A batch yielding zero valid records is a batch rejection, so nothing
//!   is ever written for it.

use super::{EventRecord, ImportError, MAX_IMPORT_RECORDS, MAX_PAYLOAD_BYTES};
use crate::model::event::Event;
use crate::repo::event_repo::{EventRepository, RepoResult};
use crate::validate::validate_imported_record;
use chrono::NaiveDate;
use log::{info, warn};

/// Parses and validates an import payload without touching storage.
///
/// `imported_on` becomes the creation date of every accepted event.
///
/// # Errors
/// Returns an [`ImportError`] for payload-level violations (size, envelope,
/// record count, unparseable JSON) and when no record survives validation.
pub fn parse_import_payload(
    payload: &str,
    imported_on: NaiveDate,
) -> Result<Vec<Event>, ImportError> {
    if payload.len() > MAX_PAYLOAD_BYTES {
        return Err(ImportError::PayloadTooLarge {
            bytes: payload.len(),
        });
    }

    let trimmed = payload.trim();
    if !trimmed.starts_with('[') || !trimmed.ends_with(']') {
        return Err(ImportError::MalformedEnvelope);
    }

    let records: Vec<EventRecord> = serde_json::from_str(trimmed).map_err(ImportError::Parse)?;
    if records.len() > MAX_IMPORT_RECORDS {
        return Err(ImportError::TooManyRecords {
            count: records.len(),
        });
    }

    let mut events = Vec::with_capacity(records.len());
    let mut rejected = 0usize;
    for record in &records {
        match validate_imported_record(record, imported_on) {
            Ok(event) => events.push(event),
            Err(reason) => {
                rejected += 1;
                warn!("event=import_record module=transfer status=skipped reason={reason}");
            }
        }
    }

    if events.is_empty() {
        return Err(ImportError::NoValidRecords { rejected });
    }

    Ok(events)
}

/// Imports a payload into the store and returns the inserted count.
///
/// Batch rejections report a count of zero. Store failures propagate so
/// interactive callers can surface them.
pub fn import_events(
    repo: &impl EventRepository,
    payload: &str,
    imported_on: NaiveDate,
) -> RepoResult<usize> {
    let events = match parse_import_payload(payload, imported_on) {
        Ok(events) => events,
        Err(err) => {
            warn!("event=import module=transfer status=rejected reason={err}");
            return Ok(0);
        }
    };

    repo.bulk_upsert(&events)?;
    info!(
        "event=import module=transfer status=ok imported={}",
        events.len()
    );
    Ok(events.len())
}
