//! Domain model for recurring personal-date reminders.
//!
//! # Responsibility
//! - Define the canonical `Event` record and its closed classifications.
//! - Provide pure recurrence date math over caller-supplied reference dates.
//!
//! # Invariants
//! - Recurrence functions never read the system clock; `today` is always
//!   supplied by the caller.
//! - Every enum mapping used for storage and transfer lives next to the
//!   enum it maps, so DB and JSON agree on one canonical string per value.

pub mod event;
