//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define the narrow event-store contract the scheduler and import
//!   pipeline consume.
//! - Isolate SQLite query details from service/business orchestration.
//!
//! # Invariants
//! - Repository writes are durable when the call returns `Ok`.
//! - Repository APIs return semantic errors (`NotFound`) in addition to DB
//!   transport errors.

pub mod event_repo;
