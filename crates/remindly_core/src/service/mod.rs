//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate repository calls into use-case level APIs.
//! - Apply interactive write-path policy (sanitization, fixed-date
//!   categories) before anything reaches storage.

pub mod event_service;
