//! Core domain logic for the Remindly reminder engine.
//! This crate is the single source of truth for business invariants:
//! recurrence date math, import/export sanitization and the daily
//! reminder dispatch cycle.

pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod schedule;
pub mod service;
pub mod transfer;
pub mod validate;

pub use logging::{default_log_level, init_logging, logging_status};
pub use model::event::{
    default_category_for, Event, EventCategory, EventId, EventType, RepeatPolicy,
};
pub use repo::event_repo::{EventRepository, RepoError, RepoResult, SqliteEventRepository};
pub use schedule::{
    build_notification, cancel_daily_reminders, default_notify_time, first_fire_delay,
    schedule_daily_reminders, CycleOutcome, CycleState, JobScheduler, Notification,
    NotificationSink, NotifyError, ReminderCycle, ScheduleError, REMINDER_PERIOD,
    REMINDER_SCHEDULE_NAME,
};
pub use service::event_service::{EventService, ServiceError, ServiceResult};
pub use transfer::{
    export_events, import_events, parse_import_payload, EventRecord, ExportError, ImportError,
};
pub use validate::{
    clamp_reminder_offsets, sanitize_search_query, sanitize_text, validate_imported_record,
    RejectionReason,
};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
