//! Event use-case service.
//!
//! # Responsibility
//! - Provide stable entry points for interactive callers: CRUD, upcoming
//!   queries, search, holiday seeding, import/export.
//! - Enforce the interactive write-path policy the store itself does not:
//!   text sanitization, reminder-offset clamping, fixed-date categories.
//!
//! # Invariants
//! - Events passing through `add_event`/`update_event` satisfy every model
//!   invariant when they reach the repository.
//! - A category with a fixed date forces the anchor's month/day; religious
//!   categories force a one-time repeat policy.

use crate::model::event::{Event, EventCategory, EventId, EventType, RepeatPolicy};
use crate::repo::event_repo::{EventRepository, RepoError, RepoResult};
use crate::transfer::{export_events, import_events, ExportError};
use crate::validate::{clamp_reminder_offsets, sanitize_text, MAX_NAME_LEN, MAX_NOTE_LEN};
use chrono::{Datelike, NaiveDate};
use log::info;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Reminder offsets applied to seeded holiday events.
const HOLIDAY_REMINDER_OFFSETS: [i32; 2] = [1, 7];

pub type ServiceResult<T> = Result<T, ServiceError>;

#[derive(Debug)]
pub enum ServiceError {
    /// Name was blank after sanitization.
    InvalidName,
    Repo(RepoError),
    Export(ExportError),
}

impl Display for ServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidName => write!(f, "event name cannot be blank"),
            Self::Repo(err) => write!(f, "{err}"),
            Self::Export(err) => write!(f, "{err}"),
        }
    }
}

impl Error for ServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::InvalidName => None,
            Self::Repo(err) => Some(err),
            Self::Export(err) => Some(err),
        }
    }
}

impl From<RepoError> for ServiceError {
    fn from(value: RepoError) -> Self {
        Self::Repo(value)
    }
}

impl From<ExportError> for ServiceError {
    fn from(value: ExportError) -> Self {
        Self::Export(value)
    }
}

/// Use-case service wrapper over an event repository.
pub struct EventService<R: EventRepository> {
    repo: R,
}

impl<R: EventRepository> EventService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Creates a new event after applying the interactive write-path policy.
    pub fn add_event(&self, event: Event) -> ServiceResult<EventId> {
        let event = self.prepare_for_write(event)?;
        let id = self.repo.upsert(&event)?;
        info!("event=event_added module=service status=ok id={id}");
        Ok(id)
    }

    /// Replaces an existing event wholesale. No partial-field patches.
    pub fn update_event(&self, event: Event) -> ServiceResult<()> {
        if event.id == 0 {
            return Err(ServiceError::Repo(RepoError::NotFound(0)));
        }
        let event = self.prepare_for_write(event)?;
        self.repo.upsert(&event)?;
        info!("event=event_updated module=service status=ok id={}", event.id);
        Ok(())
    }

    pub fn get_event(&self, id: EventId) -> RepoResult<Option<Event>> {
        self.repo.get(id)
    }

    pub fn delete_event(&self, id: EventId) -> RepoResult<()> {
        self.repo.delete(id)
    }

    pub fn delete_all_events(&self) -> RepoResult<()> {
        self.repo.delete_all()
    }

    /// Name-substring search; sanitization happens inside the repository.
    pub fn search_events(&self, query: &str) -> RepoResult<Vec<Event>> {
        self.repo.search(query)
    }

    /// Active, non-expired events sorted by how soon they next occur.
    pub fn upcoming_events(&self, today: NaiveDate, limit: usize) -> RepoResult<Vec<Event>> {
        let mut events: Vec<Event> = self
            .repo
            .list_active()?
            .into_iter()
            .filter(|event| event.days_until_next(today) >= 0)
            .collect();
        events.sort_by_key(|event| event.days_until_next(today));
        events.truncate(limit);
        Ok(events)
    }

    /// Events next occurring within the coming 7 days.
    pub fn events_this_week(&self, today: NaiveDate) -> RepoResult<Vec<Event>> {
        self.events_within(today, 7)
    }

    /// Events next occurring within the coming 30 days.
    pub fn events_this_month(&self, today: NaiveDate) -> RepoResult<Vec<Event>> {
        self.events_within(today, 30)
    }

    /// Bulk-seeds the fixed-date holiday and family-day set for a year.
    ///
    /// Religious categories shift yearly, so they are never auto-seeded.
    pub fn seed_holidays(&self, year: i32, today: NaiveDate) -> ServiceResult<usize> {
        let holidays = default_holiday_events(year, today);
        self.repo.bulk_upsert(&holidays)?;
        info!(
            "event=holidays_seeded module=service status=ok year={year} count={}",
            holidays.len()
        );
        Ok(holidays.len())
    }

    /// Deletes holiday-typed events and reseeds the holiday defaults.
    ///
    /// Family-day seeds (Mother's/Father's Day) are left alone: they carry
    /// the family classification and may have been edited by the user.
    pub fn restore_default_holidays(&self, year: i32, today: NaiveDate) -> ServiceResult<usize> {
        let removed = self.repo.delete_by_type(EventType::Holiday)?;
        let holidays: Vec<Event> = default_holiday_events(year, today)
            .into_iter()
            .filter(|event| event.event_type == EventType::Holiday)
            .collect();
        self.repo.bulk_upsert(&holidays)?;
        info!(
            "event=holidays_restored module=service status=ok removed={removed} seeded={}",
            holidays.len()
        );
        Ok(holidays.len())
    }

    /// Serializes all stored events as a JSON payload.
    pub fn export_events(&self) -> ServiceResult<String> {
        Ok(export_events(&self.repo)?)
    }

    /// Imports a JSON payload; returns the inserted count, 0 on batch
    /// rejection.
    pub fn import_events(&self, payload: &str, today: NaiveDate) -> ServiceResult<usize> {
        Ok(import_events(&self.repo, payload, today)?)
    }

    fn events_within(&self, today: NaiveDate, days: i64) -> RepoResult<Vec<Event>> {
        let mut events: Vec<Event> = self
            .repo
            .list_active()?
            .into_iter()
            .filter(|event| {
                let until = event.days_until_next(today);
                (0..=days).contains(&until)
            })
            .collect();
        events.sort_by_key(|event| event.days_until_next(today));
        Ok(events)
    }

    fn prepare_for_write(&self, mut event: Event) -> ServiceResult<Event> {
        event.name = sanitize_text(&event.name, MAX_NAME_LEN);
        if event.name.is_empty() {
            return Err(ServiceError::InvalidName);
        }
        event.note = sanitize_text(&event.note, MAX_NOTE_LEN);
        event.reminder_offsets = clamp_reminder_offsets(&event.reminder_offsets);

        if let Some(fixed) = event.category.fixed_date(event.anchor_date.year()) {
            event.anchor_date = fixed;
        }
        if event.category.is_religious() {
            event.repeat_policy = RepeatPolicy::OneTime;
        }

        Ok(event)
    }
}

/// The default seeded set: every fixed-date category, typed holiday or
/// family, repeating yearly with the standard holiday reminder offsets.
fn default_holiday_events(year: i32, created_at: NaiveDate) -> Vec<Event> {
    EventCategory::ALL
        .iter()
        .copied()
        .filter_map(|category| {
            let anchor = category.fixed_date(year)?;
            let event_type = match category {
                EventCategory::MothersDay | EventCategory::FathersDay => EventType::Family,
                _ => EventType::Holiday,
            };
            // Display names may carry apostrophes; stored names may not.
            let name = sanitize_text(category.display_name(), MAX_NAME_LEN);
            let mut event = Event::new(name, anchor, event_type, category, created_at);
            event.reminder_offsets = HOLIDAY_REMINDER_OFFSETS.to_vec();
            Some(event)
        })
        .collect()
}
