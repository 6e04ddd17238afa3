//! Per-firing reminder cycle.
//!
//! # Responsibility
//! - Sweep active events, decide due-ness, and dispatch one notification per
//!   due event.
//! - Remember what was already dispatched so a retried cycle never
//!   double-notifies.
//!
//! # Invariants
//! - Each due event dispatches at most once per cycle, keyed by event id.
//! - Store or delivery failures end the sweep with `Retry`; the host
//!   substrate re-runs the same cycle with its own backoff.

use super::NotificationSink;
use crate::model::event::{Event, EventId};
use crate::repo::event_repo::EventRepository;
use chrono::NaiveDate;
use log::{info, warn};
use std::collections::HashSet;

/// Notification handed to the platform channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    /// Stable delivery key: the event id.
    pub key: EventId,
    pub title: String,
    pub body: String,
}

/// Builds the notification payload for a due event.
///
/// The headline varies with how far out the occurrence is; the body pairs
/// the category's glyph and label with the note when one is present.
pub fn build_notification(event: &Event, days_until: i64) -> Notification {
    let title = match days_until {
        0 => format!("🎉 Today: {}", event.name),
        1 => format!("⏰ Tomorrow: {}", event.name),
        days => format!("📅 In {days} days: {}", event.name),
    };

    let mut body = format!("{} {}", event.category.glyph(), event.category.display_name());
    if !event.note.is_empty() {
        body.push('\n');
        body.push_str(&event.note);
    }

    Notification {
        key: event.id,
        title,
        body,
    }
}

/// Observable cycle state: `Idle -> Running -> (Success | Retry)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CycleState {
    Idle,
    Running,
    Success,
    Retry,
}

/// Result of one firing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CycleOutcome {
    /// The sweep completed; `dispatched` counts notifications sent across
    /// all attempts of this cycle.
    Success { dispatched: usize },
    /// A transient failure interrupted the sweep; run the same cycle again.
    Retry,
}

/// One logical firing of the daily reminder job.
///
/// Keep the value alive across retry attempts of the same firing: the set
/// of already-dispatched event ids lives here, which is what prevents
/// double notifications when a failed sweep is re-run.
#[derive(Debug, Default)]
pub struct ReminderCycle {
    state: CycleState,
    dispatched: HashSet<EventId>,
}

impl Default for CycleState {
    fn default() -> Self {
        Self::Idle
    }
}

impl ReminderCycle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> CycleState {
        self.state
    }

    /// Runs (or re-runs) the sweep for `today`.
    pub fn run(
        &mut self,
        repo: &impl EventRepository,
        sink: &mut impl NotificationSink,
        today: NaiveDate,
    ) -> CycleOutcome {
        self.state = CycleState::Running;

        let events = match repo.list_active() {
            Ok(events) => events,
            Err(err) => {
                warn!("event=reminder_cycle module=schedule status=retry stage=list error={err}");
                self.state = CycleState::Retry;
                return CycleOutcome::Retry;
            }
        };

        for event in &events {
            if !event.is_due_today(today) || self.dispatched.contains(&event.id) {
                continue;
            }

            let notification = build_notification(event, event.days_until_next(today));
            if let Err(err) = sink.notify(notification.key, &notification.title, &notification.body)
            {
                warn!(
                    "event=reminder_cycle module=schedule status=retry stage=dispatch id={} error={err}",
                    event.id
                );
                self.state = CycleState::Retry;
                return CycleOutcome::Retry;
            }
            self.dispatched.insert(event.id);
        }

        info!(
            "event=reminder_cycle module=schedule status=ok dispatched={}",
            self.dispatched.len()
        );
        self.state = CycleState::Success;
        CycleOutcome::Success {
            dispatched: self.dispatched.len(),
        }
    }
}
