//! Daily reminder scheduling boundary.
//!
//! # Responsibility
//! - Define the contracts the host scheduling substrate and notification
//!   channel implement.
//! - Compute the first-firing delay for the configured wall-clock time.
//!
//! # Invariants
//! - Registration under one logical name replaces any pending schedule with
//!   that name; it never duplicates it. The substrate owns that guarantee
//!   along with at-most-one-outstanding-instance semantics per name.
//! - Cancellation by name is terminal until re-registered.

use chrono::{NaiveDateTime, NaiveTime};
use log::info;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::time::Duration;

mod cycle;

pub use cycle::{build_notification, CycleOutcome, CycleState, Notification, ReminderCycle};

/// Logical name of the single daily reminder schedule slot.
pub const REMINDER_SCHEDULE_NAME: &str = "daily_reminder";
/// Nominal period between firings.
pub const REMINDER_PERIOD: Duration = Duration::from_secs(24 * 60 * 60);

/// Default wall-clock notification time: 09:00.
pub fn default_notify_time() -> NaiveTime {
    NaiveTime::from_hms_opt(9, 0, 0).expect("valid default notify time")
}

#[derive(Debug)]
pub enum ScheduleError {
    RegistrationFailed { name: String, message: String },
    CancellationFailed { name: String, message: String },
}

impl Display for ScheduleError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::RegistrationFailed { name, message } => {
                write!(f, "failed to register schedule `{name}`: {message}")
            }
            Self::CancellationFailed { name, message } => {
                write!(f, "failed to cancel schedule `{name}`: {message}")
            }
        }
    }
}

impl Error for ScheduleError {}

/// Transient notification delivery failure. Surfaces to the cycle as a
/// retry, never as a panic.
#[derive(Debug)]
pub struct NotifyError {
    pub message: String,
}

impl Display for NotifyError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "notification delivery failed: {}", self.message)
    }
}

impl Error for NotifyError {}

/// Host scheduling substrate: named periodic slots with replace-on-register
/// semantics and at most one outstanding instance per name.
pub trait JobScheduler {
    fn register(
        &mut self,
        name: &str,
        first_delay: Duration,
        period: Duration,
    ) -> Result<(), ScheduleError>;
    fn cancel(&mut self, name: &str) -> Result<(), ScheduleError>;
}

/// Platform notification channel. Delivery keyed by event id so re-firing
/// the same logical day stays idempotent per event.
pub trait NotificationSink {
    fn notify(&mut self, key: i64, title: &str, body: &str) -> Result<(), NotifyError>;
}

/// Delay until the next occurrence of `notify_at`.
///
/// When the time has already passed today (or is exactly now), the first
/// firing lands tomorrow at that time.
pub fn first_fire_delay(now: NaiveDateTime, notify_at: NaiveTime) -> Duration {
    let today_fire = now.date().and_time(notify_at);
    let fire = if now < today_fire {
        today_fire
    } else {
        today_fire + chrono::Duration::days(1)
    };
    (fire - now).to_std().unwrap_or(Duration::ZERO)
}

/// Registers the daily reminder schedule, replacing any pending one.
pub fn schedule_daily_reminders(
    scheduler: &mut impl JobScheduler,
    now: NaiveDateTime,
    notify_at: NaiveTime,
) -> Result<(), ScheduleError> {
    let delay = first_fire_delay(now, notify_at);
    scheduler.register(REMINDER_SCHEDULE_NAME, delay, REMINDER_PERIOD)?;
    info!(
        "event=schedule_registered module=schedule status=ok name={REMINDER_SCHEDULE_NAME} first_delay_s={}",
        delay.as_secs()
    );
    Ok(())
}

/// Cancels the daily reminder schedule by its logical name.
pub fn cancel_daily_reminders(scheduler: &mut impl JobScheduler) -> Result<(), ScheduleError> {
    scheduler.cancel(REMINDER_SCHEDULE_NAME)?;
    info!(
        "event=schedule_cancelled module=schedule status=ok name={REMINDER_SCHEDULE_NAME}"
    );
    Ok(())
}
