//! Event domain model and recurrence date math.
//!
//! # Responsibility
//! - Define the canonical reminder event shared by store, service and
//!   scheduler layers.
//! - Compute next occurrence / due-ness against a caller-supplied date.
//!
//! # Invariants
//! - `id == 0` means the event has not been persisted yet; the store assigns
//!   real ids on insert.
//! - `reminder_offsets` entries are in `[0, 365]`, at most 10, never empty.
//! - Feb-29 anchors clamp to Feb 28 in non-leap years. This policy is
//!   deliberate and must stay stable across all recurrence calls.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

/// Store-assigned row identifier. Zero marks a not-yet-persisted event.
pub type EventId = i64;

/// Coarse event classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventType {
    Birthday,
    Anniversary,
    Family,
    Holiday,
    Custom,
}

impl EventType {
    /// Canonical lowercase string used in storage and transfer payloads.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Birthday => "birthday",
            Self::Anniversary => "anniversary",
            Self::Family => "family",
            Self::Holiday => "holiday",
            Self::Custom => "custom",
        }
    }

    /// Parses the canonical string form. Unknown values yield `None`.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "birthday" => Some(Self::Birthday),
            "anniversary" => Some(Self::Anniversary),
            "family" => Some(Self::Family),
            "holiday" => Some(Self::Holiday),
            "custom" => Some(Self::Custom),
            _ => None,
        }
    }
}

/// Whether an event recurs every year or happens once.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RepeatPolicy {
    OneTime,
    Yearly,
}

impl RepeatPolicy {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::OneTime => "one_time",
            Self::Yearly => "yearly",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "one_time" => Some(Self::OneTime),
            "yearly" => Some(Self::Yearly),
            _ => None,
        }
    }
}

/// Fine-grained event category carrying display metadata.
///
/// A closed set: each variant knows its display label, its glyph, whether
/// its calendar date is fixed every year, and whether it is a religious
/// holiday whose date shifts yearly (and therefore cannot be auto-filled).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventCategory {
    Birthday,
    ChildBirthday,
    SiblingBirthday,
    RelativeBirthday,
    PetBirthday,
    WeddingAnniversary,
    RelationshipAnniversary,
    DatingAnniversary,
    EngagementAnniversary,
    GraduationDay,
    WorkAnniversary,
    HouseAnniversary,
    MothersDay,
    FathersDay,
    EidAlFitr,
    EidAlAdha,
    NewYearsEve,
    ValentinesDay,
    TeachersDay,
    Halloween,
    ChristmasDay,
    Custom,
}

impl EventCategory {
    /// Every known category, in display order.
    pub const ALL: &'static [EventCategory] = &[
        Self::Birthday,
        Self::ChildBirthday,
        Self::SiblingBirthday,
        Self::RelativeBirthday,
        Self::PetBirthday,
        Self::WeddingAnniversary,
        Self::RelationshipAnniversary,
        Self::DatingAnniversary,
        Self::EngagementAnniversary,
        Self::GraduationDay,
        Self::WorkAnniversary,
        Self::HouseAnniversary,
        Self::MothersDay,
        Self::FathersDay,
        Self::EidAlFitr,
        Self::EidAlAdha,
        Self::NewYearsEve,
        Self::ValentinesDay,
        Self::TeachersDay,
        Self::Halloween,
        Self::ChristmasDay,
        Self::Custom,
    ];

    /// Human-readable label used in notification bodies and lists.
    pub fn display_name(self) -> &'static str {
        match self {
            Self::Birthday => "Birthday",
            Self::ChildBirthday => "Child's Birthday",
            Self::SiblingBirthday => "Sibling's Birthday",
            Self::RelativeBirthday => "Relative's Birthday",
            Self::PetBirthday => "Pet's Birthday",
            Self::WeddingAnniversary => "Wedding Anniversary",
            Self::RelationshipAnniversary => "Relationship Anniversary",
            Self::DatingAnniversary => "Dating Anniversary",
            Self::EngagementAnniversary => "Engagement Anniversary",
            Self::GraduationDay => "Graduation Day",
            Self::WorkAnniversary => "Work Anniversary",
            Self::HouseAnniversary => "House Anniversary",
            Self::MothersDay => "Mother's Day",
            Self::FathersDay => "Father's Day",
            Self::EidAlFitr => "Eid al-Fitr",
            Self::EidAlAdha => "Eid al-Adha",
            Self::NewYearsEve => "New Year's Eve",
            Self::ValentinesDay => "Valentine's Day",
            Self::TeachersDay => "Teachers' Day",
            Self::Halloween => "Halloween",
            Self::ChristmasDay => "Christmas Day",
            Self::Custom => "Custom",
        }
    }

    /// Glyph shown next to the display label.
    pub fn glyph(self) -> &'static str {
        match self {
            Self::Birthday => "🎂",
            Self::ChildBirthday => "👶",
            Self::SiblingBirthday => "👫",
            Self::RelativeBirthday => "👪",
            Self::PetBirthday => "🐾",
            Self::WeddingAnniversary => "💒",
            Self::RelationshipAnniversary => "💑",
            Self::DatingAnniversary => "💕",
            Self::EngagementAnniversary => "💍",
            Self::GraduationDay => "🎓",
            Self::WorkAnniversary => "💼",
            Self::HouseAnniversary => "🏠",
            Self::MothersDay => "👩",
            Self::FathersDay => "👨",
            Self::EidAlFitr => "🌙",
            Self::EidAlAdha => "🐑",
            Self::NewYearsEve => "🎆",
            Self::ValentinesDay => "❤️",
            Self::TeachersDay => "📚",
            Self::Halloween => "🎃",
            Self::ChristmasDay => "🎄",
            Self::Custom => "⭐",
        }
    }

    /// Fixed `(month, day)` for categories whose calendar date is invariant
    /// across years. `None` for user-supplied and religious dates.
    pub fn fixed_month_day(self) -> Option<(u32, u32)> {
        match self {
            Self::MothersDay => Some((5, 12)),
            Self::FathersDay => Some((6, 16)),
            Self::NewYearsEve => Some((1, 1)),
            Self::ValentinesDay => Some((2, 14)),
            Self::TeachersDay => Some((11, 24)),
            Self::Halloween => Some((10, 31)),
            Self::ChristmasDay => Some((12, 25)),
            _ => None,
        }
    }

    /// Religious holidays shift yearly and are entered as one-time dates.
    pub fn is_religious(self) -> bool {
        matches!(self, Self::EidAlFitr | Self::EidAlAdha)
    }

    pub fn has_fixed_date(self) -> bool {
        self.fixed_month_day().is_some()
    }

    /// Fixed date resolved for a concrete year, or `None` for categories
    /// without a fixed date.
    pub fn fixed_date(self, year: i32) -> Option<NaiveDate> {
        let (month, day) = self.fixed_month_day()?;
        NaiveDate::from_ymd_opt(year, month, day)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Birthday => "birthday",
            Self::ChildBirthday => "child_birthday",
            Self::SiblingBirthday => "sibling_birthday",
            Self::RelativeBirthday => "relative_birthday",
            Self::PetBirthday => "pet_birthday",
            Self::WeddingAnniversary => "wedding_anniversary",
            Self::RelationshipAnniversary => "relationship_anniversary",
            Self::DatingAnniversary => "dating_anniversary",
            Self::EngagementAnniversary => "engagement_anniversary",
            Self::GraduationDay => "graduation_day",
            Self::WorkAnniversary => "work_anniversary",
            Self::HouseAnniversary => "house_anniversary",
            Self::MothersDay => "mothers_day",
            Self::FathersDay => "fathers_day",
            Self::EidAlFitr => "eid_al_fitr",
            Self::EidAlAdha => "eid_al_adha",
            Self::NewYearsEve => "new_years_eve",
            Self::ValentinesDay => "valentines_day",
            Self::TeachersDay => "teachers_day",
            Self::Halloween => "halloween",
            Self::ChristmasDay => "christmas_day",
            Self::Custom => "custom",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL
            .iter()
            .copied()
            .find(|category| category.as_str() == value)
    }
}

/// Default category picked when the user switches event type.
pub fn default_category_for(event_type: EventType) -> EventCategory {
    match event_type {
        EventType::Birthday => EventCategory::Birthday,
        EventType::Anniversary => EventCategory::WeddingAnniversary,
        EventType::Family => EventCategory::MothersDay,
        EventType::Holiday => EventCategory::NewYearsEve,
        EventType::Custom => EventCategory::Custom,
    }
}

/// Canonical reminder event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    /// Store-assigned id; 0 until first persisted.
    pub id: EventId,
    /// Display name, 1-200 chars after sanitization.
    pub name: String,
    /// Original occurrence date (e.g. the actual birth date).
    pub anchor_date: NaiveDate,
    pub event_type: EventType,
    pub category: EventCategory,
    pub repeat_policy: RepeatPolicy,
    /// Days-before-occurrence thresholds, each in `[0, 365]`, max 10.
    pub reminder_offsets: Vec<i32>,
    /// Free text, 0-2000 chars after sanitization.
    pub note: String,
    /// Inactive events stay stored but are excluded from scheduling.
    pub is_active: bool,
    /// Record creation date, set once.
    pub created_at: NaiveDate,
}

impl Event {
    /// Creates an unpersisted event with default repeat and reminder policy.
    pub fn new(
        name: impl Into<String>,
        anchor_date: NaiveDate,
        event_type: EventType,
        category: EventCategory,
        created_at: NaiveDate,
    ) -> Self {
        Self {
            id: 0,
            name: name.into(),
            anchor_date,
            event_type,
            category,
            repeat_policy: RepeatPolicy::Yearly,
            reminder_offsets: vec![1],
            note: String::new(),
            is_active: true,
            created_at,
        }
    }

    /// Next calendar date this event happens, relative to `today`.
    ///
    /// The anchor's month/day is substituted into `today`'s year. A candidate
    /// equal to `today` counts as happening today. For one-time events whose
    /// candidate has passed, the past candidate is returned unchanged as the
    /// "will not recur" signal.
    pub fn next_occurrence(&self, today: NaiveDate) -> NaiveDate {
        let candidate = anchor_in_year(self.anchor_date, today.year());
        if candidate >= today {
            return candidate;
        }
        match self.repeat_policy {
            RepeatPolicy::OneTime => candidate,
            RepeatPolicy::Yearly => anchor_in_year(self.anchor_date, today.year() + 1),
        }
    }

    /// Whole days until the next occurrence, or `-1` when a one-time event
    /// has already passed this year and will not repeat.
    pub fn days_until_next(&self, today: NaiveDate) -> i64 {
        let next = self.next_occurrence(today);
        if next < today {
            return -1;
        }
        (next - today).num_days()
    }

    /// Calendar years since the anchor date. May be 0 for same-year records.
    pub fn years_since(&self, today: NaiveDate) -> i32 {
        today.year() - self.anchor_date.year()
    }

    /// True when this event should notify today: it is active and its
    /// days-until-next matches one of the configured reminder offsets.
    pub fn is_due_today(&self, today: NaiveDate) -> bool {
        if !self.is_active {
            return false;
        }
        let days = self.days_until_next(today);
        days >= 0 && self.reminder_offsets.iter().any(|&offset| i64::from(offset) == days)
    }
}

/// Rebuilds the anchor's month/day in `year`.
///
/// Feb 29 does not exist in non-leap years; such anchors clamp to Feb 28 so
/// reminders fire one day early rather than rolling into March.
fn anchor_in_year(anchor: NaiveDate, year: i32) -> NaiveDate {
    match NaiveDate::from_ymd_opt(year, anchor.month(), anchor.day()) {
        Some(date) => date,
        None => NaiveDate::from_ymd_opt(year, anchor.month(), anchor.day() - 1).unwrap_or(anchor),
    }
}
