use chrono::NaiveDate;
use remindly_core::{Event, EventCategory, EventType, RepeatPolicy};

fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}

fn birthday(anchor: NaiveDate) -> Event {
    Event::new(
        "Ali",
        anchor,
        EventType::Birthday,
        EventCategory::Birthday,
        date(2020, 1, 1),
    )
}

#[test]
fn yearly_days_until_next_is_never_negative() {
    let event = birthday(date(2000, 3, 10));
    for offset in 0..400 {
        let today = date(2024, 1, 1) + chrono::Duration::days(offset);
        assert!(event.days_until_next(today) >= 0, "failed at offset {offset}");
    }
}

#[test]
fn anniversary_due_today_when_candidate_equals_today() {
    let event = birthday(date(2000, 3, 10));
    let today = date(2024, 3, 10);

    assert_eq!(event.next_occurrence(today), today);
    assert_eq!(event.days_until_next(today), 0);
    assert!(event.is_due_today(today) == event.reminder_offsets.contains(&0));
}

#[test]
fn yearly_past_candidate_advances_one_year() {
    let event = birthday(date(2000, 3, 10));
    let today = date(2024, 3, 11);

    assert_eq!(event.next_occurrence(today), date(2025, 3, 10));
    assert_eq!(event.days_until_next(today), 364);
}

#[test]
fn one_time_past_event_reports_expired_sentinel() {
    let mut event = birthday(date(2024, 3, 10));
    event.repeat_policy = RepeatPolicy::OneTime;
    let today = date(2024, 3, 15);

    assert_eq!(event.next_occurrence(today), date(2024, 3, 10));
    assert_eq!(event.days_until_next(today), -1);
    assert!(!event.is_due_today(today));
}

#[test]
fn one_time_future_event_behaves_like_yearly_until_it_passes() {
    let mut event = birthday(date(2024, 6, 1));
    event.repeat_policy = RepeatPolicy::OneTime;
    let today = date(2024, 3, 15);

    assert_eq!(event.next_occurrence(today), date(2024, 6, 1));
    assert_eq!(event.days_until_next(today), 78);
}

#[test]
fn next_occurrence_distance_matches_days_until_next() {
    let anchors = [
        date(1999, 1, 1),
        date(2000, 2, 29),
        date(2010, 7, 4),
        date(2024, 12, 31),
    ];
    let today = date(2024, 5, 20);

    for anchor in anchors {
        let event = birthday(anchor);
        let days = event.days_until_next(today);
        assert!(days >= 0);
        assert_eq!((event.next_occurrence(today) - today).num_days(), days);
    }
}

#[test]
fn feb_29_anchor_clamps_to_feb_28_in_non_leap_years() {
    let event = birthday(date(2000, 2, 29));

    // 2023 is not a leap year: the candidate clamps to Feb 28.
    assert_eq!(event.next_occurrence(date(2023, 1, 15)), date(2023, 2, 28));
    // 2024 is a leap year: the true date is used.
    assert_eq!(event.next_occurrence(date(2024, 1, 15)), date(2024, 2, 29));
    // Past Feb in a year before a non-leap year: the advanced candidate
    // clamps as well.
    assert_eq!(event.next_occurrence(date(2024, 3, 1)), date(2025, 2, 28));
}

#[test]
fn years_since_counts_calendar_years() {
    let event = birthday(date(2000, 3, 10));
    assert_eq!(event.years_since(date(2024, 1, 1)), 24);
    assert_eq!(event.years_since(date(2000, 12, 1)), 0);
}

#[test]
fn inactive_events_are_never_due() {
    let mut event = birthday(date(2000, 3, 10));
    event.reminder_offsets = vec![0];
    event.is_active = false;

    assert!(!event.is_due_today(date(2024, 3, 10)));
}

#[test]
fn due_today_matches_configured_offsets_only() {
    let mut event = birthday(date(2000, 3, 10));
    event.reminder_offsets = vec![0, 3, 7];

    assert!(event.is_due_today(date(2024, 3, 10)));
    assert!(event.is_due_today(date(2024, 3, 7)));
    assert!(event.is_due_today(date(2024, 3, 3)));
    assert!(!event.is_due_today(date(2024, 3, 9)));
}
