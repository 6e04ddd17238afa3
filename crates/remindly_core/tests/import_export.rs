use chrono::NaiveDate;
use remindly_core::db::open_db_in_memory;
use remindly_core::{
    import_events, parse_import_payload, validate_imported_record, Event, EventCategory,
    EventRecord, EventRepository, EventType, ImportError, RejectionReason, RepeatPolicy,
    SqliteEventRepository,
};

fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}

fn valid_record(name: &str) -> EventRecord {
    EventRecord {
        name: name.to_string(),
        anchor_epoch_day: 7444, // 1990-05-20
        event_type: "birthday".to_string(),
        category: "birthday".to_string(),
        repeat_policy: "yearly".to_string(),
        reminder_offsets: vec![1, 7],
        note: String::new(),
        is_active: true,
    }
}

#[test]
fn export_then_import_is_lossless_for_valid_events() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteEventRepository::new(&conn);

    let mut original = Event::new(
        "Ayla",
        date(1990, 5, 20),
        EventType::Birthday,
        EventCategory::Birthday,
        date(2024, 1, 1),
    );
    original.reminder_offsets = vec![0, 1, 7];
    original.note = "call in the morning".to_string();
    repo.upsert(&original).unwrap();

    let payload = remindly_core::export_events(&repo).unwrap();

    let reimported = parse_import_payload(&payload, date(2024, 6, 1)).unwrap();
    assert_eq!(reimported.len(), 1);
    let event = &reimported[0];
    assert_eq!(event.name, original.name);
    assert_eq!(event.anchor_date, original.anchor_date);
    assert_eq!(event.event_type, original.event_type);
    assert_eq!(event.category, original.category);
    assert_eq!(event.repeat_policy, original.repeat_policy);
    assert_eq!(event.reminder_offsets, original.reminder_offsets);
    assert_eq!(event.note, original.note);
    assert_eq!(event.is_active, original.is_active);
}

#[test]
fn round_trip_record_validates_unchanged() {
    let record = valid_record("Ayla");
    let event = validate_imported_record(&record, date(2024, 6, 1)).unwrap();
    let back = EventRecord::from_event(&event);
    assert_eq!(back, record);
}

#[test]
fn import_rejects_oversized_payload() {
    let payload = format!("[{}]", " ".repeat(5_000_001));
    let err = parse_import_payload(&payload, date(2024, 6, 1)).unwrap_err();
    assert!(matches!(err, ImportError::PayloadTooLarge { .. }));
}

#[test]
fn import_rejects_payload_without_list_envelope() {
    let err = parse_import_payload("{\"name\": \"x\"}", date(2024, 6, 1)).unwrap_err();
    assert!(matches!(err, ImportError::MalformedEnvelope));
}

#[test]
fn import_accepts_10_000_records_and_rejects_10_001() {
    let record_json = serde_json::to_string(&valid_record("Ayla")).unwrap();

    let at_limit: Vec<String> = vec![record_json.clone(); 10_000];
    let payload = format!("[{}]", at_limit.join(","));
    let events = parse_import_payload(&payload, date(2024, 6, 1)).unwrap();
    assert_eq!(events.len(), 10_000);

    let over_limit: Vec<String> = vec![record_json; 10_001];
    let payload = format!("[{}]", over_limit.join(","));
    let err = parse_import_payload(&payload, date(2024, 6, 1)).unwrap_err();
    assert!(matches!(err, ImportError::TooManyRecords { count: 10_001 }));

    // Through the store-facing entry point, the batch rejection reports an
    // imported count of zero rather than an error.
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteEventRepository::new(&conn);
    let payload = format!(
        "[{}]",
        vec![serde_json::to_string(&valid_record("Ayla")).unwrap(); 10_001].join(",")
    );
    assert_eq!(import_events(&repo, &payload, date(2024, 6, 1)).unwrap(), 0);
    assert!(repo.list_all().unwrap().is_empty());
}

#[test]
fn per_record_failures_are_skipped_not_fatal() {
    let good = valid_record("Ayla");
    let mut bad_type = valid_record("Berk");
    bad_type.event_type = "galaxy".to_string();
    let mut blank = valid_record("  ");
    blank.name = "   ".to_string();

    let payload = serde_json::to_string(&vec![good, bad_type, blank]).unwrap();
    let events = parse_import_payload(&payload, date(2024, 6, 1)).unwrap();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].name, "Ayla");
}

#[test]
fn batch_with_zero_valid_records_reports_overall_failure() {
    let mut bad = valid_record("Berk");
    bad.repeat_policy = "sometimes".to_string();

    let payload = serde_json::to_string(&vec![bad]).unwrap();
    let err = parse_import_payload(&payload, date(2024, 6, 1)).unwrap_err();
    assert!(matches!(err, ImportError::NoValidRecords { rejected: 1 }));

    let conn = open_db_in_memory().unwrap();
    let repo = SqliteEventRepository::new(&conn);
    let mut bad = valid_record("Berk");
    bad.category = "nonsense".to_string();
    let payload = serde_json::to_string(&vec![bad]).unwrap();
    assert_eq!(import_events(&repo, &payload, date(2024, 6, 1)).unwrap(), 0);
}

#[test]
fn imported_records_are_sanitized_and_clamped() {
    let mut record = valid_record("<script>Ali</script>");
    record.note = "see the \"plan\" & <notes>".to_string();
    record.reminder_offsets = vec![-5, 3, 3, 400, 10];

    let event = validate_imported_record(&record, date(2024, 6, 1)).unwrap();
    assert_eq!(event.name, "scriptAli/script");
    assert_eq!(event.note, "see the plan  notes");
    assert_eq!(event.reminder_offsets, vec![3, 10]);
    assert_eq!(event.created_at, date(2024, 6, 1));
    assert_eq!(event.id, 0);
}

#[test]
fn imported_offsets_fall_back_to_one_day_when_nothing_survives() {
    let mut record = valid_record("Ayla");
    record.reminder_offsets = vec![-1, 400];

    let event = validate_imported_record(&record, date(2024, 6, 1)).unwrap();
    assert_eq!(event.reminder_offsets, vec![1]);
}

#[test]
fn anchor_dates_outside_1900_to_2200_are_rejected() {
    let mut too_early = valid_record("Ayla");
    too_early.anchor_epoch_day = -25_568; // 1899-12-31
    assert!(matches!(
        validate_imported_record(&too_early, date(2024, 6, 1)),
        Err(RejectionReason::AnchorOutOfRange { .. })
    ));

    let mut at_min = valid_record("Ayla");
    at_min.anchor_epoch_day = -25_567; // 1900-01-01
    let event = validate_imported_record(&at_min, date(2024, 6, 1)).unwrap();
    assert_eq!(event.anchor_date, date(1900, 1, 1));

    let mut at_max = valid_record("Ayla");
    at_max.anchor_epoch_day = 84_370; // 2200-12-31
    let event = validate_imported_record(&at_max, date(2024, 6, 1)).unwrap();
    assert_eq!(event.anchor_date, date(2200, 12, 31));

    let mut too_late = valid_record("Ayla");
    too_late.anchor_epoch_day = 84_371; // 2201-01-01
    assert!(matches!(
        validate_imported_record(&too_late, date(2024, 6, 1)),
        Err(RejectionReason::AnchorOutOfRange { .. })
    ));
}

#[test]
fn oversized_names_are_rejected_before_sanitization() {
    let mut record = valid_record("Ayla");
    record.name = "x".repeat(201);
    assert!(matches!(
        validate_imported_record(&record, date(2024, 6, 1)),
        Err(RejectionReason::NameTooLong { length: 201 })
    ));

    let mut event_record = valid_record("Ayla");
    event_record.repeat_policy = "one_time".to_string();
    let event = validate_imported_record(&event_record, date(2024, 6, 1)).unwrap();
    assert_eq!(event.repeat_policy, RepeatPolicy::OneTime);
}

#[test]
fn import_writes_valid_records_to_the_store() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteEventRepository::new(&conn);

    let payload =
        serde_json::to_string(&vec![valid_record("Ayla"), valid_record("Berk")]).unwrap();
    let imported = import_events(&repo, &payload, date(2024, 6, 1)).unwrap();
    assert_eq!(imported, 2);
    assert_eq!(repo.list_all().unwrap().len(), 2);
}
