mod test_support;

use serde_json::json;
use test_support::{request_err, request_ok, select_workspace, spawn_sidecar, temp_dir};

#[test]
fn week_view_groups_items_by_weekday_in_time_order() {
    let workspace = temp_dir("diariod-schedule-week");
    let (_child, mut stdin, mut reader) = spawn_sidecar();
    select_workspace(&mut stdin, &mut reader, &workspace);

    for (i, (weekday, start, end, subject)) in [
        (2u8, "08:50", "09:40", "LP"),
        (2u8, "07:00", "07:50", "LI"),
        (5u8, "10:00", "10:50", "PT"),
    ]
    .iter()
    .enumerate()
    {
        let _ = request_ok(
            &mut stdin,
            &mut reader,
            &format!("c{}", i),
            "schedule.create",
            json!({
                "classId": "6A",
                "subjectId": subject,
                "weekday": weekday,
                "startTime": start,
                "endTime": end,
            }),
        );
    }

    let week = request_ok(
        &mut stdin,
        &mut reader,
        "w",
        "schedule.weekOpen",
        json!({ "classId": "6A" }),
    );
    let days = week.get("days").and_then(|v| v.as_array()).unwrap();
    assert_eq!(days.len(), 6);

    let tuesday = &days[1];
    assert_eq!(tuesday.get("weekday").and_then(|v| v.as_u64()), Some(2));
    let starts: Vec<&str> = tuesday
        .get("items")
        .and_then(|v| v.as_array())
        .unwrap()
        .iter()
        .filter_map(|i| i.get("startTime").and_then(|v| v.as_str()))
        .collect();
    assert_eq!(starts, vec!["07:00", "08:50"]);

    let monday = &days[0];
    assert_eq!(
        monday.get("items").and_then(|v| v.as_array()).map(|a| a.len()),
        Some(0)
    );
}

#[test]
fn schedule_validation_rejects_sunday_and_inverted_times() {
    let workspace = temp_dir("diariod-schedule-validation");
    let (_child, mut stdin, mut reader) = spawn_sidecar();
    select_workspace(&mut stdin, &mut reader, &workspace);

    let sunday = request_err(
        &mut stdin,
        &mut reader,
        "1",
        "schedule.create",
        json!({
            "classId": "6A",
            "subjectId": "LI",
            "weekday": 7,
            "startTime": "07:00",
            "endTime": "07:50",
        }),
    );
    assert_eq!(
        sunday.get("code").and_then(|v| v.as_str()),
        Some("validation_failed")
    );

    let created = request_ok(
        &mut stdin,
        &mut reader,
        "2",
        "schedule.create",
        json!({
            "classId": "6A",
            "subjectId": "LI",
            "weekday": 3,
            "startTime": "07:00",
            "endTime": "07:50",
        }),
    );
    let item_id = created.get("itemId").and_then(|v| v.as_str()).unwrap().to_string();

    // An update cannot make the item invalid either.
    let inverted = request_err(
        &mut stdin,
        &mut reader,
        "3",
        "schedule.update",
        json!({ "itemId": item_id, "startTime": "09:00", "endTime": "08:00" }),
    );
    assert_eq!(
        inverted.get("code").and_then(|v| v.as_str()),
        Some("validation_failed")
    );

    let _ = request_ok(
        &mut stdin,
        &mut reader,
        "4",
        "schedule.update",
        json!({ "itemId": item_id, "weekday": 4 }),
    );
    let _ = request_ok(
        &mut stdin,
        &mut reader,
        "5",
        "schedule.delete",
        json!({ "itemId": item_id }),
    );
}

#[test]
fn calendar_defaults_to_the_seeded_school_year() {
    let workspace = temp_dir("diariod-calendar-seed");
    let (_child, mut stdin, mut reader) = spawn_sidecar();
    select_workspace(&mut stdin, &mut reader, &workspace);

    let january = request_ok(
        &mut stdin,
        &mut reader,
        "1",
        "calendar.monthOpen",
        json!({ "year": 2026, "month": 1 }),
    );
    let events = january.get("events").and_then(|v| v.as_array()).unwrap();
    assert_eq!(events.len(), 2);
    assert_eq!(
        events[0].get("title").and_then(|v| v.as_str()),
        Some("Confraternização Universal")
    );
    assert_eq!(
        events[0].get("category").and_then(|v| v.as_str()),
        Some("FERIADO")
    );

    let day = request_ok(
        &mut stdin,
        &mut reader,
        "2",
        "calendar.eventsOn",
        json!({ "date": "2026-12-25" }),
    );
    let events = day.get("events").and_then(|v| v.as_array()).unwrap();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].get("title").and_then(|v| v.as_str()), Some("Natal"));
}

#[test]
fn calendar_events_can_be_added_edited_and_removed() {
    let workspace = temp_dir("diariod-calendar-crud");
    let (_child, mut stdin, mut reader) = spawn_sidecar();
    select_workspace(&mut stdin, &mut reader, &workspace);

    let created = request_ok(
        &mut stdin,
        &mut reader,
        "1",
        "calendar.create",
        json!({
            "date": "2026-09-21",
            "title": "Prova de Língua Inglesa",
            "category": "PROVA",
        }),
    );
    let event_id = created.get("eventId").and_then(|v| v.as_str()).unwrap().to_string();

    let _ = request_ok(
        &mut stdin,
        &mut reader,
        "2",
        "calendar.update",
        json!({ "eventId": event_id, "date": "2026-09-22" }),
    );

    let september = request_ok(
        &mut stdin,
        &mut reader,
        "3",
        "calendar.monthOpen",
        json!({ "year": 2026, "month": 9 }),
    );
    let events = september.get("events").and_then(|v| v.as_array()).unwrap();
    // Two seeded September events plus the new exam, still date-ordered.
    assert_eq!(events.len(), 3);
    let dates: Vec<&str> = events
        .iter()
        .filter_map(|e| e.get("date").and_then(|v| v.as_str()))
        .collect();
    assert_eq!(dates, vec!["2026-09-07", "2026-09-08", "2026-09-22"]);

    let _ = request_ok(
        &mut stdin,
        &mut reader,
        "4",
        "calendar.delete",
        json!({ "eventId": event_id }),
    );
    let error = request_err(
        &mut stdin,
        &mut reader,
        "5",
        "calendar.delete",
        json!({ "eventId": event_id }),
    );
    assert_eq!(error.get("code").and_then(|v| v.as_str()), Some("not_found"));

    let bad_category = request_err(
        &mut stdin,
        &mut reader,
        "6",
        "calendar.create",
        json!({ "date": "2026-09-23", "title": "x", "category": "FESTA" }),
    );
    assert_eq!(
        bad_category.get("code").and_then(|v| v.as_str()),
        Some("bad_params")
    );
}
