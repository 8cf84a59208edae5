mod test_support;

use serde_json::json;
use test_support::{request_err, request_ok, select_workspace, spawn_sidecar, temp_dir};

fn mark_params(student: &str, date: &str, status: &str) -> serde_json::Value {
    json!({
        "studentId": student,
        "date": date,
        "classId": "6A",
        "subjectId": "LI",
        "status": status,
    })
}

#[test]
fn remarking_a_day_replaces_the_entry_instead_of_duplicating() {
    let workspace = temp_dir("diariod-attendance-remark");
    let (_child, mut stdin, mut reader) = spawn_sidecar();
    select_workspace(&mut stdin, &mut reader, &workspace);

    let first = request_ok(
        &mut stdin,
        &mut reader,
        "1",
        "attendance.mark",
        mark_params("6A01", "2026-03-02", "P"),
    );
    assert_eq!(first.get("updated").and_then(|v| v.as_bool()), Some(false));

    let second = request_ok(
        &mut stdin,
        &mut reader,
        "2",
        "attendance.mark",
        mark_params("6A01", "2026-03-02", "F"),
    );
    assert_eq!(second.get("updated").and_then(|v| v.as_bool()), Some(true));

    let month = request_ok(
        &mut stdin,
        &mut reader,
        "3",
        "attendance.monthOpen",
        json!({ "classId": "6A", "subjectId": "LI", "year": 2026, "month": 3 }),
    );
    let rows = month.get("rows").and_then(|v| v.as_array()).unwrap();
    let row = rows
        .iter()
        .find(|r| r.get("studentId").and_then(|v| v.as_str()) == Some("6A01"))
        .expect("row for 6A01");
    // Exactly one entry for the day, holding the latest status.
    assert_eq!(
        row.pointer("/days/2026-03-02").and_then(|v| v.as_str()),
        Some("F")
    );
    assert_eq!(row.pointer("/summary/presences").and_then(|v| v.as_u64()), Some(0));
    assert_eq!(row.pointer("/summary/absences").and_then(|v| v.as_u64()), Some(1));
}

#[test]
fn month_summary_uses_instructional_day_denominator() {
    let workspace = temp_dir("diariod-attendance-percent");
    let (_child, mut stdin, mut reader) = spawn_sidecar();
    select_workspace(&mut stdin, &mut reader, &workspace);

    // June 2026: 30 days minus 4 Sundays = 26 instructional days.
    let mut n = 0;
    for day in 1..=10 {
        n += 1;
        let status = if day <= 8 { "P" } else { "F" };
        let _ = request_ok(
            &mut stdin,
            &mut reader,
            &format!("m{}", n),
            "attendance.mark",
            mark_params("6A02", &format!("2026-06-{:02}", day), status),
        );
    }

    let month = request_ok(
        &mut stdin,
        &mut reader,
        "open",
        "attendance.monthOpen",
        json!({ "classId": "6A", "subjectId": "LI", "year": 2026, "month": 6 }),
    );
    assert_eq!(
        month.get("instructionalDays").and_then(|v| v.as_u64()),
        Some(26)
    );
    let rows = month.get("rows").and_then(|v| v.as_array()).unwrap();
    let row = rows
        .iter()
        .find(|r| r.get("studentId").and_then(|v| v.as_str()) == Some("6A02"))
        .unwrap();
    assert_eq!(row.pointer("/summary/presences").and_then(|v| v.as_u64()), Some(8));
    assert_eq!(row.pointer("/summary/absences").and_then(|v| v.as_u64()), Some(2));
    // round(8 / 26 * 100) == 31, not 8/10.
    assert_eq!(
        row.pointer("/summary/attendancePercent").and_then(|v| v.as_i64()),
        Some(31)
    );

    // A student with no marks stays at the optimistic 100%.
    let unmarked = rows
        .iter()
        .find(|r| r.get("studentId").and_then(|v| v.as_str()) == Some("6A03"))
        .unwrap();
    assert_eq!(
        unmarked.pointer("/summary/attendancePercent").and_then(|v| v.as_i64()),
        Some(100)
    );
}

#[test]
fn clear_removes_the_mark_and_reports_noop_when_absent() {
    let workspace = temp_dir("diariod-attendance-clear");
    let (_child, mut stdin, mut reader) = spawn_sidecar();
    select_workspace(&mut stdin, &mut reader, &workspace);

    let key = json!({
        "studentId": "6A01",
        "date": "2026-04-06",
        "classId": "6A",
        "subjectId": "LI",
    });
    let _ = request_ok(
        &mut stdin,
        &mut reader,
        "1",
        "attendance.mark",
        mark_params("6A01", "2026-04-06", "J"),
    );
    let cleared = request_ok(&mut stdin, &mut reader, "2", "attendance.clear", key.clone());
    assert_eq!(cleared.get("removed").and_then(|v| v.as_bool()), Some(true));
    let again = request_ok(&mut stdin, &mut reader, "3", "attendance.clear", key);
    assert_eq!(again.get("removed").and_then(|v| v.as_bool()), Some(false));
}

#[test]
fn bulk_mark_skips_students_outside_the_roster_and_counts_distinct_ids() {
    let workspace = temp_dir("diariod-attendance-bulk");
    let (_child, mut stdin, mut reader) = spawn_sidecar();
    select_workspace(&mut stdin, &mut reader, &workspace);

    // "6B01" appears twice; it is stamped and counted once.
    let bulk = request_ok(
        &mut stdin,
        &mut reader,
        "1",
        "attendance.bulkMark",
        json!({
            "classId": "6B",
            "subjectId": "LP",
            "date": "2026-05-04",
            "status": "P",
            "studentIds": ["6B01", "6B02", "6B01", "6A01", "ghost"],
        }),
    );
    assert_eq!(bulk.get("marked").and_then(|v| v.as_u64()), Some(2));

    let month = request_ok(
        &mut stdin,
        &mut reader,
        "2",
        "attendance.monthOpen",
        json!({ "classId": "6B", "subjectId": "LP", "year": 2026, "month": 5 }),
    );
    let rows = month.get("rows").and_then(|v| v.as_array()).unwrap();
    let marked: Vec<&str> = rows
        .iter()
        .filter(|r| r.pointer("/days/2026-05-04").is_some())
        .filter_map(|r| r.get("studentId").and_then(|v| v.as_str()))
        .collect();
    assert_eq!(marked, vec!["6B01", "6B02"]);
}

#[test]
fn invalid_marks_are_rejected_and_change_nothing() {
    let workspace = temp_dir("diariod-attendance-invalid");
    let (_child, mut stdin, mut reader) = spawn_sidecar();
    select_workspace(&mut stdin, &mut reader, &workspace);

    let bad_status = request_err(
        &mut stdin,
        &mut reader,
        "1",
        "attendance.mark",
        mark_params("6A01", "2026-03-02", "X"),
    );
    assert_eq!(bad_status.get("code").and_then(|v| v.as_str()), Some("bad_params"));

    let bad_date = request_err(
        &mut stdin,
        &mut reader,
        "2",
        "attendance.mark",
        mark_params("6A01", "03/02/2026", "P"),
    );
    assert_eq!(bad_date.get("code").and_then(|v| v.as_str()), Some("bad_params"));

    let wrong_class = request_err(
        &mut stdin,
        &mut reader,
        "3",
        "attendance.mark",
        json!({
            "studentId": "6B01",
            "date": "2026-03-02",
            "classId": "6A",
            "subjectId": "LI",
            "status": "P",
        }),
    );
    assert_eq!(wrong_class.get("code").and_then(|v| v.as_str()), Some("not_found"));

    let month = request_ok(
        &mut stdin,
        &mut reader,
        "4",
        "attendance.monthOpen",
        json!({ "classId": "6A", "subjectId": "LI", "year": 2026, "month": 3 }),
    );
    for row in month.get("rows").and_then(|v| v.as_array()).unwrap() {
        assert_eq!(
            row.get("days").and_then(|v| v.as_object()).map(|m| m.len()),
            Some(0)
        );
    }
}
