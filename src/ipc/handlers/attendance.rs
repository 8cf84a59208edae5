use std::collections::{HashMap, HashSet};

use serde_json::json;

use crate::ipc::error::ok;
use crate::ipc::helpers::{
    read_err, required_class, required_date, required_str, required_subject, required_year_month,
    store, write_err, HandlerErr,
};
use crate::ipc::types::{AppState, Request};
use crate::metrics::{attendance_summary, instructional_days_in_month, DateRange};
use crate::model::{AttendanceEntry, AttendanceStatus};
use crate::store::SLOT_ATTENDANCE;

fn required_status(params: &serde_json::Value) -> Result<AttendanceStatus, HandlerErr> {
    let code = required_str(params, "status")?;
    AttendanceStatus::parse(&code)
        .ok_or_else(|| HandlerErr::bad_params("status must be one of: P, F, J"))
}

/// Month view model: every roster student with their marked days and the
/// derived summary. The denominator shown is the month's instructional-day
/// count regardless of how many days were marked.
fn attendance_month_open(
    state: &AppState,
    params: &serde_json::Value,
) -> Result<serde_json::Value, HandlerErr> {
    let store = store(state)?;
    let class = required_class(params)?;
    let subject = required_subject(params)?;
    let (year, month) = required_year_month(params)?;

    let entries: Vec<AttendanceEntry> = store
        .read_slot(SLOT_ATTENDANCE, Vec::new)
        .map_err(read_err)?;
    let prefix = format!("{:04}-{:02}-", year, month);
    let range = DateRange::Month { year, month };

    let mut by_student: HashMap<&str, Vec<&AttendanceEntry>> = HashMap::new();
    for e in &entries {
        if e.class_id == class.id && e.subject_id == subject.id && e.date.starts_with(&prefix) {
            by_student.entry(e.student_id.as_str()).or_default().push(e);
        }
    }

    let rows: Vec<serde_json::Value> = class
        .students
        .iter()
        .map(|s| {
            let mut days: HashMap<String, &'static str> = HashMap::new();
            if let Some(marked) = by_student.get(s.id.as_str()) {
                for e in marked {
                    days.insert(e.date.clone(), e.status.code());
                }
            }
            let summary = attendance_summary(&entries, &s.id, &class.id, &subject.id, range);
            json!({
                "studentId": s.id,
                "name": s.name,
                "callNumber": s.call_number,
                "status": s.status,
                "days": days,
                "summary": summary,
            })
        })
        .collect();

    Ok(json!({
        "classId": class.id,
        "subjectId": subject.id,
        "year": year,
        "month": month,
        "instructionalDays": instructional_days_in_month(year, month),
        "rows": rows,
    }))
}

/// Upsert on the (student, date, class, subject) natural key: the first mark
/// inserts, a re-mark replaces the status in place. The collection never
/// holds two entries for the same key.
fn attendance_mark(
    state: &AppState,
    params: &serde_json::Value,
) -> Result<serde_json::Value, HandlerErr> {
    let store = store(state)?;
    let class = required_class(params)?;
    let subject = required_subject(params)?;
    let student_id = required_str(params, "studentId")?;
    let date = required_date(params, "date")?;
    let status = required_status(params)?;

    if !class.students.iter().any(|s| s.id == student_id) {
        return Err(HandlerErr::not_found("student not found in class"));
    }

    let mut updated = false;
    store
        .update_slot(SLOT_ATTENDANCE, Vec::new, |mut entries: Vec<AttendanceEntry>| {
            if let Some(e) = entries
                .iter_mut()
                .find(|e| e.matches_key(&student_id, &date, &class.id, &subject.id))
            {
                e.status = status;
                updated = true;
            } else {
                entries.push(AttendanceEntry {
                    student_id: student_id.clone(),
                    date: date.clone(),
                    class_id: class.id.clone(),
                    subject_id: subject.id.clone(),
                    status,
                });
            }
            entries
        })
        .map_err(write_err)?;
    Ok(json!({ "updated": updated }))
}

/// Clearing removes the entry for the key; clearing an unmarked day is a
/// no-op, reported as such.
fn attendance_clear(
    state: &AppState,
    params: &serde_json::Value,
) -> Result<serde_json::Value, HandlerErr> {
    let store = store(state)?;
    let class = required_class(params)?;
    let subject = required_subject(params)?;
    let student_id = required_str(params, "studentId")?;
    let date = required_date(params, "date")?;

    let mut removed = false;
    store
        .update_slot(SLOT_ATTENDANCE, Vec::new, |mut entries: Vec<AttendanceEntry>| {
            let before = entries.len();
            entries.retain(|e| !e.matches_key(&student_id, &date, &class.id, &subject.id));
            removed = entries.len() != before;
            entries
        })
        .map_err(write_err)?;
    Ok(json!({ "removed": removed }))
}

/// Stamp one status for many students on one day. Ids not on the class
/// roster are skipped, matching single-mark validation without failing the
/// whole batch.
fn attendance_bulk_mark(
    state: &AppState,
    params: &serde_json::Value,
) -> Result<serde_json::Value, HandlerErr> {
    let store = store(state)?;
    let class = required_class(params)?;
    let subject = required_subject(params)?;
    let date = required_date(params, "date")?;
    let status = required_status(params)?;
    let Some(ids) = params.get("studentIds").and_then(|v| v.as_array()) else {
        return Err(HandlerErr::bad_params("missing studentIds"));
    };
    // Dedupe so repeated ids collapse to one upsert and one count.
    let mut seen = HashSet::new();
    let student_ids: Vec<String> = ids
        .iter()
        .filter_map(|v| v.as_str().map(|s| s.to_string()))
        .filter(|id| class.students.iter().any(|s| &s.id == id))
        .filter(|id| seen.insert(id.clone()))
        .collect();

    let marked = student_ids.len();
    store
        .update_slot(SLOT_ATTENDANCE, Vec::new, |mut entries: Vec<AttendanceEntry>| {
            for student_id in &student_ids {
                if let Some(e) = entries
                    .iter_mut()
                    .find(|e| e.matches_key(student_id, &date, &class.id, &subject.id))
                {
                    e.status = status;
                } else {
                    entries.push(AttendanceEntry {
                        student_id: student_id.clone(),
                        date: date.clone(),
                        class_id: class.id.clone(),
                        subject_id: subject.id.clone(),
                        status,
                    });
                }
            }
            entries
        })
        .map_err(write_err)?;
    Ok(json!({ "marked": marked }))
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    let result = match req.method.as_str() {
        "attendance.monthOpen" => attendance_month_open(state, &req.params),
        "attendance.mark" => attendance_mark(state, &req.params),
        "attendance.clear" => attendance_clear(state, &req.params),
        "attendance.bulkMark" => attendance_bulk_mark(state, &req.params),
        _ => return None,
    };
    Some(match result {
        Ok(r) => ok(&req.id, r),
        Err(e) => e.response(&req.id),
    })
}
