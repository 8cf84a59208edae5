use serde_json::json;

use crate::catalog;
use crate::ipc::error::ok;
use crate::ipc::helpers::{
    read_err, required_bimester, required_class, required_subject, required_year_month, store,
    HandlerErr,
};
use crate::ipc::types::{AppState, Request};
use crate::metrics::{self, DateRange};
use crate::model::{AttendanceEntry, Grade, SchoolClass, Subject};
use crate::store::{SLOT_ATTENDANCE, SLOT_GRADES};

/// Read-only view models for the external document renderer: plain rows and
/// aggregates, no markup. The renderer owns layout and print mechanics.

fn header(class: &SchoolClass, subject: &Subject, period: String) -> serde_json::Value {
    json!({
        "school": catalog::school(),
        "teacher": catalog::teacher(),
        "class": { "id": class.id, "name": class.name, "gradeLevel": class.grade_level },
        "subject": { "id": subject.id, "name": subject.name, "weeklyHours": subject.weekly_hours },
        "period": period,
    })
}

/// Monthly view: attendance over the calendar month plus the standing in the
/// requested bimester, one row per active student.
fn report_monthly(
    state: &AppState,
    params: &serde_json::Value,
) -> Result<serde_json::Value, HandlerErr> {
    let store = store(state)?;
    let class = required_class(params)?;
    let subject = required_subject(params)?;
    let (year, month) = required_year_month(params)?;
    let bimester = required_bimester(params)?;

    let entries: Vec<AttendanceEntry> = store
        .read_slot(SLOT_ATTENDANCE, Vec::new)
        .map_err(read_err)?;
    let grades: Vec<Grade> = store.read_slot(SLOT_GRADES, Vec::new).map_err(read_err)?;
    let range = DateRange::Month { year, month };

    let rows: Vec<serde_json::Value> = class
        .active_students()
        .map(|s| {
            let attendance =
                metrics::attendance_summary(&entries, &s.id, &class.id, &subject.id, range);
            let average = metrics::grade_average(&grades, &s.id, &class.id, &subject.id, bimester);
            json!({
                "callNumber": s.call_number,
                "studentId": s.id,
                "name": s.name,
                "presences": attendance.presences,
                "absences": attendance.absences,
                "attendancePercent": attendance.attendance_percent,
                "average": average,
                "classification": metrics::classify(average),
            })
        })
        .collect();

    Ok(json!({
        "header": header(&class, &subject, format!("{:02}/{}", month, year)),
        "instructionalDays": metrics::instructional_days_in_month(year, month),
        "rows": rows,
    }))
}

/// Bimester view: standings and distribution for the grading period, with
/// all-time attendance next to each row.
fn report_bimester(
    state: &AppState,
    params: &serde_json::Value,
) -> Result<serde_json::Value, HandlerErr> {
    let store = store(state)?;
    let class = required_class(params)?;
    let subject = required_subject(params)?;
    let bimester = required_bimester(params)?;

    let entries: Vec<AttendanceEntry> = store
        .read_slot(SLOT_ATTENDANCE, Vec::new)
        .map_err(read_err)?;
    let grades: Vec<Grade> = store.read_slot(SLOT_GRADES, Vec::new).map_err(read_err)?;
    let summary = metrics::class_grade_summary(&class, &grades, &subject.id, bimester);

    let rows: Vec<serde_json::Value> = summary
        .per_student
        .iter()
        .map(|standing| {
            let attendance = metrics::attendance_summary(
                &entries,
                &standing.student_id,
                &class.id,
                &subject.id,
                DateRange::AllRecorded,
            );
            json!({
                "callNumber": standing.call_number,
                "studentId": standing.student_id,
                "name": standing.name,
                "average": standing.average,
                "classification": standing.classification,
                "gradeCount": standing.grade_count,
                "presences": attendance.presences,
                "absences": attendance.absences,
                "attendancePercent": attendance.attendance_percent,
            })
        })
        .collect();

    let active_students = summary.distribution.total();
    Ok(json!({
        "header": header(&class, &subject, format!("{}º bimestre", bimester)),
        "rows": rows,
        "distribution": summary.distribution,
        "classAverage": summary.class_average,
        "activeStudentCount": active_students,
    }))
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    let result = match req.method.as_str() {
        "reports.monthly" => report_monthly(state, &req.params),
        "reports.bimester" => report_bimester(state, &req.params),
        _ => return None,
    };
    Some(match result {
        Ok(r) => ok(&req.id, r),
        Err(e) => e.response(&req.id),
    })
}
