use crate::catalog;
use crate::ipc::error::ok;
use crate::ipc::helpers::{required_class, HandlerErr};
use crate::ipc::types::{AppState, Request};
use serde_json::json;

/// Read-only views over the static registries. No workspace is required:
/// the catalogs are compiled in and never touch the store.

fn handle_school_info(req: &Request) -> serde_json::Value {
    ok(
        &req.id,
        json!({
            "school": catalog::school(),
            "teacher": catalog::teacher(),
        }),
    )
}

fn handle_classes_list(req: &Request) -> serde_json::Value {
    let classes: Vec<serde_json::Value> = catalog::classes()
        .iter()
        .map(|c| {
            json!({
                "id": c.id,
                "name": c.name,
                "gradeLevel": c.grade_level,
                "shift": c.shift,
                "studentCount": c.students.len(),
                "activeStudentCount": c.active_students().count(),
            })
        })
        .collect();
    ok(&req.id, json!({ "classes": classes }))
}

fn handle_subjects_list(req: &Request) -> serde_json::Value {
    ok(&req.id, json!({ "subjects": catalog::subjects() }))
}

fn students_list(params: &serde_json::Value) -> Result<serde_json::Value, HandlerErr> {
    let class = required_class(params)?;
    Ok(json!({
        "classId": class.id,
        "students": class.students,
    }))
}

fn handle_students_list(req: &Request) -> serde_json::Value {
    match students_list(&req.params) {
        Ok(result) => ok(&req.id, result),
        Err(e) => e.response(&req.id),
    }
}

pub fn try_handle(_state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    match req.method.as_str() {
        "school.info" => Some(handle_school_info(req)),
        "classes.list" => Some(handle_classes_list(req)),
        "subjects.list" => Some(handle_subjects_list(req)),
        "students.list" => Some(handle_students_list(req)),
        _ => None,
    }
}
