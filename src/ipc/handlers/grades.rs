use serde_json::json;
use uuid::Uuid;

use crate::ipc::error::ok;
use crate::ipc::helpers::{
    read_err, required_bimester, required_class, required_str, required_subject, store, write_err,
    HandlerErr,
};
use crate::ipc::types::{AppState, Request};
use crate::metrics;
use crate::model::{Grade, GradeDraft};
use crate::store::SLOT_GRADES;

fn grades_list(state: &AppState, params: &serde_json::Value) -> Result<serde_json::Value, HandlerErr> {
    let store = store(state)?;
    let class = required_class(params)?;
    let subject = required_subject(params)?;
    let bimester = required_bimester(params)?;

    let mut grades: Vec<Grade> = store.read_slot(SLOT_GRADES, Vec::new).map_err(read_err)?;
    grades.retain(|g| {
        g.class_id == class.id && g.subject_id == subject.id && g.bimester == bimester
    });
    Ok(json!({ "grades": grades }))
}

fn grades_create(state: &AppState, params: &serde_json::Value) -> Result<serde_json::Value, HandlerErr> {
    let store = store(state)?;
    let draft: GradeDraft = serde_json::from_value(params.clone())
        .map_err(|e| HandlerErr::bad_params(format!("invalid grade: {}", e)))?;

    let Some(class) = crate::catalog::class_by_id(&draft.class_id) else {
        return Err(HandlerErr::not_found("class not found"));
    };
    if crate::catalog::subject_by_id(&draft.subject_id).is_none() {
        return Err(HandlerErr::not_found("subject not found"));
    }
    if !class.students.iter().any(|s| s.id == draft.student_id) {
        return Err(HandlerErr::not_found("student not found in class"));
    }

    let grade = draft
        .into_grade(Uuid::new_v4().to_string())
        .map_err(HandlerErr::validation)?;
    let id = grade.id.clone();
    store
        .update_slot(SLOT_GRADES, Vec::new, |mut grades: Vec<Grade>| {
            grades.push(grade);
            grades
        })
        .map_err(write_err)?;
    Ok(json!({ "gradeId": id }))
}

fn grades_delete(state: &AppState, params: &serde_json::Value) -> Result<serde_json::Value, HandlerErr> {
    let store = store(state)?;
    let grade_id = required_str(params, "gradeId")?;
    let mut removed = false;
    store
        .update_slot(SLOT_GRADES, Vec::new, |mut grades: Vec<Grade>| {
            let before = grades.len();
            grades.retain(|g| g.id != grade_id);
            removed = grades.len() != before;
            grades
        })
        .map_err(write_err)?;
    if !removed {
        return Err(HandlerErr::not_found("grade not found"));
    }
    Ok(json!({ "ok": true }))
}

/// Per-student standings plus distribution buckets and class mean, all
/// derived fresh from the stored grades on every call.
fn grades_summary(state: &AppState, params: &serde_json::Value) -> Result<serde_json::Value, HandlerErr> {
    let store = store(state)?;
    let class = required_class(params)?;
    let subject = required_subject(params)?;
    let bimester = required_bimester(params)?;

    let grades: Vec<Grade> = store.read_slot(SLOT_GRADES, Vec::new).map_err(read_err)?;
    let summary = metrics::class_grade_summary(&class, &grades, &subject.id, bimester);
    Ok(json!({
        "classId": class.id,
        "subjectId": subject.id,
        "bimester": bimester,
        "perStudent": summary.per_student,
        "distribution": summary.distribution,
        "classAverage": summary.class_average,
    }))
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    let result = match req.method.as_str() {
        "grades.list" => grades_list(state, &req.params),
        "grades.create" => grades_create(state, &req.params),
        "grades.delete" => grades_delete(state, &req.params),
        "grades.summary" => grades_summary(state, &req.params),
        _ => return None,
    };
    Some(match result {
        Ok(r) => ok(&req.id, r),
        Err(e) => e.response(&req.id),
    })
}
