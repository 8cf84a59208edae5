use serde_json::json;
use uuid::Uuid;

use crate::ipc::error::ok;
use crate::ipc::helpers::{
    optional_str, optional_update_str, read_err, required_date, required_str, store, write_err,
    HandlerErr,
};
use crate::ipc::types::{AppState, Request};
use crate::model::Lesson;
use crate::store::SLOT_LESSONS;

fn lessons_list(state: &AppState, params: &serde_json::Value) -> Result<serde_json::Value, HandlerErr> {
    let store = store(state)?;
    let class_id = optional_str(params, "classId");
    let subject_id = optional_str(params, "subjectId");
    // Optional YYYY-MM prefix filter.
    let month = optional_str(params, "month");

    let mut lessons: Vec<Lesson> = store.read_slot(SLOT_LESSONS, Vec::new).map_err(read_err)?;
    lessons.retain(|l| {
        class_id.as_deref().map(|c| l.class_id == c).unwrap_or(true)
            && subject_id
                .as_deref()
                .map(|s| l.subject_id == s)
                .unwrap_or(true)
            && month
                .as_deref()
                .map(|m| l.date.starts_with(m))
                .unwrap_or(true)
    });
    lessons.sort_by(|a, b| a.date.cmp(&b.date));
    Ok(json!({ "lessons": lessons }))
}

fn lessons_create(state: &AppState, params: &serde_json::Value) -> Result<serde_json::Value, HandlerErr> {
    let store = store(state)?;
    let date = required_date(params, "date")?;
    let class_id = required_str(params, "classId")?;
    let subject_id = required_str(params, "subjectId")?;
    let content = required_str(params, "content")?;
    if crate::catalog::class_by_id(&class_id).is_none() {
        return Err(HandlerErr::not_found("class not found"));
    }
    if crate::catalog::subject_by_id(&subject_id).is_none() {
        return Err(HandlerErr::not_found("subject not found"));
    }

    let lesson = Lesson {
        id: Uuid::new_v4().to_string(),
        date,
        class_id,
        subject_id,
        content,
        notes: optional_str(params, "notes"),
    };
    let id = lesson.id.clone();
    store
        .update_slot(SLOT_LESSONS, Vec::new, |mut lessons: Vec<Lesson>| {
            lessons.push(lesson);
            lessons
        })
        .map_err(write_err)?;
    Ok(json!({ "lessonId": id }))
}

fn lessons_update(state: &AppState, params: &serde_json::Value) -> Result<serde_json::Value, HandlerErr> {
    let store = store(state)?;
    let lesson_id = required_str(params, "lessonId")?;
    let date = match params.get("date") {
        Some(_) => Some(required_date(params, "date")?),
        None => None,
    };
    let content = optional_update_str(params, "content")?;
    // Notes stay free-form: null (or blank) clears them.
    let notes_present = params.get("notes").is_some();
    let notes = optional_str(params, "notes");

    let mut found = false;
    store
        .update_slot(SLOT_LESSONS, Vec::new, |mut lessons: Vec<Lesson>| {
            if let Some(l) = lessons.iter_mut().find(|l| l.id == lesson_id) {
                found = true;
                if let Some(d) = &date {
                    l.date = d.clone();
                }
                if let Some(c) = &content {
                    l.content = c.clone();
                }
                if notes_present {
                    l.notes = notes.clone();
                }
            }
            lessons
        })
        .map_err(write_err)?;
    if !found {
        return Err(HandlerErr::not_found("lesson not found"));
    }
    Ok(json!({ "ok": true }))
}

fn lessons_delete(state: &AppState, params: &serde_json::Value) -> Result<serde_json::Value, HandlerErr> {
    let store = store(state)?;
    let lesson_id = required_str(params, "lessonId")?;
    let mut removed = false;
    store
        .update_slot(SLOT_LESSONS, Vec::new, |mut lessons: Vec<Lesson>| {
            let before = lessons.len();
            lessons.retain(|l| l.id != lesson_id);
            removed = lessons.len() != before;
            lessons
        })
        .map_err(write_err)?;
    if !removed {
        return Err(HandlerErr::not_found("lesson not found"));
    }
    Ok(json!({ "ok": true }))
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    let result = match req.method.as_str() {
        "lessons.list" => lessons_list(state, &req.params),
        "lessons.create" => lessons_create(state, &req.params),
        "lessons.update" => lessons_update(state, &req.params),
        "lessons.delete" => lessons_delete(state, &req.params),
        _ => return None,
    };
    Some(match result {
        Ok(r) => ok(&req.id, r),
        Err(e) => e.response(&req.id),
    })
}
