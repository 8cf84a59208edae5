use serde_json::json;
use uuid::Uuid;

use crate::ipc::error::ok;
use crate::ipc::helpers::{
    read_err, required_class, required_str, store, write_err, HandlerErr,
};
use crate::ipc::types::{AppState, Request};
use crate::model::{ScheduleItem, ScheduleItemDraft};
use crate::store::SLOT_SCHEDULE;

/// Week view for one class: items grouped by weekday 1..=6, each day sorted
/// by start time.
fn schedule_week_open(
    state: &AppState,
    params: &serde_json::Value,
) -> Result<serde_json::Value, HandlerErr> {
    let store = store(state)?;
    let class = required_class(params)?;

    let mut items: Vec<ScheduleItem> = store
        .read_slot(SLOT_SCHEDULE, Vec::new)
        .map_err(read_err)?;
    items.retain(|i| i.class_id == class.id);
    items.sort_by(|a, b| (a.weekday, &a.start_time).cmp(&(b.weekday, &b.start_time)));

    let days: Vec<serde_json::Value> = (1u8..=6)
        .map(|weekday| {
            let day_items: Vec<&ScheduleItem> =
                items.iter().filter(|i| i.weekday == weekday).collect();
            json!({ "weekday": weekday, "items": day_items })
        })
        .collect();
    Ok(json!({ "classId": class.id, "days": days }))
}

fn schedule_create(
    state: &AppState,
    params: &serde_json::Value,
) -> Result<serde_json::Value, HandlerErr> {
    let store = store(state)?;
    let draft: ScheduleItemDraft = serde_json::from_value(params.clone())
        .map_err(|e| HandlerErr::bad_params(format!("invalid schedule item: {}", e)))?;
    if crate::catalog::class_by_id(&draft.class_id).is_none() {
        return Err(HandlerErr::not_found("class not found"));
    }
    if crate::catalog::subject_by_id(&draft.subject_id).is_none() {
        return Err(HandlerErr::not_found("subject not found"));
    }

    let item = draft
        .into_item(Uuid::new_v4().to_string())
        .map_err(HandlerErr::validation)?;
    let id = item.id.clone();
    store
        .update_slot(SLOT_SCHEDULE, Vec::new, |mut items: Vec<ScheduleItem>| {
            items.push(item);
            items
        })
        .map_err(write_err)?;
    Ok(json!({ "itemId": id }))
}

fn schedule_update(
    state: &AppState,
    params: &serde_json::Value,
) -> Result<serde_json::Value, HandlerErr> {
    let store = store(state)?;
    let item_id = required_str(params, "itemId")?;

    let items: Vec<ScheduleItem> = store
        .read_slot(SLOT_SCHEDULE, Vec::new)
        .map_err(read_err)?;
    let Some(existing) = items.iter().find(|i| i.id == item_id) else {
        return Err(HandlerErr::not_found("schedule item not found"));
    };

    // Re-validate the merged shape through the draft so an update cannot
    // produce an item a create would reject.
    let draft = ScheduleItemDraft {
        class_id: existing.class_id.clone(),
        subject_id: params
            .get("subjectId")
            .and_then(|v| v.as_str())
            .unwrap_or(&existing.subject_id)
            .to_string(),
        weekday: params
            .get("weekday")
            .and_then(|v| v.as_u64())
            .map(|w| w as u8)
            .unwrap_or(existing.weekday),
        start_time: params
            .get("startTime")
            .and_then(|v| v.as_str())
            .unwrap_or(&existing.start_time)
            .to_string(),
        end_time: params
            .get("endTime")
            .and_then(|v| v.as_str())
            .unwrap_or(&existing.end_time)
            .to_string(),
    };
    if crate::catalog::subject_by_id(&draft.subject_id).is_none() {
        return Err(HandlerErr::not_found("subject not found"));
    }
    let replacement = draft
        .into_item(item_id.clone())
        .map_err(HandlerErr::validation)?;

    store
        .update_slot(SLOT_SCHEDULE, Vec::new, |mut items: Vec<ScheduleItem>| {
            if let Some(i) = items.iter_mut().find(|i| i.id == item_id) {
                *i = replacement.clone();
            }
            items
        })
        .map_err(write_err)?;
    Ok(json!({ "ok": true }))
}

fn schedule_delete(
    state: &AppState,
    params: &serde_json::Value,
) -> Result<serde_json::Value, HandlerErr> {
    let store = store(state)?;
    let item_id = required_str(params, "itemId")?;
    let mut removed = false;
    store
        .update_slot(SLOT_SCHEDULE, Vec::new, |mut items: Vec<ScheduleItem>| {
            let before = items.len();
            items.retain(|i| i.id != item_id);
            removed = items.len() != before;
            items
        })
        .map_err(write_err)?;
    if !removed {
        return Err(HandlerErr::not_found("schedule item not found"));
    }
    Ok(json!({ "ok": true }))
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    let result = match req.method.as_str() {
        "schedule.weekOpen" => schedule_week_open(state, &req.params),
        "schedule.create" => schedule_create(state, &req.params),
        "schedule.update" => schedule_update(state, &req.params),
        "schedule.delete" => schedule_delete(state, &req.params),
        _ => return None,
    };
    Some(match result {
        Ok(r) => ok(&req.id, r),
        Err(e) => e.response(&req.id),
    })
}
