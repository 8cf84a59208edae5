//! The calendar slot defaults to the seeded school year; user edits layer on
//! top and persist like any other collection.

use serde_json::json;
use uuid::Uuid;

use crate::catalog;
use crate::ipc::error::ok;
use crate::ipc::helpers::{
    optional_str, optional_update_str, read_err, required_date, required_str, required_year_month,
    store, write_err, HandlerErr,
};
use crate::ipc::types::{AppState, Request};
use crate::model::{CalendarEvent, EventCategory};
use crate::store::SLOT_CALENDAR;

fn required_category(params: &serde_json::Value) -> Result<EventCategory, HandlerErr> {
    let raw = required_str(params, "category")?;
    serde_json::from_value(json!(raw))
        .map_err(|_| HandlerErr::bad_params("category must be one of: FERIADO, RECESSO, AULA, PROVA, EVENTO, OUTRO"))
}

fn calendar_month_open(
    state: &AppState,
    params: &serde_json::Value,
) -> Result<serde_json::Value, HandlerErr> {
    let store = store(state)?;
    let (year, month) = required_year_month(params)?;
    let prefix = format!("{:04}-{:02}-", year, month);

    let mut events: Vec<CalendarEvent> = store
        .read_slot(SLOT_CALENDAR, catalog::calendar_2026)
        .map_err(read_err)?;
    events.retain(|e| e.date.starts_with(&prefix));
    events.sort_by(|a, b| a.date.cmp(&b.date));
    Ok(json!({ "year": year, "month": month, "events": events }))
}

fn calendar_events_on(
    state: &AppState,
    params: &serde_json::Value,
) -> Result<serde_json::Value, HandlerErr> {
    let store = store(state)?;
    let date = required_date(params, "date")?;
    let mut events: Vec<CalendarEvent> = store
        .read_slot(SLOT_CALENDAR, catalog::calendar_2026)
        .map_err(read_err)?;
    events.retain(|e| e.date == date);
    Ok(json!({ "date": date, "events": events }))
}

fn calendar_create(
    state: &AppState,
    params: &serde_json::Value,
) -> Result<serde_json::Value, HandlerErr> {
    let store = store(state)?;
    let event = CalendarEvent {
        id: Uuid::new_v4().to_string(),
        date: required_date(params, "date")?,
        title: required_str(params, "title")?,
        category: required_category(params)?,
        description: optional_str(params, "description"),
    };
    let id = event.id.clone();
    store
        .update_slot(SLOT_CALENDAR, catalog::calendar_2026, |mut events: Vec<CalendarEvent>| {
            events.push(event);
            events
        })
        .map_err(write_err)?;
    Ok(json!({ "eventId": id }))
}

fn calendar_update(
    state: &AppState,
    params: &serde_json::Value,
) -> Result<serde_json::Value, HandlerErr> {
    let store = store(state)?;
    let event_id = required_str(params, "eventId")?;
    let date = match params.get("date") {
        Some(_) => Some(required_date(params, "date")?),
        None => None,
    };
    let title = optional_update_str(params, "title")?;
    let category = match params.get("category") {
        Some(_) => Some(required_category(params)?),
        None => None,
    };
    let description_present = params.get("description").is_some();
    let description = optional_str(params, "description");

    let mut found = false;
    store
        .update_slot(SLOT_CALENDAR, catalog::calendar_2026, |mut events: Vec<CalendarEvent>| {
            if let Some(e) = events.iter_mut().find(|e| e.id == event_id) {
                found = true;
                if let Some(d) = &date {
                    e.date = d.clone();
                }
                if let Some(t) = &title {
                    e.title = t.clone();
                }
                if let Some(c) = category {
                    e.category = c;
                }
                if description_present {
                    e.description = description.clone();
                }
            }
            events
        })
        .map_err(write_err)?;
    if !found {
        return Err(HandlerErr::not_found("event not found"));
    }
    Ok(json!({ "ok": true }))
}

fn calendar_delete(
    state: &AppState,
    params: &serde_json::Value,
) -> Result<serde_json::Value, HandlerErr> {
    let store = store(state)?;
    let event_id = required_str(params, "eventId")?;
    let mut removed = false;
    store
        .update_slot(SLOT_CALENDAR, catalog::calendar_2026, |mut events: Vec<CalendarEvent>| {
            let before = events.len();
            events.retain(|e| e.id != event_id);
            removed = events.len() != before;
            events
        })
        .map_err(write_err)?;
    if !removed {
        return Err(HandlerErr::not_found("event not found"));
    }
    Ok(json!({ "ok": true }))
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    let result = match req.method.as_str() {
        "calendar.monthOpen" => calendar_month_open(state, &req.params),
        "calendar.eventsOn" => calendar_events_on(state, &req.params),
        "calendar.create" => calendar_create(state, &req.params),
        "calendar.update" => calendar_update(state, &req.params),
        "calendar.delete" => calendar_delete(state, &req.params),
        _ => return None,
    };
    Some(match result {
        Ok(r) => ok(&req.id, r),
        Err(e) => e.response(&req.id),
    })
}
