use chrono::{Datelike, Local};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::catalog;
use crate::ipc::error::ok;
use crate::ipc::helpers::{read_err, store, write_err, HandlerErr};
use crate::ipc::types::{AppState, Request};
use crate::store::{
    Store, SLOT_SELECTED_BIMESTER, SLOT_SELECTED_CLASS, SLOT_SELECTED_MONTH, SLOT_SELECTED_SUBJECT,
};

/// The cross-cutting filters every record view is scoped by. Each filter
/// lives in its own slot; setting one never touches the others.

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectedMonth {
    pub year: i32,
    pub month: u32,
}

fn default_class_id() -> String {
    catalog::classes()
        .first()
        .map(|c| c.id.clone())
        .unwrap_or_default()
}

fn default_subject_id() -> String {
    catalog::subjects()
        .first()
        .map(|s| s.id.clone())
        .unwrap_or_default()
}

/// Current-date heuristic: each quarter of the calendar year maps to one
/// bimester of the school year.
fn default_bimester() -> u8 {
    let month = Local::now().date_naive().month();
    match month {
        1..=3 => 1,
        4..=6 => 2,
        7..=9 => 3,
        _ => 4,
    }
}

fn default_month() -> SelectedMonth {
    let today = Local::now().date_naive();
    SelectedMonth {
        year: today.year(),
        month: today.month(),
    }
}

pub fn selected_class_id(store: &Store) -> anyhow::Result<String> {
    store.read_slot(SLOT_SELECTED_CLASS, default_class_id)
}

pub fn selected_subject_id(store: &Store) -> anyhow::Result<String> {
    store.read_slot(SLOT_SELECTED_SUBJECT, default_subject_id)
}

pub fn selected_bimester(store: &Store) -> anyhow::Result<u8> {
    store.read_slot(SLOT_SELECTED_BIMESTER, default_bimester)
}

pub fn selected_month(store: &Store) -> anyhow::Result<SelectedMonth> {
    store.read_slot(SLOT_SELECTED_MONTH, default_month)
}

fn selection_get(state: &AppState) -> Result<serde_json::Value, HandlerErr> {
    let store = store(state)?;
    let class_id = selected_class_id(store).map_err(read_err)?;
    let subject_id = selected_subject_id(store).map_err(read_err)?;
    let bimester = selected_bimester(store).map_err(read_err)?;
    let month = selected_month(store).map_err(read_err)?;
    Ok(json!({
        "classId": class_id,
        "subjectId": subject_id,
        "bimester": bimester,
        "month": month,
    }))
}

fn selection_set(state: &AppState, params: &serde_json::Value) -> Result<serde_json::Value, HandlerErr> {
    let store = store(state)?;

    // Validate everything the request supplies before touching any slot, so
    // a rejected request leaves the whole selection unchanged.
    let class_id = match params.get("classId") {
        Some(v) => {
            let id = v
                .as_str()
                .ok_or_else(|| HandlerErr::bad_params("classId must be a string"))?;
            if catalog::class_by_id(id).is_none() {
                return Err(HandlerErr::not_found("class not found"));
            }
            Some(id.to_string())
        }
        None => None,
    };

    let subject_id = match params.get("subjectId") {
        Some(v) => {
            let id = v
                .as_str()
                .ok_or_else(|| HandlerErr::bad_params("subjectId must be a string"))?;
            if catalog::subject_by_id(id).is_none() {
                return Err(HandlerErr::not_found("subject not found"));
            }
            Some(id.to_string())
        }
        None => None,
    };

    let bimester = match params.get("bimester") {
        Some(v) => {
            let b = v
                .as_u64()
                .filter(|b| (1..=4).contains(b))
                .ok_or_else(|| HandlerErr::bad_params("bimester must be between 1 and 4"))?;
            Some(b as u8)
        }
        None => None,
    };

    let month = match params.get("month") {
        Some(v) => {
            let m: SelectedMonth = serde_json::from_value(v.clone())
                .map_err(|_| HandlerErr::bad_params("month must be {year, month}"))?;
            if !(1..=12).contains(&m.month) {
                return Err(HandlerErr::bad_params("month.month must be between 1 and 12"));
            }
            Some(m)
        }
        None => None,
    };

    if let Some(class_id) = &class_id {
        store
            .write_slot(SLOT_SELECTED_CLASS, class_id)
            .map_err(write_err)?;
    }
    if let Some(subject_id) = &subject_id {
        store
            .write_slot(SLOT_SELECTED_SUBJECT, subject_id)
            .map_err(write_err)?;
    }
    if let Some(b) = bimester {
        store
            .write_slot(SLOT_SELECTED_BIMESTER, &b)
            .map_err(write_err)?;
    }
    if let Some(m) = month {
        store.write_slot(SLOT_SELECTED_MONTH, &m).map_err(write_err)?;
    }

    selection_get(state)
}

fn handle_selection_get(state: &mut AppState, req: &Request) -> serde_json::Value {
    match selection_get(state) {
        Ok(result) => ok(&req.id, result),
        Err(e) => e.response(&req.id),
    }
}

fn handle_selection_set(state: &mut AppState, req: &Request) -> serde_json::Value {
    match selection_set(state, &req.params) {
        Ok(result) => ok(&req.id, result),
        Err(e) => e.response(&req.id),
    }
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    match req.method.as_str() {
        "selection.get" => Some(handle_selection_get(state, req)),
        "selection.set" => Some(handle_selection_set(state, req)),
        _ => None,
    }
}
