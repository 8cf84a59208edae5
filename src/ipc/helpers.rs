use chrono::NaiveDate;
use serde_json::json;

use crate::ipc::error::err;
use crate::ipc::types::AppState;
use crate::store::Store;

/// Handler-internal error carried through `Result` until the IPC boundary.
pub struct HandlerErr {
    pub code: &'static str,
    pub message: String,
    pub details: Option<serde_json::Value>,
}

impl HandlerErr {
    pub fn new(code: &'static str, message: impl Into<String>) -> HandlerErr {
        HandlerErr {
            code,
            message: message.into(),
            details: None,
        }
    }

    pub fn bad_params(message: impl Into<String>) -> HandlerErr {
        HandlerErr::new("bad_params", message)
    }

    pub fn validation(message: impl Into<String>) -> HandlerErr {
        HandlerErr::new("validation_failed", message)
    }

    pub fn not_found(message: impl Into<String>) -> HandlerErr {
        HandlerErr::new("not_found", message)
    }

    pub fn response(self, id: &str) -> serde_json::Value {
        err(id, self.code, self.message, self.details)
    }
}

pub fn store(state: &AppState) -> Result<&Store, HandlerErr> {
    state
        .store
        .as_ref()
        .ok_or_else(|| HandlerErr::new("no_workspace", "select a workspace first"))
}

pub fn read_err(e: anyhow::Error) -> HandlerErr {
    HandlerErr::new("store_read_failed", e.to_string())
}

pub fn write_err(e: anyhow::Error) -> HandlerErr {
    HandlerErr::new("store_write_failed", e.to_string())
}

pub fn required_str(params: &serde_json::Value, key: &str) -> Result<String, HandlerErr> {
    params
        .get(key)
        .and_then(|v| v.as_str())
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .ok_or_else(|| HandlerErr::bad_params(format!("missing {}", key)))
}

pub fn optional_str(params: &serde_json::Value, key: &str) -> Option<String> {
    params
        .get(key)
        .and_then(|v| v.as_str())
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

/// For updates: an omitted field means "leave alone", but a field that is
/// present and blank is rejected rather than silently ignored.
pub fn optional_update_str(
    params: &serde_json::Value,
    key: &str,
) -> Result<Option<String>, HandlerErr> {
    let Some(v) = params.get(key) else {
        return Ok(None);
    };
    let s = v
        .as_str()
        .ok_or_else(|| HandlerErr::bad_params(format!("{} must be a string", key)))?;
    let s = s.trim();
    if s.is_empty() {
        return Err(HandlerErr::bad_params(format!("{} must not be empty", key)));
    }
    Ok(Some(s.to_string()))
}

/// ISO `YYYY-MM-DD`, validated and echoed back in normalized form.
pub fn required_date(params: &serde_json::Value, key: &str) -> Result<String, HandlerErr> {
    let raw = required_str(params, key)?;
    let date = NaiveDate::parse_from_str(&raw, "%Y-%m-%d")
        .map_err(|_| HandlerErr::bad_params(format!("{} must be YYYY-MM-DD", key)))?;
    Ok(date.format("%Y-%m-%d").to_string())
}

pub fn required_bimester(params: &serde_json::Value) -> Result<u8, HandlerErr> {
    let b = params
        .get("bimester")
        .and_then(|v| v.as_u64())
        .ok_or_else(|| HandlerErr::bad_params("missing bimester"))?;
    if !(1..=4).contains(&b) {
        return Err(HandlerErr::bad_params("bimester must be between 1 and 4"));
    }
    Ok(b as u8)
}

pub fn required_year_month(params: &serde_json::Value) -> Result<(i32, u32), HandlerErr> {
    let year = params
        .get("year")
        .and_then(|v| v.as_i64())
        .ok_or_else(|| HandlerErr::bad_params("missing year"))?;
    let month = params
        .get("month")
        .and_then(|v| v.as_u64())
        .ok_or_else(|| HandlerErr::bad_params("missing month"))?;
    if !(1..=12).contains(&month) {
        return Err(HandlerErr::bad_params("month must be between 1 and 12"));
    }
    Ok((year as i32, month as u32))
}

/// Resolve a class from the static catalog, surfacing `not_found` with the
/// offending id.
pub fn required_class(params: &serde_json::Value) -> Result<crate::model::SchoolClass, HandlerErr> {
    let class_id = required_str(params, "classId")?;
    crate::catalog::class_by_id(&class_id).ok_or_else(|| HandlerErr {
        code: "not_found",
        message: "class not found".to_string(),
        details: Some(json!({ "classId": class_id })),
    })
}

pub fn required_subject(params: &serde_json::Value) -> Result<crate::model::Subject, HandlerErr> {
    let subject_id = required_str(params, "subjectId")?;
    crate::catalog::subject_by_id(&subject_id).ok_or_else(|| HandlerErr {
        code: "not_found",
        message: "subject not found".to_string(),
        details: Some(json!({ "subjectId": subject_id })),
    })
}
