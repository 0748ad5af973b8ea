//! Input document parsing and the pre-expansion validation gate.
//!
//! Validation walks jobs in order and stops at the first violation, so the
//! error always points at the earliest faulty job (and stop) in the document.

use crate::domain::model::{RouteJob, StopJob};
use crate::utils::date::is_valid_date;
use crate::utils::error::{EtlError, JobLocation, Result};
use serde_json::{Map, Value};

const REQUIRED_FIELDS: [&str; 3] = ["origin", "target", "depart"];
const RETURN_FIELDS: [&str; 3] = ["origin_return", "target_return", "depart_return"];

/// 解析輸入文件，頂層必須是 JSON 陣列
pub fn parse_jobs(bytes: &[u8]) -> Result<Vec<Value>> {
    let document: Value = serde_json::from_slice(bytes).map_err(|e| EtlError::InvalidInput {
        message: format!("not valid JSON: {}", e),
    })?;

    match document {
        Value::Array(items) => Ok(items),
        _ => Err(EtlError::InvalidInput {
            message: "Input JSON must be a list of route jobs".to_string(),
        }),
    }
}

/// Validate every raw job and convert it into a typed [`RouteJob`].
pub fn validate_jobs(items: &[Value]) -> Result<Vec<RouteJob>> {
    items
        .iter()
        .enumerate()
        .map(|(idx, item)| validate_job(idx, item))
        .collect()
}

fn validate_job(idx: usize, item: &Value) -> Result<RouteJob> {
    let location = JobLocation::job(idx);
    let obj = item.as_object().ok_or_else(|| EtlError::InvalidField {
        location,
        field: "job".to_string(),
        reason: format!("expected an object, got {}", item),
    })?;

    // 先確認必要欄位都存在，再檢查日期
    for field in REQUIRED_FIELDS {
        if !obj.contains_key(field) {
            return Err(EtlError::MissingField {
                location,
                field: field.to_string(),
            });
        }
    }

    let origin = string_field(obj, location, "origin")?;
    let target = string_field(obj, location, "target")?;
    let depart = required_date(obj, location, "depart")?;

    let origin_return = optional_string(obj, location, RETURN_FIELDS[0])?;
    let target_return = optional_string(obj, location, RETURN_FIELDS[1])?;
    let depart_return = match obj.get("depart_return") {
        Some(value) => Some(date_value(value, location, "depart_return")?),
        None => None,
    };

    let stops = match obj.get("stops") {
        Some(Value::Array(entries)) => Some(
            entries
                .iter()
                .enumerate()
                .map(|(sidx, entry)| validate_stop(idx, sidx, entry))
                .collect::<Result<Vec<_>>>()?,
        ),
        Some(other) => {
            return Err(EtlError::InvalidField {
                location,
                field: "stops".to_string(),
                reason: format!("'stops' must be a list, got {}", other),
            })
        }
        None => None,
    };

    Ok(RouteJob {
        origin,
        target,
        depart,
        origin_return,
        target_return,
        depart_return,
        stops,
    })
}

fn validate_stop(idx: usize, sidx: usize, entry: &Value) -> Result<StopJob> {
    let location = JobLocation::stop(idx, sidx);
    let obj = entry.as_object().ok_or_else(|| EtlError::InvalidField {
        location,
        field: "stop".to_string(),
        reason: format!("expected an object, got {}", entry),
    })?;

    for field in REQUIRED_FIELDS {
        if !obj.contains_key(field) {
            return Err(EtlError::MissingField {
                location,
                field: field.to_string(),
            });
        }
    }

    let origin = string_field(obj, location, "origin")?;
    let target = string_field(obj, location, "target")?;
    let depart = required_date(obj, location, "depart")?;

    Ok(StopJob {
        origin,
        target,
        depart,
    })
}

fn required_date(obj: &Map<String, Value>, location: JobLocation, field: &str) -> Result<String> {
    match obj.get(field) {
        Some(value) => date_value(value, location, field),
        None => Err(EtlError::MissingField {
            location,
            field: field.to_string(),
        }),
    }
}

fn date_value(value: &Value, location: JobLocation, field: &str) -> Result<String> {
    match value.as_str() {
        Some(text) if is_valid_date(text) => Ok(text.to_string()),
        _ => Err(EtlError::InvalidDate {
            location,
            field: field.to_string(),
            value: display_value(value),
        }),
    }
}

fn string_field(obj: &Map<String, Value>, location: JobLocation, field: &str) -> Result<String> {
    match obj.get(field) {
        Some(Value::String(text)) => Ok(text.clone()),
        Some(other) => Err(EtlError::InvalidField {
            location,
            field: field.to_string(),
            reason: format!("expected a string, got {}", other),
        }),
        None => Err(EtlError::MissingField {
            location,
            field: field.to_string(),
        }),
    }
}

fn optional_string(
    obj: &Map<String, Value>,
    location: JobLocation,
    field: &str,
) -> Result<Option<String>> {
    match obj.get(field) {
        Some(Value::String(text)) => Ok(Some(text.clone())),
        // null 不算「未提供」，和 depart_return: null 一樣視為錯誤
        None => Ok(None),
        Some(other) => Err(EtlError::InvalidField {
            location,
            field: field.to_string(),
            reason: format!("expected a string, got {}", other),
        }),
    }
}

fn display_value(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}
