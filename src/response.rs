use serde::{Deserialize, de::DeserializeOwned};
use serde_json::Value;

use crate::error::{AppError, AppResult};

#[derive(Debug, Deserialize, Clone, Default, PartialEq, Eq)]
pub struct Meta {
    pub page: Option<i64>,
    pub per_page: Option<i64>,
    pub total: Option<i64>,
}

/// Envelope some deployments of the remote store wrap payloads in.
#[derive(Debug, Deserialize)]
pub struct ApiResponse<T> {
    #[serde(default)]
    pub message: String,
    pub data: Option<T>,
    pub meta: Option<Meta>,
}

/// Accepts a bare array, `{"<key>": [...]}` or an `ApiResponse` whose
/// `data` is the array.
pub fn decode_list<T: DeserializeOwned>(body: Value, key: &str) -> AppResult<Vec<T>> {
    let mut map = match body {
        Value::Array(_) => return from_value(body),
        Value::Object(map) => map,
        _ => return Err(AppError::InvalidResponse(format!("expected a list of {key}"))),
    };
    if let Some(list @ Value::Array(_)) = map.remove(key) {
        return from_value(list);
    }
    if !matches!(map.get("data"), Some(Value::Array(_))) {
        return Err(AppError::InvalidResponse(format!("expected a list of {key}")));
    }

    let envelope: ApiResponse<Vec<T>> = from_value(Value::Object(map))?;
    if let Some(meta) = &envelope.meta {
        tracing::debug!(page = ?meta.page, total = ?meta.total, "decoded paged list");
    }
    Ok(envelope.data.unwrap_or_default())
}

/// Accepts a bare record or an `ApiResponse` whose `data` is the record.
pub fn decode_record<T: DeserializeOwned>(body: Value) -> AppResult<T> {
    if !matches!(body.get("data"), Some(Value::Object(_))) {
        return from_value(body);
    }
    let envelope: ApiResponse<T> = from_value(body)?;
    envelope
        .data
        .ok_or_else(|| AppError::InvalidResponse(format!("empty envelope: {}", envelope.message)))
}

fn from_value<T: DeserializeOwned>(value: Value) -> AppResult<T> {
    serde_json::from_value(value).map_err(|err| AppError::InvalidResponse(err.to_string()))
}

/// Pulls a human readable message out of an error body.
pub fn error_message(body: &str) -> Option<String> {
    let value: Value = serde_json::from_str(body).ok()?;
    ["message", "error"]
        .iter()
        .filter_map(|key| value.get(key)?.as_str())
        .map(str::trim)
        .find(|message| !message.is_empty())
        .map(str::to_owned)
}
