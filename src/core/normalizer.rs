use crate::domain::model::{FlightRecord, RetrievalResponse};
use crate::utils::error::{EtlError, Result};
use chrono::{DateTime, Utc};
use serde_json::{Map, Value};

pub const DEFAULT_AIRLINE: &str = "Unknown";
pub const DEFAULT_FLIGHT_NUMBER: &str = "N/A";
pub const DEFAULT_CURRENCY: &str = "USD";

/// 秒精度、以 `Z` 結尾的 UTC 時間戳
pub fn utc_timestamp(at: DateTime<Utc>) -> String {
    at.format("%Y-%m-%dT%H:%M:%SZ").to_string()
}

/// 將分鐘轉成 `"<H>h <MM>m"`
pub fn format_duration(minutes: i64) -> String {
    if minutes <= 0 {
        return "0h 00m".to_string();
    }
    format!("{}h {:02}m", minutes / 60, minutes % 60)
}

/// 價格轉換失敗、負值或非有限數都視為 0.0
fn coerce_price(value: Option<&Value>) -> f64 {
    let price = match value {
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => s.trim().parse::<f64>().ok(),
        _ => None,
    };

    price.filter(|p| p.is_finite() && *p >= 0.0).unwrap_or(0.0)
}

/// Integer coercion: integral numbers and integer strings parse, floats
/// truncate toward zero, anything else falls back to 0.
fn coerce_int(value: Option<&Value>) -> i64 {
    match value {
        Some(Value::Number(n)) => n
            .as_i64()
            .or_else(|| n.as_f64().filter(|f| f.is_finite()).map(|f| f.trunc() as i64))
            .unwrap_or(0),
        Some(Value::String(s)) => s.trim().parse::<i64>().unwrap_or(0),
        Some(Value::Bool(b)) => i64::from(*b),
        _ => 0,
    }
}

fn text_or(value: Option<&Value>, default: &str) -> String {
    match value {
        Some(Value::String(s)) => s.clone(),
        None | Some(Value::Null) => default.to_string(),
        Some(other) => other.to_string(),
    }
}

fn normalize_leg(
    response: &RetrievalResponse,
    leg: &Map<String, Value>,
    fetched_at: &str,
) -> FlightRecord {
    let meta = &response.meta;

    let currency = match leg.get("currency") {
        Some(Value::String(c)) => c.clone(),
        _ => meta
            .currency
            .clone()
            .unwrap_or_else(|| DEFAULT_CURRENCY.to_string()),
    };

    FlightRecord {
        origin: meta.origin.clone(),
        target: meta.target.clone(),
        depart: meta.depart.clone(),
        airline: text_or(leg.get("airline"), DEFAULT_AIRLINE),
        price: coerce_price(leg.get("price")),
        duration: format_duration(coerce_int(leg.get("duration_minutes"))),
        stops: u32::try_from(coerce_int(leg.get("stops")).max(0)).unwrap_or(u32::MAX),
        flight_number: text_or(leg.get("flight_number"), DEFAULT_FLIGHT_NUMBER),
        fetched_at: fetched_at.to_string(),
        currency,
    }
}

/// Convert one response into flat records, one per leg, in leg order.
pub fn normalize(response: &RetrievalResponse) -> Result<Vec<FlightRecord>> {
    normalize_at(response, Utc::now())
}

/// Same as [`normalize`] with an explicit `fetched_at` instant.
///
/// Bad field values degrade to defaults; only a leg that is not a JSON
/// object fails, and then the whole response fails.
pub fn normalize_at(response: &RetrievalResponse, at: DateTime<Utc>) -> Result<Vec<FlightRecord>> {
    let fetched_at = utc_timestamp(at);

    response
        .legs
        .iter()
        .enumerate()
        .map(|(idx, leg)| match leg {
            Value::Object(fields) => Ok(normalize_leg(response, fields, &fetched_at)),
            other => Err(EtlError::Normalization {
                route: response.meta.to_string(),
                message: format!("leg #{} is not an object: {}", idx, other),
            }),
        })
        .collect()
}
