use serde::{Deserialize, Serialize};
use std::fmt;

/// One leg of a multi-city job.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StopJob {
    pub origin: String,
    pub target: String,
    pub depart: String,
}

/// A user-specified travel intent: one-way, roundtrip (all three `*_return`
/// fields) and/or multi-city (`stops`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteJob {
    pub origin: String,
    pub target: String,
    pub depart: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub origin_return: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_return: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub depart_return: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stops: Option<Vec<StopJob>>,
}

/// One concrete leg lookup.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RouteRequest {
    pub origin: String,
    pub target: String,
    pub depart: String,
}

impl RouteRequest {
    pub fn new(
        origin: impl Into<String>,
        target: impl Into<String>,
        depart: impl Into<String>,
    ) -> Self {
        Self {
            origin: origin.into(),
            target: target.into(),
            depart: depart.into(),
        }
    }
}

impl fmt::Display for RouteRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {} on {}", self.origin, self.target, self.depart)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResponseMeta {
    pub origin: String,
    pub target: String,
    pub depart: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,
}

impl fmt::Display for ResponseMeta {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {} on {}", self.origin, self.target, self.depart)
    }
}

/// A flight option as produced by a data source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlightOption {
    pub airline: String,
    pub flight_number: String,
    pub stops: u32,
    pub duration_minutes: u32,
    pub price: f64,
    pub currency: String,
}

/// Raw per-route payload. Legs stay loosely typed JSON so that a malformed
/// field degrades to a default during normalization instead of failing the
/// whole response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RetrievalResponse {
    #[serde(default)]
    pub meta: ResponseMeta,
    #[serde(default)]
    pub legs: Vec<serde_json::Value>,
    #[serde(default)]
    pub source: String,
    #[serde(default)]
    pub offline_mode: bool,
}

/// Canonical output row. Field order is the serialized column order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlightRecord {
    pub origin: String,
    pub target: String,
    pub depart: String,
    pub airline: String,
    pub price: f64,
    pub duration: String,
    pub stops: u32,
    pub flight_number: String,
    pub fetched_at: String,
    pub currency: String,
}

#[derive(Debug, Clone, Default)]
pub struct ExtractResult {
    pub requested: usize,
    pub responses: Vec<RetrievalResponse>,
    pub failed: Vec<RouteRequest>,
}

#[derive(Debug, Clone, Default)]
pub struct TransformResult {
    pub records: Vec<FlightRecord>,
    pub skipped_responses: usize,
    /// 截斷前的記錄數 (未截斷時為 None)
    pub truncated_from: Option<usize>,
}

#[derive(Debug, Clone)]
pub struct RunSummary {
    pub requested_routes: usize,
    pub failed_routes: usize,
    pub skipped_responses: usize,
    pub records_written: usize,
    pub output_path: String,
}

impl RunSummary {
    /// 成功執行，但有部分路線或回應被略過
    pub fn is_partial(&self) -> bool {
        self.failed_routes > 0 || self.skipped_responses > 0
    }
}
