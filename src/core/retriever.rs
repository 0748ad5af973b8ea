//! Offline-first flight data source.
//!
//! No live endpoint is ever contacted: every route gets a synthetic but
//! reproducible set of options, seeded from the route itself. Setting
//! `offline_mode = false` only logs a warning; the data is still simulated.

use crate::config::settings::Settings;
use crate::domain::model::{FlightOption, ResponseMeta, RetrievalResponse, RouteRequest};
use crate::domain::ports::Retriever;
use crate::utils::error::{EtlError, Result};
use async_trait::async_trait;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use sha2::{Digest, Sha256};
use std::time::Duration;

pub const AIRLINES: [&str; 7] = [
    "SkyJet Airways",
    "AeroCloud",
    "Blue Horizon",
    "Continental Vista",
    "Polar Lines",
    "EuroFly",
    "Pacific Crest",
];

pub const CURRENCIES: [&str; 6] = ["USD", "EUR", "GBP", "AED", "SAR", "PKR"];

// 偏向直飛
const STOP_WEIGHTS: [u32; 6] = [0, 0, 0, 1, 1, 2];

pub const SIMULATED_SOURCE: &str = "simulated";

/// Stable seed for a route: SHA-256 over `origin|target|depart`, reduced
/// modulo 2^32. Identical across runs and processes.
pub fn seed_for(origin: &str, target: &str, depart: &str) -> u64 {
    let key = [origin, target, depart].join("|");
    let digest = Sha256::digest(key.as_bytes());

    let mut prefix = [0u8; 8];
    prefix.copy_from_slice(&digest[..8]);
    u64::from_be_bytes(prefix) % (1u64 << 32)
}

/// `"SkyJet Airways"` -> `"SK"`
fn flight_prefix(airline: &str) -> String {
    airline
        .split_whitespace()
        .next()
        .unwrap_or_default()
        .chars()
        .take(2)
        .collect::<String>()
        .to_uppercase()
}

fn round_cents(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Deterministic option generation, without the simulated latency.
pub fn simulate_options(request: &RouteRequest, max_per_route: usize) -> (String, Vec<FlightOption>) {
    let seed = seed_for(&request.origin, &request.target, &request.depart);
    let mut rng = StdRng::seed_from_u64(seed);

    let base_price = f64::from(rng.gen_range(80u32..=900));
    let currency = CURRENCIES[rng.gen_range(0..CURRENCIES.len())].to_string();

    let options = (0..max_per_route)
        .map(|i| {
            let airline = AIRLINES[rng.gen_range(0..AIRLINES.len())];
            let flight_number = format!("{}{}", flight_prefix(airline), rng.gen_range(100..=9999));
            let stops = STOP_WEIGHTS[rng.gen_range(0..STOP_WEIGHTS.len())];
            let duration_minutes = rng.gen_range((60 + stops * 45)..=(60 * 14 + stops * 60));
            let trend = 1.0 + 0.05 * i as f64 + rng.gen::<f64>() * 0.15;

            FlightOption {
                airline: airline.to_string(),
                flight_number,
                stops,
                duration_minutes,
                price: round_cents(base_price * trend),
                currency: currency.clone(),
            }
        })
        .collect();

    (currency, options)
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SimulatedRetriever;

impl SimulatedRetriever {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Retriever for SimulatedRetriever {
    async fn fetch(&self, request: &RouteRequest, settings: &Settings) -> Result<RetrievalResponse> {
        if !settings.offline_mode {
            tracing::warn!(
                "offline_mode=false requested for {} but no live source exists; using simulated data",
                request
            );
        }

        let (currency, options) = simulate_options(request, settings.max_per_route);

        let legs = options
            .iter()
            .map(serde_json::to_value)
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(|e| EtlError::Retrieval {
                route: request.to_string(),
                message: format!("could not encode simulated leg: {}", e),
            })?;

        // 模擬網路延遲 (非阻塞)
        let delay_ms = settings.effective_delay_ms();
        if delay_ms > 0 {
            tokio::time::sleep(Duration::from_millis(delay_ms)).await;
        }

        tracing::debug!("Simulated {} options for {}", legs.len(), request);

        Ok(RetrievalResponse {
            meta: ResponseMeta {
                origin: request.origin.clone(),
                target: request.target.clone(),
                depart: request.depart.clone(),
                currency: Some(currency),
            },
            legs,
            source: SIMULATED_SOURCE.to_string(),
            offline_mode: true,
        })
    }
}
