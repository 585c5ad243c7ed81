#![allow(dead_code)]

use chrono::{DateTime, TimeZone, Utc};
use quantick::domain::error::QuantickError;
pub use quantick::domain::sample::PriceSample;
use quantick::ports::tick_port::TickPort;
use std::collections::HashMap;

pub struct MockTickPort {
    pub data: HashMap<String, Vec<PriceSample>>,
    pub errors: HashMap<String, String>,
}

impl MockTickPort {
    pub fn new() -> Self {
        Self {
            data: HashMap::new(),
            errors: HashMap::new(),
        }
    }

    pub fn with_ticks(mut self, symbol: &str, ticks: Vec<PriceSample>) -> Self {
        self.data.insert(symbol.to_string(), ticks);
        self
    }

    pub fn with_error(mut self, symbol: &str, reason: &str) -> Self {
        self.errors.insert(symbol.to_string(), reason.to_string());
        self
    }
}

impl TickPort for MockTickPort {
    fn fetch_ticks(&self, symbol: &str) -> Result<Vec<PriceSample>, QuantickError> {
        if let Some(reason) = self.errors.get(symbol) {
            return Err(QuantickError::TickData {
                reason: reason.clone(),
            });
        }
        Ok(self.data.get(symbol).cloned().unwrap_or_default())
    }
}

pub fn ts(i: usize) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap() + chrono::Duration::seconds(i as i64)
}

pub fn make_tick(i: usize, price: f64, volume: f64) -> PriceSample {
    PriceSample {
        price,
        volume,
        timestamp: ts(i),
    }
}

/// A series of (price, volume) pairs stamped one second apart.
pub fn tick_series(pairs: &[(f64, f64)]) -> Vec<PriceSample> {
    pairs
        .iter()
        .enumerate()
        .map(|(i, &(price, volume))| make_tick(i, price, volume))
        .collect()
}
