//! Price/volume samples and the per-instrument history they accumulate in.

use chrono::{DateTime, Utc};
use serde::Serialize;

/// A single observed price/volume tick. Immutable once appended.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PriceSample {
    pub price: f64,
    pub volume: f64,
    pub timestamp: DateTime<Utc>,
}

/// Append-only sample history for one instrument.
///
/// The history itself is unbounded; bounded derived windows are taken as
/// trailing slices by the indicator computations.
#[derive(Debug, Clone, Default)]
pub struct SampleHistory {
    samples: Vec<PriceSample>,
}

impl SampleHistory {
    pub fn new() -> Self {
        SampleHistory {
            samples: Vec::new(),
        }
    }

    pub fn push(&mut self, price: f64, volume: f64, timestamp: DateTime<Utc>) {
        self.samples.push(PriceSample {
            price,
            volume,
            timestamp,
        });
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn samples(&self) -> &[PriceSample] {
        &self.samples
    }

    pub fn last(&self) -> Option<&PriceSample> {
        self.samples.last()
    }

    pub fn last_price(&self) -> Option<f64> {
        self.samples.last().map(|s| s.price)
    }

    /// Trailing slice of the last `n` samples, or `None` if fewer exist.
    pub fn window(&self, n: usize) -> Option<&[PriceSample]> {
        if n == 0 || self.samples.len() < n {
            return None;
        }
        Some(&self.samples[self.samples.len() - n..])
    }

    /// Trailing prices of the last `n` samples, or `None` if fewer exist.
    pub fn price_window(&self, n: usize) -> Option<Vec<f64>> {
        self.window(n)
            .map(|w| w.iter().map(|s| s.price).collect())
    }
}
