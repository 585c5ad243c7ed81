//! CSV tick file adapter.
//!
//! Expects a header of `timestamp,price,volume` with RFC 3339 timestamps.
//! One file per symbol, named `<SYMBOL>.csv` under the base path.

use crate::domain::error::QuantickError;
use crate::domain::sample::PriceSample;
use crate::ports::tick_port::TickPort;
use chrono::{DateTime, Utc};
use std::fs;
use std::path::PathBuf;

pub struct CsvTickAdapter {
    base_path: PathBuf,
}

impl CsvTickAdapter {
    pub fn new(base_path: PathBuf) -> Self {
        Self { base_path }
    }

    fn csv_path(&self, symbol: &str) -> PathBuf {
        self.base_path.join(format!("{}.csv", symbol))
    }
}

impl TickPort for CsvTickAdapter {
    fn fetch_ticks(&self, symbol: &str) -> Result<Vec<PriceSample>, QuantickError> {
        let path = self.csv_path(symbol);
        let content = fs::read_to_string(&path).map_err(|e| QuantickError::TickData {
            reason: format!("failed to read {}: {}", path.display(), e),
        })?;

        let mut rdr = csv::Reader::from_reader(content.as_bytes());
        let mut ticks = Vec::new();

        for result in rdr.records() {
            let record = result.map_err(|e| QuantickError::TickData {
                reason: format!("CSV parse error: {}", e),
            })?;

            let ts_str = record.get(0).ok_or_else(|| QuantickError::TickData {
                reason: "missing timestamp column".into(),
            })?;
            let timestamp = DateTime::parse_from_rfc3339(ts_str)
                .map_err(|e| QuantickError::TickData {
                    reason: format!("invalid timestamp: {}", e),
                })?
                .with_timezone(&Utc);

            let price: f64 = record
                .get(1)
                .ok_or_else(|| QuantickError::TickData {
                    reason: "missing price column".into(),
                })?
                .parse()
                .map_err(|e| QuantickError::TickData {
                    reason: format!("invalid price value: {}", e),
                })?;

            let volume: f64 = record
                .get(2)
                .ok_or_else(|| QuantickError::TickData {
                    reason: "missing volume column".into(),
                })?
                .parse()
                .map_err(|e| QuantickError::TickData {
                    reason: format!("invalid volume value: {}", e),
                })?;

            if price <= 0.0 {
                return Err(QuantickError::TickData {
                    reason: format!("non-positive price {} at {}", price, ts_str),
                });
            }

            ticks.push(PriceSample {
                price,
                volume,
                timestamp,
            });
        }

        ticks.sort_by_key(|t| t.timestamp);
        Ok(ticks)
    }
}
