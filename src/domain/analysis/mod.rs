//! Technical analysis engine: per-instrument sample history plus on-demand
//! indicator computation.
//!
//! Every compute method takes a period and returns `None` when fewer samples
//! than the period exist; a partial or extrapolated value is never produced.
//! Indicators are recomputed from the current history on each call, nothing
//! derived is cached.

pub mod moving_average;
pub mod rsi;
pub mod macd;
pub mod bollinger;
pub mod stochastic;
pub mod volume;
pub mod levels;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::domain::sample::SampleHistory;

pub use bollinger::BollingerBands;
pub use levels::SupportResistance;
pub use macd::MacdValue;
pub use stochastic::StochasticValue;
pub use volume::VolumeProfile;

pub const SMA_SHORT_PERIOD: usize = 20;
pub const SMA_LONG_PERIOD: usize = 50;
pub const EMA_PERIOD: usize = 12;
pub const RSI_PERIOD: usize = 14;
pub const MACD_FAST: usize = 12;
pub const MACD_SLOW: usize = 26;
pub const MACD_SIGNAL: usize = 9;
pub const BOLLINGER_PERIOD: usize = 20;
pub const BOLLINGER_MULT: f64 = 2.0;
pub const STOCHASTIC_K_PERIOD: usize = 14;
pub const STOCHASTIC_D_PERIOD: usize = 3;
pub const VOLUME_PERIOD: usize = 20;
pub const LEVELS_LOOKBACK: usize = 20;

/// Derived bundle of indicator readings, recomputed on demand. Absent fields
/// mean the history is still too short for that indicator.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IndicatorSnapshot {
    pub price: Option<f64>,
    pub sma_short: Option<f64>,
    pub sma_long: Option<f64>,
    pub ema: Option<f64>,
    pub rsi: Option<f64>,
    pub macd: Option<MacdValue>,
    pub bollinger: Option<BollingerBands>,
    pub stochastic: Option<StochasticValue>,
    pub volume: Option<VolumeProfile>,
    pub levels: Option<SupportResistance>,
    pub sample_count: usize,
}

/// Technical analysis engine for one instrument.
#[derive(Debug, Clone, Default)]
pub struct TechnicalAnalysis {
    history: SampleHistory,
}

impl TechnicalAnalysis {
    pub fn new() -> Self {
        TechnicalAnalysis {
            history: SampleHistory::new(),
        }
    }

    /// Append a tick unconditionally. A missing timestamp reads the clock.
    pub fn add_sample(&mut self, price: f64, volume: f64, timestamp: Option<DateTime<Utc>>) {
        self.history
            .push(price, volume, timestamp.unwrap_or_else(Utc::now));
    }

    pub fn history(&self) -> &SampleHistory {
        &self.history
    }

    pub fn sma(&self, period: usize) -> Option<f64> {
        let prices = self.history.price_window(self.history.len())?;
        moving_average::sma(&prices, period)
    }

    pub fn ema(&self, period: usize) -> Option<f64> {
        let prices = self.history.price_window(self.history.len())?;
        moving_average::ema(&prices, period)
    }

    pub fn wma(&self, period: usize) -> Option<f64> {
        let prices = self.history.price_window(self.history.len())?;
        moving_average::wma(&prices, period)
    }

    pub fn rsi(&self, period: usize) -> Option<f64> {
        let prices = self.history.price_window(self.history.len())?;
        rsi::rsi(&prices, period)
    }

    pub fn macd(&self, fast: usize, slow: usize, signal_period: usize) -> Option<MacdValue> {
        let prices = self.history.price_window(self.history.len())?;
        macd::macd(&prices, fast, slow, signal_period)
    }

    pub fn bollinger(&self, period: usize, mult: f64) -> Option<BollingerBands> {
        let prices = self.history.price_window(self.history.len())?;
        bollinger::bollinger(&prices, period, mult)
    }

    pub fn stochastic(&self, k_period: usize, d_period: usize) -> Option<StochasticValue> {
        let prices = self.history.price_window(self.history.len())?;
        stochastic::stochastic(&prices, k_period, d_period)
    }

    pub fn volume_profile(&self, period: usize) -> Option<VolumeProfile> {
        volume::volume_profile(self.history.samples(), period)
    }

    pub fn support_resistance(&self, lookback: usize) -> Option<SupportResistance> {
        let prices = self.history.price_window(self.history.len())?;
        levels::support_resistance(&prices, lookback)
    }

    /// Recompute the full indicator bundle at the default periods.
    pub fn snapshot(&self) -> IndicatorSnapshot {
        IndicatorSnapshot {
            price: self.history.last_price(),
            sma_short: self.sma(SMA_SHORT_PERIOD),
            sma_long: self.sma(SMA_LONG_PERIOD),
            ema: self.ema(EMA_PERIOD),
            rsi: self.rsi(RSI_PERIOD),
            macd: self.macd(MACD_FAST, MACD_SLOW, MACD_SIGNAL),
            bollinger: self.bollinger(BOLLINGER_PERIOD, BOLLINGER_MULT),
            stochastic: self.stochastic(STOCHASTIC_K_PERIOD, STOCHASTIC_D_PERIOD),
            volume: self.volume_profile(VOLUME_PERIOD),
            levels: self.support_resistance(LEVELS_LOOKBACK),
            sample_count: self.history.len(),
        }
    }
}
