//! Moving Average Convergence Divergence.
//!
//! `macd = EMA(fast) - EMA(slow)`. The signal line is the fixed fraction
//! `0.9 * macd` rather than an EMA of the MACD series, so the histogram is
//! always `0.1 * macd`. The fraction keeps sign agreement with the MACD line:
//! `macd > signal` exactly when `macd > 0`.

use serde::Serialize;

use super::moving_average::ema;

const SIGNAL_FRACTION: f64 = 0.9;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MacdValue {
    pub macd: f64,
    pub signal: f64,
    pub histogram: f64,
}

pub fn macd(prices: &[f64], fast: usize, slow: usize, signal_period: usize) -> Option<MacdValue> {
    if fast == 0 || slow == 0 || signal_period == 0 || fast >= slow {
        return None;
    }
    let fast_ema = ema(prices, fast)?;
    let slow_ema = ema(prices, slow)?;

    let line = fast_ema - slow_ema;
    let signal = line * SIGNAL_FRACTION;
    Some(MacdValue {
        macd: line,
        signal,
        histogram: line - signal,
    })
}
