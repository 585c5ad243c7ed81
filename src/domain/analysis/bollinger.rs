//! Bollinger Bands.
//!
//! Middle band is the SMA over `period`; the band offset is `mult` population
//! standard deviations (divides by N, not N-1) of the same window.
//! Bandwidth is `2 * mult * stddev / middle * 100`.

use serde::Serialize;

use super::moving_average::sma;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BollingerBands {
    pub upper: f64,
    pub middle: f64,
    pub lower: f64,
    pub bandwidth: f64,
}

pub fn bollinger(prices: &[f64], period: usize, mult: f64) -> Option<BollingerBands> {
    let middle = sma(prices, period)?;
    let window = &prices[prices.len() - period..];

    let variance = window
        .iter()
        .map(|p| {
            let diff = p - middle;
            diff * diff
        })
        .sum::<f64>()
        / period as f64;
    let stddev = variance.sqrt();

    let bandwidth = if middle != 0.0 {
        2.0 * mult * stddev / middle * 100.0
    } else {
        0.0
    };

    Some(BollingerBands {
        upper: middle + mult * stddev,
        middle,
        lower: middle - mult * stddev,
        bandwidth,
    })
}
