//! Simple, exponential and linearly weighted moving averages.
//!
//! All functions return `None` when fewer than `period` prices exist; a
//! partial window is never averaged.

/// Arithmetic mean of the last `period` prices.
pub fn sma(prices: &[f64], period: usize) -> Option<f64> {
    if period == 0 || prices.len() < period {
        return None;
    }
    let window = &prices[prices.len() - period..];
    Some(window.iter().sum::<f64>() / period as f64)
}

/// Exponential moving average with multiplier `2 / (period + 1)`.
///
/// Seeded from the first price of the entire history and recursed across
/// every price collected so far, not from an SMA of the first `period`
/// prices. Still requires `period` prices before producing a value.
pub fn ema(prices: &[f64], period: usize) -> Option<f64> {
    if period == 0 || prices.len() < period {
        return None;
    }
    let k = 2.0 / (period as f64 + 1.0);
    let mut value = prices[0];
    for price in &prices[1..] {
        value = price * k + value * (1.0 - k);
    }
    Some(value)
}

/// Linearly weighted mean of the last `period` prices, most recent
/// weighted highest (weights 1..=period).
pub fn wma(prices: &[f64], period: usize) -> Option<f64> {
    if period == 0 || prices.len() < period {
        return None;
    }
    let window = &prices[prices.len() - period..];
    let mut weighted_sum = 0.0;
    let mut weight_total = 0.0;
    for (i, price) in window.iter().enumerate() {
        let weight = (i + 1) as f64;
        weighted_sum += price * weight;
        weight_total += weight;
    }
    Some(weighted_sum / weight_total)
}
