//! Stochastic oscillator.
//!
//! `%K = (last - lowest_low) / (highest_high - lowest_low) * 100` over the
//! trailing `k_period` prices. `%D` is the fixed fraction `0.95 * %K` rather
//! than an SMA of the %K series. A flat window (highest == lowest) reads as
//! the neutral midpoint 50.

use serde::Serialize;

const D_FRACTION: f64 = 0.95;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct StochasticValue {
    pub k: f64,
    pub d: f64,
}

pub fn stochastic(prices: &[f64], k_period: usize, d_period: usize) -> Option<StochasticValue> {
    if k_period == 0 || d_period == 0 || prices.len() < k_period {
        return None;
    }
    let window = &prices[prices.len() - k_period..];
    let last = window[window.len() - 1];
    let lowest = window.iter().copied().fold(f64::INFINITY, f64::min);
    let highest = window.iter().copied().fold(f64::NEG_INFINITY, f64::max);

    let k = if highest == lowest {
        50.0
    } else {
        (last - lowest) / (highest - lowest) * 100.0
    };

    Some(StochasticValue {
        k,
        d: k * D_FRACTION,
    })
}
