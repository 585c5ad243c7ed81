//! Support and resistance levels from local extrema.
//!
//! Scans the trailing `lookback` prices for samples strictly greater (or
//! strictly less) than both neighbours. Resistance is the highest local
//! maximum, support the lowest local minimum; either is `None` when the
//! window holds no such extremum.

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SupportResistance {
    pub support: Option<f64>,
    pub resistance: Option<f64>,
}

pub fn support_resistance(prices: &[f64], lookback: usize) -> Option<SupportResistance> {
    if lookback < 3 || prices.len() < lookback {
        return None;
    }
    let window = &prices[prices.len() - lookback..];

    let mut resistance: Option<f64> = None;
    let mut support: Option<f64> = None;

    for i in 1..window.len() - 1 {
        let price = window[i];
        if price > window[i - 1] && price > window[i + 1] {
            resistance = Some(resistance.map_or(price, |r| r.max(price)));
        }
        if price < window[i - 1] && price < window[i + 1] {
            support = Some(support.map_or(price, |s| s.min(price)));
        }
    }

    Some(SupportResistance {
        support,
        resistance,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn levels_insufficient_data() {
        assert!(support_resistance(&[1.0, 2.0], 3).is_none());
        assert!(support_resistance(&[1.0, 2.0, 3.0], 2).is_none());
    }

    #[test]
    fn single_peak_and_trough() {
        let prices = [10.0, 20.0, 10.0, 5.0, 10.0];
        let levels = support_resistance(&prices, 5).unwrap();
        assert_eq!(levels.resistance, Some(20.0));
        assert_eq!(levels.support, Some(5.0));
    }

    #[test]
    fn highest_peak_wins() {
        let prices = [10.0, 15.0, 10.0, 25.0, 10.0, 18.0, 10.0];
        let levels = support_resistance(&prices, 7).unwrap();
        assert_eq!(levels.resistance, Some(25.0));
    }

    #[test]
    fn lowest_trough_wins() {
        let prices = [20.0, 12.0, 20.0, 5.0, 20.0, 9.0, 20.0];
        let levels = support_resistance(&prices, 7).unwrap();
        assert_eq!(levels.support, Some(5.0));
    }

    #[test]
    fn monotonic_series_has_no_levels() {
        let prices: Vec<f64> = (0..10).map(|i| 100.0 + i as f64).collect();
        let levels = support_resistance(&prices, 10).unwrap();
        assert_eq!(levels.resistance, None);
        assert_eq!(levels.support, None);
    }

    #[test]
    fn plateau_is_not_an_extremum() {
        // Equal neighbours fail the strict comparison.
        let prices = [10.0, 20.0, 20.0, 10.0, 10.0];
        let levels = support_resistance(&prices, 5).unwrap();
        assert_eq!(levels.resistance, None);
    }

    #[test]
    fn endpoints_excluded() {
        // Highest price sits at the window edge; no interior peak.
        let prices = [10.0, 11.0, 12.0, 13.0, 30.0];
        let levels = support_resistance(&prices, 5).unwrap();
        assert_eq!(levels.resistance, None);
    }
}
