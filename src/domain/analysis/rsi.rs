//! Relative Strength Index.
//!
//! Computed from scratch over the last `period + 1` prices on every call:
//! gains and losses are simple sums of the positive and negative deltas,
//! `avg_gain = gains / period`, `avg_loss = losses / period`, and
//! `RSI = 100 - 100 / (1 + avg_gain / avg_loss)`, or 100 when there are no
//! losses in the window.

pub fn rsi(prices: &[f64], period: usize) -> Option<f64> {
    if period == 0 || prices.len() < period + 1 {
        return None;
    }
    let window = &prices[prices.len() - (period + 1)..];

    let mut gains = 0.0;
    let mut losses = 0.0;
    for pair in window.windows(2) {
        let change = pair[1] - pair[0];
        if change > 0.0 {
            gains += change;
        } else {
            losses += -change;
        }
    }

    let avg_gain = gains / period as f64;
    let avg_loss = losses / period as f64;

    if avg_loss == 0.0 {
        return Some(100.0);
    }
    Some(100.0 - 100.0 / (1.0 + avg_gain / avg_loss))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rsi_needs_period_plus_one() {
        let prices: Vec<f64> = (0..14).map(|i| 100.0 + i as f64).collect();
        assert_eq!(rsi(&prices, 14), None);

        let prices: Vec<f64> = (0..15).map(|i| 100.0 + i as f64).collect();
        assert!(rsi(&prices, 14).is_some());
    }

    #[test]
    fn rsi_all_gains_is_100() {
        let prices: Vec<f64> = (0..20).map(|i| 100.0 + i as f64).collect();
        let value = rsi(&prices, 14).unwrap();
        assert!((value - 100.0).abs() < f64::EPSILON);
    }

    #[test]
    fn rsi_all_losses_is_0() {
        let prices: Vec<f64> = (0..20).map(|i| 100.0 - i as f64).collect();
        let value = rsi(&prices, 14).unwrap();
        assert!((value - 0.0).abs() < f64::EPSILON);
    }

    #[test]
    fn rsi_flat_prices_is_100() {
        // No movement means no losses; the avg_loss == 0 branch applies.
        let prices = [100.0; 16];
        assert_eq!(rsi(&prices, 14), Some(100.0));
    }

    #[test]
    fn rsi_balanced_moves_is_50() {
        // Alternating +1/-1 gives equal gains and losses.
        let mut prices = vec![100.0];
        for i in 0..14 {
            let last = *prices.last().unwrap();
            prices.push(if i % 2 == 0 { last + 1.0 } else { last - 1.0 });
        }
        let value = rsi(&prices, 14).unwrap();
        assert!((value - 50.0).abs() < 1e-9);
    }

    #[test]
    fn rsi_within_bounds() {
        let prices: Vec<f64> = (0..40)
            .map(|i| 100.0 + ((i * 7) % 13) as f64 - 6.0)
            .collect();
        let value = rsi(&prices, 14).unwrap();
        assert!((0.0..=100.0).contains(&value));
    }

    #[test]
    fn rsi_zero_period() {
        assert_eq!(rsi(&[100.0, 101.0], 0), None);
    }
}
