//! Volume profile: current volume against its trailing mean.

use serde::Serialize;

use crate::domain::sample::PriceSample;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct VolumeProfile {
    pub current: f64,
    pub average: f64,
    /// current / average; 0 when the window's average volume is zero.
    pub ratio: f64,
    /// mean of the second half of the window over the mean of the first
    /// half; > 1 means volume is picking up.
    pub trend: f64,
}

pub fn volume_profile(samples: &[PriceSample], period: usize) -> Option<VolumeProfile> {
    if period == 0 || samples.len() < period {
        return None;
    }
    let window = &samples[samples.len() - period..];
    let volumes: Vec<f64> = window.iter().map(|s| s.volume).collect();

    let current = volumes[volumes.len() - 1];
    let average = volumes.iter().sum::<f64>() / period as f64;
    let ratio = if average > 0.0 { current / average } else { 0.0 };

    let half = period / 2;
    let trend = if half == 0 {
        1.0
    } else {
        let first_mean = volumes[..half].iter().sum::<f64>() / half as f64;
        let second_mean =
            volumes[half..].iter().sum::<f64>() / (period - half) as f64;
        if first_mean > 0.0 {
            second_mean / first_mean
        } else {
            1.0
        }
    };

    Some(VolumeProfile {
        current,
        average,
        ratio,
        trend,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use chrono::{TimeZone, Utc};

    fn samples(volumes: &[f64]) -> Vec<PriceSample> {
        volumes
            .iter()
            .enumerate()
            .map(|(i, &v)| PriceSample {
                price: 100.0,
                volume: v,
                timestamp: Utc.with_ymd_and_hms(2024, 1, 1, 0, i as u32, 0).unwrap(),
            })
            .collect()
    }

    #[test]
    fn profile_insufficient_data() {
        assert!(volume_profile(&samples(&[100.0, 200.0]), 3).is_none());
    }

    #[test]
    fn ratio_against_window_mean() {
        let profile = volume_profile(&samples(&[100.0, 100.0, 100.0, 300.0]), 4).unwrap();
        assert_relative_eq!(profile.average, 150.0);
        assert_relative_eq!(profile.ratio, 2.0);
        assert_relative_eq!(profile.current, 300.0);
    }

    #[test]
    fn trend_rising_volume() {
        let profile = volume_profile(&samples(&[100.0, 100.0, 200.0, 200.0]), 4).unwrap();
        assert_relative_eq!(profile.trend, 2.0);
    }

    #[test]
    fn trend_falling_volume() {
        let profile = volume_profile(&samples(&[200.0, 200.0, 100.0, 100.0]), 4).unwrap();
        assert_relative_eq!(profile.trend, 0.5);
    }

    #[test]
    fn zero_volume_window() {
        let profile = volume_profile(&samples(&[0.0, 0.0, 0.0]), 3).unwrap();
        assert_relative_eq!(profile.ratio, 0.0);
        assert_relative_eq!(profile.trend, 1.0);
    }

    #[test]
    fn odd_period_halves() {
        // First half is 2 samples, second half 3.
        let profile =
            volume_profile(&samples(&[100.0, 100.0, 200.0, 200.0, 200.0]), 5).unwrap();
        assert_relative_eq!(profile.trend, 2.0);
    }
}
