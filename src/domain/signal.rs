//! Signal aggregation: fold an indicator snapshot into one directional
//! signal with a confidence score.
//!
//! Each rule fires independently and contributes a reason string to the buy
//! or sell list. Indicators still missing from the snapshot simply skip
//! their rule. The overall direction goes to whichever list is strictly
//! longer (and non-empty); confidence is the normalized margin
//! `|buys - sells| / max(buys + sells, 1)`.

use serde::Serialize;

use crate::domain::analysis::IndicatorSnapshot;

pub const RSI_OVERSOLD: f64 = 30.0;
pub const RSI_OVERBOUGHT: f64 = 70.0;
pub const VOLUME_SURGE_RATIO: f64 = 1.5;
/// Fractional distance from a support/resistance level that still counts
/// as "near" it.
pub const LEVEL_PROXIMITY: f64 = 0.02;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SignalDirection {
    Buy,
    Sell,
    Neutral,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Signal {
    pub buy_reasons: Vec<String>,
    pub sell_reasons: Vec<String>,
    pub overall: SignalDirection,
    pub confidence: f64,
}

impl Signal {
    pub fn neutral() -> Self {
        Signal {
            buy_reasons: Vec::new(),
            sell_reasons: Vec::new(),
            overall: SignalDirection::Neutral,
            confidence: 0.0,
        }
    }
}

/// Derive a [`Signal`] from an indicator snapshot. Pure function, no state.
pub fn aggregate(snapshot: &IndicatorSnapshot) -> Signal {
    let Some(price) = snapshot.price else {
        return Signal::neutral();
    };

    let mut buy_reasons: Vec<String> = Vec::new();
    let mut sell_reasons: Vec<String> = Vec::new();

    if let Some(rsi) = snapshot.rsi {
        if rsi < RSI_OVERSOLD {
            buy_reasons.push("oversold".into());
        } else if rsi > RSI_OVERBOUGHT {
            sell_reasons.push("overbought".into());
        }
    }

    if let Some(macd) = snapshot.macd {
        if macd.macd > macd.signal {
            buy_reasons.push("macd_bullish".into());
        } else if macd.macd < macd.signal {
            sell_reasons.push("macd_bearish".into());
        }
    }

    if let Some(bands) = snapshot.bollinger {
        if price <= bands.lower {
            buy_reasons.push("below_lower_band".into());
        } else if price >= bands.upper {
            sell_reasons.push("above_upper_band".into());
        }
    }

    if let (Some(short), Some(long)) = (snapshot.sma_short, snapshot.sma_long) {
        if short > long {
            buy_reasons.push("uptrend".into());
        } else {
            sell_reasons.push("downtrend".into());
        }
    }

    // Volume surge only ever confirms buying interest.
    if let Some(volume) = snapshot.volume {
        if volume.ratio > VOLUME_SURGE_RATIO {
            buy_reasons.push("volume_surge".into());
        }
    }

    if let Some(levels) = snapshot.levels {
        if let Some(support) = levels.support {
            if price >= support && price <= support * (1.0 + LEVEL_PROXIMITY) {
                buy_reasons.push("near_support".into());
            }
        }
        if let Some(resistance) = levels.resistance {
            if price <= resistance && price >= resistance * (1.0 - LEVEL_PROXIMITY) {
                sell_reasons.push("near_resistance".into());
            }
        }
    }

    let buys = buy_reasons.len();
    let sells = sell_reasons.len();

    let overall = if buys > sells && buys > 0 {
        SignalDirection::Buy
    } else if sells > buys && sells > 0 {
        SignalDirection::Sell
    } else {
        SignalDirection::Neutral
    };

    let confidence = (buys as f64 - sells as f64).abs() / (buys + sells).max(1) as f64;

    Signal {
        buy_reasons,
        sell_reasons,
        overall,
        confidence,
    }
}
