//! Momentum strategy: Flat -> Long -> Flat.
//!
//! Keeps a bounded lookback window of price/volume pairs. Entry requires
//! momentum and volume both above their thresholds plus an agreeing buy
//! signal; exit on momentum reversal or an agreeing sell signal. All opens
//! and closes route through the risk manager.

use crate::domain::analysis::TechnicalAnalysis;
use crate::domain::position::ExitReason;
use crate::domain::risk::RiskManager;
use crate::domain::sample::PriceSample;
use crate::domain::signal::{self, SignalDirection};
use crate::domain::strategy::{
    ExecutionIntent, IntentAction, StrategyKind, StrategyStatus, TradeTally,
};
use std::collections::VecDeque;

/// Minimum signal confidence to act on a buy or sell signal.
const MIN_CONFIDENCE: f64 = 0.3;

const STRATEGY_TAG: &str = "momentum";

#[derive(Debug, Clone, PartialEq)]
pub struct MomentumConfig {
    pub lookback: usize,
    /// Relative price change over the window required to enter.
    pub momentum_threshold: f64,
    /// Last volume over the mean of the earlier window volumes.
    pub volume_threshold: f64,
}

impl Default for MomentumConfig {
    fn default() -> Self {
        MomentumConfig {
            lookback: 10,
            momentum_threshold: 0.02,
            volume_threshold: 1.5,
        }
    }
}

#[derive(Debug, Clone)]
pub struct MomentumStrategy {
    symbol: String,
    config: MomentumConfig,
    window: VecDeque<(f64, f64)>,
    position_id: Option<u64>,
    tally: TradeTally,
}

impl MomentumStrategy {
    pub fn new(symbol: &str, config: MomentumConfig) -> Self {
        MomentumStrategy {
            symbol: symbol.to_string(),
            config,
            window: VecDeque::new(),
            position_id: None,
            tally: TradeTally::default(),
        }
    }

    pub fn evaluate(
        &mut self,
        tick: &PriceSample,
        analysis: &TechnicalAnalysis,
        risk: &mut RiskManager,
    ) -> Vec<ExecutionIntent> {
        self.window.push_back((tick.price, tick.volume));
        while self.window.len() > self.config.lookback {
            self.window.pop_front();
        }

        self.reconcile(risk);

        if self.window.len() < self.config.lookback {
            return Vec::new();
        }

        let first_price = self.window[0].0;
        if first_price <= 0.0 {
            return Vec::new();
        }
        let momentum = (tick.price - first_price) / first_price;
        let volume_ratio = self.volume_ratio(tick.volume);
        let signal = signal::aggregate(&analysis.snapshot());

        let mut intents = Vec::new();

        match self.position_id {
            None => {
                let buy_agrees = signal.overall == SignalDirection::Buy
                    && signal.confidence > MIN_CONFIDENCE;
                if momentum > self.config.momentum_threshold
                    && volume_ratio > self.config.volume_threshold
                    && buy_agrees
                {
                    let stop = tick.price * (1.0 - risk.config().stop_loss_pct);
                    if let Ok(position) = risk.open_position(
                        &self.symbol,
                        tick.price,
                        stop,
                        None,
                        STRATEGY_TAG,
                        tick.timestamp,
                    ) {
                        self.position_id = Some(position.id);
                        intents.push(ExecutionIntent {
                            action: IntentAction::Open,
                            symbol: self.symbol.clone(),
                            size: position.size,
                            price: tick.price,
                            position_id: Some(position.id),
                        });
                    }
                }
            }
            Some(id) => {
                let sell_agrees = signal.overall == SignalDirection::Sell
                    && signal.confidence > MIN_CONFIDENCE;
                if momentum < -self.config.momentum_threshold || sell_agrees {
                    if let Ok(trade) =
                        risk.close_position(id, tick.price, ExitReason::Signal, tick.timestamp)
                    {
                        self.tally.record(&trade);
                        intents.push(ExecutionIntent {
                            action: IntentAction::Close,
                            symbol: self.symbol.clone(),
                            size: trade.size,
                            price: tick.price,
                            position_id: Some(id),
                        });
                    }
                    self.position_id = None;
                }
            }
        }

        intents
    }

    pub fn status(&self) -> StrategyStatus {
        StrategyStatus {
            kind: StrategyKind::Momentum,
            state: if self.position_id.is_some() {
                "long".into()
            } else {
                "flat".into()
            },
            trades: self.tally.trades().len(),
            wins: self.tally.wins(),
            losses: self.tally.losses(),
            realized_pnl: self.tally.realized_pnl(),
            open_positions: usize::from(self.position_id.is_some()),
            open_orders: 0,
        }
    }

    /// Fold in positions the risk manager closed on its own (stop-loss or
    /// take-profit sweep) since the last tick.
    fn reconcile(&mut self, risk: &RiskManager) {
        if let Some(id) = self.position_id {
            if risk.position(id).is_none() {
                if let Some(trade) =
                    risk.trades().iter().find(|t| t.position_id == id)
                {
                    self.tally.record(trade);
                }
                self.position_id = None;
            }
        }
    }

    fn volume_ratio(&self, last_volume: f64) -> f64 {
        let earlier = self.window.len() - 1;
        if earlier == 0 {
            return 0.0;
        }
        let mean: f64 = self
            .window
            .iter()
            .take(earlier)
            .map(|(_, v)| v)
            .sum::<f64>()
            / earlier as f64;
        if mean > 0.0 {
            last_volume / mean
        } else {
            0.0
        }
    }
}
