//! Dip-buy strategy: Flat -> Holding -> Flat.
//!
//! Watches the rolling high over a lookback window. When price falls at
//! least `dip_threshold` below that high, spends `spend_fraction` of the
//! current balance on a single position. The position is held until price
//! recovers to `recovery_threshold` of the rolling high, then closed.
//! Positions carry no stop or take-profit, so only the recovery exit fires.

use crate::domain::analysis::TechnicalAnalysis;
use crate::domain::position::ExitReason;
use crate::domain::risk::RiskManager;
use crate::domain::sample::PriceSample;
use crate::domain::strategy::{
    ExecutionIntent, IntentAction, StrategyKind, StrategyStatus, TradeTally,
};
use std::collections::VecDeque;

const STRATEGY_TAG: &str = "dip_buy";

#[derive(Debug, Clone, PartialEq)]
pub struct DipBuyConfig {
    pub lookback: usize,
    /// Drop from the rolling high required to buy, as a fraction.
    pub dip_threshold: f64,
    /// Price over rolling high at which the holding is released.
    pub recovery_threshold: f64,
    /// Fraction of the current balance spent per dip.
    pub spend_fraction: f64,
}

impl Default for DipBuyConfig {
    fn default() -> Self {
        DipBuyConfig {
            lookback: 20,
            dip_threshold: 0.05,
            recovery_threshold: 0.98,
            spend_fraction: 0.25,
        }
    }
}

#[derive(Debug, Clone)]
pub struct DipBuyStrategy {
    symbol: String,
    config: DipBuyConfig,
    window: VecDeque<f64>,
    holding: Option<u64>,
    tally: TradeTally,
}

impl DipBuyStrategy {
    pub fn new(symbol: &str, config: DipBuyConfig) -> Self {
        DipBuyStrategy {
            symbol: symbol.to_string(),
            config,
            window: VecDeque::new(),
            holding: None,
            tally: TradeTally::default(),
        }
    }

    pub fn evaluate(
        &mut self,
        tick: &PriceSample,
        _analysis: &TechnicalAnalysis,
        risk: &mut RiskManager,
    ) -> Vec<ExecutionIntent> {
        self.window.push_back(tick.price);
        while self.window.len() > self.config.lookback {
            self.window.pop_front();
        }

        self.reconcile(risk);

        let recent_high = self
            .window
            .iter()
            .copied()
            .fold(f64::MIN, f64::max);
        if recent_high <= 0.0 {
            return Vec::new();
        }

        let mut intents = Vec::new();

        match self.holding {
            None => {
                let dip = (recent_high - tick.price) / recent_high;
                if dip >= self.config.dip_threshold {
                    let size = risk.current_balance() * self.config.spend_fraction / tick.price;
                    // No stop or take-profit: the recovery exit is the only way out.
                    if let Ok(position) = risk.open_position_sized(
                        &self.symbol,
                        tick.price,
                        0.0,
                        Some(0.0),
                        size,
                        STRATEGY_TAG,
                        tick.timestamp,
                    ) {
                        self.holding = Some(position.id);
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
                if tick.price / recent_high >= self.config.recovery_threshold {
                    if let Ok(trade) = risk.close_position(
                        id,
                        tick.price,
                        ExitReason::Recovery,
                        tick.timestamp,
                    ) {
                        self.tally.record(&trade);
                        intents.push(ExecutionIntent {
                            action: IntentAction::Close,
                            symbol: self.symbol.clone(),
                            size: trade.size,
                            price: tick.price,
                            position_id: Some(id),
                        });
                    }
                    self.holding = None;
                }
            }
        }

        intents
    }

    pub fn status(&self) -> StrategyStatus {
        StrategyStatus {
            kind: StrategyKind::DipBuy,
            state: if self.holding.is_some() {
                "holding".into()
            } else {
                "flat".into()
            },
            trades: self.tally.trades().len(),
            wins: self.tally.wins(),
            losses: self.tally.losses(),
            realized_pnl: self.tally.realized_pnl(),
            open_positions: usize::from(self.holding.is_some()),
            open_orders: 0,
        }
    }

    /// Fold in a holding the risk manager closed on its own since the last
    /// tick.
    fn reconcile(&mut self, risk: &RiskManager) {
        if let Some(id) = self.holding {
            if risk.position(id).is_none() {
                if let Some(trade) = risk.trades().iter().find(|t| t.position_id == id) {
                    self.tally.record(trade);
                }
                self.holding = None;
            }
        }
    }
}
