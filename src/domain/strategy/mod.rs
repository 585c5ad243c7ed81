//! Strategy variants and the types they share.
//!
//! Three state machines with one lifecycle shape: consume a tick, decide,
//! execute through the shared risk manager, report status. The closed set is
//! modelled as [`StrategyVariant`]; collaborators (technical analysis, risk
//! manager) are passed in per tick rather than owned.

pub mod momentum;
pub mod market_making;
pub mod dip_buy;

use serde::Serialize;
use std::fmt;

use crate::domain::analysis::TechnicalAnalysis;
use crate::domain::error::QuantickError;
use crate::domain::position::Trade;
use crate::domain::risk::RiskManager;
use crate::domain::sample::PriceSample;

pub use dip_buy::{DipBuyConfig, DipBuyStrategy};
pub use market_making::{MarketMakingConfig, MarketMakingStrategy};
pub use momentum::{MomentumConfig, MomentumStrategy};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StrategyKind {
    Momentum,
    MarketMaking,
    DipBuy,
}

impl StrategyKind {
    pub fn parse(name: &str) -> Result<Self, QuantickError> {
        match name {
            "momentum" => Ok(StrategyKind::Momentum),
            "market_making" => Ok(StrategyKind::MarketMaking),
            "dip_buy" => Ok(StrategyKind::DipBuy),
            _ => Err(QuantickError::UnknownStrategy {
                name: name.to_string(),
            }),
        }
    }
}

impl fmt::Display for StrategyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            StrategyKind::Momentum => "momentum",
            StrategyKind::MarketMaking => "market_making",
            StrategyKind::DipBuy => "dip_buy",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum IntentAction {
    Open,
    Close,
}

/// What a strategy decided and already applied to its own ledger. The
/// excluded execution layer translates these into real orders; nothing
/// further is required of the engine on confirmation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExecutionIntent {
    pub action: IntentAction,
    pub symbol: String,
    pub size: f64,
    pub price: f64,
    pub position_id: Option<u64>,
}

/// Serializable strategy status snapshot.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StrategyStatus {
    pub kind: StrategyKind,
    pub state: String,
    pub trades: usize,
    pub wins: usize,
    pub losses: usize,
    pub realized_pnl: f64,
    pub open_positions: usize,
    pub open_orders: usize,
}

/// Per-strategy trade history and win/loss tally, kept alongside the risk
/// manager's ledger.
#[derive(Debug, Clone, Default)]
pub struct TradeTally {
    trades: Vec<Trade>,
    wins: usize,
    losses: usize,
    realized_pnl: f64,
}

impl TradeTally {
    pub fn record(&mut self, trade: &Trade) {
        if trade.realized_pnl > 0.0 {
            self.wins += 1;
        } else if trade.realized_pnl < 0.0 {
            self.losses += 1;
        }
        self.realized_pnl += trade.realized_pnl;
        self.trades.push(trade.clone());
    }

    pub fn trades(&self) -> &[Trade] {
        &self.trades
    }

    pub fn wins(&self) -> usize {
        self.wins
    }

    pub fn losses(&self) -> usize {
        self.losses
    }

    pub fn realized_pnl(&self) -> f64 {
        self.realized_pnl
    }
}

/// Closed set of strategy state machines.
#[derive(Debug, Clone)]
pub enum StrategyVariant {
    Momentum(MomentumStrategy),
    MarketMaking(MarketMakingStrategy),
    DipBuy(DipBuyStrategy),
}

impl StrategyVariant {
    pub fn kind(&self) -> StrategyKind {
        match self {
            StrategyVariant::Momentum(_) => StrategyKind::Momentum,
            StrategyVariant::MarketMaking(_) => StrategyKind::MarketMaking,
            StrategyVariant::DipBuy(_) => StrategyKind::DipBuy,
        }
    }

    /// Process one tick: decide and execute through the risk manager,
    /// returning the intents describing what was executed.
    pub fn evaluate(
        &mut self,
        tick: &PriceSample,
        analysis: &TechnicalAnalysis,
        risk: &mut RiskManager,
    ) -> Vec<ExecutionIntent> {
        match self {
            StrategyVariant::Momentum(s) => s.evaluate(tick, analysis, risk),
            StrategyVariant::MarketMaking(s) => s.evaluate(tick, analysis, risk),
            StrategyVariant::DipBuy(s) => s.evaluate(tick, analysis, risk),
        }
    }

    pub fn status(&self) -> StrategyStatus {
        match self {
            StrategyVariant::Momentum(s) => s.status(),
            StrategyVariant::MarketMaking(s) => s.status(),
            StrategyVariant::DipBuy(s) => s.status(),
        }
    }
}
