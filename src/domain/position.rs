//! Positions and the trades they close into.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ExitReason {
    StopLoss,
    TakeProfit,
    Signal,
    Recovery,
    QuoteFill,
    Manual,
}

impl fmt::Display for ExitReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ExitReason::StopLoss => "stop_loss",
            ExitReason::TakeProfit => "take_profit",
            ExitReason::Signal => "signal",
            ExitReason::Recovery => "recovery",
            ExitReason::QuoteFill => "quote_fill",
            ExitReason::Manual => "manual",
        };
        f.write_str(name)
    }
}

/// An open, sized exposure. Created by the risk manager on open and owned by
/// it until closed; strategies hold only the id as a back-reference.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Position {
    pub id: u64,
    pub symbol: String,
    pub entry_price: f64,
    pub stop_loss_price: f64,
    pub take_profit_price: f64,
    pub size: f64,
    pub value: f64,
    pub strategy_tag: String,
    pub risk_amount: f64,
    pub opened_at: DateTime<Utc>,
}

impl Position {
    pub fn unrealized_pnl(&self, price: f64) -> f64 {
        (price - self.entry_price) * self.size
    }

    pub fn stop_loss_hit(&self, price: f64) -> bool {
        self.stop_loss_price > 0.0 && price <= self.stop_loss_price
    }

    pub fn take_profit_hit(&self, price: f64) -> bool {
        self.take_profit_price > 0.0 && price >= self.take_profit_price
    }
}

/// The immutable record of a closed position.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Trade {
    pub position_id: u64,
    pub symbol: String,
    pub strategy_tag: String,
    pub size: f64,
    pub entry_price: f64,
    pub exit_price: f64,
    pub realized_pnl: f64,
    pub realized_pnl_pct: f64,
    pub exit_reason: ExitReason,
    pub opened_at: DateTime<Utc>,
    pub closed_at: DateTime<Utc>,
}
