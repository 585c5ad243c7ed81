//! Risk management: position sizing, exposure and drawdown limits, and the
//! balance/position/trade ledger.
//!
//! All mutations go through [`RiskManager::open_position`],
//! [`RiskManager::open_position_sized`] and [`RiskManager::close_position`].
//! A failed open leaves the ledger untouched. Opening debits the position
//! value from the balance; closing credits the value plus realized PnL, so
//! `current_balance + Σ open values == initial_balance + Σ realized PnL`
//! holds at every observation point.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::HashMap;

use crate::domain::error::QuantickError;
use crate::domain::position::{ExitReason, Position, Trade};

/// Risk limits, as fractions of the relevant balance unless noted.
#[derive(Debug, Clone, PartialEq)]
pub struct RiskConfig {
    pub initial_balance: f64,
    /// Cap on a single position's value as a fraction of portfolio value.
    pub max_position_size: f64,
    /// Cap on total open exposure as a fraction of current balance.
    pub max_total_exposure: f64,
    pub stop_loss_pct: f64,
    pub take_profit_pct: f64,
    /// Drawdown at or beyond which no new position may open.
    pub max_drawdown: f64,
    /// Fraction of portfolio value risked per trade.
    pub risk_per_trade: f64,
}

impl Default for RiskConfig {
    fn default() -> Self {
        RiskConfig {
            initial_balance: 10_000.0,
            max_position_size: 0.1,
            max_total_exposure: 0.5,
            stop_loss_pct: 0.05,
            take_profit_pct: 0.1,
            max_drawdown: 0.2,
            risk_per_trade: 0.02,
        }
    }
}

/// Outcome of risk-based sizing.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PositionSize {
    pub size: f64,
    pub value: f64,
    pub risk_amount: f64,
    /// Whether the max-position-size cap clipped the risk-based size.
    pub is_limited: bool,
}

/// Read-only portfolio snapshot with aggregate trade statistics.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PortfolioSummary {
    pub initial_balance: f64,
    pub current_balance: f64,
    pub peak_balance: f64,
    pub current_exposure: f64,
    pub drawdown: f64,
    pub max_drawdown_reached: f64,
    pub open_positions: usize,
    pub total_trades: usize,
    pub trades_won: usize,
    pub trades_lost: usize,
    pub win_rate: f64,
    pub average_win: f64,
    pub average_loss: f64,
    pub profit_factor: f64,
    pub largest_win: f64,
    pub largest_loss: f64,
    pub total_realized_pnl: f64,
}

/// Owns the account balance, open positions, and trade history for one
/// (instrument, strategy) pair.
#[derive(Debug, Clone)]
pub struct RiskManager {
    config: RiskConfig,
    current_balance: f64,
    peak_balance: f64,
    max_drawdown_reached: f64,
    positions: HashMap<u64, Position>,
    trades: Vec<Trade>,
    next_position_id: u64,
}

impl RiskManager {
    pub fn new(config: RiskConfig) -> Self {
        let balance = config.initial_balance;
        RiskManager {
            config,
            current_balance: balance,
            peak_balance: balance,
            max_drawdown_reached: 0.0,
            positions: HashMap::new(),
            trades: Vec::new(),
            next_position_id: 1,
        }
    }

    pub fn config(&self) -> &RiskConfig {
        &self.config
    }

    pub fn current_balance(&self) -> f64 {
        self.current_balance
    }

    pub fn peak_balance(&self) -> f64 {
        self.peak_balance
    }

    pub fn trades(&self) -> &[Trade] {
        &self.trades
    }

    pub fn position(&self, id: u64) -> Option<&Position> {
        self.positions.get(&id)
    }

    /// Total value committed to open positions.
    pub fn current_exposure(&self) -> f64 {
        self.positions.values().map(|p| p.value).sum()
    }

    /// Fractional decline of the current balance from its peak.
    pub fn drawdown(&self) -> f64 {
        if self.peak_balance > 0.0 {
            (self.peak_balance - self.current_balance) / self.peak_balance
        } else {
            0.0
        }
    }

    /// Size a position from the risk budget and the entry/stop distance.
    ///
    /// `portfolio_value` defaults to the current balance. Fails when the
    /// entry and stop prices coincide, since the per-unit risk would be zero.
    pub fn calculate_position_size(
        &self,
        entry_price: f64,
        stop_loss_price: f64,
        portfolio_value: Option<f64>,
    ) -> Result<PositionSize, QuantickError> {
        if entry_price == stop_loss_price {
            return Err(QuantickError::ZeroPriceDistance { price: entry_price });
        }
        let portfolio_value = portfolio_value.unwrap_or(self.current_balance);

        let risk_amount = portfolio_value * self.config.risk_per_trade;
        let raw_size = risk_amount / (entry_price - stop_loss_price).abs();
        let capped_size = self.config.max_position_size * portfolio_value / entry_price;

        let is_limited = raw_size > capped_size;
        let size = if is_limited { capped_size } else { raw_size };

        Ok(PositionSize {
            size,
            value: size * entry_price,
            risk_amount,
            is_limited,
        })
    }

    /// Check portfolio-level limits for a prospective open of `position_value`.
    pub fn can_open_position(&self, position_value: f64) -> Result<(), QuantickError> {
        let exposure = self.current_exposure();
        let limit = self.current_balance * self.config.max_total_exposure;
        if exposure + position_value > limit {
            return Err(QuantickError::ExposureExceeded {
                exposure,
                requested: position_value,
                limit,
            });
        }

        let drawdown = self.drawdown();
        if drawdown >= self.config.max_drawdown {
            return Err(QuantickError::DrawdownExceeded {
                drawdown,
                limit: self.config.max_drawdown,
            });
        }

        Ok(())
    }

    /// Open a position sized from the risk budget. On failure nothing is
    /// mutated. Stop-loss at zero disables the stop; a missing take-profit
    /// defaults to `entry * (1 + take_profit_pct)`.
    pub fn open_position(
        &mut self,
        symbol: &str,
        entry_price: f64,
        stop_loss_price: f64,
        take_profit_price: Option<f64>,
        strategy_tag: &str,
        timestamp: DateTime<Utc>,
    ) -> Result<Position, QuantickError> {
        let sizing = self.calculate_position_size(entry_price, stop_loss_price, None)?;
        self.can_open_position(sizing.value)?;
        Ok(self.insert_position(
            symbol,
            entry_price,
            stop_loss_price,
            take_profit_price,
            sizing.size,
            sizing.risk_amount,
            strategy_tag,
            timestamp,
        ))
    }

    /// Open a position of an explicit size, still subject to the exposure
    /// and drawdown limits. Used by strategies that quote or spend fixed
    /// amounts instead of sizing from the risk budget.
    pub fn open_position_sized(
        &mut self,
        symbol: &str,
        entry_price: f64,
        stop_loss_price: f64,
        take_profit_price: Option<f64>,
        size: f64,
        strategy_tag: &str,
        timestamp: DateTime<Utc>,
    ) -> Result<Position, QuantickError> {
        let value = size * entry_price;
        self.can_open_position(value)?;
        let risk_amount = (entry_price - stop_loss_price).abs() * size;
        Ok(self.insert_position(
            symbol,
            entry_price,
            stop_loss_price,
            take_profit_price,
            size,
            risk_amount,
            strategy_tag,
            timestamp,
        ))
    }

    #[allow(clippy::too_many_arguments)]
    fn insert_position(
        &mut self,
        symbol: &str,
        entry_price: f64,
        stop_loss_price: f64,
        take_profit_price: Option<f64>,
        size: f64,
        risk_amount: f64,
        strategy_tag: &str,
        timestamp: DateTime<Utc>,
    ) -> Position {
        let id = self.next_position_id;
        self.next_position_id += 1;

        let take_profit_price = take_profit_price
            .unwrap_or_else(|| entry_price * (1.0 + self.config.take_profit_pct));

        let position = Position {
            id,
            symbol: symbol.to_string(),
            entry_price,
            stop_loss_price,
            take_profit_price,
            size,
            value: size * entry_price,
            strategy_tag: strategy_tag.to_string(),
            risk_amount,
            opened_at: timestamp,
        };

        self.current_balance -= position.value;
        self.note_drawdown();
        self.positions.insert(id, position.clone());
        position
    }

    /// Close an open position at `exit_price`, crediting the balance with
    /// the position value plus realized PnL and appending a [`Trade`].
    pub fn close_position(
        &mut self,
        position_id: u64,
        exit_price: f64,
        reason: ExitReason,
        timestamp: DateTime<Utc>,
    ) -> Result<Trade, QuantickError> {
        let position = self
            .positions
            .remove(&position_id)
            .ok_or(QuantickError::PositionNotFound { id: position_id })?;

        let realized_pnl = (exit_price - position.entry_price) * position.size;
        self.current_balance += position.value + realized_pnl;
        if self.current_balance > self.peak_balance {
            self.peak_balance = self.current_balance;
        }
        self.note_drawdown();

        let realized_pnl_pct = if position.value > 0.0 {
            realized_pnl / position.value * 100.0
        } else {
            0.0
        };

        let trade = Trade {
            position_id: position.id,
            symbol: position.symbol,
            strategy_tag: position.strategy_tag,
            size: position.size,
            entry_price: position.entry_price,
            exit_price,
            realized_pnl,
            realized_pnl_pct,
            exit_reason: reason,
            opened_at: position.opened_at,
            closed_at: timestamp,
        };
        self.trades.push(trade.clone());
        Ok(trade)
    }

    /// Sweep open positions against `current_price`, closing any whose
    /// stop-loss or take-profit is crossed. Each triggered position closes
    /// exactly once; a second sweep at the same price is a no-op for it.
    pub fn check_risk_levels(
        &mut self,
        current_price: f64,
        timestamp: DateTime<Utc>,
    ) -> Vec<Trade> {
        let triggered: Vec<(u64, ExitReason)> = self
            .positions
            .values()
            .filter_map(|p| {
                if p.stop_loss_hit(current_price) {
                    Some((p.id, ExitReason::StopLoss))
                } else if p.take_profit_hit(current_price) {
                    Some((p.id, ExitReason::TakeProfit))
                } else {
                    None
                }
            })
            .collect();

        let mut closed = Vec::with_capacity(triggered.len());
        for (id, reason) in triggered {
            if let Ok(trade) = self.close_position(id, current_price, reason, timestamp) {
                closed.push(trade);
            }
        }
        closed
    }

    /// Read-only snapshot of open positions.
    pub fn active_positions(&self) -> Vec<Position> {
        let mut positions: Vec<Position> = self.positions.values().cloned().collect();
        positions.sort_by_key(|p| p.id);
        positions
    }

    /// Aggregate statistics recomputed over the full trade history.
    pub fn portfolio_summary(&self) -> PortfolioSummary {
        let mut trades_won = 0usize;
        let mut trades_lost = 0usize;
        let mut total_wins = 0.0_f64;
        let mut total_losses = 0.0_f64;
        let mut largest_win = 0.0_f64;
        let mut largest_loss = 0.0_f64;
        let mut total_realized_pnl = 0.0_f64;

        for trade in &self.trades {
            let pnl = trade.realized_pnl;
            total_realized_pnl += pnl;
            if pnl > 0.0 {
                trades_won += 1;
                total_wins += pnl;
                largest_win = largest_win.max(pnl);
            } else if pnl < 0.0 {
                trades_lost += 1;
                total_losses += pnl.abs();
                largest_loss = largest_loss.max(pnl.abs());
            }
        }

        let total_trades = self.trades.len();
        let win_rate = if total_trades > 0 {
            trades_won as f64 / total_trades as f64
        } else {
            0.0
        };
        let average_win = if trades_won > 0 {
            total_wins / trades_won as f64
        } else {
            0.0
        };
        let average_loss = if trades_lost > 0 {
            total_losses / trades_lost as f64
        } else {
            0.0
        };
        let profit_factor = if total_losses > 0.0 {
            total_wins / total_losses
        } else if total_wins > 0.0 {
            f64::INFINITY
        } else {
            0.0
        };

        PortfolioSummary {
            initial_balance: self.config.initial_balance,
            current_balance: self.current_balance,
            peak_balance: self.peak_balance,
            current_exposure: self.current_exposure(),
            drawdown: self.drawdown(),
            max_drawdown_reached: self.max_drawdown_reached,
            open_positions: self.positions.len(),
            total_trades,
            trades_won,
            trades_lost,
            win_rate,
            average_win,
            average_loss,
            profit_factor,
            largest_win,
            largest_loss,
            total_realized_pnl,
        }
    }

    fn note_drawdown(&mut self) {
        let drawdown = self.drawdown();
        if drawdown > self.max_drawdown_reached {
            self.max_drawdown_reached = drawdown;
        }
    }
}
