//! The engine: a registry of independent (symbol, strategy) cells.
//!
//! Each cell owns its own technical analysis history, risk manager and
//! strategy state machine. A tick for a symbol is fanned out to every
//! running cell registered for that symbol; cells never share state, so
//! two strategies on the same symbol keep separate ledgers.

use chrono::{DateTime, Utc};
use std::collections::HashMap;

use crate::domain::analysis::{IndicatorSnapshot, TechnicalAnalysis};
use crate::domain::error::QuantickError;
use crate::domain::position::Position;
use crate::domain::risk::{PortfolioSummary, RiskConfig, RiskManager};
use crate::domain::sample::PriceSample;
use crate::domain::strategy::{ExecutionIntent, StrategyKind, StrategyStatus, StrategyVariant};

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct EngineKey {
    symbol: String,
    strategy: StrategyKind,
}

#[derive(Debug)]
struct EngineCell {
    analysis: TechnicalAnalysis,
    risk: RiskManager,
    strategy: StrategyVariant,
    stopped: bool,
}

/// Registry and tick dispatcher for (symbol, strategy) cells.
#[derive(Debug, Default)]
pub struct Engine {
    cells: HashMap<EngineKey, EngineCell>,
}

impl Engine {
    pub fn new() -> Self {
        Engine::default()
    }

    /// Register a strategy for a symbol with its own risk budget. A second
    /// registration for the same pair replaces the first.
    pub fn register(&mut self, symbol: &str, strategy: StrategyVariant, risk_config: RiskConfig) {
        let key = EngineKey {
            symbol: symbol.to_string(),
            strategy: strategy.kind(),
        };
        self.cells.insert(
            key,
            EngineCell {
                analysis: TechnicalAnalysis::new(),
                risk: RiskManager::new(risk_config),
                strategy,
                stopped: false,
            },
        );
    }

    /// Feed one tick to every running cell for `symbol`. For each cell the
    /// order is fixed: record the sample, sweep stop/take-profit levels,
    /// then let the strategy act.
    pub fn on_tick(
        &mut self,
        symbol: &str,
        price: f64,
        volume: f64,
        timestamp: Option<DateTime<Utc>>,
    ) -> Vec<ExecutionIntent> {
        let stamp = timestamp.unwrap_or_else(Utc::now);
        let sample = PriceSample {
            price,
            volume,
            timestamp: stamp,
        };

        let mut intents = Vec::new();
        for (key, cell) in self.cells.iter_mut() {
            if key.symbol != symbol || cell.stopped {
                continue;
            }
            cell.analysis.add_sample(price, volume, Some(stamp));
            cell.risk.check_risk_levels(price, stamp);
            intents.extend(cell.strategy.evaluate(&sample, &cell.analysis, &mut cell.risk));
        }
        intents
    }

    /// Stop a cell: its history and positions are kept but ticks no longer
    /// reach it.
    pub fn stop(&mut self, symbol: &str, strategy: StrategyKind) -> Result<(), QuantickError> {
        self.cell_mut(symbol, strategy)?.stopped = true;
        Ok(())
    }

    pub fn resume(&mut self, symbol: &str, strategy: StrategyKind) -> Result<(), QuantickError> {
        self.cell_mut(symbol, strategy)?.stopped = false;
        Ok(())
    }

    pub fn is_stopped(&self, symbol: &str, strategy: StrategyKind) -> Result<bool, QuantickError> {
        Ok(self.cell(symbol, strategy)?.stopped)
    }

    pub fn portfolio_summary(
        &self,
        symbol: &str,
        strategy: StrategyKind,
    ) -> Result<PortfolioSummary, QuantickError> {
        Ok(self.cell(symbol, strategy)?.risk.portfolio_summary())
    }

    pub fn active_positions(
        &self,
        symbol: &str,
        strategy: StrategyKind,
    ) -> Result<Vec<Position>, QuantickError> {
        Ok(self.cell(symbol, strategy)?.risk.active_positions())
    }

    pub fn snapshot(
        &self,
        symbol: &str,
        strategy: StrategyKind,
    ) -> Result<IndicatorSnapshot, QuantickError> {
        Ok(self.cell(symbol, strategy)?.analysis.snapshot())
    }

    pub fn status(
        &self,
        symbol: &str,
        strategy: StrategyKind,
    ) -> Result<StrategyStatus, QuantickError> {
        Ok(self.cell(symbol, strategy)?.strategy.status())
    }

    fn cell(&self, symbol: &str, strategy: StrategyKind) -> Result<&EngineCell, QuantickError> {
        let key = EngineKey {
            symbol: symbol.to_string(),
            strategy,
        };
        self.cells
            .get(&key)
            .ok_or_else(|| QuantickError::UnknownInstrument {
                symbol: symbol.to_string(),
                strategy: strategy.to_string(),
            })
    }

    fn cell_mut(
        &mut self,
        symbol: &str,
        strategy: StrategyKind,
    ) -> Result<&mut EngineCell, QuantickError> {
        let key = EngineKey {
            symbol: symbol.to_string(),
            strategy,
        };
        self.cells
            .get_mut(&key)
            .ok_or_else(|| QuantickError::UnknownInstrument {
                symbol: symbol.to_string(),
                strategy: strategy.to_string(),
            })
    }
}
