//! Market-making strategy: continuous quoting instead of open/close cycles.
//!
//! Each tick requotes around the current price at `spread` on both sides,
//! fills any outstanding quote the price has crossed, and places fresh
//! quotes while under `max_orders` per side. A filled buy opens a
//! fixed-size position through the risk manager; a filled sell closes the
//! oldest inventory position, realizing the spread as PnL. Positions carry
//! no stop or take-profit levels, so the risk sweep never touches them.

use crate::domain::analysis::TechnicalAnalysis;
use crate::domain::position::ExitReason;
use crate::domain::risk::RiskManager;
use crate::domain::sample::PriceSample;
use crate::domain::strategy::{
    ExecutionIntent, IntentAction, StrategyKind, StrategyStatus, TradeTally,
};
use std::collections::VecDeque;

const STRATEGY_TAG: &str = "market_making";

#[derive(Debug, Clone, PartialEq)]
pub struct MarketMakingConfig {
    /// Half-spread as a fraction of price: quotes at price*(1 -/+ spread).
    pub spread: f64,
    /// Fixed size of every quote, in units of the instrument.
    pub order_size: f64,
    /// Maximum outstanding quotes per side.
    pub max_orders: usize,
}

impl Default for MarketMakingConfig {
    fn default() -> Self {
        MarketMakingConfig {
            spread: 0.002,
            order_size: 1.0,
            max_orders: 5,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum QuoteSide {
    Buy,
    Sell,
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct QuoteOrder {
    side: QuoteSide,
    price: f64,
    size: f64,
}

#[derive(Debug, Clone)]
pub struct MarketMakingStrategy {
    symbol: String,
    config: MarketMakingConfig,
    orders: Vec<QuoteOrder>,
    /// Open position ids in fill order; sells close the oldest first.
    inventory: VecDeque<u64>,
    spread_profit: f64,
    tally: TradeTally,
}

impl MarketMakingStrategy {
    pub fn new(symbol: &str, config: MarketMakingConfig) -> Self {
        MarketMakingStrategy {
            symbol: symbol.to_string(),
            config,
            orders: Vec::new(),
            inventory: VecDeque::new(),
            spread_profit: 0.0,
            tally: TradeTally::default(),
        }
    }

    pub fn spread_profit(&self) -> f64 {
        self.spread_profit
    }

    pub fn evaluate(
        &mut self,
        tick: &PriceSample,
        _analysis: &TechnicalAnalysis,
        risk: &mut RiskManager,
    ) -> Vec<ExecutionIntent> {
        let mut intents = Vec::new();

        self.fill_crossed_orders(tick, risk, &mut intents);
        self.place_quotes(tick.price, risk);

        intents
    }

    pub fn status(&self) -> StrategyStatus {
        StrategyStatus {
            kind: StrategyKind::MarketMaking,
            state: "quoting".into(),
            trades: self.tally.trades().len(),
            wins: self.tally.wins(),
            losses: self.tally.losses(),
            realized_pnl: self.tally.realized_pnl(),
            open_positions: self.inventory.len(),
            open_orders: self.orders.len(),
        }
    }

    /// Fill every outstanding quote the tick price has crossed. Unfillable
    /// crossed quotes (a sell with no inventory, a buy the risk manager
    /// rejects) stay on the book for a later tick.
    fn fill_crossed_orders(
        &mut self,
        tick: &PriceSample,
        risk: &mut RiskManager,
        intents: &mut Vec<ExecutionIntent>,
    ) {
        let mut remaining = Vec::with_capacity(self.orders.len());

        for order in std::mem::take(&mut self.orders) {
            let filled = match order.side {
                QuoteSide::Buy if tick.price <= order.price => {
                    self.fill_buy(&order, tick, risk, intents)
                }
                QuoteSide::Sell if tick.price >= order.price => {
                    self.fill_sell(&order, tick, risk, intents)
                }
                _ => false,
            };
            if !filled {
                remaining.push(order);
            }
        }
        self.orders = remaining;
    }

    fn fill_buy(
        &mut self,
        order: &QuoteOrder,
        tick: &PriceSample,
        risk: &mut RiskManager,
        intents: &mut Vec<ExecutionIntent>,
    ) -> bool {
        // No stop or take-profit: exits happen only through sell quotes.
        match risk.open_position_sized(
            &self.symbol,
            order.price,
            0.0,
            Some(0.0),
            order.size,
            STRATEGY_TAG,
            tick.timestamp,
        ) {
            Ok(position) => {
                self.inventory.push_back(position.id);
                intents.push(ExecutionIntent {
                    action: IntentAction::Open,
                    symbol: self.symbol.clone(),
                    size: order.size,
                    price: order.price,
                    position_id: Some(position.id),
                });
                true
            }
            Err(_) => false,
        }
    }

    fn fill_sell(
        &mut self,
        order: &QuoteOrder,
        tick: &PriceSample,
        risk: &mut RiskManager,
        intents: &mut Vec<ExecutionIntent>,
    ) -> bool {
        let Some(&oldest) = self.inventory.front() else {
            return false;
        };
        match risk.close_position(oldest, order.price, ExitReason::QuoteFill, tick.timestamp) {
            Ok(trade) => {
                self.inventory.pop_front();
                self.spread_profit += trade.realized_pnl;
                self.tally.record(&trade);
                intents.push(ExecutionIntent {
                    action: IntentAction::Close,
                    symbol: self.symbol.clone(),
                    size: trade.size,
                    price: order.price,
                    position_id: Some(oldest),
                });
                true
            }
            Err(_) => {
                self.inventory.pop_front();
                false
            }
        }
    }

    /// Requote around the current price, one new quote per side per tick,
    /// while under `max_orders` and balance/inventory allow.
    fn place_quotes(&mut self, price: f64, risk: &RiskManager) {
        let buy_quote = price * (1.0 - self.config.spread);
        let sell_quote = price * (1.0 + self.config.spread);

        let buys = self
            .orders
            .iter()
            .filter(|o| o.side == QuoteSide::Buy)
            .count();
        let sells = self
            .orders
            .iter()
            .filter(|o| o.side == QuoteSide::Sell)
            .count();

        if buys < self.config.max_orders
            && self.config.order_size * buy_quote <= risk.current_balance()
        {
            self.orders.push(QuoteOrder {
                side: QuoteSide::Buy,
                price: buy_quote,
                size: self.config.order_size,
            });
        }

        // A sell quote needs inventory not already promised to another sell.
        if sells < self.config.max_orders && self.inventory.len() > sells {
            self.orders.push(QuoteOrder {
                side: QuoteSide::Sell,
                price: sell_quote,
                size: self.config.order_size,
            });
        }
    }
}
