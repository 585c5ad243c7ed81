//! Full-pipeline tests: tick series replayed through the engine.
//!
//! Covers each strategy variant end to end (mock tick source, real
//! analysis/risk/strategy wiring), stop/resume semantics, multi-cell
//! isolation, and the stop-loss sweep reaching a strategy-held position.

mod common;

use common::*;
use quantick::domain::engine::Engine;
use quantick::domain::error::QuantickError;
use quantick::domain::risk::RiskConfig;
use quantick::domain::strategy::{
    DipBuyConfig, DipBuyStrategy, MarketMakingConfig, MarketMakingStrategy, MomentumConfig,
    MomentumStrategy, StrategyKind, StrategyVariant,
};
use quantick::ports::tick_port::TickPort;

fn replay(engine: &mut Engine, symbol: &str, ticks: &[PriceSample]) -> usize {
    let mut intents = 0;
    for tick in ticks {
        intents += engine
            .on_tick(symbol, tick.price, tick.volume, Some(tick.timestamp))
            .len();
    }
    intents
}

mod dip_buy_pipeline {
    use super::*;

    fn dip_engine() -> Engine {
        let mut engine = Engine::new();
        engine.register(
            "SOL",
            StrategyVariant::DipBuy(DipBuyStrategy::new("SOL", DipBuyConfig::default())),
            RiskConfig::default(),
        );
        engine
    }

    #[test]
    fn dip_and_recovery_round_trip() {
        let port = MockTickPort::new().with_ticks(
            "SOL",
            tick_series(&[
                (100.0, 1000.0),
                (97.0, 1000.0),
                (94.0, 1500.0), // 6% below the rolling high: buy
                (96.0, 1200.0),
                (98.5, 1200.0), // 98.5% of the high: sell
            ]),
        );
        let ticks = port.fetch_ticks("SOL").unwrap();

        let mut engine = dip_engine();
        let intents = replay(&mut engine, "SOL", &ticks);
        assert_eq!(intents, 2); // one open, one close

        let summary = engine
            .portfolio_summary("SOL", StrategyKind::DipBuy)
            .unwrap();
        assert_eq!(summary.total_trades, 1);
        assert_eq!(summary.trades_won, 1);
        assert!(summary.total_realized_pnl > 0.0);
        assert!(summary.current_balance > 10_000.0);
        assert_eq!(summary.open_positions, 0);

        let status = engine.status("SOL", StrategyKind::DipBuy).unwrap();
        assert_eq!(status.state, "flat");
        assert_eq!(status.wins, 1);
    }

    #[test]
    fn no_trade_without_a_dip() {
        let port = MockTickPort::new().with_ticks(
            "SOL",
            tick_series(&[(100.0, 1000.0), (99.0, 1000.0), (98.0, 1000.0), (97.0, 1000.0)]),
        );
        let ticks = port.fetch_ticks("SOL").unwrap();

        let mut engine = dip_engine();
        assert_eq!(replay(&mut engine, "SOL", &ticks), 0);
        let summary = engine
            .portfolio_summary("SOL", StrategyKind::DipBuy)
            .unwrap();
        assert_eq!(summary.total_trades, 0);
        assert_eq!(summary.current_balance, 10_000.0);
    }

    #[test]
    fn stop_halts_trading_and_resume_restores_it() {
        let mut engine = dip_engine();
        engine.on_tick("SOL", 100.0, 1000.0, Some(ts(0)));
        engine.stop("SOL", StrategyKind::DipBuy).unwrap();

        // A clear dip while stopped does nothing.
        let intents = engine.on_tick("SOL", 90.0, 1000.0, Some(ts(1)));
        assert!(intents.is_empty());
        assert!(engine.is_stopped("SOL", StrategyKind::DipBuy).unwrap());

        engine.resume("SOL", StrategyKind::DipBuy).unwrap();
        let intents = engine.on_tick("SOL", 90.0, 1000.0, Some(ts(2)));
        assert_eq!(intents.len(), 1);
    }
}

mod market_making_pipeline {
    use super::*;

    #[test]
    fn oscillating_prices_fill_both_sides() {
        let mut pairs = Vec::new();
        for i in 0..60 {
            // Swings wide enough to cross the 0.2% quotes every tick.
            let price = if i % 2 == 0 { 100.0 } else { 101.0 };
            pairs.push((price, 1000.0));
        }
        let ticks = tick_series(&pairs);

        let mut engine = Engine::new();
        engine.register(
            "SOL",
            StrategyVariant::MarketMaking(MarketMakingStrategy::new(
                "SOL",
                MarketMakingConfig::default(),
            )),
            RiskConfig::default(),
        );
        let intents = replay(&mut engine, "SOL", &ticks);
        assert!(intents > 0);

        let summary = engine
            .portfolio_summary("SOL", StrategyKind::MarketMaking)
            .unwrap();
        assert!(summary.total_trades > 0);

        // Balance plus open exposure minus realized PnL equals the start.
        let identity =
            summary.current_balance + summary.current_exposure - summary.total_realized_pnl;
        assert!((identity - 10_000.0).abs() < 1e-6);

        let status = engine.status("SOL", StrategyKind::MarketMaking).unwrap();
        assert_eq!(status.state, "quoting");
    }
}

mod momentum_pipeline {
    use super::*;

    fn momentum_engine() -> Engine {
        let mut engine = Engine::new();
        engine.register(
            "SOL",
            StrategyVariant::Momentum(MomentumStrategy::new("SOL", MomentumConfig::default())),
            RiskConfig::default(),
        );
        engine
    }

    /// Choppy warmup then a zigzag surge with doubling volume, stopping as
    /// soon as the strategy goes long. Returns the next free tick index.
    fn surge_until_long(engine: &mut Engine) -> usize {
        let mut tick_no = 0;
        for i in 0..55 {
            engine.on_tick("SOL", 100.0 + (i % 4) as f64 * 0.2, 1000.0, Some(ts(tick_no)));
            tick_no += 1;
        }
        let mut price = 100.6;
        let mut volume = 2000.0;
        for i in 0..30 {
            if i % 2 == 0 {
                price += 2.0;
            } else {
                price -= 1.0;
            }
            volume *= 2.0;
            engine.on_tick("SOL", price, volume, Some(ts(tick_no)));
            tick_no += 1;
            let status = engine.status("SOL", StrategyKind::Momentum).unwrap();
            if status.state == "long" {
                return tick_no;
            }
        }
        panic!("surge never opened a position");
    }

    #[test]
    fn surge_opens_a_long() {
        let mut engine = momentum_engine();
        surge_until_long(&mut engine);

        let status = engine.status("SOL", StrategyKind::Momentum).unwrap();
        assert_eq!(status.state, "long");
        let positions = engine
            .active_positions("SOL", StrategyKind::Momentum)
            .unwrap();
        assert_eq!(positions.len(), 1);
        assert_eq!(positions[0].strategy_tag, "momentum");
        assert!(positions[0].stop_loss_price > 0.0);
    }

    #[test]
    fn crash_through_stop_is_swept_and_reconciled() {
        let mut engine = momentum_engine();
        let next = surge_until_long(&mut engine);

        let entry = engine
            .active_positions("SOL", StrategyKind::Momentum)
            .unwrap()[0]
            .entry_price;
        engine.on_tick("SOL", entry * 0.9, 1000.0, Some(ts(next)));

        let status = engine.status("SOL", StrategyKind::Momentum).unwrap();
        assert_eq!(status.state, "flat");
        assert_eq!(status.trades, 1);
        assert_eq!(status.losses, 1);

        let summary = engine
            .portfolio_summary("SOL", StrategyKind::Momentum)
            .unwrap();
        assert_eq!(summary.total_trades, 1);
        assert!(summary.total_realized_pnl < 0.0);
        assert!(summary.max_drawdown_reached > 0.0);
    }
}

mod cell_isolation {
    use super::*;

    #[test]
    fn symbols_do_not_cross_feed() {
        let mut engine = Engine::new();
        engine.register(
            "SOL",
            StrategyVariant::DipBuy(DipBuyStrategy::new("SOL", DipBuyConfig::default())),
            RiskConfig::default(),
        );
        engine.register(
            "ETH",
            StrategyVariant::DipBuy(DipBuyStrategy::new("ETH", DipBuyConfig::default())),
            RiskConfig::default(),
        );

        engine.on_tick("SOL", 100.0, 1000.0, Some(ts(0)));
        engine.on_tick("ETH", 2000.0, 500.0, Some(ts(1)));
        engine.on_tick("SOL", 94.0, 1000.0, Some(ts(2)));

        // Only the SOL cell saw the dip.
        assert_eq!(
            engine.status("SOL", StrategyKind::DipBuy).unwrap().state,
            "holding"
        );
        assert_eq!(
            engine.status("ETH", StrategyKind::DipBuy).unwrap().state,
            "flat"
        );
        assert_eq!(
            engine.snapshot("ETH", StrategyKind::DipBuy).unwrap().sample_count,
            1
        );
    }

    #[test]
    fn unknown_cell_reads_fail() {
        let engine = Engine::new();
        let err = engine
            .portfolio_summary("SOL", StrategyKind::Momentum)
            .unwrap_err();
        assert!(matches!(err, QuantickError::UnknownInstrument { .. }));
    }
}
