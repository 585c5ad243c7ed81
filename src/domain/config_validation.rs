//! Builds and validates engine configuration from a config source.
//!
//! Every builder reads its section with the compiled-in defaults, then
//! checks ranges before handing the config to the engine. A missing section
//! simply yields the defaults; a present-but-out-of-range value is an error.

use crate::domain::error::QuantickError;
use crate::domain::risk::RiskConfig;
use crate::domain::strategy::{DipBuyConfig, MarketMakingConfig, MomentumConfig};
use crate::ports::config_port::ConfigPort;

fn invalid(section: &str, key: &str, reason: &str) -> QuantickError {
    QuantickError::ConfigInvalid {
        section: section.to_string(),
        key: key.to_string(),
        reason: reason.to_string(),
    }
}

pub fn build_risk_config(config: &dyn ConfigPort) -> Result<RiskConfig, QuantickError> {
    let defaults = RiskConfig::default();
    let built = RiskConfig {
        initial_balance: config.get_double("risk", "initial_balance", defaults.initial_balance),
        max_position_size: config.get_double(
            "risk",
            "max_position_size",
            defaults.max_position_size,
        ),
        max_total_exposure: config.get_double(
            "risk",
            "max_total_exposure",
            defaults.max_total_exposure,
        ),
        stop_loss_pct: config.get_double("risk", "stop_loss_pct", defaults.stop_loss_pct),
        take_profit_pct: config.get_double("risk", "take_profit_pct", defaults.take_profit_pct),
        max_drawdown: config.get_double("risk", "max_drawdown", defaults.max_drawdown),
        risk_per_trade: config.get_double("risk", "risk_per_trade", defaults.risk_per_trade),
    };

    if built.initial_balance <= 0.0 {
        return Err(invalid(
            "risk",
            "initial_balance",
            "initial_balance must be positive",
        ));
    }
    if built.max_position_size <= 0.0 || built.max_position_size > 1.0 {
        return Err(invalid(
            "risk",
            "max_position_size",
            "max_position_size must be between 0 and 1",
        ));
    }
    if built.max_total_exposure <= 0.0 || built.max_total_exposure > 1.0 {
        return Err(invalid(
            "risk",
            "max_total_exposure",
            "max_total_exposure must be between 0 and 1",
        ));
    }
    if built.stop_loss_pct < 0.0 || built.stop_loss_pct >= 1.0 {
        return Err(invalid(
            "risk",
            "stop_loss_pct",
            "stop_loss_pct must be between 0 and 1",
        ));
    }
    if built.take_profit_pct < 0.0 {
        return Err(invalid(
            "risk",
            "take_profit_pct",
            "take_profit_pct must be non-negative",
        ));
    }
    if built.max_drawdown <= 0.0 || built.max_drawdown > 1.0 {
        return Err(invalid(
            "risk",
            "max_drawdown",
            "max_drawdown must be between 0 and 1",
        ));
    }
    if built.risk_per_trade <= 0.0 || built.risk_per_trade > 1.0 {
        return Err(invalid(
            "risk",
            "risk_per_trade",
            "risk_per_trade must be between 0 and 1",
        ));
    }
    Ok(built)
}

pub fn build_momentum_config(config: &dyn ConfigPort) -> Result<MomentumConfig, QuantickError> {
    let defaults = MomentumConfig::default();
    let lookback = config.get_int("momentum", "lookback", defaults.lookback as i64);
    if lookback < 2 {
        return Err(invalid("momentum", "lookback", "lookback must be at least 2"));
    }
    let built = MomentumConfig {
        lookback: lookback as usize,
        momentum_threshold: config.get_double(
            "momentum",
            "momentum_threshold",
            defaults.momentum_threshold,
        ),
        volume_threshold: config.get_double(
            "momentum",
            "volume_threshold",
            defaults.volume_threshold,
        ),
    };

    if built.momentum_threshold <= 0.0 {
        return Err(invalid(
            "momentum",
            "momentum_threshold",
            "momentum_threshold must be positive",
        ));
    }
    if built.volume_threshold <= 0.0 {
        return Err(invalid(
            "momentum",
            "volume_threshold",
            "volume_threshold must be positive",
        ));
    }
    Ok(built)
}

pub fn build_market_making_config(
    config: &dyn ConfigPort,
) -> Result<MarketMakingConfig, QuantickError> {
    let defaults = MarketMakingConfig::default();
    let max_orders = config.get_int("market_making", "max_orders", defaults.max_orders as i64);
    if max_orders < 1 {
        return Err(invalid(
            "market_making",
            "max_orders",
            "max_orders must be at least 1",
        ));
    }
    let built = MarketMakingConfig {
        spread: config.get_double("market_making", "spread", defaults.spread),
        order_size: config.get_double("market_making", "order_size", defaults.order_size),
        max_orders: max_orders as usize,
    };

    if built.spread <= 0.0 || built.spread >= 1.0 {
        return Err(invalid(
            "market_making",
            "spread",
            "spread must be between 0 and 1",
        ));
    }
    if built.order_size <= 0.0 {
        return Err(invalid(
            "market_making",
            "order_size",
            "order_size must be positive",
        ));
    }
    Ok(built)
}

pub fn build_dip_buy_config(config: &dyn ConfigPort) -> Result<DipBuyConfig, QuantickError> {
    let defaults = DipBuyConfig::default();
    let lookback = config.get_int("dip_buy", "lookback", defaults.lookback as i64);
    if lookback < 2 {
        return Err(invalid("dip_buy", "lookback", "lookback must be at least 2"));
    }
    let built = DipBuyConfig {
        lookback: lookback as usize,
        dip_threshold: config.get_double("dip_buy", "dip_threshold", defaults.dip_threshold),
        recovery_threshold: config.get_double(
            "dip_buy",
            "recovery_threshold",
            defaults.recovery_threshold,
        ),
        spend_fraction: config.get_double("dip_buy", "spend_fraction", defaults.spend_fraction),
    };

    if built.dip_threshold <= 0.0 || built.dip_threshold >= 1.0 {
        return Err(invalid(
            "dip_buy",
            "dip_threshold",
            "dip_threshold must be between 0 and 1",
        ));
    }
    if built.recovery_threshold <= 0.0 || built.recovery_threshold > 1.0 {
        return Err(invalid(
            "dip_buy",
            "recovery_threshold",
            "recovery_threshold must be between 0 and 1",
        ));
    }
    if built.spend_fraction <= 0.0 || built.spend_fraction > 1.0 {
        return Err(invalid(
            "dip_buy",
            "spend_fraction",
            "spend_fraction must be between 0 and 1",
        ));
    }
    Ok(built)
}

/// Validate every section at once, as the `validate` command does.
pub fn validate_all(config: &dyn ConfigPort) -> Result<(), QuantickError> {
    build_risk_config(config)?;
    build_momentum_config(config)?;
    build_market_making_config(config)?;
    build_dip_buy_config(config)?;
    Ok(())
}
