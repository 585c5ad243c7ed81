//! CLI definition and dispatch.

use clap::{Parser, Subcommand};
use serde::Serialize;
use std::path::PathBuf;
use std::process::ExitCode;

use crate::adapters::csv_adapter::CsvTickAdapter;
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::domain::analysis::{IndicatorSnapshot, TechnicalAnalysis};
use crate::domain::config_validation::{
    build_dip_buy_config, build_market_making_config, build_momentum_config, build_risk_config,
    validate_all,
};
use crate::domain::engine::Engine;
use crate::domain::error::QuantickError;
use crate::domain::risk::{PortfolioSummary, RiskConfig};
use crate::domain::signal::{self, Signal};
use crate::domain::strategy::{
    DipBuyStrategy, MarketMakingStrategy, MomentumStrategy, StrategyKind, StrategyStatus,
    StrategyVariant,
};
use crate::ports::tick_port::TickPort;

#[derive(Parser, Debug)]
#[command(name = "quantick", about = "Tick-driven trading decision engine")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Replay a tick series through a strategy
    Run {
        /// Directory containing <SYMBOL>.csv tick files
        #[arg(short, long)]
        ticks: PathBuf,
        #[arg(long)]
        symbol: String,
        /// momentum, market_making or dip_buy
        #[arg(short, long, default_value = "momentum")]
        strategy: String,
        #[arg(short, long)]
        config: Option<PathBuf>,
        /// Print the final report as JSON on stdout
        #[arg(long)]
        json: bool,
    },
    /// Compute indicators and the aggregate signal for a tick series
    Analyze {
        #[arg(short, long)]
        ticks: PathBuf,
        #[arg(long)]
        symbol: String,
        #[arg(long)]
        json: bool,
    },
    /// Validate a configuration file
    Validate {
        #[arg(short, long)]
        config: PathBuf,
    },
}

pub fn run(cli: Cli) -> ExitCode {
    match cli.command {
        Command::Run {
            ticks,
            symbol,
            strategy,
            config,
            json,
        } => run_replay(&ticks, &symbol, &strategy, config.as_ref(), json),
        Command::Analyze {
            ticks,
            symbol,
            json,
        } => run_analyze(&ticks, &symbol, json),
        Command::Validate { config } => run_validate(&config),
    }
}

pub fn load_config(path: &PathBuf) -> Result<FileConfigAdapter, ExitCode> {
    FileConfigAdapter::from_file(path).map_err(|e| {
        let err = QuantickError::ConfigParse {
            file: path.display().to_string(),
            reason: e.to_string(),
        };
        eprintln!("error: {err}");
        ExitCode::from(&err)
    })
}

#[derive(Debug, Serialize)]
struct RunReport {
    symbol: String,
    strategy: StrategyKind,
    ticks_processed: usize,
    intents_emitted: usize,
    status: StrategyStatus,
    portfolio: PortfolioSummary,
}

#[derive(Debug, Serialize)]
struct AnalyzeReport {
    symbol: String,
    snapshot: IndicatorSnapshot,
    signal: Signal,
}

/// Build the requested strategy variant and its risk budget from config,
/// falling back to compiled-in defaults when no config file is given.
fn build_cell(
    symbol: &str,
    kind: StrategyKind,
    config: Option<&FileConfigAdapter>,
) -> Result<(StrategyVariant, RiskConfig), QuantickError> {
    let risk = match config {
        Some(c) => build_risk_config(c)?,
        None => RiskConfig::default(),
    };
    let variant = match kind {
        StrategyKind::Momentum => {
            let cfg = match config {
                Some(c) => build_momentum_config(c)?,
                None => Default::default(),
            };
            StrategyVariant::Momentum(MomentumStrategy::new(symbol, cfg))
        }
        StrategyKind::MarketMaking => {
            let cfg = match config {
                Some(c) => build_market_making_config(c)?,
                None => Default::default(),
            };
            StrategyVariant::MarketMaking(MarketMakingStrategy::new(symbol, cfg))
        }
        StrategyKind::DipBuy => {
            let cfg = match config {
                Some(c) => build_dip_buy_config(c)?,
                None => Default::default(),
            };
            StrategyVariant::DipBuy(DipBuyStrategy::new(symbol, cfg))
        }
    };
    Ok((variant, risk))
}

fn run_replay(
    ticks_path: &PathBuf,
    symbol: &str,
    strategy_name: &str,
    config_path: Option<&PathBuf>,
    json: bool,
) -> ExitCode {
    let kind = match StrategyKind::parse(strategy_name) {
        Ok(k) => k,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    let adapter = match config_path {
        Some(path) => {
            eprintln!("Loading config from {}", path.display());
            match load_config(path) {
                Ok(a) => Some(a),
                Err(code) => return code,
            }
        }
        None => None,
    };

    let (variant, risk_config) = match build_cell(symbol, kind, adapter.as_ref()) {
        Ok(built) => built,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    let tick_port = CsvTickAdapter::new(ticks_path.clone());
    let ticks = match tick_port.fetch_ticks(symbol) {
        Ok(t) => t,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };
    eprintln!("Replaying {} ticks for {} ({})", ticks.len(), symbol, kind);

    let mut engine = Engine::new();
    engine.register(symbol, variant, risk_config);

    let mut intents_emitted = 0;
    for tick in &ticks {
        let intents = engine.on_tick(symbol, tick.price, tick.volume, Some(tick.timestamp));
        intents_emitted += intents.len();
    }

    // Registered above, so the keyed reads cannot fail.
    let status = engine
        .status(symbol, kind)
        .expect("cell registered for this run");
    let portfolio = engine
        .portfolio_summary(symbol, kind)
        .expect("cell registered for this run");

    let report = RunReport {
        symbol: symbol.to_string(),
        strategy: kind,
        ticks_processed: ticks.len(),
        intents_emitted,
        status,
        portfolio,
    };

    if json {
        match serde_json::to_string_pretty(&report) {
            Ok(out) => println!("{out}"),
            Err(e) => {
                eprintln!("error: failed to serialize report: {e}");
                return ExitCode::from(1);
            }
        }
        return ExitCode::SUCCESS;
    }

    eprintln!("\n=== Run Summary ===");
    eprintln!("Strategy:         {} ({})", kind, report.status.state);
    eprintln!("Ticks:            {}", report.ticks_processed);
    eprintln!("Intents:          {}", report.intents_emitted);
    eprintln!("Trades:           {}", report.portfolio.total_trades);
    eprintln!("Win Rate:         {:.1}%", report.portfolio.win_rate * 100.0);
    eprintln!("Realized PnL:     {:.2}", report.portfolio.total_realized_pnl);
    eprintln!("Final Balance:    {:.2}", report.portfolio.current_balance);
    eprintln!("Open Exposure:    {:.2}", report.portfolio.current_exposure);
    eprintln!(
        "Max Drawdown:     -{:.1}%",
        report.portfolio.max_drawdown_reached * 100.0
    );
    ExitCode::SUCCESS
}

fn run_analyze(ticks_path: &PathBuf, symbol: &str, json: bool) -> ExitCode {
    let tick_port = CsvTickAdapter::new(ticks_path.clone());
    let ticks = match tick_port.fetch_ticks(symbol) {
        Ok(t) => t,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };
    eprintln!("Analyzing {} ticks for {}", ticks.len(), symbol);

    let mut analysis = TechnicalAnalysis::new();
    for tick in &ticks {
        analysis.add_sample(tick.price, tick.volume, Some(tick.timestamp));
    }

    let snapshot = analysis.snapshot();
    let signal = signal::aggregate(&snapshot);

    if json {
        let report = AnalyzeReport {
            symbol: symbol.to_string(),
            snapshot,
            signal,
        };
        match serde_json::to_string_pretty(&report) {
            Ok(out) => println!("{out}"),
            Err(e) => {
                eprintln!("error: failed to serialize report: {e}");
                return ExitCode::from(1);
            }
        }
        return ExitCode::SUCCESS;
    }

    eprintln!("\n=== Indicators ===");
    match snapshot.price {
        Some(p) => eprintln!("Price:            {:.4}", p),
        None => eprintln!("Price:            n/a"),
    }
    print_optional("SMA(short)", snapshot.sma_short);
    print_optional("SMA(long)", snapshot.sma_long);
    print_optional("EMA", snapshot.ema);
    print_optional("RSI", snapshot.rsi);
    if let Some(m) = &snapshot.macd {
        eprintln!(
            "MACD:             {:.4} signal {:.4} hist {:.4}",
            m.macd, m.signal, m.histogram
        );
    }
    if let Some(b) = &snapshot.bollinger {
        eprintln!(
            "Bollinger:        {:.4} / {:.4} / {:.4}",
            b.lower, b.middle, b.upper
        );
    }

    eprintln!("\n=== Signal ===");
    eprintln!("Direction:        {:?}", signal.overall);
    eprintln!("Confidence:       {:.2}", signal.confidence);
    if !signal.buy_reasons.is_empty() {
        eprintln!("Buy reasons:      {}", signal.buy_reasons.join(", "));
    }
    if !signal.sell_reasons.is_empty() {
        eprintln!("Sell reasons:     {}", signal.sell_reasons.join(", "));
    }
    ExitCode::SUCCESS
}

fn print_optional(label: &str, value: Option<f64>) {
    match value {
        Some(v) => eprintln!("{:<17} {:.4}", format!("{}:", label), v),
        None => eprintln!("{:<17} n/a", format!("{}:", label)),
    }
}

fn run_validate(config_path: &PathBuf) -> ExitCode {
    eprintln!("Validating config: {}", config_path.display());
    let adapter = match load_config(config_path) {
        Ok(a) => a,
        Err(code) => return code,
    };

    match validate_all(&adapter) {
        Ok(()) => {
            eprintln!("Configuration is valid");
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("error: {e}");
            (&e).into()
        }
    }
}
