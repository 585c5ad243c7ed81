//! CLI integration tests: config files and tick CSVs on disk, driven
//! through the same building blocks the binary uses.

mod common;

use quantick::adapters::csv_adapter::CsvTickAdapter;
use quantick::adapters::file_config_adapter::FileConfigAdapter;
use quantick::cli;
use quantick::domain::config_validation::{
    build_dip_buy_config, build_momentum_config, build_risk_config, validate_all,
};
use quantick::domain::engine::Engine;
use quantick::domain::risk::RiskConfig;
use quantick::domain::strategy::{DipBuyStrategy, StrategyKind, StrategyVariant};
use quantick::ports::tick_port::TickPort;
use std::fs;
use std::io::Write;
use std::path::PathBuf;

fn write_temp_ini(content: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}

const VALID_INI: &str = r#"
[risk]
initial_balance = 20000
max_position_size = 0.1
max_total_exposure = 0.5
stop_loss_pct = 0.05
take_profit_pct = 0.1
max_drawdown = 0.2
risk_per_trade = 0.02

[momentum]
lookback = 12
momentum_threshold = 0.03
volume_threshold = 2.0

[market_making]
spread = 0.004
order_size = 2.0
max_orders = 3

[dip_buy]
lookback = 15
dip_threshold = 0.04
recovery_threshold = 0.97
spend_fraction = 0.3
"#;

mod config_loading {
    use super::*;

    #[test]
    fn load_config_reads_a_real_file() {
        let file = write_temp_ini(VALID_INI);
        let adapter = cli::load_config(&file.path().to_path_buf()).unwrap();
        assert!(validate_all(&adapter).is_ok());

        let risk = build_risk_config(&adapter).unwrap();
        assert_eq!(risk.initial_balance, 20_000.0);

        let momentum = build_momentum_config(&adapter).unwrap();
        assert_eq!(momentum.lookback, 12);
        assert_eq!(momentum.momentum_threshold, 0.03);

        let dip = build_dip_buy_config(&adapter).unwrap();
        assert_eq!(dip.lookback, 15);
        assert_eq!(dip.spend_fraction, 0.3);
    }

    #[test]
    fn load_config_rejects_missing_file() {
        assert!(cli::load_config(&PathBuf::from("/nonexistent/quantick.ini")).is_err());
    }

    #[test]
    fn out_of_range_value_fails_validation() {
        let file = write_temp_ini("[risk]\nmax_drawdown = 1.5\n");
        let adapter = FileConfigAdapter::from_file(file.path()).unwrap();
        assert!(validate_all(&adapter).is_err());
    }
}

mod csv_replay {
    use super::*;

    fn write_ticks(dir: &std::path::Path, symbol: &str, rows: &[(&str, f64, f64)]) {
        let mut content = String::from("timestamp,price,volume\n");
        for (ts, price, volume) in rows {
            content.push_str(&format!("{},{},{}\n", ts, price, volume));
        }
        fs::write(dir.join(format!("{}.csv", symbol)), content).unwrap();
    }

    #[test]
    fn csv_ticks_drive_a_dip_buy_round_trip() {
        let dir = tempfile::TempDir::new().unwrap();
        write_ticks(
            dir.path(),
            "SOL",
            &[
                ("2024-01-15T12:00:00Z", 100.0, 1000.0),
                ("2024-01-15T12:00:01Z", 97.0, 1100.0),
                ("2024-01-15T12:00:02Z", 94.0, 1500.0),
                ("2024-01-15T12:00:03Z", 96.0, 1200.0),
                ("2024-01-15T12:00:04Z", 98.5, 1200.0),
            ],
        );

        let port = CsvTickAdapter::new(dir.path().to_path_buf());
        let ticks = port.fetch_ticks("SOL").unwrap();
        assert_eq!(ticks.len(), 5);

        let mut engine = Engine::new();
        engine.register(
            "SOL",
            StrategyVariant::DipBuy(DipBuyStrategy::new("SOL", Default::default())),
            RiskConfig::default(),
        );

        let mut intents = 0;
        for tick in &ticks {
            intents += engine
                .on_tick("SOL", tick.price, tick.volume, Some(tick.timestamp))
                .len();
        }
        assert_eq!(intents, 2);

        let summary = engine
            .portfolio_summary("SOL", StrategyKind::DipBuy)
            .unwrap();
        assert_eq!(summary.total_trades, 1);
        assert!(summary.total_realized_pnl > 0.0);
    }

    #[test]
    fn malformed_csv_row_surfaces_as_tick_error() {
        let dir = tempfile::TempDir::new().unwrap();
        fs::write(
            dir.path().join("SOL.csv"),
            "timestamp,price,volume\n2024-01-15T12:00:00Z,not_a_price,1000\n",
        )
        .unwrap();

        let port = CsvTickAdapter::new(dir.path().to_path_buf());
        assert!(port.fetch_ticks("SOL").is_err());
    }
}

mod run_report_serialization {
    use super::*;
    use quantick::domain::signal;

    #[test]
    fn analyze_output_serializes_to_json() {
        let mut analysis = quantick::domain::analysis::TechnicalAnalysis::new();
        for i in 0..60 {
            analysis.add_sample(100.0 + (i % 5) as f64, 1000.0, Some(common::ts(i)));
        }
        let snapshot = analysis.snapshot();
        let signal = signal::aggregate(&snapshot);

        let json = serde_json::to_string(&snapshot).unwrap();
        assert!(json.contains("\"sample_count\":60"));
        let json = serde_json::to_string(&signal).unwrap();
        assert!(json.contains("\"overall\""));
        assert!(json.contains("\"confidence\""));
    }
}
