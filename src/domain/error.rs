//! Domain error types.
//!
//! Limit and validation failures are ordinary `Err` values; callers check the
//! result before assuming any mutation happened. Indicator computations with
//! too few samples are `None`, never an error.

/// Top-level error type for quantick.
#[derive(Debug, Clone, thiserror::Error)]
pub enum QuantickError {
    #[error("entry price and stop-loss price are equal ({price}); cannot size position")]
    ZeroPriceDistance { price: f64 },

    #[error(
        "exposure limit exceeded: open exposure {exposure:.2} + new {requested:.2} > limit {limit:.2}"
    )]
    ExposureExceeded {
        exposure: f64,
        requested: f64,
        limit: f64,
    },

    #[error("drawdown limit reached: {drawdown:.4} >= {limit:.4}")]
    DrawdownExceeded { drawdown: f64, limit: f64 },

    #[error("position {id} not found")]
    PositionNotFound { id: u64 },

    #[error("config parse error in {file}: {reason}")]
    ConfigParse { file: String, reason: String },

    #[error("missing config key [{section}] {key}")]
    ConfigMissing { section: String, key: String },

    #[error("invalid config value [{section}] {key}: {reason}")]
    ConfigInvalid {
        section: String,
        key: String,
        reason: String,
    },

    #[error("unknown strategy '{name}' (expected momentum, market_making or dip_buy)")]
    UnknownStrategy { name: String },

    #[error("no engine registered for {symbol}/{strategy}")]
    UnknownInstrument { symbol: String, strategy: String },

    #[error("tick data error: {reason}")]
    TickData { reason: String },
}

impl From<&QuantickError> for std::process::ExitCode {
    fn from(err: &QuantickError) -> Self {
        let code: u8 = match err {
            QuantickError::ConfigParse { .. }
            | QuantickError::ConfigMissing { .. }
            | QuantickError::ConfigInvalid { .. }
            | QuantickError::UnknownStrategy { .. } => 2,
            QuantickError::TickData { .. } => 3,
            QuantickError::ZeroPriceDistance { .. }
            | QuantickError::ExposureExceeded { .. }
            | QuantickError::DrawdownExceeded { .. }
            | QuantickError::PositionNotFound { .. }
            | QuantickError::UnknownInstrument { .. } => 4,
        };
        std::process::ExitCode::from(code)
    }
}
