//! Domain error types.

/// Top-level error type for stockdash.
#[derive(Debug, thiserror::Error)]
pub enum StockdashError {
    #[error("data error: {reason}")]
    Data { reason: String },

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

    #[error("no data for {symbol}")]
    NoData { symbol: String },

    #[error("insufficient data for {symbol}: have {bars} bars, need {minimum}")]
    InsufficientData {
        symbol: String,
        bars: usize,
        minimum: usize,
    },

    #[error("malformed series for {symbol}: {reason}")]
    MalformedSeries { symbol: String, reason: String },

    #[error("division by zero computing {quantity}")]
    DivisionByZero { quantity: String },

    #[error(transparent)]
    InstrumentList(#[from] crate::domain::instruments::InstrumentListError),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl From<&StockdashError> for std::process::ExitCode {
    fn from(err: &StockdashError) -> Self {
        let code: u8 = match err {
            StockdashError::Io(_) => 1,
            StockdashError::ConfigParse { .. }
            | StockdashError::ConfigMissing { .. }
            | StockdashError::ConfigInvalid { .. } => 2,
            StockdashError::Data { .. } => 3,
            StockdashError::InstrumentList(_) => 4,
            StockdashError::NoData { .. }
            | StockdashError::InsufficientData { .. }
            | StockdashError::MalformedSeries { .. }
            | StockdashError::DivisionByZero { .. } => 5,
        };
        std::process::ExitCode::from(code)
    }
}
