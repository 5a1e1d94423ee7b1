//! Instrument list parsing and per-instrument metadata.
//!
//! The configured list uses one line per instrument:
//! `SYMBOL;shares;cost_basis;stop`, with trailing fields optional. A line
//! carrying just the symbol is a watch-list entry (zero shares held).

use std::collections::HashSet;

/// Slow-changing attributes of one instrument. Refreshed wholesale on each
/// ingestion cycle, keyed by symbol; never partially mutated in place.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InstrumentMeta {
    pub symbol: String,
    pub display_name: Option<String>,
    pub shares_held: f64,
    pub cost_basis: Option<f64>,
    pub stop_price: Option<f64>,
    pub pe_ratio: Option<f64>,
    pub dividend_yield: Option<f64>,
    pub eps: Option<f64>,
    pub price_to_sales: Option<f64>,
}

/// Fundamentals supplied by the market-data collaborator; merged into the
/// configured instrument list. Any field may be unknown.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Fundamentals {
    pub display_name: Option<String>,
    pub pe_ratio: Option<f64>,
    pub dividend_yield: Option<f64>,
    pub eps: Option<f64>,
    pub price_to_sales: Option<f64>,
}

impl InstrumentMeta {
    pub fn is_held(&self) -> bool {
        self.shares_held > 0.0
    }

    pub fn with_fundamentals(mut self, fundamentals: Fundamentals) -> Self {
        self.display_name = fundamentals.display_name.or(self.display_name);
        self.pe_ratio = fundamentals.pe_ratio.or(self.pe_ratio);
        self.dividend_yield = fundamentals.dividend_yield.or(self.dividend_yield);
        self.eps = fundamentals.eps.or(self.eps);
        self.price_to_sales = fundamentals.price_to_sales.or(self.price_to_sales);
        self
    }
}

#[derive(Debug, Clone, thiserror::Error)]
pub enum InstrumentListError {
    #[error("empty symbol on line {line}")]
    EmptySymbol { line: usize },

    #[error("duplicate symbol: {0}")]
    DuplicateSymbol(String),

    #[error("invalid {field} on line {line}: {value}")]
    InvalidField {
        field: &'static str,
        line: usize,
        value: String,
    },
}

/// Parse the instrument list. Blank lines and `#` comments are skipped;
/// symbols are upper-cased and must be unique.
pub fn parse_instruments(input: &str) -> Result<Vec<InstrumentMeta>, InstrumentListError> {
    let mut instruments = Vec::new();
    let mut seen = HashSet::new();

    for (idx, raw_line) in input.lines().enumerate() {
        let line_no = idx + 1;
        let line = raw_line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let mut fields = line.split(';').map(str::trim);
        let symbol = match fields.next() {
            Some(s) if !s.is_empty() => s.to_uppercase(),
            _ => return Err(InstrumentListError::EmptySymbol { line: line_no }),
        };
        if !seen.insert(symbol.clone()) {
            return Err(InstrumentListError::DuplicateSymbol(symbol));
        }

        let shares_held = parse_optional(fields.next(), "shares", line_no)?.unwrap_or(0.0);
        let cost_basis = parse_optional(fields.next(), "cost_basis", line_no)?;
        let stop_price = parse_optional(fields.next(), "stop", line_no)?;

        instruments.push(InstrumentMeta {
            symbol,
            shares_held,
            cost_basis,
            stop_price,
            ..InstrumentMeta::default()
        });
    }

    Ok(instruments)
}

fn parse_optional(
    field: Option<&str>,
    name: &'static str,
    line: usize,
) -> Result<Option<f64>, InstrumentListError> {
    match field {
        None | Some("") => Ok(None),
        Some(value) => value
            .parse::<f64>()
            .map(Some)
            .map_err(|_| InstrumentListError::InvalidField {
                field: name,
                line,
                value: value.to_string(),
            }),
    }
}
