#![allow(dead_code)]

use chrono::{Duration, NaiveDate, NaiveDateTime};
use std::collections::HashMap;
use stockdash::domain::error::StockdashError;
pub use stockdash::domain::bar::Bar;
use stockdash::domain::instruments::Fundamentals;
use stockdash::domain::series::TimeSeries;
use stockdash::ports::data_port::DataPort;

pub struct MockDataPort {
    pub data: HashMap<String, Vec<Bar>>,
    pub fundamentals: HashMap<String, Fundamentals>,
    pub errors: HashMap<String, String>,
}

impl MockDataPort {
    pub fn new() -> Self {
        Self {
            data: HashMap::new(),
            fundamentals: HashMap::new(),
            errors: HashMap::new(),
        }
    }

    pub fn with_bars(mut self, symbol: &str, bars: Vec<Bar>) -> Self {
        self.data.insert(symbol.to_string(), bars);
        self
    }

    pub fn with_fundamentals(mut self, symbol: &str, fundamentals: Fundamentals) -> Self {
        self.fundamentals.insert(symbol.to_string(), fundamentals);
        self
    }

    pub fn with_error(mut self, symbol: &str, reason: &str) -> Self {
        self.errors.insert(symbol.to_string(), reason.to_string());
        self
    }
}

impl DataPort for MockDataPort {
    fn fetch_daily(&self, symbol: &str) -> Result<TimeSeries, StockdashError> {
        if let Some(reason) = self.errors.get(symbol) {
            return Err(StockdashError::Data {
                reason: reason.clone(),
            });
        }
        let bars = self.data.get(symbol).cloned().unwrap_or_default();
        TimeSeries::new(symbol, None, bars)
    }

    fn fetch_fundamentals(&self, symbol: &str) -> Result<Fundamentals, StockdashError> {
        Ok(self.fundamentals.get(symbol).cloned().unwrap_or_default())
    }

    fn list_symbols(&self) -> Result<Vec<String>, StockdashError> {
        let mut symbols: Vec<String> = self.data.keys().cloned().collect();
        symbols.sort();
        Ok(symbols)
    }
}

pub fn ts(y: i32, m: u32, d: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(y, m, d)
        .unwrap()
        .and_hms_opt(0, 0, 0)
        .unwrap()
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub fn make_bar(timestamp: NaiveDateTime, close: f64) -> Bar {
    // Clamped at zero so sub-dollar closes still form a valid bar.
    Bar {
        timestamp,
        open: (close - 1.0).max(0.0),
        high: close + 1.0,
        low: (close - 2.0).max(0.0),
        close,
        volume: Some(1000),
    }
}

pub fn daily_bars(start: NaiveDateTime, closes: &[f64]) -> Vec<Bar> {
    closes
        .iter()
        .enumerate()
        .map(|(i, &close)| make_bar(start + Duration::days(i as i64), close))
        .collect()
}

pub fn generate_bars(start_date: &str, count: usize, start_price: f64) -> Vec<Bar> {
    let start = NaiveDate::parse_from_str(start_date, "%Y-%m-%d")
        .unwrap()
        .and_hms_opt(0, 0, 0)
        .unwrap();
    (0..count)
        .map(|i| make_bar(start + Duration::days(i as i64), start_price + i as f64))
        .collect()
}
