//! CSV file data adapter.
//!
//! Stand-in for the market-data ingestion pipeline: one `{symbol}_daily.csv`
//! per instrument (Date,Open,High,Low,Close,Volume) plus an optional shared
//! `fundamentals.csv` (Symbol,Name,PE,DividendYield,EPS,PriceToSales).

use crate::domain::bar::Bar;
use crate::domain::error::StockdashError;
use crate::domain::instruments::Fundamentals;
use crate::domain::series::TimeSeries;
use crate::ports::data_port::DataPort;
use chrono::{NaiveDate, NaiveDateTime};
use std::fs;
use std::path::PathBuf;

pub struct CsvAdapter {
    base_path: PathBuf,
}

impl CsvAdapter {
    pub fn new(base_path: PathBuf) -> Self {
        Self { base_path }
    }

    fn daily_path(&self, symbol: &str) -> PathBuf {
        self.base_path
            .join(format!("{}_daily.csv", symbol.to_lowercase()))
    }

    fn fundamentals_path(&self) -> PathBuf {
        self.base_path.join("fundamentals.csv")
    }
}

fn parse_timestamp(raw: &str) -> Result<NaiveDateTime, StockdashError> {
    if let Ok(ts) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S") {
        return Ok(ts);
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .map(|d| d.and_hms_opt(0, 0, 0).unwrap_or_default())
        .map_err(|e| StockdashError::Data {
            reason: format!("invalid timestamp {:?}: {}", raw, e),
        })
}

fn parse_price(record: &csv::StringRecord, index: usize, name: &str) -> Result<f64, StockdashError> {
    record
        .get(index)
        .ok_or_else(|| StockdashError::Data {
            reason: format!("missing {} column", name),
        })?
        .parse()
        .map_err(|e| StockdashError::Data {
            reason: format!("invalid {} value: {}", name, e),
        })
}

fn parse_optional_field(value: Option<&str>) -> Option<f64> {
    value.and_then(|v| {
        let v = v.trim();
        if v.is_empty() { None } else { v.parse().ok() }
    })
}

impl DataPort for CsvAdapter {
    fn fetch_daily(&self, symbol: &str) -> Result<TimeSeries, StockdashError> {
        let path = self.daily_path(symbol);
        let content = fs::read_to_string(&path).map_err(|e| StockdashError::Data {
            reason: format!("failed to read {}: {}", path.display(), e),
        })?;

        let mut rdr = csv::Reader::from_reader(content.as_bytes());
        let mut bars = Vec::new();

        for result in rdr.records() {
            let record = result.map_err(|e| StockdashError::Data {
                reason: format!("CSV parse error: {}", e),
            })?;

            let raw_ts = record.get(0).ok_or_else(|| StockdashError::Data {
                reason: "missing date column".into(),
            })?;
            let timestamp = parse_timestamp(raw_ts)?;

            let open = parse_price(&record, 1, "open")?;
            let high = parse_price(&record, 2, "high")?;
            let low = parse_price(&record, 3, "low")?;
            let close = parse_price(&record, 4, "close")?;
            let volume = record.get(5).and_then(|v| v.parse().ok());

            bars.push(Bar {
                timestamp,
                open,
                high,
                low,
                close,
                volume,
            });
        }

        bars.sort_by_key(|b| b.timestamp);
        TimeSeries::new(symbol.to_uppercase(), None, bars)
    }

    fn fetch_fundamentals(&self, symbol: &str) -> Result<Fundamentals, StockdashError> {
        let path = self.fundamentals_path();
        let content = match fs::read_to_string(&path) {
            Ok(content) => content,
            // No fundamentals file means every field is simply unknown.
            Err(_) => return Ok(Fundamentals::default()),
        };

        let mut rdr = csv::Reader::from_reader(content.as_bytes());
        for result in rdr.records() {
            let record = result.map_err(|e| StockdashError::Data {
                reason: format!("CSV parse error in {}: {}", path.display(), e),
            })?;

            let row_symbol = record.get(0).unwrap_or_default().trim();
            if !row_symbol.eq_ignore_ascii_case(symbol) {
                continue;
            }

            return Ok(Fundamentals {
                display_name: record
                    .get(1)
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .map(String::from),
                pe_ratio: parse_optional_field(record.get(2)),
                dividend_yield: parse_optional_field(record.get(3)),
                eps: parse_optional_field(record.get(4)),
                price_to_sales: parse_optional_field(record.get(5)),
            });
        }

        Ok(Fundamentals::default())
    }

    fn list_symbols(&self) -> Result<Vec<String>, StockdashError> {
        let entries = fs::read_dir(&self.base_path).map_err(|e| StockdashError::Data {
            reason: format!(
                "failed to read directory {}: {}",
                self.base_path.display(),
                e
            ),
        })?;

        let mut symbols = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| StockdashError::Data {
                reason: format!("directory entry error: {}", e),
            })?;

            let name = entry.file_name();
            let name_str = name.to_string_lossy();
            if let Some(stem) = name_str.strip_suffix("_daily.csv") {
                symbols.push(stem.to_uppercase());
            }
        }

        symbols.sort();
        Ok(symbols)
    }
}
