//! Market-data access port trait.
//!
//! The ingestion collaborator hands the core already-materialized data: an
//! ordered daily bar series per symbol plus a fundamentals snapshot.

use crate::domain::error::StockdashError;
use crate::domain::instruments::Fundamentals;
use crate::domain::series::TimeSeries;

pub trait DataPort {
    /// Daily bars for one symbol, ascending, no duplicate timestamps.
    fn fetch_daily(&self, symbol: &str) -> Result<TimeSeries, StockdashError>;

    /// Fundamentals snapshot; unknown fields stay `None`.
    fn fetch_fundamentals(&self, symbol: &str) -> Result<Fundamentals, StockdashError>;

    fn list_symbols(&self) -> Result<Vec<String>, StockdashError>;
}
