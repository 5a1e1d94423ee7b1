//! Multi-asset portfolio value aggregation.

use chrono::{Datelike, NaiveDate, NaiveDateTime};
use std::collections::{BTreeMap, HashMap};

use super::series::TimeSeries;

/// One point of the aggregate holdings value.
#[derive(Debug, Clone, PartialEq)]
pub struct ValuePoint {
    pub date: NaiveDate,
    pub total: f64,
}

/// Date-indexed aggregate value of all held instruments, one point per date
/// in the union of the constituent series.
#[derive(Debug, Clone, Default)]
pub struct PortfolioValueSeries {
    pub points: Vec<ValuePoint>,
}

impl PortfolioValueSeries {
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Latest aggregate value; 0 for an empty aggregate (nothing held).
    pub fn current_value(&self) -> f64 {
        self.points.last().map(|p| p.total).unwrap_or(0.0)
    }

    /// Performance vs the first valid total of the reference year, in percent.
    ///
    /// A missing or zero baseline yields 0 rather than an error: "no data yet
    /// this year" is a legitimate state, unlike the data-integrity faults that
    /// surface as `DivisionByZero` elsewhere.
    pub fn ytd_performance(&self, reference: NaiveDate) -> f64 {
        let baseline = self
            .points
            .iter()
            .find(|p| p.date.year() == reference.year() && p.date <= reference)
            .map(|p| p.total)
            .unwrap_or(0.0);
        if baseline == 0.0 {
            return 0.0;
        }
        (self.current_value() - baseline) / baseline * 100.0
    }
}

/// Aggregate held instruments into one value series over `[start, end]`.
///
/// Each held instrument (`shares > 0`) contributes `shares × close` per date.
/// Series are normalized to UTC before alignment; dates are outer-joined and
/// missing prices contribute 0 to that date's sum. The zero-fill understates
/// the true value on dates where a held market was closed; known limitation,
/// kept as-is.
pub fn aggregate(
    series_by_symbol: &HashMap<String, TimeSeries>,
    shares_by_symbol: &HashMap<String, f64>,
    start: NaiveDateTime,
    end: NaiveDateTime,
) -> PortfolioValueSeries {
    let mut totals: BTreeMap<NaiveDate, f64> = BTreeMap::new();

    for (symbol, series) in series_by_symbol {
        let shares = shares_by_symbol.get(symbol).copied().unwrap_or(0.0);
        if shares <= 0.0 {
            continue;
        }

        let window = series.to_utc().between(start, end);
        for bar in window.bars() {
            *totals.entry(bar.date()).or_insert(0.0) += shares * bar.close;
        }
    }

    PortfolioValueSeries {
        points: totals
            .into_iter()
            .map(|(date, total)| ValuePoint { date, total })
            .collect(),
    }
}
