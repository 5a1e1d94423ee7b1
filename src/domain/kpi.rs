//! Per-instrument KPI computation.

use chrono::NaiveDateTime;
use std::collections::HashMap;

use super::error::StockdashError;
use super::indicator::{
    self, all_time_high, max_drawdown, moving_average, pct_to_ath, rolling_max, rolling_min,
    IndicatorPoint,
};
use super::series::TimeSeries;

pub const DEFAULT_MA_WINDOW: usize = 200;
pub const DEFAULT_EXTREME_WINDOW: usize = 252;

/// Window lengths for the series-valued indicators, overridable from config.
#[derive(Debug, Clone, Copy)]
pub struct IndicatorConfig {
    /// Simple moving average window (bars).
    pub ma_window: usize,
    /// 52-week rolling extreme window (trading days).
    pub extreme_window: usize,
}

impl Default for IndicatorConfig {
    fn default() -> Self {
        Self {
            ma_window: DEFAULT_MA_WINDOW,
            extreme_window: DEFAULT_EXTREME_WINDOW,
        }
    }
}

/// Derived values for one instrument, recomputed fresh from its series.
/// Scalar prices and percentages are rounded to 2 decimals for display,
/// matching the dashboard tables.
#[derive(Debug, Clone)]
pub struct Kpis {
    pub symbol: String,
    pub current_price: f64,
    pub high_52w: f64,
    pub low_52w: f64,
    pub all_time_high: f64,
    pub pct_to_ath: f64,
    pub max_drawdown_pct: f64,
    pub drawdown_start: NaiveDateTime,
    pub drawdown_end: NaiveDateTime,
    /// CAGR anchored to the earliest available bar; `None` when the series
    /// spans a single day.
    pub avg_annual_return_pct: Option<f64>,
    pub moving_average: Vec<IndicatorPoint>,
}

impl Kpis {
    pub fn compute(series: &TimeSeries, config: &IndicatorConfig) -> Result<Self, StockdashError> {
        let bars = series.bars();
        let (first, last) = match (bars.first(), bars.last()) {
            (Some(first), Some(last)) => (first, last),
            _ => {
                return Err(StockdashError::InsufficientData {
                    symbol: series.symbol().to_string(),
                    bars: 0,
                    minimum: 1,
                });
            }
        };

        let closes = series.closes();
        let highs = series.highs();
        let lows = series.lows();

        let current_price = round2(last.close);
        let high_52w = round2(
            *rolling_max(&highs, config.extreme_window)
                .last()
                .unwrap_or(&last.high),
        );
        let low_52w = round2(
            *rolling_min(&lows, config.extreme_window)
                .last()
                .unwrap_or(&last.low),
        );
        let ath = round2(all_time_high(series).unwrap_or(last.high));
        let pct_to_ath = round2(pct_to_ath(current_price, ath)?);

        // Drawdown over the whole series; windowing never changes the peak.
        let dd = max_drawdown(&closes).unwrap_or(indicator::MaxDrawdown {
            pct: 0.0,
            peak_index: 0,
            trough_index: 0,
        });

        Ok(Kpis {
            symbol: series.symbol().to_string(),
            current_price,
            high_52w,
            low_52w,
            all_time_high: ath,
            pct_to_ath,
            max_drawdown_pct: round2(dd.pct),
            drawdown_start: bars[dd.peak_index].timestamp,
            drawdown_end: bars[dd.trough_index].timestamp,
            avg_annual_return_pct: cagr(first.timestamp, first.close, last.timestamp, last.close),
            moving_average: moving_average(series, config.ma_window),
        })
    }
}

/// Compound annual growth rate in percent, anchored to the true span of the
/// data. A fixed 10-year divisor would inflate returns for short histories.
fn cagr(
    first_ts: NaiveDateTime,
    first_close: f64,
    last_ts: NaiveDateTime,
    last_close: f64,
) -> Option<f64> {
    let span_days = (last_ts.date() - first_ts.date()).num_days();
    if span_days <= 0 || first_close <= 0.0 {
        return None;
    }
    let years = span_days as f64 / 365.0;
    Some(round2(((last_close / first_close).powf(1.0 / years) - 1.0) * 100.0))
}

/// Compute KPIs for many instruments, isolating failures: one bad series
/// never aborts the batch. Failed symbols are returned alongside the results
/// so callers can flag or omit them.
pub fn compute_batch(
    series_list: &[TimeSeries],
    config: &IndicatorConfig,
) -> (HashMap<String, Kpis>, Vec<(String, StockdashError)>) {
    let mut results = HashMap::new();
    let mut failures = Vec::new();

    for series in series_list {
        match Kpis::compute(series, config) {
            Ok(kpis) => {
                results.insert(series.symbol().to_string(), kpis);
            }
            Err(e) => failures.push((series.symbol().to_string(), e)),
        }
    }

    (results, failures)
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
