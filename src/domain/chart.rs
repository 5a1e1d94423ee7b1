//! Chart-ready series bundle for one instrument.

use chrono::NaiveDateTime;

use super::indicator::{moving_average, IndicatorPoint};
use super::kpi::IndicatorConfig;
use super::series::TimeSeries;
use super::timeframe::Timeframe;
use super::window;

/// A single marked point (window high or low).
#[derive(Debug, Clone, PartialEq)]
pub struct ChartMarker {
    pub timestamp: NaiveDateTime,
    pub value: f64,
}

/// Everything the presentation layer needs to draw one instrument: filtered
/// bars, the moving-average overlay, high/low markers, and an optional
/// stop-price reference line.
#[derive(Debug, Clone)]
pub struct ChartBundle {
    pub symbol: String,
    pub log_scale: bool,
    pub bars: TimeSeries,
    /// Computed over the full series, then restricted to the window, so the
    /// overlay keeps its warm-up from before the window.
    pub moving_average: Vec<IndicatorPoint>,
    pub high_marker: Option<ChartMarker>,
    pub low_marker: Option<ChartMarker>,
    pub stop_line: Option<f64>,
}

/// Build the bundle for a named timeframe ending at `reference`.
pub fn build(
    series: &TimeSeries,
    timeframe: Timeframe,
    reference: NaiveDateTime,
    config: &IndicatorConfig,
    stop_price: Option<f64>,
    log_scale: bool,
) -> ChartBundle {
    let window = window::select(series, timeframe, reference);
    bundle(series, window, config, stop_price, log_scale)
}

/// Build the bundle for explicit zoom bounds.
pub fn build_zoomed(
    series: &TimeSeries,
    x0: NaiveDateTime,
    x1: NaiveDateTime,
    config: &IndicatorConfig,
    stop_price: Option<f64>,
    log_scale: bool,
) -> ChartBundle {
    let window = window::select_range(series, x0, x1);
    bundle(series, window, config, stop_price, log_scale)
}

fn bundle(
    series: &TimeSeries,
    window: TimeSeries,
    config: &IndicatorConfig,
    stop_price: Option<f64>,
    log_scale: bool,
) -> ChartBundle {
    let bounds = window
        .first()
        .map(|b| b.timestamp)
        .zip(window.last().map(|b| b.timestamp));

    let moving_average = match bounds {
        Some((start, end)) => moving_average(series, config.ma_window)
            .into_iter()
            .filter(|p| p.timestamp >= start && p.timestamp <= end)
            .collect(),
        None => Vec::new(),
    };

    // First occurrence wins on ties, matching the table KPIs.
    let high_marker = window
        .bars()
        .iter()
        .fold(None::<ChartMarker>, |acc, bar| match acc {
            Some(m) if m.value >= bar.high => Some(m),
            _ => Some(ChartMarker {
                timestamp: bar.timestamp,
                value: bar.high,
            }),
        });
    let low_marker = window
        .bars()
        .iter()
        .fold(None::<ChartMarker>, |acc, bar| match acc {
            Some(m) if m.value <= bar.low => Some(m),
            _ => Some(ChartMarker {
                timestamp: bar.timestamp,
                value: bar.low,
            }),
        });

    ChartBundle {
        symbol: series.symbol().to_string(),
        log_scale,
        bars: window,
        moving_average,
        high_marker,
        low_marker,
        stop_line: stop_price,
    }
}
