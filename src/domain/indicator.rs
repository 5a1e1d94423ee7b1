//! Shared indicator calculations over a series.

use chrono::NaiveDateTime;

use super::error::StockdashError;
use super::series::TimeSeries;

/// One point of a series-valued indicator. `value` is `None` during warm-up
/// so charting layers can omit the point instead of drawing zero.
#[derive(Debug, Clone, PartialEq)]
pub struct IndicatorPoint {
    pub timestamp: NaiveDateTime,
    pub value: Option<f64>,
}

/// Simple moving average of close over the trailing `window` bars. The first
/// `window - 1` points are undefined. Same length and timestamps as the input.
pub fn moving_average(series: &TimeSeries, window: usize) -> Vec<IndicatorPoint> {
    if window == 0 {
        return Vec::new();
    }

    let bars = series.bars();
    let mut points = Vec::with_capacity(bars.len());
    let mut window_sum = 0.0_f64;

    for (i, bar) in bars.iter().enumerate() {
        window_sum += bar.close;
        if i >= window {
            window_sum -= bars[i - window].close;
        }
        let value = if i >= window - 1 {
            Some(window_sum / window as f64)
        } else {
            None
        };
        points.push(IndicatorPoint {
            timestamp: bar.timestamp,
            value,
        });
    }

    points
}

/// Trailing maximum over up to `window` values. Early points use however many
/// values are available, so every output is defined for non-empty input.
pub fn rolling_max(values: &[f64], window: usize) -> Vec<f64> {
    rolling_extreme(values, window, |acc, v| if v > acc { v } else { acc })
}

/// Trailing minimum, same warm-up behavior as [`rolling_max`].
pub fn rolling_min(values: &[f64], window: usize) -> Vec<f64> {
    rolling_extreme(values, window, |acc, v| if v < acc { v } else { acc })
}

fn rolling_extreme(values: &[f64], window: usize, pick: impl Fn(f64, f64) -> f64) -> Vec<f64> {
    let window = window.max(1);
    let mut out = Vec::with_capacity(values.len());
    for i in 0..values.len() {
        let start = (i + 1).saturating_sub(window);
        let mut acc = values[start];
        for &v in &values[start + 1..=i] {
            acc = pick(acc, v);
        }
        out.push(acc);
    }
    out
}

/// Maximum exhibited `high` over the entire series. Extrema use highs, not
/// closes; drawdown is the close-based view.
pub fn all_time_high(series: &TimeSeries) -> Option<f64> {
    series
        .bars()
        .iter()
        .map(|b| b.high)
        .fold(None, |acc, h| match acc {
            Some(max) if max >= h => Some(max),
            _ => Some(h),
        })
}

/// Distance from the all-time high in percent. A zero high is a data-integrity
/// fault and surfaces as an error rather than 0 or infinity.
pub fn pct_to_ath(current_price: f64, all_time_high: f64) -> Result<f64, StockdashError> {
    if all_time_high == 0.0 {
        return Err(StockdashError::DivisionByZero {
            quantity: "all-time high".to_string(),
        });
    }
    Ok((current_price - all_time_high) / all_time_high * 100.0)
}

/// `close / cummax(close) - 1` per point. Computed over the entire series so
/// the running peak is the all-time peak, not a window-local one. A zero peak
/// contributes a drawdown of 0.
pub fn drawdown(closes: &[f64]) -> Vec<f64> {
    let mut peak = f64::NEG_INFINITY;
    closes
        .iter()
        .map(|&close| {
            if close > peak {
                peak = close;
            }
            if peak > 0.0 { close / peak - 1.0 } else { 0.0 }
        })
        .collect()
}

/// Deepest drawdown with its peak/trough indices. Ties resolve to the first
/// occurrence. `None` for an empty input.
pub fn max_drawdown(closes: &[f64]) -> Option<MaxDrawdown> {
    if closes.is_empty() {
        return None;
    }

    let dd = drawdown(closes);
    let mut trough = 0;
    for (i, &v) in dd.iter().enumerate() {
        if v < dd[trough] {
            trough = i;
        }
    }

    let mut peak = 0;
    for (i, &close) in closes[..trough].iter().enumerate() {
        if close > closes[peak] {
            peak = i;
        }
    }

    Some(MaxDrawdown {
        pct: dd[trough] * 100.0,
        peak_index: peak,
        trough_index: trough,
    })
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MaxDrawdown {
    /// min(drawdown) × 100, always ≤ 0.
    pub pct: f64,
    pub peak_index: usize,
    pub trough_index: usize,
}
