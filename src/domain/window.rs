//! Time-window selection over a series.
//!
//! Bounds are naive timestamps interpreted in the series' own zone: a series
//! that carries a zone gets its bounds localized to that zone, never converted
//! from another one. An unzoned series is compared directly.

use chrono::NaiveDateTime;

use super::series::TimeSeries;
use super::timeframe::Timeframe;

/// Bars with `start(timeframe) ≤ timestamp ≤ reference`, inclusive, in their
/// original order. `max` spans the whole series; an empty result is a valid
/// (empty) series, not an error.
pub fn select(series: &TimeSeries, timeframe: Timeframe, reference: NaiveDateTime) -> TimeSeries {
    let start = match timeframe.start_from(reference) {
        Some(start) => start,
        None => match series.first() {
            Some(bar) => bar.timestamp,
            None => return series.clone(),
        },
    };
    series.between(start, reference)
}

/// Explicit-bounds selection, e.g. from a chart zoom event. Bounds may arrive
/// in either order.
pub fn select_range(series: &TimeSeries, x0: NaiveDateTime, x1: NaiveDateTime) -> TimeSeries {
    let (start, end) = if x0 <= x1 { (x0, x1) } else { (x1, x0) };
    series.between(start, end)
}
