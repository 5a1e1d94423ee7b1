//! Date-indexed OHLC series for one instrument.
//!
//! A `TimeSeries` is an immutable snapshot for the duration of a computation.
//! Construction validates the whole series so downstream indicator math never
//! sees non-monotonic timestamps or impossible OHLC ordering.

use chrono::{Duration, FixedOffset, NaiveDateTime, Offset, Utc};

use super::bar::Bar;
use super::error::StockdashError;

#[derive(Debug, Clone, PartialEq)]
pub struct TimeSeries {
    symbol: String,
    /// Zone the naive timestamps are expressed in. `None` means unzoned,
    /// treated as UTC wherever alignment requires a zone.
    zone: Option<FixedOffset>,
    bars: Vec<Bar>,
}

impl TimeSeries {
    /// Validates timestamps (strictly increasing, unique) and per-bar OHLC
    /// ordering. Fails fast with `MalformedSeries` rather than letting
    /// silently-wrong KPIs through.
    pub fn new(
        symbol: impl Into<String>,
        zone: Option<FixedOffset>,
        bars: Vec<Bar>,
    ) -> Result<Self, StockdashError> {
        let symbol = symbol.into();
        validate_bars(&symbol, &bars, None)?;
        Ok(Self { symbol, zone, bars })
    }

    /// Internal constructor for subsequences of an already-validated series.
    pub(crate) fn from_validated(
        symbol: String,
        zone: Option<FixedOffset>,
        bars: Vec<Bar>,
    ) -> Self {
        Self { symbol, zone, bars }
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    pub fn zone(&self) -> Option<FixedOffset> {
        self.zone
    }

    pub fn bars(&self) -> &[Bar] {
        &self.bars
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    pub fn first(&self) -> Option<&Bar> {
        self.bars.first()
    }

    pub fn last(&self) -> Option<&Bar> {
        self.bars.last()
    }

    pub fn last_close(&self) -> Option<f64> {
        self.bars.last().map(|b| b.close)
    }

    pub fn closes(&self) -> Vec<f64> {
        self.bars.iter().map(|b| b.close).collect()
    }

    pub fn highs(&self) -> Vec<f64> {
        self.bars.iter().map(|b| b.high).collect()
    }

    pub fn lows(&self) -> Vec<f64> {
        self.bars.iter().map(|b| b.low).collect()
    }

    /// Append new bars; every timestamp must be strictly greater than the
    /// current maximum. Any other mutation is a full replacement via `new`.
    pub fn append(&mut self, bars: Vec<Bar>) -> Result<(), StockdashError> {
        let after = self.bars.last().map(|b| b.timestamp);
        validate_bars(&self.symbol, &bars, after)?;
        self.bars.extend(bars);
        Ok(())
    }

    /// Subsequence with timestamps in `[start, end]`, inclusive. Bounds are
    /// naive and interpreted in the series' own zone (localized, never
    /// converted across zones). An empty result is a valid series.
    pub fn between(&self, start: NaiveDateTime, end: NaiveDateTime) -> TimeSeries {
        let bars = self
            .bars
            .iter()
            .filter(|b| b.timestamp >= start && b.timestamp <= end)
            .cloned()
            .collect();
        TimeSeries::from_validated(self.symbol.clone(), self.zone, bars)
    }

    /// Shift timestamps into UTC for cross-series alignment. An unzoned
    /// series is assumed to already be UTC and passes through unchanged.
    pub fn to_utc(&self) -> TimeSeries {
        let offset = match self.zone {
            None => return self.clone(),
            Some(off) => off,
        };
        let shift = Duration::seconds(offset.local_minus_utc() as i64);
        let bars = self
            .bars
            .iter()
            .map(|b| Bar {
                timestamp: b.timestamp - shift,
                ..b.clone()
            })
            .collect();
        TimeSeries::from_validated(self.symbol.clone(), Some(Utc.fix()), bars)
    }
}

fn validate_bars(
    symbol: &str,
    bars: &[Bar],
    after: Option<NaiveDateTime>,
) -> Result<(), StockdashError> {
    let mut prev = after;
    for bar in bars {
        if let Some(prev_ts) = prev {
            if bar.timestamp <= prev_ts {
                return Err(StockdashError::MalformedSeries {
                    symbol: symbol.to_string(),
                    reason: format!(
                        "timestamps not strictly increasing: {} follows {}",
                        bar.timestamp, prev_ts
                    ),
                });
            }
        }
        bar.check_ordering()
            .map_err(|reason| StockdashError::MalformedSeries {
                symbol: symbol.to_string(),
                reason: format!("bar at {}: {}", bar.timestamp, reason),
            })?;
        prev = Some(bar.timestamp);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn ts(y: i32, m: u32, d: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap()
    }

    fn make_bar(timestamp: NaiveDateTime, close: f64) -> Bar {
        Bar {
            timestamp,
            open: close - 1.0,
            high: close + 1.0,
            low: close - 2.0,
            close,
            volume: Some(1000),
        }
    }

    fn make_series(closes: &[f64]) -> TimeSeries {
        let bars = closes
            .iter()
            .enumerate()
            .map(|(i, &c)| make_bar(ts(2024, 1, 1) + Duration::days(i as i64), c))
            .collect();
        TimeSeries::new("TEST", None, bars).unwrap()
    }

    #[test]
    fn new_accepts_ordered_bars() {
        let series = make_series(&[100.0, 101.0, 102.0]);
        assert_eq!(series.len(), 3);
        assert_eq!(series.symbol(), "TEST");
    }

    #[test]
    fn new_rejects_duplicate_timestamps() {
        let bars = vec![make_bar(ts(2024, 1, 1), 100.0), make_bar(ts(2024, 1, 1), 101.0)];
        let result = TimeSeries::new("TEST", None, bars);
        assert!(matches!(
            result,
            Err(StockdashError::MalformedSeries { .. })
        ));
    }

    #[test]
    fn new_rejects_out_of_order_timestamps() {
        let bars = vec![make_bar(ts(2024, 1, 2), 100.0), make_bar(ts(2024, 1, 1), 101.0)];
        assert!(TimeSeries::new("TEST", None, bars).is_err());
    }

    #[test]
    fn new_rejects_broken_ohlc_ordering() {
        let mut bar = make_bar(ts(2024, 1, 1), 100.0);
        bar.low = 150.0;
        assert!(TimeSeries::new("TEST", None, vec![bar]).is_err());
    }

    #[test]
    fn new_accepts_empty() {
        let series = TimeSeries::new("TEST", None, vec![]).unwrap();
        assert!(series.is_empty());
        assert_eq!(series.last_close(), None);
    }

    #[test]
    fn append_newer_bars() {
        let mut series = make_series(&[100.0, 101.0]);
        series
            .append(vec![make_bar(ts(2024, 1, 3), 102.0)])
            .unwrap();
        assert_eq!(series.len(), 3);
        assert_eq!(series.last_close(), Some(102.0));
    }

    #[test]
    fn append_rejects_older_bars() {
        let mut series = make_series(&[100.0, 101.0]);
        let result = series.append(vec![make_bar(ts(2024, 1, 1), 99.0)]);
        assert!(result.is_err());
        assert_eq!(series.len(), 2);
    }

    #[test]
    fn between_inclusive_bounds() {
        let series = make_series(&[100.0, 101.0, 102.0, 103.0]);
        let window = series.between(ts(2024, 1, 2), ts(2024, 1, 3));
        assert_eq!(window.len(), 2);
        assert_eq!(window.first().unwrap().close, 101.0);
        assert_eq!(window.last().unwrap().close, 102.0);
    }

    #[test]
    fn between_empty_window_is_not_an_error() {
        let series = make_series(&[100.0, 101.0]);
        let window = series.between(ts(2025, 1, 1), ts(2025, 2, 1));
        assert!(window.is_empty());
    }

    #[test]
    fn to_utc_shifts_by_offset() {
        let zone = FixedOffset::east_opt(3600).unwrap();
        let bars = vec![make_bar(ts(2024, 1, 1), 100.0)];
        let series = TimeSeries::new("TEST", Some(zone), bars).unwrap();

        let utc = series.to_utc();
        assert_eq!(
            utc.first().unwrap().timestamp,
            ts(2023, 12, 31) + Duration::hours(23)
        );
        assert_eq!(utc.zone(), Some(Utc.fix()));
    }

    #[test]
    fn to_utc_unzoned_passthrough() {
        let series = make_series(&[100.0]);
        let utc = series.to_utc();
        assert_eq!(utc.first().unwrap().timestamp, ts(2024, 1, 1));
    }
}
