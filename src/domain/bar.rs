//! OHLC bar representation.

use chrono::{NaiveDate, NaiveDateTime};

/// One trading interval's record. Daily bars carry a midnight timestamp;
/// intraday bars carry the interval start.
#[derive(Debug, Clone, PartialEq)]
pub struct Bar {
    pub timestamp: NaiveDateTime,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: Option<i64>,
}

impl Bar {
    pub fn date(&self) -> NaiveDate {
        self.timestamp.date()
    }

    /// low ≤ open,close ≤ high, all prices finite and non-negative.
    pub fn check_ordering(&self) -> Result<(), String> {
        for (name, value) in [
            ("open", self.open),
            ("high", self.high),
            ("low", self.low),
            ("close", self.close),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(format!("{} is not a non-negative finite price: {}", name, value));
            }
        }
        if self.low > self.open.min(self.close) {
            return Err(format!(
                "low {} above open {} or close {}",
                self.low, self.open, self.close
            ));
        }
        if self.high < self.open.max(self.close) {
            return Err(format!(
                "high {} below open {} or close {}",
                self.high, self.open, self.close
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_bar() -> Bar {
        Bar {
            timestamp: NaiveDate::from_ymd_opt(2024, 1, 15)
                .unwrap()
                .and_hms_opt(0, 0, 0)
                .unwrap(),
            open: 100.0,
            high: 110.0,
            low: 90.0,
            close: 105.0,
            volume: Some(50_000),
        }
    }

    #[test]
    fn date_strips_time() {
        let bar = sample_bar();
        assert_eq!(bar.date(), NaiveDate::from_ymd_opt(2024, 1, 15).unwrap());
    }

    #[test]
    fn ordering_valid_bar() {
        assert!(sample_bar().check_ordering().is_ok());
    }

    #[test]
    fn ordering_rejects_low_above_close() {
        let mut bar = sample_bar();
        bar.low = 106.0;
        assert!(bar.check_ordering().is_err());
    }

    #[test]
    fn ordering_rejects_high_below_open() {
        let mut bar = sample_bar();
        bar.high = 99.0;
        assert!(bar.check_ordering().is_err());
    }

    #[test]
    fn ordering_rejects_nan() {
        let mut bar = sample_bar();
        bar.close = f64::NAN;
        assert!(bar.check_ordering().is_err());
    }

    #[test]
    fn ordering_rejects_negative_price() {
        let mut bar = sample_bar();
        bar.low = -1.0;
        assert!(bar.check_ordering().is_err());
    }

    #[test]
    fn ordering_allows_zero_price() {
        let bar = Bar {
            timestamp: NaiveDate::from_ymd_opt(2024, 1, 15)
                .unwrap()
                .and_hms_opt(0, 0, 0)
                .unwrap(),
            open: 0.0,
            high: 0.0,
            low: 0.0,
            close: 0.0,
            volume: None,
        };
        assert!(bar.check_ordering().is_ok());
    }
}
