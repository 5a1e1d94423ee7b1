//! Named timeframe tokens and their resolution to date ranges.

use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime};
use std::fmt;
use std::str::FromStr;

/// Timeframe selector as exposed by the dashboard controls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Timeframe {
    OneDay,
    OneWeek,
    OneMonth,
    YearToDate,
    OneYear,
    FiveYears,
    TenYears,
    Max,
}

#[derive(Debug, Clone, thiserror::Error)]
#[error("unknown timeframe token: {0}")]
pub struct TimeframeParseError(pub String);

impl Timeframe {
    pub const ALL: [Timeframe; 8] = [
        Timeframe::OneDay,
        Timeframe::OneWeek,
        Timeframe::OneMonth,
        Timeframe::YearToDate,
        Timeframe::OneYear,
        Timeframe::FiveYears,
        Timeframe::TenYears,
        Timeframe::Max,
    ];

    pub fn token(&self) -> &'static str {
        match self {
            Timeframe::OneDay => "1d",
            Timeframe::OneWeek => "1w",
            Timeframe::OneMonth => "1m",
            Timeframe::YearToDate => "ytd",
            Timeframe::OneYear => "1y",
            Timeframe::FiveYears => "5y",
            Timeframe::TenYears => "10y",
            Timeframe::Max => "max",
        }
    }

    /// Start of the window relative to `reference`; `None` for `max`, whose
    /// start is the series' own minimum timestamp. The end of the window is
    /// always `reference` itself.
    pub fn start_from(&self, reference: NaiveDateTime) -> Option<NaiveDateTime> {
        let days = match self {
            Timeframe::OneDay => 1,
            Timeframe::OneWeek => 7,
            Timeframe::OneMonth => 30,
            Timeframe::OneYear => 365,
            Timeframe::FiveYears => 1825,
            Timeframe::TenYears => 3650,
            Timeframe::YearToDate => {
                let jan1 = NaiveDate::from_ymd_opt(reference.year(), 1, 1)?;
                return jan1.and_hms_opt(0, 0, 0);
            }
            Timeframe::Max => return None,
        };
        Some(reference - Duration::days(days))
    }
}

impl FromStr for Timeframe {
    type Err = TimeframeParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "1d" => Ok(Timeframe::OneDay),
            "1w" => Ok(Timeframe::OneWeek),
            "1m" => Ok(Timeframe::OneMonth),
            "ytd" => Ok(Timeframe::YearToDate),
            "1y" => Ok(Timeframe::OneYear),
            "5y" => Ok(Timeframe::FiveYears),
            "10y" => Ok(Timeframe::TenYears),
            "max" => Ok(Timeframe::Max),
            other => Err(TimeframeParseError(other.to_string())),
        }
    }
}

impl fmt::Display for Timeframe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}
