//! Tabular roll-up of per-instrument metadata and KPIs.

use std::collections::HashMap;

use super::instruments::InstrumentMeta;
use super::kpi::Kpis;

/// Column headers, in display order. `cells` emits values in the same order.
pub const COLUMNS: [&str; 16] = [
    "Symbol",
    "Name",
    "Shares",
    "Cost Basis",
    "Stop",
    "P/E",
    "Div Yield %",
    "EPS",
    "P/S",
    "Avg %/Year",
    "Price",
    "52w High",
    "52w Low",
    "ATH",
    "% to ATH",
    "Max Drawdown %",
];

/// One table row: static metadata joined with the instrument's KPIs.
#[derive(Debug, Clone)]
pub struct InfoRow {
    pub symbol: String,
    pub name: Option<String>,
    pub shares: f64,
    pub cost_basis: Option<f64>,
    pub stop_price: Option<f64>,
    pub pe_ratio: Option<f64>,
    /// Scaled ×100 for display; the collaborator supplies a fraction.
    pub dividend_yield_pct: Option<f64>,
    pub eps: Option<f64>,
    pub price_to_sales: Option<f64>,
    pub avg_annual_return_pct: Option<f64>,
    pub current_price: f64,
    pub high_52w: f64,
    pub low_52w: f64,
    pub all_time_high: f64,
    pub pct_to_ath: f64,
    pub max_drawdown_pct: f64,
}

impl InfoRow {
    /// Values in [`COLUMNS`] order; unknown fields render as `-`.
    pub fn cells(&self) -> Vec<String> {
        vec![
            self.symbol.clone(),
            self.name.clone().unwrap_or_else(|| "-".to_string()),
            format_num(Some(self.shares)),
            format_num(self.cost_basis),
            format_num(self.stop_price),
            format_num(self.pe_ratio),
            format_num(self.dividend_yield_pct),
            format_num(self.eps),
            format_num(self.price_to_sales),
            format_num(self.avg_annual_return_pct),
            format_num(Some(self.current_price)),
            format_num(Some(self.high_52w)),
            format_num(Some(self.low_52w)),
            format_num(Some(self.all_time_high)),
            format_num(Some(self.pct_to_ath)),
            format_num(Some(self.max_drawdown_pct)),
        ]
    }
}

fn format_num(value: Option<f64>) -> String {
    match value {
        Some(v) => format!("{:.2}", v),
        None => "-".to_string(),
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// One row per instrument, preserving the configured order. Instruments
/// without a KPI result (failed or skipped upstream) are omitted rather than
/// rendered as error rows.
pub fn build(metas: &[InstrumentMeta], kpis: &HashMap<String, Kpis>) -> Vec<InfoRow> {
    metas
        .iter()
        .filter_map(|meta| {
            let kpis = kpis.get(&meta.symbol)?;
            Some(InfoRow {
                symbol: meta.symbol.clone(),
                name: meta.display_name.clone(),
                shares: meta.shares_held,
                cost_basis: meta.cost_basis,
                stop_price: meta.stop_price,
                pe_ratio: meta.pe_ratio.map(round2),
                dividend_yield_pct: meta.dividend_yield.map(|y| round2(y * 100.0)),
                eps: meta.eps.map(round2),
                price_to_sales: meta.price_to_sales.map(round2),
                avg_annual_return_pct: kpis.avg_annual_return_pct,
                current_price: kpis.current_price,
                high_52w: kpis.high_52w,
                low_52w: kpis.low_52w,
                all_time_high: kpis.all_time_high,
                pct_to_ath: kpis.pct_to_ath,
                max_drawdown_pct: kpis.max_drawdown_pct,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::bar::Bar;
    use crate::domain::kpi::IndicatorConfig;
    use crate::domain::series::TimeSeries;
    use chrono::{Duration, NaiveDate};

    fn make_kpis(symbol: &str, closes: &[f64]) -> Kpis {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        let bars = closes
            .iter()
            .enumerate()
            .map(|(i, &close)| Bar {
                timestamp: start + Duration::days(i as i64),
                open: close,
                high: close,
                low: close,
                close,
                volume: None,
            })
            .collect();
        let series = TimeSeries::new(symbol, None, bars).unwrap();
        Kpis::compute(&series, &IndicatorConfig::default()).unwrap()
    }

    fn meta(symbol: &str, shares: f64) -> InstrumentMeta {
        InstrumentMeta {
            symbol: symbol.to_string(),
            shares_held: shares,
            ..InstrumentMeta::default()
        }
    }

    #[test]
    fn build_preserves_instrument_order() {
        let metas = vec![meta("ZZZ", 1.0), meta("AAA", 2.0)];
        let mut kpis = HashMap::new();
        kpis.insert("ZZZ".to_string(), make_kpis("ZZZ", &[10.0, 11.0]));
        kpis.insert("AAA".to_string(), make_kpis("AAA", &[20.0, 21.0]));

        let rows = build(&metas, &kpis);
        let symbols: Vec<_> = rows.iter().map(|r| r.symbol.as_str()).collect();
        assert_eq!(symbols, vec!["ZZZ", "AAA"]);
    }

    #[test]
    fn build_omits_instruments_without_kpis() {
        let metas = vec![meta("GOOD", 1.0), meta("FAILED", 1.0)];
        let mut kpis = HashMap::new();
        kpis.insert("GOOD".to_string(), make_kpis("GOOD", &[10.0, 11.0]));

        let rows = build(&metas, &kpis);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].symbol, "GOOD");
    }

    #[test]
    fn build_scales_dividend_yield() {
        let mut instrument = meta("AAPL", 10.0);
        instrument.dividend_yield = Some(0.0055);
        let mut kpis = HashMap::new();
        kpis.insert("AAPL".to_string(), make_kpis("AAPL", &[100.0, 110.0]));

        let rows = build(&[instrument], &kpis);
        assert_eq!(rows[0].dividend_yield_pct, Some(0.55));
    }

    #[test]
    fn cells_match_column_count() {
        let mut kpis = HashMap::new();
        kpis.insert("AAPL".to_string(), make_kpis("AAPL", &[100.0, 110.0]));
        let rows = build(&[meta("AAPL", 10.0)], &kpis);

        let cells = rows[0].cells();
        assert_eq!(cells.len(), COLUMNS.len());
        assert_eq!(cells[0], "AAPL");
        assert_eq!(cells[1], "-"); // unknown name
        assert_eq!(cells[10], "110.00");
    }

    #[test]
    fn cells_format_missing_as_dash() {
        let mut kpis = HashMap::new();
        kpis.insert("X".to_string(), make_kpis("X", &[100.0]));
        let rows = build(&[meta("X", 0.0)], &kpis);

        let cells = rows[0].cells();
        assert_eq!(cells[3], "-"); // cost basis
        assert_eq!(cells[9], "-"); // avg annual return on a one-day series
    }
}
