//! CLI definition and dispatch.
//!
//! Status and warnings go to stderr; machine-readable output to stdout.

use clap::{Parser, Subcommand};
use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

use crate::adapters::csv_adapter::CsvAdapter;
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::domain::chart;
use crate::domain::error::StockdashError;
use crate::domain::info_table;
use crate::domain::instruments::{parse_instruments, InstrumentMeta};
use crate::domain::kpi::{self, IndicatorConfig};
use crate::domain::portfolio;
use crate::domain::series::TimeSeries;
use crate::domain::timeframe::Timeframe;
use crate::ports::config_port::ConfigPort;
use crate::ports::data_port::DataPort;

#[derive(Parser, Debug)]
#[command(name = "stockdash", about = "Personal stock-portfolio dashboard")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Print the per-instrument KPI table
    Table {
        #[arg(short, long)]
        config: PathBuf,
    },
    /// Print the aggregate portfolio value series and KPIs
    Portfolio {
        #[arg(short, long)]
        config: PathBuf,
        #[arg(short, long)]
        timeframe: Option<String>,
    },
    /// Dump a chart-ready series for one symbol
    Chart {
        #[arg(short, long)]
        config: PathBuf,
        #[arg(short, long)]
        symbol: String,
        #[arg(short, long)]
        timeframe: Option<String>,
        /// Request logarithmic price scaling from the presentation layer
        #[arg(long)]
        log: bool,
    },
    /// List symbols present in the data directory
    ListSymbols {
        #[arg(short, long)]
        config: PathBuf,
    },
}

pub fn run(cli: Cli) -> ExitCode {
    match cli.command {
        Command::Table { config } => run_table(&config),
        Command::Portfolio { config, timeframe } => run_portfolio(&config, timeframe.as_deref()),
        Command::Chart {
            config,
            symbol,
            timeframe,
            log,
        } => run_chart(&config, &symbol, timeframe.as_deref(), log),
        Command::ListSymbols { config } => run_list_symbols(&config),
    }
}

pub fn load_config(path: &PathBuf) -> Result<FileConfigAdapter, ExitCode> {
    FileConfigAdapter::from_file(path).map_err(|e| {
        let err = StockdashError::ConfigParse {
            file: path.display().to_string(),
            reason: e.to_string(),
        };
        eprintln!("error: {err}");
        ExitCode::from(&err)
    })
}

pub fn build_indicator_config(adapter: &dyn ConfigPort) -> Result<IndicatorConfig, StockdashError> {
    let ma_window = adapter.get_int("indicators", "ma_window", kpi::DEFAULT_MA_WINDOW as i64);
    let extreme_window = adapter.get_int(
        "indicators",
        "extreme_window",
        kpi::DEFAULT_EXTREME_WINDOW as i64,
    );

    if ma_window <= 0 {
        return Err(StockdashError::ConfigInvalid {
            section: "indicators".into(),
            key: "ma_window".into(),
            reason: "must be a positive integer".into(),
        });
    }
    if extreme_window <= 0 {
        return Err(StockdashError::ConfigInvalid {
            section: "indicators".into(),
            key: "extreme_window".into(),
            reason: "must be a positive integer".into(),
        });
    }

    Ok(IndicatorConfig {
        ma_window: ma_window as usize,
        extreme_window: extreme_window as usize,
    })
}

fn build_data_adapter(config: &dyn ConfigPort) -> Result<CsvAdapter, StockdashError> {
    let dir = config
        .get_string("data", "csv_dir")
        .ok_or_else(|| StockdashError::ConfigMissing {
            section: "data".into(),
            key: "csv_dir".into(),
        })?;
    Ok(CsvAdapter::new(PathBuf::from(dir)))
}

fn load_instruments(config: &dyn ConfigPort) -> Result<Vec<InstrumentMeta>, StockdashError> {
    let path = config
        .get_string("portfolio", "instruments")
        .ok_or_else(|| StockdashError::ConfigMissing {
            section: "portfolio".into(),
            key: "instruments".into(),
        })?;
    let content = fs::read_to_string(&path)?;
    Ok(parse_instruments(&content)?)
}

/// Uninvested cash carried alongside the holdings, added to the reported
/// total but never to the per-date value series.
fn portfolio_cash(config: &dyn ConfigPort) -> Result<f64, StockdashError> {
    let cash = config.get_double("portfolio", "cash", 0.0);
    if cash < 0.0 {
        return Err(StockdashError::ConfigInvalid {
            section: "portfolio".into(),
            key: "cash".into(),
            reason: "must not be negative".into(),
        });
    }
    Ok(cash)
}

fn resolve_timeframe(
    override_token: Option<&str>,
    config: &dyn ConfigPort,
) -> Result<Timeframe, StockdashError> {
    let token = match override_token {
        Some(t) => t.to_string(),
        None => config
            .get_string("chart", "timeframe")
            .unwrap_or_else(|| "max".to_string()),
    };
    token
        .parse::<Timeframe>()
        .map_err(|e| StockdashError::ConfigInvalid {
            section: "chart".into(),
            key: "timeframe".into(),
            reason: e.to_string(),
        })
}

/// Fetch each instrument's series, isolating failures: a symbol with no or
/// bad data is warned about and skipped, never aborting the batch.
fn fetch_series(
    data_port: &dyn DataPort,
    metas: &[InstrumentMeta],
) -> Vec<TimeSeries> {
    let mut series_list = Vec::with_capacity(metas.len());
    for meta in metas {
        match data_port.fetch_daily(&meta.symbol) {
            Ok(series) if series.is_empty() => {
                eprintln!("warning: skipping {} (no data found)", meta.symbol);
            }
            Ok(series) => {
                eprintln!("  {}: {} bars [OK]", meta.symbol, series.len());
                series_list.push(series);
            }
            Err(e) => {
                eprintln!("warning: skipping {} ({})", meta.symbol, e);
            }
        }
    }
    series_list
}

fn run_table(config_path: &PathBuf) -> ExitCode {
    eprintln!("Loading config from {}", config_path.display());
    let config = match load_config(config_path) {
        Ok(c) => c,
        Err(code) => return code,
    };

    let indicator_config = match build_indicator_config(&config) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    let (metas, data_port) = match (load_instruments(&config), build_data_adapter(&config)) {
        (Ok(m), Ok(d)) => (m, d),
        (Err(e), _) | (_, Err(e)) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    eprintln!("Fetching {} instruments...", metas.len());
    let series_list = fetch_series(&data_port, &metas);
    if series_list.is_empty() {
        let err = StockdashError::Data {
            reason: "no instruments with data".into(),
        };
        eprintln!("error: {err}");
        return (&err).into();
    }

    let (kpis, failures) = kpi::compute_batch(&series_list, &indicator_config);
    for (symbol, error) in &failures {
        eprintln!("warning: omitting {} from table ({})", symbol, error);
    }

    let metas: Vec<InstrumentMeta> = metas
        .into_iter()
        .map(|meta| {
            let fundamentals = data_port
                .fetch_fundamentals(&meta.symbol)
                .unwrap_or_default();
            meta.with_fundamentals(fundamentals)
        })
        .collect();

    let rows = info_table::build(&metas, &kpis);

    println!("{}", info_table::COLUMNS.join("\t"));
    for row in &rows {
        println!("{}", row.cells().join("\t"));
    }
    eprintln!("{} of {} instruments listed", rows.len(), metas.len());
    ExitCode::SUCCESS
}

fn run_portfolio(config_path: &PathBuf, timeframe_override: Option<&str>) -> ExitCode {
    eprintln!("Loading config from {}", config_path.display());
    let config = match load_config(config_path) {
        Ok(c) => c,
        Err(code) => return code,
    };

    let timeframe = match resolve_timeframe(timeframe_override, &config) {
        Ok(t) => t,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    let cash = match portfolio_cash(&config) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    let (metas, data_port) = match (load_instruments(&config), build_data_adapter(&config)) {
        (Ok(m), Ok(d)) => (m, d),
        (Err(e), _) | (_, Err(e)) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    let held: Vec<InstrumentMeta> = metas.into_iter().filter(|m| m.is_held()).collect();
    if held.is_empty() {
        eprintln!("Nothing held; portfolio value is empty");
        return ExitCode::SUCCESS;
    }

    eprintln!("Fetching {} held instruments...", held.len());
    let series_list = fetch_series(&data_port, &held);

    let series_by_symbol: HashMap<String, TimeSeries> = series_list
        .into_iter()
        .map(|s| (s.symbol().to_string(), s))
        .collect();
    let shares_by_symbol: HashMap<String, f64> = held
        .iter()
        .map(|m| (m.symbol.clone(), m.shares_held))
        .collect();

    let now = chrono::Local::now().naive_local();
    let start = timeframe
        .start_from(now)
        .unwrap_or(chrono::NaiveDateTime::MIN);
    let value = portfolio::aggregate(&series_by_symbol, &shares_by_symbol, start, now);

    println!("Date,Total Value");
    for point in &value.points {
        println!("{},{:.2}", point.date, point.total);
    }

    eprintln!("\n=== Portfolio ===");
    eprintln!("Current value:    {:.2}", value.current_value());
    if cash > 0.0 {
        eprintln!("Cash:             {:.2}", cash);
        eprintln!("Total with cash:  {:.2}", value.current_value() + cash);
    }
    eprintln!(
        "YTD performance:  {:.2}%",
        value.ytd_performance(now.date())
    );
    ExitCode::SUCCESS
}

fn run_chart(
    config_path: &PathBuf,
    symbol: &str,
    timeframe_override: Option<&str>,
    log_scale: bool,
) -> ExitCode {
    let config = match load_config(config_path) {
        Ok(c) => c,
        Err(code) => return code,
    };

    let timeframe = match resolve_timeframe(timeframe_override, &config) {
        Ok(t) => t,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    let indicator_config = match build_indicator_config(&config) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    let (metas, data_port) = match (load_instruments(&config), build_data_adapter(&config)) {
        (Ok(m), Ok(d)) => (m, d),
        (Err(e), _) | (_, Err(e)) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    let series = match data_port.fetch_daily(symbol) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    let stop_price = metas
        .iter()
        .find(|m| m.symbol.eq_ignore_ascii_case(symbol))
        .and_then(|m| m.stop_price);

    let now = chrono::Local::now().naive_local();
    let bundle = chart::build(
        &series,
        timeframe,
        now,
        &indicator_config,
        stop_price,
        log_scale,
    );

    println!("Timestamp,Open,High,Low,Close,MA");
    let mut ma = bundle.moving_average.iter().peekable();
    for bar in bundle.bars.bars() {
        let ma_cell = match ma.peek() {
            Some(p) if p.timestamp == bar.timestamp => {
                let point = ma.next().and_then(|p| p.value);
                point.map(|v| format!("{:.2}", v)).unwrap_or_default()
            }
            _ => String::new(),
        };
        println!(
            "{},{},{},{},{},{}",
            bar.timestamp, bar.open, bar.high, bar.low, bar.close, ma_cell
        );
    }

    eprintln!("\n=== {} ({}) ===", bundle.symbol, timeframe);
    if let Some(high) = &bundle.high_marker {
        eprintln!("High:  {:.2} at {}", high.value, high.timestamp);
    }
    if let Some(low) = &bundle.low_marker {
        eprintln!("Low:   {:.2} at {}", low.value, low.timestamp);
    }
    if let Some(stop) = bundle.stop_line {
        eprintln!("Stop:  {:.2}", stop);
    }
    if bundle.log_scale {
        eprintln!("Scale: log");
    }
    ExitCode::SUCCESS
}

fn run_list_symbols(config_path: &PathBuf) -> ExitCode {
    let config = match load_config(config_path) {
        Ok(c) => c,
        Err(code) => return code,
    };

    let data_port = match build_data_adapter(&config) {
        Ok(d) => d,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    match data_port.list_symbols() {
        Ok(symbols) => {
            if symbols.is_empty() {
                eprintln!("No symbols found");
            } else {
                for symbol in &symbols {
                    println!("{}", symbol);
                }
                eprintln!("{} symbols found", symbols.len());
            }
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("error: {e}");
            (&e).into()
        }
    }
}
