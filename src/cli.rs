//! CLI definition and dispatch.

use clap::{Parser, Subcommand};
use std::fmt::Write as _;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::{info, warn};

use crate::adapters::csv_adapter::CsvAdapter;
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::adapters::json_report_adapter::{JsonReportAdapter, LATEST_SIGNALS};
use crate::domain::analysis::{run_analysis, Analysis};
use crate::domain::config_validation::{load_config, AppConfig};
use crate::domain::error::FxTraderError;
use crate::ports::data_port::DataPort;
use crate::ports::report_port::ReportPort;

#[derive(Parser, Debug)]
#[command(name = "fxtrader", about = "Single-instrument FX signal engine and backtester")]
pub struct Cli {
    /// Log filter when RUST_LOG is unset (error, warn, info, debug, trace)
    #[arg(long, global = true, default_value = "warn")]
    pub log_level: String,
    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    pub log_json: bool,
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Score every bar, backtest the decisions and print the report
    Analyze {
        #[arg(short, long)]
        config: PathBuf,
        #[arg(long)]
        symbol: Option<String>,
        /// Write one CSV row per decision
        #[arg(long)]
        decisions: Option<PathBuf>,
        /// Write the report as JSON
        #[arg(long)]
        json: Option<PathBuf>,
    },
    /// Validate a configuration file
    Validate {
        #[arg(short, long)]
        config: PathBuf,
    },
    /// Show the data range of one or all symbols
    Info {
        #[arg(short, long)]
        config: PathBuf,
        #[arg(long)]
        symbol: Option<String>,
    },
    /// List symbols available in the data directory
    ListSymbols {
        #[arg(short, long)]
        config: PathBuf,
    },
}

pub fn run(cli: Cli) -> ExitCode {
    match cli.command {
        Command::Analyze {
            config,
            symbol,
            decisions,
            json,
        } => run_analyze(&config, symbol.as_deref(), decisions.as_ref(), json.as_ref()),
        Command::Validate { config } => run_validate(&config),
        Command::Info { config, symbol } => run_info(&config, symbol.as_deref()),
        Command::ListSymbols { config } => run_list_symbols(&config),
    }
}

fn fail(err: &FxTraderError) -> ExitCode {
    eprintln!("error: {err}");
    err.into()
}

pub fn load_app_config(path: &Path) -> Result<AppConfig, FxTraderError> {
    info!(path = %path.display(), "loading config");
    let adapter = FileConfigAdapter::from_file(path)?;
    load_config(&adapter)
}

/// Command-line symbol first, then `[data] symbol`.
pub fn resolve_symbol(
    symbol_override: Option<&str>,
    app: &AppConfig,
) -> Result<String, FxTraderError> {
    symbol_override
        .map(str::to_string)
        .or_else(|| app.data.symbol.clone())
        .map(|s| s.trim().to_uppercase())
        .filter(|s| !s.is_empty())
        .ok_or_else(|| FxTraderError::ConfigMissing {
            section: "data".to_string(),
            key: "symbol".to_string(),
        })
}

/// Fetch the configured range and run the analysis.
pub fn run_pipeline(
    data_port: &dyn DataPort,
    symbol: &str,
    app: &AppConfig,
) -> Result<Analysis, FxTraderError> {
    let bars = data_port.fetch_bars(symbol, app.data.start, app.data.end)?;
    info!(symbol, bars = bars.len(), "bars fetched");
    run_analysis(&bars, &app.strategy, &app.backtest)
}

fn run_analyze(
    config_path: &Path,
    symbol_override: Option<&str>,
    decisions_override: Option<&PathBuf>,
    json_override: Option<&PathBuf>,
) -> ExitCode {
    let app = match load_app_config(config_path) {
        Ok(a) => a,
        Err(e) => return fail(&e),
    };
    let symbol = match resolve_symbol(symbol_override, &app) {
        Ok(s) => s,
        Err(e) => return fail(&e),
    };

    let data_port = CsvAdapter::new(app.data.path.clone());
    let analysis = match run_pipeline(&data_port, &symbol, &app) {
        Ok(a) => a,
        Err(e) => {
            if e.is_insufficient_data() {
                warn!(symbol = %symbol, "not enough history; widen [data] start/end");
            }
            return fail(&e);
        }
    };

    print!("{}", format_summary(&analysis, &symbol));

    let decisions_path = decisions_override.or(app.report.decisions.as_ref());
    if let Some(path) = decisions_path {
        if let Err(e) = write_report(&data_port, &analysis, &symbol, path) {
            return fail(&e);
        }
        eprintln!("Decisions written to: {}", path.display());
    }

    let json_path = json_override.or(app.report.json.as_ref());
    if let Some(path) = json_path {
        if let Err(e) = write_report(&JsonReportAdapter::default(), &analysis, &symbol, path) {
            return fail(&e);
        }
        eprintln!("Report written to: {}", path.display());
    }

    ExitCode::SUCCESS
}

fn write_report(
    port: &dyn ReportPort,
    analysis: &Analysis,
    symbol: &str,
    path: &Path,
) -> Result<(), FxTraderError> {
    let path = path.to_str().ok_or_else(|| FxTraderError::Report {
        reason: format!("output path is not valid UTF-8: {}", path.display()),
    })?;
    port.write(analysis, symbol, path)
}

/// Human-readable report, latest signals and current position.
pub fn format_summary(analysis: &Analysis, symbol: &str) -> String {
    let r = analysis.report();
    let mut out = String::new();

    let range = match (analysis.decisions.first(), analysis.decisions.last()) {
        (Some(first), Some(last)) => format!(", {} to {}", first.timestamp, last.timestamp),
        _ => String::new(),
    };
    let _ = writeln!(
        out,
        "=== {} Analysis: {} bars{} ===",
        symbol,
        analysis.decisions.len(),
        range
    );
    let _ = writeln!(out, "Total Return:      {:.2}%", r.total_return);
    let _ = writeln!(out, "Gross Return:      {:.2}%", r.gross_return);
    let _ = writeln!(out, "Trading Costs:     {:.3}%", r.trading_costs);
    let _ = writeln!(out, "Win Rate:          {:.1}% ({})", r.win_rate * 100.0, r.grade());
    let _ = writeln!(out, "Total Trades:      {}", r.total_trades);
    let _ = writeln!(out, "Profitable Trades: {}", r.profitable_trades);
    let _ = writeln!(out, "Losing Trades:     {}", r.losing_trades);
    let _ = writeln!(out, "Avg Win:           {:.3}%", r.avg_win);
    let _ = writeln!(out, "Avg Loss:          {:.3}%", r.avg_loss);
    let _ = writeln!(out, "Best Trade:        {:.3}%", r.best_trade);
    let _ = writeln!(out, "Worst Trade:       {:.3}%", r.worst_trade);
    let _ = writeln!(out, "Profit Factor:     {}", r.profit_factor);
    let _ = writeln!(out, "Max Drawdown:      {:.2}%", r.max_drawdown);
    let _ = writeln!(out, "Sharpe Ratio:      {:.2}", r.sharpe_ratio);
    let _ = writeln!(out, "Final Value:       {:.3}", r.final_portfolio_value);

    let latest = analysis.latest_signals(LATEST_SIGNALS);
    let _ = writeln!(out, "\n=== Latest Signals ===");
    if latest.is_empty() {
        let _ = writeln!(out, "  (none)");
    }
    for d in latest {
        let _ = writeln!(
            out,
            "  {} [{}] {} @ {:.3} (confidence {:.2}) {}",
            d.timestamp, d.session, d.action, d.close, d.confidence, d.rationale
        );
    }

    if let Some(d) = analysis.current_position() {
        let _ = writeln!(out, "\n=== Current Position ===");
        let _ = writeln!(
            out,
            "  {} [{}] position {:+.1} @ {:.3}: {}",
            d.timestamp, d.session, d.position, d.close, d.rationale
        );
    }

    out
}

fn run_validate(config_path: &Path) -> ExitCode {
    let app = match load_app_config(config_path) {
        Ok(a) => a,
        Err(e) => return fail(&e),
    };

    let s = &app.strategy;
    println!("Data:       {}", app.data.path.display());
    if let Some(symbol) = &app.data.symbol {
        println!("Symbol:     {}", symbol);
    }
    println!("MACD:       {}/{}/{}", s.macd_fast, s.macd_slow, s.macd_signal);
    println!("Bollinger:  {} x {}", s.bb_period, s.bb_std);
    println!("RSI/ATR:    {}/{}", s.rsi_period, s.atr_period);
    println!("Warm-up:    {} bars", s.warmup_bars);
    println!(
        "Thresholds: strong {} / moderate {}",
        s.strong_threshold, s.moderate_threshold
    );
    println!(
        "Backtest:   spread {} / annualization {}",
        app.backtest.spread_cost, app.backtest.annualization
    );
    eprintln!("\nConfiguration is valid.");
    ExitCode::SUCCESS
}

fn run_info(config_path: &Path, symbol_override: Option<&str>) -> ExitCode {
    let app = match load_app_config(config_path) {
        Ok(a) => a,
        Err(e) => return fail(&e),
    };
    let data_port = CsvAdapter::new(app.data.path.clone());

    let symbols = match resolve_symbol(symbol_override, &app) {
        Ok(s) => vec![s],
        Err(_) => match data_port.list_symbols() {
            Ok(s) => s,
            Err(e) => return fail(&e),
        },
    };

    let mut status = ExitCode::SUCCESS;
    for symbol in &symbols {
        match data_port.get_data_range(symbol) {
            Ok(Some((first, last, count))) => {
                println!("{}: {} bars, {} to {}", symbol, count, first, last);
            }
            Ok(None) => {
                eprintln!("{}: no data found", symbol);
            }
            Err(e) => {
                eprintln!("error querying {}: {}", symbol, e);
                status = (&e).into();
            }
        }
    }
    status
}

fn run_list_symbols(config_path: &Path) -> ExitCode {
    let app = match load_app_config(config_path) {
        Ok(a) => a,
        Err(e) => return fail(&e),
    };

    let symbols = match CsvAdapter::new(app.data.path.clone()).list_symbols() {
        Ok(s) => s,
        Err(e) => return fail(&e),
    };

    if symbols.is_empty() {
        eprintln!("No symbols found in {}", app.data.path.display());
    } else {
        for symbol in &symbols {
            println!("{}", symbol);
        }
        eprintln!("{} symbols found", symbols.len());
    }
    ExitCode::SUCCESS
}
