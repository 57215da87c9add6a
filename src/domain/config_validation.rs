//! Configuration loading and validation.
//!
//! Every value is read through [`ConfigPort`] and checked before any bar is
//! fetched, so a bad file fails fast with the offending section and key.

use std::path::PathBuf;

use chrono::NaiveDateTime;

use crate::domain::backtest::BacktestConfig;
use crate::domain::error::FxTraderError;
use crate::domain::ohlcv::parse_timestamp;
use crate::domain::strategy::StrategyParams;
use crate::ports::config_port::ConfigPort;

#[derive(Debug, Clone, PartialEq)]
pub struct DataConfig {
    /// Directory holding one `<SYMBOL>.csv` per instrument.
    pub path: PathBuf,
    pub symbol: Option<String>,
    pub start: Option<NaiveDateTime>,
    pub end: Option<NaiveDateTime>,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct ReportConfig {
    pub decisions: Option<PathBuf>,
    pub json: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub data: DataConfig,
    pub strategy: StrategyParams,
    pub backtest: BacktestConfig,
    pub report: ReportConfig,
}

pub fn load_config(config: &dyn ConfigPort) -> Result<AppConfig, FxTraderError> {
    Ok(AppConfig {
        data: load_data_config(config)?,
        strategy: load_strategy_params(config)?,
        backtest: load_backtest_config(config)?,
        report: load_report_config(config),
    })
}

fn invalid(section: &str, key: &str, reason: impl Into<String>) -> FxTraderError {
    FxTraderError::ConfigInvalid {
        section: section.to_string(),
        key: key.to_string(),
        reason: reason.into(),
    }
}

fn non_empty(config: &dyn ConfigPort, section: &str, key: &str) -> Option<String> {
    config
        .get_string(section, key)
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

pub fn load_data_config(config: &dyn ConfigPort) -> Result<DataConfig, FxTraderError> {
    let path = non_empty(config, "data", "path").ok_or_else(|| FxTraderError::ConfigMissing {
        section: "data".to_string(),
        key: "path".to_string(),
    })?;

    let start = parse_bound(config, "start")?;
    let end = parse_bound(config, "end")?;
    if let (Some(start), Some(end)) = (start, end) {
        if start > end {
            return Err(invalid("data", "start", "start must not be after end"));
        }
    }

    Ok(DataConfig {
        path: PathBuf::from(path),
        symbol: non_empty(config, "data", "symbol"),
        start,
        end,
    })
}

fn parse_bound(config: &dyn ConfigPort, key: &str) -> Result<Option<NaiveDateTime>, FxTraderError> {
    match non_empty(config, "data", key) {
        None => Ok(None),
        Some(raw) => parse_timestamp(&raw).map(Some).ok_or_else(|| {
            invalid(
                "data",
                key,
                format!("invalid {} '{}', expected YYYY-MM-DD or YYYY-MM-DD HH:MM:SS", key, raw),
            )
        }),
    }
}

pub fn load_strategy_params(config: &dyn ConfigPort) -> Result<StrategyParams, FxTraderError> {
    let d = StrategyParams::default();
    let s = "strategy";
    let params = StrategyParams {
        macd_fast: config.get_usize(s, "macd_fast", d.macd_fast)?,
        macd_slow: config.get_usize(s, "macd_slow", d.macd_slow)?,
        macd_signal: config.get_usize(s, "macd_signal", d.macd_signal)?,
        bb_period: config.get_usize(s, "bb_period", d.bb_period)?,
        bb_std: config.get_double(s, "bb_std", d.bb_std)?,
        rsi_period: config.get_usize(s, "rsi_period", d.rsi_period)?,
        atr_period: config.get_usize(s, "atr_period", d.atr_period)?,
        volatility_period: config.get_usize(s, "volatility_period", d.volatility_period)?,
        breakout_lookback: config.get_usize(s, "breakout_lookback", d.breakout_lookback)?,
        volatility_lookback: config.get_usize(s, "volatility_lookback", d.volatility_lookback)?,
        warmup_bars: config.get_usize(s, "warmup_bars", d.warmup_bars)?,
        strong_threshold: config.get_double(s, "strong_threshold", d.strong_threshold)?,
        moderate_threshold: config.get_double(s, "moderate_threshold", d.moderate_threshold)?,
    };
    validate_strategy_params(&params)?;
    Ok(params)
}

pub fn validate_strategy_params(params: &StrategyParams) -> Result<(), FxTraderError> {
    for (key, value) in [
        ("macd_fast", params.macd_fast),
        ("macd_slow", params.macd_slow),
        ("macd_signal", params.macd_signal),
        ("bb_period", params.bb_period),
        ("rsi_period", params.rsi_period),
        ("atr_period", params.atr_period),
        ("volatility_period", params.volatility_period),
        ("breakout_lookback", params.breakout_lookback),
        ("volatility_lookback", params.volatility_lookback),
    ] {
        if value == 0 {
            return Err(invalid("strategy", key, format!("{} must be at least 1", key)));
        }
    }

    // the sample deviation needs two points
    for (key, value) in [
        ("bb_period", params.bb_period),
        ("volatility_period", params.volatility_period),
    ] {
        if value < 2 {
            return Err(invalid("strategy", key, format!("{} must be at least 2", key)));
        }
    }

    if params.macd_fast >= params.macd_slow {
        return Err(invalid(
            "strategy",
            "macd_fast",
            "macd_fast must be shorter than macd_slow",
        ));
    }

    if !(params.bb_std.is_finite() && params.bb_std > 0.0) {
        return Err(invalid("strategy", "bb_std", "bb_std must be positive"));
    }

    let largest = params.largest_window();
    if params.warmup_bars < largest {
        return Err(invalid(
            "strategy",
            "warmup_bars",
            format!(
                "warmup_bars ({}) must cover the largest window ({})",
                params.warmup_bars, largest
            ),
        ));
    }

    if !(params.moderate_threshold.is_finite() && params.moderate_threshold > 0.0) {
        return Err(invalid(
            "strategy",
            "moderate_threshold",
            "moderate_threshold must be positive",
        ));
    }

    if !params.strong_threshold.is_finite() || params.strong_threshold < params.moderate_threshold {
        return Err(invalid(
            "strategy",
            "strong_threshold",
            "strong_threshold must not be below moderate_threshold",
        ));
    }

    Ok(())
}

pub fn load_backtest_config(config: &dyn ConfigPort) -> Result<BacktestConfig, FxTraderError> {
    let d = BacktestConfig::default();
    let backtest = BacktestConfig {
        spread_cost: config.get_double("backtest", "spread_cost", d.spread_cost)?,
        annualization: config.get_double("backtest", "annualization", d.annualization)?,
    };
    validate_backtest_config(&backtest)?;
    Ok(backtest)
}

pub fn validate_backtest_config(backtest: &BacktestConfig) -> Result<(), FxTraderError> {
    if !(backtest.spread_cost.is_finite() && backtest.spread_cost >= 0.0) {
        return Err(invalid(
            "backtest",
            "spread_cost",
            "spread_cost must be non-negative",
        ));
    }
    if !(backtest.annualization.is_finite() && backtest.annualization > 0.0) {
        return Err(invalid(
            "backtest",
            "annualization",
            "annualization must be positive",
        ));
    }
    Ok(())
}

pub fn load_report_config(config: &dyn ConfigPort) -> ReportConfig {
    ReportConfig {
        decisions: non_empty(config, "report", "decisions").map(PathBuf::from),
        json: non_empty(config, "report", "json").map(PathBuf::from),
    }
}
