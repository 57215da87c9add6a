#![allow(dead_code)]

use chrono::{Duration, NaiveDate, NaiveDateTime};
use fxtrader::domain::backtest::BacktestConfig;
use fxtrader::domain::config_validation::{AppConfig, DataConfig, ReportConfig};
use fxtrader::domain::error::FxTraderError;
pub use fxtrader::domain::ohlcv::OhlcvBar;
use fxtrader::domain::strategy::StrategyParams;
use fxtrader::ports::data_port::DataPort;
use std::collections::HashMap;
use std::path::PathBuf;

pub struct MockDataPort {
    pub data: HashMap<String, Vec<OhlcvBar>>,
    pub errors: HashMap<String, String>,
}

impl MockDataPort {
    pub fn new() -> Self {
        Self {
            data: HashMap::new(),
            errors: HashMap::new(),
        }
    }

    pub fn with_bars(mut self, symbol: &str, bars: Vec<OhlcvBar>) -> Self {
        self.data.insert(symbol.to_string(), bars);
        self
    }

    pub fn with_error(mut self, symbol: &str, reason: &str) -> Self {
        self.errors.insert(symbol.to_string(), reason.to_string());
        self
    }
}

impl DataPort for MockDataPort {
    fn fetch_bars(
        &self,
        symbol: &str,
        start: Option<NaiveDateTime>,
        end: Option<NaiveDateTime>,
    ) -> Result<Vec<OhlcvBar>, FxTraderError> {
        if let Some(reason) = self.errors.get(symbol) {
            return Err(FxTraderError::Data {
                reason: reason.clone(),
            });
        }
        Ok(self
            .data
            .get(symbol)
            .map(|bars| {
                bars.iter()
                    .filter(|b| start.is_none_or(|s| b.timestamp >= s))
                    .filter(|b| end.is_none_or(|e| b.timestamp <= e))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default())
    }

    fn list_symbols(&self) -> Result<Vec<String>, FxTraderError> {
        let mut symbols: Vec<String> = self.data.keys().cloned().collect();
        symbols.sort();
        Ok(symbols)
    }

    fn get_data_range(
        &self,
        symbol: &str,
    ) -> Result<Option<(NaiveDateTime, NaiveDateTime, usize)>, FxTraderError> {
        let bars = self.fetch_bars(symbol, None, None)?;
        Ok(match (bars.first(), bars.last()) {
            (Some(first), Some(last)) => Some((first.timestamp, last.timestamp, bars.len())),
            _ => None,
        })
    }
}

pub fn ts(year: i32, month: u32, day: u32, hour: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(year, month, day)
        .unwrap()
        .and_hms_opt(hour, 0, 0)
        .unwrap()
}

pub fn make_bar(timestamp: NaiveDateTime, close: f64) -> OhlcvBar {
    OhlcvBar {
        timestamp,
        open: close,
        high: close * 1.002,
        low: close * 0.998,
        close,
        volume: Some(1000.0),
    }
}

/// One bar per day at `hour`, starting 2024-01-01.
pub fn daily_bars(closes: &[f64], hour: u32) -> Vec<OhlcvBar> {
    let start = ts(2024, 1, 1, hour);
    closes
        .iter()
        .enumerate()
        .map(|(i, &close)| make_bar(start + Duration::days(i as i64), close))
        .collect()
}

/// One bar per hour from midnight with open = high = low = close.
pub fn flat_hourly_bars(n: usize, price: f64) -> Vec<OhlcvBar> {
    let start = ts(2024, 1, 1, 0);
    (0..n)
        .map(|i| flat_bar(start + Duration::hours(i as i64), price))
        .collect()
}

fn flat_bar(timestamp: NaiveDateTime, price: f64) -> OhlcvBar {
    OhlcvBar {
        timestamp,
        open: price,
        high: price,
        low: price,
        close: price,
        volume: None,
    }
}

/// One bar per day at `hour` with open = high = low = close.
pub fn flat_daily_bars(n: usize, price: f64, hour: u32) -> Vec<OhlcvBar> {
    let start = ts(2024, 1, 1, hour);
    (0..n)
        .map(|i| flat_bar(start + Duration::days(i as i64), price))
        .collect()
}

/// Closes rising by a fixed step per bar from 150.
pub fn linear_trend(n: usize, step: f64) -> Vec<f64> {
    (0..n).map(|t| 150.0 + step * t as f64).collect()
}

/// Closes compounding 1 % per bar from 150.
pub fn uptrend(n: usize) -> Vec<f64> {
    (0..n).map(|t| 150.0 * 1.01_f64.powi(t as i32)).collect()
}

pub fn app_config(path: PathBuf, symbol: Option<&str>) -> AppConfig {
    AppConfig {
        data: DataConfig {
            path,
            symbol: symbol.map(str::to_string),
            start: None,
            end: None,
        },
        strategy: StrategyParams::default(),
        backtest: BacktestConfig::default(),
        report: ReportConfig::default(),
    }
}
