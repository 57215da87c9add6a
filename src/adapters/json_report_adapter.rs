//! JSON report adapter: performance report, grade and most recent signals.

use crate::domain::analysis::Analysis;
use crate::domain::decision::Decision;
use crate::domain::error::FxTraderError;
use crate::domain::metrics::{AccuracyGrade, PerformanceReport};
use crate::domain::strategy::StrategyParams;
use crate::ports::report_port::ReportPort;
use serde::Serialize;
use std::fs;
use tracing::info;

/// Number of recent non-hold decisions included in the report.
pub const LATEST_SIGNALS: usize = 3;

pub struct JsonReportAdapter {
    pretty: bool,
}

#[derive(Serialize)]
struct JsonReport<'a> {
    symbol: &'a str,
    bars: usize,
    strategy: &'a StrategyParams,
    performance: &'a PerformanceReport,
    grade: AccuracyGrade,
    latest_signals: Vec<&'a Decision>,
    current_position: Option<&'a Decision>,
}

impl JsonReportAdapter {
    pub fn new(pretty: bool) -> Self {
        Self { pretty }
    }

    pub fn render(&self, analysis: &Analysis, symbol: &str) -> Result<String, FxTraderError> {
        let report = JsonReport {
            symbol,
            bars: analysis.decisions.len(),
            strategy: &analysis.params,
            performance: analysis.report(),
            grade: analysis.report().grade(),
            latest_signals: analysis.latest_signals(LATEST_SIGNALS),
            current_position: analysis.current_position(),
        };

        let rendered = if self.pretty {
            serde_json::to_string_pretty(&report)
        } else {
            serde_json::to_string(&report)
        };
        rendered.map_err(|e| FxTraderError::Report {
            reason: format!("failed to serialize report: {}", e),
        })
    }
}

impl Default for JsonReportAdapter {
    fn default() -> Self {
        Self::new(true)
    }
}

impl ReportPort for JsonReportAdapter {
    fn write(
        &self,
        analysis: &Analysis,
        symbol: &str,
        output_path: &str,
    ) -> Result<(), FxTraderError> {
        let json = self.render(analysis, symbol)?;
        fs::write(output_path, json).map_err(|e| FxTraderError::Report {
            reason: format!("failed to write {}: {}", output_path, e),
        })?;
        info!(symbol, path = output_path, "JSON report written");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::analysis::run_analysis;
    use crate::domain::backtest::BacktestConfig;
    use crate::domain::ohlcv::OhlcvBar;
    use chrono::{Duration, NaiveDate};
    use tempfile::TempDir;

    fn flat_analysis() -> Analysis {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        let bars: Vec<OhlcvBar> = (0..60)
            .map(|i| OhlcvBar {
                timestamp: start + Duration::hours(i),
                open: 150.0,
                high: 150.0,
                low: 150.0,
                close: 150.0,
                volume: None,
            })
            .collect();
        run_analysis(&bars, &StrategyParams::default(), &BacktestConfig::default()).unwrap()
    }

    #[test]
    fn render_contains_report_fields() {
        let json = JsonReportAdapter::default().render(&flat_analysis(), "USDJPY").unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["symbol"], "USDJPY");
        assert_eq!(value["bars"], 60);
        assert_eq!(value["performance"]["total_trades"], 0);
        assert_eq!(value["performance"]["profit_factor"], 0.0);
        assert_eq!(value["performance"]["final_portfolio_value"], 1.0);
        assert_eq!(value["grade"], "needs_work");
        assert_eq!(value["latest_signals"].as_array().map(Vec::len), Some(0));
        assert_eq!(value["current_position"]["signal"], 0);
        assert_eq!(value["current_position"]["session"], "London");
        assert_eq!(value["strategy"]["macd_slow"], 21);
    }

    #[test]
    fn write_creates_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("report.json");
        JsonReportAdapter::new(false)
            .write(&flat_analysis(), "USDJPY", path.to_str().unwrap())
            .unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert!(!content.contains('\n'));
        assert!(content.contains("\"symbol\":\"USDJPY\""));
    }

    #[test]
    fn write_to_missing_directory_is_report_error() {
        let err = JsonReportAdapter::default()
            .write(&flat_analysis(), "USDJPY", "/nonexistent/dir/report.json")
            .unwrap_err();
        assert!(matches!(err, FxTraderError::Report { .. }));
    }
}
