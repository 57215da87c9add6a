//! CSV file data adapter: one `<SYMBOL>.csv` per instrument, plus decision export.
//!
//! Expected header: `timestamp,open,high,low,close[,volume]`. A `date` or
//! `datetime` column is accepted in place of `timestamp`; bare dates are read
//! as midnight.

use crate::domain::analysis::Analysis;
use crate::domain::error::FxTraderError;
use crate::domain::ohlcv::{parse_timestamp, OhlcvBar};
use crate::ports::data_port::DataPort;
use crate::ports::report_port::ReportPort;
use chrono::NaiveDateTime;
use serde::Deserialize;
use std::fs;
use std::path::PathBuf;
use tracing::{debug, info};

pub struct CsvAdapter {
    base_path: PathBuf,
}

#[derive(Debug, Deserialize)]
struct CsvRow {
    #[serde(alias = "date", alias = "datetime")]
    timestamp: String,
    open: f64,
    high: f64,
    low: f64,
    close: f64,
    #[serde(default)]
    volume: Option<f64>,
}

impl CsvAdapter {
    pub fn new(base_path: PathBuf) -> Self {
        Self { base_path }
    }

    fn csv_path(&self, symbol: &str) -> PathBuf {
        self.base_path.join(format!("{}.csv", symbol))
    }
}

impl DataPort for CsvAdapter {
    fn fetch_bars(
        &self,
        symbol: &str,
        start: Option<NaiveDateTime>,
        end: Option<NaiveDateTime>,
    ) -> Result<Vec<OhlcvBar>, FxTraderError> {
        let path = self.csv_path(symbol);
        let content = fs::read_to_string(&path).map_err(|e| FxTraderError::Data {
            reason: format!("failed to read {}: {}", path.display(), e),
        })?;

        let mut rdr = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(content.as_bytes());
        let mut bars = Vec::new();

        for (line, result) in rdr.deserialize::<CsvRow>().enumerate() {
            let row = result.map_err(|e| FxTraderError::Data {
                reason: format!("CSV parse error in {}: {}", path.display(), e),
            })?;

            let timestamp = parse_timestamp(&row.timestamp).ok_or_else(|| FxTraderError::Data {
                reason: format!(
                    "invalid timestamp '{}' on data row {} of {}",
                    row.timestamp,
                    line + 1,
                    path.display()
                ),
            })?;

            if start.is_some_and(|s| timestamp < s) || end.is_some_and(|e| timestamp > e) {
                continue;
            }

            bars.push(OhlcvBar {
                timestamp,
                open: row.open,
                high: row.high,
                low: row.low,
                close: row.close,
                volume: row.volume,
            });
        }

        bars.sort_by_key(|b| b.timestamp);
        debug!(symbol, bars = bars.len(), path = %path.display(), "loaded bars");
        Ok(bars)
    }

    fn list_symbols(&self) -> Result<Vec<String>, FxTraderError> {
        let entries = fs::read_dir(&self.base_path).map_err(|e| FxTraderError::Data {
            reason: format!(
                "failed to read directory {}: {}",
                self.base_path.display(),
                e
            ),
        })?;

        let mut symbols = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| FxTraderError::Data {
                reason: format!("directory entry error: {}", e),
            })?;

            let name = entry.file_name();
            if let Some(symbol) = name.to_string_lossy().strip_suffix(".csv") {
                symbols.push(symbol.to_string());
            }
        }

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

/// Writes one CSV row per decision.
impl ReportPort for CsvAdapter {
    fn write(
        &self,
        analysis: &Analysis,
        symbol: &str,
        output_path: &str,
    ) -> Result<(), FxTraderError> {
        let report_err = |e: csv::Error| FxTraderError::Report {
            reason: format!("failed to write {}: {}", output_path, e),
        };

        let mut writer = csv::Writer::from_path(output_path).map_err(report_err)?;
        for decision in &analysis.decisions {
            writer.serialize(decision).map_err(report_err)?;
        }
        writer.flush()?;

        info!(symbol, rows = analysis.decisions.len(), path = output_path, "decisions written");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use tempfile::TempDir;

    fn ts(day: u32, hour: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 1, day)
            .unwrap()
            .and_hms_opt(hour, 0, 0)
            .unwrap()
    }

    fn setup_test_data() -> (TempDir, PathBuf) {
        let dir = TempDir::new().unwrap();
        let path = dir.path().to_path_buf();

        let csv_content = "timestamp,open,high,low,close,volume\n\
            2024-01-15 10:00:00,150.10,150.40,149.90,150.20,1200\n\
            2024-01-15 09:00:00,150.00,150.30,149.80,150.10,1000\n\
            2024-01-15 11:00:00,150.20,150.60,150.00,150.50,\n";

        fs::write(path.join("USDJPY.csv"), csv_content).unwrap();
        fs::write(
            path.join("EURUSD.csv"),
            "date,open,high,low,close\n2024-01-15,1.09,1.10,1.08,1.095\n",
        )
        .unwrap();
        fs::write(path.join("notes.txt"), "not data").unwrap();

        (dir, path)
    }

    #[test]
    fn fetch_bars_returns_sorted_data() {
        let (_dir, path) = setup_test_data();
        let adapter = CsvAdapter::new(path);

        let bars = adapter.fetch_bars("USDJPY", None, None).unwrap();
        assert_eq!(bars.len(), 3);
        assert_eq!(bars[0].timestamp, ts(15, 9));
        assert_eq!(bars[0].open, 150.00);
        assert_eq!(bars[0].volume, Some(1000.0));
        assert_eq!(bars[2].volume, None);
    }

    #[test]
    fn fetch_bars_filters_inclusive_bounds() {
        let (_dir, path) = setup_test_data();
        let adapter = CsvAdapter::new(path);

        let bars = adapter
            .fetch_bars("USDJPY", Some(ts(15, 10)), Some(ts(15, 10)))
            .unwrap();
        assert_eq!(bars.len(), 1);
        assert_eq!(bars[0].close, 150.20);
    }

    #[test]
    fn fetch_bars_accepts_date_column() {
        let (_dir, path) = setup_test_data();
        let adapter = CsvAdapter::new(path);

        let bars = adapter.fetch_bars("EURUSD", None, None).unwrap();
        assert_eq!(bars.len(), 1);
        assert_eq!(bars[0].timestamp, ts(15, 0));
        assert_eq!(bars[0].volume, None);
    }

    #[test]
    fn fetch_bars_missing_file_is_data_error() {
        let (_dir, path) = setup_test_data();
        let adapter = CsvAdapter::new(path);

        let err = adapter.fetch_bars("GBPUSD", None, None).unwrap_err();
        assert!(matches!(err, FxTraderError::Data { .. }));
    }

    #[test]
    fn fetch_bars_rejects_bad_timestamp() {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join("BAD.csv"),
            "timestamp,open,high,low,close\nyesterday,1,1,1,1\n",
        )
        .unwrap();
        let adapter = CsvAdapter::new(dir.path().to_path_buf());

        let err = adapter.fetch_bars("BAD", None, None).unwrap_err();
        assert!(err.to_string().contains("yesterday"));
    }

    #[test]
    fn list_symbols_returns_csv_stems() {
        let (_dir, path) = setup_test_data();
        let adapter = CsvAdapter::new(path);

        assert_eq!(adapter.list_symbols().unwrap(), vec!["EURUSD", "USDJPY"]);
    }

    #[test]
    fn data_range_spans_file() {
        let (_dir, path) = setup_test_data();
        let adapter = CsvAdapter::new(path);

        let (first, last, count) = adapter.get_data_range("USDJPY").unwrap().unwrap();
        assert_eq!(first, ts(15, 9));
        assert_eq!(last, ts(15, 11));
        assert_eq!(count, 3);
    }

    #[test]
    fn data_range_of_empty_file_is_none() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("EMPTY.csv"), "timestamp,open,high,low,close\n").unwrap();
        let adapter = CsvAdapter::new(dir.path().to_path_buf());

        assert_eq!(adapter.get_data_range("EMPTY").unwrap(), None);
    }
}
