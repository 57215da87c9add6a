//! INI file configuration adapter.

use crate::domain::error::FxTraderError;
use crate::ports::config_port::ConfigPort;
use configparser::ini::Ini;
use std::path::Path;

#[derive(Debug)]
pub struct FileConfigAdapter {
    config: Ini,
}

impl FileConfigAdapter {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, FxTraderError> {
        let path = path.as_ref();
        let mut config = Ini::new();
        config
            .load(path)
            .map_err(|reason| FxTraderError::ConfigParse {
                file: path.display().to_string(),
                reason,
            })?;
        Ok(Self { config })
    }

    pub fn from_string(content: &str) -> Result<Self, FxTraderError> {
        let mut config = Ini::new();
        config
            .read(content.to_string())
            .map_err(|reason| FxTraderError::ConfigParse {
                file: "<inline>".to_string(),
                reason,
            })?;
        Ok(Self { config })
    }
}

impl ConfigPort for FileConfigAdapter {
    fn get_string(&self, section: &str, key: &str) -> Option<String> {
        self.config.get(section, key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn create_temp_config(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "{}", content).unwrap();
        file
    }

    #[test]
    fn from_string_parses_config() {
        let content = r#"
[data]
path = ./data
symbol = USDJPY

[strategy]
macd_fast = 8
"#;
        let adapter = FileConfigAdapter::from_string(content).unwrap();
        assert_eq!(adapter.get_string("data", "path"), Some("./data".to_string()));
        assert_eq!(adapter.get_string("data", "symbol"), Some("USDJPY".to_string()));
    }

    #[test]
    fn get_string_returns_none_for_missing_key() {
        let adapter = FileConfigAdapter::from_string("[backtest]\nspread_cost = 0.002\n").unwrap();
        assert_eq!(adapter.get_string("backtest", "missing"), None);
        assert_eq!(adapter.get_string("missing_section", "key"), None);
    }

    #[test]
    fn get_usize_returns_value() {
        let adapter = FileConfigAdapter::from_string("[strategy]\nrsi_period = 14\n").unwrap();
        assert_eq!(adapter.get_usize("strategy", "rsi_period", 0).unwrap(), 14);
    }

    #[test]
    fn get_usize_returns_default_for_missing() {
        let adapter = FileConfigAdapter::from_string("[strategy]\n").unwrap();
        assert_eq!(adapter.get_usize("strategy", "missing", 42).unwrap(), 42);
    }

    #[test]
    fn get_usize_rejects_negative_and_non_numeric() {
        let adapter =
            FileConfigAdapter::from_string("[strategy]\na = -3\nb = abc\n").unwrap();
        assert!(adapter.get_usize("strategy", "a", 1).is_err());
        let err = adapter.get_usize("strategy", "b", 1).unwrap_err();
        assert!(matches!(err, FxTraderError::ConfigInvalid { ref key, .. } if key == "b"));
    }

    #[test]
    fn get_double_returns_value() {
        let adapter =
            FileConfigAdapter::from_string("[backtest]\nspread_cost = 0.0015\n").unwrap();
        assert_eq!(adapter.get_double("backtest", "spread_cost", 0.0).unwrap(), 0.0015);
    }

    #[test]
    fn get_double_returns_default_for_missing() {
        let adapter = FileConfigAdapter::from_string("[backtest]\n").unwrap();
        assert_eq!(adapter.get_double("backtest", "missing", 99.9).unwrap(), 99.9);
    }

    #[test]
    fn get_double_rejects_non_numeric() {
        let adapter =
            FileConfigAdapter::from_string("[backtest]\nspread_cost = cheap\n").unwrap();
        assert!(adapter.get_double("backtest", "spread_cost", 0.002).is_err());
    }

    #[test]
    fn from_file_reads_config() {
        let file = create_temp_config("[report]\njson = /tmp/report.json\n");
        let adapter = FileConfigAdapter::from_file(file.path()).unwrap();
        assert_eq!(
            adapter.get_string("report", "json"),
            Some("/tmp/report.json".to_string())
        );
    }

    #[test]
    fn from_file_returns_error_for_missing_file() {
        let err = FileConfigAdapter::from_file("/nonexistent/path/config.ini").unwrap_err();
        assert!(matches!(err, FxTraderError::ConfigParse { .. }));
    }
}
