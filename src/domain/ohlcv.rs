//! OHLCV bar representation and input-contract checks.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime, Timelike};
use serde::{Deserialize, Serialize};

use super::error::FxTraderError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OhlcvBar {
    pub timestamp: NaiveDateTime,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: Option<f64>,
}

impl OhlcvBar {
    /// Hour-of-day component of the timestamp, taken as-is (no timezone conversion).
    pub fn hour(&self) -> u32 {
        self.timestamp.hour()
    }

    /// high - low
    pub fn range(&self) -> f64 {
        self.high - self.low
    }

    /// max(high - low, |high - prev_close|, |low - prev_close|)
    pub fn true_range(&self, prev_close: f64) -> f64 {
        let hl = self.high - self.low;
        let hc = (self.high - prev_close).abs();
        let lc = (self.low - prev_close).abs();
        hl.max(hc).max(lc)
    }
}

const DATETIME_FORMATS: [&str; 3] = ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M"];

/// Parses a date-time or a bare date (taken as midnight).
pub fn parse_timestamp(value: &str) -> Option<NaiveDateTime> {
    let value = value.trim();
    DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(value, fmt).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(value, "%Y-%m-%d")
                .ok()
                .map(|d| d.and_time(NaiveTime::MIN))
        })
}

/// Checks the ordering and price contract the engine relies on.
pub fn validate_series(bars: &[OhlcvBar]) -> Result<(), FxTraderError> {
    for (index, bar) in bars.iter().enumerate() {
        let invalid = |reason: String| FxTraderError::InvalidBar { index, reason };

        for (name, value) in [
            ("open", bar.open),
            ("high", bar.high),
            ("low", bar.low),
            ("close", bar.close),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(invalid(format!("{name} must be a positive number, got {value}")));
            }
        }

        if bar.high < bar.low {
            return Err(invalid(format!(
                "high {} is below low {}",
                bar.high, bar.low
            )));
        }

        if let Some(volume) = bar.volume {
            if !volume.is_finite() || volume < 0.0 {
                return Err(invalid(format!("volume must be non-negative, got {volume}")));
            }
        }

        if index > 0 && bar.timestamp <= bars[index - 1].timestamp {
            return Err(invalid(format!(
                "timestamp {} does not follow {}",
                bar.timestamp,
                bars[index - 1].timestamp
            )));
        }
    }
    Ok(())
}
