//! Bar source port trait.

use crate::domain::error::FxTraderError;
use crate::domain::ohlcv::OhlcvBar;
use chrono::NaiveDateTime;

pub trait DataPort {
    /// Bars for `symbol` in timestamp order, limited to the inclusive bounds
    /// when given.
    fn fetch_bars(
        &self,
        symbol: &str,
        start: Option<NaiveDateTime>,
        end: Option<NaiveDateTime>,
    ) -> Result<Vec<OhlcvBar>, FxTraderError>;

    fn list_symbols(&self) -> Result<Vec<String>, FxTraderError>;

    /// First timestamp, last timestamp and bar count, or `None` for an empty source.
    fn get_data_range(
        &self,
        symbol: &str,
    ) -> Result<Option<(NaiveDateTime, NaiveDateTime, usize)>, FxTraderError>;
}
