//! Per-bar session and range features.

use serde::Serialize;

use super::ohlcv::OhlcvBar;
use super::session::Session;

/// A bar together with the features derived from it alone.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeatureBar {
    pub bar: OhlcvBar,
    pub hour: u32,
    pub session: Session,
    pub daily_range: f64,
    /// `None` when the close is zero and the percentage has no value.
    pub daily_range_pct: Option<f64>,
}

impl FeatureBar {
    pub fn from_bar(bar: &OhlcvBar) -> Self {
        let hour = bar.hour();
        let daily_range = bar.range();
        let daily_range_pct = Some(daily_range / bar.close * 100.0).filter(|v| v.is_finite());

        FeatureBar {
            bar: bar.clone(),
            hour,
            session: Session::classify(hour),
            daily_range,
            daily_range_pct,
        }
    }
}

pub fn build_features(bars: &[OhlcvBar]) -> Vec<FeatureBar> {
    bars.iter().map(FeatureBar::from_bar).collect()
}
