//! Rate of change (price momentum) as a fraction.
//!
//! ROC(n)[i] = C[i] / C[i-n] - 1   (0.005 = +0.5 %)
//! Undefined if C[i-n] == 0.
//! Warmup: first n bars invalid.

use crate::domain::indicator::{IndicatorPoint, IndicatorSeries, IndicatorType, IndicatorValue};
use crate::domain::ohlcv::OhlcvBar;

pub fn calculate_roc(bars: &[OhlcvBar], period: usize) -> IndicatorSeries {
    let mut values = Vec::with_capacity(bars.len());

    for (i, bar) in bars.iter().enumerate() {
        let roc = if period > 0 && i >= period {
            let prev_close = bars[i - period].close;
            (prev_close != 0.0).then(|| bar.close / prev_close - 1.0)
        } else {
            None
        };

        values.push(IndicatorPoint {
            timestamp: bar.timestamp,
            valid: roc.is_some(),
            value: IndicatorValue::Simple(roc.unwrap_or(0.0)),
        });
    }

    IndicatorSeries {
        indicator_type: IndicatorType::Roc(period),
        values,
    }
}
