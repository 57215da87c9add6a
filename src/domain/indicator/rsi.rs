//! RSI (Relative Strength Index) indicator.
//!
//! Gain and loss are simple means of the positive and negated negative
//! close-to-close changes over the last n changes.
//!
//! Formula: RSI = 100 - (100 / (1 + gain / loss))
//! If loss == 0 and gain > 0: RSI = 100
//! If loss == 0 and gain == 0: undefined (no movement in the window)
//!
//! Warmup: first n bars are invalid (need n price changes).

use crate::domain::indicator::{IndicatorPoint, IndicatorSeries, IndicatorType, IndicatorValue};
use crate::domain::ohlcv::OhlcvBar;

pub fn calculate_rsi(bars: &[OhlcvBar], period: usize) -> IndicatorSeries {
    let mut values = Vec::with_capacity(bars.len());

    let changes: Vec<f64> = bars
        .windows(2)
        .map(|w| w[1].close - w[0].close)
        .collect();

    for (i, bar) in bars.iter().enumerate() {
        let rsi = if period > 0 && i >= period {
            let window = &changes[i - period..i];
            let gain = window.iter().map(|c| c.max(0.0)).sum::<f64>() / period as f64;
            let loss = window.iter().map(|c| (-c).max(0.0)).sum::<f64>() / period as f64;
            rsi_from_averages(gain, loss)
        } else {
            None
        };

        values.push(IndicatorPoint {
            timestamp: bar.timestamp,
            valid: rsi.is_some(),
            value: IndicatorValue::Simple(rsi.unwrap_or(0.0)),
        });
    }

    IndicatorSeries {
        indicator_type: IndicatorType::Rsi(period),
        values,
    }
}

fn rsi_from_averages(gain: f64, loss: f64) -> Option<f64> {
    if loss == 0.0 {
        (gain > 0.0).then_some(100.0)
    } else {
        Some(100.0 - (100.0 / (1.0 + gain / loss)))
    }
}
