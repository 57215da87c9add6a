//! Exponential Moving Average indicator.
//!
//! Bias-corrected (adjusted) form: weights (1-α)^k over all observations so
//! far, normalised by their sum, with α = 2/(span+1).
//!
//! Recurrence: d[i] = 1 + (1-α)·d[i-1], EMA[i] = EMA[i-1] + (C[i] - EMA[i-1]) / d[i].
//! Defined from the first bar; a constant input stays exactly constant.

use crate::domain::indicator::{IndicatorPoint, IndicatorSeries, IndicatorType, IndicatorValue};
use crate::domain::ohlcv::OhlcvBar;

pub fn calculate_ema(bars: &[OhlcvBar], span: usize) -> IndicatorSeries {
    if span == 0 || bars.is_empty() {
        return IndicatorSeries {
            indicator_type: IndicatorType::Ema(span),
            values: Vec::new(),
        };
    }

    let closes: Vec<f64> = bars.iter().map(|b| b.close).collect();
    let values = ema_values(&closes, span)
        .into_iter()
        .zip(bars)
        .map(|(ema, bar)| IndicatorPoint {
            timestamp: bar.timestamp,
            valid: true,
            value: IndicatorValue::Simple(ema),
        })
        .collect();

    IndicatorSeries {
        indicator_type: IndicatorType::Ema(span),
        values,
    }
}

/// Adjusted EMA over a raw series. Empty for a zero span.
pub fn ema_values(input: &[f64], span: usize) -> Vec<f64> {
    if span == 0 {
        return Vec::new();
    }

    let decay = 1.0 - 2.0 / (span as f64 + 1.0);
    let mut out = Vec::with_capacity(input.len());
    let mut weight = 0.0;
    let mut ema = 0.0;

    for (i, &x) in input.iter().enumerate() {
        weight = 1.0 + decay * weight;
        ema = if i == 0 { x } else { ema + (x - ema) / weight };
        out.push(ema);
    }

    out
}
