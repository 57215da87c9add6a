//! Rolling standard deviation and the close's volatility ratio.
//!
//! Sample standard deviation over n closing prices (divides by n-1).
//! STDDEV(n)[i] = sqrt(sum((C[i-j] - SMA(n)[i])^2 for j in 0..n) / (n-1))
//! VOLRATIO(n)[i] = STDDEV(n)[i] / SMA(n)[i]
//! Warmup: first (n-1) bars are invalid.

use crate::domain::indicator::{IndicatorPoint, IndicatorSeries, IndicatorType, IndicatorValue};
use crate::domain::ohlcv::OhlcvBar;

/// Rolling coefficient of variation of the close. Undefined where the mean is zero.
pub fn calculate_volatility_ratio(bars: &[OhlcvBar], period: usize) -> IndicatorSeries {
    let closes: Vec<f64> = bars.iter().map(|b| b.close).collect();
    let stds = rolling_std(&closes, period);

    let values = stds
        .into_iter()
        .enumerate()
        .map(|(i, std)| {
            let ratio = std.and_then(|std| {
                let window = &closes[i + 1 - period..=i];
                let mean = window.iter().sum::<f64>() / period as f64;
                (mean != 0.0).then(|| std / mean)
            });
            point(&bars[i], ratio)
        })
        .collect();

    IndicatorSeries {
        indicator_type: IndicatorType::VolatilityRatio(period),
        values,
    }
}

/// Sample standard deviation over each full window. Needs `window >= 2`.
///
/// Deviations are taken from the window's first value before averaging, so
/// a constant window gives exactly zero whatever its price.
pub fn rolling_std(values: &[f64], window: usize) -> Vec<Option<f64>> {
    if window < 2 {
        return vec![None; values.len()];
    }

    (0..values.len())
        .map(|i| {
            if i + 1 < window {
                return None;
            }
            let slice = &values[i + 1 - window..=i];
            let origin = slice[0];
            let mean_shift = slice.iter().map(|v| v - origin).sum::<f64>() / window as f64;
            let variance = slice
                .iter()
                .map(|v| {
                    let diff = (v - origin) - mean_shift;
                    diff * diff
                })
                .sum::<f64>()
                / (window - 1) as f64;
            Some(variance.sqrt())
        })
        .collect()
}

fn point(bar: &OhlcvBar, value: Option<f64>) -> IndicatorPoint {
    IndicatorPoint {
        timestamp: bar.timestamp,
        valid: value.is_some(),
        value: IndicatorValue::Simple(value.unwrap_or(0.0)),
    }
}
