//! Bollinger Bands indicator.
//!
//! Bollinger Bands consist of:
//! - Middle: Simple Moving Average (SMA) over n periods
//! - Upper: Middle + (multiplier × StdDev)
//! - Lower: Middle - (multiplier × StdDev)
//! - Width: Upper - Lower
//! - Position: (Close - Lower) / Width, 0.5 when the band has no width
//!
//! StdDev is the sample standard deviation (divides by N-1).
//!
//! FX defaults: period=15, multiplier=1.8
//! Warmup: first (period-1) bars are invalid.

use crate::domain::indicator::{
    rolling_std, IndicatorPoint, IndicatorSeries, IndicatorType, IndicatorValue,
};
use crate::domain::ohlcv::OhlcvBar;

/// Band position reported for a zero-width band.
pub const NEUTRAL_POSITION: f64 = 0.5;

pub fn calculate_bollinger(bars: &[OhlcvBar], period: usize, mult: f64) -> IndicatorSeries {
    let closes: Vec<f64> = bars.iter().map(|b| b.close).collect();
    let stds = rolling_std(&closes, period);

    let mut values = Vec::with_capacity(bars.len());
    for (i, bar) in bars.iter().enumerate() {
        let value = match stds[i] {
            Some(stddev) => {
                let window = &closes[i + 1 - period..=i];
                let middle = window.iter().sum::<f64>() / period as f64;
                let upper = middle + mult * stddev;
                let lower = middle - mult * stddev;
                let width = upper - lower;
                let position = if width == 0.0 {
                    NEUTRAL_POSITION
                } else {
                    (bar.close - lower) / width
                };
                IndicatorValue::Bollinger {
                    upper,
                    middle,
                    lower,
                    width,
                    position,
                }
            }
            None => IndicatorValue::Bollinger {
                upper: 0.0,
                middle: 0.0,
                lower: 0.0,
                width: 0.0,
                position: NEUTRAL_POSITION,
            },
        };

        values.push(IndicatorPoint {
            timestamp: bar.timestamp,
            valid: stds[i].is_some(),
            value,
        });
    }

    IndicatorSeries {
        indicator_type: IndicatorType::Bollinger {
            period,
            stddev_mult_x100: (mult * 100.0).round() as u32,
        },
        values,
    }
}
