//! Technical indicator implementations.
//!
//! Each indicator family lives in its own file and returns an
//! [`IndicatorSeries`] aligned one-to-one with the input bars. A point is
//! `valid` only once the indicator's window is full; values are computed
//! from the current and earlier bars only.
//!
//! [`IndicatorSet`] gathers every series the scorer needs into plain
//! index-aligned columns of `Option<f64>`.

pub mod atr;
pub mod bollinger;
pub mod ema;
pub mod macd;
pub mod roc;
pub mod rsi;
pub mod sma;
pub mod stddev;

pub use atr::{calculate_atr, calculate_atr_pct};
pub use bollinger::calculate_bollinger;
pub use ema::{calculate_ema, ema_values};
pub use macd::calculate_macd;
pub use roc::calculate_roc;
pub use rsi::calculate_rsi;
pub use sma::rolling_mean;
pub use stddev::{calculate_volatility_ratio, rolling_std};

use chrono::NaiveDateTime;
use std::fmt;
use tracing::debug;

use crate::domain::ohlcv::OhlcvBar;
use crate::domain::strategy::{StrategyParams, EMA_STACK};

#[derive(Debug, Clone)]
pub struct IndicatorPoint {
    pub timestamp: NaiveDateTime,
    pub valid: bool,
    pub value: IndicatorValue,
}

#[derive(Debug, Clone)]
pub enum IndicatorValue {
    Simple(f64),
    Macd {
        line: f64,
        signal: f64,
        histogram: f64,
    },
    Bollinger {
        upper: f64,
        middle: f64,
        lower: f64,
        width: f64,
        position: f64,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum IndicatorType {
    Ema(usize),
    Rsi(usize),
    Roc(usize),
    Atr(usize),
    AtrPct(usize),
    VolatilityRatio(usize),
    Macd {
        fast: usize,
        slow: usize,
        signal: usize,
    },
    Bollinger {
        period: usize,
        /// Display label only; the bands use the unrounded multiplier.
        stddev_mult_x100: u32,
    },
}

#[derive(Debug, Clone)]
pub struct IndicatorSeries {
    pub indicator_type: IndicatorType,
    pub values: Vec<IndicatorPoint>,
}

impl IndicatorSeries {
    /// Valid `Simple` values as a column; invalid points become `None`.
    pub fn simple(&self) -> Vec<Option<f64>> {
        self.values
            .iter()
            .map(|p| match p.value {
                IndicatorValue::Simple(v) if p.valid => Some(v),
                _ => None,
            })
            .collect()
    }
}

impl fmt::Display for IndicatorType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IndicatorType::Ema(period) => write!(f, "EMA({})", period),
            IndicatorType::Rsi(period) => write!(f, "RSI({})", period),
            IndicatorType::Roc(period) => write!(f, "ROC({})", period),
            IndicatorType::Atr(period) => write!(f, "ATR({})", period),
            IndicatorType::AtrPct(period) => write!(f, "ATR%({})", period),
            IndicatorType::VolatilityRatio(period) => write!(f, "VOLRATIO({})", period),
            IndicatorType::Macd { fast, slow, signal } => {
                write!(f, "MACD({},{},{})", fast, slow, signal)
            }
            IndicatorType::Bollinger {
                period,
                stddev_mult_x100,
            } => {
                let mult = *stddev_mult_x100 as f64 / 100.0;
                write!(f, "BOLLINGER({},{})", period, mult)
            }
        }
    }
}

/// Every indicator column the scorer reads, aligned with the bar series.
#[derive(Debug, Clone, Default)]
pub struct IndicatorSet {
    pub macd: Vec<Option<f64>>,
    pub macd_signal: Vec<Option<f64>>,
    pub macd_histogram: Vec<Option<f64>>,
    pub bb_upper: Vec<Option<f64>>,
    pub bb_middle: Vec<Option<f64>>,
    pub bb_lower: Vec<Option<f64>>,
    pub bb_width: Vec<Option<f64>>,
    pub bb_position: Vec<Option<f64>>,
    pub rsi: Vec<Option<f64>>,
    pub atr: Vec<Option<f64>>,
    pub atr_pct: Vec<Option<f64>>,
    pub ema_fast: Vec<Option<f64>>,
    pub ema_mid: Vec<Option<f64>>,
    pub ema_slow: Vec<Option<f64>>,
    pub momentum_3: Vec<Option<f64>>,
    pub momentum_5: Vec<Option<f64>>,
    pub volatility_ratio: Vec<Option<f64>>,
}

impl IndicatorSet {
    pub fn compute(bars: &[OhlcvBar], params: &StrategyParams) -> Self {
        let macd = calculate_macd(bars, params.macd_fast, params.macd_slow, params.macd_signal);
        let bollinger = calculate_bollinger(bars, params.bb_period, params.bb_std);

        let mut set = IndicatorSet {
            rsi: calculate_rsi(bars, params.rsi_period).simple(),
            atr: calculate_atr(bars, params.atr_period).simple(),
            atr_pct: calculate_atr_pct(bars, params.atr_period).simple(),
            ema_fast: calculate_ema(bars, EMA_STACK[0]).simple(),
            ema_mid: calculate_ema(bars, EMA_STACK[1]).simple(),
            ema_slow: calculate_ema(bars, EMA_STACK[2]).simple(),
            momentum_3: calculate_roc(bars, 3).simple(),
            momentum_5: calculate_roc(bars, 5).simple(),
            volatility_ratio: calculate_volatility_ratio(bars, params.volatility_period).simple(),
            ..IndicatorSet::default()
        };

        for point in &macd.values {
            let (line, signal, histogram) = match point.value {
                IndicatorValue::Macd {
                    line,
                    signal,
                    histogram,
                } if point.valid => (Some(line), Some(signal), Some(histogram)),
                _ => (None, None, None),
            };
            set.macd.push(line);
            set.macd_signal.push(signal);
            set.macd_histogram.push(histogram);
        }

        for point in &bollinger.values {
            let bands = match point.value {
                IndicatorValue::Bollinger {
                    upper,
                    middle,
                    lower,
                    width,
                    position,
                } if point.valid => Some((upper, middle, lower, width, position)),
                _ => None,
            };
            set.bb_upper.push(bands.map(|b| b.0));
            set.bb_middle.push(bands.map(|b| b.1));
            set.bb_lower.push(bands.map(|b| b.2));
            set.bb_width.push(bands.map(|b| b.3));
            set.bb_position.push(bands.map(|b| b.4));
        }

        debug!(
            bars = bars.len(),
            macd = %macd.indicator_type,
            bollinger = %bollinger.indicator_type,
            "indicator set computed"
        );
        set
    }

    pub fn len(&self) -> usize {
        self.macd.len()
    }

    pub fn is_empty(&self) -> bool {
        self.macd.is_empty()
    }
}

/// Value at `i`, treating out-of-range as undefined.
pub fn at(column: &[Option<f64>], i: usize) -> Option<f64> {
    column.get(i).copied().flatten()
}


#[cfg(test)]
mod tests {
    use super::test_support::make_bars;
    use super::*;

    #[test]
    fn indicator_type_display_macd() {
        let macd = IndicatorType::Macd {
            fast: 8,
            slow: 21,
            signal: 5,
        };
        assert_eq!(macd.to_string(), "MACD(8,21,5)");
    }

    #[test]
    fn indicator_type_display_bollinger() {
        let boll = IndicatorType::Bollinger {
            period: 15,
            stddev_mult_x100: 180,
        };
        assert_eq!(boll.to_string(), "BOLLINGER(15,1.8)");
    }

    #[test]
    fn indicator_type_display_simple() {
        assert_eq!(IndicatorType::AtrPct(10).to_string(), "ATR%(10)");
        assert_eq!(IndicatorType::VolatilityRatio(10).to_string(), "VOLRATIO(10)");
    }

    #[test]
    fn simple_maps_invalid_to_none() {
        let bars = make_bars(&[1.0, 2.0, 3.0]);
        let column = calculate_roc(&bars, 1).simple();
        assert_eq!(column[0], None);
        assert_eq!(column[1], Some(1.0));
        assert_eq!(column[2], Some(0.5));
    }

    #[test]
    fn set_uses_exact_band_multiplier() {
        let prices: Vec<f64> = (0..40).map(|i| 150.0 + (i as f64 * 0.5).sin()).collect();
        let params = StrategyParams {
            bb_std: 1.825,
            ..StrategyParams::default()
        };
        let set = IndicatorSet::compute(&make_bars(&prices), &params);
        let stds = rolling_std(&prices, params.bb_period);

        for i in params.bb_period - 1..prices.len() {
            let expected = 2.0 * 1.825 * stds[i].unwrap();
            assert!((set.bb_width[i].unwrap() - expected).abs() < 1e-9, "bar {}", i);
        }
    }

    #[test]
    fn set_columns_are_aligned() {
        let prices: Vec<f64> = (0..80).map(|i| 150.0 + (i as f64 * 0.3).sin()).collect();
        let bars = make_bars(&prices);
        let set = IndicatorSet::compute(&bars, &StrategyParams::default());

        assert_eq!(set.len(), 80);
        for column in [
            &set.macd,
            &set.macd_signal,
            &set.macd_histogram,
            &set.bb_upper,
            &set.bb_middle,
            &set.bb_lower,
            &set.bb_width,
            &set.bb_position,
            &set.rsi,
            &set.atr,
            &set.atr_pct,
            &set.ema_fast,
            &set.ema_mid,
            &set.ema_slow,
            &set.momentum_3,
            &set.momentum_5,
            &set.volatility_ratio,
        ] {
            assert_eq!(column.len(), 80);
        }
    }

    #[test]
    fn every_column_defined_after_warmup() {
        let prices: Vec<f64> = (0..80).map(|i| 150.0 + (i as f64 * 0.3).sin()).collect();
        let bars = make_bars(&prices);
        let set = IndicatorSet::compute(&bars, &StrategyParams::default());

        let i = 50;
        assert!(at(&set.macd, i).is_some());
        assert!(at(&set.bb_position, i).is_some());
        assert!(at(&set.rsi, i).is_some());
        assert!(at(&set.atr_pct, i).is_some());
        assert!(at(&set.ema_slow, i).is_some());
        assert!(at(&set.momentum_5, i).is_some());
        assert!(at(&set.volatility_ratio, i).is_some());
    }

    #[test]
    fn no_lookahead() {
        let prices: Vec<f64> = (0..90).map(|i| 150.0 + (i as f64 * 0.7).cos() * 2.0).collect();
        let full = IndicatorSet::compute(&make_bars(&prices), &StrategyParams::default());
        let truncated =
            IndicatorSet::compute(&make_bars(&prices[..60]), &StrategyParams::default());

        for i in 0..60 {
            assert_eq!(full.macd[i], truncated.macd[i]);
            assert_eq!(full.bb_position[i], truncated.bb_position[i]);
            assert_eq!(full.rsi[i], truncated.rsi[i]);
            assert_eq!(full.atr_pct[i], truncated.atr_pct[i]);
            assert_eq!(full.volatility_ratio[i], truncated.volatility_ratio[i]);
        }
    }

    #[test]
    fn at_out_of_range_is_none() {
        let column = vec![Some(1.0), None];
        assert_eq!(at(&column, 0), Some(1.0));
        assert_eq!(at(&column, 1), None);
        assert_eq!(at(&column, 5), None);
    }
}
