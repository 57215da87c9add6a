//! Average True Range and ATR as a percentage of the close.
//!
//! TR[0] = H[0] - L[0]; TR[i] = max(H-L, |H-C[i-1]|, |L-C[i-1]|)
//! ATR(n)[i] = mean(TR[i-n+1..=i])
//! ATR%(n)[i] = ATR(n)[i] / C[i] * 100, undefined for a zero close.
//! Warmup: first (n-1) bars are invalid.

use crate::domain::indicator::{
    rolling_mean, IndicatorPoint, IndicatorSeries, IndicatorType, IndicatorValue,
};
use crate::domain::ohlcv::OhlcvBar;

pub fn calculate_atr(bars: &[OhlcvBar], period: usize) -> IndicatorSeries {
    let values = atr_values(bars, period)
        .into_iter()
        .zip(bars)
        .map(|(atr, bar)| point(bar, atr))
        .collect();

    IndicatorSeries {
        indicator_type: IndicatorType::Atr(period),
        values,
    }
}

pub fn calculate_atr_pct(bars: &[OhlcvBar], period: usize) -> IndicatorSeries {
    let values = atr_values(bars, period)
        .into_iter()
        .zip(bars)
        .map(|(atr, bar)| {
            let pct = atr
                .map(|atr| atr / bar.close * 100.0)
                .filter(|v| v.is_finite());
            point(bar, pct)
        })
        .collect();

    IndicatorSeries {
        indicator_type: IndicatorType::AtrPct(period),
        values,
    }
}

fn atr_values(bars: &[OhlcvBar], period: usize) -> Vec<Option<f64>> {
    let true_ranges: Vec<Option<f64>> = bars
        .iter()
        .enumerate()
        .map(|(i, bar)| {
            Some(if i == 0 {
                bar.range()
            } else {
                bar.true_range(bars[i - 1].close)
            })
        })
        .collect();

    rolling_mean(&true_ranges, period)
}

fn point(bar: &OhlcvBar, value: Option<f64>) -> IndicatorPoint {
    IndicatorPoint {
        timestamp: bar.timestamp,
        valid: value.is_some(),
        value: IndicatorValue::Simple(value.unwrap_or(0.0)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::indicator::test_support::make_hlc_bars;

    #[test]
    fn atr_warmup() {
        let bars = make_hlc_bars(&[(110.0, 90.0, 100.0); 5]);
        let series = calculate_atr(&bars, 3);
        assert_eq!(series.values.len(), 5);
        assert!(!series.values[0].valid);
        assert!(!series.values[1].valid);
        assert!(series.values[2].valid);
        assert!(series.values[4].valid);
    }

    #[test]
    fn atr_is_mean_true_range() {
        let bars = make_hlc_bars(&[
            (110.0, 100.0, 105.0),
            (115.0, 105.0, 110.0),
            (130.0, 120.0, 125.0),
        ]);
        let column = calculate_atr(&bars, 3).simple();
        // TR: 10, 10, max(10, 20, 10) = 20
        assert!((column[2].unwrap() - 40.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn atr_rolls_forward() {
        let bars = make_hlc_bars(&[
            (110.0, 100.0, 105.0),
            (115.0, 105.0, 110.0),
            (120.0, 110.0, 115.0),
            (140.0, 110.0, 120.0),
        ]);
        let column = calculate_atr(&bars, 2).simple();
        // TR: 10, 10, 10, 30
        assert!((column[3].unwrap() - 20.0).abs() < 1e-9);
    }

    #[test]
    fn atr_pct_scales_by_close() {
        let bars = make_hlc_bars(&[(151.0, 149.0, 150.0); 4]);
        let column = calculate_atr_pct(&bars, 2).simple();
        assert!((column[3].unwrap() - 2.0 / 150.0 * 100.0).abs() < 1e-12);
    }

    #[test]
    fn atr_pct_zero_close_is_undefined() {
        let bars = make_hlc_bars(&[(1.0, 0.0, 0.5), (1.0, 0.0, 0.0)]);
        let column = calculate_atr_pct(&bars, 2).simple();
        assert_eq!(column[1], None);
    }

    #[test]
    fn atr_indicator_types() {
        let bars = make_hlc_bars(&[(1.0, 0.5, 0.8)]);
        assert_eq!(calculate_atr(&bars, 10).indicator_type, IndicatorType::Atr(10));
        assert_eq!(calculate_atr_pct(&bars, 10).indicator_type, IndicatorType::AtrPct(10));
    }
}
