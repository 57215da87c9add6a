//! Simple moving average over an optional column.
//!
//! SMA(n)[i] = mean(x[i-n+1..=i])
//! Warmup: first (n-1) values are undefined, as is any window holding one.

/// Rolling mean over the last `window` values, defined only when every
/// value in the window is defined.
pub fn rolling_mean(values: &[Option<f64>], window: usize) -> Vec<Option<f64>> {
    if window == 0 {
        return vec![None; values.len()];
    }

    (0..values.len())
        .map(|i| {
            if i + 1 < window {
                return None;
            }
            let slice = &values[i + 1 - window..=i];
            let sum = slice.iter().try_fold(0.0, |acc, v| v.map(|v| acc + v))?;
            Some(sum / window as f64)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sma_warmup_and_values() {
        let values: Vec<Option<f64>> = [10.0, 20.0, 30.0, 40.0].into_iter().map(Some).collect();
        let column = rolling_mean(&values, 3);
        assert_eq!(column, vec![None, None, Some(20.0), Some(30.0)]);
    }

    #[test]
    fn rolling_mean_skips_undefined_windows() {
        let values = vec![None, Some(2.0), Some(4.0), Some(6.0)];
        let out = rolling_mean(&values, 2);
        assert_eq!(out, vec![None, None, Some(3.0), Some(5.0)]);
    }

    #[test]
    fn rolling_mean_window_larger_than_input() {
        let out = rolling_mean(&[Some(1.0), Some(2.0)], 5);
        assert_eq!(out, vec![None, None]);
    }

    #[test]
    fn rolling_mean_zero_window() {
        let out = rolling_mean(&[Some(1.0)], 0);
        assert_eq!(out, vec![None]);
    }
}
