//! Strategy parameters: indicator windows, reference lookbacks and decision thresholds.

use serde::{Deserialize, Serialize};

pub const DEFAULT_MACD_FAST: usize = 8;
pub const DEFAULT_MACD_SLOW: usize = 21;
pub const DEFAULT_MACD_SIGNAL: usize = 5;
pub const DEFAULT_BB_PERIOD: usize = 15;
pub const DEFAULT_BB_STD: f64 = 1.8;
pub const DEFAULT_RSI_PERIOD: usize = 10;
pub const DEFAULT_ATR_PERIOD: usize = 10;
pub const DEFAULT_VOLATILITY_PERIOD: usize = 10;
pub const DEFAULT_BREAKOUT_LOOKBACK: usize = 20;
pub const DEFAULT_VOLATILITY_LOOKBACK: usize = 50;
pub const DEFAULT_WARMUP_BARS: usize = 50;
pub const DEFAULT_STRONG_THRESHOLD: f64 = 2.5;
pub const DEFAULT_MODERATE_THRESHOLD: f64 = 1.5;

/// EMA spans of the fast/medium/slow stack.
pub const EMA_STACK: [usize; 3] = [5, 13, 34];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StrategyParams {
    pub macd_fast: usize,
    pub macd_slow: usize,
    pub macd_signal: usize,
    pub bb_period: usize,
    pub bb_std: f64,
    pub rsi_period: usize,
    pub atr_period: usize,
    pub volatility_period: usize,
    /// Window of the ATR % and range % reference averages.
    pub breakout_lookback: usize,
    /// Window of the volatility-ratio reference average.
    pub volatility_lookback: usize,
    /// Bars before this index always produce a hold decision.
    pub warmup_bars: usize,
    pub strong_threshold: f64,
    pub moderate_threshold: f64,
}

impl Default for StrategyParams {
    fn default() -> Self {
        StrategyParams {
            macd_fast: DEFAULT_MACD_FAST,
            macd_slow: DEFAULT_MACD_SLOW,
            macd_signal: DEFAULT_MACD_SIGNAL,
            bb_period: DEFAULT_BB_PERIOD,
            bb_std: DEFAULT_BB_STD,
            rsi_period: DEFAULT_RSI_PERIOD,
            atr_period: DEFAULT_ATR_PERIOD,
            volatility_period: DEFAULT_VOLATILITY_PERIOD,
            breakout_lookback: DEFAULT_BREAKOUT_LOOKBACK,
            volatility_lookback: DEFAULT_VOLATILITY_LOOKBACK,
            warmup_bars: DEFAULT_WARMUP_BARS,
            strong_threshold: DEFAULT_STRONG_THRESHOLD,
            moderate_threshold: DEFAULT_MODERATE_THRESHOLD,
        }
    }
}

impl StrategyParams {
    /// Largest rolling window any indicator or reference average uses.
    pub fn largest_window(&self) -> usize {
        [
            self.macd_slow,
            self.bb_period,
            self.rsi_period + 1,
            self.atr_period,
            self.volatility_period,
            self.breakout_lookback,
            self.volatility_lookback,
            EMA_STACK[2],
        ]
        .into_iter()
        .max()
        .unwrap_or(0)
    }

    /// Minimum number of bars a run needs before any bar can be scored.
    pub fn min_bars(&self) -> usize {
        self.warmup_bars
    }
}
