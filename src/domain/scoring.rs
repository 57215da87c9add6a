//! Multi-factor scoring: four independent sub-scores per bar.
//!
//! Every scorer is a pure function of the bar index and the immutable
//! feature, indicator and reference columns. An undefined input skips the
//! test that needs it.

use serde::Serialize;
use std::fmt;

use crate::domain::features::FeatureBar;
use crate::domain::indicator::{at, rolling_mean, IndicatorSet};
use crate::domain::session::Session;
use crate::domain::strategy::StrategyParams;

const RSI_OVERSOLD: f64 = 25.0;
const RSI_OVERBOUGHT: f64 = 75.0;
const RSI_NEUTRAL_LOW: f64 = 40.0;
const RSI_NEUTRAL_HIGH: f64 = 60.0;

const BB_EXTREME_LOW: f64 = 0.05;
const BB_EXTREME_HIGH: f64 = 0.95;
const BB_LOW: f64 = 0.20;
const BB_HIGH: f64 = 0.80;

const ATR_EXPANSION: f64 = 1.2;
const BREAKOUT_MOVE: f64 = 0.005;
const RANGE_EXPANSION: f64 = 1.3;

const STABLE_VOLATILITY: f64 = 1.1;
const HIGH_VOLATILITY: f64 = 1.5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Momentum,
    MeanReversion,
    Breakout,
    Risk,
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Category::Momentum => "momentum",
            Category::MeanReversion => "mean_reversion",
            Category::Breakout => "breakout",
            Category::Risk => "risk",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SubScore {
    pub category: Category,
    pub value: f64,
    pub tags: Vec<&'static str>,
}

impl SubScore {
    fn new(category: Category) -> Self {
        SubScore {
            category,
            value: 0.0,
            tags: Vec::new(),
        }
    }

    fn add(&mut self, points: f64, tag: &'static str) {
        self.value += points;
        self.tags.push(tag);
    }
}

/// The four sub-scores of one bar, in fixed scorer order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SubScores {
    pub momentum: SubScore,
    pub mean_reversion: SubScore,
    pub breakout: SubScore,
    pub risk: SubScore,
}

impl SubScores {
    pub fn iter(&self) -> impl Iterator<Item = &SubScore> {
        [&self.momentum, &self.mean_reversion, &self.breakout, &self.risk].into_iter()
    }
}

/// Rolling reference averages the breakout and risk scorers compare against.
#[derive(Debug, Clone, Default)]
pub struct ReferenceLevels {
    pub atr_pct_avg: Vec<Option<f64>>,
    pub range_pct_avg: Vec<Option<f64>>,
    pub volatility_avg: Vec<Option<f64>>,
}

impl ReferenceLevels {
    pub fn compute(
        features: &[FeatureBar],
        indicators: &IndicatorSet,
        params: &StrategyParams,
    ) -> Self {
        let range_pct: Vec<Option<f64>> = features.iter().map(|f| f.daily_range_pct).collect();
        ReferenceLevels {
            atr_pct_avg: rolling_mean(&indicators.atr_pct, params.breakout_lookback),
            range_pct_avg: rolling_mean(&range_pct, params.breakout_lookback),
            volatility_avg: rolling_mean(&indicators.volatility_ratio, params.volatility_lookback),
        }
    }
}

/// Immutable inputs shared by every per-bar scorer.
#[derive(Debug, Clone, Copy)]
pub struct ScoringContext<'a> {
    pub features: &'a [FeatureBar],
    pub indicators: &'a IndicatorSet,
    pub references: &'a ReferenceLevels,
}

impl ScoringContext<'_> {
    pub fn score_bar(&self, i: usize) -> SubScores {
        let session = self.features[i].session;
        SubScores {
            momentum: score_momentum(i, self.indicators),
            mean_reversion: score_mean_reversion(i, self.indicators),
            breakout: score_breakout(i, self.features, self.indicators, self.references),
            risk: score_risk(i, session, self.indicators, self.references),
        }
    }
}

/// MACD direction (strong when the histogram widens that way) plus the EMA stack.
pub fn score_momentum(i: usize, ind: &IndicatorSet) -> SubScore {
    let mut score = SubScore::new(Category::Momentum);

    if let (Some(macd), Some(signal), Some(hist)) = (
        at(&ind.macd, i),
        at(&ind.macd_signal, i),
        at(&ind.macd_histogram, i),
    ) {
        let prev_hist = i.checked_sub(1).and_then(|p| at(&ind.macd_histogram, p));
        if macd > signal {
            if prev_hist.is_some_and(|prev| hist > prev) {
                score.add(2.0, "macd_strong_bull");
            } else {
                score.add(1.0, "macd_bull");
            }
        } else if macd < signal {
            if prev_hist.is_some_and(|prev| hist < prev) {
                score.add(-2.0, "macd_strong_bear");
            } else {
                score.add(-1.0, "macd_bear");
            }
        }
    }

    if let (Some(fast), Some(mid), Some(slow)) =
        (at(&ind.ema_fast, i), at(&ind.ema_mid, i), at(&ind.ema_slow, i))
    {
        if fast > mid && mid > slow {
            score.add(1.0, "ema_bullish");
        } else if fast < mid && mid < slow {
            score.add(-1.0, "ema_bearish");
        }
    }

    score
}

/// RSI extremes and Bollinger position. Band thresholds stack: a position
/// under 0.05 also counts as under 0.20.
pub fn score_mean_reversion(i: usize, ind: &IndicatorSet) -> SubScore {
    let mut score = SubScore::new(Category::MeanReversion);

    if let Some(rsi) = at(&ind.rsi, i) {
        if rsi < RSI_OVERSOLD {
            score.add(2.0, "rsi_oversold");
        } else if rsi > RSI_OVERBOUGHT {
            score.add(-2.0, "rsi_overbought");
        } else if (RSI_NEUTRAL_LOW..=RSI_NEUTRAL_HIGH).contains(&rsi) {
            score.add(0.5, "rsi_neutral");
        }
    }

    if let Some(position) = at(&ind.bb_position, i) {
        if position < BB_EXTREME_LOW {
            score.add(2.0, "bb_extreme_oversold");
        }
        if position > BB_EXTREME_HIGH {
            score.add(-2.0, "bb_extreme_overbought");
        }
        if position < BB_LOW {
            score.add(1.0, "bb_oversold");
        }
        if position > BB_HIGH {
            score.add(-1.0, "bb_overbought");
        }
    }

    score
}

/// Directional moves confirmed by expanding ATR or an unusually wide bar.
pub fn score_breakout(
    i: usize,
    features: &[FeatureBar],
    ind: &IndicatorSet,
    refs: &ReferenceLevels,
) -> SubScore {
    let mut score = SubScore::new(Category::Breakout);

    if let (Some(atr_pct), Some(avg), Some(change)) = (
        at(&ind.atr_pct, i),
        at(&refs.atr_pct_avg, i),
        at(&ind.momentum_3, i),
    ) {
        if atr_pct > avg * ATR_EXPANSION {
            if change > BREAKOUT_MOVE {
                score.add(1.0, "upward_breakout");
            } else if change < -BREAKOUT_MOVE {
                score.add(-1.0, "downward_breakout");
            }
        }
    }

    let range_pct = features.get(i).and_then(|f| f.daily_range_pct);
    if let (Some(range_pct), Some(avg), Some(change)) =
        (range_pct, at(&refs.range_pct_avg, i), at(&ind.momentum_5, i))
    {
        if range_pct > avg * RANGE_EXPANSION {
            if change > 0.0 {
                score.add(0.5, "range_break_up");
            } else {
                score.add(-0.5, "range_break_down");
            }
        }
    }

    score
}

/// Volatility regime against its own reference, plus a session-activity bonus.
pub fn score_risk(
    i: usize,
    session: Session,
    ind: &IndicatorSet,
    refs: &ReferenceLevels,
) -> SubScore {
    let mut score = SubScore::new(Category::Risk);

    // a zero reference means no movement at all: no regime to judge
    if let (Some(volatility), Some(avg)) =
        (at(&ind.volatility_ratio, i), at(&refs.volatility_avg, i))
    {
        if avg > 0.0 {
            if volatility <= avg * STABLE_VOLATILITY {
                score.add(1.0, "stable_market");
            } else if volatility >= avg * HIGH_VOLATILITY {
                score.add(-1.0, "volatile_market");
            }
        }
    }

    match session {
        Session::Overlap | Session::London => score.add(0.5, "active_session"),
        Session::Quiet => score.add(-0.5, "quiet_session"),
        Session::Tokyo | Session::NewYork => {}
    }

    score
}
