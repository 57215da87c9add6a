//! Decision fusion: one session-weighted trading decision per bar.
//!
//! `final = (momentum + breakout) * m + mean_reversion * m + risk`, where `m`
//! is the session multiplier. The final score is mapped onto five actions by
//! the strong and moderate thresholds of [`StrategyParams`].

use chrono::NaiveDateTime;
use serde::{Serialize, Serializer};
use std::fmt;

use crate::domain::features::FeatureBar;
use crate::domain::indicator::IndicatorSet;
use crate::domain::scoring::{ReferenceLevels, ScoringContext, SubScore, SubScores};
use crate::domain::session::Session;
use crate::domain::strategy::StrategyParams;

/// Score magnitude that maps to full confidence.
const CONFIDENCE_SCALE: f64 = 4.0;

const STRONG_TAGS: usize = 3;
const WEAK_TAGS: usize = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Signal {
    Sell,
    Hold,
    Buy,
}

impl Signal {
    pub fn value(self) -> i8 {
        match self {
            Signal::Sell => -1,
            Signal::Hold => 0,
            Signal::Buy => 1,
        }
    }
}

impl Serialize for Signal {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_i8(self.value())
    }
}

impl fmt::Display for Signal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:+}", self.value())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    StrongBuy,
    WeakBuy,
    Hold,
    WeakSell,
    StrongSell,
}

impl Action {
    pub fn signal(self) -> Signal {
        match self {
            Action::StrongBuy | Action::WeakBuy => Signal::Buy,
            Action::Hold => Signal::Hold,
            Action::WeakSell | Action::StrongSell => Signal::Sell,
        }
    }

    pub fn position(self) -> f64 {
        match self {
            Action::StrongBuy => 1.0,
            Action::WeakBuy => 0.5,
            Action::Hold => 0.0,
            Action::WeakSell => -0.5,
            Action::StrongSell => -1.0,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Action::StrongBuy => "strong buy",
            Action::WeakBuy => "weak buy",
            Action::Hold => "hold",
            Action::WeakSell => "weak sell",
            Action::StrongSell => "strong sell",
        }
    }

    fn from_score(score: f64, params: &StrategyParams) -> Self {
        if score >= params.strong_threshold {
            Action::StrongBuy
        } else if score <= -params.strong_threshold {
            Action::StrongSell
        } else if score >= params.moderate_threshold {
            Action::WeakBuy
        } else if score <= -params.moderate_threshold {
            Action::WeakSell
        } else {
            Action::Hold
        }
    }

    fn tag_limit(self) -> usize {
        match self {
            Action::StrongBuy | Action::StrongSell => STRONG_TAGS,
            _ => WEAK_TAGS,
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// The engine's output for one bar.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Decision {
    pub timestamp: NaiveDateTime,
    pub session: Session,
    pub close: f64,
    pub signal: Signal,
    pub action: Action,
    pub position: f64,
    pub confidence: f64,
    pub score: f64,
    pub rationale: String,
}

impl Decision {
    fn hold(feature: &FeatureBar, score: f64, rationale: &str) -> Self {
        Decision {
            timestamp: feature.bar.timestamp,
            session: feature.session,
            close: feature.bar.close,
            signal: Signal::Hold,
            action: Action::Hold,
            position: 0.0,
            confidence: 0.0,
            score,
            rationale: rationale.to_string(),
        }
    }

    pub fn warming_up(feature: &FeatureBar) -> Self {
        Decision::hold(feature, 0.0, "hold: warming up")
    }

    pub fn is_hold(&self) -> bool {
        self.signal == Signal::Hold
    }
}

/// Session-weighted sum of the four sub-scores.
pub fn final_score(scores: &SubScores, session: Session) -> f64 {
    let multiplier = session.multiplier();
    let trend = scores.momentum.value + scores.breakout.value;
    let counter = scores.mean_reversion.value;
    trend * multiplier + counter * multiplier + scores.risk.value
}

/// Fuse one bar's sub-scores into a decision.
pub fn fuse(feature: &FeatureBar, scores: &SubScores, params: &StrategyParams) -> Decision {
    let score = final_score(scores, feature.session);
    let action = Action::from_score(score, params);

    if action == Action::Hold {
        return Decision::hold(feature, score, "hold: mixed signals");
    }

    Decision {
        timestamp: feature.bar.timestamp,
        session: feature.session,
        close: feature.bar.close,
        signal: action.signal(),
        action,
        position: action.position(),
        confidence: (score.abs() / CONFIDENCE_SCALE).min(1.0),
        score,
        rationale: rationale(action, scores),
    }
}

fn rationale(action: Action, scores: &SubScores) -> String {
    let direction = action.signal().value() as f64;
    let pointing: Vec<&SubScore> = scores
        .iter()
        .filter(|s| s.value * direction > 0.0)
        .collect();

    let tags: Vec<&str> = if pointing.is_empty() {
        scores.iter().flat_map(|s| s.tags.iter().copied()).collect()
    } else {
        pointing
            .into_iter()
            .flat_map(|s| s.tags.iter().copied())
            .collect()
    };

    let shown: Vec<&str> = tags.into_iter().take(action.tag_limit()).collect();
    if shown.is_empty() {
        action.label().to_string()
    } else {
        format!("{}: {}", action.label(), shown.join(", "))
    }
}

/// One decision per bar; bars before the warm-up index always hold.
pub fn generate_decisions(
    features: &[FeatureBar],
    indicators: &IndicatorSet,
    references: &ReferenceLevels,
    params: &StrategyParams,
) -> Vec<Decision> {
    let ctx = ScoringContext {
        features,
        indicators,
        references,
    };

    features
        .iter()
        .enumerate()
        .map(|(i, feature)| {
            if i < params.warmup_bars {
                Decision::warming_up(feature)
            } else {
                fuse(feature, &ctx.score_bar(i), params)
            }
        })
        .collect()
}

/// The last `n` non-hold decisions, oldest first.
pub fn latest_signals(decisions: &[Decision], n: usize) -> Vec<&Decision> {
    let mut latest: Vec<&Decision> = decisions
        .iter()
        .rev()
        .filter(|d| !d.is_hold())
        .take(n)
        .collect();
    latest.reverse();
    latest
}

/// The decision in force at the end of the series.
pub fn current_position(decisions: &[Decision]) -> Option<&Decision> {
    decisions.last()
}
