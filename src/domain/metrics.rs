//! Aggregate performance statistics over a backtest ledger.
//!
//! Bars with a zero net return carry no information about the strategy and
//! are excluded from win/loss statistics. Percent-valued fields are scaled
//! by 100; `win_rate` stays a fraction.

use serde::{Serialize, Serializer};
use std::fmt;

use super::backtest::PnlPoint;

/// Ratio of summed winning to summed losing returns.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ProfitFactor {
    Finite(f64),
    /// Winning bars and no losing bars.
    Unbounded,
}

impl ProfitFactor {
    pub fn value(self) -> f64 {
        match self {
            ProfitFactor::Finite(v) => v,
            ProfitFactor::Unbounded => f64::INFINITY,
        }
    }
}

impl Serialize for ProfitFactor {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            ProfitFactor::Finite(v) => serializer.serialize_f64(*v),
            ProfitFactor::Unbounded => serializer.serialize_str("unbounded"),
        }
    }
}

impl fmt::Display for ProfitFactor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProfitFactor::Finite(v) => write!(f, "{:.2}", v),
            ProfitFactor::Unbounded => f.write_str("unbounded"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AccuracyGrade {
    TargetReached,
    Good,
    Improving,
    NeedsWork,
}

impl AccuracyGrade {
    pub fn from_win_rate(win_rate: f64) -> Self {
        let pct = win_rate * 100.0;
        if pct >= 70.0 {
            AccuracyGrade::TargetReached
        } else if pct >= 60.0 {
            AccuracyGrade::Good
        } else if pct >= 50.0 {
            AccuracyGrade::Improving
        } else {
            AccuracyGrade::NeedsWork
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            AccuracyGrade::TargetReached => "target reached",
            AccuracyGrade::Good => "good",
            AccuracyGrade::Improving => "improving",
            AccuracyGrade::NeedsWork => "needs work",
        }
    }
}

impl fmt::Display for AccuracyGrade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PerformanceReport {
    /// Compounded net return, %.
    pub total_return: f64,
    /// Simple sum of per-bar gross returns, %. Not compounded.
    pub gross_return: f64,
    pub trading_costs: f64,
    pub win_rate: f64,
    pub total_trades: usize,
    pub profitable_trades: usize,
    pub losing_trades: usize,
    pub avg_win: f64,
    pub avg_loss: f64,
    pub best_trade: f64,
    pub worst_trade: f64,
    pub profit_factor: ProfitFactor,
    pub max_drawdown: f64,
    pub sharpe_ratio: f64,
    pub final_portfolio_value: f64,
}

impl PerformanceReport {
    pub fn empty() -> Self {
        PerformanceReport {
            total_return: 0.0,
            gross_return: 0.0,
            trading_costs: 0.0,
            win_rate: 0.0,
            total_trades: 0,
            profitable_trades: 0,
            losing_trades: 0,
            avg_win: 0.0,
            avg_loss: 0.0,
            best_trade: 0.0,
            worst_trade: 0.0,
            profit_factor: ProfitFactor::Finite(0.0),
            max_drawdown: 0.0,
            sharpe_ratio: 0.0,
            final_portfolio_value: 1.0,
        }
    }

    pub fn compute(ledger: &[PnlPoint], annualization: f64) -> Self {
        let active: Vec<f64> = ledger.iter().map(|p| p.net).filter(|&n| n != 0.0).collect();
        if active.is_empty() {
            return PerformanceReport::empty();
        }

        let wins: Vec<f64> = active.iter().copied().filter(|&n| n > 0.0).collect();
        let losses: Vec<f64> = active.iter().copied().filter(|&n| n < 0.0).collect();
        let total_wins: f64 = wins.iter().sum();
        let total_losses: f64 = losses.iter().sum();

        let profit_factor = if losses.is_empty() {
            ProfitFactor::Unbounded
        } else {
            ProfitFactor::Finite((total_wins / total_losses).abs())
        };

        let final_portfolio_value = ledger.last().map(|p| p.cumulative).unwrap_or(1.0);
        let total_trades = ledger
            .windows(2)
            .filter(|w| w[1].position != w[0].position)
            .count();

        PerformanceReport {
            total_return: (final_portfolio_value - 1.0) * 100.0,
            gross_return: ledger.iter().map(|p| p.gross).sum::<f64>() * 100.0,
            trading_costs: ledger.iter().map(|p| p.cost).sum::<f64>() * 100.0,
            win_rate: wins.len() as f64 / active.len() as f64,
            total_trades,
            profitable_trades: wins.len(),
            losing_trades: losses.len(),
            avg_win: mean(&wins).unwrap_or(0.0) * 100.0,
            avg_loss: mean(&losses).unwrap_or(0.0) * 100.0,
            best_trade: active.iter().copied().fold(f64::NEG_INFINITY, f64::max) * 100.0,
            worst_trade: active.iter().copied().fold(f64::INFINITY, f64::min) * 100.0,
            profit_factor,
            max_drawdown: compute_max_drawdown(ledger),
            sharpe_ratio: compute_sharpe(ledger, annualization),
            final_portfolio_value,
        }
    }

    pub fn grade(&self) -> AccuracyGrade {
        AccuracyGrade::from_win_rate(self.win_rate)
    }
}

fn mean(values: &[f64]) -> Option<f64> {
    (!values.is_empty()).then(|| values.iter().sum::<f64>() / values.len() as f64)
}

/// Deepest fall of equity below its running peak, in % (zero or negative).
fn compute_max_drawdown(ledger: &[PnlPoint]) -> f64 {
    let mut peak = f64::NEG_INFINITY;
    let mut max_dd = 0.0_f64;

    for point in ledger {
        peak = peak.max(point.cumulative);
        if peak > 0.0 {
            max_dd = max_dd.min(point.cumulative / peak - 1.0);
        }
    }

    max_dd * 100.0
}

/// Annualized mean/std of per-bar net returns. The first bar has no return
/// and is left out; a zero or undefined deviation gives 0.
fn compute_sharpe(ledger: &[PnlPoint], annualization: f64) -> f64 {
    let returns: Vec<f64> = ledger.iter().skip(1).map(|p| p.net).collect();
    if returns.len() < 2 {
        return 0.0;
    }

    let n = returns.len() as f64;
    let mean: f64 = returns.iter().sum::<f64>() / n;
    let variance: f64 = returns.iter().map(|r| (r - mean).powi(2)).sum::<f64>() / (n - 1.0);
    let stddev = variance.sqrt();

    if stddev > 0.0 {
        (mean / stddev) * annualization.sqrt()
    } else {
        0.0
    }
}
