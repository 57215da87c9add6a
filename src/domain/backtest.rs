//! Cost-aware replay of a decision series against close-to-close returns.
//!
//! A position decided at bar `t-1` earns bar `t`'s return; changing position
//! at bar `t` costs `|Δposition| × spread_cost` at bar `t`.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::decision::Decision;
use super::metrics::PerformanceReport;

pub const DEFAULT_SPREAD_COST: f64 = 0.002;
pub const DEFAULT_ANNUALIZATION: f64 = 252.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BacktestConfig {
    /// Cost per unit of position change, as a fraction of notional.
    pub spread_cost: f64,
    /// Periods per year used to annualize the Sharpe ratio.
    pub annualization: f64,
}

impl Default for BacktestConfig {
    fn default() -> Self {
        BacktestConfig {
            spread_cost: DEFAULT_SPREAD_COST,
            annualization: DEFAULT_ANNUALIZATION,
        }
    }
}

/// One row of the per-bar profit-and-loss ledger.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PnlPoint {
    pub timestamp: NaiveDateTime,
    pub close: f64,
    #[serde(rename = "return")]
    pub price_return: f64,
    pub position: f64,
    pub gross: f64,
    pub cost: f64,
    pub net: f64,
    /// Compounded equity, starting from 1.0.
    pub cumulative: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BacktestResult {
    pub ledger: Vec<PnlPoint>,
    pub report: PerformanceReport,
}

pub fn run_backtest(decisions: &[Decision], config: &BacktestConfig) -> BacktestResult {
    let ledger = build_ledger(decisions, config.spread_cost);
    let report = PerformanceReport::compute(&ledger, config.annualization);

    debug!(
        bars = ledger.len(),
        trades = report.total_trades,
        final_value = report.final_portfolio_value,
        "backtest complete"
    );

    BacktestResult { ledger, report }
}

pub fn build_ledger(decisions: &[Decision], spread_cost: f64) -> Vec<PnlPoint> {
    let mut ledger: Vec<PnlPoint> = Vec::with_capacity(decisions.len());
    let mut cumulative = 1.0;

    for (t, decision) in decisions.iter().enumerate() {
        let point = match t.checked_sub(1).map(|p| &decisions[p]) {
            None => PnlPoint {
                timestamp: decision.timestamp,
                close: decision.close,
                price_return: 0.0,
                position: decision.position,
                gross: 0.0,
                cost: 0.0,
                net: 0.0,
                cumulative,
            },
            Some(prev) => {
                let price_return = Some(decision.close / prev.close - 1.0)
                    .filter(|r| r.is_finite())
                    .unwrap_or(0.0);
                let gross = prev.position * price_return;
                let cost = (decision.position - prev.position).abs() * spread_cost;
                let net = gross - cost;
                cumulative *= 1.0 + net;

                PnlPoint {
                    timestamp: decision.timestamp,
                    close: decision.close,
                    price_return,
                    position: decision.position,
                    gross,
                    cost,
                    net,
                    cumulative,
                }
            }
        };
        ledger.push(point);
    }

    ledger
}
