//! End-to-end analysis run: bars in, decisions and performance report out.
//!
//! A run owns every derived structure it builds and shares nothing with
//! other runs, so independent instruments can be analysed on separate
//! threads.

use tracing::{debug, info};

use super::backtest::{run_backtest, BacktestConfig, BacktestResult};
use super::decision::{current_position, generate_decisions, latest_signals, Decision};
use super::error::FxTraderError;
use super::features::{build_features, FeatureBar};
use super::indicator::IndicatorSet;
use super::metrics::PerformanceReport;
use super::ohlcv::{validate_series, OhlcvBar};
use super::scoring::{ReferenceLevels, ScoringContext, SubScores};
use super::strategy::StrategyParams;

#[derive(Debug, Clone)]
pub struct Analysis {
    pub params: StrategyParams,
    pub features: Vec<FeatureBar>,
    pub indicators: IndicatorSet,
    pub references: ReferenceLevels,
    pub decisions: Vec<Decision>,
    pub backtest: BacktestResult,
}

impl Analysis {
    pub fn report(&self) -> &PerformanceReport {
        &self.backtest.report
    }

    pub fn latest_signals(&self, n: usize) -> Vec<&Decision> {
        latest_signals(&self.decisions, n)
    }

    pub fn current_position(&self) -> Option<&Decision> {
        current_position(&self.decisions)
    }

    /// Sub-scores of bar `i`, or `None` while warming up.
    pub fn scores_at(&self, i: usize) -> Option<SubScores> {
        if i < self.params.warmup_bars || i >= self.features.len() {
            return None;
        }
        let ctx = ScoringContext {
            features: &self.features,
            indicators: &self.indicators,
            references: &self.references,
        };
        Some(ctx.score_bar(i))
    }
}

/// Run the full pipeline over an already-fetched bar series.
///
/// Fails with [`FxTraderError::InvalidBar`] when the series breaks the input
/// contract and with [`FxTraderError::InsufficientData`] when it is shorter
/// than the warm-up window. No partial result is produced in either case.
pub fn run_analysis(
    bars: &[OhlcvBar],
    params: &StrategyParams,
    config: &BacktestConfig,
) -> Result<Analysis, FxTraderError> {
    validate_series(bars)?;

    let minimum = params.min_bars();
    if bars.len() < minimum {
        return Err(FxTraderError::InsufficientData {
            bars: bars.len(),
            minimum,
        });
    }

    info!(bars = bars.len(), warmup = params.warmup_bars, "starting analysis");

    let features = build_features(bars);
    let indicators = IndicatorSet::compute(bars, params);
    let references = ReferenceLevels::compute(&features, &indicators, params);
    let decisions = generate_decisions(&features, &indicators, &references, params);

    let signals = decisions.iter().filter(|d| !d.is_hold()).count();
    debug!(decisions = decisions.len(), signals, "decisions generated");

    let backtest = run_backtest(&decisions, config);
    info!(
        trades = backtest.report.total_trades,
        total_return = backtest.report.total_return,
        "analysis complete"
    );

    Ok(Analysis {
        params: params.clone(),
        features,
        indicators,
        references,
        decisions,
        backtest,
    })
}
