//! Report output port trait.

use crate::domain::analysis::Analysis;
use crate::domain::error::FxTraderError;

/// Port for writing the outcome of an analysis run.
pub trait ReportPort {
    fn write(
        &self,
        analysis: &Analysis,
        symbol: &str,
        output_path: &str,
    ) -> Result<(), FxTraderError>;
}
