pub mod calculator;
pub mod diagnostics;
pub mod etl;
pub mod grouper;
pub mod resolver;

pub use crate::domain::model::{CalculationResult, ResultRow, RunSummary, SlcspInputs};
pub use crate::domain::ports::{ConfigProvider, DiagnosticSink, Pipeline, Storage};
pub use crate::utils::error::Result;

use calculator::calculate_slcsp;
use grouper::group_silver_rates;
use resolver::resolve_rate_areas;

/// Runs grouper, resolver and calculator over in-memory inputs. The only
/// failure is a Silver plan with an unparseable rate, raised before any row
/// is produced.
pub fn compute(inputs: &SlcspInputs, sink: &dyn DiagnosticSink) -> Result<CalculationResult> {
    let table = group_silver_rates(&inputs.plans)?;
    let index = resolve_rate_areas(&inputs.zips);
    let rows = calculate_slcsp(&inputs.targets, &index, &table, sink);
    let summary = RunSummary::from_rows(&rows, &table, &index);

    Ok(CalculationResult { rows, summary })
}
