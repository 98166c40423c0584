//! Second lowest cost Silver plan per requested ZIP code.

use crate::domain::model::{
    PostalAreaIndex, ResultRow, SilverRateTable, SlcspOutcome, TargetRecord,
};
use crate::domain::ports::DiagnosticSink;

/// Answers one ZIP code. Blank outcomes are reported to `sink` as warnings.
pub fn slcsp_for_zip(
    zipcode: &str,
    index: &PostalAreaIndex,
    table: &SilverRateTable,
    sink: &dyn DiagnosticSink,
) -> SlcspOutcome {
    let areas = index.areas_for(zipcode);
    let mut candidates = areas.iter();

    let area = match (candidates.next(), candidates.next()) {
        (Some(area), None) => area,
        (None, _) => {
            sink.warn(&format!("No rate areas found for ZIP code {}.", zipcode));
            return SlcspOutcome::NoRateArea;
        }
        (Some(_), Some(_)) => {
            let listed = areas
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join(", ");
            sink.warn(&format!(
                "Ambiguous rate areas for ZIP code {}: {}.",
                zipcode, listed
            ));
            return SlcspOutcome::AmbiguousRateArea {
                areas: areas.iter().cloned().collect(),
            };
        }
    };

    let rates = table.rates_for(area);
    match rates.get(1) {
        Some(second_lowest) => SlcspOutcome::Resolved(*second_lowest),
        None => {
            sink.warn(&format!(
                "Insufficient rates for rate area {} (ZIP code {}): {} available.",
                area,
                zipcode,
                rates.len()
            ));
            SlcspOutcome::InsufficientRates {
                area: area.clone(),
                available: rates.len(),
            }
        }
    }
}

/// One row per target, in target order.
pub fn calculate_slcsp(
    targets: &[TargetRecord],
    index: &PostalAreaIndex,
    table: &SilverRateTable,
    sink: &dyn DiagnosticSink,
) -> Vec<ResultRow> {
    targets
        .iter()
        .map(|target| ResultRow {
            zipcode: target.zipcode.clone(),
            outcome: slcsp_for_zip(&target.zipcode, index, table, sink),
        })
        .collect()
}
