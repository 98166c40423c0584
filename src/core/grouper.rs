//! Groups Silver plan rates by rate area.

use crate::domain::model::{PlanRecord, RateAreaKey, SilverRateTable, SILVER_METAL_LEVEL};
use crate::utils::error::{EtlError, Result};
use rust_decimal::Decimal;
use std::collections::HashMap;
use std::str::FromStr;

/// Parses a plan rate. Plain and scientific notation are accepted, surrounding
/// whitespace is ignored.
pub fn parse_rate(raw: &str) -> std::result::Result<Decimal, rust_decimal::Error> {
    let value = raw.trim();
    Decimal::from_str(value).or_else(|err| {
        if value.contains(['e', 'E']) {
            Decimal::from_scientific(value)
        } else {
            Err(err)
        }
    })
}

/// Builds the Silver rate table. Fails on the first Silver plan whose rate
/// does not parse; rows of other metal levels are never parsed.
pub fn group_silver_rates(plans: &[PlanRecord]) -> Result<SilverRateTable> {
    let mut grouped: HashMap<RateAreaKey, Vec<Decimal>> = HashMap::new();

    for (index, plan) in plans.iter().enumerate() {
        if plan.metal_level != SILVER_METAL_LEVEL {
            continue;
        }

        let rate = parse_rate(&plan.rate).map_err(|e| EtlError::InvalidRate {
            row: index + 1,
            value: plan.rate.clone(),
            reason: e.to_string(),
        })?;

        grouped
            .entry(RateAreaKey::new(plan.state.as_str(), plan.rate_area.as_str()))
            .or_default()
            .push(rate);
    }

    for rates in grouped.values_mut() {
        rates.sort_unstable();
    }

    tracing::debug!(
        "Grouped Silver plans into {} rate areas ({} plans read)",
        grouped.len(),
        plans.len()
    );

    Ok(SilverRateTable::from_sorted(grouped))
}
