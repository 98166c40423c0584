use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};
use std::fmt;

/// Metal level label that makes a plan eligible.
pub const SILVER_METAL_LEVEL: &str = "Silver";

/// A row of the plan catalog. Only `state`, `metal_level`, `rate` and
/// `rate_area` are read; `rate` stays raw so the grouper can report the
/// offending row when it does not parse.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanRecord {
    #[serde(default)]
    pub plan_id: String,
    pub state: String,
    pub metal_level: String,
    pub rate: String,
    pub rate_area: String,
}

/// A row of the ZIP code to rate area mapping.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ZipRecord {
    pub zipcode: String,
    pub state: String,
    #[serde(default)]
    pub county_code: String,
    #[serde(default)]
    pub name: String,
    pub rate_area: String,
}

/// A ZIP code the run must answer for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TargetRecord {
    pub zipcode: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RateAreaKey {
    pub state: String,
    pub rate_area: String,
}

impl RateAreaKey {
    pub fn new(state: impl Into<String>, rate_area: impl Into<String>) -> Self {
        Self {
            state: state.into(),
            rate_area: rate_area.into(),
        }
    }
}

impl fmt::Display for RateAreaKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.state, self.rate_area)
    }
}

/// Silver rates per rate area, each list sorted ascending with duplicates kept.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SilverRateTable {
    rates: HashMap<RateAreaKey, Vec<Decimal>>,
}

impl SilverRateTable {
    pub(crate) fn from_sorted(rates: HashMap<RateAreaKey, Vec<Decimal>>) -> Self {
        Self { rates }
    }

    /// Sorted rates for `key`; empty when the area has no Silver plans.
    pub fn rates_for(&self, key: &RateAreaKey) -> &[Decimal] {
        self.rates.get(key).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn area_count(&self) -> usize {
        self.rates.len()
    }
}

/// ZIP code to the distinct rate areas it was mapped to.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PostalAreaIndex {
    areas: HashMap<String, BTreeSet<RateAreaKey>>,
    empty: BTreeSet<RateAreaKey>,
}

impl PostalAreaIndex {
    pub(crate) fn from_map(areas: HashMap<String, BTreeSet<RateAreaKey>>) -> Self {
        Self {
            areas,
            empty: BTreeSet::new(),
        }
    }

    /// Rate areas for `zipcode`; empty for a ZIP code never seen in the mapping.
    pub fn areas_for(&self, zipcode: &str) -> &BTreeSet<RateAreaKey> {
        self.areas.get(zipcode).unwrap_or(&self.empty)
    }

    pub fn postal_code_count(&self) -> usize {
        self.areas.len()
    }
}

/// How a target row was answered. Every variant but `Resolved` renders as a
/// blank rate in the output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SlcspOutcome {
    Resolved(Decimal),
    NoRateArea,
    AmbiguousRateArea { areas: Vec<RateAreaKey> },
    InsufficientRates { area: RateAreaKey, available: usize },
}

impl SlcspOutcome {
    pub fn rate(&self) -> Option<Decimal> {
        match self {
            SlcspOutcome::Resolved(rate) => Some(*rate),
            _ => None,
        }
    }

    pub fn blank_reason(&self) -> Option<BlankReason> {
        match self {
            SlcspOutcome::Resolved(_) => None,
            SlcspOutcome::NoRateArea => Some(BlankReason::NoRateArea),
            SlcspOutcome::AmbiguousRateArea { .. } => Some(BlankReason::AmbiguousRateArea),
            SlcspOutcome::InsufficientRates { .. } => Some(BlankReason::InsufficientRates),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BlankReason {
    NoRateArea,
    AmbiguousRateArea,
    InsufficientRates,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultRow {
    pub zipcode: String,
    pub outcome: SlcspOutcome,
}

impl ResultRow {
    /// The output `rate` column: two decimals, or empty when undeterminable.
    pub fn rate_field(&self) -> String {
        self.outcome.rate().map(format_rate).unwrap_or_default()
    }
}

/// Renders a rate with exactly two decimal places, rounding half to even.
///
/// Rounding happens on the exact decimal, so `290.605` renders `290.60`.
/// Formatting the nearest binary float instead can land on the other side of
/// the midpoint (`290.61`); rates with two or fewer decimals are unaffected.
pub fn format_rate(rate: Decimal) -> String {
    let rounded = rate.round_dp_with_strategy(2, RoundingStrategy::MidpointNearestEven);
    format!("{:.2}", rounded)
}

/// Everything the transform phase needs, as read from storage.
#[derive(Debug, Clone, Default)]
pub struct SlcspInputs {
    pub plans: Vec<PlanRecord>,
    pub zips: Vec<ZipRecord>,
    pub targets: Vec<TargetRecord>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlankRow {
    pub zipcode: String,
    pub reason: BlankReason,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunSummary {
    pub generated_at: chrono::DateTime<chrono::Utc>,
    pub total: usize,
    pub resolved: usize,
    pub blank_no_rate_area: usize,
    pub blank_ambiguous: usize,
    pub blank_insufficient_rates: usize,
    pub silver_rate_areas: usize,
    pub postal_codes_indexed: usize,
    pub blank_rows: Vec<BlankRow>,
}

impl RunSummary {
    pub fn from_rows(
        rows: &[ResultRow],
        table: &SilverRateTable,
        index: &PostalAreaIndex,
    ) -> Self {
        let mut summary = RunSummary {
            generated_at: chrono::Utc::now(),
            total: rows.len(),
            resolved: 0,
            blank_no_rate_area: 0,
            blank_ambiguous: 0,
            blank_insufficient_rates: 0,
            silver_rate_areas: table.area_count(),
            postal_codes_indexed: index.postal_code_count(),
            blank_rows: Vec::new(),
        };

        for row in rows {
            let Some(reason) = row.outcome.blank_reason() else {
                summary.resolved += 1;
                continue;
            };
            match reason {
                BlankReason::NoRateArea => summary.blank_no_rate_area += 1,
                BlankReason::AmbiguousRateArea => summary.blank_ambiguous += 1,
                BlankReason::InsufficientRates => summary.blank_insufficient_rates += 1,
            }
            summary.blank_rows.push(BlankRow {
                zipcode: row.zipcode.clone(),
                reason,
            });
        }

        summary
    }

    pub fn blank(&self) -> usize {
        self.total - self.resolved
    }
}

#[derive(Debug, Clone)]
pub struct CalculationResult {
    pub rows: Vec<ResultRow>,
    pub summary: RunSummary,
}
