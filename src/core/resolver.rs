//! Maps ZIP codes to the rate areas they belong to.

use crate::domain::model::{PostalAreaIndex, RateAreaKey, ZipRecord};
use std::collections::{BTreeSet, HashMap};

pub fn resolve_rate_areas(zips: &[ZipRecord]) -> PostalAreaIndex {
    let mut areas: HashMap<String, BTreeSet<RateAreaKey>> = HashMap::new();

    for zip in zips {
        areas
            .entry(zip.zipcode.clone())
            .or_default()
            .insert(RateAreaKey::new(zip.state.as_str(), zip.rate_area.as_str()));
    }

    tracing::debug!("Indexed rate areas for {} ZIP codes", areas.len());

    PostalAreaIndex::from_map(areas)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn zip(zipcode: &str, state: &str, county_code: &str, rate_area: &str) -> ZipRecord {
        ZipRecord {
            zipcode: zipcode.to_string(),
            state: state.to_string(),
            county_code: county_code.to_string(),
            name: format!("County {}", county_code),
            rate_area: rate_area.to_string(),
        }
    }

    #[test]
    fn test_same_area_in_several_counties_collapses() {
        let zips = vec![
            zip("36749", "AL", "01001", "11"),
            zip("36749", "AL", "01047", "11"),
            zip("36749", "AL", "01085", "11"),
        ];

        let index = resolve_rate_areas(&zips);

        let areas = index.areas_for("36749");
        assert_eq!(areas.len(), 1);
        assert!(areas.contains(&RateAreaKey::new("AL", "11")));
    }

    #[test]
    fn test_distinct_areas_are_all_kept() {
        let zips = vec![
            zip("64148", "MO", "29095", "3"),
            zip("64148", "MO", "29037", "4"),
            zip("64148", "MO", "29095", "3"),
        ];

        let index = resolve_rate_areas(&zips);

        let areas: Vec<_> = index.areas_for("64148").iter().cloned().collect();
        assert_eq!(
            areas,
            vec![RateAreaKey::new("MO", "3"), RateAreaKey::new("MO", "4")]
        );
    }

    #[test]
    fn test_same_area_id_in_different_states_is_distinct() {
        let zips = vec![
            zip("10000", "NY", "1", "1"),
            zip("10000", "NJ", "2", "1"),
        ];

        let index = resolve_rate_areas(&zips);
        assert_eq!(index.areas_for("10000").len(), 2);
    }

    #[test]
    fn test_unknown_zip_is_empty_not_error() {
        let index = resolve_rate_areas(&[zip("36749", "AL", "01001", "11")]);

        assert!(index.areas_for("00000").is_empty());
        assert_eq!(index.postal_code_count(), 1);
    }
}
