//! Derived statistics over aggregated emission data.
//!
//! Every function here is a pure read of [`EmissionData`]. Absent regions,
//! classifications or years count as zero; only an empty set of inputs to a
//! maximum yields `None`.

use std::collections::{BTreeMap, BTreeSet};

use log::warn;

use crate::data::EmissionData;

/// Per-sector totals.
pub type SectorTotals = BTreeMap<String, f64>;

/// Total across all sectors for one region, classification and year.
pub fn sum_for_region_classification_year(
    data: &EmissionData,
    region: &str,
    classification: &str,
    year: i32,
) -> f64 {
    data.entries_for(region, classification)
        .filter(|(key, _)| key.year == year)
        .map(|(_, value)| value)
        .sum()
}

/// Largest regional total in `year`, each region summed over all of
/// `classifications` and their sectors.
///
/// Returns `None` when `regions` is empty.
pub fn max_for_year<S: AsRef<str>>(
    data: &EmissionData,
    year: i32,
    classifications: &[S],
    regions: &[S],
) -> Option<f64> {
    regions
        .iter()
        .map(|region| {
            let region = region.as_ref();
            classifications
                .iter()
                .map(|cls| {
                    let cls = cls.as_ref();
                    if !data.has_classification(region, cls) {
                        warn!("No data for region \"{region}\" and classification \"{cls}\"");
                        return 0.0;
                    }
                    sum_for_region_classification_year(data, region, cls, year)
                })
                .sum::<f64>()
        })
        .reduce(f64::max)
}

/// Maximum of [`max_for_year`] over every year found under
/// `regions` × `classifications`.
///
/// Returns `None` when no year is found.
pub fn max_across_all_years<S: AsRef<str>>(
    data: &EmissionData,
    classifications: &[S],
    regions: &[S],
) -> Option<f64> {
    let years: BTreeSet<i32> = regions
        .iter()
        .flat_map(|region| {
            classifications.iter().flat_map(move |cls| {
                data.entries_for(region.as_ref(), cls.as_ref())
                    .map(|(key, _)| key.year)
            })
        })
        .collect();

    years
        .into_iter()
        .filter_map(|year| max_for_year(data, year, classifications, regions))
        .reduce(f64::max)
}

/// Per-sector totals for one year and classification across every region
/// except `excluded_region` (compared ignoring case).
///
/// Sectors present under the classification without a value in `year` are
/// reported as 0.
pub fn sector_breakdown(
    data: &EmissionData,
    year: i32,
    classification: &str,
    excluded_region: &str,
) -> SectorTotals {
    breakdown(data, classification, excluded_region, |y| y == year)
}

/// Per-sector totals over every year for one classification, excluding
/// `excluded_region` (compared ignoring case).
pub fn sector_breakdown_all_years(
    data: &EmissionData,
    classification: &str,
    excluded_region: &str,
) -> SectorTotals {
    breakdown(data, classification, excluded_region, |_| true)
}

fn breakdown<F>(
    data: &EmissionData,
    classification: &str,
    excluded_region: &str,
    include_year: F,
) -> SectorTotals
where
    F: Fn(i32) -> bool,
{
    let excluded = excluded_region.to_lowercase();
    let mut totals = SectorTotals::new();

    for region in data.regions() {
        if region.to_lowercase() == excluded {
            continue;
        }
        for (key, value) in data.entries_for(&region, classification) {
            let total = totals.entry(key.sector.clone()).or_insert(0.0);
            if include_year(key.year) {
                *total += value;
            }
        }
    }
    totals
}

/// Domain `[0, max]` of the sequential color scale for one classification,
/// taking the maximum over every region and year.
pub fn color_domain(data: &EmissionData, classification: &str) -> Option<(f64, f64)> {
    let regions = data.regions();
    let classifications = vec![classification.to_string()];
    max_across_all_years(data, classifications.as_slice(), regions.as_slice()).map(|max| (0.0, max))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{aggregate, RawRow};

    fn data() -> EmissionData {
        let rows = vec![
            RawRow::new("Austria", "A", "Industrie", "2020", "1,5"),
            RawRow::new("Austria", "A", "Industrie", "2020", "2,5"),
            RawRow::new("Austria", "A", "Total", "2020", "100"),
            RawRow::new("AUSTRIA", "A", "Energie", "2020", "50"),
            RawRow::new("Wien", "A", "Industrie", "2020", "3"),
            RawRow::new("Wien", "A", "Energie", "2020", "2"),
            RawRow::new("Wien", "A", "Energie", "2021", "7"),
            RawRow::new("Wien", "B", "Abfall", "2021", "4"),
            RawRow::new("Tirol", "A", "Abfall", "2019", "1"),
            RawRow::new("Tirol", "B", "Abfall", "2022", "20"),
        ];
        aggregate(rows)
    }

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_sum_concrete_scenario() {
        let d = data();
        assert_eq!(sum_for_region_classification_year(&d, "Austria", "A", 2020), 4.0);
    }

    #[test]
    fn test_sum_over_sectors_and_missing_paths() {
        let d = data();
        assert_eq!(sum_for_region_classification_year(&d, "Wien", "A", 2020), 5.0);
        assert_eq!(sum_for_region_classification_year(&d, "Wien", "A", 1999), 0.0);
        assert_eq!(sum_for_region_classification_year(&d, "Wien", "Z", 2020), 0.0);
        assert_eq!(sum_for_region_classification_year(&d, "Graz", "A", 2020), 0.0);
    }

    #[test]
    fn test_max_for_year() {
        let d = data();
        let cls = names(&["A", "B"]);
        let regions = names(&["Wien", "Tirol"]);
        assert_eq!(max_for_year(&d, 2021, &cls, &regions), Some(11.0));
        assert_eq!(max_for_year(&d, 2022, &cls, &regions), Some(20.0));
        assert_eq!(max_for_year(&d, 1800, &cls, &regions), Some(0.0));
    }

    #[test]
    fn test_max_for_year_missing_classification_counts_zero() {
        let d = data();
        let cls = names(&["A", "Missing"]);
        let regions = names(&["Wien", "Nowhere"]);
        assert_eq!(max_for_year(&d, 2020, &cls, &regions), Some(5.0));
    }

    #[test]
    fn test_max_for_year_without_regions() {
        let d = data();
        let regions: Vec<String> = Vec::new();
        assert_eq!(max_for_year(&d, 2020, &names(&["A"]), &regions), None);
    }

    #[test]
    fn test_max_across_all_years() {
        let d = data();
        let regions = names(&["Wien", "Tirol"]);
        assert_eq!(max_across_all_years(&d, &names(&["A"]), &regions), Some(7.0));
        assert_eq!(max_across_all_years(&d, &names(&["A", "B"]), &regions), Some(20.0));
    }

    #[test]
    fn test_max_across_all_years_only_scans_selected_regions() {
        let d = data();
        // Tirol's 2022 entry under B is not scanned when only Wien is selected.
        assert_eq!(max_across_all_years(&d, &names(&["B"]), &names(&["Wien"])), Some(4.0));
    }

    #[test]
    fn test_max_across_all_years_empty() {
        let d = data();
        assert_eq!(max_across_all_years(&d, &names(&["Z"]), &names(&["Wien"])), None);
        assert_eq!(max_across_all_years(&EmissionData::default(), &names(&["A"]), &names(&["Wien"])), None);
    }

    #[test]
    fn test_sector_breakdown_excludes_region_ignoring_case() {
        let d = data();
        let totals = sector_breakdown(&d, 2020, "A", "austria");
        assert_eq!(totals.get("Industrie"), Some(&3.0));
        assert_eq!(totals.get("Energie"), Some(&2.0));
        // Tirol has Abfall under A but not in 2020.
        assert_eq!(totals.get("Abfall"), Some(&0.0));
        assert_eq!(totals.len(), 3);
    }

    #[test]
    fn test_sector_breakdown_missing_classification() {
        let d = data();
        assert!(sector_breakdown(&d, 2020, "Z", "Austria").is_empty());
    }

    #[test]
    fn test_sector_breakdown_all_years() {
        let d = data();
        let totals = sector_breakdown_all_years(&d, "A", "Austria");
        assert_eq!(totals.get("Industrie"), Some(&3.0));
        assert_eq!(totals.get("Energie"), Some(&9.0));
        assert_eq!(totals.get("Abfall"), Some(&1.0));

        let with_austria = sector_breakdown_all_years(&d, "A", "");
        assert_eq!(with_austria.get("Industrie"), Some(&7.0));
        assert_eq!(with_austria.get("Energie"), Some(&59.0));
    }

    #[test]
    fn test_color_domain() {
        let d = data();
        assert_eq!(color_domain(&d, "A"), Some((0.0, 50.0)));
        assert_eq!(color_domain(&d, "Z"), None);
    }

    #[test]
    fn test_queries_are_repeatable() {
        let d = data();
        let cls = names(&["A", "B"]);
        let regions = d.regions();
        assert_eq!(
            max_across_all_years(&d, &cls, &regions),
            max_across_all_years(&d, &cls, &regions)
        );
        assert_eq!(sector_breakdown(&d, 2020, "A", "Austria"), sector_breakdown(&d, 2020, "A", "Austria"));
        assert_eq!(d, data());
    }
}
