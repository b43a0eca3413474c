use log::{debug, error};

use super::model::{EmissionData, EmissionKey, RawRow};
use super::parse::{parse_value, parse_year, EmptyValues, RowError};

// ---------------------------------------------------------------------------
// Aggregation options
// ---------------------------------------------------------------------------

/// Sectors that carry subtotals in the source data and would double count.
pub const DEFAULT_EXCLUDED_SECTORS: [&str; 2] = ["Energy & Industry", "Total"];

#[derive(Debug, Clone, PartialEq)]
pub struct AggregateOptions {
    /// Rows whose sector matches one of these exactly are skipped silently.
    pub excluded_sectors: Vec<String>,
    pub empty_values: EmptyValues,
}

impl Default for AggregateOptions {
    fn default() -> Self {
        Self {
            excluded_sectors: DEFAULT_EXCLUDED_SECTORS.iter().map(|s| s.to_string()).collect(),
            empty_values: EmptyValues::default(),
        }
    }
}

/// Result of one aggregation pass with row counters.
#[derive(Debug, Clone, Default)]
pub struct Aggregation {
    pub data: EmissionData,
    /// Rows folded into `data`.
    pub accepted: usize,
    /// Rows skipped because of an excluded sector.
    pub excluded: usize,
    /// Rows dropped as malformed.
    pub rejected: usize,
}

// ---------------------------------------------------------------------------
// Fold
// ---------------------------------------------------------------------------

/// Aggregate rows with the default options.
pub fn aggregate<I>(rows: I) -> EmissionData
where
    I: IntoIterator<Item = RawRow>,
{
    aggregate_with(rows, &AggregateOptions::default()).data
}

/// Fold rows into [`EmissionData`]. Malformed rows are logged and dropped;
/// nothing here fails.
pub fn aggregate_with<I>(rows: I, options: &AggregateOptions) -> Aggregation
where
    I: IntoIterator<Item = RawRow>,
{
    let mut out = Aggregation::default();

    for row in rows {
        if options.excluded_sectors.iter().any(|s| *s == row.sector) {
            out.excluded += 1;
            continue;
        }

        match validate(&row, options.empty_values) {
            Ok((year, value)) => {
                let RawRow {
                    region,
                    classification,
                    sector,
                    ..
                } = row;
                out.data.accumulate(
                    EmissionKey {
                        region,
                        classification,
                        sector,
                        year,
                    },
                    value,
                );
                out.accepted += 1;
            }
            Err(e) => {
                error!("Invalid data ({e}): {row}");
                out.rejected += 1;
            }
        }
    }

    debug!(
        "aggregated {} rows into {} entries ({} excluded, {} rejected)",
        out.accepted,
        out.data.len(),
        out.excluded,
        out.rejected
    );
    out
}

fn validate(row: &RawRow, empty: EmptyValues) -> Result<(i32, f64), RowError> {
    let year = parse_year(&row.year);
    let value = parse_value(&row.values, empty);
    if row.region.is_empty() {
        return Err(RowError::EmptyRegion);
    }
    Ok((year?, value?))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(region: &str, cls: &str, sector: &str, year: &str, values: &str) -> RawRow {
        RawRow::new(region, cls, sector, year, values)
    }

    #[test]
    fn test_concrete_scenario() {
        let rows = vec![
            row("Austria", "A", "Industrie", "2020", "1,5"),
            row("Austria", "A", "Industrie", "2020", "2,5"),
            row("Austria", "A", "Total", "2020", "100"),
        ];
        let data = aggregate(rows);
        assert_eq!(data.len(), 1);
        assert_eq!(data.get("Austria", "A", "Industrie", 2020), Some(4.0));
    }

    #[test]
    fn test_sentinel_sectors_never_appear() {
        let rows = vec![
            row("Wien", "A", "Energy & Industry", "2020", "5"),
            row("Wien", "A", "Total", "2021", "7"),
            row("Wien", "A", "Energie", "2020", "1"),
        ];
        let agg = aggregate_with(rows, &AggregateOptions::default());
        assert_eq!(agg.excluded, 2);
        assert_eq!(agg.accepted, 1);
        assert_eq!(agg.data.sectors(), vec!["Energie"]);
        assert!(agg.data.get("Wien", "A", "Total", 2021).is_none());
    }

    #[test]
    fn test_sentinel_match_is_case_sensitive() {
        let data = aggregate(vec![row("Wien", "A", "total", "2020", "1")]);
        assert_eq!(data.get("Wien", "A", "total", 2020), Some(1.0));
    }

    #[test]
    fn test_malformed_rows_are_dropped() {
        let rows = vec![
            row("", "A", "Industrie", "2020", "1"),
            row("Wien", "A", "Industrie", "abc", "1"),
            row("Wien", "A", "Industrie", "2020", "xyz"),
            row("Wien", "A", "Industrie", "2020", "2"),
        ];
        let agg = aggregate_with(rows, &AggregateOptions::default());
        assert_eq!(agg.rejected, 3);
        assert_eq!(agg.accepted, 1);
        assert_eq!(agg.data.len(), 1);
        assert_eq!(agg.data.get("Wien", "A", "Industrie", 2020), Some(2.0));
    }

    #[test]
    fn test_empty_value_policy() {
        let rows = vec![row("Wien", "A", "Abfall", "2020", "")];
        let zero = aggregate_with(rows.clone(), &AggregateOptions::default());
        assert_eq!(zero.data.get("Wien", "A", "Abfall", 2020), Some(0.0));

        let strict = AggregateOptions {
            empty_values: EmptyValues::Reject,
            ..AggregateOptions::default()
        };
        let rejected = aggregate_with(rows, &strict);
        assert!(rejected.data.is_empty());
        assert_eq!(rejected.rejected, 1);
    }

    #[test]
    fn test_fields_are_not_trimmed() {
        let data = aggregate(vec![
            row("Wien", "A", "Industrie", "2020", "1"),
            row("Wien", "A", "Industrie ", "2020", "1"),
        ]);
        assert_eq!(data.len(), 2);
    }

    #[test]
    fn test_row_order_does_not_change_sums() {
        let rows = vec![
            row("Wien", "A", "Industrie", "2020", "0,25"),
            row("Tirol", "B", "Abfall", "2019", "3"),
            row("Wien", "A", "Industrie", "2020", "0,5"),
            row("Wien", "A", "Industrie", "2020", "1"),
        ];
        let mut reversed = rows.clone();
        reversed.reverse();
        assert_eq!(aggregate(rows), aggregate(reversed));
    }

    #[test]
    fn test_custom_excluded_sectors() {
        let options = AggregateOptions {
            excluded_sectors: vec!["Summe".to_string()],
            ..AggregateOptions::default()
        };
        let agg = aggregate_with(
            vec![
                row("Wien", "A", "Summe", "2020", "9"),
                row("Wien", "A", "Total", "2020", "9"),
            ],
            &options,
        );
        assert_eq!(agg.excluded, 1);
        assert_eq!(agg.data.sectors(), vec!["Total"]);
    }
}
