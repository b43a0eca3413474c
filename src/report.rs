use serde::Serialize;

use crate::color::{sector_color, sector_rgb, ColorScale};
use crate::config::Config;
use crate::data::{Aggregation, NestedEmissions};
use crate::stats;

/// Summary handed to a renderer as JSON.
#[derive(Debug, Serialize)]
pub struct Report {
    pub rows_accepted: usize,
    pub rows_excluded: usize,
    pub rows_rejected: usize,
    pub regions: Vec<String>,
    pub classifications: Vec<String>,
    pub years: Vec<i32>,
    pub excluded_region: String,
    pub per_classification: Vec<ClassificationReport>,
    /// Aggregated values: region → classification → sector → year → value.
    pub data: NestedEmissions,
}

#[derive(Debug, Serialize)]
pub struct ClassificationReport {
    pub classification: String,
    /// Largest regional total in any single year.
    pub max_all_years: Option<f64>,
    pub color_domain: Option<(f64, f64)>,
    /// Five-step legend for the sequential scale.
    pub scale_legend: Vec<(f64, String)>,
    pub sectors: Vec<SectorReport>,
}

#[derive(Debug, Serialize)]
pub struct SectorReport {
    pub sector: String,
    pub total_all_years: f64,
    pub color: &'static str,
    pub rgb: [u8; 3],
}

impl Report {
    /// Build the report for the classifications named in `config`, or for
    /// every classification when none are named.
    pub fn build(agg: &Aggregation, config: &Config) -> Self {
        let data = &agg.data;
        let classifications = if config.classifications.is_empty() {
            data.classifications()
        } else {
            config.classifications.clone()
        };

        let per_classification = classifications
            .iter()
            .map(|cls| {
                let color_domain = stats::color_domain(data, cls);
                let max_all_years = color_domain.map(|(_, hi)| hi);
                let scale_legend = color_domain
                    .map(|domain| ColorScale::new(domain).legend_entries(5))
                    .unwrap_or_default();
                let sectors = stats::sector_breakdown_all_years(data, cls, &config.excluded_region)
                    .into_iter()
                    .map(|(sector, total)| {
                        let rgb = sector_rgb(&sector);
                        SectorReport {
                            color: sector_color(&sector),
                            rgb: [rgb.red, rgb.green, rgb.blue],
                            sector,
                            total_all_years: total,
                        }
                    })
                    .collect();
                ClassificationReport {
                    classification: cls.clone(),
                    max_all_years,
                    color_domain,
                    scale_legend,
                    sectors,
                }
            })
            .collect();

        Report {
            rows_accepted: agg.accepted,
            rows_excluded: agg.excluded,
            rows_rejected: agg.rejected,
            years: data.years(),
            classifications: data.classifications(),
            regions: data.regions(),
            excluded_region: config.excluded_region.clone(),
            per_classification,
            data: data.to_nested(),
        }
    }
}
