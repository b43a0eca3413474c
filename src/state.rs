use std::collections::BTreeSet;

use crate::color::ColorScale;
use crate::data::EmissionData;
use crate::stats::{self, SectorTotals};

// ---------------------------------------------------------------------------
// Chart state
// ---------------------------------------------------------------------------

/// What a chart currently shows, independent of rendering.
pub struct ChartState {
    /// Aggregated data (None until a file is loaded).
    pub data: Option<EmissionData>,

    /// Classifications included in regional totals.
    pub selected_classifications: BTreeSet<String>,

    /// Regions included in regional totals.
    pub selected_regions: BTreeSet<String>,

    /// Region left out of sector breakdowns.
    pub excluded_region: String,
}

impl Default for ChartState {
    fn default() -> Self {
        Self {
            data: None,
            selected_classifications: BTreeSet::new(),
            selected_regions: BTreeSet::new(),
            excluded_region: "Austria".to_string(),
        }
    }
}

impl ChartState {
    pub fn new(excluded_region: &str) -> Self {
        Self {
            excluded_region: excluded_region.to_string(),
            ..Self::default()
        }
    }

    /// Replace the data wholesale and select everything it contains.
    pub fn set_data(&mut self, data: EmissionData) {
        self.selected_classifications = data.classifications().into_iter().collect();
        self.selected_regions = data.regions().into_iter().collect();
        self.data = Some(data);
    }

    /// Toggle a single classification in the selection.
    pub fn toggle_classification(&mut self, classification: &str) {
        toggle(&mut self.selected_classifications, classification);
    }

    /// Toggle a single region in the selection.
    pub fn toggle_region(&mut self, region: &str) {
        toggle(&mut self.selected_regions, region);
    }

    /// Narrow the selection to one classification.
    pub fn select_only_classification(&mut self, classification: &str) {
        self.selected_classifications = BTreeSet::from([classification.to_string()]);
    }

    fn selection(&self) -> (Vec<String>, Vec<String>) {
        (
            self.selected_classifications.iter().cloned().collect(),
            self.selected_regions.iter().cloned().collect(),
        )
    }

    /// Largest selected-region total in `year`.
    pub fn max_for_year(&self, year: i32) -> Option<f64> {
        let data = self.data.as_ref()?;
        let (classifications, regions) = self.selection();
        stats::max_for_year(data, year, &classifications, &regions)
    }

    /// Largest selected-region total over all years.
    pub fn max_all_years(&self) -> Option<f64> {
        let data = self.data.as_ref()?;
        let (classifications, regions) = self.selection();
        stats::max_across_all_years(data, &classifications, &regions)
    }

    /// Scale over `[0, max]` for the current selection, if there is a max.
    pub fn color_scale(&self) -> Option<ColorScale> {
        self.max_all_years().map(|max| ColorScale::new((0.0, max)))
    }

    /// Sector totals for `year` in one classification, without the excluded region.
    pub fn breakdown(&self, year: i32, classification: &str) -> SectorTotals {
        self.data
            .as_ref()
            .map(|d| stats::sector_breakdown(d, year, classification, &self.excluded_region))
            .unwrap_or_default()
    }

    /// Sector totals over all years in one classification, without the excluded region.
    pub fn breakdown_all_years(&self, classification: &str) -> SectorTotals {
        self.data
            .as_ref()
            .map(|d| stats::sector_breakdown_all_years(d, classification, &self.excluded_region))
            .unwrap_or_default()
    }
}

fn toggle(set: &mut BTreeSet<String>, value: &str) {
    if !set.remove(value) {
        set.insert(value.to_string());
    }
}
