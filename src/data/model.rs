use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::ops::Bound;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// RawRow – one record as delivered by the loader
// ---------------------------------------------------------------------------

/// A single emission record with every field kept as text.
///
/// Missing columns deserialize as empty strings; validity is decided by the
/// aggregator, not here.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawRow {
    #[serde(rename = "Region", default)]
    pub region: String,
    #[serde(rename = "Classification", default)]
    pub classification: String,
    #[serde(rename = "Sector", default)]
    pub sector: String,
    #[serde(rename = "Year", default)]
    pub year: String,
    #[serde(rename = "Values", default)]
    pub values: String,
}

impl RawRow {
    pub fn new(
        region: &str,
        classification: &str,
        sector: &str,
        year: &str,
        values: &str,
    ) -> Self {
        RawRow {
            region: region.to_string(),
            classification: classification.to_string(),
            sector: sector.to_string(),
            year: year.to_string(),
            values: values.to_string(),
        }
    }
}

impl fmt::Display for RawRow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{{Region: {:?}, Classification: {:?}, Sector: {:?}, Year: {:?}, Values: {:?}}}",
            self.region, self.classification, self.sector, self.year, self.values
        )
    }
}

// ---------------------------------------------------------------------------
// EmissionKey – composite lookup key
// ---------------------------------------------------------------------------

/// Composite key of one aggregated leaf. Field order defines the ordering,
/// so all entries of a (region, classification) pair are contiguous.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct EmissionKey {
    pub region: String,
    pub classification: String,
    pub sector: String,
    pub year: i32,
}

impl EmissionKey {
    pub fn new(region: &str, classification: &str, sector: &str, year: i32) -> Self {
        EmissionKey {
            region: region.to_string(),
            classification: classification.to_string(),
            sector: sector.to_string(),
            year,
        }
    }
}

/// Nested view handed to renderers: region → classification → sector → year → value.
pub type NestedEmissions = BTreeMap<String, BTreeMap<String, BTreeMap<String, BTreeMap<i32, f64>>>>;

// ---------------------------------------------------------------------------
// EmissionData – the aggregated structure
// ---------------------------------------------------------------------------

/// Aggregated emission values in a single flat ordered map.
///
/// Built once by [`crate::data::aggregate`] and read-only afterwards; a reload
/// produces a fresh value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EmissionData {
    values: BTreeMap<EmissionKey, f64>,
}

impl EmissionData {
    /// Add `value` to the leaf at `key`, creating it at 0 first.
    pub(crate) fn accumulate(&mut self, key: EmissionKey, value: f64) {
        *self.values.entry(key).or_insert(0.0) += value;
    }

    /// Number of leaves.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Leaf value for a full key path, if present.
    pub fn get(&self, region: &str, classification: &str, sector: &str, year: i32) -> Option<f64> {
        self.values
            .get(&EmissionKey::new(region, classification, sector, year))
            .copied()
    }

    /// Leaves under one (region, classification) pair, ordered by sector then year.
    pub fn entries_for(
        &self,
        region: &str,
        classification: &str,
    ) -> impl Iterator<Item = (&EmissionKey, f64)> + '_ {
        let start = EmissionKey::new(region, classification, "", i32::MIN);
        let region = region.to_string();
        let classification = classification.to_string();
        self.values
            .range((Bound::Included(start), Bound::Unbounded))
            .take_while(move |(k, _)| k.region == region && k.classification == classification)
            .map(|(k, v)| (k, *v))
    }

    /// Whether `region` has any data under `classification`.
    pub fn has_classification(&self, region: &str, classification: &str) -> bool {
        self.entries_for(region, classification).next().is_some()
    }

    /// Distinct region names, sorted.
    pub fn regions(&self) -> Vec<String> {
        self.distinct(|k| &k.region)
    }

    /// Distinct classification names, sorted.
    pub fn classifications(&self) -> Vec<String> {
        self.distinct(|k| &k.classification)
    }

    /// Distinct sector names, sorted.
    pub fn sectors(&self) -> Vec<String> {
        self.distinct(|k| &k.sector)
    }

    /// Distinct years, ascending.
    pub fn years(&self) -> Vec<i32> {
        let set: BTreeSet<i32> = self.values.keys().map(|k| k.year).collect();
        set.into_iter().collect()
    }

    fn distinct<F>(&self, field: F) -> Vec<String>
    where
        F: Fn(&EmissionKey) -> &String,
    {
        let set: BTreeSet<&String> = self.values.keys().map(field).collect();
        set.into_iter().cloned().collect()
    }

    /// Expand into the nested region → classification → sector → year shape.
    pub fn to_nested(&self) -> NestedEmissions {
        let mut nested = NestedEmissions::new();
        for (key, value) in &self.values {
            nested
                .entry(key.region.clone())
                .or_default()
                .entry(key.classification.clone())
                .or_default()
                .entry(key.sector.clone())
                .or_default()
                .insert(key.year, *value);
        }
        nested
    }
}
