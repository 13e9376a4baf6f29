//! The merged three-year result handed to the rendering layer.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::provenance::{OverallSource, ProvenanceEntry};
use super::record::Record;

/// Fiscal years covered by every request, oldest first.
pub const FISCAL_YEARS: [&str; 3] = ["2022-2023", "2023-2024", "2024-2025"];

/// Year shown in the monthly table.
pub const CURRENT_YEAR: &str = "2024-2025";

/// Year the monthly table compares against.
pub const PREVIOUS_YEAR: &str = "2023-2024";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResultMeta {
    pub per_year: BTreeMap<String, ProvenanceEntry>,
    pub overall_source: OverallSource,
}

/// Records for each fiscal year plus provenance metadata.
///
/// Serializes as `{ "2022-2023": [...], ..., "_meta": {...} }`. Every year in
/// [`FISCAL_YEARS`] is always present, possibly with an empty list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThreeYearResult {
    #[serde(flatten)]
    years: BTreeMap<String, Vec<Record>>,
    #[serde(rename = "_meta")]
    pub meta: ResultMeta,
}

impl ThreeYearResult {
    /// Build a result, filling any fiscal year missing from `years` with an
    /// empty list.
    pub fn new(mut years: BTreeMap<String, Vec<Record>>, meta: ResultMeta) -> Self {
        for year in FISCAL_YEARS {
            years.entry(year.to_string()).or_default();
        }
        Self { years, meta }
    }

    /// Records for `year`; empty for a year outside the fixed set.
    pub fn records(&self, year: &str) -> &[Record] {
        self.years.get(year).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn provenance(&self, year: &str) -> Option<&ProvenanceEntry> {
        self.meta.per_year.get(year)
    }

    pub fn overall_source(&self) -> OverallSource {
        self.meta.overall_source
    }

    /// Year keys in ascending order.
    pub fn years(&self) -> impl Iterator<Item = &str> {
        self.years.keys().map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.years.values().all(Vec::is_empty)
    }
}
