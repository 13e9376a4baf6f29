//! Where each fiscal year's data came from.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Origin of one year's records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Source {
    /// Fetched from the data portal during this request.
    Network,
    /// Read from the district snapshot saved by an earlier fetch.
    CacheDistrict,
    /// Read from the whole-year snapshot and filtered to the district.
    CacheYear,
    /// Neither the network nor any snapshot had the year.
    #[serde(rename = "none")]
    Unavailable,
}

impl Source {
    pub fn is_cache(&self) -> bool {
        matches!(self, Source::CacheDistrict | Source::CacheYear)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Source::Network => "network",
            Source::CacheDistrict => "cache-district",
            Source::CacheYear => "cache-year",
            Source::Unavailable => "none",
        }
    }
}

impl std::fmt::Display for Source {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Summary of provenance across all years of a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OverallSource {
    /// Every year came from the network.
    Network,
    /// Some years are fresh and some stale, or some years are missing.
    PartialCache,
    /// The network was unreachable for every year but snapshots exist.
    Cache,
}

impl OverallSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            OverallSource::Network => "network",
            OverallSource::PartialCache => "partial-cache",
            OverallSource::Cache => "cache",
        }
    }
}

impl std::fmt::Display for OverallSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Per-year provenance as exposed in `_meta.perYear`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProvenanceEntry {
    pub source: Source,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fetched_at: Option<DateTime<Utc>>,
}

impl ProvenanceEntry {
    pub fn new(source: Source, fetched_at: DateTime<Utc>) -> Self {
        Self {
            source,
            fetched_at: Some(fetched_at),
        }
    }

    pub fn unavailable() -> Self {
        Self {
            source: Source::Unavailable,
            fetched_at: None,
        }
    }
}

/// Running count of year sources, folded in as each year resolves.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ProvenanceTally {
    network: usize,
    cached: usize,
    missing: usize,
}

impl ProvenanceTally {
    pub fn observe(&mut self, source: Source) {
        match source {
            Source::Network => self.network += 1,
            s if s.is_cache() => self.cached += 1,
            _ => self.missing += 1,
        }
    }

    pub fn total(&self) -> usize {
        self.network + self.cached + self.missing
    }

    /// Three-way classification. `Cache` is reserved for "fully offline but
    /// historical data exists"; an all-missing outcome is `PartialCache`.
    pub fn overall(&self) -> OverallSource {
        if self.total() > 0 && self.network == self.total() {
            OverallSource::Network
        } else if self.network == 0 && self.cached > 0 {
            OverallSource::Cache
        } else {
            OverallSource::PartialCache
        }
    }
}

impl FromIterator<Source> for ProvenanceTally {
    fn from_iter<I: IntoIterator<Item = Source>>(iter: I) -> Self {
        let mut tally = Self::default();
        for source in iter {
            tally.observe(source);
        }
        tally
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn overall(sources: &[Source]) -> OverallSource {
        sources.iter().copied().collect::<ProvenanceTally>().overall()
    }

    #[test]
    fn test_all_network_is_network() {
        assert_eq!(
            overall(&[Source::Network, Source::Network, Source::Network]),
            OverallSource::Network
        );
    }

    #[test]
    fn test_offline_with_snapshots_is_cache() {
        assert_eq!(
            overall(&[Source::CacheDistrict, Source::CacheYear, Source::CacheDistrict]),
            OverallSource::Cache
        );
        assert_eq!(
            overall(&[Source::Unavailable, Source::CacheYear, Source::Unavailable]),
            OverallSource::Cache
        );
    }

    #[test]
    fn test_mixed_or_missing_is_partial() {
        assert_eq!(
            overall(&[Source::Network, Source::CacheDistrict, Source::Network]),
            OverallSource::PartialCache
        );
        assert_eq!(
            overall(&[Source::Network, Source::Unavailable, Source::Network]),
            OverallSource::PartialCache
        );
        assert_eq!(
            overall(&[Source::Unavailable, Source::Unavailable, Source::Unavailable]),
            OverallSource::PartialCache
        );
    }

    #[test]
    fn test_only_snapshot_sources_are_cache() {
        assert!(Source::CacheDistrict.is_cache());
        assert!(Source::CacheYear.is_cache());
        assert!(!Source::Network.is_cache());
        assert!(!Source::Unavailable.is_cache());
    }

    #[test]
    fn test_source_wire_names() {
        assert_eq!(serde_json::to_string(&Source::CacheDistrict).unwrap(), "\"cache-district\"");
        assert_eq!(serde_json::to_string(&Source::Unavailable).unwrap(), "\"none\"");
        assert_eq!(
            serde_json::to_string(&OverallSource::PartialCache).unwrap(),
            "\"partial-cache\""
        );
        let parsed: Source = serde_json::from_str("\"cache-year\"").unwrap();
        assert_eq!(parsed, Source::CacheYear);
    }

    #[test]
    fn test_entry_without_timestamp_omits_field() {
        let json = serde_json::to_value(ProvenanceEntry::unavailable()).unwrap();
        assert_eq!(json, serde_json::json!({ "source": "none" }));
    }
}
