//! Per-year reconciliation of live data with cached snapshots.
//!
//! A year is resolved by the first source that has it:
//!
//! 1. the data portal (success also refreshes both snapshots),
//! 2. the district snapshot,
//! 3. the whole-year snapshot, filtered to the district,
//! 4. nothing, which is reported as an empty year rather than an error.

use chrono::Utc;
use tracing::{debug, warn};

use crate::api::RecordSource;
use crate::cache::{CacheManager, KeyValueStore};
use crate::models::{filter_by_district, ProvenanceEntry, Record, Source};

/// Records for one year and where they came from.
#[derive(Debug, Clone, PartialEq)]
pub struct YearOutcome {
    pub records: Vec<Record>,
    pub provenance: ProvenanceEntry,
}

impl YearOutcome {
    pub fn unavailable() -> Self {
        Self {
            records: Vec::new(),
            provenance: ProvenanceEntry::unavailable(),
        }
    }

    pub fn source(&self) -> Source {
        self.provenance.source
    }
}

pub struct YearReconciler<F, S> {
    fetcher: F,
    cache: CacheManager<S>,
}

impl<F: RecordSource, S: KeyValueStore> YearReconciler<F, S> {
    pub fn new(fetcher: F, cache: CacheManager<S>) -> Self {
        Self { fetcher, cache }
    }

    /// Resolve `year` for `district`. Never fails.
    pub async fn resolve_year(&self, district: &str, year: &str) -> YearOutcome {
        match self.fetcher.fetch_year(year).await {
            Ok(records) => self.accept_network(district, year, records),
            Err(e) => {
                warn!(year, district, error = %e, "Network fetch failed, falling back to cache");
                self.from_district_snapshot(district, year)
                    .or_else(|| self.from_year_snapshot(district, year))
                    .unwrap_or_else(|| {
                        debug!(year, district, "No snapshot available");
                        YearOutcome::unavailable()
                    })
            }
        }
    }

    /// Persist a fresh year and return the district's slice of it.
    fn accept_network(&self, district: &str, year: &str, records: Vec<Record>) -> YearOutcome {
        let fetched_at = Utc::now();
        self.cache.save_year(year, &records, fetched_at);

        let filtered = filter_by_district(&records, district);
        self.cache.save_district(district, year, &filtered, fetched_at);

        debug!(year, district, total = records.len(), matched = filtered.len(), "Year fetched from network");
        YearOutcome {
            records: filtered,
            provenance: ProvenanceEntry::new(Source::Network, fetched_at),
        }
    }

    /// District snapshot, already filtered when it was written.
    pub fn from_district_snapshot(&self, district: &str, year: &str) -> Option<YearOutcome> {
        let snapshot = self.cache.load_district(district, year)?;
        debug!(year, district, count = snapshot.records.len(), age = %snapshot.age_display(), "Using district snapshot");
        Some(YearOutcome {
            provenance: ProvenanceEntry::new(Source::CacheDistrict, snapshot.fetched_at),
            records: snapshot.records,
        })
    }

    /// Whole-year snapshot narrowed to `district`.
    pub fn from_year_snapshot(&self, district: &str, year: &str) -> Option<YearOutcome> {
        let snapshot = self.cache.load_year(year)?;
        let records = filter_by_district(&snapshot.records, district);
        debug!(year, district, count = records.len(), age = %snapshot.age_display(), "Using year snapshot");
        Some(YearOutcome {
            records,
            provenance: ProvenanceEntry::new(Source::CacheYear, snapshot.fetched_at),
        })
    }
}
