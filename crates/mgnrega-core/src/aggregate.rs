//! Three-year fan-out over the year reconciler.

use std::collections::BTreeMap;

use anyhow::{Context, Result};
use futures::stream::{FuturesUnordered, StreamExt};
use tracing::{debug, info};

use crate::api::{ApiClient, RecordSource};
use crate::cache::{CacheManager, FileStore, KeyValueStore};
use crate::config::Config;
use crate::error::DashboardError;
use crate::models::{ProvenanceTally, ResultMeta, ThreeYearResult, FISCAL_YEARS};
use crate::reconcile::{YearOutcome, YearReconciler};

/// Fetches and reconciles all [`FISCAL_YEARS`] for a district.
pub struct ThreeYearAggregator<F, S> {
    reconciler: YearReconciler<F, S>,
}

impl<F: RecordSource, S: KeyValueStore> ThreeYearAggregator<F, S> {
    pub fn new(fetcher: F, store: S) -> Self {
        Self {
            reconciler: YearReconciler::new(fetcher, CacheManager::new(store)),
        }
    }

    /// Resolve every fiscal year for `district`.
    ///
    /// The years run concurrently on the calling task and all of them run to
    /// completion; a failing year degrades to cached or empty data and never
    /// stops the others. The only error is an empty district name, rejected
    /// before any network or cache access.
    pub async fn fetch_three_years(&self, district: &str) -> Result<ThreeYearResult, DashboardError> {
        let district = district.trim();
        if district.is_empty() {
            return Err(DashboardError::MissingDistrict);
        }

        let mut pending: FuturesUnordered<_> = FISCAL_YEARS
            .iter()
            .map(move |&year| async move { (year, self.reconciler.resolve_year(district, year).await) })
            .collect();

        let mut years = BTreeMap::new();
        let mut per_year = BTreeMap::new();
        let mut tally = ProvenanceTally::default();

        while let Some((year, outcome)) = pending.next().await {
            let YearOutcome { records, provenance } = outcome;
            debug!(year, source = %provenance.source, count = records.len(), "Year resolved");
            tally.observe(provenance.source);
            per_year.insert(year.to_string(), provenance);
            years.insert(year.to_string(), records);
        }

        let overall_source = tally.overall();
        info!(district, overall = %overall_source, "Three-year fetch complete");

        Ok(ThreeYearResult::new(
            years,
            ResultMeta {
                per_year,
                overall_source,
            },
        ))
    }
}

/// Aggregator backed by the live portal and on-disk snapshots.
pub type Dashboard = ThreeYearAggregator<ApiClient, FileStore>;

impl ThreeYearAggregator<ApiClient, FileStore> {
    pub fn from_config(config: &Config) -> Result<Self> {
        let api = ApiClient::with_timeout(config.api_key(), config.request_timeout())
            .context("Failed to build HTTP client")?;
        let cache_dir = config.cache_dir()?;
        let store = FileStore::new(cache_dir.clone())
            .with_context(|| format!("Failed to open cache directory {}", cache_dir.display()))?;
        debug!(?cache_dir, "Snapshot store opened");
        Ok(Self::new(api, store))
    }
}
