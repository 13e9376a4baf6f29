//! Core library for the MGNREGA district dashboard.
//!
//! Fetches three fiscal years of district-level MGNREGA figures from the
//! data.gov.in portal, keeps snapshots on disk for offline use, and merges
//! live and cached data into a [`ThreeYearResult`] annotated with where each
//! year came from.
//!
//! ```ignore
//! let dashboard = Dashboard::from_config(&Config::load()?)?;
//! let result = dashboard.fetch_three_years("Patna").await?;
//! for row in report::monthly_rows(&result) {
//!     println!("{} {:.2}", row.month.label(), row.total_exp.change());
//! }
//! ```

pub mod aggregate;
pub mod api;
pub mod cache;
pub mod config;
pub mod districts;
pub mod error;
pub mod models;
pub mod reconcile;
pub mod report;

#[cfg(test)]
mod test_support;

pub use aggregate::{Dashboard, ThreeYearAggregator};
pub use api::{ApiClient, ApiError, GeocodeClient, RecordSource};
pub use cache::{CacheManager, FileStore, KeyValueStore, MemoryStore, StoreError};
pub use config::Config;
pub use error::DashboardError;
pub use models::{
    OverallSource, ProvenanceEntry, Record, Source, ThreeYearResult, CURRENT_YEAR, FISCAL_YEARS,
    PREVIOUS_YEAR,
};
pub use reconcile::{YearOutcome, YearReconciler};
