use chrono::{DateTime, Utc};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use tracing::{debug, warn};

use crate::models::Record;

use super::store::{KeyValueStore, StoreError};

/// Prefix for snapshots filtered to one district.
const DISTRICT_KEY_PREFIX: &str = "mgnrega_district";

/// Prefix for unfiltered whole-year snapshots. Distinct from the district
/// prefix so no district name can produce a year key.
const YEAR_KEY_PREFIX: &str = "mgnrega_year";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot<T> {
    pub records: T,
    pub fetched_at: DateTime<Utc>,
}

/// Persisted records for one year, either district-filtered or whole-year.
pub type YearSnapshot = Snapshot<Vec<Record>>;

impl<T> Snapshot<T> {
    pub fn new(records: T) -> Self {
        Self::at(records, Utc::now())
    }

    pub fn at(records: T, fetched_at: DateTime<Utc>) -> Self {
        Self {
            records,
            fetched_at,
        }
    }

    pub fn age_minutes(&self) -> i64 {
        let now = Utc::now();
        (now - self.fetched_at).num_minutes()
    }

    pub fn age_display(&self) -> String {
        let minutes = self.age_minutes();
        if minutes < 1 {
            // Clock skew shows up as a negative age
            "just now".to_string()
        } else if minutes < 60 {
            format!("{}m ago", minutes)
        } else if minutes < 1440 {
            let hours = minutes / 60;
            let remaining_mins = minutes % 60;
            if remaining_mins >= 30 {
                format!("{}h ago", hours + 1)
            } else {
                format!("{}h ago", hours)
            }
        } else {
            let days = minutes / 1440;
            let remaining_hours = (minutes % 1440) / 60;
            if remaining_hours >= 12 {
                format!("{}d ago", days + 1)
            } else {
                format!("{}d ago", days)
            }
        }
    }
}

/// Key for the snapshot of `district` in `year`. Case of the district name
/// does not matter.
pub fn district_key(district: &str, year: &str) -> String {
    format!("{}_{}_{}", DISTRICT_KEY_PREFIX, district.to_lowercase(), year)
}

/// Key for the whole-year snapshot of `year`.
pub fn year_key(year: &str) -> String {
    format!("{}_{}", YEAR_KEY_PREFIX, year)
}

/// Best-effort snapshot cache on top of a [`KeyValueStore`].
///
/// Nothing here fails: write errors are logged and dropped, and any read
/// problem (missing key, storage error, bad JSON) comes back as `None`.
#[derive(Debug, Clone)]
pub struct CacheManager<S> {
    store: S,
}

impl<S: KeyValueStore> CacheManager<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    fn try_load<T: DeserializeOwned>(&self, key: &str) -> Result<Option<Snapshot<T>>, StoreError> {
        match self.store.get_item(key)? {
            Some(raw) => Ok(Some(serde_json::from_str(&raw)?)),
            None => Ok(None),
        }
    }

    fn try_save<T: Serialize>(&self, key: &str, snapshot: &Snapshot<T>) -> Result<(), StoreError> {
        let contents = serde_json::to_string(snapshot)?;
        self.store.set_item(key, &contents)
    }

    /// Snapshot stored under `key`, if it can be read.
    pub fn load(&self, key: &str) -> Option<YearSnapshot> {
        match self.try_load(key) {
            Ok(Some(snapshot)) => Some(snapshot),
            Ok(None) => {
                debug!(key, "No snapshot stored");
                None
            }
            Err(e) => {
                debug!(key, error = %e, "Failed to load snapshot, treating as a miss");
                None
            }
        }
    }

    /// Save `records` under `key`, stamped with the current time.
    pub fn save(&self, key: &str, records: &[Record]) {
        self.save_at(key, records, Utc::now());
    }

    /// Save `records` under `key` with an explicit fetch time.
    pub fn save_at(&self, key: &str, records: &[Record], fetched_at: DateTime<Utc>) {
        let snapshot = Snapshot::at(records, fetched_at);
        if let Err(e) = self.try_save(key, &snapshot) {
            warn!(key, error = %e, "Failed to save snapshot");
        }
    }

    // ===== District snapshots =====

    pub fn load_district(&self, district: &str, year: &str) -> Option<YearSnapshot> {
        self.load(&district_key(district, year))
    }

    pub fn save_district(&self, district: &str, year: &str, records: &[Record], fetched_at: DateTime<Utc>) {
        self.save_at(&district_key(district, year), records, fetched_at)
    }

    // ===== Year snapshots =====

    pub fn load_year(&self, year: &str) -> Option<YearSnapshot> {
        self.load(&year_key(year))
    }

    pub fn save_year(&self, year: &str, records: &[Record], fetched_at: DateTime<Utc>) {
        self.save_at(&year_key(year), records, fetched_at)
    }
}

// ============================================================================
// Tests
// ============================================================================
