//! Local snapshot caching for offline data access.
//!
//! Every successful fetch leaves two snapshots behind: the whole fiscal year
//! and the slice for the requested district. When the portal is unreachable
//! those snapshots are served instead. Snapshots are never evicted; a later
//! fetch for the same year overwrites them.

pub mod manager;
pub mod store;

pub use manager::{district_key, year_key, CacheManager, Snapshot, YearSnapshot};
pub use store::{FileStore, KeyValueStore, MemoryStore, StoreError};
