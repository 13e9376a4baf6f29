//! Data models for the dashboard.
//!
//! - `Record`: one district/month observation from the data portal
//! - `Source`, `OverallSource`, `ProvenanceEntry`: where each year came from
//! - `ThreeYearResult`: the merged result consumed by the rendering layer

pub mod provenance;
pub mod record;
pub mod result;

pub use provenance::{OverallSource, ProvenanceEntry, ProvenanceTally, Source};
pub use record::{filter_by_district, Record};
pub use result::{ResultMeta, ThreeYearResult, CURRENT_YEAR, FISCAL_YEARS, PREVIOUS_YEAR};
