//! REST clients for the services the dashboard talks to.
//!
//! `ApiClient` fetches MGNREGA records from the data.gov.in open data portal,
//! one fiscal year per request, authenticated by an API key passed as a query
//! parameter. `GeocodeClient` turns coordinates into a district name.

pub mod client;
pub mod error;
pub mod geocode;

pub use client::{ApiClient, RecordSource, DEFAULT_API_KEY, REQUEST_TIMEOUT_SECS};
pub use error::ApiError;
pub use geocode::GeocodeClient;
