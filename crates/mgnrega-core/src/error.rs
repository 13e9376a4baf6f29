use thiserror::Error;

/// Failures surfaced by the dashboard's public operations.
///
/// Network and storage problems never appear here; they degrade into
/// per-year provenance instead.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DashboardError {
    #[error("A district name is required")]
    MissingDistrict,
}
