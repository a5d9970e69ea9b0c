//! Driven port for writing imported POIs.

use async_trait::async_trait;

use crate::domain::PoiRecord;

use super::define_port_error;

/// What a single-record upsert did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpsertOutcome {
    /// No POI carried the external id; a new row was inserted.
    Created,
    /// The POI with the external id was overwritten.
    Updated,
}

define_port_error! {
    /// Errors raised while persisting POIs.
    pub enum PoiRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } =>
            "poi persistence connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } =>
            "poi persistence query failed: {message}",
        /// Stored rows make the write ambiguous.
        Conflict { message: String } =>
            "poi persistence conflict: {message}",
    }
}

/// Port for writing POIs to the backend store.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PoiRepository: Send + Sync {
    /// Create or overwrite the POI keyed by the record's external id.
    ///
    /// The lookup and write happen atomically. When more than one stored POI
    /// shares the external id the call fails with
    /// [`PoiRepositoryError::Conflict`] and writes nothing.
    async fn upsert(&self, record: &PoiRecord) -> Result<UpsertOutcome, PoiRepositoryError>;

    /// Insert every record as a new row in one all-or-nothing batch.
    ///
    /// No existence check is made, so external ids already present in the
    /// store (or repeated within `records`) produce additional rows. Returns
    /// the number of rows inserted.
    async fn bulk_insert(&self, records: &[PoiRecord]) -> Result<u64, PoiRepositoryError>;
}
