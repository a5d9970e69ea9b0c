//! Driven port for filtered, paginated POI reads.

use async_trait::async_trait;

use crate::domain::PoiListing;

use super::define_port_error;

/// Exact-match filters; absent fields do not constrain the result.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PoiSearchCriteria {
    /// Store-assigned POI id.
    pub id: Option<i32>,
    /// External id.
    pub external_id: Option<i32>,
    /// Case-sensitive category name.
    pub category_name: Option<String>,
}

impl PoiSearchCriteria {
    /// Whether at least one filter is set.
    pub fn is_constrained(&self) -> bool {
        self.id.is_some() || self.external_id.is_some() || self.category_name.is_some()
    }
}

define_port_error! {
    /// Errors raised while reading POIs.
    pub enum PoiSearchRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } =>
            "poi search connection failed: {message}",
        /// Query failed during execution.
        Query { message: String } =>
            "poi search query failed: {message}",
    }
}

/// Port for reading POIs and category names.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PoiSearchRepository: Send + Sync {
    /// Count POIs matching `criteria`.
    async fn count(&self, criteria: &PoiSearchCriteria) -> Result<u64, PoiSearchRepositoryError>;

    /// Fetch matching POIs ordered by id, skipping `offset` and returning at
    /// most `limit`, with categories preloaded.
    async fn fetch(
        &self,
        criteria: &PoiSearchCriteria,
        offset: u64,
        limit: u64,
    ) -> Result<Vec<PoiListing>, PoiSearchRepositoryError>;

    /// Every category name in ascending order.
    async fn category_names(&self) -> Result<Vec<String>, PoiSearchRepositoryError>;
}
