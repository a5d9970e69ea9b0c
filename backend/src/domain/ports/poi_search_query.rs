//! Driving port for POI search.
//!
//! Inbound adapters pass the raw query-string values through; parsing and
//! validation belong to the implementation.

use async_trait::async_trait;
use pagination::Page;
use serde::{Deserialize, Serialize};

use crate::domain::{Error, PoiListing};

/// Raw search parameters as supplied by the caller.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct PoiSearchRequest {
    /// Store-assigned id to match exactly.
    pub id_search: Option<String>,
    /// External id to match exactly.
    pub external_id_search: Option<String>,
    /// Category name to match exactly (case-sensitive).
    pub filter: Option<String>,
    /// One-based page number; resolved leniently.
    pub page: Option<String>,
}

/// Search result plus the data needed to render the filter controls.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PoiSearchResponse {
    /// Matching page, absent when no search parameter was supplied.
    pub page: Option<Page<PoiListing>>,
    /// Every category name in ascending order.
    pub categories: Vec<String>,
    /// Category filter echoed back, if any.
    pub selected_filter: Option<String>,
}

/// Domain use-case port for searching POIs.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PoiSearchQuery: Send + Sync {
    /// Run one search.
    async fn search(&self, request: PoiSearchRequest) -> Result<PoiSearchResponse, Error>;
}
