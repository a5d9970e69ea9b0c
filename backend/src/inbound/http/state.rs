//! Shared HTTP adapter state.
//!
//! Handlers depend on domain ports only, so tests can swap in mocks.

use std::sync::Arc;

use crate::domain::ports::PoiSearchQuery;

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    /// POI search use-case.
    pub pois: Arc<dyn PoiSearchQuery>,
}

impl HttpState {
    /// Construct state from the search port.
    pub fn new(pois: Arc<dyn PoiSearchQuery>) -> Self {
        Self { pois }
    }
}
