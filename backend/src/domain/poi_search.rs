//! POI search service.
//!
//! Turns raw query-string values into [`PoiSearchCriteria`], resolves the
//! requested page leniently and fetches only that window from the store.

use std::sync::Arc;

use async_trait::async_trait;
use pagination::{DEFAULT_PAGE_SIZE, Page, Paginator};
use tracing::debug;

use crate::domain::Error;
use crate::domain::ports::{
    PoiSearchCriteria, PoiSearchQuery, PoiSearchRepository, PoiSearchRepositoryError,
    PoiSearchRequest, PoiSearchResponse,
};

/// Domain service implementing [`PoiSearchQuery`].
#[derive(Clone)]
pub struct PoiSearchService<R> {
    repo: Arc<R>,
}

impl<R> PoiSearchService<R> {
    /// Create a new search service.
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }
}

#[async_trait]
impl<R> PoiSearchQuery for PoiSearchService<R>
where
    R: PoiSearchRepository,
{
    async fn search(&self, request: PoiSearchRequest) -> Result<PoiSearchResponse, Error> {
        let criteria = parse_criteria(&request)?;
        let categories = self.repo.category_names().await.map_err(map_repo_error)?;
        let selected_filter = criteria.category_name.clone();

        if !criteria.is_constrained() {
            return Ok(PoiSearchResponse {
                page: None,
                categories,
                selected_filter,
            });
        }

        let total = self.repo.count(&criteria).await.map_err(map_repo_error)?;
        let paginator = Paginator::new(total, DEFAULT_PAGE_SIZE);
        let window = paginator.get_page(non_blank(request.page.as_deref()));
        let items = self
            .repo
            .fetch(&criteria, window.offset(), window.limit())
            .await
            .map_err(map_repo_error)?;
        debug!(
            total,
            page = window.number(),
            returned = items.len(),
            "poi search executed"
        );

        Ok(PoiSearchResponse {
            page: Some(Page::new(items, window, &paginator)),
            categories,
            selected_filter,
        })
    }
}

fn parse_criteria(request: &PoiSearchRequest) -> Result<PoiSearchCriteria, Error> {
    Ok(PoiSearchCriteria {
        id: parse_integer("id_search", request.id_search.as_deref())?,
        external_id: parse_integer("external_id_search", request.external_id_search.as_deref())?,
        category_name: non_blank(request.filter.as_deref()).map(str::to_owned),
    })
}

fn parse_integer(field: &str, raw: Option<&str>) -> Result<Option<i32>, Error> {
    non_blank(raw)
        .map(|value| {
            value.parse::<i32>().map_err(|_| {
                Error::invalid_request(format!("{field} must be an integer"))
                    .with_details(serde_json::json!({ "field": field, "value": value }))
            })
        })
        .transpose()
}

fn non_blank(raw: Option<&str>) -> Option<&str> {
    raw.map(str::trim).filter(|value| !value.is_empty())
}

fn map_repo_error(error: PoiSearchRepositoryError) -> Error {
    match error {
        PoiSearchRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("poi store unavailable: {message}"))
        }
        PoiSearchRepositoryError::Query { message } => {
            Error::internal(format!("poi search failed: {message}"))
        }
    }
}
