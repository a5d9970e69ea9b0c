//! POI search endpoint.
//!
//! ```text
//! GET /api/v1/pois?id_search=12&filter=restaurant&page=2
//! ```
//!
//! Query values are passed through untouched; the search service trims,
//! validates and paginates them.

use actix_web::{HttpResponse, get, http::header, web};

use crate::domain::ApiResult;
use crate::domain::ports::PoiSearchRequest;
use crate::inbound::http::state::HttpState;

/// Search POIs by id, external id or category.
///
/// Without any search parameter the response carries no page, only the
/// category list for the filter control.
#[get("/pois")]
pub async fn search_pois(
    state: web::Data<HttpState>,
    query: web::Query<PoiSearchRequest>,
) -> ApiResult<HttpResponse> {
    let response = state.pois.search(query.into_inner()).await?;
    Ok(HttpResponse::Ok()
        .insert_header((header::CACHE_CONTROL, "no-cache"))
        .json(response))
}
