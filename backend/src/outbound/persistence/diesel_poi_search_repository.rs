//! PostgreSQL-backed POI search.

use async_trait::async_trait;
use diesel::dsl::sql;
use diesel::helper_types::{InnerJoin, IntoBoxed};
use diesel::pg::Pg;
use diesel::prelude::*;
use diesel::sql_types::Double;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{PoiSearchCriteria, PoiSearchRepository, PoiSearchRepositoryError};
use crate::domain::{Category, CategoryId, CategoryName, ExternalId, PoiId, PoiListing};

use super::diesel_helpers::{map_diesel_error_with, map_pool_error_message};
use super::pool::{DbPool, PoolError};
use super::schema::{categories, pois};

type FilteredPois<'a> = IntoBoxed<'a, InnerJoin<pois::table, categories::table>, Pg>;

/// Joined row in select order.
#[derive(Debug, Queryable)]
struct ListingRow {
    id: i32,
    name: String,
    external_id: i32,
    category_id: i32,
    category_name: String,
    avg_rating: f64,
}

/// Diesel-backed implementation of [`PoiSearchRepository`].
#[derive(Clone)]
pub struct DieselPoiSearchRepository {
    pool: DbPool,
}

impl DieselPoiSearchRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> PoiSearchRepositoryError {
    PoiSearchRepositoryError::connection(map_pool_error_message(error))
}

fn map_diesel_error(error: diesel::result::Error, operation: &str) -> PoiSearchRepositoryError {
    map_diesel_error_with(
        error,
        operation,
        PoiSearchRepositoryError::connection,
        PoiSearchRepositoryError::query,
    )
}

fn filtered(criteria: &PoiSearchCriteria) -> FilteredPois<'_> {
    let mut query = pois::table.inner_join(categories::table).into_boxed();
    if let Some(id) = criteria.id {
        query = query.filter(pois::id.eq(id));
    }
    if let Some(external_id) = criteria.external_id {
        query = query.filter(pois::external_id.eq(external_id));
    }
    if let Some(name) = criteria.category_name.as_deref() {
        query = query.filter(categories::name.eq(name));
    }
    query
}

fn to_domain(row: ListingRow) -> Result<PoiListing, PoiSearchRepositoryError> {
    let category_name = CategoryName::new(row.category_name).map_err(|err| {
        PoiSearchRepositoryError::query(format!(
            "stored category {} is invalid: {err}",
            row.category_id
        ))
    })?;
    Ok(PoiListing {
        id: PoiId::new(row.id),
        name: row.name,
        external_id: ExternalId::new(row.external_id),
        category: Category::new(CategoryId::new(row.category_id), category_name),
        avg_rating: row.avg_rating,
    })
}

fn to_i64(value: u64) -> i64 {
    i64::try_from(value).unwrap_or(i64::MAX)
}

#[async_trait]
impl PoiSearchRepository for DieselPoiSearchRepository {
    async fn count(&self, criteria: &PoiSearchCriteria) -> Result<u64, PoiSearchRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let total: i64 = filtered(criteria)
            .count()
            .get_result(&mut conn)
            .await
            .map_err(|err| map_diesel_error(err, "count pois"))?;
        Ok(u64::try_from(total).unwrap_or(0))
    }

    async fn fetch(
        &self,
        criteria: &PoiSearchCriteria,
        offset: u64,
        limit: u64,
    ) -> Result<Vec<PoiListing>, PoiSearchRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<ListingRow> = filtered(criteria)
            .select((
                pois::id,
                pois::name,
                pois::external_id,
                categories::id,
                categories::name,
                sql::<Double>("pois.avg_rating::double precision"),
            ))
            .order_by(pois::id.asc())
            .offset(to_i64(offset))
            .limit(to_i64(limit))
            .load(&mut conn)
            .await
            .map_err(|err| map_diesel_error(err, "fetch pois"))?;
        rows.into_iter().map(to_domain).collect()
    }

    async fn category_names(&self) -> Result<Vec<String>, PoiSearchRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        categories::table
            .select(categories::name)
            .order_by(categories::name.asc())
            .load(&mut conn)
            .await
            .map_err(|err| map_diesel_error(err, "list category names"))
    }
}
