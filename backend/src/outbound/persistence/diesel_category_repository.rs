//! PostgreSQL-backed category repository.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{CategoryLookup, CategoryRepository, CategoryRepositoryError};
use crate::domain::{Category, CategoryId, CategoryName};

use super::diesel_helpers::{map_diesel_error_with, map_pool_error_message};
use super::models::{CategoryRow, NewCategoryRow};
use super::pool::{DbPool, PoolError};
use super::schema::categories;

/// Diesel-backed implementation of [`CategoryRepository`].
#[derive(Clone)]
pub struct DieselCategoryRepository {
    pool: DbPool,
}

impl DieselCategoryRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> CategoryRepositoryError {
    CategoryRepositoryError::connection(map_pool_error_message(error))
}

fn map_diesel_error(error: diesel::result::Error, operation: &str) -> CategoryRepositoryError {
    map_diesel_error_with(
        error,
        operation,
        CategoryRepositoryError::connection,
        CategoryRepositoryError::query,
    )
}

fn to_domain(row: CategoryRow) -> Result<Category, CategoryRepositoryError> {
    let name = CategoryName::new(row.name).map_err(|err| {
        CategoryRepositoryError::query(format!("stored category {} is invalid: {err}", row.id))
    })?;
    Ok(Category::new(CategoryId::new(row.id), name))
}

#[async_trait]
impl CategoryRepository for DieselCategoryRepository {
    async fn list_all(&self) -> Result<Vec<Category>, CategoryRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<CategoryRow> = categories::table
            .select(CategoryRow::as_select())
            .order_by(categories::id.asc())
            .load(&mut conn)
            .await
            .map_err(|err| map_diesel_error(err, "list categories"))?;
        rows.into_iter().map(to_domain).collect()
    }

    async fn get_or_create(
        &self,
        name: &CategoryName,
    ) -> Result<CategoryLookup, CategoryRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        // A racing insert wins the unique constraint; re-read in that case.
        let inserted: Option<CategoryRow> = diesel::insert_into(categories::table)
            .values(NewCategoryRow {
                name: name.as_ref(),
            })
            .on_conflict(categories::name)
            .do_nothing()
            .returning(CategoryRow::as_returning())
            .get_result(&mut conn)
            .await
            .optional()
            .map_err(|err| map_diesel_error(err, "insert category"))?;
        if let Some(row) = inserted {
            return Ok(CategoryLookup {
                category: to_domain(row)?,
                created: true,
            });
        }

        let existing: CategoryRow = categories::table
            .filter(categories::name.eq(name.as_ref()))
            .select(CategoryRow::as_select())
            .first(&mut conn)
            .await
            .map_err(|err| map_diesel_error(err, "read category"))?;
        Ok(CategoryLookup {
            category: to_domain(existing)?,
            created: false,
        })
    }
}
