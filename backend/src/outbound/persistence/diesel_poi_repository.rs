//! PostgreSQL-backed POI writer.
//!
//! Ratings are bound as `double precision` and cast to `NUMERIC(3,1)` in SQL,
//! so the store applies its own rounding to the value the domain already
//! rounded.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel::sql_query;
use diesel::sql_types::{Array, Double, Integer, Varchar};
use diesel_async::scoped_futures::ScopedFutureExt;
use diesel_async::{AsyncConnection, AsyncPgConnection, RunQueryDsl};
use tracing::debug;

use crate::domain::PoiRecord;
use crate::domain::ports::{PoiRepository, PoiRepositoryError, UpsertOutcome};

use super::diesel_helpers::{map_diesel_error_with, map_pool_error_message};
use super::pool::{DbPool, PoolError};
use super::schema::pois;

const INSERT_SQL: &str = r#"
INSERT INTO pois (name, external_id, category_id, avg_rating)
VALUES ($1, $2, $3, CAST($4 AS NUMERIC(3,1)))
"#;

const UPDATE_SQL: &str = r#"
UPDATE pois
SET name = $1,
    external_id = $2,
    category_id = $3,
    avg_rating = CAST($4 AS NUMERIC(3,1))
WHERE id = $5
"#;

const BULK_INSERT_SQL: &str = r#"
INSERT INTO pois (name, external_id, category_id, avg_rating)
SELECT batch.name, batch.external_id, batch.category_id, CAST(batch.avg_rating AS NUMERIC(3,1))
FROM UNNEST($1::varchar[], $2::integer[], $3::integer[], $4::float8[])
    WITH ORDINALITY AS batch(name, external_id, category_id, avg_rating, position)
ORDER BY batch.position
"#;

/// Diesel-backed implementation of [`PoiRepository`].
#[derive(Clone)]
pub struct DieselPoiRepository {
    pool: DbPool,
}

impl DieselPoiRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

/// Failure inside the upsert transaction.
#[derive(Debug)]
enum UpsertTxError {
    Diesel(diesel::result::Error),
    Ambiguous,
}

impl From<diesel::result::Error> for UpsertTxError {
    fn from(error: diesel::result::Error) -> Self {
        Self::Diesel(error)
    }
}

fn map_pool_error(error: PoolError) -> PoiRepositoryError {
    PoiRepositoryError::connection(map_pool_error_message(error))
}

fn map_diesel_error(error: diesel::result::Error, operation: &str) -> PoiRepositoryError {
    map_diesel_error_with(
        error,
        operation,
        PoiRepositoryError::connection,
        PoiRepositoryError::query,
    )
}

async fn write_row(
    conn: &mut AsyncPgConnection,
    record: &PoiRecord,
    existing: Option<i32>,
) -> Result<usize, diesel::result::Error> {
    let statement = if existing.is_some() {
        UPDATE_SQL
    } else {
        INSERT_SQL
    };
    let query = sql_query(statement)
        .bind::<Varchar, _>(record.name())
        .bind::<Integer, _>(record.external_id().get())
        .bind::<Integer, _>(record.category().id().get())
        .bind::<Double, _>(record.avg_rating().rounded_to_tenths());
    match existing {
        Some(id) => query.bind::<Integer, _>(id).execute(conn).await,
        None => query.execute(conn).await,
    }
}

#[async_trait]
impl PoiRepository for DieselPoiRepository {
    async fn upsert(&self, record: &PoiRecord) -> Result<UpsertOutcome, PoiRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let external_id = record.external_id().get();

        let result: Result<UpsertOutcome, UpsertTxError> = conn
            .transaction(|conn| {
                async move {
                    let matches: Vec<i32> = pois::table
                        .filter(pois::external_id.eq(external_id))
                        .select(pois::id)
                        .order_by(pois::id.asc())
                        .limit(2)
                        .for_update()
                        .load(conn)
                        .await?;
                    match matches.as_slice() {
                        [] => {
                            write_row(conn, record, None).await?;
                            Ok(UpsertOutcome::Created)
                        }
                        [id] => {
                            write_row(conn, record, Some(*id)).await?;
                            Ok(UpsertOutcome::Updated)
                        }
                        _ => Err(UpsertTxError::Ambiguous),
                    }
                }
                .scope_boxed()
            })
            .await;

        match result {
            Ok(outcome) => {
                debug!(external_id, ?outcome, "poi upsert committed");
                Ok(outcome)
            }
            Err(UpsertTxError::Ambiguous) => Err(PoiRepositoryError::conflict(format!(
                "more than one POI has external id {external_id}"
            ))),
            Err(UpsertTxError::Diesel(error)) => Err(map_diesel_error(error, "upsert poi")),
        }
    }

    async fn bulk_insert(&self, records: &[PoiRecord]) -> Result<u64, PoiRepositoryError> {
        if records.is_empty() {
            return Ok(0);
        }

        let names: Vec<String> = records.iter().map(|r| r.name().to_owned()).collect();
        let external_ids: Vec<i32> = records.iter().map(|r| r.external_id().get()).collect();
        let category_ids: Vec<i32> = records.iter().map(|r| r.category().id().get()).collect();
        let ratings: Vec<f64> = records
            .iter()
            .map(|r| r.avg_rating().rounded_to_tenths())
            .collect();

        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let inserted = sql_query(BULK_INSERT_SQL)
            .bind::<Array<Varchar>, _>(&names)
            .bind::<Array<Integer>, _>(&external_ids)
            .bind::<Array<Integer>, _>(&category_ids)
            .bind::<Array<Double>, _>(&ratings)
            .execute(&mut conn)
            .await
            .map_err(|err| map_diesel_error(err, "bulk insert pois"))?;
        debug!(inserted, "poi batch committed");
        Ok(u64::try_from(inserted).unwrap_or(u64::MAX))
    }
}
