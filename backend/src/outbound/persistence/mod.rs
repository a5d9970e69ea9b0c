//! PostgreSQL persistence adapters using Diesel.
//!
//! Repositories are thin translators between Diesel rows and domain types;
//! row structs and the schema stay private to this module. Connections come
//! from a shared `bb8` pool over `diesel-async`.
//!
//! The schema itself is created by the SQL migrations in
//! `backend/migrations/`; nothing here runs them.
//!
//! # Example
//!
//! ```no_run
//! use poi_backend::outbound::persistence::{DbPool, DieselPoiSearchRepository, PoolConfig};
//!
//! # async fn build() -> Result<(), poi_backend::outbound::persistence::PoolError> {
//! let pool = DbPool::new(PoolConfig::new("postgres://localhost/pois")).await?;
//! let repo = DieselPoiSearchRepository::new(pool);
//! # let _ = repo;
//! # Ok(())
//! # }
//! ```

mod diesel_category_repository;
pub(crate) mod diesel_helpers;
mod diesel_poi_repository;
mod diesel_poi_search_repository;
mod models;
mod pool;
mod schema;

pub use diesel_category_repository::DieselCategoryRepository;
pub use diesel_poi_repository::DieselPoiRepository;
pub use diesel_poi_search_repository::DieselPoiSearchRepository;
pub use pool::{DbPool, PoolConfig, PoolError};
