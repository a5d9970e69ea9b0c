//! Diesel table definitions for the PostgreSQL schema.
//!
//! These definitions must match `backend/migrations/` exactly. Regenerate
//! with `diesel print-schema` after changing a migration.

diesel::table! {
    /// POI categories, created lazily by imports.
    categories (id) {
        /// Primary key.
        id -> Int4,
        /// Unique category name (max 25 characters).
        name -> Varchar,
    }
}

diesel::table! {
    /// Imported points of interest.
    ///
    /// `external_id` is indexed but not unique; bulk imports may store the
    /// same external id more than once.
    pois (id) {
        /// Primary key.
        id -> Int4,
        /// POI name (max 50 characters).
        name -> Varchar,
        /// Identifier supplied by the source file.
        external_id -> Int4,
        /// Owning category; rows are deleted with it.
        category_id -> Int4,
        /// Average rating, `NUMERIC(3,1)`.
        avg_rating -> Numeric,
    }
}

diesel::joinable!(pois -> categories (category_id));

diesel::allow_tables_to_appear_in_same_query!(categories, pois);
