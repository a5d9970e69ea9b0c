//! Domain primitives, services and ports.
//!
//! Purpose: define the strongly typed POI catalogue model and the services
//! that import and search it. Adapters depend on this module; it depends on
//! no adapter.
//!
//! Public surface:
//! - Error, ErrorCode: API error payload and its stable identifier.
//! - Category, PoiRecord, PoiListing: catalogue entities.
//! - AvgRating, average: rating aggregation.
//! - PoiImportService, PoiSearchService: driving-port implementations.

pub mod category;
pub mod error;
pub mod import_format;
pub mod poi;
mod poi_import;
mod poi_search;
pub mod ports;
pub mod rating;

pub use self::category::{
    CATEGORY_NAME_MAX_CHARS, Category, CategoryId, CategoryName, CategoryValidationError,
};
pub use self::error::{Error, ErrorCode, ErrorValidationError};
pub use self::import_format::ImportFormat;
pub use self::poi::{
    AVG_RATING_MAX, AvgRating, ExternalId, ExtractedPoi, POI_NAME_MAX_CHARS, PoiId, PoiListing,
    PoiRecord, PoiRecordError, RawExternalId,
};
pub use self::poi_import::PoiImportService;
pub use self::poi_search::PoiSearchService;
pub use self::rating::{RatingError, RawRatings, average};

/// Convenient API result alias.
///
/// # Examples
/// ```
/// use poi_backend::domain::{ApiResult, Error};
///
/// fn lookup() -> ApiResult<u32> {
///     Err(Error::not_found("no such poi"))
/// }
/// assert!(lookup().is_err());
/// ```
pub type ApiResult<T> = Result<T, Error>;
