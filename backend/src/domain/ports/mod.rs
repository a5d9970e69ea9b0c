//! Domain ports and supporting types for the hexagonal boundary.
//!
//! Driving ports (`PoiImportCommand`, `PoiSearchQuery`) are implemented by
//! domain services. Driven ports are implemented by outbound adapters: the
//! Diesel repositories, the in-memory store and the file-backed source.

mod macros;
pub(crate) use macros::define_port_error;

mod category_repository;
mod poi_import_command;
mod poi_repository;
mod poi_search_query;
mod poi_search_repository;
mod poi_source;

#[cfg(test)]
pub use category_repository::MockCategoryRepository;
pub use category_repository::{CategoryLookup, CategoryRepository, CategoryRepositoryError};
pub use poi_import_command::{
    ImportError, ImportOutcome, ImportStatus, PoiImportCommand, WriteScope,
};
#[cfg(test)]
pub use poi_repository::MockPoiRepository;
pub use poi_repository::{PoiRepository, PoiRepositoryError, UpsertOutcome};
#[cfg(test)]
pub use poi_search_query::MockPoiSearchQuery;
pub use poi_search_query::{PoiSearchQuery, PoiSearchRequest, PoiSearchResponse};
#[cfg(test)]
pub use poi_search_repository::MockPoiSearchRepository;
pub use poi_search_repository::{
    PoiSearchCriteria, PoiSearchRepository, PoiSearchRepositoryError,
};
#[cfg(test)]
pub use poi_source::MockPoiSource;
pub use poi_source::{
    CsvPoiRow, JsonPoiItem, PoiSource, PoiSourceError, RawPoi, XmlPoiElement,
};
