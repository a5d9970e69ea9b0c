//! Driven port for reading POI elements out of import files.
//!
//! Adapters perform the structural parse only: they turn a file into a list
//! of raw elements of the detected format. Field mapping, rating aggregation
//! and category resolution stay in the domain.

use std::path::Path;

use async_trait::async_trait;
use serde_json::Value;

use crate::domain::ImportFormat;

use super::define_port_error;

/// Child-element texts of one `DATA_RECORD` element.
///
/// A missing child and an empty child both surface as `None`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct XmlPoiElement {
    /// Text of `pid`.
    pub pid: Option<String>,
    /// Text of `pname`.
    pub pname: Option<String>,
    /// Text of `pcategory`.
    pub pcategory: Option<String>,
    /// Text of `pratings`, comma-separated integers.
    pub pratings: Option<String>,
}

/// Properties of one object from a JSON array.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct JsonPoiItem {
    /// `id` property, integer or string.
    pub id: Option<Value>,
    /// `name` property.
    pub name: Option<String>,
    /// `category` property.
    pub category: Option<String>,
    /// `ratings` property, expected to be an integer array.
    pub ratings: Option<Value>,
}

/// Cells of one CSV row. Empty cells surface as `None`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CsvPoiRow {
    /// `poi_id` column.
    pub poi_id: Option<String>,
    /// `poi_name` column.
    pub poi_name: Option<String>,
    /// `poi_category` column.
    pub poi_category: Option<String>,
    /// `poi_ratings` column, `{n,n,...}` of decimals.
    pub poi_ratings: Option<String>,
}

/// One raw element, tagged by the format it came from.
#[derive(Debug, Clone, PartialEq)]
pub enum RawPoi {
    /// XML `DATA_RECORD`.
    Xml(XmlPoiElement),
    /// JSON array item.
    Json(JsonPoiItem),
    /// CSV row.
    Csv(CsvPoiRow),
}

define_port_error! {
    /// Errors raised while reading or structurally parsing an import file.
    pub enum PoiSourceError {
        /// The file could not be opened or read.
        Read { message: String } =>
            "poi source read failed: {message}",
        /// The file is not well-formed for its format.
        Decode { message: String } =>
            "poi source decode failed: {message}",
    }
}

/// Port for loading the raw elements of one import file.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PoiSource: Send + Sync {
    /// Read `path` and parse it as `format`.
    ///
    /// The whole file is parsed before returning, so a structural failure
    /// anywhere in the file yields an error and no elements.
    async fn load(&self, path: &Path, format: ImportFormat)
    -> Result<Vec<RawPoi>, PoiSourceError>;
}
