//! File-backed POI source.
//!
//! The path is canonicalised, then the file is opened through a `cap-std`
//! handle on its parent directory, read fully and parsed with the reader for its format:
//!
//! - XML: `roxmltree`, one element per `DATA_RECORD` child of the root;
//! - JSON: `serde_json`, one element per item of the top-level array;
//! - CSV: `csv` with `serde`, one element per row under the header.

use std::io::Read;
use std::path::Path;

use async_trait::async_trait;
use cap_std::{ambient_authority, fs::Dir};
use serde::Deserialize;
use serde_json::Value;

use crate::domain::ImportFormat;
use crate::domain::ports::{
    CsvPoiRow, JsonPoiItem, PoiSource, PoiSourceError, RawPoi, XmlPoiElement,
};

const XML_RECORD_TAG: &str = "DATA_RECORD";

/// Reads import files from the local filesystem.
#[derive(Debug, Clone, Copy, Default)]
pub struct FilePoiSource;

#[async_trait]
impl PoiSource for FilePoiSource {
    async fn load(
        &self,
        path: &Path,
        format: ImportFormat,
    ) -> Result<Vec<RawPoi>, PoiSourceError> {
        let bytes = read_scoped(path)?;
        match format {
            ImportFormat::Xml => parse_xml(&bytes),
            ImportFormat::Json => parse_json(&bytes),
            ImportFormat::Csv => parse_csv(&bytes),
        }
    }
}

fn read_scoped(path: &Path) -> Result<Vec<u8>, PoiSourceError> {
    // Symlinks resolve first; the capability handle refuses to follow them.
    let resolved = std::fs::canonicalize(path).map_err(|error| {
        PoiSourceError::read(format!("resolve input path '{}': {error}", path.display()))
    })?;
    let parent = resolved
        .parent()
        .filter(|dir| !dir.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    let file_name = resolved
        .file_name()
        .ok_or_else(|| PoiSourceError::read(format!("'{}' is not a file", path.display())))?;
    let directory = Dir::open_ambient_dir(parent, ambient_authority()).map_err(|error| {
        PoiSourceError::read(format!(
            "open input parent directory '{}': {error}",
            parent.display()
        ))
    })?;
    let mut file = directory.open(Path::new(file_name)).map_err(|error| {
        PoiSourceError::read(format!("open input file '{}': {error}", path.display()))
    })?;
    let mut bytes = Vec::new();
    file.read_to_end(&mut bytes).map_err(|error| {
        PoiSourceError::read(format!("read input file '{}': {error}", path.display()))
    })?;
    Ok(bytes)
}

fn parse_xml(bytes: &[u8]) -> Result<Vec<RawPoi>, PoiSourceError> {
    let text = std::str::from_utf8(bytes)
        .map_err(|error| PoiSourceError::decode(format!("xml is not valid UTF-8: {error}")))?;
    let document = roxmltree::Document::parse(text)
        .map_err(|error| PoiSourceError::decode(error.to_string()))?;
    Ok(document
        .root_element()
        .children()
        .filter(|node| node.is_element() && node.has_tag_name(XML_RECORD_TAG))
        .map(|record| {
            RawPoi::Xml(XmlPoiElement {
                pid: child_text(record, "pid"),
                pname: child_text(record, "pname"),
                pcategory: child_text(record, "pcategory"),
                pratings: child_text(record, "pratings"),
            })
        })
        .collect())
}

fn child_text(record: roxmltree::Node<'_, '_>, tag: &str) -> Option<String> {
    record
        .children()
        .find(|node| node.is_element() && node.has_tag_name(tag))
        .and_then(|node| node.text())
        .filter(|text| !text.is_empty())
        .map(str::to_owned)
}

/// One top-level JSON array item. Unknown properties are ignored.
#[derive(Debug, Deserialize)]
struct JsonPoiDto {
    #[serde(default)]
    id: Option<Value>,
    #[serde(default)]
    name: Option<Value>,
    #[serde(default)]
    category: Option<Value>,
    #[serde(default)]
    ratings: Option<Value>,
}

fn parse_json(bytes: &[u8]) -> Result<Vec<RawPoi>, PoiSourceError> {
    let items: Vec<JsonPoiDto> = serde_json::from_slice(bytes)
        .map_err(|error| PoiSourceError::decode(error.to_string()))?;
    Ok(items
        .into_iter()
        .map(|item| {
            RawPoi::Json(JsonPoiItem {
                id: item.id,
                name: item.name.and_then(json_text),
                category: item.category.and_then(json_text),
                ratings: item.ratings,
            })
        })
        .collect())
}

/// Strings are kept verbatim; other scalars keep their JSON text.
fn json_text(value: Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(text) => Some(text),
        other => Some(other.to_string()),
    }
}

/// One CSV row. Empty cells deserialize as `None`.
#[derive(Debug, Deserialize)]
struct CsvPoiDto {
    poi_id: Option<String>,
    poi_name: Option<String>,
    poi_category: Option<String>,
    poi_ratings: Option<String>,
}

fn parse_csv(bytes: &[u8]) -> Result<Vec<RawPoi>, PoiSourceError> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::Headers)
        .from_reader(bytes);
    reader
        .deserialize::<CsvPoiDto>()
        .map(|row| {
            let row = row.map_err(|error| PoiSourceError::decode(error.to_string()))?;
            Ok(RawPoi::Csv(CsvPoiRow {
                poi_id: row.poi_id,
                poi_name: row.poi_name,
                poi_category: row.poi_category,
                poi_ratings: row.poi_ratings,
            }))
        })
        .collect()
}
