//! Supported import file formats.

use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};

/// File format selected from the input file's extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ImportFormat {
    /// Root element with repeated `DATA_RECORD` children.
    Xml,
    /// Top-level array of objects.
    Json,
    /// Header row followed by one POI per row.
    Csv,
}

impl ImportFormat {
    /// Detect the format from the file-name suffix.
    ///
    /// Matching is case-sensitive: only `.xml`, `.json` and `.csv` are
    /// recognised.
    ///
    /// # Examples
    /// ```
    /// use std::path::Path;
    /// use poi_backend::domain::ImportFormat;
    ///
    /// assert_eq!(ImportFormat::detect(Path::new("data/pois.csv")), Some(ImportFormat::Csv));
    /// assert_eq!(ImportFormat::detect(Path::new("notes.txt")), None);
    /// ```
    pub fn detect(path: &Path) -> Option<Self> {
        match path.extension()?.to_str()? {
            "xml" => Some(Self::Xml),
            "json" => Some(Self::Json),
            "csv" => Some(Self::Csv),
            _ => None,
        }
    }

    /// Whether records of this format are written through the bulk path.
    pub const fn is_bulk(self) -> bool {
        matches!(self, Self::Csv)
    }

    /// Lowercase format name used in diagnostics.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Xml => "xml",
            Self::Json => "json",
            Self::Csv => "csv",
        }
    }
}

impl fmt::Display for ImportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
