//! Driving port for importing one POI file.

use std::fmt;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::ImportFormat;

/// Execution status of one import.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ImportStatus {
    /// The file was parsed and every record was written.
    Imported,
    /// The extension is not supported; the file was not touched.
    Unsupported,
}

/// Summary of a finished import.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportOutcome {
    /// Execution status.
    pub status: ImportStatus,
    /// Input file path.
    pub path: PathBuf,
    /// Detected format, absent when unsupported.
    pub format: Option<ImportFormat>,
    /// Raw elements found in the file.
    pub records_read: u64,
    /// POIs written (created plus updated).
    pub records_written: u64,
    /// POIs inserted as new rows.
    pub created: u64,
    /// Existing POIs overwritten by the upsert path.
    pub updated: u64,
    /// Categories created while resolving names.
    pub categories_created: u64,
}

impl ImportOutcome {
    /// Outcome for a file whose extension is not recognised.
    pub fn unsupported(path: &Path) -> Self {
        Self {
            status: ImportStatus::Unsupported,
            path: path.to_path_buf(),
            format: None,
            records_read: 0,
            records_written: 0,
            created: 0,
            updated: 0,
            categories_created: 0,
        }
    }
}

/// Which write a persistence failure aborted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteScope {
    /// A single upsert for the record at this 1-based position.
    Record(u64),
    /// The bulk insert covering `size` records.
    Batch { size: u64 },
}

impl fmt::Display for WriteScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Record(position) => write!(f, "record {position}"),
            Self::Batch { size } => write!(f, "batch of {size} records"),
        }
    }
}

/// Fatal import failures.
///
/// Writes made before the failure stay committed; `records_written` reports
/// how many.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ImportError {
    /// The file could not be opened or read.
    #[error("failed to read {}: {message}", path.display())]
    Read { path: PathBuf, message: String },
    /// The file is not well-formed for its format. Nothing was written.
    #[error("malformed {format} file: {message}")]
    StructuralParse {
        format: ImportFormat,
        message: String,
    },
    /// A record's fields could not be mapped.
    #[error("record {record}: {message}")]
    FieldExtraction {
        record: u64,
        message: String,
        records_written: u64,
    },
    /// The store rejected a write.
    #[error("{scope}: store rejected write: {message}")]
    Persistence {
        scope: WriteScope,
        message: String,
        records_written: u64,
    },
}

impl ImportError {
    /// Records committed before the failure.
    pub fn records_written(&self) -> u64 {
        match self {
            Self::Read { .. } | Self::StructuralParse { .. } => 0,
            Self::FieldExtraction {
                records_written, ..
            }
            | Self::Persistence {
                records_written, ..
            } => *records_written,
        }
    }

    /// Stable label for the failure kind, used in diagnostics.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Read { .. } => "read",
            Self::StructuralParse { .. } => "structural_parse",
            Self::FieldExtraction { .. } => "field_extraction",
            Self::Persistence { .. } => "persistence",
        }
    }
}

/// Driving port for importing POI files.
#[async_trait]
pub trait PoiImportCommand: Send + Sync {
    /// Import the file at `path`, dispatching on its extension.
    async fn import(&self, path: &Path) -> Result<ImportOutcome, ImportError>;
}
