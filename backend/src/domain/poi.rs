//! Point-of-interest records at each stage of the import pipeline.
//!
//! - [`ExtractedPoi`] is what format extractors produce: required fields may
//!   still be missing and the external id is still in its source form.
//! - [`PoiRecord`] is the normalised, storable record. Building one applies
//!   the same constraints the store enforces (name length, 32-bit external
//!   id, `NUMERIC(3,1)` rating).
//! - [`PoiListing`] is the read model returned by searches.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::Category;

/// Maximum POI name length in characters.
pub const POI_NAME_MAX_CHARS: usize = 50;

/// Largest average rating representable by the store (`NUMERIC(3,1)`).
pub const AVG_RATING_MAX: f64 = 99.9;

/// Store-assigned POI identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PoiId(i32);

impl PoiId {
    /// Wrap a store-assigned identifier.
    pub const fn new(value: i32) -> Self {
        Self(value)
    }

    /// Raw identifier value.
    pub const fn get(self) -> i32 {
        self.0
    }
}

/// Normalised external identifier supplied by source files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ExternalId(i32);

impl ExternalId {
    /// Wrap an already-normalised identifier.
    pub const fn new(value: i32) -> Self {
        Self(value)
    }

    /// Raw identifier value.
    pub const fn get(self) -> i32 {
        self.0
    }
}

impl fmt::Display for ExternalId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// External identifier as it appeared in the source file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RawExternalId {
    /// Text from an XML element or CSV cell.
    Text(String),
    /// Integer from a JSON document.
    Integer(i64),
}

impl RawExternalId {
    /// Normalise into the store's 32-bit integer representation.
    ///
    /// Text is trimmed before parsing.
    pub fn normalize(&self) -> Result<ExternalId, PoiRecordError> {
        let value = match self {
            Self::Text(text) => text.trim().parse::<i32>().ok(),
            Self::Integer(number) => i32::try_from(*number).ok(),
        };
        value
            .map(ExternalId::new)
            .ok_or_else(|| PoiRecordError::InvalidExternalId {
                value: self.to_string(),
            })
    }
}

impl fmt::Display for RawExternalId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(text) => f.write_str(text),
            Self::Integer(number) => number.fmt(f),
        }
    }
}

/// Average rating: finite and non-negative.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize)]
#[serde(transparent)]
pub struct AvgRating(f64);

impl AvgRating {
    /// Rating used when a record carries no ratings.
    pub const ZERO: Self = Self(0.0);

    /// Wrap a computed average, rejecting negative or non-finite values.
    pub fn new(value: f64) -> Option<Self> {
        (value.is_finite() && value >= 0.0).then_some(Self(value))
    }

    /// Unrounded value.
    pub const fn value(self) -> f64 {
        self.0
    }

    /// Value rounded to one fractional digit, half away from zero, as the
    /// store keeps it.
    ///
    /// # Examples
    /// ```
    /// use poi_backend::domain::AvgRating;
    ///
    /// let rating = AvgRating::new(10.0 / 3.0).expect("finite");
    /// assert_eq!(rating.rounded_to_tenths(), 3.3);
    /// ```
    pub fn rounded_to_tenths(self) -> f64 {
        (self.0 * 10.0).round() / 10.0
    }
}

/// Canonical fields pulled from one source element, category resolved.
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractedPoi {
    /// POI name, if the source carried one.
    pub name: Option<String>,
    /// External id in source form, if present.
    pub external_id: Option<RawExternalId>,
    /// Resolved category reference.
    pub category: Category,
    /// Average of the source ratings.
    pub avg_rating: AvgRating,
}

/// Reasons a [`PoiRecord`] cannot be built.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PoiRecordError {
    /// The name is missing.
    #[error("name is required")]
    MissingName,
    /// The name exceeds [`POI_NAME_MAX_CHARS`].
    #[error("name must be at most {max} characters, got {actual}")]
    NameTooLong { max: usize, actual: usize },
    /// The external id is missing.
    #[error("external id is required")]
    MissingExternalId,
    /// The external id is not a 32-bit integer.
    #[error("external id must be a 32-bit integer, got `{value}`")]
    InvalidExternalId { value: String },
    /// The rounded rating does not fit `NUMERIC(3,1)`.
    #[error("average rating {value} exceeds the storable maximum {max}")]
    RatingOutOfRange { value: f64, max: f64 },
}

/// Normalised POI ready to be written.
#[derive(Debug, Clone, PartialEq)]
pub struct PoiRecord {
    name: String,
    external_id: ExternalId,
    category: Category,
    avg_rating: AvgRating,
}

impl PoiRecord {
    /// Validate the parts of a storable record.
    pub fn new(
        name: String,
        external_id: ExternalId,
        category: Category,
        avg_rating: AvgRating,
    ) -> Result<Self, PoiRecordError> {
        let actual = name.chars().count();
        if actual > POI_NAME_MAX_CHARS {
            return Err(PoiRecordError::NameTooLong {
                max: POI_NAME_MAX_CHARS,
                actual,
            });
        }
        let rounded = avg_rating.rounded_to_tenths();
        if rounded > AVG_RATING_MAX {
            return Err(PoiRecordError::RatingOutOfRange {
                value: avg_rating.value(),
                max: AVG_RATING_MAX,
            });
        }
        Ok(Self {
            name,
            external_id,
            category,
            avg_rating,
        })
    }

    /// POI name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Natural key used for upserts.
    pub fn external_id(&self) -> ExternalId {
        self.external_id
    }

    /// Referenced category.
    pub fn category(&self) -> &Category {
        &self.category
    }

    /// Unrounded average rating.
    pub fn avg_rating(&self) -> AvgRating {
        self.avg_rating
    }
}

impl TryFrom<ExtractedPoi> for PoiRecord {
    type Error = PoiRecordError;

    fn try_from(value: ExtractedPoi) -> Result<Self, Self::Error> {
        let ExtractedPoi {
            name,
            external_id,
            category,
            avg_rating,
        } = value;
        let name = name.ok_or(PoiRecordError::MissingName)?;
        let external_id = external_id
            .ok_or(PoiRecordError::MissingExternalId)?
            .normalize()?;
        Self::new(name, external_id, category, avg_rating)
    }
}

/// Stored POI with its category preloaded.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PoiListing {
    /// Store-assigned identifier.
    pub id: PoiId,
    /// POI name.
    pub name: String,
    /// External identifier.
    pub external_id: ExternalId,
    /// Category the POI belongs to.
    pub category: Category,
    /// Average rating as stored (one fractional digit).
    pub avg_rating: f64,
}
