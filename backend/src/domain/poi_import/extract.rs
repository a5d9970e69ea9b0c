//! Field mapping from raw source elements to canonical POI fields.

use serde_json::Value;

use super::category_resolver::{CategoryResolver, ResolveError};
use crate::domain::ports::{CategoryRepository, CsvPoiRow, JsonPoiItem, RawPoi, XmlPoiElement};
use crate::domain::{AvgRating, ExtractedPoi, RatingError, RawExternalId, RawRatings, average};

/// Canonical fields of one element before category resolution.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct CanonicalFields {
    pub(crate) name: Option<String>,
    pub(crate) external_id: Option<RawExternalId>,
    pub(crate) category: Option<String>,
    pub(crate) avg_rating: AvgRating,
}

/// Reasons one element could not be turned into an [`ExtractedPoi`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub(crate) enum ExtractError {
    #[error("category is missing")]
    MissingCategory,
    #[error(transparent)]
    Rating(#[from] RatingError),
    #[error(transparent)]
    Category(#[from] ResolveError),
}

/// Per-format mapping onto the canonical field set.
pub(crate) trait ExtractPoiFields {
    fn canonical_fields(&self) -> Result<CanonicalFields, RatingError>;
}

impl ExtractPoiFields for XmlPoiElement {
    fn canonical_fields(&self) -> Result<CanonicalFields, RatingError> {
        Ok(CanonicalFields {
            name: self.pname.clone(),
            external_id: self.pid.clone().map(RawExternalId::Text),
            category: self.pcategory.clone(),
            avg_rating: average(RawRatings::Xml(self.pratings.as_deref()))?,
        })
    }
}

impl ExtractPoiFields for JsonPoiItem {
    fn canonical_fields(&self) -> Result<CanonicalFields, RatingError> {
        Ok(CanonicalFields {
            name: self.name.clone(),
            external_id: self.id.as_ref().and_then(json_external_id),
            category: self.category.clone(),
            avg_rating: average(RawRatings::Json(self.ratings.as_ref()))?,
        })
    }
}

impl ExtractPoiFields for CsvPoiRow {
    fn canonical_fields(&self) -> Result<CanonicalFields, RatingError> {
        Ok(CanonicalFields {
            name: self.poi_name.clone(),
            external_id: self.poi_id.clone().map(RawExternalId::Text),
            category: self.poi_category.clone(),
            avg_rating: average(RawRatings::Csv(self.poi_ratings.as_deref()))?,
        })
    }
}

impl ExtractPoiFields for RawPoi {
    fn canonical_fields(&self) -> Result<CanonicalFields, RatingError> {
        match self {
            Self::Xml(element) => element.canonical_fields(),
            Self::Json(item) => item.canonical_fields(),
            Self::Csv(row) => row.canonical_fields(),
        }
    }
}

/// Integers stay integers; anything else keeps its JSON text and is rejected
/// when the record is normalised.
fn json_external_id(value: &Value) -> Option<RawExternalId> {
    match value {
        Value::Null => None,
        Value::Number(number) => Some(
            number
                .as_i64()
                .map_or_else(|| RawExternalId::Text(number.to_string()), RawExternalId::Integer),
        ),
        Value::String(text) => Some(RawExternalId::Text(text.clone())),
        other => Some(RawExternalId::Text(other.to_string())),
    }
}

/// Map `element` and resolve its category.
pub(crate) async fn extract<C>(
    element: &RawPoi,
    resolver: &mut CategoryResolver<'_, C>,
) -> Result<ExtractedPoi, ExtractError>
where
    C: CategoryRepository + ?Sized,
{
    let CanonicalFields {
        name,
        external_id,
        category,
        avg_rating,
    } = element.canonical_fields()?;
    let category_name = category.ok_or(ExtractError::MissingCategory)?;
    let category = resolver.resolve(&category_name).await?;
    Ok(ExtractedPoi {
        name,
        external_id,
        category,
        avg_rating,
    })
}
