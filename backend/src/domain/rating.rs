//! Rating aggregation for the three import formats.
//!
//! Each format carries ratings differently:
//!
//! | format | representation                    | token type |
//! |--------|-----------------------------------|------------|
//! | XML    | `1,4,5` element text              | integer    |
//! | JSON   | `[1, 4, 5]` array                 | integer    |
//! | CSV    | `{1,4,5}` cell, empty tokens drop | decimal    |
//!
//! JSON numbers such as `4.0` count as integers; `1.5` is malformed.
//! Absent or empty input averages to zero. The mean is plain `f64`
//! arithmetic; rounding to the stored precision happens when the record is
//! persisted. A mean that overflows is rejected as out of range.

use serde_json::Value;

use super::AvgRating;

/// Ratings as found in one source element.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RawRatings<'a> {
    /// Text of the `pratings` element.
    Xml(Option<&'a str>),
    /// Value of the `ratings` property.
    Json(Option<&'a Value>),
    /// Content of the `poi_ratings` column.
    Csv(Option<&'a str>),
}

/// Malformed ratings input.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RatingError {
    /// A token could not be parsed as a number of the expected kind.
    #[error("rating `{token}` is not a valid {expected}")]
    Malformed {
        token: String,
        expected: &'static str,
    },
    /// A token parsed but is negative or not finite.
    #[error("rating `{token}` must be a finite, non-negative number")]
    OutOfRange { token: String },
    /// JSON ratings were neither an array nor null.
    #[error("ratings must be an array of integers, got {found}")]
    NotAList { found: &'static str },
}

/// Average the ratings of one element.
///
/// # Examples
/// ```
/// use poi_backend::domain::{RawRatings, average};
///
/// let avg = average(RawRatings::Xml(Some("1,1,3,1,4,1,5,3,1,2"))).expect("valid ratings");
/// assert_eq!(avg.value(), 2.2);
///
/// let avg = average(RawRatings::Csv(Some("{1,2,3}"))).expect("valid ratings");
/// assert_eq!(avg.value(), 2.0);
///
/// let avg = average(RawRatings::Csv(None)).expect("absent ratings");
/// assert_eq!(avg.value(), 0.0);
/// ```
pub fn average(raw: RawRatings<'_>) -> Result<AvgRating, RatingError> {
    let values = match raw {
        RawRatings::Xml(text) => xml_values(text)?,
        RawRatings::Json(value) => json_values(value)?,
        RawRatings::Csv(text) => csv_values(text)?,
    };
    mean(&values).ok_or_else(|| RatingError::OutOfRange {
        token: raw_text(raw),
    })
}

fn raw_text(raw: RawRatings<'_>) -> String {
    match raw {
        RawRatings::Xml(text) | RawRatings::Csv(text) => text.unwrap_or_default().to_owned(),
        RawRatings::Json(value) => value.map(Value::to_string).unwrap_or_default(),
    }
}

fn xml_values(text: Option<&str>) -> Result<Vec<f64>, RatingError> {
    let Some(text) = text.filter(|value| !value.trim().is_empty()) else {
        return Ok(Vec::new());
    };
    text.split(',').map(parse_integer_token).collect()
}

fn json_values(value: Option<&Value>) -> Result<Vec<f64>, RatingError> {
    match value {
        None | Some(Value::Null) => Ok(Vec::new()),
        Some(Value::Array(items)) => items.iter().map(json_item).collect(),
        Some(other) => Err(RatingError::NotAList {
            found: json_kind(other),
        }),
    }
}

fn json_item(item: &Value) -> Result<f64, RatingError> {
    match item {
        Value::Number(number) => whole_number(number)
            .ok_or_else(|| RatingError::Malformed {
                token: number.to_string(),
                expected: "integer",
            })
            .and_then(|rating| non_negative(rating, &number.to_string())),
        Value::String(text) => parse_integer_token(text),
        other => Err(RatingError::Malformed {
            token: other.to_string(),
            expected: "integer",
        }),
    }
}

/// Integers, plus floats with no fractional part such as `4.0`.
fn whole_number(number: &serde_json::Number) -> Option<f64> {
    number
        .as_i64()
        .map(|value| value as f64)
        .or_else(|| number.as_f64().filter(|value| value.fract() == 0.0))
}

fn csv_values(text: Option<&str>) -> Result<Vec<f64>, RatingError> {
    let Some(text) = text else {
        return Ok(Vec::new());
    };
    text.replace(['{', '}'], "")
        .split(',')
        .filter(|token| !token.is_empty())
        .map(parse_decimal_token)
        .collect()
}

fn parse_integer_token(token: &str) -> Result<f64, RatingError> {
    let trimmed = token.trim();
    let rating = trimmed
        .parse::<i64>()
        .map_err(|_| RatingError::Malformed {
            token: trimmed.to_owned(),
            expected: "integer",
        })?;
    non_negative(rating as f64, trimmed)
}

fn parse_decimal_token(token: &str) -> Result<f64, RatingError> {
    let trimmed = token.trim();
    let rating = trimmed
        .parse::<f64>()
        .map_err(|_| RatingError::Malformed {
            token: trimmed.to_owned(),
            expected: "decimal",
        })?;
    non_negative(rating, trimmed)
}

fn non_negative(rating: f64, token: &str) -> Result<f64, RatingError> {
    if rating.is_finite() && rating >= 0.0 {
        Ok(rating)
    } else {
        Err(RatingError::OutOfRange {
            token: token.to_owned(),
        })
    }
}

/// `None` when the sum overflows to a non-finite mean.
fn mean(values: &[f64]) -> Option<AvgRating> {
    if values.is_empty() {
        return Some(AvgRating::ZERO);
    }
    let sum: f64 = values.iter().sum();
    AvgRating::new(sum / values.len() as f64)
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
