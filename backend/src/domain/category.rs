//! POI category model.
//!
//! Categories are created lazily by the importer the first time a name is
//! seen and are never deleted by it. Names are unique across the store.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Maximum category name length in characters.
pub const CATEGORY_NAME_MAX_CHARS: usize = 25;

/// Validation errors returned by [`CategoryName::new`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CategoryValidationError {
    /// The name is blank.
    #[error("category name must not be empty")]
    EmptyName,
    /// The name exceeds [`CATEGORY_NAME_MAX_CHARS`].
    #[error("category name must be at most {max} characters, got {actual}")]
    NameTooLong { max: usize, actual: usize },
}

/// Store-assigned category identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CategoryId(i32);

impl CategoryId {
    /// Wrap a store-assigned identifier.
    pub const fn new(value: i32) -> Self {
        Self(value)
    }

    /// Raw identifier value.
    pub const fn get(self) -> i32 {
        self.0
    }
}

impl fmt::Display for CategoryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Validated category name.
///
/// Names are compared exactly (case-sensitive, untrimmed) so the value is
/// stored as supplied once it passes validation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CategoryName(String);

impl CategoryName {
    /// Validate and construct a category name.
    ///
    /// # Examples
    /// ```
    /// use poi_backend::domain::CategoryName;
    ///
    /// let name = CategoryName::new("restaurant").expect("valid name");
    /// assert_eq!(name.as_ref(), "restaurant");
    /// assert!(CategoryName::new("  ").is_err());
    /// ```
    pub fn new(name: impl Into<String>) -> Result<Self, CategoryValidationError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(CategoryValidationError::EmptyName);
        }
        let actual = name.chars().count();
        if actual > CATEGORY_NAME_MAX_CHARS {
            return Err(CategoryValidationError::NameTooLong {
                max: CATEGORY_NAME_MAX_CHARS,
                actual,
            });
        }
        Ok(Self(name))
    }
}

impl AsRef<str> for CategoryName {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for CategoryName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for CategoryName {
    type Error = CategoryValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<CategoryName> for String {
    fn from(value: CategoryName) -> Self {
        value.0
    }
}

/// Persisted category.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Category {
    id: CategoryId,
    name: CategoryName,
}

impl Category {
    /// Build a category from its stored parts.
    pub fn new(id: CategoryId, name: CategoryName) -> Self {
        Self { id, name }
    }

    /// Store-assigned identifier.
    pub fn id(&self) -> CategoryId {
        self.id
    }

    /// Unique category name.
    pub fn name(&self) -> &CategoryName {
        &self.name
    }
}
