//! Driven port for category lookup and lazy creation.

use async_trait::async_trait;

use crate::domain::{Category, CategoryName};

use super::define_port_error;

/// Result of a get-or-create call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryLookup {
    /// The existing or freshly created category.
    pub category: Category,
    /// Whether this call created the row.
    pub created: bool,
}

define_port_error! {
    /// Errors raised while reading or creating categories.
    pub enum CategoryRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } =>
            "category repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } =>
            "category repository query failed: {message}",
    }
}

/// Port for category persistence.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CategoryRepository: Send + Sync {
    /// Load every stored category.
    async fn list_all(&self) -> Result<Vec<Category>, CategoryRepositoryError>;

    /// Return the category named `name`, creating it when absent.
    ///
    /// Implementations must be atomic with respect to the unique name
    /// constraint: two racing callers observe the same row.
    async fn get_or_create(
        &self,
        name: &CategoryName,
    ) -> Result<CategoryLookup, CategoryRepositoryError>;
}
