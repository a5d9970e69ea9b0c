//! Per-run category name resolution.

use std::collections::HashMap;

use tracing::debug;

use crate::domain::ports::{CategoryRepository, CategoryRepositoryError};
use crate::domain::{Category, CategoryName, CategoryValidationError};

/// Reasons a category name could not be resolved.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub(crate) enum ResolveError {
    /// The name cannot be stored.
    #[error("category `{name}` is invalid: {source}")]
    Invalid {
        name: String,
        #[source]
        source: CategoryValidationError,
    },
    /// The store failed.
    #[error(transparent)]
    Store(#[from] CategoryRepositoryError),
}

/// Maps category names to stored categories for one import run.
///
/// The cache is seeded from every stored category on first use. Misses go
/// through [`CategoryRepository::get_or_create`], so a name is never created
/// twice even when another run races this one.
pub(crate) struct CategoryResolver<'a, C: ?Sized> {
    repo: &'a C,
    cache: Option<HashMap<String, Category>>,
    created: u64,
}

impl<'a, C> CategoryResolver<'a, C>
where
    C: CategoryRepository + ?Sized,
{
    pub(crate) fn new(repo: &'a C) -> Self {
        Self {
            repo,
            cache: None,
            created: 0,
        }
    }

    /// Categories created by this resolver so far.
    pub(crate) fn created(&self) -> u64 {
        self.created
    }

    pub(crate) async fn resolve(&mut self, raw_name: &str) -> Result<Category, ResolveError> {
        let cache = match self.cache.take() {
            Some(cache) => cache,
            None => self.seed().await?,
        };
        let cache = self.cache.insert(cache);
        if let Some(category) = cache.get(raw_name) {
            return Ok(category.clone());
        }

        let name = CategoryName::new(raw_name).map_err(|source| ResolveError::Invalid {
            name: raw_name.to_owned(),
            source,
        })?;
        let lookup = self.repo.get_or_create(&name).await?;
        if lookup.created {
            self.created += 1;
            debug!(category = %lookup.category.name(), "category created");
        }
        cache.insert(raw_name.to_owned(), lookup.category.clone());
        Ok(lookup.category)
    }

    async fn seed(&self) -> Result<HashMap<String, Category>, CategoryRepositoryError> {
        let existing = self.repo.list_all().await?;
        debug!(categories = existing.len(), "category cache seeded");
        Ok(existing
            .into_iter()
            .map(|category| (category.name().as_ref().to_owned(), category))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::CategoryId;
    use crate::domain::ports::{CategoryLookup, MockCategoryRepository};
    use rstest::rstest;

    fn category(id: i32, name: &str) -> Category {
        Category::new(
            CategoryId::new(id),
            CategoryName::new(name).expect("valid category"),
        )
    }

    #[rstest]
    #[tokio::test]
    async fn seeded_names_resolve_without_store_writes() {
        let mut repo = MockCategoryRepository::new();
        repo.expect_list_all()
            .times(1)
            .return_once(|| Ok(vec![category(4, "restaurant")]));
        repo.expect_get_or_create().times(0);

        let mut resolver = CategoryResolver::new(&repo);
        let first = resolver.resolve("restaurant").await.expect("resolved");
        let second = resolver.resolve("restaurant").await.expect("resolved");

        assert_eq!(first.id(), CategoryId::new(4));
        assert_eq!(first, second);
        assert_eq!(resolver.created(), 0);
    }

    #[rstest]
    #[tokio::test]
    async fn misses_are_created_once_and_cached() {
        let mut repo = MockCategoryRepository::new();
        repo.expect_list_all().times(1).return_once(|| Ok(Vec::new()));
        repo.expect_get_or_create()
            .withf(|name| name.as_ref() == "kindergarten")
            .times(1)
            .return_once(|_| {
                Ok(CategoryLookup {
                    category: category(1, "kindergarten"),
                    created: true,
                })
            });

        let mut resolver = CategoryResolver::new(&repo);
        resolver.resolve("kindergarten").await.expect("resolved");
        resolver.resolve("kindergarten").await.expect("resolved");

        assert_eq!(resolver.created(), 1);
    }

    #[rstest]
    #[tokio::test]
    async fn names_found_by_get_or_create_are_not_counted_as_created() {
        let mut repo = MockCategoryRepository::new();
        repo.expect_list_all().times(1).return_once(|| Ok(Vec::new()));
        repo.expect_get_or_create().times(1).return_once(|_| {
            Ok(CategoryLookup {
                category: category(9, "bakery"),
                created: false,
            })
        });

        let mut resolver = CategoryResolver::new(&repo);
        let resolved = resolver.resolve("bakery").await.expect("resolved");

        assert_eq!(resolved.id(), CategoryId::new(9));
        assert_eq!(resolver.created(), 0);
    }

    #[rstest]
    #[case("")]
    #[case("a-category-name-well-over-the-limit")]
    #[tokio::test]
    async fn invalid_names_never_reach_the_store(#[case] raw: &str) {
        let mut repo = MockCategoryRepository::new();
        repo.expect_list_all().times(1).return_once(|| Ok(Vec::new()));
        repo.expect_get_or_create().times(0);

        let mut resolver = CategoryResolver::new(&repo);
        let err = resolver.resolve(raw).await.expect_err("invalid name");

        assert!(matches!(err, ResolveError::Invalid { .. }));
    }

    #[rstest]
    #[tokio::test]
    async fn seeding_failures_surface_as_store_errors() {
        let mut repo = MockCategoryRepository::new();
        repo.expect_list_all()
            .times(1)
            .return_once(|| Err(CategoryRepositoryError::connection("pool exhausted")));

        let mut resolver = CategoryResolver::new(&repo);
        let err = resolver.resolve("cafe").await.expect_err("store failure");

        assert_eq!(
            err,
            ResolveError::Store(CategoryRepositoryError::connection("pool exhausted"))
        );
    }
}
