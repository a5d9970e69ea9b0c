//! In-memory POI store.
//!
//! Implements every driven persistence port against process memory with the
//! same observable rules as the PostgreSQL schema: unique category names,
//! store-assigned ids, a category foreign key on POIs and ratings kept to one
//! fractional digit. Used by `import-pois --dry-run` and by tests.

use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;

use crate::domain::ports::{
    CategoryLookup, CategoryRepository, CategoryRepositoryError, PoiRepository,
    PoiRepositoryError, PoiSearchCriteria, PoiSearchRepository, PoiSearchRepositoryError,
    UpsertOutcome,
};
use crate::domain::{
    Category, CategoryId, CategoryName, ExternalId, PoiId, PoiListing, PoiRecord,
};

#[derive(Debug, Clone)]
struct StoredPoi {
    id: PoiId,
    name: String,
    external_id: ExternalId,
    category_id: CategoryId,
    avg_rating: f64,
}

#[derive(Debug, Default)]
struct StoreState {
    categories: Vec<Category>,
    pois: Vec<StoredPoi>,
    last_category_id: i32,
    last_poi_id: i32,
}

impl StoreState {
    fn category(&self, id: CategoryId) -> Option<&Category> {
        self.categories.iter().find(|category| category.id() == id)
    }

    fn row(&self, id: PoiId, record: &PoiRecord) -> Result<StoredPoi, PoiRepositoryError> {
        let category_id = record.category().id();
        if self.category(category_id).is_none() {
            return Err(PoiRepositoryError::query(format!(
                "category {} does not exist",
                category_id.get()
            )));
        }
        Ok(StoredPoi {
            id,
            name: record.name().to_owned(),
            external_id: record.external_id(),
            category_id,
            avg_rating: record.avg_rating().rounded_to_tenths(),
        })
    }

    fn listing(&self, poi: &StoredPoi) -> Option<PoiListing> {
        self.category(poi.category_id).map(|category| PoiListing {
            id: poi.id,
            name: poi.name.clone(),
            external_id: poi.external_id,
            category: category.clone(),
            avg_rating: poi.avg_rating,
        })
    }

    fn matching<'a>(
        &'a self,
        criteria: &'a PoiSearchCriteria,
    ) -> impl Iterator<Item = PoiListing> + 'a {
        self.pois
            .iter()
            .filter(|poi| criteria.id.is_none_or(|id| poi.id.get() == id))
            .filter(|poi| {
                criteria
                    .external_id
                    .is_none_or(|external_id| poi.external_id.get() == external_id)
            })
            .filter_map(|poi| self.listing(poi))
            .filter(|listing| {
                criteria
                    .category_name
                    .as_deref()
                    .is_none_or(|name| listing.category.name().as_ref() == name)
            })
    }
}

/// Process-local store implementing the category, POI and search ports.
#[derive(Debug, Default)]
pub struct InMemoryPoiStore {
    state: Mutex<StoreState>,
}

impl InMemoryPoiStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> MutexGuard<'_, StoreState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Number of stored POIs.
    pub fn poi_count(&self) -> usize {
        self.state().pois.len()
    }

    /// Number of stored categories.
    pub fn category_count(&self) -> usize {
        self.state().categories.len()
    }

    /// Every stored POI in id order.
    pub fn listings(&self) -> Vec<PoiListing> {
        let state = self.state();
        state
            .pois
            .iter()
            .filter_map(|poi| state.listing(poi))
            .collect()
    }
}

#[async_trait]
impl CategoryRepository for InMemoryPoiStore {
    async fn list_all(&self) -> Result<Vec<Category>, CategoryRepositoryError> {
        Ok(self.state().categories.clone())
    }

    async fn get_or_create(
        &self,
        name: &CategoryName,
    ) -> Result<CategoryLookup, CategoryRepositoryError> {
        let mut state = self.state();
        if let Some(existing) = state
            .categories
            .iter()
            .find(|category| category.name() == name)
        {
            return Ok(CategoryLookup {
                category: existing.clone(),
                created: false,
            });
        }
        state.last_category_id += 1;
        let category = Category::new(CategoryId::new(state.last_category_id), name.clone());
        state.categories.push(category.clone());
        Ok(CategoryLookup {
            category,
            created: true,
        })
    }
}

#[async_trait]
impl PoiRepository for InMemoryPoiStore {
    async fn upsert(&self, record: &PoiRecord) -> Result<UpsertOutcome, PoiRepositoryError> {
        let mut state = self.state();
        let matches: Vec<usize> = state
            .pois
            .iter()
            .enumerate()
            .filter(|(_, poi)| poi.external_id == record.external_id())
            .map(|(index, _)| index)
            .collect();
        match matches.as_slice() {
            [] => {
                let id = PoiId::new(state.last_poi_id + 1);
                let poi = state.row(id, record)?;
                state.last_poi_id = id.get();
                state.pois.push(poi);
                Ok(UpsertOutcome::Created)
            }
            [index] => {
                let index = *index;
                let poi = state.row(state.pois[index].id, record)?;
                state.pois[index] = poi;
                Ok(UpsertOutcome::Updated)
            }
            many => Err(PoiRepositoryError::conflict(format!(
                "{} POIs share external id {}",
                many.len(),
                record.external_id()
            ))),
        }
    }

    async fn bulk_insert(&self, records: &[PoiRecord]) -> Result<u64, PoiRepositoryError> {
        let mut state = self.state();
        let first_id = state.last_poi_id;
        let rows = records
            .iter()
            .zip(1..)
            .map(|(record, n)| state.row(PoiId::new(first_id + n), record))
            .collect::<Result<Vec<_>, _>>()?;
        let count = u64::try_from(rows.len()).unwrap_or(u64::MAX);
        state.last_poi_id = rows.last().map_or(first_id, |poi| poi.id.get());
        state.pois.extend(rows);
        Ok(count)
    }
}

#[async_trait]
impl PoiSearchRepository for InMemoryPoiStore {
    async fn count(&self, criteria: &PoiSearchCriteria) -> Result<u64, PoiSearchRepositoryError> {
        let state = self.state();
        let total = state.matching(criteria).count();
        Ok(u64::try_from(total).unwrap_or(u64::MAX))
    }

    async fn fetch(
        &self,
        criteria: &PoiSearchCriteria,
        offset: u64,
        limit: u64,
    ) -> Result<Vec<PoiListing>, PoiSearchRepositoryError> {
        let state = self.state();
        let offset = usize::try_from(offset).unwrap_or(usize::MAX);
        let limit = usize::try_from(limit).unwrap_or(usize::MAX);
        Ok(state.matching(criteria).skip(offset).take(limit).collect())
    }

    async fn category_names(&self) -> Result<Vec<String>, PoiSearchRepositoryError> {
        let mut names: Vec<String> = self
            .state()
            .categories
            .iter()
            .map(|category| category.name().to_string())
            .collect();
        names.sort();
        Ok(names)
    }
}
