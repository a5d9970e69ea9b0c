//! POI file import orchestration.
//!
//! One import reads a single file, dispatching on its extension:
//!
//! - XML and JSON elements are extracted and upserted one at a time, keyed by
//!   external id, so re-importing a file is idempotent;
//! - CSV rows are all extracted first and then written with one bulk insert,
//!   without an existence check.
//!
//! Processing is fail-fast. No transaction spans the file: writes made before
//! a failing record stay committed and the error reports how many there were.

mod category_resolver;
mod extract;

use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, info, warn};

use self::category_resolver::{CategoryResolver, ResolveError};
use self::extract::{ExtractError, extract};
use crate::domain::ports::{
    CategoryRepository, ImportError, ImportOutcome, ImportStatus, PoiImportCommand,
    PoiRepository, PoiRepositoryError, PoiSource, PoiSourceError, RawPoi, UpsertOutcome,
    WriteScope,
};
use crate::domain::{ImportFormat, PoiRecord};

/// Domain service implementing [`PoiImportCommand`].
#[derive(Clone)]
pub struct PoiImportService<S, C, P> {
    source: Arc<S>,
    categories: Arc<C>,
    pois: Arc<P>,
}

impl<S, C, P> PoiImportService<S, C, P> {
    /// Create a new import service.
    pub fn new(source: Arc<S>, categories: Arc<C>, pois: Arc<P>) -> Self {
        Self {
            source,
            categories,
            pois,
        }
    }
}

#[derive(Debug, Default, Clone, Copy)]
struct WriteTally {
    created: u64,
    updated: u64,
}

impl WriteTally {
    fn written(self) -> u64 {
        self.created + self.updated
    }
}

#[async_trait]
impl<S, C, P> PoiImportCommand for PoiImportService<S, C, P>
where
    S: PoiSource,
    C: CategoryRepository,
    P: PoiRepository,
{
    async fn import(&self, path: &Path) -> Result<ImportOutcome, ImportError> {
        let Some(format) = ImportFormat::detect(path) else {
            warn!(path = %path.display(), "unsupported file extension; nothing imported");
            return Ok(ImportOutcome::unsupported(path));
        };

        let elements = self
            .source
            .load(path, format)
            .await
            .map_err(|err| map_source_error(path, format, err))?;
        let records_read = count(elements.len());
        debug!(path = %path.display(), %format, records_read, "import file parsed");

        let mut resolver = CategoryResolver::new(self.categories.as_ref());
        let tally = if format.is_bulk() {
            self.write_batch(&elements, &mut resolver).await?
        } else {
            self.write_each(&elements, &mut resolver).await?
        };

        let outcome = ImportOutcome {
            status: ImportStatus::Imported,
            path: path.to_path_buf(),
            format: Some(format),
            records_read,
            records_written: tally.written(),
            created: tally.created,
            updated: tally.updated,
            categories_created: resolver.created(),
        };
        info!(
            path = %path.display(),
            %format,
            records_read,
            records_written = outcome.records_written,
            created = outcome.created,
            updated = outcome.updated,
            categories_created = outcome.categories_created,
            "poi import finished"
        );
        Ok(outcome)
    }
}

impl<S, C, P> PoiImportService<S, C, P>
where
    C: CategoryRepository,
    P: PoiRepository,
{
    async fn write_each(
        &self,
        elements: &[RawPoi],
        resolver: &mut CategoryResolver<'_, C>,
    ) -> Result<WriteTally, ImportError> {
        let mut tally = WriteTally::default();
        for (index, element) in elements.iter().enumerate() {
            let position = count(index) + 1;
            let record = to_record(element, resolver, position, tally.written()).await?;
            let outcome = self.pois.upsert(&record).await.map_err(|err| {
                persistence_error(WriteScope::Record(position), tally.written(), &err)
            })?;
            match outcome {
                UpsertOutcome::Created => tally.created += 1,
                UpsertOutcome::Updated => tally.updated += 1,
            }
            debug!(
                record = position,
                external_id = %record.external_id(),
                ?outcome,
                "poi upserted"
            );
        }
        Ok(tally)
    }

    async fn write_batch(
        &self,
        elements: &[RawPoi],
        resolver: &mut CategoryResolver<'_, C>,
    ) -> Result<WriteTally, ImportError> {
        let mut records = Vec::with_capacity(elements.len());
        for (index, element) in elements.iter().enumerate() {
            records.push(to_record(element, resolver, count(index) + 1, 0).await?);
        }
        if records.is_empty() {
            return Ok(WriteTally::default());
        }

        let size = count(records.len());
        let inserted = self
            .pois
            .bulk_insert(&records)
            .await
            .map_err(|err| persistence_error(WriteScope::Batch { size }, 0, &err))?;
        debug!(inserted, "poi batch inserted");
        Ok(WriteTally {
            created: inserted,
            updated: 0,
        })
    }
}

async fn to_record<C>(
    element: &RawPoi,
    resolver: &mut CategoryResolver<'_, C>,
    position: u64,
    records_written: u64,
) -> Result<PoiRecord, ImportError>
where
    C: CategoryRepository + ?Sized,
{
    let extracted = extract(element, resolver)
        .await
        .map_err(|err| map_extract_error(err, position, records_written))?;
    PoiRecord::try_from(extracted).map_err(|err| ImportError::Persistence {
        scope: WriteScope::Record(position),
        message: err.to_string(),
        records_written,
    })
}

fn map_extract_error(error: ExtractError, record: u64, records_written: u64) -> ImportError {
    match error {
        ExtractError::MissingCategory | ExtractError::Rating(_) => ImportError::FieldExtraction {
            record,
            message: error.to_string(),
            records_written,
        },
        ExtractError::Category(ResolveError::Invalid { .. } | ResolveError::Store(_)) => {
            ImportError::Persistence {
                scope: WriteScope::Record(record),
                message: error.to_string(),
                records_written,
            }
        }
    }
}

fn map_source_error(path: &Path, format: ImportFormat, error: PoiSourceError) -> ImportError {
    match error {
        PoiSourceError::Read { message } => ImportError::Read {
            path: path.to_path_buf(),
            message,
        },
        PoiSourceError::Decode { message } => ImportError::StructuralParse { format, message },
    }
}

fn persistence_error(
    scope: WriteScope,
    records_written: u64,
    error: &PoiRepositoryError,
) -> ImportError {
    ImportError::Persistence {
        scope,
        message: error.to_string(),
        records_written,
    }
}

fn count(len: usize) -> u64 {
    u64::try_from(len).unwrap_or(u64::MAX)
}

#[cfg(test)]
mod tests;
