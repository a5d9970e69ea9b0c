//! Import one XML, JSON or CSV file of POIs into the catalogue store.
#![cfg_attr(not(any(test, doctest)), deny(clippy::unwrap_used))]
#![cfg_attr(not(any(test, doctest)), deny(clippy::expect_used))]

use std::ffi::OsString;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use clap::Parser;
use ortho_config::OrthoConfig;
use tokio::runtime::Builder;
use tracing::{error, warn};
use tracing_subscriber::{EnvFilter, fmt};

use poi_backend::domain::PoiImportService;
use poi_backend::domain::ports::{
    CategoryRepository, ImportOutcome, ImportStatus, PoiImportCommand, PoiRepository,
};
use poi_backend::outbound::memory::InMemoryPoiStore;
use poi_backend::outbound::persistence::{
    DbPool, DieselCategoryRepository, DieselPoiRepository, PoolConfig,
};
use poi_backend::outbound::poi_source::FilePoiSource;
use poi_backend::settings::{PoiSettings, resolve_database_url};

/// `import-pois` command arguments.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "import-pois",
    about = "Import POIs from an .xml, .json or .csv file",
    version
)]
struct CliArgs {
    /// File to import; the extension selects the parser.
    #[arg(value_name = "path")]
    path: PathBuf,
    /// Database connection URL. Falls back to `POI_DATABASE_URL`, then
    /// `DATABASE_URL`.
    #[arg(long = "database-url", value_name = "url")]
    database_url: Option<String>,
    /// Import into a throwaway in-memory store instead of PostgreSQL.
    #[arg(long = "dry-run")]
    dry_run: bool,
}

fn main() -> io::Result<()> {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let runtime = Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|error| io::Error::other(format!("create Tokio runtime: {error}")))?;
    runtime.block_on(async_main())
}

async fn async_main() -> io::Result<()> {
    let args = CliArgs::try_parse().map_err(io::Error::other)?;

    let outcome = if args.dry_run {
        let store = Arc::new(InMemoryPoiStore::new());
        run(store.clone(), store, &args.path).await?
    } else {
        let database_url = database_url(args.database_url)?;
        let pool = DbPool::new(PoolConfig::single_connection(database_url))
            .await
            .map_err(|error| io::Error::other(format!("create database pool: {error}")))?;
        run(
            Arc::new(DieselCategoryRepository::new(pool.clone())),
            Arc::new(DieselPoiRepository::new(pool)),
            &args.path,
        )
        .await?
    };

    for line in outcome_lines(&outcome, args.dry_run) {
        println!("{line}");
    }
    Ok(())
}

async fn run<C, P>(categories: Arc<C>, pois: Arc<P>, path: &Path) -> io::Result<ImportOutcome>
where
    C: CategoryRepository,
    P: PoiRepository,
{
    let command = PoiImportService::new(Arc::new(FilePoiSource), categories, pois);
    command.import(path).await.map_err(|err| {
        error!(
            kind = err.kind(),
            records_written = err.records_written(),
            error = %err,
            "poi import failed"
        );
        io::Error::other(format!("import failed: {err}"))
    })
}

fn database_url(explicit: Option<String>) -> io::Result<String> {
    if explicit.is_some() {
        return resolve_database_url(explicit, None).map_err(io::Error::other);
    }
    PoiSettings::load_from_iter([OsString::from("import-pois")])
        .map_err(|error| io::Error::other(format!("load settings: {error}")))?
        .database_url()
        .map_err(io::Error::other)
}

fn outcome_lines(outcome: &ImportOutcome, dry_run: bool) -> Vec<String> {
    let status = match outcome.status {
        ImportStatus::Imported => "imported",
        ImportStatus::Unsupported => "unsupported",
    };
    let format = outcome.format.map_or("none", |format| format.as_str());
    vec![
        format!("status={status}"),
        format!("path={}", outcome.path.display()),
        format!("format={format}"),
        format!("dry_run={dry_run}"),
        format!("records_read={}", outcome.records_read),
        format!("records_written={}", outcome.records_written),
        format!("created={}", outcome.created),
        format!("updated={}", outcome.updated),
        format!("categories_created={}", outcome.categories_created),
    ]
}
