//! HTTP entry-point: serves the read-only POI search API and health probes.

use std::ffi::OsString;
use std::io;
use std::sync::Arc;

use actix_web::{App, HttpServer, web};
use ortho_config::OrthoConfig;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use poi_backend::domain::PoiSearchService;
use poi_backend::inbound::http::health::{live, ready};
use poi_backend::inbound::http::{HealthState, HttpState, configure_api};
use poi_backend::outbound::persistence::{DbPool, DieselPoiSearchRepository};
use poi_backend::settings::PoiSettings;

#[actix_web::main]
async fn main() -> io::Result<()> {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let settings = PoiSettings::load_from_iter([OsString::from("poi-backend")])
        .map_err(|error| io::Error::other(format!("load settings: {error}")))?;
    let bind_addr = settings.bind_addr().map_err(io::Error::other)?;
    let pool_config = settings.pool_config().map_err(io::Error::other)?;
    let pool = DbPool::new(pool_config)
        .await
        .map_err(|error| io::Error::other(format!("create database pool: {error}")))?;

    let search = PoiSearchService::new(Arc::new(DieselPoiSearchRepository::new(pool)));
    let http_state = web::Data::new(HttpState::new(Arc::new(search)));
    let health_state = web::Data::new(HealthState::new());
    let server_health_state = health_state.clone();

    let server = HttpServer::new(move || {
        App::new()
            .app_data(http_state.clone())
            .app_data(server_health_state.clone())
            .configure(configure_api)
            .service(ready)
            .service(live)
    })
    .bind(bind_addr)?;

    health_state.mark_ready();
    info!(%bind_addr, "poi backend listening");
    server.run().await
}
