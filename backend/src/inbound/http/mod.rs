//! HTTP inbound adapter exposing the read-only POI API.

pub mod error;
pub mod health;
pub mod pois;
pub mod state;

use actix_web::web;

pub use self::health::HealthState;
pub use self::state::HttpState;

/// Register the versioned API routes under `/api/v1`.
pub fn configure_api(cfg: &mut web::ServiceConfig) {
    cfg.service(web::scope("/api/v1").service(pois::search_pois));
}
