//! POI catalogue backend: multi-format importer and read-only search API.
//!
//! Layout follows ports and adapters:
//! - [`domain`]: entities, services and port traits.
//! - [`inbound`]: the Actix HTTP adapter.
//! - [`outbound`]: file parsing, PostgreSQL and in-memory stores.
//! - [`settings`]: OrthoConfig-backed runtime settings.

pub mod domain;
pub mod inbound;
pub mod outbound;
pub mod settings;
