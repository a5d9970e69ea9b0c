//! Outbound adapters implementing domain ports.
//!
//! - **persistence**: PostgreSQL repositories using Diesel.
//! - **memory**: a process-local store implementing the same ports.
//! - **poi_source**: reads and structurally parses import files.
//!
//! Adapters convert between domain types and infrastructure representations.
//! They contain no business logic.

pub mod memory;
pub mod persistence;
pub mod poi_source;
