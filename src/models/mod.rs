// src/models/mod.rs

//! Domain models for the collector application.

mod config;
mod record;

// Re-export all public types
pub use config::{Config, FetchConfig, SourceEntry, StoreConfig};
pub use record::{CanonicalRecord, IngestStatus, RawItem};
