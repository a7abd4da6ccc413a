//! Pipeline entry points for collector operations.
//!
//! - `run_collect`: one full ingestion run over both source families
//! - `normalize`: raw producer item to canonical record
//! - `upsert_all`: resilient bulk persistence with per-record fallback
//! - `build_summary`: aggregate report over the store

pub mod collect;
pub mod normalize;
pub mod summary;
pub mod upsert;

pub use collect::{CollectReport, run_collect};
pub use normalize::normalize;
pub use summary::{StoreSummary, build_summary};
pub use upsert::upsert_all;
