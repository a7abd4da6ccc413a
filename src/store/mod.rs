//! Document store abstraction for collected updates.
//!
//! The collector only depends on the [`UpdateStore`] trait: a named
//! collection with a uniqueness guarantee on `url`, supporting an unordered
//! bulk upsert-by-url with separate inserted/modified counts and a
//! per-document upsert fallback. [`LocalStore`] is the file-backed
//! implementation.

pub mod local;

use std::sync::Arc;

use async_trait::async_trait;

use crate::error::Result;
use crate::models::{CanonicalRecord, StoreConfig};

// Re-export for convenience
pub use local::LocalStore;

/// A single upsert-by-url operation: match on `url`, replace all fields,
/// create the document if absent.
#[derive(Debug, Clone)]
pub struct UpsertOp {
    /// Upsert key
    pub url: String,
    /// Full replacement document
    pub record: CanonicalRecord,
}

/// Outcome of an unordered bulk upsert.
///
/// Documents that matched with identical content are counted in neither
/// field.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BulkOutcome {
    /// Documents created
    pub inserted: usize,
    /// Existing documents replaced with different content
    pub modified: usize,
}

impl BulkOutcome {
    /// Total documents written.
    pub fn total(&self) -> usize {
        self.inserted + self.modified
    }
}

/// Trait for update store backends.
#[async_trait]
pub trait UpdateStore: Send + Sync {
    /// Apply a batch of upsert operations as one unordered bulk write.
    async fn bulk_upsert(&self, ops: &[UpsertOp]) -> Result<BulkOutcome>;

    /// Apply a single upsert operation.
    async fn upsert_one(&self, op: &UpsertOp) -> Result<()>;

    /// Total number of stored documents.
    async fn count(&self) -> Result<usize>;

    /// Look up a document by its URL key.
    async fn find_by_url(&self, url: &str) -> Result<Option<CanonicalRecord>>;

    /// Document counts grouped by source, highest first.
    async fn counts_by_source(&self) -> Result<Vec<(String, usize)>>;

    /// Number of documents whose content is shorter than `max_chars`.
    async fn short_content_count(&self, max_chars: usize) -> Result<usize>;

    /// Most recently fetched documents, newest first.
    async fn recent(&self, limit: usize) -> Result<Vec<CanonicalRecord>>;
}

/// Open the configured document store.
///
/// Single construction point for the run; the handle is shared from here
/// and a failure is fatal for the whole run.
pub async fn connect(config: &StoreConfig) -> Result<Arc<dyn UpdateStore>> {
    let store = LocalStore::open(&config.root_dir, &config.collection).await?;
    log::info!(
        "Connected to store: {}/{}.json",
        config.root_dir,
        config.collection
    );
    Ok(Arc::new(store))
}
