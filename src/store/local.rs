//! Local filesystem store implementation.
//!
//! Keeps one collection as a url-keyed JSON document map at
//! `{root}/{collection}.json`. Keying the map by `url` gives the uniqueness
//! guarantee the collector relies on without a separate index. Writes go
//! through a temp file and rename so a crashed run never leaves a
//! half-written collection behind.

use std::collections::BTreeMap;
use std::path::PathBuf;

use async_trait::async_trait;
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;

use crate::error::{AppError, Result};
use crate::models::CanonicalRecord;
use crate::store::{BulkOutcome, UpdateStore, UpsertOp};

/// File-backed update store.
///
/// The in-memory map mirrors the collection file; a mutex serializes
/// writers so the handle can be shared across tasks.
pub struct LocalStore {
    path: PathBuf,
    documents: Mutex<BTreeMap<String, CanonicalRecord>>,
}

impl LocalStore {
    /// Open (or create) the collection under the given root directory.
    pub async fn open(root_dir: &str, collection: &str) -> Result<Self> {
        let root = PathBuf::from(root_dir);
        tokio::fs::create_dir_all(&root)
            .await
            .map_err(|e| AppError::store("open", e))?;

        let path = root.join(format!("{collection}.json"));
        let documents = match tokio::fs::read(&path).await {
            Ok(bytes) => serde_json::from_slice(&bytes)
                .map_err(|e| AppError::store("open", format!("corrupt collection file: {e}")))?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => BTreeMap::new(),
            Err(e) => return Err(AppError::store("open", e)),
        };

        Ok(Self {
            path,
            documents: Mutex::new(documents),
        })
    }

    /// Write the whole collection atomically (write to temp, then rename).
    async fn persist(&self, documents: &BTreeMap<String, CanonicalRecord>) -> Result<()> {
        let bytes = serde_json::to_vec_pretty(documents)?;
        let tmp = self.path.with_extension("tmp");

        let mut file = tokio::fs::File::create(&tmp)
            .await
            .map_err(|e| AppError::store("persist", e))?;
        file.write_all(&bytes)
            .await
            .map_err(|e| AppError::store("persist", e))?;
        file.flush().await.map_err(|e| AppError::store("persist", e))?;
        drop(file);

        tokio::fs::rename(&tmp, &self.path)
            .await
            .map_err(|e| AppError::store("persist", e))
    }

    /// Apply one op to the map, reporting whether it inserted or modified.
    fn apply(
        documents: &mut BTreeMap<String, CanonicalRecord>,
        op: &UpsertOp,
        outcome: &mut BulkOutcome,
    ) {
        match documents.get(&op.url) {
            None => {
                documents.insert(op.url.clone(), op.record.clone());
                outcome.inserted += 1;
            }
            Some(existing) if *existing != op.record => {
                documents.insert(op.url.clone(), op.record.clone());
                outcome.modified += 1;
            }
            // Matched with identical content: counted as neither.
            Some(_) => {}
        }
    }
}

#[async_trait]
impl UpdateStore for LocalStore {
    async fn bulk_upsert(&self, ops: &[UpsertOp]) -> Result<BulkOutcome> {
        let mut documents = self.documents.lock().await;
        let mut outcome = BulkOutcome::default();
        for op in ops {
            Self::apply(&mut documents, op, &mut outcome);
        }
        self.persist(&documents).await?;
        Ok(outcome)
    }

    async fn upsert_one(&self, op: &UpsertOp) -> Result<()> {
        let mut documents = self.documents.lock().await;
        let mut outcome = BulkOutcome::default();
        Self::apply(&mut documents, op, &mut outcome);
        self.persist(&documents).await
    }

    async fn count(&self) -> Result<usize> {
        Ok(self.documents.lock().await.len())
    }

    async fn find_by_url(&self, url: &str) -> Result<Option<CanonicalRecord>> {
        Ok(self.documents.lock().await.get(url).cloned())
    }

    async fn counts_by_source(&self) -> Result<Vec<(String, usize)>> {
        let documents = self.documents.lock().await;
        let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
        for record in documents.values() {
            *counts.entry(record.source.as_str()).or_default() += 1;
        }
        let mut out: Vec<(String, usize)> = counts
            .into_iter()
            .map(|(source, count)| (source.to_string(), count))
            .collect();
        out.sort_by(|a, b| b.1.cmp(&a.1));
        Ok(out)
    }

    async fn short_content_count(&self, max_chars: usize) -> Result<usize> {
        let documents = self.documents.lock().await;
        Ok(documents
            .values()
            .filter(|record| record.content_raw.chars().count() < max_chars)
            .count())
    }

    async fn recent(&self, limit: usize) -> Result<Vec<CanonicalRecord>> {
        let documents = self.documents.lock().await;
        let mut records: Vec<CanonicalRecord> = documents.values().cloned().collect();
        records.sort_by(|a, b| b.fetched_at.cmp(&a.fetched_at));
        records.truncate(limit);
        Ok(records)
    }
}
