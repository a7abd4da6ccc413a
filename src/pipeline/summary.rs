// src/pipeline/summary.rs

//! Aggregate store report.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::error::Result;
use crate::store::UpdateStore;

/// Content shorter than this counts as "short" in the report, a cheap
/// signal that a source is yielding link text instead of real bodies.
const SHORT_CONTENT_CHARS: usize = 50;

/// Size of the recent-documents sample.
const RECENT_SAMPLE: usize = 10;

/// Snapshot of the store for operators.
#[derive(Debug, Serialize)]
pub struct StoreSummary {
    pub timestamp: DateTime<Utc>,
    pub total_updates: usize,
    pub by_source: Vec<SourceCount>,
    pub short_content_count: usize,
    pub recent: Vec<RecentEntry>,
}

/// Document count for one source.
#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct SourceCount {
    pub source: String,
    pub count: usize,
}

/// One row of the recent-documents sample.
#[derive(Debug, Serialize)]
pub struct RecentEntry {
    pub source: String,
    pub title: String,
    pub url: Option<String>,
    pub content_len: usize,
}

/// Build the summary from the store's aggregate operations.
pub async fn build_summary(store: &dyn UpdateStore) -> Result<StoreSummary> {
    let total_updates = store.count().await?;
    let by_source = store
        .counts_by_source()
        .await?
        .into_iter()
        .map(|(source, count)| SourceCount { source, count })
        .collect();
    let short_content_count = store.short_content_count(SHORT_CONTENT_CHARS).await?;
    let recent = store
        .recent(RECENT_SAMPLE)
        .await?
        .into_iter()
        .map(|record| RecentEntry {
            source: record.source,
            title: record.title,
            url: record.url,
            content_len: record.content_raw.chars().count(),
        })
        .collect();

    Ok(StoreSummary {
        timestamp: Utc::now(),
        total_updates,
        by_source,
        short_content_count,
        recent,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    use crate::models::{CanonicalRecord, IngestStatus};
    use crate::store::{LocalStore, UpsertOp};

    fn op(source: &str, url: &str, content: &str) -> UpsertOp {
        UpsertOp {
            url: url.to_string(),
            record: CanonicalRecord {
                title: format!("update at {url}"),
                url: Some(url.to_string()),
                content_raw: content.to_string(),
                published_at: None,
                category: "General".to_string(),
                source: source.to_string(),
                fetched_at: Utc::now(),
                ingest_status: IngestStatus::Raw,
            },
        }
    }

    #[tokio::test]
    async fn test_summary_aggregates_store_state() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalStore::open(dir.path().to_str().unwrap(), "raw_updates")
            .await
            .unwrap();

        let long_body = "a detailed notification body that is comfortably over the threshold";
        store
            .bulk_upsert(&[
                op("PRS India", "https://a/1", long_body),
                op("PRS India", "https://a/2", "short"),
                op("e-Gazette", "https://b/1", "also short"),
            ])
            .await
            .unwrap();

        let summary = build_summary(&store).await.unwrap();
        assert_eq!(summary.total_updates, 3);
        assert_eq!(summary.short_content_count, 2);
        assert_eq!(
            summary.by_source[0],
            SourceCount {
                source: "PRS India".to_string(),
                count: 2
            }
        );
        assert_eq!(summary.recent.len(), 3);
    }
}
