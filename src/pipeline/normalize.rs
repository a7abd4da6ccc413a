// src/pipeline/normalize.rs

//! Raw item normalization.

use chrono::Utc;

use crate::models::{CanonicalRecord, IngestStatus, RawItem};

/// Turn a producer item into its canonical, store-ready form.
///
/// Pure and infallible: present fields are copied, missing ones degrade to
/// defaults. `category` and `source` always come from configuration, never
/// from the item itself, so a page cannot spoof its way into another
/// source's records. `fetched_at` is stamped here, so items normalized
/// moments apart within a run may carry distinct timestamps.
pub fn normalize(item: RawItem, default_category: &str, source_name: &str) -> CanonicalRecord {
    CanonicalRecord {
        title: item.title,
        url: item.url.filter(|u| !u.trim().is_empty()),
        content_raw: item.content_raw,
        published_at: item.published_at,
        category: default_category.to_string(),
        source: source_name.to_string(),
        fetched_at: Utc::now(),
        ingest_status: IngestStatus::Raw,
    }
}
