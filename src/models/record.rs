//! Raw and canonical update record structures.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// An item as produced by a source family, before normalization.
///
/// Producers may leave any field empty; the URL is the only natural key
/// and items without one are dropped before persistence.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct RawItem {
    /// Item title (may be empty)
    #[serde(default)]
    pub title: String,

    /// Link to the update, the sole natural key
    #[serde(default)]
    pub url: Option<String>,

    /// Unprocessed body or summary text (may be empty)
    #[serde(default)]
    pub content_raw: String,

    /// Publication timestamp, when the producer could extract one
    #[serde(default)]
    pub published_at: Option<DateTime<Utc>>,
}

/// Processing state of a stored update.
///
/// Every record enters the store as `Raw`; downstream enrichment moves it
/// forward. The collector itself only ever writes `Raw`.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum IngestStatus {
    /// Freshly collected, no enrichment or classification has run
    #[default]
    Raw,
    /// Enriched by a downstream stage
    Enriched,
}

/// The normalized, store-ready representation of an ingested item.
///
/// Created transiently per collection run and never mutated once built;
/// its persisted counterpart is overwritten in place across runs that
/// share the same URL.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CanonicalRecord {
    /// Update title
    pub title: String,

    /// Deduplication and upsert key; must be present to persist
    pub url: Option<String>,

    /// Unprocessed body or summary text
    pub content_raw: String,

    /// Publication timestamp, if known
    pub published_at: Option<DateTime<Utc>>,

    /// Category, always the configured per-source default
    pub category: String,

    /// Configured display name of the originating source, never scraped data
    pub source: String,

    /// When this record was normalized during the collection run
    pub fetched_at: DateTime<Utc>,

    /// Processing state marker for downstream consumers
    #[serde(default)]
    pub ingest_status: IngestStatus,
}
