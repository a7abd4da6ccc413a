//! Source producer layer.
//!
//! Two source families exist: feed-based (RSS) and page-based (HTML
//! scraping). Each producer exposes the uniform [`SourceFetcher`]
//! operation; the [`adapter`] module resolves which concrete binding
//! serves a family for the duration of a run.

pub mod adapter;
pub mod feed;
pub mod page;

use async_trait::async_trait;

use crate::error::Result;
use crate::models::RawItem;

// Re-export the resolved adapter surface
pub use adapter::{FamilyAdapter, FnFetcher, ResolvedAdapters, SideEffectFetcher, resolve_adapters};
pub use feed::FeedClient;
pub use page::PageScraper;

/// Uniform "fetch items from this URL" operation bound to a producer.
///
/// Producers must be tolerant of malformed input: a parse failure yields
/// an empty item list, not an error. Transport failures do error, and are
/// isolated per source by the orchestrator.
#[async_trait]
pub trait SourceFetcher: Send + Sync {
    /// Fetch raw items from the given source URL.
    async fn fetch(&self, url: &str) -> Result<Vec<RawItem>>;

    /// Short description of the binding, used in the resolution log line.
    fn binding(&self) -> &'static str;
}
