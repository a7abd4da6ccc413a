//! Source adapter resolution.
//!
//! Producer modules evolve independently and may expose different shapes:
//! an instantiable client object, a free-standing fetch function, or a
//! routine that ingests as a side effect and returns nothing. Each family
//! carries an ordered list of candidate constructors; resolution walks the
//! list once at startup and the first constructor that succeeds becomes
//! the family's adapter for the rest of the run. When none succeeds the
//! family is skipped cleanly.

use std::sync::Arc;

use async_trait::async_trait;
use futures::future::BoxFuture;
use log::{debug, info};

use crate::error::Result;
use crate::models::{FetchConfig, RawItem};
use crate::sources::{FeedClient, PageScraper, SourceFetcher, feed, page};

/// A free-standing fetch function bound as an adapter.
pub type FetchFn = fn(String) -> BoxFuture<'static, Result<Vec<RawItem>>>;

/// A routine that performs its own ingestion and yields no items.
pub type SideEffectFn = fn(String) -> BoxFuture<'static, Result<()>>;

/// Constructor for one candidate binding; may fail, in which case the next
/// candidate is tried.
pub type Candidate = fn(&FetchConfig) -> Result<Box<dyn SourceFetcher>>;

/// Adapter wrapping a free-standing fetch function.
pub struct FnFetcher {
    binding: &'static str,
    fetch: FetchFn,
}

impl FnFetcher {
    pub fn new(binding: &'static str, fetch: FetchFn) -> Self {
        Self { binding, fetch }
    }
}

#[async_trait]
impl SourceFetcher for FnFetcher {
    async fn fetch(&self, url: &str) -> Result<Vec<RawItem>> {
        (self.fetch)(url.to_string()).await
    }

    fn binding(&self) -> &'static str {
        self.binding
    }
}

/// Adapter wrapping a side-effecting ingestion routine.
///
/// Invoking it triggers the routine, then yields an empty item list: the
/// items never pass through normalization or the upsert engine, so zero
/// collected is the accurate count to report for this binding.
pub struct SideEffectFetcher {
    binding: &'static str,
    run: SideEffectFn,
}

impl SideEffectFetcher {
    pub fn new(binding: &'static str, run: SideEffectFn) -> Self {
        Self { binding, run }
    }
}

#[async_trait]
impl SourceFetcher for SideEffectFetcher {
    async fn fetch(&self, url: &str) -> Result<Vec<RawItem>> {
        (self.run)(url.to_string()).await?;
        Ok(Vec::new())
    }

    fn binding(&self) -> &'static str {
        self.binding
    }
}

/// The resolved uniform fetch operation for one source family.
pub enum FamilyAdapter {
    /// A candidate bound successfully
    Bound(Arc<dyn SourceFetcher>),
    /// No candidate resolved; the family is skipped for the run
    Unavailable,
}

impl FamilyAdapter {
    pub fn is_available(&self) -> bool {
        matches!(self, FamilyAdapter::Bound(_))
    }

    /// Fetch through the bound producer. An unavailable adapter yields no
    /// items; callers are expected to skip the family before reaching here.
    pub async fn fetch(&self, url: &str) -> Result<Vec<RawItem>> {
        match self {
            FamilyAdapter::Bound(fetcher) => fetcher.fetch(url).await,
            FamilyAdapter::Unavailable => Ok(Vec::new()),
        }
    }
}

/// Adapters for both families, resolved once per run.
pub struct ResolvedAdapters {
    pub feeds: FamilyAdapter,
    pub pages: FamilyAdapter,
}

/// Resolve both families against their built-in candidate lists.
pub fn resolve_adapters(config: &FetchConfig) -> ResolvedAdapters {
    ResolvedAdapters {
        feeds: resolve_family("feed", &feed_candidates(), config),
        pages: resolve_family("page", &page_candidates(), config),
    }
}

/// Walk a candidate list in priority order; first success wins.
pub fn resolve_family(
    family: &str,
    candidates: &[Candidate],
    config: &FetchConfig,
) -> FamilyAdapter {
    for candidate in candidates {
        match candidate(config) {
            Ok(fetcher) => {
                info!("{} family bound via {}", family, fetcher.binding());
                return FamilyAdapter::Bound(Arc::from(fetcher));
            }
            Err(e) => debug!("{} family candidate did not bind: {}", family, e),
        }
    }
    info!("No adapter available for the {} family; it will be skipped", family);
    FamilyAdapter::Unavailable
}

/// Candidate bindings for the feed family, in priority order.
fn feed_candidates() -> [Candidate; 2] {
    [
        |config| Ok(Box::new(FeedClient::new(config)?)),
        |_| {
            Ok(Box::new(FnFetcher::new("fetch_feed function", |url| {
                Box::pin(async move { feed::fetch_feed(&url).await })
            })))
        },
    ]
}

/// Candidate bindings for the page family, in priority order.
fn page_candidates() -> [Candidate; 2] {
    [
        |config| Ok(Box::new(PageScraper::new(config)?)),
        |_| {
            Ok(Box::new(FnFetcher::new("fetch_page function", |url| {
                Box::pin(async move { page::fetch_page(&url).await })
            })))
        },
    ]
}
