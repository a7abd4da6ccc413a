// src/pipeline/collect.rs

//! Collection run orchestration.
//!
//! One run walks both source families in configured order: feeds first,
//! then pages. Sources are processed sequentially; a failing source is
//! logged and skipped, never aborting the run. Only a store connection
//! failure is fatal.

use std::sync::Arc;
use std::time::Duration;

use log::{error, info};

use crate::error::Result;
use crate::models::{Config, SourceEntry};
use crate::pipeline::{normalize, upsert_all};
use crate::sources::{FamilyAdapter, ResolvedAdapters, resolve_adapters};
use crate::store::{self, UpdateStore};

/// Aggregate totals for one collection run.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct CollectReport {
    /// Updates written for the feed family
    pub feed_total: usize,
    /// Updates written for the page family
    pub page_total: usize,
    /// Sources whose processing failed and was skipped
    pub sources_failed: usize,
}

/// Run one full collection over both families.
pub async fn run_collect(config: &Config) -> Result<CollectReport> {
    info!("Legal updates collection starting");

    // The store handle is built once here and passed down; a connection
    // failure aborts before any source is touched.
    let store = store::connect(&config.store).await?;
    let adapters = resolve_adapters(&config.fetch);

    let report = collect_with(config, &adapters, store).await;
    info!(
        "Collection run finished: {} feed update(s), {} page update(s), {} source failure(s)",
        report.feed_total, report.page_total, report.sources_failed
    );
    Ok(report)
}

/// Drive both families against an already-connected store and resolved
/// adapters.
pub async fn collect_with(
    config: &Config,
    adapters: &ResolvedAdapters,
    store: Arc<dyn UpdateStore>,
) -> CollectReport {
    let mut report = CollectReport::default();

    let (total, failed) = collect_family(
        "feed",
        &adapters.feeds,
        &config.feeds,
        store.as_ref(),
        config.fetch.request_delay_ms,
    )
    .await;
    report.feed_total = total;
    report.sources_failed += failed;

    let (total, failed) = collect_family(
        "page",
        &adapters.pages,
        &config.pages,
        store.as_ref(),
        config.fetch.request_delay_ms,
    )
    .await;
    report.page_total = total;
    report.sources_failed += failed;

    report
}

/// Process every source of one family in configured order, isolating
/// failures per source. Returns (updates written, sources failed).
async fn collect_family(
    family: &str,
    adapter: &FamilyAdapter,
    sources: &[SourceEntry],
    store: &dyn UpdateStore,
    delay_ms: u64,
) -> (usize, usize) {
    if !adapter.is_available() {
        info!("Skipping {} collection: no adapter available", family);
        return (0, 0);
    }

    info!("Starting {} collection", family);
    let mut total = 0;
    let mut failed = 0;

    for source in sources {
        info!("Processing {} source: {}", family, source.name);
        match collect_source(adapter, source, store).await {
            Ok(0) => info!("  - No items returned from {}", source.name),
            Ok(written) => {
                info!("  - Collected {} update(s) from {}", written, source.name);
                total += written;
            }
            Err(e) => {
                failed += 1;
                error!("Error processing {} source {}: {}", family, source.name, e);
            }
        }

        if delay_ms > 0 {
            tokio::time::sleep(Duration::from_millis(delay_ms)).await;
        }
    }

    info!("{} collection done. Total inserted/updated: {}", family, total);
    (total, failed)
}

/// Fetch, normalize, and persist one source.
async fn collect_source(
    adapter: &FamilyAdapter,
    source: &SourceEntry,
    store: &dyn UpdateStore,
) -> Result<usize> {
    let items = adapter.fetch(&source.url).await?;
    if items.is_empty() {
        return Ok(0);
    }

    let records = items
        .into_iter()
        .map(|item| normalize(item, &source.category, &source.name))
        .collect();
    upsert_all(store, records).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::future::BoxFuture;

    use crate::error::AppError;
    use crate::models::RawItem;
    use crate::sources::FnFetcher;
    use crate::store::LocalStore;

    fn source(name: &str, url: &str) -> SourceEntry {
        SourceEntry {
            name: name.to_string(),
            url: url.to_string(),
            category: "General".to_string(),
        }
    }

    /// Feed stub: three items for source A, a transport error for B.
    fn feed_stub(url: String) -> BoxFuture<'static, crate::error::Result<Vec<RawItem>>> {
        Box::pin(async move {
            if url.contains("feed-b") {
                return Err(AppError::fetch("feed-b", "connection refused"));
            }
            Ok((1..=3)
                .map(|n| RawItem {
                    title: format!("update {n}"),
                    url: Some(format!("{url}/item/{n}")),
                    ..Default::default()
                })
                .collect())
        })
    }

    /// Page stub: two items, one of them without a URL.
    fn page_stub(url: String) -> BoxFuture<'static, crate::error::Result<Vec<RawItem>>> {
        Box::pin(async move {
            Ok(vec![
                RawItem {
                    title: "keyed".to_string(),
                    url: Some(format!("{url}/notice/1")),
                    ..Default::default()
                },
                RawItem {
                    title: "lost without a key".to_string(),
                    url: None,
                    ..Default::default()
                },
            ])
        })
    }

    fn adapters(feeds: FamilyAdapter, pages: FamilyAdapter) -> ResolvedAdapters {
        ResolvedAdapters { feeds, pages }
    }

    fn bound(stub: fn(String) -> BoxFuture<'static, crate::error::Result<Vec<RawItem>>>) -> FamilyAdapter {
        FamilyAdapter::Bound(Arc::new(FnFetcher::new("test stub", stub)))
    }

    async fn open_store(dir: &tempfile::TempDir) -> Arc<LocalStore> {
        Arc::new(
            LocalStore::open(dir.path().to_str().unwrap(), "raw_updates")
                .await
                .unwrap(),
        )
    }

    #[tokio::test]
    async fn test_failing_source_does_not_abort_the_run() {
        let dir = tempfile::tempdir().unwrap();
        let store = open_store(&dir).await;

        let mut config = Config::default();
        config.feeds = vec![
            source("Feed A", "https://example.org/feed-a"),
            source("Feed B", "https://example.org/feed-b"),
        ];

        let report = collect_with(
            &config,
            &adapters(bound(feed_stub), FamilyAdapter::Unavailable),
            store.clone(),
        )
        .await;

        assert_eq!(report.feed_total, 3);
        assert_eq!(report.sources_failed, 1);
        assert_eq!(store.count().await.unwrap(), 3);
    }

    #[tokio::test]
    async fn test_url_less_page_item_is_dropped() {
        let dir = tempfile::tempdir().unwrap();
        let store = open_store(&dir).await;

        let mut config = Config::default();
        config.pages = vec![source("Gazette", "https://gov.example")];

        let report = collect_with(
            &config,
            &adapters(FamilyAdapter::Unavailable, bound(page_stub)),
            store.clone(),
        )
        .await;

        assert_eq!(report.page_total, 1);
        assert_eq!(store.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_unavailable_family_is_skipped_cleanly() {
        let dir = tempfile::tempdir().unwrap();
        let store = open_store(&dir).await;

        let mut config = Config::default();
        config.feeds = vec![source("Feed A", "https://example.org/feed-a")];
        config.pages = vec![source("Gazette", "https://gov.example")];

        let report = collect_with(
            &config,
            &adapters(bound(feed_stub), FamilyAdapter::Unavailable),
            store.clone(),
        )
        .await;

        assert_eq!(report.feed_total, 3);
        assert_eq!(report.page_total, 0);
        assert_eq!(report.sources_failed, 0);
    }

    #[tokio::test]
    async fn test_rerun_is_idempotent_except_fetched_at() {
        let dir = tempfile::tempdir().unwrap();
        let store = open_store(&dir).await;

        let mut config = Config::default();
        config.feeds = vec![source("Feed A", "https://example.org/feed-a")];
        let adapters = adapters(bound(feed_stub), FamilyAdapter::Unavailable);

        let first = collect_with(&config, &adapters, store.clone()).await;
        let before = store
            .find_by_url("https://example.org/feed-a/item/1")
            .await
            .unwrap()
            .unwrap();

        let second = collect_with(&config, &adapters, store.clone()).await;
        let after = store
            .find_by_url("https://example.org/feed-a/item/1")
            .await
            .unwrap()
            .unwrap();

        assert_eq!(first.feed_total, second.feed_total);
        assert_eq!(store.count().await.unwrap(), 3);
        assert_eq!(after.title, before.title);
        assert_eq!(after.source, before.source);
        assert!(after.fetched_at >= before.fetched_at);
    }

    #[tokio::test]
    async fn test_records_carry_configured_source_and_category() {
        let dir = tempfile::tempdir().unwrap();
        let store = open_store(&dir).await;

        let mut config = Config::default();
        config.feeds = vec![SourceEntry {
            name: "PRS India".to_string(),
            url: "https://example.org/feed-a".to_string(),
            category: "Policy".to_string(),
        }];

        collect_with(
            &config,
            &adapters(bound(feed_stub), FamilyAdapter::Unavailable),
            store.clone(),
        )
        .await;

        let stored = store
            .find_by_url("https://example.org/feed-a/item/2")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(stored.source, "PRS India");
        assert_eq!(stored.category, "Policy");
    }
}
