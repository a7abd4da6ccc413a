//! RSS feed producer (feed family).
//!
//! Parses RSS 2.0 channels into raw items. Malformed feeds yield an empty
//! item list rather than an error; only transport failures surface to the
//! caller.

use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use quick_xml::de::from_str;
use serde::Deserialize;

use crate::error::Result;
use crate::models::{FetchConfig, RawItem};
use crate::sources::SourceFetcher;

#[derive(Debug, Deserialize)]
struct Rss {
    channel: Channel,
}

#[derive(Debug, Deserialize)]
struct Channel {
    #[serde(rename = "item", default)]
    items: Vec<Item>,
}

#[derive(Debug, Deserialize)]
struct Item {
    title: Option<String>,
    link: Option<String>,
    guid: Option<Guid>,
    description: Option<String>,
    #[serde(rename = "pubDate")]
    pub_date: Option<String>,
}

/// `<guid>` may carry an `isPermaLink` attribute, so it cannot map
/// straight to a `String`.
#[derive(Debug, Deserialize)]
struct Guid {
    #[serde(rename = "$text")]
    value: Option<String>,
}

/// Instantiable feed producer holding a configured HTTP client.
pub struct FeedClient {
    client: reqwest::Client,
}

impl FeedClient {
    /// Create a feed client with the configured user agent and timeout.
    pub fn new(config: &FetchConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(&config.user_agent)
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self { client })
    }
}

#[async_trait]
impl SourceFetcher for FeedClient {
    async fn fetch(&self, url: &str) -> Result<Vec<RawItem>> {
        let body = self
            .client
            .get(url)
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;
        Ok(parse_feed(&body))
    }

    fn binding(&self) -> &'static str {
        "FeedClient instance"
    }
}

/// Free-standing fetch for the feed family, same contract as
/// [`FeedClient::fetch`] with a one-shot client.
pub async fn fetch_feed(url: &str) -> Result<Vec<RawItem>> {
    FeedClient::new(&FetchConfig::default())?.fetch(url).await
}

/// Parse an RSS document into raw items.
///
/// A document that does not parse as RSS produces an empty list; the feed
/// as a whole is never worth failing a source over.
pub fn parse_feed(xml: &str) -> Vec<RawItem> {
    let rss: Rss = match from_str(xml) {
        Ok(rss) => rss,
        Err(e) => {
            log::warn!("Malformed RSS document, skipping feed contents: {e}");
            return Vec::new();
        }
    };

    rss.channel
        .items
        .into_iter()
        .map(|item| {
            let url = item
                .link
                .filter(|link| !link.trim().is_empty())
                .or(item.guid.and_then(|g| g.value));
            RawItem {
                title: item.title.unwrap_or_default(),
                url,
                content_raw: item.description.unwrap_or_default(),
                published_at: item.pub_date.as_deref().and_then(parse_pub_date),
            }
        })
        .collect()
}

/// Parse an RFC 2822 `pubDate`, returning None on any failure.
fn parse_pub_date(ts: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc2822(ts.trim())
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}
