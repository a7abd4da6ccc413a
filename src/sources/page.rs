//! HTML page producer (page family).
//!
//! Heuristic extraction: every hyperlink on the page becomes a candidate
//! update, deduplicated by URL within the fetch. Relative hrefs are
//! resolved against the page URL; anchor and javascript links are skipped.

use std::collections::HashSet;
use std::time::Duration;

use async_trait::async_trait;
use scraper::{Html, Selector};
use url::Url;

use crate::error::Result;
use crate::models::{FetchConfig, RawItem};
use crate::sources::SourceFetcher;

/// Instantiable page producer holding a configured HTTP client.
pub struct PageScraper {
    client: reqwest::Client,
}

impl PageScraper {
    /// Create a page scraper with the configured user agent and timeout.
    pub fn new(config: &FetchConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(&config.user_agent)
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self { client })
    }
}

#[async_trait]
impl SourceFetcher for PageScraper {
    async fn fetch(&self, url: &str) -> Result<Vec<RawItem>> {
        let body = self
            .client
            .get(url)
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;
        Ok(extract_items(url, &body))
    }

    fn binding(&self) -> &'static str {
        "PageScraper instance"
    }
}

/// Free-standing fetch for the page family, same contract as
/// [`PageScraper::fetch`] with a one-shot client.
pub async fn fetch_page(url: &str) -> Result<Vec<RawItem>> {
    PageScraper::new(&FetchConfig::default())?.fetch(url).await
}

/// Extract update candidates from page HTML.
pub fn extract_items(page_url: &str, html: &str) -> Vec<RawItem> {
    let Ok(link_sel) = Selector::parse("a[href]") else {
        return Vec::new();
    };
    let base_url = Url::parse(page_url).ok();

    let document = Html::parse_document(html);
    let mut seen = HashSet::new();
    let mut items = Vec::new();

    for element in document.select(&link_sel) {
        let href = element.value().attr("href").unwrap_or("");
        if href.is_empty() || href.starts_with('#') || href.starts_with("javascript:") {
            continue;
        }

        let url = resolve_href(base_url.as_ref(), href);
        if !seen.insert(url.clone()) {
            continue;
        }

        let text = element.text().collect::<String>().trim().to_string();
        let title = if text.is_empty() { url.clone() } else { text };
        let content_raw = element
            .value()
            .attr("title")
            .filter(|t| !t.is_empty())
            .map(str::to_string)
            .unwrap_or_else(|| title.clone());

        items.push(RawItem {
            title,
            url: Some(url),
            content_raw,
            published_at: None,
        });
    }

    items
}

/// Resolve a potentially relative href against the page URL.
fn resolve_href(base: Option<&Url>, href: &str) -> String {
    base.and_then(|b| b.join(href).ok())
        .map(|u| u.to_string())
        .unwrap_or_else(|| href.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = r##"
        <html><body>
          <a href="/notifications/42" title="Draft amendment">Amendment notified</a>
          <a href="https://other.example/x">External notice</a>
          <a href="/notifications/42">Duplicate link</a>
          <a href="#top">Back to top</a>
          <a href="javascript:void(0)">Menu</a>
          <a href="relative.html"></a>
        </body></html>"##;

    #[test]
    fn test_extract_items_resolves_and_dedupes() {
        let items = extract_items("https://gov.example/updates/", PAGE);

        let urls: Vec<&str> = items.iter().filter_map(|i| i.url.as_deref()).collect();
        assert_eq!(
            urls,
            vec![
                "https://gov.example/notifications/42",
                "https://other.example/x",
                "https://gov.example/updates/relative.html",
            ]
        );
    }

    #[test]
    fn test_extract_items_title_and_content() {
        let items = extract_items("https://gov.example/updates/", PAGE);

        assert_eq!(items[0].title, "Amendment notified");
        assert_eq!(items[0].content_raw, "Draft amendment");

        // Text-less anchors fall back to the resolved URL.
        assert_eq!(items[2].title, "https://gov.example/updates/relative.html");
        assert_eq!(items[2].content_raw, items[2].title);
    }

    #[test]
    fn test_extract_items_skips_anchor_and_script_links() {
        let items = extract_items("https://gov.example/updates/", PAGE);
        assert!(items.iter().all(|i| {
            let url = i.url.as_deref().unwrap();
            !url.contains('#') && !url.starts_with("javascript:")
        }));
    }

    #[test]
    fn test_extract_items_unparseable_base_keeps_raw_href() {
        let items = extract_items("not a base url", r#"<a href="/x">X</a>"#);
        assert_eq!(items[0].url.as_deref(), Some("/x"));
    }
}
