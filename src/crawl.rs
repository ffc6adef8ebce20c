//! Year crawl state: the seen-set and the page walker.

use std::collections::HashSet;

use tokio::sync::Mutex;
use tracing::{debug, info};
use url::Url;

use crate::models::Album;
use crate::scrapers::{listing, HttpClient};

/// Per-crawl set of admitted album URLs.
///
/// Insert-and-test is atomic, so two workers can never both claim the same
/// URL. Scope is one year's crawl; nothing is shared across years, and a
/// re-run rediscovers from page 1.
#[derive(Debug, Default)]
pub struct SeenUrls {
    inner: Mutex<HashSet<String>>,
}

impl SeenUrls {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true iff the URL was not admitted before.
    pub async fn admit(&self, url: &str) -> bool {
        self.inner.lock().await.insert(url.to_string())
    }

    pub async fn count(&self) -> usize {
        self.inner.lock().await.len()
    }
}

/// Walks one year's listing pages until the index runs out.
///
/// The cursor advances strictly sequentially; a page's batch is fully
/// handled by the caller before the next fetch.
pub struct PageWalker<'a> {
    client: &'a HttpClient,
    base_url: String,
    seen: &'a SeenUrls,
    cursor: u32,
    listing_retries: u32,
    done: bool,
}

impl<'a> PageWalker<'a> {
    pub fn new(
        client: &'a HttpClient,
        base_url: impl Into<String>,
        seen: &'a SeenUrls,
        listing_retries: u32,
    ) -> Self {
        Self {
            client,
            base_url: base_url.into(),
            seen,
            cursor: 1,
            listing_retries,
            done: false,
        }
    }

    /// Listing page the cursor currently points at.
    pub fn page_url(&self) -> String {
        match Url::parse(&self.base_url) {
            Ok(mut url) => {
                url.query_pairs_mut()
                    .append_pair("page", &self.cursor.to_string());
                url.to_string()
            }
            Err(_) => format!("{}?page={}", self.base_url, self.cursor),
        }
    }

    /// Fetch the next batch of newly discovered albums.
    ///
    /// `None` ends the crawl: either the page would not fetch (a transient
    /// failure and the end of the index are indistinguishable here, by
    /// contract) or it contributed nothing the seen-set hadn't admitted. A
    /// repeating page therefore can never loop forever.
    pub async fn next_page(&mut self) -> Option<Vec<Album>> {
        if self.done {
            return None;
        }

        let page_url = self.page_url();
        let html = match self.fetch_listing(&page_url).await {
            Some(html) => html,
            None => {
                info!("no listing at {}, ending crawl", page_url);
                self.done = true;
                return None;
            }
        };

        let mut fresh = Vec::new();
        for album in listing::extract_albums(&html, &page_url) {
            if self.seen.admit(&album.url).await {
                fresh.push(album);
            }
        }

        if fresh.is_empty() {
            debug!("page {} yielded nothing new, ending crawl", self.cursor);
            self.done = true;
            return None;
        }

        self.cursor += 1;
        Some(fresh)
    }

    /// Listing fetch with the optional bounded retry. Zero retries keeps the
    /// upstream behavior of treating one failed fetch as the end.
    async fn fetch_listing(&self, url: &str) -> Option<String> {
        for attempt in 0..=self.listing_retries {
            if let Some(html) = self.client.fetch_html(url).await {
                return Some(html);
            }
            if attempt < self.listing_retries {
                debug!(
                    "listing fetch failed for {}, retry {}/{}",
                    url,
                    attempt + 1,
                    self.listing_retries
                );
            }
        }
        None
    }
}
