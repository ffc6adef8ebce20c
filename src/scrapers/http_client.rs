//! Challenge-aware HTTP fetching.
//!
//! One client is shared by every worker in a run. It carries the browser
//! identity (user agent, referer, cookie jar) that keeps the site's anti-bot
//! layer satisfied, and paces every request through one shared gate.

use std::sync::Arc;
use std::time::Duration;

use reqwest::header::REFERER;
use reqwest::Client;
use tracing::{debug, warn};

use super::pacer::RequestPacer;
use super::user_agent::resolve_user_agent;

#[derive(Clone)]
pub struct HttpClient {
    client: Client,
    referer: String,
    pacer: Arc<RequestPacer>,
}

impl HttpClient {
    /// Create a new HTTP client.
    ///
    /// `user_agent` follows config semantics: unset or "impersonate" rotates
    /// real browser agents, anything else is sent verbatim.
    pub fn new(
        timeout: Duration,
        request_delay: Duration,
        user_agent: Option<&str>,
        referer: &str,
    ) -> Self {
        let client = Client::builder()
            .user_agent(resolve_user_agent(user_agent))
            .timeout(timeout)
            .cookie_store(true)
            .gzip(true)
            .brotli(true)
            .build()
            .expect("Failed to create HTTP client");

        Self {
            client,
            referer: referer.to_string(),
            pacer: Arc::new(RequestPacer::new(request_delay)),
        }
    }

    /// One throwaway GET against the site root so the challenge layer can
    /// set its clearance cookie before the crawl starts. Best-effort: a
    /// failure here only means the first real fetch faces the challenge.
    pub async fn warm_up(&self, site_url: &str) {
        self.pacer.acquire().await;
        match self
            .client
            .get(site_url)
            .header(REFERER, &self.referer)
            .send()
            .await
        {
            Ok(response) => debug!("warm-up GET {} -> {}", site_url, response.status()),
            Err(e) => warn!("warm-up GET {} failed: {}", site_url, e),
        }
    }

    /// Fetch one page body.
    ///
    /// Every transport, timeout, or non-2xx condition collapses to `None`;
    /// callers treat that as "nothing more here". No retry at this layer.
    pub async fn fetch_html(&self, url: &str) -> Option<String> {
        self.pacer.acquire().await;

        let response = match self
            .client
            .get(url)
            .header(REFERER, &self.referer)
            .send()
            .await
        {
            Ok(r) => r,
            Err(e) => {
                debug!("GET {} failed: {}", url, e);
                return None;
            }
        };

        if !response.status().is_success() {
            debug!("GET {} -> HTTP {}", url, response.status());
            return None;
        }

        match response.text().await {
            Ok(body) => Some(body),
            Err(e) => {
                debug!("reading body of {} failed: {}", url, e);
                None
            }
        }
    }

    /// Begin a streaming GET for a download link. Status handling is the
    /// caller's; the pacing delay still applies.
    pub async fn stream(&self, url: &str) -> Result<reqwest::Response, reqwest::Error> {
        self.pacer.acquire().await;
        self.client
            .get(url)
            .header(REFERER, &self.referer)
            .send()
            .await
    }
}
