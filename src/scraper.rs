use reqwest::{Client, ClientBuilder};
use scraper::{Html, Selector};
use std::time::{Duration, Instant};
use once_cell::sync::Lazy;
use crate::error::{AppError, Result};

// Compiled once; the selector string is a constant.
static PARAGRAPH_SELECTOR: Lazy<Selector> = Lazy::new(|| {
    Selector::parse("p").expect("Failed to parse paragraph selector")
});

/// Downloads article pages. One instance is shared by every request.
#[derive(Clone)]
pub struct Fetcher {
    client: Client,
}

impl Fetcher {
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = ClientBuilder::new()
            .timeout(timeout)
            .connect_timeout(timeout.min(Duration::from_secs(5)))
            .pool_max_idle_per_host(10)
            .build()
            .map_err(|e| AppError::Config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self { client })
    }

    /// Single GET of `url`. Transport errors and non-2xx statuses are fetch failures.
    pub async fn fetch(&self, url: &str) -> Result<String> {
        tracing::info!(%url, "fetching article");
        let started = Instant::now();

        let response = self
            .client
            .get(url)
            .send()
            .await
            .and_then(|response| response.error_for_status())
            .map_err(|e| {
                tracing::warn!(%url, error = %e, "article fetch failed");
                AppError::fetch(url, e)
            })?;

        let html = response.text().await.map_err(|e| AppError::fetch(url, e))?;
        tracing::info!(%url, bytes = html.len(), elapsed = ?started.elapsed(), "article fetched");
        Ok(html)
    }
}

/// Visible text of every `<p>` element, in document order, joined by single spaces.
pub fn extract_paragraphs(html: &str) -> String {
    let document = Html::parse_document(html);

    document
        .select(&PARAGRAPH_SELECTOR)
        .map(|paragraph| paragraph.text().collect::<String>())
        .collect::<Vec<_>>()
        .join(" ")
}
