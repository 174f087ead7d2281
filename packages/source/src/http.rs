//! HTTP source for datasets served next to the page.

use async_trait::async_trait;

use crate::{RawSource, SourceError};

/// Fetches dataset locations relative to a base URL.
#[derive(Debug, Clone)]
pub struct HttpSource {
    base_url: String,
    client: reqwest::Client,
}

impl HttpSource {
    /// Creates a source that resolves locations against `base_url`.
    #[must_use]
    pub fn new(base_url: &str) -> Self {
        Self::with_client(base_url, reqwest::Client::new())
    }

    /// Creates a source with a preconfigured client.
    #[must_use]
    pub fn with_client(base_url: &str, client: reqwest::Client) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_owned(),
            client,
        }
    }

    /// Joins a location onto the base URL. Absolute URLs pass through.
    #[must_use]
    pub fn url_for(&self, location: &str) -> String {
        if location.starts_with("http://") || location.starts_with("https://") {
            location.to_owned()
        } else {
            format!("{}/{}", self.base_url, location.trim_start_matches('/'))
        }
    }
}

#[async_trait]
impl RawSource for HttpSource {
    fn id(&self) -> &'static str {
        "http"
    }

    async fn fetch_text(&self, location: &str) -> Result<String, SourceError> {
        let url = self.url_for(location);
        let response = self.client.get(&url).send().await?;

        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Err(SourceError::NotFound { location: url });
        }

        let text = response.error_for_status()?.text().await?;
        log::debug!("Downloaded {} bytes from {url}", text.len());
        Ok(text)
    }
}
