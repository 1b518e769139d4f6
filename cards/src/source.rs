//! Remote catalog source
//!
//! The store only needs one operation from the outside world: "give me the
//! catalog if it changed since this cache validator". `CatalogSource` is that
//! seam; `HttpSource` implements it with a conditional HTTP GET.

use async_trait::async_trait;
use reqwest::header::{ETAG, IF_NONE_MATCH, USER_AGENT};
use reqwest::{Client, StatusCode};
use tracing::debug;

use crate::config::StoreConfig;
use crate::error::{FetchError, excerpt};

/// Result of a conditional fetch
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchOutcome {
    /// The catalog is unchanged since the presented validator
    NotModified,

    /// A new catalog document and the validator to present next time
    Fetched { body: Vec<u8>, etag: String },
}

/// Something that can fetch the raw catalog document
#[async_trait]
pub trait CatalogSource: Send + Sync {
    /// Fetch the catalog unless it still matches `etag`
    ///
    /// An empty `etag` means nothing has been fetched yet.
    async fn fetch(&self, etag: &str) -> Result<FetchOutcome, FetchError>;
}

/// Catalog source backed by an HTTP endpoint
pub struct HttpSource {
    url: String,
    user_agent: String,
    excerpt_limit: usize,
    http: Client,
}

impl HttpSource {
    pub fn new(config: &StoreConfig) -> Self {
        debug!(url = %config.url, "HttpSource::new: called");
        let mut builder = Client::builder();
        if let Some(timeout) = config.timeout() {
            builder = builder.timeout(timeout);
        }
        let http = builder.build().unwrap_or_default();
        Self {
            url: config.url.clone(),
            user_agent: config.user_agent.clone(),
            excerpt_limit: config.excerpt_limit,
            http,
        }
    }
}

#[async_trait]
impl CatalogSource for HttpSource {
    async fn fetch(&self, etag: &str) -> Result<FetchOutcome, FetchError> {
        debug!(url = %self.url, %etag, "HttpSource::fetch: called");
        let response = self
            .http
            .get(&self.url)
            .header(IF_NONE_MATCH, etag)
            .header(USER_AGENT, &self.user_agent)
            .send()
            .await
            .map_err(FetchError::Network)?;

        let status = response.status();
        debug!(%status, "HttpSource::fetch: response received");
        if status == StatusCode::NOT_MODIFIED {
            return Ok(FetchOutcome::NotModified);
        }

        let next_etag = response
            .headers()
            .get(ETAG)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_string();

        let body = response.bytes().await;
        if !status.is_success() {
            // Best effort: include whatever part of the body could be read
            let body = body.map(|b| b.to_vec()).unwrap_or_default();
            return Err(FetchError::Status {
                status: status.as_u16(),
                excerpt: excerpt(&body, self.excerpt_limit),
            });
        }

        let body = body.map_err(FetchError::Body)?.to_vec();
        debug!(bytes = body.len(), etag = %next_etag, "HttpSource::fetch: body read");
        Ok(FetchOutcome::Fetched { body, etag: next_etag })
    }
}
