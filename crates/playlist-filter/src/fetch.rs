use async_trait::async_trait;
use reqwest::Client;
use tracing::{debug, info, warn};

use crate::config::{FilterConfig, parse_source_url};
use crate::error::FetchError;

/// A fetched playlist body and the source it came from.
#[derive(Debug, Clone)]
pub struct FetchedDocument {
    pub source_url: String,
    pub text: String,
}

/// Where the pipeline gets its playlist text from.
#[async_trait]
pub trait PlaylistSource: Send + Sync {
    async fn fetch(&self) -> Result<FetchedDocument, FetchError>;
}

/// Fetches over HTTP, trying each configured URL once, in order.
#[derive(Debug, Clone)]
pub struct HttpSource {
    client: Client,
    source_urls: Vec<String>,
}

impl HttpSource {
    pub fn new(config: &FilterConfig) -> Result<Self, FetchError> {
        let mut builder = Client::builder().user_agent(config.user_agent.as_str());
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            client: builder.build()?,
            source_urls: config.source_urls.clone(),
        })
    }

    /// Issues a single GET and returns the decoded body on a 2xx response.
    pub async fn fetch_url(&self, url: &str) -> Result<String, FetchError> {
        let parsed = parse_source_url(url)?;

        let response = self
            .client
            .get(parsed)
            .send()
            .await
            .map_err(|e| FetchError::from_request(url, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::http_status(status, url));
        }

        let body = response.bytes().await.map_err(|e| {
            if e.is_timeout() {
                FetchError::Timeout {
                    url: url.to_owned(),
                }
            } else {
                FetchError::Body {
                    url: url.to_owned(),
                    source: e,
                }
            }
        })?;

        debug!("Received {} bytes from {}", body.len(), url);
        Ok(decode_body(&body))
    }
}

#[async_trait]
impl PlaylistSource for HttpSource {
    async fn fetch(&self) -> Result<FetchedDocument, FetchError> {
        let mut last_error = None;

        for (attempt, url) in self.source_urls.iter().enumerate() {
            debug!(
                "Fetching playlist from {} (source {}/{})",
                url,
                attempt + 1,
                self.source_urls.len()
            );
            match self.fetch_url(url).await {
                Ok(text) => {
                    info!("Fetched playlist from {url}");
                    return Ok(FetchedDocument {
                        source_url: url.clone(),
                        text,
                    });
                }
                Err(e) => {
                    warn!("Failed to fetch playlist from {url}: {e}");
                    last_error = Some(e);
                }
            }
        }

        match last_error {
            None => Err(FetchError::NoSources),
            Some(e) if self.source_urls.len() == 1 => Err(e),
            Some(e) => Err(FetchError::source_exhausted(self.source_urls.len(), e)),
        }
    }
}

/// Lossy UTF-8 decode with a leading byte-order mark removed.
fn decode_body(body: &[u8]) -> String {
    let text = String::from_utf8_lossy(body);
    match text.strip_prefix('\u{feff}') {
        Some(stripped) => stripped.to_owned(),
        None => text.into_owned(),
    }
}
