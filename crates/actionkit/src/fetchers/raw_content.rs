//! Raw-content origin fetcher
//!
//! Downloads files from `https://raw.githubusercontent.com/{owner}/{repo}/{prefix}/{filename}`.

use crate::error::FetchError;
use crate::fetchers::RawFileSource;
use crate::DEFAULT_RAW_CONTENT_ORIGIN;
use async_trait::async_trait;
use bytes::Bytes;
use reqwest::header::{HeaderMap, HeaderValue, USER_AGENT};
use reqwest::StatusCode;
use std::time::Duration;
use url::Url;

/// Total request timeout (connect + headers + body)
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Connect timeout
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Builder for [`RawContentClient`]
#[derive(Debug, Clone)]
pub struct RawContentClientBuilder {
    base_url: String,
    timeout: Duration,
    connect_timeout: Duration,
    user_agent: Option<String>,
}

impl Default for RawContentClientBuilder {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_RAW_CONTENT_ORIGIN.to_string(),
            timeout: DEFAULT_TIMEOUT,
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
            user_agent: None,
        }
    }
}

impl RawContentClientBuilder {
    /// Create a builder pointing at the public raw-content origin
    pub fn new() -> Self {
        Self::default()
    }

    /// Override the origin (mirrors, tests)
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Bound the total duration of each request
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Bound the connection phase of each request
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    /// Send a User-Agent header (none is sent by default)
    pub fn user_agent(mut self, ua: impl Into<String>) -> Self {
        self.user_agent = Some(ua.into());
        self
    }

    /// Build the client
    pub fn build(self) -> Result<RawContentClient, FetchError> {
        let base_url = Url::parse(&self.base_url)
            .map_err(|e| FetchError::InvalidBaseUrl(format!("{}: {}", self.base_url, e)))?;
        if base_url.cannot_be_a_base() {
            return Err(FetchError::InvalidBaseUrl(self.base_url));
        }

        let mut headers = HeaderMap::new();
        if let Some(ref ua) = self.user_agent {
            let value = HeaderValue::from_str(ua)
                .map_err(|_| FetchError::InvalidUserAgent(ua.clone()))?;
            headers.insert(USER_AGENT, value);
        }

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .connect_timeout(self.connect_timeout)
            .timeout(self.timeout)
            .build()
            .map_err(FetchError::ClientBuildError)?;

        Ok(RawContentClient { http, base_url })
    }
}

/// HTTP client for the raw-content origin
///
/// Holds only a reusable connection pool; cheap to clone.
#[derive(Debug, Clone)]
pub struct RawContentClient {
    http: reqwest::Client,
    base_url: Url,
}

impl RawContentClient {
    /// Create a builder
    pub fn builder() -> RawContentClientBuilder {
        RawContentClientBuilder::new()
    }

    /// Create a client with default settings
    pub fn new() -> Result<Self, FetchError> {
        Self::builder().build()
    }

    /// Origin files are fetched from
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Build `<origin>/<owner>/<repo>/<path_prefix>/<filename>`
    ///
    /// `path_prefix` may span several segments (`refs/tags/v1`).
    pub fn file_url(&self, owner: &str, repo: &str, path_prefix: &str, filename: &str) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments
                .pop_if_empty()
                .push(owner)
                .push(repo)
                .extend(path_prefix.split('/').filter(|s| !s.is_empty()))
                .push(filename);
        }
        url
    }
}

#[async_trait]
impl RawFileSource for RawContentClient {
    fn name(&self) -> &'static str {
        "raw_content"
    }

    async fn fetch_raw_file(
        &self,
        owner: &str,
        repo: &str,
        path_prefix: &str,
        filename: &str,
    ) -> Result<Bytes, FetchError> {
        let url = self.file_url(owner, repo, path_prefix, filename);
        let transport = |source| FetchError::Transport {
            filename: filename.to_string(),
            url: url.to_string(),
            source,
        };

        let response = self
            .http
            .get(url.clone())
            .send()
            .await
            .map_err(transport)?;

        match response.status() {
            StatusCode::OK => {}
            StatusCode::NOT_FOUND => {
                return Err(FetchError::NotFound {
                    filename: filename.to_string(),
                    url: url.to_string(),
                });
            }
            status => {
                return Err(FetchError::UnexpectedStatus {
                    filename: filename.to_string(),
                    url: url.to_string(),
                    status: status.as_u16(),
                });
            }
        }

        let body = response.bytes().await.map_err(transport)?;
        tracing::debug!(%url, size = body.len(), "Fetched raw file");
        Ok(body)
    }
}
