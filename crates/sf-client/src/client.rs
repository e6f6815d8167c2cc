//! reqwest-backed HTTP transport.

use std::collections::HashMap;
use std::sync::OnceLock;

use tracing::{debug, info, instrument};

use crate::config::ClientConfig;
use crate::error::{Error, ErrorKind, Result};
use crate::request::{Request, RequestBody};
use crate::response::Response;
use crate::transport::HttpTransport;

static SHARED: OnceLock<SfHttpClient> = OnceLock::new();

/// HTTP client for Salesforce APIs.
///
/// Cloning is cheap; clones share one connection pool.
#[derive(Debug, Clone)]
pub struct SfHttpClient {
    inner: reqwest::Client,
    config: ClientConfig,
}

impl SfHttpClient {
    /// Create a new HTTP client with the given configuration.
    pub fn new(config: ClientConfig) -> Result<Self> {
        let builder = reqwest::Client::builder()
            .timeout(config.timeout)
            .connect_timeout(config.connect_timeout)
            .pool_idle_timeout(config.pool_idle_timeout)
            .pool_max_idle_per_host(config.pool_max_idle_per_host)
            .user_agent(&config.user_agent)
            .gzip(config.accept_compressed)
            .deflate(config.accept_compressed);

        let inner = builder
            .build()
            .map_err(|e| Error::with_source(ErrorKind::Config(e.to_string()), e))?;

        Ok(Self { inner, config })
    }

    /// Create a new HTTP client with default configuration.
    pub fn default_client() -> Result<Self> {
        Self::new(ClientConfig::default())
    }

    /// The process-wide client, created with default configuration on first use.
    ///
    /// It lives for the rest of the process and is never closed.
    pub fn shared() -> Result<Self> {
        if let Some(client) = SHARED.get() {
            return Ok(client.clone());
        }
        let client = Self::default_client()?;
        // A racing initializer may have won; either way every caller gets the stored one.
        Ok(SHARED.get_or_init(|| client).clone())
    }

    /// Get the client configuration.
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Execute a request once and buffer the response.
    #[instrument(skip(self, request), fields(method = %request.method))]
    pub async fn execute(&self, request: Request) -> Result<Response> {
        let mut req = self
            .inner
            .request(request.method.to_reqwest(), &request.url);

        for (name, value) in &request.headers {
            req = req.header(name.as_str(), value.as_str());
        }

        if let Some(body) = request.body {
            req = match body {
                RequestBody::Json(value) => req.body(serde_json::to_vec(&value)?),
                RequestBody::Text(text) => req.body(text),
            };
        }

        if self.config.enable_tracing {
            debug!(method = %request.method, "Sending request");
        }

        let response = req.send().await?;
        let status = response.status().as_u16();

        if self.config.enable_tracing {
            let content_length = response.content_length();
            if response.status().is_success() {
                debug!(status, content_length, "Response received");
            } else {
                info!(status, content_length, "Non-success response");
            }
        }

        let headers: HashMap<String, String> = response
            .headers()
            .iter()
            .filter_map(|(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|v| (name.as_str().to_string(), v.to_string()))
            })
            .collect();
        let body = response.bytes().await?;

        Ok(Response::new(status, headers, body))
    }
}

impl HttpTransport for SfHttpClient {
    async fn send(&self, request: Request) -> Result<Response> {
        self.execute(request).await
    }
}
