//! ConnectClient builder for fluent configuration

use reqwest::header::{HeaderMap, HeaderName, HeaderValue, AUTHORIZATION};
use std::sync::Arc;
use url::Url;

use crate::client::http::ClientInner;
use crate::client::ConnectClient;
use crate::error::{ConnectError, Result};

/// Fixed query server used for applet listing
pub const DEFAULT_APPLETS_QUERY_URL: &str = "https://chat-data.oomol.com";

/// Builder for creating [`ConnectClient`] instances
///
/// Example:
/// ```ignore
/// let client = ConnectClient::builder()
///     .base_url("https://connect.example.com/api")
///     .api_token(token)
///     .build()?;
/// ```
pub struct ConnectClientBuilder {
    base_url: Option<String>,
    applets_query_url: String,
    api_token: Option<String>,
    default_headers: Vec<(String, String)>,
    http_client: Option<reqwest::Client>,
}

impl Default for ConnectClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ConnectClientBuilder {
    /// Create a new builder with default values
    pub fn new() -> Self {
        Self {
            base_url: None,
            applets_query_url: DEFAULT_APPLETS_QUERY_URL.to_string(),
            api_token: None,
            default_headers: Vec::new(),
            http_client: None,
        }
    }

    /// Set the API base URL (required), e.g. `https://host/api`
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Set the API token, sent as the `Authorization` header
    pub fn api_token(mut self, token: impl Into<String>) -> Self {
        self.api_token = Some(token.into());
        self
    }

    /// Add a header sent with every request
    pub fn default_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.default_headers.push((name.into(), value.into()));
        self
    }

    /// Override the applet query server URL
    ///
    /// Default: `https://chat-data.oomol.com`
    pub fn applets_query_url(mut self, url: impl Into<String>) -> Self {
        self.applets_query_url = url.into();
        self
    }

    /// Use a custom reqwest client (connection pool, proxy, timeouts)
    pub fn http_client(mut self, client: reqwest::Client) -> Self {
        self.http_client = Some(client);
        self
    }

    /// Build the ConnectClient
    pub fn build(self) -> Result<ConnectClient> {
        let base_url = self.base_url.ok_or_else(|| {
            ConnectError::InvalidConfiguration("base_url is required".to_string())
        })?;
        let base_url = Url::parse(&base_url)
            .map_err(|e| ConnectError::InvalidConfiguration(format!("base_url: {}", e)))?;
        let applets_query_url = Url::parse(&self.applets_query_url).map_err(|e| {
            ConnectError::InvalidConfiguration(format!("applets_query_url: {}", e))
        })?;

        let mut default_headers = HeaderMap::new();
        for (name, value) in &self.default_headers {
            let name = HeaderName::from_bytes(name.as_bytes()).map_err(|e| {
                ConnectError::InvalidConfiguration(format!("header name {:?}: {}", name, e))
            })?;
            let value = HeaderValue::from_str(value).map_err(|e| {
                ConnectError::InvalidConfiguration(format!("header value for {}: {}", name, e))
            })?;
            default_headers.insert(name, value);
        }
        if let Some(token) = &self.api_token {
            let value = HeaderValue::from_str(token).map_err(|e| {
                ConnectError::InvalidConfiguration(format!("api_token: {}", e))
            })?;
            default_headers.insert(AUTHORIZATION, value);
        }

        Ok(ConnectClient {
            inner: Arc::new(ClientInner {
                base_url,
                applets_query_url,
                default_headers,
                http: self.http_client.unwrap_or_default(),
            }),
        })
    }
}
