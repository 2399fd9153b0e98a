//! Core HTTP client for the Connect API

use reqwest::header::HeaderMap;
use reqwest::multipart::Form;
use reqwest::RequestBuilder;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, warn};
use url::Url;

use crate::client::{
    AppletsClient, BlocksClient, ConnectClientBuilder, FlowsClient, PackagesClient, TasksClient,
};
use crate::error::{ConnectError, Result};

pub(crate) struct ClientInner {
    pub(crate) base_url: Url,
    pub(crate) applets_query_url: Url,
    pub(crate) default_headers: HeaderMap,
    pub(crate) http: reqwest::Client,
}

/// Main client for the Connect API
///
/// Cheap to clone; all clones share the same connection pool and
/// configuration. Resource clients are obtained via [`ConnectClient::tasks`],
/// [`ConnectClient::blocks`], [`ConnectClient::flows`],
/// [`ConnectClient::packages`] and [`ConnectClient::applets`].
#[derive(Clone)]
pub struct ConnectClient {
    pub(crate) inner: Arc<ClientInner>,
}

impl ConnectClient {
    /// Create a new builder for ConnectClient
    pub fn builder() -> ConnectClientBuilder {
        ConnectClientBuilder::new()
    }

    /// The configured API base URL
    pub fn base_url(&self) -> &Url {
        &self.inner.base_url
    }

    /// Client for task operations
    pub fn tasks(&self) -> TasksClient {
        TasksClient::new(self.clone())
    }

    /// Client for block listing
    pub fn blocks(&self) -> BlocksClient {
        BlocksClient::new(self.clone())
    }

    /// Client for flow listing
    pub fn flows(&self) -> FlowsClient {
        FlowsClient::new(self.clone())
    }

    /// Client for package operations
    pub fn packages(&self) -> PackagesClient {
        PackagesClient::new(self.clone())
    }

    /// Client for applet operations
    pub fn applets(&self) -> AppletsClient {
        AppletsClient::new(self.clone())
    }

    /// Build a URL under the API base; segments are percent-encoded
    pub(crate) fn api_url(&self, segments: &[&str]) -> Result<Url> {
        join_segments(&self.inner.base_url, segments)
    }

    /// Build a URL under the applets query server
    pub(crate) fn applets_url(&self, segments: &[&str]) -> Result<Url> {
        join_segments(&self.inner.applets_query_url, segments)
    }

    pub(crate) async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T> {
        let request = self
            .inner
            .http
            .get(url)
            .headers(self.inner.default_headers.clone());
        self.execute(request).await
    }

    pub(crate) async fn post_json<T, B>(&self, url: Url, body: &B) -> Result<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let request = self
            .inner
            .http
            .post(url)
            .headers(self.inner.default_headers.clone())
            .json(body);
        self.execute(request).await
    }

    pub(crate) async fn post_empty<T: DeserializeOwned>(&self, url: Url) -> Result<T> {
        let request = self
            .inner
            .http
            .post(url)
            .headers(self.inner.default_headers.clone());
        self.execute(request).await
    }

    pub(crate) async fn post_multipart<T: DeserializeOwned>(
        &self,
        url: Url,
        form: Form,
    ) -> Result<T> {
        let request = self
            .inner
            .http
            .post(url)
            .headers(self.inner.default_headers.clone())
            .multipart(form);
        self.execute(request).await
    }

    /// Send a request; non-2xx responses become [`ConnectError::Api`]
    /// with the body parsed as JSON, wrapped as raw text, or `None`.
    async fn execute<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T> {
        let response = request.send().await?;
        let status = response.status();

        if !status.is_success() {
            let body = match response.text().await {
                Ok(text) if text.is_empty() => None,
                Ok(text) => Some(
                    serde_json::from_str::<Value>(&text).unwrap_or(Value::String(text)),
                ),
                Err(_) => None,
            };
            warn!(status = status.as_u16(), "request failed");
            return Err(ConnectError::Api {
                status: status.as_u16(),
                body,
            });
        }

        debug!(status = status.as_u16(), "request ok");
        Ok(response.json::<T>().await?)
    }
}

impl std::fmt::Debug for ConnectClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConnectClient")
            .field("base_url", &self.inner.base_url.as_str())
            .field("applets_query_url", &self.inner.applets_query_url.as_str())
            .finish()
    }
}

fn join_segments(base: &Url, segments: &[&str]) -> Result<Url> {
    let mut url = base.clone();
    {
        let mut parts = url.path_segments_mut().map_err(|_| {
            ConnectError::InvalidConfiguration(format!("URL cannot be a base: {}", base))
        })?;
        parts.pop_if_empty();
        for segment in segments {
            parts.push(segment);
        }
    }
    Ok(url)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_join_segments() {
        let base = Url::parse("http://localhost:3000/api").unwrap();
        let url = join_segments(&base, &["v1", "tasks"]).unwrap();
        assert_eq!(url.as_str(), "http://localhost:3000/api/v1/tasks");
    }

    #[test]
    fn test_join_segments_trailing_slash() {
        let base = Url::parse("http://localhost:3000/api/").unwrap();
        let url = join_segments(&base, &["v1", "tasks"]).unwrap();
        assert_eq!(url.as_str(), "http://localhost:3000/api/v1/tasks");
    }

    #[test]
    fn test_join_segments_encodes_identifier() {
        let base = Url::parse("http://localhost:3000/api").unwrap();
        let url = join_segments(&base, &["v1", "tasks", "id with spaces/and-slash"]).unwrap();
        assert_eq!(
            url.as_str(),
            "http://localhost:3000/api/v1/tasks/id%20with%20spaces%2Fand-slash"
        );
    }
}
