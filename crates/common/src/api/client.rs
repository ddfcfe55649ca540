use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE};
use reqwest::{Client, Method, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde_json::Value;
use url::Url;

use super::error::NormalizedError;
use super::ApiRequest;

/// The single point of contact with the client API.
///
/// Stateless apart from the cookie jar the backend uses to track the
/// session. Clones share that jar and the connection pool, so a cookie
/// set through one clone is sent by all of them.
#[derive(Debug, Clone)]
pub struct ApiClient {
    pub remote: Url,
    client: Client,
}

impl ApiClient {
    pub fn new(remote: &Url) -> Result<Self, reqwest::Error> {
        Self::with_headers(remote, HeaderMap::new())
    }

    /// Build a client whose default headers are the JSON content type merged
    /// with `headers`. A caller-supplied header wins over the default for the
    /// same key.
    pub fn with_headers(remote: &Url, headers: HeaderMap) -> Result<Self, reqwest::Error> {
        let mut default_headers = HeaderMap::new();
        default_headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        for (key, value) in headers.iter() {
            default_headers.insert(key.clone(), value.clone());
        }

        let client = Client::builder()
            .default_headers(default_headers)
            .cookie_store(true)
            .build()?;

        Ok(Self {
            remote: remote.clone(),
            client,
        })
    }

    /// Issue a typed request and decode its response
    pub async fn call<T: ApiRequest>(&self, request: T) -> Result<T::Response, NormalizedError> {
        let request_builder = request
            .build_request(&self.remote, &self.client)
            .map_err(|e| {
                tracing::warn!("failed to build request url: {}", e);
                NormalizedError::unknown()
            })?;
        self.send(request_builder).await
    }

    /// Issue an untyped request against `path` and return the decoded body
    pub async fn request(
        &self,
        path: &str,
        method: Method,
        body: Option<&Value>,
    ) -> Result<Value, NormalizedError> {
        self.request_with_headers(path, method, body, HeaderMap::new())
            .await
    }

    /// Like [`ApiClient::request`], with per-request headers that override
    /// the client defaults for the same key
    pub async fn request_with_headers(
        &self,
        path: &str,
        method: Method,
        body: Option<&Value>,
        headers: HeaderMap,
    ) -> Result<Value, NormalizedError> {
        let url = self.remote.join(path).map_err(|e| {
            tracing::warn!(path, "invalid request path: {}", e);
            NormalizedError::unknown()
        })?;

        let mut request_builder = self.client.request(method, url).headers(headers);
        if let Some(body) = body {
            request_builder = request_builder.json(body);
        }
        self.send(request_builder).await
    }

    /// Get the base URL for API requests
    pub fn base_url(&self) -> &Url {
        &self.remote
    }

    async fn send<R: DeserializeOwned>(
        &self,
        request_builder: RequestBuilder,
    ) -> Result<R, NormalizedError> {
        let request = request_builder.build().map_err(|e| {
            tracing::warn!("failed to build request: {}", e);
            NormalizedError::unknown()
        })?;
        tracing::debug!(method = %request.method(), path = request.url().path(), "sending request");

        let response = self.client.execute(request).await.map_err(|e| {
            tracing::warn!("request failed: {}", e);
            NormalizedError::unknown()
        })?;

        if response.status().is_success() {
            decode_success(response).await
        } else {
            let status = response.status();
            // an unreadable error body is treated as an empty one
            let bytes = response.bytes().await.unwrap_or_default();
            let error = NormalizedError::from_body(&bytes);
            tracing::debug!(%status, kind = ?error.kind, "request rejected: {}", error.message);
            Err(error)
        }
    }
}

async fn decode_success<R: DeserializeOwned>(response: Response) -> Result<R, NormalizedError> {
    let bytes = response.bytes().await.map_err(|e| {
        tracing::warn!("failed to read response body: {}", e);
        NormalizedError::unknown()
    })?;
    // an empty success body decodes as `null`
    let body: &[u8] = if bytes.is_empty() { b"null" } else { &bytes };
    serde_json::from_slice(body).map_err(|e| {
        tracing::warn!("failed to decode response body: {}", e);
        NormalizedError::unknown()
    })
}
