use std::time::Duration;

use reqwest::header::ACCEPT;
use reqwest::{Client, Method, RequestBuilder, Response, Url};
use serde::de::DeserializeOwned;
use tracing::debug;

use propconnect_config::ApiConfig;

use crate::error::{ApiError, ApiResult};

/// Stateless adapter over the PropConnect REST backend.
///
/// Attaches JSON headers and, when given one, a bearer token to every call,
/// and turns non-success responses into [`ApiError`].
///
/// ```
/// use propconnect_client::ApiClient;
/// use propconnect_config::ApiConfig;
///
/// let client = ApiClient::new(&ApiConfig::default()).expect("default url is valid");
/// assert_eq!(client.base_url(), "http://localhost:5000/");
/// ```
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: Client,
    base_url: Url,
}

impl ApiClient {
    pub fn new(config: &ApiConfig) -> ApiResult<Self> {
        let http = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_seconds))
            .build()?;
        Self::with_client(http, &config.base_url)
    }

    pub fn with_client(http: Client, base_url: &str) -> ApiResult<Self> {
        let base_url =
            Url::parse(base_url).map_err(|error| ApiError::InvalidUrl(format!("{base_url}: {error}")))?;
        if base_url.cannot_be_a_base() {
            return Err(ApiError::InvalidUrl(base_url.to_string()));
        }
        Ok(Self { http, base_url })
    }

    pub fn base_url(&self) -> &str {
        self.base_url.as_str()
    }

    /// Build an absolute url; every segment is percent-encoded on its own.
    pub(crate) fn url(&self, segments: &[&str]) -> ApiResult<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| ApiError::InvalidUrl(self.base_url.to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    pub(crate) fn request(
        &self,
        method: Method,
        segments: &[&str],
        token: Option<&str>,
    ) -> ApiResult<RequestBuilder> {
        let url = self.url(segments)?;
        debug!(%method, path = url.path(), authenticated = token.is_some(), "dispatching request");

        let mut request = self
            .http
            .request(method, url)
            .header(ACCEPT, "application/json");
        if let Some(token) = token {
            request = request.bearer_auth(token);
        }
        Ok(request)
    }

    async fn execute(&self, request: RequestBuilder) -> ApiResult<Response> {
        let response = request.send().await?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        let error = ApiError::from_response_parts(status, &body);
        debug!(status = status.as_u16(), kind = ?error.kind(), "backend rejected request");
        Err(error)
    }

    pub(crate) async fn fetch_json<T: DeserializeOwned>(&self, request: RequestBuilder) -> ApiResult<T> {
        let response = self.execute(request).await?;
        let bytes = response.bytes().await?;
        serde_json::from_slice(&bytes).map_err(ApiError::from)
    }

    pub(crate) async fn fetch_empty(&self, request: RequestBuilder) -> ApiResult<()> {
        self.execute(request).await?;
        Ok(())
    }
}

/// Split a static route such as `/api/auth/login` into url segments.
pub(crate) fn route(path: &str) -> Vec<&str> {
    path.split('/').filter(|segment| !segment.is_empty()).collect()
}
