//! [`ClusterApi`] over HTTP using reqwest.
//!
//! ## Example
//!
//! ```no_run
//! use std::time::Duration;
//! use sparkdeck_client::{ClusterApi, HttpClusterApi};
//!
//! # async fn example() -> sparkdeck_client::ApiResult<()> {
//! let api = HttpClusterApi::new("http://localhost:8000", Duration::from_secs(30))?;
//! let status = api.cluster_status().await?;
//! println!("running: {}, workers: {}", status.running, status.worker_count);
//! # Ok(())
//! # }
//! ```

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Method, Response, Url};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use tracing::debug;

use sparkdeck_core::{
    ApplyConfigRequest, ClusterStatus, CreateNotebookRequest, NotebookRecord,
};

use crate::api::ClusterApi;
use crate::error::{ApiError, ApiResult};

#[derive(Debug, Deserialize)]
struct LogsBody {
    #[serde(default)]
    logs: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct NotebookListBody {
    #[serde(default)]
    notebooks: Vec<NotebookRecord>,
}

#[derive(Debug, Deserialize)]
struct UrlBody {
    #[serde(default)]
    url: Option<String>,
}

#[derive(Debug, Deserialize)]
struct MessageBody {
    #[serde(default)]
    message: Option<String>,
}

/// HTTP implementation of [`ClusterApi`].
#[derive(Debug, Clone)]
pub struct HttpClusterApi {
    client: reqwest::Client,
    base: Url,
    base_str: String,
}

impl HttpClusterApi {
    /// Create a client for the backend at `base_url`.
    ///
    /// `base_url` may carry a path prefix; API paths are appended to it.
    pub fn new(base_url: &str, timeout: Duration) -> ApiResult<Self> {
        let base = Url::parse(base_url.trim())
            .map_err(|e| ApiError::Config(format!("invalid base URL {base_url}: {e}")))?;
        if base.cannot_be_a_base() {
            return Err(ApiError::Config(format!("{base_url} cannot be used as a base URL")));
        }

        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ApiError::Config(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            base,
            base_str: base_url.trim().trim_end_matches('/').to_string(),
        })
    }

    /// Resolve API path segments against the base URL.
    ///
    /// Segments are percent-encoded, so notebook ids cannot escape their slot.
    fn endpoint(&self, segments: &[&str]) -> ApiResult<Url> {
        let mut url = self.base.clone();
        {
            let mut path = url
                .path_segments_mut()
                .map_err(|_| ApiError::Config(format!("{} cannot be used as a base URL", self.base)))?;
            path.pop_if_empty().extend(segments);
        }
        Ok(url)
    }

    async fn send(&self, method: Method, segments: &[&str], body: Option<&serde_json::Value>) -> ApiResult<Response> {
        let url = self.endpoint(segments)?;
        debug!(%method, %url, "sending request");

        let mut request = self.client.request(method, url);
        if let Some(body) = body {
            request = request.json(body);
        }
        let response = request.send().await?;
        check(response).await
    }

    async fn get_json<T: DeserializeOwned>(&self, segments: &[&str]) -> ApiResult<T> {
        let response = self.send(Method::GET, segments, None).await?;
        response.json::<T>().await.map_err(ApiError::from)
    }

    async fn post_for_message(
        &self,
        method: Method,
        segments: &[&str],
        body: Option<&serde_json::Value>,
    ) -> ApiResult<Option<String>> {
        let response = self.send(method, segments, body).await?;
        let text = response.text().await?;
        Ok(serde_json::from_str::<MessageBody>(&text)
            .ok()
            .and_then(|b| b.message))
    }
}

/// Turn non-success responses into [`ApiError::Rejected`].
async fn check(response: Response) -> ApiResult<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    debug!(status = status.as_u16(), body = %body, "request rejected");
    Err(ApiError::rejected(status.as_u16(), &body))
}

fn to_value<T: serde::Serialize>(value: &T) -> ApiResult<serde_json::Value> {
    serde_json::to_value(value).map_err(|e| ApiError::Config(format!("Failed to encode request: {e}")))
}

#[async_trait]
impl ClusterApi for HttpClusterApi {
    async fn cluster_status(&self) -> ApiResult<ClusterStatus> {
        self.get_json(&["api", "cluster", "status"]).await
    }

    async fn start_cluster(&self) -> ApiResult<Option<String>> {
        self.post_for_message(Method::POST, &["api", "cluster", "start"], None)
            .await
    }

    async fn stop_cluster(&self) -> ApiResult<Option<String>> {
        self.post_for_message(Method::POST, &["api", "cluster", "stop"], None)
            .await
    }

    async fn apply_config(&self, request: &ApplyConfigRequest) -> ApiResult<Option<String>> {
        let body = to_value(request)?;
        self.post_for_message(Method::POST, &["api", "cluster", "config"], Some(&body))
            .await
    }

    async fn cluster_logs(&self) -> ApiResult<Vec<String>> {
        let body: LogsBody = self.get_json(&["api", "cluster", "logs"]).await?;
        Ok(body.logs)
    }

    async fn clear_logs(&self) -> ApiResult<()> {
        self.send(Method::POST, &["api", "cluster", "logs", "clear"], None)
            .await?;
        Ok(())
    }

    async fn list_notebooks(&self) -> ApiResult<Vec<NotebookRecord>> {
        let body: NotebookListBody = self.get_json(&["api", "notebooks", "list"]).await?;
        Ok(body.notebooks)
    }

    async fn create_notebook(&self, request: &CreateNotebookRequest) -> ApiResult<Option<String>> {
        let body = to_value(request)?;
        self.post_for_message(Method::POST, &["api", "notebooks", "create"], Some(&body))
            .await
    }

    async fn notebook_url(&self, id: &str) -> ApiResult<String> {
        let body: UrlBody = self.get_json(&["api", "notebooks", id, "url"]).await?;
        body.url
            .filter(|url| !url.is_empty())
            .ok_or_else(|| ApiError::Decode(format!("no URL returned for notebook {id}")))
    }

    async fn delete_notebook(&self, id: &str) -> ApiResult<Option<String>> {
        self.post_for_message(Method::DELETE, &["api", "notebooks", id], None)
            .await
    }

    fn base_url(&self) -> &str {
        &self.base_str
    }
}
