//! The backend contract as a trait.
//!
//! Everything above the HTTP layer talks to [`ClusterApi`], so the console
//! runtime can be driven by the real [`HttpClusterApi`](crate::HttpClusterApi)
//! or by a test double.

use async_trait::async_trait;

use sparkdeck_core::{
    ApplyConfigRequest, ClusterStatus, CreateNotebookRequest, NotebookRecord,
};

use crate::error::ApiResult;

/// Operations exposed by the cluster management backend.
///
/// Mutating calls return the server-supplied `message` when the success body
/// carries one.
#[async_trait]
pub trait ClusterApi: Send + Sync {
    /// `GET /api/cluster/status`
    async fn cluster_status(&self) -> ApiResult<ClusterStatus>;

    /// `POST /api/cluster/start`
    async fn start_cluster(&self) -> ApiResult<Option<String>>;

    /// `POST /api/cluster/stop`
    async fn stop_cluster(&self) -> ApiResult<Option<String>>;

    /// `POST /api/cluster/config`
    async fn apply_config(&self, request: &ApplyConfigRequest) -> ApiResult<Option<String>>;

    /// `GET /api/cluster/logs`
    async fn cluster_logs(&self) -> ApiResult<Vec<String>>;

    /// `POST /api/cluster/logs/clear`
    async fn clear_logs(&self) -> ApiResult<()>;

    /// `GET /api/notebooks/list`
    async fn list_notebooks(&self) -> ApiResult<Vec<NotebookRecord>>;

    /// `POST /api/notebooks/create`
    async fn create_notebook(&self, request: &CreateNotebookRequest) -> ApiResult<Option<String>>;

    /// `GET /api/notebooks/{id}/url`
    async fn notebook_url(&self, id: &str) -> ApiResult<String>;

    /// `DELETE /api/notebooks/{id}`
    async fn delete_notebook(&self, id: &str) -> ApiResult<Option<String>>;

    /// Base URL requests are resolved against.
    fn base_url(&self) -> &str;
}
