//! # sparkdeck-client
//!
//! Client for the cluster management backend.
//!
//! This crate provides:
//! - [`ClusterApi`] - The backend contract (cluster lifecycle, logs, notebooks)
//! - [`HttpClusterApi`] - reqwest implementation against a configurable base URL
//! - [`ApiError`] - Transport vs. application failures, with readable `detail`
//!
//! ## Endpoints
//!
//! | Method | Path |
//! |---|---|
//! | GET | `/api/cluster/status` |
//! | POST | `/api/cluster/start`, `/api/cluster/stop` |
//! | POST | `/api/cluster/config` |
//! | GET | `/api/cluster/logs` |
//! | POST | `/api/cluster/logs/clear` |
//! | GET | `/api/notebooks/list` |
//! | POST | `/api/notebooks/create` |
//! | GET | `/api/notebooks/{id}/url` |
//! | DELETE | `/api/notebooks/{id}` |

pub mod api;
pub mod error;
pub mod http;

pub use api::ClusterApi;
pub use error::{ApiError, ApiResult, render_detail};
pub use http::HttpClusterApi;
