//! HTTP client for the study planner's task endpoints.
//!
//! `POST {base}/api/tasks/start/{id}` and `POST {base}/api/tasks/complete/{id}`,
//! both answering `{"success": bool, ...}`.

use std::time::Duration;

use reqwest::header::CONTENT_TYPE;
use reqwest::Client;
use serde::Deserialize;
use tracing::debug;
use url::Url;

use super::traits::TaskApi;
use crate::error::{Result, TaskApiError};
use crate::storage::ApiConfig;
use crate::timer::{TaskId, TaskStatus};

#[derive(Debug, Deserialize)]
struct StatusReply {
    #[serde(default)]
    success: bool,
}

#[derive(Debug, Clone)]
pub struct HttpTaskApi {
    client: Client,
    base_url: Url,
}

impl HttpTaskApi {
    /// # Errors
    /// Returns an error if `base_url` is not an http(s)-style URL or the
    /// client cannot be built.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let base_url = Url::parse(base_url).map_err(TaskApiError::from)?;
        if base_url.cannot_be_a_base() {
            return Err(TaskApiError::NotHierarchical(base_url.to_string()).into());
        }
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(TaskApiError::Client)?;
        Ok(Self { client, base_url })
    }

    /// # Errors
    /// See [`HttpTaskApi::new`].
    pub fn from_config(config: &ApiConfig) -> Result<Self> {
        Self::new(&config.base_url, Duration::from_secs(config.timeout_secs))
    }

    /// Full endpoint URL; the task id is percent-encoded as one segment.
    pub fn endpoint(&self, task_id: &TaskId, status: TaskStatus) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments
                .pop_if_empty()
                .extend(["api", "tasks", status.endpoint_segment(), task_id.as_str()]);
        }
        url
    }
}

impl TaskApi for HttpTaskApi {
    async fn update_status(&self, task_id: &TaskId, status: TaskStatus) -> Result<bool> {
        let url = self.endpoint(task_id, status);
        let endpoint = url.path().to_string();
        debug!(%url, "posting task status");

        let resp = self
            .client
            .post(url)
            .header(CONTENT_TYPE, "application/json")
            .send()
            .await
            .map_err(|source| TaskApiError::Transport {
                endpoint: endpoint.clone(),
                source,
            })?;

        if !resp.status().is_success() {
            return Err(TaskApiError::Status {
                endpoint,
                status: resp.status().as_u16(),
            }
            .into());
        }

        let reply: StatusReply = resp
            .json()
            .await
            .map_err(|e| TaskApiError::MalformedResponse {
                endpoint,
                message: e.to_string(),
            })?;
        Ok(reply.success)
    }
}
