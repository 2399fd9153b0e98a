//! Client for package management
//!
//! Installation is asynchronous on the server: `install` enqueues an
//! installation task, and `wait_for_install` polls it with the same
//! engine task completion uses, minus the log stream.

use async_trait::async_trait;
use serde::Serialize;
use tracing::debug;

use crate::client::ConnectClient;
use crate::config::PollOptions;
use crate::error::{ConnectError, Result};
use crate::poll::{poll_until_terminal, PollSource, StatusKind};
use crate::types::{
    GetInstallTaskResponse, InstallPackageResponse, InstallTask, InstallTaskStatus,
    ListInstallTasksResponse, ListPackagesResponse,
};

/// Result of installing a package and waiting for the install to finish
#[derive(Debug, Clone)]
pub struct InstallCompletion {
    pub task_id: String,
    /// The terminal snapshot (status `success`)
    pub task: InstallTask,
}

#[derive(Serialize)]
struct InstallPackageBody<'a> {
    name: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    version: Option<&'a str>,
}

/// Client for package management
#[derive(Debug, Clone)]
pub struct PackagesClient {
    client: ConnectClient,
}

impl PackagesClient {
    pub(crate) fn new(client: ConnectClient) -> Self {
        Self { client }
    }

    /// List installed packages
    pub async fn list(&self) -> Result<ListPackagesResponse> {
        let url = self.client.api_url(&["packages"])?;
        self.client.get_json(url).await
    }

    /// Enqueue a package installation
    pub async fn install(
        &self,
        name: &str,
        version: Option<&str>,
    ) -> Result<InstallPackageResponse> {
        let url = self.client.api_url(&["packages", "install"])?;
        self.client
            .post_json(url, &InstallPackageBody { name, version })
            .await
    }

    /// List installation tasks
    pub async fn list_install_tasks(&self) -> Result<ListInstallTasksResponse> {
        let url = self.client.api_url(&["packages", "install"])?;
        self.client.get_json(url).await
    }

    /// Get one installation task
    pub async fn get_install_task(&self, task_id: &str) -> Result<GetInstallTaskResponse> {
        let url = self.client.api_url(&["packages", "install", task_id])?;
        self.client.get_json(url).await
    }

    /// Poll until the installation task reaches a terminal state
    pub async fn wait_for_install(
        &self,
        task_id: &str,
        options: PollOptions<InstallTask>,
    ) -> Result<InstallTask> {
        let source = InstallPollSource {
            client: self.clone(),
        };
        poll_until_terminal(&source, task_id, &options).await
    }

    /// Enqueue a package installation and wait for it to finish
    pub async fn install_and_wait(
        &self,
        name: &str,
        version: Option<&str>,
        options: PollOptions<InstallTask>,
    ) -> Result<InstallCompletion> {
        let response = self.install(name, version).await?;
        if !response.success {
            return Err(ConnectError::Protocol(response.error.unwrap_or_else(|| {
                format!("install request for package {} was rejected", name)
            })));
        }
        let task_id = response.task_id.ok_or_else(|| {
            ConnectError::Protocol(format!(
                "install request for package {} returned no task id",
                name
            ))
        })?;

        debug!(package = %name, task_id = %task_id, "package install enqueued");
        let task = self.wait_for_install(&task_id, options).await?;
        Ok(InstallCompletion { task_id, task })
    }
}

struct InstallPollSource {
    client: PackagesClient,
}

#[async_trait]
impl PollSource for InstallPollSource {
    type Status = InstallTask;

    async fn fetch_status(&self, target: &str) -> Result<InstallTask> {
        let response = self.client.get_install_task(target).await?;
        if !response.success {
            return Err(ConnectError::Protocol(response.error.unwrap_or_else(|| {
                format!("install task {} lookup failed", target)
            })));
        }
        response.task.ok_or_else(|| {
            ConnectError::Protocol(format!("install task {} not found", target))
        })
    }

    fn classify(&self, task: &InstallTask) -> StatusKind {
        match task.status {
            InstallTaskStatus::Success => StatusKind::Succeeded,
            InstallTaskStatus::Failed => StatusKind::Failed,
            InstallTaskStatus::Pending | InstallTaskStatus::Running => StatusKind::Pending,
        }
    }

    fn terminal_error(&self, target: &str, task: InstallTask, _kind: StatusKind) -> ConnectError {
        ConnectError::InstallFailed {
            task_id: target.to_string(),
            task,
        }
    }
}
