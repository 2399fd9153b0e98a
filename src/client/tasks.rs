//! Client for task operations

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use serde::Serialize;
use serde_json::Value;
use tracing::debug;

use crate::client::ConnectClient;
use crate::config::PollOptions;
use crate::error::{ConnectError, Result};
use crate::input::NodeInputs;
use crate::poll::{poll_until_terminal, PollSource, StatusKind};
use crate::types::{
    CreateTaskRequest, CreateTaskResponse, GetTaskLogsResponse, GetTaskResponse,
    ListTasksResponse, Task, TaskLog, TaskStatus, BLOCK_FINISHED,
};

/// Result of creating a task and waiting for it to finish
#[derive(Debug, Clone)]
pub struct TaskCompletion {
    pub task_id: String,
    /// The terminal snapshot (status `completed`)
    pub task: Task,
}

/// Result of running a task end to end
#[derive(Debug, Clone)]
pub struct TaskRun {
    pub task_id: String,
    pub task: Task,
    /// The full log set, fetched once after completion
    pub logs: Vec<TaskLog>,
    /// Result extracted from the first `BlockFinished` log event that
    /// carries one; `None` when the task produced no such event
    pub result: Option<Value>,
}

/// A file attached to a multipart task creation
#[derive(Debug, Clone)]
pub struct UploadFile {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

impl UploadFile {
    pub fn new(file_name: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            file_name: file_name.into(),
            bytes: bytes.into(),
        }
    }
}

#[derive(Serialize)]
struct CreateTaskBody {
    manifest: String,
    #[serde(rename = "inputValues", skip_serializing_if = "Option::is_none")]
    input_values: Option<Vec<NodeInputs>>,
}

/// Client for task operations
#[derive(Debug, Clone)]
pub struct TasksClient {
    client: ConnectClient,
}

impl TasksClient {
    pub(crate) fn new(client: ConnectClient) -> Self {
        Self { client }
    }

    /// List all tasks
    pub async fn list(&self) -> Result<ListTasksResponse> {
        let url = self.client.api_url(&["v1", "tasks"])?;
        self.client.get_json(url).await
    }

    /// Create a task (JSON body)
    pub async fn create(&self, request: CreateTaskRequest) -> Result<CreateTaskResponse> {
        let url = self.client.api_url(&["v1", "tasks"])?;
        let body = CreateTaskBody {
            manifest: request.block_id,
            input_values: request.input_values.map(|values| values.normalize()),
        };
        self.client.post_json(url, &body).await
    }

    /// Create a task with file uploads (multipart body)
    pub async fn create_with_files(
        &self,
        request: CreateTaskRequest,
        files: Vec<UploadFile>,
    ) -> Result<CreateTaskResponse> {
        let url = self.client.api_url(&["v1", "tasks"])?;
        let input_values = request
            .input_values
            .map(|values| values.normalize())
            .unwrap_or_default();

        let mut form = Form::new()
            .text("manifest", request.block_id)
            .text("inputValues", serde_json::to_string(&input_values)?);
        for file in files {
            form = form.part("files", Part::bytes(file.bytes).file_name(file.file_name));
        }

        self.client.post_multipart(url, form).await
    }

    /// Get task details
    pub async fn get(&self, task_id: &str) -> Result<GetTaskResponse> {
        let url = self.client.api_url(&["v1", "tasks", task_id])?;
        self.client.get_json(url).await
    }

    /// Request the task be stopped
    pub async fn stop(&self, task_id: &str) -> Result<GetTaskResponse> {
        let url = self.client.api_url(&["v1", "tasks", task_id, "stop"])?;
        self.client.post_empty(url).await
    }

    /// Get the task's full log set
    pub async fn logs(&self, task_id: &str) -> Result<GetTaskLogsResponse> {
        let url = self.client.api_url(&["v1", "tasks", task_id, "logs"])?;
        self.client.get_json(url).await
    }

    /// Poll until the task reaches a terminal state
    ///
    /// Returns the completed task, or [`ConnectError::TaskFailed`] /
    /// [`ConnectError::TaskStopped`] carrying the terminal snapshot,
    /// or [`ConnectError::Timeout`] on cancellation or deadline expiry.
    pub async fn wait_for_completion(
        &self,
        task_id: &str,
        options: PollOptions<Task>,
    ) -> Result<Task> {
        let source = TaskPollSource {
            client: self.clone(),
        };
        poll_until_terminal(&source, task_id, &options).await
    }

    /// Create a task and wait for it to finish
    pub async fn create_and_wait(
        &self,
        request: CreateTaskRequest,
        options: PollOptions<Task>,
    ) -> Result<TaskCompletion> {
        let created = self.create(request).await?;
        let task_id = created.task.id;
        debug!(task_id = %task_id, "task created, waiting for completion");
        let task = self.wait_for_completion(&task_id, options).await?;
        Ok(TaskCompletion { task_id, task })
    }

    /// Create a task with file uploads and wait for it to finish
    pub async fn create_with_files_and_wait(
        &self,
        request: CreateTaskRequest,
        files: Vec<UploadFile>,
        options: PollOptions<Task>,
    ) -> Result<TaskCompletion> {
        let created = self.create_with_files(request, files).await?;
        let task_id = created.task.id;
        debug!(task_id = %task_id, "task created, waiting for completion");
        let task = self.wait_for_completion(&task_id, options).await?;
        Ok(TaskCompletion { task_id, task })
    }

    /// Create a task, wait for completion, and collect logs and result
    pub async fn run(
        &self,
        request: CreateTaskRequest,
        options: PollOptions<Task>,
    ) -> Result<TaskRun> {
        let completion = self.create_and_wait(request, options).await?;
        self.collect_run(completion).await
    }

    /// [`TasksClient::run`] with file uploads
    pub async fn run_with_files(
        &self,
        request: CreateTaskRequest,
        files: Vec<UploadFile>,
        options: PollOptions<Task>,
    ) -> Result<TaskRun> {
        let completion = self
            .create_with_files_and_wait(request, files, options)
            .await?;
        self.collect_run(completion).await
    }

    async fn collect_run(&self, completion: TaskCompletion) -> Result<TaskRun> {
        let logs = self.logs(&completion.task_id).await?.logs;
        let result = extract_block_result(&logs);
        Ok(TaskRun {
            task_id: completion.task_id,
            task: completion.task,
            logs,
            result,
        })
    }
}

/// First `BlockFinished` event payload carrying a non-null `result`
fn extract_block_result(logs: &[TaskLog]) -> Option<Value> {
    logs.iter()
        .filter(|log| log.kind == BLOCK_FINISHED)
        .find_map(|log| match log.event.as_ref()?.get("result") {
            None | Some(Value::Null) => None,
            Some(value) => Some(value.clone()),
        })
}

struct TaskPollSource {
    client: TasksClient,
}

#[async_trait]
impl PollSource for TaskPollSource {
    type Status = Task;

    async fn fetch_status(&self, target: &str) -> Result<Task> {
        Ok(self.client.get(target).await?.task)
    }

    fn classify(&self, task: &Task) -> StatusKind {
        match task.status {
            TaskStatus::Completed => StatusKind::Succeeded,
            TaskStatus::Failed => StatusKind::Failed,
            TaskStatus::Stopped => StatusKind::Stopped,
            TaskStatus::Created | TaskStatus::Pending | TaskStatus::Running => StatusKind::Pending,
        }
    }

    fn terminal_error(&self, target: &str, task: Task, kind: StatusKind) -> ConnectError {
        match kind {
            StatusKind::Stopped => ConnectError::TaskStopped {
                task_id: target.to_string(),
                task,
            },
            _ => ConnectError::TaskFailed {
                task_id: target.to_string(),
                task,
            },
        }
    }

    async fn fetch_logs(&self, target: &str) -> Result<Vec<TaskLog>> {
        Ok(self.client.logs(target).await?.logs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn log(id: u64, kind: &str, event: Option<Value>) -> TaskLog {
        TaskLog {
            id,
            project_name: "demo".to_string(),
            session_id: "s-1".to_string(),
            node_id: "n-1".to_string(),
            manifest_path: "flows/demo".to_string(),
            kind: kind.to_string(),
            event,
            created_at: 0,
        }
    }

    #[test]
    fn test_extract_block_result() {
        let logs = vec![
            log(1, "BlockStarted", None),
            log(2, BLOCK_FINISHED, Some(json!({"result": {"text": "ok"}}))),
            log(3, BLOCK_FINISHED, Some(json!({"result": "second"}))),
        ];

        assert_eq!(extract_block_result(&logs), Some(json!({"text": "ok"})));
    }

    #[test]
    fn test_extract_block_result_skips_null() {
        // A null result does not count as a result; the search moves on
        // to the next BlockFinished event.
        let logs = vec![
            log(1, BLOCK_FINISHED, Some(json!({"result": null}))),
            log(2, BLOCK_FINISHED, Some(json!({"result": "real"}))),
        ];

        assert_eq!(extract_block_result(&logs), Some(json!("real")));

        let only_null = vec![log(1, BLOCK_FINISHED, Some(json!({"result": null})))];
        assert_eq!(extract_block_result(&only_null), None);
    }

    #[test]
    fn test_extract_block_result_missing() {
        // A BlockFinished event without a result field yields nothing.
        let logs = vec![
            log(1, "BlockStarted", None),
            log(2, BLOCK_FINISHED, Some(json!({"elapsed": 12}))),
        ];

        assert_eq!(extract_block_result(&logs), None);
        assert_eq!(extract_block_result(&[]), None);
    }

    #[test]
    fn test_create_body_shape() {
        let request = CreateTaskRequest::new("audio-lab::text-to-audio").with_input_values(
            serde_json::from_value::<crate::input::TaskInputValues>(json!({"text": "hi"}))
                .unwrap(),
        );
        let body = CreateTaskBody {
            manifest: request.block_id,
            input_values: request.input_values.map(|values| values.normalize()),
        };

        assert_eq!(
            serde_json::to_value(&body).unwrap(),
            json!({
                "manifest": "audio-lab::text-to-audio",
                "inputValues": [
                    {"nodeId": "_", "inputs": [{"handle": "text", "value": "hi"}]}
                ],
            })
        );
    }

    fn fake_source() -> TaskPollSource {
        let client = ConnectClient::builder()
            .base_url("http://localhost:3000/api")
            .build()
            .unwrap();
        TaskPollSource {
            client: client.tasks(),
        }
    }

    fn task(status: TaskStatus) -> Task {
        Task {
            id: "t-1".to_string(),
            status,
            project_id: "p-1".to_string(),
            manifest_path: "flows/demo".to_string(),
            input_values: None,
            created_at: 1,
            updated_at: 2,
        }
    }

    #[test]
    fn test_classify_covers_every_status() {
        let source = fake_source();
        assert_eq!(
            source.classify(&task(TaskStatus::Completed)),
            StatusKind::Succeeded
        );
        assert_eq!(source.classify(&task(TaskStatus::Failed)), StatusKind::Failed);
        assert_eq!(
            source.classify(&task(TaskStatus::Stopped)),
            StatusKind::Stopped
        );
        for status in [TaskStatus::Created, TaskStatus::Pending, TaskStatus::Running] {
            assert_eq!(source.classify(&task(status)), StatusKind::Pending);
        }
    }

    #[test]
    fn test_terminal_error_carries_snapshot() {
        let source = fake_source();

        let err = source.terminal_error("t-1", task(TaskStatus::Stopped), StatusKind::Stopped);
        match err {
            ConnectError::TaskStopped { task_id, task } => {
                assert_eq!(task_id, "t-1");
                assert_eq!(task.status, TaskStatus::Stopped);
            }
            other => panic!("expected TaskStopped, got {:?}", other),
        }

        let err = source.terminal_error("t-1", task(TaskStatus::Failed), StatusKind::Failed);
        match err {
            ConnectError::TaskFailed { task_id, task } => {
                assert_eq!(task_id, "t-1");
                assert_eq!(task.status, TaskStatus::Failed);
            }
            other => panic!("expected TaskFailed, got {:?}", other),
        }
    }

    #[test]
    fn test_create_body_omits_absent_inputs() {
        let body = CreateTaskBody {
            manifest: "pkg::block".to_string(),
            input_values: None,
        };

        assert_eq!(
            serde_json::to_value(&body).unwrap(),
            json!({"manifest": "pkg::block"})
        );
    }
}
