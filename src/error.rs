//! Error types for the Connect SDK

use crate::types::{InstallTask, Task};

/// Main error type for the Connect SDK
#[derive(Debug, thiserror::Error)]
pub enum ConnectError {
    /// The server answered with a non-2xx status code
    ///
    /// Carries the parsed error body when the server returned JSON,
    /// the raw text wrapped in a JSON string otherwise, or `None` when
    /// the body could not be read at all.
    #[error("HTTP {status}")]
    Api {
        status: u16,
        body: Option<serde_json::Value>,
    },

    /// Transport-level failure (connection, TLS, body decoding)
    #[error("HTTP transport error: {0}")]
    Http(#[from] reqwest::Error),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The polled task reached the `failed` state
    #[error("Task {task_id} failed")]
    TaskFailed { task_id: String, task: Task },

    /// The polled task was stopped by another actor
    #[error("Task {task_id} was stopped")]
    TaskStopped { task_id: String, task: Task },

    /// The polled package installation reached the `failed` state
    #[error("Package installation {task_id} failed")]
    InstallFailed { task_id: String, task: InstallTask },

    /// Polling was cancelled or exceeded its deadline
    ///
    /// Covers both caller-initiated cancellation and deadline expiry;
    /// callers that need to tell them apart can inspect their own
    /// cancellation token.
    #[error("Timeout: {0}")]
    Timeout(String),

    /// The server response violated the expected protocol shape
    /// (reported failure, or omitted a required identifier)
    #[error("Protocol error: {0}")]
    Protocol(String),

    /// No applet with the requested id exists
    #[error("Applet not found: {0}")]
    AppletNotFound(String),

    /// Invalid client or polling configuration
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),
}

/// Result type alias for Connect SDK operations
pub type Result<T> = std::result::Result<T, ConnectError>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::TaskStatus;

    fn sample_task(status: TaskStatus) -> Task {
        Task {
            id: "task-1".to_string(),
            status,
            project_id: "proj".to_string(),
            manifest_path: "flows/demo".to_string(),
            input_values: None,
            created_at: 1,
            updated_at: 2,
        }
    }

    #[test]
    fn test_error_display() {
        let err = ConnectError::Api {
            status: 404,
            body: None,
        };
        assert_eq!(err.to_string(), "HTTP 404");

        let err = ConnectError::TaskFailed {
            task_id: "task-1".to_string(),
            task: sample_task(TaskStatus::Failed),
        };
        assert_eq!(err.to_string(), "Task task-1 failed");

        let err = ConnectError::TaskStopped {
            task_id: "task-1".to_string(),
            task: sample_task(TaskStatus::Stopped),
        };
        assert_eq!(err.to_string(), "Task task-1 was stopped");

        let err = ConnectError::Timeout("Task polling exceeded 500ms".to_string());
        assert_eq!(err.to_string(), "Timeout: Task polling exceeded 500ms");
    }

    #[test]
    fn test_error_from_serde_json() {
        let result: std::result::Result<serde_json::Value, serde_json::Error> =
            serde_json::from_str("not json");
        let err: ConnectError = result.unwrap_err().into();
        assert!(matches!(err, ConnectError::Serialization(_)));
    }

    #[test]
    fn test_result_type() {
        fn returns_ok() -> Result<i32> {
            Ok(42)
        }

        assert_eq!(returns_ok().unwrap(), 42);
    }
}
