//! Wire types for the Connect API
//!
//! Field names mirror the server's JSON exactly. Task-side objects use
//! snake_case with a couple of camelCase stragglers; package-install and
//! applet objects are camelCase throughout.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::input::{NodeInputs, TaskInputValues};

// ============ Tasks ============

/// Lifecycle state of a task
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskStatus {
    Created,
    Pending,
    Running,
    Completed,
    Failed,
    Stopped,
}

impl TaskStatus {
    /// Whether no further state change is expected
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Failed | Self::Stopped)
    }
}

/// A task snapshot as reported by the server
///
/// Fetched fresh on every poll; never mutated locally.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Task {
    pub id: String,
    pub status: TaskStatus,
    pub project_id: String,
    pub manifest_path: String,
    #[serde(
        default,
        rename = "inputValues",
        skip_serializing_if = "Option::is_none"
    )]
    pub input_values: Option<Vec<NodeInputs>>,
    /// Epoch milliseconds
    pub created_at: i64,
    /// Epoch milliseconds
    pub updated_at: i64,
}

/// One entry of a task's append-only log stream
///
/// Ids are strictly increasing per task; the poll engine uses them as a
/// high-water mark to deliver each event at most once.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskLog {
    pub id: u64,
    pub project_name: String,
    pub session_id: String,
    pub node_id: String,
    pub manifest_path: String,
    /// Event type tag, e.g. `"BlockFinished"`
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub event: Option<Value>,
    pub created_at: i64,
}

/// Log event type carrying the final block result in its payload
pub const BLOCK_FINISHED: &str = "BlockFinished";

#[derive(Debug, Clone, Deserialize)]
pub struct ListTasksResponse {
    pub tasks: Vec<Task>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateTaskResponse {
    pub task: Task,
    #[serde(rename = "userID")]
    pub user_id: String,
    pub success: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GetTaskResponse {
    pub task: Task,
    pub success: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GetTaskLogsResponse {
    pub logs: Vec<TaskLog>,
    pub success: bool,
}

/// Request for creating a task
#[derive(Debug, Clone)]
pub struct CreateTaskRequest {
    /// Block identifier in `"package::name"` form
    pub block_id: String,
    pub input_values: Option<TaskInputValues>,
}

impl CreateTaskRequest {
    pub fn new(block_id: impl Into<String>) -> Self {
        Self {
            block_id: block_id.into(),
            input_values: None,
        }
    }

    pub fn with_input_values(mut self, values: impl Into<TaskInputValues>) -> Self {
        self.input_values = Some(values.into());
        self
    }
}

// ============ Blocks ============

/// An input port exposed by a block
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InputHandle {
    pub handle: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub json_schema: Option<Value>,
}

/// A runnable block published by a package
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Block {
    pub package: String,
    pub name: String,
    pub path: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inputs: Option<Vec<InputHandle>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
}

impl Block {
    /// Block identifier in `"package::name"` form, as accepted by
    /// [`CreateTaskRequest`]
    pub fn id(&self) -> String {
        format!("{}::{}", self.package, self.name)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ListBlocksResponse {
    pub blocks: Vec<Block>,
}

// ============ Flows ============

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Flow {
    pub name: String,
    pub path: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ListFlowsResponse {
    pub flows: Vec<Flow>,
}

// ============ Packages ============

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Package {
    pub name: String,
    pub version: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ListPackagesResponse {
    pub packages: Vec<Package>,
}

/// Lifecycle state of a package installation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InstallTaskStatus {
    Pending,
    Running,
    Success,
    Failed,
}

impl InstallTaskStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Success | Self::Failed)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PackageDependency {
    pub name: String,
    pub version: String,
    pub package_path: String,
}

/// An installation-task snapshot as reported by the server
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InstallTask {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    pub status: InstallTaskStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub package_path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dependencies: Option<Vec<PackageDependency>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Epoch milliseconds
    pub created_at: i64,
    /// Epoch milliseconds
    pub updated_at: i64,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InstallPackageResponse {
    pub success: bool,
    #[serde(default)]
    pub task_id: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ListInstallTasksResponse {
    pub success: bool,
    pub tasks: Vec<InstallTask>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GetInstallTaskResponse {
    pub success: bool,
    #[serde(default)]
    pub task: Option<InstallTask>,
    #[serde(default)]
    pub error: Option<String>,
}

// ============ Applets ============

/// Applet payload: a block with preset input values
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppletData {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub id: String,
    pub created_at: i64,
    /// Package id, possibly carrying a trailing `-x.y.z` version suffix
    pub package_id: String,
    pub block_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preset_inputs: Option<Map<String, Value>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Applet {
    pub applet_id: String,
    pub user_id: String,
    pub data: AppletData,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Request for running an applet
#[derive(Debug, Clone)]
pub struct RunAppletRequest {
    pub applet_id: String,
    /// Caller-supplied values, merged over the applet's presets
    pub input_values: Option<TaskInputValues>,
}

impl RunAppletRequest {
    pub fn new(applet_id: impl Into<String>) -> Self {
        Self {
            applet_id: applet_id.into(),
            input_values: None,
        }
    }

    pub fn with_input_values(mut self, values: impl Into<TaskInputValues>) -> Self {
        self.input_values = Some(values.into());
        self
    }
}
