//! Rust client for the OOMOL Connect API
//!
//! Wraps the workspace HTTP API for running blocks and flows as tasks,
//! installing packages, and running applets. Long-running operations
//! are driven by a shared polling engine with configurable backoff,
//! timeouts, cooperative cancellation, and incremental log delivery.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use oomol_connect::{ConnectClient, CreateTaskRequest, PollOptions};
//! use serde_json::{json, Map, Value};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = ConnectClient::builder()
//!         .base_url("http://localhost:3000/api")
//!         .api_token("oo-...")
//!         .build()?;
//!
//!     let mut inputs = Map::<String, Value>::new();
//!     inputs.insert("text".to_string(), json!("hello"));
//!
//!     let run = client
//!         .tasks()
//!         .run(
//!             CreateTaskRequest::new("audio-lab::text-to-audio").with_input_values(inputs),
//!             PollOptions::new(),
//!         )
//!         .await?;
//!
//!     println!("task {} finished: {:?}", run.task_id, run.result);
//!     Ok(())
//! }
//! ```

pub mod client;
pub mod config;
pub mod error;
pub mod input;
pub mod poll;
pub mod types;

pub use client::{
    AppletsClient, BlocksClient, ConnectClient, ConnectClientBuilder, FlowsClient,
    InstallCompletion, PackagesClient, TaskCompletion, TaskRun, TasksClient, UploadFile,
    DEFAULT_APPLETS_QUERY_URL,
};
pub use config::{
    PollOptions, DEFAULT_BACKOFF_FACTOR, DEFAULT_MAX_POLL_INTERVAL, DEFAULT_POLL_INTERVAL,
};
pub use error::{ConnectError, Result};
pub use input::{InputValue, NodeInputs, TaskInputValues, DEFAULT_NODE_ID};
pub use poll::{
    BackoffStrategy, CompositeObserver, LoggingObserver, PollObserver, PollSource, StatusKind,
};
pub use types::{
    Applet, AppletData, Block, CreateTaskRequest, Flow, InputHandle, InstallTask,
    InstallTaskStatus, Package, RunAppletRequest, Task, TaskLog, TaskStatus, BLOCK_FINISHED,
};

/// Commonly used types, importable in one line
pub mod prelude {
    pub use crate::client::{ConnectClient, ConnectClientBuilder, UploadFile};
    pub use crate::config::PollOptions;
    pub use crate::error::{ConnectError, Result};
    pub use crate::input::TaskInputValues;
    pub use crate::poll::{BackoffStrategy, PollObserver};
    pub use crate::types::{
        CreateTaskRequest, InstallTask, RunAppletRequest, Task, TaskStatus,
    };
}
