//! HTTP client for the Connect API

mod applets;
mod blocks;
mod builder;
mod flows;
mod http;
mod packages;
mod tasks;

pub use applets::AppletsClient;
pub use blocks::BlocksClient;
pub use builder::{ConnectClientBuilder, DEFAULT_APPLETS_QUERY_URL};
pub use flows::FlowsClient;
pub use http::ConnectClient;
pub use packages::{InstallCompletion, PackagesClient};
pub use tasks::{TaskCompletion, TaskRun, TasksClient, UploadFile};
