//! Client for applets
//!
//! Applets are blocks bundled with preset input values, served by a
//! separate query service rather than the workspace API. Running one
//! resolves the applet, merges its presets with the caller's inputs,
//! and delegates to the regular task run path.

use serde_json::{json, Map, Value};
use tracing::debug;

use crate::client::{ConnectClient, TaskRun};
use crate::config::PollOptions;
use crate::error::{ConnectError, Result};
use crate::input::TaskInputValues;
use crate::types::{Applet, CreateTaskRequest, RunAppletRequest, Task};

/// Client for applets
#[derive(Debug, Clone)]
pub struct AppletsClient {
    client: ConnectClient,
}

impl AppletsClient {
    pub(crate) fn new(client: ConnectClient) -> Self {
        Self { client }
    }

    /// List applets from the query service
    pub async fn list(&self) -> Result<Vec<Applet>> {
        let url = self.client.applets_url(&["rpc", "listApplets"])?;
        self.client.post_json(url, &json!({})).await
    }

    /// Run an applet and collect its logs and result
    ///
    /// Caller-supplied input values override the applet's presets where
    /// the handles collide; presets fill in the rest.
    pub async fn run(
        &self,
        request: RunAppletRequest,
        options: PollOptions<Task>,
    ) -> Result<TaskRun> {
        let applets = self.list().await?;
        let applet = applets
            .into_iter()
            .find(|applet| applet.applet_id == request.applet_id)
            .ok_or_else(|| ConnectError::AppletNotFound(request.applet_id.clone()))?;

        let inputs = merge_input_values(applet.data.preset_inputs, request.input_values);
        let block_id = format!(
            "{}::{}",
            strip_package_version(&applet.data.package_id),
            applet.data.block_name
        );
        debug!(applet_id = %request.applet_id, block_id = %block_id, "running applet");

        let task_request = CreateTaskRequest::new(block_id).with_input_values(inputs);
        self.client.tasks().run(task_request, options).await
    }
}

/// Merge preset and caller inputs into one flat map, caller wins
fn merge_input_values(
    presets: Option<Map<String, Value>>,
    user: Option<TaskInputValues>,
) -> TaskInputValues {
    let mut merged = presets.unwrap_or_default();
    if let Some(user) = user {
        for (handle, value) in user.flatten() {
            merged.insert(handle, value);
        }
    }
    TaskInputValues::Map(merged)
}

/// Strip a trailing `-x.y.z` version suffix from a package id
///
/// `"json-repair-1.0.1"` becomes `"json-repair"`; ids without the
/// suffix pass through unchanged.
fn strip_package_version(package_id: &str) -> &str {
    let Some((name, version)) = package_id.rsplit_once('-') else {
        return package_id;
    };

    let numeric = |part: &str| !part.is_empty() && part.bytes().all(|b| b.is_ascii_digit());
    let parts: Vec<&str> = version.split('.').collect();
    if parts.len() == 3 && parts.iter().all(|part| numeric(part)) {
        name
    } else {
        package_id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_package_version() {
        assert_eq!(strip_package_version("json-repair-1.0.1"), "json-repair");
        assert_eq!(strip_package_version("audio-lab-10.22.3"), "audio-lab");
        assert_eq!(strip_package_version("json-repair"), "json-repair");
        assert_eq!(strip_package_version("ffmpeg-0.2"), "ffmpeg-0.2");
        assert_eq!(strip_package_version("pkg-1.x.3"), "pkg-1.x.3");
        assert_eq!(strip_package_version("1.0.1"), "1.0.1");
    }

    #[test]
    fn test_merge_user_overrides_presets() {
        let mut presets = Map::new();
        presets.insert("mode".to_string(), json!("strict"));
        presets.insert("limit".to_string(), json!(10));

        let user: TaskInputValues =
            serde_json::from_value(json!({"mode": "lenient"})).unwrap();

        let merged = merge_input_values(Some(presets), Some(user));
        let flat = merged.flatten();
        assert_eq!(flat.get("mode"), Some(&json!("lenient")));
        assert_eq!(flat.get("limit"), Some(&json!(10)));
    }

    #[test]
    fn test_merge_without_presets() {
        let user: TaskInputValues = serde_json::from_value(json!({"text": "hi"})).unwrap();
        let merged = merge_input_values(None, Some(user));
        assert_eq!(merged.flatten().get("text"), Some(&json!("hi")));

        let empty = merge_input_values(None, None);
        assert!(empty.flatten().is_empty());
    }

    #[test]
    fn test_merge_flattens_handle_list() {
        let mut presets = Map::new();
        presets.insert("voice".to_string(), json!("alloy"));

        let user: TaskInputValues =
            serde_json::from_value(json!([{"handle": "text", "value": "hello"}])).unwrap();

        let merged = merge_input_values(Some(presets), Some(user));
        let flat = merged.flatten();
        assert_eq!(flat.get("voice"), Some(&json!("alloy")));
        assert_eq!(flat.get("text"), Some(&json!("hello")));
    }
}
