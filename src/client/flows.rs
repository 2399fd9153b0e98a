//! Client for flow discovery

use crate::client::ConnectClient;
use crate::error::Result;
use crate::types::ListFlowsResponse;

/// Client for flow discovery
#[derive(Debug, Clone)]
pub struct FlowsClient {
    client: ConnectClient,
}

impl FlowsClient {
    pub(crate) fn new(client: ConnectClient) -> Self {
        Self { client }
    }

    /// List flows defined in the workspace
    pub async fn list(&self) -> Result<ListFlowsResponse> {
        let url = self.client.api_url(&["v1", "flows"])?;
        self.client.get_json(url).await
    }
}
