//! Client for block discovery

use crate::client::ConnectClient;
use crate::error::Result;
use crate::types::ListBlocksResponse;

/// Client for block discovery
#[derive(Debug, Clone)]
pub struct BlocksClient {
    client: ConnectClient,
}

impl BlocksClient {
    pub(crate) fn new(client: ConnectClient) -> Self {
        Self { client }
    }

    /// List runnable blocks across installed packages
    pub async fn list(&self) -> Result<ListBlocksResponse> {
        let url = self.client.api_url(&["v1", "blocks"])?;
        self.client.get_json(url).await
    }
}
