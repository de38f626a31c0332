use tokio::sync::RwLock;
use tracing::info;

use crate::common::error::{MediaError, MediaResult};
use crate::infrastructure::media::MediaServicesApi;

pub const DEFAULT_STREAMING_ENDPOINT: &str = "default";

/// Host name of the default streaming endpoint, looked up once and kept
/// until invalidated.
#[derive(Debug, Default)]
pub struct StreamingEndpointCache {
    host: RwLock<Option<String>>,
}

impl StreamingEndpointCache {
    pub async fn host(&self, media: &dyn MediaServicesApi) -> MediaResult<String> {
        if let Some(host) = self.host.read().await.as_ref() {
            return Ok(host.clone());
        }

        // Concurrent first lookups may both hit the platform; the last write wins.
        let host = media
            .get_streaming_endpoint(DEFAULT_STREAMING_ENDPOINT)
            .await?
            .and_then(|endpoint| endpoint.properties.host_name)
            .filter(|host| !host.is_empty())
            .ok_or_else(|| MediaError::not_found("streaming endpoint", DEFAULT_STREAMING_ENDPOINT))?;

        *self.host.write().await = Some(host.clone());
        info!(host = %host, "Default streaming endpoint host cached");
        Ok(host)
    }

    pub async fn cached(&self) -> Option<String> {
        self.host.read().await.clone()
    }

    pub async fn invalidate(&self) {
        *self.host.write().await = None;
        info!("Default streaming endpoint host cache cleared");
    }
}
