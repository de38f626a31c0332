use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::infrastructure::media::model::StreamingPolicy;

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PublishLocatorRequest {
    /// Output asset produced by an encode job.
    #[validate(length(min = 1, message = "Asset name is required"))]
    pub asset_name: String,
    pub streaming_policy: StreamingPolicy,
}

/// Outcome of one step of playback URL resolution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum UrlResolution {
    Url { protocol: String, url: String },
    Failed { step: String, reason: String },
}

impl UrlResolution {
    pub fn failed(step: &str, reason: impl Into<String>) -> Self {
        UrlResolution::Failed {
            step: step.to_string(),
            reason: reason.into(),
        }
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct PublishedLocator {
    pub locator_name: String,
    pub asset_name: String,
    pub streaming_policy: StreamingPolicy,
    pub content_key_policy: Option<String>,
    pub streaming_urls: Vec<UrlResolution>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct PublishLocatorResponse {
    pub published: bool,
    pub locator_name: Option<String>,
    pub streaming_urls: Vec<UrlResolution>,
    pub errors: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct EndpointCacheResponse {
    /// Host name that was cached before clearing, if any.
    pub previous_host: Option<String>,
}
