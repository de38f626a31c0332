pub mod auth;
pub mod client;
pub mod model;

#[cfg(test)]
pub mod fake;

use async_trait::async_trait;

use crate::common::error::MediaResult;
use model::{
    Asset, AssetStreamingLocator, ContentKeyPolicy, ContentKeyPolicyOption, Job, StreamingEndpoint,
    StreamingLocator, StreamingPath, Transform, TransformOutput,
};

/// Control-plane operations of the media account.
///
/// Lookups return `Ok(None)` when the platform reports the resource as
/// absent; every other non-success response is a `MediaError::RemoteApi`.
#[async_trait]
pub trait MediaServicesApi: Send + Sync {
    async fn get_transform(&self, name: &str) -> MediaResult<Option<Transform>>;

    async fn create_or_update_transform(
        &self,
        name: &str,
        outputs: Vec<TransformOutput>,
    ) -> MediaResult<Transform>;

    async fn get_asset(&self, name: &str) -> MediaResult<Option<Asset>>;

    async fn create_or_update_asset(&self, name: &str, asset: &Asset) -> MediaResult<Asset>;

    async fn create_job(&self, transform_name: &str, job_name: &str, job: &Job) -> MediaResult<Job>;

    async fn get_job(&self, transform_name: &str, job_name: &str) -> MediaResult<Option<Job>>;

    async fn get_streaming_locator(&self, name: &str) -> MediaResult<Option<StreamingLocator>>;

    async fn create_streaming_locator(
        &self,
        name: &str,
        locator: &StreamingLocator,
    ) -> MediaResult<StreamingLocator>;

    async fn delete_streaming_locator(&self, name: &str) -> MediaResult<()>;

    async fn list_asset_streaming_locators(
        &self,
        asset_name: &str,
    ) -> MediaResult<Vec<AssetStreamingLocator>>;

    async fn list_streaming_paths(&self, locator_name: &str) -> MediaResult<Vec<StreamingPath>>;

    async fn get_streaming_endpoint(&self, name: &str) -> MediaResult<Option<StreamingEndpoint>>;

    async fn get_content_key_policy(&self, name: &str) -> MediaResult<Option<ContentKeyPolicy>>;

    async fn create_or_update_content_key_policy(
        &self,
        name: &str,
        options: Vec<ContentKeyPolicyOption>,
    ) -> MediaResult<ContentKeyPolicy>;

    async fn delete_content_key_policy(&self, name: &str) -> MediaResult<()>;
}
