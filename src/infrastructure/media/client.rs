use async_trait::async_trait;
use reqwest::{Client, Method, RequestBuilder, Response, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::{debug, info, warn};

use super::MediaServicesApi;
use super::auth::TokenProvider;
use super::model::{
    Asset, AssetStreamingLocator, ContentKeyPolicy, ContentKeyPolicyOption,
    ContentKeyPolicyProperties, Job, ListPathsResponse, ListStreamingLocatorsResponse,
    StreamingEndpoint, StreamingLocator, StreamingPath, Transform, TransformOutput,
    TransformProperties,
};
use crate::common::error::{MediaError, MediaResult};
use crate::config::settings::AppConfig;

const API_VERSION: &str = "2021-11-01";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// `MediaServicesApi` over the Azure Resource Manager REST surface.
#[derive(Clone)]
pub struct ArmMediaClient {
    http: Client,
    tokens: TokenProvider,
    account_url: String,
}

impl ArmMediaClient {
    pub fn new(config: &AppConfig) -> MediaResult<Self> {
        let http = Client::builder().timeout(REQUEST_TIMEOUT).build()?;

        let tokens = TokenProvider::new(
            http.clone(),
            &config.aad_authority,
            &config.tenant_id,
            &config.arm_endpoint,
            &config.client_id,
            &config.client_secret,
        );

        let account_url = format!(
            "{}/subscriptions/{}/resourceGroups/{}/providers/Microsoft.Media/mediaServices/{}",
            config.arm_endpoint.trim_end_matches('/'),
            config.subscription_id,
            config.resource_group,
            config.account_name,
        );

        info!("✅ Media Services client ready for account {}", config.account_name);

        Ok(Self {
            http,
            tokens,
            account_url,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.account_url, path)
    }

    async fn request(&self, method: Method, path: &str) -> MediaResult<RequestBuilder> {
        let token = self.tokens.bearer().await?;
        Ok(self
            .http
            .request(method, self.url(path))
            .query(&[("api-version", API_VERSION)])
            .bearer_auth(token))
    }

    async fn get_opt<T: DeserializeOwned>(&self, path: &str) -> MediaResult<Option<T>> {
        let response = self.request(Method::GET, path).await?.send().await?;

        if response.status() == StatusCode::NOT_FOUND {
            debug!("{} not found", path);
            return Ok(None);
        }

        let response = check(response).await?;
        Ok(Some(response.json().await?))
    }

    async fn put<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> MediaResult<T> {
        let response = self.request(Method::PUT, path).await?.json(body).send().await?;
        Ok(check(response).await?.json().await?)
    }

    async fn post_action<T: DeserializeOwned>(&self, path: &str) -> MediaResult<T> {
        let response = self
            .request(Method::POST, path)
            .await?
            .header(reqwest::header::CONTENT_LENGTH, 0)
            .send()
            .await?;
        Ok(check(response).await?.json().await?)
    }

    async fn delete(&self, path: &str) -> MediaResult<()> {
        let response = self.request(Method::DELETE, path).await?.send().await?;

        // Deleting something already gone is not an error.
        if response.status() == StatusCode::NOT_FOUND {
            return Ok(());
        }

        check(response).await?;
        Ok(())
    }
}

/// Turns any non-success status into `RemoteApi`, keeping the body as sent.
async fn check(response: Response) -> MediaResult<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    Err(MediaError::RemoteApi {
        status: status.as_u16(),
        body: error_body(response).await,
    })
}

/// Body of a failed response. A body that cannot be read is described
/// rather than dropped.
pub(crate) async fn error_body(response: Response) -> String {
    describe_body(response.text().await)
}

fn describe_body<E: std::fmt::Display>(read: Result<String, E>) -> String {
    read.unwrap_or_else(|e| {
        warn!(error = %e, "Failed to read error response body");
        format!("<failed to read response body: {}>", e)
    })
}

#[async_trait]
impl MediaServicesApi for ArmMediaClient {
    async fn get_transform(&self, name: &str) -> MediaResult<Option<Transform>> {
        self.get_opt(&format!("transforms/{}", name)).await
    }

    async fn create_or_update_transform(
        &self,
        name: &str,
        outputs: Vec<TransformOutput>,
    ) -> MediaResult<Transform> {
        let body = Transform::new(
            name,
            TransformProperties {
                description: None,
                outputs,
            },
        );
        self.put(&format!("transforms/{}", name), &body).await
    }

    async fn get_asset(&self, name: &str) -> MediaResult<Option<Asset>> {
        self.get_opt(&format!("assets/{}", name)).await
    }

    async fn create_or_update_asset(&self, name: &str, asset: &Asset) -> MediaResult<Asset> {
        self.put(&format!("assets/{}", name), asset).await
    }

    async fn create_job(&self, transform_name: &str, job_name: &str, job: &Job) -> MediaResult<Job> {
        self.put(&format!("transforms/{}/jobs/{}", transform_name, job_name), job)
            .await
    }

    async fn get_job(&self, transform_name: &str, job_name: &str) -> MediaResult<Option<Job>> {
        self.get_opt(&format!("transforms/{}/jobs/{}", transform_name, job_name))
            .await
    }

    async fn get_streaming_locator(&self, name: &str) -> MediaResult<Option<StreamingLocator>> {
        self.get_opt(&format!("streamingLocators/{}", name)).await
    }

    async fn create_streaming_locator(
        &self,
        name: &str,
        locator: &StreamingLocator,
    ) -> MediaResult<StreamingLocator> {
        self.put(&format!("streamingLocators/{}", name), locator).await
    }

    async fn delete_streaming_locator(&self, name: &str) -> MediaResult<()> {
        self.delete(&format!("streamingLocators/{}", name)).await
    }

    async fn list_asset_streaming_locators(
        &self,
        asset_name: &str,
    ) -> MediaResult<Vec<AssetStreamingLocator>> {
        let response: ListStreamingLocatorsResponse = self
            .post_action(&format!("assets/{}/listStreamingLocators", asset_name))
            .await?;
        Ok(response.streaming_locators)
    }

    async fn list_streaming_paths(&self, locator_name: &str) -> MediaResult<Vec<StreamingPath>> {
        let response: ListPathsResponse = self
            .post_action(&format!("streamingLocators/{}/listPaths", locator_name))
            .await?;
        Ok(response.streaming_paths)
    }

    async fn get_streaming_endpoint(&self, name: &str) -> MediaResult<Option<StreamingEndpoint>> {
        self.get_opt(&format!("streamingEndpoints/{}", name)).await
    }

    async fn get_content_key_policy(&self, name: &str) -> MediaResult<Option<ContentKeyPolicy>> {
        self.get_opt(&format!("contentKeyPolicies/{}", name)).await
    }

    async fn create_or_update_content_key_policy(
        &self,
        name: &str,
        options: Vec<ContentKeyPolicyOption>,
    ) -> MediaResult<ContentKeyPolicy> {
        let body = ContentKeyPolicy::new(
            name,
            ContentKeyPolicyProperties {
                description: None,
                options,
            },
        );
        self.put(&format!("contentKeyPolicies/{}", name), &body).await
    }

    async fn delete_content_key_policy(&self, name: &str) -> MediaResult<()> {
        self.delete(&format!("contentKeyPolicies/{}", name)).await
    }
}
