//! In-memory media account used by the unit tests.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;

use super::MediaServicesApi;
use super::model::{
    Asset, AssetStreamingLocator, ContentKeyPolicy, ContentKeyPolicyOption,
    ContentKeyPolicyProperties, Job, JobState, Resource, StreamingEndpoint, StreamingEndpointProperties,
    StreamingLocator, StreamingPath, Transform, TransformOutput, TransformProperties,
};
use crate::common::error::{MediaError, MediaResult};

#[derive(Default)]
struct Account {
    transforms: HashMap<String, Transform>,
    assets: HashMap<String, Asset>,
    jobs: HashMap<(String, String), Job>,
    locators: HashMap<String, StreamingLocator>,
    endpoints: HashMap<String, StreamingEndpoint>,
    policies: HashMap<String, ContentKeyPolicy>,
    paths: HashMap<String, Vec<StreamingPath>>,
}

#[derive(Default)]
pub struct FakeMediaServices {
    account: Mutex<Account>,
    calls: Mutex<Vec<String>>,
    failures: Mutex<HashMap<&'static str, (u16, String)>>,
}

impl FakeMediaServices {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_default_endpoint(self, host: &str) -> Self {
        self.account.lock().unwrap().endpoints.insert(
            "default".to_string(),
            StreamingEndpoint::new(
                "default",
                StreamingEndpointProperties {
                    host_name: Some(host.to_string()),
                    resource_state: Some("Running".to_string()),
                },
            ),
        );
        self
    }

    /// Makes every call to `operation` fail with a platform error.
    pub fn fail(&self, operation: &'static str, status: u16, body: &str) {
        self.failures
            .lock()
            .unwrap()
            .insert(operation, (status, body.to_string()));
    }

    pub fn set_paths(&self, locator_name: &str, paths: Vec<StreamingPath>) {
        self.account
            .lock()
            .unwrap()
            .paths
            .insert(locator_name.to_string(), paths);
    }

    pub fn set_endpoint_host(&self, host: &str) {
        if let Some(endpoint) = self.account.lock().unwrap().endpoints.get_mut("default") {
            endpoint.properties.host_name = Some(host.to_string());
        }
    }

    pub fn insert_transform(&self, transform: Transform) {
        self.account
            .lock()
            .unwrap()
            .transforms
            .insert(transform.name.clone(), transform);
    }

    pub fn insert_policy(&self, policy: ContentKeyPolicy) {
        self.account
            .lock()
            .unwrap()
            .policies
            .insert(policy.name.clone(), policy);
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn count(&self, operation: &str) -> usize {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|c| c.split(':').next() == Some(operation))
            .count()
    }

    pub fn asset(&self, name: &str) -> Option<Asset> {
        self.account.lock().unwrap().assets.get(name).cloned()
    }

    pub fn locator(&self, name: &str) -> Option<StreamingLocator> {
        self.account.lock().unwrap().locators.get(name).cloned()
    }

    pub fn policy(&self, name: &str) -> Option<ContentKeyPolicy> {
        self.account.lock().unwrap().policies.get(name).cloned()
    }

    fn record(&self, operation: &'static str, name: &str) -> MediaResult<()> {
        self.calls
            .lock()
            .unwrap()
            .push(format!("{}:{}", operation, name));

        match self.failures.lock().unwrap().get(operation) {
            Some((status, body)) => Err(MediaError::RemoteApi {
                status: *status,
                body: body.clone(),
            }),
            None => Ok(()),
        }
    }
}

fn with_identity<P>(mut resource: Resource<P>, kind: &str, name: &str) -> Resource<P> {
    resource.id = Some(format!("/fake/{}/{}", kind, name));
    resource.name = name.to_string();
    resource
}

#[async_trait]
impl MediaServicesApi for FakeMediaServices {
    async fn get_transform(&self, name: &str) -> MediaResult<Option<Transform>> {
        self.record("get_transform", name)?;
        Ok(self.account.lock().unwrap().transforms.get(name).cloned())
    }

    async fn create_or_update_transform(
        &self,
        name: &str,
        outputs: Vec<TransformOutput>,
    ) -> MediaResult<Transform> {
        self.record("create_transform", name)?;
        let transform = with_identity(
            Transform::new(name, TransformProperties { description: None, outputs }),
            "transforms",
            name,
        );
        self.insert_transform(transform.clone());
        Ok(transform)
    }

    async fn get_asset(&self, name: &str) -> MediaResult<Option<Asset>> {
        self.record("get_asset", name)?;
        Ok(self.asset(name))
    }

    async fn create_or_update_asset(&self, name: &str, asset: &Asset) -> MediaResult<Asset> {
        self.record("create_asset", name)?;
        let mut created = with_identity(asset.clone(), "assets", name);
        created.properties.asset_id = Some(format!("asset-id-{}", name));
        self.account
            .lock()
            .unwrap()
            .assets
            .insert(name.to_string(), created.clone());
        Ok(created)
    }

    async fn create_job(&self, transform_name: &str, job_name: &str, job: &Job) -> MediaResult<Job> {
        self.record("create_job", job_name)?;
        let mut created = with_identity(job.clone(), "jobs", job_name);
        created.properties.state = Some(JobState::Queued);
        self.account
            .lock()
            .unwrap()
            .jobs
            .insert((transform_name.to_string(), job_name.to_string()), created.clone());
        Ok(created)
    }

    async fn get_job(&self, transform_name: &str, job_name: &str) -> MediaResult<Option<Job>> {
        self.record("get_job", job_name)?;
        Ok(self
            .account
            .lock()
            .unwrap()
            .jobs
            .get(&(transform_name.to_string(), job_name.to_string()))
            .cloned())
    }

    async fn get_streaming_locator(&self, name: &str) -> MediaResult<Option<StreamingLocator>> {
        self.record("get_locator", name)?;
        Ok(self.locator(name))
    }

    async fn create_streaming_locator(
        &self,
        name: &str,
        locator: &StreamingLocator,
    ) -> MediaResult<StreamingLocator> {
        self.record("create_locator", name)?;
        let mut account = self.account.lock().unwrap();
        if account.locators.contains_key(name) {
            return Err(MediaError::RemoteApi {
                status: 409,
                body: format!(r#"{{"error":{{"code":"Conflict","message":"{} exists"}}}}"#, name),
            });
        }
        let created = with_identity(locator.clone(), "streamingLocators", name);
        account.locators.insert(name.to_string(), created.clone());
        Ok(created)
    }

    async fn delete_streaming_locator(&self, name: &str) -> MediaResult<()> {
        self.record("delete_locator", name)?;
        self.account.lock().unwrap().locators.remove(name);
        Ok(())
    }

    async fn list_asset_streaming_locators(
        &self,
        asset_name: &str,
    ) -> MediaResult<Vec<AssetStreamingLocator>> {
        self.record("list_asset_locators", asset_name)?;
        let account = self.account.lock().unwrap();
        let mut found: Vec<AssetStreamingLocator> = account
            .locators
            .values()
            .filter(|l| l.properties.asset_name == asset_name)
            .map(|l| AssetStreamingLocator {
                name: l.name.clone(),
                streaming_policy_name: None,
            })
            .collect();
        found.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(found)
    }

    async fn list_streaming_paths(&self, locator_name: &str) -> MediaResult<Vec<StreamingPath>> {
        self.record("list_paths", locator_name)?;
        Ok(self
            .account
            .lock()
            .unwrap()
            .paths
            .get(locator_name)
            .cloned()
            .unwrap_or_default())
    }

    async fn get_streaming_endpoint(&self, name: &str) -> MediaResult<Option<StreamingEndpoint>> {
        self.record("get_endpoint", name)?;
        Ok(self.account.lock().unwrap().endpoints.get(name).cloned())
    }

    async fn get_content_key_policy(&self, name: &str) -> MediaResult<Option<ContentKeyPolicy>> {
        self.record("get_policy", name)?;
        Ok(self.policy(name))
    }

    async fn create_or_update_content_key_policy(
        &self,
        name: &str,
        options: Vec<ContentKeyPolicyOption>,
    ) -> MediaResult<ContentKeyPolicy> {
        self.record("create_policy", name)?;
        let policy = with_identity(
            ContentKeyPolicy::new(name, ContentKeyPolicyProperties { description: None, options }),
            "contentKeyPolicies",
            name,
        );
        self.insert_policy(policy.clone());
        Ok(policy)
    }

    async fn delete_content_key_policy(&self, name: &str) -> MediaResult<()> {
        self.record("delete_policy", name)?;
        self.account.lock().unwrap().policies.remove(name);
        Ok(())
    }
}
