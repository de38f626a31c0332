use tracing::{error, info, warn};
use url::Url;

use super::dto::{PublishedLocator, UrlResolution};
use crate::common::error::{ConfigurationError, MediaResult};
use crate::infrastructure::media::model::{StreamingLocator, StreamingLocatorProperties, StreamingPolicy};
use crate::modules::drm::model::DEFAULT_DRM_CONTENT_KEY_POLICY;
use crate::modules::drm::service::ContentKeyPolicyService;
use crate::state::AppState;

pub struct LocatorService;

impl LocatorService {
    /// Publishes `asset_name` under `policy`, replacing any locator a previous
    /// publish left behind, then resolves its playback URLs.
    pub async fn publish(
        state: &AppState,
        asset_name: &str,
        policy: StreamingPolicy,
    ) -> MediaResult<PublishedLocator> {
        Self::try_publish(state, asset_name, policy)
            .await
            .inspect_err(|e| {
                error!(
                    asset = %asset_name,
                    policy = ?policy,
                    error = %e,
                    body = %e.error_body(),
                    "Publishing failed"
                );
            })
    }

    async fn try_publish(
        state: &AppState,
        asset_name: &str,
        policy: StreamingPolicy,
    ) -> MediaResult<PublishedLocator> {
        let name = locator_name(asset_name);

        let content_key_policy = if policy.requires_drm() {
            let drm_policy =
                ContentKeyPolicyService::get_or_create(state, DEFAULT_DRM_CONTENT_KEY_POLICY)
                    .await
                    .ok_or_else(|| {
                        ConfigurationError::DrmPolicyUnavailable(
                            DEFAULT_DRM_CONTENT_KEY_POLICY.to_string(),
                        )
                    })?;
            Some(drm_policy.name)
        } else {
            None
        };

        if state.media.get_streaming_locator(&name).await?.is_some() {
            state.media.delete_streaming_locator(&name).await?;
            info!(locator = %name, "Existing streaming locator deleted");
        }

        let locator = StreamingLocator::new(
            name.as_str(),
            StreamingLocatorProperties {
                asset_name: asset_name.to_string(),
                streaming_policy_name: policy,
                default_content_key_policy_name: content_key_policy.clone(),
            },
        );
        let created = state.media.create_streaming_locator(&name, &locator).await?;
        info!(locator = %created.name, asset = %asset_name, "Streaming locator created");

        let streaming_urls = Self::resolve_urls(state, asset_name).await;

        Ok(PublishedLocator {
            locator_name: created.name,
            asset_name: asset_name.to_string(),
            streaming_policy: policy,
            content_key_policy,
            streaming_urls,
        })
    }

    /// One entry per streaming protocol of the asset's first locator. Failed
    /// steps are reported in place and never abort the publish.
    pub async fn resolve_urls(state: &AppState, asset_name: &str) -> Vec<UrlResolution> {
        let mut resolved = Vec::new();

        let locators = match state.media.list_asset_streaming_locators(asset_name).await {
            Ok(locators) => locators,
            Err(e) => {
                warn!(asset = %asset_name, error = %e, "Listing streaming locators failed");
                resolved.push(UrlResolution::failed("list_streaming_locators", e.error_body()));
                return resolved;
            }
        };

        let Some(locator) = locators.into_iter().next() else {
            resolved.push(UrlResolution::failed(
                "list_streaming_locators",
                format!("asset {} has no streaming locator", asset_name),
            ));
            return resolved;
        };

        let paths = match state.media.list_streaming_paths(&locator.name).await {
            Ok(paths) => paths,
            Err(e) => {
                warn!(locator = %locator.name, error = %e, "Listing streaming paths failed");
                resolved.push(UrlResolution::failed("list_paths", e.error_body()));
                return resolved;
            }
        };

        if paths.is_empty() {
            resolved.push(UrlResolution::failed(
                "list_paths",
                format!("locator {} has no streaming paths", locator.name),
            ));
            return resolved;
        }

        let host = match state.endpoints.host(state.media.as_ref()).await {
            Ok(host) => host,
            Err(e) => {
                warn!(error = %e, "Resolving the default streaming endpoint failed");
                resolved.push(UrlResolution::failed("get_streaming_endpoint", e.error_body()));
                return resolved;
            }
        };

        for path in paths {
            let entry = match path.paths.first() {
                Some(first) => match playback_url(&host, first) {
                    Ok(url) => UrlResolution::Url {
                        protocol: path.streaming_protocol,
                        url,
                    },
                    Err(reason) => UrlResolution::failed("build_url", reason),
                },
                None => UrlResolution::failed(
                    "list_paths",
                    format!("no path for protocol {}", path.streaming_protocol),
                ),
            };
            resolved.push(entry);
        }

        resolved
    }
}

pub fn locator_name(asset_name: &str) -> String {
    format!("Locator-{}", asset_name)
}

fn playback_url(host: &str, path: &str) -> Result<String, String> {
    let mut url = Url::parse(&format!("https://{}", host)).map_err(|e| e.to_string())?;
    url.set_path(path);
    Ok(url.to_string())
}
