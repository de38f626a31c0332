use std::sync::Arc;

use crate::common::error::ConfigurationError;
use crate::config::settings::AppConfig;
use crate::infrastructure::media::MediaServicesApi;
use crate::modules::asset::serial::SerialClock;
use crate::modules::drm::model::{DEFAULT_DRM_CONTENT_KEY_POLICY, DrmSecrets, DrmSettings};
use crate::modules::locator::cache::StreamingEndpointCache;

#[derive(Clone)]
pub struct AppState {
    pub config: AppConfig,
    pub media: Arc<dyn MediaServicesApi>,
    pub drm: Arc<DrmSettings>,
    pub secrets: Arc<DrmSecrets>,
    pub endpoints: Arc<StreamingEndpointCache>,
    pub serials: Arc<SerialClock>,
}

impl AppState {
    pub fn new(
        config: AppConfig,
        media: Arc<dyn MediaServicesApi>,
    ) -> Result<Self, ConfigurationError> {
        let drm = DrmSettings::from_config(&config.drm, DEFAULT_DRM_CONTENT_KEY_POLICY)?;
        let secrets = DrmSecrets::from(&config.drm);

        Ok(Self {
            config,
            media,
            drm: Arc::new(drm),
            secrets: Arc::new(secrets),
            endpoints: Arc::new(StreamingEndpointCache::default()),
            serials: Arc::new(SerialClock::default()),
        })
    }
}

#[cfg(test)]
pub fn test_config() -> AppConfig {
    use crate::config::settings::DrmConfig;
    use crate::modules::drm::model::TokenIssuerKind;

    AppConfig {
        server_port: 3000,
        tenant_id: "tenant".to_string(),
        client_id: "client".to_string(),
        client_secret: "secret".to_string(),
        subscription_id: "subscription".to_string(),
        resource_group: "media-rg".to_string(),
        account_name: "mediaaccount".to_string(),
        media_storage_account: "mediastore".to_string(),
        upload_storage_account: "uploadstore".to_string(),
        arm_endpoint: "https://management.azure.com".to_string(),
        aad_authority: "https://login.microsoftonline.com".to_string(),
        drm: DrmConfig {
            token_audience: Some("urn:media:player".to_string()),
            token_issuer: Some("https://sts.example.com".to_string()),
            openid_configuration: Some(
                "https://sts.example.com/.well-known/openid-configuration".to_string(),
            ),
            playready_enabled: true,
            widevine_enabled: true,
            offline_enabled: true,
            token_issuer_kind: TokenIssuerKind::AsymmetricWithKeyDiscovery,
            ..DrmConfig::default()
        },
    }
}

#[cfg(test)]
pub fn test_state(media: Arc<crate::infrastructure::media::fake::FakeMediaServices>) -> AppState {
    AppState::new(test_config(), media).unwrap()
}
