use serde::Deserialize;
use crate::config::env::{self, EnvKey};
use crate::modules::drm::model::TokenIssuerKind;

const DEFAULT_ARM_ENDPOINT: &str = "https://management.azure.com";
const DEFAULT_AAD_AUTHORITY: &str = "https://login.microsoftonline.com";

#[derive(Clone, Debug, Deserialize)]
pub struct AppConfig {
    pub server_port: u16,
    pub tenant_id: String,
    pub client_id: String,
    pub client_secret: String,
    pub subscription_id: String,
    pub resource_group: String,
    pub account_name: String,
    pub media_storage_account: String,
    pub upload_storage_account: String,
    pub arm_endpoint: String,
    pub aad_authority: String,
    pub drm: DrmConfig,
}

/// Token restriction and key-delivery secrets, plus the protocol switches
/// the default content key policy is built from.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct DrmConfig {
    pub token_audience: Option<String>,
    pub token_issuer: Option<String>,
    pub openid_configuration: Option<String>,
    pub entitled_group_object_id: Option<String>,
    pub fairplay_ask_hex: Option<String>,
    pub fairplay_cert_file: Option<String>,
    pub fairplay_cert_password: Option<String>,
    pub playready_enabled: bool,
    pub widevine_enabled: bool,
    pub fairplay_enabled: bool,
    pub clear_key_enabled: bool,
    pub offline_enabled: bool,
    pub token_issuer_kind: TokenIssuerKind,
    pub playready_response_custom_data: Option<String>,
    /// JSON overrides, parsed when the DRM settings are built.
    pub playready_license: Option<String>,
    pub widevine_template: Option<String>,
    pub fairplay_license: Option<String>,
}

impl AppConfig {
    pub fn new() -> Result<Self, std::env::VarError> {
        Ok(Self {
            server_port: env::get_parsed(EnvKey::ServerPort, 3000),
            tenant_id: env::get(EnvKey::TenantId)?,
            client_id: env::get(EnvKey::ClientId)?,
            client_secret: env::get(EnvKey::ClientSecret)?,
            subscription_id: env::get(EnvKey::SubscriptionId)?,
            resource_group: env::get(EnvKey::ResourceGroup)?,
            account_name: env::get(EnvKey::AccountName)?,
            media_storage_account: env::get(EnvKey::MediaStorageAccount)?,
            upload_storage_account: env::get(EnvKey::UploadStorageAccount)?,
            arm_endpoint: env::get_or(EnvKey::ArmEndpoint, DEFAULT_ARM_ENDPOINT),
            aad_authority: env::get_or(EnvKey::AadAuthority, DEFAULT_AAD_AUTHORITY),
            drm: DrmConfig::from_env(),
        })
    }
}

impl DrmConfig {
    pub fn from_env() -> Self {
        Self {
            token_audience: env::get_opt(EnvKey::TokenAudience),
            token_issuer: env::get_opt(EnvKey::TokenIssuer),
            openid_configuration: env::get_opt(EnvKey::OpenIdConfiguration),
            entitled_group_object_id: env::get_opt(EnvKey::EntitledGroupObjectId),
            fairplay_ask_hex: env::get_opt(EnvKey::FairPlayAskHex),
            fairplay_cert_file: env::get_opt(EnvKey::FairPlayCertFile),
            fairplay_cert_password: env::get_opt(EnvKey::FairPlayCertPassword),
            playready_enabled: env::get_parsed(EnvKey::DrmPlayReadyEnabled, true),
            widevine_enabled: env::get_parsed(EnvKey::DrmWidevineEnabled, true),
            fairplay_enabled: env::get_parsed(EnvKey::DrmFairPlayEnabled, false),
            clear_key_enabled: env::get_parsed(EnvKey::DrmClearKeyEnabled, false),
            offline_enabled: env::get_parsed(EnvKey::DrmOfflineEnabled, true),
            token_issuer_kind: issuer_kind(env::get_opt(EnvKey::DrmTokenIssuerKind)),
            playready_response_custom_data: env::get_opt(EnvKey::DrmPlayReadyResponseCustomData),
            playready_license: env::get_opt(EnvKey::DrmPlayReadyLicense),
            widevine_template: env::get_opt(EnvKey::DrmWidevineTemplate),
            fairplay_license: env::get_opt(EnvKey::DrmFairPlayLicense),
        }
    }
}

/// Unset means key discovery. Anything unrecognised is kept so the policy
/// build can reject it by name.
fn issuer_kind(raw: Option<String>) -> TokenIssuerKind {
    let Some(raw) = raw else {
        return TokenIssuerKind::default();
    };
    let Ok(kind) = raw.parse::<TokenIssuerKind>();
    kind
}
