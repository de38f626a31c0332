use std::env;
use std::str::FromStr;

pub enum EnvKey {
    ServerPort,
    TenantId,
    ClientId,
    ClientSecret,
    SubscriptionId,
    ResourceGroup,
    AccountName,
    MediaStorageAccount,
    UploadStorageAccount,
    ArmEndpoint,
    AadAuthority,
    TokenAudience,
    TokenIssuer,
    EntitledGroupObjectId,
    OpenIdConfiguration,
    FairPlayAskHex,
    FairPlayCertFile,
    FairPlayCertPassword,
    DrmPlayReadyEnabled,
    DrmWidevineEnabled,
    DrmFairPlayEnabled,
    DrmClearKeyEnabled,
    DrmOfflineEnabled,
    DrmTokenIssuerKind,
    DrmPlayReadyResponseCustomData,
    DrmPlayReadyLicense,
    DrmWidevineTemplate,
    DrmFairPlayLicense,
}

impl EnvKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            EnvKey::ServerPort => "APP_PORT",
            EnvKey::TenantId => "AZURE_TENANT_ID",
            EnvKey::ClientId => "AZURE_CLIENT_ID",
            EnvKey::ClientSecret => "AZURE_CLIENT_SECRET",
            EnvKey::SubscriptionId => "AZURE_SUBSCRIPTION_ID",
            EnvKey::ResourceGroup => "MEDIA_RESOURCE_GROUP",
            EnvKey::AccountName => "MEDIA_ACCOUNT_NAME",
            EnvKey::MediaStorageAccount => "MEDIA_STORAGE_ACCOUNT",
            EnvKey::UploadStorageAccount => "UPLOAD_STORAGE_ACCOUNT",
            EnvKey::ArmEndpoint => "ARM_ENDPOINT",
            EnvKey::AadAuthority => "AAD_AUTHORITY",
            EnvKey::TokenAudience => "IDA_AUDIENCE",
            EnvKey::TokenIssuer => "IDA_ISSUER",
            EnvKey::EntitledGroupObjectId => "IDA_ENTITLED_GROUP_OBJECT_ID",
            EnvKey::OpenIdConfiguration => "STS_OPENID_CONFIGURATION",
            EnvKey::FairPlayAskHex => "FAIRPLAY_ASK_HEX",
            EnvKey::FairPlayCertFile => "FAIRPLAY_CERT_BASE64_FILE",
            EnvKey::FairPlayCertPassword => "FAIRPLAY_CERT_PASSWORD",
            EnvKey::DrmPlayReadyEnabled => "DRM_PLAYREADY_ENABLED",
            EnvKey::DrmWidevineEnabled => "DRM_WIDEVINE_ENABLED",
            EnvKey::DrmFairPlayEnabled => "DRM_FAIRPLAY_ENABLED",
            EnvKey::DrmClearKeyEnabled => "DRM_CLEAR_KEY_ENABLED",
            EnvKey::DrmOfflineEnabled => "DRM_OFFLINE_ENABLED",
            EnvKey::DrmTokenIssuerKind => "DRM_STS_TYPE",
            EnvKey::DrmPlayReadyResponseCustomData => "DRM_PLAYREADY_RESPONSE_CUSTOM_DATA",
            EnvKey::DrmPlayReadyLicense => "DRM_PLAYREADY_LICENSE_JSON",
            EnvKey::DrmWidevineTemplate => "DRM_WIDEVINE_TEMPLATE_JSON",
            EnvKey::DrmFairPlayLicense => "DRM_FAIRPLAY_LICENSE_JSON",
        }
    }
}

pub fn get(key: EnvKey) -> Result<String, env::VarError> {
    env::var(key.as_str())
}

pub fn get_or(key: EnvKey, default: &str) -> String {
    env::var(key.as_str()).unwrap_or_else(|_| default.to_string())
}

/// Unset and blank variables both read as `None`.
pub fn get_opt(key: EnvKey) -> Option<String> {
    env::var(key.as_str()).ok().filter(|v| !v.trim().is_empty())
}

pub fn get_parsed<T: FromStr>(key: EnvKey, default: T) -> T {
    match get(key) {
        Ok(val) => val.parse::<T>().unwrap_or(default),
        Err(_) => default,
    }
}
