use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

use crate::common::error::ConfigurationError;
use crate::config::env::EnvKey;
use crate::config::settings::DrmConfig;
use crate::infrastructure::media::model::{
    FairPlayRentalAndLeaseKeyType, PlayReadyLicense, TokenClaim,
};

/// Name of the single content key policy shared by all protected content.
pub const DEFAULT_DRM_CONTENT_KEY_POLICY: &str = "DefaultDrmContentKeyPolicy";

/// Who issues the tokens a license request must present.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum TokenIssuerKind {
    /// Azure AD as STS, with key rollover.
    AzureAd,
    /// Custom STS signing with a static symmetric key.
    Symmetric,
    /// Custom STS signing with a fixed X.509 certificate.
    Asymmetric,
    /// Custom STS publishing its keys through an OpenID discovery document.
    #[default]
    AsymmetricWithKeyDiscovery,
    /// No restriction.
    Open,
    /// Any other configured value, kept as written so it can be reported.
    Unsupported(String),
}

impl fmt::Display for TokenIssuerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TokenIssuerKind::AzureAd => "AAD",
            TokenIssuerKind::Symmetric => "Symmetric",
            TokenIssuerKind::Asymmetric => "Asymmetric",
            TokenIssuerKind::AsymmetricWithKeyDiscovery => "AsymmetricWithKeyDiscovery",
            TokenIssuerKind::Open => "None",
            TokenIssuerKind::Unsupported(raw) => raw.as_str(),
        };
        f.write_str(name)
    }
}

impl FromStr for TokenIssuerKind {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let raw = s.trim();
        let kind = match raw.to_ascii_lowercase().as_str() {
            "aad" | "azuread" => TokenIssuerKind::AzureAd,
            "symmetric" => TokenIssuerKind::Symmetric,
            "asymmetric" => TokenIssuerKind::Asymmetric,
            "asymmetricwithkeydiscovery" => TokenIssuerKind::AsymmetricWithKeyDiscovery,
            "none" | "open" => TokenIssuerKind::Open,
            _ => TokenIssuerKind::Unsupported(raw.to_string()),
        };
        Ok(kind)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EnabledProtocols {
    /// CENC / PlayReady
    pub playready: bool,
    /// CENC / Widevine
    pub widevine: bool,
    /// CBCS / FairPlay
    pub fairplay: bool,
    /// CBC / AES-128 clear key
    pub clear_key: bool,
}

/// FairPlay settings that may replace the defaults. The key material itself
/// always comes from [`DrmSecrets`].
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FairPlayLicenseOverride {
    pub rental_and_lease_key_type: FairPlayRentalAndLeaseKeyType,
    pub rental_duration: i64,
}

/// What the default content key policy is assembled from.
#[derive(Debug, Clone, PartialEq)]
pub struct DrmSettings {
    pub policy_name: String,
    pub protocols: EnabledProtocols,
    pub offline_enabled: bool,
    pub issuer_kind: TokenIssuerKind,
    pub required_claims: Vec<TokenClaim>,
    pub playready_response_custom_data: Option<String>,
    pub playready_license: Option<PlayReadyLicense>,
    pub widevine_template: Option<WidevineTemplate>,
    pub fairplay_license: Option<FairPlayLicenseOverride>,
}

impl DrmSettings {
    /// Fails when a configured override is not valid JSON for its type.
    pub fn from_config(config: &DrmConfig, policy_name: &str) -> Result<Self, ConfigurationError> {
        let required_claims = config
            .entitled_group_object_id
            .as_ref()
            .map(|group| {
                vec![TokenClaim {
                    claim_type: "groups".to_string(),
                    claim_value: Some(group.clone()),
                }]
            })
            .unwrap_or_default();

        Ok(Self {
            policy_name: policy_name.to_string(),
            protocols: EnabledProtocols {
                playready: config.playready_enabled,
                widevine: config.widevine_enabled,
                fairplay: config.fairplay_enabled,
                clear_key: config.clear_key_enabled,
            },
            offline_enabled: config.offline_enabled,
            issuer_kind: config.token_issuer_kind.clone(),
            required_claims,
            playready_response_custom_data: config.playready_response_custom_data.clone(),
            playready_license: parse_override(EnvKey::DrmPlayReadyLicense, &config.playready_license)?,
            widevine_template: parse_override(EnvKey::DrmWidevineTemplate, &config.widevine_template)?,
            fairplay_license: parse_override(EnvKey::DrmFairPlayLicense, &config.fairplay_license)?,
        })
    }
}

fn parse_override<T: DeserializeOwned>(
    key: EnvKey,
    raw: &Option<String>,
) -> Result<Option<T>, ConfigurationError> {
    raw.as_deref()
        .map(|json| {
            serde_json::from_str(json).map_err(|e| ConfigurationError::InvalidOverride {
                key: key.as_str().to_string(),
                reason: e.to_string(),
            })
        })
        .transpose()
}

/// Token restriction parameters and FairPlay key material.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DrmSecrets {
    pub token_audience: Option<String>,
    pub token_issuer: Option<String>,
    pub openid_configuration: Option<String>,
    pub fairplay_ask_hex: Option<String>,
    pub fairplay_cert_file: Option<String>,
    pub fairplay_cert_password: Option<String>,
}

impl From<&DrmConfig> for DrmSecrets {
    fn from(config: &DrmConfig) -> Self {
        Self {
            token_audience: config.token_audience.clone(),
            token_issuer: config.token_issuer.clone(),
            openid_configuration: config.openid_configuration.clone(),
            fairplay_ask_hex: config.fairplay_ask_hex.clone(),
            fairplay_cert_file: config.fairplay_cert_file.clone(),
            fairplay_cert_password: config.fairplay_cert_password.clone(),
        }
    }
}

// Widevine license template. Field names are the ones the license service
// expects inside the serialized template string.

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WidevineTemplate {
    pub allowed_track_types: String,
    pub content_key_specs: Vec<ContentKeySpec>,
    pub policy_overrides: PolicyOverrides,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContentKeySpec {
    pub track_type: String,
    pub security_level: u8,
    pub required_output_protection: OutputProtection,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputProtection {
    pub hdcp: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PolicyOverrides {
    pub can_play: bool,
    pub can_persist: bool,
    pub can_renew: bool,
    pub license_duration_seconds: u64,
    pub playback_duration_seconds: u64,
    pub rental_duration_seconds: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn issuer_kind_parses_config_spellings() {
        assert_eq!(
            "AsymmetricWithKeyDiscovery".parse::<TokenIssuerKind>(),
            Ok(TokenIssuerKind::AsymmetricWithKeyDiscovery)
        );
        assert_eq!("AAD".parse::<TokenIssuerKind>(), Ok(TokenIssuerKind::AzureAd));
        assert_eq!("None".parse::<TokenIssuerKind>(), Ok(TokenIssuerKind::Open));
        assert_eq!(
            " jwks ".parse::<TokenIssuerKind>(),
            Ok(TokenIssuerKind::Unsupported("jwks".to_string()))
        );
        assert_eq!(TokenIssuerKind::Unsupported("jwks".to_string()).to_string(), "jwks");
    }

    #[test]
    fn entitled_group_becomes_a_required_claim() {
        let config = DrmConfig {
            entitled_group_object_id: Some("group-1".to_string()),
            playready_enabled: true,
            ..DrmConfig::default()
        };

        let settings = DrmSettings::from_config(&config, DEFAULT_DRM_CONTENT_KEY_POLICY).unwrap();
        assert_eq!(settings.policy_name, "DefaultDrmContentKeyPolicy");
        assert!(settings.protocols.playready);
        assert!(!settings.protocols.fairplay);
        assert_eq!(
            settings.required_claims,
            vec![TokenClaim {
                claim_type: "groups".to_string(),
                claim_value: Some("group-1".to_string()),
            }]
        );
    }

    #[test]
    fn configured_overrides_are_loaded() {
        let config = DrmConfig {
            playready_response_custom_data: Some("tenant-42".to_string()),
            playready_license: Some(
                r##"{
                    "allowTestDevices": false,
                    "contentKeyLocation": {
                        "@odata.type": "#Microsoft.Media.ContentKeyPolicyPlayReadyContentEncryptionKeyFromHeader"
                    },
                    "contentType": "Unspecified",
                    "licenseType": "NonPersistent"
                }"##
                .to_string(),
            ),
            widevine_template: Some(
                r#"{
                    "allowed_track_types": "SD_ONLY",
                    "content_key_specs": [],
                    "policy_overrides": {
                        "can_play": true,
                        "can_persist": false,
                        "can_renew": false,
                        "license_duration_seconds": 60,
                        "playback_duration_seconds": 60,
                        "rental_duration_seconds": 60
                    }
                }"#
                .to_string(),
            ),
            fairplay_license: Some(
                r#"{"rentalAndLeaseKeyType":"DualExpiry","rentalDuration":3600}"#.to_string(),
            ),
            ..DrmConfig::default()
        };

        let settings = DrmSettings::from_config(&config, DEFAULT_DRM_CONTENT_KEY_POLICY).unwrap();

        assert_eq!(settings.playready_response_custom_data.as_deref(), Some("tenant-42"));
        let license = settings.playready_license.unwrap();
        assert!(!license.allow_test_devices);
        assert!(license.play_right.is_none());
        assert_eq!(settings.widevine_template.unwrap().allowed_track_types, "SD_ONLY");
        assert_eq!(
            settings.fairplay_license,
            Some(FairPlayLicenseOverride {
                rental_and_lease_key_type: FairPlayRentalAndLeaseKeyType::DualExpiry,
                rental_duration: 3600,
            })
        );
    }

    #[test]
    fn malformed_override_names_its_variable() {
        let config = DrmConfig {
            fairplay_license: Some(r#"{"rentalDuration":"soon"}"#.to_string()),
            ..DrmConfig::default()
        };

        match DrmSettings::from_config(&config, DEFAULT_DRM_CONTENT_KEY_POLICY) {
            Err(ConfigurationError::InvalidOverride { key, .. }) => {
                assert_eq!(key, "DRM_FAIRPLAY_LICENSE_JSON")
            }
            other => panic!("expected an invalid override, got {:?}", other),
        }
    }
}
