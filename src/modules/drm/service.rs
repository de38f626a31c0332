use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use time::macros::datetime;
use tracing::{error, info};

use super::fairplay;
use super::model::{
    ContentKeySpec, DrmSecrets, DrmSettings, OutputProtection, PolicyOverrides, TokenIssuerKind,
    WidevineTemplate,
};
use crate::common::error::{ConfigurationError, MediaResult};
use crate::infrastructure::media::model::{
    ContentKeyPolicy, ContentKeyPolicyConfiguration, ContentKeyPolicyOption,
    ContentKeyPolicyRestriction, ExplicitAnalogTelevisionRestriction,
    FairPlayRentalAndLeaseKeyType, PlayReadyContentKeyLocation, PlayReadyContentType,
    PlayReadyLicense, PlayReadyLicenseType, PlayReadyPlayRight, RestrictionTokenType,
    UnknownOutputPassingOption,
};
use crate::state::AppState;

pub const PLAYREADY_OPTION: &str = "ContentKeyPolicyOption_CENC_PlayReady";
pub const WIDEVINE_OPTION: &str = "ContentKeyPolicyOption_CENC_Widevine";
pub const FAIRPLAY_OPTION: &str = "ContentKeyPolicyOption_CBCS";
pub const CLEAR_KEY_OPTION: &str = "ContentKeyPolicyOption_CBC";

const FAIRPLAY_RENTAL_DURATION: i64 = 2249;

pub struct ContentKeyPolicyService;

impl ContentKeyPolicyService {
    /// Returns the named policy, creating it from the configured DRM settings
    /// when it does not exist yet. Any failure is logged and reported as `None`.
    pub async fn get_or_create(state: &AppState, name: &str) -> Option<ContentKeyPolicy> {
        match Self::try_get_or_create(state, name).await {
            Ok(policy) => Some(policy),
            Err(e) => {
                error!(policy = %name, error = %e, body = %e.error_body(), "Failed to get or create content key policy");
                None
            }
        }
    }

    pub async fn try_get_or_create(state: &AppState, name: &str) -> MediaResult<ContentKeyPolicy> {
        if let Some(existing) = state.media.get_content_key_policy(name).await? {
            info!(policy = %name, "Content key policy exists");
            return Ok(existing);
        }

        let mut settings = (*state.drm).clone();
        settings.policy_name = name.to_string();

        let restriction = Self::build_restriction(&settings, &state.secrets).inspect_err(|e| {
            error!(policy = %name, "DRM configuration error: {}", e);
        })?;
        let options = Self::build_options(&settings, &state.secrets, &restriction)?;

        let policy = state
            .media
            .create_or_update_content_key_policy(&settings.policy_name, options)
            .await?;

        info!(
            policy = %policy.name,
            options = policy.properties.options.len(),
            "Content key policy created"
        );
        Ok(policy)
    }

    pub async fn delete(state: &AppState, name: &str) -> bool {
        match state.media.delete_content_key_policy(name).await {
            Ok(()) => {
                info!(policy = %name, "Content key policy deleted");
                true
            }
            Err(e) => {
                info!(policy = %name, error = %e, "Content key policy was not deleted");
                false
            }
        }
    }

    /// The one restriction every option shares.
    pub fn build_restriction(
        settings: &DrmSettings,
        secrets: &DrmSecrets,
    ) -> Result<ContentKeyPolicyRestriction, ConfigurationError> {
        if settings.issuer_kind != TokenIssuerKind::AsymmetricWithKeyDiscovery {
            return Err(ConfigurationError::UnsupportedRestriction(
                settings.issuer_kind.to_string(),
            ));
        }

        let discovery = required(&secrets.openid_configuration)
            .ok_or(ConfigurationError::MissingOpenIdConfiguration)?;
        let audience = required(&secrets.token_audience).ok_or(ConfigurationError::MissingAudience)?;
        let issuer = required(&secrets.token_issuer).ok_or(ConfigurationError::MissingIssuer)?;

        Ok(ContentKeyPolicyRestriction::Token {
            issuer,
            audience,
            restriction_token_type: RestrictionTokenType::Jwt,
            open_id_connect_discovery_document: Some(discovery),
            required_claims: settings.required_claims.clone(),
        })
    }

    /// One option per enabled protocol, in PlayReady, Widevine, FairPlay,
    /// clear-key order.
    pub fn build_options(
        settings: &DrmSettings,
        secrets: &DrmSecrets,
        restriction: &ContentKeyPolicyRestriction,
    ) -> MediaResult<Vec<ContentKeyPolicyOption>> {
        let mut options = Vec::new();

        if settings.protocols.playready {
            options.push(option(PLAYREADY_OPTION, playready_configuration(settings), restriction));
        }
        if settings.protocols.widevine {
            options.push(option(WIDEVINE_OPTION, widevine_configuration(settings)?, restriction));
        }
        if settings.protocols.fairplay {
            let configuration = fairplay_configuration(settings, secrets).inspect_err(|e| {
                error!(policy = %settings.policy_name, "DRM configuration error: {}", e);
            })?;
            options.push(option(FAIRPLAY_OPTION, configuration, restriction));
        }
        if settings.protocols.clear_key {
            options.push(option(
                CLEAR_KEY_OPTION,
                ContentKeyPolicyConfiguration::ClearKey,
                restriction,
            ));
        }

        Ok(options)
    }
}

fn required(value: &Option<String>) -> Option<String> {
    value.as_ref().filter(|v| !v.trim().is_empty()).cloned()
}

fn option(
    name: &str,
    configuration: ContentKeyPolicyConfiguration,
    restriction: &ContentKeyPolicyRestriction,
) -> ContentKeyPolicyOption {
    ContentKeyPolicyOption {
        name: Some(name.to_string()),
        configuration,
        restriction: restriction.clone(),
    }
}

pub fn default_playready_license(offline_enabled: bool) -> PlayReadyLicense {
    PlayReadyLicense {
        allow_test_devices: true,
        begin_date: Some(datetime!(2016-01-01 0:00 UTC)),
        content_key_location: PlayReadyContentKeyLocation::FromHeader,
        content_type: PlayReadyContentType::UltraVioletStreaming,
        license_type: if offline_enabled {
            PlayReadyLicenseType::Persistent
        } else {
            PlayReadyLicenseType::NonPersistent
        },
        play_right: Some(PlayReadyPlayRight {
            digital_video_only_content_restriction: false,
            image_constraint_for_analog_component_video_restriction: true,
            image_constraint_for_analog_computer_monitor_restriction: false,
            explicit_analog_television_output_restriction: Some(
                ExplicitAnalogTelevisionRestriction {
                    best_effort: true,
                    configuration_data: 2,
                },
            ),
            allow_passing_video_content_to_unknown_output: UnknownOutputPassingOption::Allowed,
            first_play_expiration: Some("PT20S".to_string()),
        }),
    }
}

fn playready_configuration(settings: &DrmSettings) -> ContentKeyPolicyConfiguration {
    let license = match &settings.playready_license {
        Some(license) => {
            info!("PlayReady license: override is used");
            license.clone()
        }
        None => default_playready_license(settings.offline_enabled),
    };

    ContentKeyPolicyConfiguration::PlayReady {
        licenses: vec![license],
        response_custom_data: settings.playready_response_custom_data.clone(),
    }
}

pub fn default_widevine_template(offline_enabled: bool) -> WidevineTemplate {
    WidevineTemplate {
        allowed_track_types: "SD_HD".to_string(),
        content_key_specs: vec![ContentKeySpec {
            track_type: "SD".to_string(),
            security_level: 1,
            required_output_protection: OutputProtection {
                hdcp: "HDCP_NONE".to_string(),
            },
        }],
        policy_overrides: PolicyOverrides {
            can_play: true,
            can_persist: offline_enabled,
            can_renew: false,
            license_duration_seconds: 2_592_000,
            playback_duration_seconds: 10_800,
            rental_duration_seconds: 604_800,
        },
    }
}

fn widevine_configuration(settings: &DrmSettings) -> MediaResult<ContentKeyPolicyConfiguration> {
    let template = match &settings.widevine_template {
        Some(template) => {
            info!("Widevine template: override is used");
            template.clone()
        }
        None => default_widevine_template(settings.offline_enabled),
    };

    Ok(ContentKeyPolicyConfiguration::Widevine {
        widevine_template: serde_json::to_string(&template)?,
    })
}

fn fairplay_configuration(
    settings: &DrmSettings,
    secrets: &DrmSecrets,
) -> Result<ContentKeyPolicyConfiguration, ConfigurationError> {
    let ask = fairplay::parse_application_secret_key(secrets.fairplay_ask_hex.as_deref())?;
    let cert_path =
        required(&secrets.fairplay_cert_file).ok_or(ConfigurationError::MissingFairPlayCertificate)?;
    let password =
        required(&secrets.fairplay_cert_password).ok_or(ConfigurationError::MissingFairPlayPassword)?;
    let pfx = fairplay::certificate_to_pfx_base64(&cert_path, &password)?;

    // Offline playback for FairPlay is a streaming policy concern, not this key type.
    let (key_type, rental_duration) = match &settings.fairplay_license {
        Some(license) => {
            info!("FairPlay license: override is used");
            (license.rental_and_lease_key_type, license.rental_duration)
        }
        None => (
            FairPlayRentalAndLeaseKeyType::PersistentUnlimited,
            FAIRPLAY_RENTAL_DURATION,
        ),
    };

    Ok(ContentKeyPolicyConfiguration::FairPlay {
        ask: Some(STANDARD.encode(ask)),
        fair_play_pfx_password: Some(password),
        fair_play_pfx: Some(pfx),
        rental_and_lease_key_type: key_type,
        rental_duration,
    })
}
