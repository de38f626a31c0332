//! Resource shapes of the Microsoft.Media control plane.
//!
//! Every resource travels in the ARM envelope `{ id, name, properties }`.
//! `id` and `name` are assigned by the platform and never sent back.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use time::OffsetDateTime;
use utoipa::ToSchema;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Resource<P> {
    #[serde(default, skip_serializing)]
    pub id: Option<String>,
    #[serde(default, skip_serializing)]
    pub name: String,
    pub properties: P,
}

impl<P> Resource<P> {
    pub fn new(name: impl Into<String>, properties: P) -> Self {
        Self {
            id: None,
            name: name.into(),
            properties,
        }
    }
}

// --- TRANSFORMS ---

pub type Transform = Resource<TransformProperties>;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TransformProperties {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub outputs: Vec<TransformOutput>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TransformOutput {
    pub preset: Preset,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "@odata.type")]
pub enum Preset {
    #[serde(rename = "#Microsoft.Media.BuiltInStandardEncoderPreset", rename_all = "camelCase")]
    BuiltInStandardEncoder { preset_name: String },

    #[serde(rename = "#Microsoft.Media.AudioAnalyzerPreset", rename_all = "camelCase")]
    AudioAnalyzer {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        audio_language: Option<String>,
    },

    #[serde(rename = "#Microsoft.Media.VideoAnalyzerPreset", rename_all = "camelCase")]
    VideoAnalyzer {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        audio_language: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        insights_to_extract: Option<String>,
    },

    /// Any other preset descriptor (custom encoding ladders and the like),
    /// kept exactly as the platform returned it.
    #[serde(untagged)]
    Other(serde_json::Value),
}

impl Preset {
    pub const ADAPTIVE_STREAMING: &'static str = "AdaptiveStreaming";

    pub fn adaptive_streaming() -> Self {
        Preset::BuiltInStandardEncoder {
            preset_name: Self::ADAPTIVE_STREAMING.to_string(),
        }
    }
}

// --- ASSETS ---

pub type Asset = Resource<AssetProperties>;

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AssetProperties {
    #[serde(default, skip_serializing)]
    pub asset_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub container: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub storage_account_name: Option<String>,
}

// --- JOBS ---

pub type Job = Resource<JobProperties>;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct JobProperties {
    pub input: JobInput,
    pub outputs: Vec<JobOutput>,
    #[serde(default)]
    pub correlation_data: HashMap<String, String>,
    #[serde(default, skip_serializing)]
    pub state: Option<JobState>,
    #[serde(default, skip_serializing, with = "time::serde::rfc3339::option")]
    pub created: Option<OffsetDateTime>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "@odata.type")]
pub enum JobInput {
    #[serde(rename = "#Microsoft.Media.JobInputAsset", rename_all = "camelCase")]
    Asset { asset_name: String },
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "@odata.type")]
pub enum JobOutput {
    #[serde(rename = "#Microsoft.Media.JobOutputAsset", rename_all = "camelCase")]
    Asset { asset_name: String },
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, ToSchema)]
pub enum JobState {
    Queued,
    Scheduled,
    Processing,
    Finished,
    Error,
    Canceling,
    Canceled,
}

// --- STREAMING LOCATORS ---

pub type StreamingLocator = Resource<StreamingLocatorProperties>;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct StreamingLocatorProperties {
    pub asset_name: String,
    pub streaming_policy_name: StreamingPolicy,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_content_key_policy_name: Option<String>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, ToSchema)]
pub enum StreamingPolicy {
    #[serde(rename = "Predefined_DownloadOnly")]
    DownloadOnly,
    #[serde(rename = "Predefined_ClearStreamingOnly")]
    ClearStreamingOnly,
    #[serde(rename = "Predefined_DownloadAndClearStreaming")]
    DownloadAndClearStreaming,
    #[serde(rename = "Predefined_ClearKey")]
    ClearKey,
    #[serde(rename = "Predefined_MultiDrmCencStreaming")]
    MultiDrmCencStreaming,
    #[serde(rename = "Predefined_MultiDrmStreaming")]
    MultiDrmStreaming,
}

impl StreamingPolicy {
    /// Policies that need a content key policy to hand out licenses.
    pub fn requires_drm(&self) -> bool {
        matches!(
            self,
            StreamingPolicy::MultiDrmCencStreaming | StreamingPolicy::MultiDrmStreaming
        )
    }
}

/// Entry of `assets/{name}/listStreamingLocators`.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AssetStreamingLocator {
    pub name: String,
    #[serde(default)]
    pub streaming_policy_name: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListStreamingLocatorsResponse {
    #[serde(default)]
    pub streaming_locators: Vec<AssetStreamingLocator>,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct StreamingPath {
    pub streaming_protocol: String,
    #[serde(default)]
    pub encryption_scheme: Option<String>,
    #[serde(default)]
    pub paths: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListPathsResponse {
    #[serde(default)]
    pub streaming_paths: Vec<StreamingPath>,
}

// --- STREAMING ENDPOINTS ---

pub type StreamingEndpoint = Resource<StreamingEndpointProperties>;

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct StreamingEndpointProperties {
    #[serde(default)]
    pub host_name: Option<String>,
    #[serde(default)]
    pub resource_state: Option<String>,
}

// --- CONTENT KEY POLICIES ---

pub type ContentKeyPolicy = Resource<ContentKeyPolicyProperties>;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ContentKeyPolicyProperties {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub options: Vec<ContentKeyPolicyOption>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ContentKeyPolicyOption {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub configuration: ContentKeyPolicyConfiguration,
    pub restriction: ContentKeyPolicyRestriction,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "@odata.type")]
pub enum ContentKeyPolicyConfiguration {
    #[serde(rename = "#Microsoft.Media.ContentKeyPolicyPlayReadyConfiguration", rename_all = "camelCase")]
    PlayReady {
        #[serde(default)]
        licenses: Vec<PlayReadyLicense>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        response_custom_data: Option<String>,
    },

    /// The template is carried as a JSON document inside a string.
    #[serde(rename = "#Microsoft.Media.ContentKeyPolicyWidevineConfiguration", rename_all = "camelCase")]
    Widevine {
        #[serde(default)]
        widevine_template: String,
    },

    /// Secrets come back as null on a plain GET.
    #[serde(rename = "#Microsoft.Media.ContentKeyPolicyFairPlayConfiguration", rename_all = "camelCase")]
    FairPlay {
        /// Base64 of the 16-byte application secret key.
        #[serde(default)]
        ask: Option<String>,
        #[serde(default)]
        fair_play_pfx_password: Option<String>,
        #[serde(default)]
        fair_play_pfx: Option<String>,
        rental_and_lease_key_type: FairPlayRentalAndLeaseKeyType,
        rental_duration: i64,
    },

    #[serde(rename = "#Microsoft.Media.ContentKeyPolicyClearKeyConfiguration")]
    ClearKey,

    /// Configuration types this service never creates, read back verbatim.
    #[serde(untagged)]
    Other(serde_json::Value),
}

impl ContentKeyPolicyConfiguration {
    pub fn protocol(&self) -> DrmProtocol {
        match self {
            ContentKeyPolicyConfiguration::PlayReady { .. } => DrmProtocol::PlayReady,
            ContentKeyPolicyConfiguration::Widevine { .. } => DrmProtocol::Widevine,
            ContentKeyPolicyConfiguration::FairPlay { .. } => DrmProtocol::FairPlay,
            ContentKeyPolicyConfiguration::ClearKey => DrmProtocol::ClearKey,
            ContentKeyPolicyConfiguration::Other(_) => DrmProtocol::Other,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DrmProtocol {
    PlayReady,
    Widevine,
    FairPlay,
    ClearKey,
    Other,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum FairPlayRentalAndLeaseKeyType {
    Undefined,
    DualExpiry,
    PersistentUnlimited,
    PersistentLimited,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PlayReadyLicense {
    pub allow_test_devices: bool,
    #[serde(default, with = "time::serde::rfc3339::option", skip_serializing_if = "Option::is_none")]
    pub begin_date: Option<OffsetDateTime>,
    pub content_key_location: PlayReadyContentKeyLocation,
    pub content_type: PlayReadyContentType,
    pub license_type: PlayReadyLicenseType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub play_right: Option<PlayReadyPlayRight>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "@odata.type")]
pub enum PlayReadyContentKeyLocation {
    #[serde(rename = "#Microsoft.Media.ContentKeyPolicyPlayReadyContentEncryptionKeyFromHeader")]
    FromHeader,
    #[serde(rename = "#Microsoft.Media.ContentKeyPolicyPlayReadyContentEncryptionKeyFromKeyIdentifier", rename_all = "camelCase")]
    FromKeyIdentifier { key_id: String },
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum PlayReadyContentType {
    Unspecified,
    UltraVioletDownload,
    UltraVioletStreaming,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum PlayReadyLicenseType {
    NonPersistent,
    Persistent,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PlayReadyPlayRight {
    pub digital_video_only_content_restriction: bool,
    pub image_constraint_for_analog_component_video_restriction: bool,
    pub image_constraint_for_analog_computer_monitor_restriction: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub explicit_analog_television_output_restriction: Option<ExplicitAnalogTelevisionRestriction>,
    pub allow_passing_video_content_to_unknown_output: UnknownOutputPassingOption,
    /// ISO-8601 duration, e.g. `PT20S`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_play_expiration: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ExplicitAnalogTelevisionRestriction {
    pub best_effort: bool,
    pub configuration_data: i32,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum UnknownOutputPassingOption {
    NotAllowed,
    Allowed,
    AllowedWithVideoConstriction,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "@odata.type")]
pub enum ContentKeyPolicyRestriction {
    #[serde(rename = "#Microsoft.Media.ContentKeyPolicyTokenRestriction", rename_all = "camelCase")]
    Token {
        issuer: String,
        audience: String,
        restriction_token_type: RestrictionTokenType,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        open_id_connect_discovery_document: Option<String>,
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        required_claims: Vec<TokenClaim>,
    },

    #[serde(rename = "#Microsoft.Media.ContentKeyPolicyOpenRestriction")]
    Open,

    #[serde(untagged)]
    Other(serde_json::Value),
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum RestrictionTokenType {
    Jwt,
    Swt,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct TokenClaim {
    pub claim_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub claim_value: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn clear_key_configuration_carries_only_its_type() {
        let value = serde_json::to_value(ContentKeyPolicyConfiguration::ClearKey).unwrap();
        assert_eq!(
            value,
            json!({ "@odata.type": "#Microsoft.Media.ContentKeyPolicyClearKeyConfiguration" })
        );
    }

    #[test]
    fn locator_body_omits_platform_assigned_fields() {
        let locator = StreamingLocator::new(
            "Locator-o-raw-1",
            StreamingLocatorProperties {
                asset_name: "o-raw-1".to_string(),
                streaming_policy_name: StreamingPolicy::MultiDrmCencStreaming,
                default_content_key_policy_name: Some("DefaultDrmContentKeyPolicy".to_string()),
            },
        );

        let value = serde_json::to_value(&locator).unwrap();
        assert_eq!(
            value,
            json!({
                "properties": {
                    "assetName": "o-raw-1",
                    "streamingPolicyName": "Predefined_MultiDrmCencStreaming",
                    "defaultContentKeyPolicyName": "DefaultDrmContentKeyPolicy"
                }
            })
        );
    }

    #[test]
    fn job_response_reads_state_and_correlation() {
        let job: Job = serde_json::from_value(json!({
            "id": "/subscriptions/s/jobs/job-o-raw-1",
            "name": "job-o-raw-1",
            "properties": {
                "input": { "@odata.type": "#Microsoft.Media.JobInputAsset", "assetName": "i-raw" },
                "outputs": [{ "@odata.type": "#Microsoft.Media.JobOutputAsset", "assetName": "o-raw-1", "state": "Queued" }],
                "correlationData": { "mezzId": "7" },
                "state": "Queued",
                "created": "2024-05-01T10:00:00Z"
            }
        }))
        .unwrap();

        assert_eq!(job.name, "job-o-raw-1");
        assert_eq!(job.properties.state, Some(JobState::Queued));
        assert_eq!(job.properties.correlation_data.get("mezzId").map(String::as_str), Some("7"));
    }

    #[test]
    fn custom_encoder_preset_reads_back_verbatim() {
        let preset = json!({
            "@odata.type": "#Microsoft.Media.StandardEncoderPreset",
            "codecs": [{ "@odata.type": "#Microsoft.Media.AacAudio", "bitrate": 128000 }],
            "formats": [{ "@odata.type": "#Microsoft.Media.Mp4Format", "filenamePattern": "{Basename}_{Bitrate}{Extension}" }]
        });
        let transform: Transform = serde_json::from_value(json!({
            "id": "/subscriptions/s/transforms/Ladder",
            "name": "Ladder",
            "properties": {
                "outputs": [{ "preset": preset.clone(), "onError": "StopProcessingJob" }]
            }
        }))
        .unwrap();

        assert_eq!(transform.properties.outputs[0].preset, Preset::Other(preset.clone()));
        assert_eq!(
            serde_json::to_value(&transform.properties.outputs[0].preset).unwrap(),
            preset
        );
    }

    #[test]
    fn built_in_presets_still_parse_as_typed_variants() {
        let output: TransformOutput = serde_json::from_value(json!({
            "preset": {
                "@odata.type": "#Microsoft.Media.BuiltInStandardEncoderPreset",
                "presetName": "AdaptiveStreaming"
            }
        }))
        .unwrap();
        assert_eq!(output.preset, Preset::adaptive_streaming());
    }

    #[test]
    fn unmodelled_policy_shapes_are_kept() {
        let policy: ContentKeyPolicy = serde_json::from_value(json!({
            "name": "Legacy",
            "properties": {
                "options": [{
                    "name": "unknown",
                    "configuration": {
                        "@odata.type": "#Microsoft.Media.ContentKeyPolicyUnknownConfiguration"
                    },
                    "restriction": {
                        "@odata.type": "#Microsoft.Media.ContentKeyPolicyUnknownRestriction"
                    }
                }]
            }
        }))
        .unwrap();

        let option = &policy.properties.options[0];
        assert_eq!(option.configuration.protocol(), DrmProtocol::Other);
        assert!(matches!(option.restriction, ContentKeyPolicyRestriction::Other(_)));
    }

    #[test]
    fn only_multi_drm_presets_require_a_key_policy() {
        assert!(StreamingPolicy::MultiDrmCencStreaming.requires_drm());
        assert!(StreamingPolicy::MultiDrmStreaming.requires_drm());
        assert!(!StreamingPolicy::ClearStreamingOnly.requires_drm());
        assert!(!StreamingPolicy::ClearKey.requires_drm());
    }
}
