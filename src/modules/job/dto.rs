use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use time::OffsetDateTime;
use utoipa::ToSchema;
use validator::{Validate, ValidationError};

const ODATA_TYPE: &str = "@odata.type";

use crate::infrastructure::media::model::{Job, JobInput, JobOutput, JobState, Preset, TransformOutput};

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SubmitJobRequest {
    pub mezz_id: i64,
    #[validate(length(min = 1, max = 63, message = "Container name must be 1 to 63 characters"))]
    pub container_name: String,
    #[validate(length(min = 1, max = 260, message = "Transform name is required"))]
    pub transform_name: String,
    /// Built-in encoder preset names, or full preset descriptors carrying
    /// their own `@odata.type`. Empty means adaptive streaming.
    #[serde(default)]
    #[validate(custom(function = "validate_presets"))]
    #[schema(value_type = Vec<Object>)]
    pub presets: Vec<Value>,
}

impl SubmitJobRequest {
    pub fn transform_outputs(&self) -> Vec<TransformOutput> {
        self.presets
            .iter()
            .map(|preset| TransformOutput {
                preset: match preset {
                    Value::String(name) => Preset::BuiltInStandardEncoder {
                        preset_name: name.clone(),
                    },
                    descriptor => serde_json::from_value(descriptor.clone())
                        .unwrap_or_else(|_| Preset::Other(descriptor.clone())),
                },
            })
            .collect()
    }
}

fn validate_presets(presets: &[Value]) -> Result<(), ValidationError> {
    let valid = presets.iter().all(|preset| match preset {
        Value::String(name) => !name.trim().is_empty(),
        Value::Object(fields) => fields.get(ODATA_TYPE).is_some_and(Value::is_string),
        _ => false,
    });

    if valid {
        Ok(())
    } else {
        let mut error = ValidationError::new("preset");
        error.message = Some("Presets must be names or objects with an @odata.type".into());
        Err(error)
    }
}

/// Metadata attached to a job so whoever handles its completion can find
/// the originating request again.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct JobCorrelation {
    #[serde(rename = "transformName")]
    pub transform_name: String,
    #[serde(rename = "datetimeOA")]
    pub datetime_oa: String,
    #[serde(rename = "outputAssetContainer")]
    pub output_asset_container: String,
    #[serde(rename = "transformedAssetName")]
    pub transformed_asset_name: String,
    #[serde(rename = "mezzId")]
    pub mezz_id: String,
}

impl JobCorrelation {
    pub const TRANSFORM_NAME: &'static str = "transformName";
    pub const DATETIME_OA: &'static str = "datetimeOA";
    pub const OUTPUT_ASSET_CONTAINER: &'static str = "outputAssetContainer";
    pub const TRANSFORMED_ASSET_NAME: &'static str = "transformedAssetName";
    pub const MEZZ_ID: &'static str = "mezzId";

    pub fn to_map(&self) -> HashMap<String, String> {
        HashMap::from([
            (Self::TRANSFORM_NAME.to_string(), self.transform_name.clone()),
            (Self::DATETIME_OA.to_string(), self.datetime_oa.clone()),
            (Self::OUTPUT_ASSET_CONTAINER.to_string(), self.output_asset_container.clone()),
            (Self::TRANSFORMED_ASSET_NAME.to_string(), self.transformed_asset_name.clone()),
            (Self::MEZZ_ID.to_string(), self.mezz_id.clone()),
        ])
    }

    /// `None` unless every key is present.
    pub fn from_map(map: &HashMap<String, String>) -> Option<Self> {
        let field = |key: &str| map.get(key).cloned();

        Some(Self {
            transform_name: field(Self::TRANSFORM_NAME)?,
            datetime_oa: field(Self::DATETIME_OA)?,
            output_asset_container: field(Self::OUTPUT_ASSET_CONTAINER)?,
            transformed_asset_name: field(Self::TRANSFORMED_ASSET_NAME)?,
            mezz_id: field(Self::MEZZ_ID)?,
        })
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct SubmittedJob {
    pub job_name: String,
    pub job_id: Option<String>,
    pub transform_name: String,
    pub input_asset_name: String,
    pub output_asset_name: String,
    pub output_asset_container: String,
    pub correlation: JobCorrelation,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct JobResponse {
    pub name: String,
    pub id: Option<String>,
    pub state: Option<JobState>,
    #[serde(with = "time::serde::rfc3339::option")]
    #[schema(value_type = Option<String>)]
    pub created: Option<OffsetDateTime>,
    pub input_asset_name: String,
    pub output_asset_names: Vec<String>,
    pub correlation: Option<JobCorrelation>,
}

impl From<Job> for JobResponse {
    fn from(job: Job) -> Self {
        let JobInput::Asset { asset_name } = job.properties.input;
        let correlation = JobCorrelation::from_map(&job.properties.correlation_data);

        Self {
            name: job.name,
            id: job.id,
            state: job.properties.state,
            created: job.properties.created,
            input_asset_name: asset_name,
            output_asset_names: job
                .properties
                .outputs
                .into_iter()
                .map(|JobOutput::Asset { asset_name }| asset_name)
                .collect(),
            correlation,
        }
    }
}
