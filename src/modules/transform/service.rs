use tracing::info;

use crate::common::error::MediaResult;
use crate::infrastructure::media::model::{Preset, Transform, TransformOutput};
use crate::state::AppState;

pub struct TransformService;

impl TransformService {
    /// Looks the transform up by name and creates it when absent. An existing
    /// transform is returned as stored, whatever `outputs` asks for.
    pub async fn get_or_create(
        state: &AppState,
        name: &str,
        outputs: Vec<TransformOutput>,
    ) -> MediaResult<Transform> {
        if let Some(existing) = state.media.get_transform(name).await? {
            info!(transform = %name, "Transform exists");
            return Ok(existing);
        }

        let outputs = if outputs.is_empty() {
            default_outputs()
        } else {
            outputs
        };

        let transform = state.media.create_or_update_transform(name, outputs).await?;
        info!(
            transform = %transform.name,
            outputs = transform.properties.outputs.len(),
            "Transform created"
        );
        Ok(transform)
    }
}

pub fn default_outputs() -> Vec<TransformOutput> {
    vec![TransformOutput {
        preset: Preset::adaptive_streaming(),
    }]
}
