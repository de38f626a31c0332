use tracing::info;

use crate::common::error::MediaResult;
use crate::infrastructure::media::model::{Asset, AssetProperties};
use crate::state::AppState;

pub struct AssetService;

/// A freshly created output asset and the serial date its name embeds.
#[derive(Debug, Clone)]
pub struct OutputAsset {
    pub asset: Asset,
    pub serial: String,
}

impl AssetService {
    /// Input assets point at an already uploaded container and are reused
    /// across jobs. The container itself is not checked.
    pub async fn get_or_create_input(
        state: &AppState,
        name: &str,
        container: &str,
    ) -> MediaResult<Asset> {
        if let Some(existing) = state.media.get_asset(name).await? {
            info!(asset = %name, "Input asset exists");
            return Ok(existing);
        }

        let asset = Asset::new(
            name,
            AssetProperties {
                container: Some(container.to_string()),
                description: Some(name.to_string()),
                storage_account_name: Some(state.config.upload_storage_account.clone()),
                ..AssetProperties::default()
            },
        );

        let created = state.media.create_or_update_asset(name, &asset).await?;
        info!(asset = %created.name, container = %container, "Input asset created");
        Ok(created)
    }

    /// Creates a fresh output asset named `o-{container_base}-{serial}`.
    pub async fn create_output(state: &AppState, container_base: &str) -> MediaResult<OutputAsset> {
        let serial = state.serials.next();
        let name = output_asset_name(container_base, &serial);

        let asset = Asset::new(
            name.as_str(),
            AssetProperties {
                container: Some(name.clone()),
                description: Some(name.clone()),
                storage_account_name: Some(state.config.media_storage_account.clone()),
                ..AssetProperties::default()
            },
        );

        let created = state.media.create_or_update_asset(&name, &asset).await?;
        info!(asset = %created.name, "Output asset created");
        Ok(OutputAsset {
            asset: created,
            serial,
        })
    }
}

pub fn input_asset_name(container: &str) -> String {
    format!("i-{}", container)
}

pub fn output_asset_name(container_base: &str, serial: &str) -> String {
    format!("o-{}-{}", container_base, serial).to_lowercase()
}
