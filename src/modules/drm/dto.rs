use serde::Serialize;
use utoipa::ToSchema;

use crate::infrastructure::media::model::{ContentKeyPolicy, DrmProtocol};

#[derive(Debug, Serialize, ToSchema)]
pub struct ContentKeyPolicyResponse {
    pub name: String,
    pub id: Option<String>,
    /// Option names in the order they were configured.
    pub options: Vec<String>,
    pub protocols: Vec<String>,
}

impl From<ContentKeyPolicy> for ContentKeyPolicyResponse {
    fn from(policy: ContentKeyPolicy) -> Self {
        let protocols = policy
            .properties
            .options
            .iter()
            .map(|o| match o.configuration.protocol() {
                DrmProtocol::PlayReady => "PlayReady",
                DrmProtocol::Widevine => "Widevine",
                DrmProtocol::FairPlay => "FairPlay",
                DrmProtocol::ClearKey => "ClearKey",
                DrmProtocol::Other => "Other",
            })
            .map(String::from)
            .collect();

        Self {
            options: policy
                .properties
                .options
                .into_iter()
                .filter_map(|o| o.name)
                .collect(),
            protocols,
            id: policy.id,
            name: policy.name,
        }
    }
}
