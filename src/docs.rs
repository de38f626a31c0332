use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::modules::job::handler::submit_job,
        crate::modules::job::handler::get_job,
        crate::modules::locator::handler::publish_locator,
        crate::modules::locator::handler::invalidate_endpoint_cache,
        crate::modules::drm::handler::get_or_create_policy,
        crate::modules::drm::handler::delete_policy,
    ),
    components(
        schemas(
            crate::modules::job::dto::SubmitJobRequest,
            crate::modules::job::dto::SubmittedJob,
            crate::modules::job::dto::JobCorrelation,
            crate::modules::job::dto::JobResponse,
            crate::modules::locator::dto::PublishLocatorRequest,
            crate::modules::locator::dto::PublishLocatorResponse,
            crate::modules::locator::dto::UrlResolution,
            crate::modules::locator::dto::EndpointCacheResponse,
            crate::modules::drm::dto::ContentKeyPolicyResponse,
            crate::infrastructure::media::model::JobState,
            crate::infrastructure::media::model::StreamingPolicy,
        )
    ),
    tags(
        (name = "Jobs", description = "Encode job submission"),
        (name = "Publishing", description = "Streaming locators and playback URLs"),
        (name = "DRM", description = "Content key policies")
    )
)]
pub struct ApiDoc;
