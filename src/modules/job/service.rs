use tracing::{error, info};

use super::dto::{JobCorrelation, SubmitJobRequest, SubmittedJob};
use crate::common::error::MediaResult;
use crate::infrastructure::media::model::{Job, JobInput, JobOutput, JobProperties};
use crate::modules::asset::service::{AssetService, input_asset_name};
use crate::modules::transform::service::TransformService;
use crate::state::AppState;

pub struct JobService;

impl JobService {
    /// Submits an encode job and returns as soon as the platform accepts it.
    /// Assets created before a failure are left in place.
    pub async fn submit(state: &AppState, req: &SubmitJobRequest) -> MediaResult<SubmittedJob> {
        Self::try_submit(state, req).await.inspect_err(|e| {
            error!(
                mezz_id = req.mezz_id,
                container = %req.container_name,
                transform = %req.transform_name,
                error = %e,
                body = %e.error_body(),
                "Job submission failed"
            );
        })
    }

    async fn try_submit(state: &AppState, req: &SubmitJobRequest) -> MediaResult<SubmittedJob> {
        let transform =
            TransformService::get_or_create(state, &req.transform_name, req.transform_outputs())
                .await?;

        let input_name = input_asset_name(&req.container_name);
        let input = AssetService::get_or_create_input(state, &input_name, &req.container_name).await?;

        let output = AssetService::create_output(state, &req.container_name).await?;
        let output_name = output.asset.name.clone();
        let output_container = output
            .asset
            .properties
            .container
            .clone()
            .unwrap_or_else(|| output_name.clone());

        let correlation = JobCorrelation {
            transform_name: req.transform_name.clone(),
            datetime_oa: output.serial,
            output_asset_container: output_container.clone(),
            transformed_asset_name: output_name.clone(),
            mezz_id: req.mezz_id.to_string(),
        };

        let job_name = format!("job-{}", output_name);
        let job = Job::new(
            job_name.as_str(),
            JobProperties {
                input: JobInput::Asset {
                    asset_name: input.name.clone(),
                },
                outputs: vec![JobOutput::Asset {
                    asset_name: output_name.clone(),
                }],
                correlation_data: correlation.to_map(),
                state: None,
                created: None,
            },
        );

        let submitted = state.media.create_job(&transform.name, &job_name, &job).await?;

        info!(
            job = %submitted.name,
            mezz_id = req.mezz_id,
            output = %output_name,
            "Job submitted"
        );

        Ok(SubmittedJob {
            job_name: submitted.name,
            job_id: submitted.id,
            transform_name: transform.name,
            input_asset_name: input.name,
            output_asset_name: output_name,
            output_asset_container: output_container,
            correlation,
        })
    }

    pub async fn get_job(
        state: &AppState,
        transform_name: &str,
        job_name: &str,
    ) -> MediaResult<Option<Job>> {
        state.media.get_job(transform_name, job_name).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::error::MediaError;
    use crate::infrastructure::media::fake::FakeMediaServices;
    use crate::infrastructure::media::model::JobState;
    use crate::state::test_state;
    use std::sync::Arc;

    fn request() -> SubmitJobRequest {
        SubmitJobRequest {
            mezz_id: 42,
            container_name: "raw-1234".to_string(),
            transform_name: "AdaptiveStreaming".to_string(),
            presets: vec![],
        }
    }

    #[tokio::test]
    async fn submit_threads_correlation_through_the_job() {
        let fake = Arc::new(FakeMediaServices::new());
        let state = test_state(fake.clone());

        let submitted = JobService::submit(&state, &request()).await.unwrap();

        assert!(submitted.output_asset_name.starts_with("o-raw-1234-"));
        assert_eq!(submitted.job_name, format!("job-{}", submitted.output_asset_name));
        assert_eq!(submitted.input_asset_name, "i-raw-1234");
        assert_eq!(submitted.output_asset_container, submitted.output_asset_name);
        assert_eq!(submitted.correlation.mezz_id, "42");
        assert_eq!(submitted.correlation.transform_name, "AdaptiveStreaming");
        assert_eq!(
            submitted.output_asset_name,
            format!("o-raw-1234-{}", submitted.correlation.datetime_oa)
        );

        let job = JobService::get_job(&state, "AdaptiveStreaming", &submitted.job_name)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(job.properties.state, Some(JobState::Queued));
        assert_eq!(
            JobCorrelation::from_map(&job.properties.correlation_data),
            Some(submitted.correlation.clone())
        );
        assert_eq!(
            job.properties.input,
            JobInput::Asset {
                asset_name: "i-raw-1234".to_string()
            }
        );
    }

    #[tokio::test]
    async fn second_submission_reuses_input_and_transform() {
        let fake = Arc::new(FakeMediaServices::new());
        let state = test_state(fake.clone());

        let first = JobService::submit(&state, &request()).await.unwrap();
        let second = JobService::submit(&state, &request()).await.unwrap();

        assert_ne!(first.job_name, second.job_name);
        assert_eq!(fake.count("create_transform"), 1);
        // one input, two outputs
        assert_eq!(fake.count("create_asset"), 3);
    }

    #[tokio::test]
    async fn failed_job_keeps_created_assets_and_the_remote_body() {
        let fake = Arc::new(FakeMediaServices::new());
        let body = r#"{"error":{"code":"QuotaExceeded","message":"Too many jobs"}}"#;
        fake.fail("create_job", 409, body);
        let state = test_state(fake.clone());

        let err = JobService::submit(&state, &request()).await.unwrap_err();

        assert!(matches!(err, MediaError::RemoteApi { status: 409, .. }));
        assert_eq!(err.error_body(), body);
        assert!(fake.asset("i-raw-1234").is_some());
        assert_eq!(fake.count("create_asset"), 2);
        assert_eq!(fake.count("delete_locator"), 0);
    }

    #[tokio::test]
    async fn unknown_job_is_none() {
        let fake = Arc::new(FakeMediaServices::new());
        let state = test_state(fake);

        assert!(
            JobService::get_job(&state, "AdaptiveStreaming", "job-missing")
                .await
                .unwrap()
                .is_none()
        );
    }
}
