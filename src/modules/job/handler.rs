use super::dto::{JobResponse, SubmitJobRequest, SubmittedJob};
use super::service::JobService;
use crate::common::response::{ApiError, ApiResponse, ApiSuccess};
use crate::state::AppState;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use validator::Validate;

/// Submit an encode job
#[utoipa::path(
    post,
    path = "/api/v1/jobs",
    request_body = SubmitJobRequest,
    responses(
        (status = 201, description = "Job submitted", body = ApiResponse<SubmittedJob>),
        (status = 400, description = "Invalid request"),
        (status = 502, description = "Media Services rejected the job")
    ),
    tag = "Jobs"
)]
pub async fn submit_job(
    State(state): State<AppState>,
    Json(payload): Json<SubmitJobRequest>,
) -> impl IntoResponse {
    if let Err(e) = payload.validate() {
        return ApiError(e.to_string(), StatusCode::BAD_REQUEST).into_response();
    }

    match JobService::submit(&state, &payload).await {
        Ok(job) => ApiSuccess(
            ApiResponse::success(job, "Job submitted successfully"),
            StatusCode::CREATED,
        )
        .into_response(),
        Err(e) => ApiError::from(&e).into_response(),
    }
}

/// Get a job by transform and job name
#[utoipa::path(
    get,
    path = "/api/v1/jobs/{transform}/{job}",
    params(
        ("transform" = String, Path, description = "Transform name"),
        ("job" = String, Path, description = "Job name")
    ),
    responses(
        (status = 200, description = "Job details", body = ApiResponse<JobResponse>),
        (status = 404, description = "Job not found")
    ),
    tag = "Jobs"
)]
pub async fn get_job(
    State(state): State<AppState>,
    Path((transform, job)): Path<(String, String)>,
) -> impl IntoResponse {
    match JobService::get_job(&state, &transform, &job).await {
        Ok(Some(job)) => ApiSuccess(
            ApiResponse::success(JobResponse::from(job), "Job retrieved successfully"),
            StatusCode::OK,
        )
        .into_response(),
        Ok(None) => ApiError(format!("Job {} not found", job), StatusCode::NOT_FOUND).into_response(),
        Err(e) => ApiError::from(&e).into_response(),
    }
}
