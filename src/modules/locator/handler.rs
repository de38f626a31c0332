use super::dto::{EndpointCacheResponse, PublishLocatorRequest, PublishLocatorResponse};
use super::service::LocatorService;
use crate::common::response::{ApiError, ApiResponse, ApiSuccess};
use crate::state::AppState;
use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use validator::Validate;

/// Publish an asset through a streaming locator
///
/// Always answers 200 once the request is valid; `published` and `errors`
/// carry the outcome.
#[utoipa::path(
    post,
    path = "/api/v1/locators",
    request_body = PublishLocatorRequest,
    responses(
        (status = 200, description = "Publish outcome", body = ApiResponse<PublishLocatorResponse>),
        (status = 400, description = "Invalid request")
    ),
    tag = "Publishing"
)]
pub async fn publish_locator(
    State(state): State<AppState>,
    Json(payload): Json<PublishLocatorRequest>,
) -> impl IntoResponse {
    if let Err(e) = payload.validate() {
        return ApiError(e.to_string(), StatusCode::BAD_REQUEST).into_response();
    }

    let (response, message) =
        match LocatorService::publish(&state, &payload.asset_name, payload.streaming_policy).await {
            Ok(published) => (
                PublishLocatorResponse {
                    published: true,
                    locator_name: Some(published.locator_name),
                    streaming_urls: published.streaming_urls,
                    errors: None,
                },
                "Asset published successfully",
            ),
            Err(e) => (
                PublishLocatorResponse {
                    published: false,
                    locator_name: None,
                    streaming_urls: vec![],
                    errors: Some(e.error_body()),
                },
                "Asset was not published",
            ),
        };

    ApiSuccess(ApiResponse::success(response, message), StatusCode::OK).into_response()
}

/// Forget the cached default streaming endpoint host
#[utoipa::path(
    delete,
    path = "/api/v1/streaming-endpoint/cache",
    responses(
        (status = 200, description = "Cache cleared", body = ApiResponse<EndpointCacheResponse>)
    ),
    tag = "Publishing"
)]
pub async fn invalidate_endpoint_cache(State(state): State<AppState>) -> impl IntoResponse {
    let previous_host = state.endpoints.cached().await;
    state.endpoints.invalidate().await;

    ApiSuccess(
        ApiResponse::success(
            EndpointCacheResponse { previous_host },
            "Streaming endpoint cache cleared",
        ),
        StatusCode::OK,
    )
}
