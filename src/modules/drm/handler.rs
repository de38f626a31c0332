use super::dto::ContentKeyPolicyResponse;
use super::service::ContentKeyPolicyService;
use crate::common::response::{ApiError, ApiResponse, ApiSuccess};
use crate::state::AppState;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};

/// Get or create a content key policy
#[utoipa::path(
    put,
    path = "/api/v1/content-key-policies/{name}",
    params(
        ("name" = String, Path, description = "Content key policy name")
    ),
    responses(
        (status = 200, description = "Policy exists or was created", body = ApiResponse<ContentKeyPolicyResponse>),
        (status = 500, description = "Policy could not be created")
    ),
    tag = "DRM"
)]
pub async fn get_or_create_policy(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> impl IntoResponse {
    match ContentKeyPolicyService::get_or_create(&state, &name).await {
        Some(policy) => ApiSuccess(
            ApiResponse::success(ContentKeyPolicyResponse::from(policy), "Content key policy ready"),
            StatusCode::OK,
        )
        .into_response(),
        None => ApiError(
            format!("Content key policy {} could not be created", name),
            StatusCode::INTERNAL_SERVER_ERROR,
        )
        .into_response(),
    }
}

/// Delete a content key policy
#[utoipa::path(
    delete,
    path = "/api/v1/content-key-policies/{name}",
    params(
        ("name" = String, Path, description = "Content key policy name")
    ),
    responses(
        (status = 200, description = "Policy deleted", body = ApiResponse<String>),
        (status = 500, description = "Policy could not be deleted")
    ),
    tag = "DRM"
)]
pub async fn delete_policy(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> impl IntoResponse {
    if ContentKeyPolicyService::delete(&state, &name).await {
        ApiSuccess(
            ApiResponse::success(name, "Content key policy deleted"),
            StatusCode::OK,
        )
        .into_response()
    } else {
        ApiError(
            format!("Content key policy {} could not be deleted", name),
            StatusCode::INTERNAL_SERVER_ERROR,
        )
        .into_response()
    }
}
