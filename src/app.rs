use axum::Router;
use crate::state::AppState;
use tower_http::trace::TraceLayer;

pub fn create_app(state: AppState) -> Router {
    crate::routes::configure_routes()
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::media::fake::FakeMediaServices;
    use crate::state::test_state;
    use axum::body::{Body, to_bytes};
    use axum::http::{Request, StatusCode};
    use std::sync::Arc;
    use tower::ServiceExt;

    async fn json_body(response: axum::response::Response) -> serde_json::Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn post(uri: &str, body: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn health_check() {
        let app = create_app(test_state(Arc::new(FakeMediaServices::new())));

        let response = app
            .oneshot(Request::get("/api/v1/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn submit_job_returns_created_with_correlation() {
        let app = create_app(test_state(Arc::new(FakeMediaServices::new())));

        let response = app
            .oneshot(post(
                "/api/v1/jobs",
                r#"{"mezzId":42,"containerName":"raw-1234","transformName":"AdaptiveStreaming"}"#,
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::CREATED);
        let body = json_body(response).await;
        assert_eq!(body["status"], "success");
        assert_eq!(body["data"]["correlation"]["mezzId"], "42");
        assert_eq!(body["data"]["input_asset_name"], "i-raw-1234");
    }

    #[tokio::test]
    async fn invalid_job_request_is_rejected() {
        let fake = Arc::new(FakeMediaServices::new());
        let app = create_app(test_state(fake.clone()));

        let response = app
            .oneshot(post(
                "/api/v1/jobs",
                r#"{"mezzId":42,"containerName":"","transformName":"AdaptiveStreaming"}"#,
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert!(fake.calls().is_empty());
    }

    #[tokio::test]
    async fn remote_rejection_maps_to_bad_gateway() {
        let fake = Arc::new(FakeMediaServices::new());
        fake.fail("create_job", 400, r#"{"error":{"code":"BadRequest"}}"#);
        let app = create_app(test_state(fake));

        let response = app
            .oneshot(post(
                "/api/v1/jobs",
                r#"{"mezzId":7,"containerName":"raw-7","transformName":"AdaptiveStreaming"}"#,
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
        let body = json_body(response).await;
        assert_eq!(body["message"], r#"{"error":{"code":"BadRequest"}}"#);
    }

    #[tokio::test]
    async fn failed_publish_reports_errors_in_the_body() {
        let fake = Arc::new(FakeMediaServices::new());
        fake.fail("get_policy", 503, "unavailable");
        let app = create_app(test_state(fake));

        let response = app
            .oneshot(post(
                "/api/v1/locators",
                r#"{"assetName":"o-raw-1234-45292-5","streamingPolicy":"Predefined_MultiDrmCencStreaming"}"#,
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert_eq!(body["data"]["published"], false);
        assert!(
            body["data"]["errors"]
                .as_str()
                .unwrap()
                .contains("DefaultDrmContentKeyPolicy")
        );
    }

    #[tokio::test]
    async fn content_key_policy_can_be_created_and_deleted() {
        let fake = Arc::new(FakeMediaServices::new());
        let app = create_app(test_state(fake.clone()));

        let response = app
            .clone()
            .oneshot(
                Request::put("/api/v1/content-key-policies/DefaultDrmContentKeyPolicy")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert_eq!(
            body["data"]["options"],
            serde_json::json!([
                "ContentKeyPolicyOption_CENC_PlayReady",
                "ContentKeyPolicyOption_CENC_Widevine"
            ])
        );

        let response = app
            .oneshot(
                Request::delete("/api/v1/content-key-policies/DefaultDrmContentKeyPolicy")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert!(fake.policy("DefaultDrmContentKeyPolicy").is_none());
    }
}
