pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::engagement::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        .route("/api/v1/insights", post(handlers::handle_insights))
        .route("/api/v1/classify", post(handlers::handle_classify))
        .route(
            "/api/v1/questions/auto",
            post(handlers::handle_auto_questions),
        )
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use super::*;
    use crate::engagement::advisor::tests::{FakeGenerator, MemoryStore};
    use crate::engagement::advisor::EngagementAdvisor;
    use crate::engagement::fallback::OVERPERFORMING_QUESTIONS;

    fn router_with(llm: FakeGenerator, store: Arc<MemoryStore>) -> Router {
        build_router(AppState {
            advisor: EngagementAdvisor::new(Arc::new(llm), store),
        })
    }

    async fn post_json(app: Router, uri: &str, body: Value) -> (StatusCode, Value) {
        let request = Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();
        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_health() {
        let app = router_with(FakeGenerator::failing(), Arc::new(MemoryStore::default()));
        let request = Request::builder().uri("/health").body(Body::empty()).unwrap();
        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_missing_fields_is_bad_request() {
        let app = router_with(FakeGenerator::failing(), Arc::new(MemoryStore::default()));
        let (status, body) =
            post_json(app, "/api/v1/insights", json!({"type": "underperforming"})).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["message"], "Missing required fields");
    }

    #[tokio::test]
    async fn test_custom_without_request_is_bad_request() {
        let app = router_with(FakeGenerator::failing(), Arc::new(MemoryStore::default()));
        let (status, body) = post_json(
            app,
            "/api/v1/insights",
            json!({"userId": "U1", "userMetrics": {}, "type": "custom"}),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(
            body["error"]["message"],
            "Custom request is required for custom type"
        );
    }

    #[tokio::test]
    async fn test_unknown_type_is_bad_request() {
        let app = router_with(FakeGenerator::failing(), Arc::new(MemoryStore::default()));
        let (status, body) = post_json(
            app,
            "/api/v1/insights",
            json!({"userId": "U1", "userMetrics": {}, "type": "normal"}),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_questions_fall_back_when_generator_is_down() {
        let app = router_with(FakeGenerator::failing(), Arc::new(MemoryStore::default()));
        let (status, body) = post_json(
            app,
            "/api/v1/insights",
            json!({
                "userId": "U2",
                "userMetrics": {"messages_sent": 60, "participation_rate": 0.85},
                "type": "overperforming"
            }),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        let result: Vec<String> = serde_json::from_value(body["result"].clone()).unwrap();
        assert_eq!(result, OVERPERFORMING_QUESTIONS.to_vec());
    }

    #[tokio::test]
    async fn test_insight_result_has_all_fields() {
        let app = router_with(FakeGenerator::failing(), Arc::new(MemoryStore::default()));
        let (status, body) = post_json(
            app,
            "/api/v1/insights",
            json!({
                "userId": "U3",
                "userMetrics": {"messages_sent": 20, "participation_rate": 0.5},
                "type": "insights"
            }),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        let result = &body["result"];
        for key in [
            "assessment",
            "strengths",
            "concerns",
            "factors",
            "recommendations",
            "risk_level",
            "confidence_score",
        ] {
            assert!(result.get(key).is_some(), "missing {key}");
        }
        assert_eq!(result["risk_level"], "low");
    }

    #[tokio::test]
    async fn test_classify_endpoint() {
        let app = router_with(FakeGenerator::failing(), Arc::new(MemoryStore::default()));
        let (status, body) = post_json(
            app,
            "/api/v1/classify",
            json!({"userMetrics": {"participation_rate": 0.5, "messages_sent": 20, "days_since_active": 10}}),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["category"], "silent_quitting");
    }

    #[tokio::test]
    async fn test_auto_questions_skip_normal_members() {
        let llm = FakeGenerator::failing();
        let app = router_with(llm, Arc::new(MemoryStore::default()));
        let (status, body) = post_json(
            app,
            "/api/v1/questions/auto",
            json!({"userId": "U4", "userMetrics": {"participation_rate": 0.5, "messages_sent": 20}}),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["category"], "normal");
        assert!(body["batch"].is_null());
    }

    #[tokio::test]
    async fn test_auto_questions_generate_for_category() {
        let app = router_with(
            FakeGenerator::failing(),
            Arc::new(MemoryStore::default()),
        );
        let (status, body) = post_json(
            app,
            "/api/v1/questions/auto",
            json!({"userId": "U5", "userMetrics": {"participation_rate": 0.1, "messages_sent": 3}}),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["category"], "underperforming");
        assert_eq!(body["batch"]["priority"], 4);
        assert_eq!(body["batch"]["source"], "fallback");
        assert_eq!(body["batch"]["questions"].as_array().unwrap().len(), 5);
    }
}
