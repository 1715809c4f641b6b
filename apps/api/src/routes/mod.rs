pub mod health;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::analysis::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        .route(
            "/api/v1/analyze-resume",
            post(handlers::handle_analyze_resume).options(handlers::handle_preflight),
        )
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::body::{to_bytes, Body};
    use axum::http::{header, Method, Request, StatusCode};
    use serde_json::Value;
    use tower::ServiceExt;

    use super::*;
    use crate::analysis::testing::{CannedDocuments, MemoryStore, ScriptedLlm};
    use crate::analysis::{AnalysisPipeline, PipelineSettings};
    use crate::document::ExtractedDocument;
    use crate::llm_client::{LlmError, RetryPolicy};

    fn app(responses: Vec<Result<String, LlmError>>) -> Router {
        let pipeline = AnalysisPipeline::new(
            Arc::new(MemoryStore::default()),
            Arc::new(CannedDocuments::new(ExtractedDocument::default())),
            Arc::new(ScriptedLlm::new(responses)),
            RetryPolicy::default().with_max_attempts(1),
            PipelineSettings::default(),
        );
        build_router(AppState {
            pipeline: Arc::new(pipeline),
        })
    }

    async fn json_body(response: axum::response::Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn analyze(body: &str) -> Request<Body> {
        Request::builder()
            .method(Method::POST)
            .uri("/api/v1/analyze-resume")
            .header(header::CONTENT_TYPE, "application/json")
            .header(header::ORIGIN, "https://careers.example.com")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn test_health() {
        let response = app(Vec::new())
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(json_body(response).await["status"], "ok");
    }

    #[tokio::test]
    async fn test_options_is_empty_200() {
        let response = app(Vec::new())
            .oneshot(
                Request::builder()
                    .method(Method::OPTIONS)
                    .uri("/api/v1/analyze-resume")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert!(bytes.is_empty());
    }

    #[tokio::test]
    async fn test_cors_preflight_is_answered() {
        let response = app(Vec::new())
            .oneshot(
                Request::builder()
                    .method(Method::OPTIONS)
                    .uri("/api/v1/analyze-resume")
                    .header(header::ORIGIN, "https://careers.example.com")
                    .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert!(response
            .headers()
            .contains_key(header::ACCESS_CONTROL_ALLOW_ORIGIN));
    }

    #[tokio::test]
    async fn test_missing_parameters_is_200_fallback() {
        let response = app(Vec::new())
            .oneshot(analyze(r#"{"jobDescription": "Rust engineer"}"#))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert!(response
            .headers()
            .contains_key(header::ACCESS_CONTROL_ALLOW_ORIGIN));
        let body = json_body(response).await;
        assert_eq!(body["overallScore"], 0);
        assert_eq!(body["fallback"], true);
        assert_eq!(body["cached"], false);
    }

    #[tokio::test]
    async fn test_short_content_is_keyword_fallback() {
        let response = app(Vec::new())
            .oneshot(analyze(
                r#"{"resumeContent": "Education, work, skills", "jobDescription": "Rust", "applicantId": 4}"#,
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert_eq!(body["overallScore"], 50);
        assert_eq!(body["skillsMatch"], "Low");
        assert!(body.get("extractedData").is_none());
    }

    #[tokio::test]
    async fn test_malformed_body_gets_json_error_envelope() {
        for body in [
            "not json",
            r#"{"jobId": "12", "jobDescription": "Rust", "resumeContent": "x"}"#,
        ] {
            let response = app(Vec::new()).oneshot(analyze(body)).await.unwrap();

            assert!(response.status().is_client_error());
            assert_eq!(
                response.headers()[header::CONTENT_TYPE],
                "application/json"
            );
            assert!(response
                .headers()
                .contains_key(header::ACCESS_CONTROL_ALLOW_ORIGIN));
            let body = json_body(response).await;
            assert!(body["error"]
                .as_str()
                .unwrap()
                .starts_with("Invalid request body"));
        }
    }

    #[tokio::test]
    async fn test_llm_failure_is_500_with_message() {
        let content = "EXPERIENCE\nAcme Corp\nSoftware Engineer\n2019 - 2021\n\nSKILLS\nRust, Go, SQL\n";
        let body = serde_json::json!({
            "resumeContent": content,
            "jobDescription": "Rust engineer",
        });
        let response = app(vec![Err(LlmError::Api {
            status: 401,
            message: "invalid api key".to_string(),
        })])
        .oneshot(analyze(&body.to_string()))
        .await
        .unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = json_body(response).await;
        assert!(body["error"].as_str().unwrap().contains("invalid api key"));
    }
}
