//! 故事结构生成端点

use axum::{
    body::Bytes,
    extract::State,
    http::{Method, StatusCode},
    response::{IntoResponse, Response},
    routing::any,
    Json, Router,
};
use std::sync::Arc;
use tracing::{error, info_span, Instrument};

use super::cors::cors_headers;
use crate::error::{AppError, AppResult};
use crate::models::{StoryIdeaRequest, StoryStructure};
use crate::state::AppState;
use crate::utils::generate_request_id;

/// 解析请求体并生成故事结构
async fn create_structure(state: &AppState, body: &[u8]) -> AppResult<StoryStructure> {
    let value: serde_json::Value = serde_json::from_slice(body)
        .map_err(|e| AppError::Internal(format!("invalid request body: {}", e)))?;

    // 非对象的 JSON（数组、字符串等）没有 idea 字段
    let req = if value.is_object() {
        serde_json::from_value::<StoryIdeaRequest>(value)
            .map_err(|e| AppError::Internal(format!("invalid request body: {}", e)))?
    } else {
        StoryIdeaRequest::default()
    };

    let idea = req.normalized_idea();
    if idea.is_empty() {
        return Err(AppError::BadRequest("idea is required".to_string()));
    }

    Ok(state.story_service.generate(idea).await?)
}

async fn dispatch(state: Arc<AppState>, method: Method, body: Bytes) -> Response {
    match method {
        Method::OPTIONS => (StatusCode::NO_CONTENT, cors_headers()).into_response(),
        Method::POST => match create_structure(&state, &body).await {
            Ok(story) => (StatusCode::OK, cors_headers(), Json(story)).into_response(),
            Err(e) => {
                if e.status_code().is_server_error() {
                    error!("Unexpected error generating story structure: {}", e);
                }
                e.into_response()
            }
        },
        _ => AppError::MethodNotAllowed.into_response(),
    }
}

/// 故事结构处理器（接受任意方法，自行分派）
async fn generate_story_structure(
    State(state): State<Arc<AppState>>,
    method: Method,
    body: Bytes,
) -> Response {
    let span = info_span!("generate_story_structure", request_id = %generate_request_id());
    dispatch(state, method, body).instrument(span).await
}

/// 创建故事结构路由
pub fn story_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route(
            "/functions/v1/generate-story-structure",
            any(generate_story_structure),
        )
        .route("/generate-story-structure", any(generate_story_structure))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::create_api_routes;
    use crate::config::AppConfig;
    use crate::llm::testing::{Canned, FakeBackend};
    use crate::llm::CompletionBackend;
    use crate::services::StoryService;
    use axum::body::{to_bytes, Body};
    use axum::http::Request;
    use serde_json::Value;
    use tower::ServiceExt;

    const PATH: &str = "/functions/v1/generate-story-structure";

    fn fallback_app() -> Router {
        let service = StoryService::new(None, &AppConfig::default());
        create_api_routes(Arc::new(AppState::new(service)))
    }

    fn app_with(backend: &Arc<FakeBackend>) -> Router {
        let backend: Arc<dyn CompletionBackend> = backend.clone();
        let service = StoryService::new(Some(backend), &AppConfig::default());
        create_api_routes(Arc::new(AppState::new(service)))
    }

    async fn send(app: Router, method: Method, body: &str) -> (StatusCode, Response) {
        let request = Request::builder()
            .method(method)
            .uri(PATH)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();
        let response = app.oneshot(request).await.unwrap();
        (response.status(), response)
    }

    async fn body_bytes(response: Response) -> Bytes {
        to_bytes(response.into_body(), usize::MAX).await.unwrap()
    }

    async fn body_json(response: Response) -> Value {
        serde_json::from_slice(&body_bytes(response).await).unwrap()
    }

    fn assert_cors(response: &Response) {
        let headers = response.headers();
        assert_eq!(headers["access-control-allow-origin"], "*");
        assert_eq!(
            headers["access-control-allow-headers"],
            "authorization, x-client-info, apikey, content-type"
        );
        assert_eq!(headers["access-control-allow-methods"], "POST, OPTIONS");
        assert_eq!(headers["access-control-max-age"], "86400");
        assert_eq!(headers["content-type"], "application/json");
    }

    #[tokio::test]
    async fn test_options_preflight() {
        let (status, response) = send(fallback_app(), Method::OPTIONS, "garbage {").await;
        assert_eq!(status, StatusCode::NO_CONTENT);
        assert_cors(&response);
        assert!(body_bytes(response).await.is_empty());
    }

    #[tokio::test]
    async fn test_method_not_allowed() {
        for method in [Method::GET, Method::PUT, Method::DELETE] {
            let (status, response) = send(fallback_app(), method, "").await;
            assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
            assert_cors(&response);
            assert_eq!(body_json(response).await["error"], "Method not allowed");
        }
    }

    #[tokio::test]
    async fn test_empty_idea_is_bad_request_without_upstream_call() {
        let backend = FakeBackend::new(Canned::Content("{}".to_string()));
        for body in [r#"{"idea": ""}"#, r#"{"idea": "   "}"#, "{}"] {
            let (status, response) = send(app_with(&backend), Method::POST, body).await;
            assert_eq!(status, StatusCode::BAD_REQUEST);
            assert_cors(&response);
            let json = body_json(response).await;
            assert_eq!(json, serde_json::json!({ "error": "idea is required" }));
        }
        assert_eq!(backend.call_count(), 0);
    }

    #[tokio::test]
    async fn test_fallback_response_is_deterministic() {
        let body = r#"{"idea": "why do leaves change color"}"#;
        let (status, first) = send(fallback_app(), Method::POST, body).await;
        assert_eq!(status, StatusCode::OK);
        assert_cors(&first);
        let (_, second) = send(fallback_app(), Method::POST, body).await;

        let first = body_bytes(first).await;
        let second = body_bytes(second).await;
        assert_eq!(first, second);

        let json: Value = serde_json::from_slice(&first).unwrap();
        assert_eq!(json["title"], "Why do leaves change color");
        assert_eq!(json["topicTag"], "Science");
    }

    #[tokio::test]
    async fn test_fallback_long_idea_truncated() {
        let idea = "the amazing journey of a water droplet through the whole water cycle";
        let body = serde_json::json!({ "idea": idea }).to_string();
        let (status, response) = send(fallback_app(), Method::POST, &body).await;
        assert_eq!(status, StatusCode::OK);

        let title = body_json(response).await["title"].as_str().unwrap().to_string();
        let expected: String = "The amazing journey of a water droplet through the whole water cycle"
            .chars()
            .take(37)
            .collect();
        assert_eq!(title, format!("{}...", expected));
    }

    #[tokio::test]
    async fn test_upstream_error_is_generic_500() {
        let backend = FakeBackend::new(Canned::ApiError(500, "model overloaded".to_string()));
        let (status, response) =
            send(app_with(&backend), Method::POST, r#"{"idea": "rainbows"}"#).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_cors(&response);
        assert_eq!(
            body_json(response).await,
            serde_json::json!({ "error": "Unexpected error generating story structure" })
        );
        assert_eq!(backend.call_count(), 1);
    }

    #[tokio::test]
    async fn test_malformed_upstream_content_is_500() {
        let backend = FakeBackend::new(Canned::Content("Sure! Here is your story".to_string()));
        let (status, _) = send(app_with(&backend), Method::POST, r#"{"idea": "rainbows"}"#).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn test_partial_upstream_structure_is_filled() {
        let backend = FakeBackend::new(Canned::Content(
            r#"{"title": "Rainbow Rescue", "summary": "Light splits into colors.", "readingLevel": "Ages 7-9", "estimatedTime": "4 minutes"}"#
                .to_string(),
        ));
        let (status, response) =
            send(app_with(&backend), Method::POST, r#"{"idea": "rainbows"}"#).await;
        assert_eq!(status, StatusCode::OK);

        let json = body_json(response).await;
        assert_eq!(json["title"], "Rainbow Rescue");
        assert_eq!(json["summary"], "Light splits into colors.");
        assert_eq!(json["topicTag"], "Science");
        assert_eq!(json["estimatedTime"], "4 minutes");
    }

    #[tokio::test]
    async fn test_malformed_request_body_is_500() {
        let (status, response) = send(fallback_app(), Method::POST, "not json").await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_cors(&response);

        let (status, _) = send(fallback_app(), Method::POST, r#"{"idea": 12}"#).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn test_non_object_body_has_no_idea() {
        let backend = FakeBackend::new(Canned::Content("{}".to_string()));
        for body in [r#"["rain"]"#, r#""rain""#, "42"] {
            let (status, response) = send(app_with(&backend), Method::POST, body).await;
            assert_eq!(status, StatusCode::BAD_REQUEST, "body: {}", body);
            assert_cors(&response);
            assert_eq!(body_json(response).await["error"], "idea is required");
        }
        assert_eq!(backend.call_count(), 0);
    }

    #[tokio::test]
    async fn test_short_path_alias() {
        let request = Request::builder()
            .method(Method::POST)
            .uri("/generate-story-structure")
            .body(Body::from(r#"{"idea": "ants"}"#))
            .unwrap();
        let response = fallback_app().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await["title"], "Ants");
    }

    #[tokio::test]
    async fn test_health_reports_mode() {
        let request = Request::builder()
            .uri("/api/health")
            .body(Body::empty())
            .unwrap();
        let response = fallback_app().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["status"], "ok");
        assert_eq!(json["mode"], "fallback");
    }
}
