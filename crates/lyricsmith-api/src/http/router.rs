//! Axum router configuration with middleware.
//!
//! Middleware: CORS, tracing.
//!
//! Static pages (index, form, chat) are served from `server.web_dir`.
//! API routes take priority; unknown paths fall through to `index.html`.
//! If the directory does not exist, only the API is served.

use axum::Router;
use axum::routing::{get, post};
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::{ServeDir, ServeFile};
use tower_http::trace::TraceLayer;

use crate::http::handlers;
use crate::state::AppState;

/// Build the complete router with all routes and middleware.
pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let web_dir = state.config.server.web_dir.clone();

    let mut router = Router::new()
        .route("/generate", post(handlers::generate::generate))
        .route("/generate-form", post(handlers::generate::generate))
        .route("/chat", post(handlers::chat::chat))
        .route("/clear", post(handlers::chat::clear))
        .route("/result", get(handlers::result::get_result))
        .route("/health", get(health_check))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    if std::path::Path::new(&web_dir).is_dir() {
        let index_path = format!("{web_dir}/index.html");
        let serve_dir = ServeDir::new(&web_dir).fallback(ServeFile::new(index_path));
        router = router.fallback_service(serve_dir);
        tracing::info!(path = %web_dir, "static file serving enabled");
    } else {
        tracing::warn!(path = %web_dir, "web directory not found, serving API only");
    }

    router
}

/// GET /health - Simple health check endpoint.
async fn health_check() -> axum::Json<serde_json::Value> {
    axum::Json(serde_json::json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

#[cfg(test)]
mod tests {
    use axum::body::Body;
    use axum::http::header::{CONTENT_TYPE, COOKIE, LOCATION, SET_COOKIE};
    use axum::http::{Request, StatusCode};
    use httpmock::prelude::*;
    use secrecy::SecretString;
    use tower::ServiceExt;

    use lyricsmith_core::session::SessionStore;
    use lyricsmith_types::config::AppConfig;
    use lyricsmith_types::generation::{GenerationRequest, GenerationResult};
    use lyricsmith_types::session::SessionId;

    use super::*;

    /// State without an API key and with no static directory.
    fn test_state() -> AppState {
        let mut config = AppConfig::default();
        config.server.web_dir = "does-not-exist-for-tests".to_string();
        AppState::new(config, None).unwrap()
    }

    async fn body_json(response: axum::response::Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), 1 << 20).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn health_returns_ok() {
        let app = build_router(test_state());
        let response = app
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["status"], "ok");
        assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
    }

    #[tokio::test]
    async fn generate_with_empty_memory_is_bad_request() {
        let app = build_router(test_state());
        let response = app
            .oneshot(
                Request::post("/generate")
                    .header(CONTENT_TYPE, "application/x-www-form-urlencoded")
                    .body(Body::from("memory=+++&genre=pop"))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(response).await["error"], "Please describe your memory");
    }

    #[tokio::test]
    async fn generate_form_accepts_multipart() {
        let app = build_router(test_state());
        let boundary = "lyricsmithboundary";
        let body = format!(
            "--{boundary}\r\n\
             Content-Disposition: form-data; name=\"memory\"\r\n\r\n\
             \r\n\
             --{boundary}\r\n\
             Content-Disposition: form-data; name=\"genre\"\r\n\r\n\
             pop\r\n\
             --{boundary}--\r\n"
        );

        let response = app
            .oneshot(
                Request::post("/generate-form")
                    .header(CONTENT_TYPE, format!("multipart/form-data; boundary={boundary}"))
                    .body(Body::from(body))
                    .unwrap(),
            )
            .await
            .unwrap();

        // The body parsed; an empty memory is then rejected by validation.
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(response).await["error"], "Please describe your memory");
    }

    #[tokio::test]
    async fn generate_without_api_key_is_server_error() {
        let app = build_router(test_state());
        let response = app
            .oneshot(
                Request::post("/generate")
                    .header(CONTENT_TYPE, "application/x-www-form-urlencoded")
                    .body(Body::from("memory=Rain+on+the+roof&language=hindi"))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let error = body_json(response).await["error"].as_str().unwrap().to_string();
        assert!(error.starts_with("Generation failed: "), "got {error}");
    }

    #[tokio::test]
    async fn chat_blank_message_is_bad_request() {
        let app = build_router(test_state());
        let response = app
            .oneshot(
                Request::post("/chat")
                    .header(CONTENT_TYPE, "application/json")
                    .body(Body::from(r#"{"message":"   "}"#))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(response).await["error"], "Please enter a message");
    }

    #[tokio::test]
    async fn chat_without_api_key_returns_error_body() {
        let app = build_router(test_state());
        let response = app
            .oneshot(
                Request::post("/chat")
                    .header(CONTENT_TYPE, "application/json")
                    .body(Body::from(r#"{"message":"hello","language":"telugu"}"#))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(body_json(response).await["error"].is_string());
    }

    #[tokio::test]
    async fn chat_malformed_json_is_bad_request() {
        let app = build_router(test_state());
        let response = app
            .oneshot(
                Request::post("/chat")
                    .header(CONTENT_TYPE, "application/json")
                    .body(Body::from("{not json"))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn clear_sets_cookie_for_new_session() {
        let app = build_router(test_state());
        let response = app
            .oneshot(Request::post("/clear").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let cookie = response.headers().get(SET_COOKIE).unwrap().to_str().unwrap();
        assert!(cookie.starts_with("lyricsmith_session="));
        assert!(cookie.contains("HttpOnly"));
        assert_eq!(body_json(response).await["success"], true);
    }

    #[tokio::test]
    async fn result_without_lyrics_redirects_home() {
        let app = build_router(test_state());
        let response = app
            .oneshot(
                Request::get("/result")
                    .header(COOKIE, format!("lyricsmith_session={}", SessionId::new()))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert!(response.status().is_redirection());
        assert_eq!(response.headers().get(LOCATION).unwrap(), "/");
    }

    #[tokio::test]
    async fn result_returns_stored_lyrics() {
        let state = test_state();
        let session = SessionId::new();
        let request = GenerationRequest {
            memory: "first snow".to_string(),
            genre: "ballad".to_string(),
            ..Default::default()
        };
        state
            .session_store
            .put_result(&session, GenerationResult::new("[Verse 1]\nWhite streets".to_string(), request))
            .await
            .unwrap();

        let app = build_router(state);
        let response = app
            .oneshot(
                Request::get("/result")
                    .header(COOKIE, format!("lyricsmith_session={session}"))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert!(response.headers().get(SET_COOKIE).is_none());
        let body = body_json(response).await;
        assert_eq!(body["lyrics"], "[Verse 1]\nWhite streets");
        assert_eq!(body["inputs"]["genre"], "ballad");
        assert!(body["created_at"].is_string());
    }

    #[tokio::test]
    async fn generate_then_result_and_chat_succeed() {
        let server = MockServer::start_async().await;
        let completions = server
            .mock_async(|when, then| {
                when.method(POST)
                    .path("/chat/completions")
                    .header("authorization", "Bearer sk-test");
                then.status(200)
                    .header("content-type", "application/json")
                    .body(r#"{"choices":[{"message":{"role":"assistant","content":"[Verse 1]\nhi"}}]}"#);
            })
            .await;

        let mut config = AppConfig::default();
        config.server.web_dir = "does-not-exist-for-tests".to_string();
        config.completion.base_url = server.base_url();
        config.completion.max_retries = 0;
        let state = AppState::new(config, Some(SecretString::from("sk-test"))).unwrap();

        let response = build_router(state.clone())
            .oneshot(
                Request::post("/generate")
                    .header(CONTENT_TYPE, "application/x-www-form-urlencoded")
                    .body(Body::from("memory=Rain+on+the+roof&genre=folk"))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let cookie = response
            .headers()
            .get(SET_COOKIE)
            .unwrap()
            .to_str()
            .unwrap()
            .split(';')
            .next()
            .unwrap()
            .to_string();
        assert_eq!(
            body_json(response).await,
            serde_json::json!({"success": true, "redirect": "/result"})
        );

        let response = build_router(state.clone())
            .oneshot(
                Request::get("/result")
                    .header(COOKIE, &cookie)
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["lyrics"], "[Verse 1]\nhi");
        assert_eq!(body["inputs"]["genre"], "folk");

        let response = build_router(state)
            .oneshot(
                Request::post("/chat")
                    .header(CONTENT_TYPE, "application/json")
                    .header(COOKIE, &cookie)
                    .body(Body::from(r#"{"message":"a song about my dog"}"#))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert!(response.headers().get(SET_COOKIE).is_none());
        assert_eq!(
            body_json(response).await,
            serde_json::json!({"success": true, "response": "[Verse 1]\nhi"})
        );

        completions.assert_hits_async(2).await;
    }
}
