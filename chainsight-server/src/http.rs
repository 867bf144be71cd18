//! Chainsight insight gateway HTTP API
//!
//! Axum-based HTTP server that relays dashboard snapshots to the upstream
//! completions API and returns narrative insight text.
//!
//! Architecture: each endpoint has a thin axum handler that delegates to a
//! pure inner function. The inner functions are directly testable without
//! axum dispatch machinery.
//!
//! Endpoints:
//! - GET  /health       — config readiness info
//! - GET  /version      — server version info
//! - POST /api/insights — generate insight text for one dashboard section
//!
//! Every request is independent: the only shared state is the read-only
//! config and the upstream client handle. No caching, no sessions.

use std::sync::Arc;

use anyhow::Result;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use chainsight_core::{compose_prompt, ChatCompletionClient, InsightConfig, SYSTEM_PROMPT};
use serde::Deserialize;
use tokio::net::TcpListener;
use tokio::sync::broadcast;

/// Placeholder returned when the upstream succeeds without usable content.
pub const NO_INSIGHTS: &str = "No insights generated.";

/// Generic failure body; upstream status and reason are logged, never leaked.
pub const GENERATION_FAILED: &str = "Error generating insights. Please try again later.";

/// Shared state for all HTTP handlers
#[derive(Clone)]
pub struct HttpState {
    pub config: InsightConfig,
    /// `None` when no upstream credential is configured; requests then fail
    /// with the wire-contract 500 body instead of contacting upstream.
    pub completion: Option<ChatCompletionClient>,
}

/// Build the Axum router with all endpoints
pub fn build_router(state: Arc<HttpState>) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .route("/version", get(version_handler))
        .route(
            "/api/insights",
            post(insights_handler).fallback(method_not_allowed_handler),
        )
        .with_state(state)
}

/// Start the HTTP server on the configured address.
/// Gracefully shuts down when the broadcast shutdown signal fires.
pub async fn start_http_server(
    config: InsightConfig,
    completion: Option<ChatCompletionClient>,
    mut shutdown: broadcast::Receiver<()>,
) -> Result<()> {
    let addr = format!("{}:{}", config.http.host, config.http.port);
    let state = Arc::new(HttpState { config, completion });

    let app = build_router(state);
    let listener = TcpListener::bind(&addr).await?;
    tracing::info!("Chainsight gateway listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            let _ = shutdown.recv().await;
            tracing::info!("HTTP server shutting down...");
        })
        .await?;

    Ok(())
}

// ============================================================================
// Request DTO
// ============================================================================

/// Body of POST /api/insights. All fields optional at the serde layer so
/// presence is validated in one place with the wire-contract error body.
#[derive(Debug, Deserialize, Default)]
pub struct InsightRequest {
    pub context: Option<String>,
    pub data: Option<serde_json::Value>,
    pub lang: Option<String>,
}

// ============================================================================
// Inner (directly testable) business logic functions
// ============================================================================

/// Inner health — reports config readiness (no dependencies to probe).
pub fn health_inner(state: &HttpState) -> (StatusCode, serde_json::Value) {
    (
        StatusCode::OK,
        serde_json::json!({
            "status": "healthy",
            "version": env!("CARGO_PKG_VERSION"),
            "model": state.config.openai.model,
            "upstream_configured": state.completion.is_some(),
        }),
    )
}

/// Inner version — returns version info (pure, no IO).
pub fn version_inner() -> serde_json::Value {
    serde_json::json!({
        "version": env!("CARGO_PKG_VERSION"),
        "protocol": "chainsight/1",
    })
}

/// Inner insight generation — validate, compose, call upstream, map response.
///
/// Rejections are terminal: the credential guard runs before field
/// validation (a misconfigured server answers 500 regardless of body), and
/// no rejected request ever reaches the upstream API.
pub async fn insights_inner(
    state: &HttpState,
    req: InsightRequest,
) -> (StatusCode, serde_json::Value) {
    let completion = match &state.completion {
        Some(c) => c,
        None => {
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                serde_json::json!({ "error": "OpenAI API key not configured" }),
            );
        }
    };

    let (context, data, lang) = match (req.context, req.data, req.lang) {
        (Some(context), Some(data), Some(lang))
            if !context.trim().is_empty() && !lang.trim().is_empty() && !data.is_null() =>
        {
            (context, data, lang)
        }
        _ => {
            return (
                StatusCode::BAD_REQUEST,
                serde_json::json!({ "error": "Missing required parameters" }),
            );
        }
    };

    let serialized_len = data.to_string().len();
    if serialized_len > state.config.limits.max_data_bytes {
        tracing::warn!(
            bytes = serialized_len,
            limit = state.config.limits.max_data_bytes,
            "Rejecting oversized data snapshot"
        );
        return (
            StatusCode::PAYLOAD_TOO_LARGE,
            serde_json::json!({ "error": "Data payload too large" }),
        );
    }

    let prompt = compose_prompt(&context, &data, &lang);

    match completion.complete(SYSTEM_PROMPT, &prompt).await {
        Ok(Some(insight)) => (StatusCode::OK, serde_json::json!({ "insight": insight })),
        Ok(None) => (StatusCode::OK, serde_json::json!({ "insight": NO_INSIGHTS })),
        Err(e) => {
            tracing::error!(context = %context, error = %e, "Insight generation failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                serde_json::json!({ "error": GENERATION_FAILED }),
            )
        }
    }
}

// ============================================================================
// Axum handler wrappers (thin — delegate to inner functions)
// ============================================================================

pub async fn health_handler(State(state): State<Arc<HttpState>>) -> impl IntoResponse {
    let (status, body) = health_inner(&state);
    (status, Json(body))
}

pub async fn version_handler() -> impl IntoResponse {
    (StatusCode::OK, Json(version_inner()))
}

pub async fn insights_handler(
    State(state): State<Arc<HttpState>>,
    Json(req): Json<InsightRequest>,
) -> impl IntoResponse {
    let (status, body) = insights_inner(&state, req).await;
    (status, Json(body))
}

/// Non-POST methods on /api/insights get the wire-contract 405 body without
/// the request body being inspected.
pub async fn method_not_allowed_handler() -> impl IntoResponse {
    (
        StatusCode::METHOD_NOT_ALLOWED,
        Json(serde_json::json!({ "error": "Method not allowed" })),
    )
}

// ============================================================================
// Unit Tests — inner functions with a stubbed upstream
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chainsight_core::OpenAiConfig;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn upstream_config() -> OpenAiConfig {
        OpenAiConfig {
            api_key: Some("test-api-key".to_string()),
            ..OpenAiConfig::default()
        }
    }

    fn state_with_upstream(base_url: String) -> HttpState {
        let client = ChatCompletionClient::with_base_url(&upstream_config(), base_url)
            .expect("Failed to create upstream client");
        HttpState {
            config: InsightConfig::default(),
            completion: Some(client),
        }
    }

    fn state_without_credential() -> HttpState {
        HttpState {
            config: InsightConfig::default(),
            completion: None,
        }
    }

    fn valid_request() -> InsightRequest {
        InsightRequest {
            context: Some("Warehouse KPIs".to_string()),
            data: Some(serde_json::json!([{"day": "Mon", "hours": 42}])),
            lang: Some("English".to_string()),
        }
    }

    #[test]
    fn test_version_inner_pure() {
        let v = version_inner();
        assert!(v["version"].is_string(), "version must be string");
        assert_eq!(v["protocol"], "chainsight/1");
    }

    #[test]
    fn test_health_inner_reports_upstream_state() {
        let (status, body) = health_inner(&state_without_credential());
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "healthy");
        assert_eq!(body["upstream_configured"], false);
        assert_eq!(body["model"], "gpt-4");
    }

    #[tokio::test]
    async fn test_insights_inner_missing_credential_returns_500() {
        let state = state_without_credential();

        let (status, body) = insights_inner(&state, valid_request()).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], "OpenAI API key not configured");
    }

    #[tokio::test]
    async fn test_insights_inner_missing_fields_never_contact_upstream() {
        let mock_server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&mock_server)
            .await;

        let state = state_with_upstream(mock_server.uri());

        let cases = vec![
            InsightRequest {
                context: None,
                ..valid_request()
            },
            InsightRequest {
                data: None,
                ..valid_request()
            },
            InsightRequest {
                lang: None,
                ..valid_request()
            },
            InsightRequest {
                context: Some("   ".to_string()),
                ..valid_request()
            },
            InsightRequest::default(),
        ];

        for req in cases {
            let (status, body) = insights_inner(&state, req).await;
            assert_eq!(status, StatusCode::BAD_REQUEST);
            assert_eq!(body["error"], "Missing required parameters");
        }
    }

    #[tokio::test]
    async fn test_insights_inner_oversized_data_rejected_before_upstream() {
        let mock_server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&mock_server)
            .await;

        let mut state = state_with_upstream(mock_server.uri());
        state.config.limits.max_data_bytes = 16;

        let req = InsightRequest {
            data: Some(serde_json::json!({"rows": "x".repeat(64)})),
            ..valid_request()
        };

        let (status, body) = insights_inner(&state, req).await;
        assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
        assert_eq!(body["error"], "Data payload too large");
    }

    #[tokio::test]
    async fn test_insights_inner_upstream_error_collapses_to_generic_500() {
        let mock_server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(ResponseTemplate::new(502).set_body_json(serde_json::json!({
                "error": { "message": "bad gateway upstream" }
            })))
            .mount(&mock_server)
            .await;

        let state = state_with_upstream(mock_server.uri());

        let (status, body) = insights_inner(&state, valid_request()).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], GENERATION_FAILED);
        // The upstream status must not be echoed to the caller
        assert!(!body.to_string().contains("502"));
        assert!(!body.to_string().contains("bad gateway upstream"));
    }

    #[tokio::test]
    async fn test_insights_inner_empty_choices_yield_placeholder() {
        let mock_server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(serde_json::json!({ "choices": [] })),
            )
            .mount(&mock_server)
            .await;

        let state = state_with_upstream(mock_server.uri());

        let (status, body) = insights_inner(&state, valid_request()).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["insight"], NO_INSIGHTS);
    }

    #[tokio::test]
    async fn test_insights_inner_roundtrip() {
        let mock_server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "choices": [ { "message": { "role": "assistant", "content": "Trends: stable." } } ]
            })))
            .mount(&mock_server)
            .await;

        let state = state_with_upstream(mock_server.uri());

        let (status, body) = insights_inner(&state, valid_request()).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["insight"], "Trends: stable.");
    }
}
