//! HTTP client for the Chainsight insight gateway.
//!
//! Callers get a plain string back in every case: either generated insight
//! text or a fixed fallback. Failures never propagate, so UI code needs no
//! error-handling branch. No retries, no caching.

use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;

/// Returned when the gateway is unreachable or answers with a non-2xx status.
pub const FALLBACK_INSIGHT: &str = "Error generating insights. Please try again later.";

/// Returned when the gateway answers 200 without an insight field.
pub const EMPTY_INSIGHT: &str = "No insights generated.";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

#[derive(Debug, Deserialize)]
struct InsightResponse {
    insight: Option<String>,
}

/// Client for the insight gateway. Always targets the fixed `/api/insights`
/// path under its base URL.
#[derive(Debug, Clone)]
pub struct InsightClient {
    client: Client,
    base_url: String,
}

impl InsightClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .unwrap_or_else(|_| Client::new());

        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    /// Request insight text for one dashboard section.
    ///
    /// Never returns an error: transport failures and non-2xx statuses
    /// collapse to [`FALLBACK_INSIGHT`] after a diagnostic log entry.
    pub async fn generate_insights(
        &self,
        context: &str,
        data: &serde_json::Value,
        lang: &str,
    ) -> String {
        let url = format!("{}/api/insights", self.base_url);
        let body = serde_json::json!({
            "context": context,
            "data": data,
            "lang": lang,
        });

        let response = match self.client.post(&url).json(&body).send().await {
            Ok(r) => r,
            Err(e) => {
                tracing::error!(error = %e, "Insight request failed");
                return FALLBACK_INSIGHT.to_string();
            }
        };

        if !response.status().is_success() {
            tracing::error!(
                status = response.status().as_u16(),
                "Insight gateway returned an error status"
            );
            return FALLBACK_INSIGHT.to_string();
        }

        match response.json::<InsightResponse>().await {
            Ok(InsightResponse {
                insight: Some(text),
            }) => text,
            Ok(InsightResponse { insight: None }) => EMPTY_INSIGHT.to_string(),
            Err(e) => {
                tracing::error!(error = %e, "Failed to parse insight response");
                FALLBACK_INSIGHT.to_string()
            }
        }
    }

    /// GET /health on the gateway. Unlike insight generation this is a
    /// diagnostic call, so failures are surfaced to the caller.
    pub async fn health(&self) -> Result<serde_json::Value, reqwest::Error> {
        self.client
            .get(format!("{}/health", self.base_url))
            .send()
            .await?
            .error_for_status()?
            .json()
            .await
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

// ============================================================================
// TESTS
// ============================================================================
