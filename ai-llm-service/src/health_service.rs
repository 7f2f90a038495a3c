//! Readiness check for the chat-completion backend.
//!
//! `GET {endpoint}/v1/models` with Bearer auth. A 2xx answer means the backend
//! is reachable; the configured model must also appear in the listing for the
//! check to report healthy. [`HealthService::check`] never fails.

use std::time::{Duration, Instant};

use reqwest::header;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::config::llm_model_config::LlmModelConfig;
use crate::error_handler::{AiLlmError, HealthError, HttpError, Provider, make_snippet};

const DEFAULT_CHECK_TIMEOUT_SECS: u64 = 10;

/// Health snapshot of one configured backend.
#[derive(Debug, Clone, Serialize)]
pub struct HealthStatus {
    pub provider: String,
    pub endpoint: String,
    pub model: Option<String>,
    pub ok: bool,
    /// Round-trip of the models request; 0 when no request was made.
    pub latency_ms: u128,
    pub message: String,
}

impl HealthStatus {
    fn report(cfg: &LlmModelConfig, ok: bool, latency_ms: u128, message: impl Into<String>) -> Self {
        Self {
            provider: Provider::OpenAI.to_string(),
            endpoint: cfg.endpoint.clone(),
            model: Some(cfg.model.clone()),
            ok,
            latency_ms,
            message: message.into(),
        }
    }
}

#[derive(Deserialize)]
struct ModelList {
    data: Vec<ModelEntry>,
}

#[derive(Deserialize)]
struct ModelEntry {
    id: String,
}

/// Verdict on a `/v1/models` body for `model`.
///
/// An undecodable listing still proves the server answered, so it counts as up.
fn assess_model_listing(body: &str, model: &str) -> (bool, String) {
    match serde_json::from_str::<ModelList>(body) {
        Ok(list) if list.data.iter().any(|m| m.id == model) => {
            (true, format!("model {model} is available"))
        }
        Ok(_) => (false, format!("backend is up but model {model} is not listed")),
        Err(e) => (true, format!("backend is reachable; model listing not decoded: {e}")),
    }
}

fn models_url(endpoint: &str) -> String {
    format!("{}/v1/models", endpoint.trim_end_matches('/'))
}

/// Checks a completion backend with its own short-timeout HTTP client.
pub struct HealthService {
    client: reqwest::Client,
    timeout: Duration,
}

impl HealthService {
    /// `timeout_secs` defaults to 10 seconds.
    ///
    /// # Errors
    /// Returns [`AiLlmError::HttpTransport`] if the HTTP client cannot be built.
    pub fn new(timeout_secs: Option<u64>) -> Result<Self, AiLlmError> {
        let timeout = Duration::from_secs(timeout_secs.unwrap_or(DEFAULT_CHECK_TIMEOUT_SECS));
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        debug!(timeout_secs = timeout.as_secs(), "health client ready");
        Ok(Self { client, timeout })
    }

    /// Checks `cfg`; failures are reported as `ok = false`.
    pub async fn check(&self, cfg: &LlmModelConfig) -> HealthStatus {
        let endpoint = cfg.endpoint.trim();
        if !(endpoint.starts_with("http://") || endpoint.starts_with("https://")) {
            warn!(endpoint = %cfg.endpoint, "health check skipped: endpoint is not http(s)");
            return HealthStatus::report(cfg, false, 0, "endpoint is empty or missing http/https");
        }

        let started = Instant::now();
        match self.list_models(cfg).await {
            Ok((ok, message)) => {
                let latency_ms = started.elapsed().as_millis();
                info!(model = %cfg.model, ok, latency_ms, "health check completed");
                HealthStatus::report(cfg, ok, latency_ms, message)
            }
            Err(e) => {
                let latency_ms = started.elapsed().as_millis();
                warn!(model = %cfg.model, latency_ms, error = %e, "health check failed");
                HealthStatus::report(cfg, false, latency_ms, e.to_string())
            }
        }
    }

    async fn list_models(&self, cfg: &LlmModelConfig) -> Result<(bool, String), AiLlmError> {
        let api_key = cfg
            .api_key
            .as_deref()
            .ok_or(HealthError::MissingApiKey)?;
        let url = models_url(&cfg.endpoint);
        let timeout = cfg
            .timeout_secs
            .map_or(self.timeout, Duration::from_secs)
            .min(self.timeout);

        debug!(%url, "probing model listing");
        let resp = self
            .client
            .get(&url)
            .timeout(timeout)
            .header(header::AUTHORIZATION, format!("Bearer {api_key}"))
            .send()
            .await?;

        let status = resp.status();
        let body = resp.text().await?;
        if !status.is_success() {
            return Err(HealthError::HttpStatus(HttpError {
                status,
                url,
                snippet: make_snippet(&body),
            })
            .into());
        }

        Ok(assess_model_listing(&body, &cfg.model))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cfg(endpoint: &str) -> LlmModelConfig {
        LlmModelConfig {
            model: "gpt-3.5-turbo".into(),
            endpoint: endpoint.into(),
            api_key: Some("sk".into()),
            max_tokens: None,
            temperature: Some(0.2),
            top_p: None,
            timeout_secs: Some(1),
        }
    }

    #[tokio::test]
    async fn invalid_endpoint_is_reported_without_network() {
        let svc = HealthService::new(Some(1)).unwrap();
        let status = svc.check(&cfg("ftp://nowhere")).await;
        assert!(!status.ok);
        assert_eq!(status.provider, "OpenAI");
        assert_eq!(status.latency_ms, 0);
    }

    #[tokio::test]
    async fn missing_key_is_reported_as_such() {
        let svc = HealthService::new(Some(1)).unwrap();
        let mut c = cfg("http://127.0.0.1:9");
        c.api_key = None;
        assert!(matches!(
            svc.list_models(&c).await,
            Err(AiLlmError::Health(HealthError::MissingApiKey))
        ));

        let status = svc.check(&c).await;
        assert!(!status.ok);
        assert_eq!(status.message, HealthError::MissingApiKey.to_string());
    }

    #[test]
    fn listing_must_contain_model() {
        let listed = r#"{"data":[{"id":"gpt-4o"},{"id":"gpt-3.5-turbo"}]}"#;
        assert!(assess_model_listing(listed, "gpt-3.5-turbo").0);

        let (ok, msg) = assess_model_listing(r#"{"data":[{"id":"gpt-4o"}]}"#, "gpt-3.5-turbo");
        assert!(!ok);
        assert!(msg.contains("not listed"));
    }

    #[test]
    fn undecodable_listing_counts_as_reachable() {
        let (ok, msg) = assess_model_listing("<html>proxy</html>", "gpt-3.5-turbo");
        assert!(ok);
        assert!(msg.starts_with("backend is reachable"));
    }

    #[test]
    fn models_url_ignores_trailing_slash() {
        assert_eq!(models_url("https://api.openai.com/"), "https://api.openai.com/v1/models");
    }
}
