//! Async HTTP client for the AI proxy
//!
//! Two endpoints: `GET /api/health` and `POST /api/ai`. The proxy owns the
//! model credentials; this client only speaks the proxy's envelope
//! `{ok, result: {text, json}}`.

use crate::core::config::AiSettings;
use crate::core::error::{Result, SimError};
use crate::llm::{AiRequest, AiResult};
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;

/// Environment variable overriding the configured proxy URL
pub const PROXY_URL_ENV: &str = "AI_PROXY_URL";

/// Last known proxy health; transient, never saved
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HealthStatus {
    pub ok: bool,
    pub checked: bool,
    pub key_configured: bool,
    pub model: Option<String>,
    pub message: String,
}

impl HealthStatus {
    /// True only after a check that reported the proxy usable
    pub fn available(&self) -> bool {
        self.checked && self.ok
    }

    pub fn unavailable(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            checked: true,
            key_configured: false,
            model: None,
            message: message.into(),
        }
    }

    pub fn label(&self) -> &'static str {
        match (self.checked, self.ok) {
            (false, _) => "AI not checked",
            (true, true) => "AI online",
            (true, false) => "AI offline",
        }
    }
}

/// Client for the AI proxy
pub struct AiProxy {
    client: Client,
    base_url: String,
}

impl AiProxy {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| SimError::Ai(e.to_string()))?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    /// Build from settings, letting `AI_PROXY_URL` override the base URL
    pub fn from_env(settings: &AiSettings) -> Result<Self> {
        let base_url = std::env::var(PROXY_URL_ENV).unwrap_or_else(|_| settings.base_url.clone());
        Self::new(base_url, Duration::from_secs(settings.timeout_secs))
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Probe `/api/health`; network failures yield an unavailable status
    pub async fn health(&self) -> HealthStatus {
        match self.fetch_health().await {
            Ok(status) => {
                tracing::info!("AI proxy health: ok={} ({})", status.ok, status.message);
                status
            }
            Err(e) => {
                tracing::warn!("AI proxy health check failed: {}", e);
                HealthStatus::unavailable("AI service unavailable")
            }
        }
    }

    async fn fetch_health(&self) -> Result<HealthStatus> {
        let response = self
            .client
            .get(format!("{}/api/health", self.base_url))
            .send()
            .await
            .map_err(|e| SimError::Ai(e.to_string()))?;
        let success = response.status().is_success();
        let text = response
            .text()
            .await
            .map_err(|e| SimError::Ai(e.to_string()))?;
        let body: HealthBody = serde_json::from_str(&text).unwrap_or_default();
        Ok(HealthStatus {
            ok: success && body.ok,
            checked: true,
            key_configured: body.key_configured,
            model: body.model,
            message: body.message,
        })
    }

    /// Send one action to `/api/ai`
    ///
    /// Returns `None` on any failure; the caller falls back locally.
    pub async fn request(&self, request: &AiRequest) -> Option<AiResult> {
        match self.post(request).await {
            Ok(result) => Some(result),
            Err(e) => {
                tracing::warn!("AI {} failed, falling back: {}", request.action, e);
                None
            }
        }
    }

    /// Convenience for the begin/apply pattern: forwards a pending request
    pub async fn dispatch(&self, request: Option<AiRequest>) -> Option<AiResult> {
        match request {
            Some(req) => self.request(&req).await,
            None => None,
        }
    }

    async fn post(&self, request: &AiRequest) -> Result<AiResult> {
        let response = self
            .client
            .post(format!("{}/api/ai", self.base_url))
            .header("content-type", "application/json")
            .json(request)
            .send()
            .await
            .map_err(|e| SimError::Ai(e.to_string()))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| SimError::Ai(e.to_string()))?;
        if !status.is_success() {
            return Err(SimError::Ai(format!("API error {}: {}", status, text)));
        }
        crate::llm::parser::parse_envelope(&text)
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct HealthBody {
    ok: bool,
    key_configured: bool,
    model: Option<String>,
    message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_creation_trims_slash() {
        let proxy = AiProxy::new("http://localhost:8787/", Duration::from_secs(5)).unwrap();
        assert_eq!(proxy.base_url(), "http://localhost:8787");
    }

    #[test]
    fn test_health_labels() {
        assert_eq!(HealthStatus::default().label(), "AI not checked");
        assert!(!HealthStatus::default().available());
        let down = HealthStatus::unavailable("missing_api_key");
        assert_eq!(down.label(), "AI offline");
        assert!(!down.available());
    }

    #[test]
    fn test_health_body_shape() {
        let body: HealthBody = serde_json::from_str(
            r#"{"ok": true, "keyConfigured": true, "model": "deepseek-chat", "message": "ready"}"#,
        )
        .unwrap();
        assert!(body.ok && body.key_configured);
        assert_eq!(body.model.as_deref(), Some("deepseek-chat"));
    }

    #[tokio::test]
    async fn test_unreachable_proxy_degrades() {
        let proxy = AiProxy::new("http://127.0.0.1:9", Duration::from_millis(300)).unwrap();
        let status = proxy.health().await;
        assert!(status.checked);
        assert!(!status.ok);
        let result = proxy
            .request(&AiRequest {
                action: crate::llm::AiAction::DuelQuestion,
                payload: serde_json::json!({}),
            })
            .await;
        assert!(result.is_none());
    }
}
