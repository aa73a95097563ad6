//! Capability seams for the external AI services the gate depends on, with
//! reqwest-backed implementations. Each seam is a trait so the engine can
//! be exercised in tests with in-memory fakes.

pub mod anthropic;
pub mod gemini;
pub mod openai;
pub mod perplexity;

pub use anthropic::ClaudeVision;
pub use gemini::GeminiClient;
pub use openai::OpenAiClient;
pub use perplexity::PerplexitySearch;

use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;

use crate::error::GateError;

/// Embeds a search query into a vector for similarity search.
#[async_trait]
pub trait QueryEmbedder: Send + Sync {
    async fn embed_query(&self, text: &str) -> Result<Vec<f32>, GateError>;
}

/// Generates an answer from a prompt (optionally split into system and user
/// parts for providers with chat-shaped APIs).
#[async_trait]
pub trait AnswerGenerator: Send + Sync {
    async fn generate(&self, system: Option<&str>, prompt: &str) -> Result<String, GateError>;
}

#[derive(Debug, Clone)]
pub struct VisionAnswer {
    pub answer: String,
    /// Fixed per-provider confidence reported back to the caller.
    pub confidence: f32,
}

/// Answers a question from rendered page images (data URLs or plain URLs).
#[async_trait]
pub trait VisionAnalyzer: Send + Sync {
    fn name(&self) -> &'static str;
    async fn analyze(&self, prompt: &str, images: &[String]) -> Result<VisionAnswer, GateError>;
}

#[derive(Debug, Clone)]
pub struct WebAnswer {
    pub answer: String,
    pub citations: Vec<String>,
}

/// Researches a franchise on the open web.
#[async_trait]
pub trait WebSearcher: Send + Sync {
    async fn search(&self, system: &str, prompt: &str) -> Result<WebAnswer, GateError>;
}

/// Shared HTTP client for provider calls. Connect failures surface quickly;
/// generation calls get a generous overall budget.
pub(crate) fn http_client() -> Result<Client, GateError> {
    Client::builder()
        .connect_timeout(std::time::Duration::from_secs(15))
        .timeout(std::time::Duration::from_secs(120))
        .tcp_nodelay(true)
        .build()
        .map_err(|e| GateError::Internal(anyhow::anyhow!("failed to build HTTP client: {}", e)))
}

/// Check the status and parse the body as JSON, returning a clear upstream
/// error when the service returned a failure status or HTML (e.g. a
/// gateway error page) instead of valid JSON.
pub(crate) async fn read_json<T: DeserializeOwned>(
    response: reqwest::Response,
    service: &'static str,
) -> Result<T, GateError> {
    let status = response.status();
    let body = response
        .text()
        .await
        .map_err(|e| GateError::upstream(service, status.as_u16(), format!("failed to read response body: {}", e)))?;

    if !status.is_success() {
        let preview: String = body.chars().take(300).collect();
        tracing::error!(service, status = status.as_u16(), error = %preview, "upstream returned error status");
        return Err(GateError::upstream(service, status.as_u16(), preview));
    }

    let trimmed = body.trim_start();
    if trimmed.starts_with('<') {
        let preview: String = trimmed.chars().take(200).collect();
        return Err(GateError::upstream(
            service,
            status.as_u16(),
            format!("returned HTML instead of JSON: {}", preview),
        ));
    }

    serde_json::from_str::<T>(&body).map_err(|e| {
        let preview: String = body.chars().take(300).collect();
        GateError::upstream(
            service,
            status.as_u16(),
            format!("failed to parse JSON: {}. Body: {}", e, preview),
        )
    })
}

pub(crate) fn send_error(service: &'static str, e: reqwest::Error) -> GateError {
    if e.is_timeout() {
        tracing::error!(service, "request timed out");
        GateError::upstream(service, 0, "request timed out")
    } else if e.is_connect() {
        tracing::error!(service, error = %e, "connection failed");
        GateError::upstream(service, 0, format!("failed to connect: {}", e))
    } else {
        tracing::error!(service, error = %e, "request failed");
        GateError::upstream(service, 0, format!("request failed: {}", e))
    }
}
