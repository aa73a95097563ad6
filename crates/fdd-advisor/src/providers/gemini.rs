//! Google Gemini client: query embeddings and grounded answer generation.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;

use super::{http_client, read_json, send_error, AnswerGenerator, QueryEmbedder};
use crate::error::GateError;

const SERVICE: &str = "google";
const BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta/models";

pub struct GeminiClient {
    api_key: String,
    embedding_model: String,
    generation_model: String,
    client: Client,
}

impl GeminiClient {
    pub fn new(api_key: String) -> Result<Self, GateError> {
        Ok(Self {
            api_key,
            embedding_model: "text-embedding-004".to_string(),
            generation_model: "gemini-2.5-flash".to_string(),
            client: http_client()?,
        })
    }
}

#[derive(Deserialize)]
struct EmbedResponse {
    embedding: EmbeddingValues,
}

#[derive(Deserialize)]
struct EmbeddingValues {
    values: Vec<f32>,
}

#[derive(Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: CandidateContent,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ContentPart>,
}

#[derive(Deserialize)]
struct ContentPart {
    #[serde(default)]
    text: String,
}

#[async_trait]
impl QueryEmbedder for GeminiClient {
    async fn embed_query(&self, text: &str) -> Result<Vec<f32>, GateError> {
        let endpoint = format!("{}/{}:embedContent", BASE_URL, self.embedding_model);
        let request = json!({
            "model": format!("models/{}", self.embedding_model),
            "content": { "parts": [{ "text": text }] }
        });

        let response = self
            .client
            .post(&endpoint)
            .header("Content-Type", "application/json")
            .header("x-goog-api-key", &self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| send_error(SERVICE, e))?;

        let parsed: EmbedResponse = read_json(response, SERVICE).await?;
        tracing::debug!(dimensions = parsed.embedding.values.len(), "generated query embedding");
        Ok(parsed.embedding.values)
    }
}

#[async_trait]
impl AnswerGenerator for GeminiClient {
    async fn generate(&self, system: Option<&str>, prompt: &str) -> Result<String, GateError> {
        let full_prompt = match system {
            Some(system) => format!("{}\n\n{}", system, prompt),
            None => prompt.to_string(),
        };
        let endpoint = format!("{}/{}:generateContent", BASE_URL, self.generation_model);
        let request = json!({
            "contents": [{ "parts": [{ "text": full_prompt }] }]
        });

        let response = self
            .client
            .post(&endpoint)
            .header("Content-Type", "application/json")
            .header("x-goog-api-key", &self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| send_error(SERVICE, e))?;

        let parsed: GenerateResponse = read_json(response, SERVICE).await?;
        parsed
            .candidates
            .first()
            .and_then(|c| c.content.parts.first())
            .map(|p| p.text.clone())
            .ok_or_else(|| GateError::upstream(SERVICE, 200, "no candidates in response"))
    }
}
