//! Perplexity web-research client.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;

use super::{http_client, read_json, send_error, WebAnswer, WebSearcher};
use crate::error::GateError;

const SERVICE: &str = "perplexity";
const ENDPOINT: &str = "https://api.perplexity.ai/chat/completions";
const MODEL: &str = "sonar";

pub struct PerplexitySearch {
    api_key: String,
    client: Client,
}

impl PerplexitySearch {
    pub fn new(api_key: String) -> Result<Self, GateError> {
        Ok(Self {
            api_key,
            client: http_client()?,
        })
    }
}

#[derive(Deserialize)]
struct SearchResponse {
    #[serde(default)]
    choices: Vec<Choice>,
    #[serde(default)]
    citations: Vec<String>,
}

#[derive(Deserialize)]
struct Choice {
    message: Message,
}

#[derive(Deserialize)]
struct Message {
    #[serde(default)]
    content: String,
}

#[async_trait]
impl WebSearcher for PerplexitySearch {
    async fn search(&self, system: &str, prompt: &str) -> Result<WebAnswer, GateError> {
        let request = json!({
            "model": MODEL,
            "messages": [
                { "role": "system", "content": system },
                { "role": "user", "content": prompt },
            ],
            "max_tokens": 1500,
            "temperature": 0.2,
            "return_citations": true,
        });

        let response = self
            .client
            .post(ENDPOINT)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .json(&request)
            .send()
            .await
            .map_err(|e| send_error(SERVICE, e))?;

        let parsed: SearchResponse = read_json(response, SERVICE).await?;
        let answer = parsed
            .choices
            .into_iter()
            .next()
            .map(|c| c.message.content)
            .unwrap_or_else(|| "Unable to find relevant information.".to_string());

        Ok(WebAnswer {
            answer,
            citations: parsed.citations,
        })
    }
}
