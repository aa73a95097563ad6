//! OpenAI client: the full-text analyst generator (gpt-4o-mini) and the
//! secondary vision analyzer (gpt-4o).

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::{json, Value};

use super::{http_client, read_json, send_error, AnswerGenerator, VisionAnalyzer, VisionAnswer};
use crate::error::GateError;

const SERVICE: &str = "openai";
const ENDPOINT: &str = "https://api.openai.com/v1/chat/completions";
const ANALYST_MODEL: &str = "gpt-4o-mini";
const VISION_MODEL: &str = "gpt-4o";
const VISION_CONFIDENCE: f32 = 0.8;

pub struct OpenAiClient {
    api_key: String,
    client: Client,
}

impl OpenAiClient {
    pub fn new(api_key: String) -> Result<Self, GateError> {
        Ok(Self {
            api_key,
            client: http_client()?,
        })
    }

    async fn chat(&self, request: Value) -> Result<String, GateError> {
        let response = self
            .client
            .post(ENDPOINT)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .json(&request)
            .send()
            .await
            .map_err(|e| send_error(SERVICE, e))?;

        let parsed: ChatResponse = read_json(response, SERVICE).await?;
        parsed
            .choices
            .into_iter()
            .next()
            .map(|c| c.message.content)
            .filter(|content| !content.is_empty())
            .ok_or_else(|| GateError::upstream(SERVICE, 200, "no content in response"))
    }
}

#[derive(Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
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
impl AnswerGenerator for OpenAiClient {
    async fn generate(&self, system: Option<&str>, prompt: &str) -> Result<String, GateError> {
        let mut messages = Vec::new();
        if let Some(system) = system {
            messages.push(json!({ "role": "system", "content": system }));
        }
        messages.push(json!({ "role": "user", "content": prompt }));

        let request = json!({
            "model": ANALYST_MODEL,
            "messages": messages,
            "temperature": 0.3,
            "max_tokens": 800,
        });

        self.chat(request).await
    }
}

#[async_trait]
impl VisionAnalyzer for OpenAiClient {
    fn name(&self) -> &'static str {
        "GPT-4o Vision"
    }

    async fn analyze(&self, prompt: &str, images: &[String]) -> Result<VisionAnswer, GateError> {
        let mut content: Vec<Value> = images
            .iter()
            .map(|url| {
                json!({
                    "type": "image_url",
                    "image_url": { "url": url, "detail": "high" }
                })
            })
            .collect();
        content.push(json!({ "type": "text", "text": prompt }));

        let request = json!({
            "model": VISION_MODEL,
            "messages": [{ "role": "user", "content": content }],
            "max_tokens": 1500,
        });

        let answer = self.chat(request).await?;
        Ok(VisionAnswer {
            answer,
            confidence: VISION_CONFIDENCE,
        })
    }
}
