//! Anthropic Claude vision client, the primary page-image analyzer.

use async_trait::async_trait;
use regex::Regex;
use reqwest::Client;
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::LazyLock;

use super::{http_client, read_json, send_error, VisionAnalyzer, VisionAnswer};
use crate::error::GateError;

const SERVICE: &str = "anthropic";
const ENDPOINT: &str = "https://api.anthropic.com/v1/messages";
const API_VERSION: &str = "2023-06-01";
const MODEL: &str = "claude-sonnet-4-20250514";
const MAX_TOKENS: u32 = 1500;
const CONFIDENCE: f32 = 0.85;

static DATA_URL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^data:(.+?);base64,(.+)$").expect("data url regex is valid")
});

pub struct ClaudeVision {
    api_key: String,
    client: Client,
}

impl ClaudeVision {
    pub fn new(api_key: String) -> Result<Self, GateError> {
        Ok(Self {
            api_key,
            client: http_client()?,
        })
    }

    /// Data URLs become inline base64 image blocks; anything else is passed
    /// through as a URL image block.
    fn image_block(image: &str) -> Value {
        if let Some(caps) = DATA_URL_RE.captures(image) {
            return json!({
                "type": "image",
                "source": {
                    "type": "base64",
                    "media_type": &caps[1],
                    "data": &caps[2],
                }
            });
        }
        json!({
            "type": "image",
            "source": { "type": "url", "url": image }
        })
    }
}

#[derive(Deserialize)]
struct MessagesResponse {
    #[serde(default)]
    content: Vec<ContentBlock>,
}

#[derive(Deserialize)]
struct ContentBlock {
    #[serde(rename = "type")]
    block_type: String,
    #[serde(default)]
    text: String,
}

#[async_trait]
impl VisionAnalyzer for ClaudeVision {
    fn name(&self) -> &'static str {
        "Claude Vision"
    }

    async fn analyze(&self, prompt: &str, images: &[String]) -> Result<VisionAnswer, GateError> {
        let mut content: Vec<Value> = images.iter().map(|i| Self::image_block(i)).collect();
        content.push(json!({ "type": "text", "text": prompt }));

        let request = json!({
            "model": MODEL,
            "max_tokens": MAX_TOKENS,
            "messages": [{ "role": "user", "content": content }]
        });

        let response = self
            .client
            .post(ENDPOINT)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", API_VERSION)
            .header("Content-Type", "application/json")
            .json(&request)
            .send()
            .await
            .map_err(|e| send_error(SERVICE, e))?;

        let parsed: MessagesResponse = read_json(response, SERVICE).await?;
        let answer = parsed
            .content
            .iter()
            .find(|block| block.block_type == "text")
            .map(|block| block.text.clone())
            .ok_or_else(|| GateError::upstream(SERVICE, 200, "no text block in response"))?;

        Ok(VisionAnswer {
            answer,
            confidence: CONFIDENCE,
        })
    }
}
