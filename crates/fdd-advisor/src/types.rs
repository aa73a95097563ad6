//! Wire types for the two gate endpoints.
//!
//! Field names stay camelCase on the wire so existing document-viewer
//! clients keep working unchanged.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::intent::SuggestedAction;

fn default_limit() -> usize {
    5
}

/// Request body for the per-document semantic search endpoint.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchRequest {
    pub query: String,
    #[serde(default = "default_limit")]
    pub limit: usize,
    /// Rendered page images (data URLs or plain URLs) for the vision
    /// fallback path.
    #[serde(default)]
    pub page_images: Vec<String>,
    #[serde(default)]
    pub current_page: Option<u32>,
    /// Skip semantic search entirely and analyze the page images directly.
    #[serde(default)]
    pub force_vision: bool,
    #[serde(default)]
    pub use_web_search: bool,
    #[serde(default)]
    pub franchise_name: Option<String>,
}

/// A citation attached to an answer. All fields optional: semantic results
/// carry item/page, vision results carry page only, web results carry url.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SourceRef {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub item: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

/// Response body for the semantic search endpoint.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResponse {
    pub answer: String,
    pub sources: Vec<SourceRef>,
    pub confidence: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thinking: Option<String>,
    pub used_vision: bool,
    pub used_web_search: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fpr_redirect: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggested_action: Option<SuggestedAction>,
}

impl SearchResponse {
    /// A plain 200 answer with no sources, used by the degrade paths
    /// (low-confidence retrieval, missing optional capability).
    pub fn plain(answer: impl Into<String>, confidence: f32) -> Self {
        Self {
            answer: answer.into(),
            sources: Vec::new(),
            confidence,
            thinking: None,
            used_vision: false,
            used_web_search: false,
            fpr_redirect: None,
            suggested_action: None,
        }
    }
}

/// Request body for the full-text analyst endpoint.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatRequest {
    #[serde(default)]
    pub question: String,
    #[serde(default)]
    pub franchise_name: String,
    #[serde(default)]
    pub franchise_context: Option<String>,
    #[serde(default)]
    pub use_vision: bool,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub image_urls: Vec<String>,
    /// Raw extracted text of the FDD, supplied by the caller.
    #[serde(default)]
    pub fdd_text_content: Option<String>,
    /// Caller-supplied item -> page mapping, keyed like "Item 6". Used only
    /// when the document's own table of contents cannot be parsed.
    #[serde(default)]
    pub fdd_page_mapping: HashMap<String, u32>,
}

impl ChatRequest {
    /// Page images for the vision variant: `imageUrls` when present,
    /// otherwise the single `imageUrl`.
    pub fn images(&self) -> Vec<String> {
        if !self.image_urls.is_empty() {
            self.image_urls.clone()
        } else {
            self.image_url.iter().cloned().collect()
        }
    }
}

/// Response body for the analyst endpoint.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatResponse {
    pub answer: String,
    pub source: Option<SourceRef>,
}
