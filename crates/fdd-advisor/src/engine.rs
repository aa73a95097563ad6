//! The answer engine: orchestrates intent classification, topic routing,
//! evidence assembly, answer generation, and disclosure post-processing
//! for both endpoints.
//!
//! Each request is handled independently with no shared mutable state; the
//! only suspension points are the outbound provider and store calls,
//! awaited sequentially. Retrieval failures degrade (vision fallback,
//! full-document context, or a polite not-found answer) rather than
//! erroring; provider failures are not retried.

use regex::Regex;
use std::collections::HashMap;
use std::sync::{Arc, LazyLock};

use crate::config::GateConfig;
use crate::disclosure;
use crate::error::GateError;
use crate::evidence::sections::SectionExtractor;
use crate::evidence::{semantic, toc};
use crate::intent::FprClassifier;
use crate::providers::{
    AnswerGenerator, ClaudeVision, GeminiClient, OpenAiClient, PerplexitySearch, QueryEmbedder,
    VisionAnalyzer, WebSearcher,
};
use crate::routing::TopicRouter;
use crate::store::{ChunkStore, PageMapStore, SupabaseStore};
use crate::templates;
use crate::types::{ChatRequest, ChatResponse, SearchRequest, SearchResponse, SourceRef};

static SOURCE_TRAILER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\[SOURCE:\s*Item\s*(\d{1,2})(?:,\s*Page\s*(\d+))?\]")
        .expect("source trailer regex is valid")
});
static SOURCE_STRIP_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\[SOURCE:.*?\]").expect("source strip regex is valid")
});

const NOT_FOUND_ANSWER: &str = "I couldn't find relevant information in the indexed sections. Try navigating to the relevant page and asking again - I can analyze the page directly using vision.";

const VISION_UNAVAILABLE_ANSWER: &str = "Vision analysis is not available. Please ensure ANTHROPIC_API_KEY or OPENAI_API_KEY is configured, or try asking about content in Items 1-23.";

const WEB_SEARCH_UNAVAILABLE_ANSWER: &str =
    "Web search is not available. Please add PERPLEXITY_API_KEY to your environment variables.";

pub struct AnswerEngine {
    config: GateConfig,
    classifier: FprClassifier,
    router: TopicRouter,
    embedder: Option<Arc<dyn QueryEmbedder>>,
    chunks: Option<Arc<dyn ChunkStore>>,
    pages: Option<Arc<dyn PageMapStore>>,
    /// Generates semantically grounded answers (Gemini in production).
    generator: Option<Arc<dyn AnswerGenerator>>,
    /// Generates full-text analyst answers (OpenAI in production).
    analyst: Option<Arc<dyn AnswerGenerator>>,
    /// Tried in order until one succeeds.
    vision: Vec<Arc<dyn VisionAnalyzer>>,
    web: Option<Arc<dyn WebSearcher>>,
}

impl AnswerEngine {
    pub fn new(config: GateConfig) -> Self {
        Self {
            config,
            classifier: FprClassifier::new(),
            router: TopicRouter::new(),
            embedder: None,
            chunks: None,
            pages: None,
            generator: None,
            analyst: None,
            vision: Vec::new(),
            web: None,
        }
    }

    /// Wire providers from environment variables. Every capability is
    /// optional at construction; a request that needs a missing one gets a
    /// configuration error (or a degrade path where the contract calls for
    /// one).
    pub fn from_env(config: GateConfig) -> Result<Self, GateError> {
        let mut engine = Self::new(config);

        match non_empty_env("GOOGLE_API_KEY") {
            Some(key) => {
                let gemini = Arc::new(GeminiClient::new(key)?);
                engine.embedder = Some(gemini.clone());
                engine.generator = Some(gemini);
            }
            None => tracing::warn!("GOOGLE_API_KEY not set; semantic search disabled"),
        }

        match non_empty_env("ANTHROPIC_API_KEY") {
            Some(key) => engine.vision.push(Arc::new(ClaudeVision::new(key)?)),
            None => tracing::warn!("ANTHROPIC_API_KEY not set; Claude vision disabled"),
        }

        match non_empty_env("OPENAI_API_KEY") {
            Some(key) => {
                let openai = Arc::new(OpenAiClient::new(key)?);
                engine.analyst = Some(openai.clone());
                engine.vision.push(openai);
            }
            None => tracing::warn!("OPENAI_API_KEY not set; analyst and GPT-4o vision disabled"),
        }

        match non_empty_env("PERPLEXITY_API_KEY") {
            Some(key) => engine.web = Some(Arc::new(PerplexitySearch::new(key)?)),
            None => tracing::warn!("PERPLEXITY_API_KEY not set; web search disabled"),
        }

        match (
            non_empty_env("SUPABASE_URL"),
            non_empty_env("SUPABASE_SERVICE_ROLE_KEY"),
        ) {
            (Some(url), Some(key)) => {
                let store = Arc::new(SupabaseStore::new(url, key)?);
                engine.chunks = Some(store.clone());
                engine.pages = Some(store);
            }
            _ => tracing::warn!("SUPABASE_URL/SUPABASE_SERVICE_ROLE_KEY not set; chunk store disabled"),
        }

        Ok(engine)
    }

    pub fn with_embedder(mut self, embedder: Arc<dyn QueryEmbedder>) -> Self {
        self.embedder = Some(embedder);
        self
    }

    pub fn with_chunk_store(mut self, chunks: Arc<dyn ChunkStore>) -> Self {
        self.chunks = Some(chunks);
        self
    }

    pub fn with_page_store(mut self, pages: Arc<dyn PageMapStore>) -> Self {
        self.pages = Some(pages);
        self
    }

    pub fn with_generator(mut self, generator: Arc<dyn AnswerGenerator>) -> Self {
        self.generator = Some(generator);
        self
    }

    pub fn with_analyst(mut self, analyst: Arc<dyn AnswerGenerator>) -> Self {
        self.analyst = Some(analyst);
        self
    }

    pub fn with_vision_analyzer(mut self, analyzer: Arc<dyn VisionAnalyzer>) -> Self {
        self.vision.push(analyzer);
        self
    }

    pub fn with_web_searcher(mut self, web: Arc<dyn WebSearcher>) -> Self {
        self.web = Some(web);
        self
    }

    // ========================================================================
    // Semantic search endpoint
    // ========================================================================

    pub async fn answer(
        &self,
        fdd_id: &str,
        req: SearchRequest,
    ) -> Result<SearchResponse, GateError> {
        if req.query.trim().is_empty() {
            return Err(GateError::invalid_request("Missing required field: query"));
        }

        // Compliance gate runs before any retrieval or model call.
        let classification = self.classifier.classify(&req.query);
        if classification.should_redirect {
            let intent = classification
                .intent
                .map(|i| i.as_str())
                .unwrap_or("unknown");
            tracing::info!(intent, "FPR intent detected, providing friendly redirect");
            return Ok(SearchResponse {
                answer: classification.friendly_response.to_string(),
                sources: Vec::new(),
                confidence: 1.0,
                thinking: Some(format!(
                    "Detected {} - redirecting to helpful FDD information",
                    intent
                )),
                used_vision: false,
                used_web_search: false,
                fpr_redirect: Some(true),
                suggested_action: classification.suggested_action,
            });
        }

        if req.use_web_search {
            if let Some(name) = req.franchise_name.as_deref().filter(|n| !n.is_empty()) {
                return self.web_search(&req.query, name).await;
            }
        }

        if req.force_vision && !req.page_images.is_empty() {
            tracing::info!("vision mode forced, skipping semantic search");
            return self
                .answer_with_vision(&req.query, &req.page_images, req.current_page)
                .await;
        }

        self.semantic_answer(fdd_id, &req).await
    }

    async fn semantic_answer(
        &self,
        fdd_id: &str,
        req: &SearchRequest,
    ) -> Result<SearchResponse, GateError> {
        let embedder = self
            .embedder
            .as_ref()
            .ok_or(GateError::MissingCredential("Google API key"))?;
        let chunk_store = self
            .chunks
            .as_ref()
            .ok_or(GateError::MissingCredential("document chunk store"))?;

        let embedding = embedder.embed_query(&req.query).await?;

        let limit = if req.limit == 0 {
            self.config.search.default_limit
        } else {
            req.limit
        };

        let matches = match chunk_store
            .match_chunks(&embedding, fdd_id, self.config.search.match_threshold, limit)
            .await
        {
            Ok(matches) => matches,
            Err(e) => {
                tracing::error!(error = %e, "chunk search failed");
                if !req.page_images.is_empty() {
                    tracing::info!("chunk search failed, trying vision fallback");
                    return self
                        .answer_with_vision(&req.query, &req.page_images, req.current_page)
                        .await;
                }
                return Err(e);
            }
        };

        let avg_similarity = semantic::mean_similarity(&matches);
        tracing::info!(
            fdd_id,
            matches = matches.len(),
            avg_similarity = %format!("{:.3}", avg_similarity),
            "similarity search complete"
        );

        if avg_similarity < self.config.search.confidence_threshold {
            tracing::info!("low retrieval confidence, degrading");
            if !req.page_images.is_empty() {
                return self
                    .answer_with_vision(&req.query, &req.page_images, req.current_page)
                    .await;
            }
            return Ok(SearchResponse::plain(NOT_FOUND_ANSWER, 0.0));
        }

        let items = semantic::unique_items(&matches);
        let slug = franchise_slug(req.franchise_name.as_deref(), fdd_id);

        let page_map = match (&self.pages, items.is_empty()) {
            (Some(pages), false) => match pages.item_pages(&slug, &items).await {
                Ok(map) => map,
                Err(e) => {
                    // Best effort; the chunk's own page still serves.
                    tracing::warn!(error = %e, "item page lookup failed");
                    HashMap::new()
                }
            },
            _ => HashMap::new(),
        };

        let context = semantic::build_context(&matches);
        let generator = self
            .generator
            .as_ref()
            .ok_or(GateError::MissingCredential("Google API key"))?;
        let prompt = templates::semantic_answer_prompt(&req.query, &context);
        let mut answer = generator.generate(None, &prompt).await?.trim().to_string();

        if disclosure::needs_disclaimer(&items, &req.query) {
            answer = disclosure::append_disclaimer(&answer);
        }

        let sources = semantic::build_sources(&matches, &page_map);
        tracing::info!(sources = sources.len(), "returning semantic answer");

        Ok(SearchResponse {
            answer,
            sources,
            confidence: avg_similarity,
            thinking: Some(format!(
                "Found {} relevant sections with avg similarity {:.2}",
                matches.len(),
                avg_similarity
            )),
            used_vision: false,
            used_web_search: false,
            fpr_redirect: None,
            suggested_action: None,
        })
    }

    async fn answer_with_vision(
        &self,
        query: &str,
        images: &[String],
        current_page: Option<u32>,
    ) -> Result<SearchResponse, GateError> {
        if self.vision.is_empty() {
            return Ok(SearchResponse::plain(VISION_UNAVAILABLE_ANSWER, 0.0));
        }

        let prompt = templates::vision_prompt(query, current_page);
        let mut last_err = None;

        for analyzer in &self.vision {
            match analyzer.analyze(&prompt, images).await {
                Ok(result) => {
                    let mut answer = result.answer.trim().to_string();

                    let in_item19_band = current_page.is_some_and(|page| {
                        (self.config.extraction.item19_page_start
                            ..=self.config.extraction.item19_page_end)
                            .contains(&page)
                    });
                    if in_item19_band || disclosure::mentions_financial_performance(query) {
                        answer = disclosure::append_disclaimer(&answer);
                    }

                    let sources = current_page
                        .map(|page| {
                            vec![SourceRef {
                                page: Some(page),
                                text: Some(format!("Page {}", page)),
                                ..Default::default()
                            }]
                        })
                        .unwrap_or_default();

                    tracing::info!(analyzer = analyzer.name(), "vision analysis succeeded");
                    return Ok(SearchResponse {
                        answer,
                        sources,
                        confidence: result.confidence,
                        thinking: Some(format!(
                            "Used {} to analyze the visible page content",
                            analyzer.name()
                        )),
                        used_vision: true,
                        used_web_search: false,
                        fpr_redirect: None,
                        suggested_action: None,
                    });
                }
                Err(e) => {
                    tracing::warn!(analyzer = analyzer.name(), error = %e, "vision analyzer failed, trying next");
                    last_err = Some(e);
                }
            }
        }

        Err(last_err.unwrap_or(GateError::MissingCredential("vision analyzer")))
    }

    async fn web_search(
        &self,
        query: &str,
        franchise_name: &str,
    ) -> Result<SearchResponse, GateError> {
        let Some(web) = &self.web else {
            return Ok(SearchResponse::plain(WEB_SEARCH_UNAVAILABLE_ANSWER, 0.0));
        };

        tracing::info!(franchise_name, "running web search");
        let system = templates::web_search_prompt(franchise_name);
        let prompt = format!("{} (regarding {} franchise)", query, franchise_name);
        let result = web.search(&system, &prompt).await?;

        let sources = result
            .citations
            .iter()
            .take(5)
            .map(|url| {
                let text = reqwest::Url::parse(url)
                    .ok()
                    .and_then(|u| u.host_str().map(|h| h.trim_start_matches("www.").to_string()))
                    .unwrap_or_else(|| "Source".to_string());
                SourceRef {
                    text: Some(text),
                    url: Some(url.clone()),
                    ..Default::default()
                }
            })
            .collect();

        Ok(SearchResponse {
            answer: result.answer.trim().to_string(),
            sources,
            confidence: 0.8,
            thinking: Some(format!(
                "Searched the web for information about {}",
                franchise_name
            )),
            used_vision: false,
            used_web_search: true,
            fpr_redirect: None,
            suggested_action: None,
        })
    }

    // ========================================================================
    // Full-text analyst endpoint
    // ========================================================================

    pub async fn analyze(&self, req: ChatRequest) -> Result<ChatResponse, GateError> {
        if req.question.trim().is_empty() || req.franchise_name.trim().is_empty() {
            return Err(GateError::invalid_request(
                "Missing required fields: question and franchiseName are required",
            ));
        }

        let classification = self.classifier.classify(&req.question);
        if classification.should_redirect {
            let intent = classification
                .intent
                .map(|i| i.as_str())
                .unwrap_or("unknown");
            tracing::info!(intent, "FPR intent detected on analyst endpoint");
            return Ok(ChatResponse {
                answer: classification.friendly_response.to_string(),
                source: None,
            });
        }

        let images = req.images();
        if req.use_vision && !images.is_empty() {
            return self.analyze_with_vision(&req, &images).await;
        }

        let Some(content) = req.fdd_text_content.as_deref().filter(|c| !c.is_empty()) else {
            return Err(GateError::invalid_request(
                "FDD content not provided. Please ensure the FDD document is loaded.",
            ));
        };

        let toc_mapping = toc::parse_table_of_contents(content);
        let page_map = toc::effective_page_mapping(toc_mapping, &req.fdd_page_mapping);

        let items = self.router.route(&req.question);
        tracing::info!(items = ?items, "routed question to items");

        let extractor = SectionExtractor::new(self.config.extraction.min_section_len);
        let focused = extractor.extract(content, &items);

        let content_to_analyze: &str = if focused.is_empty() {
            // Degraded but safe: send the whole document rather than fail.
            tracing::warn!("no sections extracted, falling back to full document");
            content
        } else {
            tracing::info!(chars = focused.len(), "extracted focused sections");
            &focused
        };

        let analyst = self
            .analyst
            .as_ref()
            .ok_or(GateError::MissingCredential("OpenAI API key"))?;
        let system = templates::analyst_prompt(
            &req.franchise_name,
            req.franchise_context.as_deref(),
            &items,
            content_to_analyze,
        );
        let raw = analyst.generate(Some(&system), &req.question).await?;

        let (mut answer, mut source) = extract_source_trailer(&raw);

        if let Some(source) = &mut source {
            if source.page.is_none() {
                source.page = source.item.and_then(|item| page_map.get(&item).copied());
            }
        }

        if disclosure::needs_disclaimer(&items, &req.question) {
            answer = disclosure::append_disclaimer(&answer);
        }

        Ok(ChatResponse { answer, source })
    }

    async fn analyze_with_vision(
        &self,
        req: &ChatRequest,
        images: &[String],
    ) -> Result<ChatResponse, GateError> {
        if self.vision.is_empty() {
            return Err(GateError::MissingCredential("OpenAI API key"));
        }

        let prompt =
            templates::analyst_vision_prompt(&req.question, &req.franchise_name, images.len());
        let mut last_err = None;

        for analyzer in &self.vision {
            match analyzer.analyze(&prompt, images).await {
                Ok(result) => {
                    let (mut answer, source) = extract_source_trailer(&result.answer);

                    let source_items: Vec<u8> =
                        source.as_ref().and_then(|s| s.item).into_iter().collect();
                    if disclosure::needs_disclaimer(&source_items, &req.question) {
                        answer = disclosure::append_disclaimer(&answer);
                    }

                    tracing::info!(analyzer = analyzer.name(), "analyst vision succeeded");
                    return Ok(ChatResponse { answer, source });
                }
                Err(e) => {
                    tracing::warn!(analyzer = analyzer.name(), error = %e, "analyst vision failed, trying next");
                    last_err = Some(e);
                }
            }
        }

        Err(last_err.unwrap_or(GateError::MissingCredential("vision analyzer")))
    }
}

fn non_empty_env(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}

/// Slug used to key the item -> page mapping table: the franchise name
/// lower-cased and dash-joined, or the tail of the document id.
fn franchise_slug(franchise_name: Option<&str>, fdd_id: &str) -> String {
    if let Some(name) = franchise_name {
        if !name.trim().is_empty() {
            return name
                .to_lowercase()
                .split_whitespace()
                .collect::<Vec<_>>()
                .join("-")
                .chars()
                .filter(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || *c == '-')
                .collect();
        }
    }
    fdd_id.rsplit('/').next().unwrap_or(fdd_id).to_string()
}

/// Split a generated answer from its `[SOURCE: Item X(, Page Y)]` trailer.
/// A malformed or absent trailer leaves the answer untouched.
fn extract_source_trailer(raw: &str) -> (String, Option<SourceRef>) {
    match SOURCE_TRAILER_RE.captures(raw) {
        Some(caps) => {
            let source = SourceRef {
                item: caps.get(1).and_then(|m| m.as_str().parse().ok()),
                page: caps.get(2).and_then(|m| m.as_str().parse().ok()),
                ..Default::default()
            };
            let answer = SOURCE_STRIP_RE.replacen(raw, 1, "").trim().to_string();
            (answer, Some(source))
        }
        None => {
            tracing::warn!("no source citation found in response");
            (raw.trim().to_string(), None)
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::disclosure::ITEM_19_DISCLAIMER;
    use crate::evidence::EvidenceChunk;
    use crate::intent::SuggestedAction;
    use crate::providers::{VisionAnswer, WebAnswer};
    use async_trait::async_trait;

    struct FixedEmbedder;

    #[async_trait]
    impl QueryEmbedder for FixedEmbedder {
        async fn embed_query(&self, _text: &str) -> Result<Vec<f32>, GateError> {
            Ok(vec![0.1; 768])
        }
    }

    struct FixedChunks(Vec<EvidenceChunk>);

    #[async_trait]
    impl ChunkStore for FixedChunks {
        async fn match_chunks(
            &self,
            _embedding: &[f32],
            _fdd_id: &str,
            _threshold: f32,
            _limit: usize,
        ) -> Result<Vec<EvidenceChunk>, GateError> {
            Ok(self.0.clone())
        }
    }

    struct FailingChunks;

    #[async_trait]
    impl ChunkStore for FailingChunks {
        async fn match_chunks(
            &self,
            _embedding: &[f32],
            _fdd_id: &str,
            _threshold: f32,
            _limit: usize,
        ) -> Result<Vec<EvidenceChunk>, GateError> {
            Err(GateError::upstream("supabase", 500, "search unavailable"))
        }
    }

    struct FixedPages(HashMap<u8, u32>);

    #[async_trait]
    impl PageMapStore for FixedPages {
        async fn item_pages(
            &self,
            _franchise_slug: &str,
            _items: &[u8],
        ) -> Result<HashMap<u8, u32>, GateError> {
            Ok(self.0.clone())
        }
    }

    struct CannedGenerator(&'static str);

    #[async_trait]
    impl AnswerGenerator for CannedGenerator {
        async fn generate(&self, _system: Option<&str>, _prompt: &str) -> Result<String, GateError> {
            Ok(self.0.to_string())
        }
    }

    struct CannedVision(&'static str);

    #[async_trait]
    impl VisionAnalyzer for CannedVision {
        fn name(&self) -> &'static str {
            "Mock Vision"
        }

        async fn analyze(
            &self,
            _prompt: &str,
            _images: &[String],
        ) -> Result<VisionAnswer, GateError> {
            Ok(VisionAnswer {
                answer: self.0.to_string(),
                confidence: 0.85,
            })
        }
    }

    struct CannedWeb;

    #[async_trait]
    impl WebSearcher for CannedWeb {
        async fn search(&self, _system: &str, _prompt: &str) -> Result<WebAnswer, GateError> {
            Ok(WebAnswer {
                answer: "Recent coverage of the brand has been positive.".to_string(),
                citations: vec!["https://www.example.com/franchise-review".to_string()],
            })
        }
    }

    fn chunk(item: Option<u8>, page: Option<u32>, similarity: f32) -> EvidenceChunk {
        EvidenceChunk {
            item_number: item,
            page_number: page,
            chunk_text: "chunk text".to_string(),
            similarity,
        }
    }

    fn search_req(query: &str) -> SearchRequest {
        SearchRequest {
            query: query.to_string(),
            limit: 5,
            page_images: Vec::new(),
            current_page: None,
            force_vision: false,
            use_web_search: false,
            franchise_name: None,
        }
    }

    fn chat_req(question: &str, content: Option<&str>) -> ChatRequest {
        ChatRequest {
            question: question.to_string(),
            franchise_name: "Acme Coffee".to_string(),
            franchise_context: None,
            use_vision: false,
            image_url: None,
            image_urls: Vec::new(),
            fdd_text_content: content.map(|c| c.to_string()),
            fdd_page_mapping: HashMap::new(),
        }
    }

    #[tokio::test]
    async fn test_fpr_redirect_short_circuits() {
        // No providers wired at all: a blocked question must never reach
        // retrieval.
        let engine = AnswerEngine::new(GateConfig::default());
        let response = engine
            .answer("fdd-1", search_req("How much will I make?"))
            .await
            .unwrap();

        assert_eq!(response.fpr_redirect, Some(true));
        assert_eq!(response.confidence, 1.0);
        assert!(response.sources.is_empty());
        assert_eq!(response.suggested_action, Some(SuggestedAction::NavigateItem19));
        assert!(response.answer.contains("Item 19"));
    }

    #[tokio::test]
    async fn test_empty_query_is_invalid() {
        let engine = AnswerEngine::new(GateConfig::default());
        let result = engine.answer("fdd-1", search_req("   ")).await;
        assert!(matches!(result, Err(GateError::InvalidRequest(_))));
    }

    #[tokio::test]
    async fn test_low_confidence_with_images_falls_back_to_vision() {
        let engine = AnswerEngine::new(GateConfig::default())
            .with_embedder(Arc::new(FixedEmbedder))
            .with_chunk_store(Arc::new(FixedChunks(vec![
                chunk(Some(6), Some(14), 0.35),
                chunk(Some(6), Some(15), 0.35),
            ])))
            .with_vision_analyzer(Arc::new(CannedVision("The page shows a 6% royalty.")));

        let mut req = search_req("what does the royalty structure look like");
        req.page_images = vec!["data:image/png;base64,xyz".to_string()];
        req.current_page = Some(14);

        let response = engine.answer("fdd-1", req).await.unwrap();
        assert!(response.used_vision);
        assert_eq!(response.confidence, 0.85);
        assert_eq!(response.sources[0].page, Some(14));
    }

    #[tokio::test]
    async fn test_low_confidence_without_images_returns_not_found() {
        let engine = AnswerEngine::new(GateConfig::default())
            .with_embedder(Arc::new(FixedEmbedder))
            .with_chunk_store(Arc::new(FixedChunks(vec![chunk(Some(6), Some(14), 0.35)])));

        let response = engine
            .answer("fdd-1", search_req("what does the royalty structure look like"))
            .await
            .unwrap();
        assert!(response.answer.contains("couldn't find"));
        assert_eq!(response.confidence, 0.0);
        assert!(!response.used_vision);
    }

    #[tokio::test]
    async fn test_confident_retrieval_generates_answer_with_sources() {
        let engine = AnswerEngine::new(GateConfig::default())
            .with_embedder(Arc::new(FixedEmbedder))
            .with_chunk_store(Arc::new(FixedChunks(vec![
                chunk(Some(6), Some(17), 0.6),
                chunk(Some(23), Some(70), 0.6),
            ])))
            .with_page_store(Arc::new(FixedPages(HashMap::from([(6u8, 14u32)]))))
            .with_generator(Arc::new(CannedGenerator("The royalty is 6% of gross receipts.")));

        let response = engine
            .answer("fdd-1", search_req("What royalty do I pay?"))
            .await
            .unwrap();

        assert_eq!(response.answer, "The royalty is 6% of gross receipts.");
        assert!((response.confidence - 0.6).abs() < 1e-6);
        // receipts (Item 23) excluded; page map wins over chunk page
        assert_eq!(response.sources.len(), 1);
        assert_eq!(response.sources[0].item, Some(6));
        assert_eq!(response.sources[0].page, Some(14));
        assert!(response.thinking.as_deref().unwrap().contains("2 relevant sections"));
        assert!(!response.answer.contains("franchise attorney"));
    }

    #[tokio::test]
    async fn test_disclaimer_on_semantic_path() {
        let engine = AnswerEngine::new(GateConfig::default())
            .with_embedder(Arc::new(FixedEmbedder))
            .with_chunk_store(Arc::new(FixedChunks(vec![chunk(Some(19), Some(55), 0.6)])))
            .with_generator(Arc::new(CannedGenerator("Average unit volume was $500,000.")));

        let response = engine
            .answer("fdd-1", search_req("What revenue do locations report?"))
            .await
            .unwrap();
        assert!(response.answer.contains("franchise attorney"));
        assert!(response.answer.ends_with(ITEM_19_DISCLAIMER.trim_end()));
    }

    #[tokio::test]
    async fn test_disclaimer_on_vision_path() {
        let engine = AnswerEngine::new(GateConfig::default())
            .with_vision_analyzer(Arc::new(CannedVision("The table shows AUV of $500,000.")));

        let mut req = search_req("What does Item 19 disclose about revenue?");
        req.force_vision = true;
        req.page_images = vec!["data:image/png;base64,xyz".to_string()];
        req.current_page = Some(57);

        let response = engine.answer("fdd-1", req).await.unwrap();
        assert!(response.used_vision);
        // Same invariant as the semantic path: financial answers carry the
        // disclaimer regardless of retrieval strategy.
        assert!(response.answer.contains("franchise attorney"));
    }

    #[tokio::test]
    async fn test_store_error_with_images_uses_vision() {
        let engine = AnswerEngine::new(GateConfig::default())
            .with_embedder(Arc::new(FixedEmbedder))
            .with_chunk_store(Arc::new(FailingChunks))
            .with_vision_analyzer(Arc::new(CannedVision("Visible text answer.")));

        let mut req = search_req("what are the training requirements");
        req.page_images = vec!["https://cdn.example.com/p3.png".to_string()];

        let response = engine.answer("fdd-1", req).await.unwrap();
        assert!(response.used_vision);
    }

    #[tokio::test]
    async fn test_store_error_without_images_propagates() {
        let engine = AnswerEngine::new(GateConfig::default())
            .with_embedder(Arc::new(FixedEmbedder))
            .with_chunk_store(Arc::new(FailingChunks));

        let result = engine
            .answer("fdd-1", search_req("what are the training requirements"))
            .await;
        assert!(matches!(result, Err(GateError::Upstream { .. })));
    }

    #[tokio::test]
    async fn test_web_search_unavailable_is_polite() {
        let engine = AnswerEngine::new(GateConfig::default());
        let mut req = search_req("any recent news about this brand");
        req.use_web_search = true;
        req.franchise_name = Some("Acme Coffee".to_string());

        let response = engine.answer("fdd-1", req).await.unwrap();
        assert!(response.answer.contains("Web search is not available"));
        assert_eq!(response.confidence, 0.0);
        assert!(!response.used_web_search);
    }

    #[tokio::test]
    async fn test_web_search_maps_citations_to_sources() {
        let engine = AnswerEngine::new(GateConfig::default()).with_web_searcher(Arc::new(CannedWeb));
        let mut req = search_req("any recent news about this brand");
        req.use_web_search = true;
        req.franchise_name = Some("Acme Coffee".to_string());

        let response = engine.answer("fdd-1", req).await.unwrap();
        assert!(response.used_web_search);
        assert_eq!(response.confidence, 0.8);
        assert_eq!(response.sources[0].text.as_deref(), Some("example.com"));
        assert_eq!(
            response.sources[0].url.as_deref(),
            Some("https://www.example.com/franchise-review")
        );
    }

    #[tokio::test]
    async fn test_vision_unavailable_is_polite() {
        let engine = AnswerEngine::new(GateConfig::default());
        let mut req = search_req("what is on this page");
        req.force_vision = true;
        req.page_images = vec!["data:image/png;base64,xyz".to_string()];

        let response = engine.answer("fdd-1", req).await.unwrap();
        assert!(response.answer.contains("Vision analysis is not available"));
        assert_eq!(response.confidence, 0.0);
    }

    const SAMPLE_FDD: &str = "\
TABLE OF CONTENTS\n\
ITEM 5 INITIAL FEES 12\n\
EXHIBITS: A\n\
ITEM 5: INITIAL FEES\n\
The initial franchise fee is $45,000, payable in a lump sum when you sign \
the franchise agreement. The fee is fully earned and nonrefundable.\n\
ITEM 19: FINANCIAL PERFORMANCE REPRESENTATIONS\n\
The following table shows average gross sales of franchised locations that \
were open during the entire 2024 fiscal year, based on reports from 120 \
locations nationwide.\n";

    #[tokio::test]
    async fn test_analyze_missing_fields_is_invalid() {
        let engine = AnswerEngine::new(GateConfig::default());
        let mut req = chat_req("", None);
        req.franchise_name = String::new();
        assert!(matches!(
            engine.analyze(req).await,
            Err(GateError::InvalidRequest(_))
        ));
    }

    #[tokio::test]
    async fn test_analyze_missing_content_is_invalid() {
        let engine = AnswerEngine::new(GateConfig::default());
        let result = engine.analyze(chat_req("What is the initial fee?", None)).await;
        match result {
            Err(GateError::InvalidRequest(msg)) => assert!(msg.contains("FDD content")),
            other => panic!("expected invalid request, got {:?}", other.map(|r| r.answer)),
        }
    }

    #[tokio::test]
    async fn test_analyze_fpr_redirect() {
        let engine = AnswerEngine::new(GateConfig::default());
        let response = engine
            .analyze(chat_req("How much will I make?", Some(SAMPLE_FDD)))
            .await
            .unwrap();
        assert!(response.answer.contains("Item 19"));
        assert!(response.source.is_none());
    }

    #[tokio::test]
    async fn test_analyze_extracts_source_and_toc_page() {
        let engine = AnswerEngine::new(GateConfig::default())
            .with_analyst(Arc::new(CannedGenerator(
                "The initial fee is $45,000. [SOURCE: Item 5]",
            )));

        let response = engine
            .analyze(chat_req("What is the initial franchise fee?", Some(SAMPLE_FDD)))
            .await
            .unwrap();

        assert_eq!(response.answer, "The initial fee is $45,000.");
        let source = response.source.unwrap();
        assert_eq!(source.item, Some(5));
        // page resolved from the parsed table of contents
        assert_eq!(source.page, Some(12));
    }

    #[tokio::test]
    async fn test_analyze_applies_disclaimer_for_financial_topics() {
        let engine = AnswerEngine::new(GateConfig::default())
            .with_analyst(Arc::new(CannedGenerator(
                "Average gross sales were $500,000 across 120 locations. [SOURCE: Item 19]",
            )));

        let response = engine
            .analyze(chat_req("What were gross sales last year?", Some(SAMPLE_FDD)))
            .await
            .unwrap();

        assert!(response.answer.contains("franchise attorney"));
        assert_eq!(response.source.unwrap().item, Some(19));
    }

    #[test]
    fn test_extract_source_trailer_variants() {
        let (answer, source) = extract_source_trailer("The fee is $45,000. [SOURCE: Item 5]");
        assert_eq!(answer, "The fee is $45,000.");
        assert_eq!(source, Some(SourceRef { item: Some(5), ..Default::default() }));

        let (answer, source) =
            extract_source_trailer("AUV was $500,000. [SOURCE: Item 19, Page 57]");
        assert_eq!(answer, "AUV was $500,000.");
        let source = source.unwrap();
        assert_eq!(source.item, Some(19));
        assert_eq!(source.page, Some(57));

        let (answer, source) = extract_source_trailer("No citation here.");
        assert_eq!(answer, "No citation here.");
        assert!(source.is_none());
    }

    #[test]
    fn test_franchise_slug() {
        assert_eq!(franchise_slug(Some("Acme Coffee Co."), "x"), "acme-coffee-co");
        assert_eq!(franchise_slug(None, "bucket/acme-2024"), "acme-2024");
        assert_eq!(franchise_slug(Some("  "), "acme"), "acme");
    }
}
