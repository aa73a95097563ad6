//! FDD Advisor — question routing and disclosure-compliance gate for
//! Franchise Disclosure Documents.
//!
//! The pipeline: a buyer's question passes the FPR intent classifier
//! (which may short-circuit with a compliant redirect), is routed to the
//! disclosure items likely to answer it, grounded in document evidence by
//! one of two retrieval strategies (regex section extraction or embedding
//! similarity search), answered by an external model, and post-processed
//! for the Item 19 disclaimer.

pub mod config;
pub mod disclosure;
pub mod engine;
pub mod error;
pub mod evidence;
pub mod intent;
pub mod items;
pub mod providers;
pub mod routing;
pub mod store;
pub mod templates;
pub mod types;

// Re-export primary types for convenience
pub use config::GateConfig;
pub use engine::AnswerEngine;
pub use error::GateError;
pub use intent::{FprClassifier, FprIntent, IntentClassification, SuggestedAction};
pub use routing::TopicRouter;
pub use types::{ChatRequest, ChatResponse, SearchRequest, SearchResponse, SourceRef};
