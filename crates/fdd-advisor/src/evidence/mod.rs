//! Evidence assembly: materializing the document text that grounds an
//! answer.
//!
//! Two retrieval strategies share these building blocks: regex section
//! extraction over raw document text ([`sections`]) and similarity search
//! over precomputed chunk embeddings ([`semantic`]), with a table-of-
//! contents page mapper ([`toc`]) serving both. Fallback orchestration and
//! disclaimer injection live in the engine so they are not duplicated per
//! strategy.

pub mod sections;
pub mod semantic;
pub mod toc;

use serde::Deserialize;

/// A span of document text retrieved by similarity search, tagged with the
/// disclosure item and page it came from. Assembled per request, discarded
/// after the answer is generated.
#[derive(Debug, Clone, Deserialize)]
pub struct EvidenceChunk {
    pub item_number: Option<u8>,
    pub page_number: Option<u32>,
    pub chunk_text: String,
    pub similarity: f32,
}
