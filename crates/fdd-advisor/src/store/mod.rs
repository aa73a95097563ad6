//! Storage seams: similarity search over precomputed chunk embeddings and
//! the item -> page lookup table. Both are opaque request/response
//! capabilities behind traits so the engine can run against fakes in
//! tests.

pub mod supabase;

pub use supabase::SupabaseStore;

use async_trait::async_trait;
use std::collections::HashMap;

use crate::error::GateError;
use crate::evidence::EvidenceChunk;

/// Vector-similarity search scoped to one document.
#[async_trait]
pub trait ChunkStore: Send + Sync {
    async fn match_chunks(
        &self,
        embedding: &[f32],
        fdd_id: &str,
        threshold: f32,
        limit: usize,
    ) -> Result<Vec<EvidenceChunk>, GateError>;
}

/// Item -> starting-page lookup, keyed by franchise slug.
#[async_trait]
pub trait PageMapStore: Send + Sync {
    async fn item_pages(
        &self,
        franchise_slug: &str,
        items: &[u8],
    ) -> Result<HashMap<u8, u32>, GateError>;
}
