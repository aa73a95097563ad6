//! Supabase-backed chunk and page-map store, over the PostgREST API.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;
use std::collections::HashMap;

use super::{ChunkStore, PageMapStore};
use crate::error::GateError;
use crate::evidence::EvidenceChunk;
use crate::providers::{http_client, read_json, send_error};

const SERVICE: &str = "supabase";

pub struct SupabaseStore {
    base_url: String,
    service_key: String,
    client: Client,
}

impl SupabaseStore {
    pub fn new(base_url: String, service_key: String) -> Result<Self, GateError> {
        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            service_key,
            client: http_client()?,
        })
    }
}

#[derive(Deserialize)]
struct PageMappingRow {
    item_number: u8,
    page_number: u32,
}

#[async_trait]
impl ChunkStore for SupabaseStore {
    async fn match_chunks(
        &self,
        embedding: &[f32],
        fdd_id: &str,
        threshold: f32,
        limit: usize,
    ) -> Result<Vec<EvidenceChunk>, GateError> {
        let url = format!("{}/rest/v1/rpc/match_fdd_chunks", self.base_url);
        let request = json!({
            "query_embedding": embedding,
            "fdd_id_filter": fdd_id,
            "match_threshold": threshold,
            "match_count": limit,
        });

        let response = self
            .client
            .post(&url)
            .header("apikey", &self.service_key)
            .header("Authorization", format!("Bearer {}", self.service_key))
            .header("Content-Type", "application/json")
            .json(&request)
            .send()
            .await
            .map_err(|e| send_error(SERVICE, e))?;

        let chunks: Vec<EvidenceChunk> = read_json(response, SERVICE).await?;
        tracing::debug!(fdd_id, count = chunks.len(), "similarity search returned chunks");
        Ok(chunks)
    }
}

#[async_trait]
impl PageMapStore for SupabaseStore {
    async fn item_pages(
        &self,
        franchise_slug: &str,
        items: &[u8],
    ) -> Result<HashMap<u8, u32>, GateError> {
        if items.is_empty() {
            return Ok(HashMap::new());
        }

        let item_list = items
            .iter()
            .map(|i| i.to_string())
            .collect::<Vec<_>>()
            .join(",");
        let url = format!(
            "{}/rest/v1/fdd_item_page_mappings?select=item_number,page_number&franchise_slug=eq.{}&mapping_type=eq.item&item_number=in.({})",
            self.base_url, franchise_slug, item_list
        );

        let response = self
            .client
            .get(&url)
            .header("apikey", &self.service_key)
            .header("Authorization", format!("Bearer {}", self.service_key))
            .send()
            .await
            .map_err(|e| send_error(SERVICE, e))?;

        let rows: Vec<PageMappingRow> = read_json(response, SERVICE).await?;
        Ok(rows
            .into_iter()
            .map(|row| (row.item_number, row.page_number))
            .collect())
    }
}
