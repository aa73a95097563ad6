//! Assembly helpers for embedding-based retrieval: confidence scoring,
//! context blob construction, and source attribution.

use std::collections::HashMap;

use crate::evidence::EvidenceChunk;
use crate::items::RECEIPT_ITEM;
use crate::types::SourceRef;

/// Mean similarity of the retrieved set; 0.0 for an empty set so an empty
/// retrieval always falls below the confidence threshold.
pub fn mean_similarity(chunks: &[EvidenceChunk]) -> f32 {
    if chunks.is_empty() {
        return 0.0;
    }
    chunks.iter().map(|c| c.similarity).sum::<f32>() / chunks.len() as f32
}

/// Distinct item numbers across the retrieved chunks, in first-seen order.
pub fn unique_items(chunks: &[EvidenceChunk]) -> Vec<u8> {
    let mut items = Vec::new();
    for chunk in chunks {
        if let Some(item) = chunk.item_number {
            if !items.contains(&item) {
                items.push(item);
            }
        }
    }
    items
}

/// Labeled context blob handed to the answer generator, one block per
/// chunk.
pub fn build_context(chunks: &[EvidenceChunk]) -> String {
    chunks
        .iter()
        .enumerate()
        .map(|(i, chunk)| {
            let item_label = match chunk.item_number {
                Some(item) => item.to_string(),
                None => "Unknown".to_string(),
            };
            let page_label = match chunk.page_number {
                Some(page) => page.to_string(),
                None => "?".to_string(),
            };
            format!(
                "[Chunk {} - Item {}, Page {}]\n{}",
                i + 1,
                item_label,
                page_label,
                chunk.chunk_text
            )
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// One source per distinct item, preferring the item's starting page from
/// the page map over the chunk's own page. Untagged chunks and Item 23
/// receipt pages are not cited.
pub fn build_sources(chunks: &[EvidenceChunk], page_map: &HashMap<u8, u32>) -> Vec<SourceRef> {
    let mut seen = Vec::new();
    let mut sources = Vec::new();

    for chunk in chunks {
        let Some(item) = chunk.item_number else {
            continue;
        };
        if item == RECEIPT_ITEM || seen.contains(&item) {
            continue;
        }
        seen.push(item);
        sources.push(SourceRef {
            item: Some(item),
            page: page_map.get(&item).copied().or(chunk.page_number),
            text: Some(format!("Item {}", item)),
            url: None,
        });
    }

    sources
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chunk(item: Option<u8>, page: Option<u32>, similarity: f32) -> EvidenceChunk {
        EvidenceChunk {
            item_number: item,
            page_number: page,
            chunk_text: format!("chunk text for item {:?}", item),
            similarity,
        }
    }

    #[test]
    fn test_mean_similarity() {
        let chunks = vec![chunk(Some(6), Some(14), 0.5), chunk(Some(6), Some(15), 0.3)];
        assert!((mean_similarity(&chunks) - 0.4).abs() < 1e-6);
        assert_eq!(mean_similarity(&[]), 0.0);
    }

    #[test]
    fn test_unique_items_first_seen_order() {
        let chunks = vec![
            chunk(Some(19), Some(55), 0.6),
            chunk(None, Some(2), 0.5),
            chunk(Some(6), Some(14), 0.5),
            chunk(Some(19), Some(56), 0.4),
        ];
        assert_eq!(unique_items(&chunks), vec![19, 6]);
    }

    #[test]
    fn test_build_context_labels_chunks() {
        let chunks = vec![chunk(Some(6), Some(14), 0.5), chunk(None, None, 0.4)];
        let context = build_context(&chunks);
        assert!(context.contains("[Chunk 1 - Item 6, Page 14]"));
        assert!(context.contains("[Chunk 2 - Item Unknown, Page ?]"));
    }

    #[test]
    fn test_build_sources_dedup_and_page_map_override() {
        let page_map = HashMap::from([(6u8, 14u32)]);
        let chunks = vec![
            chunk(Some(6), Some(17), 0.5),
            chunk(Some(6), Some(18), 0.5),
            chunk(Some(12), Some(30), 0.4),
        ];
        let sources = build_sources(&chunks, &page_map);
        assert_eq!(sources.len(), 2);
        assert_eq!(sources[0].item, Some(6));
        // page map wins over the chunk's own page
        assert_eq!(sources[0].page, Some(14));
        assert_eq!(sources[1].item, Some(12));
        assert_eq!(sources[1].page, Some(30));
    }

    #[test]
    fn test_build_sources_skips_receipts_and_untagged() {
        let chunks = vec![chunk(Some(23), Some(70), 0.5), chunk(None, Some(3), 0.5)];
        assert!(build_sources(&chunks, &HashMap::new()).is_empty());
    }
}
