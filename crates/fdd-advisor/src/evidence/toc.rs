//! Table-of-contents page mapping.
//!
//! The TOC parser is deliberately rigid: it only understands lines shaped
//! like `ITEM 6  OTHER FEES  4`. On any other format it returns an empty
//! map and the caller-supplied mapping is used instead; a wrong page number
//! is worse than no page number.

use regex::Regex;
use std::collections::HashMap;
use std::sync::LazyLock;

static TOC_START_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)TABLE OF CONTENTS").expect("toc start regex is valid"));

// The TOC region ends where the body begins (first Item 1 header) or at the
// exhibits list.
static TOC_END_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\n\s*ITEM 1:|EXHIBITS:").expect("toc end regex is valid")
});

static TOC_LINE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?im)ITEM\s+(\d{1,2})\s+[A-Z\s,]+?(\d+)\s*$").expect("toc line regex is valid")
});

static ITEM_KEY_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^(?:item\s*)?(\d{1,2})$").expect("item key regex is valid"));

/// Parse the document's table of contents into an item -> page map.
/// Returns an empty map when no TOC is found or its format doesn't match.
pub fn parse_table_of_contents(document: &str) -> HashMap<u8, u32> {
    let mut map = HashMap::new();

    let Some(start) = TOC_START_RE.find(document) else {
        tracing::warn!("could not find table of contents in document");
        return map;
    };

    let Some(end) = TOC_END_RE.find_at(document, start.end()) else {
        tracing::warn!("table of contents has no recognizable end boundary");
        return map;
    };

    let region = &document[start.start()..end.start()];

    for caps in TOC_LINE_RE.captures_iter(region) {
        let item = caps[1].parse::<u8>().ok();
        let page = caps[2].parse::<u32>().ok();
        if let (Some(item), Some(page)) = (item, page) {
            tracing::debug!(item, page, "parsed toc entry");
            map.insert(item, page);
        }
    }

    map
}

/// The TOC-derived mapping when it parsed to anything; otherwise the
/// caller-supplied mapping, normalized from "Item 6"-style keys.
pub fn effective_page_mapping(
    toc: HashMap<u8, u32>,
    provided: &HashMap<String, u32>,
) -> HashMap<u8, u32> {
    if !toc.is_empty() {
        return toc;
    }

    provided
        .iter()
        .filter_map(|(key, &page)| {
            let caps = ITEM_KEY_RE.captures(key.trim())?;
            let item = caps[1].parse::<u8>().ok()?;
            Some((item, page))
        })
        .collect()
}
