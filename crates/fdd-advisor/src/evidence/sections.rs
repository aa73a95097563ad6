//! Regex section extraction over raw FDD text.
//!
//! An Item section runs from its `ITEM N: <Title>` header to the next
//! line-leading `ITEM M:` header or end of text. A match shorter than the
//! minimum length is a numbered paragraph ("6. We do business...") that
//! happened to look like a header, not a real section, and is rejected.

use regex::Regex;
use std::sync::LazyLock;

use crate::items::ITEM_COUNT;

// One start pattern per item; the `\s+[A-Z]` tail requires a title to
// follow the colon.
static SECTION_START_RES: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    (1..=ITEM_COUNT)
        .map(|n| {
            Regex::new(&format!(r"(?i)ITEM\s+{}:\s+[A-Z]", n))
                .expect("item section start regex is valid")
        })
        .collect()
});

static NEXT_HEADER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\n\s*ITEM\s+\d{1,2}:").expect("next header regex is valid")
});

pub struct SectionExtractor {
    min_section_len: usize,
}

impl SectionExtractor {
    pub fn new(min_section_len: usize) -> Self {
        Self { min_section_len }
    }

    /// Extract the sections for `items` and concatenate them, each prefixed
    /// with a `=== ITEM N ===` delimiter. Items that cannot be found (or
    /// whose match is too short) are skipped; an empty result tells the
    /// caller to fall back to the full document.
    pub fn extract(&self, document: &str, items: &[u8]) -> String {
        let mut extracted = String::new();

        for &item in items {
            match self.find_section(document, item) {
                Some(section) => {
                    tracing::debug!(item, len = section.len(), "extracted item section");
                    extracted.push_str(&format!("\n\n=== ITEM {} ===\n{}\n", item, section));
                }
                None => {
                    tracing::warn!(item, "could not extract item section or content too short");
                }
            }
        }

        extracted
    }

    fn find_section<'a>(&self, document: &'a str, item: u8) -> Option<&'a str> {
        if item == 0 || item > ITEM_COUNT {
            return None;
        }
        let start_match = SECTION_START_RES[(item - 1) as usize].find(document)?;

        let end = NEXT_HEADER_RE
            .find_at(document, start_match.end())
            .map(|m| m.start())
            .unwrap_or(document.len());

        let section = &document[start_match.start()..end];
        if section.len() > self.min_section_len {
            Some(section.trim_end())
        } else {
            None
        }
    }
}

impl Default for SectionExtractor {
    fn default() -> Self {
        Self::new(100)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE_FDD: &str = "\
INTRODUCTION\n\
Some preamble text about the franchise system.\n\
ITEM 5: INITIAL FEES\n\
The initial franchise fee is $45,000, payable in a lump sum when you sign \
the franchise agreement. The fee is fully earned and nonrefundable upon \
payment, except as described below for veterans.\n\
ITEM 6: OTHER FEES\n\
You must pay a continuing royalty of 6% of gross sales, payable weekly, \
plus a brand fund contribution of 2% of gross sales. Late payments accrue \
interest at 18% per annum or the maximum legal rate.\n\
ITEM 7: ESTIMATED INITIAL INVESTMENT\n\
Your total estimated initial investment ranges from $250,000 to $500,000 \
including working capital for the first three months of operation.\n";

    #[test]
    fn test_extracts_requested_sections_with_delimiters() {
        let extractor = SectionExtractor::default();
        let result = extractor.extract(SAMPLE_FDD, &[5, 6]);
        assert!(result.contains("=== ITEM 5 ==="));
        assert!(result.contains("initial franchise fee is $45,000"));
        assert!(result.contains("=== ITEM 6 ==="));
        assert!(result.contains("royalty of 6%"));
        // Item 7 was not requested
        assert!(!result.contains("=== ITEM 7 ==="));
    }

    #[test]
    fn test_section_stops_at_next_header() {
        let extractor = SectionExtractor::default();
        let result = extractor.extract(SAMPLE_FDD, &[5]);
        assert!(!result.contains("continuing royalty"));
    }

    #[test]
    fn test_last_section_runs_to_end_of_text() {
        let extractor = SectionExtractor::default();
        let result = extractor.extract(SAMPLE_FDD, &[7]);
        assert!(result.contains("working capital for the first three months"));
    }

    #[test]
    fn test_short_match_is_rejected_as_false_positive() {
        // A numbered list entry is not a section header; the match is under
        // the minimum length and must not be included.
        let document = "ITEM 6: A\nITEM 7: ESTIMATED INITIAL INVESTMENT\nlong text follows";
        let extractor = SectionExtractor::default();
        let result = extractor.extract(document, &[6]);
        assert!(result.is_empty());
    }

    #[test]
    fn test_numbered_paragraph_is_not_a_header() {
        let document = "6. We do business in several states and have a long history of operation in the industry with many locations nationwide.";
        let extractor = SectionExtractor::default();
        assert!(extractor.extract(document, &[6]).is_empty());
    }

    #[test]
    fn test_missing_item_yields_empty_result() {
        let extractor = SectionExtractor::default();
        assert!(extractor.extract(SAMPLE_FDD, &[19]).is_empty());
    }

    #[test]
    fn test_item_1_does_not_match_item_12_header() {
        let document = "ITEM 12: TERRITORY\nYou will receive an exclusive territory around your approved location as described in the franchise agreement, subject to the conditions below.";
        let extractor = SectionExtractor::default();
        assert!(extractor.extract(document, &[1]).is_empty());
        assert!(extractor.extract(document, &[12]).contains("=== ITEM 12 ==="));
    }
}
