//! Disclosure-compliance post-processing.
//!
//! Any answer that surfaces Item 19 content must carry the disclaimer
//! below. The check runs on every answer path (semantic, vision, analyst)
//! regardless of which retrieval strategy produced the answer or whether
//! retrieval fell back.

use regex::Regex;
use std::sync::LazyLock;

use crate::items::FINANCIAL_PERFORMANCE_ITEM;

static FINANCIAL_PERFORMANCE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)item.?19|financial|revenue|earnings|performance")
        .expect("financial performance regex is valid")
});

pub const ITEM_19_DISCLAIMER: &str = r#"

---
*This financial data is from the franchisor's FDD and shows historical performance of certain locations. Your results will vary based on location, market conditions, and how you operate. Review the complete Item 19 with a franchise attorney before making any decision.*"#;

/// Guidelines embedded in every generation prompt so the model itself never
/// predicts performance or characterizes the opportunity.
pub const FPR_SYSTEM_INSTRUCTIONS: &str = r#"
You are a helpful FDD analyst assistant. Your role is to help franchise buyers understand disclosure documents.

IMPORTANT GUIDELINES:
1. Share FACTS from the FDD - actual disclosed figures, with proper context (source, sample size, dates)
2. Never predict, project, or estimate future financial performance
3. Never characterize a franchise as "good," "profitable," "lucrative," or "worth it"
4. When sharing Item 19 data, always note that individual results vary
5. Encourage users to consult with franchise attorneys and accountants
6. Suggest talking to existing franchisees (Item 20) for real-world insights

If asked for projections or advice, acknowledge the question warmly and redirect to what the FDD actually discloses.
"#;

pub fn mentions_financial_performance(query: &str) -> bool {
    FINANCIAL_PERFORMANCE_RE.is_match(query)
}

/// True when the answer's topic set or the query itself touches financial
/// performance.
pub fn needs_disclaimer(items: &[u8], query: &str) -> bool {
    items.contains(&FINANCIAL_PERFORMANCE_ITEM) || mentions_financial_performance(query)
}

/// Append the disclaimer, once.
pub fn append_disclaimer(answer: &str) -> String {
    if answer.ends_with(ITEM_19_DISCLAIMER.trim_end()) || answer.contains(ITEM_19_DISCLAIMER) {
        return answer.to_string();
    }
    format!("{}{}", answer, ITEM_19_DISCLAIMER)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_needs_disclaimer_for_item_19_topic() {
        assert!(needs_disclaimer(&[5, 19], "what are the fees"));
    }

    #[test]
    fn test_needs_disclaimer_for_financial_query() {
        assert!(needs_disclaimer(&[5], "what revenue do locations report"));
        assert!(needs_disclaimer(&[], "tell me about item 19"));
        assert!(needs_disclaimer(&[], "tell me about item-19"));
    }

    #[test]
    fn test_no_disclaimer_for_neutral_query() {
        assert!(!needs_disclaimer(&[11, 12], "what training is provided"));
    }

    #[test]
    fn test_append_disclaimer_once() {
        let answer = append_disclaimer("Locations averaged $500,000.");
        assert!(answer.contains("franchise attorney"));
        let again = append_disclaimer(&answer);
        assert_eq!(answer, again);
    }
}
