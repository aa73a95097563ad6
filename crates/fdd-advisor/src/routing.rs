//! Topic routing: free-text questions to the disclosure items likely to
//! answer them.
//!
//! The keyword table is a static many-to-many mapping built into the
//! binary; a keyword may target several items and an item is targeted by
//! many keywords. Matching is plain substring containment over the
//! lower-cased question, so short keywords can fire inside longer words
//! ("mark" inside "marketing"). That looseness is accepted: it errs toward
//! sending a little extra context rather than missing the relevant section.

use std::collections::BTreeSet;

/// Items most commonly asked about (fees, investment, support, financial
/// performance); returned when no keyword matches so evidence assembly
/// always has something to search.
pub const DEFAULT_ITEMS: [u8; 5] = [5, 6, 7, 11, 19];

static TOPIC_KEYWORDS: &[(&str, &[u8])] = &[
    // Item 1: The Franchisor and Any Parents, Predecessors, and Affiliates
    ("franchisor", &[1]),
    ("parent company", &[1]),
    ("affiliate", &[1]),
    ("predecessor", &[1]),
    ("corporate structure", &[1]),
    ("business entity", &[1]),
    // Item 2: Business Experience
    ("business experience", &[2]),
    ("management team", &[2]),
    ("executive", &[2]),
    ("officer", &[2]),
    ("director", &[2]),
    // Item 3: Litigation
    ("litigation", &[3]),
    ("lawsuit", &[3]),
    ("legal action", &[3]),
    ("court case", &[3]),
    ("legal dispute", &[3]),
    // Item 4: Bankruptcy
    ("bankruptcy", &[4]),
    ("insolvency", &[4]),
    ("financial distress", &[4]),
    // Item 5: Initial Fees
    ("initial fee", &[5]),
    ("franchise fee", &[5]),
    ("initial payment", &[5]),
    ("upfront fee", &[5]),
    ("initial cost", &[5]),
    // Item 6: Other Fees
    ("royalty", &[6]),
    ("royalty fee", &[6]),
    ("advertising fee", &[6]),
    ("marketing fee", &[6]),
    ("ongoing fee", &[6]),
    ("monthly fee", &[6]),
    ("technology fee", &[6]),
    ("support fee", &[6]),
    ("service fee", &[6]),
    ("brand fund", &[6]),
    ("national advertising", &[6]),
    ("local advertising", &[6]),
    // Item 7: Estimated Initial Investment
    ("initial investment", &[7]),
    ("total investment", &[7]),
    ("startup cost", &[7]),
    ("equipment cost", &[7]),
    ("build-out", &[7]),
    ("leasehold improvement", &[7]),
    ("inventory", &[7]),
    ("working capital", &[7]),
    ("opening cost", &[7]),
    // Item 8: Restrictions on Sources of Products and Services
    ("supplier", &[8]),
    ("vendor", &[8]),
    ("approved supplier", &[8]),
    ("product source", &[8]),
    ("purchasing", &[8]),
    // Item 9: Franchisee's Obligations
    ("obligation", &[9]),
    ("requirement", &[9]),
    ("franchisee duty", &[9]),
    ("responsibility", &[9]),
    // Item 10: Financing
    ("financing", &[10]),
    ("loan", &[10]),
    ("payment plan", &[10]),
    ("financial assistance", &[10]),
    // Item 11: Franchisor's Assistance, Advertising, Computer Systems, and Training
    ("training", &[11]),
    ("support", &[11]),
    ("assistance", &[11]),
    ("marketing support", &[11]),
    ("advertising support", &[11]),
    ("computer system", &[11]),
    ("technology system", &[11]),
    ("software", &[11]),
    ("pos system", &[11]),
    ("point of sale", &[11]),
    ("grand opening", &[11]),
    ("opening assistance", &[11]),
    // Item 12: Territory
    ("territory", &[12]),
    ("protected area", &[12]),
    ("exclusive territory", &[12]),
    ("geographic area", &[12]),
    ("location", &[12]),
    ("site selection", &[12]),
    // Item 13: Trademarks
    ("trademark", &[13]),
    ("brand", &[13]),
    ("mark", &[13]),
    ("logo", &[13]),
    ("trade name", &[13]),
    // Item 14: Patents, Copyrights, and Proprietary Information
    ("patent", &[14]),
    ("copyright", &[14]),
    ("proprietary", &[14]),
    ("intellectual property", &[14]),
    ("trade secret", &[14]),
    // Item 15: Obligation to Participate in the Actual Operation
    ("owner participation", &[15]),
    ("personal involvement", &[15]),
    ("absentee owner", &[15]),
    ("on-site management", &[15]),
    // Item 16: Restrictions on What the Franchisee May Sell
    ("product restriction", &[16]),
    ("service restriction", &[16]),
    ("menu", &[16]),
    ("offering", &[16]),
    // Item 17: Renewal, Termination, Transfer, and Dispute Resolution
    ("renewal", &[17]),
    ("termination", &[17]),
    ("transfer", &[17]),
    ("sell franchise", &[17]),
    ("selling", &[17]),
    ("assignment", &[17]),
    ("dispute resolution", &[17]),
    ("arbitration", &[17]),
    ("mediation", &[17]),
    ("contract term", &[17]),
    ("agreement term", &[17]),
    ("exit", &[17]),
    ("consent", &[17]),
    ("approval", &[17]),
    // Item 18: Public Figures
    ("celebrity", &[18]),
    ("public figure", &[18]),
    ("endorsement", &[18]),
    // Item 19: Financial Performance Representations
    ("financial performance", &[19]),
    ("earnings", &[19]),
    ("revenue", &[19]),
    ("sales", &[19]),
    ("profit", &[19]),
    ("income", &[19]),
    ("performance", &[19]),
    ("average sales", &[19]),
    ("gross sales", &[19]),
    ("net income", &[19]),
    ("ebitda", &[19]),
    // Item 20: Outlets and Franchisee Information
    ("number of franchises", &[20]),
    ("franchise count", &[20]),
    ("outlet", &[20]),
    ("location count", &[20]),
    ("franchisee list", &[20]),
    ("contact information", &[20]),
    // Item 21: Financial Statements
    ("financial statement", &[21]),
    ("balance sheet", &[21]),
    ("income statement", &[21]),
    ("audit", &[21]),
    // Item 22: Contracts
    ("contract", &[22]),
    ("agreement", &[22]),
    ("franchise agreement", &[22]),
    // Item 23: Receipts
    ("receipt", &[23]),
    ("acknowledgment", &[23]),
];

pub struct TopicRouter {}

impl TopicRouter {
    pub fn new() -> Self {
        Self {}
    }

    /// Map a question to the sorted, deduplicated set of item numbers whose
    /// content is most likely to answer it. Total over any input; an
    /// unrecognized vocabulary falls back to [`DEFAULT_ITEMS`].
    pub fn route(&self, question: &str) -> Vec<u8> {
        let question_lower = question.to_lowercase();
        let mut items: BTreeSet<u8> = BTreeSet::new();

        for (keyword, mapped) in TOPIC_KEYWORDS {
            if question_lower.contains(keyword) {
                items.extend(mapped.iter().copied());
            }
        }

        if items.is_empty() {
            tracing::debug!(question = %question, "no topic keyword matched, using default items");
            return DEFAULT_ITEMS.to_vec();
        }

        items.into_iter().collect()
    }
}

impl Default for TopicRouter {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_fallback_for_unrecognized_vocabulary() {
        let router = TopicRouter::new();
        assert_eq!(router.route("Tell me something interesting"), vec![5, 6, 7, 11, 19]);
    }

    #[test]
    fn test_union_of_disjoint_keywords_sorted_dedup() {
        let router = TopicRouter::new();
        let items = router.route("What royalty do I pay and what territory do I get?");
        assert_eq!(items, vec![6, 12]);
    }

    #[test]
    fn test_single_keyword() {
        let router = TopicRouter::new();
        assert_eq!(router.route("tell me about litigation history"), vec![3]);
    }

    #[test]
    fn test_case_insensitive() {
        let router = TopicRouter::new();
        assert_eq!(router.route("ROYALTY FEES"), vec![6]);
    }

    #[test]
    fn test_substring_matching_is_loose_by_design() {
        // "mark" fires inside "marketing"; a marketing question therefore
        // also routes to trademarks. Accepted quirk of substring matching.
        let router = TopicRouter::new();
        let items = router.route("what marketing support do I get");
        assert!(items.contains(&11));
        assert!(items.contains(&13));
    }

    #[test]
    fn test_idempotent_and_order_stable() {
        let router = TopicRouter::new();
        let question = "training support and franchise fee and territory";
        let first = router.route(question);
        let second = router.route(question);
        assert_eq!(first, second);
        let mut sorted = first.clone();
        sorted.sort_unstable();
        sorted.dedup();
        assert_eq!(first, sorted);
    }

    #[test]
    fn test_empty_question_uses_default() {
        let router = TopicRouter::new();
        assert_eq!(router.route(""), DEFAULT_ITEMS.to_vec());
    }
}
