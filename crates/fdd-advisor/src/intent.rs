//! Financial-performance-representation (FPR) intent detection.
//!
//! Franchise regulations prohibit answering questions that ask for personal
//! earnings predictions, individualized financial calculations, or
//! investment recommendations. Before any retrieval or model call, the
//! question is classified against an allow-list of legitimate disclosure
//! questions and an ordered set of block-rule groups; blocked questions get
//! a pre-written friendly redirect instead of an answer.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

// ============================================================================
// Allow-list: legitimate disclosure questions
// ============================================================================
//
// Checked before any block rule. Many legitimate questions about disclosed
// data contain words like "average" or "revenue" that overlap with blocked
// calculation requests; questions shaped like these are always let through.

static ALLOW_ITEM_REFERENCE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\bitem\s*\d{1,2}\b").expect("item reference regex is valid")
});
static ALLOW_DISCLOSED_DATA_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(disclose[sd]?|disclosures?|report(s|ed)?)\b")
        .expect("disclosed data regex is valid")
});
static ALLOW_OUTLET_COUNT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)how many (locations|outlets|units|stores|franchises|franchisees)")
        .expect("outlet count regex is valid")
});
static ALLOW_DOCUMENT_SAYS_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)what (does|do|did) (the )?(fdd|document|disclosure|franchisor) (say|state|show|list)")
        .expect("document says regex is valid")
});

// ============================================================================
// Block group: personal earnings projections
// ============================================================================

static EARNINGS_HOW_MUCH_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)how much (can|will|could|should|would) (i|we|someone) (make|earn|profit|take home)")
        .expect("earnings how-much regex is valid")
});
static EARNINGS_EXPECT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)what (can|could|should|would) (i|we) expect to (make|earn)")
        .expect("earnings expect regex is valid")
});
static EARNINGS_TYPICAL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(typical|average|normal)\s+(annual\s+)?(earnings|income|salary|revenue|take.?home)")
        .expect("earnings typical regex is valid")
});

// ============================================================================
// Block group: ROI / payback
// ============================================================================

static ROI_WHAT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)what('s| is| are) (the |my )?(roi|return on investment|payback|break.?even)")
        .expect("roi what regex is valid")
});
static ROI_HOW_LONG_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)how (long|quickly|soon) (until|before|to|till) (break.?even|profit|profitable|recoup)")
        .expect("roi how-long regex is valid")
});

// ============================================================================
// Block group: profitability
// ============================================================================

static PROFIT_IS_THIS_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)is (this|it) (a )?(profitable|lucrative|money.?maker)")
        .expect("profitability regex is valid")
});
static PROFIT_HOW_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)how profitable").expect("how profitable regex is valid")
});
static PROFIT_MAKE_MONEY_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)will (i|we) make money").expect("make money regex is valid")
});
static PROFIT_CAN_MAKE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)can (i|you|we) make (good )?money").expect("can make money regex is valid")
});

// ============================================================================
// Block group: calculation / projection requests
// ============================================================================

static CALC_VERB_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(calculate|compute|estimate|project|predict)\b")
        .expect("calculation verb regex is valid")
});
static FINANCIAL_NOUN_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(earnings|income|revenue|profit|sales|money)\b")
        .expect("financial noun regex is valid")
});

// ============================================================================
// Block group: earnings comparisons
// ============================================================================

static COMPARE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(compare|versus|\bvs\.?|better than|which is better)")
        .expect("comparison regex is valid")
});
static COMPARE_FINANCIAL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(profit|revenue|earnings|income|money|return)\b")
        .expect("comparison financial regex is valid")
});

// ============================================================================
// Block group: investment advice
// ============================================================================

static ADVICE_GOOD_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)is (this|it) a good (investment|opportunity|idea|decision)")
        .expect("good investment regex is valid")
});
static ADVICE_SHOULD_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)should (i|we) (invest|buy|purchase|get)")
        .expect("should invest regex is valid")
});
static ADVICE_WORTH_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)worth (it|the investment|buying)").expect("worth it regex is valid")
});
static ADVICE_RECOMMEND_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)recommend.*(invest|buy|franchise)").expect("recommend regex is valid")
});

// ============================================================================
// Types
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FprIntent {
    /// "How much will I make?"
    PersonalEarningsProjection,
    /// "What's the ROI?" / "How long until break-even?"
    RoiQuestion,
    /// "Is this profitable?"
    ProfitabilityQuestion,
    /// "Calculate my expected earnings"
    CalculationRequest,
    /// "Which franchise earns more?"
    ComparisonRequest,
    /// "Should I invest?" / "Is this worth it?"
    InvestmentAdvice,
}

impl FprIntent {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::PersonalEarningsProjection => "personal_earnings_projection",
            Self::RoiQuestion => "roi_question",
            Self::ProfitabilityQuestion => "profitability_question",
            Self::CalculationRequest => "calculation_request",
            Self::ComparisonRequest => "comparison_request",
            Self::InvestmentAdvice => "investment_advice",
        }
    }
}

/// UI deep-link hint accompanying a redirect, pointing the buyer at the
/// disclosure section that actually answers their underlying question.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SuggestedAction {
    NavigateItem19,
    NavigateItem7,
    NavigateItem20,
    ShowFddData,
}

#[derive(Debug, Clone)]
pub struct IntentClassification {
    pub intent: Option<FprIntent>,
    pub should_redirect: bool,
    pub friendly_response: &'static str,
    pub suggested_action: Option<SuggestedAction>,
}

impl IntentClassification {
    fn allowed() -> Self {
        Self {
            intent: None,
            should_redirect: false,
            friendly_response: "",
            suggested_action: None,
        }
    }

    fn blocked(
        intent: FprIntent,
        response: &'static str,
        action: SuggestedAction,
    ) -> Self {
        Self {
            intent: Some(intent),
            should_redirect: true,
            friendly_response: response,
            suggested_action: Some(action),
        }
    }
}

// ============================================================================
// Canned redirect responses
// ============================================================================

const EARNINGS_REDIRECT: &str = r#"That's one of the most important questions for any franchise buyer! While I can't predict what you'll earn (every owner's results are different), I can show you exactly what this franchisor has disclosed about existing locations.

**Here's what I can help with:**
- Walk you through Item 19's Financial Performance Representation
- Show you reported revenue ranges from actual locations
- Explain the sample sizes and time periods for the data

Would you like me to find the Item 19 financial data for you? You can also talk directly with existing franchisees listed in Item 20 to hear about their real experiences."#;

const ROI_REDIRECT: &str = r#"ROI and breakeven timing depend on many factors unique to your situation—your location, local market, how you operate, and more. I can't calculate that for you, but I can give you the building blocks.

**Here's what the FDD tells us:**
- **Item 7** shows the initial investment range (what you'll spend to open)
- **Item 19** (if provided) shows historical financial performance of existing locations

With these figures, you and your accountant can model different scenarios. Would you like me to pull up the investment costs and any disclosed revenue data?"#;

const PROFITABILITY_REDIRECT: &str = r#"Profitability varies significantly from one franchisee to another—even within the same brand. Location, market conditions, and how you run the business all play a role.

**What I can show you:**
- Disclosed financial performance data (if the franchisor provides Item 19)
- The number of locations and how that's changed over time
- Any litigation or franchisee turnover trends

The best insight often comes from talking to current and former franchisees. Item 20 lists their contact information. Want me to summarize what the FDD discloses about financial performance?"#;

const CALCULATION_REDIRECT: &str = r#"I can't calculate projected earnings—franchise regulations (and common sense!) prevent anyone from predicting your specific results. But here's the good news: the FDD contains real data that's more valuable than any projection.

**I can help you find:**
- Actual revenue figures from existing locations (Item 19)
- Total investment costs (Item 7)
- Franchise fee and ongoing royalty structure (Items 5 & 6)

Would you like me to gather this data so you can run your own analysis or work through the numbers with your accountant?"#;

const COMPARISON_REDIRECT: &str = r#"Comparing franchise earnings is tricky—different brands report data differently (or not at all), and your results will depend on your specific situation.

**What I can do:**
- Show you exactly what this franchisor discloses in their Item 19
- Explain the methodology and sample sizes they use
- Help you understand what the numbers actually mean

For true comparisons, you'd want to review each brand's FDD independently and ideally speak with franchisees from each system. Would you like me to walk through this franchise's financial disclosures?"#;

const ADVICE_REDIRECT: &str = r#"That's a decision only you can make—but I can help you gather the facts! A franchise attorney and accountant are essential partners in evaluating any opportunity.

**Here's how the FDD can help you decide:**
- **Item 19**: Financial performance (if disclosed)
- **Item 20**: Contact info for current/former franchisees to interview
- **Item 3**: Litigation history
- **Item 4**: Bankruptcy history
- **Item 21**: Financial statements

Would you like me to help you explore any of these areas? Many buyers find speaking with existing franchisees to be the most valuable research."#;

// ============================================================================
// Classifier
// ============================================================================

pub struct FprClassifier {}

impl FprClassifier {
    pub fn new() -> Self {
        Self {}
    }

    /// Ordered rule evaluation: allow-list first, then block groups, first
    /// match wins. Total over any input; empty strings fall through to
    /// "no FPR issue".
    pub fn classify(&self, query: &str) -> IntentClassification {
        // Allow-list takes precedence over every block rule, so ambiguous
        // phrasing that also matches a legitimate-question shape is let
        // through.
        if self.is_legitimate_disclosure_question(query) {
            return IntentClassification::allowed();
        }

        if self.is_personal_earnings_question(query) {
            return IntentClassification::blocked(
                FprIntent::PersonalEarningsProjection,
                EARNINGS_REDIRECT,
                SuggestedAction::NavigateItem19,
            );
        }

        if self.is_roi_question(query) {
            return IntentClassification::blocked(
                FprIntent::RoiQuestion,
                ROI_REDIRECT,
                SuggestedAction::ShowFddData,
            );
        }

        if self.is_profitability_question(query) {
            return IntentClassification::blocked(
                FprIntent::ProfitabilityQuestion,
                PROFITABILITY_REDIRECT,
                SuggestedAction::NavigateItem19,
            );
        }

        if self.is_calculation_request(query) {
            return IntentClassification::blocked(
                FprIntent::CalculationRequest,
                CALCULATION_REDIRECT,
                SuggestedAction::ShowFddData,
            );
        }

        if self.is_comparison_request(query) {
            return IntentClassification::blocked(
                FprIntent::ComparisonRequest,
                COMPARISON_REDIRECT,
                SuggestedAction::NavigateItem19,
            );
        }

        if self.is_investment_advice_question(query) {
            return IntentClassification::blocked(
                FprIntent::InvestmentAdvice,
                ADVICE_REDIRECT,
                SuggestedAction::ShowFddData,
            );
        }

        IntentClassification::allowed()
    }

    fn is_legitimate_disclosure_question(&self, query: &str) -> bool {
        ALLOW_ITEM_REFERENCE_RE.is_match(query)
            || ALLOW_DISCLOSED_DATA_RE.is_match(query)
            || ALLOW_OUTLET_COUNT_RE.is_match(query)
            || ALLOW_DOCUMENT_SAYS_RE.is_match(query)
    }

    fn is_personal_earnings_question(&self, query: &str) -> bool {
        EARNINGS_HOW_MUCH_RE.is_match(query)
            || EARNINGS_EXPECT_RE.is_match(query)
            || EARNINGS_TYPICAL_RE.is_match(query)
    }

    fn is_roi_question(&self, query: &str) -> bool {
        ROI_WHAT_RE.is_match(query) || ROI_HOW_LONG_RE.is_match(query)
    }

    fn is_profitability_question(&self, query: &str) -> bool {
        PROFIT_IS_THIS_RE.is_match(query)
            || PROFIT_HOW_RE.is_match(query)
            || PROFIT_MAKE_MONEY_RE.is_match(query)
            || PROFIT_CAN_MAKE_RE.is_match(query)
    }

    fn is_calculation_request(&self, query: &str) -> bool {
        CALC_VERB_RE.is_match(query) && FINANCIAL_NOUN_RE.is_match(query)
    }

    fn is_comparison_request(&self, query: &str) -> bool {
        COMPARE_RE.is_match(query) && COMPARE_FINANCIAL_RE.is_match(query)
    }

    fn is_investment_advice_question(&self, query: &str) -> bool {
        ADVICE_GOOD_RE.is_match(query)
            || ADVICE_SHOULD_RE.is_match(query)
            || ADVICE_WORTH_RE.is_match(query)
            || ADVICE_RECOMMEND_RE.is_match(query)
    }
}

impl Default for FprClassifier {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// Tests
// ============================================================================
