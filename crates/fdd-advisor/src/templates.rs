//! Prompt templates for the answer-generation, vision, and web-search
//! calls. Kept together so the compliance guidelines are embedded
//! consistently.

use crate::disclosure::FPR_SYSTEM_INSTRUCTIONS;

fn items_list(items: &[u8]) -> String {
    items
        .iter()
        .map(|i| i.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Prompt for answering from semantically retrieved chunks.
pub fn semantic_answer_prompt(query: &str, context: &str) -> String {
    format!(
        r#"You are an expert FDD (Franchise Disclosure Document) analyst. Answer the following question based ONLY on the provided context from the FDD.
{instructions}
Question: {query}

Context from FDD:
{context}

Instructions:
- Provide a clear, concise answer (2-4 sentences)
- Only use information from the provided context
- If the context doesn't contain the information, say so clearly
- Do NOT add source citations or references in your answer
- If discussing financial data from Item 19, include the source, sample size, and time period if available
- Never project future performance or suggest expected earnings

Answer:"#,
        instructions = FPR_SYSTEM_INSTRUCTIONS,
        query = query,
        context = context,
    )
}

/// Prompt for analyzing rendered page images directly.
pub fn vision_prompt(query: &str, current_page: Option<u32>) -> String {
    let page_label = match current_page {
        Some(page) => format!("page {}", page),
        None => "a page".to_string(),
    };
    format!(
        r#"You are an expert FDD (Franchise Disclosure Document) analyst. You are viewing {page_label} from an FDD document.
{instructions}
Question: {query}

Instructions:
1. Carefully read and analyze ALL content visible on the page(s)
2. Answer the question based ONLY on what you can see
3. Be precise with any numbers, percentages, or financial data
4. If the information to answer the question is not visible on these pages, say so clearly
5. Provide a clear, concise answer (2-4 sentences)
6. If reporting Item 19 financial data, include any visible caveats, sample sizes, or time periods
7. NEVER project future performance or suggest expected earnings

Answer:"#,
        page_label = page_label,
        instructions = FPR_SYSTEM_INSTRUCTIONS,
        query = query,
    )
}

/// System prompt for the full-text analyst path: answer from extracted Item
/// sections and close with a `[SOURCE: Item X]` trailer the caller parses.
pub fn analyst_prompt(
    franchise_name: &str,
    franchise_context: Option<&str>,
    items: &[u8],
    content: &str,
) -> String {
    let context_info = match franchise_context {
        Some(ctx) if !ctx.is_empty() => ctx.to_string(),
        _ => format!("Information about {} franchise", franchise_name),
    };
    format!(
        r#"You are an expert FDD (Franchise Disclosure Document) analyst helping potential franchisees understand {name}'s franchise opportunity.

Context about {name}:
{context_info}

Below are the relevant sections from the FDD (Items {items}). Analyze them carefully to answer the user's question.

FDD Content:
{content}

Provide clear, concise answers (2-4 sentences) based ONLY on the FDD content provided above. If the information is not in the provided sections, say so clearly.

IMPORTANT: At the end of your response, include a source citation in this format:
[SOURCE: Item X]

Where X is the FDD Item number (1-23) that contains the information you used to answer the question."#,
        name = franchise_name,
        context_info = context_info,
        items = items_list(items),
        content = content,
    )
}

/// Prompt for the analyst vision variant: answer from page images and close
/// with a `[SOURCE: Item X, Page Y]` trailer.
pub fn analyst_vision_prompt(query: &str, franchise_name: &str, image_count: usize) -> String {
    let pages_label = if image_count > 1 { "multiple pages" } else { "a page" };
    let review_note = if image_count > 1 {
        "Review all provided pages to find the most relevant information.\n\n"
    } else {
        ""
    };
    format!(
        r#"You are an expert FDD (Franchise Disclosure Document) analyst with deep knowledge of franchise law and disclosure requirements.

You are analyzing {pages_label} from {name}'s FDD. Pay special attention to:
- Table structures (which are legally mandated formats)
- Financial data and Item 19 disclosures
- Fee schedules and investment breakdowns
- Exact numbers, percentages, and specific details mentioned in your answer

{review_note}Question: {query}

Provide clear, accurate answers based ONLY on what you can see in the document images.

IMPORTANT: At the end of your response, include a source citation in this format:
[SOURCE: Item X, Page Y]

Where X is the FDD Item number (1-23) visible in the image, and Y is the page number if visible."#,
        pages_label = pages_label,
        name = franchise_name,
        review_note = review_note,
        query = query,
    )
}

/// System prompt for the web-research path.
pub fn web_search_prompt(franchise_name: &str) -> String {
    format!(
        r#"You are a franchise research assistant. The user is evaluating "{name}" as a potential franchise investment.
{instructions}
Provide helpful, factual information from the web including:
- Recent news and reviews about the franchise
- Franchisee experiences and testimonials
- Industry analysis (without financial comparisons)
- Any red flags or concerns mentioned online

Be balanced and objective. Cite your sources when possible.
Do NOT provide earnings projections, profit estimates, or ROI calculations."#,
        name = franchise_name,
        instructions = FPR_SYSTEM_INSTRUCTIONS,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_semantic_prompt_embeds_guidelines_and_query() {
        let prompt = semantic_answer_prompt("what are the fees", "[Chunk 1 - Item 6, Page 12]\n...");
        assert!(prompt.contains("Never predict, project, or estimate"));
        assert!(prompt.contains("what are the fees"));
        assert!(prompt.contains("[Chunk 1 - Item 6, Page 12]"));
    }

    #[test]
    fn test_vision_prompt_names_page() {
        assert!(vision_prompt("q", Some(57)).contains("page 57"));
        assert!(vision_prompt("q", None).contains("a page"));
    }

    #[test]
    fn test_analyst_prompt_defaults_context() {
        let prompt = analyst_prompt("Acme Coffee", None, &[5, 6], "ITEM 5: INITIAL FEES ...");
        assert!(prompt.contains("Information about Acme Coffee franchise"));
        assert!(prompt.contains("Items 5, 6"));
        assert!(prompt.contains("[SOURCE: Item X]"));
    }

    #[test]
    fn test_analyst_vision_prompt_pluralizes() {
        assert!(analyst_vision_prompt("q", "Acme", 3).contains("multiple pages"));
        assert!(analyst_vision_prompt("q", "Acme", 1).contains("a page"));
    }
}
