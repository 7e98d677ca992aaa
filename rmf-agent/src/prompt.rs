//! Prompt text shared by every persona, plus the canned answers.

use crate::persona::PersonaCatalog;

/// Placeholder substituted with the assembled context.
pub const CONTEXT_PLACEHOLDER: &str = "{context}";

/// Formatting rules appended to every persona instruction. Advisory only;
/// answers are returned as the backend wrote them.
pub const FORMAT_RULES: &str = "\n\nSTRICT FORMAT RULES (you MUST follow these):\n\
- Start with ONE bold summary sentence.\n\
- **Hierarchy**: Use nested bullets for details. E.g.,\n\
\x20 - **Control**: Description\n\
\x20   - Evidence: ...\n\
\x20   - Test: ...\n\
- **Spacing**: Use blank lines between major points/bullets.\n\
- **Lists**: Use numbered lists (1., 2.) for sequential steps.\n\
- Bold control IDs: **AC-2**, **AC-2(1)**\n\
- Cite inline: [p.45]\n\
- Total response: MAX 200 words. Keep it concise but structured.\n\
- NEVER start with 'Okay' or 'Let's break down'. Go straight to content.\n";

/// Instruction used when a caller retrieves and generates without a persona.
pub const DEFAULT_INSTRUCTION: &str = "You are a concise NIST 800-53 consultant. You MUST follow these rules:\n\n\
FORMAT: Use markdown. Start with a bold one-line summary.\n\
HIERARCHY: Use nested bullets. Main point -> Sub-point.\n\
SPACING: Add blank lines between main bullet points.\n\
LENGTH: Maximum 150 words total.\n\
STYLE: No filler, no intros, no 'Okay let's...', no conclusions. Just facts.\n\
CITATIONS: Inline as [p.XX].\n\
CONTROLS: Bold IDs like **AC-2**, **AC-2(1)**.\n\n\
Context:\n{context}";

/// Returned with no sources when the index is missing or holds no chunks.
pub const KNOWLEDGE_BASE_EMPTY_ANSWER: &str =
    "The Knowledge Base is empty. Please upload NIST documents to docs/ and run ingestion.";

/// Returned with no sources when the relevance guard rejects the question.
pub const OUT_OF_SCOPE_ANSWER: &str = "I don't have specific information on that topic in the NIST 800-53 knowledge base. \
Please ask about NIST security controls, compliance, or risk management.";

/// Build a persona instruction from its role sentence.
pub(crate) fn persona_instruction(role: &str) -> String {
    format!("{role}{FORMAT_RULES}\nContext:\n{CONTEXT_PLACEHOLDER}")
}

/// Substitute `context` into an instruction template.
///
/// Only the template's own placeholders are replaced; placeholder text
/// inside `context` is left untouched.
pub fn render_instruction(template: &str, context: &str) -> String {
    template.replace(CONTEXT_PLACEHOLDER, context)
}

/// The classifier instruction listing every persona in catalog order.
pub fn router_instruction(catalog: &PersonaCatalog) -> String {
    let categories: Vec<String> =
        catalog.iter().map(|p| format!("- {}: {}", p.id, p.name)).collect();
    format!(
        "You are an intelligent router for a NIST Cybersecurity Chatbot. \
Classify the user's query into exactly one category:\n{}\n\n\
Return ONLY the category key (e.g., 'AUDIT_SPECIALIST'). No explanation.",
        categories.join("\n")
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn placeholder_inside_context_is_not_expanded() {
        let rendered = render_instruction("Context:\n{context}", "see {context} literally");
        assert_eq!(rendered, "Context:\nsee {context} literally");
    }

    #[test]
    fn router_instruction_lists_every_persona() {
        let instruction = router_instruction(PersonaCatalog::standard());
        assert!(instruction.contains("- NIST_SPECIALIST: NIST Controls Specialist\n"));
        assert!(instruction.contains("- DEVSECOPS_AGENT: DevSecOps & Pipeline Security Specialist"));
        assert!(instruction.ends_with("No explanation."));
    }

    #[test]
    fn format_rules_keep_nested_bullet_indentation() {
        assert!(FORMAT_RULES.contains("\n  - **Control**: Description\n    - Evidence: ...\n"));
        assert!(DEFAULT_INSTRUCTION.ends_with("Context:\n{context}"));
    }
}
