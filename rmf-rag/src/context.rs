//! Context assembly and citation dedup.
//!
//! Every surviving chunk becomes one block:
//!
//! ```text
//! [1] (nist_80053r5.pdf, p.42)
//! AC-2 ACCOUNT MANAGEMENT ...
//! ```
//!
//! Blocks are joined by a blank line and the whole string is held to a
//! character budget. A block whose label does not fit is dropped entirely;
//! a block whose label fits gets as much of its text as the budget allows.

use std::collections::HashSet;

use crate::document::{Chunk, Citation, ScoredChunk};

const BLOCK_SEPARATOR: &str = "\n\n";
const ELLIPSIS: &str = "...";

/// The label line for a chunk at 1-based `ordinal`.
pub fn format_label(ordinal: usize, chunk: &Chunk) -> String {
    format!("[{ordinal}] ({}, p.{})", chunk.source, chunk.page_label())
}

/// Join labeled chunk excerpts into a context string of at most `budget` characters.
pub fn assemble_context(chunks: &[ScoredChunk], budget: usize) -> String {
    let separator_len = BLOCK_SEPARATOR.chars().count();
    let mut context = String::new();
    let mut used = 0usize;
    let mut ordinal = 0usize;

    for scored in chunks {
        let text = scored.chunk.text.trim();
        if text.is_empty() {
            continue;
        }
        ordinal += 1;

        let separator = if context.is_empty() { 0 } else { separator_len };
        let label = format_label(ordinal, &scored.chunk);
        // label + newline + at least one character of text
        let header = separator + label.chars().count() + 1;
        if used + header >= budget {
            break;
        }

        if separator > 0 {
            context.push_str(BLOCK_SEPARATOR);
        }
        context.push_str(&label);
        context.push('\n');
        used += header;

        let remaining = budget - used;
        let text_len = text.chars().count();
        if text_len <= remaining {
            context.push_str(text);
            used += text_len;
        } else {
            context.extend(text.chars().take(remaining));
            break;
        }
    }

    context
}

/// The leading `max_chars` characters of `text`, plus `...` when it was cut.
pub fn snippet(text: &str, max_chars: usize) -> String {
    let mut chars = text.chars();
    let head: String = chars.by_ref().take(max_chars).collect();
    if chars.next().is_some() { format!("{head}{ELLIPSIS}") } else { head }
}

/// One citation per unique `(source, page)`, taken from the first chunk in ranked order.
pub fn collect_citations(chunks: &[ScoredChunk], snippet_chars: usize) -> Vec<Citation> {
    let mut seen: HashSet<(&str, Option<u32>)> = HashSet::new();
    let mut citations = Vec::new();
    for scored in chunks {
        let chunk = &scored.chunk;
        if !seen.insert((chunk.source.as_str(), chunk.page)) {
            continue;
        }
        citations.push(Citation {
            source: chunk.source.clone(),
            page: chunk.page,
            snippet: snippet(&chunk.text, snippet_chars),
        });
    }
    citations
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scored(source: &str, page: Option<u32>, text: &str) -> ScoredChunk {
        ScoredChunk {
            chunk: Chunk {
                id: format!("{source}-{page:?}-{}", text.len()),
                text: text.to_string(),
                source: source.to_string(),
                page,
            },
            distance: 0.5,
        }
    }

    #[test]
    fn labels_use_ordinal_source_and_page() {
        let chunks = vec![
            scored("nist_80053r5.pdf", Some(42), "AC-2 Account Management"),
            scored("csf.pdf", None, "Govern"),
        ];
        let context = assemble_context(&chunks, 6000);
        assert_eq!(
            context,
            "[1] (nist_80053r5.pdf, p.42)\nAC-2 Account Management\n\n[2] (csf.pdf, p.?)\nGovern"
        );
    }

    #[test]
    fn empty_chunks_are_skipped_without_consuming_an_ordinal() {
        let chunks = vec![scored("a.pdf", Some(1), "   "), scored("b.pdf", Some(2), "text")];
        assert_eq!(assemble_context(&chunks, 6000), "[1] (b.pdf, p.2)\ntext");
    }

    #[test]
    fn truncation_cuts_text_not_labels() {
        let chunks = vec![scored("a.pdf", Some(1), "abcdefghij"), scored("b.pdf", Some(2), "xyz")];
        // "[1] (a.pdf, p.1)" is 16 chars, plus newline = 17.
        let context = assemble_context(&chunks, 20);
        assert_eq!(context, "[1] (a.pdf, p.1)\nabc");

        // Second label would not fit, so the second block is dropped entirely.
        let context = assemble_context(&chunks, 30);
        assert_eq!(context, "[1] (a.pdf, p.1)\nabcdefghij");
        assert!(context.chars().count() <= 30);
    }

    #[test]
    fn budget_smaller_than_first_label_yields_empty_context() {
        let chunks = vec![scored("a.pdf", Some(1), "abc")];
        assert_eq!(assemble_context(&chunks, 10), "");
    }

    #[test]
    fn budget_counts_characters_not_bytes() {
        let chunks = vec![scored("é.pdf", Some(1), "ééééé")];
        let context = assemble_context(&chunks, 19);
        assert_eq!(context.chars().count(), 19);
        assert!(context.ends_with("éé"));
    }

    #[test]
    fn citations_dedup_by_source_and_page() {
        let chunks = vec![
            scored("A", Some(5), "first on A5"),
            scored("B", Some(9), "only on B9"),
            scored("A", Some(5), "second on A5"),
        ];
        let citations = collect_citations(&chunks, 200);
        assert_eq!(citations.len(), 2);
        assert_eq!(citations[0].source, "A");
        assert_eq!(citations[0].snippet, "first on A5");
        assert_eq!(citations[1].source, "B");
    }

    #[test]
    fn snippet_marks_truncation() {
        assert_eq!(snippet("abcdef", 3), "abc...");
        assert_eq!(snippet("abc", 3), "abc");
    }
}
