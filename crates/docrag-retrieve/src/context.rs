//! Context assembly for the downstream chat agent.

use docrag_core::RetrievalMatch;

/// Concatenate match blocks in ranking order until the next block would
/// push the total past `max_chars`. The result is never longer than
/// `max_chars` and blocks are never truncated mid-way.
pub fn assemble_context(matches: &[RetrievalMatch], max_chars: usize) -> String {
    let mut assembled = String::new();
    for m in matches {
        let source = if m.metadata.source.is_empty() {
            "unknown"
        } else {
            m.metadata.source.as_str()
        };
        let block = format!("Source: {source}\n{}\n---\n", m.metadata.text);
        if assembled.len() + block.len() > max_chars {
            break;
        }
        assembled.push_str(&block);
    }
    assembled
}

/// Wrap an assembled context and the user's question into a single
/// instruction string for the downstream agent. The wrapper wording is
/// policy; only the context selection in [`assemble_context`] is
/// load-bearing.
pub fn build_context(query: &str, matches: &[RetrievalMatch], max_chars: usize) -> String {
    let context = assemble_context(matches, max_chars);
    format!(
        "You are an assistant. Use the following context to answer the user's question. \
         Cite the 'Source' lines when relevant.\n\n\
         Context:\n{context}\n\
         User question:\n{query}\n\n\
         Answer concisely and cite sources where useful."
    )
}
