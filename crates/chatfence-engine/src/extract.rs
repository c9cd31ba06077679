use serde::Serialize;
use xi_rope::Rope;

use crate::{
    rope::slice_to_string,
    segments::{Segment, segment_rope},
};

/// A code block as handed to renderers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CodeBlock {
    /// Language tag, empty when the opener declared none.
    pub language: String,
    /// Literal text between the fences.
    pub content: String,
    pub is_complete: bool,
    /// Byte offset of the opener line.
    pub start_offset: usize,
    /// Byte offset just past the closer line, or the buffer length.
    pub end_offset: usize,
}

/// Collects the code blocks of a rope, in order.
pub fn extract_code_blocks_rope(rope: &Rope) -> Vec<CodeBlock> {
    segment_rope(rope)
        .into_iter()
        .filter_map(|seg| match seg {
            Segment::Code(code) => Some(CodeBlock {
                content: slice_to_string(rope, code.content),
                language: code.language,
                is_complete: code.is_complete,
                start_offset: code.span.start,
                end_offset: code.span.end,
            }),
            Segment::Text { .. } => None,
        })
        .collect()
}

/// Returns every fenced code block in the buffer, including a trailing block
/// whose closing fence has not streamed in yet.
///
/// ```
/// let blocks = chatfence_engine::extract_code_blocks("```js\nlet a = 1;\n");
/// assert_eq!(blocks.len(), 1);
/// assert_eq!(blocks[0].language, "js");
/// assert_eq!(blocks[0].content, "let a = 1;");
/// assert!(!blocks[0].is_complete);
/// ```
pub fn extract_code_blocks(buffer: &str) -> Vec<CodeBlock> {
    extract_code_blocks_rope(&Rope::from(buffer))
}
