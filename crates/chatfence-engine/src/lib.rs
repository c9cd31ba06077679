//! Segmentation of streamed chat messages into prose and fenced code.
//!
//! Every operation rescans the whole buffer and keeps no state between
//! calls. Appending text can only change the last segment; everything
//! before it is settled.

pub mod buffer;
pub mod error;
pub mod extract;
pub mod process;
pub mod rope;
pub mod scan;
pub mod segments;
pub mod snapshot;
pub mod validate;

// Re-export key types for easier usage
pub use buffer::MessageBuffer;
pub use error::FenceError;
pub use extract::{CodeBlock, extract_code_blocks, extract_code_blocks_rope};
pub use process::{
    CodeBlockFields, FnHandler, SegmentHandler, TrySegmentHandler, process_code_blocks,
    process_code_blocks_rope, process_code_blocks_with, try_process_code_blocks,
    try_process_code_blocks_rope,
};
pub use rope::Span;
pub use segments::{CodeSegment, Segment, segment_rope, segments};
pub use validate::{
    IssueKind, ValidationIssue, has_incomplete_code_block, has_incomplete_code_block_rope,
    validate_code_block_syntax, validate_code_block_syntax_rope,
};
