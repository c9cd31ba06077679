use std::fmt;

use log::debug;
use xi_rope::{Rope, delta::Builder};

use crate::{
    error::FenceError,
    extract::{CodeBlock, extract_code_blocks_rope},
    process::{SegmentHandler, process_code_blocks_rope},
    segments::{Segment, segment_rope},
    validate::{ValidationIssue, has_incomplete_code_block_rope, validate_code_block_syntax_rope},
};

/// Accumulates a message as it streams in.
///
/// The buffer only stores text. Every query rescans the whole rope, so a
/// query result depends on nothing but the current contents and two buffers
/// with equal text always answer the same way.
#[derive(Clone)]
pub struct MessageBuffer {
    rope: Rope,
    /// Incremented on each non-empty append (enables change detection)
    version: u64,
}

impl MessageBuffer {
    pub fn new() -> Self {
        Self {
            rope: Rope::from(""),
            version: 0,
        }
    }

    /// Creates a buffer from raw bytes, failing fast on invalid UTF-8.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, FenceError> {
        let text = std::str::from_utf8(bytes).map_err(FenceError::not_utf8)?;
        Ok(Self {
            rope: Rope::from(text),
            version: 0,
        })
    }

    /// Appends a streamed chunk to the end of the message.
    pub fn push_str(&mut self, chunk: &str) {
        if chunk.is_empty() {
            return;
        }
        let len = self.rope.len();
        let mut builder = Builder::new(len);
        builder.replace(len..len, Rope::from(chunk));
        self.rope = builder.build().apply(&self.rope);
        self.version += 1;
        debug!(
            "appended {} bytes (now {}, version {})",
            chunk.len(),
            self.rope.len(),
            self.version
        );
    }

    /// Appends a chunk of raw bytes. Invalid UTF-8 is rejected and the buffer
    /// is left untouched.
    pub fn push_bytes(&mut self, chunk: &[u8]) -> Result<(), FenceError> {
        let text = std::str::from_utf8(chunk).map_err(FenceError::not_utf8)?;
        self.push_str(text);
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.rope.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rope.len() == 0
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn rope(&self) -> &Rope {
        &self.rope
    }

    /// The full message text (exact round-trip of everything appended).
    pub fn to_text(&self) -> String {
        self.rope.to_string()
    }

    pub fn segments(&self) -> Vec<Segment> {
        segment_rope(&self.rope)
    }

    pub fn extract_code_blocks(&self) -> Vec<CodeBlock> {
        extract_code_blocks_rope(&self.rope)
    }

    pub fn validate_code_block_syntax(&self) -> Vec<ValidationIssue> {
        validate_code_block_syntax_rope(&self.rope)
    }

    pub fn has_incomplete_code_block(&self) -> bool {
        has_incomplete_code_block_rope(&self.rope)
    }

    pub fn process_code_blocks<H: SegmentHandler>(&self, handler: &mut H) -> Vec<H::Output> {
        process_code_blocks_rope(&self.rope, handler)
    }
}

impl Default for MessageBuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for MessageBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MessageBuffer")
            .field("len", &self.rope.len())
            .field("version", &self.version)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn push_str_appends_and_bumps_version() {
        let mut buf = MessageBuffer::new();
        buf.push_str("Hello");
        buf.push_str(", world");
        assert_eq!(buf.to_text(), "Hello, world");
        assert_eq!(buf.version(), 2);
    }

    #[test]
    fn empty_chunk_is_a_no_op() {
        let mut buf = MessageBuffer::new();
        buf.push_str("");
        assert!(buf.is_empty());
        assert_eq!(buf.version(), 0);
    }

    #[test]
    fn from_bytes_rejects_invalid_utf8() {
        let err = MessageBuffer::from_bytes(&[b'a', 0xff, b'b']).unwrap_err();
        assert!(matches!(err, FenceError::InvalidArgument { .. }));
        assert!(err.to_string().contains("valid up to byte 1"));
    }

    #[test]
    fn push_bytes_leaves_buffer_untouched_on_error() {
        let mut buf = MessageBuffer::from_bytes(b"ok").unwrap();
        assert!(buf.push_bytes(&[0xc3]).is_err());
        assert_eq!(buf.to_text(), "ok");
        assert_eq!(buf.version(), 0);
    }

    #[test]
    fn queries_follow_the_stream() {
        let mut buf = MessageBuffer::new();
        buf.push_str("Sure:\n```rust\nfn main() {");
        assert!(buf.has_incomplete_code_block());
        assert_eq!(buf.validate_code_block_syntax().len(), 1);

        buf.push_str("}\n```\nDone.");
        assert!(!buf.has_incomplete_code_block());
        let blocks = buf.extract_code_blocks();
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].content, "fn main() {}");
        assert_eq!(buf.segments().len(), 3);
    }
}
