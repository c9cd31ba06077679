use crate::rope::span::Span;

/// A raw scan event, in buffer order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RawEvent {
    /// A maximal run of lines outside any fence.
    TextRun(Span),
    /// An opener line. `content_start` is the first byte after the opener line.
    FenceOpen {
        line: Span,
        fence_len: usize,
        language: String,
        meta: String,
        content_start: usize,
    },
    /// A closer line. `content_end` excludes the terminator of the last content line.
    FenceClose { line: Span, content_end: usize },
}

/// A fence still open when the buffer ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UnclosedFence {
    /// Byte offset of the opener line.
    pub opener_start: usize,
    /// End of the content accumulated so far.
    pub content_end: usize,
}

/// The result of scanning a whole buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Scan {
    pub events: Vec<RawEvent>,
    /// Buffer length in bytes.
    pub len: usize,
    /// Set when the scan ended inside a fence.
    pub unclosed: Option<UnclosedFence>,
}

impl Scan {
    /// Number of fences opened, closed or not.
    pub fn open_count(&self) -> usize {
        self.events
            .iter()
            .filter(|e| matches!(e, RawEvent::FenceOpen { .. }))
            .count()
    }

    pub fn ends_inside_fence(&self) -> bool {
        self.unclosed.is_some()
    }
}
