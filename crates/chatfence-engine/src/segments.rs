//! Ordered text/code segments built from a [`Scan`].

use serde::Serialize;
use xi_rope::Rope;

use crate::{
    rope::span::Span,
    scan::{RawEvent, Scan, scan},
};

/// A fenced code block located in the buffer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CodeSegment {
    /// Language tag from the info string; empty when none was declared.
    pub language: String,
    /// Info string text after the language token. Opaque to the engine.
    pub meta: String,
    /// Length of the opening backtick run.
    pub fence_len: usize,
    /// Opener line through closer line (or end of buffer).
    pub span: Span,
    /// The code between the fences, minus one trailing line terminator.
    pub content: Span,
    /// False while the closing fence has not arrived yet.
    pub is_complete: bool,
}

/// A maximal contiguous piece of the buffer: prose or one code block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Segment {
    Text { span: Span },
    Code(CodeSegment),
}

impl Segment {
    /// The bytes of the buffer this segment stands for.
    pub fn span(&self) -> Span {
        match self {
            Segment::Text { span } => *span,
            Segment::Code(code) => code.span,
        }
    }

    pub fn start_offset(&self) -> usize {
        self.span().start
    }

    pub fn end_offset(&self) -> usize {
        self.span().end
    }

    pub fn as_code(&self) -> Option<&CodeSegment> {
        match self {
            Segment::Code(code) => Some(code),
            Segment::Text { .. } => None,
        }
    }

    pub fn is_code(&self) -> bool {
        self.as_code().is_some()
    }
}

/// Folds raw events into segments.
///
/// Every `FenceOpen` yields exactly one code segment; a trailing open fence
/// becomes an incomplete segment running to the end of the buffer.
pub fn from_scan(scan: &Scan) -> Vec<Segment> {
    let mut out = Vec::with_capacity(scan.events.len());
    let mut open: Option<CodeSegment> = None;

    for event in &scan.events {
        match event {
            RawEvent::TextRun(span) => out.push(Segment::Text { span: *span }),
            RawEvent::FenceOpen {
                line,
                fence_len,
                language,
                meta,
                content_start,
            } => {
                open = Some(CodeSegment {
                    language: language.clone(),
                    meta: meta.clone(),
                    fence_len: *fence_len,
                    span: *line,
                    content: Span::new(*content_start, *content_start),
                    is_complete: false,
                });
            }
            RawEvent::FenceClose { line, content_end } => {
                if let Some(mut code) = open.take() {
                    code.span = code.span.cover(*line);
                    code.content.end = *content_end;
                    code.is_complete = true;
                    out.push(Segment::Code(code));
                }
            }
        }
    }

    if let (Some(mut code), Some(unclosed)) = (open, scan.unclosed) {
        code.span.end = scan.len;
        code.content.end = unclosed.content_end;
        out.push(Segment::Code(code));
    }

    out
}

/// Segments a rope.
pub fn segment_rope(rope: &Rope) -> Vec<Segment> {
    from_scan(&scan(rope))
}

/// Segments a buffer into interleaved text and code, in buffer order.
///
/// ```
/// use chatfence_engine::{Segment, segments};
///
/// let segs = segments("intro\n```sh\nls\n```\n");
/// assert_eq!(segs.len(), 2);
/// assert!(matches!(segs[0], Segment::Text { .. }));
/// assert!(segs[1].is_code());
/// ```
pub fn segments(buffer: &str) -> Vec<Segment> {
    segment_rope(&Rope::from(buffer))
}
