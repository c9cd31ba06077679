//! Folding the segment sequence through caller-supplied handlers.
//!
//! The processor has no opinion about rendering: code segments go to
//! `on_code_block`, prose goes to `on_text_segment`, and whatever the
//! handlers return is collected in buffer order. Nothing here depends on a
//! UI type, so exporters and analytics can reuse it as-is.

use std::convert::Infallible;

use xi_rope::Rope;

use crate::{
    rope::slice_to_string,
    segments::{Segment, segment_rope},
};

/// The fields a code handler receives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CodeBlockFields<'a> {
    pub language: &'a str,
    pub content: &'a str,
    pub is_complete: bool,
}

/// Per-segment callbacks for [`process_code_blocks`].
pub trait SegmentHandler {
    type Output;

    fn on_code_block(&mut self, block: CodeBlockFields<'_>) -> Self::Output;

    fn on_text_segment(&mut self, text: &str) -> Self::Output;
}

/// Fallible per-segment callbacks for [`try_process_code_blocks`].
pub trait TrySegmentHandler {
    type Output;
    type Error;

    fn on_code_block(&mut self, block: CodeBlockFields<'_>) -> Result<Self::Output, Self::Error>;

    fn on_text_segment(&mut self, text: &str) -> Result<Self::Output, Self::Error>;
}

struct Infallibly<'h, H>(&'h mut H);

impl<H: SegmentHandler> TrySegmentHandler for Infallibly<'_, H> {
    type Output = H::Output;
    type Error = Infallible;

    fn on_code_block(&mut self, block: CodeBlockFields<'_>) -> Result<H::Output, Infallible> {
        Ok(self.0.on_code_block(block))
    }

    fn on_text_segment(&mut self, text: &str) -> Result<H::Output, Infallible> {
        Ok(self.0.on_text_segment(text))
    }
}

/// Adapts a pair of closures into a [`SegmentHandler`].
pub struct FnHandler<C, T> {
    pub on_code: C,
    pub on_text: T,
}

impl<R, C, T> SegmentHandler for FnHandler<C, T>
where
    C: FnMut(CodeBlockFields<'_>) -> R,
    T: FnMut(&str) -> R,
{
    type Output = R;

    fn on_code_block(&mut self, block: CodeBlockFields<'_>) -> R {
        (self.on_code)(block)
    }

    fn on_text_segment(&mut self, text: &str) -> R {
        (self.on_text)(text)
    }
}

/// Walks every segment of the rope, stopping at the first handler error.
pub fn try_process_code_blocks_rope<H: TrySegmentHandler>(
    rope: &Rope,
    handler: &mut H,
) -> Result<Vec<H::Output>, H::Error> {
    let segments = segment_rope(rope);
    let mut out = Vec::with_capacity(segments.len());

    for segment in &segments {
        let value = match segment {
            Segment::Text { span } => {
                let text = slice_to_string(rope, *span);
                handler.on_text_segment(&text)?
            }
            Segment::Code(code) => {
                let content = slice_to_string(rope, code.content);
                handler.on_code_block(CodeBlockFields {
                    language: &code.language,
                    content: &content,
                    is_complete: code.is_complete,
                })?
            }
        };
        out.push(value);
    }

    Ok(out)
}

pub fn process_code_blocks_rope<H: SegmentHandler>(rope: &Rope, handler: &mut H) -> Vec<H::Output> {
    match try_process_code_blocks_rope(rope, &mut Infallibly(handler)) {
        Ok(out) => out,
        Err(never) => match never {},
    }
}

/// Calls the handler once per segment, in buffer order, and collects the results.
pub fn process_code_blocks<H: SegmentHandler>(buffer: &str, handler: &mut H) -> Vec<H::Output> {
    process_code_blocks_rope(&Rope::from(buffer), handler)
}

/// Closure form of [`process_code_blocks`].
///
/// ```
/// use chatfence_engine::process_code_blocks_with;
///
/// let rendered = process_code_blocks_with(
///     "Run:\n```sh\nmake\n```\n",
///     |code| format!("<code lang={}>{}</code>", code.language, code.content),
///     |text| format!("<p>{}</p>", text.trim()),
/// );
/// assert_eq!(rendered, vec!["<p>Run:</p>", "<code lang=sh>make</code>"]);
/// ```
pub fn process_code_blocks_with<R>(
    buffer: &str,
    on_code: impl FnMut(CodeBlockFields<'_>) -> R,
    on_text: impl FnMut(&str) -> R,
) -> Vec<R> {
    process_code_blocks(buffer, &mut FnHandler { on_code, on_text })
}

/// Like [`process_code_blocks`], but handlers may fail. The first error is
/// returned unchanged and no further handler is called.
pub fn try_process_code_blocks<H: TrySegmentHandler>(
    buffer: &str,
    handler: &mut H,
) -> Result<Vec<H::Output>, H::Error> {
    try_process_code_blocks_rope(&Rope::from(buffer), handler)
}
