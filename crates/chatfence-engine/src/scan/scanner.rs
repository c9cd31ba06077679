use log::trace;

use crate::rope::span::Span;

use super::{
    classify::LineClass,
    event::{RawEvent, Scan, UnclosedFence},
    fence::CodeFence,
};

#[derive(Debug, Clone, Copy)]
enum ScanState {
    Outside {
        text: Option<Span>,
    },
    InsideFence {
        fence_len: usize,
        opener: Span,
        content_end: usize,
    },
}

/// Line-driven fence state machine.
///
/// Feed it classified lines in order with [`FenceScanner::push`], then call
/// [`FenceScanner::finish`]. A fence cannot open while another is open, so
/// the only block that can dangle at end of input is the last one.
pub struct FenceScanner {
    state: ScanState,
    len: usize,
    out: Vec<RawEvent>,
}

impl FenceScanner {
    pub fn new() -> Self {
        Self {
            state: ScanState::Outside { text: None },
            len: 0,
            out: vec![],
        }
    }

    pub fn push(&mut self, c: &LineClass) {
        self.len = c.line.end;

        match self.state {
            ScanState::InsideFence {
                fence_len, opener, ..
            } => self.consume_fence_line(c, fence_len, opener),
            ScanState::Outside { text } => {
                if CodeFence::opens(c.fence_sig) {
                    self.flush_text();
                    self.open_fence(c);
                } else {
                    let text = text.map_or(c.line, |t| t.cover(c.line));
                    self.state = ScanState::Outside { text: Some(text) };
                }
            }
        }
    }

    pub fn finish(mut self) -> Scan {
        // EOF flush
        self.flush_text();
        let unclosed = match self.state {
            ScanState::InsideFence {
                opener,
                content_end,
                ..
            } => Some(UnclosedFence {
                opener_start: opener.start,
                content_end,
            }),
            ScanState::Outside { .. } => None,
        };
        Scan {
            events: self.out,
            len: self.len,
            unclosed,
        }
    }

    fn open_fence(&mut self, c: &LineClass) {
        let Some(sig) = c.fence_sig else { return };
        let info = CodeFence::info(&c.body, sig);
        trace!(
            "fence open at {} (len {}, language {:?})",
            c.line.start, sig.len, info.language
        );

        self.out.push(RawEvent::FenceOpen {
            line: c.line,
            fence_len: sig.len,
            language: info.language,
            meta: info.meta,
            content_start: c.line.end,
        });
        self.state = ScanState::InsideFence {
            fence_len: sig.len,
            opener: c.line,
            content_end: c.line.end,
        };
    }

    fn consume_fence_line(&mut self, c: &LineClass, fence_len: usize, opener: Span) {
        if CodeFence::closes(fence_len, c.fence_sig) {
            let content_end = match self.state {
                ScanState::InsideFence { content_end, .. } => content_end,
                ScanState::Outside { .. } => opener.end,
            };
            trace!("fence close at {} (opened at {})", c.line.start, opener.start);
            self.out.push(RawEvent::FenceClose {
                line: c.line,
                content_end,
            });
            self.state = ScanState::Outside { text: None };
            return;
        }

        // A trailing line that may still become the closer stays out of the
        // content until it settles, so content never shrinks when it closes.
        if !c.terminated && CodeFence::may_close(&c.body) {
            trace!("holding back unfinished line at {}", c.line.start);
            return;
        }

        // Literal content. Only the terminator of the latest line is excluded,
        // so interior newlines stay part of the content.
        self.state = ScanState::InsideFence {
            fence_len,
            opener,
            content_end: c.body_end,
        };
    }

    fn flush_text(&mut self) {
        if let ScanState::Outside { text: Some(span) } = self.state {
            self.out.push(RawEvent::TextRun(span));
            self.state = ScanState::Outside { text: None };
        }
    }
}

impl Default for FenceScanner {
    fn default() -> Self {
        Self::new()
    }
}
