//! # Fence Scanning
//!
//! Two-phase, line-oriented scan of a message buffer.
//!
//! ## Phases
//!
//! 1. **Line Classification** (`classify`): each line becomes a `LineClass`
//!    holding local facts only (span, body, fence signature)
//! 2. **Fence State Machine** (`scanner`): a `FenceScanner` tracks whether a
//!    fence is open and emits `RawEvent`s as text runs, fences open and close
//!
//! ## Key Invariants
//!
//! - Fences never nest: inside a block every line is content unless it closes
//! - A closer needs a bare run at least as long as the opener's run
//! - Text runs and fence lines tile the buffer; nothing is skipped
//! - Boundaries are only decided at line terminators, so appending text can
//!   only change the part of the result that covers the last line

pub mod classify;
pub mod event;
pub mod fence;
pub mod scanner;

use log::debug;
use xi_rope::Rope;

pub use classify::{FenceLineClassifier, LineClass};
pub use event::{RawEvent, Scan, UnclosedFence};
pub use fence::{CodeFence, FenceSig, InfoString};
pub use scanner::FenceScanner;

use crate::rope::lines_with_spans;

/// Scans the whole rope. Pure: the same rope always yields the same scan.
pub fn scan(rope: &Rope) -> Scan {
    let classifier = FenceLineClassifier;
    let mut scanner = FenceScanner::new();

    for lr in lines_with_spans(rope) {
        let lc = classifier.classify(&lr);
        scanner.push(&lc);
    }

    let scan = scanner.finish();
    debug!(
        "scanned {} bytes: {} events, {} fences, unclosed: {}",
        scan.len,
        scan.events.len(),
        scan.open_count(),
        scan.ends_inside_fence()
    );
    scan
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rope::Span;
    use pretty_assertions::assert_eq;

    fn scan_str(text: &str) -> Scan {
        scan(&Rope::from(text))
    }

    #[test]
    fn empty_buffer_has_no_events() {
        let s = scan_str("");
        assert!(s.events.is_empty());
        assert_eq!(s.len, 0);
        assert!(s.unclosed.is_none());
    }

    #[test]
    fn complete_block_events() {
        let s = scan_str("hi\n```js\nx\n```\nbye");
        assert_eq!(
            s.events,
            vec![
                RawEvent::TextRun(Span::new(0, 3)),
                RawEvent::FenceOpen {
                    line: Span::new(3, 9),
                    fence_len: 3,
                    language: "js".into(),
                    meta: String::new(),
                    content_start: 9,
                },
                RawEvent::FenceClose {
                    line: Span::new(11, 15),
                    content_end: 10,
                },
                RawEvent::TextRun(Span::new(15, 18)),
            ]
        );
        assert!(s.unclosed.is_none());
    }

    #[test]
    fn dangling_fence_is_reported() {
        let s = scan_str("```py\nprint(1)\n");
        assert_eq!(s.open_count(), 1);
        assert_eq!(
            s.unclosed,
            Some(UnclosedFence {
                opener_start: 0,
                content_end: 14,
            })
        );
    }

    #[test]
    fn longer_opener_wraps_shorter_runs() {
        let s = scan_str("````md\n```js\ninner\n```\n````\n");
        assert_eq!(s.open_count(), 1);
        assert!(s.unclosed.is_none());
        assert!(matches!(
            s.events.last(),
            Some(RawEvent::FenceClose { line, .. }) if *line == Span::new(23, 28)
        ));
    }

    #[test]
    fn fence_with_info_does_not_close() {
        let s = scan_str("```\na\n```rust\nb\n");
        assert_eq!(s.open_count(), 1);
        assert!(s.ends_inside_fence());
    }

    #[test]
    fn unfinished_closer_is_not_content() {
        let s = scan_str("```\na\n``");
        assert_eq!(
            s.unclosed,
            Some(UnclosedFence {
                opener_start: 0,
                content_end: 5,
            })
        );
        assert_eq!(s.len, 8);
    }

    #[test]
    fn indented_fences_are_recognized() {
        let s = scan_str("  ```sh\n  ls\n  ```\n");
        assert_eq!(s.open_count(), 1);
        assert!(!s.ends_inside_fence());
    }
}
