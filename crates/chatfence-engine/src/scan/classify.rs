use crate::rope::{lines::LineRef, span::Span};

use super::fence::{CodeFence, FenceSig};

/// Classification of a single line containing only local facts.
///
/// This is phase 1 of scanning: each line is classified independently
/// without reference to whether a fence is currently open.
#[derive(Debug, Clone)]
pub struct LineClass {
    /// Full byte span of this line, terminator included.
    pub line: Span,
    /// Byte offset where the body ends (terminator excluded).
    pub body_end: usize,
    /// Line text without its terminator.
    pub body: String,
    /// Whether the line ends in `\n`. The last line of a streaming buffer
    /// may not, and can still grow.
    pub terminated: bool,
    /// If the body looks like a fence opener/closer.
    pub fence_sig: Option<FenceSig>,
}

/// Classifies individual lines for the scanning phase.
pub struct FenceLineClassifier;

impl FenceLineClassifier {
    /// Classifies a line into a [`LineClass`] containing local facts.
    pub fn classify(&self, lr: &LineRef) -> LineClass {
        let body_end = lr.body_end();
        let body = &lr.text[..lr.text.len() - lr.terminator_len()];

        LineClass {
            line: lr.span,
            body_end,
            body: body.to_string(),
            terminated: lr.is_terminated(),
            fence_sig: CodeFence::sig(body),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rope::lines_with_spans;
    use xi_rope::Rope;

    fn classify_all(text: &str) -> Vec<LineClass> {
        let rope = Rope::from(text);
        lines_with_spans(&rope)
            .map(|lr| FenceLineClassifier.classify(&lr))
            .collect()
    }

    #[test]
    fn strips_crlf_from_body() {
        let lines = classify_all("```js\r\nx\r\n");
        assert_eq!(lines[0].body, "```js");
        assert_eq!(lines[0].body_end, 5);
        assert_eq!(lines[0].line, Span::new(0, 7));
        assert!(lines[0].fence_sig.is_some());
        assert!(lines[1].fence_sig.is_none());
    }

    #[test]
    fn unterminated_last_line_keeps_full_body() {
        let lines = classify_all("text\n```");
        assert_eq!(lines[1].body, "```");
        assert_eq!(lines[1].body_end, 8);
        assert_eq!(lines[1].fence_sig.map(|s| s.len), Some(3));
        assert!(lines[0].terminated);
        assert!(!lines[1].terminated);
    }

    #[test]
    fn split_crlf_classifies_like_the_full_terminator() {
        let partial = classify_all("```\r");
        let full = classify_all("```\r\n");
        assert_eq!(partial[0].body, full[0].body);
        assert_eq!(partial[0].body_end, full[0].body_end);
        assert!(!partial[0].terminated);
    }
}
