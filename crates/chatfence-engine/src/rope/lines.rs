use xi_rope::Rope;

use super::span::Span;

/// A single physical line of the buffer with its byte span.
#[derive(Debug, Clone)]
pub struct LineRef {
    /// Byte span of this line (includes the terminator if present).
    pub span: Span,
    /// The line text, terminator included.
    pub text: String,
}

impl LineRef {
    /// Byte length of the trailing line terminator: 2 for `\r\n`, 1 for `\n`.
    ///
    /// On the unterminated last line a trailing `\r` counts as a pending
    /// terminator (1), since the `\n` completing it may arrive in the next
    /// chunk. Anything else unterminated has length 0.
    pub fn terminator_len(&self) -> usize {
        if self.is_terminated() {
            if self.text.ends_with("\r\n") { 2 } else { 1 }
        } else if self.text.ends_with('\r') {
            1
        } else {
            0
        }
    }

    /// Whether the line ends in `\n`. Only terminated lines are settled; the
    /// last line of a streaming buffer may still grow.
    pub fn is_terminated(&self) -> bool {
        self.text.ends_with('\n')
    }

    /// Byte offset where the line body ends (terminator excluded).
    pub fn body_end(&self) -> usize {
        self.span.end - self.terminator_len()
    }
}

/// Returns an iterator over lines with their byte spans.
///
/// Uses `lines_raw` so newline characters stay attached to their line; the
/// spans of all yielded lines tile the rope with no gaps.
pub fn lines_with_spans(rope: &Rope) -> impl Iterator<Item = LineRef> + '_ {
    let mut offset = 0usize;
    rope.lines_raw(..).map(move |line| {
        let start = offset;
        offset += line.len();
        LineRef {
            span: Span { start, end: offset },
            text: line.into_owned(),
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lines_tile_the_rope() {
        let rope = Rope::from("one\ntwo\r\nthree");
        let lines: Vec<_> = lines_with_spans(&rope).collect();

        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0].span, Span::new(0, 4));
        assert_eq!(lines[1].span, Span::new(4, 9));
        assert_eq!(lines[2].span, Span::new(9, 14));
    }

    #[test]
    fn terminator_lengths() {
        let rope = Rope::from("a\nb\r\nc");
        let lines: Vec<_> = lines_with_spans(&rope).collect();

        assert_eq!(lines[0].terminator_len(), 1);
        assert_eq!(lines[1].terminator_len(), 2);
        assert_eq!(lines[2].terminator_len(), 0);
        assert!(!lines[2].is_terminated());
        assert_eq!(lines[1].body_end(), 3);
    }

    #[test]
    fn trailing_cr_is_a_pending_terminator() {
        let rope = Rope::from("a\r");
        let line = lines_with_spans(&rope).next().unwrap();

        assert!(!line.is_terminated());
        assert_eq!(line.terminator_len(), 1);
        assert_eq!(line.body_end(), 1);

        let rope = Rope::from("a\rb");
        let line = lines_with_spans(&rope).next().unwrap();
        assert_eq!(line.terminator_len(), 0);
    }

    #[test]
    fn empty_rope_has_no_lines() {
        let rope = Rope::from("");
        assert_eq!(lines_with_spans(&rope).count(), 0);
    }
}
