use xi_rope::Rope;

use crate::{rope::slice_to_string, segments::Segment};

/// Validates segmentation invariants.
///
/// Asserts that:
/// - Segments are non-empty and tile the rope from 0 to its length
/// - Code content spans sit inside their block spans
/// - Concatenating segment text reproduces the rope exactly
///
/// # Panics
/// Panics with a descriptive message if any invariant is violated.
pub fn check(rope: &Rope, segments: &[Segment]) {
    let n = rope.len();
    let mut at = 0usize;
    let mut joined = String::with_capacity(n);

    for s in segments {
        let span = s.span();
        assert!(
            span.start == at,
            "segment does not start where the previous ended: {span:?} (expected start {at})"
        );
        assert!(
            span.start < span.end && span.end <= n,
            "segment span empty or out of bounds: {span:?} (rope len: {n})"
        );
        if let Segment::Code(code) = s {
            assert!(
                code.content.start <= code.content.end
                    && code.content.start >= span.start
                    && code.content.end <= span.end,
                "content span not contained in block span: content {:?}, block {:?}",
                code.content,
                span
            );
        }
        joined.push_str(&slice_to_string(rope, span));
        at = span.end;
    }

    assert_eq!(at, n, "segments stop at {at} but rope len is {n}");
    assert_eq!(joined, rope.to_string(), "segments do not round-trip");
}
