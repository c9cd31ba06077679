use serde::Serialize;

use crate::{segments::Segment, validate::ValidationIssue};

#[derive(Serialize)]
pub struct Snap {
    pub segments: Vec<SegmentSnap>,
    pub issues: Vec<String>,
}

/// One segment, flattened so text and code share a shape.
#[derive(Serialize)]
pub struct SegmentSnap {
    pub kind: String,
    pub span: (usize, usize),
    /// `None` for text and for code without a language tag.
    pub language: Option<String>,
    pub content: Option<(usize, usize)>,
    pub complete: Option<bool>,
}

pub fn normalize(segments: &[Segment], issues: &[ValidationIssue]) -> Snap {
    let segments = segments
        .iter()
        .map(|s| match s {
            Segment::Text { span } => SegmentSnap {
                kind: "Text".to_string(),
                span: (span.start, span.end),
                language: None,
                content: None,
                complete: None,
            },
            Segment::Code(code) => SegmentSnap {
                kind: "Code".to_string(),
                span: (code.span.start, code.span.end),
                language: (!code.language.is_empty()).then(|| code.language.clone()),
                content: Some((code.content.start, code.content.end)),
                complete: Some(code.is_complete),
            },
        })
        .collect();

    let issues = issues
        .iter()
        .map(|i| match i.position {
            Some(pos) => format!("{}@{pos}", i.kind),
            None => i.kind.to_string(),
        })
        .collect();

    Snap { segments, issues }
}
