use std::fmt;

use serde::Serialize;
use xi_rope::Rope;

use crate::scan::{Scan, scan};

/// Kinds of structural problems the validator can report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
#[non_exhaustive]
pub enum IssueKind {
    /// A fence was opened and the buffer ended before it closed.
    UnclosedCodeBlock,
}

impl IssueKind {
    pub fn as_str(self) -> &'static str {
        match self {
            IssueKind::UnclosedCodeBlock => "unclosed_code_block",
        }
    }
}

impl fmt::Display for IssueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A structural issue. Issues are data, not errors: an open block mid-stream
/// is the normal state of a message that is still arriving.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationIssue {
    #[serde(rename = "type")]
    pub kind: IssueKind,
    /// Byte offset the issue refers to (the dangling opener line).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position: Option<usize>,
}

pub(crate) fn issues_from_scan(scan: &Scan) -> Vec<ValidationIssue> {
    // Fences never nest, so at most the last opener can dangle.
    scan.unclosed
        .iter()
        .map(|u| ValidationIssue {
            kind: IssueKind::UnclosedCodeBlock,
            position: Some(u.opener_start),
        })
        .collect()
}

pub fn validate_code_block_syntax_rope(rope: &Rope) -> Vec<ValidationIssue> {
    issues_from_scan(&scan(rope))
}

/// Reports structural fence issues without changing how the buffer parses.
pub fn validate_code_block_syntax(buffer: &str) -> Vec<ValidationIssue> {
    validate_code_block_syntax_rope(&Rope::from(buffer))
}

pub fn has_incomplete_code_block_rope(rope: &Rope) -> bool {
    scan(rope).ends_inside_fence()
}

/// True while the buffer ends inside an open fence.
///
/// Agrees with [`validate_code_block_syntax`] for every input: it is true
/// exactly when that function returns a non-empty list.
pub fn has_incomplete_code_block(buffer: &str) -> bool {
    has_incomplete_code_block_rope(&Rope::from(buffer))
}
