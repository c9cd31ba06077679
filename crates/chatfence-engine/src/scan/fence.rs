/// Local facts about a line that begins with a run of at least
/// [`CodeFence::MIN_LEN`] backticks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FenceSig {
    /// Length of the maximal leading backtick run.
    pub len: usize,
    /// Byte offset within the line body where the info string starts.
    pub info_start: usize,
    /// True when nothing but whitespace follows the run.
    pub bare: bool,
}

/// The parts of an opener's info string.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct InfoString {
    /// First whitespace-delimited token; empty when none was declared.
    pub language: String,
    /// Whatever follows the language token, trimmed. Kept but never interpreted.
    pub meta: String,
}

/// Backtick fence syntax.
///
/// All fence knowledge lives here: the classifier asks for a [`FenceSig`],
/// the scanner asks whether a signature opens or closes a block.
pub struct CodeFence;

impl CodeFence {
    pub const MARKER: char = '`';
    pub const MIN_LEN: usize = 3;

    /// Computes the fence signature of a line body (terminator already removed).
    ///
    /// Leading whitespace is ignored. The backtick run must be the maximal
    /// leading run, so `` ``x`` `` is a plain line and ```` ```` ```` has length 4.
    pub fn sig(body: &str) -> Option<FenceSig> {
        let trimmed = body.trim_start();
        let indent = body.len() - trimmed.len();
        let len = trimmed
            .bytes()
            .take_while(|&b| b == Self::MARKER as u8)
            .count();
        if len < Self::MIN_LEN {
            return None;
        }
        let info_start = indent + len;
        Some(FenceSig {
            len,
            info_start,
            bare: body[info_start..].trim().is_empty(),
        })
    }

    /// Outside a block, any fence signature opens one.
    pub fn opens(sig: Option<FenceSig>) -> bool {
        sig.is_some()
    }

    /// Inside a block opened with `open_len` backticks, a line closes it when
    /// its run is at least as long and carries no info string.
    pub fn closes(open_len: usize, sig: Option<FenceSig>) -> bool {
        matches!(sig, Some(s) if s.bare && s.len >= open_len)
    }

    /// Whether an unfinished line could still grow into a closer: optional
    /// indentation followed by nothing but backticks.
    pub fn may_close(body: &str) -> bool {
        body.trim_start().bytes().all(|b| b == Self::MARKER as u8)
    }

    /// Splits the info string of an opener line body.
    pub fn info(body: &str, sig: FenceSig) -> InfoString {
        let rest = body[sig.info_start..].trim();
        match rest.split_once(char::is_whitespace) {
            Some((language, meta)) => InfoString {
                language: language.to_string(),
                meta: meta.trim().to_string(),
            },
            None => InfoString {
                language: rest.to_string(),
                meta: String::new(),
            },
        }
    }
}
