#[derive(Debug, thiserror::Error)]
pub enum FenceError {
    /// Input that is not text; nothing is scanned.
    #[error("invalid argument: {reason}")]
    InvalidArgument {
        reason: String,
        #[source]
        source: std::str::Utf8Error,
    },
}

impl FenceError {
    pub(crate) fn not_utf8(source: std::str::Utf8Error) -> Self {
        FenceError::InvalidArgument {
            reason: format!(
                "buffer is not valid UTF-8 (valid up to byte {})",
                source.valid_up_to()
            ),
            source,
        }
    }
}
