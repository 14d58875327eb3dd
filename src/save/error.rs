use thiserror::Error;

/// Errors surfaced by the save codec and the save store.
///
/// Decoding never returns partial output: any layer that fails to parse
/// maps to a distinct variant here.
#[derive(Error, Debug)]
pub enum SaveError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("missing or unexpected header marker")]
    BadHeader,

    #[error("missing or unexpected inner format tag")]
    BadInnerTag,

    #[error("invalid base64 payload: {0}")]
    Base64(#[from] base64::DecodeError),

    #[error("ciphertext length {len} is not a whole number of cipher blocks")]
    BlockAlignment { len: usize },

    #[error("declared padding exceeds payload length")]
    BadPadding,

    #[error("payload shorter than its length prefix")]
    Truncated,

    #[error("decompression failed: {0}")]
    Decompression(#[source] std::io::Error),

    #[error("save text has an odd number of bytes")]
    OddTextLength,

    #[error("save text is not valid UTF-16: {0}")]
    Utf16(#[from] std::string::FromUtf16Error),

    #[error("save document is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid perk level: {level}")]
    InvalidPerkLevel { level: u32 },
}
