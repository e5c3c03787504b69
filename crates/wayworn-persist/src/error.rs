/// Errors that can occur while decoding a persisted payload.
///
/// Only whole-payload problems are errors; a single bad record is skipped.
#[derive(Debug, thiserror::Error)]
pub enum PersistError {
    #[error("invalid magic bytes (expected {expected:?}, got {actual:?})")]
    InvalidMagic { expected: [u8; 4], actual: [u8; 4] },

    #[error("unsupported payload format version {0}")]
    UnsupportedVersion(u16),

    #[error("payload kind mismatch: expected {expected}, got {actual}")]
    WrongPayloadKind { expected: u16, actual: u16 },

    #[error("payload too small ({0} bytes, minimum {1})")]
    PayloadTooSmall(usize, usize),

    #[error("truncated payload: expected {expected} bytes, got {actual}")]
    TruncatedPayload { expected: usize, actual: usize },

    #[error("LZ4 decompression failed: {0}")]
    DecompressError(String),

    #[error("declared body size {0} exceeds the limit of {1} bytes")]
    BodyTooLarge(usize, usize),
}
