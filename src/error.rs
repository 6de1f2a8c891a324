use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error, PartialEq, Eq)]
#[non_exhaustive]
pub enum Error {
    #[error("no such encryption algorithm: id {0}")]
    UnknownAlgorithm(u8),
    #[error("algorithm {0} cannot encrypt data")]
    NotAnEncryptingAlgorithm(&'static str),
    #[error("hkdf cannot produce {0} bytes of output")]
    HkdfOutputTooLong(usize),
    #[error("wrapping key must be {0} bytes, got {1}")]
    WrappingKeyLength(usize, usize),
    #[error("wrapped master key must be {0} bytes, got {1}")]
    WrappedKeyLength(usize, usize),
    #[error("plaintext and ciphertext buffers differ in length: {0} vs {1}")]
    BufferLengthMismatch(usize, usize),
    #[error("mac buffer must be {0} bytes, got {1}")]
    MacLength(usize, usize),
    #[error("intent log block too short for its chain header: {0} bytes")]
    TruncatedLogHeader(usize),
    #[error("intent log header claims {0} used bytes in a {1} byte block")]
    MalformedLogHeader(u64, usize),
    #[error("malformed intent log record at offset {0}")]
    MalformedLogRecord(usize),
    #[error("entropy source failure")]
    RngFailure,
    #[error("cipher operation failed")]
    CryptoFailure,
    #[error("failed to verify authentication tag")]
    AuthenticationFailed,
}
