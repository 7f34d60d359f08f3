use thiserror::Error;

/// Error types
#[derive(Debug, Error)]
pub enum Error {
    #[error("avcrypto: unsupported curve: {0}")]
    UnsupportedCurve(String),

    #[error("avcrypto: invalid encoding: {0}")]
    InvalidEncoding(String),

    #[error("avcrypto: arity mismatch: {0}")]
    ArityMismatch(String),

    #[error("avcrypto: encoding capacity exceeded: {0}")]
    EncodingCapacity(String),

    #[error("avcrypto: corrupt selection: {0}")]
    CorruptSelection(String),

    #[error("avcrypto: invalid commitment: {0}")]
    InvalidCommitment(String),

    #[error("avcrypto: invalid proof: {0}")]
    InvalidProof(String),

    #[error("avcrypto: invalid signature")]
    InvalidSignature,

    #[error("avcrypto: invalid election config: {0}")]
    InvalidConfig(String),

    #[error("avcrypto: hash retry limit exhausted for input {0:?}")]
    HashExhausted(String),

    #[error("avcrypto: AES-GCM operation failed")]
    Aead,

    #[error("avcrypto: JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    pub(crate) fn corrupt_selection<S: Into<String>>(reason: S) -> Self {
        Error::CorruptSelection(reason.into())
    }

    pub(crate) fn arity(what: &str, expected: usize, found: usize) -> Self {
        Error::ArityMismatch(format!("{}: expected {}, found {}", what, expected, found))
    }
}
