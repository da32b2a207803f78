//! Error taxonomy for the cipher/envelope/pipeline layer.

use thiserror::Error;

pub type Result<T> = core::result::Result<T, CipherError>;

#[derive(Debug, Error)]
pub enum CipherError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Core(#[from] spg_core::SpgError),

    #[error("not implemented: {0}")]
    NotImplemented(&'static str),

    #[error("malformed envelope: {0}")]
    Envelope(String),

    #[error("encryption failed: {0}")]
    EncryptionFailed(String),

    #[error("decryption failed: {0}")]
    DecryptionFailed(String),

    #[error("authentication tag does not match; the file is corrupted or was tampered with")]
    TagMismatch,
}
