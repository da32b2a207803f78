//! Top-level CLI error type, wrapping the layers below.

use thiserror::Error;

pub type Result<T> = core::result::Result<T, AppError>;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Core(#[from] spg_core::SpgError),

    #[error("{0}")]
    Cipher(#[from] spg_cipher::CipherError),

    #[error("signature is not valid")]
    SignatureInvalid,

    #[error("aborted")]
    Aborted,
}
