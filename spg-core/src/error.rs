//! Error taxonomy.
//!
//! Mirrors the `status` enum in the original C sources (`defs.h`) but as
//! a proper [`core::error::Error`] type instead of a sentinel return
//! value mixed with out-parameters.

use thiserror::Error;

/// Crate-wide result alias.
pub type Result<T> = core::result::Result<T, SpgError>;

/// Everything that can go wrong in the ECC engine.
///
/// `Success` has no variant here: a bare `Ok(T)` carries that meaning.
#[derive(Debug, Error)]
pub enum SpgError {
    /// A low-level arithmetic or parsing failure (bad hex, a modular
    /// inverse of a non-invertible value, an unreadable curve table
    /// row). Corresponds to the source's generic `FAIL`.
    #[error("{0}")]
    Fail(String),

    /// A caller passed a parameter that cannot be acted on (empty
    /// message, unknown curve name, mismatched buffer length).
    #[error("bad parameter: {0}")]
    BadParams(String),

    /// Signature verification ran to completion and the signature
    /// does not check out. Distinct from `Fail` so callers can tell
    /// "verification said no" from "verification could not run".
    #[error("signature is not valid")]
    SignatureInvalid,

    /// File or buffer encryption could not complete.
    #[error("encryption failed: {0}")]
    EncryptionFailed(String),

    /// File or buffer decryption could not complete, or its
    /// authentication tag did not match.
    #[error("decryption failed: {0}")]
    DecryptionFailed(String),

    /// A named capability (e.g. the AES symmetric cipher) is not
    /// implemented.
    #[error("not implemented: {0}")]
    NotImplemented(&'static str),
}

impl SpgError {
    /// Curve `name` is not present in the registry.
    pub fn unknown_curve(name: &str) -> Self {
        SpgError::BadParams(format!("curve \"{name}\" is not registered"))
    }
}
