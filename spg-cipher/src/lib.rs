//! File-crypto pipeline, symmetric cipher dispatch, and PEM-style
//! envelope codec layered on top of [`spg_core`].

pub mod cipher;
pub mod envelope;
pub mod error;
pub mod pipeline;

pub use cipher::{SymCipherKind, CIPHER_NAMES};
pub use error::{CipherError, Result};
pub use pipeline::{decrypt_file, encrypt_file, ENCRYPTED_SUFFIX};
