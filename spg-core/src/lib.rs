//! Elliptic-curve engine for a small file-privacy tool.
//!
//! A runtime registry of SEC 2 prime-field curves ([`curve`]), affine
//! point algebra ([`point`]), three interchangeable scalar
//! multiplication strategies ([`scalar_mul`]), key generation
//! ([`key`]), ECDSA ([`ecdsa`]) and ECIES key agreement ([`ecies`])
//! built on top of a self-contained fixed-width integer type
//! ([`bigint`]).
//!
//! This crate has no file I/O: reading and writing key material,
//! signatures, and encrypted files lives one layer up.

pub mod bigint;
pub mod curve;
pub mod ecdsa;
pub mod ecies;
pub mod error;
pub mod key;
pub mod point;
pub mod rng;
pub mod scalar_mul;

pub use bigint::Nat;
pub use curve::{by_min_bits, get_curve, list_curves, Curve, DEFAULT_CURVE};
pub use ecdsa::{sign, verify, Signature, MAX_MSG_SIZE};
pub use ecies::{generate_dec_key, generate_enc_key, EncKey};
pub use error::{Result, SpgError};
pub use key::{PrivateKey, PublicKey};
pub use point::{AffinePoint, Coordinates};
pub use scalar_mul::ScalarMulMethod;
