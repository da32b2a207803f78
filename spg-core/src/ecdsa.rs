//! ECDSA signing and verification.
//!
//! Grounded on `ec_generate_signature` / `ec_verify_signature` in
//! `ecc.c`: SHA-512 digest reduced mod `n`, nonce `k` drawn with
//! [`Strength::Strong`], retry-on-zero for both `r` and `s`.

use sha2::{Digest, Sha512};

use crate::bigint::Nat;
use crate::error::{Result, SpgError};
use crate::key::{PrivateKey, PublicKey};
use crate::point;
use crate::rng::{EntropySource, Strength};
use crate::scalar_mul::ScalarMulMethod;

/// Largest message accepted by [`sign`]/[`verify`], 256 KiB.
pub const MAX_MSG_SIZE: usize = 256 * 1024;

/// An `(r, s)` signature pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Signature {
    pub r: Nat,
    pub s: Nat,
}

fn digest_mod_n(data: &[u8], n: &Nat) -> Nat {
    let dgst = Sha512::digest(data);
    Nat::from_be_bytes(&dgst).expect("a 64-byte digest always fits in a Nat").reduce(n)
}

fn check_message_size(data: &[u8]) -> Result<()> {
    if data.len() > MAX_MSG_SIZE {
        return Err(SpgError::BadParams(format!(
            "message of {} bytes exceeds the {MAX_MSG_SIZE}-byte limit for signing",
            data.len()
        )));
    }
    Ok(())
}

/// Sign `data` with `priv_key`, retrying internally whenever a drawn
/// nonce produces `r == 0` or `s == 0` (both vanishingly unlikely but
/// checked, matching the source's `do { ... } while (!ok)` loops).
pub fn sign(priv_key: &PrivateKey, data: &[u8], method: ScalarMulMethod) -> Result<Signature> {
    if data.is_empty() {
        return Err(SpgError::BadParams("cannot sign empty data".into()));
    }
    check_message_size(data)?;
    let curve = priv_key.curve;
    let n = &curve.n;
    let e = digest_mod_n(data, n);
    let source = EntropySource::new(Strength::Strong);
    let n_bits = n.bit_length();

    loop {
        let k = {
            let raw = source.with_rng(|rng| Nat::randomize(n_bits, rng));
            raw.reduce(n)
        };
        if k.is_zero() {
            continue;
        }
        let k_g = match method.mul(&k, &curve.g, curve) {
            Ok(v) => v,
            Err(_) => continue,
        };
        let r = match k_g.x() {
            Some(x) => x.reduce(n),
            None => continue,
        };
        if r.is_zero() {
            continue;
        }
        let k_inv = match k.invm(n) {
            Ok(v) => v,
            Err(_) => continue,
        };
        let s = priv_key.d.mulm(&r, n).addm(&e, n).mulm(&k_inv, n);
        if s.is_zero() {
            continue;
        }
        return Ok(Signature { r, s });
    }
}

/// Verify `sign` over `data` under `pub_key`.
///
/// Both `r` and `s` must be strictly less than `n`. The source this
/// was ported from only rejects `r > n`, letting `r == n` slip
/// through while `s == n` is correctly rejected; that asymmetry is a
/// bug in the original rather than a deliberate design choice, so
/// both checks are normalized here to `>= n`.
pub fn verify(
    pub_key: &PublicKey,
    sign: &Signature,
    data: &[u8],
    method: ScalarMulMethod,
) -> Result<()> {
    if data.is_empty() {
        return Err(SpgError::BadParams("cannot verify empty data".into()));
    }
    check_message_size(data)?;
    let curve = pub_key.curve;
    let n = &curve.n;

    if sign.r >= *n {
        return Err(SpgError::SignatureInvalid);
    }
    if sign.s >= *n {
        return Err(SpgError::SignatureInvalid);
    }

    let e = digest_mod_n(data, n);
    let w = sign.s.invm(n)?;
    let u1 = e.mulm(&w, n);
    let u2 = sign.r.mulm(&w, n);

    let u1_g = method.mul(&u1, &curve.g, curve)?;
    let u2_qa = method.mul(&u2, &pub_key.q, curve)?;
    let sum = point::add(&u1_g, &u2_qa, curve);

    match sum.x() {
        Some(x) if x.reduce(n) == sign.r => Ok(()),
        _ => Err(SpgError::SignatureInvalid),
    }
}
