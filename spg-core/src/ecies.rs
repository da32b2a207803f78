//! ECIES key agreement and key derivation.
//!
//! Grounded on `ec_generate_enc_key` / `ec_generate_dec_key` /
//! `ec_sym_key_derive` in `ecc.c`. The sender draws an ephemeral
//! scalar `k`, publishes `R = kG`, and derives symmetric keys from the
//! cofactor-multiplied shared point `Z = h k Q`; the receiver recovers
//! the same `Z` as `h d R` using their private scalar. Both sides feed
//! `R.x || R.y || Z.x` (each minimal big-endian, no padding — exactly
//! what `gcry_mpi_print(GCRYMPI_FMT_USG, ...)` produces) through
//! SHA-512 and split the 64-byte digest into two 32-byte halves: `k1`
//! for the stream cipher, `k2` for the MAC.

use sha2::{Digest, Sha512};
use zeroize::ZeroizeOnDrop;

use crate::bigint::Nat;
use crate::error::{Result, SpgError};
use crate::key::{PrivateKey, PublicKey};
use crate::point::AffinePoint;
use crate::rng::{EntropySource, Strength};
use crate::scalar_mul::ScalarMulMethod;

/// Half of a SHA-512 digest, the width of each derived key.
pub const KEY_HALF_LEN: usize = 32;

/// An ECIES-derived key pair plus the ephemeral public point `R` that
/// must travel with the ciphertext so the receiver can recompute the
/// same shared secret.
#[derive(ZeroizeOnDrop)]
pub struct EncKey {
    #[zeroize(skip)]
    pub r: AffinePoint,
    pub k1: [u8; KEY_HALF_LEN],
    pub k2: [u8; KEY_HALF_LEN],
}

fn derive(r: &AffinePoint, z: &AffinePoint) -> Result<([u8; KEY_HALF_LEN], [u8; KEY_HALF_LEN])> {
    let (rx, ry) = match r {
        AffinePoint::Point { x, y } => (x, y),
        AffinePoint::Infinity => {
            return Err(SpgError::Fail("ephemeral point R is the point at infinity".into()))
        }
    };
    let zx = match z {
        AffinePoint::Point { x, .. } => x,
        AffinePoint::Infinity => {
            return Err(SpgError::Fail("shared point Z is the point at infinity".into()))
        }
    };
    let mut buf = Vec::with_capacity(3 * 72);
    buf.extend_from_slice(&rx.to_be_bytes());
    buf.extend_from_slice(&ry.to_be_bytes());
    buf.extend_from_slice(&zx.to_be_bytes());
    let dgst = Sha512::digest(&buf);
    let mut k1 = [0u8; KEY_HALF_LEN];
    let mut k2 = [0u8; KEY_HALF_LEN];
    k1.copy_from_slice(&dgst[..KEY_HALF_LEN]);
    k2.copy_from_slice(&dgst[KEY_HALF_LEN..]);
    Ok((k1, k2))
}

/// Sender side: generate an ephemeral key pair and derive symmetric
/// keys against the recipient's public key. Retries internally
/// whenever the cofactor-multiplied shared point lands on infinity.
pub fn generate_enc_key(public_key: &PublicKey, method: ScalarMulMethod) -> Result<EncKey> {
    let curve = public_key.curve;
    let n = &curve.n;
    let source = EntropySource::new(Strength::Strong);
    let n_bits = n.bit_length();

    loop {
        let k = {
            let raw = source.with_rng(|rng| Nat::randomize(n_bits, rng));
            raw.reduce(n)
        };
        let r = method.mul(&k, &curve.g, curve)?;
        let hk = k.mul_small(curve.h);
        let z = method.mul(&hk, &public_key.q, curve)?;
        if z.is_infinity() {
            continue;
        }
        let (k1, k2) = derive(&r, &z)?;
        return Ok(EncKey { r, k1, k2 });
    }
}

/// Receiver side: recover the same symmetric keys from the sender's
/// ephemeral point `r` and this party's private scalar.
pub fn generate_dec_key(
    r: &AffinePoint,
    priv_key: &PrivateKey,
    method: ScalarMulMethod,
) -> Result<EncKey> {
    let curve = priv_key.curve;
    let hd = priv_key.d.mul_small(curve.h);
    let z = method.mul(&hd, r, curve)?;
    if z.is_infinity() {
        return Err(SpgError::DecryptionFailed(
            "shared point is the point at infinity".into(),
        ));
    }
    let (k1, k2) = derive(r, &z)?;
    Ok(EncKey {
        r: r.clone(),
        k1,
        k2,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sender_and_receiver_derive_the_same_keys() {
        let key = PrivateKey::generate("secp256r1", ScalarMulMethod::WindowNaf).unwrap();
        let enc = generate_enc_key(key.public_key(), ScalarMulMethod::WindowNaf).unwrap();
        let dec = generate_dec_key(&enc.r, &key, ScalarMulMethod::WindowNaf).unwrap();
        assert_eq!(enc.k1, dec.k1);
        assert_eq!(enc.k2, dec.k2);
    }

    #[test]
    fn different_recipients_derive_different_keys() {
        let a = PrivateKey::generate("secp224r1", ScalarMulMethod::WindowNaf).unwrap();
        let b = PrivateKey::generate("secp224r1", ScalarMulMethod::WindowNaf).unwrap();
        let enc_a = generate_enc_key(a.public_key(), ScalarMulMethod::WindowNaf).unwrap();
        let enc_b = generate_enc_key(b.public_key(), ScalarMulMethod::WindowNaf).unwrap();
        assert_ne!(enc_a.k1, enc_b.k1);
    }

    #[test]
    fn cofactor_one_curve_keys_recover_correctly() {
        let key = PrivateKey::generate("secp192r1", ScalarMulMethod::BinaryNaf).unwrap();
        assert_eq!(key.curve.h, 1);
        let enc = generate_enc_key(key.public_key(), ScalarMulMethod::BinaryNaf).unwrap();
        let dec = generate_dec_key(&enc.r, &key, ScalarMulMethod::WindowNaf).unwrap();
        assert_eq!(enc.k1, dec.k1);
    }
}
