//! EC key lifecycle: generation, and the private/public key types
//! signing, verification, and ECIES build on.
//!
//! Grounded on `ec_generate_key` in `ecc.c`. The private scalar is
//! drawn with [`Strength::VeryStrong`] (the only call site in the
//! source wrapped with the entropy-gathering progress indicator) and
//! reduced mod `n`; the public point is `d * G`.

use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::bigint::Nat;
use crate::curve::{get_curve, Curve};
use crate::error::Result;
use crate::point::AffinePoint;
use crate::rng::{EntropySource, Strength};
use crate::scalar_mul::ScalarMulMethod;

/// A public key: a curve and a point on it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublicKey {
    pub curve: &'static Curve,
    pub q: AffinePoint,
}

/// A private key: the scalar `d` plus the public key it derives.
/// Zeroizes `d` on drop; the public point is not secret.
#[derive(ZeroizeOnDrop)]
pub struct PrivateKey {
    #[zeroize(skip)]
    pub curve: &'static Curve,
    pub d: Nat,
    #[zeroize(skip)]
    pub public: PublicKey,
}

impl PrivateKey {
    /// Generate a fresh key pair on the named curve, using
    /// `Strength::VeryStrong` randomness as the source does.
    pub fn generate(curve_name: &str, method: ScalarMulMethod) -> Result<PrivateKey> {
        let curve = get_curve(curve_name)?;
        let source = EntropySource::new(Strength::VeryStrong);
        let n_bits = curve.n.bit_length();
        let raw = source.with_rng(|rng| Nat::randomize(n_bits, rng));
        let d = raw.reduce(&curve.n);
        let q = method.mul(&d, &curve.g, curve)?;
        Ok(PrivateKey {
            curve,
            d,
            public: PublicKey { curve, q },
        })
    }

    pub fn public_key(&self) -> &PublicKey {
        &self.public
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generated_public_point_is_on_curve() {
        let key = PrivateKey::generate("secp192r1", ScalarMulMethod::WindowNaf).unwrap();
        assert!(crate::point::is_on_curve(&key.public.q, key.curve));
    }

    #[test]
    fn generated_scalar_is_reduced_mod_n() {
        let key = PrivateKey::generate("secp224r1", ScalarMulMethod::LeftToRight).unwrap();
        assert!(key.d < key.curve.n);
    }

    #[test]
    fn unknown_curve_name_fails_generation() {
        assert!(PrivateKey::generate("not-a-curve", ScalarMulMethod::WindowNaf).is_err());
    }
}
