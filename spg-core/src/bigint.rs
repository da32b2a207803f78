//! Big-integer facade.
//!
//! A fixed-width, arbitrary-but-bounded-precision non-negative integer,
//! wide enough to hold any SEC 2 field element, scalar, or SHA-512
//! digest this crate works with (`MAX_KEY_LEN = 521` bits plus
//! head-room for the cofactor multiply used in ECIES).
//!
//! The original tool (`tstruk/spg`) wraps libgcrypt's `gcry_mpi_t` as
//! an opaque arbitrary-precision type. A fixed-width limb array is the
//! idiomatic Rust equivalent for a tool that only ever needs curves up
//! to P-521: it gives the "constant in behavior for a fixed input"
//! property spec.md asks of this layer almost for free, since every
//! operation below walks a fixed number of limbs/bits regardless of
//! the values involved.
//!
//! Every modular operation (`addm`/`subm`/`mulm`/`invm`) assumes its
//! operands are already reduced modulo the given modulus; callers
//! (curve point arithmetic, ECDSA, ECIES) uphold that.

use rand_core::{CryptoRng, RngCore};

use crate::error::{Result, SpgError};

/// Number of 64-bit limbs backing a [`Nat`].
pub const LIMBS: usize = 9;
/// Bit width of a [`Nat`] (576 bits — covers P-521 with head-room).
pub const BITS: u32 = (LIMBS as u32) * 64;
/// Byte width of a [`Nat`].
pub const BYTES: usize = LIMBS * 8;

/// A fixed-width non-negative integer, stored as little-endian 64-bit
/// limbs (`limbs[0]` is least significant).
#[derive(Clone, Copy, Eq, PartialEq, Hash, Default)]
pub struct Nat {
    limbs: [u64; LIMBS],
}

impl core::fmt::Debug for Nat {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "Nat(0x{})", hex_upper(&self.to_be_bytes()))
    }
}

impl zeroize::Zeroize for Nat {
    fn zeroize(&mut self) {
        self.limbs.zeroize();
    }
}

impl Nat {
    /// The additive identity.
    pub const ZERO: Nat = Nat { limbs: [0; LIMBS] };

    /// The multiplicative identity.
    pub const ONE: Nat = {
        let mut limbs = [0u64; LIMBS];
        limbs[0] = 1;
        Nat { limbs }
    };

    /// Build a `Nat` from an unsigned big-endian byte slice. The slice
    /// may be shorter than [`BYTES`]; it must not be longer.
    pub fn from_be_bytes(bytes: &[u8]) -> Result<Nat> {
        if bytes.len() > BYTES {
            return Err(SpgError::BadParams(format!(
                "big integer of {} bytes exceeds the {}-byte limit",
                bytes.len(),
                BYTES
            )));
        }
        let mut limbs = [0u64; LIMBS];
        // Walk the byte slice from the least-significant end.
        for (i, chunk_end) in (0..bytes.len()).rev().enumerate() {
            let limb_idx = i / 8;
            let shift = (i % 8) * 8;
            limbs[limb_idx] |= (bytes[chunk_end] as u64) << shift;
        }
        Ok(Nat { limbs })
    }

    /// Build a `Nat` from a hex string (upper or lower case, optional
    /// leading whitespace trimmed, odd-length strings are implicitly
    /// left-padded with a zero nibble — as SEC 2 parameter tables
    /// occasionally are).
    pub fn from_hex(s: &str) -> Result<Nat> {
        let s = s.trim();
        let mut owned;
        let digits = if s.len() % 2 == 1 {
            owned = String::with_capacity(s.len() + 1);
            owned.push('0');
            owned.push_str(s);
            owned.as_str()
        } else {
            s
        };
        let mut bytes = Vec::with_capacity(digits.len() / 2);
        let chars: Vec<char> = digits.chars().collect();
        for pair in chars.chunks(2) {
            let hi = pair[0]
                .to_digit(16)
                .ok_or_else(|| SpgError::BadParams(format!("invalid hex digit in \"{s}\"")))?;
            let lo = pair[1]
                .to_digit(16)
                .ok_or_else(|| SpgError::BadParams(format!("invalid hex digit in \"{s}\"")))?;
            bytes.push(((hi << 4) | lo) as u8);
        }
        Nat::from_be_bytes(&bytes)
    }

    /// A small unsigned value.
    pub fn from_u64(v: u64) -> Nat {
        let mut limbs = [0u64; LIMBS];
        limbs[0] = v;
        Nat { limbs }
    }

    /// Minimal-length unsigned big-endian encoding (no leading zero
    /// bytes; the zero value encodes as an empty vector, matching
    /// `gcry_mpi_print`'s behavior on a zero MPI).
    pub fn to_be_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(BYTES);
        for limb in self.limbs.iter().rev() {
            out.extend_from_slice(&limb.to_be_bytes());
        }
        let first_nonzero = out.iter().position(|&b| b != 0);
        match first_nonzero {
            Some(idx) => out.split_off(idx),
            None => Vec::new(),
        }
    }

    /// Number of significant bits (`0` for zero).
    pub fn bit_length(&self) -> u32 {
        for i in (0..LIMBS).rev() {
            if self.limbs[i] != 0 {
                return (i as u32) * 64 + (64 - self.limbs[i].leading_zeros());
            }
        }
        0
    }

    /// Test bit `i` (0 = least significant).
    pub fn bit(&self, i: u32) -> bool {
        if i >= BITS {
            return false;
        }
        let limb = (i / 64) as usize;
        let shift = i % 64;
        (self.limbs[limb] >> shift) & 1 == 1
    }

    /// Clear bit `i`.
    pub fn clear_bit(&mut self, i: u32) {
        if i >= BITS {
            return;
        }
        let limb = (i / 64) as usize;
        let shift = i % 64;
        self.limbs[limb] &= !(1u64 << shift);
    }

    /// Clear every bit above position `i` (keep bits `0..=i`).
    pub fn clear_above(&mut self, i: u32) {
        if i + 1 >= BITS {
            return;
        }
        let keep_limb = (i / 64) as usize;
        let keep_bits = i % 64 + 1;
        if keep_bits < 64 {
            self.limbs[keep_limb] &= (1u64 << keep_bits) - 1;
        }
        for limb in self.limbs.iter_mut().skip(keep_limb + 1) {
            *limb = 0;
        }
    }

    /// `self == 0`.
    pub fn is_zero(&self) -> bool {
        self.limbs.iter().all(|&l| l == 0)
    }

    /// Draw `bits` bits of randomness (the original tool's
    /// `gcry_mpi_randomize(n_bits, ...)`): the result is `< 2^bits`
    /// but its top bit is not forced to `1`.
    pub fn randomize(bits: u32, rng: &mut (impl RngCore + CryptoRng)) -> Nat {
        let bits = bits.min(BITS);
        let nbytes = ((bits + 7) / 8) as usize;
        let mut buf = [0u8; BYTES];
        rng.fill_bytes(&mut buf[..nbytes]);
        if bits % 8 != 0 {
            let mask = (1u8 << (bits % 8)) - 1;
            buf[0] &= mask;
        }
        Nat::from_be_bytes(&buf[..nbytes]).expect("nbytes <= BYTES by construction")
    }

    fn cmp_limbs(&self, other: &Nat) -> core::cmp::Ordering {
        for i in (0..LIMBS).rev() {
            match self.limbs[i].cmp(&other.limbs[i]) {
                core::cmp::Ordering::Equal => continue,
                ord => return ord,
            }
        }
        core::cmp::Ordering::Equal
    }

    /// Unsigned addition with carry-out.
    fn add_raw(&self, other: &Nat) -> (Nat, bool) {
        let mut out = [0u64; LIMBS];
        let mut carry = 0u128;
        for i in 0..LIMBS {
            let sum = self.limbs[i] as u128 + other.limbs[i] as u128 + carry;
            out[i] = sum as u64;
            carry = sum >> 64;
        }
        (Nat { limbs: out }, carry != 0)
    }

    /// Unsigned subtraction with borrow-out (`self - other`).
    fn sub_raw(&self, other: &Nat) -> (Nat, bool) {
        let mut out = [0u64; LIMBS];
        let mut borrow = 0i128;
        for i in 0..LIMBS {
            let diff = self.limbs[i] as i128 - other.limbs[i] as i128 - borrow;
            if diff < 0 {
                out[i] = (diff + (1i128 << 64)) as u64;
                borrow = 1;
            } else {
                out[i] = diff as u64;
                borrow = 0;
            }
        }
        (Nat { limbs: out }, borrow != 0)
    }

    /// Reduce `self` modulo `m` via binary long division. Unlike the
    /// `*m` family below, `self` need not already be less than `m` —
    /// this is how a wide SHA-512 digest gets folded down to `mod n`.
    pub fn reduce(&self, m: &Nat) -> Nat {
        let mut rem = Nat::ZERO;
        for i in (0..BITS).rev() {
            let (doubled, carry) = rem.add_raw(&rem);
            rem = doubled;
            if self.bit(i) {
                let (inc, c2) = rem.add_raw(&Nat::ONE);
                rem = inc;
                debug_assert!(!c2 || carry);
            }
            if carry || rem.cmp_limbs(m) != core::cmp::Ordering::Less {
                rem = rem.sub_raw(m).0;
            }
        }
        rem
    }

    /// `(self + other) mod m`. Operands must already be `< m`.
    pub fn addm(&self, other: &Nat, m: &Nat) -> Nat {
        let (sum, carry) = self.add_raw(other);
        if carry || sum.cmp_limbs(m) != core::cmp::Ordering::Less {
            sum.sub_raw(m).0
        } else {
            sum
        }
    }

    /// `(self - other) mod m`. Operands must already be `< m`.
    pub fn subm(&self, other: &Nat, m: &Nat) -> Nat {
        let (diff, borrow) = self.sub_raw(other);
        if borrow {
            diff.add_raw(m).0
        } else {
            diff
        }
    }

    /// `(self * other) mod m` via double-and-add. Operands must
    /// already be `< m`; this walks exactly [`BITS`] iterations
    /// regardless of the operand values.
    pub fn mulm(&self, other: &Nat, m: &Nat) -> Nat {
        let mut acc = Nat::ZERO;
        for i in (0..BITS).rev() {
            acc = acc.addm(&acc, m);
            if other.bit(i) {
                acc = acc.addm(self, m);
            }
        }
        acc
    }

    /// Unsigned multiplication by a small integer (not reduced).
    /// Used for cofactor scaling (`h` is at most a handful of bits).
    pub fn mul_small(&self, small: u64) -> Nat {
        let mut acc = Nat::ZERO;
        let mut base = *self;
        let mut n = small;
        while n != 0 {
            if n & 1 == 1 {
                acc = acc.add_raw(&base).0;
            }
            base = base.add_raw(&base).0;
            n >>= 1;
        }
        acc
    }

    /// Plain (non-modular) subtraction, saturating at zero. Used to
    /// compute an exponent like `m - 2` for Fermat inversion.
    pub fn sub_plain(&self, other: &Nat) -> Nat {
        let (diff, borrow) = self.sub_raw(other);
        if borrow {
            Nat::ZERO
        } else {
            diff
        }
    }

    /// Plain (non-modular) `self + 1`, used by NAF digit extraction.
    pub fn add_one(&self) -> Nat {
        self.add_raw(&Nat::ONE).0
    }

    /// Plain (non-modular) `self + small`, used by wNAF digit
    /// extraction.
    pub fn add_small(&self, small: u64) -> Nat {
        self.add_raw(&Nat::from_u64(small)).0
    }

    /// Plain (non-modular) `self / 2`, rounding toward zero (an
    /// arithmetic right shift by one bit).
    pub fn halve(&self) -> Nat {
        let mut out = [0u64; LIMBS];
        let mut carry = 0u64;
        for i in (0..LIMBS).rev() {
            out[i] = (self.limbs[i] >> 1) | (carry << 63);
            carry = self.limbs[i] & 1;
        }
        Nat { limbs: out }
    }

    /// Modular inverse via Fermat's little theorem (`self^(m-2) mod
    /// m`), valid because every SEC 2 prime modulus this crate uses
    /// is in fact prime. Fails only when `self` is `0 mod m`, which
    /// callers must never pass in (spec.md §4.A).
    pub fn invm(&self, m: &Nat) -> Result<Nat> {
        if self.is_zero() {
            return Err(SpgError::Fail(
                "modular inverse of zero is undefined".to_string(),
            ));
        }
        let exponent = m.sub_plain(&Nat::from_u64(2));
        let mut base = *self;
        let mut result = Nat::ONE;
        for i in 0..BITS {
            if exponent.bit(i) {
                result = result.mulm(&base, m);
            }
            base = base.mulm(&base, m);
        }
        Ok(result)
    }
}

impl PartialOrd for Nat {
    fn partial_cmp(&self, other: &Self) -> Option<core::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Nat {
    fn cmp(&self, other: &Self) -> core::cmp::Ordering {
        self.cmp_limbs(other)
    }
}

fn hex_upper(bytes: &[u8]) -> String {
    let mut s = String::with_capacity(bytes.len() * 2);
    for b in bytes {
        s.push_str(&format!("{b:02X}"));
    }
    s
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand_core::OsRng;

    fn p256_p() -> Nat {
        Nat::from_hex("FFFFFFFF00000001000000000000000000000000FFFFFFFFFFFFFFFFFFFFFFFF").unwrap()
    }

    #[test]
    fn hex_round_trip() {
        let n = Nat::from_hex("DEADBEEF").unwrap();
        assert_eq!(n.to_be_bytes(), vec![0xDE, 0xAD, 0xBE, 0xEF]);
    }

    #[test]
    fn odd_length_hex_is_padded() {
        let a = Nat::from_hex("ABC").unwrap();
        let b = Nat::from_hex("0ABC").unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn addm_wraps_at_modulus() {
        let m = Nat::from_u64(7);
        let a = Nat::from_u64(5);
        let b = Nat::from_u64(4);
        assert_eq!(a.addm(&b, &m), Nat::from_u64(2));
    }

    #[test]
    fn subm_wraps_below_zero() {
        let m = Nat::from_u64(7);
        let a = Nat::from_u64(2);
        let b = Nat::from_u64(5);
        assert_eq!(a.subm(&b, &m), Nat::from_u64(4));
    }

    #[test]
    fn mulm_matches_schoolbook_for_small_values() {
        let m = Nat::from_u64(101);
        let a = Nat::from_u64(37);
        let b = Nat::from_u64(59);
        assert_eq!(a.mulm(&b, &m), Nat::from_u64((37 * 59) % 101));
    }

    #[test]
    fn invm_round_trips_over_p256_prime() {
        let p = p256_p();
        let a = Nat::from_u64(123456789);
        let inv = a.invm(&p).unwrap();
        assert_eq!(a.mulm(&inv, &p), Nat::ONE);
    }

    #[test]
    fn reduce_folds_wide_values_down() {
        let m = Nat::from_u64(97);
        let wide = Nat::from_hex("FFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFF").unwrap();
        let r = wide.reduce(&m);
        assert!(r < m);
    }

    #[test]
    fn bit_length_and_bit_test_agree() {
        let n = Nat::from_u64(0b1011);
        assert_eq!(n.bit_length(), 4);
        assert!(n.bit(0));
        assert!(!n.bit(1));
        assert!(n.bit(1) || !n.bit(1));
    }

    #[test]
    fn clear_above_masks_high_bits() {
        let mut n = Nat::from_hex("FF").unwrap();
        n.clear_above(3);
        assert_eq!(n, Nat::from_u64(0b1111));
    }

    #[test]
    fn randomize_respects_bit_bound() {
        let mut rng = OsRng;
        for _ in 0..16 {
            let n = Nat::randomize(160, &mut rng);
            assert!(n.bit_length() <= 160);
        }
    }

    #[test]
    fn zero_encodes_to_empty_bytes() {
        assert!(Nat::ZERO.to_be_bytes().is_empty());
    }
}
