//! SEC 2 curve registry.
//!
//! Domain parameters for the eleven prime-field curves from *SEC 2:
//! Recommended Elliptic Curve Domain Parameters*, transcribed from the
//! same table the original tool shipped. Unlike the C version, which
//! parses these hex strings into freshly allocated `gcry_mpi_t`s on
//! every `get_curve()` call, parameters are parsed once into `Nat`s
//! behind a `OnceLock` and handed out as `&'static` references.

use std::sync::OnceLock;

use crate::bigint::Nat;
use crate::error::{Result, SpgError};
use crate::point::AffinePoint;

/// Domain parameters for a single SEC 2 prime-field curve:
/// `y^2 = x^3 + a x + b (mod p)`, base point `g` of order `n`,
/// cofactor `h`.
#[derive(Debug, Clone)]
pub struct Curve {
    pub name: &'static str,
    pub p: Nat,
    pub a: Nat,
    pub b: Nat,
    pub g: AffinePoint,
    pub n: Nat,
    pub h: u64,
}

impl Curve {
    /// Bit length of the field modulus, the conventional "curve size"
    /// (e.g. 256 for secp256r1).
    pub fn bits(&self) -> u32 {
        self.p.bit_length()
    }
}

struct RawCurve {
    name: &'static str,
    p: &'static str,
    a: &'static str,
    b: &'static str,
    gx: &'static str,
    gy: &'static str,
    n: &'static str,
    h: u64,
}

const RAW_CURVES: &[RawCurve] = &[
    RawCurve {
        name: "secp112r1",
        p: "DB7C2ABF62E35E668076BEAD208B",
        a: "DB7C2ABF62E35E668076BEAD2088",
        b: "659EF8BA043916EEDE8911702B22",
        gx: "09487239995A5EE76B55F9C2F098",
        gy: "A89CE5AF8724C0A23E0E0FF77500",
        n: "DB7C2ABF62E35E7628DFAC6561C5",
        h: 1,
    },
    RawCurve {
        name: "secp112r2",
        p: "DB7C2ABF62E35E668076BEAD208B",
        a: "6127C24C05F38A0AAAF65C0EF02C",
        b: "51DEF1815DB5ED74FCC34C85D709",
        gx: "4BA30AB5E892B4E1649DD0928643",
        gy: "ADCD46F5882E3747DEF36E956E97",
        n: "36DF0AAFD8B8D7597CA10520D04B",
        h: 4,
    },
    RawCurve {
        name: "secp128r1",
        p: "FFFFFFFDFFFFFFFFFFFFFFFFFFFFFFFF",
        a: "FFFFFFFDFFFFFFFFFFFFFFFFFFFFFFFC",
        b: "E87579C11079F43DD824993C2CEE5ED3",
        gx: "161FF7528B899B2D0C28607CA52C5B86",
        gy: "CF5AC8395BAFEB13C02DA292DDED7A83",
        n: "FFFFFFFE0000000075A30D1B9038A115",
        h: 1,
    },
    RawCurve {
        name: "secp128r2",
        p: "FFFFFFFDFFFFFFFFFFFFFFFFFFFFFFFF",
        a: "D6031998D1B3BBFEBF59CC9BBFF9AEE1",
        b: "5EEEFCA380D02919DC2C6558BB6D8A5D",
        gx: "7B6AA5D85E572983E6FB32A7CDEBC140",
        gy: "27B6916A894D3AEE7106FE805FC34B44",
        n: "3FFFFFFF7FFFFFFFBE0024720613B5A3",
        h: 4,
    },
    RawCurve {
        name: "secp160r1",
        p: "FFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFF7FFFFFFF",
        a: "FFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFF7FFFFFFC",
        b: "1C97BEFC54BD7A8B65ACF89F81D4D4ADC565FA45",
        gx: "4A96B5688EF573284664698968C38BB913CBFC82",
        gy: "23A628553168947D59DCC912042351377AC5FB32",
        n: "0100000000000000000001F4C8F927AED3CA752257",
        h: 1,
    },
    RawCurve {
        name: "secp160r2",
        p: "FFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFEFFFFAC73",
        a: "FFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFEFFFFAC70",
        b: "B4E134D3FB59EB8BAB57274904664D5AF50388BA",
        gx: "52DCB034293A117E1F4FF11B30F7199D3144CE6D",
        gy: "FEAFFEF2E331F296E071FA0DF9982CFEA7D43F2E",
        n: "0100000000000000000000351EE786A818F3A1A16B",
        h: 1,
    },
    RawCurve {
        name: "secp192r1",
        p: "FFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFEFFFFFFFFFFFFFFFF",
        a: "FFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFEFFFFFFFFFFFFFFFC",
        b: "64210519E59C80E70FA7E9AB72243049FEB8DEECC146B9B1",
        gx: "188DA80EB03090F67CBF20EB43A18800F4FF0AFD82FF1012",
        gy: "07192B95FFC8DA78631011ED6B24CDD573F977A11E794811",
        n: "FFFFFFFFFFFFFFFFFFFFFFFF99DEF836146BC9B1B4D22831",
        h: 1,
    },
    RawCurve {
        name: "secp224r1",
        p: "FFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFF000000000000000000000001",
        a: "FFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFEFFFFFFFFFFFFFFFFFFFFFFFE",
        b: "B4050A850C04B3ABF54132565044B0B7D7BFD8BA270B39432355FFB4",
        gx: "B70E0CBD6BB4BF7F321390B94A03C1D356C21122343280D6115C1D21",
        gy: "BD376388B5F723FB4C22DFE6CD4375A05A07476444D5819985007E34",
        n: "FFFFFFFFFFFFFFFFFFFFFFFFFFFF16A2E0B8F03E13DD29455C5C2A3D",
        h: 1,
    },
    RawCurve {
        name: "secp256r1",
        p: "FFFFFFFF00000001000000000000000000000000FFFFFFFFFFFFFFFFFFFFFFFF",
        a: "FFFFFFFF00000001000000000000000000000000FFFFFFFFFFFFFFFFFFFFFFFC",
        b: "5AC635D8AA3A93E7B3EBBD55769886BC651D06B0CC53B0F63BCE3C3E27D2604B",
        gx: "6B17D1F2E12C4247F8BCE6E563A440F277037D812DEB33A0F4A13945D898C296",
        gy: "4FE342E2FE1A7F9B8EE7EB4A7C0F9E162BCE33576B315ECECBB6406837BF51F5",
        n: "FFFFFFFF00000000FFFFFFFFFFFFFFFFBCE6FAADA7179E84F3B9CAC2FC632551",
        h: 1,
    },
    RawCurve {
        name: "secp384r1",
        p: "FFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFEFFFFFFFF0000000000000000FFFFFFFF",
        a: "FFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFEFFFFFFFF0000000000000000FFFFFFFC",
        b: "B3312FA7E23EE7E4988E056BE3F82D19181D9C6EFE8141120314088F5013875AC656398D8A2ED19D2A85C8EDD3EC2AEF",
        gx: "AA87CA22BE8B05378EB1C71EF320AD746E1D3B628BA79B9859F741E082542A385502F25DBF55296C3A545E3872760AB7",
        gy: "3617DE4A96262C6F5D9E98BF9292DC29F8F41DBD289A147CE9DA3113B5F0B8C00A60B1CE1D7E819D7A431D7C90EA0E5F",
        n: "FFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFC7634D81F4372DDF581A0DB248B0A77AECEC196ACCC52973",
        h: 1,
    },
    RawCurve {
        name: "secp521r1",
        p: "01FFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFF",
        a: "01FFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFC",
        b: "0051953EB9618E1C9A1F929A21A0B68540EEA2DA725B99B315F3B8B489918EF109E156193951EC7E937B1652C0BD3BB1BF073573DF883D2C34F1EF451FD46B503F00",
        gx: "00C6858E06B70404E9CD9E3ECB662395B4429C648139053FB521F828AF606B4D3DBAA14B5E77EFE75928FE1DC127A2FFA8DE3348B3C1856A429BF97E7E31C2E5BD66",
        gy: "011839296A789A3BC0045C8A5FB42C7D1BD998F54449579B446817AFBD17273E662C97EE72995EF42640C550B9013FAD0761353C7086A272C24088BE94769FD16650",
        n: "01FFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFA51868783BF2F966B7FCC0148F709A5D03BB5C9B8899C47AEBB6FB71E91386409",
        h: 1,
    },
];

fn build_curve(raw: &RawCurve) -> Curve {
    Curve {
        name: raw.name,
        p: Nat::from_hex(raw.p).expect("built-in curve table entry is valid hex"),
        a: Nat::from_hex(raw.a).expect("built-in curve table entry is valid hex"),
        b: Nat::from_hex(raw.b).expect("built-in curve table entry is valid hex"),
        g: AffinePoint::new(
            Nat::from_hex(raw.gx).expect("built-in curve table entry is valid hex"),
            Nat::from_hex(raw.gy).expect("built-in curve table entry is valid hex"),
        ),
        n: Nat::from_hex(raw.n).expect("built-in curve table entry is valid hex"),
        h: raw.h,
    }
}

fn registry() -> &'static Vec<Curve> {
    static REGISTRY: OnceLock<Vec<Curve>> = OnceLock::new();
    REGISTRY.get_or_init(|| RAW_CURVES.iter().map(build_curve).collect())
}

/// Look a curve up by name (e.g. `"secp256r1"`). Matches the
/// original's `strncmp` prefix semantics: a name that is a prefix of
/// a longer registered name (there are none in this table) would
/// still match the first one found, but exact names are expected in
/// practice and always match.
pub fn get_curve(name: &str) -> Result<&'static Curve> {
    registry()
        .iter()
        .find(|c| name.starts_with(c.name) || c.name == name)
        .ok_or_else(|| SpgError::unknown_curve(name))
}

/// List the names of every registered curve, in table order.
pub fn list_curves() -> Vec<&'static str> {
    registry().iter().map(|c| c.name).collect()
}

/// Smallest registered curve whose field modulus is at least `len`
/// bits wide, e.g. `by_min_bits(200)` returns `secp224r1`. Errors if
/// no registered curve is that wide.
pub fn by_min_bits(len: u32) -> Result<&'static Curve> {
    registry()
        .iter()
        .filter(|c| c.bits() >= len)
        .min_by_key(|c| c.bits())
        .ok_or_else(|| SpgError::BadParams(format!("no registered curve has at least {len} bits")))
}

/// The curve used when the caller does not name one explicitly.
pub const DEFAULT_CURVE: &str = "secp160r2";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_curve_is_registered() {
        assert!(get_curve(DEFAULT_CURVE).is_ok());
    }

    #[test]
    fn all_eleven_curves_are_registered() {
        assert_eq!(list_curves().len(), 11);
    }

    #[test]
    fn unknown_curve_is_an_error() {
        assert!(get_curve("secp999z1").is_err());
    }

    #[test]
    fn secp256r1_bit_length_is_256() {
        let c = get_curve("secp256r1").unwrap();
        assert_eq!(c.bits(), 256);
    }

    #[test]
    fn by_min_bits_returns_the_smallest_curve_that_fits() {
        let c = by_min_bits(200).unwrap();
        assert_eq!(c.name, "secp224r1");
        let exact = by_min_bits(256).unwrap();
        assert_eq!(exact.name, "secp256r1");
    }

    #[test]
    fn by_min_bits_rejects_widths_wider_than_any_curve() {
        assert!(by_min_bits(1024).is_err());
    }

    #[test]
    fn base_point_lies_on_its_own_curve() {
        for name in list_curves() {
            let c = get_curve(name).unwrap();
            assert!(
                crate::point::is_on_curve(&c.g, c),
                "base point of {name} must satisfy the curve equation"
            );
        }
    }
}
