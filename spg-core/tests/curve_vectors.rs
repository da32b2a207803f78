//! Curve parameter vectors, cross-checked against the hex tables in
//! `curves.c` rather than re-derived from the registry under test.

use hex_literal::hex;
use spg_core::get_curve;

#[test]
fn secp256r1_base_point_matches_known_vector() {
    let curve = get_curve("secp256r1").unwrap();
    let gx = hex!("6B17D1F2E12C4247F8BCE6E563A440F277037D812DEB33A0F4A13945D898C296");
    let gy = hex!("4FE342E2FE1A7F9B8EE7EB4A7C0F9E162BCE33576B315ECECBB6406837BF51F5");
    assert_eq!(curve.g.x().unwrap().to_be_bytes(), &gx[..]);
    assert_eq!(curve.g.y().unwrap().to_be_bytes(), &gy[..]);
    assert_eq!(curve.h, 1);
    assert_eq!(curve.bits(), 256);
}

#[test]
fn secp521r1_is_the_widest_curve() {
    let curve = get_curve("secp521r1").unwrap();
    assert_eq!(curve.bits(), 521);
}

#[test]
fn default_curve_is_secp160r2() {
    assert_eq!(spg_core::DEFAULT_CURVE, "secp160r2");
    assert!(get_curve(spg_core::DEFAULT_CURVE).is_ok());
}

#[test]
fn all_eleven_sec2_curves_are_registered() {
    let names = spg_core::list_curves();
    for expected in [
        "secp112r1",
        "secp112r2",
        "secp128r1",
        "secp128r2",
        "secp160r1",
        "secp160r2",
        "secp192r1",
        "secp224r1",
        "secp256r1",
        "secp384r1",
        "secp521r1",
    ] {
        assert!(
            names.contains(&expected),
            "missing curve {expected} in registry"
        );
    }
}
