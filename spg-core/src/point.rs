//! Affine and Jacobian point arithmetic on a short-Weierstrass curve
//! `y^2 = x^3 + a x + b (mod p)`.
//!
//! Grounded on `ec_point.c`: doubling and addition in Jacobian
//! coordinates, converted back to affine for storage and I/O. The
//! point at infinity is represented explicitly (`AffinePoint::INFINITY`
//! rather than a magic coordinate pair) because a `Nat` sentinel value
//! would collide with a legitimate zero x-coordinate.

use crate::bigint::Nat;
use crate::curve::Curve;

/// A point in affine coordinates, or the point at infinity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AffinePoint {
    Infinity,
    Point { x: Nat, y: Nat },
}

impl AffinePoint {
    pub fn new(x: Nat, y: Nat) -> AffinePoint {
        AffinePoint::Point { x, y }
    }

    pub const INFINITY: AffinePoint = AffinePoint::Infinity;

    pub fn is_infinity(&self) -> bool {
        matches!(self, AffinePoint::Infinity)
    }

    pub fn x(&self) -> Option<&Nat> {
        match self {
            AffinePoint::Point { x, .. } => Some(x),
            AffinePoint::Infinity => None,
        }
    }

    pub fn y(&self) -> Option<&Nat> {
        match self {
            AffinePoint::Point { y, .. } => Some(y),
            AffinePoint::Infinity => None,
        }
    }

    fn to_jacobian(&self) -> JacobianPoint {
        match self {
            AffinePoint::Infinity => JacobianPoint::infinity(),
            AffinePoint::Point { x, y } => JacobianPoint {
                x: x.clone(),
                y: y.clone(),
                z: Nat::ONE,
            },
        }
    }
}

/// A point in Jacobian coordinates `(X, Y, Z)` representing the
/// affine point `(X/Z^2, Y/Z^3)`. `Z == 0` is the point at infinity.
#[derive(Debug, Clone)]
struct JacobianPoint {
    x: Nat,
    y: Nat,
    z: Nat,
}

impl JacobianPoint {
    fn infinity() -> JacobianPoint {
        JacobianPoint {
            x: Nat::ONE,
            y: Nat::ONE,
            z: Nat::ZERO,
        }
    }

    fn is_infinity(&self) -> bool {
        self.z.is_zero()
    }

    fn to_affine(&self, p: &Nat) -> Option<AffinePoint> {
        if self.is_infinity() {
            return Some(AffinePoint::Infinity);
        }
        let z_inv = self.z.invm(p).ok()?;
        let z_inv2 = z_inv.mulm(&z_inv, p);
        let z_inv3 = z_inv2.mulm(&z_inv, p);
        let x = self.x.mulm(&z_inv2, p);
        let y = self.y.mulm(&z_inv3, p);
        Some(AffinePoint::Point { x, y })
    }

    /// Jacobian doubling, `2P`. Standard `4M + 4S` formula.
    fn double(&self, curve: &Curve) -> JacobianPoint {
        if self.is_infinity() || self.y.is_zero() {
            return JacobianPoint::infinity();
        }
        let p = &curve.p;
        let y2 = self.y.mulm(&self.y, p);
        let s = {
            let xy2 = self.x.mulm(&y2, p);
            let four = Nat::from_u64(4);
            xy2.mulm(&four, p)
        };
        let m = {
            let x2 = self.x.mulm(&self.x, p);
            let three_x2 = x2.mulm(&Nat::from_u64(3), p);
            let z2 = self.z.mulm(&self.z, p);
            let z4 = z2.mulm(&z2, p);
            let a_z4 = curve.a.mulm(&z4, p);
            three_x2.addm(&a_z4, p)
        };
        let two_s = s.addm(&s, p);
        let m2 = m.mulm(&m, p);
        let x3 = m2.subm(&two_s, p);
        let y2_2 = y2.mulm(&y2, p);
        let eight_y4 = y2_2.mulm(&Nat::from_u64(8), p);
        let s_minus_x3 = s.subm(&x3, p);
        let y3 = m.mulm(&s_minus_x3, p).subm(&eight_y4, p);
        let yz = self.y.mulm(&self.z, p);
        let z3 = yz.addm(&yz, p);
        JacobianPoint { x: x3, y: y3, z: z3 }
    }

    /// Mixed Jacobian + affine addition, `P + Q`.
    fn add_affine(&self, q: &AffinePoint, curve: &Curve) -> JacobianPoint {
        let p = &curve.p;
        let (qx, qy) = match q {
            AffinePoint::Infinity => return self.clone(),
            AffinePoint::Point { x, y } => (x, y),
        };
        if self.is_infinity() {
            return JacobianPoint {
                x: qx.clone(),
                y: qy.clone(),
                z: Nat::ONE,
            };
        }
        let z1z1 = self.z.mulm(&self.z, p);
        let u2 = qx.mulm(&z1z1, p);
        let s2 = qy.mulm(&self.z, p).mulm(&z1z1, p);
        let h = u2.subm(&self.x, p);
        if h.is_zero() {
            if s2.subm(&self.y, p).is_zero() {
                return self.double(curve);
            }
            return JacobianPoint::infinity();
        }
        let hh = h.mulm(&h, p);
        let hhh = h.mulm(&hh, p);
        let r = s2.subm(&self.y, p);
        let v = self.x.mulm(&hh, p);
        let two_v = v.addm(&v, p);
        let r2 = r.mulm(&r, p);
        let x3 = r2.subm(&hhh, p).subm(&two_v, p);
        let v_minus_x3 = v.subm(&x3, p);
        let y1_hhh = self.y.mulm(&hhh, p);
        let y3 = r.mulm(&v_minus_x3, p).subm(&y1_hhh, p);
        let z3 = self.z.mulm(&h, p);
        JacobianPoint { x: x3, y: y3, z: z3 }
    }
}

/// Which coordinate system a point-algebra operation runs in. The
/// original source chose this once at build time via `#ifdef
/// JACOBIAN_COORDINATES`; here it is a runtime choice so both paths
/// can be exercised and cross-checked without a rebuild.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Coordinates {
    /// Literal affine formulas (one modular inversion per operation).
    Affine,
    /// Jacobian projective formulas, converted back to affine at the
    /// end (no inversion until the final result).
    #[default]
    Jacobian,
}

/// `P + Q`, running entirely in Jacobian coordinates before converting
/// back to affine at the end.
pub fn jacobian_add(p: &AffinePoint, q: &AffinePoint, curve: &Curve) -> AffinePoint {
    if p.is_infinity() {
        return q.clone();
    }
    p.to_jacobian()
        .add_affine(q, curve)
        .to_affine(&curve.p)
        .expect("finite Jacobian result always has an invertible z unless infinite")
}

/// `2P`, running entirely in Jacobian coordinates before converting
/// back to affine at the end.
pub fn jacobian_double(p: &AffinePoint, curve: &Curve) -> AffinePoint {
    p.to_jacobian()
        .double(curve)
        .to_affine(&curve.p)
        .expect("doubling a finite point never fails to invert")
}

/// `P + Q` using the literal affine addition formula:
/// `s = (yP-yQ)(xP-xQ)⁻¹`, `xR = s²-xP-xQ`, `yR = s(xP-xR)-yQ`.
pub fn affine_add(p: &AffinePoint, q: &AffinePoint, curve: &Curve) -> AffinePoint {
    let modulus = &curve.p;
    let (px, py) = match p {
        AffinePoint::Infinity => return q.clone(),
        AffinePoint::Point { x, y } => (x, y),
    };
    let (qx, qy) = match q {
        AffinePoint::Infinity => return p.clone(),
        AffinePoint::Point { x, y } => (x, y),
    };
    if px == qx {
        if py.addm(qy, modulus).is_zero() {
            return AffinePoint::Infinity;
        }
        return affine_double(p, curve);
    }
    let dx = px.subm(qx, modulus);
    let dy = py.subm(qy, modulus);
    let s = dy.mulm(&dx.invm(modulus).expect("xP != xQ implies dx is invertible"), modulus);
    let xr = s.mulm(&s, modulus).subm(px, modulus).subm(qx, modulus);
    let yr = s.mulm(&px.subm(&xr, modulus), modulus).subm(py, modulus);
    AffinePoint::Point { x: xr, y: yr }
}

/// `2P` using the literal affine doubling formula:
/// `s = (3x²+a)(2y)⁻¹`, `x' = s²-2x`, `y' = s(x-x')-y`.
pub fn affine_double(p: &AffinePoint, curve: &Curve) -> AffinePoint {
    let modulus = &curve.p;
    let (x, y) = match p {
        AffinePoint::Infinity => return AffinePoint::Infinity,
        AffinePoint::Point { x, y } => (x, y),
    };
    if y.is_zero() {
        return AffinePoint::Infinity;
    }
    let three_x2 = x.mulm(x, modulus).mulm(&Nat::from_u64(3), modulus);
    let num = three_x2.addm(&curve.a, modulus);
    let two_y = y.addm(y, modulus);
    let s = num.mulm(&two_y.invm(modulus).expect("y != 0 implies 2y is invertible"), modulus);
    let x2 = x.addm(x, modulus);
    let xr = s.mulm(&s, modulus).subm(&x2, modulus);
    let yr = s.mulm(&x.subm(&xr, modulus), modulus).subm(y, modulus);
    AffinePoint::Point { x: xr, y: yr }
}

/// `P + Q` in the requested coordinate system, both yielding the same
/// affine result.
pub fn add_with(p: &AffinePoint, q: &AffinePoint, curve: &Curve, coords: Coordinates) -> AffinePoint {
    match coords {
        Coordinates::Affine => affine_add(p, q, curve),
        Coordinates::Jacobian => jacobian_add(p, q, curve),
    }
}

/// `2P` in the requested coordinate system, both yielding the same
/// affine result.
pub fn double_with(p: &AffinePoint, curve: &Curve, coords: Coordinates) -> AffinePoint {
    match coords {
        Coordinates::Affine => affine_double(p, curve),
        Coordinates::Jacobian => jacobian_double(p, curve),
    }
}

/// `P + Q` in affine coordinates, defaulting to the Jacobian path.
pub fn add(p: &AffinePoint, q: &AffinePoint, curve: &Curve) -> AffinePoint {
    add_with(p, q, curve, Coordinates::Jacobian)
}

/// `2P` in affine coordinates, defaulting to the Jacobian path.
pub fn double(p: &AffinePoint, curve: &Curve) -> AffinePoint {
    double_with(p, curve, Coordinates::Jacobian)
}

/// `-P`: the reflection of `P` across the x-axis. Does not mutate the
/// caller's point (`ec_point_sub` in the source negates a local copy).
pub fn negate(p: &AffinePoint, curve: &Curve) -> AffinePoint {
    match p {
        AffinePoint::Infinity => AffinePoint::Infinity,
        AffinePoint::Point { x, y } => {
            let neg_y = Nat::ZERO.subm(y, &curve.p);
            AffinePoint::Point {
                x: x.clone(),
                y: neg_y,
            }
        }
    }
}

/// `P - Q`.
pub fn sub(p: &AffinePoint, q: &AffinePoint, curve: &Curve) -> AffinePoint {
    add(p, &negate(q, curve), curve)
}

/// Whether `p` satisfies `y^2 = x^3 + a x + b (mod prime)`. The point
/// at infinity is conventionally on every curve.
pub fn is_on_curve(p: &AffinePoint, curve: &Curve) -> bool {
    let (x, y) = match p {
        AffinePoint::Infinity => return true,
        AffinePoint::Point { x, y } => (x, y),
    };
    let modulus = &curve.p;
    let lhs = y.mulm(y, modulus);
    let x2 = x.mulm(x, modulus);
    let x3 = x2.mulm(x, modulus);
    let ax = curve.a.mulm(x, modulus);
    let rhs = x3.addm(&ax, modulus).addm(&curve.b, modulus);
    lhs == rhs
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::curve::get_curve;

    #[test]
    fn doubling_base_point_stays_on_curve() {
        let c = get_curve("secp256r1").unwrap();
        let g2 = double(&c.g, c);
        assert!(is_on_curve(&g2, c));
    }

    #[test]
    fn add_matches_double_for_equal_operands() {
        let c = get_curve("secp192r1").unwrap();
        let g2_via_add = add(&c.g, &c.g, c);
        let g2_via_double = double(&c.g, c);
        assert_eq!(g2_via_add, g2_via_double);
    }

    #[test]
    fn point_plus_its_negation_is_infinity() {
        let c = get_curve("secp224r1").unwrap();
        let neg_g = negate(&c.g, c);
        assert!(is_on_curve(&neg_g, c));
        assert_eq!(add(&c.g, &neg_g, c), AffinePoint::Infinity);
    }

    #[test]
    fn infinity_is_identity_for_addition() {
        let c = get_curve("secp160r1").unwrap();
        assert_eq!(add(&c.g, &AffinePoint::Infinity, c), c.g);
    }

    #[test]
    fn sub_is_inverse_of_add() {
        let c = get_curve("secp384r1").unwrap();
        let g2 = double(&c.g, c);
        let back = sub(&g2, &c.g, c);
        assert_eq!(back, c.g);
    }

    #[test]
    fn affine_and_jacobian_addition_agree() {
        let c = get_curve("secp256r1").unwrap();
        let g2 = double(&c.g, c);
        let via_affine = affine_add(&c.g, &g2, c);
        let via_jacobian = jacobian_add(&c.g, &g2, c);
        assert_eq!(via_affine, via_jacobian);
        assert!(is_on_curve(&via_affine, c));
    }

    #[test]
    fn affine_and_jacobian_doubling_agree() {
        let c = get_curve("secp224r1").unwrap();
        let via_affine = affine_double(&c.g, c);
        let via_jacobian = jacobian_double(&c.g, c);
        assert_eq!(via_affine, via_jacobian);
        assert!(is_on_curve(&via_affine, c));
    }

    #[test]
    fn add_with_dispatches_to_the_requested_coordinate_system() {
        let c = get_curve("secp192r1").unwrap();
        let g2 = double(&c.g, c);
        assert_eq!(
            add_with(&c.g, &g2, c, Coordinates::Affine),
            add_with(&c.g, &g2, c, Coordinates::Jacobian)
        );
    }
}
