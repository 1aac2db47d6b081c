//! Exact values of the trigonometric functions at well-known angles.
//!
//! The trigonometric functions for certain angles are well-known, and can be represented exactly
//! in terms of square roots. These exact values are called "constructible" values. We take
//! advantage of this by creating lookup tables from these input angles to the outputs of the
//! respective trigonometric functions.
//!
//! Angles are stored as a multiple of `pi`, so `1/6` stands for `pi/6` (30 degrees). Only the
//! first quadrant is stored; other angles are reduced into it by symmetry.

use crate::primitive::rat;
use crate::symbolic::expr::SymExpr;
use once_cell::sync::Lazy;
use rug::Rational;

/// `sqrt(n)/d`, in the form produced by simplification.
fn root_over(n: u32, d: i64) -> SymExpr {
    let root = SymExpr::int(n).sqrt();
    if d == 1 {
        root
    } else {
        SymExpr::Mul(vec![SymExpr::rational(rat(1, d)), root])
    }
}

/// Values of `sin(c*pi)` for `c` in `[0, 1/2]`.
pub static SIN_QUADRANT: Lazy<Vec<(Rational, SymExpr)>> = Lazy::new(|| vec![
    (rat(0, 1), SymExpr::zero()),
    (rat(1, 6), SymExpr::rational(rat(1, 2))),
    (rat(1, 4), root_over(2, 2)),
    (rat(1, 3), root_over(3, 2)),
    (rat(1, 2), SymExpr::one()),
]);

/// Values `v` and angles `c` such that `asin(v) = c*pi`.
pub static ASIN_TABLE: Lazy<Vec<(SymExpr, Rational)>> = Lazy::new(|| vec![
    (SymExpr::zero(), rat(0, 1)),
    (SymExpr::rational(rat(1, 2)), rat(1, 6)),
    (root_over(2, 2), rat(1, 4)),
    (root_over(3, 2), rat(1, 3)),
    (SymExpr::one(), rat(1, 2)),
]);

/// Values `v` and angles `c` such that `atan(v) = c*pi`.
pub static ATAN_TABLE: Lazy<Vec<(SymExpr, Rational)>> = Lazy::new(|| vec![
    (SymExpr::zero(), rat(0, 1)),
    (root_over(3, 3), rat(1, 6)),
    (SymExpr::one(), rat(1, 4)),
    (root_over(3, 1), rat(1, 3)),
]);

/// Values `v` and angles `c` such that `acot(v) = c*pi`.
pub static ACOT_TABLE: Lazy<Vec<(SymExpr, Rational)>> = Lazy::new(|| vec![
    (SymExpr::zero(), rat(1, 2)),
    (root_over(3, 3), rat(1, 3)),
    (SymExpr::one(), rat(1, 4)),
    (root_over(3, 1), rat(1, 6)),
]);
