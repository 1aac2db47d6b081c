//! Numeric constants used by the engine. Each constant is computed once, at [`PRECISION`] bits.
//!
//! [`PRECISION`]: crate::primitive::PRECISION

use once_cell::sync::Lazy;
use rug::{Complex, Float};
use super::primitive::{complex, float};

/// The imaginary unit.
pub static I: Lazy<Complex> = Lazy::new(|| complex((0, 1)));

/// Euler's number.
pub static E: Lazy<Float> = Lazy::new(|| float(1).exp());

pub static PI: Lazy<Float> = Lazy::new(|| float(-1).acos());

/// The tolerance below which the imaginary part of a numeric result is treated as zero.
pub static EPSILON: Lazy<Float> = Lazy::new(|| float(1e-60));
