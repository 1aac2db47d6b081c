//! Functions to construct [`Integer`]s, [`Rational`]s, [`Float`]s, and [`Complex`] numbers from
//! various types.

use rug::{Assign, Complex, Float, Integer, Rational};

/// The number of bits of precision to use when computing values.
pub const PRECISION: u32 = 1 << 9;

/// Creates an [`Integer`] with the given value.
pub fn int<T>(n: T) -> Integer
where
    Integer: From<T>,
{
    Integer::from(n)
}

/// Creates an [`Integer`] from a string slice of decimal digits. Returns [`None`] if the string
/// is not a valid integer.
pub fn int_from_str(s: &str) -> Option<Integer> {
    Integer::from_str_radix(s, 10).ok()
}

/// Creates a [`Rational`] with the given numerator and denominator.
///
/// The denominator must be non-zero.
pub fn rat(num: i64, den: i64) -> Rational {
    Rational::from((num, den))
}

/// Creates a [`Float`] with the given value.
pub fn float<T>(n: T) -> Float
where
    Float: Assign<T>,
{
    Float::with_val(PRECISION, n)
}

/// Creates a [`Float`] from a decimal literal, such as `3.14`, `.5` or `1e5`. Returns [`None`] if
/// the string is not a valid decimal.
pub fn float_from_str(s: &str) -> Option<Float> {
    // a digit comes first, or right after a leading point
    let digits = s.strip_prefix('.').unwrap_or(s);
    if !digits.starts_with(|c: char| c.is_ascii_digit()) {
        return None;
    }
    let parsed = if s.starts_with('.') {
        Float::parse(format!("0{}", s))
    } else {
        Float::parse(s)
    };
    parsed.ok().map(|incomplete| Float::with_val(PRECISION, incomplete))
}

/// Creates a [`Complex`] with the given value.
pub fn complex<T>(n: T) -> Complex
where
    Complex: Assign<T>,
{
    Complex::with_val(PRECISION, n)
}
