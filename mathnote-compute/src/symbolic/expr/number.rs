use crate::primitive::float;
use rug::{Float, Integer, Rational};
use std::cmp::Ordering;
use super::{Primary, SymExpr};

/// A numeric value extracted from a [`SymExpr`], used to fold numbers together.
///
/// Exact numbers stay exact under addition and multiplication. As soon as a [`Float`] takes part
/// in an operation, the result is a [`Float`].
#[derive(Debug, Clone, PartialEq)]
pub enum Number {
    /// An integer or a rational number.
    Exact(Rational),

    /// A floating-point number.
    Float(Float),
}

impl Number {
    /// Extracts the number from the expression, if it is a numeric [`Primary`].
    pub fn from_expr(expr: &SymExpr) -> Option<Self> {
        match expr {
            SymExpr::Primary(Primary::Integer(n)) => Some(Self::Exact(Rational::from(n))),
            SymExpr::Primary(Primary::Rational(r)) => Some(Self::Exact(r.clone())),
            SymExpr::Primary(Primary::Float(f)) => Some(Self::Float(f.clone())),
            _ => None,
        }
    }

    /// Converts the number back into an expression. Rationals with a denominator of one become
    /// integers.
    pub fn into_expr(self) -> SymExpr {
        match self {
            Self::Exact(r) => SymExpr::rational(r),
            Self::Float(f) => SymExpr::Primary(Primary::Float(f)),
        }
    }

    pub fn zero() -> Self {
        Self::Exact(Rational::new())
    }

    pub fn one() -> Self {
        Self::Exact(Rational::from(1))
    }

    pub fn is_zero(&self) -> bool {
        match self {
            Self::Exact(r) => r.cmp0() == Ordering::Equal,
            Self::Float(f) => f.is_zero(),
        }
    }

    /// Returns true if the number is exactly one. A float equal to `1.0` is not considered one,
    /// so that the float is not silently dropped from a product.
    pub fn is_one(&self) -> bool {
        matches!(self, Self::Exact(r) if *r == 1)
    }

    pub fn is_float(&self) -> bool {
        matches!(self, Self::Float(_))
    }

    /// Returns the sign of the number.
    pub fn sign(&self) -> Ordering {
        match self {
            Self::Exact(r) => r.cmp0(),
            Self::Float(f) => f.cmp0().unwrap_or(Ordering::Equal),
        }
    }

    pub fn is_negative(&self) -> bool {
        self.sign() == Ordering::Less
    }

    /// Returns the integer value of the number, if it is an exact integer.
    pub fn as_integer(&self) -> Option<Integer> {
        match self {
            Self::Exact(r) if r.is_integer() => Some(r.numer().clone()),
            _ => None,
        }
    }

    /// Converts the number to a [`Float`].
    pub fn to_float(&self) -> Float {
        match self {
            Self::Exact(r) => float(r),
            Self::Float(f) => f.clone(),
        }
    }

    pub fn add(self, other: Self) -> Self {
        match (self, other) {
            (Self::Exact(a), Self::Exact(b)) => Self::Exact(a + b),
            (a, b) => Self::Float(a.to_float() + b.to_float()),
        }
    }

    pub fn mul(self, other: Self) -> Self {
        match (self, other) {
            (Self::Exact(a), Self::Exact(b)) => Self::Exact(a * b),
            (a, b) => Self::Float(a.to_float() * b.to_float()),
        }
    }

    pub fn neg(self) -> Self {
        match self {
            Self::Exact(r) => Self::Exact(-r),
            Self::Float(f) => Self::Float(-f),
        }
    }

    /// Returns the absolute value of the number.
    pub fn abs(self) -> Self {
        match self {
            Self::Exact(r) => Self::Exact(r.abs()),
            Self::Float(f) => Self::Float(f.abs()),
        }
    }

    /// Returns the reciprocal of the number, or [`None`] if the number is zero.
    pub fn recip(self) -> Option<Self> {
        if self.is_zero() {
            return None;
        }
        match self {
            Self::Exact(r) => Some(Self::Exact(r.recip())),
            Self::Float(f) => Some(Self::Float(f.recip())),
        }
    }

    /// Compares two numbers by value.
    pub fn cmp_value(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Self::Exact(a), Self::Exact(b)) => a.cmp(b),
            (a, b) => a.to_float().partial_cmp(&b.to_float()).unwrap_or(Ordering::Equal),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::primitive::rat;
    use pretty_assertions::assert_eq;

    #[test]
    fn exact_arithmetic_stays_exact() {
        let sum = Number::Exact(rat(1, 2)).add(Number::Exact(rat(1, 3)));
        assert_eq!(sum, Number::Exact(rat(5, 6)));
        assert_eq!(Number::Exact(rat(4, 2)).into_expr(), SymExpr::int(2));
    }

    #[test]
    fn floats_are_contagious() {
        let product = Number::Exact(rat(1, 2)).mul(Number::Float(float(3)));
        assert_eq!(product, Number::Float(float(1.5)));
    }

    #[test]
    fn zero_has_no_reciprocal() {
        assert_eq!(Number::zero().recip(), None);
        assert_eq!(Number::Exact(rat(-2, 3)).recip(), Some(Number::Exact(rat(-3, 2))));
    }
}
