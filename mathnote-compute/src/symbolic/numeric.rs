//! Numeric approximation of expressions that contain no free symbols.
//!
//! Every value is computed as a [`Complex`] with [`PRECISION`] bits, so that intermediate results
//! such as `sqrt(-1)` do not fail. Results whose imaginary part is negligible compared to the real
//! part are considered real.
//!
//! [`PRECISION`]: crate::primitive::PRECISION

use crate::{
    consts::{E, EPSILON, I, PI},
    funcs,
    primitive::{complex, float},
};
use rug::{ops::Pow, Complex, Float, Integer};
use std::cmp::Ordering;
use super::expr::{Primary, SymExpr};

/// Returns the contained value if the number has no imaginary part.
fn as_real(z: &Complex) -> Option<Float> {
    if z.imag().is_zero() {
        Some(z.real().clone())
    } else {
        None
    }
}

/// Returns the number if both of its parts are finite.
fn finite(z: Complex) -> Option<Complex> {
    if z.real().is_finite() && z.imag().is_finite() {
        Some(z)
    } else {
        None
    }
}

/// Computes `base^exp`, using real arithmetic when both sides are real and the result is real.
fn power(base: Complex, exp: Complex) -> Option<Complex> {
    if base.is_zero() {
        if exp.is_zero() {
            return Some(complex(1));
        }
        return match as_real(&exp)?.cmp0() {
            Some(Ordering::Greater) => Some(complex(0)),
            _ => None,
        };
    }

    if let (Some(b), Some(e)) = (as_real(&base), as_real(&exp)) {
        if b.cmp0() == Some(Ordering::Greater) || e.is_integer() {
            return finite(complex(b.pow(e)));
        }
    }
    finite(base.pow(exp))
}

/// Computes the reciprocal, or [`None`] for zero.
fn recip(z: Complex) -> Option<Complex> {
    if z.is_zero() {
        None
    } else {
        Some(z.recip())
    }
}

/// Evaluates a built-in function at the given arguments.
pub fn eval_function(name: &str, args: &[Complex]) -> Option<Complex> {
    let z = args.first()?.clone();
    let value = match name {
        "sin" => z.sin(),
        "cos" => z.cos(),
        "tan" => z.tan(),
        "cot" => recip(z.tan())?,
        "sec" => recip(z.cos())?,
        "csc" => recip(z.sin())?,
        "asin" => z.asin(),
        "acos" => z.acos(),
        "atan" => z.atan(),
        "acot" if z.is_zero() => complex(PI.clone() / 2u32),
        "acot" => recip(z)?.atan(),
        "asec" => recip(z)?.acos(),
        "acsc" => recip(z)?.asin(),
        "sinh" => z.sinh(),
        "cosh" => z.cosh(),
        "tanh" => z.tanh(),
        "coth" => recip(z.tanh())?,
        "sech" => recip(z.cosh())?,
        "csch" => recip(z.sinh())?,
        "asinh" => z.asinh(),
        "acosh" => z.acosh(),
        "atanh" => z.atanh(),
        "acoth" => recip(z)?.atanh(),
        "asech" => recip(z)?.acosh(),
        "acsch" => recip(z)?.asinh(),
        "exp" => z.exp(),
        "log" => {
            if z.is_zero() {
                return None;
            }
            match args.get(1) {
                Some(base) => {
                    let base = base.clone().ln();
                    if base.is_zero() {
                        return None;
                    }
                    z.ln() / base
                },
                None => z.ln(),
            }
        },
        "sqrt" => z.sqrt(),
        "cbrt" => match as_real(&z) {
            Some(x) => complex(x.cbrt()),
            None => power(z, complex(float(1) / 3))?,
        },
        "root" => power(z, recip(args.get(1)?.clone())?)?,
        "abs" => complex(z.abs().real()),
        "sign" => match as_real(&z) {
            Some(x) => complex(x.signum()),
            None => z.clone() / complex(z.abs().real()),
        },
        "floor" => complex(as_real(&z)?.floor()),
        "ceiling" => complex(as_real(&z)?.ceil()),
        "Mod" => {
            let a = as_real(&z)?;
            let b = as_real(args.get(1)?)?;
            if b.is_zero() {
                return None;
            }
            let quotient = Float::with_val(a.prec(), &a / &b).floor();
            complex(a - b * quotient)
        },
        "factorial" => {
            let x = as_real(&z)?;
            if x.is_integer() && x.cmp0() == Some(Ordering::Less) {
                return None;
            }
            complex((x + 1u32).gamma())
        },
        "factorial2" => {
            let x = as_real(&z)?;
            let n = x.to_integer().filter(|_| x.is_integer())?;
            complex(&funcs::factorial2(&n)?)
        },
        "gamma" => {
            let x = as_real(&z)?;
            if x.is_integer() && x.cmp0() != Some(Ordering::Greater) {
                return None;
            }
            complex(x.gamma())
        },
        _ => return None,
    };
    finite(value)
}

/// Evaluates the expression to a complex number. Returns [`None`] if the expression contains free
/// symbols or infinities, or if the value is undefined.
pub fn eval_complex(expr: &SymExpr) -> Option<Complex> {
    match expr {
        SymExpr::Primary(Primary::Integer(n)) => Some(complex(n)),
        SymExpr::Primary(Primary::Rational(r)) => Some(complex(r)),
        SymExpr::Primary(Primary::Float(f)) => Some(complex(f)),
        SymExpr::Primary(Primary::Symbol(name)) => match name.as_str() {
            "E" => Some(complex(&*E)),
            "pi" => Some(complex(&*PI)),
            "I" => Some(I.clone()),
            _ => None,
        },
        SymExpr::Primary(Primary::Call(name, args)) => {
            let args = args.iter().map(eval_complex).collect::<Option<Vec<_>>>()?;
            eval_function(name, &args)
        },
        SymExpr::Add(terms) => terms.iter()
            .try_fold(complex(0), |acc, term| Some(acc + eval_complex(term)?))
            .and_then(finite),
        SymExpr::Mul(factors) => factors.iter()
            .try_fold(complex(1), |acc, factor| Some(acc * eval_complex(factor)?))
            .and_then(finite),
        SymExpr::Exp(base, exp) => power(eval_complex(base)?, eval_complex(exp)?),
    }
}

/// Evaluates the expression to a real number. Returns [`None`] if the value is not real.
pub fn eval_real(expr: &SymExpr) -> Option<Float> {
    let value = eval_complex(expr)?;
    let (re, im) = value.into_real_imag();
    let tolerance = Float::with_val(re.prec(), re.clone().abs().max(&float(1))) * &*EPSILON;
    if im.abs() <= tolerance {
        Some(re)
    } else {
        None
    }
}

/// Evaluates the expression to an [`f64`].
pub fn eval_f64(expr: &SymExpr) -> Option<f64> {
    eval_real(expr).map(|value| value.to_f64())
}

/// Returns the exact integer value of a constant expression, if it evaluates to an integer.
pub fn eval_integer(expr: &SymExpr) -> Option<Integer> {
    let value = eval_real(expr)?;
    let rounded = value.clone().round();
    let difference = Float::with_val(value.prec(), &value - &rounded).abs();
    if difference <= *EPSILON {
        rounded.to_integer()
    } else {
        None
    }
}

/// Returns the sign of a real value too large to represent as an [`f64`], such as `10^10^10`.
/// Returns [`None`] if the value is representable, not real, or not a power or product of powers.
pub fn overflow_sign(expr: &SymExpr) -> Option<Ordering> {
    match expr {
        SymExpr::Exp(base, exp) => {
            let base = eval_real(base)?;
            let exp = eval_real(exp)?;
            if base.cmp0() != Some(Ordering::Greater) {
                return None;
            }
            // compare ln(base^exp) instead of the power itself
            let log = exp * base.ln();
            (log > f64::MAX.ln()).then_some(Ordering::Greater)
        },
        SymExpr::Mul(factors) => {
            let mut sign = Ordering::Greater;
            let mut overflowed = false;
            for factor in factors {
                if !overflowed {
                    if let Some(factor_sign) = overflow_sign(factor) {
                        overflowed = true;
                        if factor_sign == Ordering::Less {
                            sign = sign.reverse();
                        }
                        continue;
                    }
                }
                match eval_real(factor)?.cmp0()? {
                    Ordering::Less => sign = sign.reverse(),
                    Ordering::Equal => return None,
                    Ordering::Greater => (),
                }
            }
            overflowed.then_some(sign)
        },
        _ => None,
    }
}

/// Approximates an expression with no free symbols as a floating-point number, or as `a + b*I`
/// if the value is not real.
pub fn evaluate(expr: &SymExpr) -> Option<SymExpr> {
    if !expr.free_symbols().is_empty() {
        return None;
    }

    let value = eval_complex(expr)?;
    if let Some(re) = eval_real(expr) {
        return Some(SymExpr::Primary(Primary::Float(re)));
    }

    let (re, im) = value.into_real_imag();
    let imaginary = SymExpr::Mul(vec![SymExpr::Primary(Primary::Float(im)), SymExpr::i()]);
    Some(if re.is_zero() {
        imaginary
    } else {
        SymExpr::Add(vec![SymExpr::Primary(Primary::Float(re)), imaginary])
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::primitive::rat;
    use assert_float_eq::{
        afe_abs,
        afe_relative_error_msg,
        afe_is_relative_eq,
        assert_float_relative_eq,
    };
    use pretty_assertions::assert_eq;

    #[test]
    fn constants() {
        assert_float_relative_eq!(eval_f64(&SymExpr::pi()).unwrap(), std::f64::consts::PI);
        assert_float_relative_eq!(eval_f64(&SymExpr::e()).unwrap(), std::f64::consts::E);
    }

    #[test]
    fn functions() {
        let expr = SymExpr::call("sin", vec![SymExpr::Mul(vec![
            SymExpr::rational(rat(1, 6)),
            SymExpr::pi(),
        ])]);
        assert_float_relative_eq!(eval_f64(&expr).unwrap(), 0.5);

        let expr = SymExpr::call("log", vec![SymExpr::int(8), SymExpr::int(2)]);
        assert_eq!(eval_integer(&expr), Some(Integer::from(3)));
    }

    #[test]
    fn square_root_of_negative_is_not_real() {
        let expr = SymExpr::int(-4).sqrt();
        assert_eq!(eval_real(&expr), None);
        let value = eval_complex(&expr).unwrap();
        assert_float_relative_eq!(value.imag().to_f64(), 2.0);
    }

    #[test]
    fn undefined_values() {
        assert_eq!(eval_complex(&SymExpr::call("log", vec![SymExpr::zero()])), None);
        assert_eq!(eval_complex(&SymExpr::int(0).recip()), None);
        assert_eq!(eval_complex(&SymExpr::symbol("x")), None);
    }

    #[test]
    fn overflowing_powers() {
        let tower = SymExpr::pow(SymExpr::int(10), SymExpr::pow(SymExpr::int(10), SymExpr::int(10)));
        assert_eq!(overflow_sign(&tower), Some(Ordering::Greater));
        assert_eq!(overflow_sign(&(SymExpr::neg_one() * tower)), Some(Ordering::Less));

        assert_eq!(overflow_sign(&SymExpr::pow(SymExpr::int(10), SymExpr::int(40))), None);
        assert_eq!(overflow_sign(&SymExpr::pow(SymExpr::int(10), SymExpr::int(-400))), None);
    }

    #[test]
    fn floor_and_mod() {
        let expr = SymExpr::call("floor", vec![SymExpr::pi()]);
        assert_eq!(eval_integer(&expr), Some(Integer::from(3)));

        let expr = SymExpr::call("Mod", vec![SymExpr::int(-7), SymExpr::int(3)]);
        assert_eq!(eval_integer(&expr), Some(Integer::from(2)));
    }
}
