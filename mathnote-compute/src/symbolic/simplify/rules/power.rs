//! Simplification rules for powers, including exact evaluation of numeric powers and roots.

use crate::symbolic::{
    expr::{Number, Primary, SymExpr},
    simplify::{rules::do_power, step::Step},
    step_collector::StepCollector,
};
use rug::{ops::Pow, Float, Integer, Rational};
use std::cmp::Ordering;

/// Integer exponents larger than this in absolute value are not evaluated exactly.
const MAX_EXACT_EXPONENT: u32 = 10_000;

/// The largest divisor tried when pulling perfect powers out of a root.
const MAX_TRIAL_DIVISOR: u32 = 100_000;

/// `a^0 = 1`
pub fn power_zero(expr: &SymExpr, step_collector: &mut dyn StepCollector<Step>) -> Option<SymExpr> {
    let opt = do_power(expr, |_, rhs| {
        if rhs.as_integer()?.cmp0() == Ordering::Equal {
            Some(SymExpr::one())
        } else {
            None
        }
    })?;

    // keep the step collection logic outside of the closure to make it implement `Fn`
    step_collector.push(Step::PowerZero);
    Some(opt)
}

/// `a^1 = a`
pub fn power_one(expr: &SymExpr, step_collector: &mut dyn StepCollector<Step>) -> Option<SymExpr> {
    let opt = do_power(expr, |lhs, rhs| {
        if rhs.is_one() {
            Some(lhs.clone())
        } else {
            None
        }
    })?;

    step_collector.push(Step::PowerOne);
    Some(opt)
}

/// `1^a = 1`
pub fn power_one_left(expr: &SymExpr, step_collector: &mut dyn StepCollector<Step>) -> Option<SymExpr> {
    let opt = do_power(expr, |lhs, rhs| {
        if lhs.is_one() && !rhs.has_unbounded() {
            Some(SymExpr::one())
        } else {
            None
        }
    })?;

    step_collector.push(Step::PowerOneLeft);
    Some(opt)
}

/// `0^a = 0` for positive `a`, and `0^a = zoo` for negative `a`.
pub fn power_zero_left(expr: &SymExpr, step_collector: &mut dyn StepCollector<Step>) -> Option<SymExpr> {
    let opt = do_power(expr, |lhs, rhs| {
        if !lhs.is_zero() {
            return None;
        }
        match rhs.as_number()?.sign() {
            Ordering::Greater => Some(lhs.clone()),
            Ordering::Less => Some(SymExpr::complex_infinity()),
            Ordering::Equal => None,
        }
    })?;

    step_collector.push(Step::PowerZeroLeft);
    Some(opt)
}

/// `(a^b)^c = a^(b*c)`, where `c` is an integer.
pub fn power_power(expr: &SymExpr, step_collector: &mut dyn StepCollector<Step>) -> Option<SymExpr> {
    let opt = do_power(expr, |lhs, rhs| {
        let SymExpr::Exp(base, exp) = lhs else {
            return None;
        };
        if !rhs.is_integer() {
            return None;
        }
        Some(SymExpr::pow((**base).clone(), (**exp).clone() * rhs.clone()))
    })?;

    step_collector.push(Step::PowerPower);
    Some(opt)
}

/// Returns the largest integer `k` such that `k^q` divides `n`, considering only prime factors up
/// to [`MAX_TRIAL_DIVISOR`].
fn extract_root(n: &Integer, q: u32) -> Integer {
    let mut remaining = n.clone();
    let mut root = Integer::from(1);
    let mut divisor = 2u32;
    while divisor <= MAX_TRIAL_DIVISOR && Integer::from(divisor) * divisor <= remaining {
        let mut multiplicity = 0;
        while remaining.is_divisible_u(divisor) {
            remaining /= divisor;
            multiplicity += 1;
        }
        root *= Integer::from(divisor).pow(multiplicity / q);
        divisor += 1;
    }
    root
}

/// Evaluates a power of two exact numbers, keeping the result exact.
fn exact_power(base: Rational, exp: Rational) -> Option<SymExpr> {
    if base.cmp0() == Ordering::Equal {
        return None;
    }

    if exp.is_integer() {
        let n = exp.numer().to_i32().filter(|n| n.unsigned_abs() <= MAX_EXACT_EXPONENT)?;
        return Some(SymExpr::rational(base.pow(n)));
    }

    let (p, q) = (exp.numer().clone(), exp.denom().clone());

    // (-1)^(p/2) = i^p, and other negative bases split off a factor of (-1)^(p/q)
    if base.cmp0() == Ordering::Less {
        if base == -1 {
            return if q == 2 {
                Some(SymExpr::pow(SymExpr::i(), SymExpr::Primary(Primary::Integer(p))))
            } else {
                None
            };
        }
        return Some(
            SymExpr::pow(SymExpr::neg_one(), SymExpr::rational(exp.clone()))
                * SymExpr::pow(SymExpr::rational(-base), SymExpr::rational(exp)),
        );
    }

    // (a/c)^e = a^e * c^(-e)
    if !base.is_integer() {
        let (numer, denom) = base.into_numer_denom();
        let denom_part = SymExpr::pow(
            SymExpr::Primary(Primary::Integer(denom)),
            SymExpr::rational(-exp.clone()),
        );
        return Some(if numer == 1 {
            denom_part
        } else {
            SymExpr::pow(SymExpr::Primary(Primary::Integer(numer)), SymExpr::rational(exp)) * denom_part
        });
    }

    let n = base.numer().clone();
    if n == 1 {
        return None;
    }

    // n^(w + r) = n^w * n^r, where w is an integer and 0 < r < 1
    let (whole, rem) = p.clone().div_rem_floor(q.clone());
    if whole.cmp0() != Ordering::Equal {
        let whole = whole.to_i32().filter(|w| w.unsigned_abs() <= MAX_EXACT_EXPONENT)?;
        let fractional = Rational::from((rem, q));
        return Some(
            SymExpr::rational(Rational::from(&n).pow(whole))
                * SymExpr::pow(SymExpr::Primary(Primary::Integer(n)), SymExpr::rational(fractional)),
        );
    }

    let p = p.to_u32()?;
    let q = q.to_u32()?;
    let root = n.clone().root(q);
    if root.clone().pow(q) == n {
        return Some(SymExpr::Primary(Primary::Integer(root.pow(p))));
    }

    let k = extract_root(&n, q);
    if k == 1 {
        return None;
    }
    let remaining = n / Integer::from(k.clone().pow(q));
    Some(
        SymExpr::Primary(Primary::Integer(k.pow(p)))
            * SymExpr::pow(SymExpr::Primary(Primary::Integer(remaining)), SymExpr::rational(exp)),
    )
}

/// Evaluates a power where either side is a float.
fn float_power(base: Float, exp: Float) -> Option<SymExpr> {
    if base.is_zero() || (base.is_sign_negative() && !exp.is_integer()) {
        return None;
    }
    let result = base.pow(exp);
    if result.is_finite() {
        Some(SymExpr::Primary(Primary::Float(result)))
    } else {
        None
    }
}

/// Evaluates powers of numbers.
///
/// `2^10 = 1024`
/// `2^-2 = 1/4`
/// `sqrt(12) = 2*sqrt(3)`
/// `8^(1/3) = 2`
/// `sqrt(-4) = 2*i`
/// `1.5^2 = 2.25`
pub fn numeric_power(expr: &SymExpr, step_collector: &mut dyn StepCollector<Step>) -> Option<SymExpr> {
    let opt = do_power(expr, |lhs, rhs| {
        match (lhs.as_number()?, rhs.as_number()?) {
            (Number::Exact(base), Number::Exact(exp)) => exact_power(base, exp),
            (base, exp) => float_power(base.to_float(), exp.to_float()),
        }
    })?;

    step_collector.push(Step::NumericPower);
    Some(opt)
}

/// Distributes a power over a product.
///
/// `(a*b)^n = a^n * b^n` for integer `n`.
/// `(4*a)^c = 4^c * a^c` for any `c`, as long as the numeric coefficient is positive.
pub fn distribute_power(expr: &SymExpr, step_collector: &mut dyn StepCollector<Step>) -> Option<SymExpr> {
    let opt = do_power(expr, |lhs, rhs| {
        let SymExpr::Mul(factors) = lhs else {
            return None;
        };

        if rhs.is_integer() {
            return Some(SymExpr::Mul(
                factors.iter()
                    .map(|factor| SymExpr::pow(factor.clone(), rhs.clone()))
                    .collect(),
            ));
        }

        let (positive, rest): (Vec<_>, Vec<_>) = factors.iter()
            .cloned()
            .partition(|factor| factor.as_number().is_some_and(|n| n.sign() == Ordering::Greater));
        if positive.is_empty() || rest.is_empty() {
            return None;
        }

        let mut new_factors = positive.into_iter()
            .map(|factor| SymExpr::pow(factor, rhs.clone()))
            .collect::<Vec<_>>();
        new_factors.push(SymExpr::pow(SymExpr::Mul(rest).downgrade(), rhs.clone()));
        Some(SymExpr::Mul(new_factors))
    })?;

    step_collector.push(Step::DistributePower);
    Some(opt)
}

/// `e^log(a) = a`
/// `e^(c*log(a)) = a^c`
pub fn exp_log(expr: &SymExpr, step_collector: &mut dyn StepCollector<Step>) -> Option<SymExpr> {
    let opt = do_power(expr, |lhs, rhs| {
        if !lhs.is_symbol("E") {
            return None;
        }
        if let Some(arg) = rhs.as_unary_call("log") {
            return Some(arg.clone());
        }

        let SymExpr::Mul(factors) = rhs else {
            return None;
        };
        let mut logs = factors.iter()
            .enumerate()
            .filter(|(_, factor)| factor.as_unary_call("log").is_some());
        let (idx, log) = logs.next()?;
        if logs.next().is_some() {
            return None;
        }

        let arg = log.as_unary_call("log")?.clone();
        let mut rest = factors.to_vec();
        rest.remove(idx);
        Some(SymExpr::pow(arg, SymExpr::Mul(rest).downgrade()))
    })?;

    step_collector.push(Step::ExpLog);
    Some(opt)
}

/// Applies all power rules.
pub fn all(expr: &SymExpr, step_collector: &mut dyn StepCollector<Step>) -> Option<SymExpr> {
    power_zero(expr, step_collector)
        .or_else(|| power_one(expr, step_collector))
        .or_else(|| power_one_left(expr, step_collector))
        .or_else(|| power_zero_left(expr, step_collector))
        .or_else(|| power_power(expr, step_collector))
        .or_else(|| numeric_power(expr, step_collector))
        .or_else(|| distribute_power(expr, step_collector))
        .or_else(|| exp_log(expr, step_collector))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::primitive::rat;
    use pretty_assertions::assert_eq;

    fn pow(base: SymExpr, exp: SymExpr) -> Option<SymExpr> {
        numeric_power(&SymExpr::pow(base, exp), &mut ())
    }

    #[test]
    fn perfect_roots() {
        assert_eq!(pow(SymExpr::int(16), SymExpr::rational(rat(1, 2))), Some(SymExpr::int(4)));
        assert_eq!(pow(SymExpr::int(8), SymExpr::rational(rat(2, 3))), Some(SymExpr::int(4)));
    }

    #[test]
    fn roots_pull_out_square_factors() {
        let result = pow(SymExpr::int(12), SymExpr::rational(rat(1, 2))).unwrap();
        assert_eq!(result, SymExpr::Mul(vec![
            SymExpr::int(2),
            SymExpr::pow(SymExpr::int(3), SymExpr::rational(rat(1, 2))),
        ]));
    }

    #[test]
    fn irreducible_roots_stay() {
        assert_eq!(pow(SymExpr::int(2), SymExpr::rational(rat(1, 2))), None);
        assert_eq!(pow(SymExpr::neg_one(), SymExpr::rational(rat(1, 3))), None);
    }

    #[test]
    fn extract_square_factor() {
        assert_eq!(extract_root(&Integer::from(72), 2), 6);
        assert_eq!(extract_root(&Integer::from(54), 3), 3);
        assert_eq!(extract_root(&Integer::from(7), 2), 1);
    }

    #[test]
    fn exp_of_log() {
        let x = SymExpr::symbol("x");
        let expr = SymExpr::pow(
            SymExpr::e(),
            SymExpr::Mul(vec![SymExpr::int(2), SymExpr::call("log", vec![x.clone()])]),
        );
        assert_eq!(exp_log(&expr, &mut ()), Some(SymExpr::pow(x, SymExpr::int(2))));
    }
}
