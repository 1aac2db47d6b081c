//! Simplification rules for trigonometric functions.

mod consts;

use crate::primitive::rat;
use crate::symbolic::{
    expr::{Number, SymExpr},
    simplify::{rules::do_add, step::Step},
    step_collector::StepCollector,
};
use rug::Rational;
use std::cmp::Ordering;

/// Returns `c` if the expression is `c*pi` for an exact rational `c`.
fn pi_multiple(arg: &SymExpr) -> Option<Rational> {
    if arg.is_zero() && !arg.is_float() {
        return Some(Rational::new());
    }
    if arg.is_symbol("pi") {
        return Some(rat(1, 1));
    }

    let (coeff, rest) = arg.split_coefficient();
    match coeff {
        Number::Exact(c) if rest.is_symbol("pi") => Some(c),
        _ => None,
    }
}

/// Returns `c*pi` as an expression.
fn angle(c: Rational) -> SymExpr {
    if c.cmp0() == Ordering::Equal {
        SymExpr::zero()
    } else if c == 1 {
        SymExpr::pi()
    } else {
        SymExpr::Mul(vec![SymExpr::rational(c), SymExpr::pi()])
    }
}

/// Computes the exact value of `sin(c*pi)`, if `c*pi` is a well-known angle.
fn sin_of(c: &Rational) -> Option<SymExpr> {
    // normalize into [0, 2), then use sin(x) = -sin(x - pi) and sin(x) = sin(pi - x)
    let two = Rational::from(2);
    let turns = Rational::from(c / &two).floor();
    let mut c = Rational::from(c - turns * &two);
    let mut negate = false;
    if c > 1 {
        c -= 1;
        negate = true;
    }
    if c > rat(1, 2) {
        c = Rational::from(1) - c;
    }

    let (_, value) = consts::SIN_QUADRANT.iter().find(|(angle, _)| *angle == c)?;
    Some(if negate { -value.clone() } else { value.clone() })
}

/// Computes the exact value of `cos(c*pi) = sin(c*pi + pi/2)`.
fn cos_of(c: &Rational) -> Option<SymExpr> {
    sin_of(&Rational::from(c + rat(1, 2)))
}

/// Returns `numerator / denominator`, or `zoo` if the denominator is zero. The quotient is
/// simplified by later passes.
fn ratio(numerator: SymExpr, denominator: SymExpr) -> SymExpr {
    if denominator.is_zero() {
        SymExpr::complex_infinity()
    } else {
        numerator * denominator.recip()
    }
}

/// Exact values of the six trigonometric functions at multiples of `pi/6` and `pi/4`.
///
/// `sin(pi/6) = 1/2`
/// `cos(pi) = -1`
/// `tan(pi/3) = sqrt(3)`
/// `sec(pi/2) = zoo`
pub fn known_values(expr: &SymExpr, step_collector: &mut dyn StepCollector<Step>) -> Option<SymExpr> {
    let (name, [arg]) = expr.as_call()? else {
        return None;
    };
    let c = match name {
        "sin" | "cos" | "tan" | "cot" | "sec" | "csc" => pi_multiple(arg)?,
        _ => return None,
    };

    let (opt, step) = match name {
        "sin" => (sin_of(&c)?, Step::Sin),
        "cos" => (cos_of(&c)?, Step::Cos),
        "tan" => (ratio(sin_of(&c)?, cos_of(&c)?), Step::Tan),
        "cot" => (ratio(cos_of(&c)?, sin_of(&c)?), Step::Cot),
        "sec" => (ratio(SymExpr::one(), cos_of(&c)?), Step::Sec),
        _ => (ratio(SymExpr::one(), sin_of(&c)?), Step::Csc),
    };

    step_collector.push(step);
    Some(opt)
}

/// Functions with `f(-x) = -f(x)`.
const ODD: [&str; 14] = [
    "sin", "tan", "cot", "csc", "asin", "atan", "acot", "acsc",
    "sinh", "tanh", "coth", "csch", "asinh", "atanh",
];

/// Functions with `f(-x) = f(x)`.
const EVEN: [&str; 4] = ["cos", "sec", "cosh", "sech"];

/// Pulls a negative coefficient out of the argument of an odd or even function.
///
/// `sin(-x) = -sin(x)`
/// `cos(-2x) = cos(2x)`
pub fn parity(expr: &SymExpr, step_collector: &mut dyn StepCollector<Step>) -> Option<SymExpr> {
    let (name, [arg]) = expr.as_call()? else {
        return None;
    };
    let odd = ODD.contains(&name);
    if (!odd && !EVEN.contains(&name)) || !arg.is_negated() || arg.is_float() {
        return None;
    }

    let (coeff, rest) = arg.split_coefficient();
    let coeff = coeff.neg();
    let positive = if coeff.is_one() {
        rest
    } else if rest.is_one() {
        coeff.into_expr()
    } else {
        coeff.into_expr() * rest
    };
    let call = SymExpr::call(name, vec![positive]);

    step_collector.push(Step::Parity);
    Some(if odd { -call } else { call })
}

/// Looks up `value` in the given table of inverse function values.
fn lookup(table: &[(SymExpr, Rational)], value: &SymExpr) -> Option<Rational> {
    table.iter()
        .find(|(input, _)| input == value)
        .map(|(_, c)| c.clone())
}

/// Exact values of inverse trigonometric functions, and compositions of a function with its
/// inverse.
///
/// `asin(1/2) = pi/6`
/// `acos(0) = pi/2`
/// `atan(1) = pi/4`
/// `sin(asin(x)) = x`
pub fn inverse(expr: &SymExpr, step_collector: &mut dyn StepCollector<Step>) -> Option<SymExpr> {
    let (name, [arg]) = expr.as_call()? else {
        return None;
    };

    let opt = match name {
        "asin" => angle(lookup(&consts::ASIN_TABLE, arg)?),
        "acos" => angle(rat(1, 2) - lookup(&consts::ASIN_TABLE, arg)?),
        "atan" => angle(lookup(&consts::ATAN_TABLE, arg)?),
        "acot" => angle(lookup(&consts::ACOT_TABLE, arg)?),
        "asec" if arg.is_one() => SymExpr::zero(),
        "acsc" if arg.is_one() => angle(rat(1, 2)),
        "sin" => arg.as_unary_call("asin")?.clone(),
        "cos" => arg.as_unary_call("acos")?.clone(),
        "tan" => arg.as_unary_call("atan")?.clone(),
        "cot" => arg.as_unary_call("acot")?.clone(),
        _ => return None,
    };

    step_collector.push(Step::InverseTrig);
    Some(opt)
}

/// Splits a term of the form `rest * f(arg)^2`, returning `arg` and `rest`.
fn split_square<'a>(term: &'a SymExpr, func: &str) -> Option<(&'a SymExpr, SymExpr)> {
    let factors = term.factors();
    let (i, arg) = factors.iter()
        .enumerate()
        .find_map(|(i, factor)| match factor {
            SymExpr::Exp(base, exp) if exp.as_integer().is_some_and(|n| *n == 2) => {
                base.as_unary_call(func).map(|arg| (i, arg))
            },
            _ => None,
        })?;

    let rest = factors.iter()
        .enumerate()
        .filter(|&(j, _)| j != i)
        .map(|(_, factor)| factor.clone())
        .collect::<Vec<_>>();
    Some((arg, SymExpr::Mul(rest).downgrade()))
}

/// The Pythagorean identity, applied to a pair of terms with the same cofactor.
///
/// `sin(x)^2 + cos(x)^2 = 1`
/// `2*sin(x)^2 + 2*cos(x)^2 = 2`
pub fn pythagorean(expr: &SymExpr, step_collector: &mut dyn StepCollector<Step>) -> Option<SymExpr> {
    let opt = do_add(expr, |terms| {
        for (i, term) in terms.iter().enumerate() {
            let Some((arg, rest)) = split_square(term, "sin") else {
                continue;
            };
            let partner = terms.iter()
                .enumerate()
                .position(|(j, other)| j != i && split_square(other, "cos") == Some((arg, rest.clone())));
            let Some(j) = partner else {
                continue;
            };

            let mut new_terms = terms.iter()
                .enumerate()
                .filter(|&(k, _)| k != i && k != j)
                .map(|(_, term)| term.clone())
                .collect::<Vec<_>>();
            new_terms.push(rest);
            return Some(SymExpr::Add(new_terms).downgrade());
        }
        None
    })?;

    step_collector.push(Step::Pythagorean);
    Some(opt)
}

/// Applies all trigonometric rules.
pub fn all(expr: &SymExpr, step_collector: &mut dyn StepCollector<Step>) -> Option<SymExpr> {
    known_values(expr, step_collector)
        .or_else(|| inverse(expr, step_collector))
        .or_else(|| parity(expr, step_collector))
        .or_else(|| pythagorean(expr, step_collector))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn reduce_into_first_quadrant() {
        assert_eq!(sin_of(&rat(1, 6)), Some(SymExpr::rational(rat(1, 2))));
        assert_eq!(sin_of(&rat(5, 6)), Some(SymExpr::rational(rat(1, 2))));
        assert_eq!(sin_of(&rat(7, 6)), Some(SymExpr::rational(rat(-1, 2))));
        assert_eq!(sin_of(&rat(-1, 2)), Some(SymExpr::neg_one()));
        assert_eq!(cos_of(&rat(2, 1)), Some(SymExpr::one()));
        assert_eq!(sin_of(&rat(1, 5)), None);
    }

    #[test]
    fn odd_functions() {
        let expr = SymExpr::call("sin", vec![-SymExpr::symbol("x")]);
        assert_eq!(
            parity(&expr, &mut ()),
            Some(-SymExpr::call("sin", vec![SymExpr::symbol("x")])),
        );

        let expr = SymExpr::call("cos", vec![SymExpr::int(-2)]);
        assert_eq!(parity(&expr, &mut ()), Some(SymExpr::call("cos", vec![SymExpr::int(2)])));
    }

    #[test]
    fn pythagorean_identity() {
        let x = SymExpr::symbol("x");
        let sin2 = SymExpr::pow(SymExpr::call("sin", vec![x.clone()]), SymExpr::int(2));
        let cos2 = SymExpr::pow(SymExpr::call("cos", vec![x.clone()]), SymExpr::int(2));

        let expr = SymExpr::Add(vec![sin2.clone(), cos2.clone()]);
        assert_eq!(pythagorean(&expr, &mut ()), Some(SymExpr::one()));

        // other terms are kept, and a shared cofactor remains
        let expr = SymExpr::Add(vec![
            SymExpr::int(3) * cos2.clone(),
            x.clone(),
            SymExpr::int(3) * sin2.clone(),
        ]);
        assert_eq!(pythagorean(&expr, &mut ()), Some(SymExpr::Add(vec![x.clone(), SymExpr::int(3)])));

        // different arguments do not combine
        let cos2y = SymExpr::pow(SymExpr::call("cos", vec![SymExpr::symbol("y")]), SymExpr::int(2));
        assert_eq!(pythagorean(&SymExpr::Add(vec![sin2, cos2y]), &mut ()), None);
    }

    #[test]
    fn inverse_functions() {
        let expr = SymExpr::call("acos", vec![SymExpr::zero()]);
        assert_eq!(
            inverse(&expr, &mut ()),
            Some(SymExpr::Mul(vec![SymExpr::rational(rat(1, 2)), SymExpr::pi()])),
        );
    }
}
