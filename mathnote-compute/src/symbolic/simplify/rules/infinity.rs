//! Simplification rules for arithmetic involving infinities and undefined values.

use crate::symbolic::{
    expr::SymExpr,
    numeric,
    simplify::{rules::{do_add, do_multiply, do_power}, step::Step},
    step_collector::StepCollector,
};
use std::cmp::Ordering;

/// Returns the sign of an expression that contains no free symbols and no infinities, such as
/// `-2`, `pi` or `sqrt(2) - 1`.
fn constant_sign(expr: &SymExpr) -> Option<Ordering> {
    if let Some(n) = expr.as_number() {
        return Some(n.sign());
    }
    if !expr.free_symbols().is_empty() || expr.has_unbounded() {
        return None;
    }
    numeric::eval_real(expr).and_then(|value| value.cmp0())
}

/// Returns true if the expression is finite and free of symbols, so that an infinite term
/// absorbs it.
fn is_finite_constant(expr: &SymExpr) -> bool {
    expr.is_number() || (expr.free_symbols().is_empty() && !expr.has_unbounded())
}

fn is_nan(expr: &SymExpr) -> bool {
    expr.is_symbol("nan")
}

/// `nan + a = nan`, `nan * a = nan`, `f(nan) = nan`, etc.
pub fn nan_absorbs(expr: &SymExpr, step_collector: &mut dyn StepCollector<Step>) -> Option<SymExpr> {
    let has_nan = match expr {
        SymExpr::Add(children) | SymExpr::Mul(children) => children.iter().any(is_nan),
        SymExpr::Exp(base, exp) => is_nan(base) || is_nan(exp),
        SymExpr::Primary(_) => expr.as_call().is_some_and(|(_, args)| args.iter().any(is_nan)),
    };
    if !has_nan {
        return None;
    }

    step_collector.push(Step::NanAbsorbs);
    Some(SymExpr::nan())
}

/// `oo + a = oo` for finite constants `a`, and `oo - oo = nan`.
pub fn add_infinity(expr: &SymExpr, step_collector: &mut dyn StepCollector<Step>) -> Option<SymExpr> {
    let opt = do_add(expr, |terms| {
        let positive = terms.iter().any(SymExpr::is_infinity);
        let negative = terms.iter().any(SymExpr::is_neg_infinity);
        let complex = terms.iter().any(|term| term.is_symbol("zoo"));
        if !positive && !negative && !complex {
            return None;
        }
        if (positive && negative) || (complex && (positive || negative)) {
            return Some(SymExpr::nan());
        }

        let mut seen_infinite = false;
        let new_terms = terms.iter()
            .filter(|term| {
                if term.is_infinite() {
                    let keep = !seen_infinite;
                    seen_infinite = true;
                    keep
                } else {
                    !is_finite_constant(term)
                }
            })
            .cloned()
            .collect::<Vec<_>>();

        if new_terms.len() == terms.len() {
            None
        } else {
            Some(SymExpr::Add(new_terms).downgrade())
        }
    })?;

    step_collector.push(Step::AddInfinity);
    Some(opt)
}

/// `2*oo = oo`, `-3*oo = -oo`, `0*oo = nan`, and `a*zoo = zoo` for non-zero constants `a`.
pub fn multiply_infinity(expr: &SymExpr, step_collector: &mut dyn StepCollector<Step>) -> Option<SymExpr> {
    let opt = do_multiply(expr, |factors| {
        let infinity = factors.iter().any(SymExpr::is_infinity);
        let complex = factors.iter().any(|factor| factor.is_symbol("zoo"));
        if !infinity && !complex {
            return None;
        }
        if factors.iter().any(SymExpr::is_zero) {
            return Some(SymExpr::nan());
        }

        let mut sign = Ordering::Greater;
        let mut constants = 0;
        let mut rest = Vec::new();
        for factor in factors {
            match constant_sign(factor) {
                Some(factor_sign) if !factor.is_infinite() => {
                    constants += 1;
                    if factor_sign == Ordering::Less {
                        sign = sign.reverse();
                    }
                },
                _ => rest.push(factor.clone()),
            }
        }

        if complex {
            // zoo absorbs every constant and any real infinity
            let before = rest.len();
            rest.retain(|factor| !factor.is_infinity());
            if constants == 0 && rest.len() == before {
                return None;
            }
            return Some(SymExpr::Mul(rest).downgrade());
        }

        let unchanged = match sign {
            Ordering::Less => constants == 1 && factors.iter().any(SymExpr::is_neg_one),
            _ => constants == 0,
        };
        if unchanged {
            return None;
        }

        if sign == Ordering::Less {
            rest.insert(0, SymExpr::neg_one());
        }
        Some(SymExpr::Mul(rest).downgrade())
    })?;

    step_collector.push(Step::MultiplyInfinity);
    Some(opt)
}

/// Powers with an infinite base or exponent, such as `oo^2 = oo`, `2^oo = oo`, `(1/2)^oo = 0`,
/// and `1^oo = nan`.
pub fn power_infinity(expr: &SymExpr, step_collector: &mut dyn StepCollector<Step>) -> Option<SymExpr> {
    let opt = do_power(expr, |base, exp| {
        if base.is_infinity() || base.is_symbol("zoo") {
            return match constant_sign(exp)? {
                Ordering::Greater => Some(base.clone()),
                Ordering::Less => Some(SymExpr::zero()),
                Ordering::Equal => None,
            };
        }

        if base.is_neg_infinity() {
            let n = exp.as_integer()?;
            return Some(if n.cmp0() == Ordering::Less {
                SymExpr::zero()
            } else if n.is_even() {
                SymExpr::infinity()
            } else {
                SymExpr::neg_infinity()
            });
        }

        let towards_positive = exp.is_infinity();
        if !towards_positive && !exp.is_neg_infinity() {
            return None;
        }

        let value = numeric::eval_real(base).filter(|_| base.free_symbols().is_empty())?;
        let magnitude = value.clone().abs();
        if value == 1 {
            return Some(SymExpr::nan());
        }
        if value.cmp0() == Some(Ordering::Less) && magnitude >= 1 {
            return None;
        }

        let grows = (magnitude > 1) == towards_positive;
        if grows {
            if value.is_zero() || value.cmp0() == Some(Ordering::Less) {
                Some(SymExpr::complex_infinity())
            } else {
                Some(SymExpr::infinity())
            }
        } else {
            Some(SymExpr::zero())
        }
    })?;

    step_collector.push(Step::PowerInfinity);
    Some(opt)
}

/// Values of functions at infinity, such as `log(oo) = oo` and `atan(oo) = pi/2`.
pub fn function_of_infinity(expr: &SymExpr, step_collector: &mut dyn StepCollector<Step>) -> Option<SymExpr> {
    let (name, [arg]) = expr.as_call()? else {
        return None;
    };

    let positive = arg.is_infinity();
    let negative = arg.is_neg_infinity();
    if !positive && !negative {
        if arg.is_symbol("zoo") && matches!(name, "log" | "abs") {
            step_collector.push(Step::FunctionOfInfinity);
            return Some(if name == "abs" { SymExpr::infinity() } else { SymExpr::complex_infinity() });
        }
        return None;
    }

    let signed = |value: SymExpr| if positive { value } else { -value };
    let result = match name {
        "log" | "abs" | "cosh" => SymExpr::infinity(),
        "factorial" | "gamma" if positive => SymExpr::infinity(),
        "sinh" | "asinh" | "floor" | "ceiling" | "cbrt" => signed(SymExpr::infinity()),
        "acosh" if positive => SymExpr::infinity(),
        "atan" => signed(SymExpr::Mul(vec![SymExpr::rational((1, 2).into()), SymExpr::pi()])),
        "acot" | "sech" | "csch" => SymExpr::zero(),
        "tanh" | "coth" | "sign" => signed(SymExpr::one()),
        _ => return None,
    };

    step_collector.push(Step::FunctionOfInfinity);
    Some(result)
}

/// Applies all rules involving infinities and undefined values.
pub fn all(expr: &SymExpr, step_collector: &mut dyn StepCollector<Step>) -> Option<SymExpr> {
    nan_absorbs(expr, step_collector)
        .or_else(|| add_infinity(expr, step_collector))
        .or_else(|| multiply_infinity(expr, step_collector))
        .or_else(|| power_infinity(expr, step_collector))
        .or_else(|| function_of_infinity(expr, step_collector))
}
