//! Symbolic integration.
//!
//! Antiderivatives are searched for with a small set of strategies, tried in order:
//!
//! 1. linearity: sums are integrated term by term, and factors free of the variable are pulled
//! out of products;
//! 2. a table of powers, exponentials and builtin functions of a linear argument `a*x + b`;
//! 3. rational functions whose denominator is linear or quadratic;
//! 4. integration by parts, for a polynomial times an exponential, trigonometric, hyperbolic or
//! logarithmic function;
//! 5. products of an exponential and a sine or cosine;
//! 6. expansion of products and powers of sums;
//! 7. substitution `u = g(x)`, for integrands of the form `f(g(x)) * g'(x)`.
//!
//! Definite integrals evaluate the antiderivative at both bounds, taking a limit where the bound
//! is infinite or the antiderivative is undefined at the bound.
//!
//! ```
//! use mathnote_compute::symbolic::{integral::integrate, parse_expr};
//!
//! let f = parse_expr("3*x^2 + cos(x)").unwrap();
//! assert_eq!(integrate(&f, "x").unwrap().to_string(), "x**3 + sin(x)");
//! ```

use crate::primitive::rat;
use log::debug;
use mathnote_error::Error;
use std::cmp::Ordering;
use super::{
    derivative::derive,
    error::CannotIntegrate,
    expand::{expand, numer_denom},
    expr::SymExpr,
    limit::{limit, Direction},
    numeric,
    poly::Poly,
    simplify,
};

/// The maximum nesting of strategies that call back into [`antiderivative`].
const MAX_DEPTH: usize = 4;

fn call(name: &str, arg: SymExpr) -> SymExpr {
    SymExpr::call(name, vec![arg])
}

fn square(expr: SymExpr) -> SymExpr {
    SymExpr::pow(expr, SymExpr::int(2))
}

/// If `u = a*x + b` with `a != 0` free of `x`, returns `a`.
fn linear_coefficient(u: &SymExpr, x: &str) -> Option<SymExpr> {
    if u.is_symbol(x) {
        return Some(SymExpr::one());
    }
    let poly = Poly::from_expr(u, x)?;
    (poly.degree() == 1).then(|| poly.coeff(1))
}

/// Returns the sign of a constant expression.
fn constant_sign(expr: &SymExpr) -> Option<Ordering> {
    if !expr.free_symbols().is_empty() {
        return None;
    }
    numeric::eval_real(expr)?.cmp0()
}

/// Splits a product into the factors free of `x` and the factors that depend on `x`.
fn split_constant(f: &SymExpr, x: &str) -> (SymExpr, SymExpr) {
    let (constant, dependent): (Vec<_>, Vec<_>) = f.factors()
        .iter()
        .cloned()
        .partition(|factor| !factor.contains_symbol(x));
    (SymExpr::Mul(constant).downgrade(), SymExpr::Mul(dependent).downgrade())
}

/// `∫ f(u) du` for builtin functions `f`.
fn function_table(name: &str, u: SymExpr) -> Option<SymExpr> {
    let one = SymExpr::one;
    let half = || SymExpr::rational(rat(1, 2));
    Some(match name {
        "sin" => -call("cos", u),
        "cos" => call("sin", u),
        "tan" => -call("log", call("cos", u)),
        "cot" => call("log", call("sin", u)),
        "sec" => call("log", call("tan", u.clone()) + call("sec", u)),
        "csc" => -call("log", call("cot", u.clone()) + call("csc", u)),
        "sinh" => call("cosh", u),
        "cosh" => call("sinh", u),
        "tanh" => call("log", call("cosh", u)),
        "coth" => call("log", call("sinh", u)),
        "log" => u.clone() * call("log", u.clone()) - u,
        "asin" => u.clone() * call("asin", u.clone()) + (one() - square(u)).sqrt(),
        "acos" => u.clone() * call("acos", u.clone()) - (one() - square(u)).sqrt(),
        "atan" => u.clone() * call("atan", u.clone()) - half() * call("log", square(u) + one()),
        "acot" => u.clone() * call("acot", u.clone()) + half() * call("log", square(u) + one()),
        "asinh" => u.clone() * call("asinh", u.clone()) - (square(u) + one()).sqrt(),
        "acosh" => u.clone() * call("acosh", u.clone()) - (square(u) - one()).sqrt(),
        "atanh" => u.clone() * call("atanh", u.clone()) + half() * call("log", one() - square(u)),
        "abs" => half() * u.clone() * call("abs", u),
        "sign" => call("abs", u),
        _ => return None,
    })
}

/// `∫ (a*x^2 + c)^(-1/2) dx`, giving inverse sine or inverse hyperbolic functions.
fn inverse_sqrt_quadratic(base: &SymExpr, x: &str) -> Option<SymExpr> {
    let poly = Poly::from_expr(base, x)?;
    if poly.degree() != 2 || !poly.coeff(1).is_zero() {
        return None;
    }
    let (a, c) = (poly.coeff(2), poly.coeff(0));
    let scale = |a: SymExpr, c: SymExpr| simplify(&(a / c).sqrt()) * SymExpr::symbol(x);

    Some(match (constant_sign(&a)?, constant_sign(&c)?) {
        (Ordering::Less, Ordering::Greater) => {
            call("asin", scale(-a.clone(), c)) * (-a).sqrt().recip()
        },
        (Ordering::Greater, Ordering::Greater) => {
            call("asinh", scale(a.clone(), c)) * a.sqrt().recip()
        },
        (Ordering::Greater, Ordering::Less) => {
            call("acosh", scale(a.clone(), -c)) * a.sqrt().recip()
        },
        _ => return None,
    })
}

/// Antiderivatives of single powers, exponentials, and function calls with a linear argument.
fn table(f: &SymExpr, x: &str) -> Option<SymExpr> {
    if f.is_symbol(x) {
        return Some(square(f.clone()) / SymExpr::int(2));
    }

    if let SymExpr::Exp(base, exp) = f {
        let (base, exp) = (&**base, &**exp);
        match (base.contains_symbol(x), exp.contains_symbol(x)) {
            // (a*x + b)^n
            (true, false) => {
                if let Some(a) = linear_coefficient(base, x) {
                    if exp.is_neg_one() {
                        return Some(call("log", base.clone()) / a);
                    }
                    let next = simplify(&(exp.clone() + SymExpr::one()));
                    return Some(SymExpr::pow(base.clone(), next.clone()) * (a * next).recip());
                }
                if *exp == SymExpr::rational(rat(-1, 2)) {
                    return inverse_sqrt_quadratic(base, x);
                }
                // sec(u)^2 and friends
                if exp.as_integer().is_some_and(|n| *n == 2) {
                    let (name, [u]) = base.as_call()? else {
                        return None;
                    };
                    let a = linear_coefficient(u, x)?;
                    let value = match name {
                        "sec" => call("tan", u.clone()),
                        "csc" => -call("cot", u.clone()),
                        "sech" => call("tanh", u.clone()),
                        "csch" => -call("coth", u.clone()),
                        _ => return None,
                    };
                    return Some(value / a);
                }
                return None;
            },
            // b^(a*x + c)
            (false, true) => {
                let a = linear_coefficient(exp, x)?;
                if base.is_symbol("E") {
                    return Some(f.clone() / a);
                }
                return Some(f.clone() * (a * call("log", base.clone())).recip());
            },
            _ => return None,
        }
    }

    let (name, [u]) = f.as_call()? else {
        return None;
    };
    let a = linear_coefficient(u, x)?;
    Some(function_table(name, u.clone())? / a)
}

/// `∫ 1 / (a*x^2 + b*x + c) dx` for constant coefficients.
fn inverse_quadratic(a: &SymExpr, b: &SymExpr, c: &SymExpr, x: &str) -> Option<SymExpr> {
    let x = SymExpr::symbol(x);
    let two_a = simplify(&(SymExpr::int(2) * a.clone()));
    let discriminant = simplify(&(square(b.clone()) - SymExpr::int(4) * a.clone() * c.clone()));
    let linear = two_a.clone() * x.clone() + b.clone();

    Some(match constant_sign(&discriminant)? {
        Ordering::Less => {
            let s = simplify(&(-discriminant).sqrt());
            SymExpr::int(2) / s.clone() * call("atan", linear / s)
        },
        Ordering::Greater => {
            let s = simplify(&discriminant.sqrt());
            let r1 = simplify(&((-b.clone() + s.clone()) / two_a.clone()));
            let r2 = simplify(&((-b.clone() - s.clone()) / two_a));
            (call("log", x.clone() - r1) - call("log", x - r2)) / s
        },
        Ordering::Equal => SymExpr::int(-2) * linear.recip(),
    })
}

/// Rational functions whose denominator is a polynomial of degree one or two.
fn rational(f: &SymExpr, x: &str) -> Option<SymExpr> {
    let (numer, denom) = numer_denom(f);
    if !denom.contains_symbol(x) {
        return None;
    }
    let d = Poly::from_expr(&denom, x)?;
    let n = Poly::from_expr(&numer, x)?;
    let (q, r) = n.divide(&d)?;
    let polynomial = q.integral().to_expr(x);

    let remainder = match d.degree() {
        1 => r.coeff(0) * call("log", denom.clone()) / d.coeff(1),
        2 => {
            let (a, b, c) = (d.coeff(2), d.coeff(1), d.coeff(0));
            let (p1, p0) = (r.coeff(1), r.coeff(0));

            // (p1*x + p0) / q = p1/(2a) * q'/q + (p0 - p1*b/(2a)) / q
            let mut terms = Vec::new();
            if !p1.is_zero() {
                let scale = simplify(&(p1.clone() / (SymExpr::int(2) * a.clone())));
                terms.push(scale.clone() * call("log", denom.clone()));
                let rest = simplify(&(p0 - scale * b.clone()));
                if !rest.is_zero() {
                    terms.push(rest * inverse_quadratic(&a, &b, &c, x)?);
                }
            } else if !p0.is_zero() {
                terms.push(p0 * inverse_quadratic(&a, &b, &c, x)?);
            }
            SymExpr::Add(terms).downgrade()
        },
        _ => return None,
    };
    Some(polynomial + remainder)
}

/// Returns true if repeated integration of `g` always succeeds through the table, so that the
/// tabular method of integration by parts terminates.
fn is_cyclic(g: &SymExpr, x: &str) -> bool {
    match g {
        SymExpr::Exp(base, exp) => !base.contains_symbol(x) && linear_coefficient(exp, x).is_some(),
        _ => g.as_call().is_some_and(|(name, args)| {
            matches!(name, "sin" | "cos" | "sinh" | "cosh" | "exp")
                && args.len() == 1
                && linear_coefficient(&args[0], x).is_some()
        }),
    }
}

/// Integration by parts, for a polynomial `p` times a function `g`.
///
/// If `g` can be integrated repeatedly, `∫ p*g = p*G1 - p'*G2 + p''*G3 - ...`, which terminates
/// once the polynomial is differentiated to zero. If `g = log(u)`, `∫ p*log(u) = P*log(u) - ∫ P*u'/u`,
/// where `P` is the antiderivative of `p`.
fn by_parts(f: &SymExpr, x: &str, depth: usize) -> Option<SymExpr> {
    let (polynomial, others): (Vec<_>, Vec<_>) = f.factors()
        .iter()
        .cloned()
        .partition(|factor| Poly::from_expr(factor, x).is_some());
    let [g] = others.as_slice() else {
        return None;
    };
    if polynomial.is_empty() {
        return None;
    }
    let p = Poly::from_expr(&SymExpr::Mul(polynomial), x)?;

    if let Some(u) = g.as_unary_call("log") {
        let a = linear_coefficient(u, x)?;
        let big_p = p.integral().to_expr(x);
        let rest = simplify(&(big_p.clone() * a * u.clone().recip()));
        let rest = antiderivative(&rest, x, depth + 1)?;
        return Some(big_p * g.clone() - rest);
    }

    if !is_cyclic(g, x) {
        return None;
    }

    let mut terms = Vec::new();
    let mut p = p;
    let mut integral = antiderivative(g, x, depth + 1)?;
    let mut positive = true;
    loop {
        let term = p.to_expr(x) * integral.clone();
        terms.push(if positive { term } else { -term });

        p = p.derivative();
        if p.is_zero() {
            break;
        }
        integral = antiderivative(&simplify(&integral), x, depth + 1)?;
        positive = !positive;
    }
    Some(SymExpr::Add(terms))
}

/// `∫ exp(a*x + b) * sin(c*x + d)` and `∫ exp(a*x + b) * cos(c*x + d)`.
fn exp_trig_product(f: &SymExpr, x: &str) -> Option<SymExpr> {
    let [first, second] = f.factors() else {
        return None;
    };
    let (exp, trig) = if first.as_call().is_some() { (second, first) } else { (first, second) };

    let SymExpr::Exp(base, exponent) = exp else {
        return None;
    };
    if !base.is_symbol("E") {
        return None;
    }
    let a = linear_coefficient(exponent, x)?;
    let (name, [v]) = trig.as_call()? else {
        return None;
    };
    let c = linear_coefficient(v, x)?;

    let sin = call("sin", v.clone());
    let cos = call("cos", v.clone());
    let combination = match name {
        "sin" => a.clone() * sin - c.clone() * cos,
        "cos" => a.clone() * cos + c.clone() * sin,
        _ => return None,
    };
    Some(exp.clone() * combination * (square(a) + square(c)).recip())
}

/// Substitution `u = g(x)`: if `f / g'(x)` can be written in terms of `u` alone, integrates it
/// with respect to `u`.
fn substitution(f: &SymExpr, x: &str, depth: usize) -> Option<SymExpr> {
    let mut candidates: Vec<&SymExpr> = Vec::new();
    for node in f.post_order_iter() {
        if node.is_symbol(x) || !node.contains_symbol(x) || node.is_identical(f) {
            continue;
        }
        if !candidates.contains(&node) {
            candidates.push(node);
        }
    }

    let t = f.fresh_symbol("_u");
    let u_symbol = SymExpr::symbol(t.as_str());
    candidates.into_iter().find_map(|u| {
        let du = derive(u, x).ok()?;
        if du.is_zero() {
            return None;
        }
        let in_u = simplify(&simplify(&(f.clone() * du.recip())).replace(u, &u_symbol));
        if in_u.contains_symbol(x) {
            return None;
        }
        let integral = antiderivative(&in_u, &t, depth + 1)?;
        Some(integral.subs(&t, u))
    })
}

/// Searches for an antiderivative of the simplified expression `f`.
fn antiderivative(f: &SymExpr, x: &str, depth: usize) -> Option<SymExpr> {
    if depth > MAX_DEPTH {
        return None;
    }
    if !f.contains_symbol(x) {
        return Some(f.clone() * SymExpr::symbol(x));
    }

    if let SymExpr::Add(terms) = f {
        let integrals = terms.iter()
            .map(|term| antiderivative(term, x, depth))
            .collect::<Option<Vec<_>>>()?;
        return Some(SymExpr::Add(integrals));
    }

    let (constant, dependent) = split_constant(f, x);
    if !constant.is_one() {
        return antiderivative(&dependent, x, depth).map(|g| constant * g);
    }

    table(f, x)
        .or_else(|| rational(f, x))
        .or_else(|| by_parts(f, x, depth))
        .or_else(|| exp_trig_product(f, x))
        .or_else(|| {
            let expanded = expand(f);
            if matches!(expanded, SymExpr::Add(_)) && !expanded.is_identical(f) {
                antiderivative(&expanded, x, depth + 1)
            } else {
                None
            }
        })
        .or_else(|| substitution(f, x, depth))
}

/// Computes an antiderivative of `f` with respect to `var`. The constant of integration is
/// omitted.
pub fn integrate(f: &SymExpr, var: &str) -> Result<SymExpr, Error> {
    let f = simplify(f);
    let integral = antiderivative(&f, var, 0)
        .map(|integral| simplify(&integral))
        .ok_or_else(|| Error::new(vec![], CannotIntegrate { expr: f.to_string() }))?;
    debug!("∫ {} d{} = {}", f, var, integral);
    Ok(integral)
}

/// Evaluates an antiderivative at a bound of integration. If the bound is infinite, or the
/// antiderivative is undefined there, the limit from inside the interval is taken instead.
fn at_bound(antiderivative: &SymExpr, var: &str, bound: &SymExpr, inside: Direction) -> Result<SymExpr, Error> {
    if !bound.has_unbounded() {
        let value = simplify(&antiderivative.subs(var, bound));
        if !value.has_unbounded() {
            return Ok(value);
        }
    }
    limit(antiderivative, var, bound, inside)
}

/// Computes the definite integral of `f` with respect to `var` from `lower` to `upper`.
pub fn integrate_definite(
    f: &SymExpr,
    var: &str,
    lower: &SymExpr,
    upper: &SymExpr,
) -> Result<SymExpr, Error> {
    let lower = simplify(lower);
    let upper = simplify(upper);
    if lower == upper {
        return Ok(SymExpr::zero());
    }

    let antiderivative = integrate(f, var)?;
    let at_upper = at_bound(&antiderivative, var, &upper, Direction::Left)?;
    let at_lower = at_bound(&antiderivative, var, &lower, Direction::Right)?;
    Ok(simplify(&(at_upper - at_lower)))
}
