//! Limits of expressions.
//!
//! A limit is first attempted by direct substitution. If substitution produces an indeterminate
//! form, the expression is rewritten and the limit is attempted again:
//!
//! - poles (substitution produces `zoo`) are resolved to `oo` or `-oo` by the sign of the
//! expression near the point;
//! - rational functions at infinity are compared by degree;
//! - `f^g` is rewritten as `exp(g*log(f))`, which covers `1^oo`, `0^0` and `oo^0`;
//! - `0/0` and `oo/oo` quotients, and `0*oo` products, are resolved with L'Hôpital's rule;
//! - sums are combined over a common denominator;
//! - limits at infinity are rewritten as limits at zero, through `x = 1/t`.
//!
//! ```
//! use mathnote_compute::symbolic::{limit::{limit, Direction}, parse_expr};
//!
//! let f = parse_expr("sin(x)/x").unwrap();
//! let l = limit(&f, "x", &parse_expr("0").unwrap(), Direction::Right).unwrap();
//! assert_eq!(l.to_string(), "1");
//! ```

use crate::primitive::float;
use log::debug;
use mathnote_error::Error;
use std::{cmp::Ordering, fmt};
use super::{
    derivative::derive,
    error::{CannotComputeLimit, LimitDoesNotExist},
    expand::{numer_denom, together},
    expr::{Primary, SymExpr},
    numeric,
    poly::Poly,
    simplify,
};

/// The maximum number of nested rewrites attempted for a single limit.
const MAX_DEPTH: usize = 8;

/// The direction from which a finite point is approached.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// From above, `+`.
    Right,

    /// From below, `-`.
    Left,

    /// From both sides, `+-`. The limit exists only if both one-sided limits agree.
    Both,
}

impl Direction {
    /// Parses the direction from its symbol: `+`, `-`, or `+-`.
    pub fn from_symbol(s: &str) -> Option<Self> {
        match s {
            "+" => Some(Self::Right),
            "-" => Some(Self::Left),
            "+-" => Some(Self::Both),
            _ => None,
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Right => write!(f, "+"),
            Self::Left => write!(f, "-"),
            Self::Both => write!(f, "+-"),
        }
    }
}

/// One side of a point.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Side {
    Left,
    Right,
}

/// Returns true if the value is a usable result of a limit: a finite value free of infinities,
/// or exactly `oo` or `-oo`.
fn is_determinate(value: &SymExpr) -> bool {
    !value.has_undefined()
        && (!value.has_unbounded() || value.is_infinity() || value.is_neg_infinity())
}

/// Evaluates the expression numerically just beside the point. Points at infinity are probed at
/// a large finite value.
fn probe(f: &SymExpr, x: &str, point: &SymExpr, side: Side) -> Option<rug::Float> {
    let at = if point.is_infinity() {
        SymExpr::Primary(Primary::Float(float(1e40)))
    } else if point.is_neg_infinity() {
        SymExpr::Primary(Primary::Float(float(-1e40)))
    } else {
        probe_point(point, side)?
    };
    numeric::eval_real(&f.subs(x, &at))
}

/// Returns `oo` or `-oo`, with the sign the expression has near the point.
fn signed_infinity(f: &SymExpr, x: &str, point: &SymExpr, side: Side) -> Option<SymExpr> {
    match probe(f, x, point, side)?.cmp0()? {
        Ordering::Greater => Some(SymExpr::infinity()),
        Ordering::Less => Some(SymExpr::neg_infinity()),
        Ordering::Equal => None,
    }
}

/// Replaces the first call to a piecewise-constant function by its value just beside the point.
fn resolve_jump(f: &SymExpr, x: &str, point: &SymExpr, side: Side) -> Option<SymExpr> {
    let call = f.post_order_iter().find(|e| {
        e.as_call().is_some_and(|(name, args)| {
            matches!(name, "floor" | "ceiling" | "sign") && args.iter().any(|a| a.contains_symbol(x))
        })
    })?;
    let value = numeric::eval_integer(&call.subs(x, &probe_point(point, side)?))?;
    Some(f.replace(call, &SymExpr::int(value)))
}

/// The numeric point just beside a finite point.
fn probe_point(point: &SymExpr, side: Side) -> Option<SymExpr> {
    let center = numeric::eval_real(point)?;
    let value = match side {
        Side::Right => center + float(1e-40),
        Side::Left => center - float(1e-40),
    };
    Some(SymExpr::Primary(Primary::Float(value)))
}

/// Limits of rational functions at infinity, by comparing the degrees of the numerator and
/// denominator.
fn rational_at_infinity(f: &SymExpr, x: &str, point: &SymExpr) -> Option<SymExpr> {
    let (numer, denom) = numer_denom(f);
    let numer = Poly::from_expr(&numer, x)?;
    let denom = Poly::from_expr(&denom, x)?;
    if numer.is_zero() || denom.is_zero() {
        return None;
    }

    let lead = simplify(&(numer.coeff(numer.degree()) / denom.coeff(denom.degree())));
    match numer.degree().cmp(&denom.degree()) {
        Ordering::Less => Some(SymExpr::zero()),
        Ordering::Equal => Some(lead),
        Ordering::Greater => {
            let mut sign = lead.as_number()?.sign();
            if point.is_neg_infinity() && (numer.degree() - denom.degree()) % 2 == 1 {
                sign = sign.reverse();
            }
            match sign {
                Ordering::Greater => Some(SymExpr::infinity()),
                Ordering::Less => Some(SymExpr::neg_infinity()),
                Ordering::Equal => None,
            }
        },
    }
}

/// Applies L'Hôpital's rule to `numer / denom`.
fn lhopital(numer: &SymExpr, denom: &SymExpr, x: &str, point: &SymExpr, side: Side, depth: usize) -> Option<SymExpr> {
    let dn = derive(numer, x).ok()?;
    let dd = derive(denom, x).ok()?;
    if dd.is_zero() {
        return None;
    }
    limit_at(&(dn * dd.recip()), x, point, side, depth + 1)
}

/// Limits of quotients.
fn quotient(f: &SymExpr, x: &str, point: &SymExpr, side: Side, depth: usize) -> Option<SymExpr> {
    let (numer, denom) = numer_denom(f);
    if denom.is_one() {
        return None;
    }

    let n = limit_at(&numer, x, point, side, depth + 1)?;
    let d = limit_at(&denom, x, point, side, depth + 1)?;
    if (n.is_zero() && d.is_zero()) || (n.is_infinite() && d.is_infinite()) {
        return lhopital(&numer, &denom, x, point, side, depth);
    }
    if d.is_zero() {
        return signed_infinity(f, x, point, side);
    }
    if d.is_infinite() {
        return Some(SymExpr::zero());
    }

    let value = simplify(&(n * d.recip()));
    is_determinate(&value).then_some(value)
}

/// Limits of products, resolving `0*oo` by rewriting the product as a quotient.
fn product(f: &SymExpr, x: &str, point: &SymExpr, side: Side, depth: usize) -> Option<SymExpr> {
    let SymExpr::Mul(factors) = f else {
        return None;
    };

    let limits = factors.iter()
        .map(|factor| limit_at(factor, x, point, side, depth + 1))
        .collect::<Option<Vec<_>>>()?;

    let zero = limits.iter().position(SymExpr::is_zero);
    let infinite = limits.iter().position(SymExpr::is_infinite);
    if let (Some(zero), Some(_)) = (zero, infinite) {
        let g = factors[zero].clone();
        let h = SymExpr::Mul(
            factors.iter().enumerate().filter(|(i, _)| *i != zero).map(|(_, f)| f.clone()).collect(),
        ).downgrade();

        // logarithms shrink under differentiation, so they go in the numerator
        let log_first = h.post_order_iter().any(|e| e.as_unary_call("log").is_some());
        let (first, second) = if log_first {
            ((h.clone(), simplify(&g.clone().recip())), (g, simplify(&h.recip())))
        } else {
            ((g.clone(), simplify(&h.clone().recip())), (h, simplify(&g.recip())))
        };
        return lhopital(&first.0, &first.1, x, point, side, depth)
            .or_else(|| lhopital(&second.0, &second.1, x, point, side, depth));
    }

    let value = simplify(&SymExpr::Mul(limits));
    is_determinate(&value).then_some(value)
}

/// Computes a one-sided limit, or the limit at infinity.
fn limit_at(f: &SymExpr, x: &str, point: &SymExpr, side: Side, depth: usize) -> Option<SymExpr> {
    if depth > MAX_DEPTH {
        return None;
    }

    let f = simplify(f);
    if !f.contains_symbol(x) {
        return Some(f);
    }
    let at_infinity = point.is_infinity() || point.is_neg_infinity();

    if let SymExpr::Exp(base, exp) = &f {
        if base.contains_symbol(x) && exp.contains_symbol(x) {
            let log = (**exp).clone() * SymExpr::call("log", vec![(**base).clone()]);
            let value = limit_at(&log, x, point, side, depth + 1)?;
            return Some(simplify(&SymExpr::pow(SymExpr::e(), value)));
        }
    }

    if !at_infinity {
        if let Some(resolved) = resolve_jump(&f, x, point, side) {
            return limit_at(&resolved, x, point, side, depth + 1);
        }
    }

    let direct = simplify(&f.subs(x, point));
    if is_determinate(&direct) {
        return Some(direct);
    }
    if direct.is_symbol("zoo") && !at_infinity {
        return signed_infinity(&f, x, point, side);
    }

    if at_infinity {
        if let Some(value) = rational_at_infinity(&f, x, point) {
            return Some(value);
        }
    }

    if let Some(value) = quotient(&f, x, point, side, depth)
        .or_else(|| product(&f, x, point, side, depth))
    {
        return Some(value);
    }

    let combined = together(&f);
    if !combined.is_identical(&f) {
        if let Some(value) = limit_at(&combined, x, point, side, depth + 1) {
            return Some(value);
        }
    }

    if at_infinity {
        // x -> oo is t -> 0+ with x = 1/t
        let t = f.fresh_symbol("_t");
        let mut inverse = SymExpr::symbol(t.as_str()).recip();
        if point.is_neg_infinity() {
            inverse = -inverse;
        }
        return limit_at(&f.subs(x, &inverse), &t, &SymExpr::zero(), Side::Right, depth + 1);
    }

    None
}

/// Computes the limit of `f` as `var` approaches `point`.
///
/// For finite points, the direction selects a one-sided limit, or requires both one-sided limits
/// to agree. The direction is ignored for limits at `oo` and `-oo`.
pub fn limit(f: &SymExpr, var: &str, point: &SymExpr, dir: Direction) -> Result<SymExpr, Error> {
    let f = simplify(f);
    let point = simplify(point);
    let cannot = || Error::new(vec![], CannotComputeLimit { expr: f.to_string() });

    let value = if point.is_infinity() {
        limit_at(&f, var, &point, Side::Left, 0).ok_or_else(cannot)?
    } else if point.is_neg_infinity() {
        limit_at(&f, var, &point, Side::Right, 0).ok_or_else(cannot)?
    } else {
        match dir {
            Direction::Right => limit_at(&f, var, &point, Side::Right, 0).ok_or_else(cannot)?,
            Direction::Left => limit_at(&f, var, &point, Side::Left, 0).ok_or_else(cannot)?,
            Direction::Both => {
                let left = limit_at(&f, var, &point, Side::Left, 0).ok_or_else(cannot)?;
                let right = limit_at(&f, var, &point, Side::Right, 0).ok_or_else(cannot)?;
                if left != right {
                    return Err(Error::new(vec![], LimitDoesNotExist {
                        left: left.to_string(),
                        right: right.to_string(),
                    }));
                }
                right
            },
        }
    };

    debug!("lim {}->{}{} {} = {}", var, point, dir, f, value);
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::symbolic::parse_expr;
    use pretty_assertions::assert_eq;

    fn lim(source: &str, point: &str, dir: Direction) -> String {
        let f = parse_expr(source).unwrap();
        limit(&f, "x", &parse_expr(point).unwrap(), dir).unwrap().to_string()
    }

    #[test]
    fn substitution() {
        assert_eq!(lim("x^2", "3", Direction::Right), "9");
        assert_eq!(lim("sin(x) + 1", "0", Direction::Both), "1");
    }

    #[test]
    fn indeterminate_quotients() {
        assert_eq!(lim("sin(x)/x", "0", Direction::Right), "1");
        assert_eq!(lim("(x^2 - 1)/(x - 1)", "1", Direction::Both), "2");
        assert_eq!(lim("(1 - cos(x))/x^2", "0", Direction::Right), "1/2");
    }

    #[test]
    fn at_infinity() {
        assert_eq!(lim("(2*x^2 + 1)/(x^2 - 3)", "oo", Direction::Right), "2");
        assert_eq!(lim("x^3 - x", "-oo", Direction::Right), "-oo");
        assert_eq!(lim("x*exp(-x)", "oo", Direction::Right), "0");
        assert_eq!(lim("1/x", "oo", Direction::Right), "0");
    }

    #[test]
    fn exponential_forms() {
        assert_eq!(lim("(1 + 1/x)^x", "oo", Direction::Right), "E");
        assert_eq!(lim("x^x", "0", Direction::Right), "1");
    }

    #[test]
    fn one_sided() {
        assert_eq!(lim("1/x", "0", Direction::Right), "oo");
        assert_eq!(lim("1/x", "0", Direction::Left), "-oo");
        assert_eq!(lim("log(x)", "0", Direction::Right), "-oo");
        assert_eq!(lim("x*log(x)", "0", Direction::Right), "0");
        assert_eq!(lim("floor(x)", "1", Direction::Left), "0");
        assert_eq!(lim("floor(x)", "1", Direction::Right), "1");
    }

    #[test]
    fn two_sided_disagreement() {
        let f = parse_expr("1/x").unwrap();
        let err = limit(&f, "x", &SymExpr::zero(), Direction::Both).unwrap_err();
        assert_eq!(err.downcast_ref::<LimitDoesNotExist>(), Some(&LimitDoesNotExist {
            left: "-oo".to_string(),
            right: "oo".to_string(),
        }));
    }

    #[test]
    fn directions() {
        assert_eq!(Direction::from_symbol("+-"), Some(Direction::Both));
        assert_eq!(Direction::from_symbol("*"), None);
        assert_eq!(Direction::Left.to_string(), "-");
    }
}
