//! Expansion of products and integer powers of sums.
//!
//! ```
//! use mathnote_compute::symbolic::{expand::expand, parse_expr};
//!
//! let expr = parse_expr("(x + 1)^2").unwrap();
//! assert_eq!(expand(&expr).to_string(), "x**2 + 2*x + 1");
//! ```

use std::cmp::Ordering;
use super::{expr::{Primary, SymExpr}, simplify};

/// Powers of sums with exponents larger than this are left unexpanded.
const MAX_EXPAND_EXPONENT: u32 = 100;

/// Multiplies out two expressions, distributing over the terms of both. Like terms of the product
/// are combined.
fn multiply_out(lhs: &SymExpr, rhs: &SymExpr) -> SymExpr {
    let mut terms = Vec::with_capacity(lhs.terms().len() * rhs.terms().len());
    for l in lhs.terms() {
        for r in rhs.terms() {
            terms.push(l.clone() * r.clone());
        }
    }
    simplify(&SymExpr::Add(terms))
}

/// Expands a power whose base is already expanded.
fn expand_power(base: SymExpr, exp: SymExpr) -> SymExpr {
    // x^(a + b) = x^a * x^b
    if let SymExpr::Add(terms) = &exp {
        let factors = terms.iter()
            .map(|term| expand_power(base.clone(), term.clone()))
            .collect::<Vec<_>>();
        return factors.into_iter().fold(SymExpr::one(), |acc, factor| multiply_out(&acc, &factor));
    }

    let exponent = exp.as_integer().and_then(|n| n.to_i32());
    match (&base, exponent) {
        (SymExpr::Add(_), Some(n)) if n != 0 && n.unsigned_abs() <= MAX_EXPAND_EXPONENT => {
            let mut product = base.clone();
            for _ in 1..n.unsigned_abs() {
                product = multiply_out(&product, &base);
            }
            if n < 0 {
                product.recip()
            } else {
                product
            }
        },
        // (x*y)^n = x^n * y^n
        (SymExpr::Mul(factors), Some(_)) => factors.iter()
            .map(|factor| expand_power(factor.clone(), exp.clone()))
            .fold(SymExpr::one(), |acc, factor| multiply_out(&acc, &factor)),
        _ => SymExpr::pow(base, exp),
    }
}

/// Distributes products over sums, without simplifying the result.
fn expand_raw(expr: &SymExpr) -> SymExpr {
    match expr {
        SymExpr::Primary(Primary::Call(name, args)) => {
            SymExpr::call(name.clone(), args.iter().map(expand_raw).collect())
        },
        SymExpr::Primary(_) => expr.clone(),
        SymExpr::Add(terms) => simplify(&SymExpr::Add(terms.iter().map(expand_raw).collect())),
        SymExpr::Mul(factors) => factors.iter()
            .map(expand_raw)
            .fold(SymExpr::one(), |acc, factor| multiply_out(&acc, &factor)),
        SymExpr::Exp(base, exp) => expand_power(expand_raw(base), expand_raw(exp)),
    }
}

/// Splits an expression into its numerator and denominator, by moving factors with a negative
/// exponent into the denominator.
pub fn numer_denom(expr: &SymExpr) -> (SymExpr, SymExpr) {
    let mut numer = Vec::new();
    let mut denom = Vec::new();
    for factor in expr.factors() {
        match factor {
            SymExpr::Exp(base, exp) if exp.is_negated() => {
                denom.push(SymExpr::pow((**base).clone(), -(**exp).clone()));
            },
            _ => numer.push(factor.clone()),
        }
    }
    (
        simplify(&SymExpr::Mul(numer).downgrade()),
        simplify(&SymExpr::Mul(denom).downgrade()),
    )
}

/// Combines the terms of a sum over a common denominator. The numerator of the result is
/// expanded; the result itself is not simplified, so that simplification does not split it again.
pub fn together(expr: &SymExpr) -> SymExpr {
    let SymExpr::Add(terms) = expr else {
        return expr.clone();
    };

    let fractions = terms.iter().map(numer_denom).collect::<Vec<_>>();
    if fractions.iter().all(|(_, denom)| denom.is_one()) {
        return expr.clone();
    }

    // common denominator: every base, raised to the largest exponent it appears with
    let mut common: Vec<(SymExpr, SymExpr)> = Vec::new();
    for (_, denom) in &fractions {
        for factor in denom.factors() {
            let (base, exp) = factor.as_power();
            match common.iter_mut().find(|(b, _)| *b == base) {
                Some((_, existing)) => {
                    let larger = match (existing.as_number(), exp.as_number()) {
                        (Some(a), Some(b)) => b.cmp_value(&a) == Ordering::Greater,
                        _ => false,
                    };
                    if larger {
                        *existing = exp;
                    }
                },
                None => common.push((base, exp)),
            }
        }
    }
    let common = SymExpr::Mul(common.into_iter().map(|(b, e)| SymExpr::pow(b, e)).collect())
        .downgrade();

    let numer = fractions.into_iter()
        .map(|(numer, denom)| numer * simplify(&(common.clone() * denom.recip())))
        .collect();
    expand(&SymExpr::Add(numer)) * common.recip()
}

/// Expands the expression: distributes products over sums, and raises sums to integer powers by
/// repeated multiplication. The result is simplified.
pub fn expand(expr: &SymExpr) -> SymExpr {
    // simplification first, so that `x*(x + 1)/x` does not expand into `x**2/x + x/x`
    let expanded = expand_raw(&simplify(expr));
    simplify(&expanded)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::symbolic::parse_expr;
    use pretty_assertions::assert_eq;

    fn expanded(source: &str) -> String {
        expand(&parse_expr(source).unwrap()).to_string()
    }

    #[test]
    fn products() {
        assert_eq!(expanded("2*(x + 3)"), "2*x + 6");
        assert_eq!(expanded("(x + y)*(x - y)"), "x**2 - y**2");
        assert_eq!(expanded("x*(x + 1)*(x - 1)"), "x**3 - x");
    }

    #[test]
    fn powers() {
        assert_eq!(expanded("(x + 1)^2"), "x**2 + 2*x + 1");
        assert_eq!(expanded("(x - 2)^3"), "x**3 - 6*x**2 + 12*x - 8");
        assert_eq!(expanded("(2*x*y)^2"), "4*x**2*y**2");
    }

    #[test]
    fn inside_functions() {
        assert_eq!(expanded("sin((x + 1)^2)"), "sin(x**2 + 2*x + 1)");
    }

    #[test]
    fn fractions() {
        let (numer, denom) = numer_denom(&simplify(&parse_expr("2*x/(x + 1)^2").unwrap()));
        assert_eq!(numer.to_string(), "2*x");
        assert_eq!(denom.to_string(), "(x + 1)**2");

        let combined = together(&simplify(&parse_expr("1/x - 1/x^2").unwrap()));
        let (numer, denom) = numer_denom(&combined);
        assert_eq!(numer.to_string(), "x - 1");
        assert_eq!(denom.to_string(), "x**2");
    }

    #[test]
    fn nothing_to_expand() {
        assert_eq!(expanded("x + 1"), "x + 1");
        assert_eq!(expanded("sqrt(x + 1)"), "sqrt(x + 1)");
    }
}
