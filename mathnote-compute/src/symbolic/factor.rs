//! Factoring of polynomials over the rationals.
//!
//! A polynomial in a single variable is split into linear factors, one per rational root, and
//! whatever remains once those roots are divided out.
//!
//! ```
//! use mathnote_compute::symbolic::{factor::factor, parse_expr};
//!
//! let expr = parse_expr("x^2 + 2x + 1").unwrap();
//! assert_eq!(factor(&expr).to_string(), "(x + 1)**2");
//! ```

use rug::{Integer, Rational};
use super::{expr::SymExpr, poly::{rational_roots, Poly}, simplify};

/// Returns the linear factor `q*var - p` for the root `p/q`.
fn linear_factor(root: &Rational, var: &str) -> SymExpr {
    let (p, q) = root.clone().into_numer_denom();
    simplify(&(SymExpr::int(q) * SymExpr::symbol(var) - SymExpr::int(p)))
}

/// Groups equal roots, given in ascending order, into `(root, multiplicity)` pairs.
fn multiplicities(roots: Vec<Rational>) -> Vec<(Rational, usize)> {
    let mut groups: Vec<(Rational, usize)> = Vec::new();
    for root in roots {
        match groups.last_mut() {
            Some((last, count)) if *last == root => *count += 1,
            _ => groups.push((root, 1)),
        }
    }
    groups
}

/// Factors a polynomial with rational coefficients in `var`. Returns [`None`] if the polynomial
/// has no rational roots to split off.
fn factor_poly(coeffs: &[Rational], var: &str) -> Option<SymExpr> {
    let (roots, remaining) = rational_roots(coeffs);
    if roots.is_empty() {
        return None;
    }

    // each root p/q contributes (q*x - p)/q, so the remaining polynomial absorbs 1/q
    let scale = roots.iter()
        .fold(Integer::from(1), |acc, root| acc * root.denom());
    let scale = Rational::from(scale);
    let remaining = remaining.into_iter()
        .map(|c| SymExpr::rational(c / &scale))
        .collect::<Vec<_>>();
    let remaining = Poly::new(remaining);

    let mut factors = Vec::new();
    match remaining.degree() {
        0 if remaining.coeff(0).is_one() => (),
        0 => factors.push(remaining.coeff(0)),
        _ => factors.push(remaining.to_expr(var)),
    }

    for (root, count) in multiplicities(roots) {
        let factor = linear_factor(&root, var);
        if count == 1 {
            factors.push(factor);
        } else {
            factors.push(SymExpr::pow(factor, SymExpr::int(count)));
        }
    }

    // the product is left unsimplified, as simplification may distribute it again
    Some(SymExpr::Mul(factors).downgrade())
}

/// Factors an expression. Polynomials in a single free symbol with rational coefficients are
/// split into linear factors over the rationals; anything else is returned simplified.
pub fn factor(expr: &SymExpr) -> SymExpr {
    let simplified = simplify(expr);
    let symbols = simplified.free_symbols();
    let [var] = symbols.iter().collect::<Vec<_>>()[..] else {
        return simplified;
    };

    Poly::from_expr(&simplified, var)
        .filter(|poly| poly.degree() >= 2)
        .and_then(|poly| poly.rational_coeffs())
        .and_then(|coeffs| factor_poly(&coeffs, var))
        .unwrap_or(simplified)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::symbolic::{expand::expand, parse_expr};
    use pretty_assertions::assert_eq;

    fn factored(source: &str) -> String {
        factor(&parse_expr(source).unwrap()).to_string()
    }

    /// Asserts that the factored form multiplies back out to the input.
    fn assert_same_polynomial(source: &str) {
        let expr = parse_expr(source).unwrap();
        assert_eq!(expand(&factor(&expr)), expand(&expr), "{}", source);
    }

    #[test]
    fn difference_of_squares() {
        assert_eq!(factored("x^2 - 4"), "(x + 2)*(x - 2)");
        assert_same_polynomial("x^2 - 4");
    }

    #[test]
    fn repeated_roots() {
        assert_eq!(factored("x^2 + 2x + 1"), "(x + 1)**2");
        assert_eq!(factored("x^3 - x^2"), "x**2*(x - 1)");
        assert_same_polynomial("x^3 - 3x^2 + 3x - 1");
    }

    #[test]
    fn leading_coefficients() {
        assert_same_polynomial("2x^2 - 8");
        assert_same_polynomial("6x^2 - x - 2");
        assert_same_polynomial("-x^2 + 1");
    }

    #[test]
    fn irreducible() {
        assert_eq!(factored("x^2 + 1"), "x**2 + 1");
        assert_eq!(factored("x^2 - 2"), "x**2 - 2");
        assert_eq!(factored("x*y + x"), "x*y + x");
        assert_eq!(factored("sin(x)"), "sin(x)");
    }

    #[test]
    fn leftover_quadratic() {
        // (x - 1)(x^2 + 1)
        let expr = parse_expr("x^3 - x^2 + x - 1").unwrap();
        let SymExpr::Mul(factors) = factor(&expr) else {
            panic!("expected a product");
        };
        assert_eq!(factors.len(), 2);
        assert_same_polynomial("x^3 - x^2 + x - 1");
    }
}
