//! Roots of polynomials.

use super::super::{expr::SymExpr, poly::{rational_roots, Poly}, simplify};

/// Roots of `a*x^2 + b*x + c`, from the quadratic formula.
fn quadratic(a: &SymExpr, b: &SymExpr, c: &SymExpr) -> Vec<SymExpr> {
    let discriminant = simplify(
        &(SymExpr::pow(b.clone(), SymExpr::int(2)) - SymExpr::int(4) * a.clone() * c.clone()),
    );
    let two_a = SymExpr::int(2) * a.clone();
    if discriminant.is_zero() {
        return vec![simplify(&(-b.clone() / two_a))];
    }

    let root = discriminant.sqrt();
    vec![
        simplify(&((-b.clone() - root.clone()) / two_a.clone())),
        simplify(&((-b.clone() + root) / two_a)),
    ]
}

/// Roots of a polynomial of degree one or two.
fn low_degree(poly: &Poly) -> Option<Vec<SymExpr>> {
    match poly.degree() {
        0 => Some(Vec::new()),
        1 => Some(vec![simplify(&(-poly.coeff(0) / poly.coeff(1)))]),
        2 => Some(quadratic(&poly.coeff(2), &poly.coeff(1), &poly.coeff(0))),
        _ => None,
    }
}

/// Finds the roots of the polynomial, without multiplicity. Rational roots are found through the
/// rational root theorem; the polynomial left over must then be of degree two or less.
///
/// Returns [`None`] if not every root could be found.
pub fn roots(poly: &Poly) -> Option<Vec<SymExpr>> {
    let Some(coeffs) = poly.rational_coeffs() else {
        return low_degree(poly);
    };

    let (rational, remaining) = rational_roots(&coeffs);
    let remaining = Poly::new(remaining.into_iter().map(SymExpr::rational).collect());

    let mut found = rational.into_iter().map(SymExpr::rational).collect::<Vec<_>>();
    found.extend(low_degree(&remaining)?);
    found.dedup();
    Some(found)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::symbolic::parse_expr;
    use pretty_assertions::assert_eq;

    fn roots_of(source: &str) -> Option<Vec<String>> {
        let poly = Poly::from_expr(&parse_expr(source).unwrap(), "x").unwrap();
        roots(&poly).map(|roots| roots.iter().map(ToString::to_string).collect())
    }

    #[test]
    fn rational() {
        assert_eq!(roots_of("x^2 - 4"), Some(vec!["-2".to_string(), "2".to_string()]));
        assert_eq!(roots_of("2*x - 3"), Some(vec!["3/2".to_string()]));
        assert_eq!(roots_of("(x - 1)^2*(x + 3)"), Some(vec!["-3".to_string(), "1".to_string()]));
    }

    #[test]
    fn irrational() {
        assert_eq!(roots_of("x^2 - 2"), Some(vec!["-sqrt(2)".to_string(), "sqrt(2)".to_string()]));
        assert_eq!(roots_of("x^2 + 4"), Some(vec!["-2*I".to_string(), "2*I".to_string()]));
    }

    #[test]
    fn symbolic_coefficients() {
        assert_eq!(roots_of("a*x + b"), Some(vec!["-b/a".to_string()]));
    }

    #[test]
    fn unsolvable() {
        assert_eq!(roots_of("x^5 - x + 1"), None);
    }
}
