//! Polynomials in a single variable.
//!
//! A [`Poly`] stores the coefficients of a polynomial in ascending order of degree. Coefficients
//! are arbitrary expressions free of the variable, so `a*x^2 + b` is a polynomial in `x` with
//! coefficients `[b, 0, a]`. Polynomials with exact rational coefficients additionally support
//! root finding through the rational root theorem.

use crate::primitive::int;
use rug::{Integer, Rational};
use super::{expand::expand, expr::SymExpr, simplify};

/// The maximum degree of a polynomial.
const MAX_DEGREE: usize = 1000;

/// Leading or trailing coefficients larger than this are not searched for rational roots.
const MAX_ROOT_SEARCH: u32 = 1_000_000;

/// A polynomial in one variable.
#[derive(Debug, Clone, PartialEq)]
pub struct Poly {
    /// The coefficients, with `coeffs[n]` being the coefficient of `var^n`. The last coefficient
    /// is non-zero, unless the polynomial is the zero polynomial, which has no coefficients.
    pub coeffs: Vec<SymExpr>,
}

/// Returns the degree of a factor in `var`, if it is `var` raised to a non-negative integer.
fn factor_degree(factor: &SymExpr, var: &str) -> Option<usize> {
    let (base, exp) = factor.as_power();
    if !base.is_symbol(var) {
        return None;
    }
    exp.as_integer()?.to_usize().filter(|&n| n <= MAX_DEGREE)
}

impl Poly {
    /// Reads the expression as a polynomial in `var`. Returns [`None`] if the expanded expression
    /// is not a polynomial in `var`.
    pub fn from_expr(expr: &SymExpr, var: &str) -> Option<Self> {
        let expanded = expand(expr);
        let mut coeffs: Vec<Vec<SymExpr>> = Vec::new();

        for term in expanded.terms() {
            let mut degree = 0;
            let mut coeff = Vec::new();
            for factor in term.factors() {
                if !factor.contains_symbol(var) {
                    coeff.push(factor.clone());
                    continue;
                }
                degree += factor_degree(factor, var)?;
            }

            if coeffs.len() <= degree {
                coeffs.resize(degree + 1, Vec::new());
            }
            coeffs[degree].push(SymExpr::Mul(coeff).downgrade());
        }

        let coeffs = coeffs.into_iter()
            .map(|terms| simplify(&SymExpr::Add(terms)))
            .collect();
        Some(Self::new(coeffs))
    }

    /// Creates a polynomial from coefficients in ascending order, trimming zero leading
    /// coefficients.
    pub fn new(mut coeffs: Vec<SymExpr>) -> Self {
        while coeffs.last().is_some_and(|c| c.is_zero()) {
            coeffs.pop();
        }
        Self { coeffs }
    }

    /// Returns the degree of the polynomial. The zero polynomial has degree zero.
    pub fn degree(&self) -> usize {
        self.coeffs.len().saturating_sub(1)
    }

    /// Returns the coefficient of `var^n`.
    pub fn coeff(&self, n: usize) -> SymExpr {
        self.coeffs.get(n).cloned().unwrap_or_else(SymExpr::zero)
    }

    /// Returns true if this is the zero polynomial.
    pub fn is_zero(&self) -> bool {
        self.coeffs.is_empty()
    }

    /// Converts the polynomial back into a simplified expression in `var`.
    pub fn to_expr(&self, var: &str) -> SymExpr {
        let x = SymExpr::symbol(var);
        let terms = self.coeffs.iter()
            .enumerate()
            .map(|(n, c)| c.clone() * SymExpr::pow(x.clone(), SymExpr::int(n)))
            .collect();
        simplify(&SymExpr::Add(terms))
    }

    /// Returns the derivative of the polynomial.
    pub fn derivative(&self) -> Self {
        let coeffs = self.coeffs.iter()
            .enumerate()
            .skip(1)
            .map(|(n, c)| simplify(&(SymExpr::int(n) * c.clone())))
            .collect();
        Self::new(coeffs)
    }

    /// Returns the antiderivative of the polynomial with zero constant term.
    pub fn integral(&self) -> Self {
        let mut coeffs = vec![SymExpr::zero()];
        coeffs.extend(self.coeffs.iter()
            .enumerate()
            .map(|(n, c)| simplify(&(c.clone() / SymExpr::int(n + 1)))));
        Self::new(coeffs)
    }

    /// Divides the polynomial by `var - root` using synthetic division, returning the quotient
    /// and the remainder.
    pub fn divide_linear(&self, root: &SymExpr) -> (Self, SymExpr) {
        if self.coeffs.is_empty() {
            return (Self::new(Vec::new()), SymExpr::zero());
        }

        let mut quotient = vec![SymExpr::zero(); self.coeffs.len() - 1];
        let mut carry = SymExpr::zero();
        for n in (0..self.coeffs.len()).rev() {
            let value = simplify(&(self.coeffs[n].clone() + carry * root.clone()));
            if n == 0 {
                return (Self::new(quotient), value);
            }
            quotient[n - 1] = value.clone();
            carry = value;
        }
        (Self::new(quotient), SymExpr::zero())
    }

    /// Divides the polynomial by another using long division, returning the quotient and the
    /// remainder. Returns [`None`] if the divisor is the zero polynomial.
    pub fn divide(&self, divisor: &Poly) -> Option<(Self, Self)> {
        let lead = divisor.coeffs.last()?;
        let shift = divisor.degree();
        if self.coeffs.len() < divisor.coeffs.len() {
            return Some((Self::new(Vec::new()), self.clone()));
        }

        let mut remainder = self.coeffs.clone();
        let mut quotient = vec![SymExpr::zero(); remainder.len() - shift];
        for k in (0..quotient.len()).rev() {
            let c = simplify(&(remainder[k + shift].clone() / lead.clone()));
            for (j, d) in divisor.coeffs.iter().enumerate() {
                remainder[k + j] = simplify(&(remainder[k + j].clone() - c.clone() * d.clone()));
            }
            quotient[k] = c;
        }

        remainder.truncate(shift);
        Some((Self::new(quotient), Self::new(remainder)))
    }

    /// Returns the coefficients as exact rationals, if every coefficient is an integer or a
    /// rational number.
    pub fn rational_coeffs(&self) -> Option<Vec<Rational>> {
        self.coeffs.iter().map(SymExpr::as_rational).collect()
    }
}

/// Evaluates a polynomial with rational coefficients at `x` using Horner's method.
pub fn eval_rational(coeffs: &[Rational], x: &Rational) -> Rational {
    coeffs.iter()
        .rev()
        .fold(Rational::new(), |acc, c| acc * x + c)
}

/// Returns the positive divisors of `n`, or [`None`] if `n` is too large to search.
fn divisors(n: &Integer) -> Option<Vec<Integer>> {
    let n = n.clone().abs();
    let limit = n.to_u32().filter(|&n| n <= MAX_ROOT_SEARCH)?;
    let mut found = Vec::new();
    let mut d = 1u32;
    while d.saturating_mul(d) <= limit {
        if limit % d == 0 {
            found.push(int(d));
            if d != limit / d {
                found.push(int(limit / d));
            }
        }
        d += 1;
    }
    found.sort();
    Some(found)
}

/// Finds every rational root of the polynomial with the given rational coefficients, with
/// multiplicity. Returns the roots in ascending order and the polynomial that remains once the
/// roots are divided out.
pub fn rational_roots(coeffs: &[Rational]) -> (Vec<Rational>, Vec<Rational>) {
    let mut remaining = coeffs.to_vec();
    let mut roots = Vec::new();

    // factor out x^k
    while remaining.len() > 1 && remaining[0].cmp0() == std::cmp::Ordering::Equal {
        remaining.remove(0);
        roots.push(Rational::new());
    }

    // clear denominators so that the rational root theorem applies
    let lcm = remaining.iter().fold(int(1), |acc, c| acc.lcm(c.denom()));
    let scaled = remaining.iter()
        .map(|c| Rational::from(c * &lcm).numer().clone())
        .collect::<Vec<_>>();

    let candidates = match (scaled.first(), scaled.last()) {
        (Some(constant), Some(leading)) if remaining.len() > 1 => {
            match (divisors(constant), divisors(leading)) {
                (Some(ps), Some(qs)) => {
                    let mut candidates = Vec::new();
                    for p in &ps {
                        for q in &qs {
                            let r = Rational::from((p.clone(), q.clone()));
                            candidates.push(-r.clone());
                            candidates.push(r);
                        }
                    }
                    candidates.sort();
                    candidates.dedup();
                    candidates
                },
                _ => Vec::new(),
            }
        },
        _ => Vec::new(),
    };

    for candidate in candidates {
        while remaining.len() > 1 && eval_rational(&remaining, &candidate).cmp0() == std::cmp::Ordering::Equal {
            remaining = divide_rational(&remaining, &candidate);
            roots.push(candidate.clone());
        }
    }

    roots.sort();
    (roots, remaining)
}

/// Divides the polynomial by `x - root`, discarding the remainder.
fn divide_rational(coeffs: &[Rational], root: &Rational) -> Vec<Rational> {
    let mut quotient = vec![Rational::new(); coeffs.len() - 1];
    let mut carry = Rational::new();
    for n in (1..coeffs.len()).rev() {
        let value = Rational::from(&carry * root) + &coeffs[n];
        quotient[n - 1] = value.clone();
        carry = value;
    }
    quotient
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::primitive::rat;
    use crate::symbolic::parse_expr;
    use pretty_assertions::assert_eq;

    fn poly(source: &str) -> Poly {
        Poly::from_expr(&parse_expr(source).unwrap(), "x").unwrap()
    }

    #[test]
    fn coefficients() {
        let p = poly("3*x^2 - 2*x + 1");
        assert_eq!(p.degree(), 2);
        assert_eq!(p.coeffs, vec![SymExpr::int(1), SymExpr::int(-2), SymExpr::int(3)]);

        let p = poly("a*x^2 + b*x");
        assert_eq!(p.coeff(0), SymExpr::zero());
        assert_eq!(p.coeff(2), SymExpr::symbol("a"));
    }

    #[test]
    fn products_are_expanded() {
        let p = poly("(x + 1)*(x - 1)");
        assert_eq!(p.coeffs, vec![SymExpr::int(-1), SymExpr::zero(), SymExpr::int(1)]);
    }

    #[test]
    fn not_polynomials() {
        let x = parse_expr("sin(x) + 1").unwrap();
        assert_eq!(Poly::from_expr(&x, "x"), None);
        let x = parse_expr("1/x").unwrap();
        assert_eq!(Poly::from_expr(&x, "x"), None);
    }

    #[test]
    fn calculus() {
        let p = poly("x^3 + 2*x");
        assert_eq!(p.derivative().to_expr("x").to_string(), "3*x**2 + 2");
        assert_eq!(p.integral().to_expr("x").to_string(), "x**4/4 + x**2");
    }

    #[test]
    fn synthetic_division() {
        let (q, r) = poly("x^2 - 3*x + 5").divide_linear(&SymExpr::int(2));
        assert_eq!(q.to_expr("x").to_string(), "x - 1");
        assert_eq!(r, SymExpr::int(3));
    }

    #[test]
    fn long_division() {
        let (q, r) = poly("x^3 + 2*x + 1").divide(&poly("x^2 + 1")).unwrap();
        assert_eq!(q.to_expr("x").to_string(), "x");
        assert_eq!(r.to_expr("x").to_string(), "x + 1");
        assert_eq!(poly("x").divide(&Poly::new(Vec::new())), None);
    }

    #[test]
    fn roots() {
        // 2x^3 - 3x^2 - 3x + 2 = (x - 2)(2x - 1)(x + 1)
        let coeffs = vec![rat(2, 1), rat(-3, 1), rat(-3, 1), rat(2, 1)];
        let (roots, rest) = rational_roots(&coeffs);
        assert_eq!(roots, vec![rat(-1, 1), rat(1, 2), rat(2, 1)]);
        assert_eq!(rest.len(), 1);

        // x^2 (x^2 - 2)
        let coeffs = vec![rat(0, 1), rat(0, 1), rat(-2, 1), rat(0, 1), rat(1, 1)];
        let (roots, rest) = rational_roots(&coeffs);
        assert_eq!(roots, vec![rat(0, 1), rat(0, 1)]);
        assert_eq!(rest, vec![rat(-2, 1), rat(0, 1), rat(1, 1)]);
    }
}
