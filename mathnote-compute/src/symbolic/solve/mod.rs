//! Solving equations, inequalities, and systems of linear equations.
//!
//! An equation `lhs = rhs` is solved by finding the zeros of `lhs - rhs`:
//!
//! - fractions are combined over a common denominator, and zeros of the denominator are excluded;
//! - products are zero where any factor is zero;
//! - polynomials are solved with the rational root theorem and the quadratic formula;
//! - otherwise, the expression must depend on the variable through a single function call or
//! exponential (the _kernel_), such as `sin(x)` in `sin(x)^2 = 1/4`, or `e^x` in
//! `3e^(2x) - 7e^x + 2 = 0`. The equation is solved for the kernel, then the kernel is inverted.
//!
//! Periodic functions produce [image sets](SolutionSet::Image) indexed by the integers.
//!
//! ```
//! use mathnote_compute::symbolic::{parse_statement, solve::{solve, Domain}};
//!
//! let stmt = parse_statement("x^2 = 4").unwrap();
//! let set = solve(stmt.as_relation().unwrap(), "x", Domain::Reals).unwrap();
//! assert_eq!(set.to_string(), "{-2, 2}");
//! ```

mod inequality;
mod linear;
mod polynomial;
pub mod set;

pub use linear::linsolve;
pub use set::{Interval, SolutionSet, IMAGE_INDEX};

use log::debug;
use mathnote_error::Error;
use rug::{Integer, Rational};
use std::cmp::Ordering;
use super::{
    error::{CannotSolve, ComplexInequality},
    expand::{numer_denom, together},
    expr::SymExpr,
    numeric,
    poly::Poly,
    relation::{RelKind, Relation},
    simplify,
};

/// The maximum nesting of kernel inversions.
const MAX_DEPTH: usize = 6;

/// Solutions that leave a residual larger than this when substituted back are discarded.
const RESIDUAL_TOLERANCE: f64 = 1e-40;

/// The set of numbers in which solutions are looked for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Domain {
    Reals,
    Complexes,
}

impl Domain {
    /// The set containing every number of the domain.
    fn universal(self) -> SolutionSet {
        match self {
            Self::Reals => SolutionSet::Reals,
            Self::Complexes => SolutionSet::Complexes,
        }
    }
}

/// Solves the relation for `var`, returning the set of values of `var` in `domain` for which the
/// relation holds.
pub fn solve(relation: &Relation, var: &str, domain: Domain) -> Result<SolutionSet, Error> {
    let solutions = match (relation.kind, domain) {
        (RelKind::Eq, _) => Solver::new(relation, var, domain).zeros(&relation.difference(), 0)?,
        (_, Domain::Reals) => inequality::solve_real(relation, var)?,
        (RelKind::Ne, Domain::Complexes) => {
            match Solver::new(relation, var, domain).zeros(&relation.difference(), 0)? {
                SolutionSet::Empty => SolutionSet::Complexes,
                SolutionSet::Complexes => SolutionSet::Empty,
                _ => return Err(cannot_solve(relation, var)),
            }
        },
        (_, Domain::Complexes) => return Err(Error::new(vec![], ComplexInequality)),
    };
    debug!("solutions of {} for {} in {:?}: {}", relation, var, domain, solutions);
    Ok(solutions)
}

fn cannot_solve(relation: &Relation, var: &str) -> Error {
    Error::new(vec![], CannotSolve { relation: relation.to_string(), var: var.to_string() })
}

/// Returns `(a, b)` if `expr = a*var + b` with `a != 0` free of `var`.
fn linear_parts(expr: &SymExpr, var: &str) -> Option<(SymExpr, SymExpr)> {
    let poly = Poly::from_expr(expr, var)?;
    (poly.degree() == 1).then(|| (poly.coeff(1), poly.coeff(0)))
}

/// Returns true if the expression is a function call or an exponential that depends on `var`,
/// and can therefore stand for the unknown of a simpler equation.
fn is_kernel(expr: &SymExpr, var: &str) -> bool {
    match expr {
        SymExpr::Exp(base, exp) => {
            (!base.contains_symbol(var) && exp.contains_symbol(var))
                || (base.contains_symbol(var) && !exp.contains_symbol(var) && !exp.is_integer())
        },
        _ => expr.as_call().is_some_and(|(_, args)| args.iter().any(|a| a.contains_symbol(var))),
    }
}

/// Returns the kernels of the expression that are not contained in another kernel.
fn outer_kernels<'a>(expr: &'a SymExpr, var: &str) -> Vec<&'a SymExpr> {
    let kernels = expr.post_order_iter()
        .filter(|node| is_kernel(node, var))
        .collect::<Vec<_>>();
    let mut outer: Vec<&SymExpr> = Vec::new();
    for kernel in &kernels {
        let nested = kernels.iter().any(|other| {
            *other != *kernel && other.post_order_iter().any(|node| node == *kernel)
        });
        if !nested && !outer.contains(kernel) {
            outer.push(kernel);
        }
    }
    outer
}

/// If every kernel is a power of the same constant base, such as `e^x` and `e^(2*x)`, finds the
/// common kernel `base^unit` such that each kernel is an integer power of it. Returns the common
/// kernel and each kernel rewritten as a power of `t`.
fn common_exponential(kernels: &[&SymExpr], t: &SymExpr) -> Option<(SymExpr, Vec<SymExpr>)> {
    let (first_base, first_exp) = match kernels.first()? {
        SymExpr::Exp(base, exp) => (&**base, &**exp),
        _ => return None,
    };

    let mut ratios = Vec::with_capacity(kernels.len());
    for kernel in kernels {
        let SymExpr::Exp(base, exp) = kernel else {
            return None;
        };
        if **base != *first_base {
            return None;
        }
        ratios.push(simplify(&((**exp).clone() / first_exp.clone())).as_rational()?);
    }

    // unit = first_exp / d, where d is the lcm of the denominators of the ratios
    let d = ratios.iter().fold(Integer::from(1), |acc, r| acc.lcm(r.denom()));
    let unit = simplify(&(first_exp.clone() / SymExpr::int(d.clone())));
    let powers = ratios.into_iter()
        .map(|r| SymExpr::pow(t.clone(), SymExpr::rational(r * Rational::from(d.clone()))))
        .collect();
    Some((SymExpr::pow(first_base.clone(), unit), powers))
}

/// Normalizes an angle into `[0, period)`, if it can be evaluated.
fn normalize_angle(angle: SymExpr, period: &SymExpr) -> SymExpr {
    let (Some(value), Some(length)) = (numeric::eval_f64(&angle), numeric::eval_f64(period)) else {
        return angle;
    };
    let turns = (value / length).floor();
    if turns == 0.0 || !turns.is_finite() {
        return angle;
    }
    simplify(&(angle - SymExpr::int(turns as i64) * period.clone()))
}

/// Solves one equation for one variable.
struct Solver<'a> {
    relation: &'a Relation,
    var: &'a str,
    domain: Domain,
}

impl<'a> Solver<'a> {
    fn new(relation: &'a Relation, var: &'a str, domain: Domain) -> Self {
        Self { relation, var, domain }
    }

    fn fail<T>(&self) -> Result<T, Error> {
        Err(cannot_solve(self.relation, self.var))
    }

    /// Finds the values of the variable for which `f` is zero.
    fn zeros(&self, f: &SymExpr, depth: usize) -> Result<SolutionSet, Error> {
        if depth > MAX_DEPTH {
            return self.fail();
        }

        let f = simplify(f);
        if f.is_zero() {
            return Ok(self.domain.universal());
        }
        if !f.contains_symbol(self.var) {
            return if f.is_number() || f.free_symbols().is_empty() {
                Ok(SolutionSet::Empty)
            } else {
                self.fail()
            };
        }

        let (numer, denom) = numer_denom(&together(&f));
        let solutions = self.numerator_zeros(&numer, depth)?;
        if !denom.contains_symbol(self.var) {
            return Ok(self.check(&f, solutions));
        }

        // zeros of the denominator are not solutions
        let excluded = self.zeros(&denom, depth + 1).ok();
        let solutions = match (solutions, excluded) {
            (SolutionSet::Finite(members), Some(SolutionSet::Finite(poles))) => SolutionSet::finite(
                members.into_iter().filter(|m| !poles.contains(m)),
            ),
            (solutions, _) => solutions,
        };
        Ok(self.check(&f, solutions))
    }

    fn numerator_zeros(&self, numer: &SymExpr, depth: usize) -> Result<SolutionSet, Error> {
        if let SymExpr::Mul(factors) = numer {
            let sets = factors.iter()
                .filter(|factor| factor.contains_symbol(self.var))
                .map(|factor| self.zeros(factor, depth + 1))
                .collect::<Result<Vec<_>, _>>()?;
            return Ok(SolutionSet::union(sets));
        }

        if let SymExpr::Exp(base, exp) = numer {
            // b^n = 0 where b = 0, for positive constant n
            if base.contains_symbol(self.var)
                && !exp.contains_symbol(self.var)
                && exp.as_number().is_some_and(|n| !n.is_negative())
            {
                return self.zeros(base, depth + 1);
            }
        }

        if let Some(poly) = Poly::from_expr(numer, self.var) {
            let Some(roots) = polynomial::roots(&poly) else {
                return self.fail();
            };
            return Ok(self.restrict(roots));
        }

        self.kernel_zeros(numer, depth)
    }

    /// Solves for a single kernel, then inverts it.
    fn kernel_zeros(&self, f: &SymExpr, depth: usize) -> Result<SolutionSet, Error> {
        let kernels = outer_kernels(f, self.var);
        let t_name = f.fresh_symbol("_t");
        let t = SymExpr::symbol(t_name.as_str());

        let (kernel, in_t) = match kernels.as_slice() {
            [] => return self.fail(),
            [kernel] => ((*kernel).clone(), f.replace(kernel, &t)),
            _ => {
                let Some((kernel, powers)) = common_exponential(&kernels, &t) else {
                    return self.fail();
                };
                let replaced = kernels.iter()
                    .zip(&powers)
                    .fold(f.clone(), |acc, (kernel, power)| acc.replace(kernel, power));
                (kernel, replaced)
            },
        };
        let in_t = simplify(&in_t);
        if in_t.contains_symbol(self.var) {
            return self.fail();
        }

        let solver = Solver { relation: self.relation, var: &t_name, domain: self.domain };
        let values = solver.zeros(&in_t, depth + 1)?;
        let Some(values) = values.as_finite() else {
            return self.fail();
        };

        let sets = values.iter()
            .map(|value| self.invert(&kernel, value, depth))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(SolutionSet::union(sets))
    }

    /// Solves `kernel = value`.
    fn invert(&self, kernel: &SymExpr, value: &SymExpr, depth: usize) -> Result<SolutionSet, Error> {
        let var = self.var;
        let value_sign = numeric::eval_real(value).and_then(|v| v.cmp0());

        if let SymExpr::Exp(base, exp) = kernel {
            if base.contains_symbol(var) {
                // g^p = v  =>  g = v^(1/p), checked afterwards
                let root = SymExpr::pow(value.clone(), (**exp).clone().recip());
                return self.zeros(&((**base).clone() - root), depth + 1);
            }

            if self.domain == Domain::Reals && value_sign.is_some_and(|s| s != Ordering::Greater) {
                return Ok(SolutionSet::Empty);
            }
            let log_base = if base.is_symbol("E") {
                SymExpr::one()
            } else {
                SymExpr::call("log", vec![(**base).clone()])
            };
            let exponent = SymExpr::call("log", vec![value.clone()]) / log_base;
            return self.zeros(&((**exp).clone() - exponent), depth + 1);
        }

        let Some((name, [g])) = kernel.as_call() else {
            return self.fail();
        };
        let call = |name: &str, arg: SymExpr| SymExpr::call(name, vec![arg]);
        let solve_for = |target: SymExpr| self.zeros(&(g.clone() - target), depth + 1);
        let out_of_unit_range = self.domain == Domain::Reals
            && numeric::eval_real(value).is_some_and(|v| v.abs() > 1);

        match name {
            "sin" | "cos" if out_of_unit_range => Ok(SolutionSet::Empty),
            "sin" | "cos" | "tan" => self.periodic(name, g, value),
            "log" => solve_for(SymExpr::pow(SymExpr::e(), value.clone())),
            "abs" if self.domain == Domain::Reals => {
                if value_sign == Some(Ordering::Less) {
                    return Ok(SolutionSet::Empty);
                }
                Ok(SolutionSet::union([solve_for(value.clone())?, solve_for(-value.clone())?]))
            },
            "asin" => solve_for(call("sin", value.clone())),
            "acos" => solve_for(call("cos", value.clone())),
            "atan" => solve_for(call("tan", value.clone())),
            "sinh" => solve_for(call("asinh", value.clone())),
            "tanh" => solve_for(call("atanh", value.clone())),
            "asinh" => solve_for(call("sinh", value.clone())),
            "acosh" => solve_for(call("cosh", value.clone())),
            "atanh" => solve_for(call("tanh", value.clone())),
            "cosh" => Ok(SolutionSet::union([
                solve_for(call("acosh", value.clone()))?,
                solve_for(-call("acosh", value.clone()))?,
            ])),
            "cbrt" => solve_for(SymExpr::pow(value.clone(), SymExpr::int(3))),
            _ => self.fail(),
        }
    }

    /// Solves `sin(g) = value`, `cos(g) = value`, or `tan(g) = value` for `g` linear in the
    /// variable, producing one image set per solution within a period.
    fn periodic(&self, name: &str, g: &SymExpr, value: &SymExpr) -> Result<SolutionSet, Error> {
        let Some((a, b)) = linear_parts(g, self.var) else {
            return self.fail();
        };
        let pi = SymExpr::pi;
        let call = |name: &str| simplify(&SymExpr::call(name, vec![value.clone()]));

        let (period, angles) = match name {
            "sin" => {
                let principal = call("asin");
                (SymExpr::int(2) * pi(), vec![principal.clone(), pi() - principal])
            },
            "cos" => {
                let principal = call("acos");
                (SymExpr::int(2) * pi(), vec![principal.clone(), SymExpr::int(2) * pi() - principal])
            },
            _ => (pi(), vec![call("atan")]),
        };
        let period = simplify(&period);

        let mut angles = angles.into_iter()
            .map(|angle| normalize_angle(simplify(&angle), &period))
            .collect::<Vec<_>>();
        angles.dedup();
        angles.sort_by(|l, r| {
            let (l, r) = (numeric::eval_f64(l), numeric::eval_f64(r));
            l.partial_cmp(&r).unwrap_or(Ordering::Equal)
        });

        let n = SymExpr::symbol(IMAGE_INDEX);
        let sets = angles.into_iter()
            .map(|angle| {
                let g_value = period.clone() * n.clone() + angle;
                SolutionSet::Image(simplify(&((g_value - b.clone()) / a.clone())))
            })
            .collect::<Vec<_>>();
        Ok(SolutionSet::union(sets))
    }

    /// Turns the roots of a polynomial into the solutions in the domain. Over the reals,
    /// non-real roots are dropped, and roots containing other symbols are intersected with the
    /// reals.
    fn restrict(&self, roots: Vec<SymExpr>) -> SolutionSet {
        if self.domain == Domain::Complexes {
            return SolutionSet::finite(roots);
        }

        let (numeric_roots, symbolic): (Vec<_>, Vec<_>) = roots.into_iter()
            .partition(|root| root.free_symbols().is_empty());
        let real = SolutionSet::finite(
            numeric_roots.into_iter().filter(|root| numeric::eval_real(root).is_some()),
        );
        if symbolic.is_empty() {
            return real;
        }
        SolutionSet::union([
            real,
            SolutionSet::Intersection(vec![SolutionSet::Reals, SolutionSet::finite(symbolic)]),
        ])
    }

    /// Discards finite solutions that do not satisfy `f = 0` when substituted back, which can be
    /// introduced by inverting even powers.
    fn check(&self, f: &SymExpr, solutions: SolutionSet) -> SolutionSet {
        let SolutionSet::Finite(members) = solutions else {
            return solutions;
        };
        SolutionSet::finite(members.into_iter().filter(|member| {
            match numeric::eval_complex(&f.subs(self.var, member)) {
                Some(residual) => residual.abs().real().to_f64() < RESIDUAL_TOLERANCE,
                // not evaluable, such as a solution containing other symbols
                None => !member.free_symbols().is_empty()
                    || !f.subs(self.var, member).free_symbols().is_empty(),
            }
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::symbolic::{numeric::eval_f64, parse_statement};
    use pretty_assertions::assert_eq;

    fn solved(source: &str, var: &str, domain: Domain) -> Result<SolutionSet, Error> {
        let stmt = parse_statement(source).unwrap();
        solve(stmt.as_relation().unwrap(), var, domain)
    }

    fn real(source: &str) -> String {
        solved(source, "x", Domain::Reals).unwrap().to_string()
    }

    fn complex(source: &str) -> String {
        solved(source, "x", Domain::Complexes).unwrap().to_string()
    }

    /// Returns the first few members of each image set, evaluated.
    fn image_values(set: &SolutionSet) -> Vec<f64> {
        let images = match set {
            SolutionSet::Union(sets) => sets.clone(),
            other => vec![other.clone()],
        };
        let mut values = Vec::new();
        for image in images {
            let SolutionSet::Image(expr) = image else {
                panic!("not an image set: {}", image);
            };
            for n in -1..=1 {
                values.push(eval_f64(&expr.subs(IMAGE_INDEX, &SymExpr::int(n))).unwrap());
            }
        }
        values
    }

    #[test]
    fn polynomial_equations() {
        assert_eq!(real("x = 2"), "{2}");
        assert_eq!(real("x + 2 = 5"), "{3}");
        assert_eq!(real("x^2 = 4"), "{-2, 2}");
        assert_eq!(real("x^2 + 1 = 0"), "EmptySet");
        assert_eq!(real("x^3 = x"), "{-1, 0, 1}");
    }

    #[test]
    fn complex_roots() {
        assert_eq!(complex("x^2 = -4"), "{-2*I, 2*I}");
        let SolutionSet::Finite(roots) = solved("x^3 = 1", "x", Domain::Complexes).unwrap() else {
            panic!("expected a finite set");
        };
        assert_eq!(roots.len(), 3);
    }

    #[test]
    fn identities() {
        assert_eq!(real("x = x"), "Reals");
        assert_eq!(complex("x = x"), "Complexes");
        assert_eq!(real("x = x + 1"), "EmptySet");
    }

    #[test]
    fn rational_equations() {
        assert_eq!(real("1/x = 2"), "{1/2}");
        assert_eq!(real("(x^2 - 1)/(x - 1) = 0"), "{-1}");
    }

    #[test]
    fn absolute_values_and_logs() {
        assert_eq!(real("abs(x) = 1"), "{-1, 1}");
        assert_eq!(real("abs(x) = -1"), "EmptySet");
        assert_eq!(real("log(x) = 0"), "{1}");
        assert_eq!(real("sqrt(x) = 3"), "{9}");
    }

    #[test]
    fn exponentials() {
        let SolutionSet::Finite(roots) = solved("-7*E^x + 3*E^(2*x) + 2 = 0", "x", Domain::Reals).unwrap()
        else {
            panic!("expected a finite set");
        };
        let values = roots.iter().map(|r| eval_f64(r).unwrap()).collect::<Vec<_>>();
        assert_eq!(values.len(), 2);
        assert!((values[0] + 3f64.ln()).abs() < 1e-12);
        assert!((values[1] - 2f64.ln()).abs() < 1e-12);

        assert_eq!(real("E^x = -1"), "EmptySet");
    }

    #[test]
    fn trigonometric_equations() {
        let set = solved("sin(x) = 0", "x", Domain::Reals).unwrap();
        let values = image_values(&set);
        let pi = std::f64::consts::PI;
        for expected in [-2.0 * pi, 0.0, 2.0 * pi, -pi, pi, 3.0 * pi] {
            assert!(values.iter().any(|v| (v - expected).abs() < 1e-12), "missing {}", expected);
        }

        let SolutionSet::Image(expr) = solved("tan(x) = -1", "x", Domain::Reals).unwrap() else {
            panic!("expected a single image set");
        };
        let at_zero = eval_f64(&expr.subs(IMAGE_INDEX, &SymExpr::zero())).unwrap();
        assert!((at_zero - 3.0 * pi / 4.0).abs() < 1e-12);

        assert_eq!(real("cos(x) = 2"), "EmptySet");
        assert!(matches!(solved("sin(x) = 1", "x", Domain::Reals).unwrap(), SolutionSet::Image(_)));
    }

    #[test]
    fn squared_kernels() {
        let set = solved("sin(x)^2 = 1/4", "x", Domain::Reals).unwrap();
        assert_eq!(image_values(&set).len(), 12);
    }

    #[test]
    fn symbolic_solutions() {
        assert_eq!(real("x = a"), "Intersection(Reals, {a})");
        assert_eq!(complex("x = a"), "{a}");
    }

    #[test]
    fn unsolvable() {
        let err = solved("x^5 - x + 1 = 0", "x", Domain::Reals).unwrap_err();
        assert!(err.downcast_ref::<CannotSolve>().is_some());

        let err = solved("x < 1", "x", Domain::Complexes).unwrap_err();
        assert!(err.downcast_ref::<ComplexInequality>().is_some());
    }

    #[test]
    fn inequations() {
        assert_eq!(real("x != 1"), "Union((-oo, 1), (1, oo))");
    }
}
