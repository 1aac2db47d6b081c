//! Symbolic differentiation.
//!
//! [`derivative`] applies the sum, product, power and chain rules to produce an unsimplified
//! derivative, cleaning up only the trivial zero and one factors that the rules introduce.
//! [`derive`] additionally simplifies the result.
//!
//! ```
//! use mathnote_compute::symbolic::{derivative::derive, parse_expr};
//!
//! let f = parse_expr("x^2 + 3*x").unwrap();
//! assert_eq!(derive(&f, "x").unwrap().to_string(), "2*x + 3");
//! ```

mod function;

use log::debug;
use mathnote_error::Error;
use super::{
    error::CannotDifferentiate,
    expr::{Primary, SymExpr},
    simplify,
};

/// Returns `true` if the given [`SymExpr`] is "clearly" zero. This is intended to clean up the
/// output of the differentiation rules and is not mathematically rigorous.
fn is_trivially_zero(e: &SymExpr) -> bool {
    match e {
        SymExpr::Primary(Primary::Float(f)) => f.is_zero(),
        SymExpr::Primary(Primary::Integer(i)) => i.is_zero(),
        SymExpr::Add(terms) => terms.iter().all(is_trivially_zero),
        SymExpr::Mul(factors) => factors.iter().any(is_trivially_zero) && !e.has_unbounded(),
        SymExpr::Exp(base, exp) => is_trivially_zero(base) && exp.is_one(),
        _ => false,
    }
}

/// Returns `true` if the given [`SymExpr`] is "clearly" one. This is intended to clean up the
/// output of the differentiation rules and is not mathematically rigorous.
fn is_trivially_unity(e: &SymExpr) -> bool {
    match e {
        SymExpr::Primary(Primary::Integer(i)) => *i == 1,
        SymExpr::Mul(factors) => factors.iter().all(is_trivially_unity),
        SymExpr::Exp(base, exp) => is_trivially_zero(exp) || is_trivially_unity(base),
        SymExpr::Add(terms) => terms.len() == 1 && is_trivially_unity(&terms[0]),
        _ => false,
    }
}

/// Helper struct to build a product of expressions while applying basic simplification rules. If
/// any of the expressions are zero, the product is reduced to zero.
#[derive(Default)]
struct MultBuilder(Vec<SymExpr>);

impl From<MultBuilder> for SymExpr {
    fn from(value: MultBuilder) -> Self {
        SymExpr::Mul(value.0).downgrade()
    }
}

impl MultBuilder {
    fn mult(&mut self, e: SymExpr) {
        if self.0.first().is_some_and(is_trivially_zero) {
            return;
        }
        if is_trivially_zero(&e) {
            self.0 = vec![SymExpr::zero()];
            return;
        }

        if !is_trivially_unity(&e) {
            self.0.push(e)
        }
    }
}

/// Helper struct to build a summation of expressions while applying basic simplification rules.
/// Only non-zero expressions are added to the sum.
#[derive(Default)]
struct SumBuilder(Vec<SymExpr>);

impl From<SumBuilder> for SymExpr {
    fn from(value: SumBuilder) -> Self {
        SymExpr::Add(value.0).downgrade()
    }
}

impl SumBuilder {
    fn add(&mut self, e: SymExpr) {
        if !is_trivially_zero(&e) {
            self.0.push(e)
        }
    }
}

/// Builds the error returned when `expr` cannot be differentiated.
fn cannot_differentiate(expr: &SymExpr) -> Error {
    Error::new(vec![], CannotDifferentiate { expr: expr.to_string() })
}

/// `(f + g)' = f' + g'`
fn sum_rule(terms: &[SymExpr], var: &str) -> Result<SymExpr, Error> {
    let mut sum = SumBuilder::default();
    for term in terms {
        sum.add(derivative(term, var)?);
    }
    Ok(sum.into())
}

/// `(f * g * h)' = f' * g * h + f * g' * h + f * g * h'`
fn product_rule(product: &[SymExpr], var: &str) -> Result<SymExpr, Error> {
    let mut outer_sum = SumBuilder::default();

    for derivative_index in 0..product.len() {
        // factors free of the variable contribute nothing when they are the one differentiated
        if !product[derivative_index].contains_symbol(var) {
            continue;
        }

        let mut inner_mult = MultBuilder::default();
        for (term_index, term) in product.iter().enumerate() {
            if derivative_index == term_index {
                inner_mult.mult(derivative(term, var)?);
            } else {
                inner_mult.mult(term.clone());
            }
        }

        outer_sum.add(inner_mult.into());
    }

    Ok(outer_sum.into())
}

/// Differentiates `base^exp`.
///
/// - `(f^n)' = n * f^(n - 1) * f'` if `n` does not depend on the variable.
/// - `(a^g)' = a^g * log(a) * g'` if `a` does not depend on the variable.
/// - `(f^g)' = f^g * (g' * log(f) + g * f' / f)` otherwise.
fn power_rule(base: &SymExpr, exp: &SymExpr, var: &str) -> Result<SymExpr, Error> {
    let mut mult_group = MultBuilder::default();

    match (base.contains_symbol(var), exp.contains_symbol(var)) {
        (false, false) => return Ok(SymExpr::zero()),
        (true, false) => {
            mult_group.mult(exp.clone());
            mult_group.mult(SymExpr::pow(base.clone(), exp.clone() - SymExpr::one()));
            mult_group.mult(derivative(base, var)?);
        },
        (false, true) => {
            mult_group.mult(SymExpr::pow(base.clone(), exp.clone()));
            if !base.is_symbol("E") {
                mult_group.mult(SymExpr::call("log", vec![base.clone()]));
            }
            mult_group.mult(derivative(exp, var)?);
        },
        (true, true) => {
            let mut inner = SumBuilder::default();

            let mut log_term = MultBuilder::default();
            log_term.mult(derivative(exp, var)?);
            log_term.mult(SymExpr::call("log", vec![base.clone()]));
            inner.add(log_term.into());

            let mut ratio_term = MultBuilder::default();
            ratio_term.mult(exp.clone());
            ratio_term.mult(derivative(base, var)?);
            ratio_term.mult(base.clone().recip());
            inner.add(ratio_term.into());

            mult_group.mult(SymExpr::pow(base.clone(), exp.clone()));
            mult_group.mult(inner.into());
        },
    }

    Ok(mult_group.into())
}

/// Computes the derivative of the given expression with respect to `var`, without simplifying
/// it. Returns [`Err`] if the derivative could not be symbolically computed.
pub fn derivative(f: &SymExpr, var: &str) -> Result<SymExpr, Error> {
    if !f.contains_symbol(var) {
        return Ok(SymExpr::zero());
    }

    let expr = match f {
        SymExpr::Primary(Primary::Symbol(_)) => SymExpr::one(),
        SymExpr::Primary(Primary::Call(func, args)) => function::function_derivative(f, func, args, var)?,
        SymExpr::Primary(_) => SymExpr::zero(),
        SymExpr::Add(terms) => sum_rule(terms, var)?,
        SymExpr::Mul(factors) => product_rule(factors, var)?,
        SymExpr::Exp(base, exp) => power_rule(base, exp, var)?,
    };

    if is_trivially_zero(&expr) {
        Ok(SymExpr::zero())
    } else {
        Ok(expr)
    }
}

/// Computes and simplifies the derivative of the given expression with respect to `var`.
pub fn derive(f: &SymExpr, var: &str) -> Result<SymExpr, Error> {
    let raw = derivative(f, var)?;
    let simplified = simplify(&raw);
    debug!("d/d{} {} = {}", var, f, simplified);
    Ok(simplified)
}

/// Differentiates the expression with respect to each variable in turn, such that
/// `derive_many(f, ["x", "y"])` is the mixed partial derivative `d²f/dydx`.
pub fn derive_many<S: AsRef<str>>(f: &SymExpr, vars: &[S]) -> Result<SymExpr, Error> {
    vars.iter().try_fold(f.clone(), |acc, var| derive(&acc, var.as_ref()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::symbolic::{numeric::eval_f64, parse_expr};
    use assert_float_eq::{
        afe_abs,
        afe_relative_error_msg,
        afe_is_relative_eq,
        assert_float_relative_eq,
    };
    use pretty_assertions::assert_eq;

    fn derived(source: &str, var: &str) -> String {
        derive(&parse_expr(source).unwrap(), var).unwrap().to_string()
    }

    /// Evaluates the expression at `x = point`.
    fn eval_x(expr: &SymExpr, point: f64) -> f64 {
        eval_f64(&expr.subs("x", &SymExpr::float(point))).unwrap()
    }

    /// Compares the symbolic derivative against a central finite difference at each point.
    fn test_for_function(function: &str, points: impl IntoIterator<Item = f64>) {
        const DX: f64 = 1e-6;

        let expr = parse_expr(function).unwrap();
        let symbolic = derive(&expr, "x").unwrap();

        for point in points {
            let symbolically_computed = eval_x(&symbolic, point);
            let numerically_computed = (eval_x(&expr, point + DX) - eval_x(&expr, point - DX)) / (2.0 * DX);
            assert_float_relative_eq!(symbolically_computed, numerically_computed, 1e-4);
        }
    }

    #[test]
    fn power_rule() {
        assert_eq!(derived("x^2", "x"), "2*x");
        assert_eq!(derived("x^2 + x + 1", "x"), "2*x + 1");
        assert_eq!(derived("1/x", "x"), "-1/x**2");
        assert_eq!(derived("sqrt(x)", "x"), "1/(2*sqrt(x))");
    }

    #[test]
    fn constants_and_other_variables() {
        assert_eq!(derived("5", "x"), "0");
        assert_eq!(derived("y^2", "x"), "0");
        assert_eq!(derived("x*y", "x"), "y");
        assert_eq!(derived("pi*x", "x"), "pi");
    }

    #[test]
    fn chain_rule() {
        assert_eq!(derived("sin(x)", "x"), "cos(x)");
        assert_eq!(derived("cos(2*x)", "x"), "-2*sin(2*x)");
        assert_eq!(derived("exp(3*x)", "x"), "3*exp(3*x)");
        assert_eq!(derived("log(x)", "x"), "1/x");
    }

    #[test]
    fn exponential_bases() {
        assert_eq!(derived("2^x", "x"), "2**x*log(2)");
    }

    #[test]
    fn mixed_partials() {
        let f = parse_expr("x^2*y^3").unwrap();
        assert_eq!(derive_many(&f, &["x", "y"]).unwrap().to_string(), "6*x*y**2");
    }

    #[test]
    fn numerically_consistent() {
        test_for_function("x^x", [0.5, 1.0, 2.0]);
        test_for_function("tan(x) + sec(x)", [0.1, 0.5, 1.0]);
        test_for_function("atan(x^2)", [-1.0, 0.5, 3.0]);
        test_for_function("asin(x/2) + acos(x/3)", [-0.5, 0.0, 0.5]);
        test_for_function("x*log(x, 2)", [0.5, 1.0, 4.0]);
        test_for_function("tanh(x)*sinh(x)", [-1.0, 0.2, 2.0]);
        test_for_function("root(x, 3) + cbrt(x^2)", [1.0, 2.0, 8.0]);
        test_for_function("asec(x) + acsc(x)", [1.5, 2.0, 4.0]);
        test_for_function("asinh(x) + acosh(x + 2) + atanh(x/2)", [0.1, 0.5, 1.0]);
    }

    #[test]
    fn undifferentiable() {
        let err = derive(&parse_expr("factorial(x)").unwrap(), "x").unwrap_err();
        assert!(err.downcast_ref::<CannotDifferentiate>().is_some());
    }
}
