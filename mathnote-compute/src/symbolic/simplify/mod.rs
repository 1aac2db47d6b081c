//! Simplification of expressions to a canonical form.
//!
//! Simplification works bottom-up. Each pass first simplifies the children of a node, then
//! repeatedly applies the [rules](rules::all) to the node itself until none of them applies.
//! Passes are repeated until the expression stops changing, since a rule applied at one node can
//! produce children that are themselves not simplified (for example, distributing a coefficient
//! over a sum creates new products).
//!
//! The canonical form has these properties:
//!
//! - Sums and products are flat, with numbers folded into a single term or coefficient.
//! - Like terms and like factors are combined.
//! - Subtraction is addition of a term with a negative coefficient; division is multiplication by
//! a negative power.
//! - Terms are sorted by descending degree, with numbers last. Factors are sorted with the
//! numeric coefficient first.
//! - Known values of functions are evaluated, such as `sin(pi/6) = 1/2` or `log(1) = 0`.
//!
//! ```
//! use mathnote_compute::symbolic::{parse_expr, simplify::simplify};
//!
//! let expr = parse_expr("x + x + 2*x^2 - x^2").unwrap();
//! assert_eq!(simplify(&expr).to_string(), "x**2 + 2*x");
//! ```

pub mod rules;
pub mod step;

use log::debug;
use step::Step;
use super::{
    expr::{Number, Primary, SymExpr},
    relation::{RelKind, Relation, Statement},
    step_collector::StepCollector,
};

/// The maximum number of bottom-up passes over the expression.
const MAX_PASSES: usize = 64;

/// The maximum number of rules applied to a single node in one pass.
const MAX_REWRITES: usize = 64;

/// Simplifies the given expression.
pub fn simplify(expr: &SymExpr) -> SymExpr {
    simplify_with(expr, &mut ())
}

/// Simplifies the given expression, returning the steps that were taken.
pub fn simplify_with_steps(expr: &SymExpr) -> (SymExpr, Vec<Step>) {
    let mut steps = Vec::new();
    let simplified = simplify_with(expr, &mut steps);
    (simplified, steps)
}

/// Simplifies the given expression, reporting every rule applied to the step collector.
pub fn simplify_with(expr: &SymExpr, step_collector: &mut dyn StepCollector<Step>) -> SymExpr {
    let mut current = expr.clone();
    for _ in 0..MAX_PASSES {
        let next = simplify_pass(&current, step_collector);
        if next.is_identical(&current) {
            return next;
        }
        current = next;
    }

    debug!("simplification of `{}` stopped before reaching a fixed point", expr);
    current
}

/// Runs one bottom-up pass over the expression.
fn simplify_pass(expr: &SymExpr, step_collector: &mut dyn StepCollector<Step>) -> SymExpr {
    let mut expr = match expr {
        SymExpr::Primary(Primary::Call(name, args)) => SymExpr::call(
            name.clone(),
            args.iter().map(|arg| simplify_pass(arg, step_collector)).collect(),
        ),
        SymExpr::Primary(_) => expr.clone(),
        SymExpr::Add(terms) => SymExpr::Add(
            terms.iter().map(|term| simplify_pass(term, step_collector)).collect(),
        ),
        SymExpr::Mul(factors) => SymExpr::Mul(
            factors.iter().map(|factor| simplify_pass(factor, step_collector)).collect(),
        ),
        SymExpr::Exp(base, exp) => SymExpr::pow(
            simplify_pass(base, step_collector),
            simplify_pass(exp, step_collector),
        ),
    };

    for _ in 0..MAX_REWRITES {
        match rules::all(&expr, step_collector) {
            Some(next) => expr = next,
            None => break,
        }
    }

    expr
}

/// Simplifies both sides of a relation.
///
/// If the relation is between two numbers, or the sides of an equation are equal, the relation
/// is decided and the truth value is returned instead.
pub fn simplify_statement(stmt: &Statement) -> Statement {
    match stmt {
        Statement::Expr(expr) => Statement::Expr(simplify(expr)),
        Statement::Relation(relation) => {
            let lhs = simplify(&relation.lhs);
            let rhs = simplify(&relation.rhs);
            decide(&lhs, relation.kind, &rhs)
                .map(Statement::Bool)
                .unwrap_or_else(|| Statement::Relation(Relation::new(lhs, relation.kind, rhs)))
        },
        Statement::Bool(value) => Statement::Bool(*value),
    }
}

/// Decides a relation between two simplified expressions, if possible without knowing the values
/// of any symbols.
fn decide(lhs: &SymExpr, kind: RelKind, rhs: &SymExpr) -> Option<bool> {
    if lhs == rhs && !lhs.has_unbounded() {
        return Some(kind.holds_for_sign(std::cmp::Ordering::Equal));
    }

    let (Some(lhs), Some(rhs)) = (Number::from_expr(lhs), Number::from_expr(rhs)) else {
        return None;
    };
    Some(kind.holds_for_sign(lhs.cmp_value(&rhs)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::symbolic::{parse_expr, parse_statement};
    use pretty_assertions::assert_eq;

    fn simplified(source: &str) -> String {
        simplify(&parse_expr(source).unwrap()).to_string()
    }

    #[test]
    fn combine_terms_and_factors() {
        assert_eq!(simplified("x + x + x"), "3*x");
        assert_eq!(simplified("x * x^2 * y"), "x**3*y");
        assert_eq!(simplified("x / x"), "1");
        assert_eq!(simplified("2*x/4"), "x/2");
        assert_eq!(simplified("3*x - 3*x + 1"), "1");
    }

    #[test]
    fn ordering() {
        assert_eq!(simplified("1 + x + x^2"), "x**2 + x + 1");
        assert_eq!(simplified("y*x*2"), "2*x*y");
        assert_eq!(simplified("x - 1"), "x - 1");
    }

    #[test]
    fn pythagorean_identity() {
        assert_eq!(simplified("sin(x)^2 + cos(x)^2"), "1");
        assert_eq!(simplified("2*cos(t)^2 + y + 2*sin(t)^2"), "y + 2");
        assert_ne!(simplified("sin(x)^2 + cos(2*x)^2"), "1");
    }

    #[test]
    fn distribution() {
        assert_eq!(simplified("2*(x + 1)"), "2*x + 2");
        assert_eq!(simplified("(2*x)^2"), "4*x**2");
        assert_eq!(simplified("1/(2*x)"), "1/(2*x)");
    }

    #[test]
    fn numbers() {
        assert_eq!(simplified("2 + 2"), "4");
        assert_eq!(simplified("1/3 + 1/6"), "1/2");
        assert_eq!(simplified("2^10"), "1024");
        assert_eq!(simplified("2^-2"), "1/4");
        assert_eq!(simplified("0.5 * 3"), "1.5");
    }

    #[test]
    fn roots() {
        assert_eq!(simplified("sqrt(12)"), "2*sqrt(3)");
        assert_eq!(simplified("sqrt(16)"), "4");
        assert_eq!(simplified("8^(1/3)"), "2");
        assert_eq!(simplified("2^(-1/2)"), "sqrt(2)/2");
        assert_eq!(simplified("sqrt(-4)"), "2*I");
        assert_eq!(simplified("sqrt(2)*sqrt(2)"), "2");
    }

    #[test]
    fn imaginary_unit() {
        assert_eq!(simplified("I^2"), "-1");
        assert_eq!(simplified("I^7"), "-I");
        assert_eq!(simplified("I*I*I*I"), "1");
    }

    #[test]
    fn infinity() {
        assert_eq!(simplified("oo + 1"), "oo");
        assert_eq!(simplified("oo - oo"), "nan");
        assert_eq!(simplified("-2*oo"), "-oo");
        assert_eq!(simplified("1/0"), "zoo");
        assert_eq!(simplified("0*oo"), "nan");
        assert_eq!(simplified("2^(-oo)"), "0");
    }

    #[test]
    fn steps_are_collected() {
        let (result, steps) = simplify_with_steps(&parse_expr("x + 0").unwrap());
        assert_eq!(result.to_string(), "x");
        assert!(steps.contains(&Step::AddZero));
    }

    #[test]
    fn relations() {
        let stmt = parse_statement("1 = 1").unwrap();
        assert_eq!(simplify_statement(&stmt), Statement::Bool(true));

        let stmt = parse_statement("2 < 1").unwrap();
        assert_eq!(simplify_statement(&stmt), Statement::Bool(false));

        let stmt = parse_statement("x + x = 4").unwrap();
        assert_eq!(simplify_statement(&stmt).to_string(), "Eq(2*x, 4)");
    }
}
