//! Rules that sort the terms of sums and the factors of products into a canonical order.
//!
//! Terms are sorted by descending degree in each free symbol, taking the symbols in alphabetical
//! order, with numbers last: `x**2 + x*y + y + 1`. Factors are sorted with the numeric coefficient
//! first, followed by roots of numbers, constants, symbols, and function calls: `2*sqrt(3)*pi*x*sin(x)`.

use crate::symbolic::{
    expr::SymExpr,
    simplify::{rules::{do_add, do_multiply}, step::Step},
    step_collector::StepCollector,
};
use std::cmp::Ordering;

/// Returns the degree of a term in the given symbol. Factors with a non-numeric exponent count as
/// degree zero.
fn degree(term: &SymExpr, symbol: &str) -> f64 {
    term.factors()
        .iter()
        .map(|factor| {
            let (base, exp) = factor.as_power();
            if base.is_symbol(symbol) {
                exp.as_number().map(|n| n.to_float().to_f64()).unwrap_or(0.0)
            } else {
                0.0
            }
        })
        .sum()
}

/// Compares two terms of a sum.
fn compare_terms(lhs: &SymExpr, rhs: &SymExpr, symbols: &[String]) -> Ordering {
    match (lhs.is_number(), rhs.is_number()) {
        (true, false) => return Ordering::Greater,
        (false, true) => return Ordering::Less,
        (true, true) => return Ordering::Equal,
        (false, false) => {},
    }

    for symbol in symbols {
        let (l, r) = (degree(lhs, symbol), degree(rhs, symbol));
        match r.partial_cmp(&l) {
            Some(Ordering::Equal) | None => {},
            Some(ordering) => return ordering,
        }
    }

    let (_, lhs_rest) = lhs.split_coefficient();
    let (_, rhs_rest) = rhs.split_coefficient();
    lhs_rest.to_string().cmp(&rhs_rest.to_string())
}

/// Sorts the terms of a sum.
pub fn sort_terms(expr: &SymExpr, step_collector: &mut dyn StepCollector<Step>) -> Option<SymExpr> {
    let opt = do_add(expr, |terms| {
        let symbols = expr.free_symbols().into_iter().collect::<Vec<_>>();
        let mut sorted = terms.to_vec();
        sorted.sort_by(|lhs, rhs| compare_terms(lhs, rhs, &symbols));

        let new_expr = SymExpr::Add(sorted);
        if new_expr.is_identical(expr) {
            None
        } else {
            Some(new_expr)
        }
    })?;

    step_collector.push(Step::SortTerms);
    Some(opt)
}

/// Returns the sorting class of a factor in a product.
fn factor_class(factor: &SymExpr) -> u8 {
    let (base, _) = factor.as_power();
    if factor.is_number() {
        0
    } else if base.is_number() {
        1
    } else if base.is_symbol("E") && !matches!(factor, SymExpr::Primary(_)) {
        4
    } else if base.as_symbol().is_some() && base.free_symbols().is_empty() {
        2
    } else if base.as_symbol().is_some() {
        3
    } else if base.as_call().is_some() {
        4
    } else if matches!(base, SymExpr::Add(_)) {
        5
    } else {
        6
    }
}

/// Compares two factors of a product.
fn compare_factors(lhs: &SymExpr, rhs: &SymExpr) -> Ordering {
    factor_class(lhs).cmp(&factor_class(rhs))
        .then_with(|| lhs.as_power().0.to_string().cmp(&rhs.as_power().0.to_string()))
        .then_with(|| lhs.to_string().cmp(&rhs.to_string()))
}

/// Sorts the factors of a product.
pub fn sort_factors(expr: &SymExpr, step_collector: &mut dyn StepCollector<Step>) -> Option<SymExpr> {
    let opt = do_multiply(expr, |factors| {
        let mut sorted = factors.to_vec();
        sorted.sort_by(compare_factors);

        let new_expr = SymExpr::Mul(sorted);
        if new_expr.is_identical(expr) {
            None
        } else {
            Some(new_expr)
        }
    })?;

    step_collector.push(Step::SortFactors);
    Some(opt)
}

/// Applies all ordering rules.
pub fn all(expr: &SymExpr, step_collector: &mut dyn StepCollector<Step>) -> Option<SymExpr> {
    sort_terms(expr, step_collector)
        .or_else(|| sort_factors(expr, step_collector))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn descending_degree() {
        let x = SymExpr::symbol("x");
        let expr = SymExpr::Add(vec![
            SymExpr::int(1),
            x.clone(),
            SymExpr::pow(x.clone(), SymExpr::int(2)),
        ]);
        let sorted = sort_terms(&expr, &mut ()).unwrap();
        assert_eq!(sorted.to_string(), "x**2 + x + 1");
    }

    #[test]
    fn coefficient_first() {
        let expr = SymExpr::Mul(vec![
            SymExpr::symbol("y"),
            SymExpr::symbol("x"),
            SymExpr::call("sin", vec![SymExpr::symbol("x")]),
            SymExpr::pi(),
            SymExpr::int(2),
        ]);
        let sorted = sort_factors(&expr, &mut ()).unwrap();
        assert_eq!(sorted.to_string(), "2*pi*x*y*sin(x)");
    }

    #[test]
    fn already_sorted() {
        let expr = SymExpr::Add(vec![SymExpr::symbol("x"), SymExpr::int(-1)]);
        assert_eq!(sort_terms(&expr, &mut ()), None);
    }
}
