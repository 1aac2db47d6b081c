//! Simplification rules for expressions involving the imaginary unit.

use crate::symbolic::{
    expr::SymExpr,
    simplify::{rules::do_power, step::Step},
    step_collector::StepCollector,
};

// i^..
// 0 1 2  3
// 1 i -1 -i
//
// 4 5 6  7
// 1 i -1 -i

/// Returns the residue of the exponent modulo 4, if the expression is the imaginary unit raised to
/// an integer power.
fn i_pow_residue(lhs: &SymExpr, rhs: &SymExpr) -> Option<u32> {
    if lhs.is_symbol("I") {
        Some(rhs.as_integer()?.mod_u(4))
    } else {
        None
    }
}

/// `i^(4n) = 1`
///
/// `i^0` can be handled by `power_zero`, but this rule is more general.
pub fn i_pow_0(expr: &SymExpr, step_collector: &mut dyn StepCollector<Step>) -> Option<SymExpr> {
    let opt = do_power(expr, |lhs, rhs| {
        (i_pow_residue(lhs, rhs)? == 0).then(SymExpr::one)
    })?;

    step_collector.push(Step::I0);
    Some(opt)
}

/// `i^(4n+1) = i`
pub fn i_pow_1(expr: &SymExpr, step_collector: &mut dyn StepCollector<Step>) -> Option<SymExpr> {
    let opt = do_power(expr, |lhs, rhs| {
        (i_pow_residue(lhs, rhs)? == 1).then(SymExpr::i)
    })?;

    step_collector.push(Step::I1);
    Some(opt)
}

/// `i^(4n+2) = -1`
pub fn i_pow_2(expr: &SymExpr, step_collector: &mut dyn StepCollector<Step>) -> Option<SymExpr> {
    let opt = do_power(expr, |lhs, rhs| {
        (i_pow_residue(lhs, rhs)? == 2).then(SymExpr::neg_one)
    })?;

    step_collector.push(Step::I2);
    Some(opt)
}

/// `i^(4n+3) = -i`
pub fn i_pow_3(expr: &SymExpr, step_collector: &mut dyn StepCollector<Step>) -> Option<SymExpr> {
    let opt = do_power(expr, |lhs, rhs| {
        (i_pow_residue(lhs, rhs)? == 3).then(|| -SymExpr::i())
    })?;

    step_collector.push(Step::I3);
    Some(opt)
}

/// Applies all imaginary unit rules.
///
/// All imaginary unit rules will reduce the complexity of the expression.
pub fn all(expr: &SymExpr, step_collector: &mut dyn StepCollector<Step>) -> Option<SymExpr> {
    i_pow_0(expr, step_collector)
        .or_else(|| i_pow_1(expr, step_collector))
        .or_else(|| i_pow_2(expr, step_collector))
        .or_else(|| i_pow_3(expr, step_collector))
}
