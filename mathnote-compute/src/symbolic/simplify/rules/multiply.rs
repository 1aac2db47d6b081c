//! Simplification rules for expressions involving multiplication, including combining like
//! factors.

use crate::symbolic::{
    expr::{Number, SymExpr},
    simplify::{rules::do_multiply, step::Step},
    step_collector::StepCollector,
};

/// `a*(b*c) = a*b*c`
pub fn flatten_mul(expr: &SymExpr, step_collector: &mut dyn StepCollector<Step>) -> Option<SymExpr> {
    let opt = do_multiply(expr, |factors| {
        if factors.len() > 1 && !factors.iter().any(|factor| matches!(factor, SymExpr::Mul(_))) {
            return None;
        }

        let new_factors = factors.iter()
            .flat_map(|factor| factor.factors().to_vec())
            .collect::<Vec<_>>();
        Some(SymExpr::Mul(new_factors).downgrade())
    })?;

    step_collector.push(Step::FlattenMultiply);
    Some(opt)
}

/// `0*a = 0`
/// `a*0 = 0`
///
/// Products with an infinite factor are left to the rules for infinities, since `0*oo` is
/// undefined.
pub fn multiply_zero(expr: &SymExpr, step_collector: &mut dyn StepCollector<Step>) -> Option<SymExpr> {
    let opt = do_multiply(expr, |factors| {
        let zero = factors.iter().find(|factor| factor.is_zero())?;
        if factors.iter().any(SymExpr::has_unbounded) {
            return None;
        }
        Some(zero.clone())
    })?;

    // keep the step collection logic outside of the closure to make it implement `Fn`
    step_collector.push(Step::MultiplyZero);
    Some(opt)
}

/// `1*a = a`
/// `a*1 = a`
pub fn multiply_one(expr: &SymExpr, step_collector: &mut dyn StepCollector<Step>) -> Option<SymExpr> {
    let opt = do_multiply(expr, |factors| {
        let new_factors = factors.iter()
            .filter(|factor| !factor.is_one())
            .cloned()
            .collect::<Vec<_>>();

        if new_factors.len() == factors.len() {
            None
        } else {
            Some(SymExpr::Mul(new_factors).downgrade())
        }
    })?;

    step_collector.push(Step::MultiplyOne);
    Some(opt)
}

/// Multiplies all numeric factors together into a single coefficient.
///
/// `2*x*3 = 6*x`
/// `2*x/2 = x`
pub fn multiply_numbers(expr: &SymExpr, step_collector: &mut dyn StepCollector<Step>) -> Option<SymExpr> {
    let opt = do_multiply(expr, |factors| {
        let count = factors.iter().filter(|factor| factor.is_number()).count();
        if count < 2 {
            return None;
        }

        let mut product = Number::one();
        let mut new_factors = Vec::with_capacity(factors.len() - count + 1);
        for factor in factors {
            match factor.as_number() {
                Some(n) => product = product.mul(n),
                None => new_factors.push(factor.clone()),
            }
        }

        if !product.is_one() {
            new_factors.insert(0, product.into_expr());
        }
        Some(SymExpr::Mul(new_factors).downgrade())
    })?;

    step_collector.push(Step::MultiplyNumbers);
    Some(opt)
}

/// Combines like factors.
///
/// `a*a = a^2`
/// `a^b*a^c = a^(b+c)`
/// `sqrt(2)*sqrt(2) = 2^(1/2+1/2)`
/// etc.
///
/// Numeric factors are not combined with powers of the same number, so that `2*sqrt(2)` keeps its
/// form.
pub fn combine_like_factors(expr: &SymExpr, step_collector: &mut dyn StepCollector<Step>) -> Option<SymExpr> {
    let opt = do_multiply(expr, |factors| {
        // (base, exponents), in order of first appearance
        let mut groups: Vec<(SymExpr, Vec<SymExpr>, &SymExpr)> = Vec::new();
        let mut numbers = Vec::new();

        // this is O(n^2) worst case, due to scanning every group for each factor
        for factor in factors {
            if factor.is_number() {
                numbers.push(factor.clone());
                continue;
            }

            let (base, exp) = factor.as_power();
            match groups.iter_mut().find(|(other, _, _)| *other == base) {
                Some((_, exps, _)) => exps.push(exp),
                None => groups.push((base, vec![exp], factor)),
            }
        }

        if groups.iter().all(|(_, exps, _)| exps.len() == 1) {
            return None;
        }

        let mut new_factors = numbers;
        new_factors.extend(groups.into_iter().map(|(base, exps, first)| {
            if exps.len() == 1 {
                first.clone()
            } else {
                SymExpr::pow(base, SymExpr::Add(exps))
            }
        }));
        Some(SymExpr::Mul(new_factors).downgrade())
    })?;

    step_collector.push(Step::CombineLikeFactors);
    Some(opt)
}

/// Distributes a numeric coefficient over a sum.
///
/// `2*(x+1) = 2*x + 2`
/// `-(x-y) = -x + y`
pub fn distribute_coefficient(expr: &SymExpr, step_collector: &mut dyn StepCollector<Step>) -> Option<SymExpr> {
    let opt = do_multiply(expr, |factors| {
        let [coeff, SymExpr::Add(terms)] = factors else {
            return None;
        };
        if !coeff.is_number() {
            return None;
        }

        Some(SymExpr::Add(
            terms.iter()
                .map(|term| coeff.clone() * term.clone())
                .collect(),
        ))
    })?;

    step_collector.push(Step::DistributeCoefficient);
    Some(opt)
}

/// Applies all multiplication rules.
pub fn all(expr: &SymExpr, step_collector: &mut dyn StepCollector<Step>) -> Option<SymExpr> {
    flatten_mul(expr, step_collector)
        .or_else(|| multiply_zero(expr, step_collector))
        .or_else(|| multiply_one(expr, step_collector))
        .or_else(|| multiply_numbers(expr, step_collector))
        .or_else(|| combine_like_factors(expr, step_collector))
        .or_else(|| distribute_coefficient(expr, step_collector))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn numbers_fold_into_coefficient() {
        let expr = SymExpr::Mul(vec![
            SymExpr::int(2),
            SymExpr::symbol("x"),
            SymExpr::int(3),
        ]);
        let result = multiply_numbers(&expr, &mut ()).unwrap();
        assert_eq!(result, SymExpr::Mul(vec![SymExpr::int(6), SymExpr::symbol("x")]));
    }

    #[test]
    fn zero_does_not_absorb_infinity() {
        let expr = SymExpr::Mul(vec![SymExpr::zero(), SymExpr::infinity()]);
        assert_eq!(multiply_zero(&expr, &mut ()), None);
    }

    #[test]
    fn like_factors_add_exponents() {
        let x = SymExpr::symbol("x");
        let expr = SymExpr::Mul(vec![
            x.clone(),
            SymExpr::symbol("y"),
            SymExpr::pow(x.clone(), SymExpr::int(2)),
        ]);
        let result = combine_like_factors(&expr, &mut ()).unwrap();
        assert_eq!(result, SymExpr::Mul(vec![
            SymExpr::pow(x, SymExpr::Add(vec![SymExpr::int(1), SymExpr::int(2)])),
            SymExpr::symbol("y"),
        ]));
    }
}
