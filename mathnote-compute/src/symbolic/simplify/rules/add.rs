//! Simplification rules for expressions involving addition, including combining like terms.

use crate::symbolic::{
    expr::{Number, SymExpr},
    simplify::{rules::do_add, step::Step},
    step_collector::StepCollector,
};

/// `a+(b+c) = a+b+c`
pub fn flatten_add(expr: &SymExpr, step_collector: &mut dyn StepCollector<Step>) -> Option<SymExpr> {
    let opt = do_add(expr, |terms| {
        if terms.len() > 1 && !terms.iter().any(|term| matches!(term, SymExpr::Add(_))) {
            return None;
        }

        let new_terms = terms.iter()
            .flat_map(|term| term.terms().to_vec())
            .collect::<Vec<_>>();
        Some(SymExpr::Add(new_terms).downgrade())
    })?;

    step_collector.push(Step::FlattenAdd);
    Some(opt)
}

/// `0+a = a`
/// `a+0 = a`
pub fn add_zero(expr: &SymExpr, step_collector: &mut dyn StepCollector<Step>) -> Option<SymExpr> {
    let opt = do_add(expr, |terms| {
        let new_terms = terms.iter()
            .filter(|term| !term.is_zero())
            .cloned()
            .collect::<Vec<_>>();

        if new_terms.len() == terms.len() {
            None
        } else {
            Some(SymExpr::Add(new_terms).downgrade())
        }
    })?;

    // keep the step collection logic outside of the closure to make it implement `Fn`
    step_collector.push(Step::AddZero);
    Some(opt)
}

/// Adds all numeric terms together, such as `1/3 + x + 1/6 = x + 1/2`.
pub fn add_numbers(expr: &SymExpr, step_collector: &mut dyn StepCollector<Step>) -> Option<SymExpr> {
    let opt = do_add(expr, |terms| {
        let count = terms.iter().filter(|term| term.is_number()).count();
        if count < 2 {
            return None;
        }

        let mut sum = Number::zero();
        let mut first_idx = None;
        let mut new_terms = Vec::with_capacity(terms.len() - count + 1);
        for term in terms {
            match term.as_number() {
                Some(n) => {
                    sum = sum.add(n);
                    first_idx.get_or_insert(new_terms.len());
                },
                None => new_terms.push(term.clone()),
            }
        }

        if let Some(idx) = first_idx {
            new_terms.insert(idx, sum.into_expr());
        }
        Some(SymExpr::Add(new_terms).downgrade())
    })?;

    step_collector.push(Step::AddNumbers);
    Some(opt)
}

/// Combines like terms.
///
/// `a+a = 2a`
/// `a+a+a = 3a`
/// `2a+3a = 5a`
/// `2a-2a = 0`
/// etc.
pub fn combine_like_terms(expr: &SymExpr, step_collector: &mut dyn StepCollector<Step>) -> Option<SymExpr> {
    let opt = do_add(expr, |terms| {
        // (summed coefficient, remaining factors, terms in the group), in order of first appearance
        let mut groups: Vec<(Number, SymExpr, Vec<&SymExpr>)> = Vec::new();
        let mut numbers = Vec::new();

        // this is O(n^2) worst case, due to scanning every group for each term
        for term in terms {
            if term.is_number() {
                numbers.push(term.clone());
                continue;
            }

            let (coeff, rest) = term.split_coefficient();
            match groups.iter_mut().find(|(_, other, _)| *other == rest) {
                Some((sum, _, members)) => {
                    *sum = std::mem::replace(sum, Number::zero()).add(coeff);
                    members.push(term);
                },
                None => groups.push((coeff, rest, vec![term])),
            }
        }

        if groups.iter().all(|(_, _, members)| members.len() == 1) {
            return None;
        }

        let mut new_terms = groups.into_iter()
            .filter_map(|(coeff, rest, members)| {
                if members.len() == 1 {
                    Some(members[0].clone())
                } else if coeff.is_zero() {
                    None
                } else if coeff.is_one() {
                    Some(rest)
                } else {
                    Some(coeff.into_expr() * rest)
                }
            })
            .collect::<Vec<_>>();
        new_terms.extend(numbers);
        Some(SymExpr::Add(new_terms).downgrade())
    })?;

    step_collector.push(Step::CombineLikeTerms);
    Some(opt)
}

/// Applies all addition rules.
///
/// All addition rules will reduce the complexity of the expression.
pub fn all(expr: &SymExpr, step_collector: &mut dyn StepCollector<Step>) -> Option<SymExpr> {
    flatten_add(expr, step_collector)
        .or_else(|| add_zero(expr, step_collector))
        .or_else(|| add_numbers(expr, step_collector))
        .or_else(|| combine_like_terms(expr, step_collector))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn numbers_fold_into_one_term() {
        let expr = SymExpr::Add(vec![
            SymExpr::int(1),
            SymExpr::symbol("x"),
            SymExpr::int(2),
        ]);
        let result = add_numbers(&expr, &mut ()).unwrap();
        assert_eq!(result, SymExpr::Add(vec![SymExpr::int(3), SymExpr::symbol("x")]));
    }

    #[test]
    fn like_terms_cancel() {
        let x = SymExpr::symbol("x");
        let expr = SymExpr::Add(vec![
            SymExpr::Mul(vec![SymExpr::int(2), x.clone()]),
            SymExpr::Mul(vec![SymExpr::int(-2), x.clone()]),
            SymExpr::symbol("y"),
        ]);
        let result = combine_like_terms(&expr, &mut ()).unwrap();
        assert_eq!(result, SymExpr::symbol("y"));
    }

    #[test]
    fn unlike_terms_stay() {
        let expr = SymExpr::Add(vec![SymExpr::symbol("x"), SymExpr::symbol("y")]);
        assert_eq!(combine_like_terms(&expr, &mut ()), None);
    }
}
