//! Systems of linear equations, solved by Gauss-Jordan elimination.

use log::debug;
use mathnote_error::Error;
use super::super::{
    error::NotLinear,
    expr::SymExpr,
    poly::Poly,
    relation::{RelKind, Relation},
    simplify,
};

fn not_linear<S: AsRef<str>>(equation: &Relation, vars: &[S]) -> Error {
    let vars = vars.iter().map(|v| v.as_ref()).collect::<Vec<&str>>().join(", ");
    Error::new(vec![], NotLinear { equation: equation.to_string(), vars })
}

/// Reads the equation as a row `[a_1, ..., a_n, b]` of the augmented matrix, such that the
/// equation is `a_1*v_1 + ... + a_n*v_n = b`.
fn row<S: AsRef<str>>(equation: &Relation, vars: &[S]) -> Result<Vec<SymExpr>, Error> {
    if equation.kind != RelKind::Eq {
        return Err(not_linear(equation, vars));
    }
    let difference = simplify(&equation.difference());

    let mut coeffs = Vec::with_capacity(vars.len() + 1);
    for var in vars {
        let coeff = Poly::from_expr(&difference, var.as_ref())
            .filter(|poly| poly.degree() <= 1)
            .map(|poly| poly.coeff(1))
            .ok_or_else(|| not_linear(equation, vars))?;
        if vars.iter().any(|v| coeff.contains_symbol(v.as_ref())) {
            return Err(not_linear(equation, vars));
        }
        coeffs.push(coeff);
    }

    let constant = vars.iter()
        .fold(difference.clone(), |acc, var| acc.subs(var.as_ref(), &SymExpr::zero()));
    let constant = simplify(&constant);

    // anything left over, such as `x*y`, makes the equation non-linear
    let linear = coeffs.iter()
        .zip(vars)
        .fold(constant.clone(), |acc, (coeff, var)| acc + coeff.clone() * SymExpr::symbol(var.as_ref()));
    if !simplify(&(difference - linear)).is_zero() {
        return Err(not_linear(equation, vars));
    }

    coeffs.push(simplify(&-constant));
    Ok(coeffs)
}

/// Solves a system of linear equations for the given variables.
///
/// Returns [`None`] if the system has no solution. Otherwise, returns one value per variable.
/// If the system has infinitely many solutions, the values are expressed in terms of the
/// variables that remain free, which are their own value.
pub fn linsolve<S: AsRef<str>>(equations: &[Relation], vars: &[S]) -> Result<Option<Vec<SymExpr>>, Error> {
    let mut matrix = equations.iter()
        .map(|equation| row(equation, vars))
        .collect::<Result<Vec<_>, _>>()?;
    let n = vars.len();

    // reduce to reduced row echelon form
    let mut pivots = Vec::new();
    let mut current = 0;
    for col in 0..n {
        let Some(found) = (current..matrix.len()).find(|&r| !matrix[r][col].is_zero()) else {
            continue;
        };
        matrix.swap(current, found);

        let pivot = matrix[current][col].clone();
        for value in matrix[current].iter_mut() {
            *value = simplify(&(value.clone() / pivot.clone()));
        }

        for r in 0..matrix.len() {
            if r == current || matrix[r][col].is_zero() {
                continue;
            }
            let factor = matrix[r][col].clone();
            for c in 0..=n {
                let reduced = matrix[r][c].clone() - factor.clone() * matrix[current][c].clone();
                matrix[r][c] = simplify(&reduced);
            }
        }

        pivots.push(col);
        current += 1;
    }

    // a row `0 = b` with `b != 0` is inconsistent
    if matrix[current..].iter().any(|row| !row[n].is_zero()) {
        debug!("linear system is inconsistent");
        return Ok(None);
    }

    let free = (0..n).filter(|col| !pivots.contains(col)).collect::<Vec<_>>();
    let mut solution = (0..n)
        .map(|col| SymExpr::symbol(vars[col].as_ref()))
        .collect::<Vec<_>>();
    for (r, &col) in pivots.iter().enumerate() {
        let value = free.iter().fold(matrix[r][n].clone(), |acc, &k| {
            acc - matrix[r][k].clone() * SymExpr::symbol(vars[k].as_ref())
        });
        solution[col] = simplify(&value);
    }
    Ok(Some(solution))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::symbolic::parse_statement;
    use pretty_assertions::assert_eq;

    fn system(sources: &[&str], vars: &[&str]) -> Result<Option<Vec<String>>, Error> {
        let equations = sources.iter()
            .map(|source| parse_statement(source).unwrap().as_relation().unwrap().clone())
            .collect::<Vec<_>>();
        linsolve(&equations, vars)
            .map(|solution| solution.map(|values| values.iter().map(ToString::to_string).collect()))
    }

    #[test]
    fn unique_solution() {
        assert_eq!(
            system(&["3*x + 2*y - z = 1", "2*x - 2*y + 4*z = -2", "2*x - y + 2*z = 0"], &["x", "y", "z"]).unwrap(),
            Some(vec!["1".to_string(), "-2".to_string(), "-2".to_string()]),
        );
        assert_eq!(
            system(&["x + y = 2", "2*x + y = 4"], &["x", "y"]).unwrap(),
            Some(vec!["2".to_string(), "0".to_string()]),
        );
    }

    #[test]
    fn inconsistent() {
        assert_eq!(system(&["x + y = 1", "x + y = 2"], &["x", "y"]).unwrap(), None);
    }

    #[test]
    fn free_variables() {
        let solution = system(&["x + y = 1"], &["x", "y"]).unwrap().unwrap();
        assert_eq!(solution[1], "y");
        let x = parse_statement(&solution[0]).unwrap();
        let sum = simplify(&(x.as_expr().unwrap().clone() + SymExpr::symbol("y")));
        assert_eq!(sum.to_string(), "1");
    }

    #[test]
    fn non_linear() {
        let err = system(&["x*y = 1"], &["x", "y"]).unwrap_err();
        assert!(err.downcast_ref::<NotLinear>().is_some());
        let err = system(&["x^2 = 1"], &["x"]).unwrap_err();
        assert!(err.downcast_ref::<NotLinear>().is_some());
    }
}
