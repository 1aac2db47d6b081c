//! Conversion from the parser's AST into [`SymExpr`]s.
//!
//! Conversion checks every function call against the table of [built-in
//! functions](crate::funcs), so that an expression that converts successfully only calls
//! functions the engine understands, with the right number of arguments.

use crate::{
    funcs,
    primitive::{float_from_str, int_from_str},
    symbolic::{
        error::{FunctionAsSymbol, InvalidNumber, UnknownFunction, WrongArity},
        relation::{Relation, Statement},
    },
};
use mathnote_error::Error;
use mathnote_parser::parser::{
    call::Call,
    expr::Expr as AstExpr,
    literal::Literal,
    relation::{Relation as AstRelation, Stmt},
    token::op::{BinOpKind, UnaryOpKind},
};
use super::{Primary, SymExpr};

fn convert_call(call: &Call) -> Result<SymExpr, Error> {
    let name = &call.name.name;
    let Some(builtin) = funcs::lookup(name) else {
        return Err(Error::new(vec![call.name.span.clone()], UnknownFunction {
            name: name.clone(),
        }));
    };

    if !builtin.accepts(call.args.len()) {
        return Err(Error::new(vec![call.span()], WrongArity {
            name: name.clone(),
            expected: builtin.arity(),
            given: call.args.len(),
        }));
    }

    let args = call.args.iter()
        .map(SymExpr::try_from)
        .collect::<Result<Vec<_>, _>>()?;
    Ok(SymExpr::call(name.clone(), args))
}

/// Converts an AST expression into a [`SymExpr`], without simplifying it.
///
/// Sums and products are flattened, subtraction becomes addition of a negated term, and division
/// becomes multiplication by a reciprocal. Division of two exact numbers is folded into a
/// rational number.
impl TryFrom<&AstExpr> for SymExpr {
    type Error = Error;

    fn try_from(expr: &AstExpr) -> Result<Self, Self::Error> {
        match expr {
            AstExpr::Literal(Literal::Integer(int)) => int_from_str(&int.value)
                .map(|n| SymExpr::Primary(Primary::Integer(n)))
                .ok_or_else(|| Error::new(vec![int.span.clone()], InvalidNumber {
                    literal: int.value.clone(),
                })),
            AstExpr::Literal(Literal::Float(num)) => float_from_str(&num.value)
                .map(|n| SymExpr::Primary(Primary::Float(n)))
                .ok_or_else(|| Error::new(vec![num.span.clone()], InvalidNumber {
                    literal: num.value.clone(),
                })),
            AstExpr::Literal(Literal::Symbol(sym)) => {
                if funcs::is_builtin(&sym.name) {
                    Err(Error::new(vec![sym.span.clone()], FunctionAsSymbol {
                        name: sym.name.clone(),
                    }))
                } else {
                    Ok(SymExpr::symbol(sym.name.clone()))
                }
            },
            AstExpr::Paren(paren) => SymExpr::try_from(&*paren.expr),
            AstExpr::Call(call) => convert_call(call),
            AstExpr::Unary(unary) => {
                let operand = SymExpr::try_from(&*unary.operand)?;
                Ok(match unary.op.kind {
                    UnaryOpKind::Neg => -operand,
                    UnaryOpKind::Pos => operand,
                    UnaryOpKind::Factorial => SymExpr::call("factorial", vec![operand]),
                    UnaryOpKind::DoubleFactorial => SymExpr::call("factorial2", vec![operand]),
                })
            },
            AstExpr::Binary(binary) => {
                let lhs = SymExpr::try_from(&*binary.lhs)?;
                let rhs = SymExpr::try_from(&*binary.rhs)?;
                Ok(match binary.op.kind {
                    BinOpKind::Add => lhs + rhs,
                    BinOpKind::Sub => lhs - rhs,
                    BinOpKind::Mul => lhs * rhs,
                    BinOpKind::Div => lhs / rhs,
                    BinOpKind::Exp => SymExpr::pow(lhs, rhs),
                    BinOpKind::Mod => SymExpr::call("Mod", vec![lhs, rhs]),
                })
            },
        }
    }
}

/// Converts an AST relation into a [`Relation`], without simplifying either side.
pub fn to_relation(relation: &AstRelation) -> Result<Relation, Error> {
    Ok(Relation::new(
        SymExpr::try_from(&relation.lhs)?,
        relation.op.kind.into(),
        SymExpr::try_from(&relation.rhs)?,
    ))
}

/// Converts a parsed statement into a [`Statement`], without simplifying it.
pub fn to_statement(stmt: &Stmt) -> Result<Statement, Error> {
    match stmt {
        Stmt::Expr(expr) => Ok(Statement::Expr(SymExpr::try_from(expr)?)),
        Stmt::Relation(relation) => Ok(Statement::Relation(to_relation(relation)?)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mathnote_parser::parser::Parser;
    use pretty_assertions::assert_eq;

    fn convert(source: &str) -> Result<Statement, Error> {
        let stmt = Parser::new(source).try_parse_full::<Stmt>().unwrap();
        to_statement(&stmt)
    }

    #[test]
    fn keeps_input_order() {
        assert_eq!(convert("2 + 2").unwrap().to_string(), "2 + 2");
        assert_eq!(convert("x - 2*y").unwrap().to_string(), "x - 2*y");
        assert_eq!(convert("1/2").unwrap().to_string(), "1/2");
    }

    #[test]
    fn relations_stay_unevaluated() {
        assert_eq!(convert("1 = 1").unwrap().to_string(), "Eq(1, 1)");
        assert_eq!(convert("x^2 > 4").unwrap().to_string(), "x**2 > 4");
    }

    #[test]
    fn operators_become_calls() {
        assert_eq!(convert("5!").unwrap().to_string(), "factorial(5)");
        assert_eq!(convert("7 % 3").unwrap().to_string(), "Mod(7, 3)");
    }

    #[test]
    fn unknown_function() {
        let err = convert("foo(x)").unwrap_err();
        assert_eq!(err.downcast_ref::<UnknownFunction>(), Some(&UnknownFunction {
            name: "foo".to_string(),
        }));
        assert_eq!(err.spans, vec![0..3]);
    }

    #[test]
    fn wrong_arity() {
        let err = convert("root(8)").unwrap_err();
        assert_eq!(err.downcast_ref::<WrongArity>(), Some(&WrongArity {
            name: "root".to_string(),
            expected: "2".to_string(),
            given: 1,
        }));
    }

    #[test]
    fn function_name_as_variable() {
        let err = convert("sin + 1").unwrap_err();
        assert!(err.downcast_ref::<FunctionAsSymbol>().is_some());
    }
}
