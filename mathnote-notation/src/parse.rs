//! The parse adapter: sanitizes, normalizes and parses user input, translating the engine's
//! low-level failures into catalog messages.

use log::debug;
use mathnote_compute::{
    funcs,
    symbolic::{error::WrongArity, parse_statement, simplify_statement, Statement},
};
use mathnote_error::Error;
use mathnote_parser::{
    parser::error::kind::UnclosedParenthesis,
    tokenizer::{tokenize_complete, TokenKind},
};
use crate::{
    error::{
        AlternateSyntax,
        Category,
        InvalidInput,
        LogArity,
        MissingClosingBracket,
        ModArity,
        ParsingError,
        RequiresOneArgument,
        RootArity,
    },
    names::SymbolMap,
    normalize::normalize_with,
    sanitize::sanitize_with,
};

/// Translates an error from the engine's parser into a catalog error. The first matching rule
/// wins.
fn translate(err: Error, raw: &str, normalized: &str) -> ParsingError {
    let spans = err.spans.clone();

    if err.downcast_ref::<UnclosedParenthesis>().is_some_and(|paren| paren.opening) {
        return ParsingError::new(
            Category::GrammarFailure,
            normalized,
            spans,
            MissingClosingBracket { input: raw.to_string() },
        );
    }

    let dots = tokenize_complete(normalized)
        .iter()
        .filter(|token| token.kind == TokenKind::Dot)
        .map(|token| token.span.clone())
        .collect::<Vec<_>>();
    if !dots.is_empty() {
        return ParsingError::new(
            Category::GrammarFailure,
            normalized,
            dots,
            AlternateSyntax { right: "*".to_string(), wrong: ".".to_string() },
        );
    }

    if let Some(arity) = err.downcast_ref::<WrongArity>() {
        let name = arity.name.as_str();
        let lowercase = name.to_lowercase();
        if lowercase.starts_with("root") {
            return ParsingError::new(Category::ArityFailure, normalized, spans, RootArity);
        } else if lowercase.starts_with("mod") {
            return ParsingError::new(Category::ArityFailure, normalized, spans, ModArity);
        } else if lowercase.starts_with("log") {
            return ParsingError::new(Category::ArityFailure, normalized, spans, LogArity);
        } else if funcs::lookup(name).is_some_and(|builtin| builtin.min_args == 1 && builtin.max_args == 1) {
            return ParsingError::new(
                Category::ArityFailure,
                normalized,
                spans,
                RequiresOneArgument { name: name.to_string() },
            );
        }
    }

    debug!("engine rejected `{}`: {}", normalized, err);
    ParsingError::new(
        Category::GrammarFailure,
        normalized,
        spans,
        InvalidInput { input: raw.to_string() },
    )
}

/// Parses user input into a [`Statement`].
///
/// The input is sanitized and normalized with the given scope, then parsed in the engine's
/// canonical grammar. If `evaluate` is false, the statement is returned as written, so that
/// `1 = 1` stays a relation; otherwise it is simplified, and relations between numbers are
/// decided.
pub fn parse(source: &str, scope: &SymbolMap, evaluate: bool) -> Result<Statement, ParsingError> {
    let raw = sanitize_with(source, scope)?;
    let normalized = normalize_with(raw, scope);
    let stmt = parse_statement(&normalized)
        .map_err(|err| translate(err, raw, &normalized))?;
    debug!("parsed `{}` as `{}`", raw, stmt);

    if evaluate {
        Ok(simplify_statement(&stmt))
    } else {
        Ok(stmt)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::InvalidCharacter;
    use pretty_assertions::assert_eq;

    fn message(source: &str) -> String {
        parse(source, &SymbolMap::new(), false).unwrap_err().message()
    }

    fn category(source: &str) -> Category {
        parse(source, &SymbolMap::new(), false).unwrap_err().category
    }

    #[test]
    fn unevaluated_and_evaluated() {
        let scope = SymbolMap::new();
        assert_eq!(parse("1=1", &scope, false).unwrap().to_string(), "Eq(1, 1)");
        assert_eq!(parse("1=1", &scope, true).unwrap(), Statement::Bool(true));
        assert_eq!(parse("2x + 3x", &scope, true).unwrap().to_string(), "5*x");
    }

    #[test]
    fn sanitizer_runs_first() {
        let err = parse("x_1 + (", &SymbolMap::new(), false).unwrap_err();
        assert!(err.downcast_ref::<InvalidCharacter>().is_some());
        assert_eq!(err.input, "x_1 + (");
    }

    #[test]
    fn missing_bracket() {
        assert_eq!(message("(x+1"), "(x+1 is probably missing a closing bracket");
        assert_eq!(message("sin(2x"), "sin(2x is probably missing a closing bracket");
        assert_eq!(category("(x+1"), Category::GrammarFailure);
    }

    #[test]
    fn dot_multiplication() {
        assert_eq!(message("2.x"), "Please use * instead of .");
        assert_eq!(message("x . y"), "Please use * instead of .");
    }

    #[test]
    fn arity_guidance() {
        assert!(message("root(8)").starts_with("root() requires 2 arguments\n"));
        assert!(message("mod(5)").starts_with("mod() requires 2 arguments\n"));
        assert!(message("log(1, 2, 3)").starts_with("log() requires 2 arguments\n"));
        assert_eq!(message("sin(1, 2)"), "sin() requires 1 argument");
        assert_eq!(message("asinh(1, 2)"), "asinh() requires 1 argument");
        assert_eq!(message("sqrt()"), "sqrt() requires 1 argument");
        assert_eq!(message("sqrt(2,3)"), message("sqrt()"));
        assert_eq!(message("log()"), message("log(1, 2, 3)"));
        assert_eq!(category("sin(1, 2)"), Category::ArityFailure);
    }

    #[test]
    fn anything_else_is_invalid() {
        assert_eq!(message("2+*3"), "2+*3 is invalid");
        assert_eq!(message("x ="), "x = is invalid");
        assert_eq!(category("2+*3"), Category::GrammarFailure);
    }
}
