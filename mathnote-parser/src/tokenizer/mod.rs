pub mod token;

use logos::{Lexer, Logos};
pub use token::{Token, TokenKind};

/// Returns an iterator over the token kinds produced by the tokenizer.
pub fn tokenize(input: &str) -> Lexer<TokenKind> {
    TokenKind::lexer(input)
}

/// Returns an owned array containing all of the tokens produced by the tokenizer. This allows us
/// to backtrack in case of an error.
pub fn tokenize_complete(input: &str) -> Box<[Token]> {
    let mut lexer = tokenize(input);
    let mut tokens = Vec::new();

    while let Some(Ok(kind)) = lexer.next() {
        tokens.push(Token {
            span: lexer.span(),
            kind,
            lexeme: lexer.slice(),
        });
    }

    tokens.into_boxed_slice()
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use super::*;

    /// Compares the tokens produced by the tokenizer to the raw expected tokens.
    fn compare_tokens<'source, const N: usize>(input: &'source str, expected: [(TokenKind, &'source str); N]) {
        let mut lexer = tokenize(input);

        for (expected_kind, expected_lexeme) in expected.into_iter() {
            assert_eq!(lexer.next(), Some(Ok(expected_kind)));
            assert_eq!(lexer.slice(), expected_lexeme);
        }

        assert_eq!(lexer.next(), None);
    }

    #[test]
    fn basic_expr() {
        compare_tokens(
            "1 + 2",
            [
                (TokenKind::Int, "1"),
                (TokenKind::Whitespace, " "),
                (TokenKind::Add, "+"),
                (TokenKind::Whitespace, " "),
                (TokenKind::Int, "2"),
            ],
        );
    }

    #[test]
    fn powers_and_factorials() {
        compare_tokens(
            "x**2^y!!",
            [
                (TokenKind::Name, "x"),
                (TokenKind::Exp, "**"),
                (TokenKind::Int, "2"),
                (TokenKind::Exp, "^"),
                (TokenKind::Name, "y"),
                (TokenKind::DoubleFactorial, "!!"),
            ],
        );
    }

    #[test]
    fn relations() {
        compare_tokens(
            "x!=1<=y",
            [
                (TokenKind::Name, "x"),
                (TokenKind::NotEq, "!="),
                (TokenKind::Int, "1"),
                (TokenKind::LessEq, "<="),
                (TokenKind::Name, "y"),
            ],
        );
    }

    #[test]
    fn floats_and_dots() {
        compare_tokens(
            "2.5 .5 2.x",
            [
                (TokenKind::Float, "2.5"),
                (TokenKind::Whitespace, " "),
                (TokenKind::Float, ".5"),
                (TokenKind::Whitespace, " "),
                (TokenKind::Int, "2"),
                (TokenKind::Dot, "."),
                (TokenKind::Name, "x"),
            ],
        );
    }

    #[test]
    fn scientific_notation() {
        compare_tokens(
            "1e5 2.5E-3 2ex",
            [
                (TokenKind::Float, "1e5"),
                (TokenKind::Whitespace, " "),
                (TokenKind::Float, "2.5E-3"),
                (TokenKind::Whitespace, " "),
                (TokenKind::Int, "2"),
                (TokenKind::Name, "ex"),
            ],
        );
    }

    #[test]
    fn greek_names_and_symbols() {
        compare_tokens(
            "πr $",
            [
                (TokenKind::Name, "πr"),
                (TokenKind::Whitespace, " "),
                (TokenKind::Symbol, "$"),
            ],
        );
    }

    #[test]
    fn complete_keeps_spans() {
        let tokens = tokenize_complete("sin(x)");
        assert_eq!(tokens.len(), 4);
        assert_eq!(tokens[0].lexeme, "sin");
        assert_eq!(tokens[3].span, 5..6);
    }
}
