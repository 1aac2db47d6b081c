//! Rewriting of informal notation into the engine's canonical grammar.
//!
//! Normalization runs in three steps:
//!
//! 1. A table of plain string replacements (`×` to `*`, `deg` to `*(pi/180)`, magnitude words to
//!    powers of ten, and so on), applied in order.
//! 2. The result is tokenized, and every identifier is split into known names and single letters
//!    (`xyz` becomes `x`, `y`, `z`, while `theta` stays whole). Each name is then resolved through
//!    the substitution table and the caller's scope (`ln` becomes `log`, `e` becomes `E`).
//! 3. Grammar transformations are applied to the resulting items: function exponents
//!    (`sin^2(x)` becomes `(sin(x))^2`), infix `mod`, implicit application (`sin 2x` becomes
//!    `sin(2x)`), and implicit multiplication (`2x` becomes `2*x`).
//!
//! Normalization never fails. Input the engine cannot parse is passed through, and the parse
//! adapter reports the error. Normalizing already normalized input returns it unchanged.

use log::debug;
use mathnote_compute::funcs;
use mathnote_parser::tokenizer::{tokenize_complete, TokenKind};
use crate::names::{is_known, resolve, SymbolMap, MAGNITUDES};

/// Plain string replacements applied before tokenizing, in order.
const REPLACEMENTS: [(&str, &str); 7] = [
    ("⋅", "*"),
    ("×", "*"),
    ("÷", "/"),
    ("–", "-"),
    ("°", "*(pi/180)"),
    ("deg", "*(pi/180)"),
    ("mod", "Mod"),
];

/// A unit of normalized input.
#[derive(Debug, Clone, PartialEq)]
enum Item {
    /// A numeric literal.
    Number(String),

    /// A symbol or constant.
    Symbol(String),

    /// The name of a built-in function.
    Function(String),

    /// `(`
    Open,

    /// `)`
    Close,

    /// `^`, or `**` in the input.
    Power,

    /// `!` or `!!`.
    Postfix(String),

    /// Any other operator or punctuation, such as `+`, `=`, or `,`.
    Other(String),
}

impl Item {
    fn lexeme(&self) -> &str {
        match self {
            Self::Number(s) | Self::Symbol(s) | Self::Function(s) | Self::Postfix(s) | Self::Other(s) => s,
            Self::Open => "(",
            Self::Close => ")",
            Self::Power => "^",
        }
    }

    /// Returns true if an operand can end with this item.
    fn ends_operand(&self) -> bool {
        matches!(self, Self::Number(_) | Self::Symbol(_) | Self::Close | Self::Postfix(_))
    }

    /// Returns true if an operand can start with this item.
    fn starts_operand(&self) -> bool {
        matches!(self, Self::Number(_) | Self::Symbol(_) | Self::Function(_) | Self::Open)
    }

    fn is_sign(&self) -> bool {
        matches!(self, Self::Other(s) if s == "-" || s == "+")
    }
}

/// Applies the replacement table and the magnitude words.
fn replace(input: &str) -> String {
    let replaced = REPLACEMENTS.iter()
        .fold(input.to_string(), |acc, (from, to)| acc.replace(from, to));
    MAGNITUDES.iter()
        .fold(replaced, |acc, (word, power)| acc.replace(word, &format!("*(10^{})", power)))
}

/// Splits an identifier into known names and single letters.
///
/// A known name is kept whole. Otherwise, the longest known name at each position is taken, or a
/// single character if there is none. `oo` is only recognized as a whole word.
fn split_name<'a>(name: &'a str, scope: &SymbolMap) -> Vec<&'a str> {
    if is_known(name, scope) {
        return vec![name];
    }

    let mut pieces = Vec::new();
    let mut rest = name;
    while let Some(first) = rest.chars().next() {
        let longest = rest.char_indices()
            .map(|(i, c)| i + c.len_utf8())
            .filter(|&end| {
                let prefix = &rest[..end];
                prefix != "oo" && is_known(prefix, scope)
            })
            .last()
            .unwrap_or(first.len_utf8());
        pieces.push(&rest[..longest]);
        rest = &rest[longest..];
    }
    pieces
}

/// Tokenizes the input into items, splitting and resolving identifiers.
fn lex(input: &str, scope: &SymbolMap) -> Vec<Item> {
    let mut items = Vec::new();
    for token in tokenize_complete(input).iter() {
        match token.kind {
            TokenKind::Whitespace => (),
            TokenKind::Int | TokenKind::Float => items.push(Item::Number(token.lexeme.to_string())),
            TokenKind::Name => {
                for piece in split_name(token.lexeme, scope) {
                    let name = resolve(piece, scope);
                    items.push(if funcs::is_builtin(name) {
                        Item::Function(name.to_string())
                    } else {
                        Item::Symbol(name.to_string())
                    });
                }
            },
            TokenKind::OpenParen => items.push(Item::Open),
            TokenKind::CloseParen => items.push(Item::Close),
            TokenKind::Exp => items.push(Item::Power),
            TokenKind::Factorial | TokenKind::DoubleFactorial => {
                items.push(Item::Postfix(token.lexeme.to_string()));
            },
            _ => items.push(Item::Other(token.lexeme.to_string())),
        }
    }
    items
}

/// Returns the index one past the parenthesis closing the one at `open`, or the end of the items
/// if it is never closed.
fn group_end(items: &[Item], open: usize) -> usize {
    let mut depth = 0usize;
    for (i, item) in items.iter().enumerate().skip(open) {
        match item {
            Item::Open => depth += 1,
            Item::Close => {
                depth = depth.saturating_sub(1);
                if depth == 0 {
                    return i + 1;
                }
            },
            _ => (),
        }
    }
    items.len()
}

/// Returns the end of the operand starting at `start`, including any factorials and powers
/// following it.
fn operand_end(items: &[Item], start: usize) -> Option<usize> {
    let mut end = match items.get(start)? {
        Item::Number(_) | Item::Symbol(_) => start + 1,
        Item::Open => group_end(items, start),
        Item::Function(_) => match items.get(start + 1) {
            Some(Item::Open) => group_end(items, start + 1),
            _ => argument_end(items, start + 1),
        },
        _ => return None,
    };

    loop {
        match items.get(end) {
            Some(Item::Postfix(_)) => end += 1,
            Some(Item::Power) => {
                let mut exponent = end + 1;
                if items.get(exponent).is_some_and(Item::is_sign) {
                    exponent += 1;
                }
                match operand_end(items, exponent) {
                    Some(e) => end = e,
                    None => break,
                }
            },
            _ => break,
        }
    }
    Some(end)
}

/// Returns the end of the implicit argument of a function whose name ends at `start`: a run of
/// juxtaposed operands. Another function only starts the argument if it is the first operand, so
/// `sin x cos x` is read as `sin(x) cos(x)`.
fn argument_end(items: &[Item], start: usize) -> usize {
    let mut end = start;
    while let Some(item) = items.get(end) {
        if end > start && matches!(item, Item::Function(_)) {
            break;
        }
        match operand_end(items, end) {
            Some(e) => end = e,
            None => break,
        }
    }
    end
}

/// Rewrites `f^n(x)` as `(f(x))^n`.
fn function_exponents(items: Vec<Item>) -> Vec<Item> {
    let mut out = Vec::with_capacity(items.len());
    let mut i = 0;
    while i < items.len() {
        let is_exponent = matches!(items[i], Item::Function(_))
            && items.get(i + 1) == Some(&Item::Power)
            && matches!(items.get(i + 2), Some(Item::Number(_) | Item::Symbol(_)))
            && items.get(i + 3) == Some(&Item::Open);
        if !is_exponent {
            out.push(items[i].clone());
            i += 1;
            continue;
        }

        let end = group_end(&items, i + 3);
        out.push(Item::Open);
        out.push(items[i].clone());
        out.extend(items[i + 3..end].iter().cloned());
        if !matches!(items.get(end - 1), Some(Item::Close)) {
            out.push(Item::Close);
        }
        out.push(Item::Close);
        out.push(Item::Power);
        out.push(items[i + 2].clone());
        i = end;
    }
    out
}

/// Rewrites `Mod` between two operands as the `%` operator.
fn infix_mod(mut items: Vec<Item>) -> Vec<Item> {
    for i in 1..items.len() {
        if items[i] == Item::Function("Mod".to_string()) && items[i - 1].ends_operand() {
            items[i] = Item::Other("%".to_string());
        }
    }
    items
}

/// Wraps the implicit argument of every function that is not followed by a parenthesis.
fn implicit_application(mut items: Vec<Item>) -> Vec<Item> {
    let mut i = 0;
    while i < items.len() {
        if matches!(items[i], Item::Function(_)) && items.get(i + 1) != Some(&Item::Open) {
            let end = argument_end(&items, i + 1);
            if end > i + 1 {
                items.insert(end, Item::Close);
                items.insert(i + 1, Item::Open);
            }
        }
        i += 1;
    }
    items
}

/// Inserts `*` between juxtaposed operands.
fn implicit_multiplication(items: Vec<Item>) -> Vec<Item> {
    let mut out: Vec<Item> = Vec::with_capacity(items.len());
    for item in items {
        if out.last().is_some_and(Item::ends_operand) && item.starts_operand() {
            out.push(Item::Other("*".to_string()));
        }
        out.push(item);
    }
    out
}

/// Returns true if the two lexemes would be read as a single token when written next to each
/// other, such as `*` and `*`.
fn fuses(left: &str, right: &str) -> bool {
    tokenize_complete(&format!("{}{}", left, right)).len() < 2
}

/// Joins the items into a string, separating two items with a space only where they would
/// otherwise fuse into a different token.
fn join(items: &[Item]) -> String {
    let mut out = String::new();
    let mut previous: Option<&str> = None;
    for item in items {
        let lexeme = item.lexeme();
        if previous.is_some_and(|previous| fuses(previous, lexeme)) {
            out.push(' ');
        }
        out.push_str(lexeme);
        previous = Some(lexeme);
    }
    out
}

/// Rewrites informal notation into the engine's canonical grammar.
pub fn normalize(input: &str) -> String {
    normalize_with(input, &SymbolMap::new())
}

/// Like [`normalize`], with extra names in scope. Names in scope are never split into letters,
/// and take precedence over the built-in substitutions.
pub fn normalize_with(input: &str, scope: &SymbolMap) -> String {
    let items = lex(&replace(input), scope);
    let items = function_exponents(items);
    let items = infix_mod(items);
    let items = implicit_application(items);
    let items = implicit_multiplication(items);
    let normalized = join(&items);
    debug!("normalized `{}` to `{}`", input, normalized);
    normalized
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn replacement_table() {
        assert_eq!(normalize("2×3÷4"), "2*3/4");
        assert_eq!(normalize("2⋅x"), "2*x");
        assert_eq!(normalize("5–2"), "5-2");
        assert_eq!(normalize("90°"), "90*(pi/180)");
        assert_eq!(normalize("sin(90deg)"), "sin(90*(pi/180))");
        assert_eq!(normalize("3 million"), "3*(10^6)");
        assert_eq!(normalize("2decillion"), "2*(10^33)");
    }

    #[test]
    fn symbol_substitution() {
        assert_eq!(normalize("e^x"), "E^x");
        assert_eq!(normalize("2i"), "2*I");
        assert_eq!(normalize("π/2"), "pi/2");
        assert_eq!(normalize("arcsin(x)"), "asin(x)");
        assert_eq!(normalize("cosec(x)"), "csc(x)");
        assert_eq!(normalize("arctanh(x)"), "atanh(x)");
        assert_eq!(normalize("ln(x)"), "log(x)");
    }

    #[test]
    fn symbol_splitting() {
        assert_eq!(normalize("xyz"), "x*y*z");
        assert_eq!(normalize("theta"), "theta");
        assert_eq!(normalize("2theta"), "2*theta");
        assert_eq!(normalize("pix"), "pi*x");
        assert_eq!(normalize("foo"), "f*o*o");
        assert_eq!(normalize("x - oo"), "x-oo");
    }

    #[test]
    fn implicit_multiplication() {
        assert_eq!(normalize("2x^2+sin(90deg)"), "2*x^2+sin(90*(pi/180))");
        assert_eq!(normalize("2(x+1)"), "2*(x+1)");
        assert_eq!(normalize("(x+1)(x-1)"), "(x+1)*(x-1)");
        assert_eq!(normalize("x y"), "x*y");
        assert_eq!(normalize("3!x"), "3!*x");
    }

    #[test]
    fn function_exponents() {
        assert_eq!(normalize("sin^2(x)"), "(sin(x))^2");
        assert_eq!(normalize("sin**2(x)"), "(sin(x))^2");
        assert_eq!(normalize("cos^2(x) + sin^2(x)"), "(cos(x))^2+(sin(x))^2");
    }

    #[test]
    fn implicit_application() {
        assert_eq!(normalize("sin 1"), "sin(1)");
        assert_eq!(normalize("sin 2x"), "sin(2*x)");
        assert_eq!(normalize("sinx"), "sin(x)");
        assert_eq!(normalize("sin x + 1"), "sin(x)+1");
        assert_eq!(normalize("sin x^2"), "sin(x^2)");
        assert_eq!(normalize("sin cos x"), "sin(cos(x))");
        assert_eq!(normalize("2sin x cos x"), "2*sin(x)*cos(x)");
        assert_eq!(normalize("ln x"), "log(x)");
    }

    #[test]
    fn modulo() {
        assert_eq!(normalize("5 mod 2"), "5%2");
        assert_eq!(normalize("mod(5, 2)"), "Mod(5,2)");
        assert_eq!(normalize("Mod(x, 3)"), "Mod(x,3)");
    }

    #[test]
    fn relations_are_kept() {
        assert_eq!(normalize("x^2 = 4"), "x^2=4");
        assert_eq!(normalize("2x <= 3"), "2*x<=3");
        assert_eq!(normalize("x != 1"), "x!=1");
    }

    #[test]
    fn operators_do_not_fuse() {
        assert_eq!(normalize("x* *y"), "x* *y");
        assert_eq!(normalize("3! = 6"), "3! =6");
        assert_eq!(normalize("2.x"), "2.x");
        assert_eq!(normalize("2. 5"), "2. 5");
    }

    #[test]
    fn scope_names_stay_whole() {
        let scope = SymbolMap::with_variables(&["time"]);
        assert_eq!(normalize_with("2time", &scope), "2*time");
        assert_eq!(normalize("2time"), "2*t*I*m*E");
    }

    #[test]
    fn idempotent() {
        for input in [
            "2x^2+sin(90deg)",
            "sin^2(x) + cos 2x",
            "5 mod 2",
            "3 million e^x",
            "x* *y",
            "2. 5",
            "xyz = theta",
            "ln(x)/log(2, x)",
        ] {
            let once = normalize(input);
            assert_eq!(normalize(&once), once, "normalizing `{}`", input);
        }
    }
}
