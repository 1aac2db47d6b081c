//! The denylist gate in front of the engine.
//!
//! Sanitization rejects input that contains forbidden characters or identifiers, and input that
//! uses an alternate notation the normalizer does not rewrite (such as `|x|` or `x²`), pointing
//! the user at the notation to use instead. The first violation found is reported.

use log::warn;
use mathnote_parser::tokenizer::{tokenize_complete, TokenKind};
use std::ops::Range;
use crate::{
    error::{
        AlternateSyntax,
        Category,
        InvalidCharacter,
        InvalidInput,
        LatexInput,
        ParsingError,
        TripleFactorial,
    },
    names::{exempt_names, SymbolMap},
};

/// Characters that are never accepted.
pub const FORBIDDEN_CHARACTERS: [char; 12] = ['"', '\'', '#', '$', '&', '`', '~', '_', ':', ';', '?', '@'];

/// Words that are rejected wherever they appear inside an identifier, unless they are part of a
/// known mathematical name.
pub const DENYLIST: [&str; 90] = [
    "config", "sympy", "env",
    // built-ins
    "open", "file", "read", "write", "delete", "remove", "system", "subprocess", "call", "popen",
    "globals", "locals", "vars", "dir", "getattr", "setattr", "compile", "exec", "eval", "input",
    "raw_input",
    // files
    "chdir", "mkdir", "rmdir", "listdir", "walk", "copy", "move", "rename", "link", "symlink",
    // network
    "socket", "urllib", "requests", "http", "ftp", "urlopen", "urlretrieve",
    // processes
    "kill", "terminate", "spawn", "fork", "thread", "multiprocessing", "concurrent", "asyncio",
    // databases
    "sqlite", "mysql", "postgresql", "database",
    // shells
    "shell", "bash", "cmd", "powershell", "terminal", "echo", "python", "py", "pip", "venv",
    // memory
    "memory", "malloc", "free", "collect",
    // reflection
    "inspect", "getframe", "currentframe", "traceback", "marshal", "pickle", "dill", "cloudpickle",
    // keywords
    "import", "lambda", "yield", "async", "await", "class", "try", "except", "finally", "with",
    "from", "raise", "assert", "exit", "quit",
];

/// Unicode superscripts and the digit they stand for.
const POWER_GLYPHS: [(char, char); 8] = [
    ('²', '2'),
    ('³', '3'),
    ('⁴', '4'),
    ('⁵', '5'),
    ('⁶', '6'),
    ('⁷', '7'),
    ('⁸', '8'),
    ('⁹', '9'),
];

/// Brackets searched for in order: the character, the notation to use, and the notation reported
/// as used.
const BRACKETS: [(char, &str, &str); 5] = [
    ('|', "abs(x)", "|x|"),
    ('{', "()", "{}"),
    ('}', "()", "{}"),
    ('[', "()", "[]"),
    (']', "()", "[]"),
];

/// Returns the byte range of the first occurrence of `needle` in `haystack`.
fn find_span(haystack: &str, needle: &str) -> Option<Range<usize>> {
    haystack.find(needle).map(|start| start..start + needle.len())
}

/// Like [`find_span`], but letters match regardless of case. The range points into `haystack`
/// itself, whose lowercase form may differ in length.
fn find_span_ignore_case(haystack: &str, needle: &str) -> Option<Range<usize>> {
    haystack.char_indices().find_map(|(start, _)| {
        let mut chars = haystack[start..].char_indices();
        for expected in needle.chars() {
            let (_, c) = chars.next()?;
            if !c.to_lowercase().eq(expected.to_lowercase()) {
                return None;
            }
        }
        let end = chars.next().map_or(haystack.len(), |(i, _)| start + i);
        Some(start..end)
    })
}

/// Returns the start of every occurrence of `needle` in `haystack`, including overlapping ones.
fn occurrences<'a>(haystack: &'a str, needle: &'a str) -> impl Iterator<Item = usize> + 'a {
    haystack.char_indices()
        .map(|(i, _)| i)
        .filter(move |&i| haystack[i..].starts_with(needle))
}

/// Splits the input into runs of alphabetic characters, returning the span of each run.
fn alphabetic_runs(input: &str) -> Vec<Range<usize>> {
    let mut runs = Vec::new();
    let mut start = None;
    for (i, c) in input.char_indices() {
        match (c.is_alphabetic(), start) {
            (true, None) => start = Some(i),
            (false, Some(s)) => {
                runs.push(s..i);
                start = None;
            },
            _ => (),
        }
    }
    if let Some(s) = start {
        runs.push(s..input.len());
    }
    runs
}

fn check_characters(input: &str) -> Result<(), ParsingError> {
    let Some((i, character)) = input.char_indices().find(|(_, c)| FORBIDDEN_CHARACTERS.contains(c)) else {
        return Ok(());
    };
    Err(ParsingError::new(
        Category::DenylistViolation,
        input,
        vec![i..i + character.len_utf8()],
        InvalidCharacter { character },
    ))
}

/// Returns true if the occurrence of a denylisted word at `start..end` in `word` lies entirely
/// inside an occurrence of a known name.
fn is_exempt(word: &str, start: usize, end: usize, exempt: &[String]) -> bool {
    exempt.iter().any(|name| {
        occurrences(word, name).any(|at| at <= start && end <= at + name.len())
    })
}

fn check_identifiers(input: &str, scope: &SymbolMap) -> Result<(), ParsingError> {
    let exempt = exempt_names(scope);
    for run in alphabetic_runs(input) {
        let word = input[run.clone()].to_lowercase();
        let violation = DENYLIST.iter().find(|denied| {
            occurrences(&word, denied).any(|at| !is_exempt(&word, at, at + denied.len(), &exempt))
        });
        if let Some(denied) = violation {
            warn!("rejected `{}`: contains denylisted word `{}`", input, denied);
            return Err(ParsingError::new(
                Category::DenylistViolation,
                input,
                vec![run],
                InvalidInput { input: input.to_string() },
            ));
        }
    }
    Ok(())
}

fn unsupported(input: &str, span: Range<usize>, right: &str, wrong: &str) -> ParsingError {
    ParsingError::new(
        Category::UnsupportedSyntax,
        input,
        vec![span],
        AlternateSyntax { right: right.to_string(), wrong: wrong.to_string() },
    )
}

fn check_syntax(input: &str) -> Result<(), ParsingError> {
    if let Some(span) = find_span(input, "\\") {
        return Err(ParsingError::new(Category::UnsupportedSyntax, input, vec![span], LatexInput));
    }

    if let Some(span) = find_span(input, "!!!") {
        return Err(ParsingError::new(Category::UnsupportedSyntax, input, vec![span], TripleFactorial));
    }

    for (bracket, right, wrong) in BRACKETS {
        if let Some(i) = input.find(bracket) {
            return Err(unsupported(input, i..i + 1, right, wrong));
        }
    }

    if let Some((i, glyph, digit)) = input.char_indices()
        .find_map(|(i, c)| POWER_GLYPHS.iter().find(|(g, _)| *g == c).map(|(g, d)| (i, *g, *d)))
    {
        let span = i..i + glyph.len_utf8();
        return Err(unsupported(input, span, &format!("^{}", digit), &glyph.to_string()));
    }

    for (wrong, right) in [("squared", "^2"), ("cubed", "^3")] {
        if let Some(span) = find_span_ignore_case(input, wrong) {
            return Err(unsupported(input, span, right, wrong));
        }
    }

    for (wrong, right) in [("√", "sqrt(x)"), ("square root", "sqrt(x)"), ("∛", "root(x, 3)"), ("∜", "root(x, 4)")] {
        if let Some(span) = find_span_ignore_case(input, wrong) {
            return Err(unsupported(input, span, right, wrong));
        }
    }

    Ok(())
}

/// Rejects a number written with more than one decimal point, such as `2.5.3`.
fn check_numbers(input: &str) -> Result<(), ParsingError> {
    let tokens = tokenize_complete(input);
    let repeated = tokens.windows(2).find_map(|pair| match pair {
        [number, decimal]
            if matches!(number.kind, TokenKind::Int | TokenKind::Float)
                && decimal.kind == TokenKind::Float
                && number.span.end == decimal.span.start => Some(number.span.start..decimal.span.end),
        _ => None,
    });
    match repeated {
        Some(span) => Err(ParsingError::new(
            Category::GrammarFailure,
            input,
            vec![span],
            InvalidInput { input: input.to_string() },
        )),
        None => Ok(()),
    }
}

/// Checks the input against the denylist and the table of unsupported notations, returning the
/// input unchanged if it passes.
pub fn sanitize(input: &str) -> Result<&str, ParsingError> {
    sanitize_with(input, &SymbolMap::new())
}

/// Like [`sanitize`], but names in `scope` are also exempt from the denylist.
pub fn sanitize_with<'a>(input: &'a str, scope: &SymbolMap) -> Result<&'a str, ParsingError> {
    check_characters(input)?;
    check_identifiers(input, scope)?;
    check_syntax(input)?;
    check_numbers(input)?;
    Ok(input)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn message(input: &str) -> String {
        sanitize(input).unwrap_err().message()
    }

    #[test]
    fn accepts_math() {
        for input in ["2x^2+sin(90deg)", "cos(x) + acos(x)", "5 mod 2", "3 million", "theta*2", "x!!"] {
            assert_eq!(sanitize(input).unwrap(), input);
        }
    }

    #[test]
    fn forbidden_characters() {
        assert_eq!(message("2_2"), "_ is an invalid character");
        assert_eq!(message("x; y"), "; is an invalid character");
        assert_eq!(message("$x"), "$ is an invalid character");

        let err = sanitize("2_2").unwrap_err();
        assert_eq!(err.category, Category::DenylistViolation);
        assert_eq!(err.error.spans, vec![1..2]);
    }

    #[test]
    fn denylisted_words() {
        assert_eq!(message("import(x)"), "import(x) is invalid");
        assert_eq!(message("eval(2)"), "eval(2) is invalid");
        assert_eq!(message("2*Exec"), "2*Exec is invalid");
        assert_eq!(message("xpy"), "xpy is invalid");
    }

    #[test]
    fn known_names_are_exempt() {
        // `cosec` and `epsilon` contain no denylisted word; `py` inside `happy` is not covered by
        // any known name
        assert!(sanitize("cosec(x) + epsilon").is_ok());
        assert_eq!(message("happy"), "happy is invalid");

        // `env` inside `xenvy` is not part of any known name
        assert_eq!(message("xenvy"), "xenvy is invalid");

        // names in scope are exempt too
        let scope = SymbolMap::with_variables(&["dir"]);
        assert!(sanitize_with("2dir", &scope).is_ok());
        assert!(sanitize("2dir").is_err());
    }

    #[test]
    fn unsupported_syntax() {
        assert_eq!(message("\\frac{1}{2}"), "Please do not use \\ and note latex input is not accepted");
        assert_eq!(message("5!!!"), "Only one (!) and double (!!) factorial are allowed");
        assert_eq!(message("|x|"), "Please use abs(x) instead of |x|");
        assert_eq!(message("2{x+1}"), "Please use () instead of {}");
        assert_eq!(message("2[x+1]"), "Please use () instead of []");
        assert_eq!(message("x²"), "Please use ^2 instead of ²");
        assert_eq!(message("x⁵+1"), "Please use ^5 instead of ⁵");
        assert_eq!(message("x squared"), "Please use ^2 instead of squared");
        assert_eq!(message("x cubed"), "Please use ^3 instead of cubed");
        assert_eq!(message("√x"), "Please use sqrt(x) instead of √");
        assert_eq!(message("square root of 2"), "Please use sqrt(x) instead of square root");
        assert_eq!(message("∛8"), "Please use root(x, 3) instead of ∛");
        assert_eq!(message("∜16"), "Please use root(x, 4) instead of ∜");

        assert_eq!(sanitize("|x|").unwrap_err().category, Category::UnsupportedSyntax);
    }

    #[test]
    fn spans_ignore_case() {
        let err = sanitize("X SQUARED").unwrap_err();
        assert_eq!(err.message(), "Please use ^2 instead of squared");
        assert_eq!(err.error.spans, vec![2..9]);

        // `İ` is longer once lowercased, which must not shift the span
        let input = "İ Square Root 2";
        let err = sanitize(input).unwrap_err();
        assert_eq!(err.message(), "Please use sqrt(x) instead of square root");
        assert_eq!(&input[err.error.spans[0].clone()], "Square Root");
    }

    #[test]
    fn repeated_decimal_points() {
        let err = sanitize("1 + 2.5.3").unwrap_err();
        assert_eq!(err.message(), "1 + 2.5.3 is invalid");
        assert_eq!(err.category, Category::GrammarFailure);
        assert_eq!(err.error.spans, vec![4..9]);

        assert!(sanitize("2.5 .3").is_ok());
        assert!(sanitize("1e5").is_ok());
    }

    #[test]
    fn first_violation_wins() {
        // the forbidden character is checked before the bars
        assert_eq!(message("|x_1|"), "_ is an invalid character");
        // the backslash is checked before the braces
        assert_eq!(message("\\sqrt{x}"), "Please do not use \\ and note latex input is not accepted");
    }
}
