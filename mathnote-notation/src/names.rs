//! Names with a fixed meaning in informal notation, and the caller's scope of extra names.

use mathnote_compute::funcs;
use std::collections::BTreeMap;

/// Constants of the engine's grammar. `oo` is only recognized as a whole word, so that words
/// such as `foo` are still split into single letters.
pub const CONSTANTS: [&str; 4] = ["E", "I", "pi", "oo"];

/// Names of greek letters, which are kept as a single symbol. `lamda` is spelled without the `b`,
/// since `lambda` is a denylisted keyword.
pub const GREEK: [&str; 24] = [
    "alpha", "beta", "gamma", "delta", "epsilon", "zeta", "eta", "theta", "iota", "kappa",
    "lamda", "mu", "nu", "xi", "omicron", "pi", "rho", "sigma", "tau", "upsilon", "phi", "chi",
    "psi", "omega",
];

/// Magnitude words and the power of ten they stand for.
pub const MAGNITUDES: [(&str, u32); 10] = [
    ("million", 6),
    ("billion", 9),
    ("trillion", 12),
    ("quadrillion", 15),
    ("quintillion", 18),
    ("sextillion", 21),
    ("septillion", 24),
    ("octillion", 27),
    ("nonillion", 30),
    ("decillion", 33),
];

/// Informal names and the canonical name they stand for.
pub const SUBSTITUTIONS: [(&str, &str); 11] = [
    ("e", "E"),
    ("i", "I"),
    ("π", "pi"),
    ("arcsin", "asin"),
    ("arccos", "acos"),
    ("arctan", "atan"),
    ("cosec", "csc"),
    ("arcsinh", "asinh"),
    ("arccosh", "acosh"),
    ("arctanh", "atanh"),
    ("ln", "log"),
];

/// Words that are rewritten before anything else is done, but still count as known names.
pub const UNITS: [&str; 2] = ["deg", "mod"];

/// Names supplied by the caller that have a fixed meaning in the input, such as the variable of a
/// function. Each name maps to the canonical text it stands for.
///
/// Names in scope are never split into single letters, and are exempt from the denylist.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SymbolMap {
    symbols: BTreeMap<String, String>,
}

impl SymbolMap {
    /// Creates an empty scope.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a scope where each of the given variables stands for itself.
    pub fn with_variables<S: AsRef<str>>(vars: &[S]) -> Self {
        let mut map = Self::new();
        for var in vars {
            map.insert(var.as_ref(), var.as_ref());
        }
        map
    }

    /// Adds a name to the scope.
    pub fn insert(&mut self, name: impl Into<String>, replacement: impl Into<String>) {
        self.symbols.insert(name.into(), replacement.into());
    }

    /// Returns the canonical text the name stands for.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.symbols.get(name).map(String::as_str)
    }

    /// Returns true if the name is in scope.
    pub fn contains(&self, name: &str) -> bool {
        self.symbols.contains_key(name)
    }

    /// Returns the names in scope.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.symbols.keys().map(String::as_str)
    }
}

/// Returns the canonical name an informal name stands for. Names in scope take precedence over
/// the built-in substitutions.
pub fn resolve<'a>(name: &'a str, scope: &'a SymbolMap) -> &'a str {
    scope.get(name)
        .or_else(|| SUBSTITUTIONS.iter().find(|(from, _)| *from == name).map(|(_, to)| *to))
        .unwrap_or(name)
}

/// Returns true if the identifier is a known name that is never split into letters: a function,
/// a constant, a greek letter, an informal name, or a name in scope.
pub fn is_known(name: &str, scope: &SymbolMap) -> bool {
    scope.contains(name)
        || funcs::is_builtin(name)
        || CONSTANTS.contains(&name)
        || GREEK.contains(&name)
        || SUBSTITUTIONS.iter().any(|(from, _)| *from == name)
}

/// Returns every known name, lowercased, including the words that are rewritten before parsing.
/// These are the names exempt from the denylist.
pub fn exempt_names(scope: &SymbolMap) -> Vec<String> {
    funcs::names()
        .into_iter()
        .chain(CONSTANTS)
        .chain(GREEK)
        .chain(MAGNITUDES.iter().map(|(word, _)| *word))
        .chain(SUBSTITUTIONS.iter().map(|(from, _)| *from))
        .chain(UNITS)
        .map(str::to_lowercase)
        .chain(scope.names().map(str::to_lowercase))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn scope_takes_precedence() {
        let mut scope = SymbolMap::new();
        assert_eq!(resolve("e", &scope), "E");
        assert_eq!(resolve("ln", &scope), "log");
        assert_eq!(resolve("x", &scope), "x");

        scope.insert("e", "e");
        assert_eq!(resolve("e", &scope), "e");
    }

    #[test]
    fn known_names() {
        let scope = SymbolMap::with_variables(&["time"]);
        assert!(is_known("time", &scope));
        assert!(is_known("sinh", &scope));
        assert!(is_known("theta", &scope));
        assert!(is_known("arcsin", &scope));
        assert!(!is_known("xyz", &scope));
        assert!(!is_known("time", &SymbolMap::new()));
    }

    #[test]
    fn exempt_names_are_lowercase() {
        let names = exempt_names(&SymbolMap::new());
        assert!(names.contains(&"mod".to_string()));
        assert!(names.contains(&"quadrillion".to_string()));
        assert!(names.iter().all(|name| name.to_lowercase() == *name));
    }
}
