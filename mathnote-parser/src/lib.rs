//! Tokenizer and recursive-descent parser for the canonical expression grammar understood by the
//! mathnote engine.
//!
//! The grammar is strict: every multiplication is written with `*`, function arguments are always
//! parenthesized, and exponentiation is written with `^` (or `**`). Informal notation such as
//! `2x` or `sin 2x` is rewritten into this grammar before it reaches the parser.

pub mod parser;
pub mod tokenizer;
