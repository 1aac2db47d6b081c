//! Symbolic computation engine behind mathnote.
//!
//! Expressions are parsed from the canonical grammar of [`mathnote_parser`] into the flattened
//! [`symbolic::SymExpr`] tree, where they can be simplified, expanded, differentiated, integrated,
//! taken to a limit, or solved. Arbitrary-precision arithmetic is provided by [`rug`].

pub mod consts;
pub mod funcs;
pub mod primitive;
pub mod symbolic;
