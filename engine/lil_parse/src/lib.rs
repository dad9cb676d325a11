//! Parse tree and parser for the lil scripting dialect.
//!
//! Scripts are S-expressions over a byte-level grammar: atoms are runs of
//! printable bytes or quoted/triple-quoted text, sub-lists hang off a
//! `child` link and siblings chain through `next`. Atoms are zero-copy
//! [`Span`]s into the source buffer — the buffer must outlive any use of
//! the tree, which the borrow on [`ListPool::atom_str`] enforces.
//!
//! Tree nodes live in a [`ListPool`] and are addressed by [`ListId`]; the
//! tree's lifetime is exactly one pool scope.

mod list;
mod literal;
mod parser;
mod span;

pub use list::{List, ListId, ListPool};
pub use literal::{parse_decimal_int, parse_float};
pub use parser::{parse, ParseError};
pub use span::Span;
