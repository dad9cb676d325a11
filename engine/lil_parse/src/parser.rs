//! Single-pass stack-machine parser for the S-expression grammar.
//!
//! One left-to-right scan over the source bytes with an explicit stack of
//! parent nodes; no recursion, no lookahead beyond the two bytes that
//! distinguish `"""` from `"`.

use crate::{ListId, ListPool, Span};
use thiserror::Error;

/// Parse failure. The parser aborts at the first offending byte; there is
/// no resynchronization or partial-tree recovery.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// A byte outside the recognized classes (printable 0x20-0x7E, parens,
    /// quote, whitespace).
    #[error("illegal byte 0x{byte:02X} at offset {offset}")]
    IllegalByte { offset: usize, byte: u8 },
    /// A quoted or triple-quoted atom ran off the end of the buffer.
    #[error("unterminated quoted atom starting at offset {offset}")]
    UnterminatedQuote { offset: usize },
}

/// Lexical class of one input byte.
#[derive(Copy, Clone, PartialEq, Eq)]
enum Class {
    Undefined,
    Quote,
    LParen,
    RParen,
    Printable,
    Separator,
}

fn classify(byte: u8) -> Class {
    match byte {
        b'(' => Class::LParen,
        b')' => Class::RParen,
        b'"' => Class::Quote,
        b' ' | b'\n' | b'\t' | b'\r' => Class::Separator,
        0x20..=0x7E => Class::Printable,
        _ => Class::Undefined,
    }
}

/// Start a new sibling after `cur` and make it current.
fn next_item(pool: &mut ListPool, cur: &mut ListId) {
    let next = pool.alloc();
    if let Some(node) = pool.get_mut(*cur) {
        node.next = Some(next);
    }
    *cur = next;
}

/// Descend: `cur` becomes the parent of a fresh list head.
fn push_item(pool: &mut ListPool, stack: &mut Vec<ListId>, cur: &mut ListId) {
    let head = pool.alloc();
    stack.push(*cur);
    if let Some(node) = pool.get_mut(*cur) {
        node.child = Some(head);
    }
    *cur = head;
}

/// Extend the current atom by the byte at `offset`.
///
/// An empty span means the atom has not started yet; atoms are always
/// contiguous runs, so extending just bumps the end.
fn append_char(pool: &mut ListPool, cur: ListId, offset: usize) {
    if let Some(node) = pool.get_mut(cur) {
        if node.atom.is_empty() {
            node.atom = Span::new(offset as u32, offset as u32 + 1);
        } else {
            node.atom.end += 1;
        }
    }
}

fn cur_non_empty(pool: &ListPool, cur: ListId) -> bool {
    pool.get(cur).is_some_and(|node| !node.atom.is_empty())
}

fn cur_has_child(pool: &ListPool, cur: ListId) -> bool {
    pool.get(cur).is_some_and(|node| node.child.is_some())
}

/// Parse `source` into a tree allocated from `pool`.
///
/// The caller owns the pool scope: enter one before parsing, exit it when
/// the tree (and every span-borrowing value derived from it) is done.
///
/// Returns the root node: an empty node whose `child` is the top-level
/// `(...)` form. A `)` at top level ends parsing successfully, ignoring the
/// rest of the input; this asymmetry is part of the grammar.
pub fn parse(source: &str, pool: &mut ListPool) -> Result<ListId, ParseError> {
    let bytes = source.as_bytes();
    let root = pool.alloc();
    let mut cur = root;
    let mut stack: Vec<ListId> = Vec::new();
    let mut prev = Class::Undefined;
    let mut i = 0usize;

    while i < bytes.len() {
        let byte = bytes[i];
        let class = classify(byte);
        match class {
            Class::Undefined => {
                return Err(ParseError::IllegalByte { offset: i, byte });
            }
            Class::Quote => {
                if cur_non_empty(pool, cur) || cur_has_child(pool, cur) {
                    next_item(pool, &mut cur);
                }
                let open = i;
                if bytes.get(i + 1) == Some(&b'"') && bytes.get(i + 2) == Some(&b'"') {
                    // Triple-quoted atom: everything up to the next `"""` is
                    // captured verbatim, bypassing the grammar.
                    i += 3;
                    loop {
                        if i + 3 > bytes.len() {
                            return Err(ParseError::UnterminatedQuote { offset: open });
                        }
                        if bytes[i] == b'"' && bytes[i + 1] == b'"' && bytes[i + 2] == b'"' {
                            break;
                        }
                        append_char(pool, cur, i);
                        i += 1;
                    }
                    i += 2;
                } else {
                    // Plain quoted atom; no escape processing.
                    i += 1;
                    loop {
                        if i >= bytes.len() {
                            return Err(ParseError::UnterminatedQuote { offset: open });
                        }
                        if bytes[i] == b'"' {
                            break;
                        }
                        append_char(pool, cur, i);
                        i += 1;
                    }
                }
                next_item(pool, &mut cur);
            }
            Class::LParen => {
                if cur_has_child(pool, cur) || cur_non_empty(pool, cur) {
                    next_item(pool, &mut cur);
                }
                push_item(pool, &mut stack, &mut cur);
            }
            Class::RParen => match stack.pop() {
                Some(parent) => cur = parent,
                // Stray `)` at top level ends parsing successfully.
                None => return Ok(root),
            },
            Class::Separator => {}
            Class::Printable => {
                if cur_has_child(pool, cur) {
                    next_item(pool, &mut cur);
                }
                if cur_non_empty(pool, cur) && prev != Class::Printable {
                    next_item(pool, &mut cur);
                }
                append_char(pool, cur, i);
            }
        }
        prev = class;
        i += 1;
    }
    Ok(root)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    /// Render the tree as nested atom lists, ignoring trailing empty nodes,
    /// so structural comparisons are readable.
    fn shape(pool: &ListPool, source: &str, id: ListId) -> String {
        let mut out = String::new();
        let mut cur = Some(id);
        while let Some(node_id) = cur {
            let Some(node) = pool.get(node_id) else { break };
            if !node.atom.is_empty() {
                if !out.is_empty() {
                    out.push(' ');
                }
                out.push_str(node.atom.resolve(source));
            } else if let Some(child) = node.child {
                if !out.is_empty() {
                    out.push(' ');
                }
                out.push('(');
                out.push_str(&shape(pool, source, child));
                out.push(')');
            }
            cur = node.next;
        }
        out
    }

    fn parse_shape(source: &str) -> String {
        let mut pool = ListPool::with_capacity(64);
        pool.enter_scope();
        let root = match parse(source, &mut pool) {
            Ok(root) => root,
            Err(err) => panic!("parse failed: {err}"),
        };
        let rendered = shape(&pool, source, root);
        pool.exit_scope();
        rendered
    }

    #[test]
    fn flat_atoms() {
        assert_eq!(parse_shape("a bc  def"), "a bc def");
    }

    #[test]
    fn nested_lists() {
        assert_eq!(
            parse_shape("(main (let a 2)(let b 3))"),
            "(main (let a 2) (let b 3))"
        );
    }

    #[test]
    fn quoted_atoms() {
        assert_eq!(parse_shape("(print \"hello world\")"), "(print hello world)");
    }

    #[test]
    fn quoted_atom_splits_run() {
        // A quote immediately after an atom closes that atom first.
        assert_eq!(parse_shape("abc\"def\""), "abc def");
    }

    #[test]
    fn paren_splits_run() {
        assert_eq!(parse_shape("abc(d)"), "abc (d)");
    }

    #[test]
    fn triple_quote_bypasses_grammar() {
        let source = "(add_source \"n\" \"\"\"a \"b\" (c)\nd\"\"\")";
        assert_eq!(parse_shape(source), "(add_source n a \"b\" (c)\nd)");
    }

    #[test]
    fn canonical_output_reparses_to_same_shape() {
        let source = "(main (let node_1 (add_node \"n\" \"Gfx/DrawCall\")) (set_node_position node_1 1.5 2.5))";
        let first = parse_shape(source);
        let second = parse_shape(source);
        assert_eq!(first, second);
        assert_eq!(
            first,
            "(main (let node_1 (add_node n Gfx/DrawCall)) (set_node_position node_1 1.5 2.5))"
        );
    }

    #[test]
    fn stray_rparen_ends_parsing() {
        // Everything after the unmatched `)` is ignored, not an error.
        assert_eq!(parse_shape("(a)) (b)"), "(a)");
    }

    #[test]
    fn unclosed_paren_is_accepted() {
        assert_eq!(parse_shape("(a (b"), "(a (b))");
    }

    #[test]
    fn illegal_byte_aborts() {
        let mut pool = ListPool::with_capacity(8);
        pool.enter_scope();
        let err = parse("(a \x01)", &mut pool);
        assert_eq!(err, Err(ParseError::IllegalByte { offset: 3, byte: 1 }));
        pool.exit_scope();
    }

    #[test]
    fn unterminated_quote_aborts() {
        let mut pool = ListPool::with_capacity(8);
        pool.enter_scope();
        let err = parse("(print \"oops", &mut pool);
        assert_eq!(err, Err(ParseError::UnterminatedQuote { offset: 7 }));
        pool.exit_scope();
    }

    #[test]
    fn unterminated_triple_quote_aborts() {
        let mut pool = ListPool::with_capacity(8);
        pool.enter_scope();
        let err = parse("(add_source \"n\" \"\"\"body\" )", &mut pool);
        assert_eq!(err, Err(ParseError::UnterminatedQuote { offset: 16 }));
        pool.exit_scope();
    }

    #[test]
    fn root_wraps_top_level_form() {
        let mut pool = ListPool::with_capacity(8);
        pool.enter_scope();
        let root = match parse("(main)", &mut pool) {
            Ok(root) => root,
            Err(err) => panic!("parse failed: {err}"),
        };
        let Some(root_node) = pool.get(root) else {
            panic!("root missing")
        };
        assert!(root_node.atom.is_empty());
        assert!(root_node.child.is_some());
        pool.exit_scope();
    }
}
