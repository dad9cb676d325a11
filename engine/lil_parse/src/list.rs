//! Parse-tree nodes and their backing pool.

use crate::Span;
use lil_mem::Pool;

/// One parse-tree node.
///
/// Exactly one of two shapes is meaningful:
/// - atom: non-empty `atom` span, `child` is `None`;
/// - sub-list: empty `atom` span, `child` points at the list head.
///
/// `next` chains siblings at the same nesting level. The parser also leaves
/// fully empty nodes behind (no atom, no child) after quoted atoms; the
/// evaluator treats those as errors when reached, matching the grammar's
/// reference behavior.
#[derive(Copy, Clone, Default, Debug, PartialEq, Eq)]
pub struct List {
    pub atom: Span,
    pub child: Option<ListId>,
    pub next: Option<ListId>,
}

/// Index of a [`List`] node inside its [`ListPool`].
///
/// Valid only within the pool scope the node was allocated in.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct ListId(pub u32);

/// Pool of parse-tree nodes with the engine's scope discipline.
///
/// Parsing happens inside a scope entered by the caller; exiting it releases
/// the whole tree in O(1).
#[derive(Default)]
pub struct ListPool {
    pool: Pool<List>,
}

impl ListPool {
    /// Create a pool with room for `capacity` nodes.
    pub fn with_capacity(capacity: usize) -> Self {
        ListPool {
            pool: Pool::with_capacity(capacity),
        }
    }

    /// Allocate a fresh empty node.
    pub fn alloc(&mut self) -> ListId {
        ListId(self.pool.push(List::default()))
    }

    /// Node behind `id`, if still allocated.
    pub fn get(&self, id: ListId) -> Option<&List> {
        self.pool.get(id.0)
    }

    /// Mutable node behind `id`.
    pub fn get_mut(&mut self, id: ListId) -> Option<&mut List> {
        self.pool.get_mut(id.0)
    }

    /// Number of live nodes.
    pub fn len(&self) -> usize {
        self.pool.len()
    }

    /// True if the pool holds no nodes.
    pub fn is_empty(&self) -> bool {
        self.pool.is_empty()
    }

    /// Open a tree scope.
    pub fn enter_scope(&mut self) {
        self.pool.enter_scope();
    }

    /// Release every node allocated since the matching `enter_scope`.
    pub fn exit_scope(&mut self) {
        self.pool.exit_scope();
    }

    /// `n`-th sibling of `id` (0 is `id` itself).
    ///
    /// Mirrors the reference tree's `get(i)` walk; `None` past the chain end
    /// is how arity violations surface to the evaluator.
    pub fn sibling(&self, id: ListId, n: u32) -> Option<ListId> {
        let mut cur = id;
        for _ in 0..n {
            cur = self.get(cur)?.next?;
        }
        Some(cur)
    }

    /// Atom text of `id`, resolved against the source the tree was parsed
    /// from. Empty for sub-list and empty nodes.
    pub fn atom_str<'src>(&self, source: &'src str, id: ListId) -> &'src str {
        self.get(id).map_or("", |node| node.atom.resolve(source))
    }

    /// True if `id` is an atom equal to `name`.
    pub fn cmp_symbol(&self, source: &str, id: ListId, name: &str) -> bool {
        match self.get(id) {
            Some(node) => !node.atom.is_empty() && node.atom.resolve(source) == name,
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn sibling_walk() {
        let mut pool = ListPool::with_capacity(8);
        let a = pool.alloc();
        let b = pool.alloc();
        let c = pool.alloc();
        if let Some(node) = pool.get_mut(a) {
            node.next = Some(b);
        }
        if let Some(node) = pool.get_mut(b) {
            node.next = Some(c);
        }
        assert_eq!(pool.sibling(a, 0), Some(a));
        assert_eq!(pool.sibling(a, 2), Some(c));
        assert_eq!(pool.sibling(a, 3), None);
    }

    #[test]
    fn scope_releases_tree() {
        let mut pool = ListPool::with_capacity(8);
        pool.enter_scope();
        let id = pool.alloc();
        pool.exit_scope();
        assert_eq!(pool.get(id), None);
        assert!(pool.is_empty());
    }
}
