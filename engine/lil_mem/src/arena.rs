//! Bump allocator over a growable byte buffer.

/// Granularity of buffer growth. Allocations never grow the buffer by less
/// than one page, so repeated small allocations amortise to O(1).
const PAGE: usize = 4096;

/// Bump allocator with stack-ordered bulk release.
///
/// Allocations are handed out as byte offsets into the backing buffer and
/// stay valid until the enclosing scope exits. The buffer grows on demand in
/// page-sized chunks; [`Arena::try_alloc`] is the non-growing variant for
/// callers that treat exhaustion as a compaction trigger.
///
/// Invariant: every saved cursor on the scope stack is `<=` the current
/// cursor, and popping a scope only ever moves the cursor backward.
pub struct Arena {
    buf: Vec<u8>,
    cursor: usize,
    scopes: Vec<usize>,
}

impl Arena {
    /// Create an arena with the given initial capacity in bytes.
    pub fn with_capacity(capacity: usize) -> Self {
        Arena {
            buf: vec![0; capacity],
            cursor: 0,
            scopes: Vec::new(),
        }
    }

    /// Allocate `len` zeroed bytes, growing the buffer if needed.
    ///
    /// Returns the offset of the first byte.
    pub fn alloc(&mut self, len: usize) -> usize {
        let start = self.cursor;
        let end = start + len;
        if end > self.buf.len() {
            let target = end.next_multiple_of(PAGE).max(self.buf.len() * 2);
            self.buf.resize(target, 0);
        }
        // Scope exit rewinds the cursor without clearing; stale bytes from a
        // previous scope must not leak into the new allocation.
        self.buf[start..end].fill(0);
        self.cursor = end;
        start
    }

    /// Allocate `len` zeroed bytes only if they fit in the current buffer.
    ///
    /// Returns `None` on exhaustion instead of growing. Entity stores use
    /// this to decide when to recompact their string pools.
    pub fn try_alloc(&mut self, len: usize) -> Option<usize> {
        let start = self.cursor;
        let end = start.checked_add(len)?;
        if end > self.buf.len() {
            return None;
        }
        self.buf[start..end].fill(0);
        self.cursor = end;
        Some(start)
    }

    /// View an allocated range.
    pub fn bytes(&self, start: usize, len: usize) -> &[u8] {
        &self.buf[start..start + len]
    }

    /// Mutable view of an allocated range.
    pub fn bytes_mut(&mut self, start: usize, len: usize) -> &mut [u8] {
        &mut self.buf[start..start + len]
    }

    /// Copy `src` into a fresh allocation and return its offset.
    pub fn alloc_bytes(&mut self, src: &[u8]) -> usize {
        let start = self.alloc(src.len());
        self.buf[start..start + src.len()].copy_from_slice(src);
        start
    }

    /// Save the current cursor on the scope stack.
    pub fn enter_scope(&mut self) {
        self.scopes.push(self.cursor);
    }

    /// Rewind the cursor to the matching `enter_scope`.
    ///
    /// Every allocation made since that point becomes invalid; its bytes may
    /// be reused by later allocations.
    ///
    /// # Panics
    /// Panics if no scope is open (caller bug, not recoverable input).
    pub fn exit_scope(&mut self) {
        match self.scopes.pop() {
            Some(saved) => {
                debug_assert!(saved <= self.cursor);
                self.cursor = saved;
            }
            None => panic!("Arena::exit_scope without matching enter_scope"),
        }
    }

    /// Bytes currently allocated.
    pub fn used(&self) -> usize {
        self.cursor
    }

    /// Total capacity of the backing buffer.
    pub fn capacity(&self) -> usize {
        self.buf.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn alloc_returns_zeroed_range() {
        let mut arena = Arena::with_capacity(64);
        let off = arena.alloc(16);
        assert_eq!(arena.bytes(off, 16), &[0u8; 16]);
    }

    #[test]
    fn sequential_allocs_do_not_overlap() {
        let mut arena = Arena::with_capacity(64);
        let a = arena.alloc(8);
        let b = arena.alloc(8);
        assert_eq!(b, a + 8);
        assert_eq!(arena.used(), 16);
    }

    #[test]
    fn grows_beyond_initial_capacity() {
        let mut arena = Arena::with_capacity(8);
        let off = arena.alloc(10_000);
        assert_eq!(arena.bytes(off, 10_000).len(), 10_000);
        assert!(arena.capacity() >= 10_000);
    }

    #[test]
    fn try_alloc_fails_on_exhaustion() {
        let mut arena = Arena::with_capacity(16);
        assert!(arena.try_alloc(8).is_some());
        assert!(arena.try_alloc(9).is_none());
        // The failed attempt must not move the cursor.
        assert_eq!(arena.used(), 8);
        assert!(arena.try_alloc(8).is_some());
    }

    #[test]
    fn scope_roundtrip_reuses_bytes() {
        let mut arena = Arena::with_capacity(64);
        arena.enter_scope();
        let a = arena.alloc(4);
        arena.bytes_mut(a, 4).copy_from_slice(b"\xAA\xBB\xCC\xDD");
        arena.exit_scope();
        assert_eq!(arena.used(), 0);

        arena.enter_scope();
        let b = arena.alloc(4);
        // Same backing bytes, but handed out zeroed again.
        assert_eq!(b, a);
        assert_eq!(arena.bytes(b, 4), &[0u8; 4]);
        arena.exit_scope();
    }

    #[test]
    fn nested_scopes_pop_in_lifo_order() {
        let mut arena = Arena::with_capacity(64);
        arena.enter_scope();
        arena.alloc(4);
        arena.enter_scope();
        arena.alloc(4);
        assert_eq!(arena.used(), 8);
        arena.exit_scope();
        assert_eq!(arena.used(), 4);
        arena.exit_scope();
        assert_eq!(arena.used(), 0);
    }

    #[test]
    #[should_panic(expected = "without matching enter_scope")]
    fn exit_without_enter_panics() {
        let mut arena = Arena::with_capacity(8);
        arena.exit_scope();
    }

    #[test]
    fn alloc_bytes_copies_content() {
        let mut arena = Arena::with_capacity(8);
        let off = arena.alloc_bytes(b"hello");
        assert_eq!(arena.bytes(off, 5), b"hello");
    }

    mod properties {
        use super::*;
        use proptest::prelude::*;

        /// One step of an arena workload.
        #[derive(Debug, Clone)]
        enum Step {
            Alloc(usize),
            Enter,
            Exit,
        }

        fn step_strategy() -> impl Strategy<Value = Step> {
            prop_oneof![
                (1usize..64).prop_map(Step::Alloc),
                Just(Step::Enter),
                Just(Step::Exit),
            ]
        }

        proptest! {
            /// The cursor always matches a shadow model that tracks scope
            /// saves by hand, for any interleaving of alloc/enter/exit.
            #[test]
            fn cursor_matches_model(steps in proptest::collection::vec(step_strategy(), 0..64)) {
                let mut arena = Arena::with_capacity(64);
                let mut model_cursor = 0usize;
                let mut model_scopes: Vec<usize> = Vec::new();
                for step in steps {
                    match step {
                        Step::Alloc(n) => {
                            arena.alloc(n);
                            model_cursor += n;
                        }
                        Step::Enter => {
                            arena.enter_scope();
                            model_scopes.push(model_cursor);
                        }
                        Step::Exit => {
                            // Only exit scopes the model knows are open.
                            if let Some(saved) = model_scopes.pop() {
                                arena.exit_scope();
                                model_cursor = saved;
                            }
                        }
                    }
                    prop_assert_eq!(arena.used(), model_cursor);
                }
            }
        }
    }
}
