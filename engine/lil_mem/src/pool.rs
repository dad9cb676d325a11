//! Fixed-slot-size allocator with the arena's scope discipline.

/// Slot pool with stack-ordered bulk release.
///
/// Slots are appended at the cursor and addressed by `u32` index. Indices
/// are stable only within the enclosing scope: exiting a scope truncates the
/// pool back to the saved cursor and invalidates every index allocated
/// inside it.
pub struct Pool<T> {
    slots: Vec<T>,
    scopes: Vec<usize>,
}

impl<T> Pool<T> {
    /// Create an empty pool with room for `capacity` slots.
    pub fn with_capacity(capacity: usize) -> Self {
        Pool {
            slots: Vec::with_capacity(capacity),
            scopes: Vec::new(),
        }
    }

    /// Append one slot, returning its index.
    pub fn push(&mut self, value: T) -> u32 {
        let idx = self.slots.len() as u32;
        self.slots.push(value);
        idx
    }

    /// Slot at `idx`, if allocated.
    pub fn get(&self, idx: u32) -> Option<&T> {
        self.slots.get(idx as usize)
    }

    /// Mutable slot at `idx`, if allocated.
    pub fn get_mut(&mut self, idx: u32) -> Option<&mut T> {
        self.slots.get_mut(idx as usize)
    }

    /// Number of live slots (the cursor).
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// True if no slots are allocated.
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Iterate over live slots, oldest first.
    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.slots.iter()
    }

    /// Save the cursor on the scope stack.
    pub fn enter_scope(&mut self) {
        self.scopes.push(self.slots.len());
    }

    /// Truncate back to the matching `enter_scope`, invalidating every index
    /// allocated since.
    ///
    /// # Panics
    /// Panics if no scope is open.
    pub fn exit_scope(&mut self) {
        match self.scopes.pop() {
            Some(saved) => {
                debug_assert!(saved <= self.slots.len());
                self.slots.truncate(saved);
            }
            None => panic!("Pool::exit_scope without matching enter_scope"),
        }
    }
}

impl<T: Default> Pool<T> {
    /// Append `n` default-initialised slots, returning the first index.
    pub fn alloc_zero(&mut self, n: usize) -> u32 {
        let first = self.slots.len() as u32;
        self.slots.resize_with(self.slots.len() + n, T::default);
        first
    }
}

impl<T> Default for Pool<T> {
    fn default() -> Self {
        Pool {
            slots: Vec::new(),
            scopes: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn push_and_get() {
        let mut pool = Pool::with_capacity(4);
        let a = pool.push(10u32);
        let b = pool.push(20u32);
        assert_eq!(pool.get(a), Some(&10));
        assert_eq!(pool.get(b), Some(&20));
        assert_eq!(pool.get(2), None);
    }

    #[test]
    fn alloc_zero_defaults_slots() {
        let mut pool: Pool<u64> = Pool::default();
        let first = pool.alloc_zero(3);
        assert_eq!(first, 0);
        assert_eq!(pool.len(), 3);
        assert_eq!(pool.get(2), Some(&0));
    }

    #[test]
    fn exit_scope_invalidates_inner_indices() {
        let mut pool = Pool::with_capacity(4);
        pool.push(1u8);
        pool.enter_scope();
        let inner = pool.push(2u8);
        assert_eq!(pool.get(inner), Some(&2));
        pool.exit_scope();
        assert_eq!(pool.get(inner), None);
        assert_eq!(pool.len(), 1);
    }

    #[test]
    fn indices_reused_after_scope_roundtrip() {
        let mut pool = Pool::with_capacity(4);
        pool.enter_scope();
        let a = pool.push(7u32);
        pool.exit_scope();
        pool.enter_scope();
        let b = pool.push(9u32);
        assert_eq!(a, b);
        assert_eq!(pool.get(b), Some(&9));
        pool.exit_scope();
    }

    #[test]
    #[should_panic(expected = "without matching enter_scope")]
    fn exit_without_enter_panics() {
        let mut pool: Pool<u8> = Pool::default();
        pool.exit_scope();
    }
}
