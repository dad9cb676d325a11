//! Stack-scoped allocators for the lil engine.
//!
//! Two allocator families, both with the same scope discipline:
//!
//! - [`Arena`]: a bump allocator over a byte buffer. Allocation returns a
//!   byte offset, never a pointer, so growth cannot invalidate anything a
//!   caller holds.
//! - [`Pool`]: a fixed-slot-size allocator (parse-tree nodes, symbol-table
//!   entries) with index-based handles.
//!
//! A *scope* is a save point on the allocator's cursor stack. Entering a
//! scope pushes the current cursor; exiting pops it and releases every
//! allocation made since the matching push in O(1). Scopes are strictly
//! LIFO: every `enter_scope` must be matched by an `exit_scope` in reverse
//! order before the caller returns.

mod arena;
mod pool;

pub use arena::Arena;
pub use pool::Pool;
