//! Open-addressing associative containers for the lil engine.
//!
//! The engine's name→id indices key on string slices whose bytes live in
//! entity-store string pools, not in the table itself. [`RawTable`] supports
//! that directly: it stores caller entries plus their 64-bit hashes and
//! resolves equality through a caller closure, so an entry can be a compact
//! span that the closure dereferences against external storage.
//!
//! [`HashTable`] and [`HashSet`] are thin typed wrappers over [`RawTable`]
//! for self-contained keys (integers, owned strings), hashing with
//! `FxHasher`.
//!
//! Deletion uses back-shift compaction rather than tombstones: probe chains
//! stay canonical, so a removed key can always be reinserted and lookups of
//! colliding keys never break, no matter how many removals happened before.

mod raw;
mod table;

pub use raw::RawTable;
pub use table::{hash_bytes, hash_key, HashSet, HashTable};
