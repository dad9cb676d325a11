//! Hash-agnostic open-addressing table with back-shift deletion.

/// Initial bucket count on first insert. Always a power of two.
const MIN_BUCKETS: usize = 16;

struct Bucket<T> {
    hash: u64,
    entry: T,
}

/// Open-addressing table of entries with caller-supplied hashes.
///
/// Linear probing over a power-of-two bucket array; growth rehashes all
/// live entries once the load factor crosses 70%. The caller supplies the
/// 64-bit hash on every operation and an equality closure on lookups, which
/// lets entries reference keys stored outside the table.
///
/// Duplicate keys are the caller's responsibility: `insert` does not probe
/// for an existing equal entry (the typed wrappers and the entity stores
/// check first).
pub struct RawTable<T> {
    buckets: Vec<Option<Bucket<T>>>,
    len: usize,
}

impl<T> RawTable<T> {
    /// Create an empty table. No allocation until the first insert.
    pub fn new() -> Self {
        RawTable {
            buckets: Vec::new(),
            len: 0,
        }
    }

    /// Number of live entries.
    pub fn len(&self) -> usize {
        self.len
    }

    /// True if the table holds no entries.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Insert an entry under `hash`.
    pub fn insert(&mut self, hash: u64, entry: T) {
        if self.buckets.is_empty() || (self.len + 1) * 10 > self.buckets.len() * 7 {
            self.grow();
        }
        let mask = self.buckets.len() - 1;
        let mut i = (hash as usize) & mask;
        while self.buckets[i].is_some() {
            i = (i + 1) & mask;
        }
        self.buckets[i] = Some(Bucket { hash, entry });
        self.len += 1;
    }

    /// Find the entry matching `hash` and `eq`.
    pub fn find(&self, hash: u64, mut eq: impl FnMut(&T) -> bool) -> Option<&T> {
        let i = self.probe(hash, &mut eq)?;
        self.buckets[i].as_ref().map(|b| &b.entry)
    }

    /// Mutable variant of [`RawTable::find`].
    pub fn find_mut(&mut self, hash: u64, mut eq: impl FnMut(&T) -> bool) -> Option<&mut T> {
        let i = self.probe(hash, &mut eq)?;
        self.buckets[i].as_mut().map(|b| &mut b.entry)
    }

    /// Remove and return the entry matching `hash` and `eq`.
    ///
    /// Back-shifts the tail of the probe chain so that subsequent lookups of
    /// colliding keys still terminate at the right bucket and reinsertion of
    /// the removed key succeeds.
    pub fn remove(&mut self, hash: u64, mut eq: impl FnMut(&T) -> bool) -> Option<T> {
        let mut hole = self.probe(hash, &mut eq)?;
        let mask = self.buckets.len() - 1;
        let removed = self.buckets[hole].take();
        self.len -= 1;
        let mut j = hole;
        loop {
            j = (j + 1) & mask;
            let Some(bucket) = &self.buckets[j] else {
                break;
            };
            let home = (bucket.hash as usize) & mask;
            // The entry at `j` may fill the hole only if doing so does not
            // move it in front of its home bucket (cyclic distance check).
            let probe_dist = j.wrapping_sub(home) & mask;
            let hole_dist = j.wrapping_sub(hole) & mask;
            if probe_dist >= hole_dist {
                self.buckets[hole] = self.buckets[j].take();
                hole = j;
            }
        }
        removed.map(|b| b.entry)
    }

    /// Iterate over live entries in unspecified order.
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.buckets
            .iter()
            .filter_map(|slot| slot.as_ref().map(|b| &b.entry))
    }

    /// Probe for a matching bucket index; stops at the first empty bucket.
    fn probe(&self, hash: u64, eq: &mut impl FnMut(&T) -> bool) -> Option<usize> {
        if self.buckets.is_empty() {
            return None;
        }
        let mask = self.buckets.len() - 1;
        let mut i = (hash as usize) & mask;
        loop {
            match &self.buckets[i] {
                None => return None,
                Some(b) if b.hash == hash && eq(&b.entry) => return Some(i),
                Some(_) => i = (i + 1) & mask,
            }
        }
    }

    /// Double the bucket array and rehash every live entry.
    fn grow(&mut self) {
        let new_cap = (self.buckets.len() * 2).max(MIN_BUCKETS);
        let old = std::mem::take(&mut self.buckets);
        self.buckets.resize_with(new_cap, || None);
        let mask = new_cap - 1;
        for slot in old {
            let Some(bucket) = slot else { continue };
            let mut i = (bucket.hash as usize) & mask;
            while self.buckets[i].is_some() {
                i = (i + 1) & mask;
            }
            self.buckets[i] = Some(bucket);
        }
    }
}

impl<T> Default for RawTable<T> {
    fn default() -> Self {
        Self::new()
    }
}
