//! Named script-source store.
//!
//! Each source owns a single heap block holding `name NUL text NUL`; the
//! store keeps sources in a slot vector with tombstones, a hash index from
//! name to slot, and a packed list of live names rebuilt once per frame for
//! stable UI enumeration.

use lil_index::{hash_bytes, RawTable};

/// One named script source in a single allocation.
///
/// Layout: name bytes, NUL, text bytes, NUL. Both views are slices into the
/// same block, so a source is one pointer-sized handle plus its payload.
#[derive(Debug)]
pub struct Source {
    storage: Box<[u8]>,
    name_len: usize,
}

impl Source {
    fn new(name: &str, text: &str) -> Self {
        let mut buf = Vec::with_capacity(name.len() + text.len() + 2);
        buf.extend_from_slice(name.as_bytes());
        buf.push(0);
        buf.extend_from_slice(text.as_bytes());
        buf.push(0);
        Source {
            storage: buf.into_boxed_slice(),
            name_len: name.len(),
        }
    }

    /// Name of the source.
    pub fn name(&self) -> &str {
        std::str::from_utf8(&self.storage[..self.name_len]).unwrap_or("")
    }

    /// Script text of the source.
    pub fn text(&self) -> &str {
        let start = self.name_len + 1;
        let end = self.storage.len() - 1;
        std::str::from_utf8(&self.storage[start..end]).unwrap_or("")
    }
}

/// Store of named script sources.
///
/// Removal leaves a tombstone slot that the next add reuses, so slot indices
/// of surviving sources never move and the hash index stays valid across
/// arbitrary add/remove interleavings.
#[derive(Default)]
pub struct SourceDB {
    slots: Vec<Option<Source>>,
    index: RawTable<u32>,
    // Live slot indices in slot order; refreshed by `rebuild_index`.
    packed: Vec<u32>,
}

impl SourceDB {
    /// Create an empty store.
    pub fn new() -> Self {
        SourceDB::default()
    }

    /// Number of live sources.
    pub fn len(&self) -> usize {
        self.index.len()
    }

    /// True if no sources are stored.
    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    /// True if a source named `name` exists.
    pub fn contains(&self, name: &str) -> bool {
        self.find_slot(name).is_some()
    }

    /// Add a source, replacing any existing source of the same name.
    pub fn add(&mut self, name: &str, text: &str) {
        if self.contains(name) {
            self.remove(name);
        }
        let source = Source::new(name, text);
        let slot = match self.slots.iter().position(Option::is_none) {
            Some(free) => {
                self.slots[free] = Some(source);
                free as u32
            }
            None => {
                self.slots.push(Some(source));
                (self.slots.len() - 1) as u32
            }
        };
        self.index.insert(hash_bytes(name.as_bytes()), slot);
    }

    /// Remove the source named `name`.
    ///
    /// # Panics
    /// Panics if no such source exists; callers check with
    /// [`SourceDB::contains`] first.
    pub fn remove(&mut self, name: &str) {
        let slots = &self.slots;
        let removed = self.index.remove(hash_bytes(name.as_bytes()), |&slot| {
            Self::slot_name(slots, slot) == name
        });
        match removed {
            Some(slot) => self.slots[slot as usize] = None,
            None => panic!("SourceDB::remove: no source named {name:?}"),
        }
    }

    /// Replace the text of the source named `name`, keeping its name.
    ///
    /// # Panics
    /// Panics if no such source exists.
    pub fn update_text(&mut self, name: &str, text: &str) {
        self.remove(name);
        self.add(name, text);
    }

    /// Text of the source named `name`.
    pub fn text(&self, name: &str) -> Option<&str> {
        let slot = self.find_slot(name)?;
        self.slots[slot as usize].as_ref().map(Source::text)
    }

    /// Refresh the packed live-name list.
    ///
    /// Called once per frame by the scene; enumeration between rebuilds sees
    /// a stable snapshot even while sources are added or removed.
    pub fn rebuild_index(&mut self) {
        self.packed.clear();
        for (slot, entry) in self.slots.iter().enumerate() {
            if entry.is_some() {
                self.packed.push(slot as u32);
            }
        }
    }

    /// Names in the last rebuilt snapshot, in slot order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.packed
            .iter()
            .filter_map(|&slot| self.slots[slot as usize].as_ref().map(Source::name))
    }

    /// Live `(name, text)` pairs in slot order, independent of the packed
    /// snapshot.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.slots
            .iter()
            .filter_map(|slot| slot.as_ref().map(|src| (src.name(), src.text())))
    }

    fn find_slot(&self, name: &str) -> Option<u32> {
        self.index
            .find(hash_bytes(name.as_bytes()), |&slot| {
                Self::slot_name(&self.slots, slot) == name
            })
            .copied()
    }

    fn slot_name(slots: &[Option<Source>], slot: u32) -> &str {
        slots[slot as usize].as_ref().map_or("", Source::name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn add_and_lookup() {
        let mut db = SourceDB::new();
        db.add("init", "(main)");
        db.add("draw", "(main (print 1))");
        assert_eq!(db.len(), 2);
        assert_eq!(db.text("init"), Some("(main)"));
        assert_eq!(db.text("draw"), Some("(main (print 1))"));
        assert_eq!(db.text("missing"), None);
    }

    #[test]
    fn add_replaces_same_name() {
        let mut db = SourceDB::new();
        db.add("init", "old");
        db.add("init", "new");
        assert_eq!(db.len(), 1);
        assert_eq!(db.text("init"), Some("new"));
    }

    #[test]
    fn removal_leaves_reusable_slot() {
        let mut db = SourceDB::new();
        db.add("a", "1");
        db.add("b", "2");
        db.add("c", "3");
        db.remove("b");
        assert_eq!(db.len(), 2);
        assert!(!db.contains("b"));
        // The freed slot is reused before the vector grows.
        db.add("d", "4");
        db.rebuild_index();
        let names: Vec<&str> = db.names().collect();
        assert_eq!(names, vec!["a", "d", "c"]);
    }

    #[test]
    fn update_text_keeps_name() {
        let mut db = SourceDB::new();
        db.add("init", "old");
        db.update_text("init", "new");
        assert_eq!(db.text("init"), Some("new"));
        assert_eq!(db.len(), 1);
    }

    #[test]
    #[should_panic(expected = "no source named")]
    fn remove_absent_panics() {
        let mut db = SourceDB::new();
        db.remove("ghost");
    }

    #[test]
    fn names_snapshot_is_stable_until_rebuild() {
        let mut db = SourceDB::new();
        db.add("a", "1");
        db.rebuild_index();
        db.add("b", "2");
        let names: Vec<&str> = db.names().collect();
        assert_eq!(names, vec!["a"]);
        db.rebuild_index();
        let names: Vec<&str> = db.names().collect();
        assert_eq!(names, vec!["a", "b"]);
    }

    #[test]
    fn source_block_layout() {
        let source = Source::new("init", "(main)");
        assert_eq!(source.name(), "init");
        assert_eq!(source.text(), "(main)");
    }
}
