//! Name-indexed node store with links and a compacting string pool.
//!
//! Node names and slot names live in one bump-allocated string pool; the
//! store keeps parallel vectors of node payloads and bookkeeping wrappers,
//! plus a hash index from name to id. Removing a node leaves garbage in the
//! pool; when an allocation no longer fits, the store recompacts the pool
//! and rebuilds the index from the live nodes before registering anything
//! new, so the index never references an unallocated name.

use crate::node::{Link, Node, NodeType};
use lil_index::{hash_bytes, RawTable};
use lil_mem::Arena;
use smallvec::SmallVec;

/// Initial string-pool capacity in bytes.
const POOL_CAPACITY: usize = 4096;

/// Reference to a NUL-terminated string in the store's pool. `len` excludes
/// the terminator. Invalidated by `rebuild_index`.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
struct PoolStr {
    start: u32,
    len: u32,
}

/// Per-node bookkeeping kept out of the hot [`Node`] payload: the interned
/// name, named slots, and incident link ids.
#[derive(Default)]
struct NodeWrapper {
    name: PoolStr,
    in_slots: SmallVec<[PoolStr; 8]>,
    out_slots: SmallVec<[PoolStr; 8]>,
    in_links: SmallVec<[u32; 8]>,
    out_links: SmallVec<[u32; 8]>,
}

/// Node store.
///
/// Ids are 1-based slot indices: slot `i` always holds id `i + 1`, dead
/// slots hold id 0, and the vectors never shrink. A removed node's id comes
/// back when its slot is reused; scripts that cache ids across removals see
/// the replacement node.
///
/// Invariant: `nodes`, `wrappers` and `id2name` always have equal length.
pub struct NodeDB {
    nodes: Vec<Node>,
    wrappers: Vec<NodeWrapper>,
    id2name: Vec<PoolStr>,
    index: RawTable<u32>,
    pool: Arena,
    links: Vec<Link>,
    next_link_id: u32,
}

impl NodeDB {
    /// Create an empty store with the default pool size.
    pub fn new() -> Self {
        Self::with_pool_capacity(POOL_CAPACITY)
    }

    /// Create an empty store with an explicit pool size in bytes.
    pub fn with_pool_capacity(capacity: usize) -> Self {
        NodeDB {
            nodes: Vec::new(),
            wrappers: Vec::new(),
            id2name: Vec::new(),
            index: RawTable::new(),
            pool: Arena::with_capacity(capacity),
            links: Vec::new(),
            next_link_id: 1,
        }
    }

    /// Number of node slots, dead ones included.
    pub fn num_nodes(&self) -> usize {
        self.nodes.len()
    }

    /// True if the 1-based `id` refers to a live node.
    pub fn is_alive(&self, id: u32) -> bool {
        match id.checked_sub(1) {
            Some(slot) => self.nodes.get(slot as usize).is_some_and(Node::is_alive),
            None => false,
        }
    }

    /// Id of the node named `name`; 0 when absent.
    pub fn get_id(&self, name: &str) -> u32 {
        let id2name = &self.id2name;
        let pool = &self.pool;
        self.index
            .find(hash_bytes(name.as_bytes()), |&id| {
                resolve(pool, id2name[(id - 1) as usize]) == name
            })
            .copied()
            .unwrap_or(0)
    }

    /// Name of the node with 1-based `id`; empty for dead or out-of-range
    /// ids.
    pub fn get_name(&self, id: u32) -> &str {
        match id.checked_sub(1) {
            Some(slot) if self.is_alive(id) => resolve(&self.pool, self.id2name[slot as usize]),
            _ => "",
        }
    }

    /// All node slots in id order, dead ones included.
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    /// Node payload behind a 1-based live `id`.
    pub fn get(&self, id: u32) -> Option<&Node> {
        if !self.is_alive(id) {
            return None;
        }
        self.nodes.get((id - 1) as usize)
    }

    /// Add a node. Returns its id, or 0 if `type_name` is not registered.
    ///
    /// A name collision removes the existing node first; the first dead slot
    /// is then reused, so the new node usually gets the old node's id back.
    pub fn add_node(&mut self, name: &str, type_name: &str) -> u32 {
        let Some(ty) = NodeType::from_name(type_name) else {
            return 0;
        };
        if self.get_id(name) != 0 {
            self.remove_node(name);
        }
        // Interning may recompact the pool; it must happen while the new
        // node is not yet registered anywhere.
        let interned = self.intern(name);
        let slot = match self.nodes.iter().position(|n| !n.is_alive()) {
            Some(free) => free,
            None => {
                self.nodes.push(Node::default());
                self.wrappers.push(NodeWrapper::default());
                self.id2name.push(PoolStr::default());
                self.nodes.len() - 1
            }
        };
        let id = (slot + 1) as u32;
        self.nodes[slot] = Node {
            id,
            ty,
            pos: [0.0, 0.0],
            size: [1.0, 1.0],
            ..Node::default()
        };
        self.wrappers[slot] = NodeWrapper {
            name: interned,
            ..NodeWrapper::default()
        };
        self.id2name[slot] = interned;
        self.index.insert(hash_bytes(name.as_bytes()), id);
        self.check_parallel();
        id
    }

    /// Remove the node named `name` and every link touching it.
    ///
    /// # Panics
    /// Panics if no such node exists; callers check with [`NodeDB::get_id`]
    /// first.
    pub fn remove_node(&mut self, name: &str) {
        let id2name = &self.id2name;
        let pool = &self.pool;
        let removed = self.index.remove(hash_bytes(name.as_bytes()), |&id| {
            resolve(pool, id2name[(id - 1) as usize]) == name
        });
        let Some(id) = removed else {
            panic!("NodeDB::remove_node: no node named {name:?}");
        };
        let slot = (id - 1) as usize;
        self.nodes[slot] = Node::default();
        self.wrappers[slot] = NodeWrapper::default();
        self.id2name[slot] = PoolStr::default();
        self.remove_links_touching(id);
        self.check_parallel();
    }

    /// Move a node. Out-of-range ids are ignored.
    pub fn set_node_position(&mut self, id: u32, x: f32, y: f32) {
        if let Some(node) = self.slot_mut(id) {
            node.pos = [x, y];
        }
    }

    /// Resize a node. Out-of-range ids are ignored.
    pub fn set_node_size(&mut self, id: u32, w: f32, h: f32) {
        if let Some(node) = self.slot_mut(id) {
            node.size = [w, h];
        }
    }

    /// Append a named input slot to a live node; returns the new slot's
    /// 1-based index, or 0 for dead or out-of-range nodes.
    pub fn add_input_slot(&mut self, node_id: u32, name: &str) -> u32 {
        if !self.is_alive(node_id) {
            return 0;
        }
        let interned = self.intern(name);
        let slot = (node_id - 1) as usize;
        self.wrappers[slot].in_slots.push(interned);
        self.nodes[slot].num_in_slots += 1;
        self.nodes[slot].num_in_slots
    }

    /// Append a named output slot; same contract as
    /// [`NodeDB::add_input_slot`].
    pub fn add_output_slot(&mut self, node_id: u32, name: &str) -> u32 {
        if !self.is_alive(node_id) {
            return 0;
        }
        let interned = self.intern(name);
        let slot = (node_id - 1) as usize;
        self.wrappers[slot].out_slots.push(interned);
        self.nodes[slot].num_out_slots += 1;
        self.nodes[slot].num_out_slots
    }

    /// Names of a node's input slots in slot order.
    pub fn in_slot_names(&self, node_id: u32) -> impl Iterator<Item = &str> {
        self.slot_names(node_id, true)
    }

    /// Names of a node's output slots in slot order.
    pub fn out_slot_names(&self, node_id: u32) -> impl Iterator<Item = &str> {
        self.slot_names(node_id, false)
    }

    /// Connect an output slot to an input slot.
    ///
    /// Both endpoints must be live and both slot indices in range (1-based,
    /// up to the node's slot count); otherwise nothing is stored and 0 is
    /// returned. Returns the new link's id.
    pub fn add_link(&mut self, src_node: u32, src_slot: u32, dst_node: u32, dst_slot: u32) -> u32 {
        if !self.is_alive(src_node) || !self.is_alive(dst_node) {
            return 0;
        }
        let src = &self.nodes[(src_node - 1) as usize];
        let dst = &self.nodes[(dst_node - 1) as usize];
        if src_slot == 0 || src_slot > src.num_out_slots {
            return 0;
        }
        if dst_slot == 0 || dst_slot > dst.num_in_slots {
            return 0;
        }
        let id = self.next_link_id;
        self.next_link_id += 1;
        self.links.push(Link {
            id,
            src_node,
            src_slot,
            dst_node,
            dst_slot,
        });
        self.wrappers[(src_node - 1) as usize].out_links.push(id);
        self.wrappers[(dst_node - 1) as usize].in_links.push(id);
        id
    }

    /// All live links in creation order.
    pub fn links(&self) -> &[Link] {
        &self.links
    }

    /// Highest link id handed out so far.
    pub fn last_link_id(&self) -> u32 {
        self.next_link_id - 1
    }

    /// Recompact the string pool and rebuild the name index from the live
    /// nodes. Every `PoolStr` held by the store is rewritten; external code
    /// never sees pool offsets, so this is invisible outside.
    pub fn rebuild_index(&mut self) {
        let mut fresh = Arena::with_capacity(self.pool.capacity().max(POOL_CAPACITY));
        let mut index = RawTable::new();
        for slot in 0..self.nodes.len() {
            if !self.nodes[slot].is_alive() {
                continue;
            }
            let name = copy_str(&self.pool, &mut fresh, self.wrappers[slot].name);
            self.wrappers[slot].name = name;
            for i in 0..self.wrappers[slot].in_slots.len() {
                let moved = copy_str(&self.pool, &mut fresh, self.wrappers[slot].in_slots[i]);
                self.wrappers[slot].in_slots[i] = moved;
            }
            for i in 0..self.wrappers[slot].out_slots.len() {
                let moved = copy_str(&self.pool, &mut fresh, self.wrappers[slot].out_slots[i]);
                self.wrappers[slot].out_slots[i] = moved;
            }
            self.id2name[slot] = name;
            let hash = hash_bytes(fresh.bytes(name.start as usize, name.len as usize));
            index.insert(hash, self.nodes[slot].id);
        }
        self.pool = fresh;
        self.index = index;
    }

    /// Copy `text` into the pool, recompacting first when it does not fit.
    fn intern(&mut self, text: &str) -> PoolStr {
        let len = text.len() + 1;
        let start = match self.pool.try_alloc(len) {
            Some(start) => start,
            None => {
                self.rebuild_index();
                self.pool.alloc(len)
            }
        };
        self.pool
            .bytes_mut(start, text.len())
            .copy_from_slice(text.as_bytes());
        PoolStr {
            start: start as u32,
            len: text.len() as u32,
        }
    }

    fn slot_mut(&mut self, id: u32) -> Option<&mut Node> {
        self.nodes.get_mut(id.checked_sub(1)? as usize)
    }

    fn slot_names(&self, node_id: u32, input: bool) -> impl Iterator<Item = &str> {
        let names: &[PoolStr] = match node_id.checked_sub(1) {
            Some(slot) if (slot as usize) < self.wrappers.len() => {
                let wrapper = &self.wrappers[slot as usize];
                if input {
                    &wrapper.in_slots
                } else {
                    &wrapper.out_slots
                }
            }
            _ => &[],
        };
        names.iter().map(|&s| resolve(&self.pool, s))
    }

    /// Drop every link with `node_id` as either endpoint and unregister the
    /// dropped ids from surviving wrappers.
    fn remove_links_touching(&mut self, node_id: u32) {
        let mut dead: SmallVec<[u32; 8]> = SmallVec::new();
        self.links.retain(|link| {
            if link.src_node == node_id || link.dst_node == node_id {
                dead.push(link.id);
                false
            } else {
                true
            }
        });
        if dead.is_empty() {
            return;
        }
        for wrapper in &mut self.wrappers {
            wrapper.in_links.retain(|id| !dead.contains(id));
            wrapper.out_links.retain(|id| !dead.contains(id));
        }
    }

    fn check_parallel(&self) {
        debug_assert!(
            self.nodes.len() == self.wrappers.len() && self.nodes.len() == self.id2name.len()
        );
    }
}

impl Default for NodeDB {
    fn default() -> Self {
        Self::new()
    }
}

fn resolve(pool: &Arena, s: PoolStr) -> &str {
    std::str::from_utf8(pool.bytes(s.start as usize, s.len as usize)).unwrap_or("")
}

fn copy_str(src: &Arena, dst: &mut Arena, s: PoolStr) -> PoolStr {
    let start = dst.alloc(s.len as usize + 1);
    dst.bytes_mut(start, s.len as usize)
        .copy_from_slice(src.bytes(s.start as usize, s.len as usize));
    PoolStr {
        start: start as u32,
        len: s.len,
    }
}
