//! Node, link, and node-type definitions.

/// Kind of a graph node. Each kind maps to a stable registry name used by
/// scripts and persisted documents.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum NodeType {
    #[default]
    GfxDrawCall,
    GfxPass,
}

impl NodeType {
    /// Every registered node type with its registry name, in menu order.
    pub const ALL: &'static [(NodeType, &'static str)] = &[
        (NodeType::GfxDrawCall, "Gfx/DrawCall"),
        (NodeType::GfxPass, "Gfx/Pass"),
    ];

    /// Resolve a registry name. Unknown names are not an error here; the
    /// store reports them to the script log and skips the node.
    pub fn from_name(name: &str) -> Option<NodeType> {
        NodeType::ALL
            .iter()
            .find(|(_, n)| *n == name)
            .map(|(ty, _)| *ty)
    }

    /// Registry name of this type.
    pub fn name(self) -> &'static str {
        match self {
            NodeType::GfxDrawCall => "Gfx/DrawCall",
            NodeType::GfxPass => "Gfx/Pass",
        }
    }
}

/// One graph node.
///
/// `id` is 1-based; 0 marks a dead slot left behind by removal. Slots in the
/// backing vector are never reclaimed, so an id is also the slot index plus
/// one for the whole lifetime of the store.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Node {
    pub id: u32,
    pub ty: NodeType,
    pub pos: [f32; 2],
    pub size: [f32; 2],
    pub selected: bool,
    pub hovered: bool,
    pub dragged: bool,
    pub num_in_slots: u32,
    pub num_out_slots: u32,
}

impl Node {
    /// True if this slot holds a live node.
    pub fn is_alive(&self) -> bool {
        self.id != 0
    }

    /// True if the point lies inside the node rectangle.
    pub fn inside(&self, x: f32, y: f32) -> bool {
        x >= self.pos[0]
            && x <= self.pos[0] + self.size[0]
            && y >= self.pos[1]
            && y <= self.pos[1] + self.size[1]
    }
}

/// One directed connection from an output slot to an input slot.
///
/// Slot indices are 1-based, matching the values `add_output_slot` and
/// `add_input_slot` hand back to scripts.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Link {
    pub id: u32,
    pub src_node: u32,
    pub src_slot: u32,
    pub dst_node: u32,
    pub dst_slot: u32,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn type_names_roundtrip() {
        for &(ty, name) in NodeType::ALL {
            assert_eq!(NodeType::from_name(name), Some(ty));
            assert_eq!(ty.name(), name);
        }
        assert_eq!(NodeType::from_name("Gfx/Unknown"), None);
        assert_eq!(NodeType::from_name(""), None);
    }

    #[test]
    fn default_node_is_dead() {
        assert!(!Node::default().is_alive());
    }

    #[test]
    fn inside_checks_rectangle() {
        let node = Node {
            id: 1,
            pos: [10.0, 20.0],
            size: [4.0, 2.0],
            ..Node::default()
        };
        assert!(node.inside(12.0, 21.0));
        assert!(node.inside(10.0, 20.0));
        assert!(node.inside(14.0, 22.0));
        assert!(!node.inside(9.9, 21.0));
        assert!(!node.inside(12.0, 22.1));
    }
}
