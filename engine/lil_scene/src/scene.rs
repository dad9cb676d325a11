//! Scene facade: the stores, the camera, and the script log.

use crate::log::ScriptLog;
use crate::node::NodeType;
use crate::node_db::NodeDB;
use crate::source_db::SourceDB;

/// Editor camera. `pos[2]` is the zoom distance and stays non-zero.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Camera {
    pub pos: [f32; 3],
}

impl Default for Camera {
    fn default() -> Self {
        Camera {
            pos: [0.0, 0.0, 1.0],
        }
    }
}

/// True if `name` can name a source or node: non-empty, ASCII in
/// 0x20..=0x7F, and no `"` (names are emitted inside quoted atoms).
pub fn is_valid_name(name: &str) -> bool {
    !name.is_empty()
        && name
            .bytes()
            .all(|b| (0x20..=0x7F).contains(&b) && b != b'"')
}

/// The whole editable state of one graph document.
///
/// Every mutation that a script or the UI can trigger goes through this
/// facade, which validates names and routes diagnostics into the log before
/// touching the stores. The stores themselves stay panic-on-contract-breach;
/// the facade is where bad user input turns into warnings instead.
pub struct Scene {
    pub sources: SourceDB,
    pub nodes: NodeDB,
    pub camera: Camera,
    pub log: ScriptLog,
}

impl Scene {
    /// Create an empty scene logging through `tracing`.
    pub fn new() -> Self {
        Scene {
            sources: SourceDB::new(),
            nodes: NodeDB::new(),
            camera: Camera::default(),
            log: ScriptLog::default(),
        }
    }

    /// Create an empty scene with a capturing log, for tests and headless
    /// runs.
    pub fn with_capture_log() -> Self {
        Scene {
            log: ScriptLog::capture(),
            ..Scene::new()
        }
    }

    /// Add a source, replacing any existing one of the same name.
    pub fn add_source(&mut self, name: &str, text: &str) {
        if !is_valid_name(name) {
            self.log.warning(format!("invalid source name {name:?}"));
            return;
        }
        self.sources.add(name, text);
    }

    /// Replace the text of an existing source.
    pub fn set_source(&mut self, name: &str, text: &str) {
        if !self.sources.contains(name) {
            self.log.warning(format!("no source named {name:?}"));
            return;
        }
        self.sources.update_text(name, text);
    }

    /// Remove a source; a missing name is a warning, not a panic.
    pub fn remove_source(&mut self, name: &str) {
        if !self.sources.contains(name) {
            self.log.warning(format!("no source named {name:?}"));
            return;
        }
        self.sources.remove(name);
    }

    /// Text of a source.
    pub fn get_source(&self, name: &str) -> Option<&str> {
        self.sources.text(name)
    }

    /// Source names from the last frame's snapshot.
    pub fn source_names(&self) -> impl Iterator<Item = &str> {
        self.sources.names()
    }

    /// Add a node and place it. Returns the node id, 0 on failure.
    pub fn add_node(&mut self, name: &str, type_name: &str, x: f32, y: f32, w: f32, h: f32) -> u32 {
        if !is_valid_name(name) {
            self.log.warning(format!("invalid node name {name:?}"));
            return 0;
        }
        if self.nodes.get_id(name) != 0 {
            self.log
                .warning(format!("node name collision, replacing {name:?}"));
        }
        let id = self.nodes.add_node(name, type_name);
        if id == 0 {
            self.log
                .warning(format!("unknown node type {type_name:?}"));
            return 0;
        }
        self.nodes.set_node_position(id, x, y);
        self.nodes.set_node_size(id, w, h);
        id
    }

    /// Registered node types for UI menus, in menu order.
    pub fn node_types(&self) -> &'static [(NodeType, &'static str)] {
        NodeType::ALL
    }

    /// Per-frame housekeeping: refresh enumeration snapshots.
    pub fn new_frame(&mut self) {
        self.sources.rebuild_index();
    }
}

impl Default for Scene {
    fn default() -> Self {
        Self::new()
    }
}
