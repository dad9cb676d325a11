//! Scene state for the lil node editor.
//!
//! The scene is a pair of name-indexed entity stores — script sources and
//! graph nodes — plus the camera and a diagnostics log, behind a facade
//! that validates names and turns bad input into log warnings. Two
//! persistence schemes sit on top: re-emission as an equivalent script and
//! a flat JSON document.

mod emit;
mod log;
mod node;
mod node_db;
mod persist;
mod scene;
mod source_db;

pub use log::{ScriptLog, Severity};
pub use node::{Link, Node, NodeType};
pub use node_db::NodeDB;
pub use persist::PersistError;
pub use scene::{is_valid_name, Camera, Scene};
pub use source_db::{Source, SourceDB};
