//! Scene-to-script emitter.
//!
//! Re-emits the whole scene as one `(main ...)` form that, evaluated
//! against an empty scene, reconstructs it. Node ids become `node_<id>`
//! bindings so links can reference them symbolically; source texts go out
//! triple-quoted so their own parens and quotes survive verbatim.

use crate::scene::Scene;
use std::fmt::Write;

impl Scene {
    /// Serialize the scene as an equivalent script.
    pub fn save_script(&self) -> String {
        let mut out = String::from("(main\n");
        for node in self.nodes.nodes() {
            if !node.is_alive() {
                continue;
            }
            let id = node.id;
            let name = self.nodes.get_name(id);
            let _ = writeln!(
                out,
                "  (let node_{id} (add_node \"{name}\" \"{}\"))",
                node.ty.name()
            );
            let _ = writeln!(
                out,
                "  (set_node_position node_{id} {:.6} {:.6})",
                node.pos[0], node.pos[1]
            );
            let _ = writeln!(
                out,
                "  (set_node_size node_{id} {:.6} {:.6})",
                node.size[0], node.size[1]
            );
            for slot_name in self.nodes.in_slot_names(id) {
                let _ = writeln!(out, "  (add_input_slot node_{id} \"{slot_name}\")");
            }
            for slot_name in self.nodes.out_slot_names(id) {
                let _ = writeln!(out, "  (add_output_slot node_{id} \"{slot_name}\")");
            }
        }
        for link in self.nodes.links() {
            let _ = writeln!(
                out,
                "  (add_link node_{} {} node_{} {})",
                link.src_node, link.src_slot, link.dst_node, link.dst_slot
            );
        }
        for (name, text) in self.sources.iter() {
            // The init source is what runs this script; emitting it back
            // would nest the document inside itself.
            if name == "init" {
                continue;
            }
            let _ = writeln!(out, "  (add_source \"{name}\" \"\"\"{text}\"\"\")");
        }
        let _ = writeln!(
            out,
            "  (move_camera {:.6} {:.6} {:.6})",
            self.camera.pos[0], self.camera.pos[1], self.camera.pos[2]
        );
        out.push(')');
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn empty_scene_emits_camera_only() {
        let scene = Scene::with_capture_log();
        assert_eq!(
            scene.save_script(),
            "(main\n  (move_camera 0.000000 0.000000 1.000000)\n)"
        );
    }

    #[test]
    fn nodes_slots_links_and_sources_are_emitted() {
        let mut scene = Scene::with_capture_log();
        let a = scene.add_node("draw", "Gfx/DrawCall", 1.5, 2.0, 3.0, 1.0);
        let b = scene.add_node("pass", "Gfx/Pass", 0.0, 0.0, 1.0, 1.0);
        scene.nodes.add_output_slot(a, "color");
        scene.nodes.add_input_slot(b, "color");
        scene.nodes.add_link(a, 1, b, 1);
        scene.add_source("init", "(main)");
        scene.add_source("draw_src", "(main (print 1))");
        let script = scene.save_script();
        assert!(script.contains("(let node_1 (add_node \"draw\" \"Gfx/DrawCall\"))"));
        assert!(script.contains("(set_node_position node_1 1.500000 2.000000)"));
        assert!(script.contains("(add_output_slot node_1 \"color\")"));
        assert!(script.contains("(add_input_slot node_2 \"color\")"));
        assert!(script.contains("(add_link node_1 1 node_2 1)"));
        assert!(script.contains("(add_source \"draw_src\" \"\"\"(main (print 1))\"\"\")"));
        assert!(!script.contains("\"init\""));
    }
}
