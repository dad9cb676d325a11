//! Evaluator for the lil scripting dialect.
//!
//! Scripts mutate a [`lil_scene::Scene`]: they add nodes and sources, wire
//! links, and move the camera. [`run_script`] is the boundary the editor
//! and the CLI call: it parses inside one pool scope, evaluates, and folds
//! any failure into a single warning on the scene log instead of
//! propagating — user input never panics.

mod errors;
mod eval;
mod symbols;
mod value;

pub use errors::EvalError;
pub use eval::Evaluator;
pub use symbols::SymbolTable;
pub use value::Value;

use lil_parse::ListPool;
use lil_scene::Scene;

/// Parse and evaluate `text` against `scene`.
///
/// Returns `true` if the run completed; on failure the cause goes to the
/// scene log at error severity, followed by one aggregate warning.
pub fn run_script(scene: &mut Scene, text: &str) -> bool {
    let mut pool = ListPool::with_capacity(256);
    pool.enter_scope();
    let ok = match lil_parse::parse(text, &mut pool) {
        Ok(root) => {
            let mut evaluator = Evaluator::new(scene, &pool, text);
            match evaluator.eval(root) {
                Ok(_) => true,
                Err(err) => {
                    tracing::debug!(target: "eval", "evaluation failed: {err}");
                    scene.log.error(err.to_string());
                    scene.log.warning("Evaluation error");
                    false
                }
            }
        }
        Err(err) => {
            tracing::debug!(target: "eval", "parse failed: {err}");
            scene.log.error(err.to_string());
            scene.log.warning("Parse error");
            false
        }
    };
    pool.exit_scope();
    ok
}

/// Run a script stored in the scene's source store.
pub fn run_source(scene: &mut Scene, name: &str) -> bool {
    let Some(text) = scene.get_source(name) else {
        scene.log.warning(format!("no source named {name:?}"));
        return false;
    };
    let text = text.to_owned();
    run_script(scene, &text)
}
