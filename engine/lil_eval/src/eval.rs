//! Tree-walking evaluator.
//!
//! One pass over the parse tree with a scope-stacked symbol table. Atom
//! dispatch order matters and is fixed: integer literal, float literal,
//! built-in form, binding lookup, literal symbol. Built-ins are checked
//! before bindings, so `(let add 1)` binds a symbol but never shadows the
//! form.

use crate::{EvalError, SymbolTable, Value};
use lil_parse::{parse_decimal_int, parse_float, ListId, ListPool};
use lil_scene::Scene;
use std::borrow::Cow;
use std::fmt::Write;

/// Binary arithmetic forms share one evaluation path.
#[derive(Copy, Clone)]
enum ArithOp {
    Add,
    Mul,
}

impl ArithOp {
    fn name(self) -> &'static str {
        match self {
            ArithOp::Add => "add",
            ArithOp::Mul => "mul",
        }
    }

    fn int(self, a: i32, b: i32) -> i32 {
        match self {
            ArithOp::Add => a.wrapping_add(b),
            ArithOp::Mul => a.wrapping_mul(b),
        }
    }

    fn float(self, a: f32, b: f32) -> f32 {
        match self {
            ArithOp::Add => a + b,
            ArithOp::Mul => a * b,
        }
    }
}

/// Node ids cross the script boundary as `i32`; negative values map to 0,
/// which every store operation treats as not-a-node.
fn script_id(raw: i32) -> u32 {
    u32::try_from(raw).unwrap_or(0)
}

/// Evaluator for one script run.
///
/// Borrows the scene mutably for the whole run and the parse tree plus its
/// source buffer immutably; symbol values borrow from the source buffer, so
/// the table dies with the evaluator.
pub struct Evaluator<'a, 'src> {
    scene: &'a mut Scene,
    pool: &'a ListPool,
    source: &'src str,
    symbols: SymbolTable<'src>,
}

impl<'a, 'src> Evaluator<'a, 'src> {
    pub fn new(scene: &'a mut Scene, pool: &'a ListPool, source: &'src str) -> Self {
        Evaluator {
            scene,
            pool,
            source,
            symbols: SymbolTable::new(),
        }
    }

    /// Evaluate one node. `None` is the result of statement forms; the
    /// first error aborts the whole run.
    pub fn eval(&mut self, id: ListId) -> Result<Option<Value<'src>>, EvalError> {
        let Some(node) = self.pool.get(id).copied() else {
            return Err(EvalError::EmptyExpression);
        };
        if node.atom.is_empty() {
            // Parenthesized expression (or the root wrapper): the value is
            // the child's value. Childless empty nodes are grammar leftovers
            // and an error to reach, as in the reference behavior.
            let child = node.child.ok_or(EvalError::EmptyExpression)?;
            return self.eval(child);
        }
        let text = node.atom.resolve(self.source);
        if let Some(value) = parse_decimal_int(text) {
            return Ok(Some(Value::Int(value)));
        }
        if let Some(value) = parse_float(text) {
            return Ok(Some(Value::Float(value)));
        }
        match text {
            "main" | "scope" => self.eval_block(id),
            "let" => {
                let name = self.eval_sym(id, 1, "let")?;
                let value = self.eval_value(id, 2, "let")?;
                self.symbols.bind(name, value);
                Ok(None)
            }
            "for" => self.eval_for(id),
            "add" => self.eval_arith(id, ArithOp::Add),
            "mul" => self.eval_arith(id, ArithOp::Mul),
            "itof" => {
                let value = self.eval_int(id, 1, "itof")?;
                Ok(Some(Value::Float(value as f32)))
            }
            "format" => self.eval_format(id),
            "print" => {
                let message = self.eval_sym(id, 1, "print")?;
                self.scene.log.debug(message.into_owned());
                Ok(None)
            }
            "add_node" => {
                let name = self.eval_sym(id, 1, "add_node")?;
                let type_name = self.eval_sym(id, 2, "add_node")?;
                let node_id = self.scene.add_node(&name, &type_name, 0.0, 0.0, 1.0, 1.0);
                Ok(Some(Value::Int(node_id as i32)))
            }
            "get_node_id" => {
                let name = self.eval_sym(id, 1, "get_node_id")?;
                Ok(Some(Value::Int(self.scene.nodes.get_id(&name) as i32)))
            }
            "set_node_position" => {
                let node_id = self.eval_int(id, 1, "set_node_position")?;
                let x = self.eval_float(id, 2, "set_node_position")?;
                let y = self.eval_float(id, 3, "set_node_position")?;
                self.scene.nodes.set_node_position(script_id(node_id), x, y);
                Ok(None)
            }
            "set_node_size" => {
                let node_id = self.eval_int(id, 1, "set_node_size")?;
                let w = self.eval_float(id, 2, "set_node_size")?;
                let h = self.eval_float(id, 3, "set_node_size")?;
                self.scene.nodes.set_node_size(script_id(node_id), w, h);
                Ok(None)
            }
            "add_input_slot" => {
                let node_id = self.eval_int(id, 1, "add_input_slot")?;
                let name = self.eval_sym(id, 2, "add_input_slot")?;
                let slot = self.scene.nodes.add_input_slot(script_id(node_id), &name);
                Ok(Some(Value::Int(slot as i32)))
            }
            "add_output_slot" => {
                let node_id = self.eval_int(id, 1, "add_output_slot")?;
                let name = self.eval_sym(id, 2, "add_output_slot")?;
                let slot = self.scene.nodes.add_output_slot(script_id(node_id), &name);
                Ok(Some(Value::Int(slot as i32)))
            }
            "add_link" => {
                let src_node = self.eval_int(id, 1, "add_link")?;
                let src_slot = self.eval_int(id, 2, "add_link")?;
                let dst_node = self.eval_int(id, 3, "add_link")?;
                let dst_slot = self.eval_int(id, 4, "add_link")?;
                let link = self.scene.nodes.add_link(
                    script_id(src_node),
                    script_id(src_slot),
                    script_id(dst_node),
                    script_id(dst_slot),
                );
                Ok(Some(Value::Int(link as i32)))
            }
            "add_source" => {
                let name = self.eval_sym(id, 1, "add_source")?;
                let source_text = self.eval_sym(id, 2, "add_source")?;
                self.scene.add_source(&name, &source_text);
                Ok(None)
            }
            "move_camera" => {
                let x = self.eval_float(id, 1, "move_camera")?;
                let y = self.eval_float(id, 2, "move_camera")?;
                let z = self.eval_float(id, 3, "move_camera")?;
                self.scene.camera.pos = [x, y, z];
                Ok(None)
            }
            "get_num_nodes" => Ok(Some(Value::Int(self.scene.nodes.num_nodes() as i32))),
            "is_node_alive" => {
                let index = self.eval_int(id, 1, "is_node_alive")?;
                let alive = self.scene.nodes.is_alive(script_id(index));
                Ok(Some(Value::Int(i32::from(alive))))
            }
            _ => {
                if let Some(value) = self.symbols.lookup(text) {
                    return Ok(Some(value.clone()));
                }
                // Unresolved symbols evaluate to themselves.
                Ok(Some(Value::Sym(Cow::Borrowed(text))))
            }
        }
    }

    /// `(main ...)` / `(scope ...)`: fresh scope, statements in order.
    fn eval_block(&mut self, id: ListId) -> Result<Option<Value<'src>>, EvalError> {
        self.symbols.enter_scope();
        let result = match self.pool.get(id).and_then(|n| n.next) {
            Some(first) => self.eval_sequence(first),
            None => Ok(()),
        };
        self.symbols.exit_scope();
        result.map(|()| None)
    }

    /// `(for <var> <lower> <upper> body...)`: exclusive upper bound; the
    /// variable is rebound in a fresh scope each iteration and does not
    /// leak past the loop.
    fn eval_for(&mut self, id: ListId) -> Result<Option<Value<'src>>, EvalError> {
        let name = self.eval_sym(id, 1, "for")?;
        let lower = self.eval_int(id, 2, "for")?;
        let upper = self.eval_int(id, 3, "for")?;
        let body = self.pool.sibling(id, 4);
        for i in lower..upper {
            self.symbols.enter_scope();
            self.symbols.bind(name.clone(), Value::Int(i));
            let result = match body {
                Some(first) => self.eval_sequence(first),
                None => Ok(()),
            };
            self.symbols.exit_scope();
            result?;
        }
        Ok(None)
    }

    fn eval_arith(&mut self, id: ListId, op: ArithOp) -> Result<Option<Value<'src>>, EvalError> {
        let lhs = self.eval_value(id, 1, op.name())?;
        let rhs = self.eval_value(id, 2, op.name())?;
        match (lhs, rhs) {
            (Value::Int(a), Value::Int(b)) => Ok(Some(Value::Int(op.int(a, b)))),
            (Value::Float(a), Value::Float(b)) => Ok(Some(Value::Float(op.float(a, b)))),
            (lhs, rhs) => Err(EvalError::UnsupportedOperands {
                form: op.name(),
                lhs: lhs.type_name(),
                rhs: rhs.type_name(),
            }),
        }
    }

    /// `(format <fmt> args...)`: `%i`/`%f`/`%s` conversions; arguments are
    /// evaluated lazily left to right, one per conversion, so a failing
    /// argument past the last conversion is never reached.
    fn eval_format(&mut self, id: ListId) -> Result<Option<Value<'src>>, EvalError> {
        let fmt = self.eval_sym(id, 1, "format")?;
        let mut arg = self.pool.sibling(id, 2);
        let mut out = String::new();
        let bytes = fmt.as_bytes();
        let mut i = 0usize;
        while i < bytes.len() {
            if bytes[i] != b'%' {
                out.push(char::from(bytes[i]));
                i += 1;
                continue;
            }
            let Some(&conv) = bytes.get(i + 1) else {
                return Err(EvalError::FormatTrailingPercent);
            };
            let arg_id = arg.ok_or(EvalError::FormatMissingArguments)?;
            let value = self
                .eval(arg_id)?
                .ok_or(EvalError::NoValue { form: "format", index: 0 })?;
            match (conv, value) {
                (b'i', Value::Int(v)) => {
                    let _ = write!(out, "{v}");
                }
                (b'f', Value::Float(v)) => {
                    let _ = write!(out, "{v:.6}");
                }
                (b's', Value::Sym(s)) => out.push_str(&s),
                (b'i', other) => {
                    return Err(EvalError::TypeMismatch {
                        form: "format",
                        expected: "int",
                        got: other.type_name(),
                    });
                }
                (b'f', other) => {
                    return Err(EvalError::TypeMismatch {
                        form: "format",
                        expected: "float",
                        got: other.type_name(),
                    });
                }
                (b's', other) => {
                    return Err(EvalError::TypeMismatch {
                        form: "format",
                        expected: "symbol",
                        got: other.type_name(),
                    });
                }
                (unknown, _) => {
                    return Err(EvalError::FormatUnknownConversion(char::from(unknown)));
                }
            }
            arg = self.pool.get(arg_id).and_then(|n| n.next);
            i += 2;
        }
        Ok(Some(Value::Sym(Cow::Owned(out))))
    }

    /// Evaluate a sibling chain for effect, empty leftovers included.
    fn eval_sequence(&mut self, first: ListId) -> Result<(), EvalError> {
        let mut cur = Some(first);
        while let Some(id) = cur {
            self.eval(id)?;
            cur = self.pool.get(id).and_then(|n| n.next);
        }
        Ok(())
    }

    fn arg(&self, list: ListId, index: u32, form: &'static str) -> Result<ListId, EvalError> {
        self.pool
            .sibling(list, index)
            .ok_or(EvalError::MissingArg { form, index })
    }

    fn eval_value(
        &mut self,
        list: ListId,
        index: u32,
        form: &'static str,
    ) -> Result<Value<'src>, EvalError> {
        let arg = self.arg(list, index, form)?;
        self.eval(arg)?.ok_or(EvalError::NoValue { form, index })
    }

    fn eval_int(&mut self, list: ListId, index: u32, form: &'static str) -> Result<i32, EvalError> {
        match self.eval_value(list, index, form)? {
            Value::Int(v) => Ok(v),
            other => Err(EvalError::TypeMismatch {
                form,
                expected: "int",
                got: other.type_name(),
            }),
        }
    }

    fn eval_float(
        &mut self,
        list: ListId,
        index: u32,
        form: &'static str,
    ) -> Result<f32, EvalError> {
        match self.eval_value(list, index, form)? {
            Value::Float(v) => Ok(v),
            other => Err(EvalError::TypeMismatch {
                form,
                expected: "float",
                got: other.type_name(),
            }),
        }
    }

    fn eval_sym(
        &mut self,
        list: ListId,
        index: u32,
        form: &'static str,
    ) -> Result<Cow<'src, str>, EvalError> {
        match self.eval_value(list, index, form)? {
            Value::Sym(s) => Ok(s),
            other => Err(EvalError::TypeMismatch {
                form,
                expected: "symbol",
                got: other.type_name(),
            }),
        }
    }
}
