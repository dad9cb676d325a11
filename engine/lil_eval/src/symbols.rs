//! Scope-stacked symbol table.

use crate::Value;
use std::borrow::Cow;

/// Bindings as a flat stack of `(name, value)` pairs with saved scope
/// marks, matching the engine's pool discipline: entering a scope saves the
/// cursor, exiting truncates back to it.
///
/// Lookup scans newest to oldest, so an inner binding shadows an outer one
/// of the same name.
#[derive(Default)]
pub struct SymbolTable<'src> {
    entries: Vec<(Cow<'src, str>, Value<'src>)>,
    scopes: Vec<usize>,
}

impl<'src> SymbolTable<'src> {
    pub fn new() -> Self {
        SymbolTable::default()
    }

    /// Bind `name` in the current scope.
    pub fn bind(&mut self, name: Cow<'src, str>, value: Value<'src>) {
        self.entries.push((name, value));
    }

    /// Newest binding of `name`, if any.
    pub fn lookup(&self, name: &str) -> Option<&Value<'src>> {
        self.entries
            .iter()
            .rev()
            .find(|(bound, _)| bound == name)
            .map(|(_, value)| value)
    }

    /// Open a binding scope.
    pub fn enter_scope(&mut self) {
        self.scopes.push(self.entries.len());
    }

    /// Drop every binding made since the matching `enter_scope`.
    ///
    /// # Panics
    /// Panics if no scope is open (caller bug, not recoverable input).
    pub fn exit_scope(&mut self) {
        match self.scopes.pop() {
            Some(saved) => self.entries.truncate(saved),
            None => panic!("SymbolTable::exit_scope without matching enter_scope"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn inner_binding_shadows_outer() {
        let mut table = SymbolTable::new();
        table.enter_scope();
        table.bind(Cow::Borrowed("a"), Value::Int(1));
        table.enter_scope();
        table.bind(Cow::Borrowed("a"), Value::Int(2));
        assert_eq!(table.lookup("a"), Some(&Value::Int(2)));
        table.exit_scope();
        assert_eq!(table.lookup("a"), Some(&Value::Int(1)));
        table.exit_scope();
        assert_eq!(table.lookup("a"), None);
    }

    #[test]
    fn scope_exit_drops_bindings() {
        let mut table = SymbolTable::new();
        table.enter_scope();
        table.bind(Cow::Borrowed("x"), Value::Int(7));
        table.exit_scope();
        assert_eq!(table.lookup("x"), None);
    }

    #[test]
    #[should_panic(expected = "without matching enter_scope")]
    fn exit_without_enter_panics() {
        let mut table = SymbolTable::new();
        table.exit_scope();
    }
}
