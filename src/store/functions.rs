//! Shell function store
//!
//! Maps function names to their syntax-tree bodies. Bodies are
//! reference-counted: defining a function shares the body between the tree
//! being executed and the store, and redefinition drops the store's
//! reference so the old body is freed once nothing else holds it.

use std::collections::HashMap;
use std::rc::Rc;

use crate::ast::Node;

#[derive(Default)]
pub struct FunctionStore {
    functions: HashMap<String, Rc<Node>>,
}

impl FunctionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Upsert; the previous body's reference is dropped.
    pub fn define(&mut self, name: impl Into<String>, body: Rc<Node>) {
        self.functions.insert(name.into(), body);
    }

    /// Look up a function body (cheap clone of the shared reference).
    pub fn get(&self, name: &str) -> Option<Rc<Node>> {
        self.functions.get(name).cloned()
    }

    pub fn unset(&mut self, name: &str) {
        self.functions.remove(name);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::CommandNode;

    fn body(name: &str) -> Rc<Node> {
        Rc::new(Node::Command(CommandNode {
            name: name.to_string(),
            args: vec![],
        }))
    }

    #[test]
    fn test_define_and_get() {
        let mut store = FunctionStore::new();
        store.define("f", body("echo"));
        assert!(store.get("f").is_some());
        assert!(store.get("g").is_none());
    }

    #[test]
    fn test_redefinition_replaces_body() {
        let mut store = FunctionStore::new();
        store.define("f", body("true"));
        store.define("f", body("false"));
        match store.get("f").as_deref() {
            Some(Node::Command(cmd)) => assert_eq!(cmd.name, "false"),
            other => panic!("unexpected body: {other:?}"),
        }
    }

    #[test]
    fn test_body_survives_tree_drop() {
        let mut store = FunctionStore::new();
        let shared = body("echo");
        store.define("f", Rc::clone(&shared));
        drop(shared);
        assert!(store.get("f").is_some());
    }

    #[test]
    fn test_unset() {
        let mut store = FunctionStore::new();
        store.define("f", body("true"));
        store.unset("f");
        assert!(store.get("f").is_none());
    }
}
