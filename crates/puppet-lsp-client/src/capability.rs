//! Snapshot of the capabilities the editor client declared at start-up.

use serde_json::Value;

use crate::tree;

/// Read-only view over the client's `initialize` capabilities.
///
/// The whole tree is replaced when a session initialises; lookups never
/// mutate it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ClientCapabilityStore {
    tree: Value,
}

impl ClientCapabilityStore {
    /// Builds a store over the supplied capabilities tree.
    #[must_use]
    pub const fn new(tree: Value) -> Self {
        Self { tree }
    }

    /// Replaces the stored capabilities wholesale.
    pub fn replace(&mut self, tree: Value) {
        self.tree = tree;
    }

    /// Returns the value at `path`, or `None` as soon as a key is missing.
    #[must_use]
    pub fn capability(&self, path: &[&str]) -> Option<&Value> {
        tree::lookup(&self.tree, path)
    }

    /// Whether the value at `path` is literally `true`.
    #[must_use]
    pub fn is_enabled(&self, path: &[&str]) -> bool {
        tree::lookup_bool(&self.tree, path) == Some(true)
    }

    /// Whether the client can (un)register `method` at runtime.
    ///
    /// `textDocument/onTypeFormatting` maps to
    /// `textDocument.onTypeFormatting.dynamicRegistration`.
    #[must_use]
    pub fn supports_dynamic_registration(&self, method: &str) -> bool {
        let mut path: Vec<&str> = method.split('/').collect();
        path.push("dynamicRegistration");
        self.is_enabled(&path)
    }
}
