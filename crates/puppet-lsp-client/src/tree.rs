//! Path lookups over loosely structured JSON trees.
//!
//! Client capabilities and pushed settings arrive as arbitrary JSON; lookups
//! walk the tree by key and stop at the first gap.

use serde_json::Value;

/// Follows `path` through nested objects.
///
/// Returns `None` when the path is empty, when any key along the way is
/// missing, when an intermediate node is not an object, or when the value
/// found is JSON `null`.
#[must_use]
pub fn lookup<'a>(tree: &'a Value, path: &[&str]) -> Option<&'a Value> {
    if path.is_empty() {
        return None;
    }
    path.iter().try_fold(tree, |node, key| match node.get(*key) {
        None | Some(Value::Null) => None,
        Some(child) => Some(child),
    })
}

/// Follows `path` and returns the boolean found there, if any.
#[must_use]
pub fn lookup_bool(tree: &Value, path: &[&str]) -> Option<bool> {
    lookup(tree, path).and_then(Value::as_bool)
}
