//! Dot-path addressable status tree.
//!
//! # Responsibilities
//! - Create interior nodes on demand while walking a path
//! - Refuse to shadow a subtree with a value, or nest under a value
//! - Delete leaves and (on request) whole subtrees
//!
//! # Design Decisions
//! - No locking here; `Registry` owns the tree behind its mutex
//! - Empty interiors are pruned after a delete, so an interior exists
//!   only while some leaf lives below it
//! - BTreeMap keeps the exported key order stable

use std::collections::btree_map::Entry;
use std::collections::BTreeMap;

use serde::Serialize;

use crate::registry::error::StatusError;
use crate::registry::path::StatusPath;
use crate::registry::value::StatusValue;

/// A node of the status tree.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Node {
    /// A leaf holding a concrete value.
    Value(StatusValue),
    /// A node holding only child segments.
    Interior(BTreeMap<String, Node>),
}

/// The root mapping of the status tree.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct PathTree {
    root: BTreeMap<String, Node>,
}

impl PathTree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `value` at `path`, creating interior nodes as needed.
    ///
    /// Fails without modifying the tree when a prefix of `path` is a value
    /// (`NestingConflict`) or `path` itself is an interior (`LeafConflict`).
    pub fn set(&mut self, path: &StatusPath, value: StatusValue) -> Result<(), StatusError> {
        let Some((last, parents)) = path.segments().split_last() else {
            return Err(StatusError::InvalidPath(path.to_string()));
        };

        // Interiors are only created below the last existing node, and a
        // conflict can only come from an existing node, so a failed walk
        // never leaves new interiors behind.
        let mut level = &mut self.root;
        for (depth, segment) in parents.iter().enumerate() {
            let node = level
                .entry(segment.clone())
                .or_insert_with(|| Node::Interior(BTreeMap::new()));
            match node {
                Node::Interior(children) => level = children,
                Node::Value(_) => {
                    return Err(StatusError::NestingConflict {
                        prefix: path.prefix(depth + 1),
                    })
                }
            }
        }

        match level.entry(last.clone()) {
            Entry::Vacant(slot) => {
                slot.insert(Node::Value(value));
                Ok(())
            }
            Entry::Occupied(mut slot) => match slot.get_mut() {
                Node::Value(existing) => {
                    *existing = value;
                    Ok(())
                }
                Node::Interior(_) => Err(StatusError::LeafConflict {
                    path: path.to_string(),
                }),
            },
        }
    }

    /// Find the node at `path`, if any.
    pub fn get(&self, path: &StatusPath) -> Option<&Node> {
        let (last, parents) = path.segments().split_last()?;

        let mut level = &self.root;
        for segment in parents {
            match level.get(segment)? {
                Node::Interior(children) => level = children,
                Node::Value(_) => return None,
            }
        }
        level.get(last)
    }

    /// Delete the node at `path`.
    ///
    /// Returns `Ok(None)` when nothing is stored there, otherwise the paths
    /// of every value leaf that was removed.
    pub fn delete(
        &mut self,
        path: &StatusPath,
        subtree: bool,
    ) -> Result<Option<Vec<StatusPath>>, StatusError> {
        delete_at(&mut self.root, path, 0, subtree)
    }

    /// Paths of every value leaf in the tree.
    pub fn leaf_paths(&self) -> Vec<StatusPath> {
        let mut leaves = Vec::new();
        for (segment, node) in &self.root {
            // Root keys are non-empty segments, so they always parse
            if let Ok(path) = StatusPath::parse(segment) {
                collect_leaves(node, &path, &mut leaves);
            }
        }
        leaves
    }

    pub fn is_empty(&self) -> bool {
        self.root.is_empty()
    }
}

fn delete_at(
    level: &mut BTreeMap<String, Node>,
    path: &StatusPath,
    depth: usize,
    subtree: bool,
) -> Result<Option<Vec<StatusPath>>, StatusError> {
    let segments = path.segments();
    let segment = &segments[depth];

    if depth + 1 < segments.len() {
        let removed = match level.get_mut(segment) {
            Some(Node::Interior(children)) => delete_at(children, path, depth + 1, subtree)?,
            _ => return Ok(None),
        };

        let now_empty = matches!(level.get(segment), Some(Node::Interior(c)) if c.is_empty());
        if now_empty {
            level.remove(segment);
        }
        return Ok(removed);
    }

    let leaves = match level.get(segment) {
        None => return Ok(None),
        Some(Node::Value(_)) => vec![path.clone()],
        Some(Node::Interior(_)) if !subtree => {
            return Err(StatusError::SubtreeConflict {
                path: path.to_string(),
            })
        }
        Some(node) => {
            let mut leaves = Vec::new();
            collect_leaves(node, path, &mut leaves);
            leaves
        }
    };
    level.remove(segment);
    Ok(Some(leaves))
}

fn collect_leaves(node: &Node, path: &StatusPath, out: &mut Vec<StatusPath>) {
    match node {
        Node::Value(_) => out.push(path.clone()),
        Node::Interior(children) => {
            for (segment, child) in children {
                collect_leaves(child, &path.child(segment), out);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn p(name: &str) -> StatusPath {
        StatusPath::parse(name).unwrap()
    }

    fn value_at<'a>(tree: &'a PathTree, name: &str) -> Option<&'a StatusValue> {
        match tree.get(&p(name)) {
            Some(Node::Value(v)) => Some(v),
            _ => None,
        }
    }

    #[test]
    fn test_set_and_get() {
        let mut tree = PathTree::new();
        tree.set(&p("a"), "top".into()).unwrap();
        tree.set(&p("b.c.d"), 4i64.into()).unwrap();

        assert_eq!(value_at(&tree, "a"), Some(&StatusValue::from("top")));
        assert_eq!(value_at(&tree, "b.c.d"), Some(&StatusValue::Int(4)));
        assert!(matches!(tree.get(&p("b.c")), Some(Node::Interior(_))));
        assert!(tree.get(&p("b.x")).is_none());
        // Descending through a value finds nothing
        assert!(tree.get(&p("a.z")).is_none());
    }

    #[test]
    fn test_overwrite_value() {
        let mut tree = PathTree::new();
        tree.set(&p("x.y"), "one".into()).unwrap();
        tree.set(&p("x.y"), "two".into()).unwrap();
        assert_eq!(value_at(&tree, "x.y"), Some(&StatusValue::from("two")));
    }

    #[test]
    fn test_nesting_conflict() {
        let mut tree = PathTree::new();
        tree.set(&p("a"), 1i64.into()).unwrap();

        let err = tree.set(&p("a.b.c"), 2i64.into()).unwrap_err();
        assert_eq!(
            err,
            StatusError::NestingConflict {
                prefix: "a".to_string()
            }
        );
        assert_eq!(value_at(&tree, "a"), Some(&StatusValue::Int(1)));
    }

    #[test]
    fn test_leaf_conflict() {
        let mut tree = PathTree::new();
        tree.set(&p("a.b"), 1i64.into()).unwrap();

        let err = tree.set(&p("a"), 2i64.into()).unwrap_err();
        assert_eq!(
            err,
            StatusError::LeafConflict {
                path: "a".to_string()
            }
        );
    }

    #[test]
    fn test_delete_leaf_prunes_empty_parents() {
        let mut tree = PathTree::new();
        tree.set(&p("deeply.nested.var"), "v".into()).unwrap();

        let removed = tree.delete(&p("deeply.nested.var"), false).unwrap();
        assert_eq!(removed, Some(vec![p("deeply.nested.var")]));
        assert!(tree.get(&p("deeply")).is_none());
        assert!(tree.is_empty());
    }

    #[test]
    fn test_delete_keeps_non_empty_parents() {
        let mut tree = PathTree::new();
        tree.set(&p("n.one"), 1i64.into()).unwrap();
        tree.set(&p("n.two"), 2i64.into()).unwrap();

        tree.delete(&p("n.one"), false).unwrap();
        assert_eq!(value_at(&tree, "n.two"), Some(&StatusValue::Int(2)));
    }

    #[test]
    fn test_delete_missing() {
        let mut tree = PathTree::new();
        tree.set(&p("a"), 1i64.into()).unwrap();

        assert_eq!(tree.delete(&p("b"), false).unwrap(), None);
        assert_eq!(tree.delete(&p("a.b"), true).unwrap(), None);
        assert_eq!(tree.delete(&p("x.y.z"), false).unwrap(), None);
    }

    #[test]
    fn test_delete_subtree() {
        let mut tree = PathTree::new();
        for name in ["nest.l1.v1", "nest.l1.v2", "nest.l1.deeper.v3", "nest.l2.v1"] {
            tree.set(&p(name), name.into()).unwrap();
        }

        let err = tree.delete(&p("nest.l1"), false).unwrap_err();
        assert!(matches!(err, StatusError::SubtreeConflict { .. }));
        assert_eq!(tree.leaf_paths().len(), 4);

        let mut removed = tree.delete(&p("nest.l1"), true).unwrap().unwrap();
        removed.sort_by_key(|path| path.to_string());
        assert_eq!(
            removed,
            vec![p("nest.l1.deeper.v3"), p("nest.l1.v1"), p("nest.l1.v2")]
        );
        assert!(tree.get(&p("nest.l1")).is_none());
        assert_eq!(tree.leaf_paths(), vec![p("nest.l2.v1")]);
    }

    #[test]
    fn test_serialize_shape() {
        let mut tree = PathTree::new();
        tree.set(&p("app.name"), "svc".into()).unwrap();
        tree.set(&p("app.workers"), 4i64.into()).unwrap();
        tree.set(&p("ready"), true.into()).unwrap();

        let exported: serde_json::Value = serde_json::to_value(&tree).unwrap();
        assert_eq!(
            exported,
            json!({"app": {"name": "svc", "workers": 4}, "ready": true})
        );
    }
}
