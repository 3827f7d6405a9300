//! # Document Model
//!
//! A document is a rooted, ordered tree of named nodes stored as a flat map.
//! Order lives only in each node's `children_ids`; the map itself is keyed by
//! id so serialized output is deterministic.
//!
//! ## Invariants
//!
//! After every committed mutation:
//! - the root exists and has no parent
//! - every listed child exists, is not its owner, and is listed once
//! - parent links and child lists agree in both directions
//! - the parent relation is acyclic
//! - every non-root node has a non-empty name
//!
//! Documents are edited copy-on-write: callers clone, mutate the clone, and
//! keep the original as a history snapshot.

use crate::ids::{generate_node_id, IdGenerator, NodeId};
use serde::Serialize;
use std::collections::BTreeMap;

/// Name given to the root of a fresh document.
pub const DEFAULT_ROOT_NAME: &str = "main";

/// One branch entry in the tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Node {
    pub id: NodeId,
    pub name: String,
    pub comment: String,
    pub parent_id: Option<NodeId>,
    pub children_ids: Vec<NodeId>,
}

impl Node {
    /// A detached node with the given name and no comment.
    pub fn new(id: NodeId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            comment: String::new(),
            parent_id: None,
            children_ids: Vec::new(),
        }
    }

    /// A detached node with an empty name, as created by insert operations.
    pub fn empty(id: NodeId) -> Self {
        Self::new(id, "")
    }

    pub fn is_root(&self) -> bool {
        self.parent_id.is_none()
    }
}

/// The whole tree.
///
/// Serializes to the persisted shape:
/// `{"rootId": ..., "nodes": {"<id>": {"id", "name", "comment", "parentId", "childrenIds"}}}`.
/// There is no `Deserialize` impl; restored values go through
/// [`normalize_document`](crate::normalize_document).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    pub root_id: NodeId,
    pub nodes: BTreeMap<NodeId, Node>,
}

impl Document {
    /// A document holding only a root named `main`.
    pub fn with_root_id(root_id: NodeId) -> Self {
        let root = Node::new(root_id.clone(), DEFAULT_ROOT_NAME);
        let mut nodes = BTreeMap::new();
        nodes.insert(root_id.clone(), root);
        Self { root_id, nodes }
    }

    /// A fresh document whose root id comes from `ids`.
    pub fn initial(ids: &mut dyn IdGenerator) -> Self {
        Self::with_root_id(ids.next_id())
    }

    pub fn node(&self, id: &str) -> Option<&Node> {
        self.nodes.get(id)
    }

    pub fn node_mut(&mut self, id: &str) -> Option<&mut Node> {
        self.nodes.get_mut(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.nodes.contains_key(id)
    }

    pub fn root(&self) -> Option<&Node> {
        self.nodes.get(&self.root_id)
    }

    pub fn is_root(&self, id: &str) -> bool {
        self.root_id.as_str() == id
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Parent id of `id` and the position of `id` among the parent's children.
    pub fn position_in_parent(&self, id: &str) -> Option<(NodeId, usize)> {
        let parent_id = self.node(id)?.parent_id.clone()?;
        let parent = self.node(parent_id.as_str())?;
        let index = parent.children_ids.iter().position(|child| child.as_str() == id)?;
        Some((parent_id, index))
    }

    /// Remove a non-root node and splice its children into its parent at the
    /// vacated position, keeping their order.
    ///
    /// Returns the suggested cursor: the first promoted child, else the node
    /// now at the vacated index, else the previous sibling, else the parent.
    /// Returns `None` and leaves the document untouched when the node is the
    /// root, is missing, or is not listed by its parent.
    pub fn remove_and_promote(&mut self, id: &str) -> Option<NodeId> {
        let (parent_id, index) = self.position_in_parent(id)?;

        let removed = self.nodes.remove(id)?;
        let promoted: Vec<NodeId> = removed
            .children_ids
            .into_iter()
            .filter(|child| self.nodes.contains_key(child) && *child != parent_id)
            .collect();

        for child in &promoted {
            if let Some(node) = self.nodes.get_mut(child) {
                node.parent_id = Some(parent_id.clone());
            }
        }

        let parent = self.nodes.get_mut(&parent_id)?;
        parent
            .children_ids
            .splice(index..=index, promoted.iter().cloned());

        let cursor = if let Some(first) = promoted.first() {
            first.clone()
        } else if let Some(next) = parent.children_ids.get(index) {
            next.clone()
        } else if index > 0 {
            parent
                .children_ids
                .get(index - 1)
                .cloned()
                .unwrap_or_else(|| parent_id.clone())
        } else {
            parent_id.clone()
        };

        Some(cursor)
    }

    /// Serialize to the persisted JSON shape.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

/// A fresh document with a randomly identified `main` root.
pub fn create_initial_document() -> Document {
    Document::with_root_id(generate_node_id())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc_with_children(children: &[(&str, &str)], parent: &str) -> Document {
        let mut doc = Document::with_root_id(NodeId::new("root"));
        for (id, name) in children {
            let mut node = Node::new(NodeId::new(*id), *name);
            node.parent_id = Some(NodeId::new(parent));
            doc.nodes.insert(node.id.clone(), node);
            doc.node_mut(parent).unwrap().children_ids.push(NodeId::new(*id));
        }
        doc
    }

    #[test]
    fn test_initial_document_has_main_root() {
        let doc = create_initial_document();
        let root = doc.root().expect("root exists");

        assert_eq!(doc.len(), 1);
        assert_eq!(root.name, "main");
        assert_eq!(root.comment, "");
        assert!(root.parent_id.is_none());
        assert!(root.children_ids.is_empty());
    }

    #[test]
    fn test_clone_shares_no_state() {
        let original = doc_with_children(&[("a", "develop")], "root");
        let mut copy = original.clone();

        copy.node_mut("a").unwrap().name = "changed".to_string();
        copy.node_mut("root").unwrap().children_ids.clear();

        assert_eq!(original.node("a").unwrap().name, "develop");
        assert_eq!(original.node("root").unwrap().children_ids.len(), 1);
    }

    #[test]
    fn test_remove_and_promote_splices_children_in_place() {
        let mut doc = doc_with_children(&[("x", "x"), ("d", "d"), ("y", "y")], "root");
        for child in ["c1", "c2"] {
            let mut node = Node::new(NodeId::new(child), child);
            node.parent_id = Some(NodeId::new("d"));
            doc.nodes.insert(node.id.clone(), node);
            doc.node_mut("d").unwrap().children_ids.push(NodeId::new(child));
        }

        let cursor = doc.remove_and_promote("d");

        assert_eq!(cursor, Some(NodeId::new("c1")));
        let order: Vec<&str> = doc.root().unwrap().children_ids.iter().map(NodeId::as_str).collect();
        assert_eq!(order, vec!["x", "c1", "c2", "y"]);
        assert_eq!(doc.node("c1").unwrap().parent_id, Some(NodeId::new("root")));
        assert_eq!(doc.node("c2").unwrap().parent_id, Some(NodeId::new("root")));
        assert!(!doc.contains("d"));
    }

    #[test]
    fn test_remove_and_promote_cursor_fallbacks() {
        let mut doc = doc_with_children(&[("a", "a"), ("b", "b")], "root");
        assert_eq!(doc.remove_and_promote("a"), Some(NodeId::new("b")));
        assert_eq!(doc.remove_and_promote("b"), Some(NodeId::new("root")));

        let mut doc = doc_with_children(&[("a", "a"), ("b", "b")], "root");
        assert_eq!(doc.remove_and_promote("b"), Some(NodeId::new("a")));
    }

    #[test]
    fn test_position_in_parent() {
        let doc = doc_with_children(&[("a", "a"), ("b", "b")], "root");
        assert_eq!(doc.position_in_parent("b"), Some((NodeId::new("root"), 1)));
        assert_eq!(doc.position_in_parent("root"), None);
        assert_eq!(doc.position_in_parent("missing"), None);
    }

    #[test]
    fn test_remove_and_promote_refuses_root() {
        let mut doc = create_initial_document();
        let root_id = doc.root_id.clone();
        assert_eq!(doc.remove_and_promote(root_id.as_str()), None);
        assert_eq!(doc.len(), 1);
    }

    #[test]
    fn test_serialized_shape_matches_storage_format() {
        let doc = doc_with_children(&[("a", "develop")], "root");
        let value: serde_json::Value = serde_json::from_str(&doc.to_json().unwrap()).unwrap();

        assert_eq!(value["rootId"], "root");
        assert_eq!(value["nodes"]["a"]["parentId"], "root");
        assert_eq!(value["nodes"]["root"]["parentId"], serde_json::Value::Null);
        assert_eq!(value["nodes"]["root"]["childrenIds"][0], "a");
        assert_eq!(value["nodes"]["a"]["comment"], "");
    }
}
