//! Preorder traversal helpers.
//!
//! Every walk keeps a visited set so corrupted input with shared or cyclic
//! child lists still terminates and yields each node once. Walks use an
//! explicit stack rather than recursion so deep trees cannot overflow.

use crate::document::Document;
use crate::ids::NodeId;
use std::collections::HashSet;

/// How a row attaches to its parent in a drawn tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Connector {
    /// The root row has no connector.
    None,
    /// A child with later siblings.
    Mid,
    /// The last child of its parent.
    Last,
}

impl Connector {
    pub fn glyph(self) -> &'static str {
        match self {
            Connector::None => "",
            Connector::Mid => "├──",
            Connector::Last => "└──",
        }
    }
}

/// One row of the drawn tree, in preorder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VisibleRow {
    pub id: NodeId,
    pub depth: usize,
    pub is_root: bool,
    /// One entry per ancestor level: whether that ancestor still had
    /// siblings after it, so a continuation bar is drawn in that column.
    pub prefix_guides: Vec<bool>,
    pub connector: Connector,
}

/// Preorder list of all nodes reachable from the root.
pub fn visible_list(doc: &Document) -> Vec<NodeId> {
    if !doc.contains(doc.root_id.as_str()) {
        return Vec::new();
    }
    subtree_ids(doc, doc.root_id.as_str())
}

/// Preorder list of `id` and all of its descendants.
pub fn subtree_ids(doc: &Document, id: &str) -> Vec<NodeId> {
    let mut result = Vec::new();
    let mut visited: HashSet<&str> = HashSet::new();
    let mut stack: Vec<&NodeId> = Vec::new();

    let Some(start) = doc.node(id) else {
        return result;
    };
    stack.push(&start.id);

    while let Some(current) = stack.pop() {
        if !visited.insert(current.as_str()) {
            continue;
        }
        let Some(node) = doc.node(current.as_str()) else {
            continue;
        };

        result.push(current.clone());
        stack.extend(node.children_ids.iter().rev());
    }

    result
}

/// Number of parent hops from `id` to the root. Unknown ids and the root are 0.
pub fn depth(doc: &Document, id: &str) -> usize {
    let mut depth = 0;
    let mut visited: HashSet<&str> = HashSet::new();
    let mut current = match doc.node(id) {
        Some(node) => node,
        None => return 0,
    };

    while let Some(parent_id) = &current.parent_id {
        if !visited.insert(current.id.as_str()) {
            break;
        }
        depth += 1;
        match doc.node(parent_id.as_str()) {
            Some(parent) => current = parent,
            None => break,
        }
    }

    depth
}

/// Whether `id` is `ancestor_id` or lies beneath it.
pub fn is_descendant(doc: &Document, id: &str, ancestor_id: &str) -> bool {
    let mut visited: HashSet<&str> = HashSet::new();
    let mut current = Some(id);

    while let Some(current_id) = current {
        if current_id == ancestor_id {
            return true;
        }
        if !visited.insert(current_id) {
            return false;
        }
        current = doc
            .node(current_id)
            .and_then(|node| node.parent_id.as_ref())
            .map(NodeId::as_str);
    }

    false
}

/// Preorder rows with depth, guide bits and connector for drawing the tree.
pub fn visible_rows(doc: &Document) -> Vec<VisibleRow> {
    let mut rows = Vec::new();
    if !doc.contains(doc.root_id.as_str()) {
        return rows;
    }

    struct Frame<'a> {
        id: &'a NodeId,
        guides: Vec<bool>,
        is_root: bool,
        is_last: bool,
    }

    let mut visited: HashSet<&str> = HashSet::new();
    let mut stack = vec![Frame {
        id: &doc.root_id,
        guides: Vec::new(),
        is_root: true,
        is_last: true,
    }];

    while let Some(frame) = stack.pop() {
        if !visited.insert(frame.id.as_str()) {
            continue;
        }
        let Some(node) = doc.node(frame.id.as_str()) else {
            continue;
        };

        let connector = if frame.is_root {
            Connector::None
        } else if frame.is_last {
            Connector::Last
        } else {
            Connector::Mid
        };

        let children: Vec<&NodeId> = node
            .children_ids
            .iter()
            .filter(|child| doc.contains(child.as_str()))
            .collect();

        let mut child_guides = frame.guides.clone();
        child_guides.push(!frame.is_last);

        let count = children.len();
        for (index, child) in children.into_iter().enumerate().rev() {
            stack.push(Frame {
                id: child,
                guides: child_guides.clone(),
                is_root: false,
                is_last: index + 1 == count,
            });
        }

        rows.push(VisibleRow {
            id: frame.id.clone(),
            depth: frame.guides.len(),
            is_root: frame.is_root,
            prefix_guides: frame.guides,
            connector,
        });
    }

    rows
}
