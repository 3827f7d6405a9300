//! # Structural Mutations
//!
//! Tree edits on branch documents.
//!
//! ## Semantics
//!
//! Every mutation works on a clone of the input document and either returns
//! the edited clone with a suggested cursor, or an error and no document. The
//! input is never touched, so a refused edit can never leave a half-applied
//! tree behind.
//!
//! ### Insert
//! - `InsertBelow` places the new node right after the cursor among its
//!   siblings, or as the last child when the cursor is the root
//! - `InsertChildTop` places the new node first among the parent's children
//!
//! ### Indent / Outdent
//! - Indent makes a node the last child of its preceding sibling
//! - Outdent makes a node the next sibling of its parent; children of the
//!   root cannot be outdented
//!
//! ### Remove
//! - Deletes exactly one node; its children are promoted into its slot
//!
//! ### Branch moves
//! - A node moves together with its whole subtree, one visible row at a time
//! - Moves never place a node inside its own subtree

use crate::mode::sanitize_name;
use branchtree_tree::{is_descendant, visible_list, Document, Node, NodeId};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Structural edits on a branch tree
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Mutation {
    /// Insert a fresh node right below the cursor
    InsertBelow { cursor_id: NodeId, new_id: NodeId },

    /// Insert a fresh node as the first child of `parent_id`
    InsertChildTop { parent_id: NodeId, new_id: NodeId },

    /// Make the node the last child of its preceding sibling
    IndentRight { node_id: NodeId },

    /// Make the node the next sibling of its parent
    OutdentLeft { node_id: NodeId },

    /// Remove one node, promoting its children
    RemoveNode { node_id: NodeId },

    /// Rename a node; spaces are stripped from the new name
    Rename { node_id: NodeId, name: String },

    /// Replace a node's comment
    SetComment { node_id: NodeId, comment: String },

    /// Move a node and its subtree one visible row up
    MoveBranchUp { node_id: NodeId },

    /// Move a node and its subtree one visible row down
    MoveBranchDown { node_id: NodeId },
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MutationError {
    #[error("Node not found: {0}")]
    NodeNotFound(NodeId),

    #[error("Parent not found: {0}")]
    ParentNotFound(NodeId),

    #[error("Node already exists: {0}")]
    AlreadyExists(NodeId),

    #[error("Operation not allowed on the root node")]
    IsRoot,

    #[error("Node {0} has no preceding sibling")]
    NoPrecedingSibling(NodeId),

    #[error("Node {0} is already at the top level")]
    TopLevel(NodeId),

    #[error("Node {0} cannot move further")]
    AtBoundary(NodeId),

    #[error("Would create cycle")]
    CycleDetected,

    #[error("Name is empty")]
    EmptyName,

    #[error("Value is unchanged")]
    Unchanged,

    #[error("Invalid structure: {0}")]
    InvalidStructure(String),
}

/// Outcome of a successful mutation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Applied {
    pub doc: Document,
    /// Where the cursor should land after the edit.
    pub cursor_id: NodeId,
}

impl Mutation {
    /// Apply the mutation to a copy of `doc`.
    pub fn apply(&self, doc: &Document) -> Result<Applied, MutationError> {
        let mut next = doc.clone();

        let cursor_id = match self {
            Mutation::InsertBelow { cursor_id, new_id } => {
                Self::apply_insert_below(&mut next, cursor_id, new_id)?
            }

            Mutation::InsertChildTop { parent_id, new_id } => {
                Self::apply_insert_child_top(&mut next, parent_id, new_id)?
            }

            Mutation::IndentRight { node_id } => Self::apply_indent(&mut next, node_id)?,

            Mutation::OutdentLeft { node_id } => Self::apply_outdent(&mut next, node_id)?,

            Mutation::RemoveNode { node_id } => Self::apply_remove(&mut next, node_id)?,

            Mutation::Rename { node_id, name } => Self::apply_rename(&mut next, node_id, name)?,

            Mutation::SetComment { node_id, comment } => {
                Self::apply_set_comment(&mut next, node_id, comment)?
            }

            Mutation::MoveBranchUp { node_id } => Self::apply_branch_up(&mut next, node_id)?,

            Mutation::MoveBranchDown { node_id } => Self::apply_branch_down(&mut next, node_id)?,
        };

        Ok(Applied {
            doc: next,
            cursor_id,
        })
    }

    /// Short operation name, used in logs.
    pub fn name(&self) -> &'static str {
        match self {
            Mutation::InsertBelow { .. } => "insert_below",
            Mutation::InsertChildTop { .. } => "insert_child_top",
            Mutation::IndentRight { .. } => "indent_right",
            Mutation::OutdentLeft { .. } => "outdent_left",
            Mutation::RemoveNode { .. } => "remove_node",
            Mutation::Rename { .. } => "rename",
            Mutation::SetComment { .. } => "set_comment",
            Mutation::MoveBranchUp { .. } => "move_branch_up",
            Mutation::MoveBranchDown { .. } => "move_branch_down",
        }
    }

    fn apply_insert_below(
        doc: &mut Document,
        cursor_id: &NodeId,
        new_id: &NodeId,
    ) -> Result<NodeId, MutationError> {
        if doc.contains(new_id.as_str()) {
            return Err(MutationError::AlreadyExists(new_id.clone()));
        }
        let cursor = doc
            .node(cursor_id.as_str())
            .ok_or_else(|| MutationError::NodeNotFound(cursor_id.clone()))?;

        if doc.is_root(cursor_id.as_str()) {
            attach_child(doc, cursor_id, new_id, None)?;
            return Ok(new_id.clone());
        }

        let parent_id = cursor
            .parent_id
            .clone()
            .ok_or_else(|| MutationError::ParentNotFound(cursor_id.clone()))?;
        let parent = doc
            .node(parent_id.as_str())
            .ok_or_else(|| MutationError::ParentNotFound(parent_id.clone()))?;
        let index = parent
            .children_ids
            .iter()
            .position(|child| child == cursor_id)
            .map(|index| index + 1);

        attach_child(doc, &parent_id, new_id, index)?;
        Ok(new_id.clone())
    }

    fn apply_insert_child_top(
        doc: &mut Document,
        parent_id: &NodeId,
        new_id: &NodeId,
    ) -> Result<NodeId, MutationError> {
        if doc.contains(new_id.as_str()) {
            return Err(MutationError::AlreadyExists(new_id.clone()));
        }
        if !doc.contains(parent_id.as_str()) {
            return Err(MutationError::NodeNotFound(parent_id.clone()));
        }

        attach_child(doc, parent_id, new_id, Some(0))?;
        Ok(new_id.clone())
    }

    fn apply_indent(doc: &mut Document, node_id: &NodeId) -> Result<NodeId, MutationError> {
        let parent_id = parent_of(doc, node_id)?;
        let parent = doc
            .node(parent_id.as_str())
            .ok_or_else(|| MutationError::ParentNotFound(parent_id.clone()))?;

        let index = match parent.children_ids.iter().position(|child| child == node_id) {
            Some(index) if index > 0 => index,
            _ => return Err(MutationError::NoPrecedingSibling(node_id.clone())),
        };
        let new_parent_id = parent.children_ids[index - 1].clone();
        if !doc.contains(new_parent_id.as_str()) {
            return Err(MutationError::ParentNotFound(new_parent_id));
        }

        children_mut(doc, &parent_id)?.remove(index);
        children_mut(doc, &new_parent_id)?.push(node_id.clone());
        set_parent(doc, node_id, &new_parent_id)?;

        Ok(node_id.clone())
    }

    fn apply_outdent(doc: &mut Document, node_id: &NodeId) -> Result<NodeId, MutationError> {
        let parent_id = parent_of(doc, node_id)?;
        if doc.is_root(parent_id.as_str()) {
            return Err(MutationError::TopLevel(node_id.clone()));
        }

        let parent = doc
            .node(parent_id.as_str())
            .ok_or_else(|| MutationError::ParentNotFound(parent_id.clone()))?;
        let index = parent
            .children_ids
            .iter()
            .position(|child| child == node_id)
            .ok_or_else(|| not_listed(node_id, &parent_id))?;
        let grandparent_id = parent
            .parent_id
            .clone()
            .ok_or_else(|| MutationError::ParentNotFound(parent_id.clone()))?;
        let grandparent = doc
            .node(grandparent_id.as_str())
            .ok_or_else(|| MutationError::ParentNotFound(grandparent_id.clone()))?;
        let insert_at = grandparent
            .children_ids
            .iter()
            .position(|child| *child == parent_id)
            .map(|index| index + 1);

        children_mut(doc, &parent_id)?.remove(index);
        insert_child(doc, &grandparent_id, node_id, insert_at)?;
        set_parent(doc, node_id, &grandparent_id)?;

        Ok(node_id.clone())
    }

    fn apply_remove(doc: &mut Document, node_id: &NodeId) -> Result<NodeId, MutationError> {
        if !doc.contains(node_id.as_str()) {
            return Err(MutationError::NodeNotFound(node_id.clone()));
        }
        if doc.is_root(node_id.as_str()) {
            return Err(MutationError::IsRoot);
        }

        doc.remove_and_promote(node_id.as_str())
            .ok_or_else(|| MutationError::InvalidStructure(format!("{node_id} is detached")))
    }

    fn apply_rename(
        doc: &mut Document,
        node_id: &NodeId,
        name: &str,
    ) -> Result<NodeId, MutationError> {
        let name = sanitize_name(name);
        if name.is_empty() {
            return Err(MutationError::EmptyName);
        }

        let node = node_mut(doc, node_id)?;
        if node.name == name {
            return Err(MutationError::Unchanged);
        }
        node.name = name;

        Ok(node_id.clone())
    }

    fn apply_set_comment(
        doc: &mut Document,
        node_id: &NodeId,
        comment: &str,
    ) -> Result<NodeId, MutationError> {
        let node = node_mut(doc, node_id)?;
        if node.comment == comment {
            return Err(MutationError::Unchanged);
        }
        node.comment = comment.to_string();

        Ok(node_id.clone())
    }

    fn apply_branch_up(doc: &mut Document, node_id: &NodeId) -> Result<NodeId, MutationError> {
        if !doc.contains(node_id.as_str()) {
            return Err(MutationError::NodeNotFound(node_id.clone()));
        }
        if doc.is_root(node_id.as_str()) {
            return Err(MutationError::IsRoot);
        }

        let list = visible_list(doc);
        let previous = match list.iter().position(|id| id == node_id) {
            Some(index) if index > 0 => list[index - 1].clone(),
            _ => return Err(MutationError::AtBoundary(node_id.clone())),
        };
        if doc.is_root(previous.as_str()) {
            return Err(MutationError::AtBoundary(node_id.clone()));
        }

        move_node_before(doc, node_id, &previous)?;
        Ok(node_id.clone())
    }

    fn apply_branch_down(doc: &mut Document, node_id: &NodeId) -> Result<NodeId, MutationError> {
        if !doc.contains(node_id.as_str()) {
            return Err(MutationError::NodeNotFound(node_id.clone()));
        }
        if doc.is_root(node_id.as_str()) {
            return Err(MutationError::IsRoot);
        }

        let list = visible_list(doc);
        let next_id = match list.iter().position(|id| id == node_id) {
            Some(index) if index + 1 < list.len() => list[index + 1].clone(),
            _ => return Err(MutationError::AtBoundary(node_id.clone())),
        };
        let next = doc
            .node(next_id.as_str())
            .ok_or_else(|| MutationError::NodeNotFound(next_id.clone()))?;

        // The next row is our own first child: trade places with it.
        if next.parent_id.as_ref() == Some(node_id) {
            swap_with_first_child(doc, node_id, &next_id)?;
            return Ok(node_id.clone());
        }

        // The next row opens a subtree: become its first child.
        if !next.children_ids.is_empty() {
            detach(doc, node_id)?;
            insert_child(doc, &next_id, node_id, Some(0))?;
            set_parent(doc, node_id, &next_id)?;
            return Ok(node_id.clone());
        }

        move_node_after(doc, node_id, &next_id)?;
        Ok(node_id.clone())
    }
}

fn not_listed(node_id: &NodeId, parent_id: &NodeId) -> MutationError {
    MutationError::InvalidStructure(format!("{node_id} is not listed by {parent_id}"))
}

fn node_mut<'a>(doc: &'a mut Document, id: &NodeId) -> Result<&'a mut Node, MutationError> {
    doc.node_mut(id.as_str())
        .ok_or_else(|| MutationError::NodeNotFound(id.clone()))
}

fn children_mut<'a>(
    doc: &'a mut Document,
    id: &NodeId,
) -> Result<&'a mut Vec<NodeId>, MutationError> {
    doc.node_mut(id.as_str())
        .map(|node| &mut node.children_ids)
        .ok_or_else(|| MutationError::ParentNotFound(id.clone()))
}

/// Parent id of a non-root node.
fn parent_of(doc: &Document, node_id: &NodeId) -> Result<NodeId, MutationError> {
    let node = doc
        .node(node_id.as_str())
        .ok_or_else(|| MutationError::NodeNotFound(node_id.clone()))?;
    node.parent_id.clone().ok_or(MutationError::IsRoot)
}

fn set_parent(doc: &mut Document, node_id: &NodeId, parent_id: &NodeId) -> Result<(), MutationError> {
    node_mut(doc, node_id)?.parent_id = Some(parent_id.clone());
    Ok(())
}

/// Insert into `parent_id`'s child list at `index`, appending when `index`
/// is `None`.
fn insert_child(
    doc: &mut Document,
    parent_id: &NodeId,
    child_id: &NodeId,
    index: Option<usize>,
) -> Result<(), MutationError> {
    let children = children_mut(doc, parent_id)?;
    match index {
        Some(index) => children.insert(index.min(children.len()), child_id.clone()),
        None => children.push(child_id.clone()),
    }
    Ok(())
}

/// Create a blank node under `parent_id`.
fn attach_child(
    doc: &mut Document,
    parent_id: &NodeId,
    new_id: &NodeId,
    index: Option<usize>,
) -> Result<(), MutationError> {
    insert_child(doc, parent_id, new_id, index)?;

    let mut node = Node::empty(new_id.clone());
    node.parent_id = Some(parent_id.clone());
    doc.nodes.insert(new_id.clone(), node);
    Ok(())
}

/// Unlink a node from its parent's child list, returning the parent id and
/// the index it occupied.
fn detach(doc: &mut Document, node_id: &NodeId) -> Result<(NodeId, usize), MutationError> {
    let parent_id = parent_of(doc, node_id)?;
    let children = children_mut(doc, &parent_id)?;
    let index = children
        .iter()
        .position(|child| child == node_id)
        .ok_or_else(|| not_listed(node_id, &parent_id))?;
    children.remove(index);
    Ok((parent_id, index))
}

/// Move `node_id` so it sits right before or after `anchor_id`.
fn move_next_to(
    doc: &mut Document,
    node_id: &NodeId,
    anchor_id: &NodeId,
    after: bool,
) -> Result<(), MutationError> {
    if !doc.contains(anchor_id.as_str()) {
        return Err(MutationError::NodeNotFound(anchor_id.clone()));
    }
    let target_parent_id = parent_of(doc, anchor_id)?;
    if !doc.contains(target_parent_id.as_str()) {
        return Err(MutationError::ParentNotFound(target_parent_id));
    }
    if is_descendant(doc, target_parent_id.as_str(), node_id.as_str()) {
        return Err(MutationError::CycleDetected);
    }
    let target_index = doc
        .node(target_parent_id.as_str())
        .and_then(|parent| parent.children_ids.iter().position(|child| child == anchor_id))
        .ok_or_else(|| not_listed(anchor_id, &target_parent_id))?;

    let (source_parent_id, source_index) = detach(doc, node_id)?;

    let mut insert_at = if after { target_index + 1 } else { target_index };
    if source_parent_id == target_parent_id && source_index < insert_at {
        insert_at -= 1;
    }

    insert_child(doc, &target_parent_id, node_id, Some(insert_at))?;
    set_parent(doc, node_id, &target_parent_id)
}

fn move_node_before(
    doc: &mut Document,
    node_id: &NodeId,
    before_id: &NodeId,
) -> Result<(), MutationError> {
    move_next_to(doc, node_id, before_id, false)
}

fn move_node_after(
    doc: &mut Document,
    node_id: &NodeId,
    after_id: &NodeId,
) -> Result<(), MutationError> {
    move_next_to(doc, node_id, after_id, true)
}

/// Put `child_id` in `node_id`'s slot and hang `node_id` under it as its
/// first child. Requires `child_id` to be `node_id`'s first child.
fn swap_with_first_child(
    doc: &mut Document,
    node_id: &NodeId,
    child_id: &NodeId,
) -> Result<(), MutationError> {
    let parent_id = parent_of(doc, node_id)?;

    let own_children = children_mut(doc, node_id)?;
    if own_children.first() != Some(child_id) {
        return Err(MutationError::InvalidStructure(format!(
            "{child_id} is not the first child of {node_id}"
        )));
    }
    own_children.remove(0);

    let siblings = children_mut(doc, &parent_id)?;
    let slot = siblings
        .iter()
        .position(|sibling| sibling == node_id)
        .ok_or_else(|| not_listed(node_id, &parent_id))?;
    siblings[slot] = child_id.clone();

    set_parent(doc, child_id, &parent_id)?;
    insert_child(doc, child_id, node_id, Some(0))?;
    set_parent(doc, node_id, child_id)
}
