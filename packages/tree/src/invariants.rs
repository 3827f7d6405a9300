//! Structural invariant checks.

use crate::document::Document;
use crate::error::InvariantViolation;
use std::collections::HashSet;

/// Verify every invariant of `doc`: [`check_structure`], then that no
/// non-root node has an empty name.
pub fn check_invariants(doc: &Document) -> Result<(), InvariantViolation> {
    check_structure(doc)?;

    for node in doc.nodes.values() {
        if node.id != doc.root_id && node.name.is_empty() {
            return Err(InvariantViolation::EmptyName(node.id.clone()));
        }
    }

    Ok(())
}

/// Verify the parent/child structure of `doc`, reporting the first violation.
///
/// Checked, in order: the root exists and has no parent; child lists only
/// name existing, distinct, non-self nodes whose parent is the owner; every
/// parent link is matched by exactly one listing; only the root lacks a
/// parent; no node is its own ancestor.
///
/// A node that is still being named has an empty name, which this allows.
pub fn check_structure(doc: &Document) -> Result<(), InvariantViolation> {
    let root = doc
        .root()
        .ok_or_else(|| InvariantViolation::RootMissing(doc.root_id.clone()))?;
    if root.parent_id.is_some() {
        return Err(InvariantViolation::RootHasParent(root.id.clone()));
    }

    for node in doc.nodes.values() {
        let mut seen = HashSet::new();
        for child_id in &node.children_ids {
            if *child_id == node.id {
                return Err(InvariantViolation::SelfChild(node.id.clone()));
            }
            if !seen.insert(child_id) {
                return Err(InvariantViolation::DuplicateChild {
                    owner: node.id.clone(),
                    child: child_id.clone(),
                });
            }
            let child = doc
                .node(child_id.as_str())
                .ok_or_else(|| InvariantViolation::DanglingChild {
                    owner: node.id.clone(),
                    child: child_id.clone(),
                })?;
            if child.parent_id.as_ref() != Some(&node.id) {
                return Err(InvariantViolation::ParentMismatch {
                    owner: node.id.clone(),
                    child: child_id.clone(),
                    actual: child.parent_id.clone(),
                });
            }
        }
    }

    for node in doc.nodes.values() {
        match &node.parent_id {
            None if node.id != doc.root_id => {
                return Err(InvariantViolation::Orphan(node.id.clone()));
            }
            None => {}
            Some(parent_id) => {
                let listed = doc
                    .node(parent_id.as_str())
                    .map(|parent| parent.children_ids.iter().filter(|id| **id == node.id).count())
                    .unwrap_or(0);
                if listed != 1 {
                    return Err(InvariantViolation::NotListedByParent {
                        child: node.id.clone(),
                        parent: parent_id.clone(),
                    });
                }
            }
        }
    }

    for node in doc.nodes.values() {
        let mut visited = HashSet::new();
        let mut current = node;
        while let Some(parent_id) = &current.parent_id {
            if !visited.insert(current.id.as_str()) || *parent_id == node.id {
                return Err(InvariantViolation::Cycle(node.id.clone()));
            }
            match doc.node(parent_id.as_str()) {
                Some(parent) => current = parent,
                None => break,
            }
        }
    }

    Ok(())
}
