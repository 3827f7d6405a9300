//! Error types for the tree model

use crate::NodeId;
use thiserror::Error;

/// A restored value does not have the shape of a document.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MalformedDocument {
    #[error("Document must be an object")]
    NotAnObject,

    #[error("Document rootId must be a string")]
    RootIdNotString,

    #[error("Document nodes must be an object")]
    NodesNotObject,

    #[error("rootId node is missing: {root_id}")]
    RootMissing { root_id: String },
}

/// Failure to turn stored text into a document.
#[derive(Error, Debug)]
pub enum DocumentError {
    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Malformed document: {0}")]
    Malformed(#[from] MalformedDocument),
}

/// A structural invariant that does not hold for a document.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InvariantViolation {
    #[error("Root node {0} is missing")]
    RootMissing(NodeId),

    #[error("Root node {0} has a parent")]
    RootHasParent(NodeId),

    #[error("Node {owner} lists missing child {child}")]
    DanglingChild { owner: NodeId, child: NodeId },

    #[error("Node {0} lists itself as a child")]
    SelfChild(NodeId),

    #[error("Node {owner} lists child {child} more than once")]
    DuplicateChild { owner: NodeId, child: NodeId },

    #[error("Node {child} is listed by {owner} but its parent is {actual:?}")]
    ParentMismatch {
        owner: NodeId,
        child: NodeId,
        actual: Option<NodeId>,
    },

    #[error("Node {child} points at parent {parent} which does not list it")]
    NotListedByParent { child: NodeId, parent: NodeId },

    #[error("Node {0} has no parent but is not the root")]
    Orphan(NodeId),

    #[error("Node {0} is its own ancestor")]
    Cycle(NodeId),

    #[error("Node {0} has an empty name")]
    EmptyName(NodeId),
}
