//! Editing modes and their text buffers.

use branchtree_tree::Document;
use std::fmt;

/// What the editor is doing with the cursor row.
///
/// `original` is the value the buffer was seeded with, kept so a confirm can
/// tell whether anything changed.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum EditMode {
    #[default]
    Focus,
    Name { buffer: String, original: String },
    Comment { buffer: String, original: String },
}

/// Mode discriminant, for display and matching without the buffers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModeKind {
    Focus,
    Name,
    Comment,
}

impl EditMode {
    /// Name mode seeded from the node's current (sanitized) name.
    pub fn name_from_doc(doc: &Document, node_id: &str) -> Self {
        let name = doc
            .node(node_id)
            .map(|node| sanitize_name(&node.name))
            .unwrap_or_default();
        EditMode::Name {
            buffer: name.clone(),
            original: name,
        }
    }

    /// Comment mode seeded from the node's current comment.
    pub fn comment_from_doc(doc: &Document, node_id: &str) -> Self {
        let comment = doc
            .node(node_id)
            .map(|node| node.comment.clone())
            .unwrap_or_default();
        EditMode::Comment {
            buffer: comment.clone(),
            original: comment,
        }
    }

    /// Name mode for a freshly inserted node.
    pub fn blank_name() -> Self {
        EditMode::Name {
            buffer: String::new(),
            original: String::new(),
        }
    }

    pub fn kind(&self) -> ModeKind {
        match self {
            EditMode::Focus => ModeKind::Focus,
            EditMode::Name { .. } => ModeKind::Name,
            EditMode::Comment { .. } => ModeKind::Comment,
        }
    }

    /// The active buffer, if any.
    pub fn buffer(&self) -> Option<&str> {
        match self {
            EditMode::Focus => None,
            EditMode::Name { buffer, .. } | EditMode::Comment { buffer, .. } => Some(buffer),
        }
    }

    pub fn is_focus(&self) -> bool {
        matches!(self, EditMode::Focus)
    }

    /// Re-seed the same kind of mode for `node_id`; focus stays focus.
    pub fn reseed(&self, doc: &Document, node_id: &str) -> Self {
        match self {
            EditMode::Focus => EditMode::Focus,
            EditMode::Name { .. } => Self::name_from_doc(doc, node_id),
            EditMode::Comment { .. } => Self::comment_from_doc(doc, node_id),
        }
    }
}

impl fmt::Display for ModeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ModeKind::Focus => "focus",
            ModeKind::Name => "name",
            ModeKind::Comment => "comment",
        };
        f.write_str(label)
    }
}

/// Branch names never contain spaces.
pub fn sanitize_name(raw: &str) -> String {
    raw.chars().filter(|ch| *ch != ' ').collect()
}
