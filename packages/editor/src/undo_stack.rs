//! # Undo/Redo Stack
//!
//! Bounded snapshot history of documents.
//!
//! ## Design
//!
//! - Every committed edit records the document as it was before the edit
//! - Undo swaps the current document with the most recent past snapshot
//! - Redo swaps it back with the most recent future snapshot
//! - A new edit clears the redo stack
//! - Both stacks keep at most `max_levels` snapshots, dropping the oldest
//!
//! ## Example
//!
//! ```rust
//! use branchtree_editor::UndoStack;
//! use branchtree_tree::{Document, NodeId};
//!
//! let mut stack = UndoStack::new();
//! let before = Document::with_root_id(NodeId::new("r"));
//! let mut after = before.clone();
//! after.node_mut("r").unwrap().comment = "trunk".to_string();
//!
//! stack.record(before.clone());
//! let restored = stack.undo(after.clone()).unwrap();
//! assert_eq!(restored, before);
//! assert_eq!(stack.redo(restored), Some(after));
//! ```

use branchtree_tree::Document;
use std::collections::VecDeque;

/// Default number of undo levels.
pub const DEFAULT_HISTORY_LIMIT: usize = 100;

/// Undo/redo stack of document snapshots
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UndoStack {
    /// Snapshots before each edit (most recent last)
    past: VecDeque<Document>,

    /// Snapshots undone (most recent first)
    future: VecDeque<Document>,

    /// Maximum number of levels kept on each side (0 = unlimited)
    max_levels: usize,
}

impl UndoStack {
    /// Create a new undo stack with default max levels (100)
    pub fn new() -> Self {
        Self::with_max_levels(DEFAULT_HISTORY_LIMIT)
    }

    /// Create an undo stack with custom max levels
    pub fn with_max_levels(max_levels: usize) -> Self {
        Self {
            past: VecDeque::new(),
            future: VecDeque::new(),
            max_levels,
        }
    }

    /// Record the document as it was before an edit.
    pub fn record(&mut self, previous: Document) {
        self.past.push_back(previous);
        self.trim_past();

        // New action invalidates future
        self.future.clear();
    }

    /// Step back: `current` moves to the redo side and the most recent past
    /// snapshot is returned. `None` (and no change) when there is nothing to
    /// undo.
    pub fn undo(&mut self, current: Document) -> Option<Document> {
        let previous = self.past.pop_back()?;

        self.future.push_front(current);
        if self.max_levels > 0 {
            self.future.truncate(self.max_levels);
        }

        Some(previous)
    }

    /// Step forward: `current` moves to the undo side and the most recent
    /// future snapshot is returned.
    pub fn redo(&mut self, current: Document) -> Option<Document> {
        let next = self.future.pop_front()?;

        self.past.push_back(current);
        self.trim_past();

        Some(next)
    }

    fn trim_past(&mut self) {
        while self.max_levels > 0 && self.past.len() > self.max_levels {
            self.past.pop_front();
        }
    }

    /// Check if undo is available
    pub fn can_undo(&self) -> bool {
        !self.past.is_empty()
    }

    /// Check if redo is available
    pub fn can_redo(&self) -> bool {
        !self.future.is_empty()
    }

    /// Get the number of undo levels available
    pub fn undo_levels(&self) -> usize {
        self.past.len()
    }

    /// Get the number of redo levels available
    pub fn redo_levels(&self) -> usize {
        self.future.len()
    }

    pub fn max_levels(&self) -> usize {
        self.max_levels
    }

    /// Clear all undo/redo history
    pub fn clear(&mut self) {
        self.past.clear();
        self.future.clear();
    }
}

impl Default for UndoStack {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use branchtree_tree::NodeId;

    fn doc_with_comment(comment: &str) -> Document {
        let mut doc = Document::with_root_id(NodeId::new("r"));
        doc.node_mut("r").unwrap().comment = comment.to_string();
        doc
    }

    #[test]
    fn test_undo_stack_creation() {
        let stack = UndoStack::new();
        assert_eq!(stack.undo_levels(), 0);
        assert_eq!(stack.redo_levels(), 0);
        assert_eq!(stack.max_levels(), 100);
        assert!(!stack.can_undo());
        assert!(!stack.can_redo());
    }

    #[test]
    fn test_undo_redo_walk() {
        let mut stack = UndoStack::new();
        stack.record(doc_with_comment("0"));
        stack.record(doc_with_comment("1"));

        let current = doc_with_comment("2");
        let current = stack.undo(current).unwrap();
        assert_eq!(current, doc_with_comment("1"));
        let current = stack.undo(current).unwrap();
        assert_eq!(current, doc_with_comment("0"));
        assert!(!stack.can_undo());
        assert_eq!(stack.redo_levels(), 2);

        let current = stack.redo(current).unwrap();
        assert_eq!(current, doc_with_comment("1"));
        let current = stack.redo(current).unwrap();
        assert_eq!(current, doc_with_comment("2"));
        assert!(stack.redo(current).is_none());
    }

    #[test]
    fn test_undo_on_empty_stack() {
        let mut stack = UndoStack::new();
        assert!(stack.undo(doc_with_comment("x")).is_none());
        assert!(!stack.can_redo());
    }

    #[test]
    fn test_new_record_clears_redo() {
        let mut stack = UndoStack::new();
        stack.record(doc_with_comment("0"));
        stack.undo(doc_with_comment("1")).unwrap();
        assert!(stack.can_redo());

        stack.record(doc_with_comment("0"));
        assert!(!stack.can_redo());
    }

    #[test]
    fn test_max_levels_drops_oldest() {
        let mut stack = UndoStack::with_max_levels(3);
        for i in 0..5 {
            stack.record(doc_with_comment(&i.to_string()));
        }
        assert_eq!(stack.undo_levels(), 3);

        let mut current = doc_with_comment("5");
        let mut seen = Vec::new();
        while let Some(previous) = stack.undo(current.clone()) {
            seen.push(previous.root().unwrap().comment.clone());
            current = previous;
        }
        assert_eq!(seen, ["4", "3", "2"]);
        assert_eq!(stack.redo_levels(), 3);
    }

    #[test]
    fn test_clear() {
        let mut stack = UndoStack::new();
        stack.record(doc_with_comment("0"));
        stack.clear();
        assert!(!stack.can_undo());
    }
}
