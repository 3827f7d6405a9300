//! # Edit Session
//!
//! The editor state machine: one document, a cursor on one of its rows, the
//! current [`EditMode`] and a bounded undo history.
//!
//! Every document change goes through the same commit path:
//!
//! 1. apply a [`Mutation`] to a copy of the document
//! 2. fall back to the root when the suggested cursor is gone
//! 3. settle the mode and its buffers
//! 4. push the previous document onto the history, clearing redo
//! 5. save to the attached store, if any
//!
//! Refused edits leave the session exactly as it was. Commands never fail;
//! a command that does not apply is a no-op.

use crate::command::Command;
use crate::config::EditorConfig;
use crate::errors::EditorError;
use crate::mode::{sanitize_name, EditMode};
use crate::mutations::{Applied, Mutation, MutationError};
use crate::storage::DocumentStore;
use crate::undo_stack::UndoStack;
use branchtree_export::{
    build_export_text, serialize_ascii_tree, serialize_mermaid_git_graph, ExportFormat,
};
use branchtree_tree::{
    create_initial_document, load_document, migrate_legacy_empty_nodes, visible_list, Document,
    IdGenerator, Node, NodeId, RandomIds,
};
use std::fmt;
use tracing::{debug, error, warn};

/// Where the cursor and mode land after a committed edit.
enum After {
    /// Focus at the mutation's cursor
    Focus,
    /// Name mode with empty buffers at the mutation's cursor
    BlankName,
    /// Keep the current mode and buffers
    Preserve,
    /// Focus at the target, if it survived the edit
    FocusAt(NodeId),
    /// Comment mode at the target, seeded from the edited document
    CommentAt(NodeId),
}

impl After {
    fn for_mutation(mutation: &Mutation) -> Self {
        match mutation {
            Mutation::InsertBelow { .. } | Mutation::InsertChildTop { .. } => After::BlankName,
            Mutation::RemoveNode { .. } | Mutation::Rename { .. } | Mutation::SetComment { .. } => {
                After::Focus
            }
            Mutation::IndentRight { .. }
            | Mutation::OutdentLeft { .. }
            | Mutation::MoveBranchUp { .. }
            | Mutation::MoveBranchDown { .. } => After::Preserve,
        }
    }
}

/// Single-user editing session over one branch tree.
pub struct EditSession {
    doc: Document,
    cursor_id: NodeId,
    mode: EditMode,
    history: UndoStack,

    /// Bumped on every document change (edits, undo, redo, reload)
    revision: u64,

    ids: Box<dyn IdGenerator>,
    store: Option<Box<dyn DocumentStore>>,
}

impl EditSession {
    /// Session over a fresh `main`-only document, not backed by a store.
    pub fn new(config: &EditorConfig) -> Self {
        Self::from_document(create_initial_document(), config)
    }

    /// Session over `doc`, after migrating legacy empty nodes out of it.
    pub fn from_document(doc: Document, config: &EditorConfig) -> Self {
        let doc = migrate_legacy_empty_nodes(&doc);
        Self {
            cursor_id: doc.root_id.clone(),
            doc,
            mode: EditMode::Focus,
            history: UndoStack::with_max_levels(config.history_limit),
            revision: 0,
            ids: Box::new(RandomIds),
            store: None,
        }
    }

    /// Use `ids` for nodes created from now on.
    pub fn with_ids(mut self, ids: impl IdGenerator + 'static) -> Self {
        self.ids = Box::new(ids);
        self
    }

    /// Restore from `store`, falling back to a fresh document.
    ///
    /// A store that is empty, unreadable, or holds a malformed document
    /// yields a fresh document, which is saved right away.
    pub fn open(store: impl DocumentStore + 'static, config: &EditorConfig) -> Self {
        Self::open_with_ids(store, config, RandomIds)
    }

    pub fn open_with_ids(
        store: impl DocumentStore + 'static,
        config: &EditorConfig,
        ids: impl IdGenerator + 'static,
    ) -> Self {
        let mut ids: Box<dyn IdGenerator> = Box::new(ids);

        let restored = restore(&store);
        let fresh = restored.is_none();
        let doc = restored.unwrap_or_else(|| Document::initial(&mut *ids));

        let mut session = Self::from_document(doc, config);
        session.ids = ids;
        session.store = Some(Box::new(store));

        if fresh {
            session.persist();
        }
        session
    }

    /// Like [`open`](Self::open), but surfaces read and parse failures
    /// instead of starting over. An empty store still yields a fresh,
    /// unsaved document.
    pub fn try_open(
        store: impl DocumentStore + 'static,
        config: &EditorConfig,
    ) -> Result<Self, EditorError> {
        let doc = match store.load()? {
            Some(text) => load_document(&text)?,
            None => create_initial_document(),
        };

        let mut session = Self::from_document(doc, config);
        session.store = Some(Box::new(store));
        Ok(session)
    }

    // ---- Accessors ----

    pub fn document(&self) -> &Document {
        &self.doc
    }

    pub fn cursor_id(&self) -> &NodeId {
        &self.cursor_id
    }

    pub fn cursor_node(&self) -> Option<&Node> {
        self.doc.node(self.cursor_id.as_str())
    }

    pub fn mode(&self) -> &EditMode {
        &self.mode
    }

    pub fn history(&self) -> &UndoStack {
        &self.history
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    pub fn export_ascii(&self) -> String {
        serialize_ascii_tree(&self.doc)
    }

    pub fn export_mermaid(&self) -> String {
        serialize_mermaid_git_graph(&self.doc)
    }

    /// Export text for `format`, with Mermaid wrapped in a code fence.
    pub fn export_text(&self, format: ExportFormat) -> String {
        build_export_text(format, &self.doc)
    }

    // ---- Persistence ----

    /// Save the current document to the attached store.
    pub fn save(&mut self) -> Result<(), EditorError> {
        if let Some(store) = self.store.as_mut() {
            store.save(&self.doc)?;
        }
        Ok(())
    }

    /// Replace the session state with the stored document. Returns `false`
    /// (and changes nothing) when there is no store or nothing usable in it.
    pub fn reload(&mut self) -> bool {
        let Some(doc) = self.store.as_deref().and_then(|store| restore(store)) else {
            return false;
        };

        self.doc = migrate_legacy_empty_nodes(&doc);
        self.cursor_id = self.doc.root_id.clone();
        self.mode = EditMode::Focus;
        self.history.clear();
        self.revision += 1;
        debug!(revision = self.revision, "Reloaded document");
        true
    }

    fn persist(&mut self) {
        if let Some(store) = self.store.as_mut() {
            if let Err(e) = store.save(&self.doc) {
                warn!(error = %e, "Failed to save document");
            }
        }
    }

    // ---- Commit path ----

    /// Apply `mutation` and commit it, settling the mode the way the matching
    /// command would.
    pub fn apply(&mut self, mutation: &Mutation) -> Result<(), EditorError> {
        self.commit(mutation, After::for_mutation(mutation))?;
        Ok(())
    }

    fn commit(&mut self, mutation: &Mutation, after: After) -> Result<(), MutationError> {
        let Applied { doc, cursor_id } = mutation.apply(&self.doc)?;

        let cursor_id = existing_or(&doc, cursor_id, doc.root_id.clone());
        let (cursor_id, mode) = match after {
            After::Focus => (cursor_id, EditMode::Focus),
            After::BlankName => (cursor_id, EditMode::blank_name()),
            After::Preserve => (cursor_id, self.mode.clone()),
            After::FocusAt(target) => (existing_or(&doc, target, cursor_id), EditMode::Focus),
            After::CommentAt(target) => {
                let target = existing_or(&doc, target, cursor_id);
                let mode = EditMode::comment_from_doc(&doc, target.as_str());
                (target, mode)
            }
        };

        let previous = std::mem::replace(&mut self.doc, doc);
        self.history.record(previous);
        self.cursor_id = cursor_id;
        self.mode = mode;
        self.revision += 1;

        debug!(
            op = mutation.name(),
            revision = self.revision,
            mode = %self.mode.kind(),
            "Committed edit"
        );
        self.persist();
        Ok(())
    }

    /// Commit, treating a refused edit as a no-op.
    fn try_commit(&mut self, mutation: Mutation, after: After) {
        // A refused edit leaves the session untouched
        let _ = self.commit(&mutation, after);
    }

    // ---- Cursor movement ----

    fn row_at_offset(&self, offset: isize) -> Option<NodeId> {
        let list = visible_list(&self.doc);
        let index = list.iter().position(|id| *id == self.cursor_id)?;
        let target = index.checked_add_signed(offset)?;
        list.get(target).cloned()
    }

    /// Move along the visible list. With `preserve_mode` a name or comment
    /// edit stays open, re-seeded from the new row.
    fn move_cursor_by(&mut self, offset: isize, preserve_mode: bool) {
        let Some(target) = self.row_at_offset(offset) else {
            return;
        };

        self.mode = if preserve_mode {
            self.mode.reseed(&self.doc, target.as_str())
        } else {
            EditMode::Focus
        };
        self.cursor_id = target;
    }

    /// In comment mode, moving commits the comment and opens the
    /// neighbouring row's comment.
    fn step(&mut self, offset: isize) {
        if !matches!(self.mode, EditMode::Comment { .. }) {
            self.move_cursor_by(offset, false);
            return;
        }

        let target = self
            .row_at_offset(offset)
            .unwrap_or_else(|| self.cursor_id.clone());
        self.confirm_comment_to(true, target);
    }

    pub fn move_up(&mut self) {
        self.step(-1);
    }

    pub fn move_down(&mut self) {
        self.step(1);
    }

    pub fn move_top(&mut self) {
        if let Some(first) = visible_list(&self.doc).first() {
            self.cursor_id = first.clone();
            self.mode = EditMode::Focus;
        }
    }

    pub fn move_bottom(&mut self) {
        if let Some(last) = visible_list(&self.doc).last() {
            self.cursor_id = last.clone();
            self.mode = EditMode::Focus;
        }
    }

    pub fn select_cursor(&mut self, id: &str) {
        if self.doc.contains(id) {
            self.cursor_id = NodeId::new(id);
            self.mode = EditMode::Focus;
        }
    }

    /// Select the first visible row named `name`.
    pub fn select_by_name(&mut self, name: &str) {
        let found = visible_list(&self.doc)
            .into_iter()
            .find(|id| self.doc.node(id.as_str()).is_some_and(|node| node.name == name));
        if let Some(id) = found {
            self.cursor_id = id;
            self.mode = EditMode::Focus;
        }
    }

    // ---- Structural edits ----

    pub fn move_branch_up(&mut self) {
        let node_id = self.cursor_id.clone();
        self.try_commit(Mutation::MoveBranchUp { node_id }, After::Preserve);
    }

    pub fn move_branch_down(&mut self) {
        let node_id = self.cursor_id.clone();
        self.try_commit(Mutation::MoveBranchDown { node_id }, After::Preserve);
    }

    /// Insert a blank sibling below the cursor and start naming it.
    pub fn insert_below(&mut self) {
        let mutation = Mutation::InsertBelow {
            cursor_id: self.cursor_id.clone(),
            new_id: self.ids.next_id(),
        };
        self.try_commit(mutation, After::BlankName);
    }

    /// Insert a blank first child of the cursor and start naming it.
    pub fn insert_child_top(&mut self) {
        let mutation = Mutation::InsertChildTop {
            parent_id: self.cursor_id.clone(),
            new_id: self.ids.next_id(),
        };
        self.try_commit(mutation, After::BlankName);
    }

    pub fn indent_right(&mut self) {
        let node_id = self.cursor_id.clone();
        self.try_commit(Mutation::IndentRight { node_id }, After::Preserve);
    }

    /// Outdent the cursor row. Top-level rows cannot go further left, so the
    /// cursor moves up a row instead, keeping any open edit.
    pub fn outdent_left(&mut self) {
        let Some(node) = self.cursor_node() else {
            return;
        };

        let top_level = match &node.parent_id {
            None => true,
            Some(parent_id) => self.doc.is_root(parent_id.as_str()),
        };
        if top_level {
            self.move_cursor_by(-1, true);
            return;
        }

        let node_id = self.cursor_id.clone();
        self.try_commit(Mutation::OutdentLeft { node_id }, After::Preserve);
    }

    /// Delete the cursor row, promoting its children. The root stays.
    pub fn delete_node(&mut self) {
        let node_id = self.cursor_id.clone();
        self.try_commit(Mutation::RemoveNode { node_id }, After::Focus);
    }

    /// Same as [`delete_node`](Self::delete_node).
    pub fn clear_name(&mut self) {
        self.delete_node();
    }

    // ---- Name editing ----

    pub fn start_name_edit(&mut self) {
        if self.doc.contains(self.cursor_id.as_str()) {
            self.mode = EditMode::name_from_doc(&self.doc, self.cursor_id.as_str());
        }
    }

    /// Replace the name buffer. Ignored outside name mode.
    pub fn set_name_buffer(&mut self, text: &str) {
        if let EditMode::Name { buffer, .. } = &mut self.mode {
            *buffer = sanitize_name(text);
        }
    }

    /// A typed character: space indents, anything else goes to the name
    /// buffer, opening name mode on the current name if needed.
    pub fn type_char(&mut self, ch: char) {
        if ch == ' ' {
            self.indent_right();
            return;
        }
        if !self.doc.contains(self.cursor_id.as_str()) {
            return;
        }

        if !matches!(self.mode, EditMode::Name { .. }) {
            self.mode = EditMode::name_from_doc(&self.doc, self.cursor_id.as_str());
        }
        if let EditMode::Name { buffer, .. } = &mut self.mode {
            buffer.push(ch);
        }
    }

    /// Commit the name buffer.
    ///
    /// An empty name deletes the row (except the root, whose edit is simply
    /// discarded). An unchanged name just returns to focus.
    pub fn confirm_name_edit(&mut self) {
        let next = match &self.mode {
            EditMode::Name { buffer, .. } => sanitize_name(buffer),
            _ => return,
        };
        let Some(node) = self.cursor_node() else {
            self.mode = EditMode::Focus;
            return;
        };

        let node_id = self.cursor_id.clone();
        if next.is_empty() {
            if self.doc.is_root(node_id.as_str()) {
                self.mode = EditMode::Focus;
            } else {
                self.try_commit(Mutation::RemoveNode { node_id }, After::Focus);
            }
            return;
        }

        if node.name == next {
            self.mode = EditMode::Focus;
            return;
        }

        self.try_commit(Mutation::Rename { node_id, name: next }, After::Focus);
    }

    pub fn cancel_name_edit(&mut self) {
        if matches!(self.mode, EditMode::Name { .. }) {
            self.mode = EditMode::Focus;
        }
    }

    // ---- Comment editing ----

    pub fn start_comment_edit(&mut self) {
        if self.doc.contains(self.cursor_id.as_str()) {
            self.mode = EditMode::comment_from_doc(&self.doc, self.cursor_id.as_str());
        }
    }

    /// Replace the comment buffer. Ignored outside comment mode.
    pub fn set_comment_buffer(&mut self, text: &str) {
        if let EditMode::Comment { buffer, .. } = &mut self.mode {
            *buffer = text.to_string();
        }
    }

    /// Commit the comment buffer. With `keep_mode` the editor stays in
    /// comment mode on the same row.
    pub fn confirm_comment_edit(&mut self, keep_mode: bool) {
        let target = self.cursor_id.clone();
        self.confirm_comment_to(keep_mode, target);
    }

    /// Commit the comment buffer and land on `target` (or stay put when
    /// `target` does not exist).
    fn confirm_comment_to(&mut self, keep_mode: bool, target: NodeId) {
        let next = match &self.mode {
            EditMode::Comment { buffer, .. } => buffer.clone(),
            _ => return,
        };
        let target = existing_or(&self.doc, target, self.cursor_id.clone());
        let Some(node) = self.cursor_node() else {
            self.mode = EditMode::Focus;
            return;
        };

        if node.comment == next {
            self.mode = if keep_mode {
                EditMode::comment_from_doc(&self.doc, target.as_str())
            } else {
                EditMode::Focus
            };
            self.cursor_id = target;
            return;
        }

        let mutation = Mutation::SetComment {
            node_id: self.cursor_id.clone(),
            comment: next,
        };
        let after = if keep_mode {
            After::CommentAt(target)
        } else {
            After::FocusAt(target)
        };
        self.try_commit(mutation, after);
    }

    pub fn cancel_comment_edit(&mut self) {
        if matches!(self.mode, EditMode::Comment { .. }) {
            self.mode = EditMode::Focus;
        }
    }

    // ---- History ----

    /// Step back one edit. Returns `false` when there is nothing to undo.
    pub fn undo(&mut self) -> bool {
        if !self.history.can_undo() {
            return false;
        }
        let current = migrate_legacy_empty_nodes(&self.doc);
        let Some(previous) = self.history.undo(current) else {
            return false;
        };

        self.restore_snapshot(previous);
        debug!(
            revision = self.revision,
            undo_levels = self.history.undo_levels(),
            "Undo"
        );
        true
    }

    /// Re-apply the most recently undone edit.
    pub fn redo(&mut self) -> bool {
        if !self.history.can_redo() {
            return false;
        }
        let current = migrate_legacy_empty_nodes(&self.doc);
        let Some(next) = self.history.redo(current) else {
            return false;
        };

        self.restore_snapshot(next);
        debug!(
            revision = self.revision,
            redo_levels = self.history.redo_levels(),
            "Redo"
        );
        true
    }

    fn restore_snapshot(&mut self, snapshot: Document) {
        let doc = migrate_legacy_empty_nodes(&snapshot);
        let cursor_id = existing_or(&doc, self.cursor_id.clone(), doc.root_id.clone());

        self.doc = doc;
        self.cursor_id = cursor_id;
        self.mode = EditMode::Focus;
        self.revision += 1;
        self.persist();
    }

    // ---- Commands ----

    /// Run one command. Returns whether the document, cursor or mode changed.
    pub fn dispatch(&mut self, command: Command) -> bool {
        let before = (self.revision, self.cursor_id.clone(), self.mode.clone());

        match command {
            Command::SelectCursor { id } => self.select_cursor(id.as_str()),
            Command::SelectByName { name } => self.select_by_name(&name),
            Command::MoveUp => self.move_up(),
            Command::MoveDown => self.move_down(),
            Command::MoveTop => self.move_top(),
            Command::MoveBottom => self.move_bottom(),
            Command::MoveBranchUp => self.move_branch_up(),
            Command::MoveBranchDown => self.move_branch_down(),
            Command::InsertBelow => self.insert_below(),
            Command::InsertChildTop => self.insert_child_top(),
            Command::IndentRight => self.indent_right(),
            Command::OutdentLeft => self.outdent_left(),
            Command::DeleteNode => self.delete_node(),
            Command::ClearName => self.clear_name(),
            Command::StartNameEdit => self.start_name_edit(),
            Command::SetNameBuffer { text } => self.set_name_buffer(&text),
            Command::TypeChar { ch } => self.type_char(ch),
            Command::ConfirmNameEdit => self.confirm_name_edit(),
            Command::CancelNameEdit => self.cancel_name_edit(),
            Command::StartCommentEdit => self.start_comment_edit(),
            Command::SetCommentBuffer { text } => self.set_comment_buffer(&text),
            Command::ConfirmCommentEdit { keep_mode } => self.confirm_comment_edit(keep_mode),
            Command::CancelCommentEdit => self.cancel_comment_edit(),
            Command::Undo => {
                self.undo();
            }
            Command::Redo => {
                self.redo();
            }
        }

        before != (self.revision, self.cursor_id.clone(), self.mode.clone())
    }
}

impl fmt::Debug for EditSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EditSession")
            .field("doc", &self.doc)
            .field("cursor_id", &self.cursor_id)
            .field("mode", &self.mode)
            .field("revision", &self.revision)
            .field("undo_levels", &self.history.undo_levels())
            .field("redo_levels", &self.history.redo_levels())
            .field("has_store", &self.store.is_some())
            .finish()
    }
}

fn existing_or(doc: &Document, id: NodeId, fallback: NodeId) -> NodeId {
    if doc.contains(id.as_str()) {
        id
    } else {
        fallback
    }
}

/// Load and normalize whatever `store` holds. Failures are logged and
/// treated as an empty store.
fn restore(store: &dyn DocumentStore) -> Option<Document> {
    let text = match store.load() {
        Ok(text) => text?,
        Err(e) => {
            error!(error = %e, "Failed to read stored document");
            return None;
        }
    };

    match load_document(&text) {
        Ok(doc) => Some(doc),
        Err(e) => {
            error!(error = %e, "Stored document is malformed, starting fresh");
            None
        }
    }
}
