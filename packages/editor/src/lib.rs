//! # Branchtree Editor
//!
//! Editing engine for branch trees.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │ tree: Document model, normalize, migrate    │
//! └─────────────────────────────────────────────┘
//!                     ↓
//! ┌─────────────────────────────────────────────┐
//! │ editor: EditSession                         │
//! │  - Structural mutations (copy, then commit) │
//! │  - Focus / name / comment modes             │
//! │  - Bounded undo/redo snapshots              │
//! │  - Persistence through a DocumentStore      │
//! └─────────────────────────────────────────────┘
//!                     ↓
//! ┌─────────────────────────────────────────────┐
//! │ export: ASCII tree, Mermaid gitGraph        │
//! └─────────────────────────────────────────────┘
//! ```
//!
//! ## Core Principles
//!
//! 1. **Documents are values**: every edit produces a new document; the
//!    previous one goes onto the undo stack untouched
//! 2. **Commands never fail**: an edit that does not apply is a no-op
//! 3. **Stored data is untrusted**: everything read back is normalized and
//!    migrated before use
//!
//! ## Usage
//!
//! ```rust
//! use branchtree_editor::{EditSession, EditorConfig, MemoryStore};
//!
//! let mut session = EditSession::open(MemoryStore::new(), &EditorConfig::default());
//!
//! session.insert_below();
//! session.set_name_buffer("develop");
//! session.confirm_name_edit();
//!
//! assert_eq!(session.export_ascii(), "main\n└── develop");
//!
//! // The blank row left by the undone rename is migrated away
//! session.undo();
//! assert_eq!(session.export_ascii(), "main");
//! ```

mod command;
mod config;
mod errors;
mod mode;
mod mutations;
mod session;
mod storage;
mod undo_stack;

pub use command::Command;
pub use config::EditorConfig;
pub use errors::{EditorError, StoreError};
pub use mode::{sanitize_name, EditMode, ModeKind};
pub use mutations::{Applied, Mutation, MutationError};
pub use session::EditSession;
pub use storage::{DocumentStore, FileStore, MemoryStore};
pub use undo_stack::{UndoStack, DEFAULT_HISTORY_LIMIT};

// Re-export the document model for convenience
pub use branchtree_tree::{Document, Node, NodeId};
