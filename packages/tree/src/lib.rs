//! # Branchtree Tree
//!
//! Data model for a labeled, ordered tree of git branches.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │ tree: Document model                        │
//! │  - Node ids and generators                  │
//! │  - Normalize untrusted input                │
//! │  - Preorder traversal, rows, depth          │
//! │  - Legacy empty-node migration              │
//! └─────────────────────────────────────────────┘
//!                     ↓
//! ┌─────────────────────────────────────────────┐
//! │ export: ASCII tree, Mermaid gitGraph        │
//! └─────────────────────────────────────────────┘
//!                     ↓
//! ┌─────────────────────────────────────────────┐
//! │ editor: structural edits, modes, history    │
//! └─────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust
//! use branchtree_tree::{load_document, visible_list};
//!
//! let text = r#"{
//!     "rootId": "r",
//!     "nodes": {
//!         "r": { "id": "r", "name": "main", "parentId": null, "childrenIds": ["d"] },
//!         "d": { "id": "d", "name": "develop", "parentId": "r", "childrenIds": [] }
//!     }
//! }"#;
//!
//! let doc = load_document(text).unwrap();
//! assert_eq!(visible_list(&doc).len(), 2);
//! ```

mod document;
mod error;
mod ids;
mod invariants;
mod migrate;
mod normalize;
mod traversal;

pub use document::{create_initial_document, Document, Node, DEFAULT_ROOT_NAME};
pub use error::{DocumentError, InvariantViolation, MalformedDocument};
pub use ids::{generate_node_id, IdGenerator, NodeId, RandomIds, SequentialIds};
pub use invariants::{check_invariants, check_structure};
pub use migrate::migrate_legacy_empty_nodes;
pub use normalize::{load_document, normalize_document};
pub use traversal::{
    depth, is_descendant, subtree_ids, visible_list, visible_rows, Connector, VisibleRow,
};
