//! # Branchtree Export
//!
//! Serializers for branch trees. Both are pure functions of the document and
//! produce byte-identical output for identical trees.
//!
//! - [`serialize_ascii_tree`]: indented tree drawn with box characters, with
//!   comments aligned into a `# ...` column
//! - [`serialize_mermaid_git_graph`]: a Mermaid `gitGraph` script with one
//!   branch per node

mod ascii;
mod format;
mod mermaid;

#[cfg(test)]
mod tests;

pub use ascii::{build_ascii_rows, serialize_ascii_tree, AsciiRow};
pub use format::{build_export_text, wrap_mermaid_code_fence, ExportError, ExportFormat};
pub use mermaid::serialize_mermaid_git_graph;
