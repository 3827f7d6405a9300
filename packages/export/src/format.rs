use crate::{serialize_ascii_tree, serialize_mermaid_git_graph};
use branchtree_tree::Document;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Errors that can occur when selecting an export format
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ExportError {
    #[error("Unknown export format: {0} (expected ascii or mermaid)")]
    UnknownFormat(String),
}

/// Textual representations the tree can be exported to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ExportFormat {
    #[default]
    Ascii,
    Mermaid,
}

impl ExportFormat {
    /// Human readable label.
    pub fn label(self) -> &'static str {
        match self {
            ExportFormat::Ascii => "ASCII",
            ExportFormat::Mermaid => "Mermaid",
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ExportFormat::Ascii => "ascii",
            ExportFormat::Mermaid => "mermaid",
        }
    }

    /// Render `doc` in this format without any wrapping.
    pub fn render(self, doc: &Document) -> String {
        match self {
            ExportFormat::Ascii => serialize_ascii_tree(doc),
            ExportFormat::Mermaid => serialize_mermaid_git_graph(doc),
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ExportFormat {
    type Err = ExportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "ascii" => Ok(ExportFormat::Ascii),
            "mermaid" => Ok(ExportFormat::Mermaid),
            _ => Err(ExportError::UnknownFormat(s.to_string())),
        }
    }
}

/// Wrap a Mermaid script in a Markdown code fence.
pub fn wrap_mermaid_code_fence(mermaid: &str) -> String {
    format!("```mermaid\n{mermaid}\n```")
}

/// Text to hand to the user for `format`: Mermaid output is fenced so it can
/// be pasted straight into Markdown.
pub fn build_export_text(format: ExportFormat, doc: &Document) -> String {
    match format {
        ExportFormat::Mermaid => wrap_mermaid_code_fence(&format.render(doc)),
        ExportFormat::Ascii => format.render(doc),
    }
}
