//! Error types for the editor

use crate::mutations::MutationError;
use branchtree_tree::DocumentError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum EditorError {
    #[error("Document error: {0}")]
    Document(#[from] DocumentError),

    #[error("Mutation error: {0}")]
    Mutation(#[from] MutationError),

    #[error("Store error: {0}")]
    Store(#[from] StoreError),
}

/// Failures reading or writing the persisted document.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Store unavailable: {0}")]
    Unavailable(String),
}
