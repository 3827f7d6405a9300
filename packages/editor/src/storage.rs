//! # Document Storage
//!
//! Where a session keeps the persisted document between runs.
//!
//! Stores deal in text on the way in and in [`Document`]s on the way out:
//! whatever comes back from [`DocumentStore::load`] is untrusted and goes
//! through normalization before the editor sees it.

use crate::errors::StoreError;
use branchtree_tree::Document;
use std::cell::RefCell;
use std::fs;
use std::path::{Path, PathBuf};
use std::rc::Rc;

/// Backend for persisting a single document.
pub trait DocumentStore {
    /// The stored text, or `None` when nothing has been saved yet.
    fn load(&self) -> Result<Option<String>, StoreError>;

    /// Replace the stored document.
    fn save(&mut self, doc: &Document) -> Result<(), StoreError>;
}

/// In-memory store, mostly for tests and embedding.
///
/// Clones share the same contents, so a caller can keep a handle to a store
/// it has handed to a session.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    state: Rc<RefCell<MemoryState>>,
}

#[derive(Debug, Default)]
struct MemoryState {
    contents: Option<String>,
    saves: usize,
    fail: bool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store that already holds `contents`.
    pub fn with_contents(contents: impl Into<String>) -> Self {
        let store = Self::new();
        store.state.borrow_mut().contents = Some(contents.into());
        store
    }

    /// A store whose every read and write fails.
    pub fn failing() -> Self {
        let store = Self::new();
        store.set_failing(true);
        store
    }

    pub fn set_failing(&self, fail: bool) {
        self.state.borrow_mut().fail = fail;
    }

    pub fn contents(&self) -> Option<String> {
        self.state.borrow().contents.clone()
    }

    /// Number of successful saves.
    pub fn saves(&self) -> usize {
        self.state.borrow().saves
    }
}

impl DocumentStore for MemoryStore {
    fn load(&self) -> Result<Option<String>, StoreError> {
        let state = self.state.borrow();
        if state.fail {
            return Err(StoreError::Unavailable("memory store is failing".to_string()));
        }
        Ok(state.contents.clone())
    }

    fn save(&mut self, doc: &Document) -> Result<(), StoreError> {
        let mut state = self.state.borrow_mut();
        if state.fail {
            return Err(StoreError::Unavailable("memory store is failing".to_string()));
        }
        state.contents = Some(doc.to_json()?);
        state.saves += 1;
        Ok(())
    }
}

/// JSON file on disk.
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|name| name.to_os_string())
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

impl DocumentStore for FileStore {
    fn load(&self) -> Result<Option<String>, StoreError> {
        if !self.path.exists() {
            return Ok(None);
        }

        let text = fs::read_to_string(&self.path)?;
        if text.trim().is_empty() {
            return Ok(None);
        }
        Ok(Some(text))
    }

    fn save(&mut self, doc: &Document) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        // Readers only ever see a complete file
        let temp = self.temp_path();
        fs::write(&temp, doc.to_json_pretty()?)?;
        fs::rename(&temp, &self.path)?;
        Ok(())
    }
}
