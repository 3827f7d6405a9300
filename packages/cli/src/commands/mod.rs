pub mod apply;
pub mod check;
pub mod export;
pub mod init;
pub mod show;

pub use apply::{apply, ApplyArgs};
pub use check::{check, CheckArgs};
pub use export::{export, ExportArgs};
pub use init::{init, InitArgs};
pub use show::{show, ShowArgs};

use crate::config::Config;
use anyhow::Context;
use branchtree_editor::{EditSession, FileStore};

/// Open the project's document, failing on unreadable or malformed files.
pub(crate) fn open_session(config: &Config, cwd: &str) -> anyhow::Result<EditSession> {
    let path = config.get_document_path(cwd);
    EditSession::try_open(FileStore::new(&path), &config.editor_config())
        .with_context(|| format!("Cannot open {}", path.display()))
}
