//! Editor commands as data.
//!
//! Each variant maps to one [`EditSession`](crate::EditSession) method, so a
//! sequence of commands can be scripted, stored, or replayed.

use branchtree_tree::NodeId;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "command", rename_all = "camelCase")]
pub enum Command {
    SelectCursor {
        id: NodeId,
    },
    /// Select the first row (in preorder) with this name
    SelectByName {
        name: String,
    },
    MoveUp,
    MoveDown,
    MoveTop,
    MoveBottom,
    MoveBranchUp,
    MoveBranchDown,
    InsertBelow,
    InsertChildTop,
    IndentRight,
    OutdentLeft,
    DeleteNode,
    ClearName,
    StartNameEdit,
    SetNameBuffer {
        text: String,
    },
    TypeChar {
        ch: char,
    },
    ConfirmNameEdit,
    CancelNameEdit,
    StartCommentEdit,
    SetCommentBuffer {
        text: String,
    },
    ConfirmCommentEdit {
        #[serde(default, rename = "keepMode")]
        keep_mode: bool,
    },
    CancelCommentEdit,
    Undo,
    Redo,
}
