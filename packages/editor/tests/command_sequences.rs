//! Scripted command sequences
//!
//! This tests:
//! - Building trees from JSON command scripts
//! - Mixed structural edits, comments and history
//! - Document integrity after every step

use branchtree_editor::{Command, EditSession, EditorConfig};
use branchtree_tree::{check_invariants, check_structure, Document, NodeId, SequentialIds};

fn new_session() -> EditSession {
    let doc = Document::with_root_id(NodeId::new("root"));
    EditSession::from_document(doc, &EditorConfig::default()).with_ids(SequentialIds::new("n"))
}

fn run(session: &mut EditSession, script: &str) {
    let commands: Vec<Command> = serde_json::from_str(script).unwrap();
    for command in commands {
        session.dispatch(command);
        check_structure(session.document()).unwrap();
    }
}

const GITFLOW: &str = r#"[
    {"command": "insertBelow"},
    {"command": "setNameBuffer", "text": "develop"},
    {"command": "confirmNameEdit"},
    {"command": "insertChildTop"},
    {"command": "setNameBuffer", "text": "feature/login"},
    {"command": "confirmNameEdit"},
    {"command": "insertBelow"},
    {"command": "setNameBuffer", "text": "feature/search"},
    {"command": "confirmNameEdit"},
    {"command": "selectByName", "name": "develop"},
    {"command": "insertBelow"},
    {"command": "setNameBuffer", "text": "release/1.0"},
    {"command": "confirmNameEdit"},
    {"command": "insertBelow"},
    {"command": "setNameBuffer", "text": "hotfix"},
    {"command": "confirmNameEdit"}
]"#;

#[test]
fn test_gitflow_script() {
    let mut session = new_session();
    run(&mut session, GITFLOW);

    let expected = [
        "main",
        "├── develop",
        "│   ├── feature/login",
        "│   └── feature/search",
        "├── release/1.0",
        "└── hotfix",
    ]
    .join("\n");
    assert_eq!(session.export_ascii(), expected);
    assert!(check_invariants(session.document()).is_ok());
}

#[test]
fn test_typing_builds_names() {
    let mut session = new_session();
    run(
        &mut session,
        r#"[
            {"command": "insertBelow"},
            {"command": "typeChar", "ch": "d"},
            {"command": "typeChar", "ch": "e"},
            {"command": "typeChar", "ch": "v"},
            {"command": "confirmNameEdit"},
            {"command": "insertBelow"},
            {"command": "typeChar", "ch": "f"},
            {"command": "typeChar", "ch": " "},
            {"command": "typeChar", "ch": "x"},
            {"command": "confirmNameEdit"}
        ]"#,
    );

    assert_eq!(session.export_ascii(), "main\n└── dev\n    └── fx");
}

#[test]
fn test_branch_moves_walk_through_tree() {
    let mut session = new_session();
    run(&mut session, GITFLOW);

    // hotfix walks up row by row: before release, into develop's subtree
    run(
        &mut session,
        r#"[
            {"command": "selectByName", "name": "hotfix"},
            {"command": "moveBranchUp"},
            {"command": "moveBranchUp"}
        ]"#,
    );
    assert_eq!(
        session.export_ascii(),
        [
            "main",
            "├── develop",
            "│   ├── feature/login",
            "│   ├── hotfix",
            "│   └── feature/search",
            "└── release/1.0",
        ]
        .join("\n")
    );

    // and back down again, one row at a time
    let before = session.export_ascii();
    run(
        &mut session,
        r#"[
            {"command": "moveBranchDown"},
            {"command": "moveBranchDown"}
        ]"#,
    );
    assert_ne!(session.export_ascii(), before);

    let mut fresh = new_session();
    run(&mut fresh, GITFLOW);
    assert_eq!(session.export_ascii(), fresh.export_ascii());
}

#[test]
fn test_move_branch_down_demotes_over_own_child() {
    let mut session = new_session();
    run(&mut session, GITFLOW);
    run(
        &mut session,
        r#"[
            {"command": "selectByName", "name": "develop"},
            {"command": "moveBranchDown"}
        ]"#,
    );

    assert_eq!(
        session.export_ascii(),
        [
            "main",
            "├── feature/login",
            "│   └── develop",
            "│       └── feature/search",
            "├── release/1.0",
            "└── hotfix",
        ]
        .join("\n")
    );
    assert_eq!(session.cursor_node().unwrap().name, "develop");
}

#[test]
fn test_comment_pass_over_rows() {
    let mut session = new_session();
    run(&mut session, GITFLOW);
    run(
        &mut session,
        r#"[
            {"command": "moveTop"},
            {"command": "moveDown"},
            {"command": "startCommentEdit"},
            {"command": "setCommentBuffer", "text": "integration"},
            {"command": "moveDown"},
            {"command": "setCommentBuffer", "text": "JIRA-12"},
            {"command": "moveDown"},
            {"command": "moveDown"},
            {"command": "setCommentBuffer", "text": "next release"},
            {"command": "confirmCommentEdit", "keepMode": false}
        ]"#,
    );

    let output = session.export_ascii();
    let lines: Vec<&str> = output.lines().collect();
    assert_eq!(lines[1], format!("├── develop{}# integration", " ".repeat(15)));
    assert_eq!(lines[2], format!("│   ├── feature/login{}# JIRA-12", " ".repeat(5)));
    assert_eq!(lines[3], "│   └── feature/search");
    assert_eq!(lines[4], format!("├── release/1.0{}# next release", " ".repeat(11)));
    assert!(session.mode().is_focus());
}

#[test]
fn test_undo_everything_then_redo_everything() {
    let mut session = new_session();
    run(&mut session, GITFLOW);
    let built = session.export_ascii();

    let mut undone = 0;
    while session.undo() {
        undone += 1;
        check_invariants(session.document()).unwrap();
    }
    assert_eq!(session.export_ascii(), "main");
    assert!(undone > 0);

    while session.redo() {}
    assert_eq!(session.export_ascii(), built);
}

#[test]
fn test_new_edit_after_undo_drops_redo() {
    let mut session = new_session();
    run(&mut session, GITFLOW);

    session.undo();
    assert!(session.can_redo());

    run(
        &mut session,
        r#"[
            {"command": "moveTop"},
            {"command": "startCommentEdit"},
            {"command": "setCommentBuffer", "text": "trunk"},
            {"command": "confirmCommentEdit"}
        ]"#,
    );
    assert!(!session.can_redo());
}

#[test]
fn test_delete_and_outdent_sequence() {
    let mut session = new_session();
    run(&mut session, GITFLOW);
    run(
        &mut session,
        r#"[
            {"command": "selectByName", "name": "feature/search"},
            {"command": "outdentLeft"},
            {"command": "selectByName", "name": "develop"},
            {"command": "deleteNode"},
            {"command": "clearName"}
        ]"#,
    );

    // develop is gone, feature/login was promoted and then cleared too
    assert_eq!(
        session.export_ascii(),
        [
            "main",
            "├── feature/search",
            "├── release/1.0",
            "└── hotfix",
        ]
        .join("\n")
    );
}
