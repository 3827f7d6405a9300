use crate::{
    build_ascii_rows, build_export_text, serialize_ascii_tree, serialize_mermaid_git_graph,
    ExportError, ExportFormat,
};
use branchtree_tree::{Document, Node, NodeId};

fn add(doc: &mut Document, id: &str, name: &str, parent: &str) {
    let mut node = Node::new(NodeId::new(id), name);
    node.parent_id = Some(NodeId::new(parent));
    doc.nodes.insert(node.id.clone(), node);
    doc.node_mut(parent)
        .expect("parent exists")
        .children_ids
        .push(NodeId::new(id));
}

/// main -> [develop -> [feature-a, feature-b], release]
fn branch_tree() -> Document {
    let mut doc = Document::with_root_id(NodeId::new("root"));
    add(&mut doc, "dev", "develop", "root");
    add(&mut doc, "fa", "feature-a", "dev");
    add(&mut doc, "fb", "feature-b", "dev");
    add(&mut doc, "rel", "release", "root");
    doc
}

#[test]
fn test_ascii_single_child() {
    let mut doc = Document::with_root_id(NodeId::new("root"));
    add(&mut doc, "dev", "develop", "root");

    assert_eq!(serialize_ascii_tree(&doc), "main\n└── develop");
}

#[test]
fn test_ascii_root_only() {
    let doc = Document::with_root_id(NodeId::new("root"));
    assert_eq!(serialize_ascii_tree(&doc), "main");
}

#[test]
fn test_ascii_nested_tree() {
    let expected = [
        "main",
        "├── develop",
        "│   ├── feature-a",
        "│   └── feature-b",
        "└── release",
    ]
    .join("\n");

    assert_eq!(serialize_ascii_tree(&branch_tree()), expected);
}

#[test]
fn test_ascii_blank_guide_under_last_child() {
    let mut doc = Document::with_root_id(NodeId::new("root"));
    add(&mut doc, "a", "a", "root");
    add(&mut doc, "b", "b", "a");
    add(&mut doc, "c", "c", "b");

    assert_eq!(serialize_ascii_tree(&doc), "main\n└── a\n    └── b\n        └── c");
}

#[test]
fn test_ascii_aligns_comments() {
    let mut doc = branch_tree();
    doc.node_mut("dev").unwrap().comment = "integration".to_string();
    doc.node_mut("rel").unwrap().comment = "ship".to_string();

    let expected = [
        "main".to_string(),
        format!("├── develop{}# integration", " ".repeat(10)),
        "│   ├── feature-a".to_string(),
        "│   └── feature-b".to_string(),
        format!("└── release{}# ship", " ".repeat(10)),
    ]
    .join("\n");

    assert_eq!(serialize_ascii_tree(&doc), expected);
}

#[test]
fn test_ascii_rows_expose_widths() {
    let mut doc = branch_tree();
    doc.node_mut("root").unwrap().comment = "trunk".to_string();

    let rows = build_ascii_rows(&doc);
    assert_eq!(rows.len(), 5);
    assert_eq!(rows[0].left, "main");
    assert_eq!(rows[0].left_len, 4);
    assert_eq!(rows[2].left_len, 17);
    assert!(rows.iter().all(|row| row.max_left_len == 17));
    assert_eq!(rows[0].line, format!("main{}# trunk", " ".repeat(17)));
}

#[test]
fn test_ascii_pads_by_grapheme_count() {
    let mut doc = Document::with_root_id(NodeId::new("root"));
    add(&mut doc, "a", "café", "root");
    add(&mut doc, "b", "cafe\u{301}", "root");
    doc.node_mut("a").unwrap().comment = "x".to_string();
    doc.node_mut("b").unwrap().comment = "y".to_string();

    let output = serialize_ascii_tree(&doc);
    let lines: Vec<&str> = output.lines().collect();
    assert_eq!(lines[1], "├── café    # x");
    assert_eq!(lines[2], "└── cafe\u{301}    # y");
}

#[test]
fn test_ascii_is_deterministic() {
    let doc = branch_tree();
    assert_eq!(serialize_ascii_tree(&doc), serialize_ascii_tree(&doc.clone()));
}

#[test]
fn test_mermaid_nested_tree() {
    let expected = [
        "gitGraph",
        "  commit id:\"main\"",
        "  checkout main",
        "  branch develop",
        "  checkout develop",
        "  commit id:\"develop\"",
        "  checkout develop",
        "  branch feature-a",
        "  checkout feature-a",
        "  commit id:\"feature-a\"",
        "  checkout develop",
        "  branch feature-b",
        "  checkout feature-b",
        "  commit id:\"feature-b\"",
        "  checkout main",
        "  branch release",
        "  checkout release",
        "  commit id:\"release\"",
    ]
    .join("\n");

    assert_eq!(serialize_mermaid_git_graph(&branch_tree()), expected);
}

#[test]
fn test_mermaid_named_root_gets_its_own_branch() {
    let mut doc = Document::with_root_id(NodeId::new("root"));
    doc.node_mut("root").unwrap().name = "trunk".to_string();
    add(&mut doc, "a", "develop", "root");

    let expected = [
        "gitGraph",
        "  commit id:\"trunk\"",
        "  branch trunk",
        "  checkout trunk",
        "  checkout trunk",
        "  branch develop",
        "  checkout develop",
        "  commit id:\"develop\"",
    ]
    .join("\n");

    assert_eq!(serialize_mermaid_git_graph(&doc), expected);
}

#[test]
fn test_mermaid_resolves_branch_name_collisions() {
    let mut doc = Document::with_root_id(NodeId::new("root"));
    add(&mut doc, "a", "feat a", "root");
    add(&mut doc, "b", "feat/a", "root");
    add(&mut doc, "c", "main", "root");

    let output = serialize_mermaid_git_graph(&doc);
    assert!(output.contains("  branch feat_a\n"));
    assert!(output.contains("  branch feat_a_2\n"));
    assert!(output.contains("  branch main_2\n"));
    assert!(output.contains("commit id:\"feat/a\""));
}

#[test]
fn test_mermaid_empty_names_fall_back_to_ids() {
    let mut doc = Document::with_root_id(NodeId::new("root-0001"));
    doc.node_mut("root-0001").unwrap().name.clear();

    let expected = [
        "gitGraph",
        "  commit id:\"node-root0001\"",
        "  branch b_root0001",
        "  checkout b_root0001",
    ]
    .join("\n");

    assert_eq!(serialize_mermaid_git_graph(&doc), expected);
}

#[test]
fn test_mermaid_skips_shared_children() {
    let mut doc = branch_tree();
    doc.node_mut("rel")
        .unwrap()
        .children_ids
        .push(NodeId::new("fa"));

    let output = serialize_mermaid_git_graph(&doc);
    assert_eq!(output.matches("commit id:\"feature-a\"").count(), 1);
}

#[test]
fn test_mermaid_missing_root() {
    let mut doc = branch_tree();
    doc.root_id = NodeId::new("missing");
    assert_eq!(serialize_mermaid_git_graph(&doc), "gitGraph");
}

#[test]
fn test_export_format_parsing_and_labels() {
    assert_eq!("ascii".parse::<ExportFormat>(), Ok(ExportFormat::Ascii));
    assert_eq!("Mermaid".parse::<ExportFormat>(), Ok(ExportFormat::Mermaid));
    assert_eq!(
        "svg".parse::<ExportFormat>(),
        Err(ExportError::UnknownFormat("svg".to_string()))
    );
    assert_eq!(ExportFormat::Ascii.label(), "ASCII");
    assert_eq!(ExportFormat::Mermaid.label(), "Mermaid");
}

#[test]
fn test_build_export_text_fences_mermaid_only() {
    let doc = Document::with_root_id(NodeId::new("root"));

    assert_eq!(build_export_text(ExportFormat::Ascii, &doc), "main");
    assert_eq!(
        build_export_text(ExportFormat::Mermaid, &doc),
        "```mermaid\ngitGraph\n  commit id:\"main\"\n```"
    );
}
