//! Mermaid `gitGraph` export.
//!
//! The root becomes the first commit. Every other node gets its own branch,
//! forked from its parent's branch, holding a single commit named after the
//! node. Branch names are restricted to `[A-Za-z0-9_-]` and made unique with
//! numeric suffixes.

use branchtree_tree::{Document, NodeId};
use std::collections::HashSet;

/// Mermaid's implicit first branch.
const DEFAULT_BRANCH: &str = "main";
const INDENT: &str = "  ";

/// Render the tree as a Mermaid `gitGraph` script.
pub fn serialize_mermaid_git_graph(doc: &Document) -> String {
    let mut lines = vec!["gitGraph".to_string()];
    let Some(root) = doc.root() else {
        return lines.join("\n");
    };

    lines.push(format!("{INDENT}commit id:\"{}\"", commit_id(&root.name, &root.id)));

    let mut branches = BranchNames::new();
    let root_base = sanitize_branch_base(&root.name, &root.id);
    let root_branch = if root_base == DEFAULT_BRANCH {
        DEFAULT_BRANCH.to_string()
    } else {
        let branch = branches.claim(&root_base);
        lines.push(format!("{INDENT}branch {branch}"));
        lines.push(format!("{INDENT}checkout {branch}"));
        branch
    };

    let mut visited: HashSet<&str> = HashSet::new();
    visited.insert(root.id.as_str());

    let mut stack: Vec<(&NodeId, String)> = root
        .children_ids
        .iter()
        .rev()
        .map(|child| (child, root_branch.clone()))
        .collect();

    while let Some((child_id, parent_branch)) = stack.pop() {
        let Some(child) = doc.node(child_id.as_str()) else {
            continue;
        };
        if !visited.insert(child.id.as_str()) {
            continue;
        }

        let branch = branches.claim(&sanitize_branch_base(&child.name, &child.id));
        lines.push(format!("{INDENT}checkout {parent_branch}"));
        lines.push(format!("{INDENT}branch {branch}"));
        lines.push(format!("{INDENT}checkout {branch}"));
        lines.push(format!("{INDENT}commit id:\"{}\"", commit_id(&child.name, &child.id)));

        stack.extend(
            child
                .children_ids
                .iter()
                .rev()
                .map(|grandchild| (grandchild, branch.clone())),
        );
    }

    lines.join("\n")
}

/// Branch names handed out so far.
struct BranchNames {
    used: HashSet<String>,
}

impl BranchNames {
    fn new() -> Self {
        let mut used = HashSet::new();
        used.insert(DEFAULT_BRANCH.to_string());
        Self { used }
    }

    /// Reserve `base`, or `base_2`, `base_3`, ... if it is taken.
    fn claim(&mut self, base: &str) -> String {
        let mut candidate = base.to_string();
        let mut suffix = 2;
        while self.used.contains(&candidate) {
            candidate = format!("{base}_{suffix}");
            suffix += 1;
        }
        self.used.insert(candidate.clone());
        candidate
    }
}

fn escape_mermaid_string(value: &str) -> String {
    value.replace('\\', "\\\\").replace('"', "\\\"")
}

/// First 8 ASCII alphanumerics of the id, or `node` when there are none.
pub(crate) fn short_id(id: &NodeId) -> String {
    let normalized: String = id
        .as_str()
        .chars()
        .filter(char::is_ascii_alphanumeric)
        .take(8)
        .collect();
    if normalized.is_empty() {
        "node".to_string()
    } else {
        normalized
    }
}

pub(crate) fn sanitize_branch_base(name: &str, id: &NodeId) -> String {
    let mut collapsed = String::with_capacity(name.len());
    for ch in name.chars() {
        let ch = if ch.is_ascii_alphanumeric() || ch == '_' || ch == '-' {
            ch
        } else {
            '_'
        };
        if ch == '_' && collapsed.ends_with('_') {
            continue;
        }
        collapsed.push(ch);
    }

    let trimmed = collapsed.trim_matches('_');
    let base = if trimmed.is_empty() {
        format!("b_{}", short_id(id))
    } else {
        trimmed.to_string()
    };

    if base.starts_with(|ch: char| ch.is_ascii_alphabetic() || ch == '_') {
        base
    } else {
        format!("b_{base}")
    }
}

fn commit_id(name: &str, id: &NodeId) -> String {
    if name.is_empty() {
        escape_mermaid_string(&format!("node-{}", short_id(id)))
    } else {
        escape_mermaid_string(name)
    }
}
