use crate::config::Config;
use anyhow::{bail, Context, Result};
use branchtree_tree::{
    check_invariants, migrate_legacy_empty_nodes, normalize_document, Document, Node,
};
use clap::Args;
use colored::Colorize;
use serde_json::Value;
use std::fs;

#[derive(Args, Debug)]
pub struct CheckArgs {
    /// Print the normalized document as JSON
    #[arg(long)]
    pub print: bool,
}

pub fn check(args: CheckArgs, cwd: &str) -> Result<()> {
    let config = Config::load(cwd)?;
    let path = config.get_document_path(cwd);

    println!("🔍 {} {}", "Checking".green().bold(), path.display());

    if !path.exists() {
        bail!("{} does not exist (run `branchtree init`)", path.display());
    }

    let text = fs::read_to_string(&path)?;
    let raw: Value = serde_json::from_str(&text)
        .with_context(|| format!("{} is not valid JSON", path.display()))?;
    let normalized = normalize_document(&raw)?;

    let mut warnings = 0;
    if !matches_stored(&normalized, &raw) {
        println!("   {} Stored document needed normalization", "!".yellow());
        warnings += 1;
    }

    if let Err(violation) = check_invariants(&normalized) {
        println!("   {} {}", "!".yellow(), violation);
        warnings += 1;
    }

    let migrated = migrate_legacy_empty_nodes(&normalized);
    let removed = normalized.len() - migrated.len();
    if removed > 0 {
        println!("   {} {} unnamed branches will be removed on load", "!".yellow(), removed);
    }
    check_invariants(&migrated)?;

    if args.print {
        println!("{}", migrated.to_json_pretty()?);
    }

    println!();
    println!(
        "✨ {} {} branches, {} warnings",
        "Done".green().bold(),
        migrated.len(),
        warnings
    );

    Ok(())
}

/// Whether normalization kept every stored node exactly as written.
/// Key order and a missing comment do not count as changes.
fn matches_stored(doc: &Document, raw: &Value) -> bool {
    let Some(stored) = raw.get("nodes").and_then(Value::as_object) else {
        return false;
    };

    stored.len() == doc.len()
        && doc.nodes.values().all(|node| {
            stored
                .get(node.id.as_str())
                .is_some_and(|entry| node_matches(node, entry))
        })
}

fn node_matches(node: &Node, entry: &Value) -> bool {
    let parent_id = match entry.get("parentId") {
        Some(Value::String(parent)) => Some(parent.as_str()),
        _ => None,
    };
    let children: Option<Vec<&str>> = entry
        .get("childrenIds")
        .and_then(Value::as_array)
        .and_then(|children| children.iter().map(Value::as_str).collect());
    let expected_children: Vec<&str> = node.children_ids.iter().map(|id| id.as_str()).collect();

    entry.get("id").and_then(Value::as_str) == Some(node.id.as_str())
        && entry.get("name").and_then(Value::as_str) == Some(node.name.as_str())
        && entry.get("comment").and_then(Value::as_str).unwrap_or_default() == node.comment
        && parent_id == node.parent_id.as_ref().map(|id| id.as_str())
        && children.as_deref() == Some(expected_children.as_slice())
}
