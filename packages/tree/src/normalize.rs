//! # Normalization
//!
//! Turns an untrusted JSON value into a [`Document`].
//!
//! The top-level shape is validated strictly and failures are reported as
//! [`MalformedDocument`]. Individual node entries are validated leniently:
//! entries with the wrong shape are dropped without being reported.
//!
//! Parent links are rebuilt from the sanitized child lists. A node's stored
//! `parentId` is ignored. The first owner to list a child becomes its
//! parent, and the id is dropped from every other owner's child list. Owners
//! reachable from the root come first, so a listed branch never disappears
//! behind a stale node; unreachable owners follow in input order.

use crate::document::{Document, Node};
use crate::error::{DocumentError, MalformedDocument};
use crate::ids::NodeId;
use crate::migrate::migrate_legacy_empty_nodes;
use serde_json::{Map, Value};
use std::collections::{BTreeMap, HashMap, HashSet};

/// A node entry that passed shape validation, before links are rebuilt.
struct RawNode {
    id: NodeId,
    name: String,
    comment: String,
    children_ids: Vec<String>,
}

/// Validate and repair an externally supplied document value.
pub fn normalize_document(raw: &Value) -> Result<Document, MalformedDocument> {
    let object = raw.as_object().ok_or(MalformedDocument::NotAnObject)?;

    let root_id = object
        .get("rootId")
        .and_then(Value::as_str)
        .ok_or(MalformedDocument::RootIdNotString)?;

    let raw_nodes = object
        .get("nodes")
        .and_then(Value::as_object)
        .ok_or(MalformedDocument::NodesNotObject)?;

    let entries: Vec<RawNode> = raw_nodes
        .iter()
        .filter_map(|(key, value)| parse_node_entry(key, value))
        .collect();

    let known: HashSet<&str> = entries.iter().map(|entry| entry.id.as_str()).collect();
    if !known.contains(root_id) {
        return Err(MalformedDocument::RootMissing {
            root_id: root_id.to_string(),
        });
    }

    // Sanitize child lists against the surviving entries.
    let sanitized: Vec<Vec<NodeId>> = entries
        .iter()
        .map(|entry| sanitize_children(&entry.children_ids, &known, entry.id.as_str(), root_id))
        .collect();

    let parents = assign_parents(&entries, &sanitized, root_id);

    let mut nodes = BTreeMap::new();
    for (entry, mut children_ids) in entries.into_iter().zip(sanitized) {
        children_ids.retain(|child| parents.get(child) == Some(&entry.id));

        let parent_id = if entry.id.as_str() == root_id {
            None
        } else {
            parents.get(&entry.id).cloned()
        };

        nodes.insert(
            entry.id.clone(),
            Node {
                id: entry.id,
                name: entry.name,
                comment: entry.comment,
                parent_id,
                children_ids,
            },
        );
    }

    Ok(Document {
        root_id: NodeId::new(root_id),
        nodes,
    })
}

/// Pick one owner for every listed child.
///
/// Owners reachable from the root claim their children first, walking down
/// from the root through the children each owner claimed. Remaining owners
/// then claim in input order.
fn assign_parents(
    entries: &[RawNode],
    sanitized: &[Vec<NodeId>],
    root_id: &str,
) -> BTreeMap<NodeId, NodeId> {
    let lists: HashMap<&str, (&NodeId, &Vec<NodeId>)> = entries
        .iter()
        .zip(sanitized)
        .map(|(entry, children)| (entry.id.as_str(), (&entry.id, children)))
        .collect();

    let mut parents: BTreeMap<NodeId, NodeId> = BTreeMap::new();
    let mut reached: HashSet<&str> = HashSet::new();
    let mut stack = vec![root_id];

    while let Some(current) = stack.pop() {
        if !reached.insert(current) {
            continue;
        }
        let Some(&(owner_id, children)) = lists.get(current) else {
            continue;
        };

        let mut claimed = Vec::new();
        for child in children {
            if !parents.contains_key(child) {
                parents.insert(child.clone(), owner_id.clone());
                claimed.push(child.as_str());
            }
        }
        stack.extend(claimed.into_iter().rev());
    }

    for (entry, children) in entries.iter().zip(sanitized) {
        if reached.contains(entry.id.as_str()) {
            continue;
        }
        for child in children {
            parents
                .entry(child.clone())
                .or_insert_with(|| entry.id.clone());
        }
    }

    parents
}

/// Parse, normalize and migrate stored document text.
pub fn load_document(text: &str) -> Result<Document, DocumentError> {
    let value: Value = serde_json::from_str(text)?;
    let doc = normalize_document(&value)?;
    Ok(migrate_legacy_empty_nodes(&doc))
}

fn parse_node_entry(key: &str, value: &Value) -> Option<RawNode> {
    let object: &Map<String, Value> = value.as_object()?;

    object.get("id")?.as_str()?;
    let name = object.get("name")?.as_str()?;

    match object.get("parentId")? {
        Value::Null | Value::String(_) => {}
        _ => return None,
    }

    let children_ids = object
        .get("childrenIds")?
        .as_array()?
        .iter()
        .filter_map(|child| child.as_str().map(str::to_string))
        .collect();

    let comment = object
        .get("comment")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string();

    Some(RawNode {
        id: NodeId::new(key),
        name: name.to_string(),
        comment,
        children_ids,
    })
}

/// Drop self references, duplicates, unknown ids and the root from a child list.
fn sanitize_children(
    children_ids: &[String],
    known: &HashSet<&str>,
    owner_id: &str,
    root_id: &str,
) -> Vec<NodeId> {
    let mut seen = HashSet::new();
    let mut result = Vec::with_capacity(children_ids.len());

    for child in children_ids {
        let child = child.as_str();
        if child == owner_id || child == root_id || !known.contains(child) {
            continue;
        }
        if !seen.insert(child) {
            continue;
        }
        result.push(NodeId::new(child));
    }

    result
}
