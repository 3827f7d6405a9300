//! Legacy migration.
//!
//! Older documents could persist non-root nodes with empty names. Those nodes
//! are removed and their children promoted into their place until none remain.

use crate::document::Document;
use crate::traversal::visible_list;

/// Remove every reachable non-root node with an empty name, promoting its
/// children. Returns an updated copy; the input is left untouched.
///
/// Applying this to its own output yields the same document.
pub fn migrate_legacy_empty_nodes(doc: &Document) -> Document {
    let mut migrated = doc.clone();

    loop {
        let target = visible_list(&migrated).into_iter().find(|id| {
            !migrated.is_root(id.as_str())
                && migrated
                    .node(id.as_str())
                    .is_some_and(|node| node.name.is_empty())
        });

        let Some(target) = target else {
            break;
        };

        // Each successful removal shrinks the document, so this terminates.
        if migrated.remove_and_promote(target.as_str()).is_none() {
            break;
        }
    }

    migrated
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::Node;
    use crate::ids::NodeId;

    fn add(doc: &mut Document, id: &str, name: &str, parent: &str) {
        let mut node = Node::new(NodeId::new(id), name);
        node.parent_id = Some(NodeId::new(parent));
        doc.nodes.insert(node.id.clone(), node);
        doc.node_mut(parent).unwrap().children_ids.push(NodeId::new(id));
    }

    fn order(doc: &Document) -> Vec<String> {
        visible_list(doc).into_iter().map(NodeId::into_string).collect()
    }

    #[test]
    fn test_promotes_children_of_empty_nodes() {
        let mut doc = Document::with_root_id(NodeId::new("root"));
        add(&mut doc, "x", "x", "root");
        add(&mut doc, "e", "", "root");
        add(&mut doc, "y", "y", "root");
        add(&mut doc, "c1", "c1", "e");
        add(&mut doc, "e2", "", "e");
        add(&mut doc, "c2", "c2", "e2");

        let migrated = migrate_legacy_empty_nodes(&doc);

        assert_eq!(order(&migrated), vec!["root", "x", "c1", "c2", "y"]);
        assert_eq!(
            migrated.node("c2").unwrap().parent_id,
            Some(NodeId::new("root"))
        );
        assert_eq!(doc.len(), 7, "input must not be modified");
    }

    #[test]
    fn test_keeps_empty_root() {
        let mut doc = Document::with_root_id(NodeId::new("root"));
        doc.node_mut("root").unwrap().name.clear();
        add(&mut doc, "a", "a", "root");

        let migrated = migrate_legacy_empty_nodes(&doc);
        assert_eq!(migrated, doc);
    }

    #[test]
    fn test_is_idempotent() {
        let mut doc = Document::with_root_id(NodeId::new("root"));
        add(&mut doc, "e", "", "root");
        add(&mut doc, "a", "a", "e");

        let once = migrate_legacy_empty_nodes(&doc);
        let twice = migrate_legacy_empty_nodes(&once);
        assert_eq!(once, twice);
    }
}
