use branchtree_tree::{visible_rows, Document, NodeId, VisibleRow};
use unicode_segmentation::UnicodeSegmentation;

const GUIDE_BAR: &str = "│   ";
const GUIDE_BLANK: &str = "    ";
const COMMENT_GAP: usize = 4;
const COMMENT_MARKER: &str = "# ";

/// One rendered line of the ASCII tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AsciiRow {
    pub id: NodeId,
    /// Guides, connector and name.
    pub left: String,
    /// Width of `left` in grapheme clusters.
    pub left_len: usize,
    pub comment: String,
    /// Widest `left_len` across all rows.
    pub max_left_len: usize,
    /// Final text: `left`, plus aligned `# comment` when one is set.
    pub line: String,
}

/// Render every visible row, aligning comments into one column.
pub fn build_ascii_rows(doc: &Document) -> Vec<AsciiRow> {
    let rows: Vec<(NodeId, String, usize, String)> = visible_rows(doc)
        .into_iter()
        .filter_map(|row| {
            let node = doc.node(row.id.as_str())?;
            let left = format!("{}{}", branch_prefix(&row), node.name);
            let left_len = display_len(&left);
            Some((row.id, left, left_len, node.comment.clone()))
        })
        .collect();

    let max_left_len = rows.iter().map(|(_, _, len, _)| *len).max().unwrap_or(0);

    rows.into_iter()
        .map(|(id, left, left_len, comment)| {
            let line = if comment.is_empty() {
                left.clone()
            } else {
                let padding = " ".repeat(max_left_len - left_len + COMMENT_GAP);
                format!("{left}{padding}{COMMENT_MARKER}{comment}")
            };

            AsciiRow {
                id,
                left,
                left_len,
                comment,
                max_left_len,
                line,
            }
        })
        .collect()
}

/// Render the tree as newline-joined ASCII rows.
pub fn serialize_ascii_tree(doc: &Document) -> String {
    build_ascii_rows(doc)
        .into_iter()
        .map(|row| row.line)
        .collect::<Vec<_>>()
        .join("\n")
}

/// Count user-perceived characters.
pub(crate) fn display_len(text: &str) -> usize {
    text.graphemes(true).count()
}

fn branch_prefix(row: &VisibleRow) -> String {
    // The root's own slot never draws a guide.
    let guides = if row.depth > 0 {
        &row.prefix_guides[1..]
    } else {
        &row.prefix_guides[..]
    };

    let mut prefix: String = guides
        .iter()
        .map(|has_guide| if *has_guide { GUIDE_BAR } else { GUIDE_BLANK })
        .collect();

    if !row.is_root {
        prefix.push_str(row.connector.glyph());
        prefix.push(' ');
    }
    prefix
}
