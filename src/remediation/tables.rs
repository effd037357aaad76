//! Table summaries and header audit.

use super::detector::{TagDetector, TagQuality};
use super::stats::{ReviewCode, ReviewItem, RunLog};
use crate::document::DocumentModel;
use crate::error::Result;
use crate::structure::traversal::{node_page, nodes_with_role};
use crate::structure::{NodeId, StructRole, StructureTree};

/// Row and column layout of a `/Table` node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TableShape {
    /// Number of rows
    pub rows: usize,
    /// Cells in the widest row
    pub columns: usize,
    /// The first row is all header cells
    pub header_row: bool,
    /// Every row starts with a header cell
    pub header_column: bool,
}

impl TableShape {
    /// Measure a table. Rows inside `THead`/`TBody`/`TFoot` count; rows of
    /// nested tables do not.
    pub fn measure(tree: &StructureTree, table: NodeId) -> Self {
        let mut rows = Vec::new();
        collect_rows(tree, table, &mut rows);

        let cells: Vec<Vec<&StructRole>> = rows
            .iter()
            .map(|row| {
                tree.children(*row)
                    .iter()
                    .filter_map(|c| tree.get(*c))
                    .map(|n| &n.role)
                    .filter(|r| matches!(r, StructRole::TableHeaderCell | StructRole::TableDataCell))
                    .collect()
            })
            .collect();

        let is_header = |r: &&StructRole| **r == StructRole::TableHeaderCell;
        Self {
            rows: rows.len(),
            columns: cells.iter().map(|c| c.len()).max().unwrap_or(0),
            header_row: cells.first().is_some_and(|c| !c.is_empty() && c.iter().all(is_header)),
            header_column: !cells.is_empty() && cells.iter().all(|c| c.first().is_some_and(is_header)),
        }
    }

    /// Summary text in the form "Table with 3 rows and 4 columns with column headers".
    pub fn summary(&self) -> String {
        let mut text = format!(
            "Table with {} row{} and {} column{}",
            self.rows,
            if self.rows == 1 { "" } else { "s" },
            self.columns,
            if self.columns == 1 { "" } else { "s" }
        );
        match (self.header_row, self.header_column) {
            (true, true) => text.push_str(" with row and column headers"),
            (true, false) => text.push_str(" with column headers"),
            (false, true) => text.push_str(" with row headers"),
            (false, false) => {},
        }
        text
    }
}

fn collect_rows(tree: &StructureTree, id: NodeId, rows: &mut Vec<NodeId>) {
    for child in tree.children(id) {
        match tree.get(*child).map(|n| &n.role) {
            Some(StructRole::TableRow) => rows.push(*child),
            Some(StructRole::Table) | None => {},
            Some(_) => collect_rows(tree, *child, rows),
        }
    }
}

/// Summarize tables that lack a summary and report tables without headers.
///
/// Header cells are never invented: a table without any is left for review.
pub fn audit_tables<D: DocumentModel + ?Sized>(
    doc: &mut D,
    detector: &TagDetector,
    summarize: bool,
    log: &mut RunLog,
) -> Result<()> {
    let tables = nodes_with_role(doc.tree(), &StructRole::Table);

    for table in tables {
        let assessment = detector.assess_table_node(doc.tree(), table);
        if assessment.quality != TagQuality::Good {
            log.stats.tables_missing_headers += 1;
            let location = match node_page(doc.tree(), table) {
                Some(page) => format!("page {}", page + 1),
                None => format!("node {}", table),
            };
            log.unresolved(
                ReviewItem::new(ReviewCode::TableMissingHeaders, "Table has no header cells")
                    .with_location(location),
            );
        }

        if !summarize || assessment.existing_text.is_some() {
            continue;
        }
        let shape = TableShape::measure(doc.tree(), table);
        if shape.rows == 0 {
            continue;
        }
        let summary = shape.summary();
        log::debug!("Table {}: {}", table, summary);
        doc.tree_mut().node_mut(table)?.summary = Some(summary);
        log.stats.tables_summarized += 1;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::TaggedDocument;
    use crate::structure::StructureNode;

    /// Table with `rows` rows; `header(r, c)` decides each cell's role.
    fn table(
        doc: &mut TaggedDocument,
        rows: usize,
        cols: usize,
        header: impl Fn(usize, usize) -> bool,
    ) -> NodeId {
        let root = doc.tree.root();
        let table = doc.tree.append_child(root, StructureNode::new(StructRole::Table).with_page(0)).unwrap();
        for r in 0..rows {
            let row = doc.tree.append_child(table, StructureNode::new(StructRole::TableRow)).unwrap();
            for c in 0..cols {
                let role = if header(r, c) {
                    StructRole::TableHeaderCell
                } else {
                    StructRole::TableDataCell
                };
                doc.tree.append_child(row, StructureNode::new(role)).unwrap();
            }
        }
        table
    }

    #[test]
    fn test_summaries() {
        let mut doc = TaggedDocument::new();
        let both = table(&mut doc, 3, 4, |r, c| r == 0 || c == 0);
        let cols = table(&mut doc, 2, 2, |r, _| r == 0);
        let rows = table(&mut doc, 2, 3, |_, c| c == 0);

        let mut log = RunLog::new();
        audit_tables(&mut doc, &TagDetector::default(), true, &mut log).unwrap();
        assert_eq!(log.stats.tables_summarized, 3);
        assert_eq!(log.stats.tables_missing_headers, 0);

        let summary = |id| doc.tree.node(id).unwrap().summary.clone().unwrap();
        assert_eq!(summary(both), "Table with 3 rows and 4 columns with row and column headers");
        assert_eq!(summary(cols), "Table with 2 rows and 2 columns with column headers");
        assert_eq!(summary(rows), "Table with 2 rows and 3 columns with row headers");

        let mut log = RunLog::new();
        audit_tables(&mut doc, &TagDetector::default(), true, &mut log).unwrap();
        assert_eq!(log.stats.tables_summarized, 0);
    }

    #[test]
    fn test_missing_headers_are_reported() {
        let mut doc = TaggedDocument::new();
        let id = table(&mut doc, 1, 1, |_, _| false);

        let mut log = RunLog::new();
        audit_tables(&mut doc, &TagDetector::default(), false, &mut log).unwrap();
        assert_eq!(log.stats.tables_missing_headers, 1);
        assert_eq!(log.stats.unresolved, 1);
        assert_eq!(log.review_items[0].location.as_deref(), Some("page 1"));
        // Summaries disabled
        assert!(doc.tree.node(id).unwrap().summary.is_none());
    }

    #[test]
    fn test_row_groups_and_nested_tables() {
        let mut doc = TaggedDocument::new();
        let root = doc.tree.root();
        let outer = doc.tree.append_child(root, StructureNode::new(StructRole::Table)).unwrap();
        let head = doc
            .tree
            .append_child(outer, StructureNode::new(StructRole::Other("THead".into())))
            .unwrap();
        let row = doc.tree.append_child(head, StructureNode::new(StructRole::TableRow)).unwrap();
        doc.tree.append_child(row, StructureNode::new(StructRole::TableHeaderCell)).unwrap();
        let body = doc
            .tree
            .append_child(outer, StructureNode::new(StructRole::Other("TBody".into())))
            .unwrap();
        let row = doc.tree.append_child(body, StructureNode::new(StructRole::TableRow)).unwrap();
        let cell = doc.tree.append_child(row, StructureNode::new(StructRole::TableDataCell)).unwrap();
        let inner = doc.tree.append_child(cell, StructureNode::new(StructRole::Table)).unwrap();
        doc.tree.append_child(inner, StructureNode::new(StructRole::TableRow)).unwrap();

        let shape = TableShape::measure(&doc.tree, outer);
        assert_eq!(shape.rows, 2);
        assert_eq!(shape.columns, 1);
        assert!(shape.header_row);
        assert!(!shape.header_column);
        assert_eq!(shape.summary(), "Table with 2 rows and 1 column with column headers");
    }
}
