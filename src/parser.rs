//! Slicing table blocks into rows of cells

use crate::boundaries::{BoundarySet, ColumnBoundaryInferer};
use crate::segmenter::TableBlock;

/// One row of trimmed cells
pub type Row = Vec<String>;

/// How a parsed table's columns were found
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ColumnLayout {
    /// Sliced at inferred whitespace boundaries
    Boundaries(BoundarySet),
    /// Split on a delimiter character present in every line
    Delimited(char),
}

/// Rows of a block together with the layout used to cut them
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedTable {
    pub layout: ColumnLayout,
    pub rows: Vec<Row>,
}

impl ParsedTable {
    /// Number of cells in every row
    pub fn column_count(&self) -> usize {
        self.rows.first().map(|r| r.len()).unwrap_or(0)
    }
}

/// Turns a block into rows using inferred column boundaries
#[derive(Debug, Clone, Copy)]
pub struct TableParser {
    inferer: ColumnBoundaryInferer,
    split_pipes: bool,
}

impl TableParser {
    pub fn new(inferer: ColumnBoundaryInferer, split_pipes: bool) -> Self {
        Self {
            inferer,
            split_pipes,
        }
    }

    /// Parse a block into rows.
    ///
    /// Returns `None` when the block has no consistent columns. Every row has
    /// the same number of cells; empty cells are kept.
    pub fn parse(&self, block: &TableBlock<'_>) -> Option<ParsedTable> {
        if block.is_empty() {
            return None;
        }

        if self.split_pipes {
            if let Some(rows) = split_delimited(block.lines(), '|') {
                return Some(ParsedTable {
                    layout: ColumnLayout::Delimited('|'),
                    rows,
                });
            }
        }

        let boundaries = self.inferer.infer(block)?;
        let rows = block
            .lines()
            .iter()
            .map(|line| slice_line(line, &boundaries))
            .collect();

        Some(ParsedTable {
            layout: ColumnLayout::Boundaries(boundaries),
            rows,
        })
    }
}

/// Cut a line at each boundary, trimming every cell
pub fn slice_line(line: &str, boundaries: &BoundarySet) -> Row {
    let mut row = Vec::with_capacity(boundaries.column_count());
    let mut prev = 0;
    for &boundary in boundaries.offsets() {
        row.push(char_slice(line, prev, boundary).trim().to_string());
        prev = boundary;
    }
    row.push(char_slice(line, prev, usize::MAX).trim().to_string());
    row
}

/// Substring by character offsets, clamped to the line
fn char_slice(line: &str, start: usize, end: usize) -> &str {
    let start = byte_offset(line, start);
    let end = byte_offset(line, end).max(start);
    &line[start..end]
}

fn byte_offset(line: &str, char_idx: usize) -> usize {
    line.char_indices()
        .nth(char_idx)
        .map(|(b, _)| b)
        .unwrap_or(line.len())
}

/// Split every line on `delim`; `None` unless all lines contain it and
/// yield the same number (at least 2) of cells
fn split_delimited(lines: &[String], delim: char) -> Option<Vec<Row>> {
    let mut rows: Vec<Row> = Vec::with_capacity(lines.len());
    for line in lines {
        if !line.contains(delim) {
            return None;
        }
        let mut cells: Vec<&str> = line.trim().split(delim).map(str::trim).collect();
        // Edge pipes as in "| a | b |"
        if cells.len() > 1 && cells.first().is_some_and(|c| c.is_empty()) {
            cells.remove(0);
        }
        if cells.len() > 1 && cells.last().is_some_and(|c| c.is_empty()) {
            cells.pop();
        }
        if cells.len() < 2 {
            return None;
        }
        if let Some(first) = rows.first() {
            if first.len() != cells.len() {
                return None;
            }
        }
        rows.push(cells.into_iter().map(String::from).collect());
    }
    Some(rows)
}
