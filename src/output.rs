//! Output of extracted tables as CSV files or markdown

use crate::pipeline::ExtractedTable;
use crate::TableError;
use csv::WriterBuilder;
use std::path::{Path, PathBuf};

/// Name for a table at position `index` of an extraction result,
/// e.g. `Page_3_Table_2`
pub fn sheet_name(table: &ExtractedTable, index: usize) -> String {
    format!("Page_{}_Table_{}", table.page, index + 1)
}

/// Render a table as CSV, every cell included
pub fn table_to_csv_string(table: &ExtractedTable) -> Result<String, TableError> {
    let mut writer = WriterBuilder::new()
        .has_headers(false)
        .from_writer(Vec::<u8>::new());
    for row in &table.rows {
        writer.write_record(row)?;
    }
    writer.flush()?;

    let bytes = writer
        .into_inner()
        .map_err(|e| TableError::Io(e.into_error()))?;
    String::from_utf8(bytes)
        .map_err(|e| TableError::Output(format!("invalid utf-8 csv output: {e}")))
}

/// Write each table to `<dir>/<sheet name>.csv`, creating `dir` if needed.
/// Returns the written paths in table order.
pub fn write_csv_dir<P: AsRef<Path>>(
    tables: &[ExtractedTable],
    dir: P,
) -> Result<Vec<PathBuf>, TableError> {
    let dir = dir.as_ref();
    std::fs::create_dir_all(dir)?;

    let mut written = Vec::with_capacity(tables.len());
    for (idx, table) in tables.iter().enumerate() {
        let path = dir.join(format!("{}.csv", sheet_name(table, idx)));
        let mut writer = WriterBuilder::new().has_headers(false).from_path(&path)?;
        for row in &table.rows {
            writer.write_record(row)?;
        }
        writer.flush()?;
        log::debug!("wrote {} row(s) to {}", table.rows.len(), path.display());
        written.push(path);
    }

    Ok(written)
}

/// Format a table as markdown, first row as header
pub fn table_to_markdown(table: &ExtractedTable) -> String {
    if table.rows.is_empty() || table.rows[0].is_empty() {
        return String::new();
    }

    let cells: Vec<Vec<String>> = table
        .rows
        .iter()
        .map(|row| row.iter().map(|c| c.replace('|', "\\|")).collect())
        .collect();

    let num_cols = cells[0].len();
    let col_widths: Vec<usize> = (0..num_cols)
        .map(|col| {
            cells
                .iter()
                .map(|row| row.get(col).map(|c| c.chars().count()).unwrap_or(0))
                .max()
                .unwrap_or(3)
                .max(3)
        })
        .collect();

    let mut output = String::new();
    for (row_idx, row) in cells.iter().enumerate() {
        output.push('|');
        for (col_idx, cell) in row.iter().enumerate() {
            let width = col_widths[col_idx];
            output.push_str(&format!(" {:width$} |", cell, width = width));
        }
        output.push('\n');

        if row_idx == 0 {
            output.push('|');
            for width in &col_widths {
                output.push_str(&format!(" {} |", "-".repeat(*width)));
            }
            output.push('\n');
        }
    }

    output
}

/// Render all tables, each under a heading with its sheet name
pub fn tables_to_markdown(tables: &[ExtractedTable]) -> String {
    tables
        .iter()
        .enumerate()
        .map(|(idx, table)| format!("### {}\n\n{}", sheet_name(table, idx), table_to_markdown(table)))
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::boundaries::BoundarySet;
    use crate::parser::ColumnLayout;

    fn table(page: u32, rows: &[&[&str]]) -> ExtractedTable {
        ExtractedTable {
            page,
            block_index: 0,
            first_line: 0,
            layout: ColumnLayout::Boundaries(BoundarySet::new(vec![7]).unwrap()),
            rows: rows
                .iter()
                .map(|r| r.iter().map(|c| c.to_string()).collect())
                .collect(),
        }
    }

    #[test]
    fn test_sheet_name() {
        assert_eq!(sheet_name(&table(3, &[&["a"]]), 0), "Page_3_Table_1");
        assert_eq!(sheet_name(&table(1, &[&["a"]]), 4), "Page_1_Table_5");
    }

    #[test]
    fn test_csv_keeps_empty_cells() {
        let t = table(1, &[&["Name", "Note"], &["Bob", ""], &["Al, Jr.", "x"]]);
        let csv = table_to_csv_string(&t).unwrap();
        assert_eq!(csv, "Name,Note\nBob,\n\"Al, Jr.\",x\n");
    }

    #[test]
    fn test_markdown() {
        let t = table(1, &[&["Header 1", "Header 2"], &["Cell 1", "a|b"]]);
        let md = table_to_markdown(&t);
        assert!(md.contains("| Header 1"));
        assert!(md.contains("| ---"));
        assert!(md.contains("| Cell 1"));
        assert!(md.contains("a\\|b"));
        assert_eq!(md.lines().count(), 3);
    }

    #[test]
    fn test_markdown_headings() {
        let tables = vec![table(1, &[&["a", "b"]]), table(2, &[&["c", "d"]])];
        let md = tables_to_markdown(&tables);
        assert!(md.contains("### Page_1_Table_1"));
        assert!(md.contains("### Page_2_Table_2"));
    }
}
