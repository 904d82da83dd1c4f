//! Table extraction from whitespace-formatted page text
//!
//! This module provides:
//! - Row classification and segmentation of page lines into candidate blocks
//! - Column boundary inference from whitespace-gap alignment
//! - Slicing of blocks into rows of cells, collected per page
//! - Page sources (PDF, layout text) and CSV/markdown output

pub mod boundaries;
pub mod classifier;
pub mod config;
pub mod output;
pub mod parser;
pub mod pipeline;
pub mod reader;
pub mod segmenter;

pub use boundaries::{BoundarySet, ColumnBoundaryInferer, WhitespaceRun};
pub use classifier::{is_table_row, RowClassifier};
pub use config::ExtractionConfig;
pub use output::{sheet_name, table_to_markdown, tables_to_markdown, write_csv_dir};
pub use parser::{ColumnLayout, ParsedTable, Row, TableParser};
pub use pipeline::{extract_tables, ExtractedTable, ExtractionPipeline};
pub use reader::{pages_from_file, pages_from_layout_text, pages_from_pdf, pages_from_pdf_mem};
pub use segmenter::{TableBlock, TableSegmenter};

use std::path::Path;

/// High-level extraction result
#[derive(Debug)]
pub struct ExtractionResult {
    /// Tables in page order, then block order
    pub tables: Vec<ExtractedTable>,
    /// Page count of the source
    pub page_count: u32,
    /// Processing time in milliseconds
    pub processing_time_ms: u64,
}

/// Extract tables from a PDF or layout-text file
pub fn process_file<P: AsRef<Path>>(
    path: P,
    config: &ExtractionConfig,
) -> Result<ExtractionResult, TableError> {
    let start = std::time::Instant::now();
    let pages = pages_from_file(path)?;
    Ok(run_pipeline(&pages, config, start))
}

/// Extract tables from a PDF held in memory
pub fn process_pdf_mem(
    buffer: &[u8],
    config: &ExtractionConfig,
) -> Result<ExtractionResult, TableError> {
    let start = std::time::Instant::now();
    let pages = pages_from_pdf_mem(buffer)?;
    Ok(run_pipeline(&pages, config, start))
}

fn run_pipeline(
    pages: &[Vec<String>],
    config: &ExtractionConfig,
    start: std::time::Instant,
) -> ExtractionResult {
    let tables = ExtractionPipeline::new(config).extract(pages);
    ExtractionResult {
        tables,
        page_count: pages.len() as u32,
        processing_time_ms: start.elapsed().as_millis() as u64,
    }
}

#[derive(Debug, thiserror::Error)]
pub enum TableError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("PDF parsing error: {0}")]
    Parse(String),
    #[error("CSV write error: {0}")]
    Csv(#[from] csv::Error),
    #[error("Output error: {0}")]
    Output(String),
}

impl From<lopdf::Error> for TableError {
    fn from(e: lopdf::Error) -> Self {
        TableError::Parse(e.to_string())
    }
}
