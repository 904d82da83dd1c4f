//! Page-level orchestration: segment, parse, collect with provenance

use crate::boundaries::ColumnBoundaryInferer;
use crate::classifier::RowClassifier;
use crate::config::ExtractionConfig;
use crate::parser::{ColumnLayout, Row, TableParser};
use crate::segmenter::TableSegmenter;
use rayon::prelude::*;

/// A table found on a page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedTable {
    /// Page number (1-indexed)
    pub page: u32,
    /// Position of the source block among the page's candidate blocks
    pub block_index: usize,
    /// Index of the first source line within the page
    pub first_line: usize,
    /// How the columns were cut
    pub layout: ColumnLayout,
    /// Rows in source order, all with the same cell count
    pub rows: Vec<Row>,
}

impl ExtractedTable {
    pub fn column_count(&self) -> usize {
        self.rows.first().map(|r| r.len()).unwrap_or(0)
    }
}

/// Runs segmentation and parsing over every page
#[derive(Debug, Clone)]
pub struct ExtractionPipeline {
    segmenter: TableSegmenter,
    parser: TableParser,
    min_rows: usize,
}

impl Default for ExtractionPipeline {
    fn default() -> Self {
        Self::new(&ExtractionConfig::default())
    }
}

impl ExtractionPipeline {
    pub fn new(config: &ExtractionConfig) -> Self {
        let inferer = ColumnBoundaryInferer::new(config.min_col_width, config.drift_tolerance);
        Self {
            segmenter: TableSegmenter::with_classifier(RowClassifier::new(), config.min_rows),
            parser: TableParser::new(inferer, config.split_pipes),
            min_rows: config.min_rows,
        }
    }

    /// Extract tables from all pages, in page order then block order.
    ///
    /// Pages are processed in parallel; the result is the same as a
    /// sequential pass.
    pub fn extract(&self, pages: &[Vec<String>]) -> Vec<ExtractedTable> {
        let per_page: Vec<Vec<ExtractedTable>> = pages
            .par_iter()
            .enumerate()
            .map(|(idx, lines)| self.extract_page(idx as u32 + 1, lines))
            .collect();

        let tables: Vec<ExtractedTable> = per_page.into_iter().flatten().collect();
        log::info!(
            "extracted {} table(s) from {} page(s)",
            tables.len(),
            pages.len()
        );
        tables
    }

    /// Extract tables from a single page
    pub fn extract_page(&self, page: u32, lines: &[String]) -> Vec<ExtractedTable> {
        let mut tables = Vec::new();

        for (block_index, block) in self.segmenter.segment(lines).iter().enumerate() {
            let Some(parsed) = self.parser.parse(block) else {
                log::debug!(
                    "page {}: block {} (lines {}..{}) has no consistent columns",
                    page,
                    block_index,
                    block.start,
                    block.end()
                );
                continue;
            };

            if parsed.rows.len() < self.min_rows {
                log::debug!(
                    "page {}: block {} has {} row(s), below minimum {}",
                    page,
                    block_index,
                    parsed.rows.len(),
                    self.min_rows
                );
                continue;
            }

            tables.push(ExtractedTable {
                page,
                block_index,
                first_line: block.start,
                layout: parsed.layout,
                rows: parsed.rows,
            });
        }

        tables
    }
}

/// Extract tables with the default configuration
pub fn extract_tables(pages: &[Vec<String>]) -> Vec<ExtractedTable> {
    ExtractionPipeline::default().extract(pages)
}
