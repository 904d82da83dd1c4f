//! Grouping of consecutive table rows into candidate blocks

use crate::classifier::RowClassifier;

/// A contiguous run of lines believed to form one table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TableBlock<'a> {
    /// Index of the first line within its page
    pub start: usize,
    lines: &'a [String],
}

impl<'a> TableBlock<'a> {
    /// Create a block over `lines`, starting at line `start` of the page.
    /// Returns `None` for an empty slice.
    pub fn new(start: usize, lines: &'a [String]) -> Option<Self> {
        if lines.is_empty() {
            None
        } else {
            Some(Self { start, lines })
        }
    }

    pub fn lines(&self) -> &'a [String] {
        self.lines
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Index one past the last line of the block
    pub fn end(&self) -> usize {
        self.start + self.lines.len()
    }
}

/// Splits a page's lines into candidate table blocks
#[derive(Debug, Clone, Copy)]
pub struct TableSegmenter {
    classifier: RowClassifier,
    min_rows: usize,
}

impl TableSegmenter {
    pub fn new(min_rows: usize) -> Self {
        Self::with_classifier(RowClassifier::new(), min_rows)
    }

    pub fn with_classifier(classifier: RowClassifier, min_rows: usize) -> Self {
        Self {
            classifier,
            min_rows,
        }
    }

    /// Find runs of consecutive table rows at least `min_rows` long.
    ///
    /// Any non-table line ends the current run. Short runs are discarded
    /// and never merged with a later run.
    pub fn segment<'a>(&self, lines: &'a [String]) -> Vec<TableBlock<'a>> {
        let mut blocks = Vec::new();
        let mut run_start: Option<usize> = None;

        for (idx, line) in lines.iter().enumerate() {
            if self.classifier.is_table_row(line) {
                if run_start.is_none() {
                    run_start = Some(idx);
                }
            } else if let Some(start) = run_start.take() {
                self.close_run(lines, start, idx, &mut blocks);
            }
        }

        // Flush the run still open at end of input
        if let Some(start) = run_start {
            self.close_run(lines, start, lines.len(), &mut blocks);
        }

        blocks
    }

    fn close_run<'a>(
        &self,
        lines: &'a [String],
        start: usize,
        end: usize,
        blocks: &mut Vec<TableBlock<'a>>,
    ) {
        let len = end - start;
        if len < self.min_rows.max(1) {
            log::trace!("discarding run of {} line(s) at line {}", len, start);
            return;
        }
        if let Some(block) = TableBlock::new(start, &lines[start..end]) {
            blocks.push(block);
        }
    }
}
