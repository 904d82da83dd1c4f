//! Extraction thresholds
//!
//! Every component receives only the values it uses: the segmenter takes
//! `min_rows`, the boundary inferer takes `min_col_width` and
//! `drift_tolerance`, the parser takes `split_pipes`.

/// Configuration for table extraction
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractionConfig {
    /// Minimum whitespace run (in characters) that counts as a column gap (default: 3)
    pub min_col_width: usize,
    /// Minimum number of rows for a block to become a table (default: 2)
    pub min_rows: usize,
    /// Maximum offset drift when matching a boundary on the next line (default: 2)
    pub drift_tolerance: usize,
    /// Split blocks whose lines all contain `|` on the pipe instead of whitespace
    pub split_pipes: bool,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            min_col_width: 3,
            min_rows: 2,
            drift_tolerance: 2,
            split_pipes: false,
        }
    }
}
