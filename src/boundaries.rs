//! Column boundary inference from whitespace geometry
//!
//! Each line contributes candidate boundaries at the end of every wide
//! whitespace run. The first line seeds the consensus; each later line keeps
//! only the seeds it can match within the drift tolerance, and the matched
//! offset replaces the seed so columns may drift slightly down the block.
//! Only boundaries present on every line survive.

use crate::segmenter::TableBlock;

/// A run of whitespace `[start, end)` in character offsets
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WhitespaceRun {
    pub start: usize,
    pub end: usize,
}

impl WhitespaceRun {
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.end == self.start
    }
}

/// Strictly increasing, non-empty column split offsets
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoundarySet {
    offsets: Vec<usize>,
}

impl BoundarySet {
    /// Build from offsets; returns `None` if empty or not strictly increasing
    pub fn new(offsets: Vec<usize>) -> Option<Self> {
        if offsets.is_empty() || offsets.windows(2).any(|w| w[0] >= w[1]) {
            return None;
        }
        Some(Self { offsets })
    }

    pub fn offsets(&self) -> &[usize] {
        &self.offsets
    }

    pub fn len(&self) -> usize {
        self.offsets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.offsets.is_empty()
    }

    /// Number of cells each row is sliced into
    pub fn column_count(&self) -> usize {
        self.offsets.len() + 1
    }
}

/// Find whitespace runs of at least `min_width` characters.
///
/// A run is only closed by a following non-whitespace character, so
/// trailing whitespace never produces a run.
pub fn whitespace_runs(line: &str, min_width: usize) -> Vec<WhitespaceRun> {
    let mut runs = Vec::new();
    let mut run_start: Option<usize> = None;

    for (i, c) in line.chars().enumerate() {
        if c.is_whitespace() {
            if run_start.is_none() {
                run_start = Some(i);
            }
        } else if let Some(start) = run_start.take() {
            let run = WhitespaceRun { start, end: i };
            if run.len() >= min_width {
                runs.push(run);
            }
        }
    }

    runs
}

/// Infers a consistent set of column boundaries for a block
#[derive(Debug, Clone, Copy)]
pub struct ColumnBoundaryInferer {
    min_col_width: usize,
    drift_tolerance: usize,
}

impl ColumnBoundaryInferer {
    pub fn new(min_col_width: usize, drift_tolerance: usize) -> Self {
        Self {
            min_col_width,
            drift_tolerance,
        }
    }

    /// Candidate boundaries for one line: end offsets of wide whitespace runs
    pub fn candidates(&self, line: &str) -> Vec<usize> {
        whitespace_runs(line, self.min_col_width)
            .into_iter()
            .map(|run| run.end)
            .collect()
    }

    /// Infer boundaries shared by every line of the block.
    ///
    /// Returns `None` when no boundary survives, meaning the block is not
    /// a table.
    pub fn infer(&self, block: &TableBlock<'_>) -> Option<BoundarySet> {
        let (first, rest) = block.lines().split_first()?;
        let mut consensus = self.candidates(first);

        for line in rest {
            if consensus.is_empty() {
                break;
            }
            let candidates = self.candidates(line);
            consensus = self.refine(&consensus, &candidates);
        }

        BoundarySet::new(consensus)
    }

    /// Keep each seed that has a candidate within tolerance, moved to the
    /// leftmost such candidate. Two seeds landing on one candidate keep it once.
    fn refine(&self, seeds: &[usize], candidates: &[usize]) -> Vec<usize> {
        let mut kept: Vec<usize> = Vec::with_capacity(seeds.len());
        for &seed in seeds {
            let matched = candidates
                .iter()
                .copied()
                .find(|&c| c.abs_diff(seed) <= self.drift_tolerance);
            if let Some(offset) = matched {
                if kept.last() != Some(&offset) {
                    kept.push(offset);
                }
            }
        }
        kept
    }
}
