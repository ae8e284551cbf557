//! Batch planning
//!
//! Splits ranks `1..=N` into consecutive batches, either by a fixed chunk size
//! or by a list of cumulative checkpoints such as `10,20,25`.

use std::fmt;

/// A contiguous, 1-based inclusive range of ranks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Batch {
    pub index: usize,
    pub total: usize,
    pub start_rank: usize,
    pub end_rank: usize,
}

impl Batch {
    pub fn new(index: usize, total: usize, start_rank: usize, end_rank: usize) -> Self {
        Self {
            index,
            total,
            start_rank,
            end_rank,
        }
    }

    pub fn contains(&self, rank: usize) -> bool {
        self.start_rank <= rank && rank <= self.end_rank
    }

    pub fn len(&self) -> usize {
        self.end_rank + 1 - self.start_rank
    }

    pub fn is_empty(&self) -> bool {
        self.end_rank < self.start_rank
    }

    /// `i/n` label used in progress lines
    pub fn label(&self) -> String {
        format!("{}/{}", self.index, self.total)
    }
}

impl fmt::Display for Batch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.index, self.total)
    }
}

/// Ordered, gap-free partition of ranks into batches
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchPlan {
    batches: Vec<Batch>,
}

impl BatchPlan {
    /// Fixed-size batches over `total` ranks (chunk size is clamped to at least 1)
    pub fn chunked(total: usize, chunk_size: usize) -> Self {
        Self::from_targets(total, &chunked_targets(total, chunk_size))
    }

    /// Batches cut at cumulative checkpoints, with any tail up to `total` appended
    pub fn from_targets(total: usize, targets: &[usize]) -> Self {
        let ranges = batch_ranges(total, targets);
        let count = ranges.len();
        let batches = ranges
            .into_iter()
            .enumerate()
            .map(|(i, (start, end))| Batch::new(i + 1, count, start + 1, end))
            .collect();
        Self { batches }
    }

    /// Checkpoints when given, chunk size otherwise
    pub fn build(total: usize, targets: Option<&[usize]>, chunk_size: usize) -> Self {
        match targets {
            Some(targets) if !targets.is_empty() => Self::from_targets(total, targets),
            _ => Self::chunked(total, chunk_size),
        }
    }

    /// A single explicit batch, as run by a batch child process
    pub fn single(batch: Batch) -> Self {
        Self {
            batches: vec![batch],
        }
    }

    pub fn batches(&self) -> &[Batch] {
        &self.batches
    }

    pub fn len(&self) -> usize {
        self.batches.len()
    }

    pub fn is_empty(&self) -> bool {
        self.batches.is_empty()
    }

    /// Position in `batches()` of the batch holding `rank`
    pub fn position_of(&self, rank: usize) -> Option<usize> {
        self.batches.iter().position(|batch| batch.contains(rank))
    }
}

/// Parse a comma-separated checkpoint list
///
/// Non-positive values are dropped, values above `final_top` are clamped to
/// it, the result is sorted and deduplicated, and `final_top` is appended when
/// missing. An empty list means a single checkpoint at `final_top`.
pub fn parse_batch_targets(raw: &str, final_top: usize) -> Result<Vec<usize>, String> {
    let mut targets = Vec::new();
    for part in raw.split(',').map(str::trim).filter(|p| !p.is_empty()) {
        let value: i64 = part
            .parse()
            .map_err(|_| format!("Invalid batch target '{}': expected an integer", part))?;
        if value <= 0 {
            continue;
        }
        targets.push((value as usize).min(final_top));
    }

    if targets.is_empty() {
        return Ok(vec![final_top]);
    }

    targets.sort_unstable();
    targets.dedup();
    if targets.last().is_some_and(|&last| last < final_top) {
        targets.push(final_top);
    }
    Ok(targets)
}

/// Parse an `i/n` batch label
pub fn parse_batch_label(label: &str) -> Option<(usize, usize)> {
    let (index, total) = label.trim().split_once('/')?;
    let index: usize = index.trim().parse().ok()?;
    let total: usize = total.trim().parse().ok()?;
    if index == 0 || total == 0 || index > total {
        return None;
    }
    Some((index, total))
}

fn chunked_targets(final_top: usize, chunk_size: usize) -> Vec<usize> {
    let step = chunk_size.max(1);
    let mut targets: Vec<usize> = (step..=final_top).step_by(step).collect();
    if targets.last() != Some(&final_top) {
        targets.push(final_top);
    }
    targets
}

/// Zero-based half-open ranges `(start, end)` cut at each target
fn batch_ranges(total: usize, targets: &[usize]) -> Vec<(usize, usize)> {
    let mut ranges = Vec::new();
    let mut prev = 0;
    for &target in targets {
        let end = target.min(total);
        if end > prev {
            ranges.push((prev, end));
            prev = end;
        }
    }
    if prev < total {
        ranges.push((prev, total));
    }
    ranges
}
