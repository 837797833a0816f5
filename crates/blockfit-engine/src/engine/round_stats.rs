use serde::{Deserialize, Serialize};

/// Size of the per-move line clear histogram. Moves clearing more lines are
/// counted in the last bucket.
const LINE_CLEAR_BUCKETS: usize = 6;

/// Round statistics.
///
/// - **Total cleared lines**: the round score. Rows and columns count
///   separately, so a move that fills a row and a column scores 2.
/// - **Placed pieces**: number of accepted placements
/// - **Batches**: dealt and fully used up
/// - **Line clear distribution**: moves by number of lines they cleared
///
/// # Example
///
/// ```
/// use blockfit_engine::RoundStats;
///
/// let mut stats = RoundStats::new();
/// stats.record_placement(2);
/// stats.record_placement(0);
///
/// assert_eq!(stats.total_cleared_lines(), 2);
/// assert_eq!(stats.placed_pieces(), 2);
/// assert_eq!(stats.line_cleared_counter()[2], 1);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundStats {
    total_cleared_lines: usize,
    placed_pieces: usize,
    dealt_batches: usize,
    completed_batches: usize,
    line_cleared_counter: [usize; LINE_CLEAR_BUCKETS],
}

impl RoundStats {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            total_cleared_lines: 0,
            placed_pieces: 0,
            dealt_batches: 0,
            completed_batches: 0,
            line_cleared_counter: [0; LINE_CLEAR_BUCKETS],
        }
    }

    /// Returns the total number of lines cleared, which is the round score.
    #[must_use]
    pub const fn total_cleared_lines(&self) -> usize {
        self.total_cleared_lines
    }

    #[must_use]
    pub const fn placed_pieces(&self) -> usize {
        self.placed_pieces
    }

    #[must_use]
    pub const fn dealt_batches(&self) -> usize {
        self.dealt_batches
    }

    #[must_use]
    pub const fn completed_batches(&self) -> usize {
        self.completed_batches
    }

    /// Returns a histogram of placements by lines cleared.
    ///
    /// Index `n` counts the moves that cleared `n` lines; the last index also
    /// counts every move that cleared more.
    #[must_use]
    pub const fn line_cleared_counter(&self) -> &[usize; LINE_CLEAR_BUCKETS] {
        &self.line_cleared_counter
    }

    /// Updates statistics after an accepted placement.
    pub fn record_placement(&mut self, cleared_lines: usize) {
        self.placed_pieces += 1;
        self.total_cleared_lines += cleared_lines;
        self.line_cleared_counter[cleared_lines.min(LINE_CLEAR_BUCKETS - 1)] += 1;
    }

    pub fn record_batch_dealt(&mut self) {
        self.dealt_batches += 1;
    }

    pub fn record_batch_completed(&mut self) {
        self.completed_batches += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_is_zero() {
        let stats = RoundStats::new();
        assert_eq!(stats, RoundStats::default());
        assert_eq!(stats.total_cleared_lines(), 0);
    }

    #[test]
    fn test_large_clears_share_last_bucket() {
        let mut stats = RoundStats::new();
        stats.record_placement(5);
        stats.record_placement(9);
        assert_eq!(stats.line_cleared_counter()[LINE_CLEAR_BUCKETS - 1], 2);
        assert_eq!(stats.total_cleared_lines(), 14);
    }

    #[test]
    fn test_batches() {
        let mut stats = RoundStats::new();
        stats.record_batch_dealt();
        stats.record_batch_dealt();
        stats.record_batch_completed();
        assert_eq!(stats.dealt_batches(), 2);
        assert_eq!(stats.completed_batches(), 1);
    }
}
