use blockfit_engine::{Board, Piece, PieceSeed, RoundConfig, RoundStats, RoundSummary};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Recorded round with everything needed to reproduce it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionRecord {
    /// Timestamp when the record was created (ISO 8601 format)
    pub recorded_at: DateTime<Utc>,
    /// Random seed used for piece generation
    pub seed: PieceSeed,
    pub config: RoundConfig,
    /// Board the round started on
    pub initial_board: Board,
    /// Accepted placements, in order
    pub moves: Vec<MoveRecord>,
    /// Requests the round rejected
    pub rejections: Vec<RejectionRecord>,
    pub stats: RoundStats,
    /// Final summary, absent if the round was still running
    pub summary: Option<RoundSummary>,
}

/// A single accepted placement.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MoveRecord {
    /// Move number (0-indexed)
    pub turn: usize,
    pub piece: Piece,
    pub row: usize,
    pub col: usize,
    pub lines_cleared: usize,
    /// Board after placement and line clears
    pub board_after: Board,
}

/// A request that was rejected, with the reason shown to the player.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RejectionRecord {
    /// Number of accepted moves before the request
    pub turn: usize,
    pub request: String,
    pub error: String,
}
