//! Messages exchanged between a round and its host.

use serde::{Deserialize, Serialize};

use crate::{Piece, PieceId, PlacementError, RoundStats};

/// Why a round ended.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    derive_more::Display,
    derive_more::IsVariant,
)]
#[serde(rename_all = "kebab-case")]
pub enum TerminationReason {
    /// All configured content was played.
    #[display("completed")]
    Completed,
    /// No piece of the batch fits anywhere on the board.
    #[display("no-fit")]
    NoFit,
    /// The quiz gate reported too many wrong answers.
    #[display("error-limit")]
    ErrorLimit,
    /// A time limit ran out.
    #[display("time-up")]
    TimeUp,
}

impl TerminationReason {
    pub const ALL: [Self; 4] = [Self::Completed, Self::NoFit, Self::ErrorLimit, Self::TimeUp];
}

/// Final result of a round, emitted once when it terminates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundSummary {
    pub total_lines_cleared: usize,
    pub termination_reason: TerminationReason,
    pub placed_pieces: usize,
    pub completed_batches: usize,
}

impl RoundSummary {
    pub(crate) fn new(stats: &RoundStats, reason: TerminationReason) -> Self {
        Self {
            total_lines_cleared: stats.total_cleared_lines(),
            termination_reason: reason,
            placed_pieces: stats.placed_pieces(),
            completed_batches: stats.completed_batches(),
        }
    }
}

/// Placement proposed by the player.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlacementRequest {
    pub piece_id: PieceId,
    pub row: usize,
    pub col: usize,
}

impl PlacementRequest {
    #[must_use]
    pub const fn new(piece_id: PieceId, row: usize, col: usize) -> Self {
        Self { piece_id, row, col }
    }
}

/// Outcome of an accepted placement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlacementReport {
    pub piece: Piece,
    pub row: usize,
    pub col: usize,
    pub cleared_rows: Vec<usize>,
    pub cleared_columns: Vec<usize>,
    /// Round score after this move.
    pub total_lines_cleared: usize,
    /// Set when this move ended the round.
    pub termination: Option<TerminationReason>,
}

impl PlacementReport {
    /// Lines cleared by this move (rows plus columns).
    #[must_use]
    pub fn lines_cleared(&self) -> usize {
        self.cleared_rows.len() + self.cleared_columns.len()
    }
}

/// Compact answer to a placement request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlacementResponse {
    pub accepted: bool,
    pub lines_cleared_this_move: usize,
}

impl From<&Result<PlacementReport, PlacementError>> for PlacementResponse {
    fn from(result: &Result<PlacementReport, PlacementError>) -> Self {
        match result {
            Ok(report) => Self {
                accepted: true,
                lines_cleared_this_move: report.lines_cleared(),
            },
            Err(_) => Self {
                accepted: false,
                lines_cleared_this_move: 0,
            },
        }
    }
}

/// Notifications queued by the round controller for its host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, derive_more::IsVariant)]
#[serde(tag = "event", rename_all = "kebab-case")]
pub enum RoundEvent {
    /// A fresh batch is available.
    BatchDealt { pieces: Vec<Piece> },
    /// A placement was accepted.
    PiecePlaced {
        piece_id: PieceId,
        row: usize,
        col: usize,
        lines_cleared: usize,
    },
    /// Every piece of the batch was used and the round waits for the next unlock.
    AwaitingBatch,
    /// The round terminated. Queued exactly once.
    RoundEnded { summary: RoundSummary },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_termination_reason_wire_names() {
        let names = ["completed", "no-fit", "error-limit", "time-up"];
        for (reason, name) in TerminationReason::ALL.into_iter().zip(names) {
            assert_eq!(reason.to_string(), name);
            assert_eq!(serde_json::to_string(&reason).unwrap(), format!("\"{name}\""));
        }
    }

    #[test]
    fn test_summary_serialization() {
        let summary = RoundSummary {
            total_lines_cleared: 4,
            termination_reason: TerminationReason::NoFit,
            placed_pieces: 9,
            completed_batches: 3,
        };
        let json = serde_json::to_value(&summary).unwrap();
        assert_eq!(json["total_lines_cleared"], 4);
        assert_eq!(json["termination_reason"], "no-fit");
    }

    #[test]
    fn test_rejected_response() {
        let result = Err(PlacementError::NoBatch);
        assert_eq!(
            PlacementResponse::from(&result),
            PlacementResponse {
                accepted: false,
                lines_cleared_this_move: 0
            }
        );
    }

    #[test]
    fn test_event_tagging() {
        let event = RoundEvent::PiecePlaced {
            piece_id: PieceId::new(3),
            row: 1,
            col: 2,
            lines_cleared: 0,
        };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["event"], "piece-placed");
        assert_eq!(json["piece_id"], 3);
    }
}
