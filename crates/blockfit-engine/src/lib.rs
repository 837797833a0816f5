//! Grid block-placement puzzle engine.
//!
//! A 10×10 board receives pieces from a small batch. Every placement that
//! completes a row or column clears it, and the round ends when no piece of
//! the remaining batch fits anywhere on the board.
//!
//! - [`core`] holds the pure data structures: pieces, the board and the line
//!   clear sweep.
//! - [`engine`] drives a round: piece generation, feasibility checks and the
//!   [`RoundController`] state machine.

pub use self::{core::*, engine::*};

pub mod core;
pub mod engine;

#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum PlacementError {
    #[display("no batch is available for placement")]
    NoBatch,
    #[display("piece {piece_id} is not in the current batch")]
    UnknownPiece { piece_id: PieceId },
    #[display("piece {piece_id} does not fit at row {row}, column {col}")]
    InvalidPosition {
        piece_id: PieceId,
        row: usize,
        col: usize,
    },
    #[display("round already terminated ({reason})")]
    RoundTerminated { reason: TerminationReason },
}

#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum UnlockError {
    #[display("current batch still has pieces to place")]
    BatchInProgress,
    #[display("round already terminated ({reason})")]
    RoundTerminated { reason: TerminationReason },
}

#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
#[display("round already terminated ({reason})")]
pub struct TerminateError {
    pub reason: TerminationReason,
}
