use std::collections::VecDeque;

use crate::{
    Board, PlacementError, TerminateError, UnlockError,
    core::line_clear,
    engine::{
        batch::Batch,
        config::{ConfigError, RoundConfig},
        feasibility,
        piece_generator::{PieceGenerator, PieceSeed, PieceSource},
        round_event::{
            PlacementReport, PlacementRequest, RoundEvent, RoundSummary, TerminationReason,
        },
        round_stats::RoundStats,
    },
};

/// Lifecycle of a round.
///
/// `Terminated` is absorbing: once entered, the round never changes again.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::IsVariant)]
pub enum RoundState {
    /// No batch was dealt yet.
    Idle,
    /// The previous batch was used up; waiting for [`RoundController::unlock`].
    AwaitingBatch,
    /// Pieces of the current batch can be placed.
    PiecesAvailable(Batch),
    Terminated(TerminationReason),
}

/// Drives a single round: deals batches, applies placements, clears lines
/// and detects the end of the round.
///
/// The controller is the only owner of the board and the batch. Hosts feed it
/// unlock, placement and terminate requests and drain the resulting
/// [`RoundEvent`]s.
///
/// # Example
///
/// ```
/// use blockfit_engine::{PieceSeed, PlacementRequest, RoundConfig, RoundController};
///
/// let mut round = RoundController::with_seed(RoundConfig::default(), PieceSeed::from_bytes([1; 16]))?;
/// round.unlock()?;
///
/// let piece = round.batch().unwrap().pieces()[0].clone();
/// let report = round.place(PlacementRequest::new(piece.id(), 0, 0))?;
///
/// assert_eq!(report.lines_cleared(), 0);
/// assert_eq!(round.board().occupied_count(), 4);
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Debug, Clone)]
pub struct RoundController<S = PieceGenerator> {
    config: RoundConfig,
    source: S,
    board: Board,
    state: RoundState,
    stats: RoundStats,
    summary: Option<RoundSummary>,
    events: VecDeque<RoundEvent>,
}

impl RoundController {
    /// Creates a round dealing random pieces.
    pub fn new(config: RoundConfig) -> Result<Self, ConfigError> {
        Self::with_source(config, PieceGenerator::new())
    }

    /// Like [`Self::new`], with a reproducible piece sequence.
    pub fn with_seed(config: RoundConfig, seed: PieceSeed) -> Result<Self, ConfigError> {
        Self::with_source(config, PieceGenerator::with_seed(seed))
    }
}

impl<S> RoundController<S>
where
    S: PieceSource,
{
    pub fn with_source(config: RoundConfig, source: S) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            config,
            source,
            board: Board::EMPTY,
            state: RoundState::Idle,
            stats: RoundStats::new(),
            summary: None,
            events: VecDeque::new(),
        })
    }

    /// Starts the round on a partially filled board.
    #[must_use]
    pub fn with_board(mut self, board: Board) -> Self {
        self.board = board;
        self
    }

    #[must_use]
    pub fn config(&self) -> &RoundConfig {
        &self.config
    }

    #[must_use]
    pub fn board(&self) -> &Board {
        &self.board
    }

    #[must_use]
    pub fn state(&self) -> &RoundState {
        &self.state
    }

    /// Returns the current batch, if pieces are available.
    #[must_use]
    pub fn batch(&self) -> Option<&Batch> {
        match &self.state {
            RoundState::PiecesAvailable(batch) => Some(batch),
            _ => None,
        }
    }

    /// Returns the round score: the number of rows and columns cleared so far.
    #[must_use]
    pub fn score(&self) -> usize {
        self.stats.total_cleared_lines()
    }

    #[must_use]
    pub fn stats(&self) -> &RoundStats {
        &self.stats
    }

    /// Returns the final summary once the round has terminated.
    #[must_use]
    pub fn summary(&self) -> Option<&RoundSummary> {
        self.summary.as_ref()
    }

    #[must_use]
    pub fn termination_reason(&self) -> Option<TerminationReason> {
        match self.state {
            RoundState::Terminated(reason) => Some(reason),
            _ => None,
        }
    }

    /// Removes and returns the queued events, oldest first.
    pub fn drain_events(&mut self) -> impl Iterator<Item = RoundEvent> + '_ {
        self.events.drain(..)
    }

    /// Deals a fresh batch.
    ///
    /// If none of the dealt pieces fits the board, the round terminates with
    /// [`TerminationReason::NoFit`] right away.
    pub fn unlock(&mut self) -> Result<(), UnlockError> {
        match self.state {
            RoundState::Idle | RoundState::AwaitingBatch => {
                self.deal();
                Ok(())
            }
            RoundState::PiecesAvailable(_) => Err(UnlockError::BatchInProgress),
            RoundState::Terminated(reason) => Err(UnlockError::RoundTerminated { reason }),
        }
    }

    /// Places a piece of the current batch with its top-left corner at
    /// `(row, col)`.
    ///
    /// A rejected request leaves the round untouched. An accepted one clears
    /// every full row and column, then either keeps the round going, deals or
    /// awaits the next batch, or terminates the round.
    pub fn place(&mut self, request: PlacementRequest) -> Result<PlacementReport, PlacementError> {
        let PlacementRequest { piece_id, row, col } = request;
        let batch = match &mut self.state {
            RoundState::PiecesAvailable(batch) => batch,
            RoundState::Idle | RoundState::AwaitingBatch => {
                log::trace!("rejected {piece_id}: no batch");
                return Err(PlacementError::NoBatch);
            }
            RoundState::Terminated(reason) => {
                return Err(PlacementError::RoundTerminated { reason: *reason });
            }
        };

        let Some(piece) = batch.get(piece_id).cloned() else {
            log::trace!("rejected {piece_id}: not in batch");
            return Err(PlacementError::UnknownPiece { piece_id });
        };
        if !self.board.place(&piece, row, col) {
            log::trace!("rejected {piece_id} at ({row}, {col})");
            return Err(PlacementError::InvalidPosition { piece_id, row, col });
        }
        batch.take(piece_id);

        let sweep = line_clear::sweep(&self.board);
        let cleared_rows: Vec<usize> = sweep.cleared_rows().collect();
        let cleared_columns: Vec<usize> = sweep.cleared_columns().collect();
        let lines = sweep.lines();
        self.board = sweep.into_board();
        self.stats.record_placement(lines);
        log::debug!(
            "placed {piece_id} at ({row}, {col}), cleared rows {cleared_rows:?} columns {cleared_columns:?}"
        );
        self.events.push_back(RoundEvent::PiecePlaced {
            piece_id,
            row,
            col,
            lines_cleared: lines,
        });

        let termination = if batch.is_empty() {
            self.complete_batch()
        } else if feasibility::has_any_placement(&self.board, &*batch) {
            None
        } else {
            self.finish(TerminationReason::NoFit);
            Some(TerminationReason::NoFit)
        };

        Ok(PlacementReport {
            piece,
            row,
            col,
            cleared_rows,
            cleared_columns,
            total_lines_cleared: self.stats.total_cleared_lines(),
            termination,
        })
    }

    /// Ends the round from outside, e.g. when the quiz gate runs out of time.
    pub fn terminate(&mut self, reason: TerminationReason) -> Result<&RoundSummary, TerminateError> {
        if let RoundState::Terminated(current) = self.state {
            return Err(TerminateError { reason: current });
        }
        Ok(self.finish(reason))
    }

    fn deal(&mut self) -> Option<TerminationReason> {
        let batch = Batch::deal(&mut self.source, self.config.batch_size);
        self.stats.record_batch_dealt();
        log::debug!(
            "dealt batch #{}: {:?}",
            self.stats.dealt_batches(),
            batch.iter().map(|p| p.kind().as_char()).collect::<String>()
        );
        self.events.push_back(RoundEvent::BatchDealt {
            pieces: batch.pieces().to_vec(),
        });

        let fits = feasibility::has_any_placement(&self.board, &batch);
        self.state = RoundState::PiecesAvailable(batch);
        if fits {
            return None;
        }
        self.finish(TerminationReason::NoFit);
        Some(TerminationReason::NoFit)
    }

    fn complete_batch(&mut self) -> Option<TerminationReason> {
        self.stats.record_batch_completed();
        let content_exhausted = self
            .config
            .content_units
            .is_some_and(|units| self.stats.completed_batches() >= units.get());
        if content_exhausted {
            self.finish(TerminationReason::Completed);
            return Some(TerminationReason::Completed);
        }
        if self.config.auto_deal {
            return self.deal();
        }
        self.state = RoundState::AwaitingBatch;
        self.events.push_back(RoundEvent::AwaitingBatch);
        None
    }

    /// Enters the terminal state. Callers guarantee the round was not yet
    /// terminated, so the summary is produced exactly once.
    fn finish(&mut self, reason: TerminationReason) -> &RoundSummary {
        debug_assert!(self.summary.is_none(), "round terminated twice");
        self.state = RoundState::Terminated(reason);
        let summary = RoundSummary::new(&self.stats, reason);
        log::info!(
            "round ended ({reason}): {} lines cleared, {} pieces placed",
            summary.total_lines_cleared,
            summary.placed_pieces
        );
        self.events.push_back(RoundEvent::RoundEnded {
            summary: summary.clone(),
        });
        self.summary.insert(summary)
    }
}
