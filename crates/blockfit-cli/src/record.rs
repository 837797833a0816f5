use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::Context;
use blockfit_engine::{
    Board, PieceSeed, PlacementError, PlacementReport, PlacementRequest, RoundConfig,
    RoundController, RoundSummary, TerminateError, TerminationReason, UnlockError,
};
use chrono::Utc;

use crate::{
    schema::record::{MoveRecord, RejectionRecord, SessionRecord},
    util::Output,
};

/// Round wrapper that records every request for later replay.
#[derive(Debug)]
pub struct RecordingRound {
    seed: PieceSeed,
    initial_board: Board,
    round: RoundController,
    moves: Vec<MoveRecord>,
    rejections: Vec<RejectionRecord>,
}

impl RecordingRound {
    pub fn new(config: RoundConfig, seed: PieceSeed, board: Board) -> anyhow::Result<Self> {
        let round = RoundController::with_seed(config, seed)
            .context("Invalid round configuration")?
            .with_board(board.clone());
        Ok(Self {
            seed,
            initial_board: board,
            round,
            moves: vec![],
            rejections: vec![],
        })
    }

    pub fn round(&self) -> &RoundController {
        &self.round
    }

    pub fn round_mut(&mut self) -> &mut RoundController {
        &mut self.round
    }

    pub fn unlock(&mut self) -> Result<(), UnlockError> {
        let result = self.round.unlock();
        if let Err(e) = &result {
            self.reject("unlock".to_owned(), e);
        }
        result
    }

    pub fn place(&mut self, request: PlacementRequest) -> Result<PlacementReport, PlacementError> {
        let result = self.round.place(request);
        match &result {
            Ok(report) => self.moves.push(MoveRecord {
                turn: self.moves.len(),
                piece: report.piece.clone(),
                row: report.row,
                col: report.col,
                lines_cleared: report.lines_cleared(),
                board_after: self.round.board().clone(),
            }),
            Err(e) => {
                let PlacementRequest { piece_id, row, col } = request;
                self.reject(format!("place {piece_id} at ({row}, {col})"), e);
            }
        }
        result
    }

    pub fn terminate(&mut self, reason: TerminationReason) -> Result<RoundSummary, TerminateError> {
        match self.round.terminate(reason) {
            Ok(summary) => Ok(summary.clone()),
            Err(e) => {
                self.reject(format!("terminate ({reason})"), &e);
                Err(e)
            }
        }
    }

    fn reject(&mut self, request: String, error: &dyn std::error::Error) {
        log::debug!("rejected {request}: {error}");
        self.rejections.push(RejectionRecord {
            turn: self.moves.len(),
            request,
            error: error.to_string(),
        });
    }

    pub fn into_record(self) -> SessionRecord {
        SessionRecord {
            recorded_at: Utc::now(),
            seed: self.seed,
            config: self.round.config().clone(),
            initial_board: self.initial_board,
            moves: self.moves,
            rejections: self.rejections,
            stats: self.round.stats().clone(),
            summary: self.round.summary().cloned(),
        }
    }
}

impl SessionRecord {
    /// Saves the record to a JSON file named `round_{YYYYMMDD_HHMMSS}.json`
    /// after its timestamp.
    ///
    /// `record_dir` is created if it doesn't exist. Returns the path written.
    pub fn save(&self, record_dir: &Path) -> anyhow::Result<PathBuf> {
        fs::create_dir_all(record_dir)
            .with_context(|| format!("Failed to create directory {}", record_dir.display()))?;

        let filename = format!("round_{}.json", self.recorded_at.format("%Y%m%d_%H%M%S"));
        let filepath = record_dir.join(filename);
        Output::save_json(self, Some(filepath.clone()))?;
        Ok(filepath)
    }
}
