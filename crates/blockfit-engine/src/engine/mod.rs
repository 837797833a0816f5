//! Round logic built on the core data structures.
//!
//! - [`RoundController`] - Round state machine (board, batch, score, events)
//! - [`PieceGenerator`] - Random piece source, seeded by a [`PieceSeed`]
//! - [`Batch`] - Pieces offered to the player at once
//! - [`has_any_placement`] - Exhaustive check for a legal placement
//! - [`RoundConfig`] - Batch size, dealing mode and content length
//! - [`RoundStats`] - Lines cleared, pieces placed, batches used
//!
//! # Round Flow
//!
//! 1. Create a [`RoundController`] and call [`RoundController::unlock`] to deal
//!    the first batch
//! 2. Place pieces with [`RoundController::place`]; full rows and columns are
//!    cleared after every placement
//! 3. Once the batch is used up, the next batch is dealt (or awaited with
//!    manual dealing)
//! 4. The round ends when no remaining piece fits, the content runs out, or
//!    the host calls [`RoundController::terminate`]
//!
//! # Example
//!
//! ```
//! use blockfit_engine::{PlacementRequest, RoundConfig, RoundController, RoundEvent};
//!
//! let mut round = RoundController::new(RoundConfig::default())?;
//! round.unlock()?;
//!
//! while let Some(batch) = round.batch() {
//!     // Try every anchor until the first piece fits.
//!     let piece = batch.pieces()[0].clone();
//!     let anchor = (0..10)
//!         .flat_map(|row| (0..10).map(move |col| (row, col)))
//!         .find(|&(row, col)| round.board().can_place(&piece, row, col));
//!     let Some((row, col)) = anchor else { break };
//!     round.place(PlacementRequest::new(piece.id(), row, col))?;
//!     if round.stats().placed_pieces() >= 30 {
//!         break;
//!     }
//! }
//!
//! for event in round.drain_events() {
//!     if let RoundEvent::RoundEnded { summary } = event {
//!         println!("{} lines", summary.total_lines_cleared);
//!     }
//! }
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub use self::{
    batch::*, config::*, feasibility::*, piece_generator::*, round::*, round_event::*,
    round_stats::*,
};

pub(crate) mod batch;
pub(crate) mod config;
pub(crate) mod feasibility;
pub(crate) mod piece_generator;
pub(crate) mod round;
pub(crate) mod round_event;
pub(crate) mod round_stats;
