use crate::{BOARD_SIZE, Board, Piece};

/// Checks whether the piece fits anywhere on the board.
#[must_use]
pub fn piece_fits_anywhere(board: &Board, piece: &Piece) -> bool {
    (0..BOARD_SIZE).any(|row| (0..BOARD_SIZE).any(|col| board.can_place(piece, row, col)))
}

/// Checks whether at least one of the pieces can be placed somewhere.
///
/// Tries every piece at every anchor of the board and stops at the first
/// legal placement. Returns `false` only after every combination has been
/// rejected, and always `false` for an empty collection.
///
/// # Example
///
/// ```
/// use blockfit_engine::{Board, Piece, PieceId, PieceRotation, ShapeKind, has_any_placement};
///
/// let square = Piece::new(PieceId::new(0), ShapeKind::O, PieceRotation::default());
/// assert!(has_any_placement(&Board::EMPTY, [&square]));
/// ```
pub fn has_any_placement<'a, I>(board: &Board, pieces: I) -> bool
where
    I: IntoIterator<Item = &'a Piece>,
{
    pieces
        .into_iter()
        .any(|piece| piece_fits_anywhere(board, piece))
}
