use super::board::{BOARD_SIZE, Board};

/// Result of a line clear sweep.
///
/// Holds the board after clearing together with the rows and columns that
/// were full before the sweep.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sweep {
    board: Board,
    rows_mask: u16,
    columns_mask: u16,
}

impl Sweep {
    #[must_use]
    pub fn board(&self) -> &Board {
        &self.board
    }

    #[must_use]
    pub fn into_board(self) -> Board {
        self.board
    }

    /// Indices of the rows that were cleared, top to bottom.
    pub fn cleared_rows(&self) -> impl Iterator<Item = usize> + '_ {
        (0..BOARD_SIZE).filter(|y| self.rows_mask & (1 << y) != 0)
    }

    /// Indices of the columns that were cleared, left to right.
    pub fn cleared_columns(&self) -> impl Iterator<Item = usize> + '_ {
        (0..BOARD_SIZE).filter(|x| self.columns_mask & (1 << x) != 0)
    }

    /// Number of cleared lines: full rows plus full columns.
    ///
    /// A cell shared by a cleared row and a cleared column counts towards both.
    #[must_use]
    pub fn lines(&self) -> usize {
        (self.rows_mask.count_ones() + self.columns_mask.count_ones()) as usize
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows_mask == 0 && self.columns_mask == 0
    }
}

/// Clears every full row and every full column of the board.
///
/// Full lines are detected on the board as given, then all of them are
/// cleared at once. Clearing a row never changes whether a column was full,
/// so the result does not depend on any clearing order.
///
/// # Example
///
/// ```
/// use blockfit_engine::{Board, sweep};
///
/// // Column 0 and the bottom row are full.
/// let mut art = "#.........\n".repeat(9);
/// art.push_str(&"#".repeat(10));
/// let board = Board::from_ascii(&art);
///
/// let sweep = sweep(&board);
/// assert_eq!(sweep.lines(), 2);
/// assert!(sweep.board().is_empty());
/// ```
#[must_use]
pub fn sweep(board: &Board) -> Sweep {
    let rows_mask = board.filled_rows_mask();
    let columns_mask = board.filled_columns_mask();

    let mut cleared = board.clone();
    if rows_mask != 0 || columns_mask != 0 {
        cleared.clear_lines(rows_mask, columns_mask);
    }
    debug_assert!(
        cleared.filled_rows_mask() == 0 && cleared.filled_columns_mask() == 0,
        "sweep left a full line behind:\n{cleared}"
    );

    Sweep {
        board: cleared,
        rows_mask,
        columns_mask,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sweep_without_full_lines() {
        let board = Board::from_ascii(
            r"
            #########.
            .#........
            .#........
            ",
        );
        let sweep = sweep(&board);
        assert!(sweep.is_empty());
        assert_eq!(sweep.lines(), 0);
        assert_eq!(sweep.board(), &board);
    }

    #[test]
    fn test_sweep_single_row() {
        let board = Board::from_ascii(
            r"
            ..#.......
            ##########
            ...#....#.
            ",
        );
        let sweep = sweep(&board);
        assert_eq!(sweep.lines(), 1);
        assert_eq!(sweep.cleared_rows().collect::<Vec<_>>(), vec![1]);
        assert_eq!(sweep.cleared_columns().count(), 0);
        assert_eq!(
            sweep.board(),
            &Board::from_ascii(
                r"
                ..#.......
                ..........
                ...#....#.
                ",
            )
        );
    }

    #[test]
    fn test_sweep_single_column() {
        let mut art = String::new();
        for y in 0..BOARD_SIZE {
            art.push_str(if y == 4 { ".....##..#\n" } else { ".....#....\n" });
        }
        let board = Board::from_ascii(&art);

        let sweep = sweep(&board);
        assert_eq!(sweep.lines(), 1);
        assert_eq!(sweep.cleared_columns().collect::<Vec<_>>(), vec![5]);
        assert_eq!(
            sweep.board(),
            &Board::from_ascii(
                r"
                ..........
                ..........
                ..........
                ..........
                ......#..#
                ",
            )
        );
    }

    #[test]
    fn test_sweep_row_and_column_intersection_counts_twice() {
        let board = Board::from_ascii(
            r"
            ...#......
            ...#......
            ##########
            ...#......
            ...#....#.
            ...#......
            ...#......
            ...#......
            ...#......
            ...#......
            ",
        );
        let sweep = sweep(&board);
        assert_eq!(sweep.lines(), 2);
        assert_eq!(sweep.cleared_rows().collect::<Vec<_>>(), vec![2]);
        assert_eq!(sweep.cleared_columns().collect::<Vec<_>>(), vec![3]);
        assert!(!sweep.board().is_occupied(2, 3));
        assert_eq!(
            sweep.board(),
            &Board::from_ascii(
                r"
                ..........
                ..........
                ..........
                ..........
                ........#.
                ",
            )
        );
    }

    #[test]
    fn test_sweep_detects_columns_before_clearing_rows() {
        // Clearing rows 0-1 first and re-scanning would miss column 0.
        let mut art = String::from("##########\n##########\n");
        for _ in 2..BOARD_SIZE {
            art.push_str("#.........\n");
        }
        let board = Board::from_ascii(&art);

        let sweep = sweep(&board);
        assert_eq!(sweep.lines(), 3);
        assert!(sweep.board().is_empty());
    }

    #[test]
    fn test_sweep_full_board() {
        let art = "##########\n".repeat(BOARD_SIZE);
        let board = Board::from_ascii(&art);

        let sweep = sweep(&board);
        assert_eq!(sweep.lines(), 2 * BOARD_SIZE);
        assert!(sweep.board().is_empty());
    }

    #[test]
    fn test_sweep_leaves_input_untouched() {
        let board = Board::from_ascii("##########");
        let before = board.clone();
        let _ = sweep(&board);
        assert_eq!(board, before);
    }
}
