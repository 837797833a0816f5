use std::{fmt, fmt::Write as _, str::FromStr};

use serde::{Deserialize, Serialize};

use super::piece::Piece;

/// Side length of the square board.
pub const BOARD_SIZE: usize = 10;

// Bits 0-9 are the cells of a row (bit N corresponds to column N).
const FULL_ROW_MASK: u16 = (1 << BOARD_SIZE) - 1;

/// Single row of the board, stored as a bitmask.
///
/// # Bit Layout (LSB to MSB)
///
/// - Bits 0-9: cells in columns 0-9
/// - Bits 10-15: unused, always zero
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BoardRow {
    bits: u16,
}

impl BoardRow {
    pub const EMPTY: Self = Self { bits: 0 };
    pub const FULL: Self = Self {
        bits: FULL_ROW_MASK,
    };

    /// Checks if every cell of the row is occupied.
    #[inline]
    #[must_use]
    pub fn is_filled(self) -> bool {
        self.bits == FULL_ROW_MASK
    }

    /// Returns whether the cell in `col` is occupied. Columns past the edge
    /// are never occupied.
    #[inline]
    #[must_use]
    pub fn is_cell_occupied(self, col: usize) -> bool {
        col < BOARD_SIZE && (self.bits & (1 << col)) != 0
    }

    #[inline]
    #[must_use]
    pub fn occupied_count(self) -> usize {
        self.bits.count_ones() as usize
    }

    #[inline]
    fn occupy_cell(&mut self, col: usize) {
        self.bits |= 1 << col;
    }

    #[inline]
    pub(crate) fn bits(self) -> u16 {
        self.bits
    }

    #[inline]
    pub(crate) fn clear_cells(&mut self, mask: u16) {
        self.bits &= !mask;
    }

    /// Iterates over the cells of the row, returning their occupied status.
    #[inline]
    pub fn iter_cells(self) -> impl Iterator<Item = bool> {
        (0..BOARD_SIZE).map(move |col| self.is_cell_occupied(col))
    }
}

/// Fixed-size occupancy grid.
///
/// The board is the single source of truth for which cells are filled. Each
/// row is a [`BoardRow`] bitmask, so every cell is either empty or occupied.
///
/// # Coordinate System
///
/// - `(0, 0)` is the top-left cell
/// - rows increase downward, columns increase rightward
///
/// # Example
///
/// ```
/// use blockfit_engine::{Board, Piece, PieceId, PieceRotation, ShapeKind};
///
/// let mut board = Board::EMPTY;
/// let square = Piece::new(PieceId::new(0), ShapeKind::O, PieceRotation::default());
///
/// assert!(board.place(&square, 0, 0));
/// assert!(!board.can_place(&square, 1, 1));
/// assert!(!board.can_place(&square, 9, 9));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Board {
    rows: [BoardRow; BOARD_SIZE],
}

impl Serialize for Board {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        // Format: "000,3ff,010,..." (comma-separated hex row masks, top to bottom)
        let mut hex_string = String::with_capacity(BOARD_SIZE * 4);
        for (i, row) in self.rows.iter().enumerate() {
            if i > 0 {
                hex_string.push(',');
            }
            write!(&mut hex_string, "{:03x}", row.bits).map_err(serde::ser::Error::custom)?;
        }
        serializer.serialize_str(&hex_string)
    }
}

impl<'de> Deserialize<'de> for Board {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;

        let parts: Vec<&str> = s.split(',').collect();
        if parts.len() != BOARD_SIZE {
            return Err(serde::de::Error::custom(format!(
                "expected {} comma-separated hex values, got {}",
                BOARD_SIZE,
                parts.len()
            )));
        }

        let mut rows = [BoardRow::EMPTY; BOARD_SIZE];
        for (i, hex_str) in parts.iter().enumerate() {
            let bits = u16::from_str_radix(hex_str, 16).map_err(|e| {
                serde::de::Error::custom(format!("invalid hex at row {i}: {hex_str} ({e})"))
            })?;
            if bits & !FULL_ROW_MASK != 0 {
                return Err(serde::de::Error::custom(format!(
                    "row {i} has bits outside the board: {hex_str}"
                )));
            }
            rows[i] = BoardRow { bits };
        }

        Ok(Board { rows })
    }
}

/// Error returned when parsing a board from ASCII art fails.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum ParseBoardError {
    #[display("each row must have exactly 10 cells, got {cells} at row {row}")]
    RowWidth { row: usize, cells: usize },
    #[display("board must have at most 10 rows, got {rows}")]
    TooManyRows { rows: usize },
}

impl FromStr for Board {
    type Err = ParseBoardError;

    /// Parses ASCII art: `#` is an occupied cell, `.` an empty one.
    ///
    /// Blank lines and any other characters are ignored. Missing rows at the
    /// bottom are empty.
    fn from_str(art: &str) -> Result<Self, Self::Err> {
        let lines: Vec<&str> = art.lines().filter(|line| !line.trim().is_empty()).collect();
        if lines.len() > BOARD_SIZE {
            return Err(ParseBoardError::TooManyRows { rows: lines.len() });
        }

        let mut board = Self::EMPTY;
        for (row, line) in lines.iter().enumerate() {
            let cells: Vec<char> = line.chars().filter(|c| *c == '#' || *c == '.').collect();
            if cells.len() != BOARD_SIZE {
                return Err(ParseBoardError::RowWidth {
                    row,
                    cells: cells.len(),
                });
            }
            for (col, &ch) in cells.iter().enumerate() {
                if ch == '#' {
                    board.rows[row].occupy_cell(col);
                }
            }
        }
        Ok(board)
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, row) in self.rows.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            for occupied in row.iter_cells() {
                f.write_char(if occupied { '#' } else { '.' })?;
            }
        }
        Ok(())
    }
}

impl Board {
    pub const SIZE: usize = BOARD_SIZE;

    pub const EMPTY: Self = Self {
        rows: [BoardRow::EMPTY; BOARD_SIZE],
    };

    /// Creates a board from ASCII art for tests and fixtures.
    ///
    /// See [`Board::from_str`] for the format.
    ///
    /// # Panics
    ///
    /// Panics if the art is malformed.
    #[must_use]
    pub fn from_ascii(art: &str) -> Self {
        art.parse()
            .unwrap_or_else(|e| panic!("invalid board art: {e}"))
    }

    /// Returns the row at index `row`.
    ///
    /// # Panics
    ///
    /// Panics if `row` is not less than [`BOARD_SIZE`]. Use
    /// [`Board::is_occupied`] for unchecked coordinates.
    #[must_use]
    pub fn row(&self, row: usize) -> BoardRow {
        self.rows[row]
    }

    pub fn rows(&self) -> impl Iterator<Item = BoardRow> + '_ {
        self.rows.iter().copied()
    }

    /// Returns whether the cell is occupied. Out-of-bounds cells count as
    /// occupied.
    #[must_use]
    pub fn is_occupied(&self, row: usize, col: usize) -> bool {
        row >= BOARD_SIZE || col >= BOARD_SIZE || self.rows[row].is_cell_occupied(col)
    }

    #[must_use]
    pub fn occupied_count(&self) -> usize {
        self.rows.iter().map(|row| row.occupied_count()).sum()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.iter().all(|row| *row == BoardRow::EMPTY)
    }

    /// Checks whether the piece fits with its origin at `(row, col)`.
    ///
    /// Every cell of the piece must land inside the board on an empty cell.
    #[must_use]
    pub fn can_place(&self, piece: &Piece, row: usize, col: usize) -> bool {
        piece.cells().iter().all(|cell| {
            match (row.checked_add(cell.row()), col.checked_add(cell.col())) {
                (Some(r), Some(c)) => !self.is_occupied(r, c),
                _ => false,
            }
        })
    }

    /// Fills the piece's cells if it fits at `(row, col)`.
    ///
    /// Returns `false` and leaves the board untouched when the piece does not
    /// fit.
    pub fn place(&mut self, piece: &Piece, row: usize, col: usize) -> bool {
        if !self.can_place(piece, row, col) {
            return false;
        }
        for (r, c) in piece.occupied_positions(row, col) {
            self.rows[r].occupy_cell(c);
        }
        true
    }

    /// Bitmask of the columns whose every cell is occupied.
    pub(crate) fn filled_columns_mask(&self) -> u16 {
        self.rows
            .iter()
            .fold(FULL_ROW_MASK, |acc, row| acc & row.bits())
    }

    /// Bitmask of the rows whose every cell is occupied.
    pub(crate) fn filled_rows_mask(&self) -> u16 {
        self.rows
            .iter()
            .enumerate()
            .filter(|(_, row)| row.is_filled())
            .fold(0, |acc, (y, _)| acc | (1 << y))
    }

    /// Empties the given rows and columns in one step.
    pub(crate) fn clear_lines(&mut self, rows_mask: u16, columns_mask: u16) {
        for (y, row) in self.rows.iter_mut().enumerate() {
            if rows_mask & (1 << y) != 0 {
                *row = BoardRow::EMPTY;
            } else {
                row.clear_cells(columns_mask);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{PieceId, PieceRotation, ShapeKind};

    fn piece(kind: ShapeKind, rotation: u8) -> Piece {
        Piece::new(PieceId::new(0), kind, PieceRotation::new(rotation))
    }

    fn all_pieces() -> impl Iterator<Item = Piece> {
        ShapeKind::ALL
            .into_iter()
            .flat_map(|kind| (0..4).map(move |rotation| piece(kind, rotation)))
    }

    /// Reference definition of a legal placement, cell by cell.
    fn fits_by_definition(board: &Board, piece: &Piece, row: usize, col: usize) -> bool {
        piece.cells().iter().all(|cell| {
            let r = row + cell.row();
            let c = col + cell.col();
            r < BOARD_SIZE && c < BOARD_SIZE && !board.rows[r].is_cell_occupied(c)
        })
    }

    #[test]
    fn test_cells_past_edge() {
        let row = BoardRow::FULL;
        assert!(row.is_cell_occupied(9));
        assert!(!row.is_cell_occupied(10));
        assert!(!row.is_cell_occupied(64));
        assert!(Board::EMPTY.is_occupied(0, 10));
        assert!(Board::EMPTY.is_occupied(usize::MAX, 0));
    }

    #[test]
    #[should_panic(expected = "index out of bounds")]
    fn test_row_past_edge() {
        let _ = Board::EMPTY.row(BOARD_SIZE);
    }

    #[test]
    fn test_empty_board() {
        let board = Board::EMPTY;
        assert!(board.is_empty());
        assert_eq!(board.occupied_count(), 0);
        for row in board.rows() {
            assert!(row.iter_cells().all(|cell| !cell));
        }
    }

    #[test]
    fn test_board_row_is_filled() {
        let mut row = BoardRow::EMPTY;
        assert!(!row.is_filled());
        for col in 0..BOARD_SIZE {
            row.occupy_cell(col);
        }
        assert!(row.is_filled());
        assert_eq!(row, BoardRow::FULL);
    }

    #[test]
    fn test_can_place_matches_definition() {
        let boards = [
            Board::EMPTY,
            Board::from_ascii(
                r"
                #.........
                .#........
                ..#.......
                ...#......
                ....#.....
                .....#....
                ......#...
                .......#..
                ........#.
                .........#
                ",
            ),
            Board::from_ascii(
                r"
                ##########
                #........#
                #.##..##.#
                #.##..##.#
                #........#
                #........#
                #.##..##.#
                #.##..##.#
                #........#
                ##########
                ",
            ),
        ];

        for board in &boards {
            for piece in all_pieces() {
                for row in 0..BOARD_SIZE + 2 {
                    for col in 0..BOARD_SIZE + 2 {
                        assert_eq!(
                            board.can_place(&piece, row, col),
                            fits_by_definition(board, &piece, row, col),
                            "{:?} at ({row}, {col}) on\n{board}",
                            piece.shape(),
                        );
                    }
                }
            }
        }
    }

    #[test]
    fn test_can_place_rejects_huge_anchor() {
        let board = Board::EMPTY;
        assert!(!board.can_place(&piece(ShapeKind::O, 0), usize::MAX, 0));
        assert!(!board.can_place(&piece(ShapeKind::O, 0), 0, usize::MAX));
    }

    #[test]
    fn test_can_place_edges() {
        let board = Board::EMPTY;
        let bar = piece(ShapeKind::I, 0);
        assert!(board.can_place(&bar, 9, 6));
        assert!(!board.can_place(&bar, 9, 7));

        let upright = piece(ShapeKind::I, 1);
        assert!(board.can_place(&upright, 6, 9));
        assert!(!board.can_place(&upright, 7, 9));
    }

    #[test]
    fn test_place_fills_cells() {
        let mut board = Board::EMPTY;
        assert!(board.place(&piece(ShapeKind::T, 0), 2, 3));
        assert_eq!(
            board,
            Board::from_ascii(
                r"
                ..........
                ..........
                ....#.....
                ...###....
                ",
            )
        );
        assert_eq!(board.occupied_count(), 4);
    }

    #[test]
    fn test_place_is_atomic() {
        let original = Board::from_ascii(
            r"
            ..........
            ...#......
            ",
        );

        // overlapping one occupied cell
        let mut board = original.clone();
        assert!(!board.place(&piece(ShapeKind::I, 0), 1, 0));
        assert_eq!(board, original);

        // partially out of bounds
        let mut board = original.clone();
        assert!(!board.place(&piece(ShapeKind::I, 0), 0, 8));
        assert_eq!(board, original);
    }

    #[test]
    fn test_from_str_errors() {
        assert_eq!(
            "#####".parse::<Board>(),
            Err(ParseBoardError::RowWidth { row: 0, cells: 5 })
        );
        let too_tall = "..........\n".repeat(BOARD_SIZE + 1);
        assert_eq!(
            too_tall.parse::<Board>(),
            Err(ParseBoardError::TooManyRows {
                rows: BOARD_SIZE + 1
            })
        );
    }

    #[test]
    fn test_display_round_trip() {
        let board = Board::from_ascii(
            r"
            #........#
            .##.......
            ",
        );
        let rendered = board.to_string();
        assert!(rendered.starts_with("#........#\n.##.......\n.........."));
        assert_eq!(rendered.parse::<Board>(), Ok(board));
    }

    #[test]
    fn test_board_serialization() {
        let board = Board::from_ascii(
            r"
            ##........
            ##########
            ",
        );
        let serialized = serde_json::to_string(&board).unwrap();
        assert_eq!(
            serialized,
            "\"003,3ff,000,000,000,000,000,000,000,000\""
        );

        let deserialized: Board = serde_json::from_str(&serialized).unwrap();
        assert_eq!(deserialized, board);
    }

    #[test]
    fn test_board_deserialization_errors() {
        assert!(serde_json::from_str::<Board>("\"000,000\"").is_err());
        assert!(
            serde_json::from_str::<Board>("\"xyz,000,000,000,000,000,000,000,000,000\"").is_err()
        );
        // bit 10 lies outside the board
        assert!(
            serde_json::from_str::<Board>("\"400,000,000,000,000,000,000,000,000,000\"").is_err()
        );
    }
}
