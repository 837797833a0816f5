use std::fmt;

use arrayvec::ArrayVec;
use rand::{Rng, distr::StandardUniform, prelude::Distribution};
use serde::{Deserialize, Serialize};

/// Maximum number of cells a piece can occupy.
pub const MAX_PIECE_CELLS: usize = 4;

/// An occupied cell of a piece, relative to the piece's local origin.
///
/// Offsets are always non-negative; the origin is the top-left corner of the
/// piece's bounding box.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Cell {
    row: u8,
    col: u8,
}

impl Cell {
    #[must_use]
    pub const fn new(row: u8, col: u8) -> Self {
        Self { row, col }
    }

    #[must_use]
    pub fn row(self) -> usize {
        usize::from(self.row)
    }

    #[must_use]
    pub fn col(self) -> usize {
        usize::from(self.col)
    }
}

/// A normalized set of occupied cells.
///
/// Cells are kept sorted in `(row, col)` order and translated so that the
/// minimum row and the minimum column are both zero. Two shapes compare equal
/// exactly when they occupy the same cells.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Shape {
    cells: ArrayVec<Cell, MAX_PIECE_CELLS>,
    width: u8,
    height: u8,
}

impl Shape {
    /// Builds a shape from signed `(row, col)` points, translating it back to
    /// the origin.
    #[expect(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    fn normalized<I>(points: I) -> Self
    where
        I: IntoIterator<Item = (i16, i16)>,
    {
        let points: ArrayVec<(i16, i16), MAX_PIECE_CELLS> = points.into_iter().collect();
        let min_row = points.iter().map(|&(row, _)| row).min().unwrap_or(0);
        let min_col = points.iter().map(|&(_, col)| col).min().unwrap_or(0);

        let mut cells: ArrayVec<Cell, MAX_PIECE_CELLS> = points
            .iter()
            .map(|&(row, col)| Cell::new((row - min_row) as u8, (col - min_col) as u8))
            .collect();
        cells.sort_unstable();

        let height = cells.iter().map(|c| c.row + 1).max().unwrap_or(0);
        let width = cells.iter().map(|c| c.col + 1).max().unwrap_or(0);
        Self {
            cells,
            width,
            height,
        }
    }

    /// Returns the shape rotated by 90°.
    ///
    /// Each cell `(x, y)` maps to `(y, -x)` and the result is normalized again,
    /// so four rotations bring any shape back to itself.
    #[must_use]
    pub fn rotated(&self) -> Self {
        Self::normalized(
            self.cells
                .iter()
                .map(|c| (-i16::from(c.col), i16::from(c.row))),
        )
    }

    #[must_use]
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    #[must_use]
    pub fn width(&self) -> usize {
        usize::from(self.width)
    }

    #[must_use]
    pub fn height(&self) -> usize {
        usize::from(self.height)
    }

    #[must_use]
    pub fn is_occupied(&self, row: usize, col: usize) -> bool {
        self.cells.iter().any(|c| c.row() == row && c.col() == col)
    }

    /// Renders each row of the bounding box as `#` (occupied) and `.` (empty).
    pub fn render_rows(&self) -> impl Iterator<Item = String> + '_ {
        (0..self.height()).map(move |row| {
            (0..self.width())
                .map(|col| if self.is_occupied(row, col) { '#' } else { '.' })
                .collect()
        })
    }
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, row) in self.render_rows().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            f.write_str(&row)?;
        }
        Ok(())
    }
}

/// Number of quarter turns applied to a piece's base shape.
///
/// Always in `0..4`; operations wrap around modulo 4.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PieceRotation(u8);

impl PieceRotation {
    #[must_use]
    pub const fn new(quarter_turns: u8) -> Self {
        Self(quarter_turns % 4)
    }

    #[must_use]
    pub const fn quarter_turns(self) -> u8 {
        self.0
    }

    #[must_use]
    pub const fn rotated(self) -> Self {
        Self((self.0 + 1) % 4)
    }
}

impl Distribution<PieceRotation> for StandardUniform {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> PieceRotation {
        PieceRotation(rng.random_range(0..4))
    }
}

/// Piece archetypes. Every archetype occupies four cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[repr(u8)]
pub enum ShapeKind {
    /// Four-cell bar.
    I = 0,
    /// 2×2 square.
    O = 1,
    T = 2,
    L = 3,
    /// Mirrored L.
    J = 4,
    S = 5,
    Z = 6,
}

impl Distribution<ShapeKind> for StandardUniform {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> ShapeKind {
        ShapeKind::ALL[rng.random_range(0..ShapeKind::LEN)]
    }
}

impl ShapeKind {
    /// Number of archetypes (7).
    pub const LEN: usize = 7;

    pub const ALL: [Self; Self::LEN] = [
        ShapeKind::I,
        ShapeKind::O,
        ShapeKind::T,
        ShapeKind::L,
        ShapeKind::J,
        ShapeKind::S,
        ShapeKind::Z,
    ];

    /// Returns the archetype's unrotated shape.
    #[must_use]
    pub fn base_shape(self) -> Shape {
        Shape::normalized(
            BASE_CELLS[self as usize]
                .iter()
                .map(|&(x, y)| (i16::from(y), i16::from(x))),
        )
    }

    /// Returns the archetype's shape after the given rotation.
    #[must_use]
    pub fn shape(self, rotation: PieceRotation) -> Shape {
        let mut shape = self.base_shape();
        for _ in 0..rotation.quarter_turns() {
            shape = shape.rotated();
        }
        shape
    }

    /// Returns the single character representation of this kind.
    ///
    /// # Examples
    ///
    /// ```
    /// use blockfit_engine::ShapeKind;
    ///
    /// assert_eq!(ShapeKind::I.as_char(), 'I');
    /// assert_eq!(ShapeKind::J.as_char(), 'J');
    /// ```
    #[must_use]
    pub const fn as_char(self) -> char {
        match self {
            ShapeKind::I => 'I',
            ShapeKind::O => 'O',
            ShapeKind::T => 'T',
            ShapeKind::L => 'L',
            ShapeKind::J => 'J',
            ShapeKind::S => 'S',
            ShapeKind::Z => 'Z',
        }
    }

    #[must_use]
    pub const fn from_char(c: char) -> Option<Self> {
        match c {
            'I' => Some(ShapeKind::I),
            'O' => Some(ShapeKind::O),
            'T' => Some(ShapeKind::T),
            'L' => Some(ShapeKind::L),
            'J' => Some(ShapeKind::J),
            'S' => Some(ShapeKind::S),
            'Z' => Some(ShapeKind::Z),
            _ => None,
        }
    }
}

/// Base cells of each archetype as `(x, y)` = `(col, row)` pairs, indexed by
/// `ShapeKind as usize`.
const BASE_CELLS: [[(u8, u8); MAX_PIECE_CELLS]; ShapeKind::LEN] = [
    // I
    [(0, 0), (1, 0), (2, 0), (3, 0)],
    // O
    [(0, 0), (0, 1), (1, 0), (1, 1)],
    // T
    [(1, 0), (0, 1), (1, 1), (2, 1)],
    // L
    [(0, 0), (0, 1), (0, 2), (1, 2)],
    // J
    [(1, 0), (1, 1), (1, 2), (0, 2)],
    // S
    [(1, 0), (2, 0), (0, 1), (1, 1)],
    // Z
    [(0, 0), (1, 0), (1, 1), (2, 1)],
];

/// Identifier of a dealt piece. Unique within the generator that produced it.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    derive_more::Display,
)]
#[serde(transparent)]
#[display("P{_0}")]
pub struct PieceId(u32);

impl PieceId {
    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    #[must_use]
    pub const fn value(self) -> u32 {
        self.0
    }
}

/// A dealt piece: an archetype in a fixed orientation, with an identifier.
///
/// Pieces are immutable. [`Piece::rotated`] returns a new piece.
///
/// # Example
///
/// ```
/// use blockfit_engine::{Piece, PieceId, PieceRotation, ShapeKind};
///
/// let bar = Piece::new(PieceId::new(0), ShapeKind::I, PieceRotation::default());
/// assert_eq!((bar.width(), bar.height()), (4, 1));
///
/// let upright = bar.rotated();
/// assert_eq!((upright.width(), upright.height()), (1, 4));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Piece {
    id: PieceId,
    kind: ShapeKind,
    rotation: PieceRotation,
    shape: Shape,
}

impl Serialize for Piece {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        // Format: "kind#rotation@id" (e.g., "T#1@17")
        let s = format!(
            "{}#{}@{}",
            self.kind.as_char(),
            self.rotation.0,
            self.id.0
        );
        serializer.serialize_str(&s)
    }
}

impl<'de> Deserialize<'de> for Piece {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;

        let (kind_str, rest) = s.split_once('#').ok_or_else(|| {
            serde::de::Error::custom(format!("missing '#' in format 'kind#rotation@id', got '{s}'"))
        })?;
        let mut kind_chars = kind_str.chars();
        let (Some(kind_char), None) = (kind_chars.next(), kind_chars.next()) else {
            return Err(serde::de::Error::custom(format!(
                "piece kind must be single character, got '{kind_str}'"
            )));
        };
        let kind = ShapeKind::from_char(kind_char)
            .ok_or_else(|| serde::de::Error::custom(format!("invalid piece kind: {kind_char}")))?;

        let (rotation_str, id_str) = rest.split_once('@').ok_or_else(|| {
            serde::de::Error::custom(format!("missing '@' in format 'kind#rotation@id', got '{s}'"))
        })?;
        let rotation_num = rotation_str.parse::<u8>().map_err(|e| {
            serde::de::Error::custom(format!("invalid rotation: {rotation_str} ({e})"))
        })?;
        if rotation_num > 3 {
            return Err(serde::de::Error::custom(format!(
                "rotation must be 0-3, got {rotation_num}"
            )));
        }
        let id = id_str
            .parse::<u32>()
            .map_err(|e| serde::de::Error::custom(format!("invalid piece id: {id_str} ({e})")))?;

        Ok(Piece::new(
            PieceId(id),
            kind,
            PieceRotation(rotation_num),
        ))
    }
}

impl Piece {
    #[must_use]
    pub fn new(id: PieceId, kind: ShapeKind, rotation: PieceRotation) -> Self {
        Self {
            id,
            kind,
            rotation,
            shape: kind.shape(rotation),
        }
    }

    #[must_use]
    pub fn id(&self) -> PieceId {
        self.id
    }

    #[must_use]
    pub fn kind(&self) -> ShapeKind {
        self.kind
    }

    #[must_use]
    pub fn rotation(&self) -> PieceRotation {
        self.rotation
    }

    #[must_use]
    pub fn shape(&self) -> &Shape {
        &self.shape
    }

    #[must_use]
    pub fn cells(&self) -> &[Cell] {
        self.shape.cells()
    }

    #[must_use]
    pub fn width(&self) -> usize {
        self.shape.width()
    }

    #[must_use]
    pub fn height(&self) -> usize {
        self.shape.height()
    }

    /// Returns the same piece turned by a further 90°.
    #[must_use]
    pub fn rotated(&self) -> Self {
        Self {
            id: self.id,
            kind: self.kind,
            rotation: self.rotation.rotated(),
            shape: self.shape.rotated(),
        }
    }

    /// Returns the board positions covered when the piece is anchored at
    /// `(row, col)`.
    pub fn occupied_positions(
        &self,
        row: usize,
        col: usize,
    ) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.cells()
            .iter()
            .map(move |c| (row + c.row(), col + c.col()))
    }
}
