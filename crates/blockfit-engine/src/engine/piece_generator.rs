use std::{fmt, str::FromStr};

use rand::{
    Rng, SeedableRng as _,
    distr::{Distribution, StandardUniform},
};
use rand_pcg::Pcg32;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::{Piece, PieceId};

/// Supplies fresh pieces to a round.
///
/// [`PieceGenerator`] is the random implementation. Hosts and tests can
/// provide their own sources to deal a fixed sequence of pieces.
pub trait PieceSource {
    /// Produces the next piece. Identifiers must never repeat.
    fn next_piece(&mut self) -> Piece;
}

/// Random piece generator.
///
/// Every piece is an archetype chosen uniformly at random, turned a random
/// number of quarter turns (0 to 3). Identifiers are assigned sequentially.
///
/// The random source is injected: [`PieceGenerator::with_seed`] uses a
/// PCG32 seeded from a [`PieceSeed`], [`PieceGenerator::from_rng`] accepts any
/// [`Rng`].
///
/// # Example
///
/// ```
/// use blockfit_engine::{PieceGenerator, PieceSeed};
/// use rand::Rng as _;
///
/// let seed: PieceSeed = rand::rng().random();
/// let mut a = PieceGenerator::with_seed(seed);
/// let mut b = PieceGenerator::with_seed(seed);
///
/// assert_eq!(a.next_piece(), b.next_piece());
/// ```
#[derive(Debug, Clone)]
pub struct PieceGenerator<R = Pcg32> {
    rng: R,
    next_id: u32,
}

impl Default for PieceGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl PieceGenerator {
    /// Creates a generator with a random seed.
    #[must_use]
    pub fn new() -> Self {
        Self::with_seed(rand::rng().random())
    }

    /// Like [`Self::new`], but with a specific seed for deterministic piece generation.
    #[must_use]
    pub fn with_seed(seed: PieceSeed) -> Self {
        Self::from_rng(Pcg32::from_seed(seed.0))
    }
}

impl<R> PieceGenerator<R>
where
    R: Rng,
{
    #[must_use]
    pub fn from_rng(rng: R) -> Self {
        Self { rng, next_id: 0 }
    }

    /// Draws the next piece.
    pub fn next_piece(&mut self) -> Piece {
        let kind = self.rng.random();
        let rotation = self.rng.random();
        let id = PieceId::new(self.next_id);
        self.next_id += 1;
        Piece::new(id, kind, rotation)
    }
}

impl<R> PieceSource for PieceGenerator<R>
where
    R: Rng,
{
    fn next_piece(&mut self) -> Piece {
        PieceGenerator::next_piece(self)
    }
}

/// Seed for deterministic piece generation.
///
/// A 128-bit (16-byte) seed for the piece generator's PCG32. The same seed
/// always produces the same piece sequence, which makes rounds reproducible
/// for replays and tests. Serialized as a 32-character hex string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PieceSeed([u8; 16]);

impl PieceSeed {
    #[must_use]
    pub const fn from_bytes(bytes: [u8; 16]) -> Self {
        Self(bytes)
    }
}

impl fmt::Display for PieceSeed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:032x}", u128::from_be_bytes(self.0))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum ParseSeedError {
    #[display("invalid hex: expected 32 characters, got {len}")]
    Length { len: usize },
    #[display("invalid hex: {input}")]
    Digit { input: String },
}

impl FromStr for PieceSeed {
    type Err = ParseSeedError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.len() != 32 {
            return Err(ParseSeedError::Length { len: s.len() });
        }
        if !s.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(ParseSeedError::Digit {
                input: s.to_owned(),
            });
        }
        let num = u128::from_str_radix(s, 16).map_err(|_| ParseSeedError::Digit {
            input: s.to_owned(),
        })?;
        Ok(Self(num.to_be_bytes()))
    }
}

impl Serialize for PieceSeed {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for PieceSeed {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let hex_str = String::deserialize(deserializer)?;
        hex_str.parse().map_err(serde::de::Error::custom)
    }
}

/// Allows generating random `PieceSeed` values with `rng.random()`.
impl Distribution<PieceSeed> for StandardUniform {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> PieceSeed {
        let mut seed = [0; 16];
        rng.fill(&mut seed);
        PieceSeed(seed)
    }
}
