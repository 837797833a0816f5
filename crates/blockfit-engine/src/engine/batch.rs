use serde::{Deserialize, Serialize};

use crate::{Piece, PieceId};

use super::piece_generator::PieceSource;

/// Pieces offered to the player at the same time (the "bag").
///
/// A placed piece is taken out of the batch and never comes back. The batch
/// is replaced only once it is empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Batch {
    pieces: Vec<Piece>,
}

impl Batch {
    /// Draws `size` pieces from the source.
    pub fn deal<S>(source: &mut S, size: usize) -> Self
    where
        S: PieceSource + ?Sized,
    {
        let pieces: Vec<Piece> = (0..size).map(|_| source.next_piece()).collect();
        debug_assert!(
            pieces
                .iter()
                .enumerate()
                .all(|(i, p)| pieces[..i].iter().all(|q| q.id() != p.id())),
            "piece source dealt duplicate ids"
        );
        Self { pieces }
    }

    #[must_use]
    pub fn pieces(&self) -> &[Piece] {
        &self.pieces
    }

    pub fn iter(&self) -> impl Iterator<Item = &Piece> + '_ {
        self.pieces.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.pieces.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pieces.is_empty()
    }

    #[must_use]
    pub fn get(&self, id: PieceId) -> Option<&Piece> {
        self.pieces.iter().find(|p| p.id() == id)
    }

    #[must_use]
    pub fn contains(&self, id: PieceId) -> bool {
        self.get(id).is_some()
    }

    /// Removes the piece from the batch, keeping the order of the others.
    pub fn take(&mut self, id: PieceId) -> Option<Piece> {
        let index = self.pieces.iter().position(|p| p.id() == id)?;
        Some(self.pieces.remove(index))
    }
}

impl<'a> IntoIterator for &'a Batch {
    type Item = &'a Piece;
    type IntoIter = std::slice::Iter<'a, Piece>;

    fn into_iter(self) -> Self::IntoIter {
        self.pieces.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{PieceGenerator, PieceSeed};

    fn dealt(size: usize) -> Batch {
        let mut generator = PieceGenerator::with_seed(PieceSeed::from_bytes([7; 16]));
        Batch::deal(&mut generator, size)
    }

    #[test]
    fn test_deal_size() {
        assert_eq!(dealt(3).len(), 3);
        assert!(dealt(0).is_empty());
    }

    #[test]
    fn test_take_removes_piece_once() {
        let mut batch = dealt(3);
        let ids: Vec<PieceId> = batch.iter().map(Piece::id).collect();

        let taken = batch.take(ids[1]).unwrap();
        assert_eq!(taken.id(), ids[1]);
        assert!(!batch.contains(ids[1]));
        assert_eq!(
            batch.iter().map(Piece::id).collect::<Vec<_>>(),
            vec![ids[0], ids[2]]
        );

        assert!(batch.take(ids[1]).is_none());
        assert_eq!(batch.len(), 2);
    }

    #[test]
    fn test_get_unknown_id() {
        let batch = dealt(3);
        assert!(batch.get(PieceId::new(999)).is_none());
    }
}
