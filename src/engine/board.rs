//! Piece placement.
//!
//! `Board` is the square → piece mapping of a position. It is stored as 12
//! bitboards (2 colours × 6 piece kinds) plus redundant occupancy sets, and
//! only ever holds one piece per square.

use crate::engine::types::{Bitboard, Color, Piece, PieceType, Square};

/// Piece placement for one position.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Board {
    /// `pieces[color][kind]`.
    pieces: [[Bitboard; PieceType::COUNT]; 2],
    by_color: [Bitboard; 2],
    all: Bitboard,
}

impl Board {
    pub fn empty() -> Self {
        Self::default()
    }

    // -----------------------------------------------------------------------
    // Edits
    // -----------------------------------------------------------------------

    /// Place `piece` on `sq`, replacing whatever stood there.
    pub fn put(&mut self, sq: Square, piece: Piece) -> Option<Piece> {
        let previous = self.remove(sq);
        let bit = Bitboard::from_square(sq);
        let c = piece.color().index();
        self.pieces[c][piece.kind().index()] |= bit;
        self.by_color[c] |= bit;
        self.all |= bit;
        previous
    }

    /// Clear `sq`, returning the piece that was on it.
    pub fn remove(&mut self, sq: Square) -> Option<Piece> {
        let piece = self.piece_at(sq)?;
        let keep = !Bitboard::from_square(sq);
        let c = piece.color().index();
        self.pieces[c][piece.kind().index()] &= keep;
        self.by_color[c] &= keep;
        self.all &= keep;
        Some(piece)
    }

    // -----------------------------------------------------------------------
    // Queries
    // -----------------------------------------------------------------------

    pub fn piece_at(&self, sq: Square) -> Option<Piece> {
        if !self.all.contains(sq) {
            return None;
        }
        let color = if self.by_color[Color::White.index()].contains(sq) {
            Color::White
        } else {
            Color::Black
        };
        PieceType::ALL
            .into_iter()
            .find(|kind| self.pieces[color.index()][kind.index()].contains(sq))
            .map(|kind| Piece::new(kind, color))
    }

    #[inline]
    pub fn is_empty_square(&self, sq: Square) -> bool {
        !self.all.contains(sq)
    }

    /// All pieces of one colour and kind.
    #[inline]
    pub fn bb(&self, color: Color, kind: PieceType) -> Bitboard {
        self.pieces[color.index()][kind.index()]
    }

    #[inline]
    pub fn color_bb(&self, color: Color) -> Bitboard {
        self.by_color[color.index()]
    }

    #[inline]
    pub fn occupied(&self) -> Bitboard {
        self.all
    }

    /// Square of `color`'s king, if there is one.
    #[inline]
    pub fn king_square(&self, color: Color) -> Option<Square> {
        self.bb(color, PieceType::King).lsb()
    }

    /// Every occupied square with its piece, a1 first.
    pub fn iter(&self) -> impl Iterator<Item = (Square, Piece)> + '_ {
        self.all
            .iter()
            .filter_map(move |sq| self.piece_at(sq).map(|p| (sq, p)))
    }

    pub fn len(&self) -> usize {
        self.all.count() as usize
    }

    pub fn is_empty(&self) -> bool {
        self.all.is_empty()
    }

    // -----------------------------------------------------------------------
    // Text
    // -----------------------------------------------------------------------

    /// The FEN piece-placement field (rank 8 first).
    pub fn placement_fen(&self) -> String {
        let mut out = String::with_capacity(72);
        for rank in (0..8).rev() {
            let mut empty = 0u8;
            for file in 0..8 {
                match self.piece_at(Square::from_file_rank(file, rank)) {
                    Some(piece) => {
                        if empty > 0 {
                            out.push((b'0' + empty) as char);
                            empty = 0;
                        }
                        out.push(piece.to_char());
                    }
                    None => empty += 1,
                }
            }
            if empty > 0 {
                out.push((b'0' + empty) as char);
            }
            if rank > 0 {
                out.push('/');
            }
        }
        out
    }

    /// 8×8 text grid (rank 8 at top) for debugging.
    pub fn board_string(&self) -> String {
        let mut s = String::with_capacity(200);
        for rank in (0..8).rev() {
            s.push((b'1' + rank) as char);
            for file in 0..8 {
                s.push(' ');
                s.push(
                    self.piece_at(Square::from_file_rank(file, rank))
                        .map_or('.', Piece::to_char),
                );
            }
            s.push('\n');
        }
        s.push_str("  a b c d e f g h");
        s
    }
}

impl std::fmt::Display for Board {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.board_string())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::fen::{self, STARTING_FEN};

    fn sq(name: &str) -> Square {
        Square::from_algebraic(name).unwrap()
    }

    fn starting() -> Board {
        fen::parse(STARTING_FEN).unwrap().board().clone()
    }

    #[test]
    fn starting_piece_counts() {
        let b = starting();
        assert_eq!(b.len(), 32);
        assert_eq!(b.color_bb(Color::White).count(), 16);
        assert_eq!(b.color_bb(Color::Black).count(), 16);
        assert_eq!(b.bb(Color::White, PieceType::Pawn).0, 0x0000_0000_0000_FF00);
    }

    #[test]
    fn piece_at_starting_squares() {
        let b = starting();
        assert_eq!(b.piece_at(sq("e1")), Some(Piece::King(Color::White)));
        assert_eq!(b.piece_at(sq("d8")), Some(Piece::Queen(Color::Black)));
        assert_eq!(b.piece_at(sq("a8")), Some(Piece::Rook(Color::Black)));
        assert_eq!(b.piece_at(sq("g8")), Some(Piece::Knight(Color::Black)));
        assert_eq!(b.piece_at(sq("c1")), Some(Piece::Bishop(Color::White)));
        for file in b'a'..=b'h' {
            let name = format!("{}2", file as char);
            assert_eq!(b.piece_at(sq(&name)), Some(Piece::Pawn(Color::White)));
        }
        for rank in 3..=6 {
            for file in b'a'..=b'h' {
                let name = format!("{}{}", file as char, rank);
                assert_eq!(b.piece_at(sq(&name)), None, "expected empty on {name}");
            }
        }
    }

    #[test]
    fn king_squares() {
        let b = starting();
        assert_eq!(b.king_square(Color::White), Some(sq("e1")));
        assert_eq!(b.king_square(Color::Black), Some(sq("e8")));
        assert_eq!(Board::empty().king_square(Color::White), None);
    }

    #[test]
    fn put_replaces_and_remove_clears() {
        let mut b = Board::empty();
        assert_eq!(b.put(sq("d4"), Piece::Knight(Color::White)), None);
        assert_eq!(
            b.put(sq("d4"), Piece::Queen(Color::Black)),
            Some(Piece::Knight(Color::White))
        );
        assert_eq!(b.len(), 1);
        assert!(b.bb(Color::White, PieceType::Knight).is_empty());
        assert_eq!(b.remove(sq("d4")), Some(Piece::Queen(Color::Black)));
        assert!(b.is_empty());
        assert_eq!(b.remove(sq("d4")), None);
    }

    #[test]
    fn placement_round_trips() {
        let b = starting();
        assert_eq!(
            b.placement_fen(),
            "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR"
        );
        assert_eq!(Board::empty().placement_fen(), "8/8/8/8/8/8/8/8");
    }

    #[test]
    fn iter_lists_every_piece() {
        let b = starting();
        let pieces: Vec<_> = b.iter().collect();
        assert_eq!(pieces.len(), 32);
        assert_eq!(pieces[0], (sq("a1"), Piece::Rook(Color::White)));
    }
}
