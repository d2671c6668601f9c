//! Attack geometry and the "is this square attacked" query.
//!
//! Leaper attacks (knight, king, pawn) and one ray mask per square and
//! direction are computed once into a process-wide table. Sliding attacks
//! cast along a ray, stop at the first occupied square (which is included,
//! since the slider attacks it) and mask off everything beyond it.

use std::sync::OnceLock;

use crate::engine::board::Board;
use crate::engine::types::{Bitboard, Color, PieceType, Square};

// =========================================================================
// Directions
// =========================================================================

/// (file delta, rank delta) per ray direction. The first four walk towards
/// higher square indices, the last four towards lower ones.
const DIRECTIONS: [(i8, i8); 8] = [
    (0, 1),   // north
    (1, 1),   // north-east
    (1, 0),   // east
    (-1, 1),  // north-west
    (0, -1),  // south
    (-1, -1), // south-west
    (-1, 0),  // west
    (1, -1),  // south-east
];

const ROOK_DIRS: [usize; 4] = [0, 2, 4, 6];
const BISHOP_DIRS: [usize; 4] = [1, 3, 5, 7];

const KNIGHT_JUMPS: [(i8, i8); 8] = [
    (1, 2),
    (2, 1),
    (2, -1),
    (1, -2),
    (-1, -2),
    (-2, -1),
    (-2, 1),
    (-1, 2),
];

// =========================================================================
// Tables
// =========================================================================

/// Get a reference to the global attack tables.
pub fn tables() -> &'static AttackTables {
    static TABLES: OnceLock<AttackTables> = OnceLock::new();
    TABLES.get_or_init(AttackTables::init)
}

/// Precomputed attack sets for every square.
pub struct AttackTables {
    knight: [Bitboard; 64],
    king: [Bitboard; 64],
    /// `pawn[color][square]`: squares a pawn of `color` on `square` attacks.
    pawn: [[Bitboard; 64]; 2],
    /// `rays[direction][square]`: every square along the ray, excluding `square`.
    rays: [[Bitboard; 64]; 8],
}

impl AttackTables {
    fn init() -> Self {
        let mut t = AttackTables {
            knight: [Bitboard::EMPTY; 64],
            king: [Bitboard::EMPTY; 64],
            pawn: [[Bitboard::EMPTY; 64]; 2],
            rays: [[Bitboard::EMPTY; 64]; 8],
        };

        for sq in Square::all() {
            let i = sq.index();
            for &(df, dr) in &KNIGHT_JUMPS {
                if let Some(to) = sq.offset(df, dr) {
                    t.knight[i].insert(to);
                }
            }
            for &(df, dr) in &DIRECTIONS {
                if let Some(to) = sq.offset(df, dr) {
                    t.king[i].insert(to);
                }
            }
            for color in [Color::White, Color::Black] {
                for df in [-1, 1] {
                    if let Some(to) = sq.offset(df, color.forward()) {
                        t.pawn[color.index()][i].insert(to);
                    }
                }
            }
            for (dir, &(df, dr)) in DIRECTIONS.iter().enumerate() {
                let mut cur = sq;
                while let Some(next) = cur.offset(df, dr) {
                    t.rays[dir][i].insert(next);
                    cur = next;
                }
            }
        }
        t
    }

    #[inline]
    pub fn knight_attacks(&self, sq: Square) -> Bitboard {
        self.knight[sq.index()]
    }

    #[inline]
    pub fn king_attacks(&self, sq: Square) -> Bitboard {
        self.king[sq.index()]
    }

    /// Squares a pawn of `color` standing on `sq` attacks (diagonally forward).
    #[inline]
    pub fn pawn_attacks(&self, color: Color, sq: Square) -> Bitboard {
        self.pawn[color.index()][sq.index()]
    }

    /// Ray-cast in one direction, stopping at (and including) the first blocker.
    fn slide(&self, dir: usize, sq: Square, occupied: Bitboard) -> Bitboard {
        let ray = self.rays[dir][sq.index()];
        let blockers = ray & occupied;
        let first = if dir < 4 {
            blockers.lsb()
        } else {
            blockers.msb()
        };
        match first {
            Some(b) => ray & !self.rays[dir][b.index()],
            None => ray,
        }
    }

    pub fn rook_attacks(&self, sq: Square, occupied: Bitboard) -> Bitboard {
        ROOK_DIRS
            .iter()
            .fold(Bitboard::EMPTY, |acc, &d| acc | self.slide(d, sq, occupied))
    }

    pub fn bishop_attacks(&self, sq: Square, occupied: Bitboard) -> Bitboard {
        BISHOP_DIRS
            .iter()
            .fold(Bitboard::EMPTY, |acc, &d| acc | self.slide(d, sq, occupied))
    }

    #[inline]
    pub fn queen_attacks(&self, sq: Square, occupied: Bitboard) -> Bitboard {
        self.rook_attacks(sq, occupied) | self.bishop_attacks(sq, occupied)
    }
}

// =========================================================================
// Attack detection
// =========================================================================

/// Is `sq` attacked by any piece of colour `by`?
///
/// Used for check detection and castling safety alike; there is no other
/// copy of the piece geometry.
pub fn is_square_attacked(board: &Board, sq: Square, by: Color) -> bool {
    let t = tables();
    let occ = board.occupied();

    // A pawn of `by` attacks `sq` exactly when a pawn of the other colour
    // on `sq` would attack the pawn's square.
    if !(t.pawn_attacks(!by, sq) & board.bb(by, PieceType::Pawn)).is_empty() {
        return true;
    }
    if !(t.knight_attacks(sq) & board.bb(by, PieceType::Knight)).is_empty() {
        return true;
    }
    if !(t.king_attacks(sq) & board.bb(by, PieceType::King)).is_empty() {
        return true;
    }

    let queens = board.bb(by, PieceType::Queen);
    let straight = board.bb(by, PieceType::Rook) | queens;
    if !(t.rook_attacks(sq, occ) & straight).is_empty() {
        return true;
    }
    let diagonal = board.bb(by, PieceType::Bishop) | queens;
    !(t.bishop_attacks(sq, occ) & diagonal).is_empty()
}

// =========================================================================
// Tests
// =========================================================================
