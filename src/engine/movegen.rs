//! Legal move generation.
//!
//! Pipeline:
//!   1. Generate pseudo-legal moves for the side to move, dispatching on the
//!      piece kind.
//!   2. Filter: simulate each move on a copy of the board and drop it if the
//!      mover's king is attacked afterwards.
//!
//! Castling and en passant go through the same simulation as they do when
//! actually played, so discovered checks along the en-passant rank are caught.

use crate::engine::attacks::{self, is_square_attacked};
use crate::engine::executor;
use crate::engine::state::GameState;
use crate::engine::types::{
    Bitboard, CastleSide, Color, Move, MoveFlags, Piece, PieceType, Square,
};

// =========================================================================
// Public API
// =========================================================================

/// Every legal move for the side to move.
pub fn legal(state: &GameState) -> Vec<Move> {
    pseudo_legal(state)
        .into_iter()
        .filter(|mv| leaves_king_safe(state, mv))
        .collect()
}

/// Legal moves whose origin is `from`. Empty for an empty or enemy square.
pub fn legal_from(state: &GameState, from: Square) -> Vec<Move> {
    match state.piece_at(from) {
        Some(piece) if piece.color() == state.turn => legal(state)
            .into_iter()
            .filter(|m| m.from == from)
            .collect(),
        _ => Vec::new(),
    }
}

/// Moves that follow piece movement rules but may leave the king in check.
pub fn pseudo_legal(state: &GameState) -> Vec<Move> {
    let mut moves = Vec::with_capacity(64);
    let us = state.turn;
    let board = &state.board;
    let t = attacks::tables();
    let own = board.color_bb(us);
    let occupied = board.occupied();

    for from in own.iter() {
        let Some(piece) = board.piece_at(from) else {
            continue;
        };
        match piece {
            Piece::Pawn(_) => pawn_moves(state, from, us, &mut moves),
            Piece::Knight(_) => {
                push_targets(state, from, piece, t.knight_attacks(from) & !own, &mut moves)
            }
            Piece::Bishop(_) => push_targets(
                state,
                from,
                piece,
                t.bishop_attacks(from, occupied) & !own,
                &mut moves,
            ),
            Piece::Rook(_) => push_targets(
                state,
                from,
                piece,
                t.rook_attacks(from, occupied) & !own,
                &mut moves,
            ),
            Piece::Queen(_) => push_targets(
                state,
                from,
                piece,
                t.queen_attacks(from, occupied) & !own,
                &mut moves,
            ),
            Piece::King(_) => {
                push_targets(state, from, piece, t.king_attacks(from) & !own, &mut moves);
                castling_moves(state, from, us, &mut moves);
            }
        }
    }
    moves
}

fn leaves_king_safe(state: &GameState, mv: &Move) -> bool {
    let us = mv.piece.color();
    let after = executor::simulate(&state.board, mv, state.en_passant);
    match after.king_square(us) {
        Some(king) => !is_square_attacked(&after, king, !us),
        // Kingless test positions: nothing to protect.
        None => true,
    }
}

// =========================================================================
// Leapers and sliders
// =========================================================================

fn push_targets(
    state: &GameState,
    from: Square,
    piece: Piece,
    targets: Bitboard,
    moves: &mut Vec<Move>,
) {
    for to in targets.iter() {
        match state.board.piece_at(to) {
            Some(victim) => moves.push(Move::with_capture(from, to, piece, victim)),
            None => moves.push(Move::new(from, to, piece)),
        }
    }
}

// =========================================================================
// Pawn moves
// =========================================================================

fn pawn_moves(state: &GameState, from: Square, us: Color, moves: &mut Vec<Move>) {
    let board = &state.board;
    let piece = Piece::Pawn(us);
    let forward = us.forward();
    let start_rank = match us {
        Color::White => 1,
        Color::Black => 6,
    };
    let last_rank = (!us).back_rank();

    // --- Pushes ---
    if let Some(one) = from.offset(0, forward)
        && board.is_empty_square(one)
    {
        let mv = Move::new(from, one, piece);
        if one.rank() == last_rank {
            add_promotions(mv, moves);
        } else {
            moves.push(mv);
            if from.rank() == start_rank
                && let Some(two) = from.offset(0, 2 * forward)
                && board.is_empty_square(two)
            {
                moves.push(Move::with_flags(from, two, piece, MoveFlags::DOUBLE_PUSH));
            }
        }
    }

    // --- Captures ---
    let attacks = attacks::tables().pawn_attacks(us, from);
    for to in (attacks & board.color_bb(!us)).iter() {
        let Some(victim) = board.piece_at(to) else {
            continue;
        };
        let mv = Move::with_capture(from, to, piece, victim);
        if to.rank() == last_rank {
            add_promotions(mv, moves);
        } else {
            moves.push(mv);
        }
    }

    // --- En passant ---
    if let Some(target) = state.en_passant
        && attacks.contains(target)
        && board.is_empty_square(target)
    {
        let bypassed = Square::from_file_rank(target.file(), from.rank());
        let victim = Piece::Pawn(!us);
        if board.piece_at(bypassed) == Some(victim) {
            moves.push(Move {
                captured: Some(victim),
                flags: MoveFlags::CAPTURE | MoveFlags::EN_PASSANT,
                ..Move::new(from, target, piece)
            });
        }
    }
}

/// One move per promotion choice, queen first.
fn add_promotions(mv: Move, moves: &mut Vec<Move>) {
    for kind in PieceType::PROMOTIONS {
        moves.push(mv.promoting_to(kind));
    }
}

// =========================================================================
// Castling
// =========================================================================

fn castling_moves(state: &GameState, king_from: Square, us: Color, moves: &mut Vec<Move>) {
    let board = &state.board;
    let them = !us;
    let rank = us.back_rank();
    let home = Square::from_file_rank(4, rank);

    if king_from != home || is_square_attacked(board, home, them) {
        return;
    }

    for side in [CastleSide::Kingside, CastleSide::Queenside] {
        if !state.castling.can_castle(us, side) {
            continue;
        }
        // (rook file, squares that must be empty, squares the king crosses, king target file)
        let (rook_file, between, crossed, target_file): (u8, &[u8], &[u8], u8) = match side {
            CastleSide::Kingside => (7, &[5, 6], &[5, 6], 6),
            CastleSide::Queenside => (0, &[1, 2, 3], &[3, 2], 2),
        };
        if board.piece_at(Square::from_file_rank(rook_file, rank)) != Some(Piece::Rook(us)) {
            continue;
        }
        let clear = between
            .iter()
            .all(|&f| board.is_empty_square(Square::from_file_rank(f, rank)));
        let safe = crossed
            .iter()
            .all(|&f| !is_square_attacked(board, Square::from_file_rank(f, rank), them));
        if clear && safe {
            moves.push(Move::with_flags(
                home,
                Square::from_file_rank(target_file, rank),
                Piece::King(us),
                MoveFlags::CASTLING,
            ));
        }
    }
}

// =========================================================================
// Tests
// =========================================================================
