//! Move execution.
//!
//! [`execute`] derives the successor `GameState`; it never touches its input.
//! [`simulate`] performs only the board edits and is what the legality filter
//! uses, so castling and en passant are simulated exactly as they are played.

use crate::engine::board::Board;
use crate::engine::san;
use crate::engine::state::{GameState, HistoryEntry, StatusFlags};
use crate::engine::types::{
    CastleSide, CastlingRights, Color, Move, MoveFlags, Piece, PieceType, Square,
};

/// Board after `mv`, given the en-passant target of the position it is played in.
pub fn simulate(board: &Board, mv: &Move, en_passant: Option<Square>) -> Board {
    let mut next = board.clone();
    apply_to_board(&mut next, mv, en_passant);
    next
}

/// Play `mv` (assumed legal) and return the resulting state.
///
/// The new history entry carries provisional, unsuffixed notation and no
/// check flags; [`crate::engine::rules::make_move`] fills those in once the
/// successor has been classified.
pub fn execute(state: &GameState, mv: &Move) -> GameState {
    let us = state.turn;
    let mut board = state.board.clone();
    let captured = apply_to_board(&mut board, mv, state.en_passant);

    let is_pawn = mv.piece.kind() == PieceType::Pawn;
    let en_passant_capture = is_en_passant_capture(&state.board, mv, state.en_passant);
    let castle = castle_side(mv);
    let double_push = is_pawn && mv.from.rank().abs_diff(mv.to.rank()) == 2;

    let en_passant = double_push
        .then(|| Square::from_file_rank(mv.from.file(), (mv.from.rank() + mv.to.rank()) / 2));

    let mut castling = state.castling;
    castling.0 &= CASTLING_MASK[mv.from.index()] & CASTLING_MASK[mv.to.index()];
    if mv.piece.kind() == PieceType::King {
        castling.remove(CastlingRights::flag(us, CastleSide::Kingside));
        castling.remove(CastlingRights::flag(us, CastleSide::Queenside));
    }

    let halfmove_clock = if is_pawn || captured.is_some() {
        0
    } else {
        state.halfmove_clock.saturating_add(1)
    };
    let fullmove_number = match us {
        Color::White => state.fullmove_number,
        Color::Black => state.fullmove_number.saturating_add(1),
    };

    let mut flags = MoveFlags::NONE;
    if captured.is_some() {
        flags = flags | MoveFlags::CAPTURE;
    }
    if en_passant_capture {
        flags = flags | MoveFlags::EN_PASSANT;
    }
    if castle.is_some() {
        flags = flags | MoveFlags::CASTLING;
    }
    if double_push {
        flags = flags | MoveFlags::DOUBLE_PUSH;
    }
    let played = Move {
        captured,
        flags,
        ..*mv
    };

    let mut history = state.history.clone();
    history.push(HistoryEntry {
        mv: played,
        san: san::base_notation(state, &played),
        capture: captured.is_some(),
        castling: castle,
        en_passant: en_passant_capture,
        promotion: mv.promotion,
        check: false,
        checkmate: false,
    });

    let mut captured_pieces = state.captured.clone();
    captured_pieces.extend(captured);

    let mut position_history = state.position_history.clone();
    position_history.push(state.to_fen());

    GameState {
        board,
        turn: !us,
        castling,
        en_passant,
        halfmove_clock,
        fullmove_number,
        history,
        captured: captured_pieces,
        position_history,
        status: StatusFlags::default(),
    }
}

/// Which wing `mv` castles to, if it is a two-file king shift.
pub fn castle_side(mv: &Move) -> Option<CastleSide> {
    if mv.piece.kind() != PieceType::King || mv.from.rank() != mv.to.rank() {
        return None;
    }
    match mv.to.file() as i8 - mv.from.file() as i8 {
        2 => Some(CastleSide::Kingside),
        -2 => Some(CastleSide::Queenside),
        _ => None,
    }
}

/// Rook (from, to) squares for a castling move.
pub fn castling_rook_squares(color: Color, side: CastleSide) -> (Square, Square) {
    let rank = color.back_rank();
    match side {
        CastleSide::Kingside => (Square::from_file_rank(7, rank), Square::from_file_rank(5, rank)),
        CastleSide::Queenside => (Square::from_file_rank(0, rank), Square::from_file_rank(3, rank)),
    }
}

fn is_en_passant_capture(board: &Board, mv: &Move, en_passant: Option<Square>) -> bool {
    mv.piece.kind() == PieceType::Pawn
        && Some(mv.to) == en_passant
        && mv.from.file() != mv.to.file()
        && board.is_empty_square(mv.to)
}

/// Apply the board side of `mv`, returning the captured piece.
fn apply_to_board(board: &mut Board, mv: &Move, en_passant: Option<Square>) -> Option<Piece> {
    let color = mv.piece.color();
    let en_passant_capture = is_en_passant_capture(board, mv, en_passant);

    board.remove(mv.from);
    let landing = mv
        .promotion
        .map_or(mv.piece, |kind| Piece::new(kind, color));
    let mut captured = board.put(mv.to, landing);

    if en_passant_capture {
        // The bypassed pawn sits beside the mover, not on the target square.
        let bypassed = Square::from_file_rank(mv.to.file(), mv.from.rank());
        captured = board.remove(bypassed);
    }

    if let Some(side) = castle_side(mv) {
        let (rook_from, rook_to) = castling_rook_squares(color, side);
        if board.piece_at(rook_from) == Some(Piece::Rook(color)) {
            board.remove(rook_from);
            board.put(rook_to, Piece::Rook(color));
        }
    }

    captured
}

/// AND-ed into the castling rights for both squares a move touches: a king
/// or rook leaving its home square, or anything landing on a rook's home
/// square, drops the matching rights.
const CASTLING_MASK: [u8; 64] = {
    let mut mask = [0b1111u8; 64];
    mask[0] = 0b1111 & !CastlingRights::WHITE_QUEENSIDE; // a1
    mask[4] = 0b1111 & !(CastlingRights::WHITE_KINGSIDE | CastlingRights::WHITE_QUEENSIDE); // e1
    mask[7] = 0b1111 & !CastlingRights::WHITE_KINGSIDE; // h1
    mask[56] = 0b1111 & !CastlingRights::BLACK_QUEENSIDE; // a8
    mask[60] = 0b1111 & !(CastlingRights::BLACK_KINGSIDE | CastlingRights::BLACK_QUEENSIDE); // e8
    mask[63] = 0b1111 & !CastlingRights::BLACK_KINGSIDE; // h8
    mask
};

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::fen;
    use crate::engine::movegen;

    fn sq(name: &str) -> Square {
        Square::from_algebraic(name).unwrap()
    }

    fn state(fen_str: &str) -> GameState {
        fen::parse(fen_str).unwrap()
    }

    /// Find the legal move `uci` and execute it.
    fn play(s: &GameState, uci: &str) -> GameState {
        let mv = movegen::legal(s)
            .into_iter()
            .find(|m| m.to_uci() == uci)
            .unwrap_or_else(|| panic!("{uci} is not legal in {}", s.to_fen()));
        execute(s, &mv)
    }

    #[test]
    fn execute_does_not_mutate_input() {
        let s = state(fen::STARTING_FEN);
        let before = s.clone();
        let next = play(&s, "e2e4");
        assert_eq!(s, before);
        assert_ne!(next.to_fen(), s.to_fen());
    }

    #[test]
    fn double_push_sets_en_passant_and_counters() {
        let s = state(fen::STARTING_FEN);
        let next = play(&s, "e2e4");
        assert_eq!(
            next.to_fen(),
            "rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq e3 0 1"
        );
        let next = play(&next, "g8f6");
        // en passant cleared, halfmove counts the knight move, fullmove ticks after Black
        assert_eq!(
            next.to_fen(),
            "rnbqkb1r/pppppppp/5n2/8/4P3/8/PPPP1PPP/RNBQKBNR w KQkq - 1 2"
        );
    }

    #[test]
    fn history_and_snapshots_are_appended() {
        let s = state(fen::STARTING_FEN);
        let next = play(&s, "g1f3");
        assert_eq!(next.history().len(), 1);
        assert_eq!(next.history()[0].san, "Nf3");
        assert!(!next.history()[0].capture);
        assert_eq!(next.position_history(), &[fen::STARTING_FEN.to_string()]);
    }

    #[test]
    fn kingside_castle_moves_rook() {
        let s = state("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1");
        let next = play(&s, "e1g1");
        assert_eq!(next.piece_at(sq("g1")), Some(Piece::King(Color::White)));
        assert_eq!(next.piece_at(sq("f1")), Some(Piece::Rook(Color::White)));
        assert_eq!(next.piece_at(sq("h1")), None);
        assert_eq!(next.castling_rights().to_fen(), "kq");
        assert_eq!(next.history()[0].castling, Some(CastleSide::Kingside));
        assert_eq!(next.history()[0].san, "O-O");
    }

    #[test]
    fn queenside_castle_moves_rook() {
        let s = state("r3k2r/8/8/8/8/8/8/R3K2R b KQkq - 0 1");
        let next = play(&s, "e8c8");
        assert_eq!(next.piece_at(sq("c8")), Some(Piece::King(Color::Black)));
        assert_eq!(next.piece_at(sq("d8")), Some(Piece::Rook(Color::Black)));
        assert_eq!(next.piece_at(sq("a8")), None);
        assert_eq!(next.castling_rights().to_fen(), "KQ");
    }

    #[test]
    fn en_passant_removes_bypassed_pawn() {
        let s = state("rnbqkbnr/ppp1p1pp/8/3pPp2/8/8/PPPP1PPP/RNBQKBNR w KQkq f6 0 3");
        let next = play(&s, "e5f6");
        assert_eq!(next.piece_at(sq("f6")), Some(Piece::Pawn(Color::White)));
        assert_eq!(next.piece_at(sq("f5")), None);
        assert_eq!(next.captured(), &[Piece::Pawn(Color::Black)]);
        let entry = &next.history()[0];
        assert!(entry.en_passant);
        assert!(entry.capture);
        assert_eq!(entry.san, "exf6");
        assert_eq!(next.halfmove_clock(), 0);
    }

    #[test]
    fn promotion_places_chosen_piece() {
        let s = state("7k/4P3/8/8/8/8/8/4K3 w - - 3 40");
        let next = play(&s, "e7e8n");
        assert_eq!(next.piece_at(sq("e8")), Some(Piece::Knight(Color::White)));
        assert_eq!(next.history()[0].promotion, Some(PieceType::Knight));
        assert_eq!(next.halfmove_clock(), 0);
    }

    #[test]
    fn rook_move_and_corner_capture_revoke_rights() {
        let s = state("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1");
        let next = play(&s, "h1h8");
        // white lost K by moving the rook, black lost k by losing the h8 rook
        assert_eq!(next.castling_rights().to_fen(), "Qq");
        assert_eq!(next.captured(), &[Piece::Rook(Color::Black)]);
    }

    #[test]
    fn king_move_revokes_both_rights() {
        let s = state("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 5 10");
        let next = play(&s, "e1d1");
        assert_eq!(next.castling_rights().to_fen(), "kq");
        assert_eq!(next.halfmove_clock(), 6);
        assert_eq!(next.fullmove_number(), 10);
    }

    #[test]
    fn counters_saturate_at_their_maximum() {
        let s = state("4k3/8/8/8/8/8/8/R3K3 w - - 4294967295 1");
        let next = play(&s, "a1a2");
        assert_eq!(next.halfmove_clock(), u32::MAX);

        let s = state("4k3/8/8/8/8/8/8/R3K3 b - - 0 4294967295");
        let next = play(&s, "e8d8");
        assert_eq!(next.fullmove_number(), u32::MAX);
    }

    #[test]
    fn castle_side_detection() {
        let king = Piece::King(Color::White);
        assert_eq!(
            castle_side(&Move::new(sq("e1"), sq("g1"), king)),
            Some(CastleSide::Kingside)
        );
        assert_eq!(
            castle_side(&Move::new(sq("e1"), sq("c1"), king)),
            Some(CastleSide::Queenside)
        );
        assert_eq!(castle_side(&Move::new(sq("e1"), sq("f1"), king)), None);
        assert_eq!(
            castle_side(&Move::new(sq("e1"), sq("g1"), Piece::Rook(Color::White))),
            None
        );
    }
}
