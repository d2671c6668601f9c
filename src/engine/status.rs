//! Check, mate and draw detection.

use crate::engine::attacks;
use crate::engine::board::Board;
use crate::engine::fen;
use crate::engine::movegen;
use crate::engine::state::{GameState, StatusFlags};
use crate::engine::types::{Color, DrawReason, PieceType, Square};

/// Whether `color`'s king is attacked. A side without a king is never in check.
pub fn in_check(state: &GameState, color: Color) -> bool {
    state
        .board
        .king_square(color)
        .is_some_and(|king| attacks::is_square_attacked(&state.board, king, !color))
}

pub fn is_checkmate(state: &GameState) -> bool {
    in_check(state, state.turn) && movegen::legal(state).is_empty()
}

pub fn is_stalemate(state: &GameState) -> bool {
    !in_check(state, state.turn) && movegen::legal(state).is_empty()
}

/// Drawn by stalemate or by a draw rule. A checkmate is never a draw, even
/// on the hundredth half-move.
pub fn is_draw(state: &GameState) -> bool {
    if draw_reason(state).is_some() {
        !is_checkmate(state)
    } else {
        is_stalemate(state)
    }
}

/// The first applicable draw rule, checked as fifty-move, repetition,
/// then material.
pub fn draw_reason(state: &GameState) -> Option<DrawReason> {
    if is_fifty_move_draw(state) {
        Some(DrawReason::FiftyMoveRule)
    } else if is_threefold_repetition(state) {
        Some(DrawReason::ThreefoldRepetition)
    } else if is_insufficient_material(&state.board) {
        Some(DrawReason::InsufficientMaterial)
    } else {
        None
    }
}

/// 100 half-moves without a pawn move or capture.
pub fn is_fifty_move_draw(state: &GameState) -> bool {
    state.halfmove_clock >= 100
}

/// The current position (placement, side, castling, en passant) has
/// appeared at least twice before.
pub fn is_threefold_repetition(state: &GameState) -> bool {
    let current = state.position_key();
    state
        .position_history
        .iter()
        .filter(|earlier| fen::position_key(earlier) == current)
        .count()
        >= 2
}

/// Neither side can possibly mate: each has at most one minor piece, or
/// exactly two bishops standing on the same square colour.
pub fn is_insufficient_material(board: &Board) -> bool {
    side_cannot_mate(board, Color::White) && side_cannot_mate(board, Color::Black)
}

fn side_cannot_mate(board: &Board, color: Color) -> bool {
    let heavy = [PieceType::Pawn, PieceType::Rook, PieceType::Queen];
    if heavy.iter().any(|&kind| !board.bb(color, kind).is_empty()) {
        return false;
    }
    let knights = board.bb(color, PieceType::Knight).count();
    let bishops = board.bb(color, PieceType::Bishop);
    match (knights, bishops.count()) {
        (0, 0) | (1, 0) | (0, 1) => true,
        (0, 2) => same_square_colour(bishops.iter()),
        _ => false,
    }
}

fn same_square_colour(mut squares: impl Iterator<Item = Square>) -> bool {
    match squares.next() {
        Some(first) => squares.all(|sq| sq.is_light() == first.is_light()),
        None => true,
    }
}

/// Full classification, generating legal moves once.
pub fn classify(state: &GameState) -> StatusFlags {
    let check = in_check(state, state.turn);
    let no_moves = movegen::legal(state).is_empty();
    let checkmate = check && no_moves;
    let stalemate = !check && no_moves;
    // A mate on the hundredth half-move is still a mate.
    let draw_reason = if checkmate || stalemate {
        None
    } else {
        draw_reason(state)
    };
    StatusFlags {
        check,
        checkmate,
        stalemate,
        draw: stalemate || draw_reason.is_some(),
        draw_reason,
    }
}

/// `state` with its cached flags filled in.
pub(crate) fn with_status(mut state: GameState) -> GameState {
    state.status = classify(&state);
    state
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
