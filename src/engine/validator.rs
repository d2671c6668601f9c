//! Move validation against the generated legal set.

use crate::engine::movegen;
use crate::engine::state::GameState;
use crate::engine::types::Move;

/// Whether `mv` is playable in `state`.
pub fn is_legal(state: &GameState, mv: &Move) -> bool {
    resolve(state, mv).is_some()
}

/// The generated legal move matching `mv`'s piece, squares and promotion.
///
/// Callers may build a move with just those four fields; the returned move
/// also carries the captured piece and classification flags.
pub fn resolve(state: &GameState, mv: &Move) -> Option<Move> {
    if mv.piece.color() != state.turn || state.piece_at(mv.from) != Some(mv.piece) {
        return None;
    }
    movegen::legal_from(state, mv.from)
        .into_iter()
        .find(|candidate| candidate.same_action(mv))
}
