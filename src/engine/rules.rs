//! Stateless rules façade.
//!
//! Every function takes a `GameState` by reference and, where a move is
//! played, returns a new one. `make_move` runs the full pipeline:
//! validate → execute → classify → annotate.

use tracing::debug;

use crate::engine::attacks;
use crate::engine::executor;
use crate::engine::fen::{self, STARTING_FEN};
use crate::engine::movegen;
use crate::engine::san;
use crate::engine::state::GameState;
use crate::engine::status;
use crate::engine::types::{ChessError, Color, GameStatus, Move, Square};
use crate::engine::uci;
use crate::engine::validator;

/// Parse a FEN string into a classified state.
pub fn parse_position(text: &str) -> Result<GameState, ChessError> {
    fen::parse(text).map(status::with_status)
}

pub fn starting_position() -> GameState {
    parse_position(STARTING_FEN).expect("starting FEN is valid")
}

/// Play `mv` from `state`.
///
/// Only the piece, squares and promotion of `mv` are consulted. An illegal
/// move is returned as `ChessError::IllegalMove` and `state` is untouched.
pub fn make_move(state: &GameState, mv: &Move) -> Result<GameState, ChessError> {
    let Some(resolved) = validator::resolve(state, mv) else {
        debug!(mv = %mv, fen = %state.to_fen(), "rejected illegal move");
        return Err(ChessError::illegal(mv, reason_for_rejection(state, mv)));
    };

    let next = executor::execute(state, &resolved);
    let mut next = status::with_status(next);
    annotate(state, &mut next, &resolved);
    Ok(next)
}

/// Play a move given in compact `e2e4` form.
pub fn make_uci_move(state: &GameState, text: &str) -> Result<GameState, ChessError> {
    let mv = uci::parse_uci(state, text)?;
    make_move(state, &mv)
}

/// Play a move given in SAN.
pub fn make_san_move(state: &GameState, text: &str) -> Result<GameState, ChessError> {
    let mv = san::parse_san(state, text)?;
    make_move(state, &mv)
}

/// Replay `moves` from `initial`, stopping at the first illegal one.
pub fn replay<'a>(
    initial: &GameState,
    moves: impl IntoIterator<Item = &'a Move>,
) -> Result<GameState, ChessError> {
    let mut state = initial.clone();
    for mv in moves {
        state = make_move(&state, mv)?;
    }
    Ok(state)
}

/// All legal moves, or only those starting on `from`.
pub fn legal_moves(state: &GameState, from: Option<Square>) -> Vec<Move> {
    match from {
        Some(sq) => movegen::legal_from(state, sq),
        None => movegen::legal(state),
    }
}

/// Whether the side to move is in check.
pub fn is_check(state: &GameState) -> bool {
    status::in_check(state, state.turn())
}

pub fn is_checkmate(state: &GameState) -> bool {
    status::is_checkmate(state)
}

pub fn is_stalemate(state: &GameState) -> bool {
    status::is_stalemate(state)
}

pub fn is_draw(state: &GameState) -> bool {
    status::is_draw(state)
}

pub fn is_square_attacked(state: &GameState, sq: Square, by: Color) -> bool {
    attacks::is_square_attacked(state.board(), sq, by)
}

/// Freshly computed status of `state`.
pub fn game_status(state: &GameState) -> GameStatus {
    status::classify(state).to_status()
}

/// Replace the provisional notation of the move just played with the
/// suffixed SAN, and copy the check flags onto the history entry.
fn annotate(before: &GameState, after: &mut GameState, mv: &Move) {
    let text = san::move_to_san(before, after, mv);
    let flags = after.status;
    if let Some(entry) = after.history.last_mut() {
        entry.san = text;
        entry.check = flags.check;
        entry.checkmate = flags.checkmate;
    }
}

fn reason_for_rejection(state: &GameState, mv: &Move) -> &'static str {
    if mv.piece.color() != state.turn() {
        "not this side's turn"
    } else if state.piece_at(mv.from) != Some(mv.piece) {
        "piece is not on the origin square"
    } else {
        "not a legal move"
    }
}

// =========================================================================
// Tests
// =========================================================================
