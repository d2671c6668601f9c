//! Compact from/to move encoding (`e2e4`, `e7e8q`), as used by UCI engines.

use crate::engine::movegen;
use crate::engine::state::GameState;
use crate::engine::types::{ChessError, Move, PieceType, Square};

/// Resolve a compact move string to the matching legal move in `state`.
pub fn parse_uci(state: &GameState, text: &str) -> Result<Move, ChessError> {
    let (from, to, promotion) = parse_parts(text)?;
    movegen::legal_from(state, from)
        .into_iter()
        .find(|m| m.to == to && m.promotion == promotion)
        .ok_or_else(|| ChessError::IllegalMove {
            from: from.to_algebraic(),
            to: to.to_algebraic(),
            reason: format!("'{text}' is not a legal move"),
        })
}

/// Split `text` into origin, target and optional promotion kind without
/// consulting any position.
pub fn parse_parts(text: &str) -> Result<(Square, Square, Option<PieceType>), ChessError> {
    let malformed = || ChessError::InvalidNotation(format!("'{text}' is not a compact move"));

    if !(4..=5).contains(&text.len()) || !text.is_ascii() {
        return Err(malformed());
    }
    let from = Square::from_algebraic(&text[0..2]).ok_or_else(malformed)?;
    let to = Square::from_algebraic(&text[2..4]).ok_or_else(malformed)?;
    let promotion = match text[4..].chars().next() {
        None => None,
        Some(c @ ('q' | 'r' | 'b' | 'n')) => PieceType::from_letter(c.to_ascii_uppercase()),
        Some(c) => return Err(ChessError::InvalidPromotion(c.to_string())),
    };
    Ok((from, to, promotion))
}
