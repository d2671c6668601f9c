//! Standard Algebraic Notation (SAN) generation and parsing.
//!
//! SAN examples: `e4`, `Nf3`, `Bxe5`, `O-O`, `e8=Q+`, `Raxd1#`.

use crate::engine::executor;
use crate::engine::movegen;
use crate::engine::state::GameState;
use crate::engine::types::{CastleSide, ChessError, Move, PieceType, Square};

// =========================================================================
// SAN generation
// =========================================================================

/// Full SAN for `mv`, played from `before` and resulting in `after`.
///
/// `after` must already carry its status flags; they decide the `+`/`#`
/// suffix.
pub fn move_to_san(before: &GameState, after: &GameState, mv: &Move) -> String {
    let mut san = base_notation(before, mv);
    san.push_str(check_suffix(after));
    san
}

/// SAN without the check/mate suffix.
pub fn base_notation(before: &GameState, mv: &Move) -> String {
    notation_with(mv, &movegen::legal(before))
}

/// `#` for a mated position, `+` for check, otherwise nothing.
pub fn check_suffix(after: &GameState) -> &'static str {
    let flags = after.status_flags();
    if flags.checkmate {
        "#"
    } else if flags.check {
        "+"
    } else {
        ""
    }
}

/// Unsuffixed SAN given the legal moves of the position (passed in to avoid
/// regenerating them).
fn notation_with(mv: &Move, legal: &[Move]) -> String {
    // Prefer the generated twin: it knows about captures the caller may not.
    let mv = legal
        .iter()
        .find(|m| m.same_action(mv))
        .copied()
        .unwrap_or(*mv);

    match executor::castle_side(&mv) {
        Some(CastleSide::Kingside) => return "O-O".into(),
        Some(CastleSide::Queenside) => return "O-O-O".into(),
        None => {}
    }

    let kind = mv.piece.kind();
    let mut san = String::with_capacity(8);

    if kind == PieceType::Pawn {
        if mv.is_capture() {
            // Prefix with departure file on captures: "exd5".
            san.push(mv.from.file_char());
            san.push('x');
        }
        san.push_str(&mv.to.to_algebraic());
        if let Some(promo) = mv.promotion {
            san.push('=');
            san.push(promo.letter());
        }
    } else {
        san.push(kind.letter());
        san.push_str(&disambiguation(&mv, legal));
        if mv.is_capture() {
            san.push('x');
        }
        san.push_str(&mv.to.to_algebraic());
    }

    san
}

/// File, rank, or both, when another piece of the same kind and colour can
/// also reach the target.
fn disambiguation(mv: &Move, legal: &[Move]) -> String {
    let rivals: Vec<&Move> = legal
        .iter()
        .filter(|m| m.piece == mv.piece && m.to == mv.to && m.from != mv.from)
        .collect();

    if rivals.is_empty() {
        return String::new();
    }

    let same_file = rivals.iter().any(|m| m.from.file() == mv.from.file());
    let same_rank = rivals.iter().any(|m| m.from.rank() == mv.from.rank());

    match (same_file, same_rank) {
        (false, _) => mv.from.file_char().to_string(),
        (true, false) => mv.from.rank_char().to_string(),
        (true, true) => mv.from.to_algebraic(),
    }
}

// =========================================================================
// SAN parsing
// =========================================================================

/// Parse a SAN string and return the corresponding legal move.
///
/// Accepts `e4`, `Nf3`, `Bxe5`, `O-O`, `0-0-0`, `e8=Q`, `R1a4`, `Qa1b2`.
/// Trailing `+`, `#`, `!` and `?` are ignored.
pub fn parse_san(state: &GameState, text: &str) -> Result<Move, ChessError> {
    let legal = movegen::legal(state);
    let san = text.trim().trim_end_matches(['+', '#', '!', '?']);

    match san {
        "O-O" | "0-0" => return find_castling(&legal, CastleSide::Kingside, text),
        "O-O-O" | "0-0-0" => return find_castling(&legal, CastleSide::Queenside, text),
        _ => {}
    }

    let chars: Vec<char> = san.chars().collect();
    if chars.is_empty() {
        return Err(ChessError::InvalidNotation(format!("empty SAN '{text}'")));
    }

    // Promotion suffix.
    let (chars, promotion) = match chars.as_slice() {
        [head @ .., '=', letter] => {
            let kind = PieceType::from_letter(letter.to_ascii_uppercase())
                .filter(|k| k.is_promotion_target())
                .ok_or_else(|| ChessError::InvalidPromotion(letter.to_string()))?;
            (head, Some(kind))
        }
        all => (all, None),
    };

    // Piece letter; lowercase letters are files, so only uppercase counts.
    let (kind, rest) = match chars.split_first() {
        Some((&c, rest)) if c.is_ascii_uppercase() => {
            let kind = PieceType::from_letter(c)
                .filter(|&k| k != PieceType::Pawn)
                .ok_or_else(|| ChessError::InvalidNotation(format!("unknown piece in '{text}'")))?;
            (kind, rest)
        }
        _ => (PieceType::Pawn, chars),
    };

    let rest: Vec<char> = rest.iter().copied().filter(|&c| c != 'x').collect();
    if rest.len() < 2 || rest.len() > 4 {
        return Err(ChessError::InvalidNotation(format!(
            "cannot read a destination from '{text}'"
        )));
    }

    let dest_str: String = rest[rest.len() - 2..].iter().collect();
    let dest = Square::from_algebraic(&dest_str)
        .ok_or_else(|| ChessError::InvalidNotation(format!("bad destination in '{text}'")))?;

    let mut file_hint = None;
    let mut rank_hint = None;
    for &c in &rest[..rest.len() - 2] {
        match c {
            'a'..='h' if file_hint.is_none() => file_hint = Some(c as u8 - b'a'),
            '1'..='8' if rank_hint.is_none() => rank_hint = Some(c as u8 - b'1'),
            _ => {
                return Err(ChessError::InvalidNotation(format!(
                    "bad disambiguation in '{text}'"
                )));
            }
        }
    }

    let candidates: Vec<&Move> = legal
        .iter()
        .filter(|m| {
            m.to == dest
                && m.piece.kind() == kind
                && m.promotion == promotion
                && file_hint.is_none_or(|f| m.from.file() == f)
                && rank_hint.is_none_or(|r| m.from.rank() == r)
        })
        .collect();

    match candidates.as_slice() {
        [only] => Ok(**only),
        [] => Err(ChessError::IllegalMove {
            from: String::new(),
            to: dest.to_algebraic(),
            reason: format!("no legal move matches '{text}'"),
        }),
        many => Err(ChessError::InvalidNotation(format!(
            "ambiguous SAN '{text}': {} candidates",
            many.len()
        ))),
    }
}

fn find_castling(legal: &[Move], side: CastleSide, text: &str) -> Result<Move, ChessError> {
    legal
        .iter()
        .find(|m| executor::castle_side(m) == Some(side))
        .copied()
        .ok_or_else(|| ChessError::IllegalMove {
            from: String::new(),
            to: String::new(),
            reason: format!("castling '{text}' is not legal here"),
        })
}

// =========================================================================
// Tests
// =========================================================================
