//! FEN parsing and generation.
//!
//! Parsing accepts only the canonical spelling of each field, which is what
//! makes `serialize(parse(s)) == s` hold for every accepted string.

use crate::engine::board::Board;
use crate::engine::state::{GameState, StatusFlags};
use crate::engine::types::{CastlingRights, ChessError, Color, Piece, Square};

pub const STARTING_FEN: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

/// Parse a FEN string into a fresh `GameState` with no history.
///
/// Status flags are left unset; [`crate::engine::rules::parse_position`]
/// classifies the position as well.
pub fn parse(text: &str) -> Result<GameState, ChessError> {
    let fields: Vec<&str> = text.split(' ').collect();
    if fields.len() != 6 || fields.iter().any(|f| f.is_empty()) {
        return Err(ChessError::InvalidFen(format!(
            "expected 6 space-separated fields in '{text}'"
        )));
    }

    let board = parse_placement(fields[0])?;

    let turn = match fields[1] {
        "w" => Color::White,
        "b" => Color::Black,
        other => {
            return Err(ChessError::InvalidFen(format!(
                "invalid side to move: '{other}'"
            )));
        }
    };

    let castling = CastlingRights::from_fen(fields[2]).ok_or_else(|| {
        ChessError::InvalidFen(format!("invalid castling string: '{}'", fields[2]))
    })?;

    let en_passant = match fields[3] {
        "-" => None,
        s => Some(Square::from_algebraic(s).ok_or_else(|| {
            ChessError::InvalidFen(format!("invalid en passant square: '{s}'"))
        })?),
    };

    let halfmove_clock = parse_counter(fields[4], "halfmove clock")?;
    let fullmove_number = parse_counter(fields[5], "fullmove number")?;
    if fullmove_number == 0 {
        return Err(ChessError::InvalidFen(
            "fullmove number must be >= 1".to_string(),
        ));
    }

    Ok(GameState {
        board,
        turn,
        castling,
        en_passant,
        halfmove_clock,
        fullmove_number,
        history: Vec::new(),
        captured: Vec::new(),
        position_history: Vec::new(),
        status: StatusFlags::default(),
    })
}

/// Export a state as FEN.
pub fn serialize(state: &GameState) -> String {
    let ep = state
        .en_passant
        .map_or_else(|| "-".to_string(), Square::to_algebraic);
    format!(
        "{} {} {} {} {} {}",
        state.board.placement_fen(),
        state.turn.fen_char(),
        state.castling.to_fen(),
        ep,
        state.halfmove_clock,
        state.fullmove_number
    )
}

/// The first four FEN fields (placement, side, castling, en passant).
pub fn position_key(fen: &str) -> &str {
    fen.match_indices(' ')
        .nth(3)
        .map_or(fen, |(i, _)| &fen[..i])
}

fn parse_placement(field: &str) -> Result<Board, ChessError> {
    let ranks: Vec<&str> = field.split('/').collect();
    if ranks.len() != 8 {
        return Err(ChessError::InvalidFen(format!(
            "expected 8 ranks, got {}",
            ranks.len()
        )));
    }

    let mut board = Board::empty();
    for (i, rank_str) in ranks.iter().enumerate() {
        let rank = 7 - i as u8;
        let mut file: u8 = 0;
        let mut after_digit = false;
        for ch in rank_str.chars() {
            if file >= 8 {
                return Err(ChessError::InvalidFen(format!(
                    "too many squares in rank {}",
                    rank + 1
                )));
            }
            if let Some(run) = ch.to_digit(10) {
                // "44" describes the same rank as "8"; only the latter round-trips.
                if !(1..=8).contains(&run) || after_digit {
                    return Err(ChessError::InvalidFen(format!(
                        "invalid empty-square run '{ch}' in rank {}",
                        rank + 1
                    )));
                }
                file += run as u8;
                after_digit = true;
            } else if let Some(piece) = Piece::from_char(ch) {
                board.put(Square::from_file_rank(file, rank), piece);
                file += 1;
                after_digit = false;
            } else {
                return Err(ChessError::InvalidFen(format!(
                    "invalid character '{ch}' in piece placement"
                )));
            }
        }
        if file != 8 {
            return Err(ChessError::InvalidFen(format!(
                "rank {} has {file} squares instead of 8",
                rank + 1
            )));
        }
    }
    Ok(board)
}

fn parse_counter(field: &str, what: &str) -> Result<u32, ChessError> {
    let canonical = field.bytes().all(|b| b.is_ascii_digit()) && (field == "0" || !field.starts_with('0'));
    if !canonical {
        return Err(ChessError::InvalidFen(format!("invalid {what}: '{field}'")));
    }
    field
        .parse()
        .map_err(|_| ChessError::InvalidFen(format!("invalid {what}: '{field}'")))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
