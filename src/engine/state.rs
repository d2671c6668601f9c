//! Immutable game state.
//!
//! A `GameState` is produced by the FEN codec and from then on only ever
//! replaced by [`crate::engine::executor::execute`]; nothing mutates one in
//! place. Besides the position itself it carries the annotated move history,
//! the captured pieces and the FEN of every earlier position, so repetition
//! can be judged from the state alone.

use serde::Serialize;

use crate::engine::board::Board;
use crate::engine::fen;
use crate::engine::types::{
    CastleSide, CastlingRights, Color, DrawReason, GameStatus, Move, Piece, PieceType, Square,
};

/// Cached check/mate/draw classification of a position.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize)]
pub struct StatusFlags {
    pub check: bool,
    pub checkmate: bool,
    pub stalemate: bool,
    pub draw: bool,
    pub draw_reason: Option<DrawReason>,
}

impl StatusFlags {
    pub fn to_status(self) -> GameStatus {
        if self.checkmate {
            GameStatus::Checkmate
        } else if self.stalemate {
            GameStatus::Stalemate
        } else if let Some(reason) = self.draw_reason {
            GameStatus::Draw(reason)
        } else if self.check {
            GameStatus::Check
        } else {
            GameStatus::Active
        }
    }
}

/// One played move with its classification and notation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HistoryEntry {
    pub mv: Move,
    /// SAN. Unsuffixed until the façade annotates it with `+`/`#`.
    pub san: String,
    pub capture: bool,
    pub castling: Option<CastleSide>,
    pub en_passant: bool,
    pub promotion: Option<PieceType>,
    pub check: bool,
    pub checkmate: bool,
}

/// A complete, immutable chess position plus the game that led to it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GameState {
    pub(crate) board: Board,
    pub(crate) turn: Color,
    pub(crate) castling: CastlingRights,
    pub(crate) en_passant: Option<Square>,
    pub(crate) halfmove_clock: u32,
    pub(crate) fullmove_number: u32,
    pub(crate) history: Vec<HistoryEntry>,
    pub(crate) captured: Vec<Piece>,
    /// FEN of every position before the current one, oldest first.
    pub(crate) position_history: Vec<String>,
    pub(crate) status: StatusFlags,
}

impl GameState {
    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn piece_at(&self, sq: Square) -> Option<Piece> {
        self.board.piece_at(sq)
    }

    /// Side to move.
    pub fn turn(&self) -> Color {
        self.turn
    }

    pub fn castling_rights(&self) -> CastlingRights {
        self.castling
    }

    pub fn en_passant(&self) -> Option<Square> {
        self.en_passant
    }

    pub fn halfmove_clock(&self) -> u32 {
        self.halfmove_clock
    }

    pub fn fullmove_number(&self) -> u32 {
        self.fullmove_number
    }

    pub fn history(&self) -> &[HistoryEntry] {
        &self.history
    }

    pub fn last_move(&self) -> Option<&HistoryEntry> {
        self.history.last()
    }

    /// SAN of every move played so far.
    pub fn san_history(&self) -> Vec<String> {
        self.history.iter().map(|e| e.san.clone()).collect()
    }

    pub fn captured(&self) -> &[Piece] {
        &self.captured
    }

    pub fn position_history(&self) -> &[String] {
        &self.position_history
    }

    /// Cached flags. Only meaningful once the state has been classified
    /// (every state returned by the façade is).
    pub fn status_flags(&self) -> StatusFlags {
        self.status
    }

    pub fn status(&self) -> GameStatus {
        self.status.to_status()
    }

    pub fn to_fen(&self) -> String {
        fen::serialize(self)
    }

    /// Placement, side, castling and en-passant fields: the part of the FEN
    /// that decides whether two positions repeat.
    pub fn position_key(&self) -> String {
        fen::position_key(&self.to_fen()).to_string()
    }
}

impl std::fmt::Display for GameState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_fen())
    }
}
