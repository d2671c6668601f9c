//! Stateful game controller over the immutable rules façade.
//!
//! `Game` keeps the position a game started from and the state it has
//! reached. Moves replace the current state; undo rebuilds it by replaying
//! every move but the last from the initial state.

use tracing::debug;

use crate::engine::rules;
use crate::engine::state::{GameState, HistoryEntry};
use crate::engine::types::{ChessError, Color, GameStatus, Move, Square};

/// A game in progress.
#[derive(Clone, Debug)]
pub struct Game {
    initial: GameState,
    current: GameState,
}

impl Game {
    // -----------------------------------------------------------------
    // Constructors
    // -----------------------------------------------------------------

    /// A new game from the standard starting position.
    pub fn new() -> Self {
        let initial = rules::starting_position();
        Self {
            current: initial.clone(),
            initial,
        }
    }

    /// A game starting from a FEN position.
    pub fn from_fen(fen: &str) -> Result<Self, ChessError> {
        let initial = rules::parse_position(fen)?;
        Ok(Self {
            current: initial.clone(),
            initial,
        })
    }

    // -----------------------------------------------------------------
    // Accessors
    // -----------------------------------------------------------------

    pub fn state(&self) -> &GameState {
        &self.current
    }

    pub fn initial_state(&self) -> &GameState {
        &self.initial
    }

    pub fn status(&self) -> GameStatus {
        self.current.status()
    }

    pub fn side_to_move(&self) -> Color {
        self.current.turn()
    }

    pub fn history(&self) -> &[HistoryEntry] {
        self.current.history()
    }

    pub fn legal_moves(&self) -> Vec<Move> {
        rules::legal_moves(&self.current, None)
    }

    pub fn legal_moves_from(&self, sq: Square) -> Vec<Move> {
        rules::legal_moves(&self.current, Some(sq))
    }

    pub fn is_game_over(&self) -> bool {
        self.status().is_game_over()
    }

    pub fn to_fen(&self) -> String {
        self.current.to_fen()
    }

    /// FEN of the position the game started from.
    pub fn starting_fen(&self) -> String {
        self.initial.to_fen()
    }

    // -----------------------------------------------------------------
    // Moves
    // -----------------------------------------------------------------

    /// Play a move and return its SAN.
    ///
    /// Fails with `ChessError::GameOver` once the game has finished and with
    /// `ChessError::IllegalMove` if `mv` is not legal; the game is unchanged
    /// in both cases.
    pub fn make_move(&mut self, mv: &Move) -> Result<String, ChessError> {
        let status = self.status();
        if status.is_game_over() {
            return Err(ChessError::GameOver(status.to_string()));
        }
        let next = rules::make_move(&self.current, mv)?;
        let san = next
            .last_move()
            .map(|entry| entry.san.clone())
            .unwrap_or_default();
        self.current = next;
        Ok(san)
    }

    /// Play a move given in compact `e2e4` form.
    pub fn make_uci_move(&mut self, text: &str) -> Result<String, ChessError> {
        let mv = crate::engine::uci::parse_uci(&self.current, text)?;
        self.make_move(&mv)
    }

    /// Play a move given in SAN.
    pub fn make_san_move(&mut self, text: &str) -> Result<String, ChessError> {
        let mv = crate::engine::san::parse_san(&self.current, text)?;
        self.make_move(&mv)
    }

    /// Take back the last move and return it.
    pub fn undo(&mut self) -> Result<Move, ChessError> {
        let (last, earlier) = self
            .current
            .history()
            .split_last()
            .ok_or(ChessError::NothingToUndo)?;
        let last = last.mv;
        let moves: Vec<Move> = earlier.iter().map(|entry| entry.mv).collect();
        self.current = rules::replay(&self.initial, &moves)?;
        debug!(mv = %last, plies = moves.len(), "undid move by replay");
        Ok(last)
    }

    /// Start over from a new FEN position, dropping all history.
    pub fn load_fen(&mut self, fen: &str) -> Result<(), ChessError> {
        *self = Self::from_fen(fen)?;
        Ok(())
    }
}

impl Default for Game {
    fn default() -> Self {
        Self::new()
    }
}

// =========================================================================
// Tests
// =========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::types::{DrawReason, Piece};

    fn sq(name: &str) -> Square {
        Square::from_algebraic(name).unwrap()
    }

    fn play(g: &mut Game, moves: &[&str]) {
        for text in moves {
            g.make_uci_move(text)
                .unwrap_or_else(|e| panic!("{text}: {e}"));
        }
    }

    // -----------------------------------------------------------------
    // Construction
    // -----------------------------------------------------------------

    #[test]
    fn new_game_is_active() {
        let g = Game::new();
        assert_eq!(g.status(), GameStatus::Active);
        assert!(!g.is_game_over());
        assert_eq!(g.side_to_move(), Color::White);
        assert_eq!(g.state().fullmove_number(), 1);
        assert_eq!(g.legal_moves().len(), 20);
    }

    #[test]
    fn game_from_fen() {
        let g =
            Game::from_fen("rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq e3 0 1").unwrap();
        assert_eq!(g.side_to_move(), Color::Black);
        assert_eq!(g.starting_fen(), g.to_fen());
    }

    #[test]
    fn game_from_invalid_fen() {
        assert!(matches!(
            Game::from_fen("invalid"),
            Err(ChessError::InvalidFen(_))
        ));
    }

    // -----------------------------------------------------------------
    // Making moves
    // -----------------------------------------------------------------

    #[test]
    fn make_move_e2e4() {
        let mut g = Game::new();
        let mv = Move::new(sq("e2"), sq("e4"), Piece::Pawn(Color::White));
        assert_eq!(g.make_move(&mv).unwrap(), "e4");
        assert_eq!(g.side_to_move(), Color::Black);
        assert_eq!(g.history().len(), 1);
        assert_eq!(g.legal_moves_from(sq("e7")).len(), 2);
    }

    #[test]
    fn make_illegal_move_errors() {
        let mut g = Game::new();
        let mv = Move::new(sq("e2"), sq("e5"), Piece::Pawn(Color::White));
        assert!(matches!(
            g.make_move(&mv),
            Err(ChessError::IllegalMove { .. })
        ));
        assert!(g.history().is_empty());
    }

    #[test]
    fn make_move_on_finished_game_errors() {
        let mut g = Game::new();
        // Fool's mate.
        play(&mut g, &["f2f3", "e7e5", "g2g4", "d8h4"]);
        assert_eq!(g.status(), GameStatus::Checkmate);
        assert!(g.is_game_over());
        assert_eq!(g.history().last().unwrap().san, "Qh4#");

        let mv = Move::new(sq("e2"), sq("e4"), Piece::Pawn(Color::White));
        assert!(matches!(g.make_move(&mv), Err(ChessError::GameOver(_))));
    }

    #[test]
    fn san_moves() {
        let mut g = Game::new();
        assert_eq!(g.make_san_move("Nf3").unwrap(), "Nf3");
        assert_eq!(g.make_san_move("d5").unwrap(), "d5");
        assert!(g.make_san_move("Nf3").is_err());
    }

    // -----------------------------------------------------------------
    // Undo
    // -----------------------------------------------------------------

    #[test]
    fn undo_single_move() {
        let mut g = Game::new();
        let original = g.state().clone();
        play(&mut g, &["e2e4"]);
        let undone = g.undo().unwrap();
        assert_eq!(undone.to_uci(), "e2e4");
        assert_eq!(g.state(), &original);
    }

    #[test]
    fn undo_restores_castling_and_en_passant() {
        let mut g = Game::from_fen("r3k2r/8/8/8/3p4/8/4P3/R3K2R w KQkq - 0 1").unwrap();
        play(&mut g, &["e2e4"]);
        let after_push = g.to_fen();
        play(&mut g, &["d4e3", "e1g1"]);
        g.undo().unwrap();
        g.undo().unwrap();
        assert_eq!(g.to_fen(), after_push);
        assert_eq!(g.state().en_passant(), Some(sq("e3")));
        assert_eq!(g.history().len(), 1);
    }

    #[test]
    fn undo_reopens_finished_game() {
        let mut g = Game::new();
        play(&mut g, &["f2f3", "e7e5", "g2g4", "d8h4"]);
        g.undo().unwrap();
        assert!(!g.is_game_over());
        play(&mut g, &["d8g5"]);
    }

    #[test]
    fn undo_nothing_errors() {
        let mut g = Game::new();
        assert_eq!(g.undo(), Err(ChessError::NothingToUndo));
    }

    // -----------------------------------------------------------------
    // Status detection
    // -----------------------------------------------------------------

    #[test]
    fn scholars_mate() {
        let mut g = Game::new();
        play(
            &mut g,
            &["e2e4", "e7e5", "f1c4", "b8c6", "d1h5", "g8f6", "h5f7"],
        );
        assert_eq!(g.status(), GameStatus::Checkmate);
        assert!(g.is_game_over());
    }

    #[test]
    fn stalemate_detection() {
        let g = Game::from_fen("k7/2K5/1Q6/8/8/8/8/8 b - - 0 1").unwrap();
        assert_eq!(g.status(), GameStatus::Stalemate);
        assert!(g.is_game_over());
    }

    #[test]
    fn fifty_move_rule_detection() {
        let g = Game::from_fen("4k3/8/8/8/8/8/4P3/4K3 w - - 100 80").unwrap();
        assert_eq!(g.status(), GameStatus::Draw(DrawReason::FiftyMoveRule));
    }

    #[test]
    fn threefold_repetition() {
        let mut g = Game::new();
        let shuffle = ["g1f3", "g8f6", "f3g1", "f6g8"];
        play(&mut g, &shuffle);
        // Starting position seen twice: not yet a draw.
        assert_eq!(g.status(), GameStatus::Active);
        play(&mut g, &shuffle);
        assert_eq!(
            g.status(),
            GameStatus::Draw(DrawReason::ThreefoldRepetition)
        );
        assert!(g.make_uci_move("e2e4").is_err());
    }

    // -----------------------------------------------------------------
    // Load FEN
    // -----------------------------------------------------------------

    #[test]
    fn load_fen_resets_game() {
        let mut g = Game::new();
        play(&mut g, &["e2e4"]);
        g.load_fen("4k3/8/8/8/8/8/8/4K3 w - - 0 1").unwrap();
        assert!(g.history().is_empty());
        assert_eq!(g.starting_fen(), "4k3/8/8/8/8/8/8/4K3 w - - 0 1");
        assert!(g.load_fen("bad").is_err());
    }
}
