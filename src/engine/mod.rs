pub mod attacks;
pub mod board;
pub mod executor;
pub mod fen;
pub mod game;
pub mod movegen;
pub mod rules;
pub mod san;
pub mod state;
pub mod status;
pub mod types;
pub mod uci;
pub mod validator;

pub use board::Board;
pub use fen::STARTING_FEN;
pub use game::Game;
pub use state::{GameState, HistoryEntry, StatusFlags};
pub use types::*;
