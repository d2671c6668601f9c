//! Opening recognition and book moves.
//!
//! [`corpus`] holds the named openings, [`OpeningDetector`] names the line a
//! move list follows, and [`OpeningBook`] turns the corpus into weighted
//! move choices per position.

pub mod book;
pub mod cache;
pub mod corpus;
pub mod detector;

pub use book::{OpeningBook, WeightedMove, book_move};
pub use corpus::{ChessOpening, Difficulty, OpeningStats};
pub use detector::{OpeningDetector, OpeningInfo, detect_opening};
