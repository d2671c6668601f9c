//! Chess rules and position engine with opening recognition.
//!
//! [`engine`] owns positions, move generation, execution, notation and
//! game-end detection; [`opening`] names the opening a move list follows and
//! proposes weighted book moves.

pub mod config;
pub mod engine;
pub mod opening;
