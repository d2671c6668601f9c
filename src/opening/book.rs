//! Weighted opening book built from the corpus.
//!
//! Every corpus sequence is replayed through the rules engine once. Each
//! position it passes through gains the move played there, weighted by how
//! popular the opening is, whether it is the canonical line, and how many
//! games reached it.

use std::collections::HashMap;
use std::sync::OnceLock;

use rand::Rng;
use serde::Serialize;
use tracing::{debug, warn};

use crate::config::{EngineConfig, MAX_BOOK_SKILL};
use crate::engine::{GameState, rules, san};
use crate::opening::corpus::{self, ChessOpening};

const MAIN_LINE_BONUS: f64 = 1.5;

/// A candidate book move in compact `e2e4` form.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct WeightedMove {
    pub uci: String,
    pub weight: f64,
    /// The first opening that reached this move.
    pub opening: &'static str,
}

/// Position key → candidate moves, in corpus order.
#[derive(Debug, Default)]
pub struct OpeningBook {
    table: HashMap<String, Vec<WeightedMove>>,
}

impl OpeningBook {
    /// The book built from the full corpus, constructed on first use.
    pub fn global() -> &'static OpeningBook {
        static BOOK: OnceLock<OpeningBook> = OnceLock::new();
        BOOK.get_or_init(|| OpeningBook::from_openings(corpus::openings()))
    }

    pub fn from_openings(openings: &'static [ChessOpening]) -> Self {
        let mut book = OpeningBook::default();
        let mut skipped = 0usize;
        for opening in openings {
            let bonus = game_count_bonus(opening.stats.games) * f64::from(opening.popularity);
            for (index, seq) in opening.sequences().enumerate() {
                let canonical = index == 0;
                let weight = if canonical && opening.main_line {
                    bonus * MAIN_LINE_BONUS
                } else {
                    bonus
                };
                if !book.add_line(opening, seq, weight) {
                    skipped += 1;
                }
            }
        }
        debug!(
            positions = book.table.len(),
            openings = openings.len(),
            skipped,
            "opening book built"
        );
        book
    }

    /// Replay one line, crediting every move. Returns false if the line
    /// broke off early.
    fn add_line(&mut self, opening: &'static ChessOpening, seq: &[&str], weight: f64) -> bool {
        let mut state = rules::starting_position();
        for text in seq {
            let played = san::parse_san(&state, text)
                .and_then(|mv| rules::make_move(&state, &mv).map(|next| (mv, next)));
            let (mv, next) = match played {
                Ok(pair) => pair,
                Err(e) => {
                    warn!(opening = opening.name, mv = %text, error = %e, "skipping rest of book line");
                    return false;
                }
            };
            self.credit(state.position_key(), mv.to_uci(), weight, opening.name);
            state = next;
        }
        true
    }

    fn credit(&mut self, key: String, uci: String, weight: f64, opening: &'static str) {
        let moves = self.table.entry(key).or_default();
        match moves.iter_mut().find(|m| m.uci == uci) {
            Some(existing) => existing.weight += weight,
            None => moves.push(WeightedMove {
                uci,
                weight,
                opening,
            }),
        }
    }

    /// Number of positions with at least one book move.
    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    /// All book moves for `state`, heaviest weight not guaranteed first.
    pub fn candidates(&self, state: &GameState) -> &[WeightedMove] {
        self.table
            .get(&state.position_key())
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn book_move(&self, state: &GameState, skill: u8) -> Option<String> {
        self.book_move_with_rng(state, skill, &mut rand::thread_rng())
    }

    /// Pick a weighted-random book move. Higher `skill` drops more of the
    /// lightly weighted candidates first; skill 0 keeps them all.
    pub fn book_move_with_rng<R: Rng + ?Sized>(
        &self,
        state: &GameState,
        skill: u8,
        rng: &mut R,
    ) -> Option<String> {
        let candidates = self.candidates(state);
        let best = candidates.iter().map(|m| m.weight).fold(0.0, f64::max);
        let skill = skill.min(MAX_BOOK_SKILL);
        let threshold = best * f64::from(skill) / f64::from(MAX_BOOK_SKILL) * 0.5;

        let eligible: Vec<&WeightedMove> = candidates
            .iter()
            .filter(|m| m.weight >= threshold)
            .collect();
        choose_weighted(&eligible, rng).map(|m| m.uci.clone())
    }

    /// `book_move` honouring the configured skill and on/off switch.
    pub fn suggest(&self, state: &GameState, config: &EngineConfig) -> Option<String> {
        if !config.book_enabled {
            return None;
        }
        self.book_move(state, config.book_skill)
    }
}

/// Book move for `state` from the shared book.
pub fn book_move(state: &GameState, skill: u8) -> Option<String> {
    OpeningBook::global().book_move(state, skill)
}

fn game_count_bonus(games: u32) -> f64 {
    1.0 + f64::from(games.max(1)).log10() / 10.0
}

fn choose_weighted<'a, R: Rng + ?Sized>(
    moves: &[&'a WeightedMove],
    rng: &mut R,
) -> Option<&'a WeightedMove> {
    let total: f64 = moves.iter().map(|m| m.weight).sum();
    if !(total > 0.0) {
        return moves.first().copied();
    }
    let mut roll = rng.gen_range(0.0..total);
    for m in moves {
        if roll < m.weight {
            return Some(*m);
        }
        roll -= m.weight;
    }
    moves.last().copied()
}
