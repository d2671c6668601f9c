//! Naming the opening a move list follows.

use std::collections::HashSet;
use std::sync::OnceLock;

use parking_lot::Mutex;
use serde::Serialize;
use tracing::debug;

use crate::config::{DEFAULT_OPENING_CACHE_SIZE, EngineConfig};
use crate::engine::GameState;
use crate::opening::cache::BoundedCache;
use crate::opening::corpus::{self, ChessOpening};

const MAX_SUGGESTIONS: usize = 5;
/// Shortest sequence considered for a transposition match.
const MIN_TRANSPOSITION_LEN: usize = 3;
/// Shortest shared prefix accepted as a partial match.
const MIN_PARTIAL_PREFIX: usize = 2;

/// What the detector found for a move list.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct OpeningInfo {
    pub opening: &'static ChessOpening,
    pub variation: Option<String>,
    /// Number of the opening's moves that were matched.
    pub move_number: usize,
    /// Reached by a different move order than the canonical one.
    pub transposition: bool,
    /// Popular continuations, SAN without suffixes.
    pub suggestions: Vec<String>,
}

/// Opening detector with a bounded result cache.
#[derive(Debug)]
pub struct OpeningDetector {
    openings: &'static [ChessOpening],
    cache: Mutex<BoundedCache<String, Option<OpeningInfo>>>,
}

impl OpeningDetector {
    pub fn new() -> Self {
        Self::with_cache_size(DEFAULT_OPENING_CACHE_SIZE)
    }

    pub fn with_cache_size(size: usize) -> Self {
        Self {
            openings: corpus::openings(),
            cache: Mutex::new(BoundedCache::new(size)),
        }
    }

    pub fn from_config(config: &EngineConfig) -> Self {
        Self::with_cache_size(config.opening_cache_size)
    }

    /// Detect the opening for a SAN move list, White's first move first.
    pub fn detect<S: AsRef<str>>(&self, moves: &[S]) -> Option<OpeningInfo> {
        let played: Vec<&str> = moves.iter().map(|m| strip_suffix(m.as_ref())).collect();
        let key = played.join(" ");

        if let Some(hit) = self.cache.lock().get(&key) {
            debug!(moves = %key, "opening cache hit");
            return hit.clone();
        }

        let found = self.lookup(&played);
        if let Some(evicted) = self.cache.lock().insert(key, found.clone()) {
            debug!(evicted = %evicted, "opening cache evicted entry");
        }
        found
    }

    /// Detect the opening for the moves played in `state`.
    pub fn detect_state(&self, state: &GameState) -> Option<OpeningInfo> {
        self.detect(&state.san_history())
    }

    pub fn cache_len(&self) -> usize {
        self.cache.lock().len()
    }

    pub fn clear_cache(&self) {
        self.cache.lock().clear();
    }

    fn lookup(&self, played: &[&str]) -> Option<OpeningInfo> {
        if played.is_empty() {
            return None;
        }

        if let Some(opening) = self.exact_prefix(played) {
            return Some(self.info(opening, opening.moves.len(), false, played));
        }
        if let Some((opening, matched)) = self.transposition(played) {
            return Some(self.info(opening, matched, true, played));
        }
        self.partial_prefix(played)
            .map(|(opening, matched)| self.info(opening, matched, false, played))
    }

    fn exact_prefix(&self, played: &[&str]) -> Option<&'static ChessOpening> {
        best_by(
            self.openings
                .iter()
                .filter(|o| played.starts_with(o.moves))
                .map(|o| (o, (o.moves.len(), o.popularity, o.main_line))),
        )
    }

    fn transposition(&self, played: &[&str]) -> Option<(&'static ChessOpening, usize)> {
        let white: HashSet<&str> = played.iter().step_by(2).copied().collect();
        let black: HashSet<&str> = played.iter().skip(1).step_by(2).copied().collect();

        let candidates = self.openings.iter().filter_map(|o| {
            // Still following the canonical order: not a transposition.
            if follows_in_order(o.moves, played) {
                return None;
            }
            let matched = o
                .sequences()
                .filter(|seq| seq.len() >= MIN_TRANSPOSITION_LEN)
                .filter_map(|seq| {
                    let hits = seq
                        .iter()
                        .enumerate()
                        .filter(|(i, mv)| {
                            let side = if i % 2 == 0 { &white } else { &black };
                            side.contains(**mv)
                        })
                        .count();
                    (hits * 4 >= seq.len() * 3).then_some(hits)
                })
                .max()?;
            Some(((o, matched), (matched, o.popularity, o.main_line)))
        });
        best_by(candidates)
    }

    fn partial_prefix(&self, played: &[&str]) -> Option<(&'static ChessOpening, usize)> {
        let candidates = self.openings.iter().filter_map(|o| {
            let shared = o
                .moves
                .iter()
                .zip(played)
                .take_while(|(a, b)| a == b)
                .count();
            (shared >= MIN_PARTIAL_PREFIX)
                .then_some(((o, shared), (shared, o.popularity, o.main_line)))
        });
        best_by(candidates)
    }

    fn info(
        &self,
        opening: &'static ChessOpening,
        move_number: usize,
        transposition: bool,
        played: &[&str],
    ) -> OpeningInfo {
        OpeningInfo {
            opening,
            variation: opening.variation().map(str::to_string),
            move_number,
            transposition,
            suggestions: self.suggestions(played),
        }
    }

    /// Next moves of every opening that extends `played`, most popular first.
    fn suggestions(&self, played: &[&str]) -> Vec<String> {
        let mut next: Vec<(&ChessOpening, &str)> = self
            .openings
            .iter()
            .filter(|o| o.moves.len() > played.len() && o.moves.starts_with(played))
            .map(|o| (o, o.moves[played.len()]))
            .collect();
        // Stable sort keeps corpus order among equals.
        next.sort_by_key(|(o, _)| (std::cmp::Reverse(o.popularity), !o.main_line));

        let mut seen = HashSet::new();
        next.into_iter()
            .filter(|(_, mv)| seen.insert(*mv))
            .take(MAX_SUGGESTIONS)
            .map(|(_, mv)| mv.to_string())
            .collect()
    }
}

impl Default for OpeningDetector {
    fn default() -> Self {
        Self::new()
    }
}

/// Detect with a process-wide detector using the default cache size.
pub fn detect_opening<S: AsRef<str>>(moves: &[S]) -> Option<OpeningInfo> {
    static SHARED: OnceLock<OpeningDetector> = OnceLock::new();
    SHARED.get_or_init(OpeningDetector::new).detect(moves)
}

/// Whether `played` and `line` agree move for move as far as both go.
fn follows_in_order(line: &[&str], played: &[&str]) -> bool {
    line.iter().zip(played).all(|(a, b)| a == b)
}

/// Drop check, mate and annotation marks: `Qxf7#` → `Qxf7`.
fn strip_suffix(san: &str) -> &str {
    san.trim().trim_end_matches(['+', '#', '!', '?'])
}

/// Highest key wins; the earliest item wins a tie.
fn best_by<T, K: Ord>(items: impl Iterator<Item = (T, K)>) -> Option<T> {
    let mut best: Option<(T, K)> = None;
    for (item, key) in items {
        if best.as_ref().is_none_or(|(_, top)| key > *top) {
            best = Some((item, key));
        }
    }
    best.map(|(item, _)| item)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn name(info: &Option<OpeningInfo>) -> Option<&'static str> {
        info.as_ref().map(|i| i.opening.name)
    }

    #[test]
    fn empty_list_detects_nothing() {
        let d = OpeningDetector::new();
        assert_eq!(d.detect::<&str>(&[]), None);
    }

    #[test]
    fn longest_exact_prefix_wins() {
        let d = OpeningDetector::new();
        let info = d.detect(&["e4", "e5", "Nf3", "Nc6", "Bb5", "a6", "Ba4", "Nf6"]);
        assert_eq!(name(&info), Some("Ruy Lopez: Morphy Defense"));
        let info = info.unwrap();
        assert_eq!(info.move_number, 7);
        assert!(!info.transposition);
        assert_eq!(info.variation.as_deref(), Some("Morphy Defense"));
    }

    #[test]
    fn single_move_opening() {
        let d = OpeningDetector::new();
        assert_eq!(name(&d.detect(&["c4"])), Some("English Opening"));
        assert_eq!(name(&d.detect(&["e4"])), None);
    }

    #[test]
    fn suffixes_are_ignored() {
        let d = OpeningDetector::new();
        let plain = d.detect(&["e4", "e5", "f4"]);
        let marked = d.detect(&["e4", "e5!", "f4!?"]);
        assert_eq!(plain, marked);
        assert_eq!(name(&plain), Some("King's Gambit"));
    }

    #[test]
    fn transposed_move_order() {
        let d = OpeningDetector::new();
        let info = d.detect(&["Nf3", "d5", "d4", "Nf6", "Bf4"]).unwrap();
        assert_eq!(info.opening.name, "London System");
        assert!(info.transposition);
        assert_eq!(info.move_number, 5);
    }

    #[test]
    fn unfinished_canonical_order_is_not_a_transposition() {
        let d = OpeningDetector::new();
        let info = d.detect(&["d4", "Nf6", "c4", "g6", "Nc3"]).unwrap();
        assert!(!info.transposition);
        assert_eq!(info.opening.name, "King's Indian Defense");
        assert_eq!(info.move_number, 5);
        assert_eq!(info.suggestions, vec!["Bg7", "d5"]);
    }

    #[test]
    fn transposition_respects_colour() {
        // Same moves, but played by the wrong sides.
        let d = OpeningDetector::new();
        assert_eq!(d.detect(&["Nf3", "d4", "d5", "Bf4", "Nf6"]), None);
    }

    #[test]
    fn partial_prefix_fallback() {
        let d = OpeningDetector::new();
        // No corpus line starts 1.d4 Nf6 2.Bg5; the shared prefix is two moves.
        let info = d.detect(&["d4", "Nf6", "Bg5"]).unwrap();
        assert!(!info.transposition);
        assert_eq!(info.opening.name, "King's Indian Defense");
        assert_eq!(info.move_number, 2);
        assert!(info.suggestions.is_empty());
    }

    #[test]
    fn suggestions_follow_popularity() {
        let d = OpeningDetector::new();
        let info = d.detect(&["e4", "e5", "Nf3", "Nc6"]).unwrap();
        assert_eq!(info.opening.name, "King's Pawn Game");
        // Ruy Lopez (10) ahead of the Italian (9) and the Scotch (6).
        assert_eq!(info.suggestions, vec!["Bb5", "Bc4", "d4"]);

        let info = d.detect(&["d4"]);
        assert!(info.is_none());
    }

    #[test]
    fn suggestions_are_capped_and_distinct() {
        let d = OpeningDetector::new();
        let info = d.detect(&["d4", "Nf6", "c4"]).unwrap();
        assert!(info.suggestions.len() <= MAX_SUGGESTIONS);
        let unique: HashSet<_> = info.suggestions.iter().collect();
        assert_eq!(unique.len(), info.suggestions.len());
        assert_eq!(info.suggestions.first().map(String::as_str), Some("g6"));
    }

    #[test]
    fn cache_records_and_clears() {
        let d = OpeningDetector::with_cache_size(2);
        d.detect(&["e4", "c5"]);
        d.detect(&["e4", "c5"]);
        assert_eq!(d.cache_len(), 1);
        d.detect(&["d4", "d5"]);
        d.detect(&["c4"]);
        assert_eq!(d.cache_len(), 2);
        d.clear_cache();
        assert_eq!(d.cache_len(), 0);
    }

    #[test]
    fn misses_are_cached_too() {
        let d = OpeningDetector::with_cache_size(4);
        assert!(d.detect(&["a3"]).is_none());
        assert_eq!(d.cache_len(), 1);
    }

    #[test]
    fn best_by_keeps_first_on_tie() {
        let items = [("a", 1), ("b", 3), ("c", 3)].into_iter();
        assert_eq!(best_by(items), Some("b"));
        assert_eq!(best_by(std::iter::empty::<(u8, u8)>()), None);
    }
}
