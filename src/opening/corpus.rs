//! The static opening corpus.
//!
//! Every sequence is SAN from the standard starting position, White first.
//! Alternate sequences reach the same position by a different move order.

use serde::Serialize;

/// How demanding an opening is to play well.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Beginner,
    Intermediate,
    Advanced,
}

/// Results of master games reaching the opening, as whole percentages.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct OpeningStats {
    pub games: u32,
    pub white_wins: u8,
    pub draws: u8,
    pub black_wins: u8,
}

/// A named opening.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ChessOpening {
    pub name: &'static str,
    pub eco: &'static str,
    pub moves: &'static [&'static str],
    pub transpositions: &'static [&'static [&'static str]],
    pub stats: OpeningStats,
    pub difficulty: Difficulty,
    pub themes: &'static [&'static str],
    /// 1 (rare) to 10 (everywhere).
    pub popularity: u8,
    pub main_line: bool,
}

impl ChessOpening {
    /// The part of the name after `": "`, if any.
    pub fn variation(&self) -> Option<&'static str> {
        self.name.split_once(": ").map(|(_, variation)| variation)
    }

    /// Canonical sequence followed by every alternate order.
    pub fn sequences(&self) -> impl Iterator<Item = &'static [&'static str]> + '_ {
        std::iter::once(self.moves).chain(self.transpositions.iter().copied())
    }
}

const fn stats(games: u32, white_wins: u8, draws: u8, black_wins: u8) -> OpeningStats {
    OpeningStats {
        games,
        white_wins,
        draws,
        black_wins,
    }
}

/// The whole corpus.
pub fn openings() -> &'static [ChessOpening] {
    OPENINGS
}

/// Look an opening up by its exact name.
pub fn find(name: &str) -> Option<&'static ChessOpening> {
    OPENINGS.iter().find(|o| o.name == name)
}

static OPENINGS: &[ChessOpening] = &[
    // --- 1.e4 e5 ---------------------------------------------------------
    ChessOpening {
        name: "King's Pawn Game",
        eco: "C20",
        moves: &["e4", "e5"],
        transpositions: &[],
        stats: stats(1_250_000, 38, 32, 30),
        difficulty: Difficulty::Beginner,
        themes: &["center", "open game"],
        popularity: 9,
        main_line: true,
    },
    ChessOpening {
        name: "Italian Game",
        eco: "C50",
        moves: &["e4", "e5", "Nf3", "Nc6", "Bc4"],
        transpositions: &[&["Nf3", "Nc6", "e4", "e5", "Bc4"]],
        stats: stats(310_000, 39, 31, 30),
        difficulty: Difficulty::Beginner,
        themes: &["development", "f7 pressure", "center"],
        popularity: 9,
        main_line: true,
    },
    ChessOpening {
        name: "Italian Game: Giuoco Piano",
        eco: "C53",
        moves: &["e4", "e5", "Nf3", "Nc6", "Bc4", "Bc5", "c3"],
        transpositions: &[],
        stats: stats(95_000, 38, 34, 28),
        difficulty: Difficulty::Intermediate,
        themes: &["center", "d4 break", "slow maneuvering"],
        popularity: 7,
        main_line: true,
    },
    ChessOpening {
        name: "Italian Game: Two Knights Defense",
        eco: "C55",
        moves: &["e4", "e5", "Nf3", "Nc6", "Bc4", "Nf6"],
        transpositions: &[],
        stats: stats(88_000, 40, 27, 33),
        difficulty: Difficulty::Intermediate,
        themes: &["counterattack", "tactics", "f7 pressure"],
        popularity: 7,
        main_line: false,
    },
    ChessOpening {
        name: "Ruy Lopez",
        eco: "C60",
        moves: &["e4", "e5", "Nf3", "Nc6", "Bb5"],
        transpositions: &[],
        stats: stats(420_000, 39, 36, 25),
        difficulty: Difficulty::Intermediate,
        themes: &["pressure on e5", "long-term plans", "center"],
        popularity: 10,
        main_line: true,
    },
    ChessOpening {
        name: "Ruy Lopez: Morphy Defense",
        eco: "C70",
        moves: &["e4", "e5", "Nf3", "Nc6", "Bb5", "a6", "Ba4"],
        transpositions: &[],
        stats: stats(260_000, 38, 38, 24),
        difficulty: Difficulty::Advanced,
        themes: &["queenside expansion", "maneuvering"],
        popularity: 8,
        main_line: true,
    },
    ChessOpening {
        name: "Ruy Lopez: Berlin Defense",
        eco: "C65",
        moves: &["e4", "e5", "Nf3", "Nc6", "Bb5", "Nf6"],
        transpositions: &[],
        stats: stats(72_000, 33, 45, 22),
        difficulty: Difficulty::Advanced,
        themes: &["solid", "endgame", "queenless middlegame"],
        popularity: 7,
        main_line: false,
    },
    ChessOpening {
        name: "Scotch Game",
        eco: "C45",
        moves: &["e4", "e5", "Nf3", "Nc6", "d4", "exd4", "Nxd4"],
        transpositions: &[],
        stats: stats(64_000, 40, 30, 30),
        difficulty: Difficulty::Intermediate,
        themes: &["open center", "piece activity"],
        popularity: 6,
        main_line: true,
    },
    ChessOpening {
        name: "Petrov's Defense",
        eco: "C42",
        moves: &["e4", "e5", "Nf3", "Nf6"],
        transpositions: &[],
        stats: stats(58_000, 34, 44, 22),
        difficulty: Difficulty::Intermediate,
        themes: &["symmetry", "solid"],
        popularity: 6,
        main_line: true,
    },
    ChessOpening {
        name: "King's Gambit",
        eco: "C30",
        moves: &["e4", "e5", "f4"],
        transpositions: &[],
        stats: stats(41_000, 42, 20, 38),
        difficulty: Difficulty::Advanced,
        themes: &["gambit", "attack", "open f-file"],
        popularity: 4,
        main_line: true,
    },
    ChessOpening {
        name: "Vienna Game",
        eco: "C25",
        moves: &["e4", "e5", "Nc3"],
        transpositions: &[],
        stats: stats(36_000, 41, 27, 32),
        difficulty: Difficulty::Intermediate,
        themes: &["flexible", "f4 break"],
        popularity: 4,
        main_line: true,
    },
    // --- 1.e4, other replies ---------------------------------------------
    ChessOpening {
        name: "Sicilian Defense",
        eco: "B20",
        moves: &["e4", "c5"],
        transpositions: &[],
        stats: stats(980_000, 36, 28, 36),
        difficulty: Difficulty::Intermediate,
        themes: &["asymmetry", "counterattack"],
        popularity: 10,
        main_line: true,
    },
    ChessOpening {
        name: "Sicilian Defense: Najdorf Variation",
        eco: "B90",
        moves: &["e4", "c5", "Nf3", "d6", "d4", "cxd4", "Nxd4", "Nf6", "Nc3", "a6"],
        transpositions: &[],
        stats: stats(180_000, 36, 31, 33),
        difficulty: Difficulty::Advanced,
        themes: &["sharp", "opposite-side castling", "queenside play"],
        popularity: 9,
        main_line: true,
    },
    ChessOpening {
        name: "Sicilian Defense: Dragon Variation",
        eco: "B70",
        moves: &["e4", "c5", "Nf3", "d6", "d4", "cxd4", "Nxd4", "Nf6", "Nc3", "g6"],
        transpositions: &[],
        stats: stats(76_000, 39, 26, 35),
        difficulty: Difficulty::Advanced,
        themes: &["fianchetto", "sharp", "opposite-side castling"],
        popularity: 7,
        main_line: false,
    },
    ChessOpening {
        name: "Sicilian Defense: Alapin Variation",
        eco: "B22",
        moves: &["e4", "c5", "c3"],
        transpositions: &[],
        stats: stats(92_000, 37, 33, 30),
        difficulty: Difficulty::Beginner,
        themes: &["anti-sicilian", "d4 break"],
        popularity: 5,
        main_line: false,
    },
    ChessOpening {
        name: "French Defense",
        eco: "C00",
        moves: &["e4", "e6"],
        transpositions: &[],
        stats: stats(410_000, 37, 31, 32),
        difficulty: Difficulty::Intermediate,
        themes: &["pawn chain", "solid", "counterattack"],
        popularity: 8,
        main_line: true,
    },
    ChessOpening {
        name: "French Defense: Advance Variation",
        eco: "C02",
        moves: &["e4", "e6", "d4", "d5", "e5"],
        transpositions: &[],
        stats: stats(84_000, 38, 30, 32),
        difficulty: Difficulty::Intermediate,
        themes: &["space", "pawn chain"],
        popularity: 6,
        main_line: false,
    },
    ChessOpening {
        name: "Caro-Kann Defense",
        eco: "B10",
        moves: &["e4", "c6"],
        transpositions: &[],
        stats: stats(350_000, 36, 35, 29),
        difficulty: Difficulty::Beginner,
        themes: &["solid", "good bishop"],
        popularity: 8,
        main_line: true,
    },
    ChessOpening {
        name: "Caro-Kann Defense: Advance Variation",
        eco: "B12",
        moves: &["e4", "c6", "d4", "d5", "e5"],
        transpositions: &[],
        stats: stats(70_000, 37, 33, 30),
        difficulty: Difficulty::Intermediate,
        themes: &["space", "pawn chain"],
        popularity: 6,
        main_line: false,
    },
    ChessOpening {
        name: "Pirc Defense",
        eco: "B07",
        moves: &["e4", "d6", "d4", "Nf6", "Nc3", "g6"],
        transpositions: &[],
        stats: stats(48_000, 40, 28, 32),
        difficulty: Difficulty::Advanced,
        themes: &["hypermodern", "fianchetto"],
        popularity: 4,
        main_line: true,
    },
    ChessOpening {
        name: "Scandinavian Defense",
        eco: "B01",
        moves: &["e4", "d5", "exd5", "Qxd5"],
        transpositions: &[],
        stats: stats(150_000, 41, 28, 31),
        difficulty: Difficulty::Beginner,
        themes: &["early queen", "open game"],
        popularity: 5,
        main_line: true,
    },
    ChessOpening {
        name: "Alekhine's Defense",
        eco: "B02",
        moves: &["e4", "Nf6"],
        transpositions: &[],
        stats: stats(31_000, 40, 29, 31),
        difficulty: Difficulty::Advanced,
        themes: &["hypermodern", "provocation"],
        popularity: 3,
        main_line: true,
    },
    // --- 1.d4 d5 ---------------------------------------------------------
    ChessOpening {
        name: "Queen's Pawn Game",
        eco: "D00",
        moves: &["d4", "d5"],
        transpositions: &[],
        stats: stats(870_000, 38, 34, 28),
        difficulty: Difficulty::Beginner,
        themes: &["center", "closed game"],
        popularity: 8,
        main_line: true,
    },
    ChessOpening {
        name: "Queen's Gambit",
        eco: "D06",
        moves: &["d4", "d5", "c4"],
        transpositions: &[&["c4", "d5", "d4"]],
        stats: stats(520_000, 39, 36, 25),
        difficulty: Difficulty::Intermediate,
        themes: &["center", "gambit", "queenside pressure"],
        popularity: 9,
        main_line: true,
    },
    ChessOpening {
        name: "Queen's Gambit Declined",
        eco: "D30",
        moves: &["d4", "d5", "c4", "e6"],
        transpositions: &[&["c4", "e6", "d4", "d5"]],
        stats: stats(240_000, 37, 40, 23),
        difficulty: Difficulty::Intermediate,
        themes: &["solid", "minority attack"],
        popularity: 8,
        main_line: true,
    },
    ChessOpening {
        name: "Queen's Gambit Accepted",
        eco: "D20",
        moves: &["d4", "d5", "c4", "dxc4"],
        transpositions: &[],
        stats: stats(110_000, 39, 35, 26),
        difficulty: Difficulty::Intermediate,
        themes: &["isolated pawn", "open game"],
        popularity: 7,
        main_line: false,
    },
    ChessOpening {
        name: "Slav Defense",
        eco: "D10",
        moves: &["d4", "d5", "c4", "c6"],
        transpositions: &[&["c4", "c6", "d4", "d5"]],
        stats: stats(230_000, 36, 39, 25),
        difficulty: Difficulty::Intermediate,
        themes: &["solid", "light-squared bishop"],
        popularity: 8,
        main_line: true,
    },
    ChessOpening {
        name: "London System",
        eco: "D02",
        moves: &["d4", "d5", "Nf3", "Nf6", "Bf4"],
        transpositions: &[&["d4", "Nf6", "Bf4", "d5", "Nf3"]],
        stats: stats(260_000, 40, 31, 29),
        difficulty: Difficulty::Beginner,
        themes: &["system", "solid", "development"],
        popularity: 7,
        main_line: true,
    },
    // --- 1.d4 Nf6 --------------------------------------------------------
    ChessOpening {
        name: "King's Indian Defense",
        eco: "E60",
        moves: &["d4", "Nf6", "c4", "g6", "Nc3", "Bg7"],
        transpositions: &[&["c4", "Nf6", "Nc3", "g6", "d4", "Bg7"]],
        stats: stats(290_000, 39, 30, 31),
        difficulty: Difficulty::Advanced,
        themes: &["fianchetto", "kingside attack", "hypermodern"],
        popularity: 8,
        main_line: true,
    },
    ChessOpening {
        name: "Nimzo-Indian Defense",
        eco: "E20",
        moves: &["d4", "Nf6", "c4", "e6", "Nc3", "Bb4"],
        transpositions: &[&["c4", "e6", "Nc3", "Nf6", "d4", "Bb4"]],
        stats: stats(190_000, 36, 38, 26),
        difficulty: Difficulty::Advanced,
        themes: &["pin", "doubled pawns", "control of e4"],
        popularity: 8,
        main_line: true,
    },
    ChessOpening {
        name: "Queen's Indian Defense",
        eco: "E12",
        moves: &["d4", "Nf6", "c4", "e6", "Nf3", "b6"],
        transpositions: &[],
        stats: stats(98_000, 35, 43, 22),
        difficulty: Difficulty::Intermediate,
        themes: &["fianchetto", "solid"],
        popularity: 6,
        main_line: false,
    },
    ChessOpening {
        name: "Grünfeld Defense",
        eco: "D80",
        moves: &["d4", "Nf6", "c4", "g6", "Nc3", "d5"],
        transpositions: &[],
        stats: stats(120_000, 37, 35, 28),
        difficulty: Difficulty::Advanced,
        themes: &["hypermodern", "central tension", "dynamic"],
        popularity: 7,
        main_line: false,
    },
    ChessOpening {
        name: "Catalan Opening",
        eco: "E01",
        moves: &["d4", "Nf6", "c4", "e6", "g3"],
        transpositions: &[],
        stats: stats(105_000, 38, 41, 21),
        difficulty: Difficulty::Advanced,
        themes: &["fianchetto", "long diagonal", "positional"],
        popularity: 6,
        main_line: true,
    },
    ChessOpening {
        name: "Benoni Defense",
        eco: "A60",
        moves: &["d4", "Nf6", "c4", "c5", "d5", "e6"],
        transpositions: &[],
        stats: stats(52_000, 42, 28, 30),
        difficulty: Difficulty::Advanced,
        themes: &["asymmetry", "queenside majority", "sharp"],
        popularity: 4,
        main_line: true,
    },
    ChessOpening {
        name: "Dutch Defense",
        eco: "A80",
        moves: &["d4", "f5"],
        transpositions: &[],
        stats: stats(67_000, 41, 27, 32),
        difficulty: Difficulty::Advanced,
        themes: &["kingside attack", "e4 control"],
        popularity: 4,
        main_line: true,
    },
    // --- flank openings --------------------------------------------------
    ChessOpening {
        name: "English Opening",
        eco: "A10",
        moves: &["c4"],
        transpositions: &[],
        stats: stats(400_000, 38, 35, 27),
        difficulty: Difficulty::Intermediate,
        themes: &["flank", "flexible"],
        popularity: 8,
        main_line: true,
    },
    ChessOpening {
        name: "English Opening: Symmetrical Variation",
        eco: "A30",
        moves: &["c4", "c5"],
        transpositions: &[],
        stats: stats(110_000, 36, 39, 25),
        difficulty: Difficulty::Intermediate,
        themes: &["symmetry", "maneuvering"],
        popularity: 6,
        main_line: false,
    },
    ChessOpening {
        name: "Réti Opening",
        eco: "A04",
        moves: &["Nf3", "d5", "c4"],
        transpositions: &[],
        stats: stats(140_000, 37, 37, 26),
        difficulty: Difficulty::Intermediate,
        themes: &["hypermodern", "flank"],
        popularity: 6,
        main_line: true,
    },
];

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::rules;
    use std::collections::HashSet;

    #[test]
    fn every_sequence_is_legal() {
        for opening in openings() {
            for seq in opening.sequences() {
                let mut state = rules::starting_position();
                for san in seq {
                    state = rules::make_san_move(&state, san).unwrap_or_else(|e| {
                        panic!("{}: '{san}' failed: {e}", opening.name)
                    });
                }
            }
        }
    }

    #[test]
    fn transpositions_reach_the_canonical_position() {
        for opening in openings() {
            let replay = |seq: &[&str]| {
                seq.iter()
                    .fold(rules::starting_position(), |s, san| {
                        rules::make_san_move(&s, san).unwrap()
                    })
                    .position_key()
            };
            let canonical = replay(opening.moves);
            for alt in opening.transpositions {
                // Alternate orders may differ in the en-passant field only.
                let alt_key = replay(alt);
                let strip = |k: &str| k.rsplit_once(' ').map(|(head, _)| head.to_string());
                assert_eq!(strip(&alt_key), strip(&canonical), "{}", opening.name);
            }
        }
    }

    #[test]
    fn names_are_unique_and_fields_sane() {
        let mut seen = HashSet::new();
        for opening in openings() {
            assert!(seen.insert(opening.name), "duplicate {}", opening.name);
            assert!((1..=10).contains(&opening.popularity), "{}", opening.name);
            assert_eq!(opening.eco.len(), 3);
            assert!(!opening.moves.is_empty());
            let s = opening.stats;
            assert_eq!(
                u32::from(s.white_wins) + u32::from(s.draws) + u32::from(s.black_wins),
                100,
                "{}",
                opening.name
            );
        }
    }

    #[test]
    fn variation_label() {
        let najdorf = find("Sicilian Defense: Najdorf Variation").unwrap();
        assert_eq!(najdorf.variation(), Some("Najdorf Variation"));
        assert_eq!(find("Ruy Lopez").unwrap().variation(), None);
        assert!(find("Bongcloud").is_none());
    }
}
