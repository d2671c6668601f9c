//! Opening detection and book moves against the full corpus.

use chess_rules::config::EngineConfig;
use chess_rules::engine::{Game, rules};
use chess_rules::opening::{OpeningBook, OpeningDetector, book_move, corpus, detect_opening};
use rand::SeedableRng;
use rand::rngs::StdRng;

#[test]
fn every_canonical_line_detects_itself() {
    let detector = OpeningDetector::new();
    for opening in corpus::openings() {
        let info = detector
            .detect(opening.moves)
            .unwrap_or_else(|| panic!("{} not detected", opening.name));
        assert_eq!(info.opening.name, opening.name);
        assert_eq!(info.move_number, opening.moves.len());
        assert!(!info.transposition, "{}", opening.name);
    }
}

#[test]
fn detection_from_a_played_game() {
    let mut game = Game::new();
    for text in ["e4", "c5", "Nf3", "d6", "d4", "cxd4", "Nxd4", "Nf6", "Nc3", "a6", "Be3"] {
        game.make_san_move(text).unwrap();
    }
    let info = OpeningDetector::new().detect_state(game.state()).unwrap();
    assert_eq!(info.opening.name, "Sicilian Defense: Najdorf Variation");
    assert_eq!(info.opening.eco, "B90");
    assert_eq!(info.variation.as_deref(), Some("Najdorf Variation"));
}

#[test]
fn check_suffixes_do_not_hide_the_opening() {
    let info = detect_opening(&["e4", "e5", "Nf3", "Nc6", "Bb5+"]).unwrap();
    assert_eq!(info.opening.name, "Ruy Lopez");
}

#[test]
fn transposition_into_the_queens_gambit_declined() {
    let info = detect_opening(&["d4", "e6", "c4", "d5"]).unwrap();
    assert!(info.transposition);
    assert_eq!(info.opening.name, "Queen's Gambit Declined");
    assert_eq!(info.move_number, 4);
}

#[test]
fn exact_prefix_beats_transposition() {
    // Also reachable as a Queen's Gambit Declined, but 1.c4 is an exact match.
    let info = detect_opening(&["c4", "e6", "d4", "d5"]).unwrap();
    assert_eq!(info.opening.name, "English Opening");
    assert!(!info.transposition);
}

#[test]
fn unknown_first_move_detects_nothing() {
    assert!(detect_opening(&["h4"]).is_none());
    assert!(detect_opening::<&str>(&[]).is_none());
}

#[test]
fn detector_honours_configured_cache_size() {
    let config = EngineConfig {
        opening_cache_size: 1,
        ..EngineConfig::default()
    };
    let detector = OpeningDetector::from_config(&config);
    detector.detect(&["e4", "e5"]);
    detector.detect(&["d4", "d5"]);
    assert_eq!(detector.cache_len(), 1);
}

#[test]
fn opening_info_serializes_to_json() {
    let info = detect_opening(&["d4", "d5", "c4", "c6"]).unwrap();
    let json = serde_json::to_value(&info).unwrap();
    assert_eq!(json["opening"]["name"], "Slav Defense");
    assert_eq!(json["opening"]["eco"], "D10");
    assert_eq!(json["opening"]["difficulty"], "intermediate");
    assert_eq!(json["opening"]["moves"][3], "c6");
    assert_eq!(json["move_number"], 4);
    assert_eq!(json["transposition"], false);
    assert!(json["variation"].is_null());
    assert!(json["suggestions"].is_array());
}

#[test]
fn book_moves_are_legal_along_a_line() {
    let book = OpeningBook::global();
    let mut rng = StdRng::seed_from_u64(2024);
    let mut state = rules::starting_position();
    // Follow the book until it runs out.
    for _ in 0..12 {
        let Some(uci) = book.book_move_with_rng(&state, 5, &mut rng) else {
            break;
        };
        state = rules::make_uci_move(&state, &uci).unwrap();
    }
    assert!(!state.history().is_empty());
}

#[test]
fn same_seed_same_choice() {
    let state = rules::starting_position();
    let picks: Vec<_> = (0..2)
        .map(|_| {
            let mut rng = StdRng::seed_from_u64(99);
            OpeningBook::global().book_move_with_rng(&state, 0, &mut rng)
        })
        .collect();
    assert_eq!(picks[0], picks[1]);
    assert!(picks[0].is_some());
}

#[test]
fn book_out_of_the_corpus() {
    let state = rules::make_uci_move(&rules::starting_position(), "h2h4").unwrap();
    assert_eq!(book_move(&state, 10), None);
}

#[test]
fn weighted_move_serializes_to_json() {
    let start = rules::starting_position();
    let first = &OpeningBook::global().candidates(&start)[0];
    let json = serde_json::to_value(first).unwrap();
    assert_eq!(json["uci"], first.uci.as_str());
    assert!(json["weight"].as_f64().unwrap() > 0.0);
    assert!(json["opening"].is_string());
}
