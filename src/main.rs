use chess_rules::config::EngineConfig;
use chess_rules::engine::{ChessError, Color, Game, uci};
use chess_rules::opening::{OpeningBook, OpeningDetector};

const USAGE: &str = "usage: chess-rules [--fen <FEN>] [MOVE ...]\n\
                     Moves may be SAN (Nf3, exd5, O-O, e8=Q) or compact (g1f3, e7e8q).";

fn main() {
    // Initialize tracing (structured logging).
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "chess_rules=info".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    if args.iter().any(|a| a == "-h" || a == "--help") {
        println!("{USAGE}");
        return;
    }

    if let Err(e) = run(&args) {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

fn run(args: &[String]) -> Result<(), ChessError> {
    let config = EngineConfig::from_env();
    let (fen, moves) = split_args(args)?;

    let mut game = match fen {
        Some(fen) => Game::from_fen(fen)?,
        None => Game::new(),
    };
    for text in moves {
        play(&mut game, text)?;
    }
    tracing::info!(plies = game.history().len(), "position reached");

    let state = game.state();
    println!("fen:     {}", game.to_fen());
    let initial = game.initial_state();
    println!(
        "moves:   {}",
        numbered(&state.san_history(), initial.fullmove_number(), initial.turn())
    );
    println!("status:  {}", game.status());

    // Openings are only meaningful from the standard start.
    if fen.is_none() {
        let detector = OpeningDetector::from_config(&config);
        match detector.detect_state(state) {
            Some(info) => {
                let kind = if info.transposition { " (by transposition)" } else { "" };
                println!("opening: {} [{}]{kind}", info.opening.name, info.opening.eco);
                if !info.suggestions.is_empty() {
                    println!("next:    {}", info.suggestions.join(", "));
                }
            }
            None => println!("opening: unknown"),
        }
    }
    if !game.is_game_over()
        && let Some(uci) = OpeningBook::global().suggest(state, &config)
    {
        println!("book:    {uci}");
    }
    Ok(())
}

fn split_args(args: &[String]) -> Result<(Option<&str>, &[String]), ChessError> {
    match args {
        [flag, fen, rest @ ..] if flag == "--fen" => Ok((Some(fen.as_str()), rest)),
        [flag] if flag == "--fen" => Err(ChessError::InvalidFen("--fen needs a value".into())),
        rest => Ok((None, rest)),
    }
}

/// Compact form when the text parses as one, SAN otherwise.
fn play(game: &mut Game, text: &str) -> Result<String, ChessError> {
    if uci::parse_parts(text).is_ok() {
        game.make_uci_move(text)
    } else {
        game.make_san_move(text)
    }
}

/// `1. e4 e5 2. Nf3`, numbered from the position the game started in.
fn numbered(sans: &[String], first_move: u32, first_side: Color) -> String {
    let offset = usize::from(first_side == Color::Black);
    let mut out = Vec::with_capacity(sans.len() * 2);
    for (i, san) in sans.iter().enumerate() {
        let ply = i + offset;
        let number = first_move as usize + ply / 2;
        if ply % 2 == 0 {
            out.push(format!("{number}."));
        } else if i == 0 {
            out.push(format!("{number}..."));
        }
        out.push(san.clone());
    }
    out.join(" ")
}
