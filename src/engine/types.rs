use std::fmt;
use std::str::FromStr;

use serde::{Serialize, Serializer};

// ---------------------------------------------------------------------------
// Color
// ---------------------------------------------------------------------------

/// The two sides in a chess game.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Color {
    White,
    Black,
}

impl Color {
    /// Index for array lookups: White=0, Black=1.
    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Rank index (0-based) of this side's back rank.
    #[inline]
    pub const fn back_rank(self) -> u8 {
        match self {
            Color::White => 0,
            Color::Black => 7,
        }
    }

    /// Rank step a pawn of this colour advances by.
    #[inline]
    pub const fn forward(self) -> i8 {
        match self {
            Color::White => 1,
            Color::Black => -1,
        }
    }

    /// FEN side-to-move token.
    pub const fn fen_char(self) -> char {
        match self {
            Color::White => 'w',
            Color::Black => 'b',
        }
    }
}

impl std::ops::Not for Color {
    type Output = Self;
    fn not(self) -> Self {
        match self {
            Color::White => Color::Black,
            Color::Black => Color::White,
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(if *self == Color::White { "white" } else { "black" })
    }
}

// ---------------------------------------------------------------------------
// PieceType
// ---------------------------------------------------------------------------

/// The six piece kinds, without colour.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PieceType {
    Pawn,
    Knight,
    Bishop,
    Rook,
    Queen,
    King,
}

impl PieceType {
    pub const ALL: [PieceType; 6] = [
        PieceType::Pawn,
        PieceType::Knight,
        PieceType::Bishop,
        PieceType::Rook,
        PieceType::Queen,
        PieceType::King,
    ];

    pub const COUNT: usize = 6;

    /// Promotion choices, in the order they are generated.
    pub const PROMOTIONS: [PieceType; 4] = [
        PieceType::Queen,
        PieceType::Rook,
        PieceType::Bishop,
        PieceType::Knight,
    ];

    /// Index for array lookups: Pawn=0 .. King=5.
    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Uppercase letter used in SAN and FEN.
    pub const fn letter(self) -> char {
        match self {
            PieceType::Pawn => 'P',
            PieceType::Knight => 'N',
            PieceType::Bishop => 'B',
            PieceType::Rook => 'R',
            PieceType::Queen => 'Q',
            PieceType::King => 'K',
        }
    }

    /// Parse an uppercase SAN piece letter.
    pub fn from_letter(c: char) -> Option<Self> {
        match c {
            'P' => Some(PieceType::Pawn),
            'N' => Some(PieceType::Knight),
            'B' => Some(PieceType::Bishop),
            'R' => Some(PieceType::Rook),
            'Q' => Some(PieceType::Queen),
            'K' => Some(PieceType::King),
            _ => None,
        }
    }

    /// Knight, bishop, rook or queen.
    pub const fn is_promotion_target(self) -> bool {
        matches!(
            self,
            PieceType::Knight | PieceType::Bishop | PieceType::Rook | PieceType::Queen
        )
    }
}

impl fmt::Display for PieceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        const NAMES: [&str; PieceType::COUNT] = ["pawn", "knight", "bishop", "rook", "queen", "king"];
        f.write_str(NAMES[self.index()])
    }
}

// ---------------------------------------------------------------------------
// Piece
// ---------------------------------------------------------------------------

/// A coloured piece. Pieces are values: two white knights are equal.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Piece {
    Pawn(Color),
    Knight(Color),
    Bishop(Color),
    Rook(Color),
    Queen(Color),
    King(Color),
}

impl Piece {
    pub const fn new(kind: PieceType, color: Color) -> Self {
        match kind {
            PieceType::Pawn => Piece::Pawn(color),
            PieceType::Knight => Piece::Knight(color),
            PieceType::Bishop => Piece::Bishop(color),
            PieceType::Rook => Piece::Rook(color),
            PieceType::Queen => Piece::Queen(color),
            PieceType::King => Piece::King(color),
        }
    }

    pub const fn kind(self) -> PieceType {
        match self {
            Piece::Pawn(_) => PieceType::Pawn,
            Piece::Knight(_) => PieceType::Knight,
            Piece::Bishop(_) => PieceType::Bishop,
            Piece::Rook(_) => PieceType::Rook,
            Piece::Queen(_) => PieceType::Queen,
            Piece::King(_) => PieceType::King,
        }
    }

    pub const fn color(self) -> Color {
        match self {
            Piece::Pawn(c)
            | Piece::Knight(c)
            | Piece::Bishop(c)
            | Piece::Rook(c)
            | Piece::Queen(c)
            | Piece::King(c) => c,
        }
    }

    /// FEN character: uppercase for white, lowercase for black.
    pub fn to_char(self) -> char {
        let c = self.kind().letter();
        match self.color() {
            Color::White => c,
            Color::Black => c.to_ascii_lowercase(),
        }
    }

    /// Parse a FEN piece character.
    pub fn from_char(c: char) -> Option<Self> {
        let color = if c.is_ascii_uppercase() {
            Color::White
        } else {
            Color::Black
        };
        PieceType::from_letter(c.to_ascii_uppercase()).map(|kind| Piece::new(kind, color))
    }
}

impl fmt::Display for Piece {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.color(), self.kind())
    }
}

// ---------------------------------------------------------------------------
// Square
// ---------------------------------------------------------------------------

/// A board square, 0..63 in LERF order (a1=0, h1=7, a8=56, h8=63).
///
/// The index is private so every `Square` in existence is on the board.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Square(u8);

impl Square {
    /// Build from 0-based file and rank. Panics when either is outside 0..8,
    /// since that can only be a bug in the caller.
    #[inline]
    pub fn from_file_rank(file: u8, rank: u8) -> Self {
        assert!(
            file < 8 && rank < 8,
            "square out of range: file {file}, rank {rank}"
        );
        Square(rank * 8 + file)
    }

    /// Checked variant of [`Square::from_file_rank`].
    pub fn try_from_file_rank(file: u8, rank: u8) -> Result<Self, ChessError> {
        if file < 8 && rank < 8 {
            Ok(Square(rank * 8 + file))
        } else {
            Err(ChessError::InvalidSquare(format!("file {file}, rank {rank}")))
        }
    }

    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    #[inline]
    pub const fn file(self) -> u8 {
        self.0 & 7
    }

    #[inline]
    pub const fn rank(self) -> u8 {
        self.0 >> 3
    }

    pub const fn file_char(self) -> char {
        (b'a' + self.file()) as char
    }

    pub const fn rank_char(self) -> char {
        (b'1' + self.rank()) as char
    }

    /// Whether this is a light square (h1 is light, a1 is dark).
    pub const fn is_light(self) -> bool {
        (self.file() + self.rank()) % 2 == 1
    }

    /// The square `df` files and `dr` ranks away, if it is on the board.
    #[inline]
    pub fn offset(self, df: i8, dr: i8) -> Option<Square> {
        let f = self.file() as i8 + df;
        let r = self.rank() as i8 + dr;
        if (0..8).contains(&f) && (0..8).contains(&r) {
            Some(Square((r * 8 + f) as u8))
        } else {
            None
        }
    }

    /// All 64 squares, a1 first.
    pub fn all() -> impl Iterator<Item = Square> {
        (0..64u8).map(Square)
    }

    /// Parse lowercase algebraic notation such as `e4`.
    pub fn from_algebraic(s: &str) -> Option<Self> {
        match *s.as_bytes() {
            [f @ b'a'..=b'h', r @ b'1'..=b'8'] => Some(Square((r - b'1') * 8 + (f - b'a'))),
            _ => None,
        }
    }

    pub fn to_algebraic(self) -> String {
        self.to_string()
    }
}

impl FromStr for Square {
    type Err = ChessError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Square::from_algebraic(s).ok_or_else(|| ChessError::InvalidSquare(s.to_string()))
    }
}

impl fmt::Display for Square {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use fmt::Write;
        f.write_char(self.file_char())?;
        f.write_char(self.rank_char())
    }
}

impl Serialize for Square {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_algebraic())
    }
}

// ---------------------------------------------------------------------------
// Bitboard
// ---------------------------------------------------------------------------

/// One bit per square.
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Bitboard(pub u64);

impl Bitboard {
    pub const EMPTY: Bitboard = Bitboard(0);

    #[inline]
    const fn bit(sq: Square) -> u64 {
        1u64 << sq.0
    }

    #[inline]
    pub fn from_square(sq: Square) -> Self {
        Bitboard(Self::bit(sq))
    }

    #[inline]
    pub fn contains(self, sq: Square) -> bool {
        self.0 & Self::bit(sq) != 0
    }

    #[inline]
    pub fn insert(&mut self, sq: Square) {
        self.0 |= Self::bit(sq);
    }

    #[inline]
    pub fn remove(&mut self, sq: Square) {
        self.0 &= !Self::bit(sq);
    }

    #[inline]
    pub fn count(self) -> u32 {
        self.0.count_ones()
    }

    #[inline]
    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Lowest set square.
    #[inline]
    pub fn lsb(self) -> Option<Square> {
        (!self.is_empty()).then(|| Square(self.0.trailing_zeros() as u8))
    }

    /// Highest set square.
    #[inline]
    pub fn msb(self) -> Option<Square> {
        (!self.is_empty()).then(|| Square(63 - self.0.leading_zeros() as u8))
    }

    /// Set squares, a1 side first.
    pub fn iter(self) -> impl Iterator<Item = Square> {
        let mut rest = self.0;
        std::iter::from_fn(move || {
            let sq = Bitboard(rest).lsb()?;
            rest &= rest - 1;
            Some(sq)
        })
    }
}

macro_rules! bitboard_ops {
    ($($op:ident :: $f:ident, $assign:ident :: $fa:ident => $sym:tt;)*) => {$(
        impl std::ops::$op for Bitboard {
            type Output = Self;
            #[inline]
            fn $f(self, rhs: Self) -> Self {
                Bitboard(self.0 $sym rhs.0)
            }
        }

        impl std::ops::$assign for Bitboard {
            #[inline]
            fn $fa(&mut self, rhs: Self) {
                *self = *self $sym rhs;
            }
        }
    )*};
}

bitboard_ops! {
    BitAnd::bitand, BitAndAssign::bitand_assign => &;
    BitOr::bitor, BitOrAssign::bitor_assign => |;
}

impl std::ops::Not for Bitboard {
    type Output = Self;
    #[inline]
    fn not(self) -> Self {
        Bitboard(!self.0)
    }
}

impl fmt::Debug for Bitboard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let squares: Vec<String> = self.iter().map(|sq| sq.to_algebraic()).collect();
        write!(f, "Bitboard[{}]", squares.join(" "))
    }
}

// ---------------------------------------------------------------------------
// MoveFlags
// ---------------------------------------------------------------------------

/// Classification bits set by the move generator.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct MoveFlags(pub u8);

impl MoveFlags {
    pub const NONE: MoveFlags = MoveFlags(0);
    pub const CAPTURE: MoveFlags = MoveFlags(1);
    pub const EN_PASSANT: MoveFlags = MoveFlags(2);
    pub const CASTLING: MoveFlags = MoveFlags(4);
    pub const DOUBLE_PUSH: MoveFlags = MoveFlags(8);

    #[inline]
    pub fn contains(self, other: MoveFlags) -> bool {
        self.0 & other.0 == other.0
    }
}

impl std::ops::BitOr for MoveFlags {
    type Output = Self;
    #[inline]
    fn bitor(self, rhs: Self) -> Self {
        MoveFlags(self.0 | rhs.0)
    }
}

// ---------------------------------------------------------------------------
// Move
// ---------------------------------------------------------------------------

/// A chess move.
///
/// Callers outside the engine usually only know `from`, `to`, `piece` and
/// the promotion choice; `captured` and `flags` are filled in by the
/// generator and recovered by [`crate::engine::validator::resolve`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Move {
    pub from: Square,
    pub to: Square,
    pub piece: Piece,
    pub captured: Option<Piece>,
    pub promotion: Option<PieceType>,
    pub flags: MoveFlags,
}

impl Move {
    pub fn new(from: Square, to: Square, piece: Piece) -> Self {
        Move {
            from,
            to,
            piece,
            captured: None,
            promotion: None,
            flags: MoveFlags::NONE,
        }
    }

    pub fn with_flags(from: Square, to: Square, piece: Piece, flags: MoveFlags) -> Self {
        Move {
            flags,
            ..Move::new(from, to, piece)
        }
    }

    pub fn with_capture(from: Square, to: Square, piece: Piece, captured: Piece) -> Self {
        Move {
            captured: Some(captured),
            flags: MoveFlags::CAPTURE,
            ..Move::new(from, to, piece)
        }
    }

    /// Same move, promoting to `kind`.
    pub fn promoting_to(self, kind: PieceType) -> Self {
        Move {
            promotion: Some(kind),
            ..self
        }
    }

    #[inline]
    pub fn is_capture(&self) -> bool {
        self.captured.is_some() || self.flags.contains(MoveFlags::CAPTURE)
    }

    #[inline]
    pub fn is_en_passant(&self) -> bool {
        self.flags.contains(MoveFlags::EN_PASSANT)
    }

    #[inline]
    pub fn is_castling(&self) -> bool {
        self.flags.contains(MoveFlags::CASTLING)
    }

    #[inline]
    pub fn is_double_push(&self) -> bool {
        self.flags.contains(MoveFlags::DOUBLE_PUSH)
    }

    /// Whether two moves describe the same action (piece, squares, promotion),
    /// ignoring generator-assigned classification.
    pub fn same_action(&self, other: &Move) -> bool {
        self.piece == other.piece
            && self.from == other.from
            && self.to == other.to
            && self.promotion == other.promotion
    }

    /// Compact from/to(/promotion) encoding, e.g. `e2e4`, `e7e8q`.
    pub fn to_uci(&self) -> String {
        let mut s = format!("{}{}", self.from, self.to);
        if let Some(kind) = self.promotion {
            s.push(kind.letter().to_ascii_lowercase());
        }
        s
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_uci())
    }
}

// ---------------------------------------------------------------------------
// CastlingRights
// ---------------------------------------------------------------------------

/// Which wing a castling move goes to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CastleSide {
    Kingside,
    Queenside,
}

/// Castling availability bitfield: bits 0-3 = WK, WQ, BK, BQ.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct CastlingRights(pub u8);

impl CastlingRights {
    pub const NONE: CastlingRights = CastlingRights(0);
    pub const WHITE_KINGSIDE: u8 = 1;
    pub const WHITE_QUEENSIDE: u8 = 2;
    pub const BLACK_KINGSIDE: u8 = 4;
    pub const BLACK_QUEENSIDE: u8 = 8;
    pub const ALL: CastlingRights = CastlingRights(0b1111);

    /// The flag bit for one side and wing.
    pub const fn flag(color: Color, side: CastleSide) -> u8 {
        match (color, side) {
            (Color::White, CastleSide::Kingside) => Self::WHITE_KINGSIDE,
            (Color::White, CastleSide::Queenside) => Self::WHITE_QUEENSIDE,
            (Color::Black, CastleSide::Kingside) => Self::BLACK_KINGSIDE,
            (Color::Black, CastleSide::Queenside) => Self::BLACK_QUEENSIDE,
        }
    }

    #[inline]
    pub fn has(self, flag: u8) -> bool {
        self.0 & flag != 0
    }

    #[inline]
    pub fn can_castle(self, color: Color, side: CastleSide) -> bool {
        self.has(Self::flag(color, side))
    }

    #[inline]
    pub fn remove(&mut self, flag: u8) {
        self.0 &= !flag;
    }

    /// Parse the FEN castling field. Only the canonical spelling is
    /// accepted: `-`, or a non-empty subsequence of `KQkq` in that order.
    pub fn from_fen(s: &str) -> Option<Self> {
        if s == "-" {
            return Some(CastlingRights::NONE);
        }
        if s.is_empty() {
            return None;
        }
        let mut rights = 0u8;
        let mut last = 0u8;
        for c in s.chars() {
            let flag = match c {
                'K' => Self::WHITE_KINGSIDE,
                'Q' => Self::WHITE_QUEENSIDE,
                'k' => Self::BLACK_KINGSIDE,
                'q' => Self::BLACK_QUEENSIDE,
                _ => return None,
            };
            if flag <= last {
                return None;
            }
            last = flag;
            rights |= flag;
        }
        Some(CastlingRights(rights))
    }

    pub fn to_fen(self) -> String {
        if self.0 == 0 {
            return "-".to_string();
        }
        [
            (Self::WHITE_KINGSIDE, 'K'),
            (Self::WHITE_QUEENSIDE, 'Q'),
            (Self::BLACK_KINGSIDE, 'k'),
            (Self::BLACK_QUEENSIDE, 'q'),
        ]
        .iter()
        .filter(|(flag, _)| self.has(*flag))
        .map(|(_, c)| *c)
        .collect()
    }
}

impl fmt::Display for CastlingRights {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_fen())
    }
}

// ---------------------------------------------------------------------------
// GameStatus
// ---------------------------------------------------------------------------

/// Summary of a position's cached status flags.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum GameStatus {
    Active,
    Check,
    Checkmate,
    Stalemate,
    Draw(DrawReason),
}

impl GameStatus {
    pub fn as_str(&self) -> &str {
        match self {
            GameStatus::Active => "active",
            GameStatus::Check => "check",
            GameStatus::Checkmate => "checkmate",
            GameStatus::Stalemate => "stalemate",
            GameStatus::Draw(reason) => reason.as_str(),
        }
    }

    pub fn is_game_over(&self) -> bool {
        matches!(
            self,
            GameStatus::Checkmate | GameStatus::Stalemate | GameStatus::Draw(_)
        )
    }
}

impl fmt::Display for GameStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Why a position is drawn.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DrawReason {
    FiftyMoveRule,
    ThreefoldRepetition,
    InsufficientMaterial,
}

impl DrawReason {
    pub fn as_str(&self) -> &str {
        match self {
            DrawReason::FiftyMoveRule => "fifty_move_rule",
            DrawReason::ThreefoldRepetition => "threefold_repetition",
            DrawReason::InsufficientMaterial => "insufficient_material",
        }
    }
}

// ---------------------------------------------------------------------------
// ChessError
// ---------------------------------------------------------------------------

/// Domain errors for the rules engine.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ChessError {
    #[error("invalid FEN string: {0}")]
    InvalidFen(String),

    #[error("invalid square: {0}")]
    InvalidSquare(String),

    #[error("illegal move: {from} -> {to}: {reason}")]
    IllegalMove {
        from: String,
        to: String,
        reason: String,
    },

    #[error("invalid move notation: {0}")]
    InvalidNotation(String),

    #[error("invalid promotion piece: {0}")]
    InvalidPromotion(String),

    #[error("game is already over: {0}")]
    GameOver(String),

    #[error("no moves to undo")]
    NothingToUndo,
}

impl ChessError {
    pub(crate) fn illegal(mv: &Move, reason: impl Into<String>) -> Self {
        ChessError::IllegalMove {
            from: mv.from.to_algebraic(),
            to: mv.to.to_algebraic(),
            reason: reason.into(),
        }
    }
}
