//! Standard [chess pieces]: [`PieceKind`] describes raw geometric movement
//! patterns, [`Piece`] is a kind placed on the board by a player and filters
//! the pattern down to the moves that are actually possible in a given
//! [`Board`].
//!
//! [chess pieces]: https://en.wikipedia.org/wiki/Chess_piece

use std::fmt;
use std::hash::{Hash, Hasher};
use std::mem;

use anyhow::bail;
use arrayvec::ArrayVec;

use crate::chess::bitboard::Bitboard;
use crate::chess::board::Board;
use crate::chess::core::{Color, Square, BOARD_WIDTH, KING_FILE};
use crate::chess::error::Error;

const KING_OFFSETS: [(i8, i8); 8] = [
    (1, 0),
    (-1, 0),
    (0, 1),
    (0, -1),
    (1, 1),
    (-1, 1),
    (1, -1),
    (-1, -1),
];

const KNIGHT_OFFSETS: [(i8, i8); 8] = [
    (2, 1),
    (2, -1),
    (-2, 1),
    (-2, -1),
    (1, 2),
    (-1, 2),
    (1, -2),
    (-1, -2),
];

/// Kind of a chess piece. Pawns are the only pieces whose movement depends on
/// the owner, hence the color they advance towards is a part of the kind.
///
/// Two kinds are equal when they have the same name: `Pawn(White)` equals
/// `Pawn(Black)`.
#[allow(missing_docs)]
#[derive(Clone, Copy, Debug)]
pub enum PieceKind {
    King,
    Queen,
    Rook,
    Bishop,
    Knight,
    Pawn(Color),
}

impl PartialEq for PieceKind {
    fn eq(&self, other: &Self) -> bool {
        mem::discriminant(self) == mem::discriminant(other)
    }
}

impl Eq for PieceKind {}

impl Hash for PieceKind {
    fn hash<H: Hasher>(&self, state: &mut H) {
        mem::discriminant(self).hash(state);
    }
}

impl PieceKind {
    #[allow(missing_docs)]
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::King => "King",
            Self::Queen => "Queen",
            Self::Rook => "Rook",
            Self::Bishop => "Bishop",
            Self::Knight => "Knight",
            Self::Pawn(_) => "Pawn",
        }
    }

    /// One-letter uppercase code used in the move notation.
    #[must_use]
    pub const fn code(self) -> char {
        match self {
            Self::King => 'K',
            Self::Queen => 'Q',
            Self::Rook => 'R',
            Self::Bishop => 'B',
            Self::Knight => 'N',
            Self::Pawn(_) => 'P',
        }
    }

    /// Unicode chess glyph for the piece of given color.
    #[must_use]
    pub const fn symbol(self, color: Color) -> char {
        match (color, self) {
            (Color::White, Self::King) => '♔',
            (Color::White, Self::Queen) => '♕',
            (Color::White, Self::Rook) => '♖',
            (Color::White, Self::Bishop) => '♗',
            (Color::White, Self::Knight) => '♘',
            (Color::White, Self::Pawn(_)) => '♙',
            (Color::Black, Self::King) => '♚',
            (Color::Black, Self::Queen) => '♛',
            (Color::Black, Self::Rook) => '♜',
            (Color::Black, Self::Bishop) => '♝',
            (Color::Black, Self::Knight) => '♞',
            (Color::Black, Self::Pawn(_)) => '♟',
        }
    }

    /// Parses the uppercase notation code. The color is only used for pawns.
    ///
    /// # Errors
    ///
    /// If the code is not one of "KQRBNP".
    pub fn from_code(code: char, color: Color) -> anyhow::Result<Self> {
        match code {
            'K' => Ok(Self::King),
            'Q' => Ok(Self::Queen),
            'R' => Ok(Self::Rook),
            'B' => Ok(Self::Bishop),
            'N' => Ok(Self::Knight),
            'P' => Ok(Self::Pawn(color)),
            _ => bail!("piece code should be within \"KQRBNP\", got '{code}'"),
        }
    }

    /// Returns true for the pieces moving any number of squares along a line.
    #[must_use]
    pub const fn is_sliding(self) -> bool {
        matches!(self, Self::Queen | Self::Rook | Self::Bishop)
    }

    /// Unconstrained geometric movement pattern from `position`: the squares
    /// reachable on an empty board, clipped to the board edges.
    ///
    /// Only the pawn looks at the board: it captures diagonally only when an
    /// opponent's piece is there and can't double-push through an occupied
    /// square. Blocking for the sliding pieces is applied by
    /// [`Piece::possible_moves`].
    #[must_use]
    pub fn legal_moves(self, position: Square, board: &Board) -> Bitboard {
        match self {
            Self::King => offsets(position, &KING_OFFSETS),
            Self::Knight => offsets(position, &KNIGHT_OFFSETS),
            Self::Queen => {
                (position.diagonals() | position.orthogonals()) - Bitboard::from(position)
            },
            Self::Rook => position.orthogonals() - Bitboard::from(position),
            Self::Bishop => position.diagonals() - Bitboard::from(position),
            Self::Pawn(color) => pawn_pattern(color, position, board),
        }
    }

    /// Squares a pawn of given color standing on `position` attacks,
    /// regardless of whether there is anything to capture.
    #[must_use]
    pub fn pawn_attacks(color: Color, position: Square) -> Bitboard {
        if position.y() == (!color).home_rank() {
            return Bitboard::empty();
        }
        [-1, 1]
            .into_iter()
            .filter_map(|dx| position.shift(dx, color.direction()))
            .collect()
    }
}

fn offsets(position: Square, deltas: &[(i8, i8)]) -> Bitboard {
    deltas
        .iter()
        .filter_map(|(dx, dy)| position.shift(*dx, *dy))
        .collect()
}

fn pawn_pattern(color: Color, position: Square, board: &Board) -> Bitboard {
    // Reaching the last rank means promotion, which is not supported: the
    // pawn is simply stuck there.
    if position.y() == (!color).home_rank() {
        return Bitboard::empty();
    }
    let mut result = Bitboard::empty();
    let advance = position + (0, color.direction());
    result.insert(advance);
    if position.y() == color.pawn_rank() && !board.contains(advance) {
        result.insert(position + (0, 2 * color.direction()));
    }
    for target in PieceKind::pawn_attacks(color, position) {
        if board.at(target).is_some_and(|piece| piece.color() != color) {
            result.insert(target);
        }
    }
    result
}

impl fmt::Display for PieceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Represents a specific piece owned by a player and placed on the board.
///
/// Pieces are values: moving one produces a new piece with the updated
/// position and the "touched" flag set. The flag is never reset and gates
/// castling eligibility.
#[derive(Clone, Copy, Debug)]
pub struct Piece {
    kind: PieceKind,
    color: Color,
    position: Square,
    touched: bool,
}

impl Piece {
    /// Places an untouched piece on the board.
    #[must_use]
    pub fn new(kind: PieceKind, color: Color, position: Square) -> Self {
        debug_assert!(position.within_board(), "{position:?} is outside of the board");
        let kind = match kind {
            PieceKind::Pawn(_) => PieceKind::Pawn(color),
            kind => kind,
        };
        Self {
            kind,
            color,
            position,
            touched: false,
        }
    }

    /// Returns the same piece marked as having moved before. Useful for
    /// setting up positions where the king or rook has lost castling rights.
    #[must_use]
    pub const fn mark_touched(self) -> Self {
        Self {
            touched: true,
            ..self
        }
    }

    #[allow(missing_docs)]
    #[must_use]
    pub const fn kind(&self) -> PieceKind {
        self.kind
    }

    #[allow(missing_docs)]
    #[must_use]
    pub const fn color(&self) -> Color {
        self.color
    }

    #[allow(missing_docs)]
    #[must_use]
    pub const fn position(&self) -> Square {
        self.position
    }

    /// Returns true if the piece has ever moved.
    #[must_use]
    pub const fn is_touched(&self) -> bool {
        self.touched
    }

    /// Notation letter: uppercase for White, lowercase for Black.
    #[must_use]
    pub fn letter(&self) -> char {
        match self.color {
            Color::White => self.kind.code(),
            Color::Black => self.kind.code().to_ascii_lowercase(),
        }
    }

    /// Unicode glyph of the piece.
    #[must_use]
    pub const fn symbol(&self) -> char {
        self.kind.symbol(self.color)
    }

    /// Moves the piece without any validation.
    pub(super) const fn moved(self, target: Square) -> Self {
        Self {
            position: target,
            touched: true,
            ..self
        }
    }

    /// Calculates the squares this piece can move to: the kind's pattern
    /// filtered by the pieces on the board.
    ///
    /// - Own pieces can never be captured.
    /// - Sliding pieces can't move through other pieces. An opponent's piece
    ///   can still be captured, everything behind it is out of reach.
    /// - Pawns can't capture straight ahead.
    /// - The king can't step on an attacked square or next to the opponent's
    ///   king. It can castle when neither it nor the rook has moved, the
    ///   squares between them are vacant and none of the squares the king
    ///   passes through is attacked.
    ///
    /// Moves of pieces other than king are not checked for exposing the own
    /// king: see [`Board::possible_moves`] for the complete legality.
    #[must_use]
    pub fn possible_moves(&self, board: &Board) -> Bitboard {
        let pattern = self.kind.legal_moves(self.position, board);
        let own = board.occupancy(self.color);
        match self.kind {
            kind if kind.is_sliding() => self.line_of_sight(pattern, board) - own,
            PieceKind::Pawn(_) => self.pawn_moves(pattern, board) - own,
            PieceKind::King => self.king_moves(pattern - own, board),
            _ => pattern - own,
        }
    }

    /// Squares this piece attacks, i.e. where it would capture an opponent's
    /// piece if there was one. This includes the squares occupied by own
    /// pieces (they are defended), and pawns attack diagonally instead of
    /// pushing.
    ///
    /// The king's attacks are its raw adjacency: computing them never
    /// consults the opponent's moves, so this can be used while evaluating
    /// the king legality itself.
    #[must_use]
    pub fn attacked_squares(&self, board: &Board) -> Bitboard {
        match self.kind {
            PieceKind::Pawn(color) => PieceKind::pawn_attacks(color, self.position),
            kind if kind.is_sliding() => {
                self.line_of_sight(kind.legal_moves(self.position, board), board)
            },
            kind => kind.legal_moves(self.position, board),
        }
    }

    /// Returns the moved piece.
    ///
    /// # Errors
    ///
    /// [`Error::IllegalMove`] if the target is not among the
    /// [`Piece::possible_moves`].
    pub fn move_to(&self, target: Square, board: &Board) -> Result<Self, Error> {
        if !self.possible_moves(board).contains(target) {
            return Err(Error::illegal(format!("{self} can not move to {target}")));
        }
        Ok(self.moved(target))
    }

    /// Removes the pattern squares hidden behind other pieces.
    fn line_of_sight(&self, pattern: Bitboard, board: &Board) -> Bitboard {
        let mut visible = pattern;
        for blocker in pattern & board.occupied() {
            for target in pattern {
                if target.blocked_by(self.position, blocker) {
                    visible.remove(target);
                }
            }
        }
        visible
    }

    fn pawn_moves(&self, pattern: Bitboard, board: &Board) -> Bitboard {
        let direction = self.color.direction();
        let advance = self.position + (0, direction);
        let double_advance = self.position + (0, 2 * direction);
        let mut result = pattern;
        if board.contains(advance) {
            result.remove(advance);
            result.remove(double_advance);
        } else if board.contains(double_advance) {
            result.remove(double_advance);
        }
        result
    }

    fn king_moves(&self, candidates: Bitboard, board: &Board) -> Bitboard {
        let opponent = !self.color;
        // Opponent's king is excluded from the attacked squares to break the
        // mutual recursion, its adjacency is added directly.
        let mut danger = board.attacked_squares(opponent);
        if let Some(king) = board.king(opponent) {
            danger |= king.attacked_squares(board);
        }
        (candidates - danger) | self.castling_targets(board, danger)
    }

    fn castling_targets(&self, board: &Board, danger: Bitboard) -> Bitboard {
        let mut targets = Bitboard::empty();
        let rank = self.color.home_rank();
        if self.touched || self.position != Square::new(KING_FILE, rank) {
            return targets;
        }
        let rooks: ArrayVec<Self, 2> = [0, BOARD_WIDTH - 1]
            .into_iter()
            .filter_map(|x| board.at(Square::new(x, rank)))
            .filter(|rook| rook.kind == PieceKind::Rook && rook.color == self.color && !rook.touched)
            .copied()
            .collect();
        for rook in rooks {
            let (from, to) = (
                self.position.x().min(rook.position.x()),
                self.position.x().max(rook.position.x()),
            );
            if (from + 1..to).any(|x| board.contains(Square::new(x, rank))) {
                continue;
            }
            let step = (rook.position.x() - self.position.x()).signum();
            let path = [
                self.position,
                self.position + (step, 0),
                self.position + (2 * step, 0),
            ];
            if path.iter().any(|square| danger.contains(*square)) {
                continue;
            }
            targets.insert(self.position + (2 * step, 0));
        }
        targets
    }
}

/// Two pieces are equal if they are of the same kind, color and stand on the
/// same square; the "touched" flag is not compared.
impl PartialEq for Piece {
    fn eq(&self, other: &Self) -> bool {
        self.kind == other.kind && self.color == other.color && self.position == other.position
    }
}

impl Eq for Piece {}

impl Hash for Piece {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.kind.hash(state);
        self.color.hash(state);
        self.position.hash(state);
    }
}

/// A placed piece equals a bare kind when the names match.
impl PartialEq<PieceKind> for Piece {
    fn eq(&self, other: &PieceKind) -> bool {
        self.kind == *other
    }
}

impl fmt::Display for Piece {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.letter(), self.position)
    }
}
