//! [`Board`] is an immutable snapshot of the chess position: placement of the
//! pieces and the pieces captured so far. Applying a move produces a new
//! board, the original one is never modified.

use std::fmt;

use anyhow::bail;

use crate::chess::bitboard::Bitboard;
use crate::chess::core::{CastleSides, Color, Square, BOARD_SIZE, BOARD_WIDTH};
use crate::chess::error::Error;
use crate::chess::piece::{Piece, PieceKind};

/// Pieces on the home rank from the a-file to the h-file.
const BACK_RANK: [PieceKind; BOARD_WIDTH as usize] = [
    PieceKind::Rook,
    PieceKind::Knight,
    PieceKind::Bishop,
    PieceKind::Queen,
    PieceKind::King,
    PieceKind::Bishop,
    PieceKind::Knight,
    PieceKind::Rook,
];

/// A piece and the square it goes to.
///
/// Rendered in the positional notation: `<source><piece code><target>` (e.g.
/// `g1Nf3`), castling is written as `0-0` (kingside) and `0-0-0`
/// (queenside).
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Move {
    piece: Piece,
    target: Square,
}

impl Move {
    #[allow(missing_docs)]
    #[must_use]
    pub const fn new(piece: Piece, target: Square) -> Self {
        Self { piece, target }
    }

    /// The piece as it stands before the move.
    #[must_use]
    pub const fn piece(&self) -> Piece {
        self.piece
    }

    #[allow(missing_docs)]
    #[must_use]
    pub const fn source(&self) -> Square {
        self.piece.position()
    }

    #[allow(missing_docs)]
    #[must_use]
    pub const fn target(&self) -> Square {
        self.target
    }

    /// Returns the side if this is a castle, i.e. a king hopping two files.
    #[must_use]
    pub fn castle_side(&self) -> Option<CastleSides> {
        if self.piece != PieceKind::King {
            return None;
        }
        CastleSides::from_king_shift(self.target.x() - self.source().x())
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.castle_side() {
            Some(CastleSides::KINGSIDE) => write!(f, "0-0"),
            Some(_) => write!(f, "0-0-0"),
            None => write!(
                f,
                "{}{}{}",
                self.source(),
                self.piece.kind().code(),
                self.target
            ),
        }
    }
}

/// Classification of the position from the perspective of the player to
/// move.
#[allow(missing_docs)]
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Status {
    Normal,
    Check(Color),
    Checkmate(Color),
    Stalemate(Color),
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Normal => write!(f, "normal"),
            Self::Check(player) => write!(f, "{player:?} is in check"),
            Self::Checkmate(player) => write!(f, "{player:?} is checkmated"),
            Self::Stalemate(player) => write!(f, "{player:?} is stalemated"),
        }
    }
}

/// Piece placement and the captured pieces of both players.
///
/// The squares are indexed directly ("mailbox") for O(1) lookup, and the
/// occupancy of each player is kept in a [`Bitboard`] for the set
/// operations of move generation.
#[derive(Clone, PartialEq, Eq)]
pub struct Board {
    squares: [Option<Piece>; BOARD_SIZE as usize],
    occupancy: [Bitboard; 2],
    captured: [Vec<Piece>; 2],
}

impl Board {
    /// Board without any pieces.
    #[must_use]
    pub const fn empty() -> Self {
        Self {
            squares: [None; BOARD_SIZE as usize],
            occupancy: [Bitboard::empty(); 2],
            captured: [Vec::new(), Vec::new()],
        }
    }

    /// The standard initial position: 16 untouched pieces per player.
    #[must_use]
    pub fn starting() -> Self {
        let mut board = Self::empty();
        for color in Color::ALL {
            for (x, kind) in (0..BOARD_WIDTH).zip(BACK_RANK) {
                board.place(Piece::new(kind, color, Square::new(x, color.home_rank())));
                board.place(Piece::new(
                    PieceKind::Pawn(color),
                    color,
                    Square::new(x, color.pawn_rank()),
                ));
            }
        }
        board
    }

    /// Creates a position from arbitrary pieces. No chess-specific checks are
    /// made: a position without kings is a perfectly valid input.
    ///
    /// # Errors
    ///
    /// If a piece is outside of the board or two pieces share a square.
    pub fn new(pieces: impl IntoIterator<Item = Piece>) -> anyhow::Result<Self> {
        let mut board = Self::empty();
        for piece in pieces {
            if !piece.position().within_board() {
                bail!("piece {piece:?} is outside of the board");
            }
            if let Some(occupant) = board.at(piece.position()) {
                bail!("two pieces on {}: {occupant} and {piece}", piece.position());
            }
            board.place(piece);
        }
        Ok(board)
    }

    /// Iterates over the pieces in play, optionally only of given kind and/or
    /// color. Kinds are matched by name.
    pub fn pieces(
        &self,
        kind: Option<PieceKind>,
        color: Option<Color>,
    ) -> impl Iterator<Item = &Piece> + '_ {
        self.squares
            .iter()
            .flatten()
            .filter(move |piece| kind.map_or(true, |kind| **piece == kind))
            .filter(move |piece| color.map_or(true, |color| piece.color() == color))
    }

    /// Piece standing on the square, if any.
    #[must_use]
    pub fn at(&self, square: Square) -> Option<&Piece> {
        if !square.within_board() {
            return None;
        }
        self.squares[square.index() as usize].as_ref()
    }

    /// Returns true if any piece stands on the square.
    #[must_use]
    pub fn contains(&self, square: Square) -> bool {
        self.occupied().contains(square)
    }

    #[allow(missing_docs)]
    #[must_use]
    pub fn king(&self, color: Color) -> Option<&Piece> {
        self.pieces(Some(PieceKind::King), Some(color)).next()
    }

    /// Squares occupied by the pieces of given color.
    #[must_use]
    pub const fn occupancy(&self, color: Color) -> Bitboard {
        self.occupancy[color.index()]
    }

    /// Squares occupied by any piece.
    #[must_use]
    pub fn occupied(&self) -> Bitboard {
        self.occupancy[0] | self.occupancy[1]
    }

    /// Pieces of given color that were captured by the opponent, in the order
    /// of capture.
    #[must_use]
    pub fn captured(&self, color: Color) -> &[Piece] {
        &self.captured[color.index()]
    }

    /// Squares attacked by the player. Kings do not contribute: this is the
    /// query king legality itself is built on.
    #[must_use]
    pub fn attacked_squares(&self, player: Color) -> Bitboard {
        self.pieces(None, Some(player))
            .filter(|piece| **piece != PieceKind::King)
            .fold(Bitboard::empty(), |attacks, piece| {
                attacks | piece.attacked_squares(self)
            })
    }

    /// Lists the moves of the player.
    ///
    /// With `give_check` the moves are the attacks: kings are skipped and
    /// pawns target their diagonals. Squares of own pieces are never targets.
    /// Otherwise these are the legal moves, i.e. the ones not leaving the
    /// player's king in check.
    #[must_use]
    pub fn possible_moves(&self, player: Color, give_check: bool) -> Vec<Move> {
        let pieces = self.pieces(None, Some(player));
        if give_check {
            let own = self.occupancy(player);
            pieces
                .filter(|piece| **piece != PieceKind::King)
                .flat_map(move |piece| {
                    (piece.attacked_squares(self) - own)
                        .into_iter()
                        .map(move |target| Move::new(*piece, target))
                })
                .collect()
        } else {
            pieces
                .flat_map(|piece| {
                    self.legal_targets(piece)
                        .into_iter()
                        .map(move |target| Move::new(*piece, target))
                })
                .collect()
        }
    }

    /// Squares the piece can move to without exposing own king.
    #[must_use]
    pub fn legal_targets(&self, piece: &Piece) -> Bitboard {
        piece
            .possible_moves(self)
            .into_iter()
            .filter(|target| !self.apply(*piece, *target).is_check(piece.color()))
            .collect()
    }

    /// Returns true if the player's king is attacked. A player without king
    /// is never in check.
    #[must_use]
    pub fn is_check(&self, player: Color) -> bool {
        self.king(player).is_some_and(|king| {
            self.attacked_squares(!player).contains(king.position())
        })
    }

    #[allow(missing_docs)]
    #[must_use]
    pub fn is_checkmate(&self, player: Color) -> bool {
        !self.has_moves(player) && self.is_check(player)
    }

    #[allow(missing_docs)]
    #[must_use]
    pub fn is_stalemate(&self, player: Color) -> bool {
        !self.has_moves(player) && !self.is_check(player)
    }

    /// Classifies the position for the player to move.
    #[must_use]
    pub fn status(&self, player: Color) -> Status {
        match (self.is_check(player), self.has_moves(player)) {
            (true, true) => Status::Check(player),
            (true, false) => Status::Checkmate(player),
            (false, false) => Status::Stalemate(player),
            (false, true) => Status::Normal,
        }
    }

    fn has_moves(&self, player: Color) -> bool {
        self.pieces(None, Some(player))
            .any(|piece| !self.legal_targets(piece).is_empty())
    }

    /// Sides the player can castle to right now.
    #[must_use]
    pub fn castle_sides(&self, player: Color) -> CastleSides {
        let Some(king) = self.king(player) else {
            return CastleSides::empty();
        };
        let targets = self.legal_targets(king);
        let mut sides = CastleSides::empty();
        for side in [CastleSides::KINGSIDE, CastleSides::QUEENSIDE] {
            let castles = side.king_target(player).is_some_and(|target| {
                targets.contains(target) && Move::new(*king, target).castle_side() == Some(side)
            });
            if castles {
                sides |= side;
            }
        }
        sides
    }

    /// Moves the piece to the target square and returns the resulting board.
    ///
    /// An opponent's piece on the target square is captured. A king hopping
    /// two files castles: the rook jumps to the square the king passed.
    ///
    /// Whether the move leaves the mover's own king in check is not verified
    /// here, see [`Board::legal_targets`].
    ///
    /// # Errors
    ///
    /// [`Error::IllegalMove`] if the piece is not on the board, the target is
    /// occupied by a piece of the same color, or the piece can't move there.
    pub fn make_move(&self, piece: &Piece, target: Square) -> Result<Self, Error> {
        let piece = match self.at(piece.position()) {
            Some(on_board) if on_board == piece => *on_board,
            _ => return Err(Error::illegal(format!("{piece} is not on the board"))),
        };
        if let Some(occupant) = self.at(target) {
            if occupant.color() == piece.color() {
                return Err(Error::illegal(format!(
                    "{piece} can not capture own piece {occupant}"
                )));
            }
        }
        let moved = piece.move_to(target, self)?;
        Ok(self.relocate(piece, moved))
    }

    /// Returns the board with the piece added.
    ///
    /// # Errors
    ///
    /// [`Error::IllegalMove`] if the square is occupied or outside of the
    /// board.
    pub fn add(&self, piece: Piece) -> Result<Self, Error> {
        let mut board = self.clone();
        board.put(piece)?;
        Ok(board)
    }

    /// Returns the board without the piece.
    ///
    /// # Errors
    ///
    /// [`Error::IllegalMove`] if the piece is not on the board.
    pub fn remove(&self, piece: &Piece) -> Result<Self, Error> {
        let mut board = self.clone();
        match board.take(piece.position()) {
            Some(removed) if removed == *piece => Ok(board),
            _ => Err(Error::illegal(format!("{piece} is not on the board"))),
        }
    }

    /// Returns the board with the piece removed from play and recorded as
    /// captured.
    ///
    /// # Errors
    ///
    /// [`Error::IllegalMove`] if the piece is not on the board.
    pub fn capture(&self, piece: &Piece) -> Result<Self, Error> {
        let mut board = self.remove(piece)?;
        board.captured[piece.color().index()].push(*piece);
        Ok(board)
    }

    /// Applies the move without any legality checks.
    pub(super) fn apply(&self, piece: Piece, target: Square) -> Self {
        self.relocate(piece, piece.moved(target))
    }

    /// Replaces `piece` with `moved`, capturing whatever stands on the new
    /// square. A castling king brings its rook along.
    fn relocate(&self, piece: Piece, moved: Piece) -> Self {
        let target = moved.position();
        let mut board = self.clone();
        if let Some(victim) = board.take(target) {
            tracing::trace!(%piece, %victim, "capture");
            board.captured[victim.color().index()].push(victim);
        }
        let _ = board.take(piece.position());
        if let Some(side) = Move::new(piece, target).castle_side() {
            let rank = piece.color().home_rank();
            let (rook_file, step) = if side == CastleSides::KINGSIDE {
                (BOARD_WIDTH - 1, 1)
            } else {
                (0, -1)
            };
            if let Some(rook) = board.take(Square::new(rook_file, rank)) {
                let rook = rook.moved(target + (-step, 0));
                tracing::trace!(%piece, %rook, ?side, "castle");
                board.place(rook);
            }
        }
        board.place(moved);
        board
    }

    fn put(&mut self, piece: Piece) -> Result<(), Error> {
        let square = piece.position();
        if !square.within_board() {
            return Err(Error::illegal(format!("{square} is outside of the board")));
        }
        if let Some(occupant) = self.at(square) {
            return Err(Error::illegal(format!("{square} is occupied by {occupant}")));
        }
        self.place(piece);
        Ok(())
    }

    fn place(&mut self, piece: Piece) {
        let square = piece.position();
        debug_assert!(self.at(square).is_none(), "{square} is occupied");
        self.squares[square.index() as usize] = Some(piece);
        self.occupancy[piece.color().index()].insert(square);
    }

    fn take(&mut self, square: Square) -> Option<Piece> {
        if !square.within_board() {
            return None;
        }
        let piece = self.squares[square.index() as usize].take()?;
        self.occupancy[piece.color().index()].remove(square);
        Some(piece)
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::starting()
    }
}

const FILES: &str = "  abcdefgh";

impl fmt::Display for Board {
    /// Draws the board with White at the bottom. Pieces are shown by their
    /// letters and dark empty squares by `#`; the alternate form (`{:#}`)
    /// uses Unicode glyphs instead.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{FILES}")?;
        for y in (0..BOARD_WIDTH).rev() {
            write!(f, "{} ", y + 1)?;
            for x in 0..BOARD_WIDTH {
                let square = Square::new(x, y);
                let symbol = match (self.at(square), f.alternate()) {
                    (Some(piece), false) => piece.letter(),
                    (Some(piece), true) => piece.symbol(),
                    (None, false) if square.color() == Color::Black => '#',
                    (None, true) if square.color() == Color::Black => '█',
                    (None, _) => ' ',
                };
                write!(f, "{symbol}")?;
            }
            writeln!(f, " {}", y + 1)?;
        }
        write!(f, "{FILES}")
    }
}

impl fmt::Debug for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{self}")?;
        for color in Color::ALL {
            let captured = self.captured(color);
            if !captured.is_empty() {
                write!(f, "\n{color:?} captured:")?;
                for piece in captured {
                    write!(f, " {piece}")?;
                }
            }
        }
        Ok(())
    }
}

/// [Perft] (**per**formance **t**esting) counts the leaf nodes of the legal
/// move tree of given depth. Comparing the numbers against the known values
/// is the standard way to validate move generation.
///
/// [Perft]: https://www.chessprogramming.org/Perft
#[must_use]
pub fn perft(board: &Board, player: Color, depth: u8) -> u64 {
    if depth == 0 {
        return 1;
    }
    let moves = board.possible_moves(player, false);
    if depth == 1 {
        return moves.len() as u64;
    }
    moves
        .iter()
        .map(|next| perft(&board.apply(next.piece(), next.target()), !player, depth - 1))
        .sum()
}
