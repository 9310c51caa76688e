//! Chess primitives commonly used within [`crate::chess`]: players, board
//! squares and the geometry connecting them.

use std::cmp::Ordering;
use std::fmt;
use std::ops::{Add, Not};

use anyhow::bail;
use itertools::Itertools;

use crate::chess::bitboard::Bitboard;

#[allow(missing_docs)]
pub const BOARD_WIDTH: i8 = 8;
#[allow(missing_docs)]
pub const BOARD_SIZE: u8 = 64;

/// File (column index) the king starts on for both players.
pub const KING_FILE: i8 = 4;

/// A standard game of chess is played between two players: White (having the
/// advantage of the first turn) and Black.
///
/// ```
/// use wuki::chess::core::Color;
///
/// assert_eq!(!Color::White, Color::Black);
/// assert_eq!(Color::Black.home_rank(), 7);
/// ```
#[allow(missing_docs)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Color {
    White,
    Black,
}

impl Color {
    /// Both players in the order of their turns.
    pub const ALL: [Self; 2] = [Self::White, Self::Black];

    /// Forward direction for the pawns of this color along the rank axis.
    #[must_use]
    pub const fn direction(self) -> i8 {
        match self {
            Self::White => 1,
            Self::Black => -1,
        }
    }

    /// Index of the back rank where the pieces of this color start.
    #[must_use]
    pub const fn home_rank(self) -> i8 {
        match self {
            Self::White => 0,
            Self::Black => BOARD_WIDTH - 1,
        }
    }

    /// Index of the rank pawns of this color start on and can double-push
    /// from.
    #[must_use]
    pub const fn pawn_rank(self) -> i8 {
        self.home_rank() + self.direction()
    }

    pub(super) const fn index(self) -> usize {
        match self {
            Self::White => 0,
            Self::Black => 1,
        }
    }
}

impl Not for Color {
    type Output = Self;

    /// "Flips" the color.
    fn not(self) -> Self::Output {
        match self {
            Self::White => Self::Black,
            Self::Black => Self::White,
        }
    }
}

impl TryFrom<&str> for Color {
    type Error = anyhow::Error;

    fn try_from(color: &str) -> anyhow::Result<Self> {
        match color {
            "w" => Ok(Self::White),
            "b" => Ok(Self::Black),
            _ => bail!("color should be 'w' or 'b', got '{color}'"),
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}",
            match &self {
                Self::White => 'w',
                Self::Black => 'b',
            }
        )
    }
}

/// Board coordinate: `x` is the file (column, 0 is the a-file) and `y` is the
/// rank (row, 0 is White's home rank).
///
/// Squares outside of the board can be constructed (e.g. as an intermediate
/// result of adding an offset), [`Square::within_board`] tells them apart.
///
/// ```
/// use wuki::chess::core::Square;
///
/// let square = Square::try_from("c4").unwrap();
/// assert_eq!(square, Square::new(2, 3));
/// assert_eq!(square.file_rank(), ('c', 4));
/// assert!(!Square::new(-1, 0).within_board());
/// ```
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Square {
    x: i8,
    y: i8,
}

impl Square {
    /// Creates a square from numeric coordinates. No bounds check is made.
    #[must_use]
    pub const fn new(x: i8, y: i8) -> Self {
        Self { x, y }
    }

    /// Creates a square from the chess notation pair, e.g. `('b', 5)`.
    ///
    /// # Errors
    ///
    /// If the file is not within `'a'..='h'` or the rank is not within
    /// `1..=8`.
    pub fn from_file_rank(file: char, rank: u8) -> anyhow::Result<Self> {
        let x = parse_file(file)?;
        match rank {
            1..=8 => Ok(Self::new(x, rank as i8 - 1)),
            _ => bail!("rank should be within 1..=8, got {rank}"),
        }
    }

    pub(super) const fn from_index(index: u8) -> Self {
        Self::new((index % 8) as i8, (index / 8) as i8)
    }

    /// Position of the square in the a1..h8 enumeration. Only meaningful for
    /// squares within the board.
    pub(super) fn index(self) -> u8 {
        debug_assert!(self.within_board(), "{self:?} is outside of the board");
        (self.y * BOARD_WIDTH + self.x) as u8
    }

    /// Iterates over all squares of the board from a1 to h8, rank by rank.
    pub fn iter() -> impl Iterator<Item = Self> {
        (0..BOARD_SIZE).map(Self::from_index)
    }

    #[allow(missing_docs)]
    #[must_use]
    pub const fn x(self) -> i8 {
        self.x
    }

    #[allow(missing_docs)]
    #[must_use]
    pub const fn y(self) -> i8 {
        self.y
    }

    /// Numeric `(x, y)` coordinates.
    #[must_use]
    pub const fn coords(self) -> (i8, i8) {
        (self.x, self.y)
    }

    /// Letter of the file the square is located on.
    #[must_use]
    pub fn file(self) -> char {
        debug_assert!(self.within_board(), "{self:?} is outside of the board");
        (b'a' + self.x as u8) as char
    }

    /// Rank number (1-based) the square is located on.
    #[must_use]
    pub fn rank(self) -> u8 {
        debug_assert!(self.within_board(), "{self:?} is outside of the board");
        self.y as u8 + 1
    }

    /// Chess notation pair, the inverse of [`Square::from_file_rank`].
    #[must_use]
    pub fn file_rank(self) -> (char, u8) {
        (self.file(), self.rank())
    }

    #[allow(missing_docs)]
    #[must_use]
    pub const fn within_board(self) -> bool {
        0 <= self.x && self.x < BOARD_WIDTH && 0 <= self.y && self.y < BOARD_WIDTH
    }

    /// Color of the square itself: a1 is dark ([`Color::Black`]).
    #[must_use]
    pub const fn color(self) -> Color {
        if (self.x + self.y) % 2 == 0 {
            Color::Black
        } else {
            Color::White
        }
    }

    /// Returns the shifted square if it is still on the board.
    #[must_use]
    pub fn shift(self, dx: i8, dy: i8) -> Option<Self> {
        let candidate = self + (dx, dy);
        candidate.within_board().then_some(candidate)
    }

    /// All squares on both diagonals passing through this one (including
    /// itself).
    #[must_use]
    pub fn diagonals(self) -> Bitboard {
        let mut result = Bitboard::from(self);
        for (dx, dy) in [(1, 1), (1, -1), (-1, 1), (-1, -1)] {
            result |= self.ray(dx, dy);
        }
        result
    }

    /// All squares on the same rank and file (including itself).
    #[must_use]
    pub fn orthogonals(self) -> Bitboard {
        let mut result = Bitboard::from(self);
        for (dx, dy) in [(1, 0), (-1, 0), (0, 1), (0, -1)] {
            result |= self.ray(dx, dy);
        }
        result
    }

    /// Squares in a given direction up to the edge of the board, not including
    /// the origin.
    fn ray(self, dx: i8, dy: i8) -> Bitboard {
        let mut result = Bitboard::empty();
        let mut current = self + (dx, dy);
        while current.within_board() {
            result.insert(current);
            current = current + (dx, dy);
        }
        result
    }

    /// Euclidean distance between the centers of two squares.
    #[must_use]
    pub fn distance(self, other: Self) -> f64 {
        (f64::from(self.x) - f64::from(other.x)).hypot(f64::from(self.y) - f64::from(other.y))
    }

    /// Returns true if `blocker` lies strictly between `mover` and `self` on a
    /// shared rank, file or diagonal, i.e. it obstructs the line of sight.
    #[must_use]
    pub fn blocked_by(self, mover: Self, blocker: Self) -> bool {
        let (dx, dy) = (
            i16::from(self.x) - i16::from(mover.x),
            i16::from(self.y) - i16::from(mover.y),
        );
        if (dx, dy) == (0, 0) || !(dx == 0 || dy == 0 || dx.abs() == dy.abs()) {
            return false;
        }
        let step = (towards(mover.x, self.x), towards(mover.y, self.y));
        let mut current = mover + step;
        while current != self {
            if current == blocker {
                return true;
            }
            current = current + step;
        }
        false
    }
}

impl Add<(i8, i8)> for Square {
    type Output = Self;

    /// Offsets the square by `(dx, dy)`. The result might be outside of the
    /// board, coordinates saturate at the `i8` bounds.
    fn add(self, (dx, dy): (i8, i8)) -> Self::Output {
        Self::new(self.x.saturating_add(dx), self.y.saturating_add(dy))
    }
}

/// Unit step from `from` to `to` along one axis.
fn towards(from: i8, to: i8) -> i8 {
    match to.cmp(&from) {
        Ordering::Less => -1,
        Ordering::Equal => 0,
        Ordering::Greater => 1,
    }
}

impl From<(i8, i8)> for Square {
    fn from((x, y): (i8, i8)) -> Self {
        Self::new(x, y)
    }
}

impl TryFrom<(char, u8)> for Square {
    type Error = anyhow::Error;

    fn try_from((file, rank): (char, u8)) -> anyhow::Result<Self> {
        Self::from_file_rank(file, rank)
    }
}

impl TryFrom<&str> for Square {
    type Error = anyhow::Error;

    fn try_from(square: &str) -> anyhow::Result<Self> {
        let (file, rank) = match square.chars().collect_tuple() {
            Some((file, rank)) => (file, rank),
            None => bail!(
                "square should be two-char, got {square} with {} chars",
                square.chars().count()
            ),
        };
        Ok(Self::new(parse_file(file)?, parse_rank(rank)?))
    }
}

impl fmt::Display for Square {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.within_board() {
            write!(f, "{}{}", self.file(), self.rank())
        } else {
            write!(f, "({}, {})", self.x, self.y)
        }
    }
}

/// Converts file letter to the column index.
pub(super) fn parse_file(file: char) -> anyhow::Result<i8> {
    match file {
        'a'..='h' => Ok((file as u8 - b'a') as i8),
        _ => bail!("file should be within 'a'..='h', got '{file}'"),
    }
}

/// Converts rank digit to the row index.
pub(super) fn parse_rank(rank: char) -> anyhow::Result<i8> {
    match rank {
        '1'..='8' => Ok((rank as u8 - b'1') as i8),
        _ => bail!("rank should be within '1'..='8', got '{rank}'"),
    }
}

bitflags::bitflags! {
    /// Sides a player can [castle] to (kingside is often referred to as O-O or
    /// h-side castle, queenside -- O-O-O or a-side castle). Castling is only
    /// possible while the king and the corresponding rook have not been
    /// touched, the squares between them are vacant and none of the squares
    /// the king passes through is attacked.
    ///
    /// [castle]: https://www.chessprogramming.org/Castling
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct CastleSides: u8 {
        /// Short castle, written as `0-0`.
        const KINGSIDE = 0b01;
        /// Long castle, written as `0-0-0`.
        const QUEENSIDE = 0b10;
    }
}

impl CastleSides {
    /// Direction of the king's hop along the home rank. Only defined for a
    /// single side.
    #[must_use]
    pub fn step(self) -> Option<i8> {
        if self == Self::KINGSIDE {
            Some(1)
        } else if self == Self::QUEENSIDE {
            Some(-1)
        } else {
            None
        }
    }

    /// Square the king lands on after castling to this side.
    #[must_use]
    pub fn king_target(self, color: Color) -> Option<Square> {
        self.step()
            .map(|step| Square::new(KING_FILE + 2 * step, color.home_rank()))
    }

    /// Determines the side from a king's horizontal displacement: castling
    /// is the only king move spanning two files.
    #[must_use]
    pub const fn from_king_shift(dx: i8) -> Option<Self> {
        match dx {
            2 => Some(Self::KINGSIDE),
            -2 => Some(Self::QUEENSIDE),
            _ => None,
        }
    }
}
