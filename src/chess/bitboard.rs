//! [`Bitboard`] is the set-of-squares representation used throughout
//! [`crate::chess`]: movement patterns, attacked squares and occupancy are all
//! bitboards. Bitboard utilizes the fact that modern processors operate on 64
//! bit integers, so set operations (union, intersection, difference) are
//! single instructions.
//!
//! [Bitboard]: https://www.chessprogramming.org/Bitboards

use std::fmt;
use std::ops::{BitAnd, BitOr, BitOrAssign, Not, Sub, SubAssign};

use itertools::Itertools;

use crate::chess::core::{Square, BOARD_SIZE, BOARD_WIDTH};

/// Represents a set of squares and provides common operations (e.g. AND, OR,
/// difference) over these sets. Each bit corresponds to one of 64 squares of
/// the chess board.
///
/// Mirroring [`Square`] enumeration, the least significant bit corresponds to
/// A1, and the most significant bit - to H8. Squares outside of the board are
/// never members of the set.
///
/// Bitboard is a thin wrapper around [u64].
#[derive(Copy, Clone, Default, PartialEq, Eq, Hash)]
pub struct Bitboard {
    bits: u64,
}

impl Bitboard {
    /// Constructs Bitboard from pre-calculated bits.
    #[must_use]
    pub const fn from_bits(bits: u64) -> Self {
        Self { bits }
    }

    /// Constructs a bitboard representing empty set of squares.
    #[must_use]
    pub const fn empty() -> Self {
        Self::from_bits(0)
    }

    /// Constructs a bitboard representing the universal set, it contains all
    /// squares by setting all bits to binary one.
    #[must_use]
    pub const fn full() -> Self {
        Self::from_bits(u64::MAX)
    }

    /// Returns raw bits.
    #[must_use]
    pub const fn bits(self) -> u64 {
        self.bits
    }

    /// Returns true if this bitboard contains given square.
    #[must_use]
    pub fn contains(self, square: Square) -> bool {
        square.within_board() && (self.bits & (1u64 << square.index())) != 0
    }

    /// Adds the square to the set. Squares outside of the board are ignored.
    pub fn insert(&mut self, square: Square) {
        if square.within_board() {
            self.bits |= 1u64 << square.index();
        }
    }

    /// Removes the square from the set.
    pub fn remove(&mut self, square: Square) {
        if square.within_board() {
            self.bits &= !(1u64 << square.index());
        }
    }

    /// Number of squares in the set.
    #[must_use]
    pub const fn len(self) -> u32 {
        self.bits.count_ones()
    }

    #[allow(missing_docs)]
    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.bits == 0
    }

    /// An efficient way to iterate over the set squares.
    #[must_use]
    pub const fn iter(self) -> BitboardIterator {
        BitboardIterator { bits: self.bits }
    }
}

const LINE_SEPARATOR: &str = "\n";
const SQUARE_SEPARATOR: &str = " ";

impl fmt::Debug for Bitboard {
    /// Draws the set as a board with rank 8 on top: `1` for the squares in
    /// the set, `.` otherwise.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rows = (0..BOARD_WIDTH).rev().map(|y| {
            (0..BOARD_WIDTH)
                .map(|x| {
                    if self.contains(Square::new(x, y)) {
                        '1'
                    } else {
                        '.'
                    }
                })
                .join(SQUARE_SEPARATOR)
        });
        write!(f, "{}", rows.format(LINE_SEPARATOR))
    }
}

impl BitOr for Bitboard {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self::Output {
        Self::from_bits(self.bits | rhs.bits)
    }
}

impl BitOrAssign for Bitboard {
    fn bitor_assign(&mut self, rhs: Self) {
        self.bits |= rhs.bits;
    }
}

impl BitAnd for Bitboard {
    type Output = Self;

    fn bitand(self, rhs: Self) -> Self::Output {
        Self::from_bits(self.bits & rhs.bits)
    }
}

impl Sub for Bitboard {
    type Output = Self;

    /// [Relative component], i.e. Result = LHS \ RHS.
    ///
    /// [Relative component]: https://en.wikipedia.org/wiki/Complement_%28set_theory%29#Relative_complement
    fn sub(self, rhs: Self) -> Self::Output {
        self & !rhs
    }
}

impl SubAssign for Bitboard {
    fn sub_assign(&mut self, rhs: Self) {
        self.bits &= !rhs.bits;
    }
}

impl Not for Bitboard {
    type Output = Self;

    /// Returns [complement
    /// set](https://en.wikipedia.org/wiki/Complement_%28set_theory%29) of Self,
    /// i.e. flipping the set squares to unset and vice versa.
    fn not(self) -> Self::Output {
        Self::from_bits(!self.bits)
    }
}

impl From<Square> for Bitboard {
    fn from(square: Square) -> Self {
        let mut result = Self::empty();
        result.insert(square);
        result
    }
}

impl FromIterator<Square> for Bitboard {
    fn from_iter<T: IntoIterator<Item = Square>>(squares: T) -> Self {
        let mut result = Self::empty();
        result.extend(squares);
        result
    }
}

impl Extend<Square> for Bitboard {
    fn extend<T: IntoIterator<Item = Square>>(&mut self, squares: T) {
        for square in squares {
            self.insert(square);
        }
    }
}

impl IntoIterator for Bitboard {
    type IntoIter = BitboardIterator;
    type Item = Square;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Iterates over set squares in a given [Bitboard] from least significant 1
/// bits (LS1B) to most significant 1 bits (MS1B) through implementing
/// [`BitScan`] forward operation.
///
/// [BitScan]: https://www.chessprogramming.org/BitScan
pub struct BitboardIterator {
    bits: u64,
}

impl Iterator for BitboardIterator {
    type Item = Square;

    fn next(&mut self) -> Option<Self::Item> {
        if self.bits == 0 {
            return None;
        }
        // Get the LS1B and consume it from the iterator.
        let next_index = self.bits.trailing_zeros();
        self.bits ^= 1 << next_index;
        debug_assert!(next_index < u32::from(BOARD_SIZE));
        Some(Square::from_index(next_index as u8))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let count = self.bits.count_ones() as usize;
        (count, Some(count))
    }
}

impl ExactSizeIterator for BitboardIterator {}

#[cfg(test)]
mod test {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn basics() {
        assert_eq!(std::mem::size_of::<Bitboard>(), 8);
        assert_eq!(Bitboard::full().bits(), u64::MAX);
        assert_eq!(Bitboard::empty().bits(), 0);
        assert!(Bitboard::empty().is_empty());
        assert_eq!(Bitboard::full().len(), 64);

        assert_eq!(Bitboard::from(Square::new(0, 0)).bits(), 1);
        assert_eq!(Bitboard::from(Square::new(1, 0)).bits(), 2);
        assert_eq!(Bitboard::from(Square::new(7, 7)).bits(), 1u64 << 63);
    }

    #[test]
    fn off_board_squares_are_ignored() {
        let mut set = Bitboard::empty();
        set.insert(Square::new(-1, 3));
        set.insert(Square::new(8, 0));
        assert!(set.is_empty());
        assert!(!Bitboard::full().contains(Square::new(0, 8)));
    }

    #[test]
    fn set_operations() {
        let a1 = Square::new(0, 0);
        let b2 = Square::new(1, 1);
        let c3 = Square::new(2, 2);
        let left: Bitboard = [a1, b2].into_iter().collect();
        let right: Bitboard = [b2, c3].into_iter().collect();
        assert_eq!((left | right).len(), 3);
        assert_eq!(left & right, Bitboard::from(b2));
        assert_eq!(left - right, Bitboard::from(a1));
        assert!(!(!left).contains(a1));
        assert!((!left).contains(c3));

        let mut set = left;
        set -= right;
        set.remove(a1);
        assert!(set.is_empty());
    }

    #[test]
    fn iteration_order() {
        let squares = vec![Square::new(7, 0), Square::new(0, 1), Square::new(4, 6)];
        let set: Bitboard = squares.iter().copied().collect();
        assert_eq!(set.iter().len(), 3);
        assert_eq!(set.iter().collect::<Vec<_>>(), squares);
    }

    #[test]
    fn dump() {
        let set: Bitboard = [Square::new(0, 0), Square::new(7, 7)].into_iter().collect();
        assert_eq!(
            format!("{set:?}"),
            ". . . . . . . 1\n\
             . . . . . . . .\n\
             . . . . . . . .\n\
             . . . . . . . .\n\
             . . . . . . . .\n\
             . . . . . . . .\n\
             . . . . . . . .\n\
             1 . . . . . . ."
        );
    }
}
