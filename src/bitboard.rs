// Copyright 2017-2019 Sean Gillespie.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Definitions of the `Bitboard` type, which is conceptually a set of
//! coordinates on the chess board. The rules engine keeps its pieces in a grid
//! of tiles, but move generation hands out its destination sets as bitboards:
//! a set of squares de-duplicates for free and the usual set operations
//! (union, intersection, membership) are single instructions.
//!
//! A bitboard is a single 64-bit integer in which bit `rank * 8 + file`
//! represents the coordinate `(file, rank)`.
use std::default::Default;
use std::fmt;
use std::iter::{FromIterator, Iterator};
use std::ops;

use crate::types::{Coordinate, BOARD_SIZE};

/// A Bitboard is a 64-bit integer which one bit represents one of the
/// sixty-four coordinates on the board.
#[derive(Copy, Clone, PartialEq, Eq, Hash)]
pub struct Bitboard {
    bits: u64,
}

impl Default for Bitboard {
    fn default() -> Bitboard {
        Bitboard::none()
    }
}

impl Bitboard {
    /// Constructs a new bitboard from the given bits.
    pub const fn from_bits(bits: u64) -> Bitboard {
        Bitboard { bits }
    }

    /// Constructs a new bitboard with all bits zeroed, representing
    /// the empty set.
    pub const fn none() -> Bitboard {
        Bitboard::from_bits(0)
    }

    /// Tests whether or not a coordinate is a member of this bitboard.
    pub fn test(self, coord: Coordinate) -> bool {
        (self.bits & (1u64 << coord.index())) != 0
    }

    /// Adds a coordinate to this bitboard.
    pub fn set(&mut self, coord: Coordinate) {
        self.bits |= 1u64 << coord.index();
    }

    /// Takes the bitwise and of two bitboards producing the set intersection
    /// of their contents.
    pub const fn and(self, other: Bitboard) -> Bitboard {
        Bitboard::from_bits(self.bits & other.bits)
    }

    /// Takes the bitwise or of two bitboards producing the set union
    /// of their contents.
    pub const fn or(self, other: Bitboard) -> Bitboard {
        Bitboard::from_bits(self.bits | other.bits)
    }

    /// Produces an iterator over the coordinates contained in this bitboard,
    /// in scan order.
    pub fn iter(self) -> BitboardIterator {
        BitboardIterator::new(self.bits)
    }

    /// Retrieves the number of coordinates contained in the set represented
    /// by this bitboard.
    pub const fn count(self) -> u32 {
        self.bits.count_ones()
    }

    /// Retrieves whether or not the set represented by this bitboard is
    /// the empty set.
    pub const fn empty(self) -> bool {
        self.bits == 0
    }
}

impl fmt::Debug for Bitboard {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_tuple("Bitboard").field(&self.bits).finish()
    }
}

impl fmt::Display for Bitboard {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for rank in 0..BOARD_SIZE {
            for file in 0..BOARD_SIZE {
                if self.test(Coordinate::new(file, rank)) {
                    write!(f, " 1 ")?
                } else {
                    write!(f, " . ")?
                }
            }

            writeln!(f, "| {}", rank)?;
        }

        for _ in 0..BOARD_SIZE {
            write!(f, "---")?;
        }

        writeln!(f)?;
        for file in 0..BOARD_SIZE {
            write!(f, " {} ", file)?;
        }

        writeln!(f)?;
        Ok(())
    }
}

// Operator overloads for ease of use
impl ops::BitAnd for Bitboard {
    type Output = Bitboard;

    fn bitand(self, rhs: Bitboard) -> Bitboard {
        self.and(rhs)
    }
}

impl ops::BitAndAssign for Bitboard {
    fn bitand_assign(&mut self, rhs: Bitboard) {
        *self = self.and(rhs);
    }
}

impl ops::BitOr for Bitboard {
    type Output = Bitboard;

    fn bitor(self, rhs: Bitboard) -> Bitboard {
        self.or(rhs)
    }
}

impl ops::BitOrAssign for Bitboard {
    fn bitor_assign(&mut self, rhs: Bitboard) {
        *self = self.or(rhs);
    }
}

/// BitboardIterator is an iterator over coordinates that are set in a
/// given bitboard.
pub struct BitboardIterator {
    bits: u64,
}

impl BitboardIterator {
    fn new(bits: u64) -> BitboardIterator {
        BitboardIterator { bits }
    }
}

impl Iterator for BitboardIterator {
    type Item = Coordinate;

    fn next(&mut self) -> Option<Coordinate> {
        if self.bits == 0 {
            return None;
        }

        let next = self.bits.trailing_zeros();
        self.bits &= self.bits - 1;
        Some(Coordinate::from_index(next as usize))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let count = self.bits.count_ones() as usize;
        (count, Some(count))
    }
}

impl IntoIterator for Bitboard {
    type Item = Coordinate;
    type IntoIter = BitboardIterator;

    fn into_iter(self) -> BitboardIterator {
        self.iter()
    }
}

impl FromIterator<Coordinate> for Bitboard {
    fn from_iter<I: IntoIterator<Item = Coordinate>>(iter: I) -> Bitboard {
        let mut board = Bitboard::none();
        for coord in iter {
            board.set(coord);
        }

        board
    }
}

/// Every coordinate whose file and rank have an even sum. Two pieces standing
/// on members of this set (or both off it) share a square color.
pub const BB_EVEN_SQUARES: Bitboard = Bitboard::from_bits(0xAA55_AA55_AA55_AA55);
