// Copyright 2017-2019 Sean Gillespie.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! The `moves` module contains the definition of a `Move`: a source tile and
//! a destination tile. The rules engine has no castling or en passant and
//! always promotes to a queen, so the pair of coordinates is the whole move.
use std::fmt;

use arrayvec::ArrayVec;

use crate::types::{Color, Coordinate};

/// A list of moves large enough for any legal position (the known maximum is
/// 218 legal moves).
pub type MoveVec = ArrayVec<[Move; 256]>;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Move {
    source: Coordinate,
    dest: Coordinate,
}

impl Move {
    pub fn new(source: Coordinate, dest: Coordinate) -> Move {
        Move { source, dest }
    }

    pub fn source(self) -> Coordinate {
        self.source
    }

    pub fn dest(self) -> Coordinate {
        self.dest
    }

    /// Parses a coordinate-pair move such as "e2e4" for a board viewed from
    /// `perspective`.
    pub fn from_algebraic(mov: &str, perspective: Color) -> Option<Move> {
        if mov.len() != 4 || !mov.is_ascii() {
            return None;
        }

        let source = Coordinate::from_algebraic(&mov[0..2], perspective)?;
        let dest = Coordinate::from_algebraic(&mov[2..4], perspective)?;
        Some(Move::new(source, dest))
    }

    /// Renders this move as a coordinate pair ("e2e4") for a board viewed
    /// from `perspective`.
    pub fn algebraic(self, perspective: Color) -> String {
        let mut buf = self.source.algebraic(perspective);
        buf.push_str(&self.dest.algebraic(perspective));
        buf
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{} -> {}", self.source, self.dest)
    }
}
