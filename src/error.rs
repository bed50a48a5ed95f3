// Copyright 2017-2019 Sean Gillespie.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Errors surfaced by the rules engine to its callers.
//!
//! Invariant violations on the trusted paths (`Board::make_move` on an empty
//! tile, `Board::unmake_move` with no history) are programming errors and
//! panic. Everything a caller can reasonably get wrong from untrusted input is
//! reported through `EngineError` by the validating entry points.
use std::error::Error;
use std::fmt;

use crate::moves::Move;
use crate::types::{Color, Coordinate, GameOver};

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum EngineError {
    /// A coordinate outside of `[0, 8)` on either axis.
    InvalidCoordinate { file: i32, rank: i32 },

    /// A move that is not in the legal move set of the side to move.
    IllegalMove(Move),

    /// An operation needed a piece on a tile that was empty.
    NoPieceAt(Coordinate),

    /// A piece was placed on a tile that is already occupied.
    Occupied(Coordinate),

    /// A king was placed for a color that already has one.
    DuplicateKing(Color),

    /// `unmake_move` was called with an empty history.
    UndoUnderflow,

    /// A move was attempted after the game already ended.
    GameOver(GameOver),
}

impl fmt::Display for EngineError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            EngineError::InvalidCoordinate { file, rank } => {
                write!(f, "coordinate ({}, {}) is off the board", file, rank)
            }
            EngineError::IllegalMove(mov) => write!(f, "illegal move: {}", mov),
            EngineError::NoPieceAt(coord) => write!(f, "no piece at {}", coord),
            EngineError::Occupied(coord) => write!(f, "tile {} is already occupied", coord),
            EngineError::DuplicateKing(color) => write!(f, "{:?} already has a king", color),
            EngineError::UndoUnderflow => write!(f, "no move to undo"),
            EngineError::GameOver(status) => write!(f, "game is already over: {}", status),
        }
    }
}

impl Error for EngineError {}
