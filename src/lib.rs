// Copyright 2017-2019 Sean Gillespie.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! A chess rules engine with a material-driven minimax opponent.
//!
//! The `Board` owns all game state: piece placement, the side to move, cached
//! king positions, material scores, game-over status and an undo stack.
//! Moves are applied with `make_move` and reverted with `unmake_move`; legal
//! move generation, check detection and game end detection are queries on the
//! board. The `search` module picks moves for a computer player.

#[macro_use]
extern crate num_derive;
#[macro_use]
extern crate lazy_static;
#[macro_use]
extern crate log;
#[macro_use]
extern crate serde_derive;

pub mod attacks;
mod bitboard;
mod board;
pub mod config;
mod error;
pub mod eval;
mod moves;
mod perft;
pub mod search;
mod types;

pub use bitboard::{Bitboard, BitboardIterator};
pub use board::{Board, BoardView, FenParseError, UndoRecord};
pub use config::{ConfigError, DrawPolicy, EngineConfig, PawnDirection, PieceWeights};
pub use error::EngineError;
pub use moves::{Move, MoveVec};
pub use perft::perft;
pub use search::{choose_move, minimax, random_move, random_move_with, Strategy};
pub use types::{Color, Coordinate, GameOver, Outcome, Piece, PieceKind, Tile};
