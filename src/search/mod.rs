// Copyright 2017-2019 Sean Gillespie.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Move selection for the computer opponent.
//!
//! The default strategy is a depth-bounded minimax search with alpha-beta
//! pruning over material balance. A uniform random mover is available as an
//! alternative strategy.
use rand::seq::SliceRandom;
use rand::Rng;

use crate::board::Board;
use crate::eval::MaterialEvaluator;
use crate::moves::Move;
use crate::types::Color;

mod data;
mod searcher;

pub use data::{CsvDataRecorder, DataRecorder, NullDataRecorder, Record};
pub use searcher::{SearchResult, Searcher};

/// How the computer picks its moves.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Strategy {
    Minimax,
    Random,
}

impl Default for Strategy {
    fn default() -> Strategy {
        Strategy::Minimax
    }
}

impl Strategy {
    /// Picks a move for `color` on `board`. `depth` is ignored by the random
    /// strategy.
    pub fn select(self, board: &Board, depth: u32, color: Color) -> Option<Move> {
        match self {
            Strategy::Minimax => choose_move(board, depth, color),
            Strategy::Random => random_move(board),
        }
    }
}

impl std::str::FromStr for Strategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Strategy, String> {
        match s.to_ascii_lowercase().as_str() {
            "minimax" => Ok(Strategy::Minimax),
            "random" => Ok(Strategy::Random),
            other => Err(format!("unknown strategy: {}", other)),
        }
    }
}

/// Searches the board as `color` and returns the move the search prefers, or
/// `None` if the game is over or no move exists. The board is not modified;
/// the search runs on a private copy.
pub fn choose_move(board: &Board, depth: u32, color: Color) -> Option<Move> {
    let mut searcher: Searcher<MaterialEvaluator> = Searcher::new();
    searcher.search(board, depth, color).best_move
}

/// Minimax with alpha-beta pruning, scored by material balance from the
/// point of view of `color`. See `Searcher::minimax`.
pub fn minimax(
    board: &mut Board,
    depth: u32,
    alpha: i32,
    beta: i32,
    maximizing: bool,
    color: Color,
) -> (Option<Move>, i32) {
    let mut searcher: Searcher<MaterialEvaluator> = Searcher::new();
    searcher.minimax(board, depth, alpha, beta, maximizing, color)
}

/// A uniformly random legal move for the side to move.
pub fn random_move(board: &Board) -> Option<Move> {
    random_move_with(board, &mut rand::thread_rng())
}

/// Like `random_move`, drawing from the given generator.
pub fn random_move_with<R: Rng + ?Sized>(board: &Board, rng: &mut R) -> Option<Move> {
    if board.is_game_over() {
        return None;
    }

    board.get_legal_moves(board.turn()).choose(rng).cloned()
}
