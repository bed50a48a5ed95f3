// Copyright 2017-2019 Sean Gillespie.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.
use rayon::prelude::*;

use crate::board::Board;

/// Counts the leaf nodes of the legal move tree of the given depth, with the
/// side to move of `board` moving first. Branches are counted in parallel,
/// each on its own copy of the board.
pub fn perft(board: &Board, depth: u32) -> u64 {
    if depth == 0 {
        return 1;
    }

    let moves = board.get_legal_moves(board.turn());
    if depth == 1 {
        return moves.len() as u64;
    }

    moves[..]
        .par_iter()
        .map(|mov| {
            let mut child = board.clone();
            child.make_move(mov.source(), mov.dest());
            child.advance_turn();
            perft(&child, depth - 1)
        })
        .sum()
}
