// Copyright 2017-2019 Sean Gillespie.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Static evaluation of board positions.
use crate::board::Board;
use crate::types::Color;

mod material_evaluator;

pub use material_evaluator::MaterialEvaluator;

/// Scores a board from the point of view of one color. Larger is better for
/// that color.
pub trait BoardEvaluator: Default {
    fn evaluate(&self, board: &Board, color: Color) -> i32;
}

/// The material balance of `color`: its own material score minus the
/// opponent's.
pub fn static_evaluate(board: &Board, color: Color) -> i32 {
    board.material_score(color) - board.material_score(color.toggle())
}
