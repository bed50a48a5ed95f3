// Copyright 2017-2019 Sean Gillespie.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.
use crate::board::Board;
use crate::eval::{self, BoardEvaluator};
use crate::types::Color;

/// Evaluates positions by material balance alone. Material scores are kept
/// current by the board as pieces are captured, so evaluation does not scan
/// the board.
#[derive(Copy, Clone, Debug, Default)]
pub struct MaterialEvaluator;

impl MaterialEvaluator {
    pub fn new() -> MaterialEvaluator {
        MaterialEvaluator
    }
}

impl BoardEvaluator for MaterialEvaluator {
    fn evaluate(&self, board: &Board, color: Color) -> i32 {
        eval::static_evaluate(board, color)
    }
}
