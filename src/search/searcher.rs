// Copyright 2017-2019 Sean Gillespie.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.
use std::cmp;
use std::time::Instant;

use crate::board::Board;
use crate::eval::BoardEvaluator;
use crate::moves::Move;
use crate::search::data::{DataRecorder, NullDataRecorder, Record};
use crate::types::Color;

/// The outcome of a top-level search.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SearchResult {
    pub best_move: Option<Move>,
    pub score: i32,
    pub nodes_searched: u64,
    pub cutoffs: u64,
}

/// A depth-bounded minimax searcher. With pruning enabled (the default) it
/// performs alpha-beta pruning, which never changes the chosen move or its
/// score, only the number of nodes visited.
pub struct Searcher<E> {
    evaluator: E,
    pruning: bool,
    root_depth: u32,
    nodes_searched: u64,
    cutoffs: u64,
}

impl<E: BoardEvaluator> Searcher<E> {
    pub fn new() -> Searcher<E> {
        Searcher::with_evaluator(Default::default())
    }

    /// A searcher that visits the entire tree.
    pub fn full_width() -> Searcher<E> {
        Searcher {
            pruning: false,
            ..Searcher::new()
        }
    }

    pub fn with_evaluator(evaluator: E) -> Searcher<E> {
        Searcher {
            evaluator,
            pruning: true,
            root_depth: 0,
            nodes_searched: 0,
            cutoffs: 0,
        }
    }

    pub fn nodes_searched(&self) -> u64 {
        self.nodes_searched
    }

    pub fn cutoffs(&self) -> u64 {
        self.cutoffs
    }

    /// Searches `board` as `color` to the given depth (at least one ply) and
    /// reports the preferred move. The board is cloned; the caller's copy is
    /// never touched.
    pub fn search(&mut self, board: &Board, depth: u32, color: Color) -> SearchResult {
        self.search_with_recorder(board, depth, color, &NullDataRecorder)
    }

    pub fn search_with_recorder<R: DataRecorder>(
        &mut self,
        board: &Board,
        depth: u32,
        color: Color,
        recorder: &R,
    ) -> SearchResult {
        self.nodes_searched = 0;
        self.cutoffs = 0;
        let depth = cmp::max(depth, 1);
        let maximizing = board.turn() == color;
        let mut scratch = board.clone();
        self.root_depth = depth;

        debug!("beginning search of depth {} for {}", depth, color);
        let start = Instant::now();
        let (best_move, score) =
            self.minimax(&mut scratch, depth, i32::MIN, i32::MAX, maximizing, color);
        let elapsed = start.elapsed();
        let elapsed_ms = elapsed.as_secs() * 1000 + u64::from(elapsed.subsec_millis());
        debug_assert_eq!(board, &scratch, "search left the board modified");

        info!(
            "depth {} search: best move {}, score {}, {} nodes, {} cutoffs, {} ms",
            depth,
            best_move.map_or_else(|| "none".to_owned(), |mov| mov.to_string()),
            score,
            self.nodes_searched,
            self.cutoffs,
            elapsed_ms
        );

        let record = Record {
            fen: String::new(),
            depth,
            nodes: self.nodes_searched,
            cutoffs: self.cutoffs,
            best_move: best_move.map(|mov| mov.algebraic(board.perspective())),
            score,
            elapsed_ms,
        };

        if let Err(err) = recorder.record(board, &record) {
            warn!("failed to record search data: {}", err);
        }

        SearchResult {
            best_move,
            score,
            nodes_searched: self.nodes_searched,
            cutoffs: self.cutoffs,
        }
    }

    /// Minimax over the legal moves of the side to move. Scores are from the
    /// point of view of `color`; `maximizing` says whether the side to move
    /// at this node is trying to raise or lower that score.
    ///
    /// Every child is explored by `make_move` and `advance_turn` and undone by
    /// `unmake_move`, so the board is returned exactly as it was passed in.
    /// Ties keep the first move found.
    pub fn minimax(
        &mut self,
        board: &mut Board,
        depth: u32,
        mut alpha: i32,
        mut beta: i32,
        maximizing: bool,
        color: Color,
    ) -> (Option<Move>, i32) {
        self.nodes_searched += 1;
        if depth == 0 || board.is_game_over() {
            return (None, self.evaluator.evaluate(board, color));
        }

        let moves = board.get_legal_moves(board.turn());
        if moves.is_empty() {
            return (None, self.evaluator.evaluate(board, color));
        }

        let mut best_move = moves[0];
        let mut best_score = if maximizing { i32::MIN } else { i32::MAX };
        for &mov in moves.iter() {
            board.make_move(mov.source(), mov.dest());
            board.advance_turn();
            let (_, score) = self.minimax(board, depth - 1, alpha, beta, !maximizing, color);
            board.unmake_move();
            if depth == self.root_depth {
                debug!("root move {} scored {}", mov, score);
            }

            if maximizing {
                if score > best_score {
                    best_score = score;
                    best_move = mov;
                }

                alpha = cmp::max(alpha, score);
            } else {
                if score < best_score {
                    best_score = score;
                    best_move = mov;
                }

                beta = cmp::min(beta, score);
            }

            if self.pruning && beta <= alpha {
                self.cutoffs += 1;
                break;
            }
        }

        (Some(best_move), best_score)
    }
}

impl<E: BoardEvaluator> Default for Searcher<E> {
    fn default() -> Searcher<E> {
        Searcher::new()
    }
}
