// Copyright 2017-2019 Sean Gillespie.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Pseudo-legal move generation for each kind of piece.
//!
//! Every generator works against a `BoardView` so that the same code serves
//! both the live board and the borrowed "what if" overlays used for check
//! detection. Destinations are filtered by board bounds and by own-piece
//! occupancy only; king safety is layered on by the board.
use crate::bitboard::Bitboard;
use crate::board::BoardView;
use crate::config::PawnDirection;
use crate::types::{Coordinate, Piece};

const KING_OFFSETS: [(i8, i8); 8] = [
    (-1, -1),
    (-1, 0),
    (-1, 1),
    (0, -1),
    (0, 1),
    (1, -1),
    (1, 0),
    (1, 1),
];

const KNIGHT_OFFSETS: [(i8, i8); 8] = [
    (1, 2),
    (2, 1),
    (2, -1),
    (1, -2),
    (-1, -2),
    (-2, -1),
    (-2, 1),
    (-1, 2),
];

// Up, down, left, right.
const ROOK_DIRECTIONS: [(i8, i8); 4] = [(0, -1), (0, 1), (-1, 0), (1, 0)];

const BISHOP_DIRECTIONS: [(i8, i8); 4] = [(-1, -1), (1, -1), (-1, 1), (1, 1)];

/// Precomputed in-bounds targets of a fixed set of offsets, for every
/// coordinate on the board.
struct OffsetTable {
    table: [Bitboard; 64],
}

impl OffsetTable {
    fn new(offsets: &[(i8, i8)]) -> OffsetTable {
        let mut ot = OffsetTable {
            table: [Bitboard::none(); 64],
        };

        for coord in Coordinate::all() {
            ot.table[coord.index()] = offsets
                .iter()
                .filter_map(|&(df, dr)| coord.offset(df, dr))
                .collect();
        }

        ot
    }

    fn targets(&self, coord: Coordinate) -> Bitboard {
        self.table[coord.index()]
    }
}

lazy_static! {
    static ref KING_TABLE: OffsetTable = OffsetTable::new(&KING_OFFSETS);
    static ref KNIGHT_TABLE: OffsetTable = OffsetTable::new(&KNIGHT_OFFSETS);
}

fn valid_targets<V: BoardView>(view: &V, piece: &Piece, targets: Bitboard) -> Bitboard {
    targets
        .iter()
        .filter(|&dest| view.valid_move(dest, piece.color))
        .collect()
}

/// Casts a ray in each direction. A ray includes the first occupied tile it
/// meets if that tile holds an enemy, and never continues past it.
fn ray_moves<V: BoardView>(view: &V, piece: &Piece, directions: &[(i8, i8)]) -> Bitboard {
    let mut moves = Bitboard::none();
    for &(df, dr) in directions {
        let mut current = piece.position;
        while let Some(next) = current.offset(df, dr) {
            if view.valid_move(next, piece.color) {
                moves.set(next);
            }

            if view.piece_at(next) {
                break;
            }

            current = next;
        }
    }

    moves
}

/// One step in any direction. No castling.
pub fn king_moves<V: BoardView>(view: &V, piece: &Piece) -> Bitboard {
    valid_targets(view, piece, KING_TABLE.targets(piece.position))
}

pub fn knight_moves<V: BoardView>(view: &V, piece: &Piece) -> Bitboard {
    valid_targets(view, piece, KNIGHT_TABLE.targets(piece.position))
}

pub fn rook_moves<V: BoardView>(view: &V, piece: &Piece) -> Bitboard {
    ray_moves(view, piece, &ROOK_DIRECTIONS)
}

pub fn bishop_moves<V: BoardView>(view: &V, piece: &Piece) -> Bitboard {
    ray_moves(view, piece, &BISHOP_DIRECTIONS)
}

pub fn queen_moves<V: BoardView>(view: &V, piece: &Piece) -> Bitboard {
    rook_moves(view, piece) | bishop_moves(view, piece)
}

/// The rank delta of one forward step for the given pawn.
pub fn pawn_forward<V: BoardView>(view: &V, piece: &Piece) -> i8 {
    let toward_rank_zero = match view.config().pawn_direction {
        PawnDirection::ByColor => piece.color == view.perspective(),
        PawnDirection::ByTurnOrientation => view.bottom_player_turn(),
    };

    if toward_rank_zero {
        -1
    } else {
        1
    }
}

/// The rank on which a pawn advancing by `forward` promotes.
pub fn promotion_rank(forward: i8) -> u8 {
    if forward < 0 {
        0
    } else {
        7
    }
}

/// Single step onto an empty tile, a double step from an unmoved pawn when
/// both tiles ahead are empty, and diagonal captures. No en passant.
pub fn pawn_moves<V: BoardView>(view: &V, piece: &Piece) -> Bitboard {
    let forward = pawn_forward(view, piece);
    let mut moves = Bitboard::none();
    if let Some(one) = piece.position.offset(0, forward) {
        if !view.piece_at(one) {
            moves.set(one);
            if !piece.has_moved {
                if let Some(two) = one.offset(0, forward) {
                    if !view.piece_at(two) {
                        moves.set(two);
                    }
                }
            }
        }
    }

    for &df in &[-1, 1] {
        if let Some(diagonal) = piece.position.offset(df, forward) {
            if view.enemy_at(diagonal, piece.color) {
                moves.set(diagonal);
            }
        }
    }

    moves
}
