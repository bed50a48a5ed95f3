// Copyright 2017-2019 Sean Gillespie.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.
use num_traits::ToPrimitive;
use std::fmt::{self, Display, Write};
use std::str::FromStr;

use crate::attacks;
use crate::bitboard::Bitboard;
use crate::board::BoardView;
use crate::error::EngineError;

// TableIndex is a trait for all types that can serve as an index into a table.
// Colors index the per-color caches on the board (king positions, material),
// so anything implementing ToPrimitive can be used as a table index.
pub trait TableIndex {
    fn as_index(self) -> usize;
}

impl<T> TableIndex for T
where
    T: ToPrimitive,
{
    fn as_index(self) -> usize {
        self.to_u32().unwrap() as usize
    }
}

/// Number of files (and ranks) on the board.
pub const BOARD_SIZE: u8 = 8;

/// A square on the board, addressed by `(file, rank)`.
///
/// Coordinates are board-relative: file 0 is the left edge and rank 0 is the
/// far edge as seen by the perspective player, whose own back rank is rank 7.
/// A `Coordinate` is always in bounds; out-of-range values are rejected at
/// construction.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Coordinate {
    file: u8,
    rank: u8,
}

impl Coordinate {
    /// Constructs a coordinate, panicking if either axis is out of bounds.
    pub fn new(file: u8, rank: u8) -> Coordinate {
        assert!(
            file < BOARD_SIZE && rank < BOARD_SIZE,
            "coordinate ({}, {}) is out of bounds",
            file,
            rank
        );
        Coordinate { file, rank }
    }

    /// Constructs a coordinate from untrusted input, such as a pointer position
    /// already translated into board space by a presentation layer.
    pub fn checked(file: i32, rank: i32) -> Result<Coordinate, EngineError> {
        if in_bounds(file, rank) {
            Ok(Coordinate::new(file as u8, rank as u8))
        } else {
            Err(EngineError::InvalidCoordinate { file, rank })
        }
    }

    pub fn file(self) -> u8 {
        self.file
    }

    pub fn rank(self) -> u8 {
        self.rank
    }

    pub fn index(self) -> usize {
        (self.rank * BOARD_SIZE + self.file) as usize
    }

    pub fn from_index(idx: usize) -> Coordinate {
        Coordinate::new((idx % 8) as u8, (idx / 8) as u8)
    }

    /// Returns the coordinate displaced by the given deltas, or `None` if that
    /// would leave the board.
    pub fn offset(self, file_delta: i8, rank_delta: i8) -> Option<Coordinate> {
        let file = i32::from(self.file) + i32::from(file_delta);
        let rank = i32::from(self.rank) + i32::from(rank_delta);
        if in_bounds(file, rank) {
            Some(Coordinate::new(file as u8, rank as u8))
        } else {
            None
        }
    }

    /// Iterates over all 64 coordinates in scan order.
    pub fn all() -> impl Iterator<Item = Coordinate> {
        (0..64).map(Coordinate::from_index)
    }

    /// Parses algebraic notation ("e4") for a board viewed from `perspective`.
    /// Files are never mirrored; only the rank axis depends on the perspective.
    pub fn from_algebraic(square: &str, perspective: Color) -> Option<Coordinate> {
        let mut chars = square.chars();
        let file_chr = chars.next()?;
        let rank_chr = chars.next()?;
        if chars.next().is_some() {
            return None;
        }

        if file_chr < 'a' || file_chr > 'h' || rank_chr < '1' || rank_chr > '8' {
            return None;
        }

        let file = file_chr as u8 - b'a';
        let chess_rank = rank_chr as u8 - b'1';
        let rank = match perspective {
            Color::White => 7 - chess_rank,
            Color::Black => chess_rank,
        };

        Some(Coordinate::new(file, rank))
    }

    /// Renders this coordinate in algebraic notation for a board viewed from
    /// `perspective`.
    pub fn algebraic(self, perspective: Color) -> String {
        let chess_rank = match perspective {
            Color::White => 7 - self.rank,
            Color::Black => self.rank,
        };

        let mut buf = String::with_capacity(2);
        buf.push((b'a' + self.file) as char);
        buf.push((b'1' + chess_rank) as char);
        buf
    }
}

impl Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "({}, {})", self.file, self.rank)
    }
}

/// Returns true if both axes lie in `[0, 8)`.
pub fn in_bounds(file: i32, rank: i32) -> bool {
    file >= 0 && file < i32::from(BOARD_SIZE) && rank >= 0 && rank < i32::from(BOARD_SIZE)
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, ToPrimitive)]
pub enum Color {
    White,
    Black,
}

impl Color {
    pub fn toggle(self) -> Color {
        match self {
            Color::White => Color::Black,
            Color::Black => Color::White,
        }
    }
}

impl Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let chr = match self {
            Color::White => 'w',
            Color::Black => 'b',
        };
        f.write_char(chr)
    }
}

impl FromStr for Color {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "w" | "white" => Ok(Color::White),
            "b" | "black" => Ok(Color::Black),
            _ => Err(()),
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, ToPrimitive)]
pub enum PieceKind {
    King,
    Queen,
    Rook,
    Bishop,
    Knight,
    Pawn,
}

impl PieceKind {
    /// The standard material weight of this kind. The king's weight is a
    /// scoring sentinel; kings are never captured.
    pub fn weight(self) -> i32 {
        match self {
            PieceKind::King => 900,
            PieceKind::Queen => 90,
            PieceKind::Rook => 50,
            PieceKind::Bishop => 30,
            PieceKind::Knight => 30,
            PieceKind::Pawn => 10,
        }
    }

    /// The lowercase FEN letter of this kind.
    pub fn as_char(self) -> char {
        match self {
            PieceKind::King => 'k',
            PieceKind::Queen => 'q',
            PieceKind::Rook => 'r',
            PieceKind::Bishop => 'b',
            PieceKind::Knight => 'n',
            PieceKind::Pawn => 'p',
        }
    }
}

impl Display for PieceKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_char(self.as_char())
    }
}

/// A piece on the board. `position` always mirrors the coordinate of the tile
/// holding the piece.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Piece {
    pub kind: PieceKind,
    pub color: Color,
    pub position: Coordinate,
    pub has_moved: bool,
}

impl Piece {
    pub fn new(kind: PieceKind, color: Color, position: Coordinate) -> Piece {
        Piece {
            kind,
            color,
            position,
            has_moved: false,
        }
    }

    /// Pseudo-legal destinations for this piece: its movement pattern filtered
    /// by board bounds and own-piece occupancy, but not by king safety.
    pub fn pseudo_legal_moves<V: BoardView>(&self, view: &V) -> Bitboard {
        match self.kind {
            PieceKind::King => attacks::king_moves(view, self),
            PieceKind::Queen => attacks::queen_moves(view, self),
            PieceKind::Rook => attacks::rook_moves(view, self),
            PieceKind::Bishop => attacks::bishop_moves(view, self),
            PieceKind::Knight => attacks::knight_moves(view, self),
            PieceKind::Pawn => attacks::pawn_moves(view, self),
        }
    }

    /// Decodes a FEN piece letter (uppercase is white).
    pub fn from_fen_char(c: char, position: Coordinate) -> Option<Piece> {
        let color = if c.is_ascii_uppercase() {
            Color::White
        } else {
            Color::Black
        };

        let kind = match c.to_ascii_lowercase() {
            'k' => PieceKind::King,
            'q' => PieceKind::Queen,
            'r' => PieceKind::Rook,
            'b' => PieceKind::Bishop,
            'n' => PieceKind::Knight,
            'p' => PieceKind::Pawn,
            _ => return None,
        };

        Some(Piece::new(kind, color, position))
    }
}

impl Display for Piece {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let chr = self.kind.as_char();
        match self.color {
            Color::White => f.write_char(chr.to_ascii_uppercase()),
            Color::Black => f.write_char(chr),
        }
    }
}

/// One square of the grid and its occupant, if any.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Tile {
    pub coordinate: Coordinate,
    pub piece: Option<Piece>,
}

impl Tile {
    pub fn empty(coordinate: Coordinate) -> Tile {
        Tile {
            coordinate,
            piece: None,
        }
    }
}

/// The ways a game can be ended by the rules engine itself.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Outcome {
    Checkmate,
    Stalemate,
    InsufficientMaterial,
}

impl Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Outcome::Checkmate => write!(f, "checkmate"),
            Outcome::Stalemate => write!(f, "stalemate"),
            Outcome::InsufficientMaterial => write!(f, "insufficient material"),
        }
    }
}

/// Final status of a finished game. Draws have no winner.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct GameOver {
    pub outcome: Outcome,
    pub winner: Option<Color>,
}

impl GameOver {
    pub fn new(outcome: Outcome, winner: Option<Color>) -> GameOver {
        GameOver { outcome, winner }
    }
}

impl Display for GameOver {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self.winner {
            Some(Color::White) => write!(f, "{} (white wins)", self.outcome),
            Some(Color::Black) => write!(f, "{} (black wins)", self.outcome),
            None => write!(f, "{} (draw)", self.outcome),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn algebraic_white_perspective() {
        let e4 = Coordinate::from_algebraic("e4", Color::White).unwrap();
        assert_eq!(4, e4.file());
        assert_eq!(4, e4.rank());
        assert_eq!("e4", e4.algebraic(Color::White));

        let a8 = Coordinate::from_algebraic("a8", Color::White).unwrap();
        assert_eq!(Coordinate::new(0, 0), a8);
    }

    #[test]
    fn algebraic_black_perspective() {
        let e1 = Coordinate::from_algebraic("e1", Color::Black).unwrap();
        assert_eq!(Coordinate::new(4, 0), e1);
        assert_eq!("e1", e1.algebraic(Color::Black));
    }

    #[test]
    fn algebraic_rejects_garbage() {
        assert!(Coordinate::from_algebraic("i1", Color::White).is_none());
        assert!(Coordinate::from_algebraic("a9", Color::White).is_none());
        assert!(Coordinate::from_algebraic("a10", Color::White).is_none());
        assert!(Coordinate::from_algebraic("", Color::White).is_none());
    }

    #[test]
    fn checked_coordinates() {
        assert_eq!(Ok(Coordinate::new(7, 0)), Coordinate::checked(7, 0));
        assert_eq!(
            Err(EngineError::InvalidCoordinate { file: 8, rank: 0 }),
            Coordinate::checked(8, 0)
        );
        assert_eq!(
            Err(EngineError::InvalidCoordinate { file: 0, rank: -1 }),
            Coordinate::checked(0, -1)
        );
    }

    #[test]
    #[should_panic]
    fn new_out_of_bounds_panics() {
        Coordinate::new(3, 8);
    }

    #[test]
    fn offsets_stop_at_edges() {
        let corner = Coordinate::new(0, 7);
        assert_eq!(None, corner.offset(-1, 0));
        assert_eq!(None, corner.offset(0, 1));
        assert_eq!(Some(Coordinate::new(1, 6)), corner.offset(1, -1));
    }

    #[test]
    fn index_round_trip() {
        for (idx, coord) in Coordinate::all().enumerate() {
            assert_eq!(idx, coord.index());
            assert_eq!(coord, Coordinate::from_index(idx));
        }
    }

    #[test]
    fn starting_material_is_1290() {
        let total = PieceKind::King.weight()
            + PieceKind::Queen.weight()
            + 2 * PieceKind::Rook.weight()
            + 2 * PieceKind::Bishop.weight()
            + 2 * PieceKind::Knight.weight()
            + 8 * PieceKind::Pawn.weight();
        assert_eq!(1290, total);
    }

    #[test]
    fn color_parsing() {
        assert_eq!(Ok(Color::White), "White".parse::<Color>());
        assert_eq!(Ok(Color::Black), "b".parse::<Color>());
        assert!("red".parse::<Color>().is_err());
    }

    #[test]
    fn color_indexes() {
        assert_eq!(0, Color::White.as_index());
        assert_eq!(1, Color::Black.as_index());
    }
}
