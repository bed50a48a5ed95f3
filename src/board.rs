// Copyright 2017-2019 Sean Gillespie.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.
use std::fmt::{self, Write};

use crate::attacks;
use crate::bitboard::{Bitboard, BB_EVEN_SQUARES};
use crate::config::{DrawPolicy, EngineConfig};
use crate::error::EngineError;
use crate::eval::{BoardEvaluator, MaterialEvaluator};
use crate::moves::{Move, MoveVec};
use crate::types::{self, TableIndex};
use crate::types::{Color, Coordinate, GameOver, Outcome, Piece, PieceKind, Tile, BOARD_SIZE};

/// Possible errors that can arise when parsing a FEN string into a `Board`.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum FenParseError {
    UnexpectedChar(char),
    UnexpectedEnd,
    InvalidDigit,
    FileDoesNotSumToEight,
    UnknownPiece(char),
    InvalidSideToMove,
    /// Each side must have exactly one king.
    KingCount(Color, usize),
    /// The side that just moved has left its own king attacked.
    SideNotToMoveInCheck,
}

impl fmt::Display for FenParseError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            FenParseError::UnexpectedChar(c) => write!(f, "unexpected character '{}'", c),
            FenParseError::UnexpectedEnd => write!(f, "unexpected end of input"),
            FenParseError::InvalidDigit => write!(f, "empty-square digit out of range"),
            FenParseError::FileDoesNotSumToEight => write!(f, "rank does not sum to eight files"),
            FenParseError::UnknownPiece(c) => write!(f, "unknown piece '{}'", c),
            FenParseError::InvalidSideToMove => write!(f, "invalid side to move"),
            FenParseError::KingCount(color, count) => {
                write!(f, "{:?} has {} kings, expected exactly one", color, count)
            }
            FenParseError::SideNotToMoveInCheck => {
                write!(f, "the side not to move is in check")
            }
        }
    }
}

impl std::error::Error for FenParseError {}

/// Read access to a board for move generation.
///
/// The live `Board` implements this, and so does the borrowed overlay that
/// check detection uses to ask "what if this piece stood over there", which
/// keeps that question free of any mutation.
pub trait BoardView {
    fn occupant(&self, coord: Coordinate) -> Option<Piece>;
    fn perspective(&self) -> Color;
    fn bottom_player_turn(&self) -> bool;
    fn config(&self) -> &EngineConfig;

    fn piece_at(&self, coord: Coordinate) -> bool {
        self.occupant(coord).is_some()
    }

    /// True if the tile holds a piece of the other color. Empty tiles are
    /// never enemies.
    fn enemy_at(&self, coord: Coordinate, color: Color) -> bool {
        self.occupant(coord).map_or(false, |piece| piece.color != color)
    }

    /// True if a piece of `color` may land on `dest`: the tile is empty or
    /// holds an enemy. Bounds are guaranteed by `Coordinate` itself.
    fn valid_move(&self, dest: Coordinate, color: Color) -> bool {
        match self.occupant(dest) {
            Some(piece) => piece.color != color,
            None => true,
        }
    }
}

/// Everything needed to reverse exactly one `make_move`.
#[derive(Clone, Debug, PartialEq)]
pub struct UndoRecord {
    material_score: [i32; 2],
    king_position: [Option<Coordinate>; 2],
    source: Tile,
    dest: Tile,
    game_over: Option<GameOver>,
    turn: Color,
    bottom_player_turn: bool,
}

/// An 8x8 chess board together with the game state around it.
///
/// `make_move` does not pass the turn; callers follow every `make_move` with
/// exactly one `advance_turn`, and `unmake_move` undoes both.
#[derive(Clone, Debug, PartialEq)]
pub struct Board {
    grid: [[Tile; 8]; 8],
    turn: Color,
    perspective: Color,
    bottom_player_turn: bool,
    king_position: [Option<Coordinate>; 2],
    material_score: [i32; 2],
    game_over: Option<GameOver>,
    history: Vec<UndoRecord>,
    config: EngineConfig,
}

const BACK_RANK: [PieceKind; 8] = [
    PieceKind::Rook,
    PieceKind::Knight,
    PieceKind::Bishop,
    PieceKind::Queen,
    PieceKind::King,
    PieceKind::Bishop,
    PieceKind::Knight,
    PieceKind::Rook,
];

//
// Board construction
//

impl Board {
    /// Constructs an empty board for a game in which `perspective` is the
    /// color at the bottom. Pieces are placed separately.
    pub fn new(perspective: Color) -> Board {
        Board::with_config(perspective, EngineConfig::default())
    }

    pub fn with_config(perspective: Color, config: EngineConfig) -> Board {
        let mut grid = [[Tile::empty(Coordinate::new(0, 0)); 8]; 8];
        for coord in Coordinate::all() {
            grid[coord.rank() as usize][coord.file() as usize] = Tile::empty(coord);
        }

        let starting_material = config.weights.starting_total();
        Board {
            grid,
            turn: Color::White,
            perspective,
            bottom_player_turn: perspective == Color::White,
            king_position: [None; 2],
            material_score: [starting_material; 2],
            game_over: None,
            history: Vec::new(),
            config,
        }
    }

    /// Places both armies in their starting positions and resets all game
    /// state. The perspective color occupies ranks 6 and 7.
    pub fn initialize_standard_position(&mut self) {
        self.clear();
        let near = self.perspective;
        let far = near.toggle();
        for file in 0..BOARD_SIZE {
            let kind = BACK_RANK[file as usize];
            self.put(Piece::new(kind, far, Coordinate::new(file, 0)));
            self.put(Piece::new(PieceKind::Pawn, far, Coordinate::new(file, 1)));
            self.put(Piece::new(PieceKind::Pawn, near, Coordinate::new(file, 6)));
            self.put(Piece::new(kind, near, Coordinate::new(file, 7)));
        }

        self.material_score = [self.config.weights.starting_total(); 2];
        self.turn = Color::White;
        self.bottom_player_turn = self.perspective == Color::White;
    }

    /// Puts a new piece on an empty tile, for arranging custom positions.
    /// Material scores are left untouched. Pawns placed away from their
    /// starting rank are considered to have moved already.
    pub fn place_piece(
        &mut self,
        coord: Coordinate,
        kind: PieceKind,
        color: Color,
    ) -> Result<(), EngineError> {
        if self.piece_at(coord) {
            return Err(EngineError::Occupied(coord));
        }

        if kind == PieceKind::King && self.king_position(color).is_some() {
            return Err(EngineError::DuplicateKing(color));
        }

        let mut piece = Piece::new(kind, color, coord);
        if kind == PieceKind::Pawn {
            piece.has_moved = coord.rank() != self.pawn_home_rank(color);
        }

        self.put(piece);
        Ok(())
    }

    /// Takes a piece off the board. Material scores are left untouched.
    pub fn remove_piece(&mut self, coord: Coordinate) -> Result<Piece, EngineError> {
        let piece = self
            .tile_mut(coord)
            .piece
            .take()
            .ok_or(EngineError::NoPieceAt(coord))?;
        if piece.kind == PieceKind::King {
            self.king_position[piece.color.as_index()] = None;
        }

        Ok(piece)
    }

    fn clear(&mut self) {
        for coord in Coordinate::all() {
            self.tile_mut(coord).piece = None;
        }

        self.king_position = [None; 2];
        self.game_over = None;
        self.history.clear();
    }

    fn put(&mut self, piece: Piece) {
        if piece.kind == PieceKind::King {
            self.king_position[piece.color.as_index()] = Some(piece.position);
        }

        self.tile_mut(piece.position).piece = Some(piece);
    }

    fn pawn_home_rank(&self, color: Color) -> u8 {
        if color == self.perspective {
            6
        } else {
            1
        }
    }

    fn recompute_material(&mut self) {
        let mut scores = [0; 2];
        for piece in self.all_pieces() {
            scores[piece.color.as_index()] += self.config.weights.weight(piece.kind);
        }

        self.material_score = scores;
    }
}

//
// Board state getters
//

impl Board {
    pub fn turn(&self) -> Color {
        self.turn
    }

    pub fn perspective(&self) -> Color {
        self.perspective
    }

    pub fn bottom_player_turn(&self) -> bool {
        self.bottom_player_turn
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn king_position(&self, color: Color) -> Option<Coordinate> {
        self.king_position[color.as_index()]
    }

    pub fn material_score(&self, color: Color) -> i32 {
        self.material_score[color.as_index()]
    }

    pub fn game_over_status(&self) -> Option<GameOver> {
        self.game_over
    }

    pub fn is_game_over(&self) -> bool {
        self.game_over.is_some()
    }

    /// Number of moves that can currently be undone.
    pub fn history_len(&self) -> usize {
        self.history.len()
    }

    pub fn tile(&self, coord: Coordinate) -> &Tile {
        &self.grid[coord.rank() as usize][coord.file() as usize]
    }

    fn tile_mut(&mut self, coord: Coordinate) -> &mut Tile {
        &mut self.grid[coord.rank() as usize][coord.file() as usize]
    }

    pub fn piece_on(&self, coord: Coordinate) -> Option<&Piece> {
        self.tile(coord).piece.as_ref()
    }

    /// All pieces on the board, in scan order.
    pub fn all_pieces(&self) -> impl Iterator<Item = &Piece> + '_ {
        self.grid
            .iter()
            .flat_map(|row| row.iter())
            .filter_map(|tile| tile.piece.as_ref())
    }

    pub fn pieces(&self, color: Color) -> impl Iterator<Item = &Piece> + '_ {
        self.all_pieces().filter(move |piece| piece.color == color)
    }

    /// Returns true if both axes lie in `[0, 8)`.
    pub fn in_bounds(file: i32, rank: i32) -> bool {
        types::in_bounds(file, rank)
    }

    pub fn piece_at(&self, coord: Coordinate) -> bool {
        BoardView::piece_at(self, coord)
    }

    pub fn enemy_at(&self, coord: Coordinate, color: Color) -> bool {
        BoardView::enemy_at(self, coord, color)
    }

    pub fn valid_move(&self, dest: Coordinate, color: Color) -> bool {
        BoardView::valid_move(self, dest, color)
    }
}

//
// Check detection and legality
//

impl Board {
    /// Returns true if any enemy piece can reach the king of `color`.
    pub fn in_check(&self, color: Color) -> bool {
        match self.king_position(color) {
            Some(king) => king_attacked(self, king, color),
            None => false,
        }
    }

    /// Returns true if `color` would be in check after the piece on `source`
    /// moved to `dest`. The move is evaluated on a borrowed overlay of this
    /// board, so the board itself is never touched.
    pub fn in_check_after_move(&self, source: Coordinate, dest: Coordinate, color: Color) -> bool {
        let piece = self
            .tile(source)
            .piece
            .expect("invalid move: no piece at source square");

        let mut moved = piece;
        moved.position = dest;
        let king = if piece.kind == PieceKind::King && piece.color == color {
            Some(dest)
        } else {
            self.king_position(color)
        };

        let view = Simulation {
            board: self,
            source,
            moved,
            bottom_player_turn: !self.bottom_player_turn,
        };

        match king {
            Some(king) => king_attacked(&view, king, color),
            None => false,
        }
    }

    /// All legal moves for `color`: captures first, then quiet moves, each in
    /// board scan order. Callers should treat the result as an unordered set.
    pub fn get_legal_moves(&self, color: Color) -> MoveVec {
        let mut captures = MoveVec::new();
        let mut quiet = MoveVec::new();
        for piece in self.pieces(color) {
            for dest in piece.pseudo_legal_moves(self) {
                if self.in_check_after_move(piece.position, dest, color) {
                    continue;
                }

                let mov = Move::new(piece.position, dest);
                if self.enemy_at(dest, color) {
                    captures.push(mov);
                } else {
                    quiet.push(mov);
                }
            }
        }

        captures.extend(quiet);
        captures
    }

    /// Legal moves for the side to move, best first according to the
    /// material evaluator.
    pub fn get_legal_moves_ranked(&self) -> Vec<Move> {
        self.get_legal_moves_ranked_by(&MaterialEvaluator::new())
    }

    /// Legal moves for the side to move, each scored by applying it to a
    /// scratch copy of this board, sorted by descending score. Equal scores
    /// keep their generation order.
    pub fn get_legal_moves_ranked_by<E: BoardEvaluator>(&self, evaluator: &E) -> Vec<Move> {
        let mut scratch = self.clone();
        let mut scored: Vec<(Move, i32)> = self
            .get_legal_moves(self.turn)
            .into_iter()
            .map(|mov| {
                scratch.make_move(mov.source(), mov.dest());
                let score = evaluator.evaluate(&scratch, self.turn);
                scratch.unmake_move();
                (mov, score)
            })
            .collect();

        scored.sort_by(|(_, a), (_, b)| b.cmp(a));
        scored.into_iter().map(|(mov, _)| mov).collect()
    }

    /// Returns true if `color` has at least one legal move.
    pub fn has_legal_move(&self, color: Color) -> bool {
        self.pieces(color).any(|piece| {
            piece
                .pseudo_legal_moves(self)
                .iter()
                .any(|dest| !self.in_check_after_move(piece.position, dest, color))
        })
    }
}

//
// Move application
//

impl Board {
    /// Moves the piece on `source` to `dest`, capturing whatever stands there
    /// and promoting pawns that reach their last rank to queens, then
    /// re-evaluates whether the game is over for the side that moves next.
    ///
    /// The move is trusted to be legal; use `try_make_move` for moves coming
    /// from untrusted input. The turn is not passed.
    pub fn make_move(&mut self, source: Coordinate, dest: Coordinate) {
        debug_assert_ne!(source, dest, "invalid move: source and destination coincide");
        let mut piece = self
            .tile(source)
            .piece
            .expect("invalid move: no piece at source square");
        let captured = self.tile(dest).piece;

        self.history.push(UndoRecord {
            material_score: self.material_score,
            king_position: self.king_position,
            source: *self.tile(source),
            dest: *self.tile(dest),
            game_over: self.game_over,
            turn: self.turn,
            bottom_player_turn: self.bottom_player_turn,
        });

        if let Some(captured) = captured {
            self.material_score[captured.color.as_index()] -=
                self.config.weights.weight(captured.kind);
        }

        if piece.kind == PieceKind::Pawn {
            let forward = attacks::pawn_forward(&*self, &piece);
            if dest.rank() == attacks::promotion_rank(forward) {
                piece = Piece::new(PieceKind::Queen, piece.color, source);
            }
        }

        piece.position = dest;
        piece.has_moved = true;
        if piece.kind == PieceKind::King {
            self.king_position[piece.color.as_index()] = Some(dest);
        }

        self.tile_mut(dest).piece = Some(piece);
        self.tile_mut(source).piece = None;
        trace!("make_move {} ({})", Move::new(source, dest), piece);

        // The side to move next is evaluated with the orientation flag it
        // will have once the caller advances the turn.
        let next = piece.color.toggle();
        self.bottom_player_turn = !self.bottom_player_turn;
        let mate = self.checkmate_or_stalemate_for(next);
        self.bottom_player_turn = !self.bottom_player_turn;
        self.record_game_over(mate);
    }

    /// Validating wrapper around `make_move`: the move must be one of the
    /// legal moves of the side to move and the game must still be running.
    pub fn try_make_move(&mut self, mov: Move) -> Result<(), EngineError> {
        if let Some(status) = self.game_over {
            return Err(EngineError::GameOver(status));
        }

        let captures_king = self
            .occupant(mov.dest())
            .map_or(false, |piece| piece.kind == PieceKind::King);
        if captures_king || !self.get_legal_moves(self.turn).contains(&mov) {
            debug!("rejecting illegal move {}", mov);
            return Err(EngineError::IllegalMove(mov));
        }

        self.make_move(mov.source(), mov.dest());
        Ok(())
    }

    /// Validates and makes a move, then passes the turn.
    pub fn play_move(&mut self, mov: Move) -> Result<(), EngineError> {
        self.try_make_move(mov)?;
        self.advance_turn();
        Ok(())
    }

    /// Reverts the most recent `make_move` (and the `advance_turn` that
    /// followed it, if any). Panics if there is nothing to undo.
    pub fn unmake_move(&mut self) {
        if let Err(err) = self.try_unmake_move() {
            panic!("{}", err);
        }
    }

    pub fn try_unmake_move(&mut self) -> Result<(), EngineError> {
        let record = self.history.pop().ok_or(EngineError::UndoUnderflow)?;
        self.material_score = record.material_score;
        self.king_position = record.king_position;
        *self.tile_mut(record.source.coordinate) = record.source;
        *self.tile_mut(record.dest.coordinate) = record.dest;
        self.game_over = record.game_over;
        self.turn = record.turn;
        self.bottom_player_turn = record.bottom_player_turn;
        trace!(
            "unmake_move {}",
            Move::new(record.source.coordinate, record.dest.coordinate)
        );
        Ok(())
    }

    /// Passes the turn to the other color.
    pub fn advance_turn(&mut self) {
        self.turn = self.turn.toggle();
        self.bottom_player_turn = !self.bottom_player_turn;
    }
}

//
// Game end detection
//

impl Board {
    /// Checkmate or stalemate for the side to move, if either applies.
    pub fn checkmate_or_stalemate(&self) -> Option<GameOver> {
        self.checkmate_or_stalemate_for(self.turn)
    }

    fn checkmate_or_stalemate_for(&self, color: Color) -> Option<GameOver> {
        if self.has_legal_move(color) {
            return None;
        }

        if self.in_check(color) {
            Some(GameOver::new(Outcome::Checkmate, Some(color.toggle())))
        } else {
            Some(GameOver::new(Outcome::Stalemate, None))
        }
    }

    /// A draw by insufficient material, according to the configured policy.
    pub fn insufficient_material(&self) -> Option<GameOver> {
        let dead = match self.config.draw_policy {
            DrawPolicy::Legacy => self.legacy_insufficient_material(),
            DrawPolicy::Standard => self.standard_insufficient_material(),
        };

        if dead {
            Some(GameOver::new(Outcome::InsufficientMaterial, None))
        } else {
            None
        }
    }

    /// Re-runs both game end detectors for the side to move and records the
    /// result. A game that is already over stays over.
    pub fn refresh_game_over(&mut self) -> Option<GameOver> {
        let mate = self.checkmate_or_stalemate();
        self.record_game_over(mate);
        self.game_over
    }

    fn record_game_over(&mut self, mate: Option<GameOver>) {
        let previous = self.game_over;
        if mate.is_some() {
            self.game_over = mate;
        }

        if let Some(draw) = self.insufficient_material() {
            self.game_over = Some(draw);
        }

        if previous.is_none() {
            if let Some(status) = self.game_over {
                info!("game over: {}", status);
            }
        }
    }

    fn legacy_insufficient_material(&self) -> bool {
        // Anything that is not a king, knight or queen counts as a minor piece.
        let mut kings = 0;
        let mut knights = [0; 2];
        let mut minors = [0; 2];
        for piece in self.all_pieces() {
            match piece.kind {
                PieceKind::Queen => return false,
                PieceKind::King => kings += 1,
                PieceKind::Knight => knights[piece.color.as_index()] += 1,
                _ => minors[piece.color.as_index()] += 1,
            }
        }

        let [white_knights, black_knights] = knights;
        let [white_minors, black_minors] = minors;
        let lone_minor = (white_minors == 1 && black_minors == 0)
            || (black_minors == 1 && white_minors == 0);

        if kings != 2 {
            false
        } else if white_minors == 0 && black_minors == 0 && white_knights == 0 && black_knights == 0
        {
            // king against king
            true
        } else if lone_minor && white_knights == 0 && black_knights == 0 {
            // king and minor piece against king
            true
        } else if (white_knights == 2 || black_knights == 2)
            && white_minors == 0
            && black_minors == 0
        {
            // king and two knights against king
            true
        } else {
            // king and minor piece, whatever the knights
            lone_minor
        }
    }

    fn standard_insufficient_material(&self) -> bool {
        let mut bishops = Bitboard::none();
        let mut knights = 0;
        for piece in self.all_pieces() {
            match piece.kind {
                PieceKind::King => {}
                PieceKind::Bishop => bishops.set(piece.position),
                PieceKind::Knight => knights += 1,
                _ => return false,
            }
        }

        let minors = bishops.count() + knights;
        if minors <= 1 {
            return true;
        }

        if knights > 0 {
            return false;
        }

        let on_even = bishops & BB_EVEN_SQUARES;
        on_even.empty() || on_even == bishops
    }
}

//
// FEN parsing and generation.
//
// FEN is used to set up test and tooling positions. Only the piece placement
// and side to move are meaningful to this engine; castling, en passant and
// the move clocks are tolerated and ignored.
//

impl Board {
    pub fn from_fen<S: AsRef<str>>(fen: S, perspective: Color) -> Result<Board, FenParseError> {
        Board::from_fen_with_config(fen, perspective, EngineConfig::default())
    }

    pub fn from_fen_with_config<S: AsRef<str>>(
        fen: S,
        perspective: Color,
        config: EngineConfig,
    ) -> Result<Board, FenParseError> {
        use std::iter::Peekable;
        use std::str::Chars;

        type Stream<'a> = Peekable<Chars<'a>>;

        fn eat(iter: &mut Stream, expected: char) -> Result<(), FenParseError> {
            match iter.next() {
                Some(c) if c == expected => Ok(()),
                Some(c) => Err(FenParseError::UnexpectedChar(c)),
                None => Err(FenParseError::UnexpectedEnd),
            }
        }

        fn peek(iter: &mut Stream) -> Result<char, FenParseError> {
            iter.peek().cloned().ok_or(FenParseError::UnexpectedEnd)
        }

        let mut board = Board::with_config(perspective, config);
        let iter = &mut fen.as_ref().chars().peekable();

        // Placement runs from the eighth chess rank down to the first.
        for chess_rank in (0..BOARD_SIZE).rev() {
            let rank = match perspective {
                Color::White => 7 - chess_rank,
                Color::Black => chess_rank,
            };

            let mut file = 0;
            while file < BOARD_SIZE {
                let c = peek(iter)?;
                if c.is_ascii_digit() {
                    if c < '1' || c > '8' {
                        return Err(FenParseError::InvalidDigit);
                    }

                    file += c as u8 - b'0';
                    if file > BOARD_SIZE {
                        return Err(FenParseError::FileDoesNotSumToEight);
                    }

                    iter.next();
                    continue;
                }

                let coord = Coordinate::new(file, rank);
                let mut piece =
                    Piece::from_fen_char(c, coord).ok_or(FenParseError::UnknownPiece(c))?;
                if piece.kind == PieceKind::Pawn {
                    piece.has_moved = rank != board.pawn_home_rank(piece.color);
                }

                board.put(piece);
                iter.next();
                file += 1;
            }

            if chess_rank != 0 {
                eat(iter, '/')?;
            }
        }

        eat(iter, ' ')?;
        board.turn = match iter.next() {
            Some('w') => Color::White,
            Some('b') => Color::Black,
            _ => return Err(FenParseError::InvalidSideToMove),
        };

        for &color in &[Color::White, Color::Black] {
            let kings = Coordinate::all()
                .filter_map(|coord| board.occupant(coord))
                .filter(|piece| piece.kind == PieceKind::King && piece.color == color)
                .count();
            if kings != 1 {
                return Err(FenParseError::KingCount(color, kings));
            }
        }

        board.bottom_player_turn = board.turn == perspective;
        if board.in_check(board.turn.toggle()) {
            return Err(FenParseError::SideNotToMoveInCheck);
        }

        board.recompute_material();
        Ok(board)
    }

    /// Produces the FEN placement and side to move of this board. Castling
    /// and en passant are always "-" and the clocks are not tracked.
    pub fn as_fen(&self) -> String {
        let mut buf = String::new();
        for chess_rank in (0..BOARD_SIZE).rev() {
            let rank = match self.perspective {
                Color::White => 7 - chess_rank,
                Color::Black => chess_rank,
            };

            let mut empty = 0;
            for file in 0..BOARD_SIZE {
                match self.piece_on(Coordinate::new(file, rank)) {
                    Some(piece) => {
                        if empty > 0 {
                            buf.push((b'0' + empty) as char);
                            empty = 0;
                        }

                        write!(buf, "{}", piece).unwrap();
                    }
                    None => empty += 1,
                }
            }

            if empty > 0 {
                buf.push((b'0' + empty) as char);
            }

            if chess_rank != 0 {
                buf.push('/');
            }
        }

        write!(buf, " {} - - 0 1", self.turn).unwrap();
        buf
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for rank in 0..BOARD_SIZE {
            for file in 0..BOARD_SIZE {
                if let Some(piece) = self.piece_on(Coordinate::new(file, rank)) {
                    write!(f, " {} ", piece)?;
                } else {
                    write!(f, " . ")?;
                }
            }

            let label = match self.perspective {
                Color::White => 8 - rank,
                Color::Black => rank + 1,
            };
            writeln!(f, "| {}", label)?;
        }

        for _ in 0..BOARD_SIZE {
            write!(f, "---")?;
        }

        writeln!(f)?;
        for file in 0..BOARD_SIZE {
            write!(f, " {} ", (b'a' + file) as char)?;
        }

        writeln!(f)?;
        Ok(())
    }
}

impl BoardView for Board {
    fn occupant(&self, coord: Coordinate) -> Option<Piece> {
        self.tile(coord).piece
    }

    fn perspective(&self) -> Color {
        self.perspective
    }

    fn bottom_player_turn(&self) -> bool {
        self.bottom_player_turn
    }

    fn config(&self) -> &EngineConfig {
        &self.config
    }
}

/// A board as it would look with one piece relocated and the opponent to
/// reply, borrowed from the live board.
struct Simulation<'a> {
    board: &'a Board,
    source: Coordinate,
    moved: Piece,
    bottom_player_turn: bool,
}

impl<'a> BoardView for Simulation<'a> {
    fn occupant(&self, coord: Coordinate) -> Option<Piece> {
        if coord == self.moved.position {
            Some(self.moved)
        } else if coord == self.source {
            None
        } else {
            self.board.occupant(coord)
        }
    }

    fn perspective(&self) -> Color {
        self.board.perspective
    }

    fn bottom_player_turn(&self) -> bool {
        self.bottom_player_turn
    }

    fn config(&self) -> &EngineConfig {
        &self.board.config
    }
}

/// Returns true if any piece not of `color` has `king` among its pseudo-legal
/// destinations.
fn king_attacked<V: BoardView>(view: &V, king: Coordinate, color: Color) -> bool {
    Coordinate::all().any(|coord| match view.occupant(coord) {
        Some(piece) if piece.color != color => piece.pseudo_legal_moves(view).test(king),
        _ => false,
    })
}

#[cfg(test)]
mod tests {
    use crate::board::Board;
    use crate::config::{DrawPolicy, EngineConfig, PawnDirection};
    use crate::error::EngineError;
    use crate::moves::Move;
    use crate::types::{Color, Coordinate, GameOver, Outcome, PieceKind};

    fn sq(name: &str) -> Coordinate {
        Coordinate::from_algebraic(name, Color::White).unwrap()
    }

    fn mv(mov: &str) -> Move {
        Move::from_algebraic(mov, Color::White).unwrap()
    }

    fn standard(perspective: Color) -> Board {
        let mut board = Board::new(perspective);
        board.initialize_standard_position();
        board
    }

    #[test]
    fn new_board_is_empty() {
        let board = Board::new(Color::White);
        assert_eq!(0, board.all_pieces().count());
        assert_eq!(Color::White, board.turn());
        assert!(board.bottom_player_turn());
        assert_eq!(1290, board.material_score(Color::White));
        assert_eq!(None, board.king_position(Color::Black));
    }

    #[test]
    fn standard_position_white_perspective() {
        let board = standard(Color::White);
        assert_eq!(32, board.all_pieces().count());
        assert_eq!(Some(Coordinate::new(4, 7)), board.king_position(Color::White));
        assert_eq!(Some(Coordinate::new(4, 0)), board.king_position(Color::Black));
        assert_eq!(
            "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w - - 0 1",
            board.as_fen()
        );
    }

    #[test]
    fn standard_position_black_perspective() {
        let board = standard(Color::Black);
        assert_eq!(Some(Coordinate::new(4, 7)), board.king_position(Color::Black));
        assert_eq!(Some(Coordinate::new(4, 0)), board.king_position(Color::White));
        assert!(!board.bottom_player_turn());
        assert_eq!(Color::White, board.turn());
        assert_eq!(
            "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w - - 0 1",
            board.as_fen()
        );
    }

    #[test]
    fn black_perspective_has_twenty_moves() {
        let board = standard(Color::Black);
        assert_eq!(20, board.get_legal_moves(Color::White).len());
        assert_eq!(20, board.get_legal_moves(Color::Black).len());
    }

    #[test]
    fn occupancy_queries() {
        let board = standard(Color::White);
        assert!(board.piece_at(sq("e2")));
        assert!(!board.piece_at(sq("e4")));
        assert!(board.enemy_at(sq("e7"), Color::White));
        assert!(!board.enemy_at(sq("e2"), Color::White));
        assert!(!board.enemy_at(sq("e4"), Color::White));
        assert!(board.valid_move(sq("e4"), Color::White));
        assert!(board.valid_move(sq("e7"), Color::White));
        assert!(!board.valid_move(sq("d2"), Color::White));
        assert!(Board::in_bounds(0, 7));
        assert!(!Board::in_bounds(8, 0));
        assert!(!Board::in_bounds(0, -1));
    }

    #[test]
    fn capture_deducts_from_captured_side() {
        let mut board = Board::from_fen("4k3/8/8/3p4/4P3/8/8/4K3 w - - 0 1", Color::White).unwrap();
        let white_before = board.material_score(Color::White);
        let black_before = board.material_score(Color::Black);
        board.make_move(sq("e4"), sq("d5"));
        assert_eq!(white_before, board.material_score(Color::White));
        assert_eq!(black_before - 10, board.material_score(Color::Black));
    }

    #[test]
    fn promotion_to_queen() {
        let mut board = Board::from_fen("k7/4P3/8/8/8/8/8/4K3 w - - 0 1", Color::White).unwrap();
        board.make_move(sq("e7"), sq("e8"));
        let piece = board.piece_on(sq("e8")).unwrap();
        assert_eq!(PieceKind::Queen, piece.kind);
        assert_eq!(Color::White, piece.color);
        assert_eq!(sq("e8"), piece.position);
        assert!(!board.piece_at(sq("e7")));

        board.unmake_move();
        assert_eq!(PieceKind::Pawn, board.piece_on(sq("e7")).unwrap().kind);
        assert!(!board.piece_at(sq("e8")));
    }

    #[test]
    fn black_promotes_on_the_first_rank() {
        let mut board = Board::from_fen("4k3/8/8/8/8/8/3p4/K7 b - - 0 1", Color::White).unwrap();
        board.make_move(sq("d2"), sq("d1"));
        assert_eq!(PieceKind::Queen, board.piece_on(sq("d1")).unwrap().kind);
    }

    #[test]
    fn king_cache_follows_king() {
        let mut board = standard(Color::White);
        board.play_move(mv("e2e4")).unwrap();
        board.play_move(mv("e7e5")).unwrap();
        board.play_move(mv("e1e2")).unwrap();
        assert_eq!(Some(sq("e2")), board.king_position(Color::White));
        board.unmake_move();
        assert_eq!(Some(sq("e1")), board.king_position(Color::White));
    }

    #[test]
    fn unmake_restores_has_moved_and_turn() {
        let mut board = standard(Color::White);
        let before = board.clone();
        board.make_move(sq("g1"), sq("f3"));
        board.advance_turn();
        assert!(board.piece_on(sq("f3")).unwrap().has_moved);
        assert_eq!(Color::Black, board.turn());
        board.unmake_move();
        assert_eq!(before, board);
    }

    #[test]
    fn bare_make_unmake_is_exact() {
        let mut board = standard(Color::White);
        let before = board.clone();
        board.make_move(sq("b1"), sq("c3"));
        board.unmake_move();
        assert_eq!(before, board);
    }

    #[test]
    fn undo_underflow() {
        let mut board = standard(Color::White);
        assert_eq!(Err(EngineError::UndoUnderflow), board.try_unmake_move());
    }

    #[test]
    #[should_panic(expected = "no move to undo")]
    fn unmake_on_empty_history_panics() {
        let mut board = standard(Color::White);
        board.unmake_move();
    }

    #[test]
    fn try_make_move_rejects_illegal_moves() {
        let mut board = standard(Color::White);
        let before = board.clone();
        assert_eq!(
            Err(EngineError::IllegalMove(mv("e2e5"))),
            board.try_make_move(mv("e2e5"))
        );
        assert_eq!(
            Err(EngineError::IllegalMove(mv("e7e5"))),
            board.try_make_move(mv("e7e5"))
        );
        assert_eq!(before, board);
    }

    #[test]
    fn pinned_piece_cannot_move() {
        // the white rook on e2 is pinned by the black rook on e8.
        let board = Board::from_fen("4r1k1/8/8/8/8/8/4R3/4K3 w - - 0 1", Color::White).unwrap();
        let moves = board.get_legal_moves(Color::White);
        assert!(moves.contains(&mv("e2e8")));
        assert!(moves.contains(&mv("e2e5")));
        assert!(!moves.contains(&mv("e2d2")));
    }

    #[test]
    fn king_cannot_step_into_pawn_attack() {
        let board = Board::from_fen("4k3/8/8/8/8/3p4/8/4K3 w - - 0 1", Color::White).unwrap();
        let moves = board.get_legal_moves(Color::White);
        assert!(!moves.contains(&mv("e1e2")));
        assert!(moves.contains(&mv("e1d2")));
        assert!(moves.contains(&mv("e1f2")));
    }

    #[test]
    fn captures_are_listed_first() {
        let board = Board::from_fen("4k3/8/8/3p4/4P3/8/8/4K3 w - - 0 1", Color::White).unwrap();
        let moves = board.get_legal_moves(Color::White);
        assert_eq!(mv("e4d5"), moves[0]);
    }

    #[test]
    fn ranked_moves_put_the_capture_first() {
        let board = Board::from_fen("4k3/8/8/3q4/4P3/8/8/4K3 w - - 0 1", Color::White).unwrap();
        let ranked = board.get_legal_moves_ranked();
        assert_eq!(mv("e4d5"), ranked[0]);
        assert_eq!(board.get_legal_moves(Color::White).len(), ranked.len());
    }

    #[test]
    fn stalemate_detected_after_move() {
        // white queen to g6 stalemates the black king on h8.
        let mut board = Board::from_fen("7k/5K2/8/6Q1/8/8/8/8 w - - 0 1", Color::White).unwrap();
        board.make_move(sq("g5"), sq("g6"));
        assert_eq!(
            Some(GameOver::new(Outcome::Stalemate, None)),
            board.game_over_status()
        );
    }

    #[test]
    fn checkmate_detected_after_move() {
        let mut board = Board::from_fen("6k1/5ppp/8/8/8/8/8/R5K1 w - - 0 1", Color::White).unwrap();
        board.make_move(sq("a1"), sq("a8"));
        assert_eq!(
            Some(GameOver::new(Outcome::Checkmate, Some(Color::White))),
            board.game_over_status()
        );
        board.unmake_move();
        assert_eq!(None, board.game_over_status());
    }

    #[test]
    fn refresh_for_side_to_move() {
        let mut board = Board::from_fen("7k/5K2/6Q1/8/8/8/8/8 b - - 0 1", Color::White).unwrap();
        assert_eq!(None, board.game_over_status());
        assert_eq!(
            Some(GameOver::new(Outcome::Stalemate, None)),
            board.refresh_game_over()
        );
    }

    #[test]
    fn play_move_refuses_after_game_over() {
        let mut board = Board::from_fen("6k1/5ppp/8/8/8/8/8/R5K1 w - - 0 1", Color::White).unwrap();
        board.play_move(mv("a1a8")).unwrap();
        let status = board.game_over_status().unwrap();
        assert_eq!(
            Err(EngineError::GameOver(status)),
            board.play_move(mv("g8h8"))
        );
    }

    fn legacy_draw(fen: &str) -> bool {
        Board::from_fen(fen, Color::White)
            .unwrap()
            .insufficient_material()
            .is_some()
    }

    fn standard_draw(fen: &str) -> bool {
        let config = EngineConfig {
            draw_policy: DrawPolicy::Standard,
            ..EngineConfig::default()
        };
        Board::from_fen_with_config(fen, Color::White, config)
            .unwrap()
            .insufficient_material()
            .is_some()
    }

    #[test]
    fn legacy_draw_policy() {
        // bare kings
        assert!(legacy_draw("4k3/8/8/8/8/8/8/4K3 w - - 0 1"));
        // king and rook against king counts as dead
        assert!(legacy_draw("4k3/8/8/8/8/8/8/R3K3 w - - 0 1"));
        // king and bishop against king
        assert!(legacy_draw("4k3/8/8/8/8/8/8/2B1K3 w - - 0 1"));
        // a lone pawn is a "minor" piece too
        assert!(legacy_draw("4k3/8/8/8/8/8/4P3/4K3 w - - 0 1"));
        // two knights against king
        assert!(legacy_draw("4k3/8/8/8/8/8/8/1N2K1N1 w - - 0 1"));
        // rook against knight, through the knight-agnostic branch
        assert!(legacy_draw("4k1n1/8/8/8/8/8/8/R3K3 w - - 0 1"));
        // a single knight is not covered by any branch
        assert!(!legacy_draw("4k3/8/8/8/8/8/8/1N2K3 w - - 0 1"));
        // a queen anywhere keeps the game alive
        assert!(!legacy_draw("4k3/8/8/8/8/8/8/3QK3 w - - 0 1"));
        // two pawns
        assert!(!legacy_draw("4k3/8/8/8/8/8/3PP3/4K3 w - - 0 1"));
        // one minor each
        assert!(!legacy_draw("3bk3/8/8/8/8/8/8/2B1K3 w - - 0 1"));
    }

    #[test]
    fn standard_draw_policy() {
        assert!(standard_draw("4k3/8/8/8/8/8/8/4K3 w - - 0 1"));
        assert!(standard_draw("4k3/8/8/8/8/8/8/1N2K3 w - - 0 1"));
        assert!(standard_draw("4k3/8/8/8/8/8/8/2B1K3 w - - 0 1"));
        // c1 and f8 are both dark squares
        assert!(standard_draw("4kb2/8/8/8/8/8/8/2B1K3 w - - 0 1"));
        // c1 is dark and c8 is light
        assert!(!standard_draw("2b1k3/8/8/8/8/8/8/2B1K3 w - - 0 1"));
        assert!(!standard_draw("4k3/8/8/8/8/8/8/R3K3 w - - 0 1"));
        assert!(!standard_draw("4k3/8/8/8/8/8/4P3/4K3 w - - 0 1"));
        assert!(!standard_draw("4k3/8/8/8/8/8/8/1N2K1N1 w - - 0 1"));
    }

    #[test]
    fn turn_orientation_pawns_follow_the_bottom_flag() {
        let config = EngineConfig {
            pawn_direction: PawnDirection::ByTurnOrientation,
            ..EngineConfig::default()
        };
        let mut board = Board::with_config(Color::White, config);
        board.initialize_standard_position();
        assert_eq!(20, board.get_legal_moves(Color::White).len());
        board.play_move(mv("e2e4")).unwrap();
        assert_eq!(20, board.get_legal_moves(Color::Black).len());
        board.play_move(mv("e7e5")).unwrap();
        assert_eq!(Color::White, board.turn());
        assert!(board.bottom_player_turn());
    }

    #[test]
    fn place_and_remove() {
        let mut board = Board::new(Color::White);
        board
            .place_piece(sq("e1"), PieceKind::King, Color::White)
            .unwrap();
        board
            .place_piece(sq("e4"), PieceKind::Pawn, Color::White)
            .unwrap();
        assert_eq!(Some(sq("e1")), board.king_position(Color::White));
        assert!(board.piece_on(sq("e4")).unwrap().has_moved);
        assert_eq!(
            Err(EngineError::Occupied(sq("e1"))),
            board.place_piece(sq("e1"), PieceKind::Queen, Color::Black)
        );
        assert_eq!(
            Err(EngineError::DuplicateKing(Color::White)),
            board.place_piece(sq("d1"), PieceKind::King, Color::White)
        );
        assert!(!board.piece_at(sq("d1")));
        board
            .place_piece(sq("e8"), PieceKind::King, Color::Black)
            .unwrap();

        let king = board.remove_piece(sq("e1")).unwrap();
        assert_eq!(PieceKind::King, king.kind);
        assert_eq!(None, board.king_position(Color::White));
        assert_eq!(
            Err(EngineError::NoPieceAt(sq("e1"))),
            board.remove_piece(sq("e1")).map(|_| ())
        );
    }

    #[test]
    fn fen_round_trip() {
        let fen = "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R b - - 0 1";
        let board = Board::from_fen(fen, Color::White).unwrap();
        assert_eq!(fen, board.as_fen());
        assert_eq!(Color::Black, board.turn());
        assert!(!board.bottom_player_turn());

        let flipped = Board::from_fen(fen, Color::Black).unwrap();
        assert_eq!(fen, flipped.as_fen());
        assert!(flipped.bottom_player_turn());
    }

    #[test]
    fn fen_errors() {
        use crate::board::FenParseError;

        assert_eq!(
            Err(FenParseError::UnknownPiece('x')),
            Board::from_fen("x7/8/8/8/8/8/8/8 w - - 0 1", Color::White).map(|_| ())
        );
        assert_eq!(
            Err(FenParseError::FileDoesNotSumToEight),
            Board::from_fen("45/8/8/8/8/8/8/8 w - - 0 1", Color::White).map(|_| ())
        );
        assert_eq!(
            Err(FenParseError::InvalidSideToMove),
            Board::from_fen("8/8/8/8/8/8/8/8 x - - 0 1", Color::White).map(|_| ())
        );
        assert_eq!(
            Err(FenParseError::UnexpectedEnd),
            Board::from_fen("8/8/8", Color::White).map(|_| ())
        );
    }

    #[test]
    fn fen_requires_one_king_per_side() {
        use crate::board::FenParseError;

        assert_eq!(
            Err(FenParseError::KingCount(Color::White, 2)),
            Board::from_fen("4k3/8/8/8/8/8/8/3KK3 w - - 0 1", Color::White).map(|_| ())
        );
        assert_eq!(
            Err(FenParseError::KingCount(Color::White, 0)),
            Board::from_fen("8/8/8/8/8/8/8/8 w - - 0 1", Color::White).map(|_| ())
        );
        assert_eq!(
            Err(FenParseError::KingCount(Color::Black, 0)),
            Board::from_fen("8/8/8/8/8/8/8/4K3 w - - 0 1", Color::Black).map(|_| ())
        );
    }

    #[test]
    fn fen_rejects_side_not_to_move_in_check() {
        use crate::board::FenParseError;

        // white is in check from the rook on e2 but it is black to move.
        let fen = "4k3/8/8/8/8/8/4r3/4K3 b - - 0 1";
        assert_eq!(
            Err(FenParseError::SideNotToMoveInCheck),
            Board::from_fen(fen, Color::White).map(|_| ())
        );
        assert_eq!(
            Err(FenParseError::SideNotToMoveInCheck),
            Board::from_fen(fen, Color::Black).map(|_| ())
        );

        // the same placement is fine with white to move.
        assert!(Board::from_fen("4k3/8/8/8/8/8/4r3/4K3 w - - 0 1", Color::White).is_ok());
    }

    #[test]
    fn try_make_move_never_captures_a_king() {
        let mut board = Board::from_fen("4k3/8/8/8/8/8/8/R3K3 w - - 0 1", Color::White).unwrap();
        board.remove_piece(sq("a1")).unwrap();
        board
            .place_piece(sq("e2"), PieceKind::Rook, Color::White)
            .unwrap();

        let before = board.clone();
        assert_eq!(
            Err(EngineError::IllegalMove(mv("e2e8"))),
            board.try_make_move(mv("e2e8"))
        );
        assert_eq!(before, board);
        assert_eq!(Some(sq("e8")), board.king_position(Color::Black));
    }

    #[test]
    fn fen_material_is_recomputed() {
        let board = Board::from_fen("4k3/8/8/8/8/8/8/R3K3 w - - 0 1", Color::White).unwrap();
        assert_eq!(950, board.material_score(Color::White));
        assert_eq!(900, board.material_score(Color::Black));
    }
}
