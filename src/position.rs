// Copyright 2023 Sean Gillespie.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

use std::{
    convert::TryFrom,
    fmt::{self, Write},
};

use thiserror::Error;
use tracing::trace;

use crate::{
    core::{self, *},
    movegen,
};

/// A position, representing a chess game that has progressed up to this
/// point. A Position owns the board, the side to move, the cached king
/// squares, and the full move log, which doubles as the undo stack: every
/// move carries its own capture snapshot, so unwinding the log restores the
/// game exactly.
#[derive(Clone, Debug)]
pub struct Position {
    /// The piece grid.
    board: Board,
    /// Color whose turn it is to move.
    side_to_move: Color,
    /// Append-only log of the moves played so far, most recent last.
    log: Vec<Move>,
    /// Cached king squares per color, for O(1) lookup during check analysis.
    /// A side with no king on the board (common in test fixtures) is `None`.
    kings: [Option<Square>; 2],
}

impl Position {
    pub fn side_to_move(&self) -> Color {
        self.side_to_move
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn piece_at(&self, square: Square) -> Option<Piece> {
        self.board.piece_at(square)
    }

    /// The square this color's king stands on, if it has one.
    pub fn king(&self, color: Color) -> Option<Square> {
        self.kings[color as usize]
    }

    /// The moves played so far, oldest first.
    pub fn move_log(&self) -> &[Move] {
        &self.log
    }

    /// Returns whether the side to move is currently in check.
    pub fn is_check(&self) -> bool {
        crate::analysis::analyze(self).in_check
    }
}

impl Position {
    /// An empty board with White to move. Useful as a base for piece-by-piece
    /// construction; games start from `new_game`.
    pub fn new() -> Position {
        Position {
            board: Board::empty(),
            side_to_move: Color::White,
            log: Vec::new(),
            kings: [None, None],
        }
    }

    /// The standard starting position.
    pub fn new_game() -> Position {
        Position::from_fen("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w - - 0 1").unwrap()
    }

    pub fn add_piece(&mut self, square: Square, piece: Piece) -> Result<(), ()> {
        if self.board.piece_at(square).is_some() {
            return Err(());
        }

        self.board.put(square, piece);
        if piece.kind == PieceKind::King {
            self.kings[piece.color as usize] = Some(square);
        }
        Ok(())
    }

    pub fn remove_piece(&mut self, square: Square) -> Result<(), ()> {
        let piece = if let Some(piece) = self.board.take(square) {
            piece
        } else {
            return Err(());
        };

        if piece.kind == PieceKind::King {
            self.kings[piece.color as usize] = None;
        }
        Ok(())
    }
}

//
// Make and unmake move.
//

impl Position {
    /// Plays a move: empties the source square, writes the moved piece to the
    /// destination, logs the move, and flips the side to move. King moves
    /// also update the king cache.
    ///
    /// No legality check is performed. Callers are expected to hand this
    /// method a move obtained from `movegen::legal_moves` against the current
    /// position; use `try_make_move` at an untrusted boundary.
    pub fn make_move(&mut self, mov: Move) {
        trace!(mov = %mov, side = ?self.side_to_move, "make_move");
        self.board.take(mov.source());
        self.board.put(mov.destination(), mov.piece_moved());
        if mov.piece_moved().kind == PieceKind::King {
            self.kings[mov.piece_moved().color as usize] = Some(mov.destination());
        }
        self.log.push(mov);
        self.side_to_move = self.side_to_move.toggle();
    }

    /// Unwinds the most recent move: the moved piece returns to its source
    /// square, the capture snapshot (if any) returns to the destination, the
    /// side to move flips back, and the king cache is restored. A no-op if no
    /// moves have been played.
    pub fn unmake_move(&mut self) {
        let mov = if let Some(mov) = self.log.pop() {
            mov
        } else {
            return;
        };

        trace!(mov = %mov, "unmake_move");
        self.board.take(mov.destination());
        if let Some(captured) = mov.piece_captured() {
            self.board.put(mov.destination(), captured);
        }
        self.board.put(mov.source(), mov.piece_moved());
        if mov.piece_moved().kind == PieceKind::King {
            self.kings[mov.piece_moved().color as usize] = Some(mov.source());
        }
        self.side_to_move = self.side_to_move.toggle();
    }

    /// Validating wrapper around `make_move`: plays the move only if it is in
    /// the current legal-move set.
    pub fn try_make_move(&mut self, mov: Move) -> Result<(), IllegalMoveError> {
        if !movegen::legal_moves(self).contains(&mov) {
            return Err(IllegalMoveError { mov });
        }

        self.make_move(mov);
        Ok(())
    }
}

/// Returned by `try_make_move` when the given move is not legal in the
/// current position.
#[derive(Copy, Clone, Debug, Error)]
#[error("illegal move: {mov}")]
pub struct IllegalMoveError {
    pub mov: Move,
}

//
// FEN parsing and generation.
//
// Only the piece placement and side-to-move fields carry state this engine
// tracks. The castle, en-passant, and clock fields are validated for shape
// and then discarded, so that standard FEN strings remain valid inputs even
// though those rules are out of scope.
//

/// Possible errors that can arise when parsing a FEN string into a `Position`.
#[derive(Clone, PartialEq, Eq, Debug, Error)]
pub enum FenParseError {
    #[error("unexpected char: {0}")]
    UnexpectedChar(char),
    #[error("unexpected EOF while reading")]
    UnexpectedEnd,
    #[error("invalid digit")]
    InvalidDigit,
    #[error("file does not sum to 8")]
    FileDoesNotSumToEight,
    #[error("unknown piece: {0}")]
    UnknownPiece(char),
    #[error("invalid side to move")]
    InvalidSideToMove,
    #[error("invalid castle")]
    InvalidCastle,
    #[error("invalid en-passant")]
    InvalidEnPassant,
    #[error("empty halfmove")]
    EmptyHalfmove,
    #[error("invalid halfmove")]
    InvalidHalfmove,
    #[error("empty fullmove")]
    EmptyFullmove,
    #[error("invalid fullmove")]
    InvalidFullmove,
}

impl Position {
    /// Constructs a new position from a FEN representation of a board
    /// position.
    pub fn from_fen(fen: impl AsRef<str>) -> Result<Position, FenParseError> {
        use std::{iter::Peekable, str::Chars};

        type Stream<'a> = Peekable<Chars<'a>>;

        fn eat(iter: &mut Stream<'_>, expected: char) -> Result<(), FenParseError> {
            match iter.next() {
                Some(c) if c == expected => Ok(()),
                Some(c) => Err(FenParseError::UnexpectedChar(c)),
                None => Err(FenParseError::UnexpectedEnd),
            }
        }

        fn advance(iter: &mut Stream<'_>) -> Result<(), FenParseError> {
            let _ = iter.next();
            Ok(())
        }

        fn peek(iter: &mut Stream<'_>) -> Result<char, FenParseError> {
            if let Some(c) = iter.peek() {
                Ok(*c)
            } else {
                Err(FenParseError::UnexpectedEnd)
            }
        }

        fn eat_side_to_move(iter: &mut Stream<'_>) -> Result<Color, FenParseError> {
            let side = match peek(iter)? {
                'w' => Color::White,
                'b' => Color::Black,
                _ => return Err(FenParseError::InvalidSideToMove),
            };

            advance(iter)?;
            Ok(side)
        }

        // Castle rights are not tracked; validate the field's shape and move
        // on.
        fn eat_castle_status(iter: &mut Stream<'_>) -> Result<(), FenParseError> {
            if peek(iter)? == '-' {
                advance(iter)?;
                return Ok(());
            }

            for _ in 0..4 {
                match peek(iter)? {
                    'K' | 'k' | 'Q' | 'q' => advance(iter)?,
                    ' ' => break,
                    _ => return Err(FenParseError::InvalidCastle),
                }
            }

            Ok(())
        }

        // Likewise for the en-passant square.
        fn eat_en_passant(iter: &mut Stream<'_>) -> Result<(), FenParseError> {
            let c = peek(iter)?;
            if c == '-' {
                advance(iter)?;
                return Ok(());
            }

            if File::try_from(c).is_ok() {
                advance(iter)?;
                let rank_c = peek(iter)?;
                if Rank::try_from(rank_c).is_ok() {
                    advance(iter)?;
                    Ok(())
                } else {
                    Err(FenParseError::InvalidEnPassant)
                }
            } else {
                Err(FenParseError::InvalidEnPassant)
            }
        }

        fn eat_halfmove(iter: &mut Stream<'_>) -> Result<(), FenParseError> {
            let mut buf = String::new();
            loop {
                let c = peek(iter)?;
                if !c.is_ascii_digit() {
                    break;
                }

                buf.push(c);
                advance(iter)?;
            }

            if buf.is_empty() {
                return Err(FenParseError::EmptyHalfmove);
            }

            buf.parse::<u16>()
                .map(|_| ())
                .map_err(|_| FenParseError::InvalidHalfmove)
        }

        fn eat_fullmove(iter: &mut Stream<'_>) -> Result<(), FenParseError> {
            let mut buf = String::new();
            for ch in iter {
                if !ch.is_ascii_digit() {
                    if buf.is_empty() {
                        return Err(FenParseError::EmptyFullmove);
                    }

                    break;
                }

                buf.push(ch);
            }

            if buf.is_empty() {
                return Err(FenParseError::EmptyFullmove);
            }

            buf.parse::<u16>()
                .map(|_| ())
                .map_err(|_| FenParseError::InvalidFullmove)
        }

        let mut pos = Position::new();
        let str_ref = fen.as_ref();
        let iter = &mut str_ref.chars().peekable();
        for rank in core::ranks().rev() {
            let mut file = 0;
            while file <= 7 {
                let c = peek(iter)?;
                // digits 1 through 8 indicate empty squares.
                if c.is_ascii_digit() {
                    if !('1'..='8').contains(&c) {
                        return Err(FenParseError::InvalidDigit);
                    }

                    let value = c as usize - 48;
                    file += value;
                    if file > 8 {
                        return Err(FenParseError::FileDoesNotSumToEight);
                    }

                    advance(iter)?;
                    continue;
                }

                // if it's not a digit, it represents a piece.
                let piece = if let Ok(piece) = Piece::try_from(c) {
                    piece
                } else {
                    return Err(FenParseError::UnknownPiece(c));
                };

                let square = Square::of(rank, File::try_from(file as u8).unwrap());
                pos.add_piece(square, piece).expect("FEN double-add piece?");
                advance(iter)?;
                file += 1;
            }

            if rank != core::RANK_1 {
                eat(iter, '/')?;
            }
        }

        eat(iter, ' ')?;
        pos.side_to_move = eat_side_to_move(iter)?;
        eat(iter, ' ')?;
        eat_castle_status(iter)?;
        eat(iter, ' ')?;
        eat_en_passant(iter)?;
        eat(iter, ' ')?;
        eat_halfmove(iter)?;
        eat(iter, ' ')?;
        eat_fullmove(iter)?;
        Ok(pos)
    }

    /// Renders this position as FEN. The untracked fields (castle rights,
    /// en-passant, clocks) come out as their absent/initial forms.
    pub fn as_fen(&self) -> String {
        let mut buf = String::new();
        for rank in core::ranks().rev() {
            let mut empty_squares = 0;
            for file in core::files() {
                let square = Square::of(rank, file);
                if let Some(piece) = self.piece_at(square) {
                    if empty_squares != 0 {
                        write!(&mut buf, "{}", empty_squares).unwrap();
                    }
                    write!(&mut buf, "{}", piece).unwrap();
                    empty_squares = 0;
                } else {
                    empty_squares += 1;
                }
            }

            if empty_squares != 0 {
                write!(&mut buf, "{}", empty_squares).unwrap();
            }

            if rank != core::RANK_1 {
                buf.push('/');
            }
        }

        buf.push(' ');
        match self.side_to_move() {
            Color::White => buf.push('w'),
            Color::Black => buf.push('b'),
        }
        buf.push_str(" - - 0 1");
        buf
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for rank in core::ranks().rev() {
            for file in core::files() {
                let sq = Square::of(rank, file);
                if let Some(piece) = self.piece_at(sq) {
                    write!(f, " {} ", piece)?;
                } else {
                    write!(f, " . ")?;
                }
            }

            writeln!(f, "| {}", rank)?;
        }

        for _ in core::files() {
            write!(f, "---")?;
        }

        writeln!(f)?;
        for file in core::files() {
            write!(f, " {} ", file)?;
        }

        writeln!(f)?;
        Ok(())
    }
}

impl Default for Position {
    fn default() -> Self {
        Position::new()
    }
}
