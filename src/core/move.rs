// Copyright 2023 Sean Gillespie.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

use std::convert::TryFrom;
use std::fmt;
use std::hash::{Hash, Hasher};

use crate::core::{Board, File, Piece, Rank, Square};
use crate::Position;

/// A move of a single piece from one square to another, together with a
/// snapshot of whatever stood on the destination square when the move was
/// constructed. The snapshot is what makes undo possible without
/// recomputation, and it is why a `Move` must always be constructed *before*
/// the board it was read from is mutated.
///
/// Two moves are equal iff their source and destination coordinates are
/// equal; the piece fields do not participate in equality or hashing. This
/// mirrors how a UI compares a user's gesture against the legal-move list.
#[derive(Copy, Clone)]
pub struct Move {
    source: Square,
    destination: Square,
    piece_moved: Piece,
    piece_captured: Option<Piece>,
}

impl Move {
    /// Constructs a move of the piece on `source` to `destination`, reading
    /// the moved piece and the capture snapshot from the given board.
    ///
    /// Panics if the source square is empty; producing a move from an empty
    /// square is a generator bug, not a recoverable condition.
    pub fn new(board: &Board, source: Square, destination: Square) -> Move {
        let piece_moved = board
            .piece_at(source)
            .expect("invalid move: no piece at source square");
        Move {
            source,
            destination,
            piece_moved,
            piece_captured: board.piece_at(destination),
        }
    }

    /// Returns the source square of this move.
    pub fn source(self) -> Square {
        self.source
    }

    /// Returns the destination square of this move.
    pub fn destination(self) -> Square {
        self.destination
    }

    /// Returns the piece being moved.
    pub fn piece_moved(self) -> Piece {
        self.piece_moved
    }

    /// Returns the piece that stood on the destination square when this move
    /// was constructed, if any.
    pub fn piece_captured(self) -> Option<Piece> {
        self.piece_captured
    }

    /// Returns whether or not this move is a capture.
    pub fn is_capture(self) -> bool {
        self.piece_captured.is_some()
    }

    /// Returns the ((file, rank), (file, rank)) coordinate pairs of this
    /// move's endpoints.
    pub fn coordinates(self) -> ((File, Rank), (File, Rank)) {
        (
            (self.source.file(), self.source.rank()),
            (self.destination.file(), self.destination.rank()),
        )
    }

    /// Returns the coordinate notation of this move, e.g. `e2e4`.
    pub fn as_coordinate(self) -> String {
        format!("{}{}", self.source, self.destination)
    }

    /// Parses coordinate notation (e.g. `e2e4`) into a Move against the given
    /// position. Returns `None` if the string is malformed or names an empty
    /// source square.
    pub fn from_coordinate(pos: &Position, move_str: &str) -> Option<Move> {
        let chars: Vec<_> = move_str.chars().collect();
        if chars.len() != 4 {
            return None;
        }

        let source_file = File::try_from(chars[0]).ok()?;
        let source_rank = Rank::try_from(chars[1]).ok()?;
        let dest_file = File::try_from(chars[2]).ok()?;
        let dest_rank = Rank::try_from(chars[3]).ok()?;
        let source = Square::of(source_rank, source_file);
        let destination = Square::of(dest_rank, dest_file);
        pos.piece_at(source)?;
        Some(Move::new(pos.board(), source, destination))
    }
}

impl PartialEq for Move {
    fn eq(&self, other: &Move) -> bool {
        self.source == other.source && self.destination == other.destination
    }
}

impl Eq for Move {}

impl Hash for Move {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.source.hash(state);
        self.destination.hash(state);
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter) -> Result<(), fmt::Error> {
        write!(f, "{}", self.as_coordinate())
    }
}

impl fmt::Debug for Move {
    fn fmt(&self, f: &mut fmt::Formatter) -> Result<(), fmt::Error> {
        write!(f, "{} ({}", self.as_coordinate(), self.piece_moved)?;
        if let Some(captured) = self.piece_captured {
            write!(f, "x{}", captured)?;
        }
        write!(f, ")")
    }
}
