// Copyright 2023 Sean Gillespie.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

use crate::core::{Piece, Square};

/// The 8x8 piece grid. Every one of the 64 entries is always populated with
/// either a piece or the empty marker (`None`); squares never go missing.
///
/// `Board` is a dumb container: it knows nothing about turn order, legality,
/// or kings. That bookkeeping lives in `Position`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Board {
    grid: [Option<Piece>; 64],
}

impl Board {
    /// Creates a board with all 64 squares empty.
    pub const fn empty() -> Board {
        Board { grid: [None; 64] }
    }

    /// Returns the piece standing on the given square, if any.
    pub fn piece_at(&self, square: Square) -> Option<Piece> {
        self.grid[square.as_u8() as usize]
    }

    /// Places a piece on the given square, replacing whatever stood there.
    pub fn put(&mut self, square: Square, piece: Piece) {
        self.grid[square.as_u8() as usize] = Some(piece);
    }

    /// Removes and returns the piece on the given square, leaving it empty.
    pub fn take(&mut self, square: Square) -> Option<Piece> {
        self.grid[square.as_u8() as usize].take()
    }
}

impl Default for Board {
    fn default() -> Self {
        Board::empty()
    }
}

#[cfg(test)]
mod tests {
    use super::Board;
    use crate::core::*;

    #[test]
    fn put_take_round_trip() {
        let mut board = Board::empty();
        let knight = Piece::new(Color::White, PieceKind::Knight);
        board.put(G1, knight);
        assert_eq!(Some(knight), board.piece_at(G1));
        assert_eq!(Some(knight), board.take(G1));
        assert_eq!(None, board.piece_at(G1));
    }

    #[test]
    fn put_replaces() {
        let mut board = Board::empty();
        board.put(D4, Piece::new(Color::Black, PieceKind::Pawn));
        board.put(D4, Piece::new(Color::White, PieceKind::Queen));
        assert_eq!(
            Some(Piece::new(Color::White, PieceKind::Queen)),
            board.piece_at(D4)
        );
    }

    #[test]
    fn empty_board_is_empty() {
        let board = Board::empty();
        for sq in squares() {
            assert_eq!(None, board.piece_at(sq));
        }
    }
}
