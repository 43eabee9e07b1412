// Copyright 2023 Sean Gillespie.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

use std::{convert::TryFrom, fmt};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SquareParseError {
    #[error("square index out of range: {0}")]
    OutOfRange(u8),
}

#[derive(Debug, Error)]
pub enum RankParseError {
    #[error("rank index out of range: {0}")]
    OutOfRange(u8),
    #[error("invalid char: {0}")]
    InvalidChar(char),
}

#[derive(Debug, Error)]
pub enum FileParseError {
    #[error("file index out of range: {0}")]
    OutOfRange(u8),
    #[error("invalid char: {0}")]
    InvalidChar(char),
}

#[derive(Debug, Error)]
pub enum PieceParseError {
    #[error("invalid char: {0}")]
    InvalidChar(char),
}

/// A square on the chessboard. Rank 0 is White's back rank; squares are
/// numbered rank-major from a1.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Square(pub(in crate::core) u8);

impl Square {
    /// Returns the rank of this square on the chessboard.
    pub const fn rank(self) -> Rank {
        Rank(self.0 >> 3)
    }

    /// Returns the file of this square on the chessboard.
    pub const fn file(self) -> File {
        File(self.0 & 7)
    }

    /// Creates a new Square composed of a given rank and file.
    pub const fn of(rank: Rank, file: File) -> Square {
        Square(rank.0 * 8 + file.0)
    }

    /// Returns the square displaced from this one by the given rank and file
    /// deltas, or `None` if the displacement leaves the board. This is the
    /// single bounds check for all move generation; off-board coordinates are
    /// never materialized as a `Square`.
    pub fn offset(self, d_rank: i8, d_file: i8) -> Option<Square> {
        let rank = self.rank().0 as i8 + d_rank;
        let file = self.file().0 as i8 + d_file;
        if (0..8).contains(&rank) && (0..8).contains(&file) {
            Some(Square::of(Rank(rank as u8), File(file as u8)))
        } else {
            None
        }
    }

    /// Returns the adjacent square in the given direction, if it is on the
    /// board.
    pub fn towards(self, dir: Direction) -> Option<Square> {
        let (d_rank, d_file) = dir.vector();
        self.offset(d_rank, d_file)
    }

    pub const fn as_u8(self) -> u8 {
        self.0
    }
}

impl TryFrom<u8> for Square {
    type Error = SquareParseError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        if value >= 64 {
            return Err(SquareParseError::OutOfRange(value));
        }

        Ok(Square(value))
    }
}

impl fmt::Display for Square {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.file(), self.rank())
    }
}

pub const A1: Square = Square(0);
pub const B1: Square = Square(1);
pub const C1: Square = Square(2);
pub const D1: Square = Square(3);
pub const E1: Square = Square(4);
pub const F1: Square = Square(5);
pub const G1: Square = Square(6);
pub const H1: Square = Square(7);
pub const A2: Square = Square(8);
pub const B2: Square = Square(9);
pub const C2: Square = Square(10);
pub const D2: Square = Square(11);
pub const E2: Square = Square(12);
pub const F2: Square = Square(13);
pub const G2: Square = Square(14);
pub const H2: Square = Square(15);
pub const A3: Square = Square(16);
pub const B3: Square = Square(17);
pub const C3: Square = Square(18);
pub const D3: Square = Square(19);
pub const E3: Square = Square(20);
pub const F3: Square = Square(21);
pub const G3: Square = Square(22);
pub const H3: Square = Square(23);
pub const A4: Square = Square(24);
pub const B4: Square = Square(25);
pub const C4: Square = Square(26);
pub const D4: Square = Square(27);
pub const E4: Square = Square(28);
pub const F4: Square = Square(29);
pub const G4: Square = Square(30);
pub const H4: Square = Square(31);
pub const A5: Square = Square(32);
pub const B5: Square = Square(33);
pub const C5: Square = Square(34);
pub const D5: Square = Square(35);
pub const E5: Square = Square(36);
pub const F5: Square = Square(37);
pub const G5: Square = Square(38);
pub const H5: Square = Square(39);
pub const A6: Square = Square(40);
pub const B6: Square = Square(41);
pub const C6: Square = Square(42);
pub const D6: Square = Square(43);
pub const E6: Square = Square(44);
pub const F6: Square = Square(45);
pub const G6: Square = Square(46);
pub const H6: Square = Square(47);
pub const A7: Square = Square(48);
pub const B7: Square = Square(49);
pub const C7: Square = Square(50);
pub const D7: Square = Square(51);
pub const E7: Square = Square(52);
pub const F7: Square = Square(53);
pub const G7: Square = Square(54);
pub const H7: Square = Square(55);
pub const A8: Square = Square(56);
pub const B8: Square = Square(57);
pub const C8: Square = Square(58);
pub const D8: Square = Square(59);
pub const E8: Square = Square(60);
pub const F8: Square = Square(61);
pub const G8: Square = Square(62);
pub const H8: Square = Square(63);

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Rank(u8);

impl Rank {
    pub const fn as_u8(self) -> u8 {
        self.0
    }
}

impl TryFrom<u8> for Rank {
    type Error = RankParseError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        if value >= 8 {
            return Err(RankParseError::OutOfRange(value));
        }

        Ok(Rank(value))
    }
}

impl TryFrom<char> for Rank {
    type Error = RankParseError;

    fn try_from(value: char) -> Result<Self, Self::Error> {
        match value {
            '1'..='8' => Ok(Rank(value as u8 - b'1')),
            c => Err(RankParseError::InvalidChar(c)),
        }
    }
}

impl fmt::Display for Rank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", (b'1' + self.0) as char)
    }
}

pub const RANK_1: Rank = Rank(0);
pub const RANK_2: Rank = Rank(1);
pub const RANK_3: Rank = Rank(2);
pub const RANK_4: Rank = Rank(3);
pub const RANK_5: Rank = Rank(4);
pub const RANK_6: Rank = Rank(5);
pub const RANK_7: Rank = Rank(6);
pub const RANK_8: Rank = Rank(7);

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct File(u8);

impl File {
    pub const fn as_u8(self) -> u8 {
        self.0
    }
}

impl TryFrom<u8> for File {
    type Error = FileParseError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        if value >= 8 {
            return Err(FileParseError::OutOfRange(value));
        }

        Ok(File(value))
    }
}

impl TryFrom<char> for File {
    type Error = FileParseError;

    fn try_from(value: char) -> Result<Self, Self::Error> {
        match value {
            'a'..='h' => Ok(File(value as u8 - b'a')),
            c => Err(FileParseError::InvalidChar(c)),
        }
    }
}

impl fmt::Display for File {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", (b'a' + self.0) as char)
    }
}

pub const FILE_A: File = File(0);
pub const FILE_B: File = File(1);
pub const FILE_C: File = File(2);
pub const FILE_D: File = File(3);
pub const FILE_E: File = File(4);
pub const FILE_F: File = File(5);
pub const FILE_G: File = File(6);
pub const FILE_H: File = File(7);

#[repr(u8)]
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
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

    /// The rank direction this color's pawns advance in: White pawns move up
    /// the board, Black pawns move down.
    pub const fn pawn_step(self) -> i8 {
        match self {
            Color::White => 1,
            Color::Black => -1,
        }
    }

    /// The rank this color's pawns start on, from which a double push is
    /// permitted.
    pub const fn pawn_home_rank(self) -> Rank {
        match self {
            Color::White => RANK_2,
            Color::Black => RANK_7,
        }
    }
}

#[repr(u8)]
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum PieceKind {
    Pawn,
    Knight,
    Bishop,
    Rook,
    Queen,
    King,
}

impl fmt::Display for PieceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let c = match self {
            PieceKind::Pawn => 'p',
            PieceKind::Knight => 'n',
            PieceKind::Bishop => 'b',
            PieceKind::Rook => 'r',
            PieceKind::Queen => 'q',
            PieceKind::King => 'k',
        };

        write!(f, "{}", c)
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Piece {
    pub color: Color,
    pub kind: PieceKind,
}

impl Piece {
    pub const fn new(color: Color, kind: PieceKind) -> Piece {
        Piece { color, kind }
    }

    /// The FEN character for this piece: uppercase for White, lowercase for
    /// Black.
    pub fn as_char(self) -> char {
        let c = match self.kind {
            PieceKind::Pawn => 'p',
            PieceKind::Knight => 'n',
            PieceKind::Bishop => 'b',
            PieceKind::Rook => 'r',
            PieceKind::Queen => 'q',
            PieceKind::King => 'k',
        };

        match self.color {
            Color::White => c.to_ascii_uppercase(),
            Color::Black => c,
        }
    }
}

impl TryFrom<char> for Piece {
    type Error = PieceParseError;

    fn try_from(value: char) -> Result<Self, Self::Error> {
        let kind = match value.to_ascii_lowercase() {
            'p' => PieceKind::Pawn,
            'n' => PieceKind::Knight,
            'b' => PieceKind::Bishop,
            'r' => PieceKind::Rook,
            'q' => PieceKind::Queen,
            'k' => PieceKind::King,
            c => return Err(PieceParseError::InvalidChar(c)),
        };

        let color = if value.is_ascii_uppercase() {
            Color::White
        } else {
            Color::Black
        };

        Ok(Piece { color, kind })
    }
}

impl fmt::Display for Piece {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_char())
    }
}

/// A compass direction, the unit of ray-casting. `vector` yields the
/// (rank, file) deltas of a single step.
#[repr(u8)]
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Direction {
    North,
    NorthEast,
    East,
    SouthEast,
    South,
    SouthWest,
    West,
    NorthWest,
}

impl Direction {
    /// All eight compass directions, the king's neighborhood.
    pub const COMPASS: [Direction; 8] = [
        Direction::North,
        Direction::NorthEast,
        Direction::East,
        Direction::SouthEast,
        Direction::South,
        Direction::SouthWest,
        Direction::West,
        Direction::NorthWest,
    ];

    /// The four rook directions.
    pub const ORTHOGONAL: [Direction; 4] = [
        Direction::North,
        Direction::East,
        Direction::South,
        Direction::West,
    ];

    /// The four bishop directions.
    pub const DIAGONAL: [Direction; 4] = [
        Direction::NorthEast,
        Direction::SouthEast,
        Direction::SouthWest,
        Direction::NorthWest,
    ];

    pub const fn vector(self) -> (i8, i8) {
        match self {
            Direction::North => (1, 0),
            Direction::NorthEast => (1, 1),
            Direction::East => (0, 1),
            Direction::SouthEast => (-1, 1),
            Direction::South => (-1, 0),
            Direction::SouthWest => (-1, -1),
            Direction::West => (0, -1),
            Direction::NorthWest => (1, -1),
        }
    }

    pub const fn reverse(self) -> Direction {
        match self {
            Direction::North => Direction::South,
            Direction::NorthEast => Direction::SouthWest,
            Direction::East => Direction::West,
            Direction::SouthEast => Direction::NorthWest,
            Direction::South => Direction::North,
            Direction::SouthWest => Direction::NorthEast,
            Direction::West => Direction::East,
            Direction::NorthWest => Direction::SouthEast,
        }
    }
}

/// The eight knight jumps, as (rank, file) deltas.
pub const KNIGHT_JUMPS: [(i8, i8); 8] = [
    (-2, -1),
    (-2, 1),
    (-1, -2),
    (-1, 2),
    (1, -2),
    (1, 2),
    (2, -1),
    (2, 1),
];

macro_rules! type_iterator {
    ($name:ident, $type:ident, $max:expr) => {
        pub struct $name(u8, u8);

        impl Iterator for $name {
            type Item = $type;

            fn next(&mut self) -> Option<Self::Item> {
                if self.0 >= self.1 {
                    None
                } else {
                    let next = self.0;
                    self.0 += 1;
                    Some($type(next))
                }
            }
        }

        impl ::std::iter::DoubleEndedIterator for $name {
            fn next_back(&mut self) -> Option<Self::Item> {
                if self.1 == 0 {
                    None
                } else {
                    let next = self.1 - 1;
                    self.1 -= 1;
                    Some($type(next))
                }
            }
        }

        impl Default for $name {
            fn default() -> Self {
                $name(0, $max)
            }
        }
    };
}

type_iterator!(AllSquares, Square, 64);
type_iterator!(AllRanks, Rank, 8);
type_iterator!(AllFiles, File, 8);

pub fn squares() -> AllSquares {
    AllSquares::default()
}

pub fn ranks() -> AllRanks {
    AllRanks::default()
}

pub fn files() -> AllFiles {
    AllFiles::default()
}
