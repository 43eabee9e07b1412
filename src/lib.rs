// Copyright 2023 Sean Gillespie.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! `tabia` is a chess position tracker and legal-move generator. It maintains
//! a board, a side to move, and an undoable move history, and answers the one
//! question a chess UI needs answered: which moves are legal right now?
//!
//! The rules engine handles pins, single check, and double check by
//! ray-casting from the king. Castling, en passant, and promotion are out of
//! scope, as is any notion of searching or evaluating positions.

pub mod analysis;
pub mod core;
pub mod movegen;
pub mod position;

pub use crate::core::Move;
pub use position::Position;
