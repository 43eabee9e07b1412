// Copyright 2023 Sean Gillespie.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Check and pin detection, by ray-casting outward from the king.
//!
//! The scan is recomputed for every query and never cached on the position:
//! the same routine is reused to probe hypothetical king destinations
//! (`analyze_from`), and cached results would go stale across those probes.

use crate::core::*;
use crate::Position;

/// A friendly piece standing between its own king and an enemy slider (or an
/// aligned pawn or king at range one). The direction is the unit vector from
/// the king toward the attacker; the pinned piece may only move along this
/// axis, in either direction.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Pin {
    pub square: Square,
    pub direction: (i8, i8),
}

/// An enemy piece currently attacking the king. For sliding, pawn, and king
/// attackers the direction is the unit ray vector from the king; for knights
/// it is the raw jump offset.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Check {
    pub square: Square,
    pub direction: (i8, i8),
}

/// The result of a pin/check scan. Transient: valid only for the position it
/// was computed against, and discarded after each legality query.
#[derive(Clone, Debug, Default)]
pub struct Analysis {
    pub in_check: bool,
    pub pins: Vec<Pin>,
    pub checks: Vec<Check>,
}

/// Computes checks against, and pins on, the side to move's king. A side
/// with no king on the board is never in check and pins nothing.
pub fn analyze(pos: &Position) -> Analysis {
    let us = pos.side_to_move();
    match pos.king(us) {
        Some(king) => analyze_from(pos, us, king),
        None => Analysis::default(),
    }
}

/// Runs the pin/check scan as if `us`'s king stood on `king`. The king's
/// actual square is treated as transparent, so callers can probe candidate
/// king destinations without touching the board.
pub fn analyze_from(pos: &Position, us: Color, king: Square) -> Analysis {
    let them = us.toggle();
    let mut analysis = Analysis::default();

    // Slider, pawn, and adjacent-king attacks all arrive along one of the
    // eight compass rays. Walk each ray outward until it resolves.
    for dir in Direction::COMPASS {
        let (d_rank, d_file) = dir.vector();
        let orthogonal = d_rank == 0 || d_file == 0;
        let mut blocker: Option<Pin> = None;

        for step in 1..8i8 {
            let sq = match king.offset(d_rank * step, d_file * step) {
                Some(sq) => sq,
                None => break,
            };
            let piece = match pos.piece_at(sq) {
                Some(piece) => piece,
                None => continue,
            };

            if piece.color == us {
                // The probed king square may differ from where the king
                // actually stands; the real king must not count as a
                // blocker.
                if piece.kind == PieceKind::King {
                    continue;
                }

                if blocker.is_some() {
                    // Two friendly pieces on the ray: neither a check nor a
                    // pin can come through it.
                    break;
                }

                blocker = Some(Pin {
                    square: sq,
                    direction: (d_rank, d_file),
                });
                continue;
            }

            // Enemy piece. Whether it attacks down this ray depends on its
            // kind, the ray's orientation, and (for pawns and kings) its
            // distance.
            let attacks = match piece.kind {
                PieceKind::Rook => orthogonal,
                PieceKind::Bishop => !orthogonal,
                PieceKind::Queen => true,
                PieceKind::King => step == 1,
                // A pawn guards the two diagonal squares ahead of it, so it
                // reaches the king only at range one, on a diagonal, from
                // the side it advances from.
                PieceKind::Pawn => step == 1 && !orthogonal && d_rank == -them.pawn_step(),
                PieceKind::Knight => false,
            };

            if attacks {
                match blocker {
                    None => {
                        analysis.in_check = true;
                        analysis.checks.push(Check {
                            square: sq,
                            direction: (d_rank, d_file),
                        });
                    }
                    Some(pin) => analysis.pins.push(pin),
                }
            }

            // Attacking or not, an enemy piece seals the ray.
            break;
        }
    }

    // Knight checks are never blockable, so there is no pin logic for them;
    // just probe the eight jump squares.
    for (d_rank, d_file) in KNIGHT_JUMPS {
        if let Some(sq) = king.offset(d_rank, d_file) {
            if pos.piece_at(sq) == Some(Piece::new(them, PieceKind::Knight)) {
                analysis.in_check = true;
                analysis.checks.push(Check {
                    square: sq,
                    direction: (d_rank, d_file),
                });
            }
        }
    }

    analysis
}
