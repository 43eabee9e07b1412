// Copyright 2023 Sean Gillespie.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Move generation: per-piece pseudo-legal generators and the legal-move
//! filter built on top of the pin/check analysis.

use tracing::debug;

use crate::analysis::{self, Check, Pin};
use crate::core::*;
use crate::Position;

/// Generates every legal move for the side to move. This is the entry point
/// a UI or harness should validate moves against.
///
/// The shape of the computation depends on how many pieces are giving check:
/// with none, pinned pieces are restricted to their pin axis and the king to
/// safe squares; with one, every non-king move must additionally block the
/// check or capture the checker; with two or more, only king moves remain.
pub fn legal_moves(pos: &Position) -> Vec<Move> {
    let us = pos.side_to_move();
    let analysis = analysis::analyze(pos);
    debug!(
        side = ?us,
        in_check = analysis.in_check,
        checks = analysis.checks.len(),
        pins = analysis.pins.len(),
        "generating legal moves"
    );

    let mut moves = Vec::new();
    match analysis.checks.len() {
        0 => generate(us, pos, &analysis.pins, true, &mut moves),
        1 => {
            generate(us, pos, &analysis.pins, true, &mut moves);
            let valid = interposition_squares(pos, us, &analysis.checks[0]);
            moves.retain(|m| {
                m.piece_moved().kind == PieceKind::King || valid.contains(&m.destination())
            });
        }
        // Double check: nothing can block or capture two attackers at once,
        // so every piece but the king is frozen.
        _ => {
            if let Some(king) = pos.king(us) {
                king_moves(us, pos, king, true, &mut moves);
            }
        }
    }

    moves
}

/// Generates every move consistent with piece movement and occupancy rules,
/// ignoring checks and pins entirely.
pub fn pseudo_legal_moves(pos: &Position) -> Vec<Move> {
    let mut moves = Vec::new();
    generate(pos.side_to_move(), pos, &[], false, &mut moves);
    moves
}

/// Counts the leaf nodes of the legal-move tree to the given depth. A
/// correctness exerciser for the generator and the make/unmake round-trip,
/// not a search.
pub fn perft(pos: &mut Position, depth: u32) -> u64 {
    if depth == 0 {
        return 1;
    }

    let mut nodes = 0;
    for mov in legal_moves(pos) {
        pos.make_move(mov);
        nodes += perft(pos, depth - 1);
        pos.unmake_move();
    }

    nodes
}

/// Scans the board in square order and dispatches each friendly piece to its
/// generator. `pins` constrains pinned pieces to their pin axis (pass an
/// empty slice for pseudo-legal generation); `safe_king` filters king moves
/// down to squares that do not expose the king.
fn generate(us: Color, pos: &Position, pins: &[Pin], safe_king: bool, moves: &mut Vec<Move>) {
    for from in squares() {
        let piece = match pos.piece_at(from) {
            Some(piece) if piece.color == us => piece,
            _ => continue,
        };

        match piece.kind {
            PieceKind::Pawn => pawn_moves(us, pos, from, pins, moves),
            PieceKind::Knight => knight_moves(us, pos, from, pins, moves),
            PieceKind::Bishop => sliding_moves(us, pos, from, &Direction::DIAGONAL, pins, moves),
            PieceKind::Rook => sliding_moves(us, pos, from, &Direction::ORTHOGONAL, pins, moves),
            PieceKind::Queen => {
                // A queen is the union of a rook and a bishop on its square.
                sliding_moves(us, pos, from, &Direction::ORTHOGONAL, pins, moves);
                sliding_moves(us, pos, from, &Direction::DIAGONAL, pins, moves);
            }
            PieceKind::King => king_moves(us, pos, from, safe_king, moves),
        }
    }
}

fn pin_on(pins: &[Pin], square: Square) -> Option<(i8, i8)> {
    pins.iter()
        .find(|pin| pin.square == square)
        .map(|pin| pin.direction)
}

/// A pinned piece may move along its pin axis in either direction: toward
/// the attacker (including capturing it) or back toward the king.
fn along_axis(axis: (i8, i8), delta: (i8, i8)) -> bool {
    delta == axis || delta == (-axis.0, -axis.1)
}

fn pawn_moves(us: Color, pos: &Position, from: Square, pins: &[Pin], moves: &mut Vec<Move>) {
    let pin = pin_on(pins, from);
    let step = us.pawn_step();

    // Pushes: one square forward onto an empty square, two from the home
    // rank if the intermediate square is also empty. No promotion; a pawn
    // reaching the back rank stays a pawn.
    if let Some(to) = from.offset(step, 0) {
        if pos.piece_at(to).is_none() && pin.map_or(true, |axis| along_axis(axis, (step, 0))) {
            moves.push(Move::new(pos.board(), from, to));
            if from.rank() == us.pawn_home_rank() {
                if let Some(two) = from.offset(step * 2, 0) {
                    if pos.piece_at(two).is_none() {
                        moves.push(Move::new(pos.board(), from, two));
                    }
                }
            }
        }
    }

    // Diagonal captures, onto enemy-occupied squares only.
    for d_file in [-1, 1] {
        if let Some(to) = from.offset(step, d_file) {
            match pos.piece_at(to) {
                Some(target) if target.color != us => {
                    if pin.map_or(true, |axis| along_axis(axis, (step, d_file))) {
                        moves.push(Move::new(pos.board(), from, to));
                    }
                }
                _ => {}
            }
        }
    }
}

fn knight_moves(us: Color, pos: &Position, from: Square, pins: &[Pin], moves: &mut Vec<Move>) {
    // A knight can never stay on its pin axis: every jump leaves the ray, so
    // a pinned knight is completely frozen.
    if pin_on(pins, from).is_some() {
        return;
    }

    for (d_rank, d_file) in KNIGHT_JUMPS {
        if let Some(to) = from.offset(d_rank, d_file) {
            if pos.piece_at(to).map_or(true, |p| p.color != us) {
                moves.push(Move::new(pos.board(), from, to));
            }
        }
    }
}

fn sliding_moves(
    us: Color,
    pos: &Position,
    from: Square,
    dirs: &[Direction],
    pins: &[Pin],
    moves: &mut Vec<Move>,
) {
    let pin = pin_on(pins, from);
    for &dir in dirs {
        let (d_rank, d_file) = dir.vector();
        if let Some(axis) = pin {
            if !along_axis(axis, (d_rank, d_file)) {
                continue;
            }
        }

        for step in 1..8i8 {
            let to = match from.offset(d_rank * step, d_file * step) {
                Some(to) => to,
                // Off the board; the ray is done.
                None => break,
            };

            match pos.piece_at(to) {
                None => moves.push(Move::new(pos.board(), from, to)),
                Some(target) if target.color != us => {
                    // Capture terminates the ray.
                    moves.push(Move::new(pos.board(), from, to));
                    break;
                }
                // Friendly piece terminates the ray without a move.
                Some(_) => break,
            }
        }
    }
}

fn king_moves(us: Color, pos: &Position, from: Square, safe: bool, moves: &mut Vec<Move>) {
    let mut candidates = Vec::new();
    for dir in Direction::COMPASS {
        if let Some(to) = from.towards(dir) {
            if pos.piece_at(to).map_or(true, |p| p.color != us) {
                candidates.push(Move::new(pos.board(), from, to));
            }
        }
    }

    if safe {
        // Probe each destination with the full pin/check scan. The king's
        // current square is transparent to the scan, so no board mutation is
        // needed to ask "would the king be safe there?".
        candidates.retain(|m| !analysis::analyze_from(pos, us, m.destination()).in_check);
    }

    moves.extend(candidates);
}

/// The set of destinations that resolve a single check without moving the
/// king: the squares strictly between the king and the checker along the
/// check ray, plus the checker's own square. A checking knight can only be
/// captured, never blocked.
fn interposition_squares(pos: &Position, us: Color, check: &Check) -> Vec<Square> {
    if pos.piece_at(check.square).map(|p| p.kind) == Some(PieceKind::Knight) {
        return vec![check.square];
    }

    let king = match pos.king(us) {
        Some(king) => king,
        None => return Vec::new(),
    };

    let (d_rank, d_file) = check.direction;
    let mut valid = Vec::new();
    for step in 1..8i8 {
        let sq = match king.offset(d_rank * step, d_file * step) {
            Some(sq) => sq,
            None => break,
        };

        valid.push(sq);
        if sq == check.square {
            break;
        }
    }

    valid
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::{legal_moves, pseudo_legal_moves};
    use crate::core::*;
    use crate::Position;

    fn endpoints(moves: &[Move]) -> HashSet<(Square, Square)> {
        moves.iter().map(|m| (m.source(), m.destination())).collect()
    }

    fn assert_moves_generated(fen: &str, expected: &[(Square, Square)]) {
        let pos = Position::from_fen(fen).unwrap();
        let generated = endpoints(&legal_moves(&pos));
        let expected: HashSet<_> = expected.iter().copied().collect();
        if generated != expected {
            println!("{}", pos);
            println!("missing:    {:?}", expected.difference(&generated));
            println!("unexpected: {:?}", generated.difference(&expected));
            panic!("legal move set mismatch");
        }
    }

    fn assert_moves_contains(fen: &str, moves: &[(Square, Square)]) {
        let pos = Position::from_fen(fen).unwrap();
        let generated = endpoints(&legal_moves(&pos));
        for mov in moves {
            if !generated.contains(mov) {
                println!("{}", pos);
                println!("generated: {:?}", generated);
                panic!("move {}{} was not generated", mov.0, mov.1);
            }
        }
    }

    fn assert_moves_does_not_contain(fen: &str, moves: &[(Square, Square)]) {
        let pos = Position::from_fen(fen).unwrap();
        let generated = endpoints(&legal_moves(&pos));
        for mov in moves {
            if generated.contains(mov) {
                println!("{}", pos);
                panic!("move list contained banned move: {}{}", mov.0, mov.1);
            }
        }
    }

    mod pawns {
        use super::*;

        #[test]
        fn white_pawn_smoke() {
            assert_moves_generated("8/8/8/8/5P2/8/8/8 w - - 0 1", &[(F4, F5)]);
        }

        #[test]
        fn white_pawn_double_push_from_home_rank() {
            assert_moves_generated("8/8/8/8/8/8/4P3/8 w - - 0 1", &[(E2, E3), (E2, E4)]);
        }

        #[test]
        fn black_pawn_moves_down_the_board() {
            assert_moves_generated("8/4p3/8/8/8/8/8/8 b - - 0 1", &[(E7, E6), (E7, E5)]);
        }

        #[test]
        fn pawn_blocked_by_any_piece() {
            assert_moves_generated("8/8/8/8/5p2/5P2/8/8 w - - 0 1", &[]);
            // A friendly blocker on the double-push square still allows the
            // single push.
            assert_moves_contains("8/8/8/8/4P3/8/4P3/8 w - - 0 1", &[(E2, E3)]);
            assert_moves_does_not_contain("8/8/8/8/4P3/8/4P3/8 w - - 0 1", &[(E2, E4)]);
        }

        #[test]
        fn no_double_push_through_occupied_intermediate() {
            assert_moves_does_not_contain("8/8/8/8/8/4p3/4P3/8 w - - 0 1", &[(E2, E4)]);
        }

        #[test]
        fn pawn_captures_diagonally_only_onto_enemies() {
            // Enemies on both diagonals and ahead: the push is blocked, both
            // captures are available.
            assert_moves_generated(
                "8/8/8/8/3ppp2/4P3/8/8 w - - 0 1",
                &[(E3, D4), (E3, F4)],
            );
            // Empty diagonals are not capture targets.
            assert_moves_generated("8/8/8/8/8/4P3/8/8 w - - 0 1", &[(E3, E4)]);
        }

        #[test]
        fn pawn_reaching_back_rank_stays_a_pawn() {
            let mut pos = Position::from_fen("8/4P3/8/8/8/8/8/8 w - - 0 1").unwrap();
            let moves = legal_moves(&pos);
            assert_eq!(1, moves.len());
            pos.make_move(moves[0]);
            assert_eq!(
                Some(Piece::new(Color::White, PieceKind::Pawn)),
                pos.piece_at(E8)
            );
        }
    }

    mod knights {
        use super::*;

        #[test]
        fn knight_smoke() {
            assert_moves_generated(
                "8/8/8/8/3N4/8/8/8 w - - 0 1",
                &[
                    (D4, B3),
                    (D4, B5),
                    (D4, C2),
                    (D4, C6),
                    (D4, E2),
                    (D4, E6),
                    (D4, F3),
                    (D4, F5),
                ],
            );
        }

        #[test]
        fn knight_in_corner() {
            assert_moves_generated("8/8/8/8/8/8/8/N7 w - - 0 1", &[(A1, B3), (A1, C2)]);
        }

        #[test]
        fn knight_jumps_over_but_respects_friends() {
            // Surrounded by friendly pawns, the knight still jumps out, but
            // friendly-occupied destinations are off limits.
            assert_moves_contains(
                "8/8/8/2PPP3/2PNP3/2PPP3/8/8 w - - 0 1",
                &[(D4, B3), (D4, F3), (D4, E2), (D4, C2)],
            );
            assert_moves_does_not_contain("8/8/2P5/8/3N4/8/8/8 w - - 0 1", &[(D4, C6)]);
        }
    }

    mod sliders {
        use super::*;

        #[test]
        fn bishop_smoke() {
            assert_moves_generated(
                "8/8/8/8/3B4/8/8/8 w - - 0 1",
                &[
                    (D4, E5),
                    (D4, F6),
                    (D4, G7),
                    (D4, H8),
                    (D4, E3),
                    (D4, F2),
                    (D4, G1),
                    (D4, C3),
                    (D4, B2),
                    (D4, A1),
                    (D4, C5),
                    (D4, B6),
                    (D4, A7),
                ],
            );
        }

        #[test]
        fn bishop_capture_terminates_ray() {
            assert_moves_generated(
                "8/8/8/2p1p3/3B4/2p1p3/8/8 w - - 0 1",
                &[(D4, C5), (D4, E5), (D4, C3), (D4, E3)],
            );
        }

        #[test]
        fn rook_smoke() {
            let files = [(D4, A4), (D4, B4), (D4, C4), (D4, E4), (D4, F4), (D4, G4), (D4, H4)];
            let ranks = [(D4, D1), (D4, D2), (D4, D3), (D4, D5), (D4, D6), (D4, D7), (D4, D8)];
            let all: Vec<_> = files.iter().chain(ranks.iter()).copied().collect();
            assert_moves_generated("8/8/8/8/3R4/8/8/8 w - - 0 1", &all);
        }

        #[test]
        fn rook_blocked_by_friend_captures_enemy() {
            assert_moves_contains("8/3p4/8/8/3R1P2/8/8/8 w - - 0 1", &[(D4, D7), (D4, E4)]);
            assert_moves_does_not_contain(
                "8/3p4/8/8/3R1P2/8/8/8 w - - 0 1",
                &[(D4, D8), (D4, F4), (D4, G4)],
            );
        }

        #[test]
        fn queen_is_rook_plus_bishop() {
            let pos = Position::from_fen("8/8/8/8/3Q4/8/8/8 w - - 0 1").unwrap();
            assert_eq!(27, legal_moves(&pos).len());
        }
    }

    mod king {
        use super::*;

        #[test]
        fn king_smoke() {
            assert_moves_generated(
                "8/8/8/8/3K4/8/8/8 w - - 0 1",
                &[
                    (D4, C3),
                    (D4, C4),
                    (D4, C5),
                    (D4, D3),
                    (D4, D5),
                    (D4, E3),
                    (D4, E4),
                    (D4, E5),
                ],
            );
        }

        #[test]
        fn king_may_stand_on_edge_ranks_and_files() {
            // Rank 1 and file a are ordinary squares for a king; the corner
            // leaves exactly three destinations.
            assert_moves_generated(
                "7k/8/8/8/8/8/8/K7 w - - 0 1",
                &[(A1, A2), (A1, B1), (A1, B2)],
            );
        }

        #[test]
        fn king_cannot_step_into_attack() {
            // The black rook on d8 seals the d-file.
            assert_moves_does_not_contain(
                "3r3k/8/8/8/8/8/8/4K3 w - - 0 1",
                &[(E1, D1), (E1, D2)],
            );
            assert_moves_contains("3r3k/8/8/8/8/8/8/4K3 w - - 0 1", &[(E1, F1), (E1, F2), (E1, E2)]);
        }

        #[test]
        fn kings_may_not_touch() {
            assert_moves_generated(
                "8/8/8/8/8/4k3/8/4K3 w - - 0 1",
                &[(E1, D1), (E1, F1)],
            );
        }

        #[test]
        fn king_cannot_capture_defended_piece() {
            // The rook on e2 gives check and is defended by the rook on e8.
            assert_moves_generated(
                "4r2k/8/8/8/8/8/4r3/4K3 w - - 0 1",
                &[(E1, D1), (E1, F1)],
            );
        }

        #[test]
        fn king_cannot_retreat_along_check_ray() {
            // The king may not step from e2 back to e1: it is still on the
            // rook's line even though it currently shields e1 itself.
            assert_moves_does_not_contain(
                "4r2k/8/8/8/8/8/4K3/8 w - - 0 1",
                &[(E2, E1), (E2, E3)],
            );
            assert_moves_contains(
                "4r2k/8/8/8/8/8/4K3/8 w - - 0 1",
                &[(E2, D1), (E2, D2), (E2, F1), (E2, F2)],
            );
        }
    }

    mod legality {
        use super::*;
        use crate::analysis::analyze;

        #[test]
        fn twenty_moves_from_the_start() {
            let pos = Position::new_game();
            assert_eq!(20, legal_moves(&pos).len());
            assert_eq!(20, pseudo_legal_moves(&pos).len());
        }

        #[test]
        fn pinned_rook_is_restricted_to_its_file() {
            let fen = "4r3/8/8/8/8/8/4R3/4K3 w - - 0 1";
            let pos = Position::from_fen(fen).unwrap();
            assert_eq!(1, analyze(&pos).pins.len());

            // The pinned rook may slide along the e-file, up to and
            // including capturing the pinner.
            assert_moves_contains(
                fen,
                &[(E2, E3), (E2, E4), (E2, E5), (E2, E6), (E2, E7), (E2, E8)],
            );
            assert_moves_does_not_contain(fen, &[(E2, D2), (E2, F2), (E2, A2)]);
        }

        #[test]
        fn pinned_bishop_slides_along_its_diagonal() {
            let fen = "7k/8/8/b7/8/8/3B4/4K3 w - - 0 1";
            assert_moves_contains(fen, &[(D2, C3), (D2, B4), (D2, A5)]);
            assert_moves_does_not_contain(fen, &[(D2, C1), (D2, E3), (D2, F4)]);
        }

        #[test]
        fn pinned_pawn_may_push_but_not_capture() {
            // The e2 pawn is pinned to the e-file; the capture on d3 would
            // expose the king.
            let fen = "4r3/8/8/8/8/3p4/4P3/4K3 w - - 0 1";
            assert_moves_contains(fen, &[(E2, E3), (E2, E4)]);
            assert_moves_does_not_contain(fen, &[(E2, D3)]);
        }

        #[test]
        fn pinned_knight_is_frozen() {
            let fen = "4r3/8/8/8/8/8/4N3/4K3 w - - 0 1";
            let pos = Position::from_fen(fen).unwrap();

            // Pseudo-legal generation still lists the knight's jumps; the
            // legal filter removes every one of them.
            let pseudo = pseudo_legal_moves(&pos);
            assert!(pseudo.iter().any(|m| m.source() == E2));
            let legal = legal_moves(&pos);
            assert!(legal.iter().all(|m| m.source() != E2));
        }

        #[test]
        fn single_check_block_capture_or_move() {
            // The rook on e8 checks the king; the rook on a2 can block on
            // e2, and the king can leave the e-file.
            assert_moves_generated(
                "4r3/8/8/8/8/8/R7/4K3 w - - 0 1",
                &[(A2, E2), (E1, D1), (E1, D2), (E1, F1), (E1, F2)],
            );
        }

        #[test]
        fn single_check_capture_the_checker() {
            // The rook on a8 answers the check by capturing on e8.
            assert_moves_contains("R3r3/8/8/8/8/8/8/4K3 w - - 0 1", &[(A8, E8)]);
            assert_moves_does_not_contain("R3r3/8/8/8/8/8/8/4K3 w - - 0 1", &[(A8, B8), (A8, A1)]);
        }

        #[test]
        fn knight_check_cannot_be_blocked() {
            // The knight on d3 checks from jump range; the rook on a3 can
            // only help by capturing it.
            assert_moves_generated(
                "8/8/8/8/8/R2n4/8/4K3 w - - 0 1",
                &[(A3, D3), (E1, D1), (E1, D2), (E1, E2), (E1, F1)],
            );
        }

        #[test]
        fn double_check_forces_a_king_move() {
            // Rook on e8 and bishop on a5 both give check; the white rook
            // could block either one alone but not both.
            let pos = Position::from_fen("4r3/8/8/b7/8/8/8/R3K3 w - - 0 1").unwrap();
            let moves = legal_moves(&pos);
            assert!(!moves.is_empty());
            assert!(moves.iter().all(|m| m.source() == E1));
        }

        #[test]
        fn check_analysis_is_not_persisted() {
            // Pins and checks are recomputed per query: resolving the pin
            // changes the answer on the very next call.
            let mut pos = Position::from_fen("4r2k/8/8/8/8/8/4R3/4K3 w - - 0 1").unwrap();
            assert_eq!(1, analyze(&pos).pins.len());
            pos.make_move(Move::new(pos.board(), E2, E8));
            pos.make_move(Move::new(pos.board(), H8, H7));
            assert!(analyze(&pos).pins.is_empty());
        }
    }

    mod perft {
        use super::super::perft;
        use crate::Position;

        #[test]
        fn perft_from_the_start() {
            let mut pos = Position::new_game();
            assert_eq!(20, perft(&mut pos, 1));
            assert_eq!(400, perft(&mut pos, 2));
            assert_eq!(8902, perft(&mut pos, 3));
        }

        #[test]
        fn perft_unwinds_cleanly() {
            let mut pos = Position::new_game();
            let before = pos.as_fen();
            perft(&mut pos, 3);
            assert_eq!(before, pos.as_fen());
            assert!(pos.move_log().is_empty());
        }
    }
}
