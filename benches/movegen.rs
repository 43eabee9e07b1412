// Copyright 2023 Sean Gillespie.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use tabia::core::{self, Move};
use tabia::movegen;
use tabia::Position;

fn criterion_benchmark(c: &mut Criterion) {
    c.bench_function("quiet-move-clonemake", |b| {
        let pos = Position::from_fen("8/8/4b3/8/2B5/8/8/8 w - - 0 1").unwrap();
        let mov = Move::new(pos.board(), core::C4, core::D5);
        b.iter(|| {
            let mut pos = black_box(&pos).clone();
            let mov = black_box(mov);
            pos.make_move(mov);
        });
    });

    c.bench_function("startpos-legal-moves", |b| {
        let pos = Position::new_game();
        b.iter(|| movegen::legal_moves(black_box(&pos)));
    });

    c.bench_function("midgame-legal-moves", |b| {
        let pos = Position::from_fen(
            "r3k2r/p1ppqpb1/bn2pnp1/3PN3/Pp2P3/2N2Q1p/1PPBBPPP/R3K2R b - - 0 1",
        )
        .unwrap();
        b.iter(|| movegen::legal_moves(black_box(&pos)));
    });

    c.bench_function("startpos-perft-3", |b| {
        let mut pos = Position::new_game();
        b.iter(|| movegen::perft(black_box(&mut pos), 3));
    });
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
